//! Shapefile bundles on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, Point, Polygon};
use indexmap::IndexMap;
use shapefile::dbase::{self, FieldName, FieldType, FieldValue, Record, TableWriterBuilder};
use shapefile::record::EsriShape;
use shapefile::{PolygonRing, Shape, ShapeReader, ShapeType};
use tracing::{debug, info, warn};

use crate::arcgis::esri::assemble_rings;
use crate::feature::{AttributeValue, Feature, FeatureCollection, FieldDef, FieldKind, GeometryType};

use super::error::PersistenceError;
use super::naming::{dbf_field_names, truncate_bytes, DBF_TEXT_LEN};

/// Suffix of the directory a bundle is written into before it is complete.
pub const STAGING_SUFFIX: &str = ".incomplete";

/// Suffix the previous bundle is moved to while its replacement is renamed in.
const REPLACED_SUFFIX: &str = ".replaced";

const INTEGER_WIDTH: u8 = 18;
const FLOAT_WIDTH: u8 = 24;
const FLOAT_DECIMALS: u8 = 11;

const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;
const WEB_MERCATOR_WKT: &str = r#"PROJCS["WGS_1984_Web_Mercator_Auxiliary_Sphere",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Mercator_Auxiliary_Sphere"],PARAMETER["False_Easting",0.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",0.0],PARAMETER["Standard_Parallel_1",0.0],PARAMETER["Auxiliary_Sphere_Type",0.0],UNIT["Meter",1.0]]"#;

/// Column names recognised as the object identifier when loading.
const OID_NAMES: [&str; 3] = ["OBJECTID", "FID", "OID"];

/// Result of a successful [`write_collection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenBundle {
    /// Final bundle directory.
    pub directory: PathBuf,
    /// Path of the `.shp` inside `directory`.
    pub shp_path: PathBuf,
    /// Records written.
    pub records: usize,
    /// Features skipped because they have no geometry.
    pub skipped: usize,
}

/// Directory a bundle named `stem` occupies under `root`.
pub fn bundle_dir(root: &Path, stem: &str) -> PathBuf {
    root.join(stem)
}

/// Staging directory used while writing the bundle named `stem`.
pub fn staging_dir(root: &Path, stem: &str) -> PathBuf {
    root.join(format!("{}{}", stem, STAGING_SUFFIX))
}

/// Move `staging` to `directory`, keeping any existing `directory` until the
/// move has succeeded.
fn replace_dir(staging: &Path, directory: &Path, aside: &Path) -> Result<(), PersistenceError> {
    if !directory.exists() {
        return fs::rename(staging, directory).map_err(|e| PersistenceError::io(directory, e));
    }

    if aside.exists() {
        fs::remove_dir_all(aside).map_err(|e| PersistenceError::io(aside, e))?;
    }
    fs::rename(directory, aside).map_err(|e| PersistenceError::io(directory, e))?;

    if let Err(e) = fs::rename(staging, directory) {
        if let Err(restore) = fs::rename(aside, directory) {
            warn!(
                path = %aside.display(),
                error = %restore,
                "failed to restore previous bundle"
            );
        }
        return Err(PersistenceError::io(directory, e));
    }

    if let Err(e) = fs::remove_dir_all(aside) {
        warn!(path = %aside.display(), error = %e, "failed to remove previous bundle");
    }
    Ok(())
}

/// Write `collection` as `<root>/<stem>/<stem>.{shp,shx,dbf[,prj]}`.
///
/// Files are written into `<root>/<stem>.incomplete` first and the directory
/// is renamed into place once everything is on disk, replacing any previous
/// bundle of the same name. On error the staging directory is left behind.
///
/// `stem` should come from [`sanitize_name`](super::sanitize_name).
pub fn write_collection(
    collection: &FeatureCollection,
    root: &Path,
    stem: &str,
) -> Result<WrittenBundle, PersistenceError> {
    if stem.is_empty() || stem.contains(['/', '\\']) || stem == "." || stem == ".." {
        return Err(PersistenceError::format(root, format!("invalid bundle name '{}'", stem)));
    }

    let staging = staging_dir(root, stem);
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| PersistenceError::io(&staging, e))?;
    }
    fs::create_dir_all(&staging).map_err(|e| PersistenceError::io(&staging, e))?;

    let shp = staging.join(format!("{}.shp", stem));
    let fields = effective_fields(collection);
    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let columns: Vec<(String, FieldDef)> = dbf_field_names(&names).into_iter().zip(fields).collect();

    let table = table_builder(&columns, &shp)?;
    let (records, skipped) = match collection.geometry_type {
        GeometryType::Point => write_shapes(&shp, table, collection, &columns, to_point)?,
        GeometryType::Multipoint => write_shapes(&shp, table, collection, &columns, to_multipoint)?,
        GeometryType::Polyline => write_shapes(&shp, table, collection, &columns, to_polyline)?,
        GeometryType::Polygon => write_shapes(&shp, table, collection, &columns, to_polygon)?,
    };
    if skipped > 0 {
        warn!(
            bundle = stem,
            skipped, "features without geometry were not written"
        );
    }

    if let Some(wkt) = collection.spatial_reference.and_then(prj_for) {
        let prj = staging.join(format!("{}.prj", stem));
        fs::write(&prj, wkt).map_err(|e| PersistenceError::io(&prj, e))?;
    }

    let directory = bundle_dir(root, stem);
    replace_dir(&staging, &directory, &root.join(format!("{}{}", stem, REPLACED_SUFFIX)))?;

    info!(
        path = %directory.display(),
        records,
        geometry = %collection.geometry_type,
        "bundle written"
    );

    Ok(WrittenBundle {
        shp_path: directory.join(format!("{}.shp", stem)),
        directory,
        records,
        skipped,
    })
}

/// Load a bundle written by [`write_collection`], or any shapefile.
///
/// `path` is either the `.shp` file or a bundle directory. Numeric columns
/// load as integers when every value is integral, floats otherwise. Dates
/// load as epoch milliseconds at UTC midnight.
pub fn load_collection(path: &Path) -> Result<FeatureCollection, PersistenceError> {
    let shp = resolve_shp(path);
    let dbf = shp.with_extension("dbf");

    let columns: Vec<(String, FieldType)> = {
        let table = dbase::Reader::from_path(&dbf).map_err(|source| PersistenceError::Table {
            path: dbf.clone(),
            source,
        })?;
        table
            .fields()
            .iter()
            .filter(|f| f.name() != "DeletionFlag")
            .map(|f| (f.name().to_string(), f.field_type()))
            .collect()
    };

    let mut reader =
        shapefile::Reader::from_path(&shp).map_err(|e| PersistenceError::shapefile(&shp, e))?;
    let geometry_type = geometry_type_of(reader.header().shape_type).ok_or_else(|| {
        PersistenceError::format(&shp, "shapefile does not declare a supported geometry type")
    })?;

    let mut rows: Vec<(Option<Geometry<f64>>, Vec<FieldValue>)> = Vec::new();
    for item in reader.iter_shapes_and_records() {
        let (shape, record) = item.map_err(|e| PersistenceError::shapefile(&shp, e))?;
        let geometry = shape_to_geometry(shape).map_err(|reason| {
            PersistenceError::format(&shp, format!("record {}: {}", rows.len() + 1, reason))
        })?;
        let values = columns
            .iter()
            .map(|(name, _)| record.get(name).cloned().unwrap_or(FieldValue::Character(None)))
            .collect();
        rows.push((geometry, values));
    }

    let mut fields: Vec<FieldDef> = columns
        .iter()
        .enumerate()
        .map(|(i, (name, field_type))| {
            FieldDef::new(name.clone(), column_kind(*field_type, rows.iter().map(|r| &r.1[i])))
        })
        .collect();
    let oid = fields.iter().position(|f| {
        f.kind == FieldKind::Integer && OID_NAMES.iter().any(|n| n.eq_ignore_ascii_case(&f.name))
    });
    if let Some(i) = oid {
        fields[i].kind = FieldKind::ObjectId;
    }

    let spatial_reference = read_prj(&shp.with_extension("prj"));
    let mut collection = FeatureCollection::new(geometry_type).with_spatial_reference(spatial_reference);

    for (position, (geometry, values)) in rows.into_iter().enumerate() {
        let mut attributes = IndexMap::with_capacity(fields.len());
        for (field, value) in fields.iter().zip(values) {
            attributes.insert(field.name.clone(), attribute_value(field.kind, value));
        }
        let id = oid
            .and_then(|i| attributes.get(&fields[i].name))
            .and_then(|v| v.as_i64())
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(position as u64 + 1);
        collection.push(Feature {
            id,
            geometry,
            attributes,
        });
    }
    collection.fields = fields;

    debug!(path = %shp.display(), records = collection.len(), "bundle loaded");
    Ok(collection)
}

/// Geometry of the first record of the shapefile at `path`.
///
/// `Ok(None)` when the file has no records or the first one is a null shape.
pub fn first_geometry(path: &Path) -> Result<Option<Geometry<f64>>, PersistenceError> {
    let shp = resolve_shp(path);
    let mut reader = ShapeReader::from_path(&shp).map_err(|e| PersistenceError::shapefile(&shp, e))?;
    match reader.iter_shapes().next() {
        None => Ok(None),
        Some(shape) => {
            let shape = shape.map_err(|e| PersistenceError::shapefile(&shp, e))?;
            shape_to_geometry(shape).map_err(|reason| PersistenceError::format(&shp, reason))
        }
    }
}

/// A directory `dir` stands for `dir/<dir name>.shp`.
fn resolve_shp(path: &Path) -> PathBuf {
    if path.is_dir() {
        if let Some(name) = path.file_name() {
            return path.join(name).with_extension("shp");
        }
    }
    path.to_path_buf()
}

/// Declared schema, or one inferred from attribute values when none was declared.
fn effective_fields(collection: &FeatureCollection) -> Vec<FieldDef> {
    if !collection.fields.is_empty() {
        return collection.fields.clone();
    }

    let mut inferred: IndexMap<String, Option<FieldKind>> = IndexMap::new();
    for feature in collection {
        for (name, value) in &feature.attributes {
            let seen = inferred.entry(name.clone()).or_insert(None);
            let kind = match value {
                AttributeValue::Null => continue,
                AttributeValue::Integer(_) => FieldKind::Integer,
                AttributeValue::Float(_) => FieldKind::Float,
                AttributeValue::Text(_) => FieldKind::Text,
            };
            *seen = Some(match (*seen, kind) {
                (None, k) => k,
                (Some(FieldKind::Integer), FieldKind::Float) => FieldKind::Float,
                (Some(FieldKind::Float), FieldKind::Integer) => FieldKind::Float,
                (Some(a), b) if a == b => a,
                _ => FieldKind::Text,
            });
        }
    }

    inferred
        .into_iter()
        .map(|(name, kind)| FieldDef::new(name, kind.unwrap_or(FieldKind::Text)))
        .collect()
}

fn table_builder(
    columns: &[(String, FieldDef)],
    shp: &Path,
) -> Result<TableWriterBuilder, PersistenceError> {
    let mut builder = TableWriterBuilder::new();
    for (dbf_name, field) in columns {
        let name = FieldName::try_from(dbf_name.as_str()).map_err(|_| {
            PersistenceError::format(shp, format!("invalid column name '{}'", dbf_name))
        })?;
        builder = match field.kind {
            FieldKind::ObjectId | FieldKind::Integer => builder.add_numeric_field(name, INTEGER_WIDTH, 0),
            FieldKind::Float => builder.add_numeric_field(name, FLOAT_WIDTH, FLOAT_DECIMALS),
            FieldKind::Text => builder.add_character_field(name, DBF_TEXT_LEN as u8),
            FieldKind::Date => builder.add_date_field(name),
        };
    }
    Ok(builder)
}

/// Convert every feature, then write shapes and records in one pass.
///
/// Returns `(written, skipped)`.
fn write_shapes<S, F>(
    shp: &Path,
    table: TableWriterBuilder,
    collection: &FeatureCollection,
    columns: &[(String, FieldDef)],
    convert: F,
) -> Result<(usize, usize), PersistenceError>
where
    S: EsriShape,
    F: Fn(&Geometry<f64>) -> Result<Option<S>, String>,
{
    let mut items: Vec<(S, Record)> = Vec::with_capacity(collection.len());
    let mut skipped = 0;

    for feature in collection {
        let shape = match &feature.geometry {
            Some(geometry) => convert(geometry).map_err(|reason| {
                PersistenceError::format(shp, format!("feature {}: {}", feature.id, reason))
            })?,
            None => None,
        };
        match shape {
            Some(shape) => items.push((shape, build_record(feature, columns))),
            None => skipped += 1,
        }
    }

    // Headers are finalised when the writer drops at the end of this scope.
    let mut writer =
        shapefile::Writer::from_path(shp, table).map_err(|e| PersistenceError::shapefile(shp, e))?;
    for (shape, record) in &items {
        writer
            .write_shape_and_record(shape, record)
            .map_err(|e| PersistenceError::shapefile(shp, e))?;
    }

    Ok((items.len(), skipped))
}

fn build_record(feature: &Feature, columns: &[(String, FieldDef)]) -> Record {
    let mut record = Record::default();
    for (dbf_name, field) in columns {
        let value = feature.attributes.get(&field.name).unwrap_or(&AttributeValue::Null);
        record.insert(dbf_name.clone(), field_value(field.kind, value));
    }
    record
}

fn field_value(kind: FieldKind, value: &AttributeValue) -> FieldValue {
    match kind {
        FieldKind::ObjectId | FieldKind::Integer => FieldValue::Numeric(match value {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(f.trunc()),
            AttributeValue::Text(s) => s.trim().parse::<i64>().ok().map(|i| i as f64),
            AttributeValue::Null => None,
        }),
        FieldKind::Float => FieldValue::Numeric(match value {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) if f.is_finite() => Some(*f),
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }),
        FieldKind::Text => FieldValue::Character(match value {
            AttributeValue::Null => None,
            other => Some(truncate_bytes(&other.to_string(), DBF_TEXT_LEN).to_string()),
        }),
        FieldKind::Date => FieldValue::Date(
            value
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dbase::Date::new(dt.day(), dt.month(), dt.year() as u32)),
        ),
    }
}

fn column_kind<'a>(field_type: FieldType, values: impl Iterator<Item = &'a FieldValue>) -> FieldKind {
    match field_type {
        FieldType::Integer => FieldKind::Integer,
        FieldType::Numeric | FieldType::Float | FieldType::Double | FieldType::Currency => {
            let mut any = false;
            for value in values {
                let v = match value {
                    FieldValue::Numeric(Some(v)) => *v,
                    FieldValue::Float(Some(v)) => *v as f64,
                    FieldValue::Double(v) | FieldValue::Currency(v) => *v,
                    _ => continue,
                };
                if v.fract() != 0.0 {
                    return FieldKind::Float;
                }
                any = true;
            }
            if any {
                FieldKind::Integer
            } else {
                FieldKind::Float
            }
        }
        FieldType::Date => FieldKind::Date,
        _ => FieldKind::Text,
    }
}

fn attribute_value(kind: FieldKind, value: FieldValue) -> AttributeValue {
    let number = match value {
        FieldValue::Numeric(v) => v,
        FieldValue::Float(v) => v.map(f64::from),
        FieldValue::Double(v) | FieldValue::Currency(v) => Some(v),
        FieldValue::Integer(i) => Some(i as f64),
        FieldValue::Character(s) => return s.map_or(AttributeValue::Null, AttributeValue::Text),
        FieldValue::Memo(s) => return AttributeValue::Text(s),
        FieldValue::Logical(b) => {
            return b.map_or(AttributeValue::Null, |b| AttributeValue::Text(b.to_string()))
        }
        FieldValue::Date(d) => {
            return d
                .and_then(|d| NaiveDate::from_ymd_opt(d.year() as i32, d.month(), d.day()))
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(AttributeValue::Null, |dt| {
                    AttributeValue::Integer(dt.and_utc().timestamp_millis())
                })
        }
        _ => return AttributeValue::Null,
    };
    match (kind, number) {
        (_, None) => AttributeValue::Null,
        (FieldKind::Integer | FieldKind::ObjectId, Some(v)) => AttributeValue::Integer(v as i64),
        (_, Some(v)) => AttributeValue::Float(v),
    }
}

fn prj_for(wkid: u32) -> Option<&'static str> {
    match wkid {
        4326 => Some(WGS84_WKT),
        3857 | 102100 => Some(WEB_MERCATOR_WKT),
        _ => None,
    }
}

fn read_prj(path: &Path) -> Option<u32> {
    let wkt = fs::read_to_string(path).ok()?;
    if wkt.contains("Web_Mercator") {
        Some(3857)
    } else if wkt.trim_start().starts_with("GEOGCS[\"GCS_WGS_1984\"") {
        Some(4326)
    } else {
        None
    }
}

fn geometry_type_of(shape_type: ShapeType) -> Option<GeometryType> {
    match shape_type {
        ShapeType::Point | ShapeType::PointM | ShapeType::PointZ => Some(GeometryType::Point),
        ShapeType::Multipoint | ShapeType::MultipointM | ShapeType::MultipointZ => {
            Some(GeometryType::Multipoint)
        }
        ShapeType::Polyline | ShapeType::PolylineM | ShapeType::PolylineZ => {
            Some(GeometryType::Polyline)
        }
        ShapeType::Polygon | ShapeType::PolygonM | ShapeType::PolygonZ => {
            Some(GeometryType::Polygon)
        }
        _ => None,
    }
}

fn shp_point(c: Coord<f64>) -> shapefile::Point {
    shapefile::Point::new(c.x, c.y)
}

fn to_point(geometry: &Geometry<f64>) -> Result<Option<shapefile::Point>, String> {
    match geometry {
        Geometry::Point(p) => Ok(Some(shp_point(p.0))),
        Geometry::MultiPoint(mp) if mp.0.len() == 1 => Ok(Some(shp_point(mp.0[0].0))),
        Geometry::MultiPoint(mp) if mp.0.is_empty() => Ok(None),
        other => Err(format!("expected a point, got {}", kind_of(other))),
    }
}

fn to_multipoint(geometry: &Geometry<f64>) -> Result<Option<shapefile::Multipoint>, String> {
    let points: Vec<shapefile::Point> = match geometry {
        Geometry::Point(p) => vec![shp_point(p.0)],
        Geometry::MultiPoint(mp) => mp.iter().map(|p| shp_point(p.0)).collect(),
        other => return Err(format!("expected a multipoint, got {}", kind_of(other))),
    };
    if points.is_empty() {
        return Ok(None);
    }
    Ok(Some(shapefile::Multipoint::new(points)))
}

fn to_polyline(geometry: &Geometry<f64>) -> Result<Option<shapefile::Polyline>, String> {
    let lines: Vec<LineString<f64>> = match geometry {
        Geometry::Line(l) => vec![LineString::from(*l)],
        Geometry::LineString(ls) => vec![ls.clone()],
        Geometry::MultiLineString(mls) => mls.0.clone(),
        other => return Err(format!("expected a polyline, got {}", kind_of(other))),
    };
    if lines.is_empty() {
        return Ok(None);
    }
    if lines.iter().any(|l| l.0.len() < 2) {
        return Err("polyline part with fewer than 2 points".to_string());
    }
    let parts = lines
        .iter()
        .map(|l| l.coords().map(|c| shp_point(*c)).collect())
        .collect();
    Ok(Some(shapefile::Polyline::with_parts(parts)))
}

fn to_polygon(geometry: &Geometry<f64>) -> Result<Option<shapefile::Polygon>, String> {
    let polygons: Vec<Polygon<f64>> = match geometry {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        other => return Err(format!("expected a polygon, got {}", kind_of(other))),
    };
    if polygons.is_empty() {
        return Ok(None);
    }

    let ring_points = |ring: &LineString<f64>| -> Result<Vec<shapefile::Point>, String> {
        if ring.0.len() < 3 {
            return Err("polygon ring with fewer than 3 points".to_string());
        }
        Ok(ring.coords().map(|c| shp_point(*c)).collect())
    };

    let mut rings = Vec::new();
    for polygon in &polygons {
        rings.push(PolygonRing::Outer(ring_points(polygon.exterior())?));
        for hole in polygon.interiors() {
            rings.push(PolygonRing::Inner(ring_points(hole)?));
        }
    }
    Ok(Some(shapefile::Polygon::with_rings(rings)))
}

fn kind_of(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "point",
        Geometry::Line(_) => "line",
        Geometry::LineString(_) => "linestring",
        Geometry::Polygon(_) => "polygon",
        Geometry::MultiPoint(_) => "multipoint",
        Geometry::MultiLineString(_) => "multilinestring",
        Geometry::MultiPolygon(_) => "multipolygon",
        Geometry::GeometryCollection(_) => "geometry collection",
        Geometry::Rect(_) => "rect",
        Geometry::Triangle(_) => "triangle",
    }
}

/// X/Y view over the shapefile point flavours.
trait PlanarPoint {
    fn coord(&self) -> Coord<f64>;
}

impl PlanarPoint for shapefile::Point {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl PlanarPoint for shapefile::PointM {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl PlanarPoint for shapefile::PointZ {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>, String> {
    let geometry = match shape {
        Shape::NullShape => None,
        Shape::Point(p) => Some(Geometry::Point(Point::from(p.coord()))),
        Shape::PointM(p) => Some(Geometry::Point(Point::from(p.coord()))),
        Shape::PointZ(p) => Some(Geometry::Point(Point::from(p.coord()))),
        Shape::Multipoint(mp) => multipoint_geometry(mp.points()),
        Shape::MultipointM(mp) => multipoint_geometry(mp.points()),
        Shape::MultipointZ(mp) => multipoint_geometry(mp.points()),
        Shape::Polyline(pl) => polyline_geometry(pl.parts()),
        Shape::PolylineM(pl) => polyline_geometry(pl.parts()),
        Shape::PolylineZ(pl) => polyline_geometry(pl.parts()),
        Shape::Polygon(pg) => polygon_geometry(pg.rings()),
        Shape::PolygonM(pg) => polygon_geometry(pg.rings()),
        Shape::PolygonZ(pg) => polygon_geometry(pg.rings()),
        Shape::Multipatch(_) => return Err("multipatch shapes are not supported".to_string()),
    };
    Ok(geometry)
}

fn multipoint_geometry<P: PlanarPoint>(points: &[P]) -> Option<Geometry<f64>> {
    if points.is_empty() {
        return None;
    }
    Some(Geometry::MultiPoint(MultiPoint::new(
        points.iter().map(|p| Point::from(p.coord())).collect(),
    )))
}

fn polyline_geometry<P: PlanarPoint>(parts: &[Vec<P>]) -> Option<Geometry<f64>> {
    if parts.is_empty() {
        return None;
    }
    Some(Geometry::MultiLineString(MultiLineString::new(
        parts
            .iter()
            .map(|part| part.iter().map(PlanarPoint::coord).collect())
            .collect(),
    )))
}

fn polygon_geometry<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> Option<Geometry<f64>> {
    let rings: Vec<LineString<f64>> = rings
        .iter()
        .map(|ring| {
            let mut ls: LineString<f64> = ring.points().iter().map(PlanarPoint::coord).collect();
            ls.close();
            ls
        })
        .collect();
    if rings.is_empty() {
        return None;
    }
    Some(Geometry::MultiPolygon(assemble_rings(rings)))
}
