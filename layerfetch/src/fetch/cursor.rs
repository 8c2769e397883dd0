//! Page cursor over one remote layer.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::arcgis::esri::{decode_geometry, CountResponse, EsriFeature, QueryPage};
use crate::arcgis::query::{self, PageRequest};
use crate::arcgis::{layer_metadata, schema_from_esri, HttpClient, ServiceError};
use crate::feature::{AttributeValue, Feature, FeatureCollection};

use super::error::{FetchError, ParseError};
use super::FetchOptions;

/// Walks a layer page by page, accumulating records in ascending id order.
///
/// A failed [`next_page`](Self::next_page) leaves the cursor at the failing
/// offset with everything fetched so far intact, so calling it again retries
/// exactly that page.
pub struct PageCursor<'a, C: HttpClient + ?Sized> {
    client: &'a C,
    endpoint: String,
    order_by: String,
    page_size: usize,
    out_sr: Option<u32>,
    total: usize,
    offset: usize,
    pages: usize,
    complete: bool,
    collection: FeatureCollection,
}

impl<'a, C: HttpClient + ?Sized> PageCursor<'a, C> {
    /// Read layer metadata and the record count, positioned at offset 0.
    pub fn open(client: &'a C, endpoint: &str, options: &FetchOptions) -> Result<Self, FetchError> {
        if options.page_size == 0 {
            return Err(FetchError::InvalidPageSize);
        }
        let metadata_error = |source: ServiceError| FetchError::Metadata {
            endpoint: endpoint.to_string(),
            source,
        };

        let metadata = layer_metadata(client, endpoint).map_err(metadata_error)?;
        let geometry_type = metadata.geometry_type.ok_or_else(|| {
            metadata_error(ServiceError::Malformed(
                "layer does not declare a geometryType".to_string(),
            ))
        })?;

        let page_size = match metadata.max_record_count {
            Some(max) if max < options.page_size => {
                warn!(
                    endpoint,
                    requested = options.page_size,
                    max_record_count = max,
                    "page size above server maxRecordCount, clamping"
                );
                max
            }
            _ => options.page_size,
        };

        let count_url = query::count_url(endpoint).map_err(metadata_error)?;
        let count: CountResponse = query::get_json(client, &count_url).map_err(metadata_error)?;

        info!(
            endpoint,
            total = count.count,
            page_size,
            order_by = %metadata.object_id_field,
            "starting paged fetch"
        );

        let collection = FeatureCollection::new(geometry_type)
            .with_fields(metadata.fields)
            .with_spatial_reference(options.out_sr.or(metadata.spatial_reference));

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            order_by: metadata.object_id_field,
            page_size,
            out_sr: options.out_sr,
            total: count.count,
            offset: 0,
            pages: 0,
            complete: count.count == 0,
            collection,
        })
    }

    /// Fetch and append the next page.
    ///
    /// Returns the number of records appended, or `None` once the layer has
    /// been read completely.
    pub fn next_page(&mut self) -> Result<Option<usize>, FetchError> {
        if self.complete {
            return Ok(None);
        }

        let url = query::page_url(
            &self.endpoint,
            &PageRequest {
                order_by: self.order_by.clone(),
                offset: self.offset,
                count: self.page_size,
                out_sr: self.out_sr,
            },
        )
        .map_err(|source| self.page_error(source))?;

        let page: QueryPage = query::get_json(self.client, &url).map_err(|source| {
            if let ServiceError::Malformed(reason) = source {
                FetchError::Parse(self.parse_error(reason))
            } else {
                self.page_error(source)
            }
        })?;

        // Decode the whole page before touching the buffer so a bad record
        // leaves the cursor exactly where it was.
        let mut last_id = self.collection.last_id();
        let mut decoded = Vec::with_capacity(page.features.len());
        for raw in &page.features {
            let feature = self.decode_feature(raw)?;
            if let Some(prev) = last_id {
                if feature.id <= prev {
                    return Err(FetchError::Parse(self.parse_error(format!(
                        "identifier {} does not follow {} (duplicate or out of order)",
                        feature.id, prev
                    ))));
                }
            }
            last_id = Some(feature.id);
            decoded.push(feature);
        }

        if self.collection.fields.is_empty() && !page.fields.is_empty() {
            self.collection.fields = schema_from_esri(&page.fields);
        }
        if let Some(wkid) = page.spatial_reference.and_then(|sr| sr.code()) {
            self.collection.spatial_reference = Some(wkid);
        }

        let received = decoded.len();
        if received == 0 && self.collection.len() < self.total {
            warn!(
                endpoint = %self.endpoint,
                fetched = self.collection.len(),
                total = self.total,
                "service stopped returning records before the reported total"
            );
            return Err(FetchError::Parse(self.parse_error(format!(
                "service returned {} of {} records",
                self.collection.len(),
                self.total
            ))));
        }

        self.collection.features.extend(decoded);
        self.offset += received;
        self.pages += 1;

        // Short pages below the reported total are server caps, flagged or not.
        if received < self.page_size && self.collection.len() < self.total {
            debug!(
                endpoint = %self.endpoint,
                received,
                page_size = self.page_size,
                exceeded_transfer_limit = page.exceeded_transfer_limit,
                "short page before reported total, continuing"
            );
        }
        if self.collection.len() >= self.total {
            self.complete = true;
        }

        debug!(
            endpoint = %self.endpoint,
            page = self.pages,
            offset = self.offset - received,
            received,
            fetched = self.collection.len(),
            total = self.total,
            exceeded_transfer_limit = page.exceeded_transfer_limit,
            "page fetched"
        );

        Ok(Some(received))
    }

    fn decode_feature(&self, raw: &EsriFeature) -> Result<Feature, FetchError> {
        let id = raw
            .attributes
            .get(&self.order_by)
            .and_then(|v| v.as_u64())
            .ok_or_else(|| {
                self.parse_error(format!(
                    "feature without a valid '{}' identifier",
                    self.order_by
                ))
            })?;

        let geometry = match &raw.geometry {
            Some(value) => decode_geometry(value)
                .map_err(|reason| self.parse_error(format!("feature {}: {}", id, reason)))?,
            None => None,
        };

        let mut attributes = IndexMap::with_capacity(raw.attributes.len());
        for (name, value) in &raw.attributes {
            let value = AttributeValue::from_json(value).ok_or_else(|| {
                self.parse_error(format!("feature {}: attribute '{}' is not a scalar", id, name))
            })?;
            attributes.insert(name.clone(), value);
        }

        Ok(Feature {
            id,
            geometry,
            attributes,
        })
    }

    fn parse_error(&self, reason: String) -> ParseError {
        ParseError {
            endpoint: self.endpoint.clone(),
            offset: self.offset,
            reason,
        }
    }

    fn page_error(&self, source: ServiceError) -> FetchError {
        FetchError::Page {
            endpoint: self.endpoint.clone(),
            offset: self.offset,
            source,
        }
    }

    /// Offset of the next page to request.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Server-reported record count.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Effective page size after clamping to the server limit.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Records accumulated so far.
    pub fn fetched(&self) -> usize {
        self.collection.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Consume the cursor and return the accumulated collection.
    ///
    /// The collection is only the full layer if [`is_complete`](Self::is_complete)
    /// returned `true`.
    pub fn into_collection(self) -> FeatureCollection {
        self.collection
    }
}
