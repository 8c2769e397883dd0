//! Shapefile persistence.
//!
//! Each layer is stored as its own bundle directory:
//!
//! ```text
//! <download dir>/
//! ├── Parcels/
//! │   ├── Parcels.shp
//! │   ├── Parcels.shx
//! │   ├── Parcels.dbf
//! │   └── Parcels.prj
//! └── Roads.incomplete/     (interrupted write, never renamed into place)
//! ```

mod bundle;
mod error;
mod naming;

pub use bundle::{
    bundle_dir, first_geometry, load_collection, staging_dir, write_collection, WrittenBundle,
    STAGING_SUFFIX,
};
pub use error::PersistenceError;
pub use naming::{dbf_field_names, sanitize_name, truncate_bytes, DBF_FIELD_NAME_LEN, DBF_TEXT_LEN};
