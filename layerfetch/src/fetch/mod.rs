//! Paged bulk fetch of a remote layer into one [`FeatureCollection`].
//!
//! # Algorithm
//!
//! 1. Read the layer description (object-id column, `maxRecordCount`,
//!    geometry type) and the server-side record count.
//! 2. Request `resultRecordCount = page_size` records at increasing
//!    `resultOffset`, ordered ascending by object id, so pages form a total
//!    order with no gaps or repeats while the dataset is static.
//! 3. Append each page in request order.
//!
//! # Termination
//!
//! The fetch is complete once the accumulated count reaches the
//! server-reported total. A short page before that point means the server
//! capped the page below what was asked, whether or not it flagged
//! `exceededTransferLimit`; the next offset advances by what was actually
//! received and paging continues. An empty page before the total is a
//! [`ParseError`], never a successful partial result.
//!
//! Pages are never retried here. See [`PageCursor`] for resuming after a
//! failure.

mod cursor;
mod error;

pub use cursor::PageCursor;
pub use error::{FetchError, ParseError};

use crate::arcgis::HttpClient;
use crate::feature::FeatureCollection;

/// Default records per page; well below the common 1000/2000 server caps.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub page_size: usize,
    /// Reproject server-side to this WKID (`outSR`).
    pub out_sr: Option<u32>,
}

impl FetchOptions {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            out_sr: None,
        }
    }

    pub fn with_out_sr(mut self, wkid: Option<u32>) -> Self {
        self.out_sr = wkid;
        self
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Fetches whole layers through an [`HttpClient`].
pub struct PagedFetcher<C: HttpClient> {
    client: C,
    options: FetchOptions,
}

impl<C: HttpClient> PagedFetcher<C> {
    pub fn new(client: C, options: FetchOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Open a cursor for page-by-page control over one layer.
    pub fn open(&self, endpoint: &str) -> Result<PageCursor<'_, C>, FetchError> {
        PageCursor::open(&self.client, endpoint, &self.options)
    }

    /// Fetch every record of the layer at `endpoint`.
    pub fn fetch_all(&self, endpoint: &str) -> Result<FeatureCollection, FetchError> {
        let mut cursor = self.open(endpoint)?;
        while cursor.next_page()?.is_some() {}
        Ok(cursor.into_collection())
    }
}

/// Fetch every record of `endpoint` in pages of `page_size`.
pub fn fetch_all<C: HttpClient + ?Sized>(
    client: &C,
    endpoint: &str,
    page_size: usize,
) -> Result<FeatureCollection, FetchError> {
    let mut cursor = PageCursor::open(client, endpoint, &FetchOptions::new(page_size))?;
    while cursor.next_page()?.is_some() {}
    Ok(cursor.into_collection())
}
