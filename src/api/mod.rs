//! Fetch gateway for the remote artwork collection.
//!
//! The controller only ever talks to a [`PageSource`]; the production
//! implementation is [`ArtworkClient`], tests use in-memory sources.

mod client;
mod errors;
mod types;

pub use client::ArtworkClient;
pub use errors::{ApiError, ApiResult};
pub use types::{ArtworkId, ArtworkPage, ArtworkRecord, Pagination, COLUMN_TITLES};

use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can hand out collection pages by 1-based page number
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single page. Failures are logged by the implementation and returned.
    async fn fetch_page(&self, page: u32) -> ApiResult<ArtworkPage>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(&self, page: u32) -> ApiResult<ArtworkPage> {
        (**self).fetch_page(page).await
    }
}
