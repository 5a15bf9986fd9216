//! Selection and pagination state for the catalog view.

mod controller;
mod pager;
mod selection;

pub use controller::{CatalogController, SelectStop};
pub use pager::PageMarker;
