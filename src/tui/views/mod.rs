//! Widgets the catalog screen is built from

pub mod artwork_table;
pub mod bulk_select;
pub mod pager_bar;

pub use artwork_table::ArtworkTable;
pub use pager_bar::pager_line;
