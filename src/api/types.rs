//! Wire types for the paginated artwork collection

use serde::{Deserialize, Serialize};

/// Identifier of a single artwork
pub type ArtworkId = u64;

/// One page of the collection, as returned by `GET <endpoint>?page=<n>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkPage {
    /// Records on this page, in display order
    #[serde(rename = "data")]
    pub items: Vec<ArtworkRecord>,

    /// Pagination metadata for the whole collection
    pub pagination: Pagination,
}

/// Pagination block of a page response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub limit: Option<u32>,

    #[serde(default)]
    pub offset: Option<u64>,

    pub total_pages: u32,

    #[serde(default)]
    pub current_page: Option<u32>,

    #[serde(default)]
    pub next_url: Option<String>,
}

/// A single artwork row. Only `id` is guaranteed; everything else is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub id: ArtworkId,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub place_of_origin: Option<String>,

    #[serde(default)]
    pub artist_display: Option<String>,

    #[serde(default)]
    pub inscriptions: Option<String>,

    #[serde(default)]
    pub date_start: Option<i64>,

    #[serde(default)]
    pub date_end: Option<i64>,
}

impl ArtworkRecord {
    /// Create a record with only an identifier and a title
    pub fn new(id: ArtworkId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        }
    }

    /// Column values in table order, with missing fields rendered as "N/A"
    pub fn columns(&self) -> [String; 6] {
        fn text(value: &Option<String>) -> String {
            value
                .as_deref()
                .map(|s| s.replace('\n', " "))
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string())
        }
        fn year(value: Option<i64>) -> String {
            value.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
        }

        [
            text(&self.title),
            text(&self.place_of_origin),
            text(&self.artist_display),
            text(&self.inscriptions),
            year(self.date_start),
            year(self.date_end),
        ]
    }
}

/// Column headers matching [`ArtworkRecord::columns`]
pub const COLUMN_TITLES: [&str; 6] = [
    "Title",
    "Place of Origin",
    "Artist",
    "Inscriptions",
    "Start Date",
    "End Date",
];
