use anyhow::{anyhow, Result};
use clap::Args;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::api::{ArtworkClient, PageSource, COLUMN_TITLES};
use crate::catalog::CatalogController;
use crate::config::Config;
use crate::utils::text;

/// Widest cell printed in table output
const MAX_CELL_WIDTH: usize = 32;

/// Fetch one page and print it
#[derive(Debug, Args)]
pub struct PageCommand {
    /// Page number (1-based)
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl PageCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let client = ArtworkClient::new(config)?;
        let output = self.render(Arc::new(client)).await?;
        print!("{}", output);
        Ok(())
    }

    /// Load the page through a controller and format it
    pub async fn render<S: PageSource>(&self, source: Arc<S>) -> Result<String> {
        debug!("Loading page {}", self.page);
        let mut controller = CatalogController::starting_at(source, self.page);
        controller.load_current_page().await.map_err(|_| {
            anyhow!(controller
                .load_error_message()
                .unwrap_or_else(|| "Failed to load artworks".to_string()))
        })?;

        if self.json {
            let value = json!({
                "page": controller.current_page(),
                "total_pages": controller.total_pages(),
                "pager": controller
                    .visible_page_window()
                    .iter()
                    .map(|m| m.to_code())
                    .collect::<Vec<_>>(),
                "data": controller.records(),
            });
            return Ok(format!("{}\n", serde_json::to_string_pretty(&value)?));
        }

        let headers: Vec<&str> = std::iter::once("ID").chain(COLUMN_TITLES).collect();
        let rows: Vec<Vec<String>> = controller
            .records()
            .iter()
            .map(|record| {
                std::iter::once(record.id.to_string())
                    .chain(record.columns())
                    .collect()
            })
            .collect();

        let pager = controller
            .visible_page_window()
            .iter()
            .map(|marker| match marker {
                crate::catalog::PageMarker::Page(p) if *p == controller.current_page() => format!("[{}]", p),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        Ok(format!(
            "{}\nPage {} of {}: {}\n",
            text::format_table(&headers, &rows, MAX_CELL_WIDTH),
            controller.current_page(),
            controller.total_pages(),
            pager
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::catalog::testing::{page_of, MemorySource};

    fn source() -> Arc<MemorySource> {
        let mut source = MemorySource::new();
        source.insert(2, page_of(7..=8, 10));
        Arc::new(source)
    }

    #[tokio::test]
    async fn test_table_output() {
        let cmd = PageCommand { page: 2, json: false };
        let output = cmd.render(source()).await.unwrap();

        assert!(output.starts_with("ID | Title"));
        assert!(output.contains("7  | Artwork 7"));
        assert!(output.ends_with("Page 2 of 10: 1 [2] 3 4 … 10\n"));
    }

    #[tokio::test]
    async fn test_json_output() {
        let cmd = PageCommand { page: 2, json: true };
        let output = cmd.render(source()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total_pages"], 10);
        assert_eq!(value["pager"], json!([1, 2, 3, 4, -1, 10]));
        assert_eq!(value["data"][1]["id"], 8);
    }

    #[tokio::test]
    async fn test_failed_page_reports_load_error() {
        let mut source = MemorySource::new();
        source.fail_on(1, ApiError::Status { status: 500 });
        let cmd = PageCommand { page: 1, json: false };

        let err = cmd.render(Arc::new(source)).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load artworks: HTTP error! status: 500");
    }
}
