use anyhow::{anyhow, Result};
use clap::Args;
use serde_json::json;
use std::sync::Arc;

use crate::api::{ArtworkClient, PageSource};
use crate::catalog::{CatalogController, SelectStop};
use crate::config::Config;

/// Select the first N rows, starting at a page and moving forward
#[derive(Debug, Args)]
pub struct SelectCommand {
    /// Number of rows to select
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,

    /// Page to start from (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub from: u32,

    /// Print JSON instead of one id per line
    #[arg(long)]
    pub json: bool,
}

impl SelectCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let client = ArtworkClient::new(config)?;
        let (output, summary) = self.run(Arc::new(client)).await?;
        eprintln!("{}", summary);
        print!("{}", output);
        Ok(())
    }

    /// Load the starting page, run the bulk selection and format the result.
    /// A fetch failure part-way through is reported in the summary, not as an error.
    pub async fn run<S: PageSource>(&self, source: Arc<S>) -> Result<(String, String)> {
        let mut controller = CatalogController::starting_at(source, self.from);
        controller.load_current_page().await.map_err(|_| {
            anyhow!(controller
                .load_error_message()
                .unwrap_or_else(|| "Failed to load artworks".to_string()))
        })?;

        let count = usize::try_from(self.count)?;
        let outcome = controller.select_first_n(count).await;
        let ids = controller.selected_ids();

        let output = if self.json {
            let (stopped, error) = match &outcome.stop {
                SelectStop::Completed => ("completed", None),
                SelectStop::Exhausted => ("exhausted", None),
                SelectStop::FetchFailed { error, .. } => ("fetch_failed", Some(error.to_string())),
                SelectStop::Refused => ("refused", None),
            };
            let value = json!({
                "requested": outcome.requested,
                "marked": outcome.marked,
                "pages_fetched": outcome.pages_fetched,
                "stopped": stopped,
                "error": error,
                "ids": ids,
            });
            format!("{}\n", serde_json::to_string_pretty(&value)?)
        } else {
            ids.iter().map(|id| format!("{}\n", id)).collect()
        };

        Ok((output, outcome.summary()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::catalog::testing::{page_of, MemorySource};

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert(1, page_of(1..=3, 4));
        source.insert(2, page_of(4..=6, 4));
        source.insert(3, page_of(7..=9, 4));
        source.insert(4, page_of(10..=10, 4));
        source
    }

    #[tokio::test]
    async fn test_selects_from_starting_page() {
        let cmd = SelectCommand { count: 4, from: 2, json: false };
        let (output, summary) = cmd.run(Arc::new(source())).await.unwrap();

        assert_eq!(output, "4\n5\n6\n7\n");
        assert_eq!(summary, "Selected 4 rows");
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_in_json() {
        let mut source = source();
        source.fail_on(3, ApiError::Status { status: 502 });
        let cmd = SelectCommand { count: 8, from: 1, json: true };

        let (output, summary) = cmd.run(Arc::new(source)).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["marked"], 6);
        assert_eq!(value["stopped"], "fetch_failed");
        assert_eq!(value["error"], "HTTP error! status: 502");
        assert_eq!(value["ids"], json!([1, 2, 3, 4, 5, 6]));
        assert!(summary.contains("stopped at page 3"));
    }

    #[tokio::test]
    async fn test_runs_out_of_pages() {
        let cmd = SelectCommand { count: 100, from: 3, json: false };
        let (output, summary) = cmd.run(Arc::new(source())).await.unwrap();

        assert_eq!(output, "7\n8\n9\n10\n");
        assert_eq!(summary, "Selected 4 of 100 rows (no more pages)");
    }
}
