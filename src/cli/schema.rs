//! Schema command for configuration JSON schema generation and validation

use anyhow::{Context, Result};
use clap::Args;
use schemars::schema_for;
use std::path::PathBuf;

use crate::config::Config;

/// Print the configuration JSON schema, or check a configuration file
#[derive(Debug, Args)]
pub struct SchemaCommand {
    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Validate this configuration file instead of printing the schema
    #[arg(long, value_name = "FILE")]
    pub check: Option<PathBuf>,
}

impl SchemaCommand {
    /// Execute the schema command
    pub async fn execute(&self) -> Result<()> {
        if let Some(path) = &self.check {
            let config = Config::read_file(path).await?;
            config
                .validate()
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            println!("{} is valid", path.display());
            return Ok(());
        }

        let schema = Self::generate()?;
        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &schema)
                    .await
                    .with_context(|| format!("Failed to write schema to {}", path.display()))?;
                println!("Schema written to {}", path.display());
            }
            None => println!("{}", schema),
        }
        Ok(())
    }

    /// JSON schema of the configuration file format
    pub fn generate() -> Result<String> {
        let schema = schema_for!(Config);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_schema_lists_config_fields() {
        let schema: serde_json::Value = serde_json::from_str(&SchemaCommand::generate().unwrap()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["endpoint", "page_size", "fields", "request_timeout_secs", "user_agent", "data_dir"] {
            assert!(properties.contains_key(field), "missing {}", field);
        }
    }

    #[tokio::test]
    async fn test_check_rejects_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("artgrid.json");
        std::fs::write(&path, r#"{ "endpoint": "ftp://example.com" }"#).unwrap();

        let cmd = SchemaCommand { output: None, check: Some(path) };
        assert!(cmd.execute().await.is_err());
    }

    #[tokio::test]
    async fn test_writes_schema_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.json");

        let cmd = SchemaCommand { output: Some(path.clone()), check: None };
        cmd.execute().await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"endpoint\""));
    }
}
