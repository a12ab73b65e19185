//! Config command handlers

use std::path::Path;

use anyhow::Result;

use tagmark_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the effective configuration
pub fn show(config: &Config, config_path: &Path, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "host": config.host,
                    "port": config.port,
                    "upload_dir": config.upload_path(),
                    "rules_path": config.rules_path,
                    "max_upload_bytes": config.max_upload_bytes,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!("  host:             {}", config.host);
            println!("  port:             {}", config.port);
            println!("  upload_dir:       {}", config.upload_path().display());
            println!(
                "  rules_path:       {}",
                config
                    .rules_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(built-in)".to_string())
            );
            println!("  max_upload_bytes: {}", config.max_upload_bytes);
            println!();
            println!("Bookmarks:   {}", config.bookmarks_path().display());
            println!("Config file: {}", config_path.display());
        }
    }

    Ok(())
}
