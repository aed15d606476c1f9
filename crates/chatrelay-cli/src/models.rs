//! `chatrelay models` — print the catalog the ask service would serve.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use chatrelay_core::config::Config;
use chatrelay_providers::{ModelCatalog, ProviderHub};

pub async fn run(config: &Config) -> Result<()> {
    let hub = Arc::new(ProviderHub::from_config(&config.providers));
    let models = ModelCatalog::new(hub).list_models().await;

    println!();
    println!("{}", "Available models".cyan().bold());
    for model in &models {
        let marker = if *model == config.ask.default_model {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {model}{marker}");
    }
    println!();

    Ok(())
}
