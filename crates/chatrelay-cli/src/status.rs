//! `chatrelay status` — show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use chatrelay_core::config::{get_config_path, load_config};
use chatrelay_providers::registry::PROVIDERS;

use crate::helpers::expand_tilde;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "Chatrelay Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        found_marker(config_path.exists())
    );

    // Ask service
    println!(
        "  {:<18} {}:{} | default model: {}",
        "Ask service:".bold(),
        config.ask.host,
        config.ask.port,
        config.ask.default_model
    );

    // Memory service
    let memory_file = expand_tilde(&config.memory.memory_file);
    println!(
        "  {:<18} {}:{} | model: {}",
        "Memory service:".bold(),
        config.memory.host,
        config.memory.port,
        config.memory.model
    );
    println!(
        "  {:<18} {} {}",
        "Memory file:".bold(),
        memory_file.display(),
        found_marker(memory_file.exists())
    );

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    let providers_map = config.providers.to_map();

    for spec in PROVIDERS {
        let status = match providers_map.get(spec.name) {
            Some(c) if !c.api_key.is_empty() => format!("{} (key set)", "✓".green()),
            Some(c) if c.enabled => format!("{} (enabled, {})", "✓".green(), spec.default_api_base),
            _ => format!("{}", "· not configured".dimmed()),
        };
        println!("    {:<20} {}", spec.display_name, status);
    }

    println!();

    Ok(())
}

fn found_marker(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}
