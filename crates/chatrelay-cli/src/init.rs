//! `chatrelay init` — write a default configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use chatrelay_core::config::{get_config_path, save_config, Config};

/// Run the init command. An existing file is left untouched.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "Chatrelay — Setup".cyan().bold());
    println!();

    if path.exists() {
        println!("  {} config already exists at {}", "✓".green(), path.display());
    } else {
        save_config(&Config::default(), Some(&path))
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        println!("  {} created config at {}", "✓".green(), path.display());
    }

    println!();
    println!("  Next steps:");
    println!(
        "    1. Add an API key under {} or start a local bridge on :1337",
        "providers".bold()
    );
    println!("    2. Run {}", "chatrelay ask-server".cyan());
    println!();

    Ok(())
}
