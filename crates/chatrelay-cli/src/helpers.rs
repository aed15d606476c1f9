//! Shared CLI helpers — path expansion, startup banner.

use std::path::PathBuf;

use colored::Colorize;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the banner shown when a service starts.
pub fn print_banner(service: &str, host: &str, port: u16) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Chatrelay".cyan().bold(), version.dimmed());
    println!(
        "  {} service on {}",
        service.bold(),
        format!("http://{host}:{port}").underline()
    );
    println!("{}", "  Press Ctrl+C to stop.".dimmed());
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/sessions/memory.json");
        assert!(result.ends_with("sessions/memory.json"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/var/lib/chatrelay.json");
        assert_eq!(result, PathBuf::from("/var/lib/chatrelay.json"));
    }

    #[test]
    fn expand_tilde_relative_left_alone() {
        let result = expand_tilde("conversation_memory.json");
        assert_eq!(result, PathBuf::from("conversation_memory.json"));
    }
}
