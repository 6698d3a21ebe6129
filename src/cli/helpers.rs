//! Shared helper functions for CLI commands

use console::Style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Project};
use crate::entities::palette::hex_to_rgb;

/// Find the project from `--project` or by walking up from the current directory
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let found = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    found.map_err(|e| miette::miette!("{}", e))
}

/// Layered config for the selected project, or global-only outside a project
pub fn load_config(global: &GlobalOpts) -> Config {
    let project = match &global.project {
        Some(path) => Project::discover_from(path).ok(),
        None => Project::discover().ok(),
    };
    Config::load_for(project.as_ref())
}

/// Resolve `--format auto` against the configured default format
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref().map(str::parse::<OutputFormat>) {
        Some(Ok(format)) => format,
        Some(Err(_)) => {
            log::warn!("ignoring unknown default_format in config");
            OutputFormat::Auto
        }
        None => OutputFormat::Auto,
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output (RFC 4180)
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Nearest colour in the xterm 6x6x6 cube
fn xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |c: u8| (c as u16 * 5 + 127) / 255;
    (16 + 36 * level(r) + 6 * level(g) + level(b)) as u8
}

/// Render a `#RRGGBB` colour as a block swatch followed by the hex code
pub fn color_swatch(hex: &str) -> String {
    match hex_to_rgb(hex) {
        Some((r, g, b)) => format!(
            "{} {}",
            Style::new().color256(xterm_index(r, g, b)).apply_to("██"),
            hex
        ),
        None => hex.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        // multi-byte characters are never split
        assert_eq!(truncate_str("±0.4m ±0.4m", 6), "±0....");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_xterm_index() {
        assert_eq!(xterm_index(0, 0, 0), 16);
        assert_eq!(xterm_index(255, 255, 255), 231);
        assert_eq!(xterm_index(255, 0, 0), 196);
    }

    #[test]
    fn test_color_swatch_keeps_hex() {
        assert!(color_swatch("#00D4FF").ends_with("#00D4FF"));
        assert_eq!(color_swatch("teal"), "teal");
    }
}
