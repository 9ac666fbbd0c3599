//! Utility module
//!
//! Common utilities used across the application.

use anyhow::{Context, Result};
use std::path::Path;

/// Open a file with the system's default application
pub fn open_file(path: &Path) -> Result<()> {
    open::that(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(())
}

/// Open a folder in the file explorer, creating it first if needed
pub fn open_folder(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    open::that(dir).with_context(|| format!("Failed to open folder {}", dir.display()))?;
    Ok(())
}

/// Replace characters that are not safe in a directory name
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    // "." and ".." would escape the instances directory
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My World"), "My World");
        assert_eq!(sanitize_file_name(" a/b:c "), "a_b_c");
        assert_eq!(sanitize_file_name(".."), "__");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
