//! Centralized UI formatting and color utilities
//!
//! Status lines printed by the CLI go through here so `--quiet` and
//! `LABQC_QUIET` are honored in one place.

use colored::{ColoredString, Colorize};

use crate::classify::Category;

/// Check if quiet mode is enabled via environment variable or --quiet flag
pub fn is_quiet() -> bool {
    std::env::var("LABQC_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Print a status line to stderr unless quiet mode is on.
pub fn status(message: impl std::fmt::Display) {
    if !is_quiet() {
        eprintln!("{}", message);
    }
}

/// Returns a colored label for a category.
pub fn category_label(category: Category) -> ColoredString {
    let label = category.to_string();
    match category {
        Category::Regular => label.normal(),
        Category::Mdl | Category::Icv | Category::Ccv => label.cyan(),
        Category::Blank => label.blue(),
        Category::Rinse => label.dimmed(),
    }
}

/// Color scheme for status-related text output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Green for success
    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    /// Yellow for warnings
    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    /// Red for errors and out-of-bounds values
    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    /// Cyan for identifiers (sample IDs, paths)
    pub fn identifier(text: &str) -> ColoredString {
        text.cyan()
    }

    /// Bold for headings
    pub fn heading(text: &str) -> ColoredString {
        text.bold()
    }
}
