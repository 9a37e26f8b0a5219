use console::style;
use std::fmt::Display;

/// Green bold: confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold: section titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: hints and secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: warnings and placeholders
pub fn warn<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Cyan: ids and labels
pub fn label<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}
