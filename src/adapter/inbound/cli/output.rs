//! Terminal output helpers for CLI handlers.
//!
//! Everything goes to stdout except [`error`], which writes to stderr.

use std::fmt::Display;

use owo_colors::OwoColorize;

/// Print the application header with name and version.
pub fn header(version: &str) {
    println!("{} {}", "edgectl".bold(), version.dimmed());
    println!();
}

/// Print a section header.
pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<12} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn note(message: &str) {
    println!("  {}", message.dimmed());
}

pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("  {} {}", "×".red(), message);
}
