//! Color-coded one-line messages on stdout.
//!
//! Coloring follows the `colored` crate's global switches, so `NO_COLOR`
//! and `CLICOLOR_FORCE` are honored.
use colored::Colorize;

pub fn format_error(program: &str, message: &str, detail: &str) -> String {
    format!("{} {}: {} {}", "❌ Error".red().bold(), program.bold(), message, detail.red())
}

pub fn format_warning(message: &str) -> String {
    format!("{} {}", "⚠️ Warning".yellow().bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", "✅ Success".green().bold(), message)
}

pub fn format_info(message: &str) -> String {
    format!("{} {}", "ℹ️ Info".cyan().bold(), message)
}

pub fn error(program: &str, message: &str, detail: &str) {
    println!("{}", format_error(program, message, detail));
}

pub fn warning(message: &str) {
    println!("{}", format_warning(message));
}

pub fn success(message: &str) {
    println!("{}", format_success(message));
}

pub fn info(message: &str) {
    println!("{}", format_info(message));
}
