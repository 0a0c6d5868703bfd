use owo_colors::OwoColorize;
use toolscout_core::ExtractedToolRecord;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Toolscout".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Auto-fill AI tool records from their websites\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print elapsed time with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let secs = duration.as_secs_f64();
    let indicator = if secs < 5.0 {
        "fast".dimmed().to_string()
    } else if secs < 15.0 {
        "moderate".bright_yellow().to_string()
    } else {
        "slow".bright_red().to_string()
    };

    eprintln!("  {} {:>8.2}s ({})", format!("{}:", label).dimmed(), secs, indicator);
}

/// Print a short summary of an extracted record
pub fn print_record_details(record: &ExtractedToolRecord) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Extracted Record".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Name:".dimmed(), record.name.bright_white());
    eprintln!("  {} {}", "Pricing:".dimmed(), record.pricing.to_string().bright_white());
    eprintln!(
        "  {} {}",
        "Features:".dimmed(),
        record.features.len().to_string().bright_white()
    );
    eprintln!(
        "  {} {}\n",
        "Logo:".dimmed(),
        record.logo_url.as_deref().unwrap_or("none").bright_white()
    );
}
