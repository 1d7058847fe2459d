//! Terminal styling utilities for a modern, visually appealing CLI

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static PLAN: Emoji<'_, '_> = Emoji("🗺️  ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print the application banner with ASCII art
pub fn print_banner(version: &str) {
    let banner = r#"
    ██████╗ ███████╗ ██████╗ ██████╗ ██████╗  █████╗
    ██╔══██╗██╔════╝██╔════╝██╔═══██╗██╔══██╗██╔══██╗
    ██████╔╝█████╗  ██║     ██║   ██║██║  ██║███████║
    ██╔══██╗██╔══╝  ██║     ██║   ██║██║  ██║██╔══██║
    ██║  ██║███████╗╚██████╗╚██████╔╝██████╔╝██║  ██║
    ╚═╝  ╚═╝╚══════╝ ╚═════╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("ρ").magenta().bold(),
        style("Survey recoding without the spreadsheet scars").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, plan: &Path, output: &Path, sentinel: i64, continuous: usize) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Input:  {:<39}│",
        FOLDER,
        truncate_path(input, 38)
    );
    println!("    │  {} Plan:   {:<39}│", PLAN, truncate_path(plan, 38));
    println!("    │  {} Output: {:<39}│", SAVE, truncate_path(output, 38));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Sentinel value:     {:<27}│",
        CHART,
        style(sentinel).yellow()
    );
    println!(
        "    │  {} Continuous columns: {:<27}│",
        CHART,
        style(continuous).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an informational message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, style(message).dim());
}

/// Print a count line, optionally with a qualifier
pub fn print_count(noun: &str, count: usize, qualifier: Option<&str>) {
    match qualifier {
        Some(q) => println!(
            "      {} {} {}",
            style(count).yellow().bold(),
            noun,
            style(q).dim()
        ),
        None => println!("      {} {}", style(count).yellow().bold(), noun),
    }
}

/// Print the elapsed time of a step
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        style("🎉").cyan(),
        style("Recoding complete!").green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len.saturating_sub(1))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("…{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_string("data.csv", 38), "data.csv");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "a/very/long/path/that/exceeds/the/column/width/data.csv";
        let truncated = truncate_string(long, 20);
        assert_eq!(truncated.chars().count(), 20);
        assert!(truncated.starts_with('…'));
        assert!(truncated.ends_with("data.csv"));
    }
}
