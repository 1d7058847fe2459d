//! Odds-ratio presentation table for the fitted logistic model

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::FittedModel;

/// Render the fitted model as a table of exponentiated coefficients.
pub fn print_odds_table(model: &FittedModel) {
    println!();
    println!(
        "    {} {} {}",
        style("📈").cyan(),
        style("ODDS RATIOS").white().bold(),
        style(format!("({} = {})", model.outcome, model.event_value)).dim()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Term").add_attribute(Attribute::Bold),
        Cell::new("Coefficient").add_attribute(Attribute::Bold),
        Cell::new("Odds Ratio").add_attribute(Attribute::Bold),
    ]);

    for term in &model.terms {
        let color = if term.term == "(Intercept)" {
            Color::White
        } else if term.odds_ratio > 1.0 {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(&term.term),
            Cell::new(format!("{:+.4}", term.coefficient)),
            Cell::new(format!("{:.3}", term.odds_ratio)).fg(color),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    println!();
    println!(
        "      {}",
        style(format!(
            "{} observations, {} IRLS iterations",
            model.observations, model.iterations
        ))
        .dim()
    );
    if !model.converged {
        println!(
            "      {} {}",
            style("⚠️").yellow(),
            style("Fit did not converge - interpret with care").yellow()
        );
    }
}
