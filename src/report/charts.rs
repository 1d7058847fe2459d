//! Terminal renderings of the exploratory views: frequency bars, grouped
//! five-number summaries, and two-way contingency tables.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{render_codes, ColumnKind, SurveyFrame};

/// Widest frequency bar, in glyphs
const BAR_WIDTH: usize = 40;

fn categorical_levels(frame: &SurveyFrame, column: &str) -> Result<Vec<String>> {
    frame.ensure_column(column)?;
    match frame.kind(column) {
        Some(ColumnKind::Categorical { codes }) => Ok(codes.clone()),
        _ => anyhow::bail!("Column '{}' is not categorical", column),
    }
}

/// Frequency of one categorical column as horizontal bars.
pub fn print_frequency_bars(frame: &SurveyFrame, column: &str) -> Result<()> {
    let levels = categorical_levels(frame, column)?;
    let cells = render_codes(frame.df().column(column)?)?;

    let counts: Vec<usize> = levels
        .iter()
        .map(|level| {
            cells
                .iter()
                .filter(|cell| cell.as_deref() == Some(level.as_str()))
                .count()
        })
        .collect();
    let total: usize = counts.iter().sum();
    let max = counts.iter().copied().max().unwrap_or(0);

    println!();
    println!(
        "    {} {} {}",
        style("📊").cyan(),
        style("FREQUENCY OF").white().bold(),
        style(frame.display_name(column)).cyan().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let label_width = levels.iter().map(|l| l.len()).max().unwrap_or(0).min(24);
    for (level, count) in levels.iter().zip(counts.iter()) {
        let width = if max == 0 {
            0
        } else {
            (count * BAR_WIDTH).div_ceil(max)
        };
        let pct = if total == 0 {
            0.0
        } else {
            100.0 * *count as f64 / total as f64
        };
        println!(
            "      {:<label_width$} {} {} {}",
            level,
            style("█".repeat(width)).cyan(),
            style(count).bold(),
            style(format!("({:.1}%)", pct)).dim()
        );
    }

    Ok(())
}

/// Five-number summary of a numeric column within the levels of a
/// categorical one - the tabular stand-in for a grouped box plot.
pub fn print_box_summary(frame: &SurveyFrame, value: &str, by: &str) -> Result<()> {
    frame.ensure_column(value)?;
    let levels = categorical_levels(frame, by)?;
    let groups = render_codes(frame.df().column(by)?)?;

    let cast = frame.df().column(value)?.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();

    println!();
    println!(
        "    {} {} {} {}",
        style("📦").cyan(),
        style(frame.display_name(value)).cyan().bold(),
        style("BY").white().bold(),
        style(frame.display_name(by)).cyan().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new(frame.display_name(by)).add_attribute(Attribute::Bold),
        Cell::new("N").add_attribute(Attribute::Bold),
        Cell::new("Min").add_attribute(Attribute::Bold),
        Cell::new("Q1").add_attribute(Attribute::Bold),
        Cell::new("Median").add_attribute(Attribute::Bold),
        Cell::new("Q3").add_attribute(Attribute::Bold),
        Cell::new("Max").add_attribute(Attribute::Bold),
    ]);

    for level in &levels {
        let mut sample: Vec<f64> = values
            .iter()
            .zip(groups.iter())
            .filter(|(_, g)| g.as_deref() == Some(level.as_str()))
            .filter_map(|(v, _)| *v)
            .collect();
        sample.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if sample.is_empty() {
            table.add_row(vec![level.as_str(), "0", "—", "—", "—", "—", "—"]);
            continue;
        }
        table.add_row(vec![
            Cell::new(level),
            Cell::new(sample.len()),
            Cell::new(format!("{:.1}", sample[0])),
            Cell::new(format!("{:.1}", quantile(&sample, 0.25))),
            Cell::new(format!("{:.1}", quantile(&sample, 0.5))),
            Cell::new(format!("{:.1}", quantile(&sample, 0.75))),
            Cell::new(format!("{:.1}", sample[sample.len() - 1])),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    Ok(())
}

/// Two-way contingency table of two categorical columns.
pub fn print_crosstab(frame: &SurveyFrame, rows: &str, cols: &str) -> Result<()> {
    let row_levels = categorical_levels(frame, rows)?;
    let col_levels = categorical_levels(frame, cols)?;
    let row_cells = render_codes(frame.df().column(rows)?)?;
    let col_cells = render_codes(frame.df().column(cols)?)?;

    println!();
    println!(
        "    {} {} {} {}",
        style("🔢").cyan(),
        style(frame.display_name(rows)).cyan().bold(),
        style("×").white().bold(),
        style(frame.display_name(cols)).cyan().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    let mut header = vec![Cell::new("").add_attribute(Attribute::Bold)];
    for level in &col_levels {
        header.push(Cell::new(level).add_attribute(Attribute::Bold));
    }
    header.push(Cell::new("Total").add_attribute(Attribute::Bold));
    table.set_header(header);

    let mut col_totals = vec![0usize; col_levels.len()];
    for row_level in &row_levels {
        let mut counts = vec![0usize; col_levels.len()];
        for (r, c) in row_cells.iter().zip(col_cells.iter()) {
            if r.as_deref() != Some(row_level.as_str()) {
                continue;
            }
            if let Some(idx) = c
                .as_deref()
                .and_then(|c| col_levels.iter().position(|l| l == c))
            {
                counts[idx] += 1;
            }
        }
        let row_total: usize = counts.iter().sum();
        for (total, count) in col_totals.iter_mut().zip(counts.iter()) {
            *total += count;
        }

        let mut cells = vec![Cell::new(row_level)];
        for count in &counts {
            cells.push(Cell::new(count));
        }
        cells.push(Cell::new(row_total).add_attribute(Attribute::Bold));
        table.add_row(cells);
    }

    let grand_total: usize = col_totals.iter().sum();
    let mut footer = vec![Cell::new("Total").add_attribute(Attribute::Bold)];
    for total in &col_totals {
        footer.push(Cell::new(total).add_attribute(Attribute::Bold));
    }
    footer.push(Cell::new(grand_total).add_attribute(Attribute::Bold));
    table.add_row(footer);

    for line in table.to_string().lines() {
        println!("    {}", line);
    }

    Ok(())
}

/// Linear-interpolation quantile of a sorted, non-empty sample
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}
