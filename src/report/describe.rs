//! Grouped descriptive summary of the recoded table.
//!
//! One column per level of the grouping variable; categorical variables
//! show `n (pct%)` within each group, numeric variables `mean (sd)`.
//! Display labels attached by the labeler are used for both variables and
//! column headers.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Table};
use console::style;
use polars::prelude::*;

use crate::pipeline::{render_codes, ColumnKind, SurveyFrame};

/// One rendered summary row: a variable header or a level line under it
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub variable: String,
    pub level: Option<String>,
    /// One formatted cell per group level
    pub cells: Vec<String>,
}

/// The descriptive table, ready to render
#[derive(Debug, Clone)]
pub struct GroupedSummary {
    pub group_column: String,
    pub group_levels: Vec<String>,
    pub group_totals: Vec<usize>,
    pub rows: Vec<SummaryRow>,
}

/// Build the descriptive summary of every column, grouped by `group_by`.
pub fn build_grouped_summary(frame: &SurveyFrame, group_by: &str) -> Result<GroupedSummary> {
    frame.ensure_column(group_by)?;
    let group_levels: Vec<String> = match frame.kind(group_by) {
        Some(ColumnKind::Categorical { codes }) => codes.clone(),
        _ => anyhow::bail!("Group column '{}' is not categorical", group_by),
    };
    let groups = render_codes(frame.df().column(group_by)?)?;
    let k = group_levels.len();

    let group_index = |g: &str| group_levels.iter().position(|level| level == g);

    let mut group_totals = vec![0usize; k];
    for g in groups.iter().flatten() {
        if let Some(idx) = group_index(g) {
            group_totals[idx] += 1;
        }
    }

    let mut rows = Vec::new();
    for name in frame.column_names() {
        if name == group_by {
            continue;
        }
        let display = frame.display_name(&name).to_string();

        match frame.kind(&name) {
            Some(ColumnKind::Numeric) => {
                let cast = frame.df().column(&name)?.cast(&DataType::Float64)?;
                let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();

                // Welford accumulators per group
                let mut count = vec![0usize; k];
                let mut mean = vec![0.0f64; k];
                let mut m2 = vec![0.0f64; k];
                for (value, group) in values.iter().zip(groups.iter()) {
                    if let (Some(x), Some(idx)) =
                        (value, group.as_deref().and_then(group_index))
                    {
                        count[idx] += 1;
                        let delta = x - mean[idx];
                        mean[idx] += delta / count[idx] as f64;
                        m2[idx] += delta * (x - mean[idx]);
                    }
                }

                let cells = (0..k)
                    .map(|idx| {
                        if count[idx] == 0 {
                            "—".to_string()
                        } else {
                            let sd = if count[idx] > 1 {
                                (m2[idx] / (count[idx] - 1) as f64).sqrt()
                            } else {
                                0.0
                            };
                            format!("{:.1} ({:.1})", mean[idx], sd)
                        }
                    })
                    .collect();
                rows.push(SummaryRow {
                    variable: display,
                    level: None,
                    cells,
                });
            }
            Some(ColumnKind::Categorical { codes }) => {
                let cells_col = render_codes(frame.df().column(&name)?)?;
                rows.push(SummaryRow {
                    variable: display,
                    level: None,
                    cells: vec![String::new(); k],
                });
                for level in codes {
                    let mut counts = vec![0usize; k];
                    for (value, group) in cells_col.iter().zip(groups.iter()) {
                        if value.as_deref() == Some(level.as_str()) {
                            if let Some(idx) = group.as_deref().and_then(group_index) {
                                counts[idx] += 1;
                            }
                        }
                    }
                    let cells = (0..k)
                        .map(|idx| {
                            let pct = if group_totals[idx] == 0 {
                                0.0
                            } else {
                                100.0 * counts[idx] as f64 / group_totals[idx] as f64
                            };
                            format!("{} ({:.0}%)", counts[idx], pct)
                        })
                        .collect();
                    rows.push(SummaryRow {
                        variable: String::new(),
                        level: Some(level.clone()),
                        cells,
                    });
                }
            }
            None => {}
        }
    }

    Ok(GroupedSummary {
        group_column: frame.display_name(group_by).to_string(),
        group_levels,
        group_totals,
        rows,
    })
}

impl GroupedSummary {
    pub fn display(&self) {
        println!();
        println!(
            "    {} {} {}",
            style("📊").cyan(),
            style("SUMMARY BY").white().bold(),
            style(&self.group_column).cyan().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);

        let mut header = vec![Cell::new("Characteristic").add_attribute(Attribute::Bold)];
        for (level, total) in self.group_levels.iter().zip(self.group_totals.iter()) {
            header.push(
                Cell::new(format!("{}, N = {}", level, total)).add_attribute(Attribute::Bold),
            );
        }
        table.set_header(header);

        for row in &self.rows {
            let label = match &row.level {
                Some(level) => format!("  {}", level),
                None => row.variable.clone(),
            };
            let mut cells = vec![Cell::new(label)];
            for cell in &row.cells {
                cells.push(Cell::new(cell));
            }
            table.add_row(cells);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}
