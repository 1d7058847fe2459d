//! Recoding run summary

use std::time::Duration;

use chrono::Utc;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Summary of one recoding run
#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub selected_columns: usize,
    pub sentinel_cells: usize,
    pub rows_deleted: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub derived_columns: Vec<String>,
    pub labeled_columns: usize,
    load_time: Option<Duration>,
    recode_time: Option<Duration>,
    model_time: Option<Duration>,
    save_time: Option<Duration>,
}

impl PipelineSummary {
    pub fn new(initial_rows: usize, initial_columns: usize) -> Self {
        Self {
            initial_rows,
            initial_columns,
            final_rows: initial_rows,
            final_columns: initial_columns,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = Some(elapsed);
    }

    pub fn set_recode_time(&mut self, elapsed: Duration) {
        self.recode_time = Some(elapsed);
    }

    pub fn set_model_time(&mut self, elapsed: Duration) {
        self.model_time = Some(elapsed);
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = Some(elapsed);
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RECODING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Input shape"),
            Cell::new(format!("{} × {}", self.initial_rows, self.initial_columns)),
        ]);

        table.add_row(vec![
            Cell::new("🔎 Selected columns"),
            Cell::new(self.selected_columns),
        ]);

        table.add_row(vec![
            Cell::new("🕳️  Sentinel cells recoded"),
            Cell::new(self.sentinel_cells).fg(if self.sentinel_cells == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        table.add_row(vec![
            Cell::new("🗑️  Rows deleted (listwise)"),
            Cell::new(self.rows_deleted).fg(if self.rows_deleted == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("🧩 Derived columns"),
            Cell::new(self.derived_columns.len()),
        ]);

        table.add_row(vec![
            Cell::new("🏷️  Labeled columns"),
            Cell::new(self.labeled_columns),
        ]);

        table.add_row(vec![
            Cell::new("✅ Output shape"),
            Cell::new(format!("{} × {}", self.final_rows, self.final_columns))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.derived_columns.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Derived columns").yellow(),
                style(format!("({})", self.derived_columns.len())).dim()
            );
            for column in &self.derived_columns {
                println!("        {} {}", style("•").dim(), column);
            }
        }

        let total: Duration = [
            self.load_time,
            self.recode_time,
            self.model_time,
            self.save_time,
        ]
        .iter()
        .flatten()
        .sum();

        println!();
        println!(
            "      {} {} {}",
            style("Finished").dim(),
            style(format!("in {:.2}s", total.as_secs_f64())).cyan(),
            style(format!("at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))).dim()
        );
    }
}
