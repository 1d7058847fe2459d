//! Recoda: Survey Recoding CLI Tool
//!
//! Applies a JSON recode plan to a CSV/Parquet survey extract: column
//! selection, sentinel normalization, categorical reclassification with
//! listwise deletion, category collapsing and labeling, followed by
//! descriptive reporting and a logistic odds-ratio model.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use recoda::cli::Cli;
use recoda::pipeline::{
    apply_collapse, apply_level_labels, classify_columns, fit_logistic, load_dataset,
    normalize_sentinel, save_dataset, set_column_label, RecodePlan, SurveyFrame,
};
use recoda::report::{
    build_grouped_summary, print_box_summary, print_crosstab, print_frequency_bars,
    print_odds_table, PipelineSummary,
};
use recoda::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let plan = RecodePlan::from_path(&cli.plan)?;
    let output_path = cli.output_path();

    // Print styled banner
    print_banner(env!("CARGO_PKG_VERSION"));

    // Print configuration card
    print_config(
        &cli.input,
        &cli.plan,
        &output_path,
        plan.sentinel,
        plan.continuous.len(),
    );

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let df = load_dataset(&cli.input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let mut summary = PipelineSummary::new(rows, cols);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Select columns and normalize the sentinel
    print_step_header(2, "Select Columns & Normalize Sentinel");
    let recode_start = Instant::now();
    let frame = SurveyFrame::new(df)?;
    let frame = frame.select(&plan.columns)?;
    summary.selected_columns = plan.columns.len();

    let nulls_before = total_nulls(frame.df());
    let frame = normalize_sentinel(frame, plan.sentinel)?;
    let blanked = total_nulls(frame.df()) - nulls_before;
    summary.sentinel_cells = blanked;
    print_count(
        "sentinel cell(s) recoded to missing",
        blanked,
        Some(&format!("(value {})", plan.sentinel)),
    );
    print_success("Sentinel normalized");

    // Step 3: Reclassify types and drop incomplete rows
    print_step_header(3, "Reclassify Types & Drop Incomplete Rows");
    let before = frame.height();
    let frame = classify_columns(frame, &plan.continuous)?;
    let dropped = before - frame.height();
    summary.rows_deleted = dropped;
    if dropped == 0 {
        print_info("No incomplete rows");
    } else {
        print_count("incomplete row(s) dropped", dropped, None);
    }
    print_success("Types reclassified");

    // Step 4: Collapse categories
    print_step_header(4, "Collapse Categories");
    let mut frame = frame;
    if plan.collapse.is_empty() {
        print_info("No collapse rules in plan");
    }
    for rule in &plan.collapse {
        frame = apply_collapse(&frame, rule)?;
        summary
            .derived_columns
            .push(format!("{} ← {}", rule.target, rule.source));
    }
    let superseded = plan.superseded_columns();
    if !superseded.is_empty() {
        frame = frame.drop_columns(&superseded)?;
        print_count(
            "superseded source column(s) dropped",
            superseded.len(),
            None,
        );
        print_success("Categories collapsed");
    }

    // Step 5: Apply labels
    print_step_header(5, "Apply Labels");
    for (column, labels) in &plan.level_labels {
        frame = apply_level_labels(&frame, column, labels)?;
    }
    for (column, label) in &plan.column_labels {
        frame = set_column_label(&frame, column, label)?;
    }
    summary.labeled_columns = plan.column_labels.len();
    print_count("level map(s) applied", plan.level_labels.len(), None);
    print_count("column label(s) attached", plan.column_labels.len(), None);
    let recode_elapsed = recode_start.elapsed();
    summary.set_recode_time(recode_elapsed);
    print_step_time(recode_elapsed);

    // Step 6: Descriptive report
    if !cli.skip_report {
        print_step_header(6, "Descriptive Report");
        match &plan.group_by {
            Some(group_by) => build_grouped_summary(&frame, group_by)?.display(),
            None => print_info("No group_by column in plan - skipping summary table"),
        }
        for column in &plan.report.frequency {
            print_frequency_bars(&frame, column)?;
        }
        for spec in &plan.report.box_summary {
            print_box_summary(&frame, &spec.value, &spec.by)?;
        }
        for spec in &plan.report.crosstab {
            print_crosstab(&frame, &spec.rows, &spec.cols)?;
        }
    }

    // Step 7: Logistic model
    if !cli.skip_model {
        if let Some(model_plan) = &plan.model {
            print_step_header(7, "Logistic Model");
            let step_start = Instant::now();
            let spinner = create_spinner("Fitting logistic model...");
            let model = fit_logistic(&frame, &model_plan.outcome, &model_plan.mapping())?;
            finish_with_success(&spinner, "Model fitted");
            print_odds_table(&model);
            let model_elapsed = step_start.elapsed();
            summary.set_model_time(model_elapsed);
            print_step_time(model_elapsed);
        }
    }

    // Step 8: Save output
    print_step_header(8, "Save Results");
    let step_start = Instant::now();
    summary.final_rows = frame.height();
    summary.final_columns = frame.width();
    let mut df = frame.into_df();
    let spinner = create_spinner("Writing output file...");
    save_dataset(&mut df, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    let save_elapsed = step_start.elapsed();
    summary.set_save_time(save_elapsed);
    print_step_time(save_elapsed);

    // Display summary
    summary.display();

    // Final completion message
    print_completion();

    Ok(())
}

fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}
