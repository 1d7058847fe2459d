//! The recode plan: the caller-supplied configuration surface.
//!
//! Everything the pipeline needs is declared here - selected columns,
//! sentinel, continuous exclusions, collapse rules, label maps, and the
//! downstream report/model choices. The library stages take these as
//! explicit arguments; the CLI reads them from one JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::collapse::CollapseRule;
use super::error::RecodeError;
use super::logit::OutcomeMapping;

/// Complete recoding configuration for one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecodePlan {
    /// Columns to keep, in order; everything else is dropped at selection
    pub columns: Vec<String>,
    /// Reserved raw value standing in for "missing / valid skip"
    pub sentinel: i64,
    /// Columns to EXCLUDE from categorical reclassification
    #[serde(default)]
    pub continuous: Vec<String>,
    /// Collapse rules, applied in order
    #[serde(default)]
    pub collapse: Vec<CollapseRule>,
    /// Per-column code -> display string maps
    #[serde(default)]
    pub level_labels: BTreeMap<String, BTreeMap<String, String>>,
    /// Column identifier -> display string
    #[serde(default)]
    pub column_labels: BTreeMap<String, String>,
    /// Categorical column the descriptive summary is grouped by
    #[serde(default)]
    pub group_by: Option<String>,
    /// Extra terminal views to render
    #[serde(default)]
    pub report: ReportPlan,
    /// Logistic model configuration
    #[serde(default)]
    pub model: Option<ModelPlan>,
}

/// Which exploratory views to render after recoding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPlan {
    /// Categorical columns to show as frequency bars
    #[serde(default)]
    pub frequency: Vec<String>,
    /// Numeric-by-categorical five-number summaries
    #[serde(default)]
    pub box_summary: Vec<BoxSummarySpec>,
    /// Two-way contingency tables
    #[serde(default)]
    pub crosstab: Vec<CrosstabSpec>,
}

/// One numeric column summarized within the levels of a categorical column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxSummarySpec {
    /// Numeric column to summarize
    pub value: String,
    /// Categorical column providing the groups
    pub by: String,
}

/// One two-way contingency table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrosstabSpec {
    /// Categorical column on the rows
    pub rows: String,
    /// Categorical column on the columns
    pub cols: String,
}

/// Logistic model: outcome column plus its binary mapping. All remaining
/// columns enter as predictors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPlan {
    /// Categorical outcome column
    pub outcome: String,
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl ModelPlan {
    pub fn mapping(&self) -> OutcomeMapping {
        OutcomeMapping::new(self.event_value.clone(), self.non_event_value.clone())
    }
}

impl RecodePlan {
    /// Read and structurally validate a plan from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recode plan: {}", path.display()))?;
        let plan: RecodePlan = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse recode plan: {}", path.display()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Validate everything that can be checked without the dataset.
    /// Collapse rules are checked eagerly so a bad plan fails before any
    /// data is read.
    pub fn validate(&self) -> Result<(), RecodeError> {
        for rule in &self.collapse {
            rule.validate()?;
        }
        Ok(())
    }

    /// Source columns fully superseded by collapse-derived ones; the caller
    /// drops these after all rules have run.
    pub fn superseded_columns(&self) -> Vec<String> {
        self.collapse.iter().map(|r| r.source.clone()).collect()
    }
}
