//! Category collapsing - maps fine-grained codes onto coarser named groups.
//!
//! Each rule reads one source categorical column and produces one new
//! derived categorical column whose values are group names. A raw code
//! covered by no group maps to null in the derived column; that is a
//! documented policy, not an error, and no row is dropped for it. Callers
//! needing zero data loss check [`CollapseRule::uncovered_codes`] before
//! applying. The collapser never removes columns; discarding superseded
//! source columns is an explicit projection the caller performs afterwards.

use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::RecodeError;
use super::frame::{render_codes, ColumnKind, ColumnMeta, SurveyFrame};

/// One named group of raw codes inside a collapse rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseGroup {
    /// Group name - becomes the derived column's value
    pub name: String,
    /// Raw codes belonging to this group
    pub codes: Vec<String>,
}

/// A many-to-one mapping from raw codes in a source column to named groups
/// in a new derived column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseRule {
    /// Source categorical column to read codes from
    pub source: String,
    /// Name of the derived column to create
    pub target: String,
    /// Groups in presentation order
    pub groups: Vec<CollapseGroup>,
}

impl CollapseRule {
    /// Check that code -> group is a function: no code may appear in two
    /// different groups. Listing a code twice inside the same group is
    /// redundant but harmless.
    pub fn validate(&self) -> Result<(), RecodeError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for group in &self.groups {
            for code in &group.codes {
                if let Some(first) = seen.insert(code.as_str(), group.name.as_str()) {
                    if first != group.name {
                        return Err(RecodeError::DuplicateCodeAssignment {
                            code: code.clone(),
                            first: first.to_string(),
                            second: group.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The group a code belongs to, if any
    pub fn group_for(&self, code: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.codes.iter().any(|c| c == code))
            .map(|g| g.name.as_str())
    }

    /// Codes observed in the source column that no group covers.
    ///
    /// Provided for callers that want strict coverage; `apply_collapse`
    /// itself never checks this.
    pub fn uncovered_codes(&self, frame: &SurveyFrame) -> Result<Vec<String>, RecodeError> {
        frame.ensure_column(&self.source)?;
        let observed = match frame.kind(&self.source) {
            Some(ColumnKind::Categorical { codes }) => codes.clone(),
            _ => super::frame::scan_codes(frame.df().column(&self.source)?)?,
        };
        Ok(observed
            .into_iter()
            .filter(|code| self.group_for(code).is_none())
            .collect())
    }
}

/// Apply one collapse rule, appending the derived column to the frame.
///
/// Deterministic: group assignment is a pure function of the source code.
/// The derived column's code set lists the rule's group names in declared
/// order, restricted to groups that actually occur.
pub fn apply_collapse(frame: &SurveyFrame, rule: &CollapseRule) -> Result<SurveyFrame, RecodeError> {
    rule.validate()?;
    frame.ensure_column(&rule.source)?;

    let mut mapping: HashMap<&str, &str> = HashMap::new();
    for group in &rule.groups {
        for code in &group.codes {
            mapping.insert(code.as_str(), group.name.as_str());
        }
    }

    let source_codes = render_codes(frame.df().column(&rule.source)?)?;
    let values: Vec<Option<String>> = source_codes
        .iter()
        .map(|cell| {
            cell.as_deref()
                .and_then(|code| mapping.get(code).map(|g| (*g).to_string()))
        })
        .collect();

    let codes: Vec<String> = rule
        .groups
        .iter()
        .map(|g| g.name.clone())
        .filter(|name| values.iter().flatten().any(|v| v == name))
        .collect();

    let mut out = frame.clone();
    out.push_column(
        Column::new(rule.target.as_str().into(), values),
        ColumnMeta {
            kind: ColumnKind::Categorical { codes },
            label: None,
        },
    )?;
    Ok(out)
}
