//! Logistic regression over the recoded table.
//!
//! One categorical column supplies the binary outcome through an
//! event/non-event mapping; every remaining column enters as a predictor,
//! numeric columns as-is and categorical columns as dummy indicators
//! against their first level. Fitting is iteratively reweighted least
//! squares on faer matrices. The fitted coefficients are exponentiated
//! downstream into the odds-ratio presentation table.

use anyhow::{Context, Result};
use faer::prelude::*;
use faer::Mat;
use serde::{Deserialize, Serialize};

use super::frame::{render_codes, ColumnKind, SurveyFrame};

/// IRLS iteration cap
const MAX_ITERATIONS: usize = 25;

/// Convergence threshold on the largest coefficient change
const CONVERGENCE_TOL: f64 = 1e-8;

/// Floor for the working weights to avoid division blow-up on fitted
/// probabilities at 0 or 1
const MIN_WORKING_WEIGHT: f64 = 1e-10;

/// Mapping configuration for converting the outcome column to binary 0/1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl OutcomeMapping {
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }
}

/// One fitted model term
#[derive(Debug, Clone, Serialize)]
pub struct ModelTerm {
    /// Term name: `(Intercept)`, a numeric column name, or `column=level`
    /// for a dummy indicator
    pub term: String,
    /// Coefficient on the log-odds scale
    pub coefficient: f64,
    /// Exponentiated coefficient
    pub odds_ratio: f64,
}

/// A fitted logistic model
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    /// Outcome column name
    pub outcome: String,
    /// Value modeled as the event
    pub event_value: String,
    /// Terms in design order, intercept first
    pub terms: Vec<ModelTerm>,
    /// Rows used in the fit
    pub observations: usize,
    /// IRLS iterations run
    pub iterations: usize,
    /// Whether the coefficient change fell below tolerance
    pub converged: bool,
}

struct Predictor {
    name: String,
    values: Vec<Option<f64>>,
}

/// Fit a logistic regression of `outcome` on every other column.
///
/// Rows whose outcome value matches neither side of the mapping are
/// skipped, as are rows with a missing predictor value (after the
/// reclassifier ran there are none).
pub fn fit_logistic(
    frame: &SurveyFrame,
    outcome: &str,
    mapping: &OutcomeMapping,
) -> Result<FittedModel> {
    frame.ensure_column(outcome)?;

    let outcome_codes = render_codes(frame.df().column(outcome)?)?;
    let mask: Vec<Option<f64>> = outcome_codes
        .iter()
        .map(|v| match v.as_deref() {
            Some(s) if s == mapping.event_value => Some(1.0),
            Some(s) if s == mapping.non_event_value => Some(0.0),
            _ => None,
        })
        .collect();

    let predictors = build_predictors(frame, outcome)?;
    if predictors.is_empty() {
        anyhow::bail!(
            "No usable predictor columns for outcome '{}' - every other column is constant",
            outcome
        );
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut y: Vec<f64> = Vec::new();
    for i in 0..frame.height() {
        let Some(target) = mask[i] else { continue };
        let mut row = Vec::with_capacity(predictors.len() + 1);
        row.push(1.0);
        let mut complete = true;
        for p in &predictors {
            match p.values[i] {
                Some(v) => row.push(v),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            rows.push(row);
            y.push(target);
        }
    }

    let n = rows.len();
    let p = predictors.len() + 1;
    if n == 0 {
        anyhow::bail!(
            "No rows match the outcome mapping '{}' / '{}' in column '{}'",
            mapping.event_value,
            mapping.non_event_value,
            outcome
        );
    }
    if n <= p {
        anyhow::bail!(
            "Not enough rows to fit the model: {} usable rows for {} terms",
            n,
            p
        );
    }

    let x = Mat::from_fn(n, p, |i, j| rows[i][j]);
    let (beta, iterations, converged) =
        irls(&x, &y).context("Logistic model fit failed")?;

    let mut terms = Vec::with_capacity(p);
    terms.push(ModelTerm {
        term: "(Intercept)".to_string(),
        coefficient: beta[0],
        odds_ratio: beta[0].exp(),
    });
    for (j, predictor) in predictors.iter().enumerate() {
        terms.push(ModelTerm {
            term: predictor.name.clone(),
            coefficient: beta[j + 1],
            odds_ratio: beta[j + 1].exp(),
        });
    }

    Ok(FittedModel {
        outcome: outcome.to_string(),
        event_value: mapping.event_value.clone(),
        terms,
        observations: n,
        iterations,
        converged,
    })
}

/// Build the predictor columns: numeric columns cast to f64, categorical
/// columns as one indicator per non-reference level. The reference is the
/// first level of the column's code set. Single-level columns are skipped -
/// they carry no contrast and would make the normal equations singular.
fn build_predictors(frame: &SurveyFrame, outcome: &str) -> Result<Vec<Predictor>> {
    let mut predictors = Vec::new();

    for name in frame.column_names() {
        if name == outcome {
            continue;
        }
        let col = frame.df().column(&name)?;

        match frame.kind(&name) {
            Some(ColumnKind::Numeric) => {
                let cast = col.cast(&polars::prelude::DataType::Float64)?;
                let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();
                predictors.push(Predictor { name, values });
            }
            Some(ColumnKind::Categorical { codes }) if codes.len() >= 2 => {
                let cells = render_codes(col)?;
                for level in codes.iter().skip(1) {
                    let values: Vec<Option<f64>> = cells
                        .iter()
                        .map(|cell| {
                            cell.as_deref()
                                .map(|code| if code == level { 1.0 } else { 0.0 })
                        })
                        .collect();
                    predictors.push(Predictor {
                        name: format!("{}={}", name, level),
                        values,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(predictors)
}

/// Iteratively reweighted least squares. Returns the coefficients, the
/// number of iterations run, and whether the fit converged.
fn irls(x: &Mat<f64>, y: &[f64]) -> Result<(Vec<f64>, usize, bool)> {
    let n = x.nrows();
    let p = x.ncols();

    let mut beta = Mat::<f64>::zeros(p, 1);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < MAX_ITERATIONS {
        iterations += 1;
        let eta = x * &beta;

        // Normal equations X^T W X and X^T W z, accumulated row by row
        let mut a = Mat::<f64>::zeros(p, p);
        let mut b = Mat::<f64>::zeros(p, 1);
        for i in 0..n {
            let e = eta[(i, 0)];
            let mu = 1.0 / (1.0 + (-e).exp());
            let w = (mu * (1.0 - mu)).max(MIN_WORKING_WEIGHT);
            let z = e + (y[i] - mu) / w;
            for j in 0..p {
                let xij = x[(i, j)];
                b[(j, 0)] += w * xij * z;
                for k in j..p {
                    a[(j, k)] += w * xij * x[(i, k)];
                }
            }
        }
        for j in 0..p {
            for k in (j + 1)..p {
                a[(k, j)] = a[(j, k)];
            }
        }

        let next = a.partial_piv_lu().solve(&b);

        let mut delta = 0.0f64;
        for j in 0..p {
            let value = next[(j, 0)];
            if !value.is_finite() {
                anyhow::bail!("Design matrix is singular - a predictor is collinear");
            }
            delta = delta.max((value - beta[(j, 0)]).abs());
        }
        beta = next;

        if delta < CONVERGENCE_TOL {
            converged = true;
            break;
        }
    }

    let coefficients = (0..p).map(|j| beta[(j, 0)]).collect();
    Ok((coefficients, iterations, converged))
}
