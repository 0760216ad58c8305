//! Weighted rubric scoring and the evaluation result payload.
//!
//! `compute` is the deterministic scorer: same category and score map in,
//! same result out. Weighted contributions are accumulated in integer
//! hundredths of a point, so the breakdown always sums to the final score
//! with no float drift.

use crate::rubric::{Category, Element, PASS_MARK};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Scoring failures. Every bad input maps to one of these; the scorer
/// never panics.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("unknown course category: {0}")]
    UnknownCategory(String),

    #[error("missing score for element: {0}")]
    MissingElement(&'static str),

    #[error("unexpected score key: {0}")]
    UnexpectedElement(String),

    #[error("score for {element} is out of range: {score}")]
    ScoreOutOfRange { element: &'static str, score: u32 },
}

/// One element's line in the calculation breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub element: String,
    pub score: u32,
    pub weight: u32,
    pub contribution: f64,
}

/// Final evaluation payload, shaped like the scoring pipeline's JSON
/// output. Only `final_score` is mandatory when decoding; every other
/// field falls back to a default so partial upstream payloads still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub final_score: f64,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub individual_scores: BTreeMap<String, u32>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_weights: BTreeMap<String, u32>,
    #[serde(default = "default_pass_mark")]
    pub pass_mark: u32,
    #[serde(default)]
    pub calculation_breakdown: Vec<BreakdownEntry>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendation: String,
}

fn default_pass_mark() -> u32 {
    PASS_MARK
}

/// Compute the weighted evaluation for `category` from a complete score map.
///
/// The map must contain exactly the ten rubric elements, each scored in
/// 0..=100. Element contribution is score x weight / 100; the final score
/// is the sum of contributions, always in 0.0..=100.0 with two exact
/// decimal places.
pub fn compute(
    category: &str,
    scores: &BTreeMap<String, u32>,
) -> Result<EvaluationResult, ScoreError> {
    let cat = Category::from_name(category)
        .ok_or_else(|| ScoreError::UnknownCategory(category.trim().to_string()))?;

    // Reject foreign keys up front so a typo cannot silently skew the sum.
    for key in scores.keys() {
        if Element::from_name(key).is_none() {
            return Err(ScoreError::UnexpectedElement(key.clone()));
        }
    }

    let mut centi_total: u64 = 0;
    let mut breakdown = Vec::with_capacity(Element::ALL.len());
    let mut individual_scores = BTreeMap::new();
    let mut category_weights = BTreeMap::new();

    for (element, weight) in cat.weights() {
        let name = element.name();
        let score = *scores.get(name).ok_or(ScoreError::MissingElement(name))?;
        if score > 100 {
            return Err(ScoreError::ScoreOutOfRange {
                element: name,
                score,
            });
        }

        // score x weight is the contribution in hundredths of a point.
        let centi = u64::from(score) * u64::from(*weight);
        centi_total += centi;

        breakdown.push(BreakdownEntry {
            element: name.to_string(),
            score,
            weight: *weight,
            contribution: centi as f64 / 100.0,
        });
        individual_scores.insert(name.to_string(), score);
        category_weights.insert(name.to_string(), *weight);
    }

    let final_score = centi_total as f64 / 100.0;
    let passed = final_score >= f64::from(PASS_MARK);
    let summary = build_summary(cat, final_score, passed, &breakdown);
    let recommendation = build_recommendation(passed, &breakdown);

    Ok(EvaluationResult {
        final_score,
        passed,
        individual_scores,
        category: cat.name().to_string(),
        category_weights,
        pass_mark: PASS_MARK,
        calculation_breakdown: breakdown,
        summary,
        recommendation,
    })
}

/// One-line narrative: verdict plus the strongest and weakest elements.
/// Ties resolve to the element earliest in canonical order.
fn build_summary(
    category: Category,
    final_score: f64,
    passed: bool,
    breakdown: &[BreakdownEntry],
) -> String {
    let mut strongest = &breakdown[0];
    let mut weakest = &breakdown[0];
    for entry in &breakdown[1..] {
        if entry.score > strongest.score {
            strongest = entry;
        }
        if entry.score < weakest.score {
            weakest = entry;
        }
    }

    let verdict = if passed { "meets" } else { "falls below" };
    format!(
        "Weighted score {:.1}/100 for the {} category; {} the pass mark of {}. \
         Strongest element: {} ({}). Weakest element: {} ({}).",
        final_score, category, verdict, PASS_MARK, strongest.element, strongest.score,
        weakest.element, weakest.score
    )
}

/// Improvement advice targeting the element with the largest remaining
/// weighted gain, i.e. (100 - score) x weight.
fn build_recommendation(passed: bool, breakdown: &[BreakdownEntry]) -> String {
    let gain = |e: &BreakdownEntry| u64::from(100 - e.score) * u64::from(e.weight);

    let mut target = &breakdown[0];
    for entry in &breakdown[1..] {
        if gain(entry) > gain(target) {
            target = entry;
        }
    }

    if gain(target) == 0 {
        return "Every element is at the maximum; maintain the current course design.".to_string();
    }

    if passed {
        format!(
            "Meets the bar. The largest remaining gain is {} (scored {}, weight {}%).",
            target.element, target.score, target.weight
        )
    } else {
        format!(
            "Below the pass mark. Improve {} first (scored {}, weight {}%).",
            target.element, target.score, target.weight
        )
    }
}
