//! Analyze orchestration: one pipeline run, extraction, re-validation.

use abya_common::{compute, EvaluationResult};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extract::{self, ExtractError};
use crate::runner::{RunnerError, WorkflowRunner};

/// Why an analyze request produced no evaluation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Process(#[from] RunnerError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Run the agent pipeline over `content` and decode its verdict.
pub async fn analyze(
    runner: &WorkflowRunner,
    content: &str,
) -> Result<EvaluationResult, WorkflowError> {
    let output = runner.run(content).await?;
    info!(
        "  Runner finished in {}ms ({} bytes of output)",
        output.elapsed_ms,
        output.stdout.len()
    );
    if !output.stderr.is_empty() {
        debug!("  Runner stderr: {}", output.stderr.trim());
    }

    let mut result = extract::extract(&output.stdout)?;
    revalidate(&mut result);
    Ok(result)
}

/// Recompute the weighted score locally and correct the payload when the
/// upstream arithmetic disagrees by more than a hundredth of a point (or
/// the verdict contradicts the score). Narrative fields stay as delivered.
/// Payloads without a recognized category and full score map pass through
/// untouched.
fn revalidate(result: &mut EvaluationResult) {
    let local = match compute(&result.category, &result.individual_scores) {
        Ok(local) => local,
        Err(e) => {
            debug!("  Skipping score re-validation: {}", e);
            return;
        }
    };

    let drift = (local.final_score - result.final_score).abs();
    if drift > 0.01 || local.passed != result.passed {
        warn!(
            "  Correcting upstream arithmetic: reported {:.2}/passed={}, computed {:.2}/passed={}",
            result.final_score, result.passed, local.final_score, local.passed
        );
        result.final_score = local.final_score;
        result.passed = local.passed;
        result.calculation_breakdown = local.calculation_breakdown;
        result.category_weights = local.category_weights;
        result.pass_mark = local.pass_mark;
    }
}
