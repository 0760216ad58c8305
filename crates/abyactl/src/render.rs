//! Terminal rendering for evaluation results

use abya_common::EvaluationResult;
use owo_colors::OwoColorize;

/// Print an evaluation: breakdown table, verdict, narrative. Fields the
/// payload did not carry are simply skipped.
pub fn evaluation(result: &EvaluationResult) {
    println!();
    if !result.category.is_empty() {
        println!("Category: {}", result.category.bold());
    }

    if !result.calculation_breakdown.is_empty() {
        println!();
        println!(
            "{:<28} {:>5} {:>7} {:>13}",
            "Element", "Score", "Weight", "Contribution"
        );
        for entry in &result.calculation_breakdown {
            println!(
                "{:<28} {:>5} {:>6}% {:>13.2}",
                entry.element, entry.score, entry.weight, entry.contribution
            );
        }
    }

    println!();
    let verdict = if result.passed {
        "PASSED".green().to_string()
    } else {
        "FAILED".red().to_string()
    };
    println!(
        "Final score: {:.2} / 100 (pass mark {}) {}",
        result.final_score, result.pass_mark, verdict
    );

    if !result.summary.is_empty() {
        println!();
        println!("Summary: {}", result.summary);
    }
    if !result.recommendation.is_empty() {
        println!("Recommendation: {}", result.recommendation);
    }
}
