//! Project description synthesis from an analysis result.
//!
//! The output is a single text block with fixed section markers, in this
//! order: explanation, numbered plan (only when the plan is non-empty), cost
//! summary, optimization note (only when optimized), condition score.
//!
//! The synthesizer is pure and deterministic. It recomputes the plan total
//! itself and shows it next to the service's estimate without reconciling
//! the two.

use crate::models::{AnalysisResult, Priority};
use crate::money::{currency_symbol, group_thousands};

/// Used when the service returns an empty explanation.
pub const DEFAULT_EXPLANATION: &str = "Analysis complete.";

pub const PLAN_HEADER: &str = "📋 DETAILED RENOVATION PLAN:";
pub const SUMMARY_HEADER: &str = "💰 COST SUMMARY:";
pub const OPTIMIZED_LINE: &str = "✅ This plan has been optimized to fit your budget!";
pub const SCORE_LABEL: &str = "📊 Overall Condition Score:";
pub const SCORE_NOTE: &str = "(Higher score indicates more renovation work needed)";

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// Build the human-readable project description for an analysis result.
pub fn synthesize_description(result: &AnalysisResult) -> String {
    let symbol = currency_symbol(&result.currency);
    let money = |amount: i64| format!("{}{}", symbol, group_thousands(amount));

    let explanation = result.explanation.trim();
    let mut text = if explanation.is_empty() {
        DEFAULT_EXPLANATION.to_string()
    } else {
        result.explanation.clone()
    };

    // The total is the sum of the rounded item costs, so the displayed items
    // always add up to the displayed total.
    let item_costs = result.rounded_item_costs();
    let plan_total = result.plan_total();

    if !result.plan.is_empty() {
        text.push_str("\n\n");
        text.push_str(PLAN_HEADER);
        text.push_str("\n\n");
        for (index, (item, cost)) in result.plan.iter().zip(&item_costs).enumerate() {
            text.push_str(&format!(
                "{}. {} {}\n",
                index + 1,
                item.task.to_uppercase(),
                priority_marker(item.priority)
            ));
            text.push_str(&format!("   Priority: {}\n", item.priority.title()));
            text.push_str(&format!("   Cost: {}\n", money(*cost)));
            text.push_str(&format!("   Details: {}\n\n", item.description));
        }
    } else {
        text.push_str("\n\n");
    }

    text.push_str(SUMMARY_HEADER);
    text.push('\n');
    text.push_str(&format!("Individual Tasks Total: {}\n", money(plan_total)));
    text.push_str(&format!(
        "Total Estimated Cost: {}\n",
        money(result.estimated_cost.round() as i64)
    ));
    text.push_str(&format!("Currency: {}\n", result.currency));

    if result.optimized {
        text.push_str(OPTIMIZED_LINE);
        text.push('\n');
    }

    text.push_str(&format!(
        "\n{} {:.1}%\n{}",
        SCORE_LABEL,
        result.score * 100.0,
        SCORE_NOTE
    ));

    text
}
