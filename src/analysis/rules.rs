//! Ordered rule tables for keyword tiers and optimization actions.
//!
//! Each table is evaluated top to bottom and the first matching rule wins.
//! Missing metrics fail every comparison, so a record with a missing field
//! falls through to the table's fallback.

use crate::models::{ActionCode, KeywordImportance};

/// Click share at or above which a keyword is Primary.
pub const PRIMARY_CLICK_SHARE: f64 = 0.2;
/// Fixed Secondary thresholds; independent of the caller's impression threshold.
pub const SECONDARY_MIN_IMPRESSIONS: f64 = 30.0;
pub const SECONDARY_MAX_POSITION: f64 = 20.0;
/// Ghost keywords rank worse than this position.
pub const GHOST_MIN_POSITION: f64 = 30.0;

/// A named predicate paired with the outcome it selects.
pub struct Rule<I, O> {
    pub name: &'static str,
    pub matches: fn(&I) -> bool,
    pub outcome: O,
}

/// First outcome whose predicate matches, or `fallback`.
pub fn evaluate<I, O: Copy>(rules: &[Rule<I, O>], input: &I, fallback: O) -> O {
    rules
        .iter()
        .find(|rule| (rule.matches)(input))
        .map(|rule| rule.outcome)
        .unwrap_or(fallback)
}

fn at_least(value: Option<f64>, bound: f64) -> bool {
    value.is_some_and(|v| v >= bound)
}

fn at_most(value: Option<f64>, bound: f64) -> bool {
    value.is_some_and(|v| v <= bound)
}

fn above(value: Option<f64>, bound: f64) -> bool {
    value.is_some_and(|v| v > bound)
}

fn below(value: Option<f64>, bound: f64) -> bool {
    value.is_some_and(|v| v < bound)
}

fn within(value: Option<f64>, low: f64, high: f64) -> bool {
    value.is_some_and(|v| (low..=high).contains(&v))
}

/// Inputs to the keyword tier rules.
#[derive(Debug, Clone, Copy)]
pub struct ImportanceInput {
    pub click_share: Option<f64>,
    pub impressions: Option<f64>,
    pub position: Option<f64>,
    pub impression_threshold: f64,
}

pub const IMPORTANCE_RULES: [Rule<ImportanceInput, KeywordImportance>; 3] = [
    Rule {
        name: "share_at_least_20pct",
        matches: |i| at_least(i.click_share, PRIMARY_CLICK_SHARE),
        outcome: KeywordImportance::Primary,
    },
    Rule {
        name: "moderate_share_visible_and_ranking",
        matches: |i| {
            below(i.click_share, PRIMARY_CLICK_SHARE)
                && at_least(i.impressions, SECONDARY_MIN_IMPRESSIONS)
                && at_most(i.position, SECONDARY_MAX_POSITION)
        },
        outcome: KeywordImportance::Secondary,
    },
    Rule {
        name: "high_impressions_poor_rank",
        matches: |i| {
            at_least(i.impressions, i.impression_threshold) && above(i.position, GHOST_MIN_POSITION)
        },
        outcome: KeywordImportance::Ghost,
    },
];

/// Assign a keyword tier.
pub fn classify_importance(input: &ImportanceInput) -> KeywordImportance {
    evaluate(&IMPORTANCE_RULES, input, KeywordImportance::Ignore)
}

/// Inputs to the action rules.
///
/// `avg_ctr` is the batch-wide mean CTR over the focus set, computed once.
#[derive(Debug, Clone, Copy)]
pub struct ActionInput {
    pub impressions: Option<f64>,
    pub ctr: Option<f64>,
    pub position: Option<f64>,
    pub avg_ctr: Option<f64>,
    pub impression_threshold: f64,
}

impl ActionInput {
    fn visible(&self) -> bool {
        above(self.impressions, self.impression_threshold)
    }

    fn ctr_above_avg(&self) -> bool {
        matches!((self.ctr, self.avg_ctr), (Some(ctr), Some(avg)) if ctr > avg)
    }

    fn ctr_below_avg(&self) -> bool {
        matches!((self.ctr, self.avg_ctr), (Some(ctr), Some(avg)) if ctr < avg)
    }
}

pub const ACTION_RULES: [Rule<ActionInput, ActionCode>; 5] = [
    Rule {
        name: "top5_above_avg_ctr",
        matches: |i| i.visible() && i.ctr_above_avg() && within(i.position, 1.0, 5.0),
        outcome: ActionCode::NoChangeNeededHighPerformer,
    },
    Rule {
        name: "top10_below_avg_ctr",
        matches: |i| i.visible() && i.ctr_below_avg() && within(i.position, 6.0, 10.0),
        outcome: ActionCode::StrengthenTitleMetaInternalLinking,
    },
    Rule {
        name: "page2_below_avg_ctr",
        matches: |i| i.visible() && i.ctr_below_avg() && within(i.position, 11.0, 20.0),
        outcome: ActionCode::SemanticReviewAndRefinement,
    },
    Rule {
        name: "top10_above_avg_ctr",
        matches: |i| i.visible() && i.ctr_above_avg() && within(i.position, 6.0, 10.0),
        outcome: ActionCode::DeepenFaqExpandSubkeywords,
    },
    Rule {
        name: "top5_below_avg_ctr",
        matches: |i| i.visible() && i.ctr_below_avg() && within(i.position, 1.0, 5.0),
        outcome: ActionCode::ReviseTitleMetaForClicks,
    },
];

/// Assign an optimization action to a focus keyword.
pub fn classify_action(input: &ActionInput) -> ActionCode {
    evaluate(&ACTION_RULES, input, ActionCode::NoAction)
}
