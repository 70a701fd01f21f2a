//! Keyword-level records from a search analytics export.
//!
//! One record is one query observed on one page. Records are created once by
//! the normalizer and then enriched by each analysis stage.

use serde::{Deserialize, Serialize};

/// A row exactly as it appeared in the input table, before numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub page: String,
    pub query: String,
    pub clicks: String,
    pub impressions: String,
    pub ctr: String,
    pub position: String,
}

/// How much a keyword matters to its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordImportance {
    Primary,
    Secondary,
    Ghost,
    Ignore,
}

impl KeywordImportance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Ghost => "Ghost",
            Self::Ignore => "Ignore",
        }
    }

    /// Primary and Secondary keywords make up the focus set.
    pub fn is_focus(&self) -> bool {
        matches!(self, Self::Primary | Self::Secondary)
    }
}

impl std::fmt::Display for KeywordImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimization action suggested for a focus keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCode {
    NoChangeNeededHighPerformer,
    StrengthenTitleMetaInternalLinking,
    SemanticReviewAndRefinement,
    DeepenFaqExpandSubkeywords,
    ReviseTitleMetaForClicks,
    NoAction,
}

impl ActionCode {
    pub const ALL: [ActionCode; 6] = [
        Self::NoChangeNeededHighPerformer,
        Self::StrengthenTitleMetaInternalLinking,
        Self::SemanticReviewAndRefinement,
        Self::DeepenFaqExpandSubkeywords,
        Self::ReviseTitleMetaForClicks,
        Self::NoAction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoChangeNeededHighPerformer => "no_change_needed_high_performer",
            Self::StrengthenTitleMetaInternalLinking => "strengthen_title_meta_internal_linking",
            Self::SemanticReviewAndRefinement => "semantic_review_and_refinement",
            Self::DeepenFaqExpandSubkeywords => "deepen_faq_expand_subkeywords",
            Self::ReviseTitleMetaForClicks => "revise_title_meta_for_clicks",
            Self::NoAction => "no_action",
        }
    }

    pub fn is_actionable(&self) -> bool {
        *self != Self::NoAction
    }
}

impl std::fmt::Display for ActionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized keyword record.
///
/// Numeric fields are `None` when the source cell could not be coerced.
/// Derived fields start empty and are filled in by the analysis stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordRecord {
    #[serde(rename = "Page")]
    pub page: String,
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Clicks")]
    pub clicks: Option<f64>,
    #[serde(rename = "Impressions")]
    pub impressions: Option<f64>,
    /// Fraction in [0, 1].
    #[serde(rename = "CTR")]
    pub ctr: Option<f64>,
    #[serde(rename = "Position")]
    pub position: Option<f64>,
    #[serde(rename = "Total_Clicks_Page")]
    pub total_clicks_page: f64,
    /// `None` only when `clicks` is missing.
    #[serde(rename = "Click_Share")]
    pub click_share: Option<f64>,
    #[serde(rename = "Keyword_Importance")]
    pub keyword_importance: Option<KeywordImportance>,
    /// Only assigned to focus records.
    #[serde(rename = "Action_Code")]
    pub action_code: Option<ActionCode>,
}

impl KeywordRecord {
    pub fn new(page: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            query: query.into(),
            clicks: None,
            impressions: None,
            ctr: None,
            position: None,
            total_clicks_page: 0.0,
            click_share: None,
            keyword_importance: None,
            action_code: None,
        }
    }

    pub fn is_focus(&self) -> bool {
        self.keyword_importance.is_some_and(|tier| tier.is_focus())
    }

    pub fn is_actionable(&self) -> bool {
        self.is_focus() && self.action_code.is_some_and(|code| code.is_actionable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_code_round_trip_names() {
        for code in ActionCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_focus_and_actionable() {
        let mut record = KeywordRecord::new("https://example.com/a", "widgets");
        assert!(!record.is_focus());

        record.keyword_importance = Some(KeywordImportance::Ghost);
        assert!(!record.is_focus());

        record.keyword_importance = Some(KeywordImportance::Secondary);
        record.action_code = Some(ActionCode::NoAction);
        assert!(record.is_focus());
        assert!(!record.is_actionable());

        record.action_code = Some(ActionCode::ReviseTitleMetaForClicks);
        assert!(record.is_actionable());
    }

    #[test]
    fn test_importance_serializes_as_display_name() {
        let json = serde_json::to_string(&KeywordImportance::Secondary).unwrap();
        assert_eq!(json, "\"Secondary\"");
        let json = serde_json::to_string(&ActionCode::DeepenFaqExpandSubkeywords).unwrap();
        assert_eq!(json, "\"deepen_faq_expand_subkeywords\"");
    }
}
