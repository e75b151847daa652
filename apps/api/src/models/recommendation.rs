use serde::{Deserialize, Serialize};

/// A single ranked recommendation parsed from the model's answer.
///
/// Every field is optional: the model may omit any label. The parser only
/// retains a record when at least one field is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub rank: Option<String>,
    pub name: Option<String>,
    pub key_expertise: Option<String>,
    pub education: Option<String>,
    pub recommendation_reason: Option<String>,
    /// Roster contact handle for the recommended professional, when the name
    /// resolves to a roster entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl RecommendationRecord {
    /// The rank as a positive integer, if it parses as one.
    pub fn numeric_rank(&self) -> Option<u32> {
        self.rank
            .as_deref()
            .and_then(|r| r.trim().parse::<u32>().ok())
            .filter(|r| *r > 0)
    }

    pub fn has_any_field(&self) -> bool {
        self.rank.is_some()
            || self.name.is_some()
            || self.key_expertise.is_some()
            || self.education.is_some()
            || self.recommendation_reason.is_some()
    }
}
