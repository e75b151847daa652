//! Sentinel block protocol shared by the prompt's format instructions and the parser.
//!
//! Each recommendation is a block:
//!
//! ```text
//! MATCH_START
//! Rank: 1
//! Name: Jane Doe
//! Key Expertise: Corporate Law, M&A
//! Education: Yale Law School J.D.
//! Recommendation Reason: Led SaaS acquisitions for mid-market buyers
//! MATCH_END
//! ```

pub const MATCH_START: &str = "MATCH_START";
pub const MATCH_END: &str = "MATCH_END";

pub const MIN_MATCHES: usize = 3;
pub const MAX_MATCHES: usize = 5;
pub const MAX_REASON_CHARS: usize = 150;

/// The labels the parser recognizes inside a sentinel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rank,
    Name,
    KeyExpertise,
    Education,
    RecommendationReason,
}

impl Field {
    /// Emission order in the format instructions.
    pub const ALL: [Field; 5] = [
        Field::Rank,
        Field::Name,
        Field::KeyExpertise,
        Field::Education,
        Field::RecommendationReason,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Rank => "Rank",
            Field::Name => "Name",
            Field::KeyExpertise => "Key Expertise",
            Field::Education => "Education",
            Field::RecommendationReason => "Recommendation Reason",
        }
    }

    /// Exact label match. Unknown labels return `None` and are dropped by the parser.
    pub fn from_label(label: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.label() == label)
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Field::Education)
    }
}
