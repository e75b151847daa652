use std::fmt;

use serde::{Serialize, Serializer};

/// Markers the roster uses for "no value". Compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["n/a", "na"];

/// One row of the roster as loaded from the source file.
///
/// Raw text is kept (trimmed) so the prompt carries exactly what the roster holds.
/// Use the accessors to read a field with missing markers filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfessionalRecord {
    name: String,
    contact: String,
    education: String,
    expertise: String,
}

impl ProfessionalRecord {
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        education: impl Into<String>,
        expertise: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            contact: contact.into().trim().to_string(),
            education: education.into().trim().to_string(),
            expertise: expertise.into().trim().to_string(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn contact(&self) -> Option<&str> {
        present(&self.contact)
    }

    pub fn education(&self) -> Option<&str> {
        present(&self.education)
    }

    pub fn expertise(&self) -> Option<&str> {
        present(&self.expertise)
    }

    /// Whether `other` names this professional, ignoring case and surrounding whitespace.
    pub fn is_named(&self, other: &str) -> bool {
        self.name().is_some_and(|n| name_key(n) == name_key(other))
    }

    /// Splits the expertise field on commas. Empty tokens are discarded.
    pub fn expertise_tags(&self) -> Vec<ExpertiseTag> {
        self.expertise()
            .map(|raw| raw.split(',').filter_map(ExpertiseTag::parse).collect())
            .unwrap_or_default()
    }
}

/// Case-folded form of a name, used wherever two names are compared.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Returns `None` for blank values and the roster's "no value" markers.
pub fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|m| trimmed.eq_ignore_ascii_case(m))
    {
        None
    } else {
        Some(trimmed)
    }
}

/// Card view of a professional: what the roster listing endpoint returns.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessionalCard {
    pub name: String,
    pub contact: Option<String>,
    pub education: Option<String>,
    pub expertise: Vec<ExpertiseTag>,
}

impl From<&ProfessionalRecord> for ProfessionalCard {
    fn from(record: &ProfessionalRecord) -> Self {
        Self {
            name: record.name().unwrap_or_default().to_string(),
            contact: record.contact().map(str::to_string),
            education: record.education().map(str::to_string),
            expertise: record.expertise_tags(),
        }
    }
}

/// A trimmed, case-preserving practice-area token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpertiseTag(String);

impl ExpertiseTag {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }
}

impl fmt::Display for ExpertiseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ExpertiseTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_markers_are_not_content() {
        let record = ProfessionalRecord::new("Jane Doe", "  ", "N/A", "na");
        assert_eq!(record.name(), Some("Jane Doe"));
        assert_eq!(record.contact(), None);
        assert_eq!(record.education(), None);
        assert_eq!(record.expertise(), None);
        assert!(record.expertise_tags().is_empty());
    }

    #[test]
    fn test_is_named_folds_non_ascii_case() {
        let record = ProfessionalRecord::new("José Núñez", "", "", "");
        assert!(record.is_named("JOSÉ NÚÑEZ"));
        assert!(record.is_named("  josé núñez "));
        assert!(!record.is_named("Jose Nunez"));
    }

    #[test]
    fn test_marker_must_match_whole_value() {
        assert_eq!(present("National Law"), Some("National Law"));
        assert_eq!(present(" nA "), None);
    }

    #[test]
    fn test_expertise_tags_trim_and_preserve_case() {
        let record = ProfessionalRecord::new(
            "Jane Doe",
            "jane@example.com",
            "Yale J.D.",
            "Corporate Law,  M&A , ,SaaS Agreements",
        );
        let tags: Vec<String> = record
            .expertise_tags()
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(tags, vec!["Corporate Law", "M&A", "SaaS Agreements"]);
    }

    #[test]
    fn test_card_serializes_tags_as_strings() {
        let record = ProfessionalRecord::new("A", "a@x.com", "", "IP, Licensing");
        let card = ProfessionalCard::from(&record);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["expertise"], serde_json::json!(["IP", "Licensing"]));
        assert!(json["education"].is_null());
    }
}
