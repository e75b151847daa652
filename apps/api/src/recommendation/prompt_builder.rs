//! Prompt Builder — renders a roster subset, the client query and the heuristics
//! body into the single document sent to the model.
//!
//! Sections, in fixed order: preamble, client need, roster, heuristics, output format.
//! Sections are concatenated rather than substituted into a template so the query
//! is carried verbatim even when it contains placeholder-like text.

use std::fmt::Write;

use crate::models::professional::ProfessionalRecord;
use crate::recommendation::format::{
    Field, MATCH_END, MATCH_START, MAX_MATCHES, MAX_REASON_CHARS, MIN_MATCHES,
};
use crate::recommendation::heuristics::Heuristics;
use crate::recommendation::prompts::{
    CLIENT_NEED_LABEL, FORMAT_EXAMPLE_VALUES, FORMAT_INTRO, HEURISTICS_HEADER, NOT_LISTED,
    RECOMMENDATION_PREAMBLE, ROSTER_HEADER,
};

/// Builds the recommendation prompt. Pure: same inputs, same bytes.
///
/// The subset is rendered in the order given; callers sort before building.
pub fn build_prompt(query: &str, subset: &[&ProfessionalRecord], heuristics: &Heuristics) -> String {
    let mut prompt = String::new();

    prompt.push_str(RECOMMENDATION_PREAMBLE);
    prompt.push_str("\n\n");

    prompt.push_str(CLIENT_NEED_LABEL);
    prompt.push(' ');
    prompt.push_str(query);
    prompt.push_str("\n\n");

    prompt.push_str(&render_roster_section(subset));
    prompt.push('\n');

    prompt.push_str(HEURISTICS_HEADER);
    prompt.push('\n');
    prompt.push_str(heuristics.body.trim_end());
    prompt.push_str("\n\n");

    prompt.push_str(&render_format_section());

    prompt
}

/// One block per record:
///
/// ```text
/// - Jane Doe
///   Education: Yale Law School J.D.
///   Expertise: Corporate Law, M&A
/// ```
pub fn render_roster_section(subset: &[&ProfessionalRecord]) -> String {
    let mut section = String::new();
    section.push_str(ROSTER_HEADER);
    section.push_str("\n\n");

    for record in subset {
        // Writing to a String cannot fail.
        let _ = write!(
            section,
            "- {}\n  Education: {}\n  Expertise: {}\n\n",
            record.name().unwrap_or(NOT_LISTED),
            record.education().unwrap_or(NOT_LISTED),
            record.expertise().unwrap_or(NOT_LISTED),
        );
    }

    section
}

/// The output contract: an example sentinel block plus the guidelines.
pub fn render_format_section() -> String {
    let mut section = String::new();
    section.push_str(FORMAT_INTRO);
    section.push_str("\n\n");

    section.push_str(MATCH_START);
    section.push('\n');
    for (field, value) in Field::ALL.iter().zip(FORMAT_EXAMPLE_VALUES) {
        let _ = writeln!(section, "{}: {}", field.label(), value);
    }
    section.push_str(MATCH_END);
    section.push_str("\n\n");

    let optional: Vec<&str> = Field::ALL
        .iter()
        .filter(|f| f.is_optional())
        .map(|f| f.label())
        .collect();

    section.push_str("Important guidelines:\n");
    let _ = writeln!(section, "- Provide {MIN_MATCHES}-{MAX_MATCHES} matches only");
    let _ = writeln!(
        section,
        "- Wrap every match between {MATCH_START} and {MATCH_END} lines"
    );
    let _ = writeln!(
        section,
        "- Put exactly one \"Label: value\" pair per line; {} may be omitted if unknown",
        optional.join(", ")
    );
    let _ = writeln!(
        section,
        "- Keep the {} specific but concise (max {MAX_REASON_CHARS} characters)",
        Field::RecommendationReason.label()
    );
    section.push_str("- Focus on matching expertise to the client's specific needs\n");
    section.push_str("- Use the exact delimiters shown above");

    section
}
