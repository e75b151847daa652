//! Response Parser — turns the model's sentinel-delimited answer into ordered records.
//!
//! Lenient by construction: stray prose, unknown labels and empty blocks are dropped
//! silently. The only reported failure is a response with no sentinel block at all.

use serde::Serialize;
use thiserror::Error;

use crate::models::recommendation::RecommendationRecord;
use crate::recommendation::format::{Field, MATCH_END, MATCH_START};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Response contained no MATCH_START/MATCH_END blocks")]
    NoParseableMatches,
}

/// How the returned records are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrdering {
    /// Every record had a positive integer rank; sorted ascending, ties in encounter order.
    Rank,
    /// At least one rank was missing or non-numeric; kept as the model emitted them.
    Encounter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Number of sentinel blocks found, including ones that yielded no record.
    pub blocks_found: usize,
    pub records: Vec<RecommendationRecord>,
    pub ordering: RecordOrdering,
}

/// Parses raw model output.
///
/// Returns `Err(NoParseableMatches)` only when no `MATCH_START` marker exists.
/// A response whose blocks all fail to yield a recognized field is `Ok` with no records.
pub fn parse_response(raw: &str) -> Result<ParsedResponse, ParseError> {
    let blocks: Vec<&str> = raw
        .split(MATCH_START)
        .skip(1)
        .map(|segment| segment.split(MATCH_END).next().unwrap_or_default())
        .collect();

    if blocks.is_empty() {
        return Err(ParseError::NoParseableMatches);
    }

    let mut records: Vec<RecommendationRecord> = blocks
        .iter()
        .copied()
        .map(labeled_pairs)
        .filter(|pairs| !pairs.is_empty())
        .map(|pairs| project(&pairs))
        .filter(RecommendationRecord::has_any_field)
        .collect();

    let ordering = if !records.is_empty() && records.iter().all(|r| r.numeric_rank().is_some()) {
        // sort_by_key is stable: equal ranks keep encounter order.
        records.sort_by_key(|r| r.numeric_rank());
        RecordOrdering::Rank
    } else {
        RecordOrdering::Encounter
    };

    Ok(ParsedResponse {
        blocks_found: blocks.len(),
        records,
        ordering,
    })
}

/// `Label: value` pairs in line order. Splits on the first colon; lines without one are skipped.
fn labeled_pairs(block: &str) -> Vec<(&str, &str)> {
    block
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(label, value)| (label.trim(), value.trim()))
        .collect()
}

/// Keeps recognized labels only. A repeated label overwrites the earlier value;
/// empty values count as absent.
fn project(pairs: &[(&str, &str)]) -> RecommendationRecord {
    let mut record = RecommendationRecord::default();

    for (label, value) in pairs {
        let Some(field) = Field::from_label(label) else {
            continue;
        };
        let value = (!value.is_empty()).then(|| value.to_string());
        let slot = match field {
            Field::Rank => &mut record.rank,
            Field::Name => &mut record.name,
            Field::KeyExpertise => &mut record.key_expertise,
            Field::Education => &mut record.education,
            Field::RecommendationReason => &mut record.recommendation_reason,
        };
        *slot = value;
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(parsed: &ParsedResponse) -> Vec<&str> {
        parsed
            .records
            .iter()
            .map(|r| r.name.as_deref().unwrap_or("?"))
            .collect()
    }

    fn block(rank: &str, name: &str) -> String {
        format!("MATCH_START\nRank: {rank}\nName: {name}\nMATCH_END\n")
    }

    #[test]
    fn test_two_blocks_sorted_by_rank() {
        let raw = "MATCH_START\nRank: 2\nName: A\nMATCH_END\nMATCH_START\nRank: 1\nName: B\nMATCH_END";
        let parsed = parse_response(raw).unwrap();
        assert_eq!(names(&parsed), vec!["B", "A"]);
        assert_eq!(parsed.ordering, RecordOrdering::Rank);
        assert_eq!(parsed.blocks_found, 2);
    }

    #[test]
    fn test_no_sentinels_is_no_parseable_matches() {
        let raw = "I'm sorry, I could not find any suitable lawyers.\nName: Nobody";
        assert_eq!(parse_response(raw), Err(ParseError::NoParseableMatches));
        assert_eq!(parse_response(""), Err(ParseError::NoParseableMatches));
    }

    #[test]
    fn test_missing_rank_falls_back_to_encounter_order() {
        let raw = format!(
            "{}MATCH_START\nName: NoRank\nMATCH_END\n{}",
            block("2", "Second"),
            block("1", "First")
        );
        let parsed = parse_response(&raw).unwrap();
        assert_eq!(names(&parsed), vec!["Second", "NoRank", "First"]);
        assert_eq!(parsed.ordering, RecordOrdering::Encounter);
    }

    #[test]
    fn test_non_numeric_rank_falls_back_without_dropping_records() {
        let raw = format!("{}{}{}", block("3", "C"), block("top", "T"), block("1", "A"));
        let parsed = parse_response(&raw).unwrap();
        assert_eq!(names(&parsed), vec!["C", "T", "A"]);
        assert_eq!(parsed.records[1].rank.as_deref(), Some("top"));
        assert_eq!(parsed.ordering, RecordOrdering::Encounter);
    }

    #[test]
    fn test_tied_ranks_keep_encounter_order() {
        let raw = format!(
            "{}{}{}{}",
            block("2", "X"),
            block("1", "Y"),
            block("2", "Z"),
            block("1", "W")
        );
        let parsed = parse_response(&raw).unwrap();
        assert_eq!(names(&parsed), vec!["Y", "W", "X", "Z"]);
    }

    #[test]
    fn test_preamble_and_trailing_text_are_ignored() {
        let raw = "Here are my picks: Rank: 99\n\
                   MATCH_START\nRank: 1\nName: Jane\nMATCH_END\nNote: trailing commentary\n";
        let parsed = parse_response(raw).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name.as_deref(), Some("Jane"));
        assert_eq!(parsed.records[0].numeric_rank(), Some(1));
    }

    #[test]
    fn test_splits_on_first_colon_only() {
        let raw = "MATCH_START\nRank: 1\nRecommendation Reason: Ratio: 3:1 wins in court\nMATCH_END";
        let parsed = parse_response(raw).unwrap();
        assert_eq!(
            parsed.records[0].recommendation_reason.as_deref(),
            Some("Ratio: 3:1 wins in court")
        );
    }

    #[test]
    fn test_full_block_fields_and_unknown_labels() {
        let raw = "MATCH_START\r\n\
                   Rank: 1\r\n\
                   Name:  Jane Doe \r\n\
                   Key Expertise: Corporate Law, M&A\r\n\
                   Education: Yale Law School J.D.\r\n\
                   Recommendation Reason: Led SaaS acquisitions\r\n\
                   Hourly Rate: $900\r\n\
                   a line of stray prose\r\n\
                   MATCH_END";
        let parsed = parse_response(raw).unwrap();
        let record = &parsed.records[0];
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.key_expertise.as_deref(), Some("Corporate Law, M&A"));
        assert_eq!(record.education.as_deref(), Some("Yale Law School J.D."));
        assert_eq!(
            record.recommendation_reason.as_deref(),
            Some("Led SaaS acquisitions")
        );
        assert!(record.contact.is_none());
    }

    #[test]
    fn test_blocks_without_recognized_labels_are_dropped() {
        let raw = format!(
            "MATCH_START\njust prose\nMATCH_END\n\
             MATCH_START\nHourly Rate: $900\nMATCH_END\n\
             MATCH_START\nName:\nMATCH_END\n{}",
            block("1", "Kept")
        );
        let parsed = parse_response(&raw).unwrap();
        assert_eq!(parsed.blocks_found, 4);
        assert_eq!(names(&parsed), vec!["Kept"]);
        assert_eq!(parsed.ordering, RecordOrdering::Rank);
    }

    #[test]
    fn test_blocks_with_nothing_recognized_is_ok_and_empty() {
        let raw = "MATCH_START\nnothing here\nMATCH_END";
        let parsed = parse_response(raw).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.blocks_found, 1);
        assert_eq!(parsed.ordering, RecordOrdering::Encounter);
    }

    #[test]
    fn test_unterminated_final_block_is_still_parsed() {
        let raw = format!("{}MATCH_START\nRank: 1\nName: Cut Off", block("2", "Whole"));
        let parsed = parse_response(&raw).unwrap();
        assert_eq!(names(&parsed), vec!["Cut Off", "Whole"]);
    }

    #[test]
    fn test_repeated_label_last_value_wins() {
        let raw = "MATCH_START\nName: First\nName: Second\nMATCH_END";
        let parsed = parse_response(raw).unwrap();
        assert_eq!(parsed.records[0].name.as_deref(), Some("Second"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = format!("{}{}{}", block("2", "B"), block("x", "X"), block("1", "A"));
        assert_eq!(parse_response(&raw), parse_response(&raw));
        let raw = format!("{}{}", block("2", "B"), block("1", "A"));
        assert_eq!(parse_response(&raw), parse_response(&raw));
    }

    #[test]
    fn test_n_ranked_blocks_yield_n_sorted_records() {
        let raw: String = [5, 3, 4, 1, 2]
            .iter()
            .map(|r| block(&r.to_string(), &format!("P{r}")))
            .collect();
        let parsed = parse_response(&raw).unwrap();
        assert_eq!(names(&parsed), vec!["P1", "P2", "P3", "P4", "P5"]);
    }
}
