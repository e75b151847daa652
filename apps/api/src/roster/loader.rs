//! Reads the roster CSV, tolerating the encodings exported
//! spreadsheets tend to arrive in.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::professional::{name_key, ProfessionalRecord};
use crate::roster::Roster;

pub const NAME_COLUMN: &str = "Attorney";
pub const CONTACT_COLUMN: &str = "Work Email";
pub const EDUCATION_COLUMN: &str = "Education";
pub const EXPERTISE_COLUMN: &str = "Summary and Expertise";

/// Encodings tried after any byte-order mark, in order.
const FALLBACK_ENCODINGS: &[&Encoding] = &[UTF_8, WINDOWS_1252];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Roster file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Could not decode roster file {} (tried: {})", .path.display(), .attempted.join(", "))]
    DecodeFailure {
        path: PathBuf,
        attempted: Vec<&'static str>,
    },

    #[error("Roster is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed roster CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl RosterError {
    /// Stable error code surfaced to HTTP callers.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::DecodeFailure { .. } => "ROSTER_DECODE_FAILED",
            _ => "ROSTER_UNAVAILABLE",
        }
    }
}

/// Loads and normalizes the roster at `path`.
pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RosterError::NotFound(path.to_path_buf()),
        _ => RosterError::Io(e),
    })?;

    let (text, encoding) = decode_roster_bytes(&bytes).map_err(|attempted| {
        RosterError::DecodeFailure {
            path: path.to_path_buf(),
            attempted,
        }
    })?;
    debug!("Decoded roster {} as {}", path.display(), encoding);

    let records = parse_roster_csv(&text)?;
    info!(
        "Loaded {} professionals from {} ({})",
        records.len(),
        path.display(),
        encoding
    );

    Ok(Roster::new(records))
}

/// Decodes raw roster bytes. On failure returns the names of every encoding tried.
pub fn decode_roster_bytes(bytes: &[u8]) -> Result<(String, &'static str), Vec<&'static str>> {
    let mut attempted = Vec::new();

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        attempted.push(encoding.name());
        if let Some(text) = try_decode(encoding, &bytes[bom_len..]) {
            return Ok((text, encoding.name()));
        }
    }

    for &encoding in FALLBACK_ENCODINGS {
        if attempted.contains(&encoding.name()) {
            continue;
        }
        attempted.push(encoding.name());
        if let Some(text) = try_decode(encoding, bytes) {
            return Ok((text, encoding.name()));
        }
    }

    Err(attempted)
}

fn try_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
    let accepted = if encoding.is_single_byte() {
        looks_like_text(&text)
    } else {
        !text.contains('\0')
    };
    accepted.then(|| text.into_owned())
}

/// Single-byte encodings accept any input; control characters mean we decoded binary data.
fn looks_like_text(text: &str) -> bool {
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
}

/// Parses decoded CSV text into records. Extra columns are ignored.
pub fn parse_roster_csv(text: &str) -> Result<Vec<ProfessionalRecord>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(RosterError::MissingColumn(name))
    };
    let name_idx = column(NAME_COLUMN)?;
    let contact_idx = column(CONTACT_COLUMN)?;
    let education_idx = column(EDUCATION_COLUMN)?;
    let expertise_idx = column(EXPERTISE_COLUMN)?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default();

        let record = ProfessionalRecord::new(
            field(name_idx),
            field(contact_idx),
            field(education_idx),
            field(expertise_idx),
        );

        let Some(name) = record.name() else {
            warn!("Skipping roster row {}: no name", idx + 1);
            continue;
        };
        if !seen.insert(name_key(name)) {
            warn!("Skipping roster row {}: duplicate name '{}'", idx + 1, name);
            continue;
        }

        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Attorney,Work Email,Education,Summary and Expertise,Billable Hours\n";

    #[test]
    fn test_parse_reads_required_columns_in_order() {
        let csv = format!(
            "{HEADER}Jane Doe,jane@firm.com,Yale J.D.,\"Corporate Law, M&A\",120\n\
             John Roe,john@firm.com,NYU J.D.,Employment Law,80\n"
        );
        let records = parse_roster_csv(&csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), Some("Jane Doe"));
        assert_eq!(records[0].expertise(), Some("Corporate Law, M&A"));
        assert_eq!(records[1].contact(), Some("john@firm.com"));
    }

    #[test]
    fn test_parse_missing_column_is_reported() {
        let csv = "Attorney,Work Email,Education\nJane,j@x.com,Yale\n";
        let err = parse_roster_csv(csv).unwrap_err();
        assert!(matches!(err, RosterError::MissingColumn(EXPERTISE_COLUMN)));
    }

    #[test]
    fn test_parse_skips_blank_and_duplicate_names() {
        let csv = format!(
            "{HEADER}Jane Doe,a@x.com,,IP,1\n\
             ,b@x.com,,IP,1\n\
             jane doe,c@x.com,,Tax,1\n\
             N/A,d@x.com,,Tax,1\n"
        );
        let records = parse_roster_csv(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].contact(), Some("a@x.com"));
    }

    #[test]
    fn test_parse_skips_duplicate_names_differing_in_accented_case() {
        let csv = format!(
            "{HEADER}José Núñez,a@x.com,,Tax,1\n\
             JOSÉ NÚÑEZ,b@x.com,,Tax,1\n"
        );
        let records = parse_roster_csv(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].contact(), Some("a@x.com"));
    }

    #[test]
    fn test_parse_keeps_na_expertise_record() {
        let csv = format!("{HEADER}Jane Doe,a@x.com,Yale,na,1\n");
        let records = parse_roster_csv(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].expertise(), None);
    }

    #[test]
    fn test_decode_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("Attorney\nJosé\n".as_bytes());
        let (text, encoding) = decode_roster_bytes(&bytes).unwrap();
        assert_eq!(encoding, "UTF-8");
        assert!(text.starts_with("Attorney"));
        assert!(text.contains("José"));
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // "José" with é as a single 0xE9 byte is invalid UTF-8.
        let bytes = b"Attorney\nJos\xE9\n";
        let (text, encoding) = decode_roster_bytes(bytes).unwrap();
        assert_eq!(encoding, "windows-1252");
        assert!(text.contains("José"));
    }

    #[test]
    fn test_decode_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Attorney\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let (text, encoding) = decode_roster_bytes(&bytes).unwrap();
        assert_eq!(encoding, "UTF-16LE");
        assert_eq!(text, "Attorney\n");
    }

    #[test]
    fn test_decode_rejects_binary() {
        let bytes = [0x50, 0x4B, 0x03, 0x04, 0x00, 0x00, 0x9F, 0xFF];
        let attempted = decode_roster_bytes(&bytes).unwrap_err();
        assert_eq!(attempted, vec!["UTF-8", "windows-1252"]);
    }

    #[test]
    fn test_decode_utf8_keeps_stray_control_bytes() {
        // Vertical tab inside a cell and a trailing DOS EOF marker.
        let bytes = b"Attorney,Work Email,Education,Summary and Expertise\n\
                      Jane,j@x.com,Yale,\"Tax\x0BM&A\"\n\x1A";
        let (text, encoding) = decode_roster_bytes(bytes).unwrap();
        assert_eq!(encoding, "UTF-8");
        assert!(text.contains("Tax\u{b}M&A"));
        assert!(text.ends_with('\u{1a}'));
    }

    #[test]
    fn test_decode_utf8_with_nul_is_rejected() {
        let attempted = decode_roster_bytes(b"Attorney\nJane\x00Doe\n").unwrap_err();
        assert_eq!(attempted, vec!["UTF-8", "windows-1252"]);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_roster(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));
        assert_eq!(err.code(), "ROSTER_UNAVAILABLE");
    }

    #[test]
    fn test_load_binary_file_is_decode_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0x01, 0x02, 0xFF, 0xFE, 0x00]).unwrap();
        let err = load_roster(file.path()).unwrap_err();
        assert!(matches!(err, RosterError::DecodeFailure { .. }));
        assert_eq!(err.code(), "ROSTER_DECODE_FAILED");
    }

    #[test]
    fn test_load_latin1_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        file.write_all(b"Ren\xE9e Blanc,r@x.com,Sorbonne,Tax,1\n")
            .unwrap();
        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(
            roster.filter_by_practice_area(None)[0].name(),
            Some("Renée Blanc")
        );
    }
}
