//! Hand-authored staffing guidance appended to every prompt.
//!
//! The body is configuration data, not derived from the roster. It is passed to
//! the model as an unverified hint; nothing here is checked against roster data.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Version tag of the built-in sample body.
pub const DEFAULT_HEURISTICS_VERSION: &str = "ogc-2024.03";

/// Placeholder sample guidance. The attorney names are illustrative and do not come
/// from any roster; deployments supply the firm's real guidance via `HEURISTICS_PATH`.
const DEFAULT_HEURISTICS_BODY: &str = "\
Practice area guidance:
- Intellectual property and software licensing: prefer attorneys who list both IP and \
technology transactions; Priya Raman and Daniel Osei handle most licensing work.
- SaaS agreements and technology transactions: Daniel Osei is the first call; Grace Whitfield \
covers enterprise procurement reviews.
- Business startups, formation and corporate governance: Marcus Bell and Elena Rossi; Elena \
also advises early-stage boards.
- Mergers and acquisitions: Marcus Bell leads technology-sector deals; pair with a tax \
attorney when the deal involves asset transfers.
- Employment matters: route to the employment group; no employment lawyer works more than \
85 hours per month, so favour attorneys with lighter current loads.
- Privacy and data protection: only recommend attorneys who list privacy explicitly.

Availability and specialization notes:
- Attorneys marked as litigation-only should not be recommended for transactional work.
- Where two attorneys are equally qualified, prefer the one whose expertise list is narrower \
and closer to the client need.
- Do not recommend anyone whose expertise is not listed.";

/// A versioned heuristics body. Swap it by pointing `HEURISTICS_PATH` at a JSON file
/// shaped like `{"version": "...", "body": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristics {
    pub version: String,
    pub body: String,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            version: DEFAULT_HEURISTICS_VERSION.to_string(),
            body: DEFAULT_HEURISTICS_BODY.to_string(),
        }
    }
}

impl Heuristics {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read heuristics file: {}", path.display()))?;
        let heuristics: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse heuristics file: {}", path.display()))?;
        anyhow::ensure!(
            !heuristics.version.trim().is_empty(),
            "Heuristics file {} has an empty version",
            path.display()
        );
        Ok(heuristics)
    }

    /// Loads from `path` when given, otherwise the built-in body.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
