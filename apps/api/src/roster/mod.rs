// Roster: the professionals available for matching, plus the faceting and
// filtering the listing views need. Loaded once at startup; read-only afterward.

pub mod handlers;
pub mod loader;

use std::collections::BTreeSet;

use crate::models::professional::{ExpertiseTag, ProfessionalRecord};

pub use loader::{load_roster, RosterError};

/// Selecting this practice area means "no filter".
pub const ALL_PRACTICE_AREAS: &str = "All";

#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<ProfessionalRecord>,
}

impl Roster {
    pub fn new(records: Vec<ProfessionalRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Sorted, de-duplicated expertise tags across the whole roster.
    pub fn practice_areas(&self) -> Vec<ExpertiseTag> {
        self.records
            .iter()
            .flat_map(ProfessionalRecord::expertise_tags)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records whose expertise mentions `area` (case-insensitive), in roster order.
    /// `None` or [`ALL_PRACTICE_AREAS`] returns every record.
    pub fn filter_by_practice_area(&self, area: Option<&str>) -> Vec<&ProfessionalRecord> {
        let needle = match area.map(str::trim) {
            None | Some("") => return self.records.iter().collect(),
            Some(a) if a == ALL_PRACTICE_AREAS => return self.records.iter().collect(),
            Some(a) => a.to_lowercase(),
        };

        self.records
            .iter()
            .filter(|r| {
                r.expertise()
                    .map(|e| e.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Orders a subset for the card listing: by name, dropping anyone without listed expertise.
pub fn card_listing<'a>(subset: &[&'a ProfessionalRecord]) -> Vec<&'a ProfessionalRecord> {
    let mut cards: Vec<&ProfessionalRecord> = subset
        .iter()
        .copied()
        .filter(|r| r.expertise().is_some())
        .collect();
    cards.sort_by(|a, b| a.name().cmp(&b.name()));
    cards
}
