//! Catalog narrowing: which universities are even eligible for a given profile.

mod import;

pub use import::{CatalogImportError, CatalogImporter};

use serde::Deserialize;

use super::domain::{BudgetRange, Profile, University};

/// Ceiling applied when a profile carries a budget bucket we do not recognize.
pub const FALLBACK_BUDGET_CEILING: u32 = 50_000;

/// Annual tuition ceiling implied by a budget bucket.
pub fn budget_ceiling(range: &BudgetRange) -> u32 {
    match range {
        BudgetRange::Below20k => 20_000,
        BudgetRange::From20kTo40k => 40_000,
        BudgetRange::From40kTo60k => 60_000,
        BudgetRange::Above60k => 100_000,
        BudgetRange::Unrecognized(_) => FALLBACK_BUDGET_CEILING,
    }
}

/// True when the university sits in a preferred country, offers the profile's
/// field, and fits under the budget ceiling.
pub fn matches_profile(profile: &Profile, university: &University) -> bool {
    profile.prefers_country(&university.country)
        && university.offers_program(&profile.field_of_study)
        && university.tuition_per_year <= budget_ceiling(&profile.budget_range)
}

/// Narrow the catalog to the candidates eligible for classification.
///
/// Output order follows the input; classification re-sorts before capping.
pub fn filter_catalog<'a, I>(profile: &Profile, catalog: I) -> Vec<&'a University>
where
    I: IntoIterator<Item = &'a University>,
{
    catalog
        .into_iter()
        .filter(|university| matches_profile(profile, university))
        .collect()
}

/// Optional filters for browsing the catalog directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub max_tuition: Option<u32>,
}

impl CatalogQuery {
    pub fn matches(&self, university: &University) -> bool {
        if let Some(country) = &self.country {
            if &university.country != country {
                return false;
            }
        }

        if let Some(program) = &self.program {
            if !university.offers_program(program) {
                return false;
            }
        }

        match self.max_tuition {
            Some(max) => university.tuition_per_year <= max,
            None => true,
        }
    }

    /// Apply the filters and order by ranking, unranked entries last.
    pub fn apply(&self, catalog: Vec<University>) -> Vec<University> {
        let mut matches: Vec<University> = catalog
            .into_iter()
            .filter(|university| self.matches(university))
            .collect();
        matches.sort_by(|left, right| {
            left.ranking
                .unwrap_or(u32::MAX)
                .cmp(&right.ranking.unwrap_or(u32::MAX))
                .then_with(|| left.name.cmp(&right.name))
        });
        matches
    }
}
