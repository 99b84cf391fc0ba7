//! Dream/Target/Safe classification of catalog candidates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::catalog::filter_catalog;
use super::domain::{Profile, University};
use super::error::AdvisingError;
use super::scoring::GpaStanding;

pub const DREAM_CAP: usize = 3;
pub const TARGET_CAP: usize = 4;
pub const SAFE_CAP: usize = 3;

/// Acceptance rate assumed for universities that do not publish one.
pub const NEUTRAL_ACCEPTANCE_RATE: f32 = 50.0;

/// Coarse admission difficulty relative to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Dream,
    Target,
    Safe,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Dream => "dream",
            Tier::Target => "target",
            Tier::Safe => "safe",
        }
    }

    pub const fn cap(self) -> usize {
        match self {
            Tier::Dream => DREAM_CAP,
            Tier::Target => TARGET_CAP,
            Tier::Safe => SAFE_CAP,
        }
    }

    pub const fn risk_level(self) -> RiskLevel {
        match self {
            Tier::Dream => RiskLevel::High,
            Tier::Target => RiskLevel::Medium,
            Tier::Safe => RiskLevel::Low,
        }
    }

    pub const fn fit_reason(self) -> &'static str {
        match self {
            Tier::Dream => "Competitive admission, but your profile shows potential",
            Tier::Target => "Good match for your academic profile and budget",
            Tier::Safe => "High acceptance rate with good program quality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A catalog entry annotated with why it landed in its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedUniversity {
    #[serde(flatten)]
    pub university: University,
    pub fit_reason: &'static str,
    pub risk_level: RiskLevel,
}

/// Capped, disjoint recommendation lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub dream: Vec<RecommendedUniversity>,
    pub target: Vec<RecommendedUniversity>,
    pub safe: Vec<RecommendedUniversity>,
}

impl Recommendations {
    pub fn tier(&self, tier: Tier) -> &[RecommendedUniversity] {
        match tier {
            Tier::Dream => &self.dream,
            Tier::Target => &self.target,
            Tier::Safe => &self.safe,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut Vec<RecommendedUniversity> {
        match tier {
            Tier::Dream => &mut self.dream,
            Tier::Target => &mut self.target,
            Tier::Safe => &mut self.safe,
        }
    }

    pub fn len(&self) -> usize {
        self.dream.len() + self.target.len() + self.safe.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecommendedUniversity> {
        self.dream
            .iter()
            .chain(self.target.iter())
            .chain(self.safe.iter())
    }
}

/// Tier for a single candidate, ignoring caps.
pub fn classify(profile: &Profile, university: &University) -> Tier {
    let acceptance_rate = university
        .acceptance_rate
        .unwrap_or(NEUTRAL_ACCEPTANCE_RATE);
    let min_gpa = university.min_gpa();

    if acceptance_rate < 20.0 || GpaStanding::assess(profile.gpa, min_gpa).is_stretch() {
        Tier::Dream
    } else if acceptance_rate < 50.0 || GpaStanding::meets_minimum(profile.gpa, min_gpa) {
        Tier::Target
    } else {
        Tier::Safe
    }
}

/// Order in which candidates compete for tier slots: best ranked first,
/// unranked last, then cheaper tuition, then name and id.
fn cap_priority(left: &University, right: &University) -> Ordering {
    let rank = |university: &University| university.ranking.unwrap_or(u32::MAX);
    rank(left)
        .cmp(&rank(right))
        .then_with(|| left.tuition_per_year.cmp(&right.tuition_per_year))
        .then_with(|| left.name.cmp(&right.name))
        .then_with(|| left.id.cmp(&right.id))
}

/// Classify already-filtered candidates, dropping anything past its tier's cap.
pub fn classify_candidates(profile: &Profile, mut candidates: Vec<&University>) -> Recommendations {
    candidates.sort_by(|left, right| cap_priority(left, right));

    let mut recommendations = Recommendations::default();
    for university in candidates {
        let tier = classify(profile, university);
        let slot = recommendations.tier_mut(tier);
        if slot.len() >= tier.cap() {
            continue;
        }
        slot.push(RecommendedUniversity {
            university: university.clone(),
            fit_reason: tier.fit_reason(),
            risk_level: tier.risk_level(),
        });
    }

    recommendations
}

/// Filter the catalog for a profile and classify the survivors.
pub fn filter_and_classify(
    profile: Option<&Profile>,
    catalog: &[University],
) -> Result<Recommendations, AdvisingError> {
    let profile = profile.ok_or(AdvisingError::ProfileIncomplete)?;
    let candidates = filter_catalog(profile, catalog);
    Ok(classify_candidates(profile, candidates))
}
