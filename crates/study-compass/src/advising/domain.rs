use serde::{Deserialize, Serialize};

/// Identifier wrapper for a student account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniversityId(pub String);

/// Academic and preference snapshot a student submits during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub education_level: EducationLevel,
    pub degree: String,
    pub graduation_year: u16,
    #[serde(default)]
    pub gpa: Option<f32>,
    pub intended_degree: IntendedDegree,
    pub field_of_study: String,
    pub target_intake: String,
    pub preferred_countries: Vec<String>,
    pub budget_range: BudgetRange,
    pub funding_plan: FundingPlan,
    #[serde(default)]
    pub ielts_status: IeltsStatus,
    #[serde(default)]
    pub ielts_score: Option<f32>,
    #[serde(default)]
    pub gre_status: GreStatus,
    #[serde(default)]
    pub gre_score: Option<u16>,
    #[serde(default)]
    pub sop_status: SopStatus,
}

impl Profile {
    pub fn prefers_country(&self, country: &str) -> bool {
        self.preferred_countries
            .iter()
            .any(|preferred| preferred == country)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    Bachelors,
    Masters,
    Phd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntendedDegree {
    Bachelors,
    Masters,
    Mba,
    Phd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingPlan {
    SelfFunded,
    Scholarship,
    Loan,
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IeltsStatus {
    #[default]
    NotStarted,
    Preparing,
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreStatus {
    NotRequired,
    #[default]
    NotStarted,
    Preparing,
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SopStatus {
    #[default]
    NotStarted,
    Draft,
    Ready,
}

/// Ordinal annual budget bucket chosen during onboarding.
///
/// Values outside the four known buckets are kept verbatim so a stale or
/// hand-edited profile still classifies against the fallback ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetRange {
    Below20k,
    From20kTo40k,
    From40kTo60k,
    Above60k,
    Unrecognized(String),
}

impl BudgetRange {
    pub fn label(&self) -> &str {
        match self {
            BudgetRange::Below20k => "below_20k",
            BudgetRange::From20kTo40k => "20k_40k",
            BudgetRange::From40kTo60k => "40k_60k",
            BudgetRange::Above60k => "above_60k",
            BudgetRange::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for BudgetRange {
    fn from(value: String) -> Self {
        match value.trim() {
            "below_20k" => BudgetRange::Below20k,
            "20k_40k" => BudgetRange::From20kTo40k,
            "40k_60k" => BudgetRange::From40kTo60k,
            "above_60k" => BudgetRange::Above60k,
            _ => BudgetRange::Unrecognized(value),
        }
    }
}

impl From<BudgetRange> for String {
    fn from(value: BudgetRange) -> Self {
        value.label().to_string()
    }
}

/// Catalog entry maintained outside the advising core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: UniversityId,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub ranking: Option<u32>,
    pub tuition_per_year: u32,
    #[serde(default)]
    pub acceptance_rate: Option<f32>,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default)]
    pub requirements: Option<AdmissionRequirements>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl University {
    pub fn offers_program(&self, program: &str) -> bool {
        self.programs.iter().any(|offered| offered == program)
    }

    pub fn min_gpa(&self) -> Option<f32> {
        self.requirements
            .as_ref()
            .and_then(|requirements| requirements.min_gpa)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRequirements {
    #[serde(default, rename = "minGPA")]
    pub min_gpa: Option<f32>,
    #[serde(default, rename = "minIELTS")]
    pub min_ielts: Option<f32>,
    #[serde(default, rename = "minGRE")]
    pub min_gre: Option<u16>,
    #[serde(default, rename = "requiresGRE")]
    pub requires_gre: Option<bool>,
}

/// Problems detected while validating a submitted profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileViolation {
    #[error("at least one preferred country is required")]
    NoPreferredCountries,
    #[error("field of study must not be blank")]
    MissingFieldOfStudy,
    #[error("gpa {0} must be between 0 and 10")]
    GpaOutOfRange(f32),
    #[error("ielts score {0} must be between 0 and 9")]
    IeltsOutOfRange(f32),
    #[error("gre score {0} must be between 260 and 340")]
    GreOutOfRange(u16),
}

/// Check the bounds the onboarding form enforces before a profile is stored.
pub fn validate_profile(profile: &Profile) -> Result<(), ProfileViolation> {
    if profile
        .preferred_countries
        .iter()
        .all(|country| country.trim().is_empty())
    {
        return Err(ProfileViolation::NoPreferredCountries);
    }

    if profile.field_of_study.trim().is_empty() {
        return Err(ProfileViolation::MissingFieldOfStudy);
    }

    if let Some(gpa) = profile.gpa {
        if !(0.0..=10.0).contains(&gpa) {
            return Err(ProfileViolation::GpaOutOfRange(gpa));
        }
    }

    if let Some(score) = profile.ielts_score {
        if !(0.0..=9.0).contains(&score) {
            return Err(ProfileViolation::IeltsOutOfRange(score));
        }
    }

    if let Some(score) = profile.gre_score {
        if !(260..=340).contains(&score) {
            return Err(ProfileViolation::GreOutOfRange(score));
        }
    }

    Ok(())
}
