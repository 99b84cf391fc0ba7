//! Shared academic scoring used by both tier classification and profile strength.

use serde::Serialize;

use super::domain::{GreStatus, IeltsStatus, Profile, SopStatus};

/// Margin above a stated minimum GPA below which an admission is still a stretch.
pub const STRETCH_MARGIN: f32 = 0.5;

/// How a student's GPA compares with a university's stated minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaStanding {
    /// The university publishes no minimum GPA.
    NoRequirement,
    /// A minimum exists but the student has not reported a GPA.
    Unknown,
    /// Below `min + STRETCH_MARGIN`.
    Stretch,
    /// At or above `min + STRETCH_MARGIN`.
    Comfortable,
}

impl GpaStanding {
    pub fn assess(gpa: Option<f32>, min_gpa: Option<f32>) -> Self {
        match (gpa, min_gpa) {
            (_, None) => GpaStanding::NoRequirement,
            (None, Some(_)) => GpaStanding::Unknown,
            (Some(gpa), Some(min)) if gpa < min + STRETCH_MARGIN => GpaStanding::Stretch,
            (Some(_), Some(_)) => GpaStanding::Comfortable,
        }
    }

    pub fn is_stretch(self) -> bool {
        matches!(self, GpaStanding::Stretch)
    }

    /// Whether the GPA clears every stated minimum (vacuously true with none).
    ///
    /// A stretch standing may still meet the minimum itself, which is why the
    /// raw values are rechecked instead of deriving this from the variant.
    pub fn meets_minimum(gpa: Option<f32>, min_gpa: Option<f32>) -> bool {
        match (gpa, min_gpa) {
            (_, None) => true,
            (Some(gpa), Some(min)) => gpa >= min,
            (None, Some(_)) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademicStrength {
    Strong,
    Average,
    Weak,
}

impl AcademicStrength {
    pub fn from_gpa(gpa: Option<f32>) -> Self {
        match gpa {
            Some(gpa) if gpa >= 8.0 => AcademicStrength::Strong,
            Some(gpa) if gpa >= 6.0 => AcademicStrength::Average,
            _ => AcademicStrength::Weak,
        }
    }

    fn points(self) -> u8 {
        match self {
            AcademicStrength::Strong => 40,
            AcademicStrength::Average => 25,
            AcademicStrength::Weak => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamReadiness {
    Completed,
    InProgress,
    NotStarted,
}

impl ExamReadiness {
    pub fn from_profile(profile: &Profile) -> Self {
        let ielts_done = profile.ielts_status == IeltsStatus::Completed;
        let gre_done = profile.gre_status == GreStatus::Completed;
        let ielts_moving = matches!(
            profile.ielts_status,
            IeltsStatus::Preparing | IeltsStatus::Scheduled
        );
        let gre_moving = matches!(
            profile.gre_status,
            GreStatus::Preparing | GreStatus::Scheduled
        );

        if ielts_done && gre_done {
            ExamReadiness::Completed
        } else if ielts_moving || gre_moving {
            ExamReadiness::InProgress
        } else {
            ExamReadiness::NotStarted
        }
    }

    fn points(self) -> u8 {
        match self {
            ExamReadiness::Completed => 30,
            ExamReadiness::InProgress => 15,
            ExamReadiness::NotStarted => 0,
        }
    }
}

fn sop_points(status: SopStatus) -> u8 {
    match status {
        SopStatus::Ready => 30,
        SopStatus::Draft => 15,
        SopStatus::NotStarted => 0,
    }
}

/// Readiness breakdown shown on the student's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStrength {
    pub academics: AcademicStrength,
    pub exams: ExamReadiness,
    pub sop: SopStatus,
    /// 0 to 100.
    pub overall: u8,
}

impl ProfileStrength {
    pub fn assess(profile: &Profile) -> Self {
        let academics = AcademicStrength::from_gpa(profile.gpa);
        let exams = ExamReadiness::from_profile(profile);
        let overall = academics.points() + exams.points() + sop_points(profile.sop_status);

        Self {
            academics,
            exams,
            sop: profile.sop_status,
            overall,
        }
    }
}
