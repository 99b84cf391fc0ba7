use tracing::debug;

use super::AdvisingService;
use crate::advising::catalog::CatalogQuery;
use crate::advising::domain::{StudentId, University, UniversityId};
use crate::advising::error::AdvisingError;
use crate::advising::repository::AdvisingStore;
use crate::advising::tiers::{filter_and_classify, Recommendations};

impl<S> AdvisingService<S>
where
    S: AdvisingStore + 'static,
{
    /// Browse the catalog, ordered by ranking.
    pub fn universities(&self, query: &CatalogQuery) -> Result<Vec<University>, AdvisingError> {
        let catalog = self.store.universities()?;
        Ok(query.apply(catalog))
    }

    pub fn university(&self, id: &UniversityId) -> Result<University, AdvisingError> {
        self.store
            .university(id)?
            .ok_or(AdvisingError::NotFound("university"))
    }

    /// Categorized recommendations for the student's current profile.
    pub fn recommend(&self, student_id: &StudentId) -> Result<Recommendations, AdvisingError> {
        let profile = self.store.profile(student_id)?;
        let catalog = self.store.universities()?;
        let recommendations = filter_and_classify(profile.as_ref(), &catalog)?;

        debug!(
            student = %student_id.0,
            dream = recommendations.dream.len(),
            target = recommendations.target.len(),
            safe = recommendations.safe.len(),
            "classified catalog candidates"
        );

        Ok(recommendations)
    }
}
