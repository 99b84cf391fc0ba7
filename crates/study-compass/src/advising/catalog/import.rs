use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::advising::domain::{AdmissionRequirements, University, UniversityId};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateId(String),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::DuplicateId(id) => {
                write!(f, "catalog contains university id '{}' more than once", id)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a university catalog from a CSV export, one row per university.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<University>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<University>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut universities = Vec::new();

        for record in csv_reader.deserialize::<CatalogRow>() {
            let row = record?;
            if !seen.insert(row.id.clone()) {
                return Err(CatalogImportError::DuplicateId(row.id));
            }
            universities.push(row.into_university());
        }

        Ok(universities)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    country: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default)]
    ranking: Option<u32>,
    tuition_per_year: u32,
    #[serde(default)]
    acceptance_rate: Option<f32>,
    #[serde(default)]
    programs: String,
    #[serde(default)]
    min_gpa: Option<f32>,
    #[serde(default)]
    min_ielts: Option<f32>,
    #[serde(default)]
    min_gre: Option<u16>,
    #[serde(default)]
    requires_gre: Option<bool>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    website: Option<String>,
}

impl CatalogRow {
    fn into_university(self) -> University {
        let requirements = AdmissionRequirements {
            min_gpa: self.min_gpa,
            min_ielts: self.min_ielts,
            min_gre: self.min_gre,
            requires_gre: self.requires_gre,
        };
        let requirements = if requirements == AdmissionRequirements::default() {
            None
        } else {
            Some(requirements)
        };

        University {
            id: UniversityId(self.id),
            name: self.name,
            country: self.country,
            city: self.city,
            ranking: self.ranking,
            tuition_per_year: self.tuition_per_year,
            acceptance_rate: self.acceptance_rate,
            programs: split_programs(&self.programs),
            requirements,
            description: self.description,
            website: self.website,
        }
    }
}

fn split_programs(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|program| !program.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
