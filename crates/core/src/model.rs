//! Ward data model.
//!
//! Rows held by the remote store (patients, patient notes, specialties) plus
//! the session-local daily report. Field validation that must hold everywhere
//! lives on the types themselves: an `Mrn` is never empty, an `Age` is never
//! zero, a note's content is never blank.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use ward_types::{NonEmptyText, TextError};

/// Medical Record Number: the patient's unique external identifier.
///
/// Opaque, externally assigned, immutable. Compared case-sensitively; the
/// discharge screen's search filter lowercases separately for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mrn(NonEmptyText);

impl Mrn {
    /// Creates an `Mrn`, rejecting empty or whitespace-only input.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        NonEmptyText::new(input).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Mrn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A patient's age in whole years. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Age(u32);

impl Age {
    /// Creates an `Age`, rejecting zero.
    pub fn new(years: u32) -> Result<Self, String> {
        if years == 0 {
            return Err("age must be a positive integer".into());
        }
        Ok(Self(years))
    }

    pub fn years(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Age {
    type Error = String;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        Age::new(years)
    }
}

impl From<Age> for u32 {
    fn from(age: Age) -> u32 {
        age.0
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Patient gender as recorded on admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// A patient row as held by the remote store.
///
/// Created by the admission flow, mutated only by the discharge flow (one-way
/// `discharged` false→true), never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub mrn: Mrn,
    pub name: NonEmptyText,
    pub age: Age,
    pub gender: Gender,
    pub admission_date: NaiveDate,
    pub admission_time: NaiveTime,
    pub doctor: NonEmptyText,
    pub specialty: NonEmptyText,
    #[serde(default)]
    pub discharged: bool,
    #[serde(default)]
    pub discharge_date: Option<DateTime<Utc>>,
}

impl Patient {
    /// Whether the discharge fields are mutually consistent:
    /// `discharge_date` is set if and only if `discharged` is true.
    pub fn discharge_consistent(&self) -> bool {
        self.discharged == self.discharge_date.is_some()
    }
}

/// A new patient row to insert, produced by validating the admission form.
///
/// `submission_id` is a client-generated idempotency token. The admission
/// screen mints one per logical submission and reuses it across retries, so a
/// resubmit after an ambiguous failure cannot create a second row.
#[derive(Debug, Clone, Serialize)]
pub struct NewPatient {
    pub mrn: Mrn,
    pub name: NonEmptyText,
    pub age: Age,
    pub gender: Gender,
    pub admission_date: NaiveDate,
    pub admission_time: NaiveTime,
    pub doctor: NonEmptyText,
    pub specialty: NonEmptyText,
    pub submission_id: Uuid,
}

/// Projection of a patient row shown on the discharge screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub mrn: Mrn,
    pub name: NonEmptyText,
    pub admission_date: NaiveDate,
    pub specialty: NonEmptyText,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            mrn: patient.mrn.clone(),
            name: patient.name.clone(),
            admission_date: patient.admission_date,
            specialty: patient.specialty.clone(),
        }
    }
}

/// A clinical note attached to a patient. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub patient_mrn: Mrn,
    pub content: NonEmptyText,
    /// Assigned by the store at insert time.
    pub created_at: DateTime<Utc>,
}

/// A new note to insert. The id and timestamp are assigned by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    pub patient_mrn: Mrn,
    pub content: NonEmptyText,
}

/// A specialty with its denormalised active-patient count.
///
/// The count's source of truth is external; it is displayed as stored and
/// never recomputed on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: Uuid,
    pub name: NonEmptyText,
    pub patient_count: u32,
}

/// A daily ward report. Held in session memory only; append-only.
#[derive(Debug, Clone)]
pub struct DailyReport {
    pub id: Uuid,
    pub date: NaiveDate,
    pub content: NonEmptyText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mrn_rejects_blank_input() {
        assert!(Mrn::new("").is_err());
        assert!(Mrn::new("  ").is_err());
        assert_eq!(Mrn::new(" M100 ").unwrap().as_str(), "M100");
    }

    #[test]
    fn age_rejects_zero() {
        assert!(Age::new(0).is_err());
        assert_eq!(Age::new(34).unwrap().years(), 34);
    }

    #[test]
    fn age_deserialisation_enforces_positivity() {
        let err: Result<Age, _> = serde_json::from_str("0");
        assert!(err.is_err());
        let age: Age = serde_json::from_str("34").unwrap();
        assert_eq!(age.years(), 34);
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" male ".parse::<Gender>().unwrap(), Gender::Male);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn gender_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Other).unwrap(), "\"other\"");
    }

    #[test]
    fn patient_row_round_trips_with_defaulted_discharge_fields() {
        let json = r#"{
            "mrn": "M100",
            "name": "Alice",
            "age": 34,
            "gender": "female",
            "admission_date": "2024-01-10",
            "admission_time": "09:00:00",
            "doctor": "Dr. X",
            "specialty": "Cardiology"
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert!(!patient.discharged);
        assert!(patient.discharge_date.is_none());
        assert!(patient.discharge_consistent());
    }
}
