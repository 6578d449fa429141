//! In-process store implementation.
//!
//! Backs tests and the CLI's demo mode. Behaviour matches what the real
//! backend is expected to enforce: unique MRNs, idempotent admission via
//! `submission_id`, and one-way discharge that never rewrites an earlier
//! `discharge_date`.

use super::PatientStore;
use crate::error::{WardError, WardResult};
use crate::model::{Mrn, NewNote, NewPatient, Note, Patient, PatientSummary, Specialty};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;
use ward_types::NonEmptyText;

#[derive(Default)]
struct Inner {
    patients: Vec<Patient>,
    /// submission_id → MRN of the row that submission created.
    submissions: HashMap<Uuid, Mrn>,
    notes: Vec<Note>,
    specialties: Vec<Specialty>,
}

/// In-memory [`PatientStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given specialties and counts.
    pub fn with_specialties(entries: &[(&str, u32)]) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for (name, patient_count) in entries {
                let name = match NonEmptyText::new(name) {
                    Ok(name) => name,
                    Err(_) => continue,
                };
                inner.specialties.push(Specialty {
                    id: Uuid::new_v4(),
                    name,
                    patient_count: *patient_count,
                });
            }
        }
        store
    }

    /// Total number of patient rows, discharged or not.
    pub fn patient_count(&self) -> usize {
        self.lock().patients.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PatientStore for MemoryStore {
    async fn insert_patient(&self, new: &NewPatient) -> WardResult<Patient> {
        let mut inner = self.lock();

        // Retried submission: hand back the row the first attempt created.
        if let Some(mrn) = inner.submissions.get(&new.submission_id).cloned() {
            if let Some(existing) = inner.patients.iter().find(|p| p.mrn == mrn) {
                return Ok(existing.clone());
            }
        }

        if inner.patients.iter().any(|p| p.mrn == new.mrn) {
            return Err(WardError::DuplicateMrn(new.mrn.to_string()));
        }

        let patient = Patient {
            mrn: new.mrn.clone(),
            name: new.name.clone(),
            age: new.age,
            gender: new.gender,
            admission_date: new.admission_date,
            admission_time: new.admission_time,
            doctor: new.doctor.clone(),
            specialty: new.specialty.clone(),
            discharged: false,
            discharge_date: None,
        };
        inner.submissions.insert(new.submission_id, new.mrn.clone());
        inner.patients.push(patient.clone());
        Ok(patient)
    }

    async fn find_patient(&self, mrn: &Mrn) -> WardResult<Option<Patient>> {
        let inner = self.lock();
        Ok(inner.patients.iter().find(|p| p.mrn == *mrn).cloned())
    }

    async fn active_patients(&self) -> WardResult<Vec<PatientSummary>> {
        let inner = self.lock();
        Ok(inner
            .patients
            .iter()
            .filter(|p| !p.discharged)
            .map(PatientSummary::from)
            .collect())
    }

    async fn discharge_patient(&self, mrn: &Mrn) -> WardResult<DateTime<Utc>> {
        let mut inner = self.lock();
        let patient = inner
            .patients
            .iter_mut()
            .find(|p| p.mrn == *mrn)
            .ok_or_else(|| WardError::UnknownMrn(mrn.to_string()))?;

        if patient.discharged {
            // One-way transition: keep the original timestamp. A discharged
            // row missing its timestamp is repaired rather than surfaced.
            return match patient.discharge_date {
                Some(ts) => Ok(ts),
                None => {
                    let now = Utc::now();
                    patient.discharge_date = Some(now);
                    Ok(now)
                }
            };
        }

        let now = Utc::now();
        patient.discharged = true;
        patient.discharge_date = Some(now);
        Ok(now)
    }

    async fn notes_for_patient(&self, mrn: &Mrn) -> WardResult<Vec<Note>> {
        let inner = self.lock();
        // Reverse insertion order first so that equal timestamps still come
        // out newest-first after the stable sort.
        let mut notes: Vec<Note> = inner
            .notes
            .iter()
            .rev()
            .filter(|n| n.patient_mrn == *mrn)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn insert_note(&self, new: &NewNote) -> WardResult<Note> {
        let mut inner = self.lock();
        let note = Note {
            id: Uuid::new_v4(),
            patient_mrn: new.patient_mrn.clone(),
            content: new.content.clone(),
            created_at: Utc::now(),
        };
        inner.notes.push(note.clone());
        Ok(note)
    }

    async fn list_specialties(&self) -> WardResult<Vec<Specialty>> {
        let inner = self.lock();
        Ok(inner.specialties.clone())
    }
}
