//! Remote store access.
//!
//! The [`PatientStore`] trait is the complete remote surface this system
//! consumes: three collections (patients, patient notes, specialties) with
//! equality/ordering filters only. [`rest::RestStore`] talks to the real
//! backend over HTTP; [`memory::MemoryStore`] is an in-process implementation
//! used by tests and demo mode.
//!
//! The store alone is responsible for per-row atomicity. There are no
//! transactions spanning collections and no automatic retries; every failure
//! is terminal for that attempt.

pub mod memory;
pub mod rest;

use crate::error::WardResult;
use crate::model::{Mrn, NewNote, NewPatient, Note, Patient, PatientSummary, Specialty};
use chrono::{DateTime, Utc};

/// CRUD surface of the remote relational store.
///
/// Screens are generic over this trait, so every workflow can be exercised
/// against [`memory::MemoryStore`] without a network.
#[allow(async_fn_in_trait)]
pub trait PatientStore {
    /// Inserts a new patient row with `discharged` defaulted to false.
    ///
    /// A repeated `submission_id` is treated as the earlier insert: the
    /// existing row is returned and nothing is created. A different
    /// submission reusing an existing MRN is a
    /// [`WardError::DuplicateMrn`](crate::WardError::DuplicateMrn) error.
    async fn insert_patient(&self, new: &NewPatient) -> WardResult<Patient>;

    /// Fetches a single patient by exact MRN. `None` is a displayable
    /// not-found state, not an error.
    async fn find_patient(&self, mrn: &Mrn) -> WardResult<Option<Patient>>;

    /// Fetches all non-discharged patients, projected for the discharge
    /// screen.
    async fn active_patients(&self) -> WardResult<Vec<PatientSummary>>;

    /// Marks a patient discharged with a store-side timestamp.
    ///
    /// Discharge is one-way: a second attempt on an already-discharged
    /// patient is silently accepted and returns the original timestamp,
    /// never rewriting `discharge_date`. Discharging an unknown MRN is a
    /// [`WardError::UnknownMrn`](crate::WardError::UnknownMrn) error.
    async fn discharge_patient(&self, mrn: &Mrn) -> WardResult<DateTime<Utc>>;

    /// Fetches a patient's notes ordered by `created_at` descending. An empty
    /// list is valid.
    async fn notes_for_patient(&self, mrn: &Mrn) -> WardResult<Vec<Note>>;

    /// Inserts a note and returns the stored row, including the
    /// store-assigned id and timestamp.
    async fn insert_note(&self, new: &NewNote) -> WardResult<Note>;

    /// Fetches all specialties with their stored patient counts.
    async fn list_specialties(&self) -> WardResult<Vec<Specialty>>;
}
