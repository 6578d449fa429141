//! Patient discharge.
//!
//! Loads every non-discharged patient, filters locally on each keystroke,
//! and issues the one-way discharge update. A successful discharge removes
//! the row from the loaded list without a re-fetch and records a
//! confirmation for the user.

use crate::error::WardError;
use crate::model::{Mrn, PatientSummary};
use crate::screen::{FetchGen, ScreenState};
use crate::store::PatientStore;
use std::sync::Arc;

const PATIENTS_FETCH_FAILED: &str = "Failed to fetch patients";
const DISCHARGE_FAILED: &str = "Failed to discharge patient";

/// Discharge screen controller.
pub struct DischargeScreen<S> {
    store: Arc<S>,
    patients: ScreenState<Vec<PatientSummary>>,
    gen: FetchGen,
    /// Search box contents; matched against name and MRN on every keystroke.
    pub search: String,
    confirmation: Option<String>,
    /// Message from the last failed discharge action, cleared on success.
    action_error: Option<String>,
}

impl<S: PatientStore> DischargeScreen<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            patients: ScreenState::Idle,
            gen: FetchGen::new(),
            search: String::new(),
            confirmation: None,
            action_error: None,
        }
    }

    pub fn patients(&self) -> &ScreenState<Vec<PatientSummary>> {
        &self.patients
    }

    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref()
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Fetches all non-discharged patients.
    pub async fn load(&mut self) {
        let generation = self.gen.begin();
        self.patients = ScreenState::Loading;

        let result = self.store.active_patients().await;
        self.apply(generation, result);
    }

    /// Applies a fetch result, discarding it if superseded.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<PatientSummary>, WardError>) {
        if !self.gen.is_current(generation) {
            return;
        }
        self.patients = match result {
            Ok(patients) => ScreenState::Ready(patients),
            Err(err) => {
                tracing::error!("active patient fetch failed: {err}");
                ScreenState::Error(PATIENTS_FETCH_FAILED.into())
            }
        };
    }

    /// The loaded patients whose name or MRN contains the search term,
    /// case-insensitively. An empty search returns the full loaded set;
    /// a screen that is not ready shows nothing.
    pub fn filtered(&self) -> Vec<&PatientSummary> {
        let Some(patients) = self.patients.ready() else {
            return Vec::new();
        };
        let needle = self.search.to_lowercase();
        patients
            .iter()
            .filter(|p| {
                p.name.as_str().to_lowercase().contains(&needle)
                    || p.mrn.as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Discharges one patient from the currently displayed filtered set.
    ///
    /// Requests for MRNs not currently displayed are ignored. On success the
    /// row is removed from the loaded list (no re-fetch) and a confirmation
    /// message is recorded; on failure the list is untouched and one generic
    /// error message is shown.
    pub async fn discharge(&mut self, mrn: &Mrn) {
        let displayed = self.filtered().iter().any(|p| p.mrn == *mrn);
        if !displayed {
            return;
        }

        match self.store.discharge_patient(mrn).await {
            Ok(_) => {
                if let ScreenState::Ready(patients) = &mut self.patients {
                    patients.retain(|p| p.mrn != *mrn);
                }
                self.confirmation =
                    Some(format!("Patient {mrn} has been successfully discharged."));
                self.action_error = None;
            }
            Err(err) => {
                tracing::error!("discharge failed for {mrn}: {err}");
                self.action_error = Some(DISCHARGE_FAILED.into());
            }
        }
    }
}
