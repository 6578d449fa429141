//! New patient admission.
//!
//! Validates the eight-field admission form locally, then issues a single
//! insert. Validation failures never reach the store and keep the form
//! intact; store failures keep both the form and the pending submission
//! token so a retry cannot create a duplicate row.

use crate::config::WardConfig;
use crate::error::{WardError, WardResult};
use crate::model::{Age, Gender, Mrn, NewPatient};
use crate::screen::ScreenState;
use crate::store::PatientStore;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;
use ward_types::NonEmptyText;

/// Fixed user-facing message for any store-side admission failure.
const ADMIT_FAILED: &str = "Failed to admit patient. Please try again.";

/// Raw admission form fields, exactly as entered.
#[derive(Debug, Clone, Default)]
pub struct AdmissionForm {
    pub mrn: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub admission_date: String,
    pub admission_time: String,
    pub doctor: String,
    pub specialty: String,
}

impl AdmissionForm {
    /// Validates the form into an insertable row.
    ///
    /// All eight fields are required; `age` must be a positive integer,
    /// `gender` one of male/female/other, the date `YYYY-MM-DD`, the time
    /// `HH:MM`, and the specialty one of the configured list.
    ///
    /// # Errors
    ///
    /// Returns `WardError::InvalidInput` carrying the user-facing message.
    pub fn validate(&self, cfg: &WardConfig, submission_id: Uuid) -> WardResult<NewPatient> {
        let required = [
            &self.mrn,
            &self.name,
            &self.age,
            &self.gender,
            &self.admission_date,
            &self.admission_time,
            &self.doctor,
            &self.specialty,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(WardError::InvalidInput("All fields are required.".into()));
        }

        let mrn = Mrn::new(&self.mrn)
            .map_err(|_| WardError::InvalidInput("All fields are required.".into()))?;
        let name = NonEmptyText::new(&self.name)
            .map_err(|_| WardError::InvalidInput("All fields are required.".into()))?;
        let doctor = NonEmptyText::new(&self.doctor)
            .map_err(|_| WardError::InvalidInput("All fields are required.".into()))?;

        let age = self
            .age
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(|years| Age::new(years).ok())
            .ok_or_else(|| {
                WardError::InvalidInput("Age must be a positive whole number.".into())
            })?;

        let gender = self
            .gender
            .parse::<Gender>()
            .map_err(|_| WardError::InvalidInput("Gender must be male, female or other.".into()))?;

        let admission_date = NaiveDate::parse_from_str(self.admission_date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                WardError::InvalidInput("Admission date must be in YYYY-MM-DD format.".into())
            })?;

        let time_raw = self.admission_time.trim();
        let admission_time = NaiveTime::parse_from_str(time_raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time_raw, "%H:%M:%S"))
            .map_err(|_| {
                WardError::InvalidInput("Admission time must be in HH:MM format.".into())
            })?;

        let specialty_raw = self.specialty.trim();
        if !cfg.is_known_specialty(specialty_raw) {
            return Err(WardError::InvalidInput(format!(
                "Unknown specialty: {specialty_raw}."
            )));
        }
        let specialty = NonEmptyText::new(specialty_raw)
            .map_err(|_| WardError::InvalidInput("All fields are required.".into()))?;

        Ok(NewPatient {
            mrn,
            name,
            age,
            gender,
            admission_date,
            admission_time,
            doctor,
            specialty,
            submission_id,
        })
    }
}

/// Admission screen controller.
///
/// `Ready(mrn)` means the patient was admitted and the caller should
/// navigate to the detail screen for that MRN.
pub struct AdmissionScreen<S> {
    store: Arc<S>,
    pub form: AdmissionForm,
    state: ScreenState<Mrn>,
    /// Idempotency token for the in-flight logical submission. Minted on the
    /// first attempt and kept across failed retries; cleared on success.
    pending_token: Option<Uuid>,
}

impl<S: PatientStore> AdmissionScreen<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            form: AdmissionForm::default(),
            state: ScreenState::Idle,
            pending_token: None,
        }
    }

    pub fn state(&self) -> &ScreenState<Mrn> {
        &self.state
    }

    /// Submits the current form.
    ///
    /// On success returns the admitted patient's MRN as the navigation
    /// target. On validation failure no store call is issued; on store
    /// failure one generic message is shown. Either way the form is kept for
    /// correction or retry.
    pub async fn submit(&mut self, cfg: &WardConfig) -> Option<Mrn> {
        let token = *self.pending_token.get_or_insert_with(Uuid::new_v4);

        let new = match self.form.validate(cfg, token) {
            Ok(new) => new,
            Err(err) => {
                self.state = ScreenState::Error(validation_message(err));
                return None;
            }
        };

        self.state = ScreenState::Loading;
        match self.store.insert_patient(&new).await {
            Ok(patient) => {
                self.pending_token = None;
                self.state = ScreenState::Ready(patient.mrn.clone());
                Some(patient.mrn)
            }
            Err(err) => {
                tracing::error!("admission insert failed: {err}");
                self.state = ScreenState::Error(ADMIT_FAILED.into());
                None
            }
        }
    }
}

fn validation_message(err: WardError) -> String {
    match err {
        WardError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}
