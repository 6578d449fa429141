//! HTTP store client.
//!
//! Speaks a PostgREST-style dialect: equality filters as `col=eq.value` query
//! parameters, ordering as `order=col.desc`, inserts via POST with
//! `Prefer: return=representation`, updates via PATCH scoped by filter.
//! Credentials, when configured, are sent as both an `apikey` header and a
//! bearer token.

use super::PatientStore;
use crate::config::WardConfig;
use crate::error::{WardError, WardResult};
use crate::model::{Mrn, NewNote, NewPatient, Note, Patient, PatientSummary, Specialty};
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use std::time::Duration;

const PATIENTS: &str = "patients";
const PATIENT_NOTES: &str = "patient_notes";
const SPECIALTIES: &str = "specialties";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote [`PatientStore`] backed by an HTTP relational store.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

/// Formats a PostgREST equality filter value.
fn eq(value: &str) -> String {
    format!("eq.{value}")
}

impl RestStore {
    /// Creates a store client from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `WardError::InvalidInput` for a store-less configuration, or
    /// `WardError::StoreRequest` if the HTTP client cannot be built.
    pub fn new(cfg: &WardConfig) -> WardResult<Self> {
        let base_url = cfg
            .store_url()
            .ok_or_else(|| WardError::InvalidInput("no store URL configured".into()))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(WardError::StoreRequest)?;

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: cfg.api_key().map(str::to_owned),
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn request(&self, method: Method, collection: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.collection_url(collection));
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        builder
    }

    async fn expect_success(response: Response) -> WardResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(WardError::StoreStatus {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> WardResult<T> {
        let bytes = response.bytes().await.map_err(WardError::StoreRequest)?;
        serde_json::from_slice(&bytes).map_err(WardError::StoreDecode)
    }
}

impl PatientStore for RestStore {
    async fn insert_patient(&self, new: &NewPatient) -> WardResult<Patient> {
        // `on_conflict=submission_id` with ignore-duplicates makes a retried
        // submission a no-op that returns zero rows; a genuine MRN collision
        // still surfaces as 409.
        let response = self
            .request(Method::POST, PATIENTS)
            .query(&[("on_conflict", "submission_id")])
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(new)
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        if response.status() == StatusCode::CONFLICT {
            return Err(WardError::DuplicateMrn(new.mrn.to_string()));
        }

        let response = Self::expect_success(response).await?;
        let rows: Vec<Patient> = Self::decode(response).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(row),
            // The earlier attempt already persisted this submission.
            None => self
                .find_patient(&new.mrn)
                .await?
                .ok_or(WardError::EmptyReply("patients insert")),
        }
    }

    async fn find_patient(&self, mrn: &Mrn) -> WardResult<Option<Patient>> {
        let response = self
            .request(Method::GET, PATIENTS)
            .query(&[("mrn", eq(mrn.as_str()))])
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        let response = Self::expect_success(response).await?;
        let rows: Vec<Patient> = Self::decode(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn active_patients(&self) -> WardResult<Vec<PatientSummary>> {
        let response = self
            .request(Method::GET, PATIENTS)
            .query(&[
                ("discharged", "eq.false"),
                ("select", "mrn,name,admission_date,specialty"),
            ])
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        let response = Self::expect_success(response).await?;
        Self::decode(response).await
    }

    async fn discharge_patient(&self, mrn: &Mrn) -> WardResult<DateTime<Utc>> {
        // Scoping the update to discharged=false makes the transition one-way:
        // an already-discharged row matches nothing and keeps its timestamp.
        let now = Utc::now();
        let response = self
            .request(Method::PATCH, PATIENTS)
            .query(&[("mrn", eq(mrn.as_str())), ("discharged", eq("false"))])
            .header("Prefer", "return=representation")
            .json(&json!({ "discharged": true, "discharge_date": now }))
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        let response = Self::expect_success(response).await?;
        let rows: Vec<Patient> = Self::decode(response).await?;
        if let Some(row) = rows.into_iter().next() {
            return Ok(row.discharge_date.unwrap_or(now));
        }

        match self.find_patient(mrn).await? {
            Some(patient) if patient.discharged => Ok(patient.discharge_date.unwrap_or(now)),
            Some(_) => Err(WardError::DischargeNotApplied(mrn.to_string())),
            None => Err(WardError::UnknownMrn(mrn.to_string())),
        }
    }

    async fn notes_for_patient(&self, mrn: &Mrn) -> WardResult<Vec<Note>> {
        let response = self
            .request(Method::GET, PATIENT_NOTES)
            .query(&[
                ("patient_mrn", eq(mrn.as_str())),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        let response = Self::expect_success(response).await?;
        Self::decode(response).await
    }

    async fn insert_note(&self, new: &NewNote) -> WardResult<Note> {
        let response = self
            .request(Method::POST, PATIENT_NOTES)
            .header("Prefer", "return=representation")
            .json(new)
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        let response = Self::expect_success(response).await?;
        let rows: Vec<Note> = Self::decode(response).await?;
        rows.into_iter()
            .next()
            .ok_or(WardError::EmptyReply("patient_notes insert"))
    }

    async fn list_specialties(&self) -> WardResult<Vec<Specialty>> {
        let response = self
            .request(Method::GET, SPECIALTIES)
            .query(&[("select", "id,name,patient_count")])
            .send()
            .await
            .map_err(WardError::StoreRequest)?;

        let response = Self::expect_success(response).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> RestStore {
        let cfg = WardConfig::new(
            "http://store.local/".into(),
            Some("secret".into()),
            vec!["Cardiology".into()],
        )
        .unwrap();
        RestStore::new(&cfg).unwrap()
    }

    #[test]
    fn collection_urls_have_no_double_slash() {
        let store = test_store();
        assert_eq!(store.collection_url(PATIENTS), "http://store.local/patients");
        assert_eq!(
            store.collection_url(PATIENT_NOTES),
            "http://store.local/patient_notes"
        );
        assert_eq!(
            store.collection_url(SPECIALTIES),
            "http://store.local/specialties"
        );
    }

    #[test]
    fn eq_filter_formats_postgrest_style() {
        assert_eq!(eq("M100"), "eq.M100");
        assert_eq!(eq("false"), "eq.false");
    }

    #[test]
    fn store_less_config_cannot_build_a_client() {
        let cfg = WardConfig::local(None).unwrap();
        let err = RestStore::new(&cfg).unwrap_err();
        assert!(matches!(err, WardError::InvalidInput(_)));
    }

    #[test]
    fn missing_api_key_is_allowed() {
        let cfg = WardConfig::new("http://store.local".into(), None, vec!["Cardiology".into()])
            .unwrap();
        let store = RestStore::new(&cfg).unwrap();
        assert!(store.api_key.is_none());
    }
}
