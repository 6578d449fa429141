//! Patient detail and notes.
//!
//! Two independent fetches for one MRN: the patient record and its notes.
//! Neither blocks the other, and a missing patient is a displayable
//! not-found state rather than an error. New notes are prepended
//! optimistically from the store's returned row, with a re-fetch available
//! as the reconciliation path.

use crate::error::WardError;
use crate::model::{Mrn, NewNote, Note, Patient};
use crate::screen::{FetchGen, ScreenState};
use crate::store::PatientStore;
use std::sync::Arc;
use ward_types::NonEmptyText;

const PATIENT_FETCH_FAILED: &str = "Failed to fetch patient data";
const NOTES_FETCH_FAILED: &str = "Failed to fetch patient notes";
const NOTE_ADD_FAILED: &str = "Failed to add new note";

/// Result of the patient fetch. Zero matches is terminal but normal.
#[derive(Debug, Clone, PartialEq)]
pub enum PatientLookup {
    Found(Patient),
    NotFound,
}

/// Patient detail screen controller for one MRN.
pub struct DetailScreen<S> {
    store: Arc<S>,
    mrn: Mrn,
    patient: ScreenState<PatientLookup>,
    notes: ScreenState<Vec<Note>>,
    patient_gen: FetchGen,
    notes_gen: FetchGen,
    /// Draft note text; kept untouched when an insert fails.
    pub draft: String,
    /// Message from the last failed note insert, cleared on success. Kept
    /// apart from `notes` so a failed add never hides the loaded list.
    note_error: Option<String>,
}

impl<S: PatientStore> DetailScreen<S> {
    pub fn new(store: Arc<S>, mrn: Mrn) -> Self {
        Self {
            store,
            mrn,
            patient: ScreenState::Idle,
            notes: ScreenState::Idle,
            patient_gen: FetchGen::new(),
            notes_gen: FetchGen::new(),
            draft: String::new(),
            note_error: None,
        }
    }

    pub fn mrn(&self) -> &Mrn {
        &self.mrn
    }

    pub fn patient(&self) -> &ScreenState<PatientLookup> {
        &self.patient
    }

    pub fn notes(&self) -> &ScreenState<Vec<Note>> {
        &self.notes
    }

    pub fn note_error(&self) -> Option<&str> {
        self.note_error.as_deref()
    }

    /// Fetches the patient record. Independent of the notes fetch.
    pub async fn load_patient(&mut self) {
        let generation = self.patient_gen.begin();
        self.patient = ScreenState::Loading;

        let result = self.store.find_patient(&self.mrn).await;
        self.apply_patient(generation, result);
    }

    /// Applies a patient fetch result, discarding it if superseded.
    pub fn apply_patient(
        &mut self,
        generation: u64,
        result: Result<Option<Patient>, WardError>,
    ) {
        if !self.patient_gen.is_current(generation) {
            return;
        }
        self.patient = match result {
            Ok(Some(patient)) => ScreenState::Ready(PatientLookup::Found(patient)),
            Ok(None) => ScreenState::Ready(PatientLookup::NotFound),
            Err(err) => {
                tracing::error!("patient fetch failed for {}: {err}", self.mrn);
                ScreenState::Error(PATIENT_FETCH_FAILED.into())
            }
        };
    }

    /// Fetches the notes list, newest first. Independent of the patient
    /// fetch; also serves as the reconciliation re-fetch after optimistic
    /// updates.
    pub async fn load_notes(&mut self) {
        let generation = self.notes_gen.begin();
        self.notes = ScreenState::Loading;

        let result = self.store.notes_for_patient(&self.mrn).await;
        self.apply_notes(generation, result);
    }

    /// Applies a notes fetch result, discarding it if superseded.
    pub fn apply_notes(&mut self, generation: u64, result: Result<Vec<Note>, WardError>) {
        if !self.notes_gen.is_current(generation) {
            return;
        }
        self.notes = match result {
            Ok(notes) => ScreenState::Ready(notes),
            Err(err) => {
                tracing::error!("notes fetch failed for {}: {err}", self.mrn);
                ScreenState::Error(NOTES_FETCH_FAILED.into())
            }
        };
    }

    /// Begins a notes fetch without awaiting it, for callers that drive the
    /// request themselves and apply via [`apply_notes`](Self::apply_notes).
    pub fn begin_notes_fetch(&mut self) -> u64 {
        let generation = self.notes_gen.begin();
        self.notes = ScreenState::Loading;
        generation
    }

    /// Submits the current draft as a new note.
    ///
    /// Empty or whitespace-only drafts are rejected locally without a store
    /// call. On success the returned row is prepended to the loaded list and
    /// the draft is cleared; on failure the draft is left untouched.
    pub async fn add_note(&mut self) {
        let content = match NonEmptyText::new(&self.draft) {
            Ok(content) => content,
            Err(_) => return,
        };

        let new = NewNote {
            patient_mrn: self.mrn.clone(),
            content,
        };
        match self.store.insert_note(&new).await {
            Ok(note) => {
                match &mut self.notes {
                    ScreenState::Ready(notes) => notes.insert(0, note),
                    state => *state = ScreenState::Ready(vec![note]),
                }
                self.draft.clear();
                self.note_error = None;
            }
            Err(err) => {
                tracing::error!("note insert failed for {}: {err}", self.mrn);
                self.note_error = Some(NOTE_ADD_FAILED.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Age, Gender, NewPatient};
    use crate::store::memory::MemoryStore;
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::atomic::{AtomicBool, Ordering};
    use uuid::Uuid;

    async fn admitted_store(mrn: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_patient(&NewPatient {
                mrn: Mrn::new(mrn).unwrap(),
                name: NonEmptyText::new("Alice").unwrap(),
                age: Age::new(34).unwrap(),
                gender: Gender::Female,
                admission_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                admission_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                doctor: NonEmptyText::new("Dr. X").unwrap(),
                specialty: NonEmptyText::new("Cardiology").unwrap(),
                submission_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn loads_patient_and_empty_notes_independently() {
        let store = admitted_store("M100").await;
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());

        screen.load_patient().await;
        screen.load_notes().await;

        match screen.patient().ready() {
            Some(PatientLookup::Found(patient)) => assert_eq!(patient.name.as_str(), "Alice"),
            other => panic!("expected found patient, got {other:?}"),
        }
        assert_eq!(screen.notes().ready(), Some(&vec![]));
    }

    #[tokio::test]
    async fn unknown_mrn_is_a_not_found_state() {
        let store = admitted_store("M100").await;
        let mut screen = DetailScreen::new(store, Mrn::new("M404").unwrap());

        screen.load_patient().await;
        assert_eq!(screen.patient().ready(), Some(&PatientLookup::NotFound));
        assert_eq!(screen.patient().error(), None);
    }

    #[tokio::test]
    async fn add_note_prepends_and_clears_draft() {
        let store = admitted_store("M100").await;
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());
        screen.load_notes().await;

        screen.draft = "Stable overnight".into();
        screen.add_note().await;

        let notes = screen.notes().ready().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content.as_str(), "Stable overnight");
        assert!(screen.draft.is_empty());
        assert_eq!(screen.note_error(), None);

        screen.draft = "Improving".into();
        screen.add_note().await;
        let notes = screen.notes().ready().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].content.as_str(), "Improving");
    }

    #[tokio::test]
    async fn blank_draft_is_rejected_without_store_call() {
        let store = admitted_store("M100").await;
        let mut screen = DetailScreen::new(store.clone(), Mrn::new("M100").unwrap());
        screen.load_notes().await;

        screen.draft = "   ".into();
        screen.add_note().await;

        assert_eq!(screen.notes().ready(), Some(&vec![]));
        assert!(store
            .notes_for_patient(&Mrn::new("M100").unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn optimistic_list_matches_store_after_refetch() {
        let store = admitted_store("M100").await;
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());
        screen.load_notes().await;

        screen.draft = "Stable overnight".into();
        screen.add_note().await;
        let optimistic: Vec<Uuid> =
            screen.notes().ready().unwrap().iter().map(|n| n.id).collect();

        screen.load_notes().await;
        let refetched: Vec<Uuid> =
            screen.notes().ready().unwrap().iter().map(|n| n.id).collect();
        assert_eq!(optimistic, refetched);
    }

    /// Store wrapper whose configured operations fail with a server error,
    /// leaving the rest delegated.
    struct FailingStore {
        inner: MemoryStore,
        fail_reads: bool,
        fail_note_insert: AtomicBool,
    }

    impl FailingStore {
        fn server_error() -> WardError {
            WardError::StoreStatus {
                status: 500,
                body: "internal error".into(),
            }
        }
    }

    impl PatientStore for FailingStore {
        async fn insert_patient(
            &self,
            new: &crate::model::NewPatient,
        ) -> crate::error::WardResult<Patient> {
            self.inner.insert_patient(new).await
        }

        async fn find_patient(
            &self,
            mrn: &Mrn,
        ) -> crate::error::WardResult<Option<Patient>> {
            if self.fail_reads {
                return Err(Self::server_error());
            }
            self.inner.find_patient(mrn).await
        }

        async fn active_patients(
            &self,
        ) -> crate::error::WardResult<Vec<crate::model::PatientSummary>> {
            self.inner.active_patients().await
        }

        async fn discharge_patient(
            &self,
            mrn: &Mrn,
        ) -> crate::error::WardResult<chrono::DateTime<chrono::Utc>> {
            self.inner.discharge_patient(mrn).await
        }

        async fn notes_for_patient(&self, mrn: &Mrn) -> crate::error::WardResult<Vec<Note>> {
            if self.fail_reads {
                return Err(Self::server_error());
            }
            self.inner.notes_for_patient(mrn).await
        }

        async fn insert_note(&self, new: &NewNote) -> crate::error::WardResult<Note> {
            if self.fail_note_insert.load(Ordering::SeqCst) {
                return Err(Self::server_error());
            }
            self.inner.insert_note(new).await
        }

        async fn list_specialties(
            &self,
        ) -> crate::error::WardResult<Vec<crate::model::Specialty>> {
            self.inner.list_specialties().await
        }
    }

    #[tokio::test]
    async fn failed_note_insert_keeps_draft_and_reports_error() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
            fail_reads: false,
            fail_note_insert: AtomicBool::new(true),
        });
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());
        screen.load_notes().await;

        screen.draft = "Stable overnight".into();
        screen.add_note().await;

        assert_eq!(screen.note_error(), Some(NOTE_ADD_FAILED));
        assert_eq!(screen.draft, "Stable overnight");
        // The loaded list is untouched by the failed insert.
        assert_eq!(screen.notes().ready(), Some(&vec![]));
    }

    #[tokio::test]
    async fn note_error_clears_once_a_retry_succeeds() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
            fail_reads: false,
            fail_note_insert: AtomicBool::new(true),
        });
        let mut screen = DetailScreen::new(store.clone(), Mrn::new("M100").unwrap());
        screen.load_notes().await;

        screen.draft = "Stable overnight".into();
        screen.add_note().await;
        assert_eq!(screen.note_error(), Some(NOTE_ADD_FAILED));

        store.fail_note_insert.store(false, Ordering::SeqCst);
        screen.add_note().await;

        assert_eq!(screen.note_error(), None);
        assert!(screen.draft.is_empty());
        let notes = screen.notes().ready().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content.as_str(), "Stable overnight");
    }

    #[tokio::test]
    async fn failed_patient_fetch_shows_the_fixed_message() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
            fail_reads: true,
            fail_note_insert: AtomicBool::new(false),
        });
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());

        screen.load_patient().await;
        assert_eq!(screen.patient().error(), Some(PATIENT_FETCH_FAILED));
        assert_eq!(screen.patient().ready(), None);
    }

    #[tokio::test]
    async fn failed_notes_fetch_shows_the_fixed_message() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
            fail_reads: true,
            fail_note_insert: AtomicBool::new(false),
        });
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());

        screen.load_notes().await;
        assert_eq!(screen.notes().error(), Some(NOTES_FETCH_FAILED));
        assert_eq!(screen.notes().ready(), None);
    }

    #[tokio::test]
    async fn stale_notes_result_is_discarded() {
        let store = admitted_store("M100").await;
        let mut screen = DetailScreen::new(store, Mrn::new("M100").unwrap());

        let stale = screen.begin_notes_fetch();
        let current = screen.begin_notes_fetch();

        // The superseded fetch resolves late; its result must not apply.
        screen.apply_notes(stale, Ok(vec![]));
        assert!(screen.notes().is_loading());

        screen.apply_notes(current, Ok(vec![]));
        assert_eq!(screen.notes().ready(), Some(&vec![]));
    }
}
