//! Read-only specialties listing.

use crate::error::WardError;
use crate::model::Specialty;
use crate::screen::{FetchGen, ScreenState};
use crate::store::PatientStore;
use std::sync::Arc;

const SPECIALTIES_FETCH_FAILED: &str = "Failed to fetch specialties";

/// Specialties screen controller. No mutations; an empty listing is a valid
/// ready state.
pub struct SpecialtiesScreen<S> {
    store: Arc<S>,
    specialties: ScreenState<Vec<Specialty>>,
    gen: FetchGen,
}

impl<S: PatientStore> SpecialtiesScreen<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            specialties: ScreenState::Idle,
            gen: FetchGen::new(),
        }
    }

    pub fn specialties(&self) -> &ScreenState<Vec<Specialty>> {
        &self.specialties
    }

    pub async fn load(&mut self) {
        let generation = self.gen.begin();
        self.specialties = ScreenState::Loading;

        let result = self.store.list_specialties().await;
        self.apply(generation, result);
    }

    /// Applies a fetch result, discarding it if superseded.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<Specialty>, WardError>) {
        if !self.gen.is_current(generation) {
            return;
        }
        self.specialties = match result {
            Ok(specialties) => ScreenState::Ready(specialties),
            Err(err) => {
                tracing::error!("specialties fetch failed: {err}");
                ScreenState::Error(SPECIALTIES_FETCH_FAILED.into())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn lists_specialties_as_stored() {
        let store = Arc::new(MemoryStore::with_specialties(&[
            ("Cardiology", 12),
            ("Neurology", 4),
        ]));
        let mut screen = SpecialtiesScreen::new(store);
        screen.load().await;

        let specialties = screen.specialties().ready().unwrap();
        assert_eq!(specialties.len(), 2);
        assert_eq!(specialties[0].name.as_str(), "Cardiology");
        assert_eq!(specialties[0].patient_count, 12);
    }

    #[tokio::test]
    async fn empty_listing_is_ready_not_error() {
        let mut screen = SpecialtiesScreen::new(Arc::new(MemoryStore::new()));
        screen.load().await;

        assert_eq!(screen.specialties().ready(), Some(&Vec::new()));
        assert_eq!(screen.specialties().error(), None);
    }
}
