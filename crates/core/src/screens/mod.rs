//! Screen controllers.
//!
//! One controller per screen of the ward dashboard: admission, patient
//! detail/notes, discharge, specialties, and daily reports. Controllers are
//! generic over [`PatientStore`](crate::store::PatientStore) and hold their
//! fetched data as [`ScreenState`](crate::screen::ScreenState). Errors are
//! contained within the screen that triggered them; no controller ever
//! propagates a failure to another screen.

pub mod admission;
pub mod detail;
pub mod discharge;
pub mod reports;
pub mod specialties;
