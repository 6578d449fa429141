//! # Ward Core
//!
//! Core logic for the ward administration dashboard.
//!
//! This crate contains the data model, remote store access, and per-screen
//! controllers:
//! - Validated domain types for patients, notes, specialties and reports
//! - A [`store::PatientStore`] trait with a REST client and an in-memory
//!   implementation for tests and demos
//! - Screen controllers under [`screens`] driving admission, detail,
//!   discharge, specialties and daily reports
//!
//! **No presentation concerns**: terminal or web rendering belongs in the
//! binaries that consume this crate.

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod screen;
pub mod screens;
pub mod store;

pub use config::WardConfig;
pub use error::{WardError, WardResult};
pub use model::{
    Age, DailyReport, Gender, Mrn, NewNote, NewPatient, Note, Patient, PatientSummary, Specialty,
};
pub use screen::ScreenState;
pub use store::{memory::MemoryStore, rest::RestStore, PatientStore};
