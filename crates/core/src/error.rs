//! Crate-wide error type.

/// Everything that can go wrong across configuration, store access and
/// screen actions. Screens translate these into fixed user-facing messages;
/// the variants carry the detail that goes to the logs.
#[derive(Debug, thiserror::Error)]
pub enum WardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("a patient with MRN {0} already exists")]
    DuplicateMrn(String),
    #[error("no patient with MRN {0}")]
    UnknownMrn(String),
    #[error("store request failed: {0}")]
    StoreRequest(reqwest::Error),
    #[error("store returned HTTP {status}: {body}")]
    StoreStatus { status: u16, body: String },
    #[error("failed to decode store response: {0}")]
    StoreDecode(serde_json::Error),
    #[error("store returned no rows for {0}")]
    EmptyReply(&'static str),
    #[error("discharge update for MRN {0} was not applied")]
    DischargeNotApplied(String),
    #[error("failed to read config file: {0}")]
    ConfigRead(std::io::Error),
    #[error("failed to parse config file: {0}")]
    ConfigParse(serde_yaml::Error),
    #[error("failed to write report file: {0}")]
    ReportWrite(std::io::Error),
}

pub type WardResult<T> = std::result::Result<T, WardError>;
