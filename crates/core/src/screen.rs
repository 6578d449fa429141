//! Per-screen fetch state.
//!
//! Every remote-backed screen tracks its data as a [`ScreenState`]: a tagged
//! Idle/Loading/Error/Ready state rather than ambient mutable flags, so
//! loading and error can never hold at the same time. [`FetchGen`] is the
//! companion generation counter that lets a screen discard the result of a
//! fetch that was superseded before it resolved.

/// Lifecycle of one screen's remotely fetched data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState<T> {
    /// No fetch has been started.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed; holds the user-facing message.
    Error(String),
    /// Data is available for display.
    Ready(T),
}

impl<T> ScreenState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    /// The held data, if ready.
    pub fn ready(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// The user-facing message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Monotonic fetch generation for one screen slot.
///
/// `begin()` marks the start of a new fetch and invalidates every earlier
/// one; a result is applied only if its generation `is_current`. This is the
/// guard against a superseded fetch overwriting newer state after the screen
/// has moved on.
#[derive(Debug, Default)]
pub struct FetchGen(u64);

impl FetchGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new fetch, returning its generation token.
    pub fn begin(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    /// Whether `generation` is still the latest fetch.
    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}
