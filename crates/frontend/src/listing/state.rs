//! Resource list state machine.
//!
//! ```text
//!            FetchStarted(g)
//!   Idle ───────────────────▶ Loading(g) ──FetchSucceeded(g)──▶ Loaded(g)
//!    ▲                          │   ▲                              │
//!    │ Reset                    │   └────────FetchStarted(g')──────┤
//!    └──────────────────────────┴──FetchFailed(g)──▶ Error(g) ─────┘
//! ```
//!
//! Every fetch is tagged with a generation issued by the effect runner. A
//! completion only applies while the state is `Loading` with the same
//! generation; anything else is a stale response and is dropped.

use catalogix_core::ListBody;

/// Monotonic fetch number issued by the effect runner.
pub type Generation = u64;

/// Observable state of a resource list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    /// Nothing requested yet, or the dependency key went away.
    Idle,
    /// A fetch is in flight.
    Loading { generation: Generation },
    /// The latest fetch succeeded.
    Loaded {
        generation: Generation,
        items: Vec<T>,
    },
    /// The latest fetch failed. `message` is user-facing and generic.
    Error {
        generation: Generation,
        message: &'static str,
    },
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ListState<T> {
    /// Generation of the fetch this state belongs to, if any.
    #[must_use]
    pub const fn generation(&self) -> Option<Generation> {
        match self {
            Self::Idle => None,
            Self::Loading { generation }
            | Self::Loaded { generation, .. }
            | Self::Error { generation, .. } => Some(*generation),
        }
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Loaded items, if the latest fetch succeeded.
    #[must_use]
    pub fn items(&self) -> Option<&[T]> {
        match self {
            Self::Loaded { items, .. } => Some(items),
            _ => None,
        }
    }

    /// User-facing error message, if the latest fetch failed.
    #[must_use]
    pub const fn error(&self) -> Option<&'static str> {
        match self {
            Self::Error { message, .. } => Some(*message),
            _ => None,
        }
    }
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    /// The dependency key is gone; forget everything.
    Reset,
    /// A fetch with this generation was issued.
    FetchStarted { generation: Generation },
    /// A fetch completed with a body.
    FetchSucceeded {
        generation: Generation,
        body: ListBody<T>,
    },
    /// A fetch failed. Details are logged by the runner, not kept here.
    FetchFailed {
        generation: Generation,
        message: &'static str,
    },
}

/// Pure transition function.
#[must_use]
pub fn reduce<T>(state: ListState<T>, event: ListEvent<T>) -> ListState<T> {
    match event {
        ListEvent::Reset => ListState::Idle,
        ListEvent::FetchStarted { generation } => {
            if state.generation().is_some_and(|current| current > generation) {
                state
            } else {
                ListState::Loading { generation }
            }
        }
        ListEvent::FetchSucceeded { generation, body } => match state {
            ListState::Loading { generation: current } if current == generation => {
                ListState::Loaded {
                    generation,
                    items: body.into_items(),
                }
            }
            stale => stale,
        },
        ListEvent::FetchFailed {
            generation,
            message,
        } => match state {
            ListState::Loading { generation: current } if current == generation => {
                ListState::Error {
                    generation,
                    message,
                }
            }
            stale => stale,
        },
    }
}
