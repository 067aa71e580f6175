//! Campus event listings: a public view, a gated admin view, and the store
//! they share. Front ends drive everything through `Campus`.

/// Both views, the handlers that change them, and intent dispatch.
pub mod campus;
pub use campus::{Campus, Confirm, EventDraft, Intent, Outcome};

/// Errors from handling intents.
pub mod error;
pub use error::{Error, Result, ValidationError};

/// A single event record and its stored date format.
pub mod event;
pub use event::Event;

/// Search over rendered public cards.
pub mod filter;

/// Projecting events into the public and admin views.
pub mod render;
pub use render::{AdminRow, AdminView, EventCard, PublicView};

/// The admin session flag.
pub mod session;
pub use session::SessionGate;

/// Key/value storage backends.
pub mod storage;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// The persisted event list.
pub mod store;
pub use store::EventStore;
