//! Async orchestration around the pure scorekeeping core.
//!
//! The runtime owns the persistence gateway, the scoring session lifecycle
//! (`open → record/tick → confirm → close`), the three-way commit pipeline,
//! and the background clock ticker. Clients hold a session behind an async
//! mutex and a [`ticker::ClockHandle`] for clock control; everything else
//! is a direct call on the session.
pub mod boxscore;
pub mod commit;
pub mod events;
pub mod gateway;
pub mod prefs;
pub mod session;
pub mod store;
pub mod ticker;

pub use boxscore::{BoxScore, box_score};
pub use commit::{CommitError, CommitLeg, CommitReceipt, LegFailure, commit};
pub use events::SessionEvent;
pub use gateway::Gateway;
pub use prefs::{ClockPrefs, PrefsStore};
pub use session::{ScoringSession, SessionError};
pub use store::{Collection, Entity, Predicate, SortOrder, SortSpec, StoreError};
pub use ticker::{ClockHandle, ClockTicker};
