//! Reaction / engagement ledger
//!
//! Per-user, per-target, per-kind toggles with an immediate local view and an
//! eventually consistent remote ledger.
//!
//! # Reacting vs contributing
//!
//! Tapping a reaction-bar icon ([`ReactionLedger::toggle`]) is free. Leaving a
//! prayer or guidance comment ([`ReactionLedger::contribute`]) latches the
//! matching reaction and credits the actor with XP on its Off→On transition.
//!
//! ```ignore
//! let ledger = ReactionLedger::new(backend.clone());
//! let outcome = ledger.toggle(&viewer, &mut view, ReactionKind::Like).await?;
//! if !outcome.is_synced() {
//!     view.rollback(&outcome.flip);
//! }
//! ```

mod ledger;
mod policy;
mod view;

pub use ledger::{Contribution, ReactionLedger, SyncStatus, ToggleOutcome};
pub use policy::{available_reactions, comments_available, reaction_available};
pub use view::{EngagementView, LocalFlip};
