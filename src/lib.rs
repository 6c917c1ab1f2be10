//! My Faith core - progression and engagement
//!
//! Two small components sit on top of an opaque relational backend:
//!
//! 1. **Progression**: XP, fixed-width levels (500 XP each) and the sticky
//!    circle-creation unlock. Action deltas are written as one atomic patch.
//!
//! 2. **Engagement**: per-user, per-target, per-kind reaction toggles with an
//!    optimistic local view. Contributions (prayer or guidance comments) feed
//!    XP back into progression; plain reactions are free.
//!
//! The current profile and backend are always passed in explicitly.

pub mod config;
pub mod domain;
pub mod engagement;
pub mod error;
pub mod feed;
pub mod progression;
pub mod store;
pub mod timefmt;

pub use domain::*;
pub use error::CoreError;
