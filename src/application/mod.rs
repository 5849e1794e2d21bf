//! Application layer - the session lifecycle and message-relay engine.
//!
//! Composition, leaves first: [`TranslationRelay`] (no internal dependents),
//! [`RoomRegistry`] (single source of truth for active rooms),
//! [`LifecycleController`] (state transitions), [`MessageRouter`]
//! (per-message resolution, translation, and role-framed delivery).

mod lifecycle;
mod registry;
mod relay;
mod router;

pub use lifecycle::LifecycleController;
pub use registry::{JoinOutcome, Removal, RoomRegistry};
pub use relay::TranslationRelay;
pub use router::MessageRouter;
