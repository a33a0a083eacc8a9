//! Boundary collaborators for dugout.
//!
//! The storage layer lives outside this crate; `loader` receives its row
//! batches and turns them into domain state.

mod loader;

pub use loader::{hydrate, InstanceBuilder, TableTag, TypedInstance, MAX_CLASSIFY_PASSES};
