//! External collaborators of the store and router.
//!
//! ARCHITECTURE
//! ============
//! Each collaborator sits behind a trait so the store can be driven by the
//! real adapters in `main` and by in-memory doubles in tests.

pub mod analytics;
pub mod directory;
pub mod google;
pub mod identity;
pub mod toast;
