//! Client-side auth state.
//!
//! DESIGN
//! ======
//! `auth` holds the reactive loading/user pair the store owns; `session`
//! holds the signed-in user folded from directory records.

pub mod auth;
pub mod session;
