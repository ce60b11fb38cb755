//! # rollcall
//!
//! Session bootstrap, navigation guard, and auth store for a role-based
//! attendance app.
//!
//! Users sign in through an identity provider, are classified as student,
//! instructor, or director by their records in the `users` directory, and
//! are routed to the view for their highest role. The router's guard keeps
//! every navigation consistent with that role.

pub mod app;
pub mod config;
pub mod db;
pub mod roles;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;
