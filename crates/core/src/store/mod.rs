//! Client-side state shared between pages.
//!
//! These replace process-wide singletons: the binary creates one of each and hands
//! clones or references to the sessions that need them.

pub mod auth;
pub mod loading;

pub use auth::{AuthGate, AuthState, AuthStore};
pub use loading::{LoadingFlags, LoadingGuard};
