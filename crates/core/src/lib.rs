//! # Terrace Core
//!
//! Client-side logic for Terrace, a service for curated lists of places on a map.
//!
//! This crate holds everything below the screen:
//! - Typed data-fetch functions over a pluggable [`http::HttpClient`]
//! - Shared stores for the signed-in user and the named loading flags
//! - Map reconciliation: marker sets derived from state and pushed to a [`map::MapWidget`]
//! - Browse-mode selection with stale-response protection
//! - The list draft used by the add-list page, with local validation and submission
//!
//! **No drawing concerns**: widgets, terminals and page layout belong to the front end that
//! embeds this crate.

pub mod api;
pub mod config;
pub mod constants;
pub mod draft;
mod error;
pub mod http;
pub mod map;
pub mod pages;
pub mod routes;
pub mod selection;
pub mod store;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use api::{CreateListOutcome, ListPage, TerraceApi};
pub use config::ClientConfig;
pub use error::{TerraceError, TerraceResult};
pub use http::{HttpClient, ReqwestClient};
