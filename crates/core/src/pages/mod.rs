//! Page sessions.
//!
//! A session holds the state of one screen and composes the stores, the data-fetch
//! functions and the reconcilers. Sessions contain no drawing code; the front end reads
//! their state and feeds them user events.

pub mod browse;
pub mod profile;
pub mod search;

pub use browse::BrowseSession;
pub use profile::ProfileSession;
pub use search::SearchSession;
