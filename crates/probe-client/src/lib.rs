//! Search service access for Probe.
//!
//! - `SearchClient` talks to the console's `/search` endpoint over HTTP
//! - `Catalog` is an in-memory stand-in used for offline demos

mod catalog;
mod client;
mod response;

pub use catalog::Catalog;
pub use client::SearchClient;
pub use response::{decode, SearchResponse};
