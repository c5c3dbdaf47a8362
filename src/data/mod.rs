//! Datensatz-Plumbing: Schlüssel, Fetch-Aufträge, Session-Cache, Parsing.

pub mod cache;
pub mod dataset;
pub mod parse;

pub use cache::{CacheLookup, DatasetPayload, GeometryCache};
pub use dataset::{DatasetKey, DatasetKind, FetchRequest};
pub use parse::parse_payload;
