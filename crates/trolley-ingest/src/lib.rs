//! Specials-feed ingestion for trolley.
//!
//! Takes a normalized catalogue feed (one JSON document per store per week),
//! parses display prices and sizes into structured values, auto-categorizes
//! each line, and persists the batch: specials rows, price observations for
//! lines that map onto catalog products, and alert evaluation for the
//! products whose prices moved.

pub mod error;
pub mod feed;
pub mod import;
pub mod normalize;

pub use error::IngestError;
pub use feed::load_feed;
pub use import::{import_feed, ImportSummary};
