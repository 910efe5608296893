//! Offline lookup over GTFOBins (Unix) and LOLBAS (Windows).
//!
//! Sources are fetched into a clone root (`fetcher`), decoded and normalized
//! into canonical binaries (`sources`, `ingest`), collected into a `Catalog`,
//! and queried (`query`, `command`) before being rendered (`report`).

pub mod catalog;
pub mod command;
pub mod config;
pub mod fetcher;
pub mod ingest;
pub mod query;
pub mod report;
pub mod sources;

pub use catalog::{
    Binary, BinaryBuilder, CapabilityEntry, CapabilityName, Catalog, Example, KnownCapability,
    Platform, PlatformFilter, UNIX_CAPABILITIES, WINDOWS_CAPABILITIES, canonical_windows_category,
};
pub use command::{Request, canonical_query_capability, execute};
pub use config::Settings;
pub use fetcher::{FetchOutcome, FetchWarning, GitFetcher, RepositoryFetcher, refresh_sources};
pub use ingest::{IngestError, IngestReport, SourceWarning, ingest, ingest_roots, scan_source};
pub use query::{QueryEngine, QueryError, capability_details, has_capability};
pub use report::Report;
pub use sources::{GTFOBINS, LOLBAS, SourceKind, SourceRecord, normalize};
