//! Canonical binary catalog.
//!
//! Both knowledge bases (GTFOBins for Unix, LOLBAS for Windows) normalize into
//! the types here. `identity` holds the platform and capability vocabularies,
//! `model` the `Binary` entity, and `index` the append-only `Catalog` the
//! query engine reads from.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{
    CapabilityName, KnownCapability, Platform, PlatformFilter, UNIX_CAPABILITIES,
    WINDOWS_CAPABILITIES, canonical_windows_category,
};
pub use index::Catalog;
pub use model::{Binary, BinaryBuilder, CapabilityEntry, Example};
