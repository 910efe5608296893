//! In-memory catalog of canonical binaries for one run.
//!
//! The catalog is append-only while sources are ingested and read-only once
//! queries start. Alongside the binaries it remembers which capability names
//! each platform actually declared, so open-ended Windows categories can be
//! validated without rescanning.

use crate::catalog::{Binary, CapabilityName, Platform, PlatformFilter};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    binaries: Vec<Binary>,
    observed: BTreeSet<(Platform, CapabilityName)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append without dedup; both platforms may carry the same name.
    pub fn add(&mut self, binary: Binary) {
        for name in binary.capability_names() {
            self.observed.insert((binary.platform(), name.clone()));
        }
        self.binaries.push(binary);
    }

    /// Every binary, in insertion order.
    pub fn all(&self) -> &[Binary] {
        &self.binaries
    }

    /// Binaries admitted by `filter`, in insertion order.
    pub fn filtered(&self, filter: PlatformFilter) -> impl Iterator<Item = &Binary> {
        self.binaries
            .iter()
            .filter(move |binary| filter.includes(binary.platform()))
    }

    pub fn count(&self, platform: Platform) -> usize {
        self.binaries
            .iter()
            .filter(|binary| binary.platform() == platform)
            .count()
    }

    pub fn len(&self) -> usize {
        self.binaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty()
    }

    /// Whether any binary of `platform` declared `name`.
    pub fn has_observed(&self, platform: Platform, name: &CapabilityName) -> bool {
        self.observed.contains(&(platform, name.clone()))
    }

    /// Capability names declared by binaries of `platform`, sorted.
    pub fn observed_capabilities(&self, platform: Platform) -> Vec<&CapabilityName> {
        self.observed
            .iter()
            .filter(|(owner, _)| *owner == platform)
            .map(|(_, name)| name)
            .collect()
    }
}

impl Extend<Binary> for Catalog {
    fn extend<T: IntoIterator<Item = Binary>>(&mut self, iter: T) {
        for binary in iter {
            self.add(binary);
        }
    }
}

impl FromIterator<Binary> for Catalog {
    fn from_iter<T: IntoIterator<Item = Binary>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        catalog.extend(iter);
        catalog
    }
}
