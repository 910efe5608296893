//! Canonical entities shared by both knowledge bases.
//!
//! A `Binary` is built once by a source normalizer through `BinaryBuilder` and
//! exposes read-only accessors afterwards.

use crate::catalog::{CapabilityName, Platform};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// One documented way to exercise a capability. Either field may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Example {
    pub description: String,
    pub code: String,
}

impl Example {
    pub fn new(description: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: code.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.code.is_empty()
    }
}

/// A capability together with its examples in source order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CapabilityEntry {
    #[serde(skip)]
    name: CapabilityName,
    examples: Vec<Example>,
}

impl CapabilityEntry {
    pub fn new(name: CapabilityName, first: Example) -> Self {
        Self {
            name,
            examples: vec![first],
        }
    }

    /// Returns `None` for an empty example list: an absent capability is
    /// absent, not present-and-empty.
    pub fn from_examples(name: CapabilityName, examples: Vec<Example>) -> Option<Self> {
        if examples.is_empty() {
            return None;
        }
        Some(Self { name, examples })
    }

    pub fn name(&self) -> &CapabilityName {
        &self.name
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}

/// Canonical record for one executable on one platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Binary {
    name: String,
    platform: Platform,
    description: String,
    capabilities: BTreeMap<CapabilityName, CapabilityEntry>,
}

impl Binary {
    pub fn builder(name: impl Into<String>, platform: Platform) -> BinaryBuilder {
        BinaryBuilder {
            name: name.into(),
            platform,
            description: String::new(),
            capabilities: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn capability(&self, name: &CapabilityName) -> Option<&CapabilityEntry> {
        self.capabilities.get(name)
    }

    /// Entries in capability order.
    pub fn capabilities(&self) -> impl Iterator<Item = &CapabilityEntry> {
        self.capabilities.values()
    }

    pub fn capability_names(&self) -> impl Iterator<Item = &CapabilityName> {
        self.capabilities.keys()
    }
}

#[derive(Debug)]
pub struct BinaryBuilder {
    name: String,
    platform: Platform,
    description: String,
    capabilities: BTreeMap<CapabilityName, CapabilityEntry>,
}

impl BinaryBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Install a whole entry, replacing any earlier entry of the same name.
    pub fn entry(mut self, entry: CapabilityEntry) -> Self {
        self.capabilities.insert(entry.name.clone(), entry);
        self
    }

    /// Append one example, opening the entry on first sight of `capability`.
    pub fn record_example(&mut self, capability: CapabilityName, example: Example) {
        match self.capabilities.entry(capability) {
            Entry::Occupied(mut slot) => slot.get_mut().examples.push(example),
            Entry::Vacant(slot) => {
                let name = slot.key().clone();
                slot.insert(CapabilityEntry::new(name, example));
            }
        }
    }

    pub fn build(self) -> Binary {
        Binary {
            name: self.name,
            platform: self.platform,
            description: self.description,
            capabilities: self.capabilities,
        }
    }
}
