//! Command surface: turn the CLI switches into one request and answer it.
//!
//! Precedence: `--list-functions`, then `--list-all`, then `--function`
//! (alone, or combined with `--search` for a per-binary check), then
//! `--search`. With nothing selected the caller prints usage.

use crate::catalog::{Catalog, PlatformFilter, canonical_windows_category};
use crate::query::{QueryEngine, QueryError, capability_details};
use crate::report::{CapabilityMatch, NameGroup, Report, Vocabulary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    ListCapabilities,
    ListAll,
    CapabilityListing { capability: String },
    CapabilityCheck { name: String, capability: String },
    Search { name: String },
    Usage,
}

impl Request {
    pub fn from_flags(
        list_functions: bool,
        list_all: bool,
        function: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        let function = function.filter(|value| !value.is_empty());
        let search = search.filter(|value| !value.is_empty());

        if list_functions {
            return Request::ListCapabilities;
        }
        if list_all {
            return Request::ListAll;
        }
        match (function, search) {
            (Some(capability), Some(name)) => Request::CapabilityCheck {
                name: name.to_string(),
                capability: canonical_query_capability(capability),
            },
            (Some(capability), None) => Request::CapabilityListing {
                capability: canonical_query_capability(capability),
            },
            (None, Some(name)) => Request::Search {
                name: name.to_string(),
            },
            (None, None) => Request::Usage,
        }
    }

    /// Whether answering requires ingesting the sources.
    pub fn needs_catalog(&self) -> bool {
        !matches!(self, Request::ListCapabilities | Request::Usage)
    }
}

/// Normalize user input the way LOLBAS categories are normalized, so
/// `Execute` or `AWL Bypass` on the command line find `command` and
/// `awlbypass`.
pub fn canonical_query_capability(raw: &str) -> String {
    canonical_windows_category(raw.trim())
}

/// Answer `request` against `catalog`. `Usage` yields an empty name listing;
/// callers are expected to print help instead.
pub fn execute<'a>(
    request: &Request,
    filter: PlatformFilter,
    catalog: &'a Catalog,
) -> Result<Report<'a>, QueryError> {
    let engine = QueryEngine::new(catalog);
    let report = match request {
        Request::ListCapabilities => Report::Capabilities {
            vocabularies: filter
                .platforms()
                .iter()
                .map(|platform| Vocabulary {
                    platform: *platform,
                    capabilities: platform
                        .known_capabilities()
                        .iter()
                        .map(|cap| cap.as_str())
                        .collect(),
                })
                .collect(),
        },
        Request::ListAll => Report::Names {
            groups: filter
                .platforms()
                .iter()
                .map(|platform| NameGroup {
                    platform: *platform,
                    names: engine.list_names(PlatformFilter::only(*platform)),
                })
                .collect(),
        },
        Request::CapabilityListing { capability } => Report::CapabilityListing {
            capability: capability.clone(),
            binaries: engine.list_by_capability(filter, capability)?,
        },
        Request::CapabilityCheck { name, capability } => {
            engine.validate_capability_name(filter, capability)?;
            let matches = filter
                .platforms()
                .iter()
                .filter_map(|platform| {
                    engine.find_by_name(PlatformFilter::only(*platform), name)
                })
                .map(|binary| CapabilityMatch {
                    binary: binary.name(),
                    platform: binary.platform(),
                    examples: capability_details(binary, capability).map(|entry| entry.examples()),
                })
                .collect();
            Report::CapabilityCheck {
                query: name.clone(),
                capability: capability.clone(),
                matches,
            }
        }
        Request::Search { name } => Report::Search {
            query: name.clone(),
            matches: filter
                .platforms()
                .iter()
                .filter_map(|platform| engine.find_by_name(PlatformFilter::only(*platform), name))
                .collect(),
        },
        Request::Usage => Report::Names { groups: Vec::new() },
    };
    Ok(report)
}
