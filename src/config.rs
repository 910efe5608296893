//! Runtime settings resolved from flags, environment, and build-time hints.
//!
//! Clone root resolution order: `--clone-path`, `GTFODORA_CLONE_PATH`, the
//! `GTFODORA_CLONE_PATH_HINT` recorded by `build.rs`, then the current
//! directory. `--offline` or a truthy `GTFODORA_OFFLINE` skips fetching.

use std::env;
use std::path::PathBuf;

pub const ENV_CLONE_PATH: &str = "GTFODORA_CLONE_PATH";
pub const ENV_OFFLINE: &str = "GTFODORA_OFFLINE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the `gtfo/` and `lolbas/` checkouts.
    pub clone_root: PathBuf,
    /// Ingest the on-disk snapshot without cloning or pulling.
    pub offline: bool,
}

impl Settings {
    pub fn resolve(clone_path: Option<PathBuf>, offline: bool) -> Self {
        Self::resolve_with(clone_path, offline, |key| env::var(key).ok())
    }

    /// `resolve` with an injectable environment lookup.
    pub fn resolve_with<F>(clone_path: Option<PathBuf>, offline: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let clone_root = clone_path
            .or_else(|| non_empty(lookup(ENV_CLONE_PATH)).map(PathBuf::from))
            .or_else(|| clone_root_hint().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let offline = offline || lookup(ENV_OFFLINE).is_some_and(|value| truthy(&value));
        Self {
            clone_root,
            offline,
        }
    }
}

/// Compile-time default clone root, when the crate was built with one.
pub fn clone_root_hint() -> Option<&'static str> {
    option_env!("GTFODORA_CLONE_PATH_HINT").filter(|hint| !hint.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn flag_wins_over_environment() {
        let settings = Settings::resolve_with(
            Some(PathBuf::from("/flag")),
            false,
            env_of(&[(ENV_CLONE_PATH, "/env")]),
        );
        assert_eq!(settings.clone_root, PathBuf::from("/flag"));
        assert!(!settings.offline);
    }

    #[test]
    fn environment_fills_missing_flags() {
        let settings = Settings::resolve_with(
            None,
            false,
            env_of(&[(ENV_CLONE_PATH, "/env"), (ENV_OFFLINE, "TRUE")]),
        );
        assert_eq!(settings.clone_root, PathBuf::from("/env"));
        assert!(settings.offline);
    }

    #[test]
    fn falls_back_to_hint_or_current_dir() {
        let settings = Settings::resolve_with(None, false, env_of(&[(ENV_CLONE_PATH, " ")]));
        let expected = clone_root_hint()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        assert_eq!(settings.clone_root, expected);
        assert!(!Settings::resolve_with(None, false, env_of(&[(ENV_OFFLINE, "0")])).offline);
    }

    #[test]
    fn build_hint_is_absolute_when_present() {
        if let Some(hint) = clone_root_hint() {
            assert!(PathBuf::from(hint).is_absolute(), "hint {hint} is relative");
        }
    }
}
