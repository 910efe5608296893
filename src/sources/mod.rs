//! Source knowledge bases and their record schemas.
//!
//! Each source module owns its raw record shape, a decoder for one file, and
//! a pure normalizer into `Binary`. `SourceKind` describes where a source
//! lives (repository URL, checkout directory, data subdirectory) and
//! `normalize` dispatches a decoded record to the matching normalizer.

pub mod gtfobins;
pub mod lolbas;

use crate::catalog::{Binary, Platform};
use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use gtfobins::{GtfobinsExample, GtfobinsFunctions, GtfobinsRecord};
pub use lolbas::{LolbasCommand, LolbasRecord};

/// Static description of one knowledge base.
#[derive(Debug)]
pub struct SourceKind {
    pub platform: Platform,
    /// Directory name of the checkout under the clone root.
    pub checkout_dir: &'static str,
    pub default_url: &'static str,
    /// Environment variable that overrides `default_url`.
    pub url_env: &'static str,
    /// Subdirectory of the checkout holding one record per file.
    pub data_dir: &'static str,
    /// Accepted file extensions; `""` admits extensionless files.
    pub extensions: &'static [&'static str],
}

pub const GTFOBINS: SourceKind = SourceKind {
    platform: Platform::Unix,
    checkout_dir: "gtfo",
    default_url: "https://github.com/GTFOBins/GTFOBins.github.io",
    url_env: "GTFODORA_GTFOBINS_URL",
    data_dir: "_gtfobins",
    extensions: &["md", "yml", "yaml", ""],
};

pub const LOLBAS: SourceKind = SourceKind {
    platform: Platform::Windows,
    checkout_dir: "lolbas",
    default_url: "https://github.com/LOLBAS-Project/LOLBAS",
    url_env: "GTFODORA_LOLBAS_URL",
    data_dir: "yml",
    extensions: &["yml", "yaml"],
};

/// Both sources, Unix first. Catalog order follows this order.
pub const SOURCES: [&SourceKind; 2] = [&GTFOBINS, &LOLBAS];

impl SourceKind {
    pub fn url(&self) -> String {
        match env::var(self.url_env) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => self.default_url.to_string(),
        }
    }

    pub fn checkout(&self, clone_root: &Path) -> PathBuf {
        clone_root.join(self.checkout_dir)
    }

    pub fn data_root(&self, clone_root: &Path) -> PathBuf {
        self.checkout(clone_root).join(self.data_dir)
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        self.extensions.contains(&extension.as_str())
    }

    /// Decode one file. Read and parse failures degrade to a zero-value record
    /// and are handed back in `error` for the caller to report. Entries
    /// dropped for having the wrong shape also produce an `error`, but the
    /// rest of the record is kept.
    pub fn decode_file(&self, path: &Path) -> DecodeOutcome {
        let stem = file_stem(path);
        let parsed = fs::read(path)
            .with_context(|| format!("reading {}", path.display()))
            .and_then(|bytes| {
                let content = String::from_utf8_lossy(&bytes);
                let decoded = match self.platform {
                    Platform::Unix => gtfobins::decode(&content).map(|decoded| {
                        decoded.map(|record| SourceRecord::Unix {
                            name: stem.clone(),
                            record,
                        })
                    }),
                    Platform::Windows => lolbas::decode(&content).map(|decoded| {
                        decoded.map(|record| SourceRecord::Windows {
                            fallback_name: stem.clone(),
                            record,
                        })
                    }),
                };
                decoded.with_context(|| format!("parsing {}", path.display()))
            });

        match parsed {
            Ok(Decoded { record, dropped }) if dropped.is_empty() => DecodeOutcome {
                record,
                error: None,
            },
            Ok(Decoded { record, dropped }) => DecodeOutcome {
                record,
                error: Some(anyhow!(
                    "{}: dropped malformed entries: {}",
                    path.display(),
                    dropped.join("; ")
                )),
            },
            Err(err) => DecodeOutcome {
                record: SourceRecord::empty(self.platform, stem),
                error: Some(err),
            },
        }
    }
}

/// Schema-specific record plus the name it was found under.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceRecord {
    /// GTFOBins names binaries by file stem.
    Unix { name: String, record: GtfobinsRecord },
    /// LOLBAS declares `Name`; the stem is used only when it is blank.
    Windows {
        fallback_name: String,
        record: LolbasRecord,
    },
}

impl SourceRecord {
    pub fn empty(platform: Platform, name: String) -> Self {
        match platform {
            Platform::Unix => SourceRecord::Unix {
                name,
                record: GtfobinsRecord::default(),
            },
            Platform::Windows => SourceRecord::Windows {
                fallback_name: name,
                record: LolbasRecord::default(),
            },
        }
    }
}

/// A decoded record and a description of every entry that did not fit its
/// schema and was left out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Decoded<T> {
    pub record: T,
    pub dropped: Vec<String>,
}

impl<T> Decoded<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            record: f(self.record),
            dropped: self.dropped,
        }
    }
}

#[derive(Debug)]
pub struct DecodeOutcome {
    pub record: SourceRecord,
    pub error: Option<anyhow::Error>,
}

/// Map any decoded record into its canonical `Binary`. Pure and total.
pub fn normalize(record: &SourceRecord) -> Binary {
    match record {
        SourceRecord::Unix { name, record } => gtfobins::normalize(name, record),
        SourceRecord::Windows {
            fallback_name,
            record,
        } => lolbas::normalize(fallback_name, record),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Accept any YAML scalar as text; null and collections read as empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// Accept any YAML value for a list field. Null and non-lists read as empty;
/// items that do not decode as `T` are skipped.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let (items, _dropped) = decode_list(&value, "");
    Ok(items)
}

/// Accept any YAML value for a nested section; anything that does not decode
/// as `T` (including null) reads as `T::default()`.
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_yaml::from_value(value).unwrap_or_default())
}

/// Items of a YAML list that decode as `T`, plus one message per dropped
/// item, labelled `label[index]`. Null is an empty list; any other non-list
/// value is dropped whole.
pub(crate) fn decode_list<T: DeserializeOwned>(
    value: &Value,
    label: &str,
) -> (Vec<T>, Vec<String>) {
    let mut items = Vec::new();
    let mut dropped = Vec::new();
    match value {
        Value::Null => {}
        Value::Tagged(tagged) => return decode_list(&tagged.value, label),
        Value::Sequence(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                match serde_yaml::from_value(entry.clone()) {
                    Ok(item) => items.push(item),
                    Err(err) => dropped.push(format!("{label}[{index}]: {err}")),
                }
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Mapping(_) => {
            dropped.push(format!("{label}: expected a list"));
        }
    }
    (items, dropped)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}
