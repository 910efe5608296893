//! Rendering of query results as text or JSON.
//!
//! A `Report` is the finished answer to one request. It borrows from the
//! catalog and knows nothing about how it was produced.

use crate::catalog::{Binary, Example, Platform};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct Vocabulary {
    pub platform: Platform,
    pub capabilities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct NameGroup<'a> {
    pub platform: Platform,
    pub names: Vec<&'a str>,
}

/// Outcome of checking one binary for one capability.
#[derive(Debug, Serialize)]
pub struct CapabilityMatch<'a> {
    pub binary: &'a str,
    pub platform: Platform,
    /// `None` when the binary lacks the capability.
    pub examples: Option<&'a [Example]>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report<'a> {
    Capabilities {
        vocabularies: Vec<Vocabulary>,
    },
    Names {
        groups: Vec<NameGroup<'a>>,
    },
    CapabilityListing {
        capability: String,
        binaries: Vec<&'a str>,
    },
    Search {
        query: String,
        matches: Vec<&'a Binary>,
    },
    CapabilityCheck {
        query: String,
        capability: String,
        matches: Vec<CapabilityMatch<'a>>,
    },
}

impl Report<'_> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing report")
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Capabilities { vocabularies } => {
                writeln!(f, "Functions available:")?;
                for vocabulary in vocabularies {
                    writeln!(f, "  {}:", vocabulary.platform.label())?;
                    for capability in &vocabulary.capabilities {
                        writeln!(f, "\t{capability}")?;
                    }
                }
            }
            Report::Names { groups } => {
                for (idx, group) in groups.iter().enumerate() {
                    if idx > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, ">>> {} binaries:", group.platform.label())?;
                    for name in &group.names {
                        writeln!(f, "{name}")?;
                    }
                }
            }
            Report::CapabilityListing {
                capability,
                binaries,
            } => {
                if binaries.is_empty() {
                    writeln!(f, "No binary found with function {capability}")?;
                } else {
                    writeln!(f, "List of all the binaries with function {capability}:")?;
                    for name in binaries {
                        writeln!(f, "{name}")?;
                    }
                }
            }
            Report::Search { query, matches } => {
                if matches.is_empty() {
                    writeln!(f, "No results for binary {query}")?;
                }
                for binary in matches {
                    write_binary(f, binary)?;
                }
            }
            Report::CapabilityCheck {
                query,
                capability,
                matches,
            } => {
                if matches.is_empty() {
                    writeln!(f, "No results for binary {query}")?;
                }
                for found in matches {
                    let verdict = if found.examples.is_some() {
                        "allows"
                    } else {
                        "does not allow"
                    };
                    writeln!(
                        f,
                        "The binary {} ({}) {verdict} to perform function {capability}.",
                        found.binary, found.platform
                    )?;
                    for example in found.examples.unwrap_or_default() {
                        write_example(f, example)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_binary(f: &mut fmt::Formatter<'_>, binary: &Binary) -> fmt::Result {
    writeln!(
        f,
        "Information about: {} ({})",
        binary.name(),
        binary.platform()
    )?;
    if !binary.description().is_empty() {
        writeln!(f, "Description:\n{}", binary.description())?;
    }
    for entry in binary.capabilities() {
        writeln!(f, "[+] {}:", entry.name())?;
        for example in entry.examples() {
            write_example(f, example)?;
        }
    }
    Ok(())
}

fn write_example(f: &mut fmt::Formatter<'_>, example: &Example) -> fmt::Result {
    if !example.description.is_empty() {
        writeln!(f, "- Description:\n{}", example.description)?;
    }
    if !example.code.is_empty() {
        writeln!(f, "- Code:\n{}", example.code.trim_end())?;
    }
    if !example.is_empty() {
        writeln!(f)?;
    }
    Ok(())
}
