//! LOLBAS (Windows) records.
//!
//! One `yml/**/<Name>.yml` file per binary. Only `Name`, `Description` and
//! each command's `Command`, `Description` and `Category` feed the canonical
//! model; the remaining fields are decoded for completeness and ignored by
//! `normalize`.

use crate::catalog::{Binary, CapabilityName, Example, Platform, canonical_windows_category};
use crate::sources::{Decoded, decode_list, lenient_list, lenient_string};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LolbasRecord {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
    /// A single handle in most files, a list in a few.
    #[serde(rename = "Author", default)]
    pub author: Value,
    #[serde(rename = "Created", default, deserialize_with = "lenient_string")]
    pub created: String,
    #[serde(rename = "Commands", default, deserialize_with = "lenient_list")]
    pub commands: Vec<LolbasCommand>,
    #[serde(rename = "Full_Path", default, deserialize_with = "lenient_list")]
    pub full_path: Vec<LolbasPath>,
    #[serde(rename = "Code_Sample", default, deserialize_with = "lenient_list")]
    pub code_sample: Vec<LolbasCodeSample>,
    #[serde(rename = "Detection", default, deserialize_with = "lenient_list")]
    pub detection: Vec<Value>,
    #[serde(rename = "Resources", default, deserialize_with = "lenient_list")]
    pub resources: Vec<LolbasLink>,
    #[serde(
        rename = "Acknowledgement",
        default,
        deserialize_with = "lenient_list"
    )]
    pub acknowledgement: Vec<LolbasAcknowledgement>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LolbasCommand {
    #[serde(rename = "Command", default, deserialize_with = "lenient_string")]
    pub command: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(
        rename = "Usecase",
        alias = "UseCase",
        default,
        deserialize_with = "lenient_string"
    )]
    pub usecase: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(rename = "Privileges", default, deserialize_with = "lenient_string")]
    pub privileges: String,
    #[serde(rename = "MitreID", default, deserialize_with = "lenient_string")]
    pub mitre_id: String,
    #[serde(
        rename = "OperatingSystem",
        default,
        deserialize_with = "lenient_string"
    )]
    pub operating_system: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LolbasPath {
    #[serde(rename = "Path", default, deserialize_with = "lenient_string")]
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LolbasCodeSample {
    #[serde(rename = "Code", default, deserialize_with = "lenient_string")]
    pub code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LolbasLink {
    #[serde(rename = "Link", default, deserialize_with = "lenient_string")]
    pub link: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LolbasAcknowledgement {
    #[serde(rename = "Person", default, deserialize_with = "lenient_string")]
    pub person: String,
    #[serde(rename = "Handle", default, deserialize_with = "lenient_string")]
    pub handle: String,
}

/// Decode one LOLBAS file. List items that do not fit their schema (a bare
/// string among `Commands`, say) are skipped and named in `dropped`.
pub fn decode(content: &str) -> Result<Decoded<LolbasRecord>> {
    if content.trim().is_empty() {
        return Ok(Decoded::default());
    }
    let value: Value = serde_yaml::from_str(content).context("decoding LOLBAS record")?;
    let dropped = dropped_entries(&value);
    let record = serde_yaml::from_value(value).context("decoding LOLBAS record")?;
    Ok(Decoded { record, dropped })
}

fn dropped_entries(value: &Value) -> Vec<String> {
    let mut dropped = Vec::new();
    audit_list::<LolbasCommand>(value, "Commands", &mut dropped);
    audit_list::<LolbasPath>(value, "Full_Path", &mut dropped);
    audit_list::<LolbasCodeSample>(value, "Code_Sample", &mut dropped);
    audit_list::<Value>(value, "Detection", &mut dropped);
    audit_list::<LolbasLink>(value, "Resources", &mut dropped);
    audit_list::<LolbasAcknowledgement>(value, "Acknowledgement", &mut dropped);
    dropped
}

fn audit_list<T: DeserializeOwned>(record: &Value, field: &str, dropped: &mut Vec<String>) {
    if let Some(entries) = record.get(field) {
        dropped.extend(decode_list::<T>(entries, field).1);
    }
}

/// Build the canonical Windows binary.
///
/// Categories are lowercased and aliased before aggregation, so `Download`
/// and `download` (or `Execute` and `execute`) collapse into one entry whose
/// examples keep command order.
pub fn normalize(fallback_name: &str, record: &LolbasRecord) -> Binary {
    let name = if record.name.trim().is_empty() {
        fallback_name
    } else {
        record.name.as_str()
    };

    let mut builder =
        Binary::builder(name, Platform::Windows).description(record.description.clone());
    for command in &record.commands {
        let capability = CapabilityName::parse(&canonical_windows_category(&command.category));
        builder.record_example(
            capability,
            Example::new(command.description.clone(), command.command.clone()),
        );
    }
    builder.build()
}
