//! GTFOBins (Unix) records.
//!
//! Each `_gtfobins/<name>.md` file carries its data as YAML front matter
//! between `---` lines. Functions map 1:1 onto the fixed Unix vocabulary
//! through `GtfobinsFunctions::table`, which is the single place both
//! presence and details are read from.

use crate::catalog::{Binary, CapabilityEntry, Example, KnownCapability, Platform};
use crate::sources::{Decoded, decode_list, lenient_list, lenient_or_default, lenient_string};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GtfobinsRecord {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub functions: GtfobinsFunctions,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GtfobinsFunctions {
    #[serde(default, deserialize_with = "lenient_list")]
    pub shell: Vec<GtfobinsExample>,
    #[serde(rename = "file-upload", default, deserialize_with = "lenient_list")]
    pub file_upload: Vec<GtfobinsExample>,
    #[serde(rename = "file-download", default, deserialize_with = "lenient_list")]
    pub file_download: Vec<GtfobinsExample>,
    #[serde(rename = "file-write", default, deserialize_with = "lenient_list")]
    pub file_write: Vec<GtfobinsExample>,
    #[serde(rename = "file-read", default, deserialize_with = "lenient_list")]
    pub file_read: Vec<GtfobinsExample>,
    #[serde(rename = "library-load", default, deserialize_with = "lenient_list")]
    pub library_load: Vec<GtfobinsExample>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sudo: Vec<GtfobinsExample>,
    #[serde(
        rename = "non-interactive-reverse-shell",
        default,
        deserialize_with = "lenient_list"
    )]
    pub non_interactive_reverse_shell: Vec<GtfobinsExample>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub command: Vec<GtfobinsExample>,
    #[serde(rename = "bind-shell", default, deserialize_with = "lenient_list")]
    pub bind_shell: Vec<GtfobinsExample>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub suid: Vec<GtfobinsExample>,
    #[serde(rename = "limited-suid", default, deserialize_with = "lenient_list")]
    pub limited_suid: Vec<GtfobinsExample>,
    #[serde(rename = "reverse-shell", default, deserialize_with = "lenient_list")]
    pub reverse_shell: Vec<GtfobinsExample>,
    #[serde(
        rename = "non-interactive-bind-shell",
        default,
        deserialize_with = "lenient_list"
    )]
    pub non_interactive_bind_shell: Vec<GtfobinsExample>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub capabilities: Vec<GtfobinsExample>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct GtfobinsExample {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
}

impl From<&GtfobinsExample> for Example {
    fn from(value: &GtfobinsExample) -> Self {
        Example::new(value.description.clone(), value.code.clone())
    }
}

impl GtfobinsFunctions {
    /// Field-to-capability table, in vocabulary order.
    pub fn table(&self) -> [(KnownCapability, &[GtfobinsExample]); 15] {
        [
            (KnownCapability::Shell, self.shell.as_slice()),
            (KnownCapability::Upload, self.file_upload.as_slice()),
            (KnownCapability::Download, self.file_download.as_slice()),
            (KnownCapability::FileWrite, self.file_write.as_slice()),
            (KnownCapability::FileRead, self.file_read.as_slice()),
            (KnownCapability::LibraryLoad, self.library_load.as_slice()),
            (KnownCapability::Sudo, self.sudo.as_slice()),
            (
                KnownCapability::NonInteractiveRevShell,
                self.non_interactive_reverse_shell.as_slice(),
            ),
            (KnownCapability::Command, self.command.as_slice()),
            (KnownCapability::BindShell, self.bind_shell.as_slice()),
            (KnownCapability::Suid, self.suid.as_slice()),
            (KnownCapability::LimitedSuid, self.limited_suid.as_slice()),
            (KnownCapability::RevShell, self.reverse_shell.as_slice()),
            (
                KnownCapability::NonInteractiveBindShell,
                self.non_interactive_bind_shell.as_slice(),
            ),
            (KnownCapability::Capabilities, self.capabilities.as_slice()),
        ]
    }
}

/// Decode one GTFOBins file (front matter or bare YAML).
///
/// A function whose value is not a list, or a list item that is not an
/// example, is left out and named in `dropped`; the other functions survive.
pub fn decode(content: &str) -> Result<Decoded<GtfobinsRecord>> {
    let yaml = front_matter(content);
    if yaml.trim().is_empty() {
        return Ok(Decoded::default());
    }
    let value: Value = serde_yaml::from_str(yaml).context("decoding GTFOBins front matter")?;
    let dropped = dropped_entries(&value);
    let record = serde_yaml::from_value(value).context("decoding GTFOBins front matter")?;
    Ok(Decoded { record, dropped })
}

fn dropped_entries(value: &Value) -> Vec<String> {
    let functions = match value.get("functions") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Mapping(functions)) => functions,
        Some(_) => return vec!["functions: expected a mapping".to_string()],
    };
    functions
        .iter()
        .flat_map(|(key, entries)| {
            let label = format!("functions.{}", key.as_str().unwrap_or("?"));
            decode_list::<GtfobinsExample>(entries, &label).1
        })
        .collect()
}

/// Build the canonical Unix binary; only non-empty functions become entries.
pub fn normalize(name: &str, record: &GtfobinsRecord) -> Binary {
    record
        .functions
        .table()
        .into_iter()
        .filter_map(|(capability, examples)| {
            CapabilityEntry::from_examples(
                capability.into(),
                examples.iter().map(Example::from).collect(),
            )
        })
        .fold(Binary::builder(name, Platform::Unix), |builder, entry| {
            builder.entry(entry)
        })
        .build()
}

/// Text between the opening and closing `---` lines, or the whole input when
/// it does not open with a delimiter.
pub(crate) fn front_matter(content: &str) -> &str {
    let content = content.trim_start_matches('\u{feff}');
    let Some(body) = strip_delimiter_line(content) else {
        return content;
    };

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if is_delimiter(line) {
            return &body[..offset];
        }
        offset += line.len();
    }
    body
}

fn strip_delimiter_line(content: &str) -> Option<&str> {
    let line_end = content.find('\n').map(|idx| idx + 1).unwrap_or(content.len());
    if is_delimiter(&content[..line_end]) {
        Some(&content[line_end..])
    } else {
        None
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}
