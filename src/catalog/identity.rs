//! Identifiers shared by both knowledge bases.
//!
//! GTFOBins declares a closed set of functions, while LOLBAS categories are
//! free text. `CapabilityName` models both: names from the fixed tables map to
//! `Known`, anything else a Windows record declares is kept as `Arbitrary`.

use serde::Serialize;
use std::fmt;

/// Knowledge base a binary was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Windows => "windows",
        }
    }

    /// Heading used in human-readable listings.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Unix => "Unix",
            Platform::Windows => "Windows",
        }
    }

    /// Fixed capability vocabulary documented for this platform.
    pub fn known_capabilities(&self) -> &'static [KnownCapability] {
        match self {
            Platform::Unix => &UNIX_CAPABILITIES,
            Platform::Windows => &WINDOWS_CAPABILITIES,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrows queries to one knowledge base or spans both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlatformFilter {
    Unix,
    Windows,
    #[default]
    Both,
}

impl PlatformFilter {
    /// Mirrors the `--unix` / `--win` switches: setting neither (or both)
    /// selects both platforms.
    pub fn from_flags(unix: bool, windows: bool) -> Self {
        match (unix, windows) {
            (true, false) => PlatformFilter::Unix,
            (false, true) => PlatformFilter::Windows,
            _ => PlatformFilter::Both,
        }
    }

    pub fn only(platform: Platform) -> Self {
        match platform {
            Platform::Unix => PlatformFilter::Unix,
            Platform::Windows => PlatformFilter::Windows,
        }
    }

    pub fn includes(&self, platform: Platform) -> bool {
        match self {
            PlatformFilter::Unix => platform == Platform::Unix,
            PlatformFilter::Windows => platform == Platform::Windows,
            PlatformFilter::Both => true,
        }
    }

    /// Selected platforms, Unix first.
    pub fn platforms(&self) -> &'static [Platform] {
        match self {
            PlatformFilter::Unix => &[Platform::Unix],
            PlatformFilter::Windows => &[Platform::Windows],
            PlatformFilter::Both => &[Platform::Unix, Platform::Windows],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformFilter::Unix => "unix",
            PlatformFilter::Windows => "windows",
            PlatformFilter::Both => "unix and windows",
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every capability name either knowledge base documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownCapability {
    Shell,
    Upload,
    Download,
    FileWrite,
    FileRead,
    LibraryLoad,
    Sudo,
    NonInteractiveRevShell,
    Command,
    BindShell,
    Suid,
    LimitedSuid,
    RevShell,
    NonInteractiveBindShell,
    Capabilities,
    AwlBypass,
    Ads,
    Copy,
    Encode,
    Decode,
    Credentials,
    Compile,
    Dump,
    UacBypass,
    Reconnaissance,
}

impl KnownCapability {
    pub const ALL: [KnownCapability; 25] = [
        KnownCapability::Shell,
        KnownCapability::Upload,
        KnownCapability::Download,
        KnownCapability::FileWrite,
        KnownCapability::FileRead,
        KnownCapability::LibraryLoad,
        KnownCapability::Sudo,
        KnownCapability::NonInteractiveRevShell,
        KnownCapability::Command,
        KnownCapability::BindShell,
        KnownCapability::Suid,
        KnownCapability::LimitedSuid,
        KnownCapability::RevShell,
        KnownCapability::NonInteractiveBindShell,
        KnownCapability::Capabilities,
        KnownCapability::AwlBypass,
        KnownCapability::Ads,
        KnownCapability::Copy,
        KnownCapability::Encode,
        KnownCapability::Decode,
        KnownCapability::Credentials,
        KnownCapability::Compile,
        KnownCapability::Dump,
        KnownCapability::UacBypass,
        KnownCapability::Reconnaissance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownCapability::Shell => "shell",
            KnownCapability::Upload => "upload",
            KnownCapability::Download => "download",
            KnownCapability::FileWrite => "filewrite",
            KnownCapability::FileRead => "fileread",
            KnownCapability::LibraryLoad => "libraryload",
            KnownCapability::Sudo => "sudo",
            KnownCapability::NonInteractiveRevShell => "noninteractiverevshell",
            KnownCapability::Command => "command",
            KnownCapability::BindShell => "bindshell",
            KnownCapability::Suid => "suid",
            KnownCapability::LimitedSuid => "limitedsuid",
            KnownCapability::RevShell => "revshell",
            KnownCapability::NonInteractiveBindShell => "noninteractivebindshell",
            KnownCapability::Capabilities => "capabilities",
            KnownCapability::AwlBypass => "awlbypass",
            KnownCapability::Ads => "ads",
            KnownCapability::Copy => "copy",
            KnownCapability::Encode => "encode",
            KnownCapability::Decode => "decode",
            KnownCapability::Credentials => "credentials",
            KnownCapability::Compile => "compile",
            KnownCapability::Dump => "dump",
            KnownCapability::UacBypass => "uacbypass",
            KnownCapability::Reconnaissance => "reconnaissance",
        }
    }

    /// Exact, case-sensitive match against the normalized names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.as_str() == name)
    }

    pub fn is_documented_for(&self, platform: Platform) -> bool {
        platform.known_capabilities().contains(self)
    }
}

impl fmt::Display for KnownCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GTFOBins functions, in the order the site documents them.
pub const UNIX_CAPABILITIES: [KnownCapability; 15] = [
    KnownCapability::Shell,
    KnownCapability::Upload,
    KnownCapability::Download,
    KnownCapability::FileWrite,
    KnownCapability::FileRead,
    KnownCapability::LibraryLoad,
    KnownCapability::Sudo,
    KnownCapability::NonInteractiveRevShell,
    KnownCapability::Command,
    KnownCapability::BindShell,
    KnownCapability::Suid,
    KnownCapability::LimitedSuid,
    KnownCapability::RevShell,
    KnownCapability::NonInteractiveBindShell,
    KnownCapability::Capabilities,
];

/// LOLBAS categories after lowercasing and aliasing. The Windows vocabulary is
/// open-ended; records may declare categories beyond this list.
pub const WINDOWS_CAPABILITIES: [KnownCapability; 12] = [
    KnownCapability::Command,
    KnownCapability::AwlBypass,
    KnownCapability::Ads,
    KnownCapability::Download,
    KnownCapability::Copy,
    KnownCapability::Encode,
    KnownCapability::Decode,
    KnownCapability::Credentials,
    KnownCapability::Compile,
    KnownCapability::Dump,
    KnownCapability::UacBypass,
    KnownCapability::Reconnaissance,
];

// Keys are matched after lowercasing.
const WINDOWS_CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("execute", "command"),
    ("awl bypass", "awlbypass"),
    ("uac bypass", "uacbypass"),
];

/// Lowercase a LOLBAS `Category` and fold it through the alias table.
pub fn canonical_windows_category(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    WINDOWS_CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(lowered)
}

/// Normalized capability identifier used as the key of a binary's
/// capability map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub enum CapabilityName {
    Known(KnownCapability),
    Arbitrary(String),
}

impl CapabilityName {
    /// Classify an already-normalized name. Names from the fixed tables always
    /// become `Known`, so two spellings of one capability never coexist.
    pub fn parse(name: &str) -> Self {
        match KnownCapability::from_name(name) {
            Some(known) => CapabilityName::Known(known),
            None => CapabilityName::Arbitrary(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CapabilityName::Known(known) => known.as_str(),
            CapabilityName::Arbitrary(raw) => raw.as_str(),
        }
    }

    pub fn known(&self) -> Option<KnownCapability> {
        match self {
            CapabilityName::Known(known) => Some(*known),
            CapabilityName::Arbitrary(_) => None,
        }
    }

    /// True when the name belongs to the fixed vocabulary of `platform`.
    pub fn is_documented_for(&self, platform: Platform) -> bool {
        self.known()
            .is_some_and(|known| known.is_documented_for(platform))
    }
}

impl From<KnownCapability> for CapabilityName {
    fn from(value: KnownCapability) -> Self {
        CapabilityName::Known(value)
    }
}

impl From<&str> for CapabilityName {
    fn from(value: &str) -> Self {
        CapabilityName::parse(value)
    }
}

impl From<CapabilityName> for String {
    fn from(value: CapabilityName) -> Self {
        match value {
            CapabilityName::Known(known) => known.as_str().to_string(),
            CapabilityName::Arbitrary(raw) => raw,
        }
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
