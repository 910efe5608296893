//! Keep the local GTFOBins and LOLBAS checkouts current.
//!
//! Fetching is best-effort: a failed clone or pull is logged with the
//! repository URL and platform, and ingestion proceeds on whatever snapshot is
//! already on disk.

use crate::catalog::Platform;
use crate::sources::{SOURCES, SourceKind};
use anyhow::{Context, Result, bail};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

const ENV_GIT_PROGRAM: &str = "GTFODORA_GIT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Cloned,
    Updated,
}

/// Brings `destination` up to date with the repository at `url`.
pub trait RepositoryFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<FetchOutcome>;
}

/// Fetcher that shells out to the `git` CLI.
#[derive(Clone, Debug)]
pub struct GitFetcher {
    program: OsString,
}

impl Default for GitFetcher {
    fn default() -> Self {
        let program = env::var_os(ENV_GIT_PROGRAM)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| OsString::from("git"));
        Self { program }
    }
}

impl GitFetcher {
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&OsStr]) -> Result<()> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to execute {}", self.program.to_string_lossy()))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{} exited with {}: {}",
            self.program.to_string_lossy(),
            output.status,
            stderr.trim()
        )
    }
}

impl RepositoryFetcher for GitFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<FetchOutcome> {
        if destination.join(".git").exists() {
            self.run(&[
                OsStr::new("-C"),
                destination.as_os_str(),
                OsStr::new("pull"),
                OsStr::new("--ff-only"),
                OsStr::new("--quiet"),
            ])
            .with_context(|| format!("pulling {url} into {}", destination.display()))?;
            return Ok(FetchOutcome::Updated);
        }

        if !dir_is_empty_or_missing(destination)? {
            bail!(
                "destination {} exists but is not a git checkout",
                destination.display()
            );
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        self.run(&[
            OsStr::new("clone"),
            OsStr::new("--depth"),
            OsStr::new("1"),
            OsStr::new("--quiet"),
            OsStr::new(url),
            destination.as_os_str(),
        ])
        .with_context(|| format!("cloning {url} into {}", destination.display()))?;
        Ok(FetchOutcome::Cloned)
    }
}

/// A fetch that failed and was skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchWarning {
    pub platform: Platform,
    pub url: String,
    pub destination: PathBuf,
    pub message: String,
}

/// Refresh every source checkout under `clone_root`, never failing.
pub fn refresh_sources(fetcher: &dyn RepositoryFetcher, clone_root: &Path) -> Vec<FetchWarning> {
    SOURCES
        .iter()
        .filter_map(|kind| refresh_source(fetcher, kind, clone_root))
        .collect()
}

fn refresh_source(
    fetcher: &dyn RepositoryFetcher,
    kind: &SourceKind,
    clone_root: &Path,
) -> Option<FetchWarning> {
    let url = kind.url();
    let destination = kind.checkout(clone_root);
    match fetcher.fetch(&url, &destination) {
        Ok(outcome) => {
            info!(
                platform = %kind.platform,
                url = %url,
                outcome = ?outcome,
                "repository refreshed"
            );
            None
        }
        Err(err) => {
            let message = format!("{err:#}");
            warn!(
                platform = %kind.platform,
                url = %url,
                error = %message,
                "failed to refresh repository; results may be partial or outdated"
            );
            Some(FetchWarning {
                platform: kind.platform,
                url,
                destination,
                message,
            })
        }
    }
}

fn dir_is_empty_or_missing(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries =
        fs::read_dir(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(entries.next().is_none())
}
