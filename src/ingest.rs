//! Scan both checkouts and assemble the catalog.
//!
//! Files are enumerated with `walkdir`, sorted by path, then decoded and
//! normalized in parallel. `rayon`'s indexed `collect` keeps input order, so
//! the catalog is filled sequentially in a deterministic order: every Unix
//! binary, then every Windows binary. A file that fails to decode still
//! contributes an empty binary and a `SourceWarning`; only a catalog with no
//! binaries at all is fatal.

use crate::catalog::{Binary, Catalog, Platform};
use crate::sources::{self, SOURCES, SourceKind};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Non-fatal problem with one file or directory of a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceWarning {
    pub platform: Platform,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.platform,
            self.path.display(),
            self.message
        )
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(
        "no binaries found under {} or {}; clone the GTFOBins and LOLBAS repositories there or drop --offline",
        unix_root.display(),
        windows_root.display()
    )]
    EmptyCatalog {
        unix_root: PathBuf,
        windows_root: PathBuf,
    },
}

/// Result of scanning one source directory.
#[derive(Debug, Default)]
pub struct SourceScan {
    pub binaries: Vec<Binary>,
    pub warnings: Vec<SourceWarning>,
}

/// Catalog plus everything worth telling the operator about how it was built.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub catalog: Catalog,
    pub warnings: Vec<SourceWarning>,
}

/// Ingest both sources under `clone_root`.
pub fn ingest(clone_root: &Path) -> Result<IngestReport, IngestError> {
    let roots: Vec<(&SourceKind, PathBuf)> = SOURCES
        .iter()
        .map(|kind| (*kind, kind.data_root(clone_root)))
        .collect();
    ingest_roots(&roots)
}

/// Ingest explicit data roots, in the given order.
pub fn ingest_roots(roots: &[(&SourceKind, PathBuf)]) -> Result<IngestReport, IngestError> {
    let _span = tracing::info_span!("ingest").entered();
    let mut report = IngestReport::default();

    for (kind, data_root) in roots {
        let scan = scan_source(kind, data_root);
        info!(
            platform = %kind.platform,
            root = %data_root.display(),
            binaries = scan.binaries.len(),
            warnings = scan.warnings.len(),
            "source scanned"
        );
        report.catalog.extend(scan.binaries);
        report.warnings.extend(scan.warnings);
    }

    if report.catalog.is_empty() {
        let root_for = |platform: Platform| {
            roots
                .iter()
                .find(|(kind, _)| kind.platform == platform)
                .map(|(_, root)| root.clone())
                .unwrap_or_default()
        };
        return Err(IngestError::EmptyCatalog {
            unix_root: root_for(Platform::Unix),
            windows_root: root_for(Platform::Windows),
        });
    }

    Ok(report)
}

/// Decode and normalize every accepted file below `data_root`.
pub fn scan_source(kind: &SourceKind, data_root: &Path) -> SourceScan {
    let mut scan = SourceScan::default();
    let files = collect_source_files(kind, data_root, &mut scan.warnings);
    debug!(
        platform = %kind.platform,
        files = files.len(),
        "decoding source files"
    );

    let decoded: Vec<(Binary, Option<SourceWarning>)> = files
        .par_iter()
        .map(|path| {
            trace!(path = %path.display(), "decoding");
            let outcome = kind.decode_file(path);
            let warning = outcome.error.map(|err| SourceWarning {
                platform: kind.platform,
                path: path.clone(),
                message: format!("{err:#}"),
            });
            (sources::normalize(&outcome.record), warning)
        })
        .collect();

    for (binary, warning) in decoded {
        if let Some(warning) = warning {
            warn!(
                platform = %warning.platform,
                path = %warning.path.display(),
                error = %warning.message,
                "failed to decode record; keeping an empty entry"
            );
            scan.warnings.push(warning);
        }
        scan.binaries.push(binary);
    }

    if scan.binaries.is_empty() {
        warn!(
            platform = %kind.platform,
            root = %data_root.display(),
            "no records found; results will be partial"
        );
    }
    scan
}

/// Accepted files below `data_root`, sorted by path. Hidden entries are
/// skipped; walk errors become warnings.
pub fn collect_source_files(
    kind: &SourceKind,
    data_root: &Path,
    warnings: &mut Vec<SourceWarning>,
) -> Vec<PathBuf> {
    if !data_root.is_dir() {
        warnings.push(SourceWarning {
            platform: kind.platform,
            path: data_root.to_path_buf(),
            message: "source directory does not exist".to_string(),
        });
        return Vec::new();
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(data_root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && kind.accepts(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => warnings.push(SourceWarning {
                platform: kind.platform,
                path: err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| data_root.to_path_buf()),
                message: err.to_string(),
            }),
        }
    }

    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
