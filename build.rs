//! Bakes an optional default clone root into the binary.
//!
//! `GTFODORA_CLONE_PATH_HINT=/srv/gtfodora cargo build` lets an installed
//! binary find its checkouts without flags. Relative hints are anchored at
//! the manifest directory so the baked path is always absolute.

use std::env;
use std::path::PathBuf;

const HINT_VAR: &str = "GTFODORA_CLONE_PATH_HINT";

fn main() {
    println!("cargo:rerun-if-env-changed={HINT_VAR}");

    let Some(raw) = env::var_os(HINT_VAR).filter(|value| !value.is_empty()) else {
        return;
    };
    let mut hint = PathBuf::from(raw);
    if hint.is_relative() {
        if let Some(manifest_dir) = env::var_os("CARGO_MANIFEST_DIR") {
            hint = PathBuf::from(manifest_dir).join(hint);
        }
    }

    match hint.to_str() {
        Some(path) => println!("cargo:rustc-env={HINT_VAR}={path}"),
        None => println!(
            "cargo:warning={HINT_VAR} is not valid UTF-8 and was ignored: {}",
            hint.display()
        ),
    }
}
