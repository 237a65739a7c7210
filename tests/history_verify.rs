// tests/history_verify.rs
//
// COMMITS append semantics, history parsing and image verification.

use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use pumkin::history::{append_entry, read_history};
use pumkin::{create, ImageId, PumkinConfig, Repository};

const A: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
const B: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

fn id(s: &str) -> ImageId {
    ImageId::from_hex(s).unwrap()
}

fn repo_with_file() -> Result<(TempDir, Repository)> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("hello.txt"), b"hello")?;
    create(dir.path())?;
    let repo =
        Repository::open_with_config(dir.path(), PumkinConfig::default().with_fsync(false))?;
    Ok((dir, repo))
}

#[test]
fn append_creates_then_separates_with_newline() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("COMMITS");

    append_entry(&log, &id(A), false)?;
    assert_eq!(fs::read_to_string(&log)?, A);

    append_entry(&log, &id(B), true)?;
    assert_eq!(fs::read_to_string(&log)?, format!("{A}\n{B}"));

    assert_eq!(read_history(&log)?, vec![id(A), id(B)]);
    Ok(())
}

#[test]
fn append_preserves_existing_content_verbatim() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("COMMITS");
    // Written by an older tool with a trailing newline.
    fs::write(&log, format!("{A}\n"))?;

    append_entry(&log, &id(B), false)?;
    assert_eq!(fs::read_to_string(&log)?, format!("{A}\n\n{B}"));
    assert_eq!(read_history(&log)?, vec![id(A), id(B)]);
    Ok(())
}

#[test]
fn whitespace_only_log_counts_as_empty() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("COMMITS");
    fs::write(&log, " \n\n")?;
    assert!(read_history(&log)?.is_empty());

    append_entry(&log, &id(A), false)?;
    assert_eq!(fs::read_to_string(&log)?, A);
    Ok(())
}

#[test]
fn history_missing_and_malformed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = dir.path().join("COMMITS");
    assert!(read_history(&log)?.is_empty(), "missing log is empty history");

    fs::write(&log, format!("{A}\nnot-a-digest"))?;
    let err = read_history(&log).unwrap_err();
    assert!(format!("{err}").contains(":2:"), "error should name the line: {err}");
    Ok(())
}

#[test]
fn duplicate_syncs_repeat_in_history() -> Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("x"), b"x")?;
    create(dir.path())?;
    let cfg = PumkinConfig::default()
        .with_fsync(false)
        .with_deterministic(true);
    let repo = Repository::open_with_config(dir.path(), cfg)?;

    let first = repo.sync()?;
    let second = repo.sync()?;
    assert_eq!(first, second);
    assert_eq!(repo.history()?, vec![first, first]);
    assert_eq!(repo.images()?, vec![first]);
    Ok(())
}

#[test]
fn verify_clean_repository() -> Result<()> {
    let (dir, repo) = repo_with_file()?;
    repo.sync()?;
    fs::write(dir.path().join("second.txt"), b"2")?;
    repo.sync()?;

    let report = repo.verify()?;
    assert_eq!(report.checked, 2);
    assert!(report.is_clean(), "{report:?}");
    Ok(())
}

#[test]
fn verify_detects_tampered_image() -> Result<()> {
    let (_dir, repo) = repo_with_file()?;
    let id = repo.sync()?;

    fs::write(repo.image_path(&id), b"tampered")?;
    let report = repo.verify()?;
    assert!(!report.is_clean());
    assert_eq!(report.mismatched.len(), 1);
    assert_eq!(report.mismatched[0].expected, id);
    assert_eq!(report.mismatched[0].actual, ImageId::of_bytes(b"tampered"));
    Ok(())
}

#[test]
fn verify_reports_history_without_image() -> Result<()> {
    let (_dir, repo) = repo_with_file()?;
    let id = repo.sync()?;
    fs::remove_file(repo.image_path(&id))?;

    let report = repo.verify()?;
    assert_eq!(report.checked, 0);
    assert_eq!(report.missing, vec![id]);
    assert!(!report.is_clean());
    Ok(())
}

#[test]
fn staging_file_is_not_an_image() -> Result<()> {
    let (_dir, repo) = repo_with_file()?;
    fs::write(repo.tmp_image_path(), b"partial")?;
    assert!(repo.images()?.is_empty());
    assert_eq!(repo.verify()?.checked, 0);
    Ok(())
}
