//! Snapshot engine: one full-tree archive, published under its content hash
//! and recorded in history.
//!
//! Steps of a sync:
//! 1. remove a stale images/tmp.tar.gz left by an interrupted run;
//! 2. write the tar.gz of the tree into tmp.tar.gz;
//! 3. SHA-1 of the finished staging file (chunked reads);
//! 4. rename tmp.tar.gz -> images/<sha1>.tar.gz (publication point);
//! 5. append the id to COMMITS.
//!
//! A crash before 4 leaves only the staging file; nothing is published. No
//! locking: callers serialize syncs on one repository.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::archive::write_archive;
use crate::digest::{hash_file, ImageId};
use crate::history::append_entry;
use crate::repo::Repository;

/// Open the repository at `root` (config from env) and sync it.
pub fn sync(root: &Path) -> Result<ImageId> {
    Repository::open(root)?.sync()
}

pub(crate) fn sync_repo(repo: &Repository) -> Result<ImageId> {
    let cfg = repo.config();
    let tmp = repo.tmp_image_path();

    info!(
        "sync: start, root={}, deterministic={}, level={}",
        repo.root().display(),
        cfg.deterministic,
        cfg.compression_level
    );

    match fs::remove_file(&tmp) {
        Ok(()) => warn!("sync: removed stale staging file {}", tmp.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_context(|| format!("remove {}", tmp.display())),
    }

    let stats = write_archive(repo.root(), &tmp, cfg)?;

    let id = hash_file(&tmp, cfg.hash_chunk_bytes)?;
    let image = repo.image_path(&id);
    if image.exists() {
        debug!("sync: image {} already present, replacing", id);
    }
    fs::rename(&tmp, &image)
        .with_context(|| format!("rename {} -> {}", tmp.display(), image.display()))?;

    append_entry(&repo.commits_path(), &id, cfg.fsync)?;

    info!(
        "sync: done id={}, files={}, dirs={}, bytes_in={}, image={}",
        id,
        stats.files,
        stats.dirs,
        stats.bytes_in,
        image.display()
    );
    Ok(id)
}

pub(crate) fn list_images(repo: &Repository) -> Result<Vec<ImageId>> {
    let dir = repo.images_dir();
    let mut out = Vec::new();
    for entry in fs::read_dir(&dir).with_context(|| format!("read_dir {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(id) = entry.file_name().to_str().and_then(ImageId::from_file_name) {
            out.push(id);
        }
    }
    out.sort();
    Ok(out)
}

/// Image whose bytes no longer hash to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub expected: ImageId,
    pub actual: ImageId,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    /// Images re-hashed.
    pub checked: u64,
    pub mismatched: Vec<Mismatch>,
    /// History entries with no published image.
    pub missing: Vec<ImageId>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty()
    }
}

pub(crate) fn verify_repo(repo: &Repository) -> Result<VerifyReport> {
    let chunk = repo.config().hash_chunk_bytes;
    let images = list_images(repo)?;
    let mut report = VerifyReport::default();

    for expected in &images {
        let actual = hash_file(&repo.image_path(expected), chunk)?;
        report.checked += 1;
        if actual != *expected {
            warn!("verify: {} hashes to {}", expected, actual);
            report.mismatched.push(Mismatch {
                expected: *expected,
                actual,
            });
        }
    }

    let published: BTreeSet<ImageId> = images.into_iter().collect();
    let mut seen = BTreeSet::new();
    for id in repo.history()? {
        if !published.contains(&id) && seen.insert(id) {
            report.missing.push(id);
        }
    }

    info!(
        "verify: root={}, checked={}, mismatched={}, missing={}",
        repo.root().display(),
        report.checked,
        report.mismatched.len(),
        report.missing.len()
    );
    Ok(report)
}
