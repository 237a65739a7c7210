//! tar.gz of a repository tree.
//!
//! The top-level entry is the base name of the root; every path segment equal
//! to the metadata directory name is pruned during traversal, at any depth.

use anyhow::{anyhow, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, warn};
use std::ffi::OsString;
use std::fs::{File, FileType};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tar::HeaderMode;
use walkdir::{DirEntry, WalkDir};

use crate::config::PumkinConfig;
use crate::consts::METADATA_DIR;

/// Entries and bytes written into one archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveStats {
    pub dirs: u64,
    pub files: u64,
    pub links: u64,
    pub bytes_in: u64,
    /// Sockets: tar has no entry type for them.
    pub skipped: u64,
}

/// Path predicate used while walking: false for the metadata directory
/// wherever it appears.
pub fn is_archived(entry: &DirEntry) -> bool {
    entry.depth() == 0 || entry.file_name() != METADATA_DIR
}

#[cfg(unix)]
fn is_supported(ft: &FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    !ft.is_socket()
}

#[cfg(not(unix))]
fn is_supported(_ft: &FileType) -> bool {
    true
}

/// Name of the top-level archive entry for `root`, byte-for-byte.
pub fn archive_root_name(root: &Path) -> Result<OsString> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_os_string());
    }
    // ".", "..", "foo/.." and the like
    let canon = root
        .canonicalize()
        .with_context(|| format!("canonicalize {}", root.display()))?;
    canon
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| anyhow!("cannot derive an archive name from {}", root.display()))
}

/// Write a gzip-compressed tar of `root` to `out` (created or truncated).
pub fn write_archive(root: &Path, out: &Path, cfg: &PumkinConfig) -> Result<ArchiveStats> {
    let top = PathBuf::from(archive_root_name(root)?);
    let file = File::create(out).with_context(|| format!("create {}", out.display()))?;
    let gz = GzEncoder::new(BufWriter::new(file), Compression::new(cfg.compression_level));

    let mut tar = tar::Builder::new(gz);
    tar.follow_symlinks(false);
    tar.mode(if cfg.deterministic {
        HeaderMode::Deterministic
    } else {
        HeaderMode::Complete
    });

    let mut stats = ArchiveStats::default();
    let mut walker = WalkDir::new(root).follow_links(false);
    if cfg.deterministic {
        walker = walker.sort_by_file_name();
    }

    for entry in walker.into_iter().filter_entry(is_archived) {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("strip prefix of {}", entry.path().display()))?;
        let name = if rel.as_os_str().is_empty() {
            top.clone()
        } else {
            top.join(rel)
        };

        let ft = entry.file_type();
        if !is_supported(&ft) {
            warn!("archive: skipping unsupported entry {}", entry.path().display());
            stats.skipped += 1;
            continue;
        }
        if ft.is_dir() {
            tar.append_dir(&name, entry.path())
                .with_context(|| format!("archive dir {}", entry.path().display()))?;
            stats.dirs += 1;
        } else {
            tar.append_path_with_name(entry.path(), &name)
                .with_context(|| format!("archive {}", entry.path().display()))?;
            if ft.is_symlink() {
                stats.links += 1;
            } else {
                stats.files += 1;
                let meta = entry
                    .metadata()
                    .with_context(|| format!("stat {}", entry.path().display()))?;
                stats.bytes_in += meta.len();
            }
        }
    }

    let gz = tar
        .into_inner()
        .with_context(|| format!("finish tar {}", out.display()))?;
    let mut buf = gz
        .finish()
        .with_context(|| format!("finish gzip {}", out.display()))?;
    buf.flush()?;
    let file = buf
        .into_inner()
        .map_err(|e| anyhow!("flush {}: {}", out.display(), e.error()))?;
    if cfg.fsync {
        file.sync_all()
            .with_context(|| format!("fsync {}", out.display()))?;
    }

    debug!(
        "archive: {} -> {} (dirs={}, files={}, links={}, skipped={}, bytes_in={})",
        root.display(),
        out.display(),
        stats.dirs,
        stats.files,
        stats.links,
        stats.skipped,
        stats.bytes_in
    );
    Ok(stats)
}
