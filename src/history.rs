//! COMMITS: newline-separated image ids, oldest first, no trailing newline.
//!
//! Writes are appends (open for append, one entry, flush, optional fsync), so
//! earlier entries are never rewritten.

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::Path;

use crate::digest::ImageId;

/// Parse the log. Missing file means empty history; blank lines are skipped.
pub fn read_history(path: &Path) -> Result<Vec<ImageId>> {
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id = ImageId::from_hex(line)
            .map_err(|e| anyhow!("{}:{}: {}", path.display(), i + 1, e))?;
        out.push(id);
    }
    Ok(out)
}

/// Append one id. Existing content stays byte-for-byte; a separator newline is
/// written only when there is something before the new entry.
pub fn append_entry(path: &Path, id: &ImageId, fsync: bool) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;

    let len = f.metadata()?.len();
    let has_entries = len > 0 && has_non_whitespace(&mut f)?;

    if len > 0 && !has_entries {
        // Only whitespace so far: treat as empty history.
        warn!(
            "history: {} holds {} byte(s) of whitespace only, resetting",
            path.display(),
            len
        );
        f.set_len(0)?;
    }

    let line = if has_entries {
        format!("\n{}", id)
    } else {
        id.to_hex()
    };
    f.write_all(line.as_bytes())
        .with_context(|| format!("append {}", path.display()))?;
    f.flush()?;
    if fsync {
        f.sync_all()
            .with_context(|| format!("fsync {}", path.display()))?;
    }
    debug!("history: appended {} to {}", id, path.display());
    Ok(())
}

// Stops at the first non-whitespace byte, which for a normal log is byte 0.
fn has_non_whitespace<R: Read>(r: R) -> Result<bool> {
    for b in BufReader::new(r).bytes() {
        if !b?.is_ascii_whitespace() {
            return Ok(true);
        }
    }
    Ok(false)
}
