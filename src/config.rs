//! Centralized configuration for pumkin.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - `PumkinConfig::from_env()` reads the PUMKIN_* variables; `with_*` setters
//!   override individual fields on top of that.
//!
//! Defaults keep historic behavior: real file metadata goes into the archive
//! (so identical trees synced at different times may hash differently), gzip
//! level 6, staging file and log are fsynced.

use std::fmt;

use crate::consts::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_HASH_CHUNK_BYTES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PumkinConfig {
    /// gzip level 0..=9.
    /// Env: PUMKIN_COMPRESSION_LEVEL (default 6)
    pub compression_level: u32,

    /// Normalize per-entry metadata (mtime, uid/gid, mode) and sort traversal so
    /// that identical trees produce identical image ids.
    /// Env: PUMKIN_DETERMINISTIC = 0|1 (default 0)
    pub deterministic: bool,

    /// fsync the staging file before publishing and the log after appending.
    /// Env: PUMKIN_FSYNC = 0|1 (default 1)
    pub fsync: bool,

    /// Read size used while hashing a finished archive. Never 0.
    /// Env: PUMKIN_HASH_CHUNK_BYTES (default 65536)
    pub hash_chunk_bytes: usize,
}

impl Default for PumkinConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            deterministic: false,
            fsync: true,
            hash_chunk_bytes: DEFAULT_HASH_CHUNK_BYTES,
        }
    }
}

impl PumkinConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env`, with an explicit variable source.
    pub(crate) fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = get("PUMKIN_COMPRESSION_LEVEL") {
            if let Ok(n) = v.trim().parse::<u32>() {
                if n <= 9 {
                    cfg.compression_level = n;
                }
            }
        }

        if let Some(v) = get("PUMKIN_DETERMINISTIC") {
            cfg.deterministic = parse_flag(&v);
        }

        if let Some(v) = get("PUMKIN_FSYNC") {
            cfg.fsync = parse_flag(&v);
        }

        if let Some(v) = get("PUMKIN_HASH_CHUNK_BYTES") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.hash_chunk_bytes = n;
                }
            }
        }

        cfg
    }

    // Fluent setters (builder-style) to override specific fields.

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_deterministic(mut self, on: bool) -> Self {
        self.deterministic = on;
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    pub fn with_hash_chunk_bytes(mut self, n: usize) -> Self {
        self.hash_chunk_bytes = n.max(1);
        self
    }
}

fn parse_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "yes" || s == "on"
}

impl fmt::Display for PumkinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PumkinConfig {{ \
             compression_level: {}, \
             deterministic: {}, \
             fsync: {}, \
             hash_chunk_bytes: {} \
             }}",
            self.compression_level, self.deterministic, self.fsync, self.hash_chunk_bytes,
        )
    }
}
