// On-disk names of a pumkin repository. These are part of the interop surface
// with existing repositories and must not change.

/// Hidden metadata directory under the repository root.
pub const METADATA_DIR: &str = ".pumkin";

/// Published images live here: <root>/.pumkin/images/<sha1>.tar.gz
pub const IMAGES_DIR: &str = "images";

/// Newline-separated history of image ids, oldest first, no trailing newline.
pub const COMMITS_FILE: &str = "COMMITS";

/// Staging file for the archive being built. Absent between syncs.
pub const TMP_IMAGE_FILE: &str = "tmp.tar.gz";

/// Extension of every published image.
pub const IMAGE_EXT: &str = ".tar.gz";

/// SHA-1: 20 bytes, 40 lowercase hex chars.
pub const DIGEST_LEN: usize = 20;
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// Default read size when hashing a finished archive.
pub const DEFAULT_HASH_CHUNK_BYTES: usize = 64 * 1024;

/// Default gzip level (same as flate2::Compression::default()).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
