//! Image identifiers (SHA-1 of the compressed archive bytes).

use anyhow::{Context, Result};
use serde::{Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::consts::{DIGEST_HEX_LEN, DIGEST_LEN, IMAGE_EXT};
use crate::error::RepoError;

/// A 20-byte SHA-1 image identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId([u8; DIGEST_LEN]);

impl ImageId {
    /// Parse a 40-char lowercase hex string. Uppercase is rejected: ids are
    /// also file names and log lines, and both are always lowercase.
    pub fn from_hex(s: &str) -> std::result::Result<Self, RepoError> {
        if s.len() != DIGEST_HEX_LEN
            || !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(RepoError::InvalidImageId(s.to_string()));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| RepoError::InvalidImageId(s.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `<hex>.tar.gz`
    pub fn file_name(&self) -> String {
        format!("{}{}", self.to_hex(), IMAGE_EXT)
    }

    /// Inverse of `file_name`; None for anything else (e.g. the staging file).
    pub fn from_file_name(name: &str) -> Option<Self> {
        name.strip_suffix(IMAGE_EXT)
            .and_then(|stem| Self::from_hex(stem).ok())
    }

    /// SHA-1 of an in-memory buffer.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self::from_hasher(hasher)
    }

    fn from_hasher(hasher: Sha1) -> Self {
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.to_hex())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ImageId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

/// SHA-1 of everything readable from `r`, consumed `chunk` bytes at a time.
pub fn hash_reader<R: Read>(mut r: R, chunk: usize) -> std::io::Result<ImageId> {
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; chunk.max(1)];
    loop {
        let n = match r.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(ImageId::from_hasher(hasher))
}

/// SHA-1 of a whole file, read in bounded chunks.
pub fn hash_file(path: &Path, chunk: usize) -> Result<ImageId> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    hash_reader(f, chunk).with_context(|| format!("hash {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha1("abc")
    const ABC: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";

    #[test]
    fn known_vector() {
        assert_eq!(ImageId::of_bytes(b"abc").to_hex(), ABC);
    }

    #[test]
    fn chunking_does_not_change_digest() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let whole = ImageId::of_bytes(&data);
        for chunk in [1, 7, 64, 4096, 9_999, 10_000, 10_001, 1 << 20] {
            let got = hash_reader(&data[..], chunk).unwrap();
            assert_eq!(got, whole, "chunk={chunk}");
        }
    }

    #[test]
    fn hex_parsing() {
        let id = ImageId::from_hex(ABC).unwrap();
        assert_eq!(id.to_string(), ABC);
        assert!(ImageId::from_hex(&ABC.to_uppercase()).is_err());
        assert!(ImageId::from_hex(&ABC[..39]).is_err());
        assert!(ImageId::from_hex("zz993e364706816aba3e25717850c26c9cd0d89d").is_err());
    }

    #[test]
    fn file_names() {
        let id = ImageId::from_hex(ABC).unwrap();
        assert_eq!(id.file_name(), format!("{ABC}.tar.gz"));
        assert_eq!(ImageId::from_file_name(&id.file_name()), Some(id));
        assert_eq!(ImageId::from_file_name("tmp.tar.gz"), None);
        assert_eq!(ImageId::from_file_name(ABC), None);
    }
}
