//! Repository store: metadata layout under <root>/.pumkin and the handle used
//! by the snapshot engine.
//!
//! Layout:
//!   <root>/.pumkin/
//!   <root>/.pumkin/images/<sha1>.tar.gz
//!   <root>/.pumkin/images/tmp.tar.gz   (staging, only during sync)
//!   <root>/.pumkin/COMMITS

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PumkinConfig;
use crate::consts::{COMMITS_FILE, IMAGES_DIR, METADATA_DIR, TMP_IMAGE_FILE};
use crate::digest::ImageId;
use crate::error::RepoError;
use crate::history;
use crate::snapshot::{self, VerifyReport};

/// Initialize a repository at `root`: creates `.pumkin` and `.pumkin/images`.
pub fn create(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(RepoError::NotADirectory(root.to_path_buf()).into());
    }
    let meta = root.join(METADATA_DIR);
    if meta.is_dir() {
        return Err(RepoError::RepositoryExists(meta).into());
    }
    fs::create_dir(&meta).with_context(|| format!("create {}", meta.display()))?;
    let images = meta.join(IMAGES_DIR);
    fs::create_dir(&images).with_context(|| format!("create {}", images.display()))?;
    info!("create: initialized repository at {}", root.display());
    Ok(())
}

/// True iff `root` is a directory holding a metadata directory. Never fails.
pub fn exists(root: &Path) -> bool {
    root.is_dir() && root.join(METADATA_DIR).is_dir()
}

/// `<root>/.pumkin`, or `RepositoryDoesNotExist`.
pub fn metadata_dir(root: &Path) -> Result<PathBuf> {
    if !exists(root) {
        return Err(RepoError::RepositoryDoesNotExist(root.to_path_buf()).into());
    }
    Ok(root.join(METADATA_DIR))
}

/// Validated handle to an existing repository.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    meta: PathBuf,
    cfg: PumkinConfig,
}

impl Repository {
    /// Create a repository and open it with configuration from the environment.
    pub fn create(root: &Path) -> Result<Self> {
        create(root)?;
        Self::open(root)
    }

    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_config(root, PumkinConfig::from_env())
    }

    pub fn open_with_config(root: &Path, cfg: PumkinConfig) -> Result<Self> {
        let meta = metadata_dir(root)?;
        debug!("open: root={}, {}", root.display(), cfg);
        Ok(Self {
            root: root.to_path_buf(),
            meta,
            cfg,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.meta
    }

    pub fn images_dir(&self) -> PathBuf {
        self.meta.join(IMAGES_DIR)
    }

    pub fn commits_path(&self) -> PathBuf {
        self.meta.join(COMMITS_FILE)
    }

    pub fn tmp_image_path(&self) -> PathBuf {
        self.images_dir().join(TMP_IMAGE_FILE)
    }

    pub fn image_path(&self, id: &ImageId) -> PathBuf {
        self.images_dir().join(id.file_name())
    }

    pub fn config(&self) -> &PumkinConfig {
        &self.cfg
    }

    /// Archive the tree, publish the image and record it in history.
    pub fn sync(&self) -> Result<ImageId> {
        snapshot::sync_repo(self)
    }

    /// Recorded image ids, oldest first.
    pub fn history(&self) -> Result<Vec<ImageId>> {
        history::read_history(&self.commits_path())
    }

    /// Published images, sorted by id.
    pub fn images(&self) -> Result<Vec<ImageId>> {
        snapshot::list_images(self)
    }

    /// Re-hash every published image and cross-check history.
    pub fn verify(&self) -> Result<VerifyReport> {
        snapshot::verify_repo(self)
    }
}
