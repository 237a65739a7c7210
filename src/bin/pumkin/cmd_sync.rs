use anyhow::{Context, Result};
use std::path::PathBuf;

use pumkin::Repository;

pub fn exec(path: PathBuf) -> Result<()> {
    let repo = Repository::open(&path)?;
    let id = repo
        .sync()
        .with_context(|| format!("sync {}", path.display()))?;
    println!("{id}");
    Ok(())
}
