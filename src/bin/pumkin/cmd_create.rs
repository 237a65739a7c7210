use anyhow::Result;
use std::path::PathBuf;

use pumkin::repo;

pub fn exec(path: PathBuf) -> Result<()> {
    repo::create(&path)?;
    println!("Initialized repository at {}", path.display());
    Ok(())
}
