use anyhow::Result;
use std::path::PathBuf;

use pumkin::Repository;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let repo = Repository::open(&path)?;
    let ids = repo.history()?;
    if json {
        println!("{}", serde_json::to_string(&ids)?);
        return Ok(());
    }
    if ids.is_empty() {
        println!("(no syncs)");
        return Ok(());
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}
