use anyhow::{anyhow, Result};
use std::path::PathBuf;

use pumkin::Repository;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let repo = Repository::open(&path)?;
    let report = repo.verify()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("checked    = {}", report.checked);
        println!("mismatched = {}", report.mismatched.len());
        for m in &report.mismatched {
            println!("  - {} (actual {})", m.expected, m.actual);
        }
        println!("missing    = {}", report.missing.len());
        for id in &report.missing {
            println!("  - {id}");
        }
    }

    if !report.is_clean() {
        return Err(anyhow!("verify: repository {} is not clean", path.display()));
    }
    Ok(())
}
