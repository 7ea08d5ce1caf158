//! CSV export command

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::client::ApiClient;
use crate::output::print_success;

pub async fn export(client: &ApiClient, output: Option<PathBuf>) -> Result<()> {
    let csv = client.get_text("/session/export").await?;

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let rows = csv.lines().count().saturating_sub(1);
            print_success(&format!("Wrote {} rows to {}", rows, path.display()));
        }
        None => print!("{}", csv),
    }
    Ok(())
}
