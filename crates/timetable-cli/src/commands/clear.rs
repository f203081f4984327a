use std::path::Path;

use crate::commands::common::open_mirror;
use crate::error::CliError;

pub async fn run_clear(db_path: &Path) -> Result<(), CliError> {
    let mirror = open_mirror(db_path).await?;
    mirror.clear().await?;
    println!("Cleared local mirror at {}", db_path.display());
    Ok(())
}
