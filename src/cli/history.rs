use std::path::PathBuf;

use super::stats::print_rollup;
use crate::{aggregate, success, warning};

/// Ranks exported streaming-history files by listening time.
pub async fn history(files: Vec<PathBuf>) {
    match aggregate::import_history(&files).await {
        Ok(rollup) => {
            print_rollup(&rollup);
            success!("Imported history computed.");
        }
        Err(e) => warning!("{}", e),
    }
}
