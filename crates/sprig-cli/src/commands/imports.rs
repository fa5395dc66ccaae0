//! Imports command: print the extractor's view of one file.

use sprig_graph::extract_imports;

use crate::cli::ImportsArgs;
use crate::error::{Result, ResultExt};

/// Execute the imports command.
pub async fn execute(args: ImportsArgs) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_path(&args.file)?;

    let imports = extract_imports(&content);
    tracing::debug!(file = %args.file.display(), count = imports.len(), "extracted imports");

    println!("{}", serde_json::to_string_pretty(&imports)?);
    Ok(())
}
