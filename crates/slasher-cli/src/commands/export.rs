//! Export command implementation

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use slasher_core::TransactionService;

pub fn cmd_export(service: &TransactionService, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    let written = service
        .export_csv(BufWriter::new(file))
        .context("Failed to write CSV")?;

    println!("📤 Exported {} transactions to {}", written, path.display());

    Ok(())
}
