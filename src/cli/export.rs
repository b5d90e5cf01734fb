use std::path::{Path, PathBuf};

use crate::cli::list::fetch;
use crate::cli::Context;
use crate::error::Result;
use crate::models::{Transaction, TransactionFilter};

fn default_path(data_dir: &Path) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    data_dir.join("exports").join(format!("transactions-{date}.csv"))
}

/// Header row is `id,amount,date,category,type,notes`.
pub fn write_csv(rows: &[Transaction], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for t in rows {
        writer.serialize(t)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run(ctx: &Context, filter: TransactionFilter, output: Option<PathBuf>) -> Result<()> {
    let rows = fetch(ctx, &filter)?;
    let path = output.unwrap_or_else(|| default_path(Path::new(&ctx.settings.data_dir)));
    write_csv(&rows, &path)?;
    tracing::info!(rows = rows.len(), path = %path.display(), "exported transactions");
    println!("Exported {} transactions to {}", rows.len(), path.display());
    Ok(())
}
