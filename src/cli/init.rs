use std::path::PathBuf;

use crate::cli::Context;
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{save_settings, settings_path, expand_path};

pub fn run(ctx: &Context, data_dir: Option<String>, currency: Option<String>) -> Result<()> {
    let mut settings = ctx.settings.clone();
    if let Some(dir) = data_dir {
        settings.data_dir = expand_path(&dir).to_string_lossy().into_owned();
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }

    let data_path = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(data_path.join("exports"))?;
    save_settings(&settings)?;

    let db_path = ctx.db_path_for(&settings);
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    println!("Settings saved to {}", settings_path().display());
    println!("Data directory:   {}", data_path.display());
    println!("Database ready:   {}", db_path.display());
    Ok(())
}
