use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{format_bytes, money};
use crate::settings::settings_path;

pub fn run(ctx: &Context) -> Result<()> {
    let settings_file = settings_path();
    println!(
        "Settings:   {}{}",
        settings_file.display(),
        if settings_file.exists() { "" } else { " (defaults)" }
    );
    println!("Data dir:   {}", ctx.settings.data_dir);
    println!("Database:   {}", ctx.db_path.display());
    println!("Currency:   {}", ctx.symbol());

    if ctx.db_path.exists() {
        let mut service = ctx.service();
        let count = service.gateway_mut().count()?;
        let summary = service.summary()?;
        // closing checkpoints the WAL so the size below is the whole database
        service.gateway_mut().close()?;

        let size = std::fs::metadata(&ctx.db_path)?.len();
        println!("DB size:    {}", format_bytes(size));
        println!();
        println!("Transactions:  {count}");
        println!("Balance:       {}", money(summary.balance, ctx.symbol()));
    } else {
        println!();
        println!("Database not found. Run `tally init` or `tally add` to create it.");
    }
    Ok(())
}
