use crate::cli::Context;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::tui::run_view;

pub fn run(ctx: &Context) -> Result<()> {
    let mut dashboard = Dashboard::new(ctx.service(), ctx.symbol())?;
    run_view(&mut dashboard)
}
