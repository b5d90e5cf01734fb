use chrono::NaiveDate;

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{TransactionDraft, TransactionType};

pub fn run(
    ctx: &Context,
    amount: f64,
    category: String,
    kind: TransactionType,
    date: Option<NaiveDate>,
    notes: Option<String>,
) -> Result<()> {
    let draft = TransactionDraft {
        id: None,
        amount,
        date: Some(date.unwrap_or_else(|| chrono::Local::now().date_naive())),
        category: Some(category),
        kind: Some(kind),
        notes,
    };
    let mut service = ctx.service();
    let id = service.add(&draft)?;
    println!(
        "Added transaction #{id}: {} {}",
        kind.as_str().to_lowercase(),
        money(amount, ctx.symbol())
    );
    Ok(())
}
