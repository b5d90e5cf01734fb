use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{Transaction, TransactionFilter};

pub const NO_RECORDS: &str = "No records found.";

pub fn render_table(rows: &[Transaction], symbol: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Type", "Category", "Amount", "Notes"]);
    for t in rows {
        table.add_row(vec![
            Cell::new(t.id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::new(t.date),
            Cell::new(t.kind),
            Cell::new(&t.category),
            Cell::new(money(t.amount, symbol)).set_alignment(CellAlignment::Right),
            Cell::new(t.notes.as_deref().unwrap_or_default()),
        ]);
    }
    table.to_string()
}

/// All records when the filter is empty, otherwise the filtered ones.
pub fn fetch(ctx: &Context, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let mut service = ctx.service();
    if filter.is_empty() {
        service.list_all()
    } else {
        service.filter(filter)
    }
}

pub fn run(ctx: &Context, filter: TransactionFilter, json: bool) -> Result<()> {
    let rows = fetch(ctx, &filter)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("{NO_RECORDS}");
    } else {
        println!("{}", render_table(&rows, ctx.symbol()));
    }
    Ok(())
}
