use std::collections::BTreeMap;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{bar, money};
use crate::models::Summary;

const BAR_WIDTH: usize = 30;

pub const NO_EXPENSES: &str = "No expense data to display";

pub fn format_summary(summary: &Summary, symbol: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    for (name, label) in [("income", "Income"), ("expense", "Expense"), ("balance", "Balance")] {
        let value = summary.get(name).unwrap_or_default();
        let label = if name == "expense" || value < 0.0 {
            label.red().bold()
        } else {
            label.green().bold()
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(money(value, symbol)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// One line per category: label, bar, amount and share of total expense.
pub fn format_chart(totals: &BTreeMap<String, f64>, symbol: &str) -> String {
    let grand: f64 = totals.values().sum();
    if totals.is_empty() || grand <= 0.0 {
        return NO_EXPENSES.to_string();
    }
    let label_width = totals.keys().map(|k| k.chars().count()).max().unwrap_or(0);

    let mut sorted: Vec<(&String, &f64)> = totals.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut lines = vec!["Expenses by category".bold().to_string()];
    for (category, total) in sorted {
        let share = total / grand;
        lines.push(format!(
            "{category:<label_width$}  {}  {:>12}  {:>5.1}%",
            bar(share, BAR_WIDTH),
            money(*total, symbol),
            share * 100.0
        ));
    }
    lines.join("\n")
}

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let summary = ctx.service().summary()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", format_summary(&summary, ctx.symbol()));
    }
    Ok(())
}

pub fn chart(ctx: &Context) -> Result<()> {
    let totals = ctx.service().category_expense_totals()?;
    println!("{}", format_chart(&totals, ctx.symbol()));
    Ok(())
}
