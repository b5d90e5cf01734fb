use std::io::{BufRead, Write};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::money;
use crate::service::check_id;

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn confirm(label: &str) -> Result<bool> {
    print!("{label} [y/N] ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().lock().read_line(&mut input)?;
    Ok(is_yes(&input))
}

pub fn run(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    check_id(id)?;
    let mut service = ctx.service();

    if !yes {
        let label = match service.get(id)? {
            Some(t) => format!(
                "Delete #{id} ({} {} {} on {})?",
                t.kind.as_str().to_lowercase(),
                money(t.amount, ctx.symbol()),
                t.category,
                t.date
            ),
            None => format!("Delete #{id}?"),
        };
        if !confirm(&label)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if service.delete(id)? == 0 {
        eprintln!("Warning: no transaction with ID {id}, nothing deleted");
    } else {
        println!("Deleted transaction #{id}");
    }
    Ok(())
}
