use chrono::NaiveDate;

use crate::cli::Context;
use crate::error::Result;
use crate::models::{TransactionDraft, TransactionType};
use crate::service::check_id;

/// Fields given on the command line; `None` keeps the stored value. Blank
/// notes clear the stored notes once the draft is validated.
#[derive(Debug, Default)]
pub struct Changes {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Changes {
    fn apply(self, draft: &mut TransactionDraft) {
        if let Some(amount) = self.amount {
            draft.amount = amount;
        }
        if let Some(category) = self.category {
            draft.category = Some(category);
        }
        if let Some(kind) = self.kind {
            draft.kind = Some(kind);
        }
        if let Some(date) = self.date {
            draft.date = Some(date);
        }
        if let Some(notes) = self.notes {
            draft.notes = Some(notes);
        }
    }
}

pub fn run(ctx: &Context, id: i64, changes: Changes) -> Result<()> {
    check_id(id)?;
    let mut service = ctx.service();
    let Some(existing) = service.get(id)? else {
        eprintln!("Warning: no transaction with ID {id}, nothing changed");
        return Ok(());
    };

    let mut draft = TransactionDraft::from(existing);
    changes.apply(&mut draft);

    if service.update(&draft)? == 0 {
        eprintln!("Warning: transaction #{id} was not changed");
    } else {
        println!("Updated transaction #{id}");
    }
    Ok(())
}
