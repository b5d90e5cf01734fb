use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::error::{Result, ValidationError};
use crate::gateway::TransactionGateway;
use crate::models::{Summary, Transaction, TransactionDraft, TransactionFilter, TransactionType};

/// Field-level checks applied before every write.
pub fn validate(draft: &TransactionDraft) -> std::result::Result<Transaction, ValidationError> {
    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    let date = check_date(draft.date.ok_or(ValidationError::MissingDate)?)?;
    let category = match draft.category.as_deref() {
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => return Err(ValidationError::BlankCategory),
    };
    let kind = draft.kind.ok_or(ValidationError::MissingType)?;

    Ok(Transaction {
        id: draft.id,
        amount: draft.amount,
        date,
        category,
        kind,
        notes: draft.notes.clone().filter(|n| !n.trim().is_empty()),
    })
}

/// Dates are stored as `YYYY-MM-DD` text, which only sorts and compares
/// correctly for four-digit years.
fn check_date(date: NaiveDate) -> std::result::Result<NaiveDate, ValidationError> {
    if !(0..=9999).contains(&date.year()) {
        return Err(ValidationError::DateOutOfRange(date));
    }
    Ok(date)
}

pub fn check_id(id: i64) -> std::result::Result<i64, ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidId(id));
    }
    Ok(id)
}

pub struct TransactionService {
    gateway: TransactionGateway,
}

impl TransactionService {
    pub fn new(gateway: TransactionGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway_mut(&mut self) -> &mut TransactionGateway {
        &mut self.gateway
    }

    pub fn add(&mut self, draft: &TransactionDraft) -> Result<i64> {
        let t = validate(draft)?;
        self.gateway.insert(&t)
    }

    /// Returns the number of rows changed. An id that matches nothing is not
    /// an error; the count is 0.
    pub fn update(&mut self, draft: &TransactionDraft) -> Result<usize> {
        let id = check_id(draft.id.unwrap_or(0))?;
        let t = validate(draft)?;
        let changed = self.gateway.update(id, &t)?;
        if changed == 0 {
            warn!(id, "update matched no transaction");
        }
        Ok(changed)
    }

    pub fn delete(&mut self, id: i64) -> Result<usize> {
        let id = check_id(id)?;
        let changed = self.gateway.delete(id)?;
        if changed == 0 {
            warn!(id, "delete matched no transaction");
        }
        Ok(changed)
    }

    pub fn get(&mut self, id: i64) -> Result<Option<Transaction>> {
        let id = check_id(id)?;
        self.gateway.get(id)
    }

    pub fn list_all(&mut self) -> Result<Vec<Transaction>> {
        self.gateway.list_all()
    }

    pub fn filter(&mut self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        for bound in [filter.start, filter.end].into_iter().flatten() {
            check_date(bound)?;
        }
        if let (Some(start), Some(end)) = (filter.start, filter.end) {
            if start > end {
                return Err(ValidationError::StartAfterEnd { start, end }.into());
            }
        }
        self.gateway.filter(filter)
    }

    /// Totals over every stored transaction, recomputed on each call.
    pub fn summary(&mut self) -> Result<Summary> {
        let all = self.gateway.list_all()?;
        let mut income = 0.0;
        let mut expense = 0.0;
        for t in &all {
            match t.kind {
                TransactionType::Income => income += t.amount,
                TransactionType::Expense => expense += t.amount,
            }
        }
        debug!(rows = all.len(), income, expense, "computed summary");
        Ok(Summary {
            income,
            expense,
            balance: income - expense,
        })
    }

    /// Expense totals keyed by the exact category label.
    pub fn category_expense_totals(&mut self) -> Result<BTreeMap<String, f64>> {
        let mut totals = BTreeMap::new();
        for t in self.gateway.list_all()? {
            if t.kind == TransactionType::Expense {
                *totals.entry(t.category).or_insert(0.0) += t.amount;
            }
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;

    fn test_service() -> (tempfile::TempDir, TransactionService) {
        let dir = tempfile::tempdir().unwrap();
        let service = TransactionService::new(TransactionGateway::new(dir.path().join("test.db")));
        (dir, service)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(amount: f64, category: &str, kind: TransactionType) -> TransactionDraft {
        TransactionDraft {
            id: None,
            amount,
            date: Some(date("2025-01-15")),
            category: Some(category.to_string()),
            kind: Some(kind),
            notes: None,
        }
    }

    fn validation_err<T: std::fmt::Debug>(result: Result<T>) -> ValidationError {
        match result {
            Err(TallyError::Validation(e)) => e,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        let t = validate(&draft(0.01, "Food", TransactionType::Expense)).unwrap();
        assert_eq!(t.amount, 0.01);
        assert_eq!(t.category, "Food");
        assert_eq!(t.id, None);
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        for amount in [0.0, -0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let d = draft(amount, "Food", TransactionType::Expense);
            assert_eq!(validate(&d), Err(ValidationError::NonPositiveAmount), "amount {amount}");
        }
    }

    #[test]
    fn test_amount_checked_before_other_fields() {
        let d = TransactionDraft { amount: -1.0, ..Default::default() };
        assert_eq!(validate(&d), Err(ValidationError::NonPositiveAmount));
    }

    #[test]
    fn test_validate_requires_date() {
        let d = TransactionDraft { date: None, ..draft(5.0, "Food", TransactionType::Expense) };
        assert_eq!(validate(&d), Err(ValidationError::MissingDate));
    }

    #[test]
    fn test_validate_rejects_blank_category() {
        for category in [None, Some(""), Some("   \t")] {
            let d = TransactionDraft {
                category: category.map(str::to_string),
                ..draft(5.0, "x", TransactionType::Expense)
            };
            assert_eq!(validate(&d), Err(ValidationError::BlankCategory));
        }
    }

    #[test]
    fn test_validate_keeps_category_as_entered() {
        let t = validate(&draft(5.0, "  Eating Out ", TransactionType::Expense)).unwrap();
        assert_eq!(t.category, "  Eating Out ");
    }

    #[test]
    fn test_validate_rejects_five_digit_years() {
        for d in [NaiveDate::from_ymd_opt(10000, 1, 1), NaiveDate::from_ymd_opt(-1, 12, 31)] {
            let mut dated = draft(5.0, "Food", TransactionType::Expense);
            dated.date = d;
            assert_eq!(validate(&dated), Err(ValidationError::DateOutOfRange(d.unwrap())));
        }
        let mut edge = draft(5.0, "Food", TransactionType::Expense);
        edge.date = NaiveDate::from_ymd_opt(9999, 12, 31);
        assert!(validate(&edge).is_ok());
    }

    #[test]
    fn test_validate_drops_blank_notes() {
        for notes in ["", "   "] {
            let mut d = draft(5.0, "Food", TransactionType::Expense);
            d.notes = Some(notes.to_string());
            assert_eq!(validate(&d).unwrap().notes, None);
        }
        let mut d = draft(5.0, "Food", TransactionType::Expense);
        d.notes = Some(" lunch ".to_string());
        assert_eq!(validate(&d).unwrap().notes.as_deref(), Some(" lunch "));
    }

    #[test]
    fn test_summary_stays_finite_after_rejected_infinite_amount() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(10.0, "Salary", TransactionType::Income)).unwrap();
        for kind in [TransactionType::Income, TransactionType::Expense] {
            let err = validation_err(svc.add(&draft(f64::INFINITY, "Big", kind)));
            assert_eq!(err, ValidationError::NonPositiveAmount);
        }
        let s = svc.summary().unwrap();
        assert_eq!((s.income, s.expense, s.balance), (10.0, 0.0, 10.0));
    }

    #[test]
    fn test_filter_rejects_bounds_outside_four_digit_years() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(1.0, "Food", TransactionType::Expense)).unwrap();
        let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let filter = TransactionFilter { start: Some(far), ..Default::default() };
        assert_eq!(validation_err(svc.filter(&filter)), ValidationError::DateOutOfRange(far));
    }

    #[test]
    fn test_validate_requires_type() {
        let d = TransactionDraft { kind: None, ..draft(5.0, "Food", TransactionType::Expense) };
        assert_eq!(validate(&d), Err(ValidationError::MissingType));
    }

    #[test]
    fn test_add_appends_one_record() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(100.0, "Salary", TransactionType::Income)).unwrap();
        let before = svc.list_all().unwrap().len();

        let mut d = draft(12.5, "Books", TransactionType::Expense);
        d.notes = Some("paperback".to_string());
        let id = svc.add(&d).unwrap();

        let all = svc.list_all().unwrap();
        assert_eq!(all.len(), before + 1);
        let added = all.iter().find(|t| t.id == Some(id)).unwrap();
        assert!(id > 0);
        assert_eq!(added.amount, 12.5);
        assert_eq!(added.date, date("2025-01-15"));
        assert_eq!(added.category, "Books");
        assert_eq!(added.kind, TransactionType::Expense);
        assert_eq!(added.notes.as_deref(), Some("paperback"));
    }

    #[test]
    fn test_add_invalid_writes_nothing() {
        let (_dir, mut svc) = test_service();
        let err = validation_err(svc.add(&draft(0.0, "Food", TransactionType::Expense)));
        assert_eq!(err, ValidationError::NonPositiveAmount);
        assert!(svc.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_replaces_fields_under_same_id() {
        let (_dir, mut svc) = test_service();
        let id = svc.add(&draft(10.0, "Food", TransactionType::Expense)).unwrap();

        let d = TransactionDraft {
            id: Some(id),
            amount: 250.0,
            date: Some(date("2025-03-01")),
            category: Some("Freelance".to_string()),
            kind: Some(TransactionType::Income),
            notes: Some("invoice 7".to_string()),
        };
        assert_eq!(svc.update(&d).unwrap(), 1);

        let all = svc.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], validate(&d).unwrap());
    }

    #[test]
    fn test_update_rejects_missing_or_non_positive_id() {
        let (_dir, mut svc) = test_service();
        let d = draft(10.0, "Food", TransactionType::Expense);
        assert_eq!(validation_err(svc.update(&d)), ValidationError::InvalidId(0));

        let d = TransactionDraft { id: Some(-3), ..d };
        assert_eq!(validation_err(svc.update(&d)), ValidationError::InvalidId(-3));
    }

    #[test]
    fn test_update_checks_id_before_fields() {
        let (_dir, mut svc) = test_service();
        let d = TransactionDraft { id: Some(0), amount: -1.0, ..Default::default() };
        assert_eq!(validation_err(svc.update(&d)), ValidationError::InvalidId(0));
    }

    #[test]
    fn test_update_unknown_id_is_silent() {
        let (_dir, mut svc) = test_service();
        let d = TransactionDraft { id: Some(77), ..draft(10.0, "Food", TransactionType::Expense) };
        assert_eq!(svc.update(&d).unwrap(), 0);
        assert!(svc.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_removes_record() {
        let (_dir, mut svc) = test_service();
        let keep = svc.add(&draft(1.0, "A", TransactionType::Expense)).unwrap();
        let gone = svc.add(&draft(2.0, "B", TransactionType::Expense)).unwrap();

        assert_eq!(svc.delete(gone).unwrap(), 1);

        let ids: Vec<i64> = svc.list_all().unwrap().iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn test_delete_rejects_non_positive_id() {
        let (_dir, mut svc) = test_service();
        assert_eq!(validation_err(svc.delete(0)), ValidationError::InvalidId(0));
        assert_eq!(validation_err(svc.delete(-1)), ValidationError::InvalidId(-1));
    }

    #[test]
    fn test_delete_unknown_id_is_silent() {
        let (_dir, mut svc) = test_service();
        assert_eq!(svc.delete(5).unwrap(), 0);
    }

    #[test]
    fn test_filter_by_range_matches_list_subset() {
        let (_dir, mut svc) = test_service();
        for (i, day) in ["2025-01-01", "2025-01-15", "2025-02-01", "2025-02-28", "2025-03-10"]
            .iter()
            .enumerate()
        {
            let d = TransactionDraft {
                date: Some(date(day)),
                ..draft(10.0 + i as f64, "Misc", TransactionType::Expense)
            };
            svc.add(&d).unwrap();
        }
        let (d1, d2) = (date("2025-01-15"), date("2025-02-28"));
        let filter = TransactionFilter { start: Some(d1), end: Some(d2), ..Default::default() };

        let filtered = svc.filter(&filter).unwrap();
        let expected: Vec<Transaction> = svc
            .list_all()
            .unwrap()
            .into_iter()
            .filter(|t| d1 <= t.date && t.date <= d2)
            .collect();
        assert_eq!(filtered, expected);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filter_same_day_range_allowed() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(10.0, "Food", TransactionType::Expense)).unwrap();
        let d = date("2025-01-15");
        let filter = TransactionFilter { start: Some(d), end: Some(d), ..Default::default() };
        assert_eq!(svc.filter(&filter).unwrap().len(), 1);
    }

    #[test]
    fn test_filter_start_after_end_fails() {
        let (_dir, mut svc) = test_service();
        let filter = TransactionFilter {
            start: Some(date("2025-02-01")),
            end: Some(date("2025-01-01")),
            ..Default::default()
        };
        assert_eq!(
            validation_err(svc.filter(&filter)),
            ValidationError::StartAfterEnd { start: date("2025-02-01"), end: date("2025-01-01") }
        );
    }

    #[test]
    fn test_summary_totals() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(100.0, "Salary", TransactionType::Income)).unwrap();
        svc.add(&draft(40.0, "Food", TransactionType::Expense)).unwrap();
        svc.add(&draft(10.0, "Food", TransactionType::Expense)).unwrap();

        let s = svc.summary().unwrap();
        assert_eq!(s, Summary { income: 100.0, expense: 50.0, balance: 50.0 });
    }

    #[test]
    fn test_summary_empty_is_zero() {
        let (_dir, mut svc) = test_service();
        assert_eq!(svc.summary().unwrap(), Summary::default());
    }

    #[test]
    fn test_summary_reflects_later_writes() {
        let (_dir, mut svc) = test_service();
        let id = svc.add(&draft(30.0, "Food", TransactionType::Expense)).unwrap();
        assert_eq!(svc.summary().unwrap().balance, -30.0);
        svc.delete(id).unwrap();
        assert_eq!(svc.summary().unwrap().balance, 0.0);
    }

    #[test]
    fn test_category_expense_totals() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(40.0, "Food", TransactionType::Expense)).unwrap();
        svc.add(&draft(10.0, "Food", TransactionType::Expense)).unwrap();
        svc.add(&draft(20.0, "Transport", TransactionType::Expense)).unwrap();
        svc.add(&draft(500.0, "Food", TransactionType::Income)).unwrap();

        let totals = svc.category_expense_totals().unwrap();
        let expected: BTreeMap<String, f64> =
            [("Food".to_string(), 50.0), ("Transport".to_string(), 20.0)].into_iter().collect();
        assert_eq!(totals, expected);
    }

    #[test]
    fn test_category_totals_keep_labels_distinct() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(1.0, "Food", TransactionType::Expense)).unwrap();
        svc.add(&draft(2.0, "food", TransactionType::Expense)).unwrap();
        let totals = svc.category_expense_totals().unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["food"], 2.0);
    }

    #[test]
    fn test_list_all_is_repeatable() {
        let (_dir, mut svc) = test_service();
        svc.add(&draft(1.0, "A", TransactionType::Expense)).unwrap();
        svc.add(&draft(2.0, "B", TransactionType::Income)).unwrap();
        assert_eq!(svc.list_all().unwrap(), svc.list_all().unwrap());
    }
}
