use std::collections::BTreeMap;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::Result;
use crate::fmt::money;
use crate::models::{Summary, Transaction};
use crate::service::TransactionService;
use crate::tui::{
    kind_style, money_span, wrap_text, View, ViewAction, EXPENSE_STYLE, FOOTER_STYLE,
    HEADER_STYLE, INCOME_STYLE, SELECTED_STYLE,
};

const NOTES_MIN_WIDTH: usize = 10;

enum Mode {
    Normal,
    ConfirmDelete(i64),
}

/// Summary, transaction list and expense-by-category chart on one screen.
pub struct Dashboard {
    service: TransactionService,
    symbol: String,
    rows: Vec<Transaction>,
    summary: Summary,
    category_totals: BTreeMap<String, f64>,
    selected: usize,
    mode: Mode,
    status_message: Option<String>,
    table_state: TableState,
}

impl Dashboard {
    pub fn new(service: TransactionService, symbol: impl Into<String>) -> Result<Self> {
        let mut dashboard = Self {
            service,
            symbol: symbol.into(),
            rows: Vec::new(),
            summary: Summary::default(),
            category_totals: BTreeMap::new(),
            selected: 0,
            mode: Mode::Normal,
            status_message: None,
            table_state: TableState::default(),
        };
        dashboard.refresh()?;
        Ok(dashboard)
    }

    /// Reload rows and aggregates from the database.
    pub fn refresh(&mut self) -> Result<()> {
        self.rows = self.service.list_all()?;
        self.summary = self.service.summary()?;
        self.category_totals = self.service.category_expense_totals()?;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        Ok(())
    }

    fn selected_row(&self) -> Option<&Transaction> {
        self.rows.get(self.selected)
    }

    fn delete_confirmed(&mut self, id: i64) {
        let outcome = self.service.delete(id).and_then(|changed| {
            self.refresh()?;
            Ok(changed)
        });
        self.status_message = Some(match outcome {
            Ok(0) => format!("Transaction #{id} no longer exists"),
            Ok(_) => format!("Deleted transaction #{id}"),
            Err(e) => format!("Delete failed: {e}"),
        });
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw("Income "),
            Span::styled(money(self.summary.income, &self.symbol), INCOME_STYLE),
            Span::raw("   Expense "),
            Span::styled(money(self.summary.expense, &self.symbol), EXPENSE_STYLE),
            Span::raw("   Balance "),
            Span::styled(
                money(self.summary.balance, &self.symbol),
                Style::new().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        // id, date, amount, category, type
        let fixed: u16 = 6 + 10 + 14 + 18 + 8;
        let spacing = 5;
        let notes_width = (area.width.saturating_sub(fixed + spacing) as usize).max(NOTES_MIN_WIDTH);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|t| {
                let (notes, height) = wrap_text(t.notes.as_deref().unwrap_or(""), notes_width);
                Row::new(vec![
                    Cell::from(t.id.map(|id| id.to_string()).unwrap_or_default()),
                    Cell::from(t.date.to_string()),
                    Cell::from(money_span(t.kind, t.amount, &self.symbol)),
                    Cell::from(t.category.clone()),
                    Cell::from(Span::styled(t.kind.as_str(), kind_style(t.kind))),
                    Cell::from(notes),
                ])
                .height(height)
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Fill(1),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["ID", "Date", "Amount", "Category", "Type", "Notes"])
                    .style(HEADER_STYLE)
                    .bottom_margin(1),
            )
            .block(Block::default().title("Transactions").borders(Borders::ALL))
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);

        if self.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Expenses by Category")
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL);

        if self.category_totals.is_empty() {
            frame.render_widget(
                Paragraph::new("No expense data to display").style(FOOTER_STYLE).block(block),
                area,
            );
            return;
        }

        let total: f64 = self.category_totals.values().sum();
        let bars: Vec<Bar> = self
            .category_totals
            .iter()
            .map(|(name, amount)| {
                let pct = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
                Bar::default()
                    .label(Line::from(name.clone()))
                    // BarChart wants integers; whole cents keep small categories visible
                    .value((amount * 100.0).round() as u64)
                    .text_value(format!("{} ({pct:.0}%)", money(*amount, &self.symbol)))
                    .style(EXPENSE_STYLE)
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }
}

impl View for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        let [title_area, summary_area, body_area, status_area, keys_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new("Tally").style(HEADER_STYLE), title_area);
        self.draw_summary(frame, summary_area);

        let [table_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .areas(body_area);
        self.draw_table(frame, table_area);
        self.draw_chart(frame, chart_area);

        let status = match &self.status_message {
            Some(msg) => format!("{} transactions | {msg}", self.rows.len()),
            None if self.rows.is_empty() => "No records found".to_string(),
            None => format!("{} transactions", self.rows.len()),
        };
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), status_area);

        let keys = match self.mode {
            Mode::Normal => Paragraph::new(
                "\u{2191}/\u{2193}:select  Home/End:jump  d:delete  r:refresh  q:quit",
            )
            .style(FOOTER_STYLE),
            Mode::ConfirmDelete(id) => {
                Paragraph::new(format!("Delete transaction #{id}? y:yes  any other key:cancel"))
            }
        };
        frame.render_widget(keys, keys_area);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        if let Mode::ConfirmDelete(id) = self.mode {
            self.mode = Mode::Normal;
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.delete_confirmed(id);
            } else {
                self.status_message = Some("Delete cancelled".to_string());
            }
            return ViewAction::Continue;
        }

        self.status_message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.rows.len().saturating_sub(1),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_row().and_then(|t| t.id) {
                    self.mode = Mode::ConfirmDelete(id);
                }
            }
            KeyCode::Char('r') => {
                self.status_message = Some(match self.refresh() {
                    Ok(()) => "Refreshed".to_string(),
                    Err(e) => format!("Refresh failed: {e}"),
                });
            }
            _ => {}
        }
        ViewAction::Continue
    }
}
