use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::Frame;

use crate::error::Result;
use crate::fmt::money;
use crate::models::TransactionType;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const INCOME_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const EXPENSE_STYLE: Style = Style::new().fg(Color::Red);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub fn kind_style(kind: TransactionType) -> Style {
    match kind {
        TransactionType::Income => INCOME_STYLE,
        TransactionType::Expense => EXPENSE_STYLE,
    }
}

/// Amount as a colored Span: green for income, red for expense.
pub fn money_span(kind: TransactionType, amount: f64, symbol: &str) -> Span<'static> {
    Span::styled(money(amount, symbol), kind_style(kind))
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

pub enum ViewAction {
    Continue,
    Close,
}

pub trait View {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ViewAction;
}

/// Restores the terminal when dropped, on early return as well as normal exit.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Route one terminal event to the view. Only key presses reach it; Ctrl-C
/// always closes.
fn dispatch(view: &mut dyn View, event: Event) -> ViewAction {
    let Event::Key(key) = event else {
        return ViewAction::Continue;
    };
    if key.kind != KeyEventKind::Press {
        return ViewAction::Continue;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return ViewAction::Close;
    }
    view.handle_key(key.code)
}

/// Run an interactive view until it closes. Each event is followed by a
/// redraw, so state changed by a key shows up immediately.
pub fn run_view(view: &mut dyn View) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let _guard = TerminalGuard;
    loop {
        terminal.draw(|frame| view.draw(frame))?;
        if let ViewAction::Close = dispatch(view, event::read()?) {
            return Ok(());
        }
    }
}
