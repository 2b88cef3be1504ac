//! TUI rendering: header, sidebar, tab body and status bar.

mod analysis;
mod report;
mod sidebar;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{App, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S, C>(f: &mut Frame, app: &App<S, C>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%d/%m/%Y").to_string();

  let left = Span::styled(
    " tally  satisfaction survey dashboard",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(32), Constraint::Min(0)])
    .split(area);

  sidebar::draw(f, cols[0], app);

  let main = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(cols[1]);

  let titles = Tab::ALL.iter().map(|t| format!(" {} ", t.title()));
  let tabs = Tabs::new(titles)
    .select(app.tab.index())
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    )
    .highlight_style(
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, main[0]);

  match app.tab {
    Tab::Analysis => analysis::draw(f, main[1], app),
    Tab::Report => report::draw(f, main[1], app),
  }
}

/// A bordered pane with a dim border, shared by the tab bodies.
fn pane(title: &str) -> Block<'_> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

fn hint(text: &str) -> Paragraph<'_> {
  Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>) {
  let (mode_label, mode_color) = if app.pending.is_some() {
    ("WORKING", Color::Yellow)
  } else {
    ("READY", Color::Cyan)
  };

  let hints = match app.tab {
    Tab::Analysis => "Tab switch  Enter analyse  r reload  ↑↓ scroll  q quit",
    Tab::Report => "Tab switch  Enter generate  s save  r reload  ↑↓ scroll  q quit",
  };
  let status = if app.status_msg.is_empty() { hints } else { app.status_msg.as_str() };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(mode_color)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::Gray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
