//! "Executive report" tab: the drafted narrative and its artifact.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Wrap},
};
use tally_report::ArtifactKind;

use super::{hint, pane};
use crate::app::App;

pub fn draw<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>) {
  let Some(report) = &app.report else {
    let block = pane("Executive report");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let msg = if app.batch.is_none() {
      "No responses to report on. Press r to reload."
    } else if app.sentiment().is_none() {
      "Press Enter to draft the report. Run the AI analysis first to include sentiment."
    } else {
      "Press Enter to draft the report."
    };
    f.render_widget(hint(msg), inner);
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(4), Constraint::Min(0)])
    .split(area);

  // Artifact summary.
  let (kind, kind_style) = match report.artifact.kind {
    ArtifactKind::Pdf => ("PDF", Style::default().fg(Color::Green)),
    ArtifactKind::Text => ("plain text (PDF rendering failed)", Style::default().fg(Color::Yellow)),
  };
  let saved = match &app.saved_to {
    Some(path) => Span::raw(path.display().to_string()),
    None => Span::styled("not saved (press s)", Style::default().fg(Color::DarkGray)),
  };
  let label = Style::default().add_modifier(Modifier::BOLD);
  let summary = vec![
    Line::from(vec![
      Span::styled("File:  ", label),
      Span::raw(report.artifact.file_name.as_str()),
      Span::raw("  "),
      Span::styled(kind, kind_style),
    ]),
    Line::from(vec![Span::styled("Saved: ", label), saved]),
  ];
  let block = pane("Artifact");
  let inner = block.inner(rows[0]);
  f.render_widget(block, rows[0]);
  f.render_widget(Paragraph::new(summary), inner);

  // Narrative preview.
  let block = pane("Narrative");
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);
  f.render_widget(
    Paragraph::new(report.narrative.as_str())
      .wrap(Wrap { trim: false })
      .scroll((app.scroll, 0)),
    inner,
  );
}
