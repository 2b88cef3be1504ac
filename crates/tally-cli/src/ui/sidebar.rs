//! Sidebar: connection state, batch figures and key hints.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::pane;
use crate::app::App;

pub fn draw<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>) {
  let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

  let (conn_text, conn_style) = if app.connected {
    ("● connected", Style::default().fg(Color::Green))
  } else {
    ("● unavailable", Style::default().fg(Color::Red))
  };

  let mut lines = vec![
    Line::from(Span::styled("Database", label)),
    Line::from(Span::styled(conn_text, conn_style)),
    Line::from(""),
  ];

  match &app.stats {
    Some(stats) => {
      let (start, end) = stats.period.local_dates();
      lines.extend([
        Line::from(Span::styled("Responses", label)),
        Line::from(format!("{} records", stats.total)),
        Line::from(format!("{} sectors", stats.distinct_sectors)),
        Line::from(format!(
          "{} missing material ({:.1}%)",
          stats.material_missing,
          stats.material_missing_pct()
        )),
        Line::from(format!("{} – {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))),
        Line::from(""),
        Line::from(Span::styled("Quality", label)),
      ]);
      lines.extend(
        stats
          .quality_distribution
          .iter()
          .map(|q| Line::from(format!("{:<10} {:>4}", q.quality.as_str(), q.count))),
      );
    }
    None => lines.push(Line::from(Span::styled(
      "No responses loaded.",
      Style::default().fg(Color::DarkGray),
    ))),
  }

  lines.extend([
    Line::from(""),
    Line::from(Span::styled("Narrative", label)),
    Line::from(if app.dashboard.narrative_enabled() { "enabled" } else { "disabled (no API key)" }),
  ]);

  let block = pane("Overview");
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(lines), inner);
}
