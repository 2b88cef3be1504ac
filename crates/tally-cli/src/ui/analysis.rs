//! "AI analysis" tab.

use ratatui::{
  Frame,
  layout::Rect,
  widgets::{Paragraph, Wrap},
};

use super::{hint, pane};
use crate::app::App;

pub fn draw<S, C>(f: &mut Frame, area: Rect, app: &App<S, C>) {
  let block = pane("Sentiment analysis");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(text) = app.sentiment() else {
    let msg = if app.batch.is_none() {
      "No responses to analyse. Press r to reload."
    } else {
      "Press Enter to summarise the sentiment of the latest responses."
    };
    f.render_widget(hint(msg), inner);
    return;
  };

  f.render_widget(
    Paragraph::new(text)
      .wrap(Wrap { trim: false })
      .scroll((app.scroll, 0)),
    inner,
  );
}
