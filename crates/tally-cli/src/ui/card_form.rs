//! Create/edit form — five fields plus a live derived-field preview.

use chrono::Local;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, FIELD_LABELS};

/// Render the form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let form = &app.form;

  let title = match form.editing {
    Some(id) => format!(" Edit card {id} "),
    None => " New card ".to_string(),
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let label_style = Style::default().fg(Color::DarkGray);
  let mut lines: Vec<Line> = Vec::new();

  for (i, label) in FIELD_LABELS.iter().enumerate() {
    let focused = i == form.focus;
    let value_style = if focused {
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };

    let mut value = form.buffers[i].clone();
    if focused {
      value.push('_');
    }

    lines.push(Line::from(vec![
      Span::styled(format!(" {label:>14}: "), label_style),
      Span::styled(value, value_style),
    ]));
  }

  lines.push(Line::default());

  // Live preview, recomputed as the user types. Shows dashes until both
  // date and price parse.
  let preview = match form.preview(Local::now().date_naive()) {
    Some(derived) => format!(
      " Days passed: {}    Total payment: {:.2}",
      derived.days_passed, derived.total_payment
    ),
    None => " Days passed: —    Total payment: —".to_string(),
  };
  lines.push(Line::from(Span::styled(
    preview,
    Style::default()
      .fg(Color::Yellow)
      .add_modifier(Modifier::BOLD),
  )));

  if let Some(error) = &form.error {
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
      format!(" {error}"),
      Style::default().fg(Color::Red),
    )));
  }

  lines.push(Line::default());
  lines.push(Line::from(Span::styled(
    " [Tab] next field  [Enter] submit  [Esc] cancel",
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
