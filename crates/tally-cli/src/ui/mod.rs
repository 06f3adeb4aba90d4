//! TUI rendering — orchestrates all panes.

pub mod card_form;
pub mod card_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::Span,
  widgets::Paragraph,
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  match app.screen {
    Screen::List => card_list::draw(f, rows[1], app),
    Screen::Form => card_form::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " tally  [/] search  [a] add  [e] edit  [d] delete  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.len() as u16;
  let right_width = right.content.len() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = ratatui::text::Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);
  f.render_widget(Paragraph::new(line), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let style = if app.status_msg.starts_with("Error") {
    Style::default().fg(Color::Red)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  f.render_widget(
    Paragraph::new(format!(" {}", app.status_msg)).style(style),
    area,
  );
}
