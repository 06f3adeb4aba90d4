//! Card table — the list screen.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

use crate::app::App;

/// Render the card table, filter bar, and totals footer into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_cards();
  let total = app.cards.len();

  // Title with count.
  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Cards ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Cards ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Totals footer on the last inner line — the aggregate over the
  // *filtered* rows, matching what the table shows.
  if inner_area.height > 1 {
    let footer_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height -= 1;

    let footer = format!(
      " Total payment: {:.2}  ({} cards)",
      app.filtered_total(),
      filtered.len()
    );
    f.render_widget(
      Paragraph::new(footer).style(
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      ),
      footer_area,
    );
  }

  // Filter bar above the footer while a filter is set.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 1 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height -= 1;

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  // The table itself.
  let header = Row::new([
    "ID", "Name", "CNIC", "Product", "Issued", "Price", "Days", "Total",
  ])
  .style(
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let rows: Vec<Row> = filtered
    .iter()
    .map(|card| {
      Row::new([
        card.id.to_string(),
        card.name.clone(),
        card.cnic.clone(),
        card.product.clone(),
        card.date_of_issue.to_string(),
        format!("{:.2}", card.price),
        card.days_passed.to_string(),
        format!("{:.2}", card.total_payment),
      ])
    })
    .collect();

  let table = Table::new(
    rows,
    [
      Constraint::Length(5),
      Constraint::Min(14),
      Constraint::Length(16),
      Constraint::Min(10),
      Constraint::Length(10),
      Constraint::Length(9),
      Constraint::Length(6),
      Constraint::Length(11),
    ],
  )
  .header(header)
  .row_highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let mut state = TableState::default();
  state.select(if filtered.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(table, inner_area, &mut state);
}
