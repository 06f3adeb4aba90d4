//! Application state machine and event dispatcher.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tally_core::{
  card::{Card, CardId, CardPatch, NewCard},
  derive::{self, Derived},
};

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// The card table with search filter and totals footer.
  List,
  /// The create/edit form with live derived-field preview.
  Form,
}

// ─── Form state ───────────────────────────────────────────────────────────────

pub const FIELD_LABELS: [&str; 5] =
  ["Name", "CNIC", "Product", "Date of issue", "Price"];

const DATE: usize = 3;
const PRICE: usize = 4;

/// Text buffers for the create/edit form. Everything is a string until
/// submission; date and price are parsed for the live preview and again on
/// submit.
#[derive(Debug, Default)]
pub struct FormState {
  /// `Some(id)` when editing an existing card, `None` when creating.
  pub editing: Option<CardId>,
  /// One buffer per field, in [`FIELD_LABELS`] order.
  pub buffers: [String; 5],
  /// Index of the focused field.
  pub focus:   usize,
  /// Last validation or server error, shown until the next keystroke.
  pub error:   Option<String>,
}

impl FormState {
  pub fn blank() -> Self {
    Self::default()
  }

  /// Pre-fill the form from an existing card.
  pub fn for_card(card: &Card) -> Self {
    Self {
      editing: Some(card.id),
      buffers: [
        card.name.clone(),
        card.cnic.clone(),
        card.product.clone(),
        card.date_of_issue.to_string(),
        card.price.to_string(),
      ],
      focus:   0,
      error:   None,
    }
  }

  pub fn focused_mut(&mut self) -> &mut String {
    &mut self.buffers[self.focus]
  }

  fn parsed_date(&self) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(self.buffers[DATE].trim(), "%Y-%m-%d").ok()
  }

  fn parsed_price(&self) -> Option<f64> {
    self.buffers[PRICE].trim().parse().ok()
  }

  /// Live preview of the derived fields, recomputed on every keystroke.
  /// `None` until both date and price parse.
  pub fn preview(&self, today: NaiveDate) -> Option<Derived> {
    let date = self.parsed_date()?;
    let price = self.parsed_price()?;
    Some(derive::derive(date, price, today))
  }

  /// Turn the buffers into a validated [`NewCard`], or a message for the
  /// error line.
  pub fn build(&self, today: NaiveDate) -> Result<NewCard, String> {
    let date_of_issue = self
      .parsed_date()
      .ok_or("date of issue must be a valid YYYY-MM-DD date")?;
    let price = self
      .parsed_price()
      .ok_or("price must be a number")?;

    let new = NewCard {
      name: self.buffers[0].trim().to_string(),
      cnic: self.buffers[1].trim().to_string(),
      product: self.buffers[2].trim().to_string(),
      date_of_issue,
      price,
    };
    new.validate(today).map_err(|e| e.to_string())?;
    Ok(new)
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All cards returned by the API on the last load.
  pub cards: Vec<Card>,

  /// Current filter string (substring match over CNIC and name).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* card list.
  pub list_cursor: usize,

  /// Create/edit form state.
  pub form: FormState,

  /// Set after the first `d`; a second `d` on the same card deletes it.
  pub pending_delete: Option<CardId>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty card list.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::List,
      cards: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      form: FormState::blank(),
      pending_delete: None,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all cards from the API and populate `self.cards`.
  pub async fn load_cards(&mut self) -> Result<()> {
    self.status_msg = "Loading cards…".into();
    match self.client.list_cards().await {
      Ok(cards) => {
        self.cards = cards;
        self.clamp_cursor();
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Cards matching the current filter: a case-insensitive substring match
  /// over CNIC and name. An empty filter matches everything.
  pub fn filtered_cards(&self) -> Vec<&Card> {
    if self.filter.is_empty() {
      return self.cards.iter().collect();
    }
    let needle = self.filter.to_lowercase();
    self
      .cards
      .iter()
      .filter(|c| {
        c.cnic.to_lowercase().contains(&needle)
          || c.name.to_lowercase().contains(&needle)
      })
      .collect()
  }

  /// Sum of `totalPayment` over the filtered rows — the footer aggregate.
  pub fn filtered_total(&self) -> f64 {
    self.filtered_cards().iter().map(|c| c.total_payment).sum()
  }

  /// The card under the cursor, if any.
  pub fn selected_card(&self) -> Option<&Card> {
    self.filtered_cards().get(self.list_cursor).copied()
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered_cards().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Key dispatch ──────────────────────────────────────────────────────────

  /// Handle one key event. Returns `false` when the app should exit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
    match self.screen {
      Screen::List => self.handle_list_key(key).await,
      Screen::Form => {
        self.handle_form_key(key).await;
        Ok(true)
      }
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> Result<bool> {
    // A second `d` confirms; any other key cancels the pending delete.
    let pending = self.pending_delete.take();

    if self.filter_active {
      match key.code {
        KeyCode::Esc => {
          self.filter.clear();
          self.filter_active = false;
        }
        KeyCode::Enter => self.filter_active = false,
        KeyCode::Backspace => {
          self.filter.pop();
        }
        KeyCode::Char(c) => self.filter.push(c),
        _ => {}
      }
      self.clamp_cursor();
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('/') => self.filter_active = true,
      KeyCode::Esc => {
        self.filter.clear();
        self.clamp_cursor();
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }
      KeyCode::Down | KeyCode::Char('j') => {
        self.list_cursor += 1;
        self.clamp_cursor();
      }
      KeyCode::Char('r') => {
        self.load_cards().await.ok();
      }
      KeyCode::Char('a') => {
        self.form = FormState::blank();
        self.screen = Screen::Form;
      }
      KeyCode::Char('e') => {
        if let Some(card) = self.selected_card() {
          self.form = FormState::for_card(card);
          self.screen = Screen::Form;
        }
      }
      KeyCode::Char('d') => {
        if let Some(card) = self.selected_card() {
          let id = card.id;
          if pending == Some(id) {
            self.delete_card(id).await;
          } else {
            self.pending_delete = Some(id);
            self.status_msg =
              format!("Press d again to delete card {id}");
          }
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    // Ctrl-S submits from any field.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('s')
    {
      self.submit_form().await;
      return;
    }

    match key.code {
      KeyCode::Esc => self.screen = Screen::List,
      KeyCode::Tab | KeyCode::Down => {
        self.form.focus = (self.form.focus + 1) % FIELD_LABELS.len();
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.form.focus =
          (self.form.focus + FIELD_LABELS.len() - 1) % FIELD_LABELS.len();
      }
      KeyCode::Enter => {
        // Enter advances; on the last field it submits.
        if self.form.focus + 1 < FIELD_LABELS.len() {
          self.form.focus += 1;
        } else {
          self.submit_form().await;
        }
      }
      KeyCode::Backspace => {
        self.form.error = None;
        self.form.focused_mut().pop();
      }
      KeyCode::Char(c) => {
        self.form.error = None;
        self.form.focused_mut().push(c);
      }
      _ => {}
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn submit_form(&mut self) {
    let today = Local::now().date_naive();
    let new = match self.form.build(today) {
      Ok(new) => new,
      Err(msg) => {
        self.form.error = Some(msg);
        return;
      }
    };

    let result = match self.form.editing {
      Some(id) => {
        let patch = CardPatch {
          name:          Some(new.name.clone()),
          cnic:          Some(new.cnic.clone()),
          product:       Some(new.product.clone()),
          date_of_issue: Some(new.date_of_issue),
          price:         Some(new.price),
        };
        self.client.update_card(id, &patch).await
      }
      None => self.client.create_card(&new).await,
    };

    match result {
      Ok(card) => {
        self.status_msg = format!("Card {} saved", card.id);
        self.screen = Screen::List;
        self.load_cards().await.ok();
      }
      Err(e) => self.form.error = Some(e.to_string()),
    }
  }

  async fn delete_card(&mut self, id: CardId) {
    match self.client.delete_card(id).await {
      Ok(()) => {
        self.status_msg = format!("Card {id} deleted");
        self.load_cards().await.ok();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Local;

  use super::*;
  use crate::client::{ApiClient, ApiConfig};

  fn test_app(cards: Vec<Card>) -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://localhost:0".into(),
    })
    .unwrap();
    let mut app = App::new(client);
    app.cards = cards;
    app
  }

  fn card(id: CardId, name: &str, cnic: &str, price: f64) -> Card {
    let today = Local::now().date_naive();
    Card::from_new(
      id,
      NewCard {
        name: name.into(),
        cnic: cnic.into(),
        product: "Washing machine".into(),
        date_of_issue: today,
        price,
      },
      today,
    )
  }

  #[test]
  fn filter_selects_by_cnic_substring_and_sums_payments() {
    let mut app = test_app(vec![
      card(1, "Alice", "111-1", 100.0),
      card(2, "Bilal", "222-2", 50.0),
    ]);

    app.filter = "222".into();
    let filtered = app.filtered_cards();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].cnic, "222-2");
    assert_eq!(app.filtered_total(), filtered[0].total_payment);
  }

  #[test]
  fn empty_filter_matches_everything() {
    let app = test_app(vec![
      card(1, "Alice", "111-1", 100.0),
      card(2, "Bilal", "222-2", 50.0),
    ]);
    assert_eq!(app.filtered_cards().len(), 2);
    assert_eq!(app.filtered_total(), 150.0);
  }

  #[test]
  fn filter_also_matches_names_case_insensitively() {
    let app = {
      let mut app = test_app(vec![
        card(1, "Alice", "111-1", 100.0),
        card(2, "Bilal", "222-2", 50.0),
      ]);
      app.filter = "ali".into();
      app
    };
    assert_eq!(app.filtered_cards().len(), 1);
    assert_eq!(app.filtered_cards()[0].name, "Alice");
  }

  #[test]
  fn form_preview_tracks_date_and_price() {
    let today = Local::now().date_naive();
    let mut form = FormState::blank();
    assert_eq!(form.preview(today), None);

    form.buffers[3] = today.to_string();
    form.buffers[4] = "100".into();
    let derived = form.preview(today).unwrap();
    assert_eq!(derived.days_passed, 1);
    assert_eq!(derived.total_payment, 100.0);

    form.buffers[3] = "not-a-date".into();
    assert_eq!(form.preview(today), None);
  }

  #[test]
  fn form_build_reports_the_offending_field() {
    let today = Local::now().date_naive();
    let mut form = FormState::blank();
    form.buffers[1] = "111-1".into();
    form.buffers[2] = "Heater".into();
    form.buffers[3] = today.to_string();
    form.buffers[4] = "10".into();

    // Name left blank.
    let err = form.build(today).unwrap_err();
    assert!(err.contains("name"));

    form.buffers[0] = "Alice".into();
    assert!(form.build(today).is_ok());
  }
}
