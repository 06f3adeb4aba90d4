//! Derivation engine — elapsed days and cumulative payment.
//!
//! Pure functions over `(dateOfIssue, price, today)`. The same computation
//! runs at creation, at update, on every repository read, and in the TUI
//! form's live preview, so all consumers agree on the same day.

use chrono::NaiveDate;

/// The two derived columns of a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
  pub days_passed:   i64,
  pub total_payment: f64,
}

/// Whole days elapsed from `date_of_issue` to `on`, with the issue day
/// itself counting as day 1. A `date_of_issue` after `on` clamps to 0;
/// rejecting future dates is the validation layer's job.
pub fn days_passed(date_of_issue: NaiveDate, on: NaiveDate) -> i64 {
  ((on - date_of_issue).num_days() + 1).max(0)
}

/// Cumulative payment: elapsed days times the daily rate.
pub fn total_payment(days: i64, price: f64) -> f64 {
  days as f64 * price
}

/// Compute both derived columns as of `on`.
pub fn derive(date_of_issue: NaiveDate, price: f64, on: NaiveDate) -> Derived {
  let days = days_passed(date_of_issue, on);
  Derived {
    days_passed:   days,
    total_payment: total_payment(days, price),
  }
}
