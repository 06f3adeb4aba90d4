//! Card — the persisted ledger record.
//!
//! A card records one person/product/price/issue-date entry. The two
//! derived columns (`daysPassed`, `totalPayment`) are stored alongside the
//! source fields but are refreshed from `dateOfIssue` and `price` on every
//! repository read, so persisted copies are display snapshots, never
//! authoritative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::derive;

/// Unique integer identifier, assigned by the repository on creation.
pub type CardId = u64;

// ─── Card ────────────────────────────────────────────────────────────────────

/// One ledger record. Field names on the wire (and in the persisted JSON)
/// are camelCase: `dateOfIssue`, `daysPassed`, `totalPayment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
  pub id:            CardId,
  pub name:          String,
  /// National-ID-style string; uniqueness is not enforced.
  pub cnic:          String,
  pub product:       String,
  pub date_of_issue: NaiveDate,
  /// Daily rate. Strictly positive.
  pub price:         f64,
  pub days_passed:   i64,
  pub total_payment: f64,
}

impl Card {
  /// Build a card from caller-supplied fields, computing the derived
  /// columns as of `on`.
  pub fn from_new(id: CardId, new: NewCard, on: NaiveDate) -> Self {
    let derived = derive::derive(new.date_of_issue, new.price, on);
    Self {
      id,
      name: new.name,
      cnic: new.cnic,
      product: new.product,
      date_of_issue: new.date_of_issue,
      price: new.price,
      days_passed: derived.days_passed,
      total_payment: derived.total_payment,
    }
  }

  /// Recompute `days_passed` and `total_payment` as of `on`.
  pub fn refresh_derived(&mut self, on: NaiveDate) {
    let derived = derive::derive(self.date_of_issue, self.price, on);
    self.days_passed = derived.days_passed;
    self.total_payment = derived.total_payment;
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`CardRepository::create`](crate::repository::CardRepository::create).
///
/// Carries only the caller-supplied fields: no id, no derived columns.
/// Derived values are never accepted from callers; the repository computes
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
  pub name:          String,
  pub cnic:          String,
  pub product:       String,
  pub date_of_issue: NaiveDate,
  pub price:         f64,
}

/// Partial update for an existing card. Unset fields keep their previous
/// values; the id is immutable and not part of the patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cnic:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub product:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date_of_issue: Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price:         Option<f64>,
}

impl CardPatch {
  /// Merge the set fields over `card`, leaving the rest untouched.
  /// Derived columns are not touched here; callers refresh them after.
  pub fn apply_to(&self, card: &mut Card) {
    if let Some(name) = &self.name {
      card.name = name.clone();
    }
    if let Some(cnic) = &self.cnic {
      card.cnic = cnic.clone();
    }
    if let Some(product) = &self.product {
      card.product = product.clone();
    }
    if let Some(date_of_issue) = self.date_of_issue {
      card.date_of_issue = date_of_issue;
    }
    if let Some(price) = self.price {
      card.price = price;
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// A client-input problem. The message names the offending field category.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("price must be a positive number")]
  NonPositivePrice,

  #[error("dateOfIssue must not be in the future")]
  FutureDate,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    Err(ValidationError::MissingField(field))
  } else {
    Ok(())
  }
}

fn check_price(price: f64) -> Result<(), ValidationError> {
  if price.is_finite() && price > 0.0 {
    Ok(())
  } else {
    Err(ValidationError::NonPositivePrice)
  }
}

fn check_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
  if date > today {
    Err(ValidationError::FutureDate)
  } else {
    Ok(())
  }
}

impl NewCard {
  /// Check that every required field is present and well-formed.
  pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
    require("name", &self.name)?;
    require("cnic", &self.cnic)?;
    require("product", &self.product)?;
    check_date(self.date_of_issue, today)?;
    check_price(self.price)
  }
}

impl CardPatch {
  /// Check the fields that are set. A patch may not blank out a required
  /// field or introduce an invalid price/date.
  pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
    if let Some(name) = &self.name {
      require("name", name)?;
    }
    if let Some(cnic) = &self.cnic {
      require("cnic", cnic)?;
    }
    if let Some(product) = &self.product {
      require("product", product)?;
    }
    if let Some(date_of_issue) = self.date_of_issue {
      check_date(date_of_issue, today)?;
    }
    if let Some(price) = self.price {
      check_price(price)?;
    }
    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn valid_new_card() -> NewCard {
    NewCard {
      name:          "Alice Liddell".into(),
      cnic:          "12345-6789012-3".into(),
      product:       "Sewing machine".into(),
      date_of_issue: date(2024, 3, 1),
      price:         100.0,
    }
  }

  #[test]
  fn valid_card_passes() {
    assert_eq!(valid_new_card().validate(date(2024, 3, 10)), Ok(()));
  }

  #[test]
  fn empty_name_is_missing() {
    let mut new = valid_new_card();
    new.name = "   ".into();
    assert_eq!(
      new.validate(date(2024, 3, 10)),
      Err(ValidationError::MissingField("name"))
    );
  }

  #[test]
  fn empty_cnic_is_missing() {
    let mut new = valid_new_card();
    new.cnic = String::new();
    assert_eq!(
      new.validate(date(2024, 3, 10)),
      Err(ValidationError::MissingField("cnic"))
    );
  }

  #[test]
  fn zero_price_is_rejected() {
    let mut new = valid_new_card();
    new.price = 0.0;
    assert_eq!(
      new.validate(date(2024, 3, 10)),
      Err(ValidationError::NonPositivePrice)
    );
  }

  #[test]
  fn nan_price_is_rejected() {
    let mut new = valid_new_card();
    new.price = f64::NAN;
    assert_eq!(
      new.validate(date(2024, 3, 10)),
      Err(ValidationError::NonPositivePrice)
    );
  }

  #[test]
  fn future_issue_date_is_rejected() {
    let mut new = valid_new_card();
    new.date_of_issue = date(2024, 3, 11);
    assert_eq!(
      new.validate(date(2024, 3, 10)),
      Err(ValidationError::FutureDate)
    );
  }

  #[test]
  fn patch_validates_only_set_fields() {
    let patch = CardPatch {
      price: Some(50.0),
      ..CardPatch::default()
    };
    assert_eq!(patch.validate(date(2024, 3, 10)), Ok(()));

    let patch = CardPatch {
      name: Some(String::new()),
      ..CardPatch::default()
    };
    assert_eq!(
      patch.validate(date(2024, 3, 10)),
      Err(ValidationError::MissingField("name"))
    );
  }

  #[test]
  fn patch_merges_set_fields_only() {
    let mut card = Card::from_new(1, valid_new_card(), date(2024, 3, 10));
    let patch = CardPatch {
      price: Some(250.0),
      ..CardPatch::default()
    };
    patch.apply_to(&mut card);
    assert_eq!(card.price, 250.0);
    assert_eq!(card.name, "Alice Liddell");
    assert_eq!(card.cnic, "12345-6789012-3");
    assert_eq!(card.product, "Sewing machine");
  }

  #[test]
  fn wire_field_names_are_camel_case() {
    let card = Card::from_new(1, valid_new_card(), date(2024, 3, 10));
    let json = serde_json::to_value(&card).unwrap();
    for key in [
      "id",
      "name",
      "cnic",
      "product",
      "dateOfIssue",
      "price",
      "daysPassed",
      "totalPayment",
    ] {
      assert!(json.get(key).is_some(), "missing wire field {key}");
    }
    assert_eq!(json["dateOfIssue"], "2024-03-01");
  }

  #[test]
  fn derived_fields_are_not_accepted_from_input() {
    // Unknown keys are ignored; daysPassed/totalPayment have no slot in
    // NewCard so a caller cannot smuggle them in.
    let new: NewCard = serde_json::from_value(serde_json::json!({
      "name": "Bob",
      "cnic": "999-9",
      "product": "Fan",
      "dateOfIssue": "2024-03-01",
      "price": 10.0,
      "daysPassed": 9000,
      "totalPayment": 90000.0,
    }))
    .unwrap();
    let card = Card::from_new(7, new, date(2024, 3, 1));
    assert_eq!(card.days_passed, 1);
    assert_eq!(card.total_payment, 10.0);
  }
}
