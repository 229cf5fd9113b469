// demos/storefront/src/requests.rs

//! Wire requests and their validation into typed commands.

use cartflow::{ProductId, SessionId};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AppError, FieldErrors, Result};
use crate::session::SessionIssuer;

/// One request line. Field values stay untyped until `validate` so every bad
/// field can be reported at once.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RawRequest {
  NewSession,
  Get {
    session_id: Option<Value>,
  },
  Add {
    session_id: Option<Value>,
    product_id: Option<Value>,
    quantity: Option<Value>,
  },
  Update {
    session_id: Option<Value>,
    product_id: Option<Value>,
    quantity: Option<Value>,
  },
  Remove {
    session_id: Option<Value>,
    product_id: Option<Value>,
  },
  Clear {
    session_id: Option<Value>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  NewSession,
  GetCart {
    session_id: SessionId,
  },
  AddToCart {
    session_id: SessionId,
    product_id: ProductId,
    quantity: u32,
  },
  UpdateCartItem {
    session_id: SessionId,
    product_id: ProductId,
    quantity: u32,
  },
  RemoveFromCart {
    session_id: SessionId,
    product_id: ProductId,
  },
  ClearCart {
    session_id: SessionId,
  },
}

impl Command {
  pub fn name(&self) -> &'static str {
    match self {
      Command::NewSession => "new_session",
      Command::GetCart { .. } => "get",
      Command::AddToCart { .. } => "add",
      Command::UpdateCartItem { .. } => "update",
      Command::RemoveFromCart { .. } => "remove",
      Command::ClearCart { .. } => "clear",
    }
  }
}

pub fn parse_line(line: &str) -> Result<RawRequest> {
  serde_json::from_str(line).map_err(|e| AppError::Malformed(e.to_string()))
}

/// Collects field failures while the typed values are assembled.
struct Checker<'a> {
  issuer: &'a SessionIssuer,
  max_quantity: u32,
  errors: FieldErrors,
}

impl<'a> Checker<'a> {
  fn fail(&mut self, field: &str, message: impl Into<String>) {
    self.errors.entry(field.to_string()).or_insert_with(|| message.into());
  }

  fn session_id(&mut self, value: Option<Value>) -> Option<SessionId> {
    let raw = match value {
      Some(Value::String(s)) => s,
      None | Some(Value::Null) => String::new(),
      Some(_) => {
        self.fail("session_id", "Session ID must be a string");
        return None;
      }
    };
    match self.issuer.validate(&raw) {
      Ok(id) => Some(id),
      Err(message) => {
        self.fail("session_id", message);
        None
      }
    }
  }

  fn product_id(&mut self, value: Option<Value>) -> Option<ProductId> {
    match value {
      Some(Value::String(s)) if !s.trim().is_empty() => Some(ProductId::new(s.trim())),
      Some(Value::String(_)) | None | Some(Value::Null) => {
        self.fail("product_id", "Product ID is required");
        None
      }
      Some(_) => {
        self.fail("product_id", "Product ID must be a string");
        None
      }
    }
  }

  /// Whole numbers from `min` up to the configured cap.
  fn quantity(&mut self, value: Option<Value>, min: u32) -> Option<u32> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
      self.fail("quantity", "Quantity is required");
      return None;
    };
    let Some(number) = value.as_i64() else {
      self.fail("quantity", "Quantity must be a whole number");
      return None;
    };
    if number < i64::from(min) {
      let message = if min == 0 {
        "Quantity cannot be negative".to_string()
      } else {
        format!("Quantity must be at least {}", min)
      };
      self.fail("quantity", message);
      return None;
    }
    if number > i64::from(self.max_quantity) {
      self.fail("quantity", format!("Quantity cannot exceed {}", self.max_quantity));
      return None;
    }
    u32::try_from(number).ok()
  }
}

impl RawRequest {
  pub fn validate(self, issuer: &SessionIssuer, max_quantity: u32) -> Result<Command> {
    let mut c = Checker {
      issuer,
      max_quantity,
      errors: FieldErrors::new(),
    };

    let command = match self {
      RawRequest::NewSession => Some(Command::NewSession),
      RawRequest::Get { session_id } => c.session_id(session_id).map(|session_id| Command::GetCart { session_id }),
      RawRequest::Add {
        session_id,
        product_id,
        quantity,
      } => {
        let (s, p, q) = (c.session_id(session_id), c.product_id(product_id), c.quantity(quantity, 1));
        match (s, p, q) {
          (Some(session_id), Some(product_id), Some(quantity)) => Some(Command::AddToCart {
            session_id,
            product_id,
            quantity,
          }),
          _ => None,
        }
      }
      RawRequest::Update {
        session_id,
        product_id,
        quantity,
      } => {
        let (s, p, q) = (c.session_id(session_id), c.product_id(product_id), c.quantity(quantity, 0));
        match (s, p, q) {
          (Some(session_id), Some(product_id), Some(quantity)) => Some(Command::UpdateCartItem {
            session_id,
            product_id,
            quantity,
          }),
          _ => None,
        }
      }
      RawRequest::Remove { session_id, product_id } => {
        let (s, p) = (c.session_id(session_id), c.product_id(product_id));
        s.zip(p)
          .map(|(session_id, product_id)| Command::RemoveFromCart { session_id, product_id })
      }
      RawRequest::Clear { session_id } => c.session_id(session_id).map(|session_id| Command::ClearCart { session_id }),
    };

    match command {
      Some(command) if c.errors.is_empty() => Ok(command),
      _ => Err(AppError::Validation(c.errors)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SID: &str = "session_0123456789abcdef0123456789abcdef";

  fn validate(line: &str) -> Result<Command> {
    parse_line(line)?.validate(&SessionIssuer::new("session"), 99)
  }

  fn field_errors(line: &str) -> FieldErrors {
    match validate(line) {
      Err(AppError::Validation(fields)) => fields,
      other => panic!("Expected a validation error, got {:?}", other),
    }
  }

  #[test]
  fn add_request_becomes_a_command() {
    let line = format!(r#"{{"op":"add","session_id":"{}","product_id":" p1 ","quantity":3}}"#, SID);
    assert_eq!(
      validate(&line).unwrap(),
      Command::AddToCart {
        session_id: SessionId::from(SID),
        product_id: ProductId::from("p1"),
        quantity: 3,
      }
    );
  }

  #[test]
  fn every_bad_field_is_reported() {
    let fields = field_errors(r#"{"op":"add","session_id":"nope","quantity":0}"#);
    assert_eq!(fields.len(), 3);
    assert_eq!(fields["session_id"], "Session ID is malformed");
    assert_eq!(fields["product_id"], "Product ID is required");
    assert_eq!(fields["quantity"], "Quantity must be at least 1");
  }

  #[test]
  fn update_allows_zero_but_not_negative() {
    let zero = format!(r#"{{"op":"update","session_id":"{}","product_id":"p1","quantity":0}}"#, SID);
    assert!(matches!(validate(&zero), Ok(Command::UpdateCartItem { quantity: 0, .. })));

    let negative = format!(r#"{{"op":"update","session_id":"{}","product_id":"p1","quantity":-1}}"#, SID);
    assert_eq!(field_errors(&negative)["quantity"], "Quantity cannot be negative");
  }

  #[test]
  fn quantity_must_be_a_bounded_whole_number() {
    for (raw, message) in [
      ("1.5", "Quantity must be a whole number"),
      (r#""2""#, "Quantity must be a whole number"),
      ("100", "Quantity cannot exceed 99"),
      ("null", "Quantity is required"),
    ] {
      let line = format!(r#"{{"op":"add","session_id":"{}","product_id":"p1","quantity":{}}}"#, SID, raw);
      assert_eq!(field_errors(&line)["quantity"], message, "{}", raw);
    }
  }

  #[test]
  fn unknown_op_is_malformed() {
    assert!(matches!(validate(r#"{"op":"checkout"}"#), Err(AppError::Malformed(_))));
    assert!(matches!(validate("not json"), Err(AppError::Malformed(_))));
  }

  #[test]
  fn session_only_requests() {
    let line = format!(r#"{{"op":"clear","session_id":"{}"}}"#, SID);
    assert_eq!(validate(&line).unwrap().name(), "clear");
    assert_eq!(validate(r#"{"op":"new_session"}"#).unwrap(), Command::NewSession);
    assert_eq!(field_errors(r#"{"op":"get"}"#)["session_id"], "Session ID is required");
  }
}
