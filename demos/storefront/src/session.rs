// demos/storefront/src/session.rs

use cartflow::SessionId;
use uuid::Uuid;

/// Issues and recognizes anonymous session tokens of the form `{prefix}_{uuid}`.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
  prefix: String,
}

impl SessionIssuer {
  pub fn new(prefix: impl Into<String>) -> Self {
    Self { prefix: prefix.into() }
  }

  pub fn issue(&self) -> SessionId {
    SessionId::new(format!("{}_{}", self.prefix, Uuid::new_v4().simple()))
  }

  /// Accepts only tokens this issuer could have produced.
  pub fn validate(&self, raw: &str) -> Result<SessionId, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
      return Err("Session ID is required");
    }
    let token = raw
      .strip_prefix(self.prefix.as_str())
      .and_then(|rest| rest.strip_prefix('_'))
      .ok_or("Session ID is malformed")?;
    let is_simple_uuid = token.len() == 32 && token.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase());
    if !is_simple_uuid || Uuid::try_parse(token).is_err() {
      return Err("Session ID is malformed");
    }
    Ok(SessionId::new(raw))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn issued_tokens_validate() {
    let issuer = SessionIssuer::new("session");
    let id = issuer.issue();
    assert!(id.as_str().starts_with("session_"));
    assert_eq!(id.as_str().len(), "session_".len() + 32);
    assert_eq!(issuer.validate(id.as_str()), Ok(id));
  }

  #[test]
  fn tokens_are_unique() {
    let issuer = SessionIssuer::new("session");
    assert_ne!(issuer.issue(), issuer.issue());
  }

  #[test]
  fn foreign_shapes_are_rejected() {
    let issuer = SessionIssuer::new("session");
    assert_eq!(issuer.validate("   "), Err("Session ID is required"));
    for raw in [
      "session",
      "session_",
      "session_1700000000000_abc123def",
      "other_0123456789abcdef0123456789abcdef",
      "session_0123456789ABCDEF0123456789ABCDEF",
      "session_0123456789abcdef0123456789abcdeg",
    ] {
      assert_eq!(issuer.validate(raw), Err("Session ID is malformed"), "{}", raw);
    }
    assert!(issuer.validate("session_0123456789abcdef0123456789abcdef").is_ok());
  }
}
