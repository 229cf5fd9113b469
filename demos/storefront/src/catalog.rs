// demos/storefront/src/catalog.rs

use std::path::Path;

use cartflow::{InMemoryCatalog, Product};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, Result};

#[derive(Debug, Deserialize)]
struct SeedProduct {
  id: String,
  name: String,
  price: Decimal,
  quantity: u32,
}

const DEMO_CATALOG: &str = r#"[
  {"id": "mug", "name": "Enamel Mug", "price": "12.50", "quantity": 25},
  {"id": "tee", "name": "Logo Tee", "price": "20.00", "quantity": 10},
  {"id": "sticker", "name": "Sticker Pack", "price": "3.99", "quantity": 200},
  {"id": "poster", "name": "Limited Poster", "price": "45.00", "quantity": 1}
]"#;

/// Loads the catalog from `path`, or the built-in demo catalog when `None`.
pub async fn load_catalog(path: Option<&Path>) -> Result<InMemoryCatalog> {
  let (source, raw) = match path {
    Some(path) => {
      let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Config(format!("Cannot read catalog '{}': {}", path.display(), e)))?;
      (path.display().to_string(), raw)
    }
    None => ("built-in demo catalog".to_string(), DEMO_CATALOG.to_string()),
  };

  let catalog = parse_catalog(&raw)?;
  info!(%source, products = catalog.len(), "Catalog loaded.");
  Ok(catalog)
}

fn parse_catalog(raw: &str) -> Result<InMemoryCatalog> {
  let seeds: Vec<SeedProduct> =
    serde_json::from_str(raw).map_err(|e| AppError::Config(format!("Invalid catalog JSON: {}", e)))?;

  let catalog = InMemoryCatalog::new();
  for seed in seeds {
    if seed.id.trim().is_empty() {
      return Err(AppError::Config("Catalog entry with a blank id".to_string()));
    }
    let id = seed.id.clone();
    let product = Product::new(seed.id, seed.name, seed.price, seed.quantity)
      .map_err(|e| AppError::Config(format!("Invalid catalog entry '{}': {}", id, e)))?;
    catalog.upsert(product);
  }
  Ok(catalog)
}
