//! Catalog query collaborator
//!
//! Products live behind the [`CatalogSource`] trait so the wizard core
//! never cares where they come from. The in-process [`LocalCatalog`]
//! serves either the built-in demo catalog or a JSON file; a real
//! deployment would put an HTTP client behind the same trait.

use crate::error::{Result, SelectorError};
use crate::stage::StageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A catalog product record.
///
/// Wire form is camelCase JSON; `type` is a reserved word so the field is
/// `kind` internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub material: String,
    pub connection: String,
    pub size: String,
    pub pressure: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

impl Product {
    fn field(&self, id: StageId) -> &str {
        match id {
            StageId::Type => &self.kind,
            StageId::Material => &self.material,
            StageId::Connection => &self.connection,
            StageId::Size => &self.size,
            StageId::Pressure => &self.pressure,
        }
    }
}

/// A partial filter over the five product fields. Zero or more fields may
/// be present; matching is exact string equality on the present ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    fields: BTreeMap<StageId, String>,
}

impl FilterSet {
    pub fn set(&mut self, id: StageId, value: String) {
        self.fields.insert(id, value);
    }

    pub fn get(&self, id: StageId) -> Option<&str> {
        self.fields.get(&id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if the product matches every present filter field.
    pub fn matches(&self, product: &Product) -> bool {
        self.fields
            .iter()
            .all(|(id, value)| product.field(*id) == value)
    }
}

impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (id, value) in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", id, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Source of catalog products.
///
/// An empty result is not an error; it means no product matches the
/// filter set.
pub trait CatalogSource: Send + Sync {
    fn query_products(&self, filters: &FilterSet) -> Result<Vec<Product>>;
}

/// In-process catalog over an owned product list.
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    products: Vec<Product>,
}

impl LocalCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in demo catalog.
    pub fn builtin() -> Self {
        let raw = include_str!("catalog_data.json");
        let products =
            serde_json::from_str(raw).expect("built-in catalog data must parse");
        Self { products }
    }

    /// Load a catalog from a JSON file and validate it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        let catalog = Self { products };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject duplicate ids and products with empty required fields.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for product in &self.products {
            if product.id.trim().is_empty() {
                return Err(SelectorError::catalog("product with empty id"));
            }
            if !seen.insert(product.id.as_str()) {
                return Err(SelectorError::catalog(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
            if product.name.trim().is_empty() {
                return Err(SelectorError::catalog(format!(
                    "product {} has an empty name",
                    product.id
                )));
            }
            for (field, value) in [
                ("type", &product.kind),
                ("material", &product.material),
                ("connection", &product.connection),
                ("size", &product.size),
                ("pressure", &product.pressure),
            ] {
                if value.trim().is_empty() {
                    return Err(SelectorError::catalog(format!(
                        "product {} has an empty {} field",
                        product.id, field
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl CatalogSource for LocalCatalog {
    fn query_products(&self, filters: &FilterSet) -> Result<Vec<Product>> {
        let matches: Vec<Product> = self
            .products
            .iter()
            .filter(|p| filters.matches(p))
            .cloned()
            .collect();
        tracing::debug!(filters = %filters, matches = matches.len(), "catalog query");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            name: format!("Strainer {id}"),
            kind: "y-strainer".into(),
            material: "stainless-steel".into(),
            connection: "flanged".into(),
            size: "2".into(),
            pressure: "150".into(),
            description: String::new(),
            image_url: String::new(),
            specs: BTreeMap::new(),
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = LocalCatalog::builtin();
        assert!(!catalog.is_empty());
        catalog.validate().expect("built-in catalog must validate");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let catalog = LocalCatalog::new(vec![product("a"), product("b")]);
        let all = catalog.query_products(&FilterSet::default()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_partial_filter() {
        let mut other = product("b");
        other.material = "cast-iron".into();
        let catalog = LocalCatalog::new(vec![product("a"), other]);

        let mut filters = FilterSet::default();
        filters.set(StageId::Material, "cast-iron".into());
        let found = catalog.query_products(&filters).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "b");
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let catalog = LocalCatalog::new(vec![product("a")]);
        let mut filters = FilterSet::default();
        filters.set(StageId::Pressure, "999".into());
        let found = catalog.query_products(&filters).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_filter_set_displays_fields_in_stage_order() {
        let mut filters = FilterSet::default();
        filters.set(StageId::Pressure, "150".into());
        filters.set(StageId::Type, "y-strainer".into());
        filters.set(StageId::Material, "stainless-steel".into());
        assert_eq!(
            filters.to_string(),
            "type=y-strainer, material=stainless-steel, pressure=150"
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let catalog = LocalCatalog::new(vec![product("a"), product("a")]);
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate product id"));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut bad = product("a");
        bad.pressure = String::new();
        let catalog = LocalCatalog::new(vec![bad]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_product_wire_shape() {
        let p = product("YS-SS-150-05");
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"type\":\"y-strainer\""));
        assert!(json.contains("\"imageUrl\""));
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
