//! # Catalog Queries
//!
//! Read-only product list with pull-based search, sort and brand selection.
//! Fetching the list is up to the caller; this module only parses and queries it.
//!
//! ```rust
//! use till_core::catalog::{Catalog, SortDirection};
//!
//! let catalog = Catalog::from_json(br#"[
//!     {"name": "Salty Peanut", "brand": "Barebells", "price": 1.4},
//!     {"name": "Caribbean", "brand": "NOCCO", "price": 2.25}
//! ]"#).unwrap();
//!
//! let hits = catalog.filter("bare", SortDirection::Descending);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].name, "Salty Peanut");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::ProductCatalogEntry;
use crate::validation::validate_price_cents;

/// Price ordering of `Catalog::filter` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Cheapest first (`"asc"` on the wire).
    #[serde(rename = "asc")]
    Ascending,
    /// Most expensive first (`"desc"` on the wire).
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

/// A brand and its products, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct CatalogBrand {
    pub brand: String,
    pub products: Vec<ProductCatalogEntry>,
}

/// The product list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<ProductCatalogEntry>,
}

impl Catalog {
    /// Builds a catalog, ordering products by brand. Products of the same
    /// brand keep their relative order.
    pub fn new(mut products: Vec<ProductCatalogEntry>) -> Self {
        products.sort_by(|a, b| a.brand.cmp(&b.brand));
        Catalog { products }
    }

    /// Parses a JSON array of catalog entries.
    ///
    /// Fails if any price is negative or above
    /// [`MAX_PRICE_CENTS`](crate::validation::MAX_PRICE_CENTS).
    pub fn from_json(bytes: &[u8]) -> CoreResult<Self> {
        let products: Vec<ProductCatalogEntry> =
            serde_json::from_slice(bytes).map_err(|e| CoreError::Catalog(e.to_string()))?;

        for product in &products {
            validate_price_cents(product.price.cents())
                .map_err(|e| CoreError::Catalog(format!("product '{}': {}", product.name, e)))?;
        }

        Ok(Catalog::new(products))
    }

    pub fn products(&self) -> &[ProductCatalogEntry] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks a product up by name.
    pub fn find(&self, name: &str) -> Option<&ProductCatalogEntry> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Products whose name or brand contains `term` (case-insensitive),
    /// ordered by price. An empty term matches everything.
    pub fn filter(&self, term: &str, direction: SortDirection) -> Vec<ProductCatalogEntry> {
        let term = term.to_lowercase();
        let mut hits: Vec<ProductCatalogEntry> = self
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term) || p.brand.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();

        match direction {
            SortDirection::Ascending => hits.sort_by(|a, b| a.price.cmp(&b.price)),
            SortDirection::Descending => hits.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        hits
    }

    /// Products grouped by brand, brands in first-seen order.
    pub fn grouped_by_brand(&self) -> Vec<CatalogBrand> {
        group(self.products.iter())
    }

    /// Distinct brands in catalog order.
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for product in &self.products {
            if !brands.contains(&product.brand.as_str()) {
                brands.push(&product.brand);
            }
        }
        brands
    }

    /// Brand menu selection.
    ///
    /// `None` shows every brand. `Some(selected)` keeps products whose brand,
    /// with its first `.` removed and lowercased, equals `selected`
    /// lowercased; so `"io|genix"` selects `"I.O|GENIX"`. Only the first
    /// period is dropped.
    pub fn select_brand(&self, selected: Option<&str>) -> Vec<CatalogBrand> {
        match selected {
            None => self.grouped_by_brand(),
            Some(selected) => {
                let wanted = selected.to_lowercase();
                group(
                    self.products
                        .iter()
                        .filter(|p| normalize_brand(&p.brand) == wanted),
                )
            }
        }
    }
}

fn normalize_brand(brand: &str) -> String {
    brand.replacen('.', "", 1).to_lowercase()
}

fn group<'a>(products: impl Iterator<Item = &'a ProductCatalogEntry>) -> Vec<CatalogBrand> {
    let mut groups: Vec<CatalogBrand> = Vec::new();
    for product in products {
        match groups.iter_mut().find(|g| g.brand == product.brand) {
            Some(g) => g.products.push(product.clone()),
            None => groups.push(CatalogBrand {
                brand: product.brand.clone(),
                products: vec![product.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn entry(brand: &str, name: &str, cents: i64) -> ProductCatalogEntry {
        ProductCatalogEntry::new(brand, name, Money::from_cents(cents))
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            entry("NOCCO", "Caribbean", 225),
            entry("Barebells", "Salty Peanut", 140),
            entry("I.O|GENIX", "Whey Vanilla", 3999),
            entry("Barebells", "Cookies & Cream", 150),
            entry("A.B.C", "Test", 100),
        ])
    }

    #[test]
    fn test_products_sorted_by_brand_stably() {
        let catalog = sample();
        let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Test", "Salty Peanut", "Cookies & Cream", "Whey Vanilla", "Caribbean"]
        );
        assert_eq!(catalog.brands(), vec!["A.B.C", "Barebells", "I.O|GENIX", "NOCCO"]);
    }

    #[test]
    fn test_filter_matches_name_or_brand_case_insensitively() {
        let catalog = sample();

        let by_brand = catalog.filter("BAREBELLS", SortDirection::Ascending);
        assert_eq!(by_brand.len(), 2);
        assert_eq!(by_brand[0].name, "Salty Peanut");

        let by_name = catalog.filter("whey", SortDirection::Descending);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].brand, "I.O|GENIX");

        assert!(catalog.filter("nothing", SortDirection::Descending).is_empty());
    }

    #[test]
    fn test_filter_empty_term_sorts_everything_by_price() {
        let catalog = sample();
        let desc = catalog.filter("", SortDirection::default());
        let prices: Vec<i64> = desc.iter().map(|p| p.price.cents()).collect();
        assert_eq!(prices, vec![3999, 225, 150, 140, 100]);

        let asc = catalog.filter("", SortDirection::Ascending);
        assert_eq!(asc.first().map(|p| p.price.cents()), Some(100));
    }

    #[test]
    fn test_select_brand_strips_first_period_only() {
        let catalog = sample();

        let iogenix = catalog.select_brand(Some("IO|GENIX"));
        assert_eq!(iogenix.len(), 1);
        assert_eq!(iogenix[0].brand, "I.O|GENIX");

        // "A.B.C" normalizes to "ab.c", not "abc"
        assert!(catalog.select_brand(Some("abc")).is_empty());
        assert_eq!(catalog.select_brand(Some("ab.c")).len(), 1);

        assert_eq!(catalog.select_brand(None).len(), 4);
    }

    #[test]
    fn test_from_json_and_find() {
        let catalog = Catalog::from_json(
            br#"[{"name":"Salty Peanut","brand":"Barebells","price":1.4,"image":"x.png"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("Salty Peanut").unwrap().price.cents(), 140);
        assert!(catalog.find("Missing").is_none());
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let err = Catalog::from_json(b"{\"name\": 1}").unwrap_err();
        assert!(matches!(err, CoreError::Catalog(_)));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_prices() {
        for price in ["1e20", "-0.5", "1000000"] {
            let json = format!(r#"[{{"name":"X","brand":"A","price":{price}}}]"#);
            let err = Catalog::from_json(json.as_bytes()).unwrap_err();
            assert!(
                matches!(err, CoreError::Catalog(ref msg) if msg.contains("'X'")),
                "price {price}"
            );
        }

        let at_limit = Catalog::from_json(br#"[{"name":"X","brand":"A","price":999999.99}]"#).unwrap();
        assert_eq!(at_limit.products()[0].price.cents(), 99_999_999);
    }

    #[test]
    fn test_sort_direction_wire_names() {
        assert_eq!(serde_json::to_string(&SortDirection::Ascending).unwrap(), "\"asc\"");
        let parsed: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(parsed, SortDirection::Descending);
    }
}
