//! The closed category taxonomy.
//!
//! Category filters are resolved through the taxonomy before they reach
//! the place index: a filter may name a canonical category, one of its
//! aliases, or a subcategory. Lookups are case-insensitive.

use std::collections::BTreeMap;

use lepton_types::{Category, Place};

use crate::error::CatalogError;

/// What a category filter string resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Match places whose `category` equals this canonical name.
    Category(String),
    /// Match places whose `subcategory` equals this name.
    Subcategory(String),
    /// The filter names nothing in the taxonomy; no place can match.
    Unknown,
}

/// Immutable category taxonomy, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    /// Entries keyed by canonical name.
    categories: BTreeMap<String, Category>,
    /// Lower-cased canonical names and aliases -> canonical name.
    names: BTreeMap<String, String>,
    /// Lower-cased subcategory -> subcategory as stored on places.
    subcategories: BTreeMap<String, String>,
}

impl Taxonomy {
    /// Build a taxonomy from its entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateCategory`] if a canonical name or
    /// alias is claimed twice.
    pub fn new(entries: Vec<Category>) -> Result<Self, CatalogError> {
        let mut taxonomy = Self::default();

        for entry in entries {
            let canonical = entry.name.clone();
            for key in core::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let lowered = key.to_lowercase();
                if taxonomy.names.insert(lowered, canonical.clone()).is_some() {
                    return Err(CatalogError::DuplicateCategory(key.clone()));
                }
            }
            for sub in &entry.subcategories {
                taxonomy.subcategories.insert(sub.to_lowercase(), sub.clone());
            }
            taxonomy.categories.insert(canonical, entry);
        }

        Ok(taxonomy)
    }

    /// Resolve a category filter.
    ///
    /// Category names and aliases take precedence over subcategory names.
    pub fn resolve(&self, filter: &str) -> CategoryMatch {
        let lowered = filter.trim().to_lowercase();
        if let Some(canonical) = self.names.get(&lowered) {
            return CategoryMatch::Category(canonical.clone());
        }
        if let Some(sub) = self.subcategories.get(&lowered) {
            return CategoryMatch::Subcategory(sub.clone());
        }
        CategoryMatch::Unknown
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the taxonomy has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Check that a place's category and subcategory exist and agree.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCategory`] or
    /// [`CatalogError::UnknownSubcategory`].
    pub fn validate_place(&self, place: &Place) -> Result<(), CatalogError> {
        let Some(entry) = self.categories.get(&place.category) else {
            return Err(CatalogError::UnknownCategory {
                place: place.id,
                category: place.category.clone(),
            });
        };

        if entry.subcategories.iter().any(|s| *s == place.subcategory) {
            Ok(())
        } else {
            Err(CatalogError::UnknownSubcategory {
                place: place.id,
                category: place.category.clone(),
                subcategory: place.subcategory.clone(),
            })
        }
    }
}
