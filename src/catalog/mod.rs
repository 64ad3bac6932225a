//! Link catalog: categories, subcategories and items.
//!
//! The catalog is read once at startup from `~/.config/nexus/catalog.toml`
//! (or the built-in catalog when that file is absent) and never mutated
//! afterwards.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Catalog shipped inside the binary.
const BUILTIN_CATALOG: &str = include_str!("default.toml");

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in catalog file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Globally unique; favorites refer to items by this id.
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    /// Unique within its parent category.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

/// The full ordered collection of categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    categories: Vec<Category>,
}

impl Catalog {
    /// Maximum catalog file size (4 MB).
    const MAX_FILE_SIZE: u64 = 4 * 1_048_576;

    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        match Self::from_toml_str(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "Built-in catalog is invalid, starting empty");
                Self::default()
            }
        }
    }

    /// Parse a catalog from TOML text. Duplicate ids are logged, not rejected.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        for problem in catalog.duplicate_ids() {
            tracing::warn!(problem = %problem, "Catalog contains duplicate id");
        }
        Ok(catalog)
    }

    /// Load the catalog from a TOML file.
    ///
    /// - Missing file → `Ok(Catalog::builtin())`
    /// - Empty file → `Ok(Catalog::builtin())`
    /// - Invalid TOML → `Err(CatalogError::Parse)`
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(CatalogError::TooLarge(format!(
                    "Catalog file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No catalog file found, using built-in catalog");
                return Ok(Self::builtin());
            }
            Err(e) => return Err(CatalogError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Catalog file disappeared, using built-in catalog");
                return Ok(Self::builtin());
            }
            Err(e) => return Err(CatalogError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Catalog file is empty, using built-in catalog");
            return Ok(Self::builtin());
        }

        let catalog = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            categories = catalog.categories.len(),
            items = catalog.item_count(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn first_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Every item in catalog order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.categories
            .iter()
            .flat_map(|c| c.sub_categories.iter())
            .flat_map(|s| s.items.iter())
    }

    /// Human-readable descriptions of every id uniqueness violation.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut category_ids = HashSet::new();
        let mut item_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id.as_str()) {
                problems.push(format!("category '{}'", category.id));
            }

            let mut sub_ids = HashSet::new();
            for sub in &category.sub_categories {
                if !sub_ids.insert(sub.id.as_str()) {
                    problems.push(format!("subcategory '{}' in '{}'", sub.id, category.id));
                }
                for item in &sub.items {
                    if !item_ids.insert(item.id.as_str()) {
                        problems.push(format!("item '{}'", item.id));
                    }
                }
            }
        }

        problems
    }
}

// ============================================================================
// Tests
// ============================================================================
