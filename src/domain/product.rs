use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::category::Category;
use crate::pagination::Window;

/// Fixed set of product kinds a catalog entry can belong to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    #[default]
    Pc,
    Laptop,
    Monitor,
}

/// Returned when a stored or submitted slug names no known product category.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown product category `{0}`")]
pub struct UnknownProductCategory(pub String);

impl ProductCategory {
    /// Every category in the order it is offered to users.
    pub const ALL: [ProductCategory; 3] = [Self::Pc, Self::Laptop, Self::Monitor];

    /// Slug persisted in the database and submitted by forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Laptop => "laptop",
            Self::Monitor => "monitor",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Laptop => "Laptop",
            Self::Monitor => "Monitor",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownProductCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| UnknownProductCategory(value.to_string()))
    }
}

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Title shown in listings.
    pub name: String,
    /// Kind of product.
    pub category: ProductCategory,
    /// Free-form description; may be empty.
    pub description: String,
    /// Optional reference to an image shown on the detail page.
    pub image: Option<String>,
    /// Category tags attached to the product, in the order they were attached.
    pub categories: Vec<Category>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Names of the attached category tags.
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|category| category.name.as_str())
            .collect()
    }
}

/// Payload required to insert a new product together with its category tags.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub image: Option<String>,
    /// Category names to get-or-create and associate once the product exists.
    pub categories: Vec<String>,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(name: impl Into<String>, category: ProductCategory) -> Self {
        Self {
            name: name.into(),
            category,
            description: String::new(),
            image: None,
            categories: Vec::new(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach an image reference to the product payload.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Category names the product should be associated with.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// Full replacement of a product's editable state.
///
/// `categories` replaces the association set: existing links are cleared
/// and the listed names are attached again.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateProduct {
    /// Build an update payload with the current timestamp.
    pub fn new(
        name: impl Into<String>,
        category: ProductCategory,
        description: impl Into<String>,
        image: Option<String>,
        categories: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
            image,
            categories,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Query definition used to list products, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListQuery {
    /// Optional slice of the ordered result set.
    pub window: Option<Window>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the results to a single page.
    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }
}
