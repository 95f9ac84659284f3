use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tera::Context;
use validator::{Validate, ValidationError};

use crate::domain::product::{NewProduct, Product, ProductCategory, UpdateProduct};
use crate::forms::{
    BoundForm, Choice, FieldErrors, FormBinder, FormData, FormOutcome, FromRecord, capitalize,
    invalid, non_blank, sanitize_inline_text, sanitize_multiline_text,
};

/// Minimum length of a product name after trimming.
pub const NAME_MIN_LEN: usize = 10;
/// Maximum length of a product name after trimming.
pub const NAME_MAX_LEN: usize = 50;

const DESCRIPTION_MAX_LEN: u64 = 2000;
const IMAGE_MAX_LEN: u64 = 255;
/// Limit on the tag list as it is shown back in the edit form.
const CATEGORIES_MAX_LEN: usize = 255;

/// Maximum length of a single category tag.
pub const CATEGORY_NAME_MAX_LEN: usize = 20;

/// Raw payload of the product create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_name_differs_from_description"))]
pub struct ProductForm {
    /// Title of the product.
    #[validate(required(message = "This field is required."), custom(function = "validate_name"))]
    pub name: Option<String>,
    /// Slug of a [`ProductCategory`].
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_product_category")
    )]
    pub category: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN, message = "Description is too long."))]
    pub description: Option<String>,
    /// Optional image reference.
    #[validate(length(max = IMAGE_MAX_LEN, message = "Image reference is too long."))]
    pub image: Option<String>,
    /// Comma separated category tags.
    #[validate(custom(function = "validate_category_names"))]
    pub categories: Option<String>,
}

/// Product values that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedProduct {
    /// Capitalised name.
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub image: Option<String>,
    /// Trimmed, non-empty, de-duplicated tag names in submission order.
    pub categories: Vec<String>,
}

impl CleanedProduct {
    pub fn into_new_product(self) -> NewProduct {
        let mut product = NewProduct::new(self.name, self.category)
            .with_description(self.description)
            .with_categories(self.categories);
        if let Some(image) = self.image {
            product = product.with_image(image);
        }
        product
    }

    pub fn into_update_product(self) -> UpdateProduct {
        UpdateProduct::new(
            self.name,
            self.category,
            self.description,
            self.image,
            self.categories,
        )
    }
}

impl ProductForm {
    /// Empty form with the default category selected.
    pub fn blank() -> Self {
        Self {
            category: Some(ProductCategory::default().as_str().to_string()),
            ..Self::default()
        }
    }

    fn clean(&self) -> Result<CleanedProduct, FieldErrors> {
        let category = self
            .category
            .as_deref()
            .unwrap_or_default()
            .trim()
            .parse::<ProductCategory>()
            .map_err(|err| {
                let mut errors = FieldErrors::new();
                errors.add("category", format!("Select a valid choice: {err}."));
                errors
            })?;

        Ok(CleanedProduct {
            name: capitalize(&sanitize_inline_text(
                self.name.as_deref().unwrap_or_default(),
            )),
            category,
            description: sanitize_multiline_text(self.description.as_deref().unwrap_or_default()),
            image: non_blank(self.image.as_deref()).map(str::to_string),
            categories: parse_category_names(self.categories.as_deref().unwrap_or_default()),
        })
    }
}

impl FormData for ProductForm {
    fn fill_missing(self, initial: Self) -> Self {
        Self {
            name: self.name.or(initial.name),
            category: self.category.or(initial.category),
            description: self.description.or(initial.description),
            image: self.image.or(initial.image),
            categories: self.categories.or(initial.categories),
        }
    }
}

impl FromRecord<Product> for ProductForm {
    fn from_record(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            category: Some(product.category.as_str().to_string()),
            description: Some(product.description.clone()),
            image: Some(product.image.clone().unwrap_or_default()),
            categories: Some(join_category_names(&product.category_names())),
        }
    }
}

/// Binder for [`ProductForm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFormBinder;

impl FormBinder for ProductFormBinder {
    type Data = ProductForm;
    type Cleaned = CleanedProduct;

    fn bind(&self, data: ProductForm) -> FormOutcome<ProductForm, CleanedProduct> {
        if let Err(errors) = data.validate() {
            let errors = FieldErrors::from(&errors);
            return FormOutcome::Invalid(BoundForm::with_errors(data, errors));
        }

        match data.clean() {
            Ok(cleaned) => FormOutcome::Valid(cleaned),
            Err(errors) => FormOutcome::Invalid(BoundForm::with_errors(data, errors)),
        }
    }

    fn extend_context(&self, context: &mut Context) {
        context.insert("category_choices", &category_choices());
    }
}

/// Options for the product category select.
pub fn category_choices() -> Vec<Choice> {
    ProductCategory::ALL
        .iter()
        .map(|category| Choice::new(category.as_str(), category.label()))
        .collect()
}

/// Split a comma separated tag list into trimmed, non-empty, unique names.
///
/// Duplicates are detected ignoring case; the first spelling entered is kept.
pub fn parse_category_names(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    let length = sanitize_inline_text(value).chars().count();
    if length < NAME_MIN_LEN {
        return Err(invalid(
            "title_too_short",
            format!("Title name should be at least {NAME_MIN_LEN} symbols long."),
        ));
    }
    if length > NAME_MAX_LEN {
        return Err(invalid(
            "title_too_long",
            format!("Title name should be at most {NAME_MAX_LEN} symbols long."),
        ));
    }
    Ok(())
}

fn validate_product_category(value: &str) -> Result<(), ValidationError> {
    value
        .trim()
        .parse::<ProductCategory>()
        .map(|_| ())
        .map_err(|err| invalid("invalid_choice", format!("Select a valid choice: {err}.")))
}

fn validate_category_names(value: &str) -> Result<(), ValidationError> {
    let names = parse_category_names(value);
    if let Some(name) = names
        .iter()
        .find(|name| name.chars().count() > CATEGORY_NAME_MAX_LEN)
    {
        return Err(invalid(
            "category_too_long",
            format!("Category `{name}` is longer than {CATEGORY_NAME_MAX_LEN} symbols."),
        ));
    }
    if join_category_names(&names).chars().count() > CATEGORIES_MAX_LEN {
        return Err(invalid("categories_too_long", "Categories are too long."));
    }
    Ok(())
}

/// Tag list in the form it is offered for editing.
fn join_category_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| name.as_ref())
        .collect::<Vec<&str>>()
        .join(", ")
}

fn validate_name_differs_from_description(form: &ProductForm) -> Result<(), ValidationError> {
    let name = sanitize_inline_text(form.name.as_deref().unwrap_or_default());
    let description = sanitize_multiline_text(form.description.as_deref().unwrap_or_default());
    if name.to_lowercase() == description.to_lowercase() {
        return Err(invalid(
            "text_duplicates_title",
            "Text should not duplicate title name",
        ));
    }
    Ok(())
}
