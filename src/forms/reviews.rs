use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tera::Context;
use validator::{Validate, ValidationError};

use crate::domain::product::Product;
use crate::domain::review::{MAX_SCORE, MIN_SCORE, Review, UpdateReview};
use crate::forms::{
    BoundForm, Choice, FieldErrors, FormBinder, FormData, FormOutcome, FromRecord, error_message,
    invalid, sanitize_multiline_text,
};

const TEXT_MAX_LEN: u64 = 3000;
const EMAIL_MAX_LEN: u64 = 150;

/// Text and score of a review, shared by every review form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewBody {
    pub text: String,
    pub score: i32,
}

impl From<ReviewBody> for UpdateReview {
    fn from(value: ReviewBody) -> Self {
        Self {
            text: value.text,
            score: value.score,
        }
    }
}

/// Review form shown on a product page; the product and author come from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductReviewForm {
    #[validate(
        required(message = "This field is required."),
        length(max = TEXT_MAX_LEN, message = "Review is too long."),
        custom(function = "validate_text")
    )]
    pub text: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_score")
    )]
    pub score: Option<String>,
}

impl ProductReviewForm {
    /// Empty form with the lowest score selected.
    pub fn blank() -> Self {
        Self {
            text: None,
            score: Some(MIN_SCORE.to_string()),
        }
    }

    fn clean(&self) -> Result<ReviewBody, FieldErrors> {
        let score = parse_score(self.score.as_deref().unwrap_or_default()).map_err(|err| {
            let mut errors = FieldErrors::new();
            errors.add("score", error_message(&err));
            errors
        })?;

        Ok(ReviewBody {
            text: sanitize_multiline_text(self.text.as_deref().unwrap_or_default()),
            score,
        })
    }
}

impl FormData for ProductReviewForm {
    fn fill_missing(self, initial: Self) -> Self {
        Self {
            text: self.text.or(initial.text),
            score: self.score.or(initial.score),
        }
    }
}

impl FromRecord<Review> for ProductReviewForm {
    fn from_record(review: &Review) -> Self {
        Self {
            text: Some(review.text.clone()),
            score: Some(review.score.to_string()),
        }
    }
}

/// Binder for [`ProductReviewForm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductReviewFormBinder;

impl FormBinder for ProductReviewFormBinder {
    type Data = ProductReviewForm;
    type Cleaned = ReviewBody;

    fn bind(&self, data: ProductReviewForm) -> FormOutcome<ProductReviewForm, ReviewBody> {
        if let Err(errors) = data.validate() {
            let errors = FieldErrors::from(&errors);
            return FormOutcome::Invalid(BoundForm::with_errors(data, errors));
        }

        match data.clean() {
            Ok(body) => FormOutcome::Valid(body),
            Err(errors) => FormOutcome::Invalid(BoundForm::with_errors(data, errors)),
        }
    }

    fn extend_context(&self, context: &mut Context) {
        context.insert("score_choices", &score_choices());
    }
}

/// Standalone review form where the reviewer picks the product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReviewForm {
    /// Identifier of the reviewed product.
    #[validate(required(message = "This field is required."))]
    pub product: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address."),
        length(max = EMAIL_MAX_LEN, message = "Email is too long.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(max = TEXT_MAX_LEN, message = "Review is too long."),
        custom(function = "validate_text")
    )]
    pub text: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_score")
    )]
    pub score: Option<String>,
}

impl ReviewForm {
    /// Empty form addressed from `email`.
    pub fn blank(email: impl Into<String>) -> Self {
        Self {
            product: None,
            email: Some(email.into()),
            text: None,
            score: Some(MIN_SCORE.to_string()),
        }
    }
}

impl FormData for ReviewForm {
    fn fill_missing(self, initial: Self) -> Self {
        Self {
            product: self.product.or(initial.product),
            email: self.email.or(initial.email),
            text: self.text.or(initial.text),
            score: self.score.or(initial.score),
        }
    }
}

/// Review values that passed every rule of [`ReviewForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedReview {
    pub product_id: i32,
    /// Lower-cased contact e-mail.
    pub email: String,
    pub body: ReviewBody,
}

/// Binder for [`ReviewForm`], restricted to the products it was built with.
#[derive(Debug, Clone, Default)]
pub struct ReviewFormBinder {
    choices: Vec<Choice>,
    selectable: HashSet<i32>,
}

impl ReviewFormBinder {
    /// Only the given products may be chosen.
    pub fn new(products: &[Product]) -> Self {
        Self {
            choices: products
                .iter()
                .map(|product| Choice::new(product.id.to_string(), product.name.as_str()))
                .collect(),
            selectable: products.iter().map(|product| product.id).collect(),
        }
    }

    fn selected_product(&self, raw: &str) -> Option<i32> {
        raw.trim()
            .parse::<i32>()
            .ok()
            .filter(|id| self.selectable.contains(id))
    }
}

impl FormBinder for ReviewFormBinder {
    type Data = ReviewForm;
    type Cleaned = CleanedReview;

    fn bind(&self, data: ReviewForm) -> FormOutcome<ReviewForm, CleanedReview> {
        let mut errors = match data.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => FieldErrors::from(&errors),
        };

        let product_id = data
            .product
            .as_deref()
            .and_then(|raw| self.selected_product(raw));
        if data.product.is_some() && product_id.is_none() {
            errors.add(
                "product",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }

        let score = data.score.as_deref().map(parse_score);

        match (product_id, score) {
            (Some(product_id), Some(Ok(score))) if errors.is_empty() => {
                FormOutcome::Valid(CleanedReview {
                    product_id,
                    email: data
                        .email
                        .as_deref()
                        .unwrap_or_default()
                        .trim()
                        .to_lowercase(),
                    body: ReviewBody {
                        text: sanitize_multiline_text(data.text.as_deref().unwrap_or_default()),
                        score,
                    },
                })
            }
            _ => FormOutcome::Invalid(BoundForm::with_errors(data, errors)),
        }
    }

    fn extend_context(&self, context: &mut Context) {
        context.insert("product_choices", &self.choices);
        context.insert("score_choices", &score_choices());
    }
}

/// Options for the score select.
pub fn score_choices() -> Vec<Choice> {
    (MIN_SCORE..=MAX_SCORE)
        .map(|score| Choice::new(score.to_string(), score.to_string()))
        .collect()
}

fn parse_score(value: &str) -> Result<i32, ValidationError> {
    match value.trim().parse::<i32>() {
        Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Ok(score),
        _ => Err(invalid(
            "invalid_score",
            format!("Score must be a whole number from {MIN_SCORE} to {MAX_SCORE}."),
        )),
    }
}

fn validate_score(value: &str) -> Result<(), ValidationError> {
    parse_score(value).map(|_| ())
}

fn validate_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "This field is required."));
    }
    Ok(())
}
