use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Window;

/// Lowest score a review can carry.
pub const MIN_SCORE: i32 = 1;
/// Highest score a review can carry.
pub const MAX_SCORE: i32 = 5;

/// Domain representation of a user review attached to one product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Review {
    /// Unique identifier of the review.
    pub id: i32,
    /// Local user that wrote the review; `None` once that user is gone.
    pub author_id: Option<i32>,
    /// Contact e-mail left with the review.
    pub email: String,
    /// Product the review belongs to. Never changes after creation.
    pub product_id: i32,
    /// Review body.
    pub text: String,
    /// Score in `MIN_SCORE..=MAX_SCORE`.
    pub score: i32,
    /// Timestamp for when the review was created.
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub author_id: Option<i32>,
    pub email: String,
    pub product_id: i32,
    pub text: String,
    pub score: i32,
}

impl NewReview {
    /// Build a review payload for `product_id`.
    pub fn new(
        product_id: i32,
        email: impl Into<String>,
        text: impl Into<String>,
        score: i32,
    ) -> Self {
        Self {
            author_id: None,
            email: email.into(),
            product_id,
            text: text.into(),
            score,
        }
    }

    /// Record the local user that wrote the review.
    pub fn with_author(mut self, author_id: i32) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

/// Editable part of a review. The product reference and e-mail are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReview {
    pub text: String,
    pub score: i32,
}

/// Query definition used to list reviews, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewListQuery {
    /// Restrict the results to reviews of a single product.
    pub product_id: Option<i32>,
    /// Optional slice of the ordered result set.
    pub window: Option<Window>,
}

impl ReviewListQuery {
    /// Construct a query that targets every review.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only return reviews attached to `product_id`.
    pub fn product(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Restrict the results to a single page.
    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }
}
