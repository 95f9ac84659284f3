use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::review::{
    NewReview as DomainNewReview, Review as DomainReview, UpdateReview as DomainUpdateReview,
};

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::reviews,
    belongs_to(super::product::Product, foreign_key = product_id)
)]
pub struct Review {
    pub id: i32,
    pub author_id: Option<i32>,
    pub email: String,
    pub product_id: i32,
    pub text: String,
    pub score: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub author_id: Option<i32>,
    pub email: &'a str,
    pub product_id: i32,
    pub text: &'a str,
    pub score: i32,
}

/// Only the body and score are editable.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::reviews)]
pub struct UpdateReview<'a> {
    pub text: &'a str,
    pub score: i32,
}

impl From<Review> for DomainReview {
    fn from(value: Review) -> Self {
        Self {
            id: value.id,
            author_id: value.author_id,
            email: value.email,
            product_id: value.product_id,
            text: value.text,
            score: value.score,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewReview> for NewReview<'a> {
    fn from(value: &'a DomainNewReview) -> Self {
        Self {
            author_id: value.author_id,
            email: value.email.as_str(),
            product_id: value.product_id,
            text: value.text.as_str(),
            score: value.score,
        }
    }
}

impl<'a> From<&'a DomainUpdateReview> for UpdateReview<'a> {
    fn from(value: &'a DomainUpdateReview) -> Self {
        Self {
            text: value.text.as_str(),
            score: value.score,
        }
    }
}
