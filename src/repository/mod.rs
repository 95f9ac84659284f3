use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::Category;
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::review::{NewReview, Review, ReviewListQuery, UpdateReview};
use crate::domain::user::{NewUser, User};

pub mod category;
pub mod product;
pub mod review;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    /// Product with its category tags, `None` when the id is unknown.
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn count_products(&self, query: &ProductListQuery) -> RepositoryResult<usize>;
    /// Products newest first, limited to the query window when one is set.
    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records and their category associations.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Replace the editable columns and the full association set.
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    /// Remove the product along with its reviews and associations.
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over category tags.
pub trait CategoryReader {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Read-only operations over review records.
pub trait ReviewReader {
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>>;
    fn count_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<usize>;
    /// Reviews newest first, limited to the query window when one is set.
    fn list_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<Vec<Review>>;
}

/// Write operations over review records.
pub trait ReviewWriter {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
    /// Insert a review written by `author`, creating the local account on
    /// first use. Both writes share one transaction.
    fn create_authored_review(
        &self,
        author: &NewUser,
        new_review: &NewReview,
    ) -> RepositoryResult<Review>;
    fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review>;
    fn delete_review(&self, review_id: i32) -> RepositoryResult<()>;
}

/// Lookup of local user mirrors.
pub trait UserReader {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}
