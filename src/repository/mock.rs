use mockall::mock;

use super::{
    CategoryReader, ProductReader, ProductWriter, ReviewReader, ReviewWriter, UserReader,
};
use crate::domain::{
    category::Category,
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    review::{NewReview, Review, ReviewListQuery, UpdateReview},
    user::{NewUser, User},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn count_products(&self, query: &ProductListQuery) -> RepositoryResult<usize>;
        fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }
}

mock! {
    pub ReviewReader {}

    impl ReviewReader for ReviewReader {
        fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>>;
        fn count_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<usize>;
        fn list_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<Vec<Review>>;
    }
}

mock! {
    pub ReviewWriter {}

    impl ReviewWriter for ReviewWriter {
        fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
        fn create_authored_review(&self, author: &NewUser, new_review: &NewReview) -> RepositoryResult<Review>;
        fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review>;
        fn delete_review(&self, review_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    }
}

/// Every mocked trait behind one value, for code generic over several of them.
#[derive(Default)]
pub struct MockRepository {
    pub products: MockProductReader,
    pub product_writer: MockProductWriter,
    pub categories: MockCategoryReader,
    pub reviews: MockReviewReader,
    pub review_writer: MockReviewWriter,
    pub users: MockUserReader,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductReader for MockRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
        self.products.get_product_by_id(id)
    }

    fn count_products(&self, query: &ProductListQuery) -> RepositoryResult<usize> {
        self.products.count_products(query)
    }

    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<Vec<Product>> {
        self.products.list_products(query)
    }
}

impl ProductWriter for MockRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        self.product_writer.create_product(new_product)
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product> {
        self.product_writer.update_product(product_id, updates)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        self.product_writer.delete_product(product_id)
    }
}

impl CategoryReader for MockRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.categories.list_categories()
    }
}

impl ReviewReader for MockRepository {
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<Review>> {
        self.reviews.get_review_by_id(id)
    }

    fn count_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<usize> {
        self.reviews.count_reviews(query)
    }

    fn list_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<Vec<Review>> {
        self.reviews.list_reviews(query)
    }
}

impl ReviewWriter for MockRepository {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review> {
        self.review_writer.create_review(new_review)
    }

    fn create_authored_review(
        &self,
        author: &NewUser,
        new_review: &NewReview,
    ) -> RepositoryResult<Review> {
        self.review_writer.create_authored_review(author, new_review)
    }

    fn update_review(&self, review_id: i32, updates: &UpdateReview) -> RepositoryResult<Review> {
        self.review_writer.update_review(review_id, updates)
    }

    fn delete_review(&self, review_id: i32) -> RepositoryResult<()> {
        self.review_writer.delete_review(review_id)
    }
}

impl UserReader for MockRepository {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.users.get_user_by_email(email)
    }
}
