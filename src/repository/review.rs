use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::review::{
    NewReview as DomainNewReview, Review as DomainReview, ReviewListQuery,
    UpdateReview as DomainUpdateReview,
};
use crate::domain::user::NewUser as DomainNewUser;
use crate::models::review::{
    NewReview as DbNewReview, Review as DbReview, UpdateReview as DbUpdateReview,
};
use crate::repository::user::get_or_create_user;
use crate::repository::{DieselRepository, ReviewReader, ReviewWriter};

impl ReviewReader for DieselRepository {
    fn get_review_by_id(&self, id: i32) -> RepositoryResult<Option<DomainReview>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let review = reviews::table
            .filter(reviews::id.eq(id))
            .first::<DbReview>(&mut conn)
            .optional()?;

        Ok(review.map(Into::into))
    }

    fn count_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<usize> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let mut count_query = reviews::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(product_id) = query.product_id {
            count_query = count_query.filter(reviews::product_id.eq(product_id));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }

    fn list_reviews(&self, query: &ReviewListQuery) -> RepositoryResult<Vec<DomainReview>> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let mut items = reviews::table
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(product_id) = query.product_id {
            items = items.filter(reviews::product_id.eq(product_id));
        }

        if let Some(window) = &query.window {
            items = items
                .offset(window.offset as i64)
                .limit(window.limit as i64);
        }

        let db_reviews = items.load::<DbReview>(&mut conn)?;

        Ok(db_reviews.into_iter().map(DomainReview::from).collect())
    }
}

impl ReviewWriter for DieselRepository {
    fn create_review(&self, new_review: &DomainNewReview) -> RepositoryResult<DomainReview> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let insertable = DbNewReview::from(new_review);

        let created = diesel::insert_into(reviews::table)
            .values(&insertable)
            .get_result::<DbReview>(&mut conn)?;

        Ok(created.into())
    }

    fn create_authored_review(
        &self,
        author: &DomainNewUser,
        new_review: &DomainNewReview,
    ) -> RepositoryResult<DomainReview> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        conn.transaction::<DomainReview, RepositoryError, _>(|conn| {
            let account = get_or_create_user(conn, author)?;
            let review = new_review.clone().with_author(account.id);

            let created = diesel::insert_into(reviews::table)
                .values(&DbNewReview::from(&review))
                .get_result::<DbReview>(conn)?;

            Ok(created.into())
        })
    }

    fn update_review(
        &self,
        review_id: i32,
        updates: &DomainUpdateReview,
    ) -> RepositoryResult<DomainReview> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateReview::from(updates);

        let updated = diesel::update(reviews::table.filter(reviews::id.eq(review_id)))
            .set(&db_updates)
            .get_result::<DbReview>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_review(&self, review_id: i32) -> RepositoryResult<()> {
        use crate::schema::reviews;

        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(reviews::table.filter(reviews::id.eq(review_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
