use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::repository::errors::RepositoryResult;
use pushkind_common::routes::check_role;
use tera::Context;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::product::ProductListQuery;
use crate::domain::review::{NewReview, Review, ReviewListQuery};
use crate::domain::user::{NewUser, User};
use crate::forms::reviews::{
    CleanedReview, ProductReviewForm, ProductReviewFormBinder, ReviewBody, ReviewForm,
    ReviewFormBinder,
};
use crate::pagination::{PaginationPolicy, Window};
use crate::repository::{ProductReader, ReviewReader, ReviewWriter, UserReader};
use crate::views::products::ProductStore;
use crate::views::{
    CollectionStore, CreateStore, CreateView, DeleteStore, DeleteView, ListView, ObjectStore,
    ServiceError, ServiceResult, UpdateStore, UpdateView, ViewResponse, resolve_object,
};

/// Reviews on the review index page.
pub const REVIEWS_PAGINATION: PaginationPolicy = PaginationPolicy::new(10, 3);

/// Reviews as seen by the generic views, optionally restricted to one product.
pub struct ReviewStore<'r, R: ?Sized> {
    repo: &'r R,
    product_id: Option<i32>,
}

impl<'r, R: ?Sized> ReviewStore<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self {
            repo,
            product_id: None,
        }
    }

    pub fn for_product(repo: &'r R, product_id: i32) -> Self {
        Self {
            repo,
            product_id: Some(product_id),
        }
    }

    fn query(&self) -> ReviewListQuery {
        match self.product_id {
            Some(product_id) => ReviewListQuery::new().product(product_id),
            None => ReviewListQuery::new(),
        }
    }
}

impl<R> ObjectStore for ReviewStore<'_, R>
where
    R: ReviewReader + ?Sized,
{
    type Object = Review;

    fn get_object(&self, id: i32) -> RepositoryResult<Option<Review>> {
        self.repo.get_review_by_id(id)
    }
}

impl<R> CollectionStore for ReviewStore<'_, R>
where
    R: ReviewReader + ?Sized,
{
    type Object = Review;

    fn count_objects(&self) -> RepositoryResult<usize> {
        self.repo.count_reviews(&self.query())
    }

    fn list_objects(&self, window: Option<Window>) -> RepositoryResult<Vec<Review>> {
        let query = match window {
            Some(window) => self.query().window(window),
            None => self.query(),
        };
        self.repo.list_reviews(&query)
    }
}

impl<R> UpdateStore<ReviewBody> for ReviewStore<'_, R>
where
    R: ReviewReader + ReviewWriter + ?Sized,
{
    fn update_object(&self, object: &Review, cleaned: ReviewBody) -> RepositoryResult<Review> {
        self.repo.update_review(object.id, &cleaned.into())
    }
}

impl<R> DeleteStore for ReviewStore<'_, R>
where
    R: ReviewReader + ReviewWriter + ?Sized,
{
    fn delete_object(&self, object: &Review) -> RepositoryResult<()> {
        self.repo.delete_review(object.id)
    }
}

/// New reviews by the current identity, for a product picked in the form.
pub struct AuthoredReviews<'r, R: ?Sized> {
    repo: &'r R,
    user: &'r AuthenticatedUser,
}

impl<R> CreateStore<CleanedReview> for AuthoredReviews<'_, R>
where
    R: ReviewWriter + ?Sized,
{
    type Object = Review;

    fn create_object(&self, cleaned: CleanedReview) -> RepositoryResult<Review> {
        let review = NewReview::new(
            cleaned.product_id,
            cleaned.email,
            cleaned.body.text,
            cleaned.body.score,
        );
        self.repo.create_authored_review(&NewUser::from(self.user), &review)
    }
}

/// New reviews by the current identity for one fixed product.
pub struct ProductReviews<'r, R: ?Sized> {
    repo: &'r R,
    user: &'r AuthenticatedUser,
    product_id: i32,
}

impl<R> CreateStore<ReviewBody> for ProductReviews<'_, R>
where
    R: ReviewWriter + ?Sized,
{
    type Object = Review;

    fn create_object(&self, cleaned: ReviewBody) -> RepositoryResult<Review> {
        let author = NewUser::from(self.user);
        let review = NewReview::new(
            self.product_id,
            author.email.as_str(),
            cleaned.text,
            cleaned.score,
        );
        self.repo.create_authored_review(&author, &review)
    }
}

/// Page of the reviewed product.
pub fn reviewed_product_url(review: &Review) -> String {
    format!("/product/{}/", review.product_id)
}

const CREATE: CreateView<Review> = CreateView {
    template: "reviews/create.html",
    success_url: reviewed_product_url,
    success_message: "Review added.",
};

/// Whether `user` may edit or delete `review`.
fn may_manage(user: &AuthenticatedUser, account: Option<&User>, review: &Review) -> bool {
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return true;
    }
    match (account, review.author_id) {
        (Some(account), Some(author_id)) => account.id == author_id,
        _ => false,
    }
}

fn find_account<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Option<User>>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_email(&user.email.to_lowercase())
        .map_err(ServiceError::from)
}

fn review_binder<R>(repo: &R) -> ServiceResult<ReviewFormBinder>
where
    R: ProductReader + ?Sized,
{
    let products = repo
        .list_products(&ProductListQuery::new())
        .map_err(ServiceError::from)?;
    Ok(ReviewFormBinder::new(&products))
}

fn product_context<R>(repo: &R, product_id: i32) -> ServiceResult<Context>
where
    R: ProductReader + ?Sized,
{
    let product = resolve_object(&ProductStore::new(repo), product_id)?;
    let mut context = Context::new();
    context.insert("product", &product);
    Ok(context)
}

/// Newest reviews across all products.
pub fn show_reviews<R>(repo: &R, page: Option<usize>) -> ServiceResult<ViewResponse>
where
    R: ReviewReader + ?Sized,
{
    ListView {
        template: "reviews/index.html",
        context_key: "reviews",
        pagination: Some(REVIEWS_PAGINATION),
    }
    .get(&ReviewStore::new(repo), page, Context::new())
}

/// Standalone review form; the e-mail starts out as the reviewer's own.
pub fn new_review_form<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ?Sized,
{
    let binder = review_binder(repo)?;
    CREATE.get(&binder, ReviewForm::blank(user.email.as_str()), Context::new())
}

pub fn create_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ReviewForm,
) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ReviewWriter + ?Sized,
{
    let binder = review_binder(repo)?;
    CREATE.post(
        &binder,
        &AuthoredReviews { repo, user },
        form,
        Context::new(),
    )
}

pub fn new_product_review_form<R>(repo: &R, product_id: i32) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ?Sized,
{
    let context = product_context(repo, product_id)?;
    CREATE.get(&ProductReviewFormBinder, ProductReviewForm::blank(), context)
}

/// Review of one product; the author and e-mail come from the identity.
pub fn create_product_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ProductReviewForm,
) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ReviewWriter + ?Sized,
{
    let context = product_context(repo, product_id)?;
    CREATE.post(
        &ProductReviewFormBinder,
        &ProductReviews {
            repo,
            user,
            product_id,
        },
        form,
        context,
    )
}

pub fn edit_review_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    review_id: i32,
) -> ServiceResult<ViewResponse>
where
    R: ReviewReader + UserReader + ?Sized,
{
    let account = find_account(repo, user)?;
    let allowed = |review: &Review| may_manage(user, account.as_ref(), review);

    update_view(&allowed).get(&ProductReviewFormBinder, &ReviewStore::new(repo), review_id)
}

/// Only the text and score change; the product stays the same.
pub fn update_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    review_id: i32,
    form: ProductReviewForm,
) -> ServiceResult<ViewResponse>
where
    R: ReviewReader + ReviewWriter + UserReader + ?Sized,
{
    let account = find_account(repo, user)?;
    let allowed = |review: &Review| may_manage(user, account.as_ref(), review);

    update_view(&allowed).post(
        &ProductReviewFormBinder,
        &ReviewStore::new(repo),
        review_id,
        form,
    )
}

/// Deletes right away, there is no confirmation page for reviews.
pub fn delete_review<R>(
    repo: &R,
    user: &AuthenticatedUser,
    review_id: i32,
) -> ServiceResult<ViewResponse>
where
    R: ReviewReader + ReviewWriter + UserReader + ?Sized,
{
    let account = find_account(repo, user)?;
    let allowed = |review: &Review| may_manage(user, account.as_ref(), review);
    let permission: &dyn Fn(&Review) -> bool = &allowed;

    DeleteView {
        confirmation: None,
        context_key: "review",
        success_url: reviewed_product_url,
        success_message: "Review deleted.",
        permission: Some(permission),
    }
    .post(&ReviewStore::new(repo), review_id)
}

fn update_view<'a>(allowed: &'a dyn Fn(&Review) -> bool) -> UpdateView<'a, Review> {
    UpdateView {
        template: "reviews/update.html",
        context_key: "review",
        success_url: reviewed_product_url,
        success_message: "Review updated.",
        permission: Some(allowed),
    }
}
