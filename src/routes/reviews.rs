use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::base_context;
use tera::Tera;

use crate::forms::reviews::{ProductReviewForm, ReviewForm};
use crate::pagination::PageQuery;
use crate::repository::DieselRepository;
use crate::routes::respond;
use crate::views::reviews;

#[get("/comments/")]
pub async fn show_reviews(
    params: web::Query<PageQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "reviews",
        &server_config.auth_service_url,
    );
    let result = reviews::show_reviews(repo.get_ref(), params.number());
    respond(result, &tera, context, "list reviews")
}

#[get("/comment/add/")]
pub async fn new_review(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "reviews",
        &server_config.auth_service_url,
    );
    let result = reviews::new_review_form(repo.get_ref(), &user);
    respond(result, &tera, context, "show review form")
}

#[post("/comment/add/")]
pub async fn create_review(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "reviews",
        &server_config.auth_service_url,
    );
    let result = reviews::create_review(repo.get_ref(), &user, form);
    respond(result, &tera, context, "create review")
}

#[get("/product/{product_id:\\d+}/add-comment/")]
pub async fn new_product_review(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let context = base_context(
        &flash_messages,
        &user,
        "products",
        &server_config.auth_service_url,
    );
    let result = reviews::new_product_review_form(repo.get_ref(), product_id);
    respond(result, &tera, context, &format!("show review form for product {product_id}"))
}

#[post("/product/{product_id:\\d+}/add-comment/")]
pub async fn create_product_review(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductReviewForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let context = base_context(
        &flash_messages,
        &user,
        "products",
        &server_config.auth_service_url,
    );
    let result = reviews::create_product_review(repo.get_ref(), &user, product_id, form);
    respond(result, &tera, context, &format!("review product {product_id}"))
}

#[get("/comment/{review_id:\\d+}/edit/")]
pub async fn edit_review(
    review_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let review_id = review_id.into_inner();
    let context = base_context(
        &flash_messages,
        &user,
        "reviews",
        &server_config.auth_service_url,
    );
    let result = reviews::edit_review_form(repo.get_ref(), &user, review_id);
    respond(result, &tera, context, &format!("edit review {review_id}"))
}

#[post("/comment/{review_id:\\d+}/edit/")]
pub async fn update_review(
    review_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductReviewForm>,
) -> impl Responder {
    let review_id = review_id.into_inner();
    let context = base_context(
        &flash_messages,
        &user,
        "reviews",
        &server_config.auth_service_url,
    );
    let result = reviews::update_review(repo.get_ref(), &user, review_id, form);
    respond(result, &tera, context, &format!("update review {review_id}"))
}

/// Reviews are removed without a confirmation page, so GET deletes too.
#[get("/comment/{review_id:\\d+}/delete/")]
pub async fn delete_review_link(
    review_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    delete(review_id.into_inner(), &user, &repo, &tera)
}

#[post("/comment/{review_id:\\d+}/delete/")]
pub async fn delete_review(
    review_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    delete(review_id.into_inner(), &user, &repo, &tera)
}

fn delete(
    review_id: i32,
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    tera: &Tera,
) -> actix_web::HttpResponse {
    let result = reviews::delete_review(repo, user, review_id);
    respond(
        result,
        tera,
        tera::Context::new(),
        &format!("delete review {review_id}"),
    )
}
