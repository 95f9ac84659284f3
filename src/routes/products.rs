use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::base_context;
use tera::Tera;

use crate::forms::products::ProductForm;
use crate::pagination::PageQuery;
use crate::repository::DieselRepository;
use crate::routes::respond;
use crate::views::products;

#[get("/")]
pub async fn show_products(
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
        "products",
        &server_config.auth_service_url,
    );
    let result = products::show_products(repo.get_ref(), params.number());
    respond(result, &tera, context, "list products")
}

#[get("/product/{product_id:\\d+}/")]
pub async fn show_product(
    product_id: web::Path<i32>,
    params: web::Query<PageQuery>,
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
    let result = products::show_product(repo.get_ref(), product_id, params.number());
    respond(result, &tera, context, &format!("show product {product_id}"))
}

#[get("/product/add/")]
pub async fn new_product(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "products",
        &server_config.auth_service_url,
    );
    respond(products::new_product_form(), &tera, context, "show product form")
}

#[post("/product/add/")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "products",
        &server_config.auth_service_url,
    );
    let result = products::create_product(repo.get_ref(), form);
    respond(result, &tera, context, "create product")
}

#[get("/product/{product_id:\\d+}/edit/")]
pub async fn edit_product(
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
    let result = products::edit_product_form(repo.get_ref(), product_id);
    respond(result, &tera, context, &format!("edit product {product_id}"))
}

#[post("/product/{product_id:\\d+}/edit/")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let context = base_context(
        &flash_messages,
        &user,
        "products",
        &server_config.auth_service_url,
    );
    let result = products::update_product(repo.get_ref(), product_id, form);
    respond(result, &tera, context, &format!("update product {product_id}"))
}

#[get("/product/{product_id:\\d+}/delete/")]
pub async fn confirm_delete_product(
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
    let result = products::confirm_product_delete(repo.get_ref(), product_id);
    respond(result, &tera, context, &format!("confirm deletion of product {product_id}"))
}

#[post("/product/{product_id:\\d+}/delete/")]
pub async fn delete_product(
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
    let result = products::delete_product(repo.get_ref(), product_id);
    respond(result, &tera, context, &format!("delete product {product_id}"))
}
