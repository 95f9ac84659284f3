use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use catalog_reviews::SERVICE_ACCESS_ROLE;
use catalog_reviews::domain::product::{NewProduct, ProductCategory, ProductListQuery};
use catalog_reviews::domain::review::{NewReview, ReviewListQuery};
use catalog_reviews::forms::products::ProductForm;
use catalog_reviews::forms::reviews::{ProductReviewForm, ReviewForm};
use catalog_reviews::repository::{
    DieselRepository, ProductReader, ProductWriter, ReviewReader, ReviewWriter, UserReader,
};
use catalog_reviews::views::{ServiceError, ViewResponse, products, reviews};

mod common;

fn user(email: &str, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: email.into(),
        email: email.into(),
        hub_id: 1,
        name: "Reviewer".into(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 0,
    }
}

fn product_form(name: &str, categories: &str) -> ProductForm {
    ProductForm {
        name: Some(name.to_string()),
        category: Some("laptop".to_string()),
        description: Some("Light and quiet".to_string()),
        image: None,
        categories: Some(categories.to_string()),
    }
}

fn review_form(text: &str, score: &str) -> ProductReviewForm {
    ProductReviewForm {
        text: Some(text.to_string()),
        score: Some(score.to_string()),
    }
}

#[test]
fn create_product_persists_tags_and_redirects() {
    let test_db = common::TestDb::new("views_create_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let response = products::create_product(&repo, product_form("ultrabook pro 14", "Travel, travel , Office,,"))
        .expect("create product");

    let product = repo
        .list_products(&ProductListQuery::new())
        .expect("list products")
        .pop()
        .expect("product should exist");
    assert_eq!(product.name, "Ultrabook pro 14");
    assert_eq!(product.category, ProductCategory::Laptop);
    assert_eq!(product.category_names(), vec!["Travel", "Office"]);

    match response {
        ViewResponse::Redirect { location, message } => {
            assert_eq!(location, format!("/product/{}/", product.id));
            assert_eq!(message.as_deref(), Some("Product created."));
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn invalid_product_is_rerendered_without_saving() {
    let test_db = common::TestDb::new("views_invalid_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let response =
        products::create_product(&repo, product_form("short", "")).expect("create product");

    match response {
        ViewResponse::Render { template, context } => {
            assert_eq!(template, "products/create.html");
            let form = context.get("form").expect("form in context");
            assert_eq!(form["values"]["name"], json!("short"));
            assert!(form["errors"]["name"].is_array());
            assert!(context.contains_key("category_choices"));
        }
        other => panic!("expected render, got {other:?}"),
    }
    assert_eq!(repo.count_products(&ProductListQuery::new()).unwrap(), 0);
}

#[test]
fn update_product_replaces_tags() {
    let test_db = common::TestDb::new("views_update_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let product = repo
        .create_product(
            &NewProduct::new("Thinkpad T14", ProductCategory::Laptop).with_categories(["A", "B"]),
        )
        .unwrap();

    let response =
        products::update_product(&repo, product.id, product_form("Thinkpad T14 gen 2", "B, C"))
            .expect("update product");
    assert!(matches!(response, ViewResponse::Redirect { .. }));

    let updated = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(updated.name, "Thinkpad t14 gen 2");
    assert_eq!(updated.category_names(), vec!["B", "C"]);
}

#[test]
fn product_page_paginates_its_reviews() {
    let test_db = common::TestDb::new("views_product_page.db");
    let repo = DieselRepository::new(test_db.pool());

    let product = repo
        .create_product(&NewProduct::new("Dell U2720Q", ProductCategory::Monitor))
        .unwrap();
    let other = repo
        .create_product(&NewProduct::new("LG 27UL850", ProductCategory::Monitor))
        .unwrap();
    for score in 1..=4 {
        repo.create_review(&NewReview::new(product.id, "a@example.com", "Fine", score))
            .unwrap();
    }
    repo.create_review(&NewReview::new(other.id, "a@example.com", "Other", 5))
        .unwrap();

    let response = products::show_product(&repo, product.id, Some(2)).expect("show product");
    match response {
        ViewResponse::Render { template, context } => {
            assert_eq!(template, "products/detail.html");
            assert_eq!(context.get("product").unwrap()["id"], json!(product.id));
            assert_eq!(context.get("is_paginated"), Some(&json!(true)));
            let page = context.get("page").unwrap();
            assert_eq!(page["number"], json!(2));
            assert_eq!(page["num_pages"], json!(2));
            let reviews = context.get("reviews").unwrap().as_array().unwrap();
            assert_eq!(reviews.len(), 1);
            assert_eq!(reviews[0]["score"], json!(1));
            assert_eq!(context.get("form").unwrap()["values"]["score"], json!("1"));
        }
        other => panic!("expected render, got {other:?}"),
    }

    let err = products::show_product(&repo, 999, None).expect_err("unknown product");
    assert!(matches!(err, ServiceError::NotFound));
}

#[test]
fn review_index_keeps_orphans_on_last_page() {
    let test_db = common::TestDb::new("views_review_index.db");
    let repo = DieselRepository::new(test_db.pool());

    let product = repo
        .create_product(&NewProduct::new("Gaming PC", ProductCategory::Pc))
        .unwrap();
    for _ in 0..13 {
        repo.create_review(&NewReview::new(product.id, "a@example.com", "Ok", 3))
            .unwrap();
    }

    match reviews::show_reviews(&repo, None).expect("show reviews") {
        ViewResponse::Render { context, .. } => {
            assert_eq!(context.get("is_paginated"), Some(&json!(false)));
            let reviews = context.get("reviews").unwrap().as_array().unwrap();
            assert_eq!(reviews.len(), 13);
        }
        other => panic!("expected render, got {other:?}"),
    }
}

#[test]
fn product_review_creates_author_account() {
    let test_db = common::TestDb::new("views_product_review.db");
    let repo = DieselRepository::new(test_db.pool());
    let reviewer = user("Reviewer@Example.com", &[]);

    let product = repo
        .create_product(&NewProduct::new("Macbook Air", ProductCategory::Laptop))
        .unwrap();

    let response =
        reviews::create_product_review(&repo, &reviewer, product.id, review_form("Great", "5"))
            .expect("create review");
    match response {
        ViewResponse::Redirect { location, message } => {
            assert_eq!(location, format!("/product/{}/", product.id));
            assert_eq!(message.as_deref(), Some("Review added."));
        }
        other => panic!("expected redirect, got {other:?}"),
    }

    let account = repo
        .get_user_by_email("reviewer@example.com")
        .unwrap()
        .expect("account created");
    let review = repo
        .list_reviews(&ReviewListQuery::new().product(product.id))
        .unwrap()
        .pop()
        .expect("review stored");
    assert_eq!(review.author_id, Some(account.id));
    assert_eq!(review.email, "reviewer@example.com");
    assert_eq!(review.score, 5);

    // A second review reuses the account.
    reviews::create_product_review(&repo, &reviewer, product.id, review_form("Still", "4"))
        .expect("create second review");
    assert_eq!(
        repo.count_reviews(&ReviewListQuery::new().product(product.id))
            .unwrap(),
        2
    );
}

#[test]
fn standalone_review_rejects_unknown_product() {
    let test_db = common::TestDb::new("views_standalone_review.db");
    let repo = DieselRepository::new(test_db.pool());
    let reviewer = user("reviewer@example.com", &[]);

    repo.create_product(&NewProduct::new("Macbook Air", ProductCategory::Laptop))
        .unwrap();

    let form = ReviewForm {
        product: Some("999".to_string()),
        email: Some("someone@example.com".to_string()),
        text: Some("Nice".to_string()),
        score: Some("4".to_string()),
    };

    match reviews::create_review(&repo, &reviewer, form).expect("create review") {
        ViewResponse::Render { template, context } => {
            assert_eq!(template, "reviews/create.html");
            assert!(context.get("form").unwrap()["errors"]["product"].is_array());
            assert!(context.contains_key("product_choices"));
        }
        other => panic!("expected render, got {other:?}"),
    }
    assert_eq!(repo.count_reviews(&ReviewListQuery::new()).unwrap(), 0);
    assert!(
        repo.get_user_by_email("reviewer@example.com")
            .unwrap()
            .is_none()
    );
}

#[test]
fn only_author_or_admin_may_change_review() {
    let test_db = common::TestDb::new("views_review_permissions.db");
    let repo = DieselRepository::new(test_db.pool());
    let author = user("author@example.com", &[]);
    let stranger = user("stranger@example.com", &[]);
    let admin = user("admin@example.com", &[SERVICE_ACCESS_ROLE]);

    let product = repo
        .create_product(&NewProduct::new("Gaming PC", ProductCategory::Pc))
        .unwrap();
    reviews::create_product_review(&repo, &author, product.id, review_form("Loud", "2"))
        .expect("create review");
    let review = repo
        .list_reviews(&ReviewListQuery::new())
        .unwrap()
        .pop()
        .expect("review stored");

    let err = reviews::update_review(&repo, &stranger, review.id, review_form("Hacked", "5"))
        .expect_err("stranger may not edit");
    assert!(matches!(err, ServiceError::Unauthorized));
    let err = reviews::delete_review(&repo, &stranger, review.id).expect_err("stranger may not delete");
    assert!(matches!(err, ServiceError::Unauthorized));

    let response = reviews::update_review(&repo, &author, review.id, review_form("Quieter now", "3"))
        .expect("author edits");
    assert!(matches!(response, ViewResponse::Redirect { .. }));
    let edited = repo.get_review_by_id(review.id).unwrap().unwrap();
    assert_eq!(edited.text, "Quieter now");
    assert_eq!(edited.score, 3);
    assert_eq!(edited.product_id, product.id);

    let response = reviews::delete_review(&repo, &admin, review.id).expect("admin deletes");
    match response {
        ViewResponse::Redirect { location, .. } => {
            assert_eq!(location, format!("/product/{}/", product.id));
        }
        other => panic!("expected redirect, got {other:?}"),
    }
    assert!(repo.get_review_by_id(review.id).unwrap().is_none());
}

#[test]
fn delete_product_confirms_then_cascades() {
    let test_db = common::TestDb::new("views_delete_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let product = repo
        .create_product(&NewProduct::new("Dell U2720Q", ProductCategory::Monitor))
        .unwrap();
    let review = repo
        .create_review(&NewReview::new(product.id, "a@example.com", "Sharp", 5))
        .unwrap();

    match products::confirm_product_delete(&repo, product.id).expect("confirmation") {
        ViewResponse::Render { template, .. } => assert_eq!(template, "products/delete.html"),
        other => panic!("expected render, got {other:?}"),
    }
    assert!(repo.get_product_by_id(product.id).unwrap().is_some());

    match products::delete_product(&repo, product.id).expect("delete") {
        ViewResponse::Redirect { location, message } => {
            assert_eq!(location, "/");
            assert_eq!(message.as_deref(), Some("Product deleted."));
        }
        other => panic!("expected redirect, got {other:?}"),
    }
    assert!(repo.get_product_by_id(product.id).unwrap().is_none());
    assert!(repo.get_review_by_id(review.id).unwrap().is_none());
}

#[test]
fn resubmitting_edit_form_unchanged_keeps_product() {
    let test_db = common::TestDb::new("views_resubmit_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let product = repo
        .create_product(
            &NewProduct::new("Thinkpad t14", ProductCategory::Laptop)
                .with_description("Business laptop")
                .with_image("t14.png")
                .with_categories(["Office", "Travel"]),
        )
        .unwrap();

    let initial = match products::edit_product_form(&repo, product.id).expect("edit form") {
        ViewResponse::Render { template, context } => {
            assert_eq!(template, "products/update.html");
            assert_eq!(context.get("product").unwrap()["id"], json!(product.id));
            let values = context.get("form").unwrap()["values"].clone();
            serde_json::from_value::<ProductForm>(values).expect("form values")
        }
        other => panic!("expected render, got {other:?}"),
    };
    assert_eq!(initial.categories.as_deref(), Some("Office, Travel"));

    let response = products::update_product(&repo, product.id, initial).expect("update product");
    assert!(matches!(response, ViewResponse::Redirect { .. }));

    let after = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(after.name, product.name);
    assert_eq!(after.category, product.category);
    assert_eq!(after.description, product.description);
    assert_eq!(after.image, product.image);
    assert_eq!(after.category_names(), product.category_names());
}
