use catalog_reviews::domain::product::{NewProduct, ProductCategory, ProductListQuery, UpdateProduct};
use catalog_reviews::domain::review::{NewReview, ReviewListQuery, UpdateReview};
use catalog_reviews::domain::user::NewUser;
use catalog_reviews::pagination::Window;
use catalog_reviews::repository::{
    CategoryReader, DieselRepository, ProductReader, ProductWriter, ReviewReader, ReviewWriter,
    UserReader, UserWriter,
};
use pushkind_common::repository::errors::RepositoryError;

mod common;

#[test]
fn test_product_repository_crud() {
    let test_db = common::TestDb::new("test_product_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_product(
            &NewProduct::new("Thinkpad", ProductCategory::Laptop)
                .with_description("Business laptop")
                .with_image("thinkpad.png")
                .with_categories(["Office", "Travel", "Office"]),
        )
        .unwrap();
    assert_eq!(created.category, ProductCategory::Laptop);
    assert_eq!(created.image.as_deref(), Some("thinkpad.png"));
    assert_eq!(created.category_names(), vec!["Office", "Travel"]);

    let fetched = repo.get_product_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = repo
        .update_product(
            created.id,
            &UpdateProduct::new(
                "Thinkpad X1",
                ProductCategory::Laptop,
                "",
                None,
                vec!["Travel".to_string(), "Premium".to_string()],
            ),
        )
        .unwrap();
    assert_eq!(updated.name, "Thinkpad X1");
    assert_eq!(updated.description, "");
    assert_eq!(updated.image, None);
    assert_eq!(updated.category_names(), vec!["Travel", "Premium"]);

    let names: Vec<String> = repo
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Office", "Premium", "Travel"]);

    repo.delete_product(created.id).unwrap();
    assert!(repo.get_product_by_id(created.id).unwrap().is_none());

    let err = repo
        .delete_product(created.id)
        .expect_err("expected deleting a missing product to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_update_missing_product_is_not_found() {
    let test_db = common::TestDb::new("test_update_missing_product.db");
    let repo = DieselRepository::new(test_db.pool());

    let err = repo
        .update_product(
            404,
            &UpdateProduct::new("Ghost", ProductCategory::Pc, "", None, Vec::new()),
        )
        .expect_err("expected update of unknown product to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_products_listed_newest_first_with_window() {
    let test_db = common::TestDb::new("test_products_listed_newest_first.db");
    let repo = DieselRepository::new(test_db.pool());

    for name in ["First", "Second", "Third", "Fourth"] {
        repo.create_product(&NewProduct::new(name, ProductCategory::Monitor))
            .unwrap();
    }

    let query = ProductListQuery::new();
    assert_eq!(repo.count_products(&query).unwrap(), 4);

    let all: Vec<String> = repo
        .list_products(&query)
        .unwrap()
        .into_iter()
        .map(|product| product.name)
        .collect();
    assert_eq!(all, vec!["Fourth", "Third", "Second", "First"]);

    let window = ProductListQuery::new().window(Window {
        offset: 1,
        limit: 2,
    });
    let sliced: Vec<String> = repo
        .list_products(&window)
        .unwrap()
        .into_iter()
        .map(|product| product.name)
        .collect();
    assert_eq!(sliced, vec!["Third", "Second"]);
}

#[test]
fn test_review_repository_crud() {
    let test_db = common::TestDb::new("test_review_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let monitor = repo
        .create_product(&NewProduct::new("Dell U2720Q", ProductCategory::Monitor))
        .unwrap();
    let laptop = repo
        .create_product(&NewProduct::new("Macbook", ProductCategory::Laptop))
        .unwrap();

    let first = repo
        .create_review(&NewReview::new(monitor.id, "a@example.com", "Sharp", 5))
        .unwrap();
    repo.create_review(&NewReview::new(monitor.id, "b@example.com", "Too bright", 2))
        .unwrap();
    repo.create_review(&NewReview::new(laptop.id, "a@example.com", "Fast", 4))
        .unwrap();

    assert_eq!(repo.count_reviews(&ReviewListQuery::new()).unwrap(), 3);

    let monitor_query = ReviewListQuery::new().product(monitor.id);
    assert_eq!(repo.count_reviews(&monitor_query).unwrap(), 2);
    let texts: Vec<String> = repo
        .list_reviews(&monitor_query)
        .unwrap()
        .into_iter()
        .map(|review| review.text)
        .collect();
    assert_eq!(texts, vec!["Too bright", "Sharp"]);

    let windowed = repo
        .list_reviews(&ReviewListQuery::new().window(Window {
            offset: 2,
            limit: 10,
        }))
        .unwrap();
    assert_eq!(windowed.len(), 1);
    assert_eq!(windowed[0].id, first.id);

    let updated = repo
        .update_review(
            first.id,
            &UpdateReview {
                text: "Sharp and calibrated".to_string(),
                score: 4,
            },
        )
        .unwrap();
    assert_eq!(updated.text, "Sharp and calibrated");
    assert_eq!(updated.score, 4);
    assert_eq!(updated.email, "a@example.com");
    assert_eq!(updated.product_id, monitor.id);

    repo.delete_review(first.id).unwrap();
    assert!(repo.get_review_by_id(first.id).unwrap().is_none());

    let err = repo
        .delete_review(first.id)
        .expect_err("expected deleting a missing review to fail");
    assert!(matches!(err, RepositoryError::NotFound));

    let err = repo
        .update_review(
            first.id,
            &UpdateReview {
                text: "Gone".to_string(),
                score: 1,
            },
        )
        .expect_err("expected updating a missing review to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_deleting_product_removes_its_reviews() {
    let test_db = common::TestDb::new("test_deleting_product_removes_reviews.db");
    let repo = DieselRepository::new(test_db.pool());

    let product = repo
        .create_product(
            &NewProduct::new("Gaming PC", ProductCategory::Pc).with_categories(["Gaming"]),
        )
        .unwrap();
    let review = repo
        .create_review(&NewReview::new(product.id, "gamer@example.com", "Loud", 3))
        .unwrap();

    repo.delete_product(product.id).unwrap();

    assert!(repo.get_review_by_id(review.id).unwrap().is_none());
    assert_eq!(repo.count_reviews(&ReviewListQuery::new()).unwrap(), 0);
    // Tags outlive the products they were attached to.
    assert_eq!(repo.list_categories().unwrap().len(), 1);
}

#[test]
fn test_user_lookup_is_case_insensitive() {
    let test_db = common::TestDb::new("test_user_lookup.db");
    let repo = DieselRepository::new(test_db.pool());

    assert!(repo.get_user_by_email("reviewer@example.com").unwrap().is_none());

    let created = repo
        .create_user(&NewUser::new(
            "Reviewer".to_string(),
            "Reviewer@Example.com".to_string(),
        ))
        .unwrap();
    assert_eq!(created.email, "reviewer@example.com");

    let found = repo
        .get_user_by_email("REVIEWER@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(found, created);
}

#[test]
fn test_authored_review_reuses_account() {
    let test_db = common::TestDb::new("test_authored_review_reuses_account.db");
    let repo = DieselRepository::new(test_db.pool());
    let product = repo
        .create_product(&NewProduct::new("Gaming PC", ProductCategory::Pc))
        .unwrap();
    let author = NewUser::new("Reviewer".to_string(), "Reviewer@Example.com".to_string());

    let first = repo
        .create_authored_review(
            &author,
            &NewReview::new(product.id, "reviewer@example.com", "Loud", 2),
        )
        .unwrap();
    let second = repo
        .create_authored_review(
            &author,
            &NewReview::new(product.id, "reviewer@example.com", "Quieter", 3),
        )
        .unwrap();

    let account = repo
        .get_user_by_email("reviewer@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(first.author_id, Some(account.id));
    assert_eq!(second.author_id, Some(account.id));
}

#[test]
fn test_failed_authored_review_leaves_no_account() {
    let test_db = common::TestDb::new("test_failed_authored_review.db");
    let repo = DieselRepository::new(test_db.pool());
    let product = repo
        .create_product(&NewProduct::new("Gaming PC", ProductCategory::Pc))
        .unwrap();
    let author = NewUser::new("Reviewer".to_string(), "reviewer@example.com".to_string());

    // Score outside 1..=5 violates the table constraint.
    let result = repo.create_authored_review(
        &author,
        &NewReview::new(product.id, "reviewer@example.com", "Broken", 9),
    );

    assert!(result.is_err());
    assert!(repo.get_user_by_email("reviewer@example.com").unwrap().is_none());
    assert_eq!(repo.count_reviews(&ReviewListQuery::new()).unwrap(), 0);
}
