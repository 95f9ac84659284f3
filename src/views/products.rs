use pushkind_common::repository::errors::RepositoryResult;
use tera::Context;

use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{CleanedProduct, ProductForm, ProductFormBinder};
use crate::forms::reviews::{ProductReviewForm, ProductReviewFormBinder};
use crate::forms::{BoundForm, FormBinder};
use crate::pagination::{PaginationPolicy, Window};
use crate::repository::{CategoryReader, ProductReader, ProductWriter, ReviewReader};
use crate::views::reviews::ReviewStore;
use crate::views::{
    CollectionStore, CreateStore, CreateView, DeleteStore, DeleteView, DetailView, ListView,
    ObjectStore, ServiceError, ServiceResult, UpdateStore, UpdateView, ViewResponse,
    insert_collection,
};

/// Products on the index page.
pub const PRODUCTS_PAGINATION: PaginationPolicy = PaginationPolicy::new(5, 1);
/// Reviews on a product page.
pub const PRODUCT_REVIEWS_PAGINATION: PaginationPolicy = PaginationPolicy::new(3, 0);

/// Products as seen by the generic views.
pub struct ProductStore<'r, R: ?Sized> {
    repo: &'r R,
}

impl<'r, R: ?Sized> ProductStore<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }
}

impl<R> ObjectStore for ProductStore<'_, R>
where
    R: ProductReader + ?Sized,
{
    type Object = Product;

    fn get_object(&self, id: i32) -> RepositoryResult<Option<Product>> {
        self.repo.get_product_by_id(id)
    }
}

impl<R> CollectionStore for ProductStore<'_, R>
where
    R: ProductReader + ?Sized,
{
    type Object = Product;

    fn count_objects(&self) -> RepositoryResult<usize> {
        self.repo.count_products(&ProductListQuery::new())
    }

    fn list_objects(&self, window: Option<Window>) -> RepositoryResult<Vec<Product>> {
        let query = match window {
            Some(window) => ProductListQuery::new().window(window),
            None => ProductListQuery::new(),
        };
        self.repo.list_products(&query)
    }
}

impl<R> CreateStore<CleanedProduct> for ProductStore<'_, R>
where
    R: ProductWriter + ?Sized,
{
    type Object = Product;

    fn create_object(&self, cleaned: CleanedProduct) -> RepositoryResult<Product> {
        self.repo.create_product(&cleaned.into_new_product())
    }
}

impl<R> UpdateStore<CleanedProduct> for ProductStore<'_, R>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    fn update_object(&self, object: &Product, cleaned: CleanedProduct) -> RepositoryResult<Product> {
        self.repo
            .update_product(object.id, &cleaned.into_update_product())
    }
}

impl<R> DeleteStore for ProductStore<'_, R>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    fn delete_object(&self, object: &Product) -> RepositoryResult<()> {
        self.repo.delete_product(object.id)
    }
}

/// Location of the product page.
pub fn product_url(product: &Product) -> String {
    format!("/product/{}/", product.id)
}

fn index_url(_: &Product) -> String {
    "/".to_string()
}

const CREATE: CreateView<Product> = CreateView {
    template: "products/create.html",
    success_url: product_url,
    success_message: "Product created.",
};

const UPDATE: UpdateView<'static, Product> = UpdateView {
    template: "products/update.html",
    context_key: "product",
    success_url: product_url,
    success_message: "Product updated.",
    permission: None,
};

const DELETE: DeleteView<'static, Product> = DeleteView {
    confirmation: Some("products/delete.html"),
    context_key: "product",
    success_url: index_url,
    success_message: "Product deleted.",
    permission: None,
};

/// Newest products first together with the tag cloud.
pub fn show_products<R>(repo: &R, page: Option<usize>) -> ServiceResult<ViewResponse>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let categories = repo.list_categories().map_err(ServiceError::from)?;
    let mut extra = Context::new();
    extra.insert("categories", &categories);

    ListView {
        template: "products/index.html",
        context_key: "products",
        pagination: Some(PRODUCTS_PAGINATION),
    }
    .get(&ProductStore::new(repo), page, extra)
}

/// Product page with one page of its reviews and a blank review form.
pub fn show_product<R>(repo: &R, product_id: i32, page: Option<usize>) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ReviewReader + ?Sized,
{
    DetailView {
        template: "products/detail.html",
        context_key: "product",
    }
    .get(&ProductStore::new(repo), product_id, |product, context| {
        insert_collection(
            context,
            "reviews",
            &ReviewStore::for_product(repo, product.id),
            Some(PRODUCT_REVIEWS_PAGINATION),
            page,
        )?;
        context.insert("form", &BoundForm::unbound(ProductReviewForm::blank()));
        ProductReviewFormBinder.extend_context(context);
        Ok(())
    })
}

pub fn new_product_form() -> ServiceResult<ViewResponse> {
    CREATE.get(&ProductFormBinder, ProductForm::blank(), Context::new())
}

pub fn create_product<R>(repo: &R, form: ProductForm) -> ServiceResult<ViewResponse>
where
    R: ProductWriter + ?Sized,
{
    CREATE.post(&ProductFormBinder, &ProductStore::new(repo), form, Context::new())
}

pub fn edit_product_form<R>(repo: &R, product_id: i32) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ?Sized,
{
    UPDATE.get(&ProductFormBinder, &ProductStore::new(repo), product_id)
}

/// Tags are replaced as a whole by the submitted list.
pub fn update_product<R>(repo: &R, product_id: i32, form: ProductForm) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    UPDATE.post(&ProductFormBinder, &ProductStore::new(repo), product_id, form)
}

pub fn confirm_product_delete<R>(repo: &R, product_id: i32) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    DELETE.get(&ProductStore::new(repo), product_id)
}

pub fn delete_product<R>(repo: &R, product_id: i32) -> ServiceResult<ViewResponse>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    DELETE.post(&ProductStore::new(repo), product_id)
}
