//! Generic request handling shared by the concrete catalog views.
//!
//! Each generic view is a plain configuration record. It talks to persisted
//! records only through the store traits below and to user input only through
//! a [`FormBinder`], and answers with a [`ViewResponse`] that the routes turn
//! into an HTTP response.

use pushkind_common::repository::errors::RepositoryResult;
use serde::Serialize;
use tera::Context;

pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

use crate::forms::{BoundForm, FormBinder, FormData, FormOutcome, FromRecord};
use crate::pagination::{PaginationPolicy, Window};

pub mod products;
pub mod reviews;

/// Terminal outcome of a view.
#[derive(Debug)]
pub enum ViewResponse {
    /// Render `template` with `context`.
    Render {
        template: &'static str,
        context: Context,
    },
    /// Redirect to `location`, optionally announcing success.
    Redirect {
        location: String,
        message: Option<String>,
    },
}

impl ViewResponse {
    pub fn render(template: &'static str, context: Context) -> Self {
        Self::Render { template, context }
    }

    pub fn redirect(location: impl Into<String>, message: Option<&str>) -> Self {
        Self::Redirect {
            location: location.into(),
            message: message.map(str::to_string),
        }
    }
}

/// Lookup of a single record by primary key.
pub trait ObjectStore {
    type Object: Serialize;

    fn get_object(&self, id: i32) -> RepositoryResult<Option<Self::Object>>;
}

/// Ordered collection of records.
pub trait CollectionStore {
    type Object: Serialize;

    fn count_objects(&self) -> RepositoryResult<usize>;
    /// Records in display order, restricted to `window` when given.
    fn list_objects(&self, window: Option<Window>) -> RepositoryResult<Vec<Self::Object>>;
}

/// Persists records built from cleaned form values of type `C`.
pub trait CreateStore<C> {
    type Object;

    fn create_object(&self, cleaned: C) -> RepositoryResult<Self::Object>;
}

pub trait UpdateStore<C>: ObjectStore {
    fn update_object(&self, object: &Self::Object, cleaned: C) -> RepositoryResult<Self::Object>;
}

pub trait DeleteStore: ObjectStore {
    fn delete_object(&self, object: &Self::Object) -> RepositoryResult<()>;
}

/// Record with primary key `id`, or [`ServiceError::NotFound`].
pub fn resolve_object<S>(store: &S, id: i32) -> ServiceResult<S::Object>
where
    S: ObjectStore + ?Sized,
{
    store
        .get_object(id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Load a collection into `context` under `key`.
///
/// With a policy only the requested page is loaded, and `page` and
/// `is_paginated` are added next to the items. Without one every record is
/// listed.
pub fn insert_collection<S>(
    context: &mut Context,
    key: &str,
    store: &S,
    pagination: Option<PaginationPolicy>,
    page: Option<usize>,
) -> ServiceResult<()>
where
    S: CollectionStore + ?Sized,
{
    let Some(policy) = pagination else {
        let items = store.list_objects(None).map_err(ServiceError::from)?;
        context.insert(key, &items);
        context.insert("is_paginated", &false);
        return Ok(());
    };

    let count = store.count_objects().map_err(ServiceError::from)?;
    let paginator = policy.paginator(count);
    let number = paginator.clamp(page);
    let items = store
        .list_objects(Some(paginator.window(number)))
        .map_err(ServiceError::from)?;
    let page = paginator.page(number, items);

    context.insert(key, &page.items);
    context.insert("is_paginated", &page.has_other_pages);
    context.insert("page", &page);
    Ok(())
}

fn render_form<B>(
    template: &'static str,
    binder: &B,
    form: BoundForm<B::Data>,
    mut context: Context,
) -> ViewResponse
where
    B: FormBinder,
{
    context.insert("form", &form);
    binder.extend_context(&mut context);
    ViewResponse::render(template, context)
}

/// Optional per-record access check. A refused record is reported as missing.
pub type Permission<'a, O> = Option<&'a dyn Fn(&O) -> bool>;

fn authorize<O>(permission: Permission<'_, O>, object: &O) -> ServiceResult<()> {
    match permission {
        Some(allowed) if !allowed(object) => Err(ServiceError::Unauthorized),
        _ => Ok(()),
    }
}

/// Every record of a collection, optionally paginated.
#[derive(Debug, Clone, Copy)]
pub struct ListView {
    pub template: &'static str,
    pub context_key: &'static str,
    pub pagination: Option<PaginationPolicy>,
}

impl ListView {
    /// Render the collection; `extra` is merged into the context first.
    pub fn get<S>(&self, store: &S, page: Option<usize>, extra: Context) -> ServiceResult<ViewResponse>
    where
        S: CollectionStore + ?Sized,
    {
        let mut context = extra;
        insert_collection(&mut context, self.context_key, store, self.pagination, page)?;
        Ok(ViewResponse::render(self.template, context))
    }
}

/// One record resolved from its primary key.
#[derive(Debug, Clone, Copy)]
pub struct DetailView {
    pub template: &'static str,
    pub context_key: &'static str,
}

impl DetailView {
    /// `extend` adds whatever else the page shows about the resolved record.
    pub fn get<S, F>(&self, store: &S, id: i32, extend: F) -> ServiceResult<ViewResponse>
    where
        S: ObjectStore + ?Sized,
        F: FnOnce(&S::Object, &mut Context) -> ServiceResult<()>,
    {
        let object = resolve_object(store, id)?;
        let mut context = Context::new();
        context.insert(self.context_key, &object);
        extend(&object, &mut context)?;
        Ok(ViewResponse::render(self.template, context))
    }
}

/// Blank form on GET, validate and persist on POST.
pub struct CreateView<O> {
    pub template: &'static str,
    pub success_url: fn(&O) -> String,
    pub success_message: &'static str,
}

impl<O> CreateView<O> {
    pub fn get<B>(&self, binder: &B, initial: B::Data, extra: Context) -> ServiceResult<ViewResponse>
    where
        B: FormBinder,
    {
        Ok(render_form(self.template, binder, BoundForm::unbound(initial), extra))
    }

    /// Nothing is persisted unless every rule of `binder` passes.
    pub fn post<B, S>(
        &self,
        binder: &B,
        store: &S,
        data: B::Data,
        extra: Context,
    ) -> ServiceResult<ViewResponse>
    where
        B: FormBinder,
        S: CreateStore<B::Cleaned, Object = O> + ?Sized,
    {
        match binder.bind(data) {
            FormOutcome::Valid(cleaned) => {
                let object = store.create_object(cleaned).map_err(ServiceError::from)?;
                Ok(ViewResponse::redirect(
                    (self.success_url)(&object),
                    Some(self.success_message),
                ))
            }
            FormOutcome::Invalid(form) => {
                log::debug!("Rejected submission for {}", self.template);
                Ok(render_form(self.template, binder, form, extra))
            }
        }
    }
}

/// Form pre-populated from an existing record.
///
/// Fields missing from a submission keep the record's current values.
pub struct UpdateView<'a, O> {
    pub template: &'static str,
    pub context_key: &'static str,
    pub success_url: fn(&O) -> String,
    pub success_message: &'static str,
    pub permission: Permission<'a, O>,
}

impl<O: Serialize> UpdateView<'_, O> {
    fn load<S>(&self, store: &S, id: i32) -> ServiceResult<O>
    where
        S: ObjectStore<Object = O> + ?Sized,
    {
        let object = resolve_object(store, id)?;
        authorize(self.permission, &object)?;
        Ok(object)
    }

    fn render<B>(&self, binder: &B, object: &O, form: BoundForm<B::Data>) -> ViewResponse
    where
        B: FormBinder,
    {
        let mut context = Context::new();
        context.insert(self.context_key, object);
        render_form(self.template, binder, form, context)
    }

    pub fn get<B, S>(&self, binder: &B, store: &S, id: i32) -> ServiceResult<ViewResponse>
    where
        B: FormBinder,
        B::Data: FromRecord<O>,
        S: ObjectStore<Object = O> + ?Sized,
    {
        let object = self.load(store, id)?;
        let initial = B::Data::from_record(&object);
        Ok(self.render(binder, &object, BoundForm::unbound(initial)))
    }

    pub fn post<B, S>(
        &self,
        binder: &B,
        store: &S,
        id: i32,
        data: B::Data,
    ) -> ServiceResult<ViewResponse>
    where
        B: FormBinder,
        B::Data: FromRecord<O>,
        S: UpdateStore<B::Cleaned, Object = O> + ?Sized,
    {
        let object = self.load(store, id)?;
        let data = data.fill_missing(B::Data::from_record(&object));

        match binder.bind(data) {
            FormOutcome::Valid(cleaned) => {
                let updated = store
                    .update_object(&object, cleaned)
                    .map_err(ServiceError::from)?;
                Ok(ViewResponse::redirect(
                    (self.success_url)(&updated),
                    Some(self.success_message),
                ))
            }
            FormOutcome::Invalid(form) => Ok(self.render(binder, &object, form)),
        }
    }
}

/// Removes a record, optionally behind a confirmation page.
pub struct DeleteView<'a, O> {
    /// Confirmation page rendered on GET. Without one a GET deletes right away.
    pub confirmation: Option<&'static str>,
    pub context_key: &'static str,
    pub success_url: fn(&O) -> String,
    pub success_message: &'static str,
    pub permission: Permission<'a, O>,
}

impl<O: Serialize> DeleteView<'_, O> {
    pub fn get<S>(&self, store: &S, id: i32) -> ServiceResult<ViewResponse>
    where
        S: DeleteStore<Object = O> + ?Sized,
    {
        let Some(template) = self.confirmation else {
            return self.post(store, id);
        };

        let object = resolve_object(store, id)?;
        authorize(self.permission, &object)?;

        let mut context = Context::new();
        context.insert(self.context_key, &object);
        Ok(ViewResponse::render(template, context))
    }

    pub fn post<S>(&self, store: &S, id: i32) -> ServiceResult<ViewResponse>
    where
        S: DeleteStore<Object = O> + ?Sized,
    {
        let object = resolve_object(store, id)?;
        authorize(self.permission, &object)?;

        store.delete_object(&object).map_err(ServiceError::from)?;
        Ok(ViewResponse::redirect(
            (self.success_url)(&object),
            Some(self.success_message),
        ))
    }
}
