use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::category::Category as DomainCategory,
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::category::{Category as DbCategory, NewCategory as DbNewCategory},
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    models::product_category::NewProductCategory as DbNewProductCategory,
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match product {
            Some(db_product) => Ok(Some(with_categories(&mut conn, db_product)?)),
            None => Ok(None),
        }
    }

    fn count_products(&self, _query: &ProductListQuery) -> RepositoryResult<usize> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let total = products::table.count().get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }

    fn list_products(&self, query: &ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut items = products::table
            .order((products::created_at.desc(), products::id.desc()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(window) = &query.window {
            items = items
                .offset(window.offset as i64)
                .limit(window.limit as i64);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut category_map = load_categories_for_products(&mut conn, &product_ids)?;

        let mut domain_products = Vec::with_capacity(db_products.len());
        for db_product in db_products {
            let mut domain: DomainProduct = db_product.into();
            domain.categories = category_map.remove(&domain.id).unwrap_or_default();
            domain_products.push(domain);
        }

        Ok(domain_products)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let db_new = DbNewProduct::from(new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            attach_categories(conn, created.id, &new_product.categories)?;

            with_categories(conn, created)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::{product_categories, products};

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateProduct::from(updates);

            let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            diesel::delete(
                product_categories::table.filter(product_categories::product_id.eq(product_id)),
            )
            .execute(conn)?;

            attach_categories(conn, product_id, &updates.categories)?;

            with_categories(conn, updated)
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{product_categories, products, reviews};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(
                product_categories::table.filter(product_categories::product_id.eq(product_id)),
            )
            .execute(conn)?;

            diesel::delete(reviews::table.filter(reviews::product_id.eq(product_id)))
                .execute(conn)?;

            let deleted =
                diesel::delete(products::table.filter(products::id.eq(product_id))).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

/// Get-or-create every named category and link it to the product.
fn attach_categories(
    conn: &mut SqliteConnection,
    product_id: i32,
    names: &[String],
) -> RepositoryResult<()> {
    use crate::schema::product_categories;

    for name in names {
        let category = get_or_create_category(conn, name)?;

        diesel::insert_or_ignore_into(product_categories::table)
            .values(&DbNewProductCategory {
                product_id,
                category_id: category.id,
            })
            .execute(conn)?;
    }

    Ok(())
}

fn get_or_create_category(conn: &mut SqliteConnection, name: &str) -> RepositoryResult<DbCategory> {
    use crate::schema::categories;

    let existing = categories::table
        .filter(categories::name.eq(name))
        .first::<DbCategory>(conn)
        .optional()?;

    if let Some(category) = existing {
        return Ok(category);
    }

    let created = diesel::insert_into(categories::table)
        .values(&DbNewCategory { name })
        .get_result::<DbCategory>(conn)?;

    Ok(created)
}

fn with_categories(
    conn: &mut SqliteConnection,
    db_product: DbProduct,
) -> RepositoryResult<DomainProduct> {
    let mut domain: DomainProduct = db_product.into();
    let mut categories = load_categories_for_products(conn, &[domain.id])?;
    domain.categories = categories.remove(&domain.id).unwrap_or_default();
    Ok(domain)
}

fn load_categories_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainCategory>>> {
    use crate::schema::{categories, product_categories};

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_categories::table
        .inner_join(categories::table)
        .filter(product_categories::product_id.eq_any(product_ids))
        .order(product_categories::id.asc())
        .select((product_categories::product_id, DbCategory::as_select()))
        .load::<(i32, DbCategory)>(conn)?;

    let mut map: HashMap<i32, Vec<DomainCategory>> = HashMap::new();
    for (product_id, category) in rows {
        map.entry(product_id).or_default().push(category.into());
    }

    Ok(map)
}
