// crates/petmart-store-sqlite/src/catalog.rs
// ============================================================================
// Module: SQLite Catalog Store
// Description: Products, product images, and catalog search.
// Purpose: Implement CatalogStore over the shared SQLite connection.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! ## Overview
//! Search builds one `WHERE` clause from the active filters and binds every
//! value as a parameter. Price filters and price sorts use the listed price;
//! text search is a case-insensitive substring match on name or description
//! with `LIKE` wildcards escaped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::CatalogStore;
use petmart_core::DomainError;
use petmart_core::ImageId;
use petmart_core::NewProduct;
use petmart_core::Product;
use petmart_core::ProductId;
use petmart_core::ProductImage;
use petmart_core::ProductPage;
use petmart_core::ProductPatch;
use petmart_core::ProductQuery;
use petmart_core::ProductSort;
use petmart_core::StoreError;
use petmart_core::StoreId;
use petmart_core::Timestamp;
use petmart_core::catalog::MAX_PRODUCT_IMAGES;
use rusqlite::Connection;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::rows::PRODUCT_SELECT;
use crate::rows::load_product;
use crate::rows::map_product;
use crate::rows::require_product;
use crate::rows::with_images;
use crate::store::SqliteMarketStore;
use crate::store::db_error;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Inserts an image row for a product.
fn insert_image(
    connection: &Connection,
    product: ProductId,
    image_url: &str,
    at: Timestamp,
) -> Result<ProductImage, StoreError> {
    connection
        .execute(
            "INSERT INTO product_images (product_id, image_url, created_at) VALUES (?1, ?2, ?3)",
            params![product.get(), image_url, at.as_unix_seconds()],
        )
        .map_err(|err| db_error(&err))?;
    Ok(ProductImage {
        id: ImageId::new(connection.last_insert_rowid()),
        product_id: product,
        image_url: image_url.to_string(),
        created_at: at,
    })
}

/// Escapes `LIKE` wildcards so user text matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Builds the `WHERE` clause and bound values for a catalog query.
fn search_filter(query: &ProductQuery) -> (String, Vec<Value>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    if let Some(text) = query.text.as_deref().map(str::trim).filter(|text| !text.is_empty()) {
        clauses.push("(p.name LIKE ? ESCAPE '\\' OR p.description LIKE ? ESCAPE '\\')");
        let pattern = like_pattern(text);
        values.push(Value::Text(pattern.clone()));
        values.push(Value::Text(pattern));
    }
    if let Some(category) = query.category {
        clauses.push("p.category = ?");
        values.push(Value::Text(category.as_str().to_string()));
    }
    if let Some(animal_type) = query.animal_type {
        clauses.push("p.animal_type = ?");
        values.push(Value::Text(animal_type.as_str().to_string()));
    }
    if let Some(min) = query.min_price {
        clauses.push("p.price_cents >= ?");
        values.push(Value::Integer(min.cents()));
    }
    if let Some(max) = query.max_price {
        clauses.push("p.price_cents <= ?");
        values.push(Value::Integer(max.cents()));
    }
    if let Some(store) = query.store_id {
        clauses.push("p.store_id = ?");
        values.push(Value::Integer(store.get()));
    }
    if query.in_stock {
        clauses.push("p.stock > 0");
    }
    let filter = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (filter, values)
}

/// Returns the `ORDER BY` clause for a sort key.
const fn order_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Newest => " ORDER BY p.created_at DESC, p.id DESC",
        ProductSort::PriceAsc => " ORDER BY p.price_cents ASC, p.id ASC",
        ProductSort::PriceDesc => " ORDER BY p.price_cents DESC, p.id ASC",
        ProductSort::Name => " ORDER BY p.name COLLATE NOCASE ASC, p.id ASC",
    }
}

// ============================================================================
// SECTION: CatalogStore
// ============================================================================

impl CatalogStore for SqliteMarketStore {
    fn create_product(
        &self,
        store: StoreId,
        product: &NewProduct,
        at: Timestamp,
    ) -> Result<Product, StoreError> {
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO products (store_id, name, description, price_cents, stock, category, \
                 animal_type, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    store.get(),
                    product.name,
                    product.description,
                    product.price.cents(),
                    product.stock,
                    product.category.as_str(),
                    product.animal_type.as_str(),
                    at.as_unix_seconds()
                ],
            )
            .map_err(|err| db_error(&err))?;
            let id = ProductId::new(tx.last_insert_rowid());
            for url in &product.image_urls {
                insert_image(tx, id, url, at)?;
            }
            require_product(tx, id)
        })
    }

    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.with_connection(|connection| load_product(connection, id))
    }

    fn products_by_store(&self, store: StoreId) -> Result<Vec<Product>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(&format!(
                    "{PRODUCT_SELECT} WHERE p.store_id = ?1 ORDER BY p.created_at DESC, p.id DESC"
                ))
                .map_err(|err| db_error(&err))?;
            let products = stmt
                .query_map(params![store.get()], map_product)
                .map_err(|err| db_error(&err))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| db_error(&err))?;
            with_images(connection, products)
        })
    }

    fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, StoreError> {
        query.validate()?;
        let (filter, values) = search_filter(query);
        self.with_connection(|connection| {
            let total: i64 = connection
                .query_row(
                    &format!("SELECT COUNT(*) FROM products p{filter}"),
                    params_from_iter(values.iter()),
                    |row| row.get(0),
                )
                .map_err(|err| db_error(&err))?;
            let mut page_values = values.clone();
            page_values.push(Value::Integer(i64::from(query.per_page)));
            page_values.push(Value::Integer(query.offset()));
            let sql = format!(
                "{PRODUCT_SELECT}{filter}{} LIMIT ? OFFSET ?",
                order_clause(query.sort)
            );
            let mut stmt = connection.prepare(&sql).map_err(|err| db_error(&err))?;
            let products = stmt
                .query_map(params_from_iter(page_values.iter()), map_product)
                .map_err(|err| db_error(&err))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| db_error(&err))?;
            Ok(ProductPage {
                items: with_images(connection, products)?,
                page: query.page,
                per_page: query.per_page,
                total: u64::try_from(total)
                    .map_err(|_| StoreError::Invalid("negative product count".to_string()))?,
            })
        })
    }

    fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        at: Timestamp,
    ) -> Result<Product, StoreError> {
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE products SET name = COALESCE(?2, name),
                     description = COALESCE(?3, description),
                     price_cents = COALESCE(?4, price_cents), stock = COALESCE(?5, stock),
                     category = COALESCE(?6, category), animal_type = COALESCE(?7, animal_type),
                     updated_at = ?8 WHERE id = ?1",
                    params![
                        id.get(),
                        patch.name,
                        patch.description,
                        patch.price.map(|price| price.cents()),
                        patch.stock,
                        patch.category.map(|category| category.as_str()),
                        patch.animal_type.map(|animal| animal.as_str()),
                        at.as_unix_seconds()
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("Product not found".to_string()));
            }
            require_product(tx, id)
        })
    }

    fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM products WHERE id = ?1", params![id.get()])
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }

    fn add_product_image(
        &self,
        product: ProductId,
        image_url: &str,
        at: Timestamp,
    ) -> Result<ProductImage, StoreError> {
        self.with_transaction(|tx| {
            let exists: i64 = tx
                .query_row(
                    "SELECT COUNT(*) FROM products WHERE id = ?1",
                    params![product.get()],
                    |row| row.get(0),
                )
                .map_err(|err| db_error(&err))?;
            if exists == 0 {
                return Err(StoreError::NotFound("Product not found".to_string()));
            }
            let count: i64 = tx
                .query_row(
                    "SELECT COUNT(*) FROM product_images WHERE product_id = ?1",
                    params![product.get()],
                    |row| row.get(0),
                )
                .map_err(|err| db_error(&err))?;
            if count >= i64::try_from(MAX_PRODUCT_IMAGES).unwrap_or(i64::MAX) {
                return Err(StoreError::Rejected(DomainError::Validation(format!(
                    "A product may have at most {MAX_PRODUCT_IMAGES} images"
                ))));
            }
            insert_image(tx, product, image_url, at)
        })
    }

    fn remove_product_image(&self, product: ProductId, image: ImageId) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute(
                    "DELETE FROM product_images WHERE id = ?1 AND product_id = ?2",
                    params![image.get(), product.get()],
                )
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
