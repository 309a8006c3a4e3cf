// crates/petmart-store-sqlite/src/rows.rs
// ============================================================================
// Module: SQLite Row Mapping
// Description: Column lists and row decoders shared by the store modules.
// Purpose: Decode persisted rows into domain types, failing closed on bad data.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! ## Overview
//! Decoders run inside `rusqlite` row callbacks, so domain parse failures are
//! reported as column conversion errors. Products are decoded together with
//! their assigned promotion through a left join; images are attached after
//! the main query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::AnimalType;
use petmart_core::Category;
use petmart_core::DiscountPercent;
use petmart_core::DomainError;
use petmart_core::ImageId;
use petmart_core::Money;
use petmart_core::Product;
use petmart_core::ProductId;
use petmart_core::ProductImage;
use petmart_core::Promotion;
use petmart_core::PromotionId;
use petmart_core::StoreError;
use petmart_core::StoreId;
use petmart_core::Storefront;
use petmart_core::StorefrontStatus;
use petmart_core::Timestamp;
use petmart_core::User;
use petmart_core::UserId;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::types::Type;

use crate::store::db_error;

// ============================================================================
// SECTION: Column Lists
// ============================================================================

/// User columns in [`map_user`] order.
pub(crate) const USER_COLUMNS: &str =
    "id, name, email, phone, address, profile_photo_url, is_seller, created_at, updated_at";

/// Storefront columns in [`map_storefront`] order.
pub(crate) const STOREFRONT_COLUMNS: &str =
    "id, owner_id, name, domain, address, description, status, created_at, updated_at";

/// Promotion columns in [`map_promotion`] order.
pub(crate) const PROMOTION_COLUMNS: &str =
    "id, store_id, name, starts_at, ends_at, max_quantity, discount_bps, created_at";

/// Product select with its promotion joined, in [`map_product`] order.
pub(crate) const PRODUCT_SELECT: &str = "SELECT p.id, p.store_id, p.name, p.description, \
     p.price_cents, p.stock, p.category, p.animal_type, p.created_at, p.updated_at, pr.id, \
     pr.store_id, pr.name, pr.starts_at, pr.ends_at, pr.max_quantity, pr.discount_bps, \
     pr.created_at FROM products p LEFT JOIN promotions pr ON pr.id = p.promotion_id";

/// Offset of the joined promotion columns in [`PRODUCT_SELECT`].
const PRODUCT_PROMOTION_OFFSET: usize = 10;

// ============================================================================
// SECTION: Decoders
// ============================================================================

/// Builds a conversion error for a column holding unexpected data.
fn invalid_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        Type::Text,
        Box::new(DomainError::Validation(message)),
    )
}

/// Reads a unix-seconds timestamp column.
pub(crate) fn timestamp_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    Ok(Timestamp::from_unix_seconds(row.get(index)?))
}

/// Decodes a [`USER_COLUMNS`] row.
pub(crate) fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        profile_photo_url: row.get(5)?,
        is_seller: row.get(6)?,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

/// Decodes a [`STOREFRONT_COLUMNS`] row.
pub(crate) fn map_storefront(row: &Row<'_>) -> rusqlite::Result<Storefront> {
    let status: String = row.get(6)?;
    let status = StorefrontStatus::parse(&status)
        .ok_or_else(|| invalid_column(6, format!("unknown storefront status: {status}")))?;
    Ok(Storefront {
        id: StoreId::new(row.get(0)?),
        owner_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        domain: row.get(3)?,
        address: row.get(4)?,
        description: row.get(5)?,
        status,
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

/// Decodes promotion columns starting at `offset`.
fn promotion_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Promotion> {
    let bps: u32 = row.get(offset + 6)?;
    let discount_percent = DiscountPercent::from_basis_points(bps)
        .map_err(|err| invalid_column(offset + 6, err.to_string()))?;
    Ok(Promotion {
        id: PromotionId::new(row.get(offset)?),
        store_id: StoreId::new(row.get(offset + 1)?),
        name: row.get(offset + 2)?,
        starts_at: timestamp_at(row, offset + 3)?,
        ends_at: timestamp_at(row, offset + 4)?,
        max_quantity: row.get(offset + 5)?,
        discount_percent,
        created_at: timestamp_at(row, offset + 7)?,
    })
}

/// Decodes a [`PROMOTION_COLUMNS`] row.
pub(crate) fn map_promotion(row: &Row<'_>) -> rusqlite::Result<Promotion> {
    promotion_at(row, 0)
}

/// Decodes a [`PRODUCT_SELECT`] row without images.
pub(crate) fn map_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    let category: String = row.get(6)?;
    let category = Category::parse(&category)
        .ok_or_else(|| invalid_column(6, format!("unknown category: {category}")))?;
    let animal_type: String = row.get(7)?;
    let animal_type = AnimalType::parse(&animal_type)
        .ok_or_else(|| invalid_column(7, format!("unknown animal type: {animal_type}")))?;
    let promotion_id: Option<i64> = row.get(PRODUCT_PROMOTION_OFFSET)?;
    let promotion = match promotion_id {
        Some(_) => Some(promotion_at(row, PRODUCT_PROMOTION_OFFSET)?),
        None => None,
    };
    Ok(Product {
        id: ProductId::new(row.get(0)?),
        store_id: StoreId::new(row.get(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
        price: Money::from_cents(row.get(4)?),
        stock: row.get(5)?,
        category,
        animal_type,
        promotion,
        images: Vec::new(),
        created_at: timestamp_at(row, 8)?,
        updated_at: timestamp_at(row, 9)?,
    })
}

// ============================================================================
// SECTION: Loaders
// ============================================================================

/// Loads a user by id.
pub(crate) fn load_user(connection: &Connection, id: UserId) -> Result<Option<User>, StoreError> {
    connection
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.get()],
            map_user,
        )
        .optional()
        .map_err(|err| db_error(&err))
}

/// Loads a product's images in insertion order.
pub(crate) fn load_images(
    connection: &Connection,
    product: ProductId,
) -> Result<Vec<ProductImage>, StoreError> {
    let mut stmt = connection
        .prepare(
            "SELECT id, product_id, image_url, created_at FROM product_images
             WHERE product_id = ?1 ORDER BY id",
        )
        .map_err(|err| db_error(&err))?;
    let rows = stmt
        .query_map(params![product.get()], |row| {
            Ok(ProductImage {
                id: ImageId::new(row.get(0)?),
                product_id: ProductId::new(row.get(1)?),
                image_url: row.get(2)?,
                created_at: timestamp_at(row, 3)?,
            })
        })
        .map_err(|err| db_error(&err))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))
}

/// Attaches images to decoded products.
pub(crate) fn with_images(
    connection: &Connection,
    mut products: Vec<Product>,
) -> Result<Vec<Product>, StoreError> {
    for product in &mut products {
        product.images = load_images(connection, product.id)?;
    }
    Ok(products)
}

/// Loads a product with promotion and images.
pub(crate) fn load_product(
    connection: &Connection,
    id: ProductId,
) -> Result<Option<Product>, StoreError> {
    let product = connection
        .query_row(&format!("{PRODUCT_SELECT} WHERE p.id = ?1"), params![id.get()], map_product)
        .optional()
        .map_err(|err| db_error(&err))?;
    match product {
        Some(mut product) => {
            product.images = load_images(connection, product.id)?;
            Ok(Some(product))
        }
        None => Ok(None),
    }
}

/// Loads a product or reports it missing.
pub(crate) fn require_product(
    connection: &Connection,
    id: ProductId,
) -> Result<Product, StoreError> {
    load_product(connection, id)?
        .ok_or_else(|| StoreError::NotFound("Product not found".to_string()))
}

/// Loads a promotion by id.
pub(crate) fn load_promotion(
    connection: &Connection,
    id: PromotionId,
) -> Result<Option<Promotion>, StoreError> {
    connection
        .query_row(
            &format!("SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = ?1"),
            params![id.get()],
            map_promotion,
        )
        .optional()
        .map_err(|err| db_error(&err))
}

/// Returns discounted units a buyer has used under a promotion.
pub(crate) fn load_promotion_usage(
    connection: &Connection,
    user: UserId,
    promotion: PromotionId,
) -> Result<u32, StoreError> {
    let used: Option<u32> = connection
        .query_row(
            "SELECT quantity_used FROM promotion_usage WHERE user_id = ?1 AND promotion_id = ?2",
            params![user.get(), promotion.get()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| db_error(&err))?;
    Ok(used.unwrap_or(0))
}
