// crates/petmart-store-sqlite/src/orders.rs
// ============================================================================
// Module: SQLite Order Store
// Description: Transactional checkout and order lifecycle.
// Purpose: Implement OrderStore with all-or-nothing stock and usage updates.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! ## Overview
//! Checkout reads each product inside the write transaction, plans the line
//! with the core pricing rules, then decrements stock with a guarded update so
//! concurrent buyers cannot oversell. Any rejected line returns before commit
//! and the transaction rolls back. Cancellation restores stock for items whose
//! product still exists and returns discounted units to the buyer's allowance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::DomainError;
use petmart_core::Money;
use petmart_core::Order;
use petmart_core::OrderId;
use petmart_core::OrderItem;
use petmart_core::OrderItemId;
use petmart_core::OrderRequest;
use petmart_core::OrderStatus;
use petmart_core::OrderStore;
use petmart_core::PlannedLine;
use petmart_core::ProductId;
use petmart_core::PromotionId;
use petmart_core::SellerOrder;
use petmart_core::StoreError;
use petmart_core::StoreId;
use petmart_core::Timestamp;
use petmart_core::UserId;
use petmart_core::merge_lines;
use petmart_core::plan_line;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::types::Type;

use crate::rows::load_product;
use crate::rows::load_promotion_usage;
use crate::rows::timestamp_at;
use crate::store::SqliteMarketStore;
use crate::store::db_error;

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Order header columns in [`map_order`] order.
const ORDER_COLUMNS: &str = "id, buyer_id, status, total_cents, created_at, updated_at";

/// Order item columns in [`map_order_item`] order.
const ITEM_COLUMNS: &str = "id, order_id, product_id, store_id, product_name, quantity, \
     unit_price_cents, discounted_units, line_total_cents, promotion_id";

/// Decodes an order header; items are attached separately.
fn map_order(row: &Row<'_>) -> rusqlite::Result<Order> {
    let status: String = row.get(2)?;
    let status = OrderStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            Box::new(DomainError::Validation(format!("unknown order status: {status}"))),
        )
    })?;
    Ok(Order {
        id: OrderId::new(row.get(0)?),
        buyer_id: UserId::new(row.get(1)?),
        status,
        total_price: Money::from_cents(row.get(3)?),
        created_at: timestamp_at(row, 4)?,
        updated_at: timestamp_at(row, 5)?,
        items: Vec::new(),
    })
}

/// Decodes an [`ITEM_COLUMNS`] row.
fn map_order_item(row: &Row<'_>) -> rusqlite::Result<OrderItem> {
    let product_id: Option<i64> = row.get(2)?;
    let promotion_id: Option<i64> = row.get(9)?;
    Ok(OrderItem {
        id: OrderItemId::new(row.get(0)?),
        order_id: OrderId::new(row.get(1)?),
        product_id: product_id.map(ProductId::new),
        store_id: StoreId::new(row.get(3)?),
        product_name: row.get(4)?,
        quantity: row.get(5)?,
        unit_price: Money::from_cents(row.get(6)?),
        discounted_units: row.get(7)?,
        line_total: Money::from_cents(row.get(8)?),
        promotion_id: promotion_id.map(PromotionId::new),
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads order items, optionally restricted to one storefront.
fn load_items(
    connection: &Connection,
    order: OrderId,
    store: Option<StoreId>,
) -> Result<Vec<OrderItem>, StoreError> {
    let mut stmt = connection
        .prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items
             WHERE order_id = ?1 AND (?2 IS NULL OR store_id = ?2) ORDER BY id"
        ))
        .map_err(|err| db_error(&err))?;
    let rows = stmt
        .query_map(params![order.get(), store.map(StoreId::get)], map_order_item)
        .map_err(|err| db_error(&err))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))
}

/// Loads an order with all items.
fn load_order(connection: &Connection, id: OrderId) -> Result<Option<Order>, StoreError> {
    let order = connection
        .query_row(
            &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
            params![id.get()],
            map_order,
        )
        .optional()
        .map_err(|err| db_error(&err))?;
    match order {
        Some(mut order) => {
            order.items = load_items(connection, order.id, None)?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

/// Plans a checkout line against current product state and applies its
/// stock and promotion usage changes.
fn reserve_line(
    connection: &Connection,
    request: &OrderRequest,
    product_id: ProductId,
    quantity: u32,
) -> Result<PlannedLine, StoreError> {
    let product = load_product(connection, product_id)?
        .ok_or_else(|| DomainError::NotFound(format!("Product ID {product_id} not found")))?;
    let used = match &product.promotion {
        Some(promotion) => load_promotion_usage(connection, request.buyer_id, promotion.id)?,
        None => 0,
    };
    let planned = plan_line(request.buyer_store, &product, quantity, used, request.placed_at)?;
    let changed = connection
        .execute(
            "UPDATE products SET stock = stock - ?2, updated_at = ?3
             WHERE id = ?1 AND stock >= ?2",
            params![product_id.get(), quantity, request.placed_at.as_unix_seconds()],
        )
        .map_err(|err| db_error(&err))?;
    if changed == 0 {
        return Err(DomainError::Validation(format!(
            "Product ID {product_id} is not available or has insufficient stock"
        ))
        .into());
    }
    if let Some(promotion) = planned.promotion_id {
        connection
            .execute(
                "INSERT INTO promotion_usage (user_id, promotion_id, quantity_used)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (user_id, promotion_id)
                 DO UPDATE SET quantity_used = quantity_used + excluded.quantity_used",
                params![request.buyer_id.get(), promotion.get(), planned.discounted_units],
            )
            .map_err(|err| db_error(&err))?;
    }
    Ok(planned)
}

/// Restores stock and promotion allowance for a cancelled order.
fn release_order(connection: &Connection, order: &Order, at: Timestamp) -> Result<(), StoreError> {
    for item in &order.items {
        if let Some(product) = item.product_id {
            connection
                .execute(
                    "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1",
                    params![product.get(), item.quantity, at.as_unix_seconds()],
                )
                .map_err(|err| db_error(&err))?;
        }
        if let Some(promotion) = item.promotion_id
            && item.discounted_units > 0
        {
            connection
                .execute(
                    "UPDATE promotion_usage SET quantity_used = MAX(quantity_used - ?3, 0)
                     WHERE user_id = ?1 AND promotion_id = ?2",
                    params![order.buyer_id.get(), promotion.get(), item.discounted_units],
                )
                .map_err(|err| db_error(&err))?;
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: OrderStore
// ============================================================================

impl OrderStore for SqliteMarketStore {
    fn place_order(&self, request: &OrderRequest) -> Result<Order, StoreError> {
        let lines = merge_lines(&request.lines)?;
        self.with_transaction(|tx| {
            let mut planned = Vec::with_capacity(lines.len());
            let mut total = Money::ZERO;
            for line in &lines {
                let plan = reserve_line(tx, request, line.product_id, line.quantity)?;
                total = total.checked_add(plan.line_total).ok_or_else(|| {
                    DomainError::validation("Order total exceeds the supported range")
                })?;
                planned.push(plan);
            }
            let at = request.placed_at.as_unix_seconds();
            tx.execute(
                "INSERT INTO orders (buyer_id, status, total_cents, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![request.buyer_id.get(), OrderStatus::Pending.as_str(), total.cents(), at],
            )
            .map_err(|err| db_error(&err))?;
            let order_id = OrderId::new(tx.last_insert_rowid());
            for plan in &planned {
                tx.execute(
                    "INSERT INTO order_items (order_id, product_id, store_id, product_name, \
                     quantity, unit_price_cents, discounted_units, line_total_cents, \
                     promotion_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        order_id.get(),
                        plan.product_id.get(),
                        plan.store_id.get(),
                        plan.product_name,
                        plan.quantity,
                        plan.unit_price.cents(),
                        plan.discounted_units,
                        plan.line_total.cents(),
                        plan.promotion_id.map(PromotionId::get)
                    ],
                )
                .map_err(|err| db_error(&err))?;
                if request.clear_cart {
                    tx.execute(
                        "DELETE FROM cart_items WHERE user_id = ?1 AND product_id = ?2",
                        params![request.buyer_id.get(), plan.product_id.get()],
                    )
                    .map_err(|err| db_error(&err))?;
                }
            }
            load_order(tx, order_id)?
                .ok_or_else(|| StoreError::Db("inserted order missing".to_string()))
        })
    }

    fn orders_for_buyer(&self, buyer: UserId) -> Result<Vec<Order>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = ?1
                     ORDER BY created_at DESC, id DESC"
                ))
                .map_err(|err| db_error(&err))?;
            let orders = stmt
                .query_map(params![buyer.get()], map_order)
                .map_err(|err| db_error(&err))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| db_error(&err))?;
            orders
                .into_iter()
                .map(|mut order| {
                    order.items = load_items(connection, order.id, None)?;
                    Ok(order)
                })
                .collect()
        })
    }

    fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.with_connection(|connection| load_order(connection, id))
    }

    fn orders_for_store(&self, store: StoreId) -> Result<Vec<SellerOrder>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(
                    "SELECT o.id, o.buyer_id, o.status, o.total_cents, o.created_at, o.updated_at
                     FROM orders o
                     WHERE EXISTS (
                        SELECT 1 FROM order_items oi WHERE oi.order_id = o.id AND oi.store_id = ?1
                     )
                     ORDER BY o.created_at DESC, o.id DESC",
                )
                .map_err(|err| db_error(&err))?;
            let orders = stmt
                .query_map(params![store.get()], map_order)
                .map_err(|err| db_error(&err))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| db_error(&err))?;
            orders
                .into_iter()
                .map(|order| {
                    let items = load_items(connection, order.id, Some(store))?;
                    let seller_subtotal = items
                        .iter()
                        .try_fold(Money::ZERO, |sum, item| sum.checked_add(item.line_total))
                        .ok_or_else(|| {
                            StoreError::Invalid("seller subtotal overflow".to_string())
                        })?;
                    Ok(SellerOrder {
                        order_id: order.id,
                        buyer_id: order.buyer_id,
                        status: order.status,
                        total_price: order.total_price,
                        seller_subtotal,
                        created_at: order.created_at,
                        items,
                    })
                })
                .collect()
        })
    }

    fn transition_order(
        &self,
        id: OrderId,
        next: OrderStatus,
        at: Timestamp,
    ) -> Result<Order, StoreError> {
        self.with_transaction(|tx| {
            let order = load_order(tx, id)?
                .ok_or_else(|| StoreError::NotFound("Order not found".to_string()))?;
            if !order.status.check_transition(next)? {
                return Ok(order);
            }
            if next == OrderStatus::Cancelled {
                release_order(tx, &order, at)?;
            }
            tx.execute(
                "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
                params![id.get(), next.as_str(), at.as_unix_seconds()],
            )
            .map_err(|err| db_error(&err))?;
            load_order(tx, id)?.ok_or_else(|| StoreError::NotFound("Order not found".to_string()))
        })
    }

    fn has_completed_purchase(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT EXISTS (
                        SELECT 1 FROM orders o JOIN order_items oi ON oi.order_id = o.id
                        WHERE o.buyer_id = ?1 AND oi.product_id = ?2 AND o.status = ?3
                     )",
                    params![user.get(), product.get(), OrderStatus::Completed.as_str()],
                    |row| row.get(0),
                )
                .map_err(|err| db_error(&err))
        })
    }
}
