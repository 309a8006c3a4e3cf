// crates/petmart-server/tests/marketplace.rs
// ============================================================================
// Module: Marketplace Flow Tests
// Description: End-to-end tests for sellers, catalog, promotions, carts,
//              orders, wishlists, and reviews.
// Purpose: Validate ownership rules, checkout atomicity, promotion
//          allowances, and the order lifecycle over real HTTP.
// ============================================================================

//! ## Overview
//! Each test spawns its own server so state never leaks between cases.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::float_cmp,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;

use common::TestServer;
use serde_json::json;

// ============================================================================
// SECTION: Storefronts and Products
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn storefront_registration_is_unique_per_user_and_domain() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Mia", "mia@example.com", "mias-pets").await;

    let second = server
        .post(
            "/seller/register",
            Some(&seller.access),
            json!({"name": "Second", "domain": "second-shop", "address": "2 Pet Lane"}),
        )
        .await;
    assert_eq!(second.status, 409);

    let other = server.signup("Nia", "nia@example.com").await;
    let taken = server
        .post(
            "/seller/register",
            Some(&other.access),
            json!({"name": "Copy", "domain": "mias-pets", "address": "3 Pet Lane"}),
        )
        .await;
    assert_eq!(taken.status, 409);
    assert_eq!(taken.message(), "Domain name is already taken");

    let bad_domain = server
        .post(
            "/seller/register",
            Some(&other.access),
            json!({"name": "Bad", "domain": "Bad Domain!", "address": "3 Pet Lane"}),
        )
        .await;
    assert_eq!(bad_domain.status, 400);

    let no_store = server.get("/seller/store", Some(&other.access)).await;
    assert_eq!(no_store.status, 404);

    let me = server.get("/users/me", Some(&seller.access)).await;
    assert_eq!(me.data()["is_seller"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_sellers_cannot_create_products() {
    let server = TestServer::spawn().await;
    let buyer = server.signup("Oli", "oli@example.com").await;
    let response = server
        .post(
            "/seller/products",
            Some(&buyer.access),
            json!({"name": "Kibble", "price": 10.0, "stock": 1, "category": "food",
                   "animal_type": "dog"}),
        )
        .await;
    assert_eq!(response.status, 403);
}

#[tokio::test(flavor = "multi_thread")]
async fn product_validation_and_ownership() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Pam", "pam@example.com", "pams-pets").await;
    let rival = server.seller("Quin", "quin@example.com", "quins-pets").await;
    let product = server.product(&seller, "Tuna Treats", 25.5, 10).await;

    let zero_price = server
        .post(
            "/seller/products",
            Some(&seller.access),
            json!({"name": "Free", "price": 0, "stock": 1, "category": "food",
                   "animal_type": "cat"}),
        )
        .await;
    assert_eq!(zero_price.status, 400);

    let bad_category = server
        .post(
            "/seller/products",
            Some(&seller.access),
            json!({"name": "Odd", "price": 1.0, "stock": 1, "category": "rocks",
                   "animal_type": "cat"}),
        )
        .await;
    assert_eq!(bad_category.status, 400);

    let legacy_labels = server
        .post(
            "/seller/products",
            Some(&seller.access),
            json!({"name": "Mainan Bola", "price": 3.0, "stock": 2, "category": "mainan",
                   "animal_type": "kucing"}),
        )
        .await;
    assert_eq!(legacy_labels.status, 201);
    assert_eq!(legacy_labels.data()["category"], "toys");
    assert_eq!(legacy_labels.data()["animal_type"], "cat");

    let hijack = server
        .put(&format!("/seller/products/{product}"), Some(&rival.access), json!({"price": 1.0}))
        .await;
    assert_eq!(hijack.status, 403);
    let hijack_delete =
        server.delete(&format!("/seller/products/{product}"), Some(&rival.access)).await;
    assert_eq!(hijack_delete.status, 403);

    let updated = server
        .put(
            &format!("/seller/products/{product}"),
            Some(&seller.access),
            json!({"price": 30.0, "stock": 4}),
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.data()["price"].as_f64().unwrap(), 30.0);
    assert_eq!(updated.data()["stock"], 4);

    let detail = server.get(&format!("/products/{product}"), None).await;
    assert_eq!(detail.status, 200);
    assert_eq!(detail.data()["store"]["domain"], "pams-pets");
    assert_eq!(detail.data()["rating"]["count"], 0);

    let deleted = server.delete(&format!("/seller/products/{product}"), Some(&seller.access)).await;
    assert_eq!(deleted.status, 200);
    assert_eq!(server.get(&format!("/products/{product}"), None).await.status, 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn product_images_can_be_added_and_removed() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Rae", "rae@example.com", "raes-pets").await;
    let product = server.product(&seller, "Leash", 12.0, 3).await;

    let added = server
        .post(
            &format!("/seller/products/{product}/images"),
            Some(&seller.access),
            json!({"image_url": "https://img.example.com/b.png"}),
        )
        .await;
    assert_eq!(added.status, 201);
    let image_id = added.data()["id"].as_i64().unwrap();

    let bad_url = server
        .post(
            &format!("/seller/products/{product}/images"),
            Some(&seller.access),
            json!({"image_url": "not a url"}),
        )
        .await;
    assert_eq!(bad_url.status, 400);

    let path = format!("/seller/products/{product}/images/{image_id}");
    assert_eq!(server.delete(&path, Some(&seller.access)).await.status, 200);
    assert_eq!(server.delete(&path, Some(&seller.access)).await.status, 404);
}

// ============================================================================
// SECTION: Catalog Browsing
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn catalog_filters_and_paginates() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Sam", "sam@example.com", "sams-pets").await;
    for (index, price) in [5.0, 15.0, 25.0, 35.0, 45.0].into_iter().enumerate() {
        server.product(&seller, &format!("Cat Food {index}"), price, 3).await;
    }
    let empty = server.product(&seller, "Sold Out Snack", 9.0, 0).await;

    let page = server.get("/products?per_page=2&page=3", None).await;
    assert_eq!(page.status, 200);
    assert_eq!(page.data()["total"], 6);
    assert_eq!(page.data()["items"].as_array().unwrap().len(), 2);

    let priced = server.get("/products?min_price=10&max_price=30&sort=price_asc", None).await;
    let prices: Vec<f64> = priced.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["price"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![15.0, 25.0]);

    let in_stock = server.get("/products?in_stock=true&per_page=50", None).await;
    assert!(
        in_stock.data()["items"].as_array().unwrap().iter().all(|item| item["id"] != empty)
    );

    let searched = server.get("/products?q=snack", None).await;
    assert_eq!(searched.data()["total"], 1);

    let by_category = server.get("/products/category/makanan", None).await;
    assert_eq!(by_category.status, 200);
    assert_eq!(by_category.data()["total"], 6);
    let by_animal = server.get("/products/animal/dog", None).await;
    assert_eq!(by_animal.data()["total"], 0);

    assert_eq!(server.get("/products/category/rocks", None).await.status, 400);
    assert_eq!(server.get("/products?per_page=0", None).await.status, 400);
    assert_eq!(server.get("/products?min_price=abc", None).await.status, 400);
}

// ============================================================================
// SECTION: Promotions
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn promotions_discount_up_to_the_per_buyer_allowance() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Tia", "tia@example.com", "tias-pets").await;
    let buyer = server.signup("Uma", "uma@example.com").await;
    let product = server.product(&seller, "Premium Kibble", 100.0, 20).await;

    let promotion = server
        .post(
            "/promotions",
            Some(&seller.access),
            json!({
                "promotion_name": "Launch Week",
                "start_date": "2023-11-14", "start_time": "00:00",
                "end_date": "2023-11-20", "end_time": "00:00",
                "max_quantity": 2,
                "discount": 20
            }),
        )
        .await;
    assert_eq!(promotion.status, 201);
    assert_eq!(promotion.data()["status"], "active");
    let promotion_id = promotion.data()["id"].as_i64().unwrap();

    let assigned = server
        .post(
            "/promotions/assign",
            Some(&seller.access),
            json!({"promotion_id": promotion_id, "product_id": product}),
        )
        .await;
    assert_eq!(assigned.status, 200);
    assert_eq!(assigned.data()["effective_price"].as_f64().unwrap(), 80.0);

    let first = server.checkout(&buyer, json!([{"product_id": product, "quantity": 3}])).await;
    assert_eq!(first.status, 201);
    assert_eq!(first.data()["total_price"].as_f64().unwrap(), 260.0);
    let first_id = first.data()["order_id"].as_i64().unwrap();

    let second = server.checkout(&buyer, json!([{"product_id": product, "quantity": 1}])).await;
    assert_eq!(second.data()["total_price"].as_f64().unwrap(), 100.0);

    let cancelled =
        server.post(&format!("/orders/{first_id}/cancel"), Some(&buyer.access), json!({})).await;
    assert_eq!(cancelled.status, 200);

    let third = server.checkout(&buyer, json!([{"product_id": product, "quantity": 1}])).await;
    assert_eq!(third.data()["total_price"].as_f64().unwrap(), 80.0);

    server.clock.advance(7 * 86_400);
    let expired = server.get(&format!("/products/{product}"), None).await;
    assert_eq!(expired.data()["effective_price"].as_f64().unwrap(), 100.0);
    let listed = server.get("/promotions", Some(&seller.access)).await;
    assert_eq!(listed.data()[0]["status"], "expired");
}

#[tokio::test(flavor = "multi_thread")]
async fn promotions_are_scoped_to_their_store() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Vic", "vic@example.com", "vics-pets").await;
    let rival = server.seller("Wes", "wes@example.com", "wes-pets").await;
    let product = server.product(&seller, "Bird Seed", 8.0, 5).await;
    let rival_product = server.product(&rival, "Hamster Wheel", 18.0, 5).await;

    let bad_window = server
        .post(
            "/promotions",
            Some(&seller.access),
            json!({
                "promotion_name": "Backwards",
                "start_date": "2023-11-20", "start_time": "00:00",
                "end_date": "2023-11-14", "end_time": "00:00",
                "max_quantity": 1, "discount": 10
            }),
        )
        .await;
    assert_eq!(bad_window.status, 400);

    let promotion = server
        .post(
            "/promotions",
            Some(&seller.access),
            json!({
                "promotion_name": "Weekend",
                "start_date": "2023-11-18", "start_time": "00:00",
                "end_date": "2023-11-19", "end_time": "23:59",
                "max_quantity": 1, "discount": 10
            }),
        )
        .await;
    assert_eq!(promotion.data()["status"], "upcoming");
    let promotion_id = promotion.data()["id"].as_i64().unwrap();

    let foreign_product = server
        .post(
            "/promotions/assign",
            Some(&seller.access),
            json!({"promotion_id": promotion_id, "product_id": rival_product}),
        )
        .await;
    assert_eq!(foreign_product.status, 403);

    // Existence is checked before ownership.
    let missing_product = server
        .post(
            "/promotions/assign",
            Some(&rival.access),
            json!({"promotion_id": promotion_id, "product_id": 999_999}),
        )
        .await;
    assert_eq!(missing_product.status, 404);
    assert_eq!(missing_product.message(), "Product not found");
    let missing_promotion = server
        .post(
            "/promotions/assign",
            Some(&seller.access),
            json!({"promotion_id": 999_999, "product_id": product}),
        )
        .await;
    assert_eq!(missing_promotion.status, 404);
    let foreign_assign = server
        .post(
            "/promotions/assign",
            Some(&rival.access),
            json!({"promotion_id": promotion_id, "product_id": rival_product}),
        )
        .await;
    assert_eq!(foreign_assign.status, 403);
    assert_eq!(foreign_assign.message(), "Unauthorized to modify this promotion");

    let foreign_promotion = server
        .put(
            &format!("/promotions/{promotion_id}"),
            Some(&rival.access),
            json!({
                "promotion_name": "Hijack",
                "start_date": "2023-11-18", "start_time": "00:00",
                "end_date": "2023-11-19", "end_time": "23:59",
                "max_quantity": 1, "discount": 90
            }),
        )
        .await;
    assert_eq!(foreign_promotion.status, 403);

    let assigned = server
        .post(
            "/promotions/assign",
            Some(&seller.access),
            json!({"promotion_id": promotion_id, "product_id": product}),
        )
        .await;
    assert_eq!(assigned.data()["effective_price"].as_f64().unwrap(), 8.0);

    let unassigned = server
        .post("/promotions/unassign", Some(&seller.access), json!({"product_id": product}))
        .await;
    assert_eq!(unassigned.status, 200);
    assert!(unassigned.data()["promotion"].is_null());

    let removed =
        server.delete(&format!("/promotions/{promotion_id}"), Some(&seller.access)).await;
    assert_eq!(removed.status, 200);
}

// ============================================================================
// SECTION: Cart and Checkout
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn cart_merges_quantities_and_checks_stock() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Xan", "xan@example.com", "xans-pets").await;
    let buyer = server.signup("Yul", "yul@example.com").await;
    let product = server.product(&seller, "Catnip", 4.0, 5).await;

    let own = server
        .post("/cart/items", Some(&seller.access), json!({"product_id": product, "quantity": 1}))
        .await;
    assert_eq!(own.status, 400);

    let added = server
        .post("/cart/items", Some(&buyer.access), json!({"product_id": product, "quantity": 2}))
        .await;
    assert_eq!(added.status, 201);
    let item_id = added.data()["id"].as_i64().unwrap();
    let merged = server
        .post("/cart/items", Some(&buyer.access), json!({"product_id": product, "quantity": 2}))
        .await;
    assert_eq!(merged.data()["quantity"], 4);
    assert_eq!(merged.data()["id"], item_id);

    let too_many = server
        .post("/cart/items", Some(&buyer.access), json!({"product_id": product, "quantity": 2}))
        .await;
    assert_eq!(too_many.status, 400);
    assert_eq!(too_many.message(), "Insufficient stock");
    let above_stock = server
        .put(&format!("/cart/items/{item_id}"), Some(&buyer.access), json!({"quantity": 6}))
        .await;
    assert_eq!(above_stock.status, 400);
    assert_eq!(above_stock.message(), "Insufficient stock");

    let cart = server.get("/cart", Some(&buyer.access)).await;
    assert_eq!(cart.data()["subtotal"].as_f64().unwrap(), 16.0);

    let zero = server
        .put(&format!("/cart/items/{item_id}"), Some(&buyer.access), json!({"quantity": 0}))
        .await;
    assert_eq!(zero.status, 400);
    let foreign = server
        .put(&format!("/cart/items/{item_id}"), Some(&seller.access), json!({"quantity": 1}))
        .await;
    assert_eq!(foreign.status, 404);

    let checkout = server
        .post("/orders/checkout", Some(&buyer.access), json!({"from_cart": true}))
        .await;
    assert_eq!(checkout.status, 201);
    assert_eq!(checkout.data()["total_price"].as_f64().unwrap(), 16.0);
    assert_eq!(server.stock_of(product).await, 1);

    let emptied = server.get("/cart", Some(&buyer.access)).await;
    assert!(emptied.data()["items"].as_array().unwrap().is_empty());

    let empty_checkout = server
        .post("/orders/checkout", Some(&buyer.access), json!({"from_cart": true}))
        .await;
    assert_eq!(empty_checkout.status, 400);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_cart_adds_stop_at_stock() {
    let server = Arc::new(TestServer::spawn().await);
    let seller = server.seller("Ida", "ida@example.com", "idas-pets").await;
    let buyer = server.signup("Jo", "jo@example.com").await;
    let product = server.product(&seller, "Chew Rope", 3.0, 5).await;

    let tasks: Vec<_> = (0 .. 10)
        .map(|_| {
            let server = Arc::clone(&server);
            let token = buyer.access.clone();
            let body = json!({"product_id": product, "quantity": 1});
            tokio::spawn(async move { server.post("/cart/items", Some(&token), body).await.status })
        })
        .collect();
    let mut added = 0;
    for task in tasks {
        match task.await.unwrap() {
            201 => added += 1,
            status => assert_eq!(status, 400),
        }
    }
    assert_eq!(added, 5);
    let cart = server.get("/cart", Some(&buyer.access)).await;
    assert_eq!(cart.data()["items"][0]["quantity"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn checkout_is_all_or_nothing() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Zed", "zed@example.com", "zeds-pets").await;
    let buyer = server.signup("Abe", "abe@example.com").await;
    let plenty = server.product(&seller, "Bulk Food", 10.0, 5).await;
    let scarce = server.product(&seller, "Rare Toy", 50.0, 1).await;

    let failed = server
        .checkout(
            &buyer,
            json!([
                {"product_id": plenty, "quantity": 2},
                {"product_id": scarce, "quantity": 2}
            ]),
        )
        .await;
    assert_eq!(failed.status, 400);
    assert_eq!(server.stock_of(plenty).await, 5);
    assert_eq!(server.stock_of(scarce).await, 1);

    let missing = server.checkout(&buyer, json!([{"product_id": 99_999, "quantity": 1}])).await;
    assert_eq!(missing.status, 404);

    let own = server.checkout(&seller, json!([{"product_id": plenty, "quantity": 1}])).await;
    assert_eq!(own.status, 400);

    let both = server
        .post(
            "/orders/checkout",
            Some(&buyer.access),
            json!({"products": [{"product_id": plenty, "quantity": 1}], "from_cart": true}),
        )
        .await;
    assert_eq!(both.status, 400);

    let duplicated = server
        .checkout(
            &buyer,
            json!([
                {"product_id": plenty, "quantity": 2},
                {"product_id": plenty, "quantity": 3}
            ]),
        )
        .await;
    assert_eq!(duplicated.status, 201);
    assert_eq!(duplicated.data()["items"].as_array().unwrap().len(), 1);
    assert_eq!(server.stock_of(plenty).await, 0);

    let history = server.get("/orders", Some(&buyer.access)).await;
    assert_eq!(history.data().as_array().unwrap().len(), 1);
    assert_eq!(history.data()[0]["item_count"], 1);
}

// ============================================================================
// SECTION: Order Lifecycle
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn order_lifecycle_is_enforced() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Bea", "bea@example.com", "beas-pets").await;
    let rival = server.seller("Cal", "cal@example.com", "cals-pets").await;
    let buyer = server.signup("Dee", "dee@example.com").await;
    let product = server.product(&seller, "Scratcher", 20.0, 4).await;

    let placed = server.checkout(&buyer, json!([{"product_id": product, "quantity": 3}])).await;
    let order_id = placed.data()["order_id"].as_i64().unwrap();
    assert_eq!(placed.data()["status"], "Pending");
    assert_eq!(server.stock_of(product).await, 1);

    let foreign_view = server.get(&format!("/orders/{order_id}"), Some(&rival.access)).await;
    assert_eq!(foreign_view.status, 404);
    let foreign_status = server
        .put(
            &format!("/seller/orders/{order_id}/status"),
            Some(&rival.access),
            json!({"status": "Processing"}),
        )
        .await;
    assert_eq!(foreign_status.status, 404);

    let invalid = server
        .put(
            &format!("/seller/orders/{order_id}/status"),
            Some(&seller.access),
            json!({"status": "Shipped"}),
        )
        .await;
    assert_eq!(invalid.status, 400);

    let seller_view = server.get("/seller/orders", Some(&seller.access)).await;
    assert_eq!(seller_view.data()[0]["seller_subtotal"].as_f64().unwrap(), 60.0);

    server.complete_order(&seller, order_id).await;
    let cancel =
        server.post(&format!("/orders/{order_id}/cancel"), Some(&buyer.access), json!({})).await;
    assert_eq!(cancel.status, 400);
    assert_eq!(cancel.message(), "Completed orders cannot be cancelled");
    assert_eq!(server.stock_of(product).await, 1);

    let second = server.checkout(&buyer, json!([{"product_id": product, "quantity": 1}])).await;
    let second_id = second.data()["order_id"].as_i64().unwrap();
    assert_eq!(server.stock_of(product).await, 0);
    let cancelled =
        server.post(&format!("/orders/{second_id}/cancel"), Some(&buyer.access), json!({})).await;
    assert_eq!(cancelled.status, 200);
    assert_eq!(cancelled.data()["status"], "Cancelled");
    assert_eq!(server.stock_of(product).await, 1);

    let twice =
        server.post(&format!("/orders/{second_id}/cancel"), Some(&buyer.access), json!({})).await;
    assert_eq!(twice.status, 400);
}

// ============================================================================
// SECTION: Wishlist and Reviews
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn wishlist_rejects_duplicates() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Eli", "eli@example.com", "elis-pets").await;
    let buyer = server.signup("Fay", "fay@example.com").await;
    let product = server.product(&seller, "Bed", 40.0, 2).await;

    let added =
        server.post("/wishlist", Some(&buyer.access), json!({"product_id": product})).await;
    assert_eq!(added.status, 201);
    let again =
        server.post("/wishlist", Some(&buyer.access), json!({"product_id": product})).await;
    assert_eq!(again.status, 409);
    let unknown =
        server.post("/wishlist", Some(&buyer.access), json!({"product_id": 424_242})).await;
    assert_eq!(unknown.status, 404);

    let listed = server.get("/wishlist", Some(&buyer.access)).await;
    assert_eq!(listed.data().as_array().unwrap().len(), 1);

    let path = format!("/wishlist/{product}");
    assert_eq!(server.delete(&path, Some(&buyer.access)).await.status, 200);
    assert_eq!(server.delete(&path, Some(&buyer.access)).await.status, 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn reviews_require_a_completed_purchase() {
    let server = TestServer::spawn().await;
    let seller = server.seller("Gil", "gil@example.com", "gils-pets").await;
    let buyer = server.signup("Hal", "hal@example.com").await;
    let stranger = server.signup("Ivy", "ivy@example.com").await;
    let product = server.product(&seller, "Brush", 7.0, 5).await;

    let early = server
        .post("/reviews", Some(&buyer.access), json!({"product_id": product, "rating": 5}))
        .await;
    assert_eq!(early.status, 403);

    let placed = server.checkout(&buyer, json!([{"product_id": product, "quantity": 1}])).await;
    let order_id = placed.data()["order_id"].as_i64().unwrap();
    let pending = server
        .post("/reviews", Some(&buyer.access), json!({"product_id": product, "rating": 5}))
        .await;
    assert_eq!(pending.status, 403);

    server.complete_order(&seller, order_id).await;
    let out_of_range = server
        .post("/reviews", Some(&buyer.access), json!({"product_id": product, "rating": 6}))
        .await;
    assert_eq!(out_of_range.status, 400);
    let fractional = server
        .post("/reviews", Some(&buyer.access), json!({"product_id": product, "rating": 4.5}))
        .await;
    assert_eq!(fractional.status, 400);

    let created = server
        .post(
            "/reviews",
            Some(&buyer.access),
            json!({"product_id": product, "rating": 4, "review": "Soft bristles"}),
        )
        .await;
    assert_eq!(created.status, 201);
    let review_id = created.data()["id"].as_i64().unwrap();

    let duplicate = server
        .post("/reviews", Some(&buyer.access), json!({"product_id": product, "rating": 3}))
        .await;
    assert_eq!(duplicate.status, 409);

    let summary = server.get(&format!("/products/{product}/reviews"), None).await;
    assert_eq!(summary.data()["count"], 1);
    assert_eq!(summary.data()["average"].as_f64().unwrap(), 4.0);

    let foreign_edit = server
        .put(&format!("/reviews/{review_id}"), Some(&stranger.access), json!({"rating": 1}))
        .await;
    assert_eq!(foreign_edit.status, 404);

    let edited = server
        .put(&format!("/reviews/{review_id}"), Some(&buyer.access), json!({"rating": 2}))
        .await;
    assert_eq!(edited.status, 200);
    assert_eq!(edited.data()["rating"], 2);
    assert_eq!(edited.data()["review"], "Soft bristles");

    let cleared = server
        .put(&format!("/reviews/{review_id}"), Some(&buyer.access), json!({"review": "  "}))
        .await;
    assert_eq!(cleared.status, 200);
    assert!(cleared.data()["review"].is_null());
    assert_eq!(cleared.data()["rating"], 2);

    let detail = server.get(&format!("/products/{product}"), None).await;
    assert_eq!(detail.data()["rating"]["average"].as_f64().unwrap(), 2.0);

    let removed = server.delete(&format!("/reviews/{review_id}"), Some(&buyer.access)).await;
    assert_eq!(removed.status, 200);
    assert_eq!(server.get(&format!("/reviews/{review_id}"), None).await.status, 404);
}
