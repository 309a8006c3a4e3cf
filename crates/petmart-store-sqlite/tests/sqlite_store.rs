// crates/petmart-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Market Store Tests
// Description: Behavioral tests for the SQLite marketplace store.
// Purpose: Validate path safety, schema versioning, uniqueness conflicts,
//          transactional checkout, cancellation, and cascades.
// ============================================================================

//! ## Overview
//! Exercises the store through the `petmart-core` traits:
//! - Path safety checks and schema version validation
//! - Unique-key conflicts (emails, domains, wishlists, reviews)
//! - Checkout atomicity, promotion allowances, and cancellation restock
//! - Product deletion keeping order snapshots

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;
use std::thread;

use petmart_core::AccountStore;
use petmart_core::AnimalType;
use petmart_core::CartStore;
use petmart_core::CatalogStore;
use petmart_core::Category;
use petmart_core::CheckoutLine;
use petmart_core::DiscountPercent;
use petmart_core::DomainError;
use petmart_core::EngagementStore;
use petmart_core::Money;
use petmart_core::NewProduct;
use petmart_core::NewReview;
use petmart_core::NewStorefront;
use petmart_core::OrderRequest;
use petmart_core::OrderStatus;
use petmart_core::OrderStore;
use petmart_core::OtpPolicy;
use petmart_core::OtpVerification;
use petmart_core::PendingRegistration;
use petmart_core::Product;
use petmart_core::ProductQuery;
use petmart_core::ProductSort;
use petmart_core::PromotionDraft;
use petmart_core::PromotionSchedule;
use petmart_core::PromotionStore;
use petmart_core::Rating;
use petmart_core::StoreError;
use petmart_core::StoreId;
use petmart_core::Storefront;
use petmart_core::StorefrontStore;
use petmart_core::Timestamp;
use petmart_core::User;
use petmart_core::UserId;
use petmart_store_sqlite::SqliteMarketStore;
use petmart_store_sqlite::SqliteStoreConfig;
use petmart_store_sqlite::SqliteStoreError;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const T0: Timestamp = Timestamp::from_unix_seconds(1_700_000_000);

const CODE: &str = "123456";

fn pending(email: &str) -> PendingRegistration {
    PendingRegistration {
        email: email.to_string(),
        code: CODE.to_string(),
        name: format!("User {email}"),
        phone: None,
        password_hash: "hash".to_string(),
        created_at: T0,
        expires_at: T0.plus_seconds(300),
        last_sent_at: T0,
        failed_attempts: 0,
    }
}

fn user(store: &SqliteMarketStore, email: &str) -> User {
    store.save_pending_registration(&pending(email)).expect("save pending");
    match store
        .verify_pending_registration(email, CODE, &OtpPolicy::default(), T0)
        .expect("verify pending")
    {
        OtpVerification::Registered(user) => user,
        other => panic!("expected registration, got {other:?}"),
    }
}

fn storefront(store: &SqliteMarketStore, owner: UserId, domain: &str) -> Storefront {
    store
        .create_storefront(
            &NewStorefront {
                owner_id: owner,
                name: format!("Store {domain}"),
                domain: domain.to_string(),
                address: "Jl. Kucing 1".to_string(),
                description: None,
            },
            T0,
        )
        .expect("create storefront")
}

fn product(
    store: &SqliteMarketStore,
    shop: StoreId,
    name: &str,
    cents: i64,
    stock: u32,
) -> Product {
    store
        .create_product(
            shop,
            &NewProduct {
                name: name.to_string(),
                description: Some(format!("{name} for happy pets")),
                price: Money::from_cents(cents),
                stock,
                category: Category::Food,
                animal_type: AnimalType::Cat,
                image_urls: vec!["https://img.example/one.png".to_string()],
            },
            T0,
        )
        .expect("create product")
}

fn order_request(buyer: UserId, lines: &[(Product, u32)]) -> OrderRequest {
    OrderRequest {
        buyer_id: buyer,
        buyer_store: None,
        lines: lines
            .iter()
            .map(|(product, quantity)| CheckoutLine {
                product_id: product.id,
                quantity: *quantity,
            })
            .collect(),
        clear_cart: false,
        placed_at: T0.plus_seconds(60),
    }
}

struct Fixture {
    store: SqliteMarketStore,
    buyer: User,
    shop: Storefront,
}

fn fixture() -> Fixture {
    let store = SqliteMarketStore::in_memory().expect("in-memory store");
    let seller = user(&store, "seller@petmart.test");
    let buyer = user(&store, "buyer@petmart.test");
    let shop = storefront(&store, seller.id, "kitty-corner");
    Fixture {
        store,
        buyer,
        shop,
    }
}

// ============================================================================
// SECTION: Open and Schema
// ============================================================================

#[test]
fn sqlite_store_rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let result = SqliteMarketStore::open(&SqliteStoreConfig::at_path(temp.path()));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn sqlite_store_rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("market.db");
    drop(SqliteMarketStore::open(&SqliteStoreConfig::at_path(&path)).unwrap());
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = ?1", params![99]).unwrap();
    drop(connection);
    let result = SqliteMarketStore::open(&SqliteStoreConfig::at_path(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("market.db");
    let created = {
        let store = SqliteMarketStore::open(&SqliteStoreConfig::at_path(&path)).unwrap();
        user(&store, "persist@petmart.test")
    };
    let store = SqliteMarketStore::open(&SqliteStoreConfig::at_path(&path)).unwrap();
    let loaded = store.user_by_id(created.id).unwrap().expect("user survives reopen");
    assert_eq!(loaded.email, "persist@petmart.test");
}

// ============================================================================
// SECTION: Accounts and Storefronts
// ============================================================================

#[test]
fn duplicate_email_is_a_conflict() {
    let store = SqliteMarketStore::in_memory().unwrap();
    user(&store, "dup@petmart.test");
    store.save_pending_registration(&pending("dup@petmart.test")).unwrap();
    let err = store
        .verify_pending_registration("dup@petmart.test", CODE, &OtpPolicy::default(), T0)
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(store.pending_registration("dup@petmart.test").unwrap().is_some());
}

#[test]
fn pending_registration_completes_into_user() {
    let store = SqliteMarketStore::in_memory().unwrap();
    let mut registration = pending("new@petmart.test");
    registration.name = "New Owner".to_string();
    registration.phone = Some("+6281234567".to_string());
    store.save_pending_registration(&registration).unwrap();
    let policy = OtpPolicy::default();

    for attempts in 1 ..= 2 {
        let outcome = store
            .verify_pending_registration("new@petmart.test", "000000", &policy, T0)
            .unwrap();
        assert_eq!(
            outcome,
            OtpVerification::Mismatch {
                attempts
            }
        );
    }
    let stored = store.pending_registration("new@petmart.test").unwrap().unwrap();
    assert_eq!(stored.failed_attempts, 2);

    let outcome = store
        .verify_pending_registration("new@petmart.test", CODE, &policy, T0.plus_seconds(10))
        .unwrap();
    let OtpVerification::Registered(created) = outcome else {
        panic!("expected registration, got {outcome:?}");
    };
    assert_eq!(created.name, "New Owner");
    assert!(!created.is_seller);
    assert!(store.pending_registration("new@petmart.test").unwrap().is_none());
    let credentials = store.credentials_by_email("new@petmart.test").unwrap().unwrap();
    assert_eq!(credentials.user.id, created.id);
    assert_eq!(
        store.verify_pending_registration("new@petmart.test", CODE, &policy, T0).unwrap(),
        OtpVerification::NoPending
    );
}

#[test]
fn expired_code_keeps_the_registration() {
    let store = SqliteMarketStore::in_memory().unwrap();
    store.save_pending_registration(&pending("late@petmart.test")).unwrap();
    let outcome = store
        .verify_pending_registration(
            "late@petmart.test",
            CODE,
            &OtpPolicy::default(),
            T0.plus_seconds(301),
        )
        .unwrap();
    assert_eq!(outcome, OtpVerification::Expired);
    let stored = store.pending_registration("late@petmart.test").unwrap().unwrap();
    assert_eq!(stored.failed_attempts, 0);
}

#[test]
fn last_allowed_wrong_code_discards_the_registration() {
    let store = SqliteMarketStore::in_memory().unwrap();
    store.save_pending_registration(&pending("guess@petmart.test")).unwrap();
    let policy = OtpPolicy {
        max_attempts: 3,
        ..OtpPolicy::default()
    };
    let outcomes: Vec<_> = (0 .. 3)
        .map(|_| {
            store.verify_pending_registration("guess@petmart.test", "999999", &policy, T0).unwrap()
        })
        .collect();
    assert_eq!(
        outcomes,
        [
            OtpVerification::Mismatch {
                attempts: 1
            },
            OtpVerification::Mismatch {
                attempts: 2
            },
            OtpVerification::Exhausted,
        ]
    );
    assert!(store.pending_registration("guess@petmart.test").unwrap().is_none());
    assert_eq!(
        store.verify_pending_registration("guess@petmart.test", CODE, &policy, T0).unwrap(),
        OtpVerification::NoPending
    );
}

#[test]
fn concurrent_wrong_codes_share_one_attempt_budget() {
    let store = Arc::new(SqliteMarketStore::in_memory().unwrap());
    store.save_pending_registration(&pending("race@petmart.test")).unwrap();
    let policy = OtpPolicy::default();
    let handles: Vec<_> = (0 .. 24)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.verify_pending_registration("race@petmart.test", "000000", &policy, T0)
            })
        })
        .collect();
    let outcomes: Vec<_> =
        handles.into_iter().map(|handle| handle.join().unwrap().unwrap()).collect();

    let mismatches = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, OtpVerification::Mismatch { .. }))
        .count();
    let exhausted =
        outcomes.iter().filter(|outcome| **outcome == OtpVerification::Exhausted).count();
    let missing = outcomes.iter().filter(|outcome| **outcome == OtpVerification::NoPending).count();
    assert_eq!(mismatches, 4);
    assert_eq!(exhausted, 1);
    assert_eq!(missing, 19);
    assert!(store.pending_registration("race@petmart.test").unwrap().is_none());
}

#[test]
fn revoked_tokens_expire() {
    let store = SqliteMarketStore::in_memory().unwrap();
    store.revoke_token("jti-1", T0.plus_seconds(100)).unwrap();
    assert!(store.is_token_revoked("jti-1", T0).unwrap());
    assert!(!store.is_token_revoked("jti-2", T0).unwrap());
    assert!(!store.is_token_revoked("jti-1", T0.plus_seconds(101)).unwrap());
}

#[test]
fn storefront_marks_owner_as_seller_and_is_unique() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let owner = store.user_by_id(shop.owner_id).unwrap().unwrap();
    assert!(owner.is_seller);

    let again = store.create_storefront(
        &NewStorefront {
            owner_id: shop.owner_id,
            name: "Second".to_string(),
            domain: "second-shop".to_string(),
            address: "Elsewhere".to_string(),
            description: None,
        },
        T0,
    );
    assert!(matches!(again, Err(StoreError::Conflict(_))));

    let taken_domain = store.create_storefront(
        &NewStorefront {
            owner_id: buyer.id,
            name: "Copycat".to_string(),
            domain: "kitty-corner".to_string(),
            address: "Elsewhere".to_string(),
            description: None,
        },
        T0,
    );
    assert!(matches!(taken_domain, Err(StoreError::Conflict(_))));
    assert!(!store.user_by_id(buyer.id).unwrap().unwrap().is_seller);
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

#[test]
fn search_filters_sorts_and_paginates() {
    let Fixture {
        store,
        shop,
        ..
    } = fixture();
    product(&store, shop.id, "Tuna Kibble", 2_500, 5);
    product(&store, shop.id, "Salmon Kibble", 4_000, 0);
    product(&store, shop.id, "Catnip Mouse", 1_000, 3);

    let page = store
        .search_products(&ProductQuery {
            text: Some("kibble".to_string()),
            sort: ProductSort::PriceDesc,
            ..ProductQuery::default()
        })
        .unwrap();
    assert_eq!(page.total, 2);
    let names: Vec<_> = page.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Salmon Kibble", "Tuna Kibble"]);

    let in_stock = store
        .search_products(&ProductQuery {
            in_stock: true,
            min_price: Some(Money::from_cents(1_500)),
            ..ProductQuery::default()
        })
        .unwrap();
    assert_eq!(in_stock.total, 1);
    assert_eq!(in_stock.items[0].name, "Tuna Kibble");

    let second_page = store
        .search_products(&ProductQuery {
            sort: ProductSort::Name,
            page: 2,
            per_page: 2,
            ..ProductQuery::default()
        })
        .unwrap();
    assert_eq!(second_page.total, 3);
    assert_eq!(second_page.items.len(), 1);
    assert_eq!(second_page.items[0].name, "Tuna Kibble");
    assert_eq!(second_page.items[0].images.len(), 1);
}

#[test]
fn image_limit_is_enforced() {
    let Fixture {
        store,
        shop,
        ..
    } = fixture();
    let item = product(&store, shop.id, "Scratch Post", 9_900, 1);
    for index in 1 .. 10 {
        store.add_product_image(item.id, &format!("https://img.example/{index}.png"), T0).unwrap();
    }
    let err = store.add_product_image(item.id, "https://img.example/11.png", T0).unwrap_err();
    assert!(matches!(err, StoreError::Rejected(DomainError::Validation(_))));
    let first = store.product_by_id(item.id).unwrap().unwrap().images[0].id;
    assert!(store.remove_product_image(item.id, first).unwrap());
    assert!(!store.remove_product_image(item.id, first).unwrap());
}

// ============================================================================
// SECTION: Checkout
// ============================================================================

#[test]
fn checkout_is_all_or_nothing() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let plenty = product(&store, shop.id, "Bird Seed", 1_500, 10);
    let scarce = product(&store, shop.id, "Rabbit Hutch", 50_000, 1);

    let err =
        store.place_order(&order_request(buyer.id, &[(plenty.clone(), 2), (scarce.clone(), 2)]));
    assert!(matches!(err, Err(StoreError::Rejected(DomainError::Validation(_)))));
    assert_eq!(store.product_by_id(plenty.id).unwrap().unwrap().stock, 10);
    assert!(store.orders_for_buyer(buyer.id).unwrap().is_empty());

    let order =
        store.place_order(&order_request(buyer.id, &[(plenty.clone(), 2), (scarce, 1)])).unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_price, Money::from_cents(53_000));
    assert_eq!(order.items.len(), 2);
    assert_eq!(store.product_by_id(plenty.id).unwrap().unwrap().stock, 8);
}

#[test]
fn checkout_rejects_missing_and_own_products() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let item = product(&store, shop.id, "Dog Bone", 700, 4);
    let missing = Product {
        id: petmart_core::ProductId::new(9_999),
        ..item.clone()
    };
    let err = store.place_order(&order_request(buyer.id, &[(missing, 1)])).unwrap_err();
    assert!(matches!(err, StoreError::Rejected(DomainError::NotFound(_))));

    let mut own = order_request(shop.owner_id, &[(item, 1)]);
    own.buyer_store = Some(shop.id);
    let err = store.place_order(&own).unwrap_err();
    assert_eq!(err.to_string(), "You cannot purchase your own product: Dog Bone");
}

#[test]
fn promotion_allowance_is_per_buyer_and_returned_on_cancel() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let item = product(&store, shop.id, "Hamster Wheel", 10_000, 10);
    let promotion = store
        .create_promotion(
            shop.id,
            &PromotionDraft {
                name: "Wheel week".to_string(),
                schedule: PromotionSchedule::new(T0, T0.plus_seconds(86_400)).unwrap(),
                max_quantity: 2,
                discount_percent: DiscountPercent::from_percent(25.0).unwrap(),
            },
            T0,
        )
        .unwrap();
    store.set_product_promotion(item.id, Some(promotion.id), T0).unwrap();

    let first = store.place_order(&order_request(buyer.id, &[(item.clone(), 3)])).unwrap();
    // Two units at 75.00 and one at 100.00.
    assert_eq!(first.total_price, Money::from_cents(25_000));
    assert_eq!(first.items[0].discounted_units, 2);

    let second = store.place_order(&order_request(buyer.id, &[(item.clone(), 1)])).unwrap();
    assert_eq!(second.total_price, Money::from_cents(10_000));
    assert_eq!(second.items[0].promotion_id, None);

    let cancelled = store
        .transition_order(first.id, OrderStatus::Cancelled, T0.plus_seconds(120))
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(store.product_by_id(item.id).unwrap().unwrap().stock, 9);

    // The cancelled order's allowance is available again.
    let third = store.place_order(&order_request(buyer.id, &[(item.clone(), 2)])).unwrap();
    assert_eq!(third.items[0].discounted_units, 2);
    assert_eq!(third.items[0].promotion_id, Some(promotion.id));
    assert_eq!(third.total_price, Money::from_cents(15_000));

    let again = store.transition_order(first.id, OrderStatus::Processing, T0.plus_seconds(130));
    assert!(matches!(again, Err(StoreError::Rejected(_))));
}

#[test]
fn from_cart_checkout_clears_purchased_lines() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let food = product(&store, shop.id, "Kitten Food", 3_000, 5);
    let toy = product(&store, shop.id, "Feather Toy", 800, 5);
    store.add_cart_quantity(buyer.id, food.id, 1, T0).unwrap();
    let merged = store.add_cart_quantity(buyer.id, food.id, 2, T0).unwrap();
    assert_eq!(merged.quantity, 3);
    store.add_cart_quantity(buyer.id, toy.id, 1, T0).unwrap();

    let mut request = order_request(buyer.id, &[(food, 3)]);
    request.clear_cart = true;
    store.place_order(&request).unwrap();
    let remaining = store.cart_lines(buyer.id).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].product.id, toy.id);
}

#[test]
fn cart_quantities_cannot_exceed_stock() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let bowl = product(&store, shop.id, "Steel Bowl", 2_500, 3);
    let line = store.add_cart_quantity(buyer.id, bowl.id, 2, T0).unwrap();
    let err = store.add_cart_quantity(buyer.id, bowl.id, 2, T0).unwrap_err();
    assert!(matches!(err, StoreError::Rejected(DomainError::Validation(_))));
    assert_eq!(err.to_string(), "Insufficient stock");
    assert_eq!(store.cart_lines(buyer.id).unwrap()[0].item.quantity, 2);

    let err = store.set_cart_quantity(line.id, 4, T0).unwrap_err();
    assert!(matches!(err, StoreError::Rejected(DomainError::Validation(_))));
    assert_eq!(store.set_cart_quantity(line.id, 3, T0).unwrap().quantity, 3);

    let missing = petmart_core::ProductId::new(9_999);
    assert!(matches!(
        store.add_cart_quantity(buyer.id, missing, 1, T0),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn seller_orders_show_only_their_items() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let other_owner = user(&store, "other@petmart.test");
    let other_shop = storefront(&store, other_owner.id, "dog-den");
    let mine = product(&store, shop.id, "Cat Tree", 20_000, 2);
    let theirs = product(&store, other_shop.id, "Dog Leash", 5_000, 2);
    let order = store.place_order(&order_request(buyer.id, &[(mine, 1), (theirs, 2)])).unwrap();

    let seller_orders = store.orders_for_store(shop.id).unwrap();
    assert_eq!(seller_orders.len(), 1);
    assert_eq!(seller_orders[0].order_id, order.id);
    assert_eq!(seller_orders[0].items.len(), 1);
    assert_eq!(seller_orders[0].seller_subtotal, Money::from_cents(20_000));
    assert_eq!(seller_orders[0].total_price, Money::from_cents(30_000));
}

#[test]
fn deleting_a_product_keeps_order_snapshot() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let item = product(&store, shop.id, "Parrot Perch", 4_200, 3);
    store.add_wishlist(buyer.id, item.id, T0).unwrap();
    let order = store.place_order(&order_request(buyer.id, &[(item.clone(), 1)])).unwrap();
    assert!(store.delete_product(item.id).unwrap());

    let kept = store.order_by_id(order.id).unwrap().unwrap();
    assert_eq!(kept.items[0].product_id, None);
    assert_eq!(kept.items[0].product_name, "Parrot Perch");
    assert!(store.wishlist(buyer.id).unwrap().is_empty());

    // Cancelling still works when the product is gone.
    let cancelled = store.transition_order(order.id, OrderStatus::Cancelled, T0).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

// ============================================================================
// SECTION: Engagement
// ============================================================================

#[test]
fn reviews_are_unique_and_summarized() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let item = product(&store, shop.id, "Dental Chews", 1_200, 5);
    let order = store.place_order(&order_request(buyer.id, &[(item.clone(), 1)])).unwrap();
    assert!(!store.has_completed_purchase(buyer.id, item.id).unwrap());
    store.transition_order(order.id, OrderStatus::Processing, T0).unwrap();
    store.transition_order(order.id, OrderStatus::Completed, T0).unwrap();
    assert!(store.has_completed_purchase(buyer.id, item.id).unwrap());

    let review = NewReview {
        user_id: buyer.id,
        product_id: item.id,
        rating: Rating::new(4).unwrap(),
        review: Some("Crunchy".to_string()),
    };
    let created = store.create_review(&review, T0).unwrap();
    assert_eq!(created.reviewer_name, buyer.name);
    assert!(matches!(store.create_review(&review, T0), Err(StoreError::Conflict(_))));

    let other = user(&store, "second@petmart.test");
    store
        .create_review(
            &NewReview {
                user_id: other.id,
                product_id: item.id,
                rating: Rating::new(5).unwrap(),
                review: None,
            },
            T0,
        )
        .unwrap();
    let summary = store.rating_summary(item.id).unwrap();
    assert_eq!(summary.count, 2);
    assert!((summary.average - 4.5).abs() < f64::EPSILON);
    assert_eq!(store.reviews_for_product(item.id).unwrap().len(), 2);
}

#[test]
fn wishlist_duplicates_conflict() {
    let Fixture {
        store,
        buyer,
        shop,
    } = fixture();
    let item = product(&store, shop.id, "Cozy Bed", 15_000, 1);
    store.add_wishlist(buyer.id, item.id, T0).unwrap();
    assert!(matches!(store.add_wishlist(buyer.id, item.id, T0), Err(StoreError::Conflict(_))));
    let lines = store.wishlist(buyer.id).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_images, ["https://img.example/one.png"]);
    assert!(store.remove_wishlist(buyer.id, item.id).unwrap());
    assert!(!store.remove_wishlist(buyer.id, item.id).unwrap());
}
