// crates/petmart-server/src/service/catalog.rs
// ============================================================================
// Module: Catalog Services
// Description: Seller product management and public catalog browsing.
// Purpose: Create, edit, and search products with promotion-aware pricing.
// Dependencies: petmart-core, serde
// ============================================================================

//! ## Overview
//! Sellers manage products in their own storefront only. Anything that
//! targets another store's product, or a product that does not exist, is
//! answered with the same 403 so product ids of other stores are not
//! enumerated. Public views attach the effective price and the currently
//! active promotion, both evaluated against the service clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::AnimalType;
use petmart_core::Category;
use petmart_core::ImageId;
use petmart_core::Money;
use petmart_core::NewProduct;
use petmart_core::Product;
use petmart_core::ProductId;
use petmart_core::ProductImage;
use petmart_core::ProductPatch;
use petmart_core::ProductQuery;
use petmart_core::ProductSort;
use petmart_core::Promotion;
use petmart_core::RatingSummary;
use petmart_core::StoreId;
use petmart_core::Storefront;
use petmart_core::Timestamp;
use petmart_core::UserId;
use petmart_core::account::validate_http_url;
use petmart_core::catalog::stock_from_request;
use petmart_core::effective_price;
use petmart_core::error::require_fields;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::service::MarketService;
use crate::service::NO_INPUT_MESSAGE;
use crate::service::present;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Product creation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductRequest {
    /// Product name.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Listed price.
    pub price: Option<f64>,
    /// Units in stock.
    pub stock: Option<i64>,
    /// Category label.
    pub category: Option<String>,
    /// Animal label.
    pub animal_type: Option<String>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial product update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub price: Option<f64>,
    /// New stock level.
    pub stock: Option<i64>,
    /// New category label.
    pub category: Option<String>,
    /// New animal label.
    pub animal_type: Option<String>,
}

/// Image attachment request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddImageRequest {
    /// Image URL.
    pub image_url: Option<String>,
}

/// Raw catalog query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
    /// Search text.
    pub q: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Animal label.
    pub animal_type: Option<String>,
    /// Lower price bound.
    pub min_price: Option<String>,
    /// Upper price bound.
    pub max_price: Option<String>,
    /// Storefront id.
    pub store_id: Option<String>,
    /// Only in-stock products when true.
    pub in_stock: Option<String>,
    /// Sort label.
    pub sort: Option<String>,
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub per_page: Option<String>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Product with pricing evaluated at request time.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    /// Stored product.
    #[serde(flatten)]
    pub product: Product,
    /// Price after the active promotion, if any.
    pub effective_price: Money,
    /// Promotion currently in its window.
    pub active_promotion: Option<Promotion>,
}

impl ProductView {
    /// Evaluates a product at `now`.
    #[must_use]
    pub fn at(product: Product, now: Timestamp) -> Self {
        let effective_price = effective_price(&product, now);
        let active_promotion =
            product.promotion.clone().filter(|promotion| promotion.is_active_at(now));
        Self {
            product,
            effective_price,
            active_promotion,
        }
    }
}

/// Storefront summary embedded in product details.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    /// Storefront id.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Store domain.
    pub domain: String,
}

impl From<&Storefront> for StoreSummary {
    fn from(storefront: &Storefront) -> Self {
        Self {
            id: storefront.id,
            name: storefront.name.clone(),
            domain: storefront.domain.clone(),
        }
    }
}

/// Public product detail.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    /// Product with pricing.
    #[serde(flatten)]
    pub view: ProductView,
    /// Owning storefront.
    pub store: Option<StoreSummary>,
    /// Review aggregate.
    pub rating: RatingSummary,
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListView {
    /// Products on this page.
    pub items: Vec<ProductView>,
    /// Page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total matches across pages.
    pub total: u64,
}

// ============================================================================
// SECTION: Seller Operations
// ============================================================================

impl MarketService {
    /// Creates a product in the caller's storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the caller is not a seller or input is
    /// invalid.
    pub fn create_product(
        &self,
        caller: UserId,
        request: &CreateProductRequest,
    ) -> Result<ProductView, ApiError> {
        let storefront = self.seller_store(caller)?;
        let name = present(request.name.as_deref());
        let category = present(request.category.as_deref());
        let animal_type = present(request.animal_type.as_deref());
        require_fields(&[
            ("name", name.is_some()),
            ("price", request.price.is_some()),
            ("stock", request.stock.is_some()),
            ("category", category.is_some()),
            ("animal_type", animal_type.is_some()),
        ])?;
        let (Some(name), Some(price), Some(stock), Some(category), Some(animal_type)) =
            (name, request.price, request.stock, category, animal_type)
        else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let product = NewProduct {
            name: name.to_string(),
            description: present(request.description.as_deref()).map(str::to_string),
            price: parse_price(price)?,
            stock: stock_from_request(stock)?,
            category: Category::parse_or_reject(category)?,
            animal_type: AnimalType::parse_or_reject(animal_type)?,
            image_urls: request
                .images
                .iter()
                .map(|url| validate_http_url("image_url", url))
                .collect::<Result<_, _>>()?,
        };
        product.validate()?;
        let created = self.store.create_product(storefront.id, &product, self.now())?;
        Ok(ProductView::at(created, self.now()))
    }

    /// Lists the caller's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the caller is not a seller.
    pub fn my_products(&self, caller: UserId) -> Result<Vec<ProductView>, ApiError> {
        let storefront = self.seller_store(caller)?;
        let now = self.now();
        Ok(self
            .store
            .products_by_store(storefront.id)?
            .into_iter()
            .map(|product| ProductView::at(product, now))
            .collect())
    }

    /// Applies a partial product update.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for foreign or missing products and invalid or
    /// empty updates.
    pub fn update_product(
        &self,
        caller: UserId,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<ProductView, ApiError> {
        let product = self.owned_product(caller, id, "update")?;
        let patch = ProductPatch {
            name: request.name.as_deref().map(|name| name.trim().to_string()),
            description: request.description.clone(),
            price: request.price.map(parse_price).transpose()?,
            stock: request.stock.map(stock_from_request).transpose()?,
            category: request.category.as_deref().map(Category::parse_or_reject).transpose()?,
            animal_type: request
                .animal_type
                .as_deref()
                .map(AnimalType::parse_or_reject)
                .transpose()?,
        };
        if patch.is_empty() {
            return Err(ApiError::validation(NO_INPUT_MESSAGE));
        }
        patch.validate()?;
        let updated = self.store.update_product(product.id, &patch, self.now())?;
        Ok(ProductView::at(updated, self.now()))
    }

    /// Deletes one of the caller's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for foreign or missing products.
    pub fn delete_product(&self, caller: UserId, id: ProductId) -> Result<(), ApiError> {
        let product = self.owned_product(caller, id, "delete")?;
        if self.store.delete_product(product.id)? {
            Ok(())
        } else {
            Err(ApiError::not_found("Product not found"))
        }
    }

    /// Attaches an image URL to one of the caller's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for foreign products, invalid URLs, or when the
    /// product already has the maximum number of images.
    pub fn add_product_image(
        &self,
        caller: UserId,
        id: ProductId,
        request: &AddImageRequest,
    ) -> Result<ProductImage, ApiError> {
        let product = self.owned_product(caller, id, "update")?;
        let url = present(request.image_url.as_deref());
        require_fields(&[("image_url", url.is_some())])?;
        let Some(url) = url else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let url = validate_http_url("image_url", url)?;
        Ok(self.store.add_product_image(product.id, &url, self.now())?)
    }

    /// Removes an image from one of the caller's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for foreign products or images not on the product.
    pub fn remove_product_image(
        &self,
        caller: UserId,
        id: ProductId,
        image: ImageId,
    ) -> Result<(), ApiError> {
        let product = self.owned_product(caller, id, "update")?;
        if self.store.remove_product_image(product.id, image)? {
            Ok(())
        } else {
            Err(ApiError::not_found("Image not found"))
        }
    }

    /// Loads a product owned by the caller's storefront.
    fn owned_product(
        &self,
        caller: UserId,
        id: ProductId,
        action: &str,
    ) -> Result<Product, ApiError> {
        let storefront = self.seller_store(caller)?;
        self.store
            .product_by_id(id)?
            .filter(|product| product.store_id == storefront.id)
            .ok_or_else(|| ApiError::forbidden(format!("Unauthorized to {action} this product")))
    }
}

// ============================================================================
// SECTION: Public Operations
// ============================================================================

impl MarketService {
    /// Searches the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for invalid filter values.
    pub fn list_products(&self, params: &ProductListParams) -> Result<ProductListView, ApiError> {
        let query = parse_query(params)?;
        self.search(&query)
    }

    /// Lists products in one category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for unknown categories or invalid paging.
    pub fn products_by_category(
        &self,
        category: &str,
        params: &ProductListParams,
    ) -> Result<ProductListView, ApiError> {
        let query = ProductQuery {
            category: Some(Category::parse_or_reject(category)?),
            ..page_only(params)?
        };
        self.search(&query)
    }

    /// Lists products for one animal.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for unknown animals or invalid paging.
    pub fn products_by_animal(
        &self,
        animal: &str,
        params: &ProductListParams,
    ) -> Result<ProductListView, ApiError> {
        let query = ProductQuery {
            animal_type: Some(AnimalType::parse_or_reject(animal)?),
            ..page_only(params)?
        };
        self.search(&query)
    }

    /// Returns a product with its store and rating summary.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 when the product does not exist.
    pub fn get_product(&self, id: ProductId) -> Result<ProductDetail, ApiError> {
        let product = self.product_or_404(id)?;
        let store = self.store.storefront_by_id(product.store_id)?;
        let rating = self.store.rating_summary(product.id)?;
        Ok(ProductDetail {
            view: ProductView::at(product, self.now()),
            store: store.as_ref().map(StoreSummary::from),
            rating,
        })
    }

    /// Loads a product or fails with 404.
    pub(crate) fn product_or_404(&self, id: ProductId) -> Result<Product, ApiError> {
        self.store.product_by_id(id)?.ok_or_else(|| ApiError::not_found("Product not found"))
    }

    /// Runs a validated search.
    fn search(&self, query: &ProductQuery) -> Result<ProductListView, ApiError> {
        query.validate()?;
        let page = self.store.search_products(query)?;
        let now = self.now();
        Ok(ProductListView {
            items: page.items.into_iter().map(|product| ProductView::at(product, now)).collect(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a request price, requiring it to be positive.
fn parse_price(value: f64) -> Result<Money, ApiError> {
    if value <= 0.0 {
        return Err(ApiError::validation("Price must be greater than 0"));
    }
    Ok(Money::from_decimal(value)?)
}

/// Builds a full catalog query from raw parameters.
fn parse_query(params: &ProductListParams) -> Result<ProductQuery, ApiError> {
    Ok(ProductQuery {
        text: present(params.q.as_deref()).map(str::to_string),
        category: present(params.category.as_deref())
            .map(Category::parse_or_reject)
            .transpose()?,
        animal_type: present(params.animal_type.as_deref())
            .map(AnimalType::parse_or_reject)
            .transpose()?,
        min_price: parse_money_param("min_price", params.min_price.as_deref())?,
        max_price: parse_money_param("max_price", params.max_price.as_deref())?,
        store_id: present(params.store_id.as_deref())
            .map(|raw| {
                raw.parse::<i64>()
                    .map(StoreId::new)
                    .map_err(|_| ApiError::validation("store_id must be an integer"))
            })
            .transpose()?,
        in_stock: parse_bool_param("in_stock", params.in_stock.as_deref())?,
        sort: present(params.sort.as_deref()).map(ProductSort::parse).transpose()?.unwrap_or_default(),
        ..page_only(params)?
    })
}

/// Builds a query carrying only pagination.
fn page_only(params: &ProductListParams) -> Result<ProductQuery, ApiError> {
    let defaults = ProductQuery::default();
    Ok(ProductQuery {
        page: parse_u32_param("page", params.page.as_deref())?.unwrap_or(defaults.page),
        per_page: parse_u32_param("per_page", params.per_page.as_deref())?
            .unwrap_or(defaults.per_page),
        ..defaults
    })
}

/// Parses an optional non-negative integer parameter.
fn parse_u32_param(field: &str, raw: Option<&str>) -> Result<Option<u32>, ApiError> {
    present(raw)
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| ApiError::validation(format!("{field} must be a positive integer")))
        })
        .transpose()
}

/// Parses an optional price bound.
fn parse_money_param(field: &str, raw: Option<&str>) -> Result<Option<Money>, ApiError> {
    present(raw)
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .and_then(|value| Money::from_decimal(value).ok())
                .ok_or_else(|| ApiError::validation(format!("{field} must be a valid amount")))
        })
        .transpose()
}

/// Parses an optional boolean flag.
fn parse_bool_param(field: &str, raw: Option<&str>) -> Result<bool, ApiError> {
    match present(raw).map(str::to_ascii_lowercase).as_deref() {
        None | Some("false" | "0") => Ok(false),
        Some("true" | "1") => Ok(true),
        Some(_) => Err(ApiError::validation(format!("{field} must be true or false"))),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use explicit unwraps for clarity.")]

    use super::*;

    #[test]
    fn query_defaults_apply_when_params_are_blank() {
        let query = parse_query(&ProductListParams {
            q: Some("  ".to_string()),
            ..ProductListParams::default()
        })
        .unwrap();
        assert_eq!(query, ProductQuery::default());
    }

    #[test]
    fn query_parses_every_filter() {
        let query = parse_query(&ProductListParams {
            q: Some("kibble".to_string()),
            category: Some("makanan".to_string()),
            animal_type: Some("dog".to_string()),
            min_price: Some("1.5".to_string()),
            max_price: Some("20".to_string()),
            store_id: Some("7".to_string()),
            in_stock: Some("TRUE".to_string()),
            sort: Some("price_desc".to_string()),
            page: Some("2".to_string()),
            per_page: Some("5".to_string()),
        })
        .unwrap();
        assert_eq!(query.text.as_deref(), Some("kibble"));
        assert_eq!(query.category, Some(Category::Food));
        assert_eq!(query.animal_type, Some(AnimalType::Dog));
        assert_eq!(query.min_price, Some(Money::from_cents(150)));
        assert_eq!(query.max_price, Some(Money::from_cents(2_000)));
        assert_eq!(query.store_id, Some(StoreId::new(7)));
        assert!(query.in_stock);
        assert_eq!(query.sort, ProductSort::PriceDesc);
        assert_eq!((query.page, query.per_page), (2, 5));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let bad_price = ProductListParams {
            min_price: Some("cheap".to_string()),
            ..ProductListParams::default()
        };
        assert_eq!(parse_query(&bad_price).unwrap_err().message, "min_price must be a valid amount");
        let bad_flag = ProductListParams {
            in_stock: Some("maybe".to_string()),
            ..ProductListParams::default()
        };
        assert!(parse_query(&bad_flag).is_err());
        let bad_page = ProductListParams {
            page: Some("-1".to_string()),
            ..ProductListParams::default()
        };
        assert!(parse_query(&bad_page).is_err());
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        assert_eq!(parse_price(0.0).unwrap_err().message, "Price must be greater than 0");
        assert_eq!(parse_price(12.5).unwrap(), Money::from_cents(1_250));
    }
}
