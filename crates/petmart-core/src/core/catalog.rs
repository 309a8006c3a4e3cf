// crates/petmart-core/src/core/catalog.rs
// ============================================================================
// Module: Petmart Catalog
// Description: Products, images, pet categories, and catalog queries.
// Purpose: Validate seller listings and describe public catalog searches.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Products belong to a storefront and are classified by [`Category`] and
//! [`AnimalType`]. Category and animal labels are English, with the legacy
//! Indonesian labels accepted as aliases on input. [`ProductQuery`] describes
//! a filtered, sorted, paginated catalog search.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::account::validate_http_url;
use crate::core::clock::Timestamp;
use crate::core::error::DomainError;
use crate::core::identifiers::ImageId;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::StoreId;
use crate::core::money::Money;
use crate::core::promotion::Promotion;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LENGTH: usize = 255;
/// Maximum product description length.
pub const MAX_PRODUCT_DESCRIPTION_LENGTH: usize = 5_000;
/// Maximum images attached to one product.
pub const MAX_PRODUCT_IMAGES: usize = 10;
/// Default catalog page size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Maximum catalog page size.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Maximum search text length.
const MAX_SEARCH_TEXT_LENGTH: usize = 100;

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pet food.
    #[serde(alias = "makanan")]
    Food,
    /// Health and care products.
    #[serde(alias = "kesehatan")]
    Health,
    /// Toys.
    #[serde(alias = "mainan")]
    Toys,
    /// Cages, leashes, and other equipment.
    #[serde(alias = "peralatan")]
    Equipment,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Food, Self::Health, Self::Toys, Self::Equipment];

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Health => "health",
            Self::Toys => "toys",
            Self::Equipment => "equipment",
        }
    }

    /// Parses a canonical or legacy label, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "food" | "makanan" => Some(Self::Food),
            "health" | "kesehatan" => Some(Self::Health),
            "toys" | "mainan" => Some(Self::Toys),
            "equipment" | "peralatan" => Some(Self::Equipment),
            _ => None,
        }
    }

    /// Parses a label or returns a validation error listing valid options.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for unknown labels.
    pub fn parse_or_reject(value: &str) -> Result<Self, DomainError> {
        Self::parse(value).ok_or_else(|| {
            DomainError::Validation(format!(
                "Invalid category. Must be one of: {}",
                Self::ALL.map(Self::as_str).join(", ")
            ))
        })
    }
}

/// Animal a product is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalType {
    /// Dogs.
    #[serde(alias = "anjing")]
    Dog,
    /// Cats.
    #[serde(alias = "kucing")]
    Cat,
    /// Hamsters.
    Hamster,
    /// Birds.
    #[serde(alias = "burung")]
    Bird,
    /// Rabbits.
    #[serde(alias = "kelinci")]
    Rabbit,
}

impl AnimalType {
    /// All animal types in display order.
    pub const ALL: [Self; 5] = [Self::Dog, Self::Cat, Self::Hamster, Self::Bird, Self::Rabbit];

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Hamster => "hamster",
            Self::Bird => "bird",
            Self::Rabbit => "rabbit",
        }
    }

    /// Parses a canonical or legacy label, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dog" | "anjing" => Some(Self::Dog),
            "cat" | "kucing" => Some(Self::Cat),
            "hamster" => Some(Self::Hamster),
            "bird" | "burung" => Some(Self::Bird),
            "rabbit" | "kelinci" => Some(Self::Rabbit),
            _ => None,
        }
    }

    /// Parses a label or returns a validation error listing valid options.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for unknown labels.
    pub fn parse_or_reject(value: &str) -> Result<Self, DomainError> {
        Self::parse(value).ok_or_else(|| {
            DomainError::Validation(format!(
                "Invalid animal type. Must be one of: {}",
                Self::ALL.map(Self::as_str).join(", ")
            ))
        })
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image identifier.
    pub id: ImageId,
    /// Owning product.
    pub product_id: ProductId,
    /// Image URL.
    pub image_url: String,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Owning storefront.
    pub store_id: StoreId,
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Money,
    /// Units in stock.
    pub stock: u32,
    /// Product category.
    pub category: Category,
    /// Target animal.
    pub animal_type: AnimalType,
    /// Assigned promotion, whatever its current status.
    pub promotion: Option<Promotion>,
    /// Images in insertion order.
    pub images: Vec<ProductImage>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

impl Product {
    /// Returns the first image URL when any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|image| image.image_url.as_str())
    }
}

/// Validated input for a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price (strictly positive).
    pub price: Money,
    /// Initial stock.
    pub stock: u32,
    /// Category.
    pub category: Category,
    /// Target animal.
    pub animal_type: AnimalType,
    /// Initial image URLs.
    pub image_urls: Vec<String>,
}

impl NewProduct {
    /// Validates the listing.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when any field is out of bounds.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_product_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_product_description(description)?;
        }
        validate_price(self.price)?;
        if self.image_urls.len() > MAX_PRODUCT_IMAGES {
            return Err(DomainError::Validation(format!(
                "A product may have at most {MAX_PRODUCT_IMAGES} images"
            )));
        }
        for url in &self.image_urls {
            validate_http_url("image_url", url)?;
        }
        Ok(())
    }
}

/// Partial product update.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub price: Option<Money>,
    /// New stock level.
    pub stock: Option<u32>,
    /// New category.
    pub category: Option<Category>,
    /// New animal type.
    pub animal_type: Option<AnimalType>,
}

impl ProductPatch {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
            && self.animal_type.is_none()
    }

    /// Validates the provided fields.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when a provided field is invalid.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_product_description(description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Catalog sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Alphabetical by name.
    Name,
}

impl ProductSort {
    /// Parses a sort label.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for unknown labels.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim() {
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            _ => Err(DomainError::validation(
                "Invalid sort. Must be one of: newest, price_asc, price_desc, name",
            )),
        }
    }
}

/// Filtered, paginated catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring of name or description.
    pub text: Option<String>,
    /// Category filter.
    pub category: Option<Category>,
    /// Animal filter.
    pub animal_type: Option<AnimalType>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
    /// Storefront filter.
    pub store_id: Option<StoreId>,
    /// Only products with stock.
    pub in_stock: bool,
    /// Sort order.
    pub sort: ProductSort,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            animal_type: None,
            min_price: None,
            max_price: None,
            store_id: None,
            in_stock: false,
            sort: ProductSort::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Validates pagination and price bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for inconsistent parameters.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page == 0 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if self.per_page == 0 || self.per_page > MAX_PAGE_SIZE {
            return Err(DomainError::Validation(format!(
                "per_page must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(DomainError::validation("min_price must not exceed max_price"));
        }
        if let Some(text) = &self.text
            && text.chars().count() > MAX_SEARCH_TEXT_LENGTH
        {
            return Err(DomainError::Validation(format!(
                "q must be at most {MAX_SEARCH_TEXT_LENGTH} characters"
            )));
        }
        Ok(())
    }

    /// Returns the row offset for the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    /// Products on this page.
    pub items: Vec<Product>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total matching products across all pages.
    pub total: u64,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a product name.
fn validate_product_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Product name must not be empty"));
    }
    if name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "Product name must be at most {MAX_PRODUCT_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a product description.
fn validate_product_description(description: &str) -> Result<(), DomainError> {
    if description.chars().count() > MAX_PRODUCT_DESCRIPTION_LENGTH {
        return Err(DomainError::Validation(format!(
            "Description must be at most {MAX_PRODUCT_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Requires a strictly positive price.
fn validate_price(price: Money) -> Result<(), DomainError> {
    if price.cents() <= 0 {
        return Err(DomainError::validation("Price must be greater than 0"));
    }
    Ok(())
}

/// Converts a requested stock count into a stored stock level.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for negative or oversized values.
pub fn stock_from_request(stock: i64) -> Result<u32, DomainError> {
    if stock < 0 {
        return Err(DomainError::validation("Stock must be a non-negative integer"));
    }
    u32::try_from(stock).map_err(|_| DomainError::validation("Stock exceeds the supported range"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
