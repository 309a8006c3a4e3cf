// crates/petmart-core/src/core/promotion.rs
// ============================================================================
// Module: Petmart Promotions
// Description: Store promotions, schedules, and derived status.
// Purpose: Decide when a discount applies and how many units it covers.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A promotion belongs to a storefront, runs between two UTC instants, and
//! discounts up to `max_quantity` units per buyer. Status is never stored; it
//! is derived from the clock at read time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;
use time::PrimitiveDateTime;
use time::Time;
use time::macros::format_description;

use crate::core::clock::Timestamp;
use crate::core::error::DomainError;
use crate::core::identifiers::PromotionId;
use crate::core::identifiers::StoreId;
use crate::core::money::DiscountPercent;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum promotion name length.
pub const MAX_PROMOTION_NAME_LENGTH: usize = 100;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Promotion status relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    /// Not started yet.
    Upcoming,
    /// Currently running.
    Active,
    /// Already ended.
    Expired,
}

// ============================================================================
// SECTION: Schedule
// ============================================================================

/// Inclusive time window during which a promotion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionSchedule {
    /// Start instant.
    pub starts_at: Timestamp,
    /// End instant.
    pub ends_at: Timestamp,
}

impl PromotionSchedule {
    /// Builds a schedule, requiring `starts_at < ends_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when the window is empty or inverted.
    pub fn new(starts_at: Timestamp, ends_at: Timestamp) -> Result<Self, DomainError> {
        if starts_at >= ends_at {
            return Err(DomainError::validation("Start date must be before end date"));
        }
        Ok(Self {
            starts_at,
            ends_at,
        })
    }

    /// Parses `YYYY-MM-DD` dates and `HH:MM` times as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for malformed values or an inverted window.
    pub fn parse(
        start_date: &str,
        start_time: &str,
        end_date: &str,
        end_time: &str,
    ) -> Result<Self, DomainError> {
        let starts_at = parse_instant(start_date, start_time)?;
        let ends_at = parse_instant(end_date, end_time)?;
        Self::new(starts_at, ends_at)
    }

    /// Returns the status at `now`.
    #[must_use]
    pub fn status_at(&self, now: Timestamp) -> PromotionStatus {
        if now < self.starts_at {
            PromotionStatus::Upcoming
        } else if now > self.ends_at {
            PromotionStatus::Expired
        } else {
            PromotionStatus::Active
        }
    }
}

/// Parses a UTC date and time pair into a timestamp.
fn parse_instant(date: &str, time_of_day: &str) -> Result<Timestamp, DomainError> {
    let date = Date::parse(date.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| DomainError::validation("Dates must use the YYYY-MM-DD format"))?;
    let time_of_day = Time::parse(time_of_day.trim(), format_description!("[hour]:[minute]"))
        .map_err(|_| DomainError::validation("Times must use the HH:MM format"))?;
    let instant = PrimitiveDateTime::new(date, time_of_day).assume_utc();
    Ok(Timestamp::from_unix_seconds(instant.unix_timestamp()))
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Store promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Promotion identifier.
    pub id: PromotionId,
    /// Owning storefront.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Start instant.
    pub starts_at: Timestamp,
    /// End instant.
    pub ends_at: Timestamp,
    /// Discounted units each buyer may purchase.
    pub max_quantity: u32,
    /// Discount percentage.
    pub discount_percent: DiscountPercent,
    /// Creation time.
    pub created_at: Timestamp,
}

impl Promotion {
    /// Returns the promotion window.
    #[must_use]
    pub const fn schedule(&self) -> PromotionSchedule {
        PromotionSchedule {
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }

    /// Returns the status at `now`.
    #[must_use]
    pub fn status_at(&self, now: Timestamp) -> PromotionStatus {
        self.schedule().status_at(now)
    }

    /// Returns true when the promotion applies at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.status_at(now) == PromotionStatus::Active
    }

    /// Returns how many discounted units remain for a buyer who used `used`.
    #[must_use]
    pub const fn remaining_for(&self, used: u32) -> u32 {
        self.max_quantity.saturating_sub(used)
    }
}

/// Validated promotion input used for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionDraft {
    /// Display name.
    pub name: String,
    /// Promotion window.
    pub schedule: PromotionSchedule,
    /// Discounted units per buyer.
    pub max_quantity: u32,
    /// Discount percentage.
    pub discount_percent: DiscountPercent,
}

impl PromotionDraft {
    /// Validates name and quantity bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when a field is out of bounds.
    pub fn validate(&self) -> Result<(), DomainError> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > MAX_PROMOTION_NAME_LENGTH {
            return Err(DomainError::Validation(format!(
                "Promotion name must be 1-{MAX_PROMOTION_NAME_LENGTH} characters"
            )));
        }
        if self.max_quantity == 0 {
            return Err(DomainError::validation("Max quantity must be at least 1"));
        }
        Ok(())
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
    fn parses_utc_window() {
        let schedule =
            PromotionSchedule::parse("2024-01-01", "00:00", "2024-01-02", "12:30").unwrap();
        assert_eq!(schedule.starts_at.as_unix_seconds(), 1_704_067_200);
        assert_eq!(schedule.ends_at.as_unix_seconds(), 1_704_067_200 + 86_400 + 45_000);
    }

    #[test]
    fn rejects_inverted_or_malformed_windows() {
        let err = PromotionSchedule::parse("2024-01-02", "00:00", "2024-01-01", "00:00")
            .unwrap_err();
        assert_eq!(err.to_string(), "Start date must be before end date");
        assert!(PromotionSchedule::parse("01/01/2024", "00:00", "2024-01-02", "00:00").is_err());
        assert!(PromotionSchedule::parse("2024-01-01", "25:00", "2024-01-02", "00:00").is_err());
    }

    #[test]
    fn status_follows_clock() {
        let start = Timestamp::from_unix_seconds(1_000);
        let schedule = PromotionSchedule::new(start, start.plus_seconds(100)).unwrap();
        assert_eq!(schedule.status_at(start.plus_seconds(-1)), PromotionStatus::Upcoming);
        assert_eq!(schedule.status_at(start), PromotionStatus::Active);
        assert_eq!(schedule.status_at(start.plus_seconds(100)), PromotionStatus::Active);
        assert_eq!(schedule.status_at(start.plus_seconds(101)), PromotionStatus::Expired);
    }
}
