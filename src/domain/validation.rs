//! Order Validator - Business Rule Validation
//!
//! Requests are checked here before an `Order` is built; the order book
//! itself assumes well-formed input.
//!
//! ## Validation Rules
//! - Asset id must not be empty (and must be allowed, when a list is configured)
//! - Price must be positive and within `[min_price, max_price]`
//! - Shares must be positive and within `[min_shares, max_shares]`
//!
//! Unknown order types never reach this point: they fail deserialization.
//! ```rust,ignore
//! let validator = OrderValidator::new();
//! validator.validate(&request)?;
//! let order = request.into_order(&pool);
//! ```

use crate::domain::entities::Price;
use crate::shared::protocol::NewOrderRequest;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid shares: {0}")]
    InvalidShares(String),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    #[error("Price out of range: {0}")]
    PriceOutOfRange(String),

    #[error("Shares out of range: {0}")]
    SharesOutOfRange(String),
}

impl ValidationError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidPrice(_) => "invalid_price",
            ValidationError::InvalidShares(_) => "invalid_shares",
            ValidationError::InvalidAsset(_) => "invalid_asset",
            ValidationError::PriceOutOfRange(_) => "price_out_of_range",
            ValidationError::SharesOutOfRange(_) => "shares_out_of_range",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Minimum price (inclusive)
    pub min_price: Price,

    /// Maximum price (inclusive)
    pub max_price: Price,

    /// Minimum shares (inclusive)
    pub min_shares: u64,

    /// Maximum shares (inclusive)
    pub max_shares: u64,

    /// Allowed asset ids (empty means all assets allowed)
    pub allowed_assets: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_price: Price::new(1),
            max_price: Price::new(u64::MAX),
            min_shares: 1,
            max_shares: 1_000_000_000,
            allowed_assets: Vec::new(),
        }
    }
}

pub struct OrderValidator {
    config: ValidationConfig,
}

impl OrderValidator {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, request: &NewOrderRequest) -> Result<(), ValidationError> {
        self.validate_asset(&request.asset_id)?;
        self.validate_price(request.price)?;
        self.validate_shares(request.shares)?;
        Ok(())
    }

    fn validate_price(&self, price: Price) -> Result<(), ValidationError> {
        if price.ticks() == 0 {
            return Err(ValidationError::InvalidPrice(
                "Price must be greater than zero".to_string(),
            ));
        }

        if price < self.config.min_price {
            return Err(ValidationError::PriceOutOfRange(format!(
                "Price {} is below minimum {}",
                price, self.config.min_price
            )));
        }

        if price > self.config.max_price {
            return Err(ValidationError::PriceOutOfRange(format!(
                "Price {} exceeds maximum {}",
                price, self.config.max_price
            )));
        }

        Ok(())
    }

    fn validate_shares(&self, shares: u64) -> Result<(), ValidationError> {
        if shares == 0 {
            return Err(ValidationError::InvalidShares(
                "Shares must be greater than zero".to_string(),
            ));
        }

        if shares < self.config.min_shares {
            return Err(ValidationError::SharesOutOfRange(format!(
                "Shares {} is below minimum {}",
                shares, self.config.min_shares
            )));
        }

        if shares > self.config.max_shares {
            return Err(ValidationError::SharesOutOfRange(format!(
                "Shares {} exceeds maximum {}",
                shares, self.config.max_shares
            )));
        }

        Ok(())
    }

    fn validate_asset(&self, asset_id: &str) -> Result<(), ValidationError> {
        // 与 into_order 一致：按去除首尾空白后的 id 校验
        let asset_id = asset_id.trim();
        if asset_id.is_empty() {
            return Err(ValidationError::InvalidAsset(
                "Asset id cannot be empty".to_string(),
            ));
        }

        if !self.config.allowed_assets.is_empty()
            && !self.config.allowed_assets.iter().any(|a| a == asset_id)
        {
            return Err(ValidationError::InvalidAsset(format!(
                "Asset '{}' is not in allowed list",
                asset_id
            )));
        }

        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new()
    }
}
