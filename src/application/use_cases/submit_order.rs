//! Submit Order Use Case
//!
//! Validates a raw request, builds the order with an interned asset id and
//! hands it to the engine's inbound stream.
//!
//! ## Workflow
//! 1. Validate the request (asset, price, shares)
//! 2. Convert it into an [`Order`] through the shared [`AssetPool`]
//! 3. Send it to the matching worker
//!
//! ```rust,ignore
//! let use_case = SubmitOrderUseCase::new(OrderValidator::new(), pool);
//! let order_id = use_case.execute(request, &engine.sender())?;
//! ```

use crate::domain::entities::{Order, OrderId};
use crate::domain::validation::OrderValidator;
use crate::shared::asset_pool::AssetPool;
use crate::shared::error::EngineError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::NewOrderRequest;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct SubmitOrderUseCase {
    validator: OrderValidator,
    assets: Arc<AssetPool>,
}

impl SubmitOrderUseCase {
    pub fn new(validator: OrderValidator, assets: Arc<AssetPool>) -> Self {
        Self { validator, assets }
    }

    /// Validates and converts without submitting.
    pub fn prepare(&self, request: NewOrderRequest) -> Result<Order, EngineError> {
        if let Err(e) = self.validator.validate(&request) {
            METRICS
                .rejected_orders_total
                .with_label_values(&[e.reason()])
                .inc();
            return Err(e.into());
        }
        Ok(request.into_order(&self.assets))
    }

    pub fn execute(
        &self,
        request: NewOrderRequest,
        inbound: &UnboundedSender<Order>,
    ) -> Result<OrderId, EngineError> {
        let order = self.prepare(request)?;
        let order_id = order.id();
        inbound.send(order).map_err(|_| EngineError::InputClosed)?;
        Ok(order_id)
    }
}
