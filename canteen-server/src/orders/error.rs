use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

use crate::slots::SlotError;
use crate::storage::StorageError;

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Cart is empty")]
    CartEmpty,

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error("Order already served: {0}")]
    OrderAlreadyServed(String),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Storage(e) => e.into(),
            OrderError::Slot(e) => e.into(),
            OrderError::OrderNotFound(id) => AppError::order_not_found(&id),
            OrderError::CartEmpty => AppError::new(ErrorCode::CartEmpty),
            OrderError::OrderAlreadyServed(id) => {
                AppError::new(ErrorCode::OrderAlreadyServed).with_detail("order_id", id)
            }
            OrderError::OrderAlreadyCancelled(id) => {
                AppError::new(ErrorCode::OrderAlreadyCancelled).with_detail("order_id", id)
            }
            OrderError::InvalidTransition { from, to } => AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot move order from {from} to {to}"),
            )
            .with_detail("from", from.as_str())
            .with_detail("to", to.as_str()),
        }
    }
}
