//! Use cases built on top of the engine

pub mod submit_order;

pub use submit_order::SubmitOrderUseCase;
