pub mod cost;
pub mod dispatcher;
pub mod error;
pub mod fuels;
pub mod merit_order;
pub mod plan;
pub mod unit;
