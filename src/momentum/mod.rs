//! Momentum price module
//!
//! Estimates the price level implied purely by cumulative volume-weighted
//! trading flow, as opposed to the quoted market price.

mod engine;
pub mod flow;
mod quote;
mod types;

pub use engine::{
    compute_momentum_price, daily_return, net_volume_flows, FlowDay, MomentumEngine,
    MIN_USABLE_DAYS,
};
pub use quote::momentum_for_symbol;
pub use types::{MomentumError, MomentumQuote, MomentumRun, MomentumState};
