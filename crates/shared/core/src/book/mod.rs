mod order_depth;
mod state;

pub use order_depth::{OrderDepth, midpoint};
pub use state::TradingState;
