mod order;
mod position;
mod side;
mod trade;

pub use order::Order;
pub use position::{PositionLimits, buy_capacity, is_pinned, sell_capacity};
pub use side::Side;
pub use trade::{Listing, Trade};
