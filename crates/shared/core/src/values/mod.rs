/// Price in integer ticks
pub type Price = i64;

/// Signed quantity: positive = buy, negative = sell
pub type Quantity = i64;

/// Exchange timestamp (monotonic within a run)
pub type Timestamp = i64;

/// Symbol identifier for a tradeable product
pub type Symbol = String;
