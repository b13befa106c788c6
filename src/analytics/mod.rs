pub mod duty;
pub mod industry;
pub mod projection;
pub mod volatility;
