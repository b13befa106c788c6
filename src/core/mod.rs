pub mod config;
pub mod currency;
pub mod errors;
pub mod industry;
pub mod rate;
pub mod tariff;
