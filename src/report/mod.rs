pub mod forex;
pub mod impact;
