pub mod asset;
pub mod interval;
pub mod reading;
