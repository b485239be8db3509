pub mod cart;
pub mod payment;
