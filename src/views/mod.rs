pub mod cart;
pub mod orders;
pub mod success;

pub use cart::CartController;
pub use orders::OrderHistoryView;
pub use success::PaymentSuccessView;
