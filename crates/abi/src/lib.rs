pub mod erc20;
pub mod market;

pub use erc20::IERC20;
pub use market::IPredictionMarket;
