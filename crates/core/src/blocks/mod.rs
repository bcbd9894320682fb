pub mod producer;

pub use producer::{BlockStream, BlockStreamItem, BlockTicker, BoxBlockStream};
