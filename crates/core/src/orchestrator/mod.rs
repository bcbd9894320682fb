pub mod core;
pub mod result;

pub use self::core::WagerOrchestrator;
pub use result::{StateTransition, WagerReceipt};
