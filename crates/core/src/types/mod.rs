pub mod allowance;
pub mod config;
pub mod intent;
pub mod market;
pub mod primitives;
pub mod state;
pub mod transaction;

pub use allowance::*;
pub use config::*;
pub use intent::*;
pub use market::*;
pub use primitives::*;
pub use state::*;
pub use transaction::*;
