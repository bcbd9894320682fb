pub mod amount;
pub mod blocks;
pub mod cache;
pub mod client;
pub mod enrichment;
pub mod error;
pub mod gate;
pub mod history;
pub mod ledger;
pub mod orchestrator;
pub mod types;

pub use cache::*;
pub use client::*;
pub use error::*;
pub use history::*;
pub use ledger::{ConfirmationWatcher, LedgerReader, TransactionSubmitter};
pub use orchestrator::{StateTransition, WagerOrchestrator, WagerReceipt};
pub use types::*;

pub use blocks::{BlockStream, BlockTicker};
pub use enrichment::{Analyzer, BatchEnricher, Enrichment, EnrichmentConfig};
pub use gate::AuthorizationPolicy;
