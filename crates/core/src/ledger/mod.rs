pub mod reader;
pub mod submitter;
pub mod watcher;

pub use reader::LedgerReader;
pub use submitter::TransactionSubmitter;
pub use watcher::ConfirmationWatcher;
