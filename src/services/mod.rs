mod ledger_store;
pub mod accounting;
pub mod auth_service;
pub mod bootstrap;
pub mod visibility;

pub use ledger_store::{LedgerStore, LedgerTx};
pub use accounting::AccountingService;
pub use auth_service::AuthService;
