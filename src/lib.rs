//! Client library for the personal finance tracker API.
//!
//! # Architecture
//!
//! - **HTTP**: reqwest on tokio, wrapped by [`client::ApiClient`] which adds
//!   bearer authentication and one-shot token refresh on 401
//! - **Tokens**: persisted through a [`storage::TokenStore`]
//! - **Services**: one module of async functions per API resource
//! - **State**: [`session::Session`] for the logged-in user,
//!   [`ledger::TransactionLedger`] for the loaded transactions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use finance_client::{
//!     client::{ApiClient, LogRedirect},
//!     config::Config,
//!     ledger::TransactionLedger,
//!     storage::FileTokenStore,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let store = Arc::new(FileTokenStore::new(&config.token_file));
//! let client = ApiClient::from_config(&config, store, Arc::new(LogRedirect))?;
//!
//! let mut ledger = TransactionLedger::new(client);
//! for transaction in ledger.fetch_transactions().await? {
//!     println!("{} {}", transaction.date, transaction.amount);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use client::{ApiClient, ApiRequest, LogRedirect, LoginRedirect};
pub use error::{ApiError, Operation, OperationError};
