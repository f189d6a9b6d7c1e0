//! Fetches the superstore sales, stores and items datasets from a paginated
//! JSON API, joins them into one table, and caches the result as CSV.
//!
//! ```no_run
//! # async fn run() -> superstore::Result<()> {
//! let config = superstore::Config::load_or_default()?;
//! let mut superstore = superstore::Superstore::from_config(config)?;
//! let table = superstore.get_dataset().await?;
//! println!("{} rows", table.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod superstore;
pub mod table;

pub use api::{ApiClient, PageSource};
pub use config::Config;
pub use error::{Result, WrangleError};
pub use superstore::Superstore;
pub use table::{Record, Table};
