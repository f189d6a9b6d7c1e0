// Cache module for the on-disk dataset.
// Stores joined tables as CSV so repeat runs skip the network.

pub mod paths;
pub mod store;

pub use paths::{DEFAULT_CACHE_FILE, config_dir, config_path, intermediate_path};
pub use store::{delete, exists, modified_at, read_table, write_table};
