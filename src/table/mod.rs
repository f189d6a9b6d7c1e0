// Tabular data module.
// In-memory tables of JSON scalars, inner joins, and the CSV cache codec.

pub mod codec;
pub mod frame;
pub mod join;

pub use codec::{read_csv, write_csv};
pub use frame::{Record, Table};
pub use join::inner_join;
