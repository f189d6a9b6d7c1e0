// Superstore dataset assembly and cache-aware access.
// Fetches items, stores and sales, joins them into one table, and caches it.

use std::path::Path;

use tracing::info;

use crate::api::{ApiClient, PageSource, fetch_all};
use crate::cache;
use crate::config::Config;
use crate::error::Result;
use crate::table::{Table, inner_join};

pub const ITEMS: &str = "items";
pub const STORES: &str = "stores";
pub const SALES: &str = "sales";

pub const STORE_KEY: &str = "store_id";
pub const ITEM_KEY: &str = "item_id";

/// Sales columns renamed so they line up with the stores and items keys.
const SALES_RENAMES: [(&str, &str); 2] = [("store", STORE_KEY), ("item", ITEM_KEY)];

/// Rename the sales table's foreign keys to the join key names.
pub fn prepare_sales(sales: &mut Table) {
    sales.rename_columns(&SALES_RENAMES);
}

/// Join prepared sales to stores on `store_id`, then to items on `item_id`.
///
/// Both joins are inner joins: sales without a matching store or item are
/// dropped.
pub fn merge_superstore(sales: &Table, stores: &Table, items: &Table) -> Result<Table> {
    let with_stores = inner_join(sales, stores, STORE_KEY)?;
    inner_join(&with_stores, items, ITEM_KEY)
}

/// Fetches and caches the joined superstore dataset.
pub struct Superstore<S = ApiClient> {
    source: S,
    config: Config,
}

impl Superstore<ApiClient> {
    /// Build an accessor talking to the configured API host.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ApiClient::new(&config.base_url)?;
        Ok(Self::new(client, config))
    }
}

impl<S: PageSource> Superstore<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache_path(&self) -> &Path {
        &self.config.cache_path
    }

    /// Fetch every page of one endpoint.
    pub async fn fetch(&mut self, endpoint: &str) -> Result<Table> {
        fetch_all(&mut self.source, endpoint, self.config.max_pages).await
    }

    /// Rebuild the dataset from the API and overwrite the cache file.
    ///
    /// The returned table is the one decoded from the file just written, so it
    /// matches what later [`Superstore::get_dataset`] calls read.
    pub async fn assemble_fresh(&mut self) -> Result<Table> {
        info!("Requesting data...");
        let items = self.fetch(ITEMS).await?;
        let stores = self.fetch(STORES).await?;
        let mut sales = self.fetch(SALES).await?;

        prepare_sales(&mut sales);

        if self.config.keep_intermediate {
            for (endpoint, table) in [(ITEMS, &items), (STORES, &stores), (SALES, &sales)] {
                let path = cache::intermediate_path(&self.config.cache_path, endpoint);
                cache::write_table(&path, table)?;
                info!(endpoint, path = %path.display(), rows = table.len(), "Saved endpoint table");
            }
        }

        info!("Merging data...");
        let merged = merge_superstore(&sales, &stores, &items)?;

        info!(path = %self.config.cache_path.display(), rows = merged.len(), "Storing data...");
        cache::write_table(&self.config.cache_path, &merged)?;

        Ok(cache::read_table(&self.config.cache_path)?.unwrap_or(merged))
    }

    /// Return the cached dataset, building it first if the cache file is absent.
    ///
    /// An existing cache file is never refreshed here; call
    /// [`Superstore::invalidate`] or [`Superstore::assemble_fresh`] for that.
    pub async fn get_dataset(&mut self) -> Result<Table> {
        info!("Checking if file exists...");
        let path = self.config.cache_path.clone();

        let table = if cache::exists(&path) {
            let written = cache::modified_at(&path)?;
            info!(path = %path.display(), %written, "Reading data from file...");
            match cache::read_table(&path)? {
                Some(table) => table,
                // Removed between the check and the read.
                None => self.assemble_fresh().await?,
            }
        } else {
            info!("Creating new file...");
            self.assemble_fresh().await?
        };

        info!(rows = table.len(), columns = table.width(), "Done!");
        Ok(table)
    }

    /// Delete the cache file so the next [`Superstore::get_dataset`] refetches.
    pub fn invalidate(&self) -> Result<()> {
        cache::delete(&self.config.cache_path)
    }
}
