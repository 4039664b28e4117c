//! Phone catalog access.
//!
//! The catalog is an external collaborator: the assistant only reads from it
//! through the [`CatalogStore`] trait. [`memory::InMemoryCatalog`] is the
//! bundled implementation, loadable from a JSON file.
//!
//! # Example
//!
//! ```
//! use phonewise::catalog::{CatalogFilter, CatalogStore};
//! use phonewise::catalog::entry::CatalogEntry;
//! use phonewise::catalog::memory::InMemoryCatalog;
//!
//! # fn main() -> phonewise::error::Result<()> {
//! let catalog = InMemoryCatalog::from_entries(vec![
//!     CatalogEntry::new(1, "Samsung", "Galaxy A55", 1699.0),
//!     CatalogEntry::new(2, "Apple", "iPhone 15", 3999.0),
//! ]);
//!
//! let filter = CatalogFilter::new().with_price_max(2000.0);
//! let phones = catalog.find_active(&filter)?;
//! assert_eq!(phones.len(), 1);
//! assert_eq!(phones[0].display_name(), "Samsung Galaxy A55");
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod filter;
pub mod memory;

pub use filter::{CatalogFilter, SpecField, SpecPredicate};

use crate::catalog::entry::CatalogEntry;
use crate::error::Result;

/// Read-only view over the phone catalog.
pub trait CatalogStore: Send + Sync + std::fmt::Debug {
    /// Active entries matching the filter, in catalog order.
    fn find_active(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>>;

    /// Look up a single entry regardless of its active flag.
    fn get_by_id(&self, id: u64) -> Result<Option<CatalogEntry>>;

    /// Active entries whose "brand model" name resembles the query, with a
    /// 0-100 similarity, best first.
    fn fuzzy_search_models(&self, query: &str, limit: usize) -> Result<Vec<(CatalogEntry, f64)>>;

    /// Number of entries, active or not.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
