//! Service discovery server — the dynamic announcement store, its
//! background reaper, and the query resource that fuses it with an
//! operator-declared static store.
//!
//! - **Config** ([`config`]): `RegistryConfig`, the plain struct every layer
//!   below is constructed from.
//! - **Backing** ([`backing`]): the pluggable wide-column `BackingStore`
//!   trait and its in-memory reference implementation.
//! - **Schema** ([`schema`]): one-shot startup provisioning of the keyspace
//!   and column family.
//! - **Dynamic store** ([`dynamic_store`]): the TTL registry -- `put`,
//!   `delete`, `get`/`get_all`, and the reaper lifecycle.
//! - **Reaper** ([`reaper`]): the background task the dynamic store owns.
//! - **Static store** ([`static_store`]): operator-declared services with no
//!   expiration.
//! - **Query** ([`query`]): composes dynamic and static results for
//!   type/pool lookups, out of scope for the HTTP layer this crate hands
//!   responses to.
//! - **Error** ([`error`]): `StoreError`, the taxonomy shared by every
//!   fallible operation above.

pub mod backing;
pub mod config;
pub mod dynamic_store;
pub mod error;
pub mod query;
pub mod reaper;
pub mod schema;
pub mod static_store;

pub use backing::{BackingStore, RowCursor, RowPage, StoredColumn};
pub use config::RegistryConfig;
pub use dynamic_store::DynamicStore;
pub use error::StoreError;
pub use query::QueryResource;
pub use schema::SchemaManager;
pub use static_store::{InMemoryStaticStore, StaticStore};
