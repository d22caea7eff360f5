pub mod admission;
pub mod metrics;
pub mod providers;
pub mod store;

pub use admission::{AdmissionGate, GatedProvider, GatedStore};
pub use providers::{CompletionProvider, CompletionRequest, ProviderError};
pub use store::{EqFilter, RowStore, SelectQuery, StoreError};
