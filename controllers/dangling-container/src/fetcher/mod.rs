//! Inventory fetchers.
//!
//! Each fetcher produces one side of the comparison. Neither ever fails: a
//! backend error is logged and the inventory degrades to empty, which means
//! "no orphans observed this pass" rather than a false termination.

pub mod docker;
pub mod pods;

pub use docker::fetch_runtime_containers;
pub use pods::fetch_cluster_container_ids;
