//! Caching services in front of the remote collaborators.
//!
//! Both services are constructed explicitly and shared through `Arc`; they
//! live as long as the owning application state.

pub mod cache;
pub mod drop_table;
pub mod remote;
pub mod worldstate;

pub use cache::{CacheState, Clock, ManualClock, SystemClock};
pub use drop_table::DropTableService;
pub use remote::{HttpJsonSource, RemoteSource};
pub use worldstate::WorldstateService;
