//! Viewport-driven synchronization between a map surface and the
//! store-locator backend.
//!
//! The core is sans-IO: [`MapSession`] turns gestures and input events
//! into [`FetchRequest`] values and consumes the responses, with all
//! timing injected by the caller. [`SessionRunner`] pairs a session with
//! the HTTP client for real use.

pub mod cluster;
pub mod debounce;
pub mod reconcile;
pub mod runner;
pub mod scheduler;
pub mod search;
pub mod selection;
pub mod session;
pub mod surface;
pub mod tuning;

pub use cluster::{build_clusters, Cluster, ClusterTone};
pub use runner::SessionRunner;
pub use scheduler::{Channel, QueryScheduler};
pub use search::{ActiveQuery, SearchState};
pub use selection::{OverlayTransition, Selection, SelectionController};
pub use session::{EmptyReason, FetchRequest, MapSession};
pub use surface::{InMemorySurface, MapSurface, MarkerHandle, MarkerStyle};
pub use tuning::SyncTuning;
