mod snapshot;

pub use snapshot::{build_snapshot, Snapshot};
