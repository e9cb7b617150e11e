use std::sync::Arc;

use cluster_system::Rank;

/// Process harness owning the local engine instances. Only leader location
/// is consumed here; supervision belongs to the harness itself.
pub trait Harness: Send + Sync {
    /// Instance currently holding management service leadership, if any.
    fn leader_instance(&self) -> anyhow::Result<Arc<dyn ControlInstance>>;
}

pub trait ControlInstance: Send + Sync {
    /// Rank may be unassigned while the instance is still bootstrapping.
    fn rank(&self) -> anyhow::Result<Rank>;
}
