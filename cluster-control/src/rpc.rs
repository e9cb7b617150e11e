use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use async_trait::async_trait;

use cluster_system::{MemberResults, Rank};

/// Distinct failure message -> hosts that produced exactly that failure
/// during one fanout call. Grouping by message deduplicates identical
/// failures across many hosts without losing per-host addressability.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HostErrorsMap(pub BTreeMap<String, BTreeSet<String>>);

impl HostErrorsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, msg: impl Into<String>, addr: impl Into<String>) {
        self.0.entry(msg.into()).or_default().insert(addr.into());
    }
}

impl Deref for HostErrorsMap {
    type Target = BTreeMap<String, BTreeSet<String>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HostErrorsMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// One fanout request: the targeted ranks, the hosts they resolve to and the
/// force flag for stop.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RanksReq {
    pub ranks: Vec<Rank>,
    pub hosts: Vec<String>,
    pub force: bool,
}

#[derive(Debug, Default)]
pub struct RanksResp {
    pub host_errors: HostErrorsMap,
    pub rank_results: MemberResults,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RanksMethod {
    Ping,
    PrepShutdown,
    Stop,
    Start,
}

impl RanksMethod {
    /// Label recorded in each result's action field.
    pub fn as_str(&self) -> &'static str {
        match self {
            RanksMethod::Ping => "ping",
            RanksMethod::PrepShutdown => "prep shutdown",
            RanksMethod::Stop => "stop",
            RanksMethod::Start => "start",
        }
    }
}

impl Display for RanksMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport client executing one request against every host in parallel.
/// Its internal concurrency is opaque here; a call either fails wholesale
/// (transport error) or returns per-host errors plus per-rank results.
#[async_trait]
pub trait RanksInvoker: Send + Sync {
    async fn ping_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp>;

    async fn prep_shutdown_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp>;

    async fn stop_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp>;

    async fn start_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp>;
}
