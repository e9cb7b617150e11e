use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::debug;

use cluster_system::{Member, MemberResults, Membership, Rank};

use crate::config::ControlConfig;
use crate::dispatch::DispatchOrder;
use crate::error::Error;
use crate::harness::Harness;
use crate::rpc::{RanksInvoker, RanksMethod, RanksReq, RanksResp};

/// System-control orchestrator: queries, stops and starts the members of a
/// running system across hosts. Collaborators are injected; the service holds
/// no lock across fanout calls, so reconciliation always re-checks registry
/// state at apply time.
pub struct ControlService {
    /// Membership view, present only on access point hosts.
    pub(crate) membership: Option<Arc<Membership>>,
    pub(crate) harness: Arc<dyn Harness>,
    pub(crate) invoker: Arc<dyn RanksInvoker>,
    pub(crate) config: ControlConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryReq {
    pub ranks: Vec<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResp {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopReq {
    pub ranks: Vec<u32>,
    pub prep: bool,
    pub kill: bool,
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopResp {
    pub results: MemberResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartReq {
    pub ranks: Vec<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartResp {
    pub results: MemberResults,
}

impl ControlService {
    pub fn new(
        membership: Option<Arc<Membership>>,
        harness: Arc<dyn Harness>,
        invoker: Arc<dyn RanksInvoker>,
        config: ControlConfig,
    ) -> Self {
        Self {
            membership,
            harness,
            invoker,
            config,
        }
    }

    pub(crate) fn membership(&self) -> Result<&Membership, Error> {
        self.membership.as_deref().ok_or(Error::NoAccessPoint)
    }

    pub(crate) async fn invoke(&self, method: RanksMethod, req: RanksReq) -> anyhow::Result<RanksResp> {
        match method {
            RanksMethod::Ping => self.invoker.ping_ranks(req).await,
            RanksMethod::PrepShutdown => self.invoker.prep_shutdown_ranks(req).await,
            RanksMethod::Stop => self.invoker.stop_ranks(req).await,
            RanksMethod::Start => self.invoker.start_ranks(req).await,
        }
    }

    /// Pings every resolved rank, leader included, and reconciles the
    /// outcome under the ping policy. Unresponsive members are left for a
    /// future rejoin to correct rather than reclassified from a probe alone.
    async fn ping_members(&self, rank_list: &[Rank]) -> anyhow::Result<()> {
        let ranks = self.filter_ranks(rank_list, false)?;
        let mut results = self.rpc_to_ranks(RanksMethod::Ping, &ranks, false).await?;
        self.reconcile_ping(rank_list, &mut results)
    }

    /// Returns the status of the requested members (all members if the rank
    /// list is empty), refreshed by a best-effort liveness probe.
    pub async fn query(&self, req: QueryReq) -> anyhow::Result<QueryResp> {
        debug!("received SystemQuery request");

        self.harness
            .leader_instance()
            .map_err(Error::NoActiveLeader)?;

        let rank_list = Rank::from_u32_list(&req.ranks);
        let fut = async {
            self.ping_members(&rank_list).await?;
            let members = self.membership()?.members(&rank_list, &[]);
            Ok::<_, anyhow::Error>(QueryResp { members })
        };
        let resp = timeout(self.config.request_timeout(), fut)
            .await
            .context("system query timed out")??;

        debug!("responding to SystemQuery request");
        Ok(resp)
    }

    /// Controlled shutdown in up to two phases, prep and kill, each toggled
    /// by the request. A failed prep aborts the kill phase unless forced;
    /// the prep results travel inside the returned error for diagnosis.
    pub async fn stop(&self, req: StopReq) -> anyhow::Result<StopResp> {
        debug!("received SystemStop request");

        let rank_list = Rank::from_u32_list(&req.ranks);
        let fut = async {
            let mut resp = StopResp::default();

            if req.prep {
                debug!("preparing ranks for shutdown");
                let mut results = self
                    .dual_dispatch(RanksMethod::PrepShutdown, &rank_list, false, DispatchOrder::PeersFirst)
                    .await?;
                self.reconcile_shutdown(RanksMethod::PrepShutdown, &mut results)
                    .context("prep shutdown")?;
                if !req.force && results.has_errors() {
                    return Err(Error::PrepShutdownFailed { results }.into());
                }
                resp.results = results;
            }

            if req.kill {
                debug!("shutting down ranks");
                let mut results = self
                    .dual_dispatch(RanksMethod::Stop, &rank_list, req.force, DispatchOrder::PeersFirst)
                    .await?;
                self.reconcile_shutdown(RanksMethod::Stop, &mut results)
                    .context("stop")?;
                resp.results = results;
            }

            if resp.results.is_empty() {
                return Err(Error::NoResultsProduced.into());
            }
            Ok::<_, anyhow::Error>(resp)
        };
        let resp = timeout(self.config.request_timeout(), fut)
            .await
            .context("system stop timed out")??;

        debug!("responding to SystemStop request");
        Ok(resp)
    }

    /// Controlled start of stopped members. The leader instance is started
    /// before its peers so they have something to rejoin.
    pub async fn start(&self, req: StartReq) -> anyhow::Result<StartResp> {
        debug!("received SystemStart request");

        let rank_list = Rank::from_u32_list(&req.ranks);
        let fut = async {
            debug!("starting ranks");
            let mut results = self
                .dual_dispatch(RanksMethod::Start, &rank_list, false, DispatchOrder::LeaderFirst)
                .await?;
            self.reconcile_start(&mut results).context("start")?;
            Ok::<_, anyhow::Error>(StartResp { results })
        };
        let resp = timeout(self.config.request_timeout(), fut)
            .await
            .context("system start timed out")??;

        debug!("responding to SystemStart request");
        Ok(resp)
    }
}
