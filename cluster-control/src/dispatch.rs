use anyhow::Context;

use cluster_system::{MemberResults, Rank};

use crate::rpc::RanksMethod;
use crate::service::ControlService;

/// Ordering of the two dispatch paths.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum DispatchOrder {
    /// Peers before the leader.
    PeersFirst,
    /// Leader before its peers. Start uses this so the leader instance is
    /// back up before peers attempt to rejoin it.
    LeaderFirst,
}

impl ControlService {
    /// Fanout to every resolved rank except the management service leader.
    async fn results_from_peers(
        &self,
        method: RanksMethod,
        rank_list: &[Rank],
        force: bool,
    ) -> anyhow::Result<MemberResults> {
        let ranks = self.filter_ranks(rank_list, true)?;
        self.rpc_to_ranks(method, &ranks, force).await
    }

    /// Single-target fanout to the leader rank. Contributes nothing when the
    /// filter names ranks and the leader is not among them.
    async fn results_from_leader(
        &self,
        method: RanksMethod,
        rank_list: &[Rank],
        force: bool,
    ) -> anyhow::Result<MemberResults> {
        let leader = self.leader_member().context("retrieving MS member")?;

        if !rank_list.is_empty() && !leader.rank.in_list(rank_list) {
            return Ok(MemberResults::new());
        }

        self.rpc_to_ranks(method, &[leader.rank], force).await
    }

    /// Dual-Path Dispatcher: the leader is never folded into a bulk request
    /// with its peers since its instance must answer even while it is
    /// orchestrating the very operation being requested.
    pub(crate) async fn dual_dispatch(
        &self,
        method: RanksMethod,
        rank_list: &[Rank],
        force: bool,
        order: DispatchOrder,
    ) -> anyhow::Result<MemberResults> {
        match order {
            DispatchOrder::PeersFirst => {
                let mut results = self.results_from_peers(method, rank_list, force).await?;
                results.extend(self.results_from_leader(method, rank_list, force).await?);
                Ok(results)
            }
            DispatchOrder::LeaderFirst => {
                let mut results = self.results_from_leader(method, rank_list, force).await?;
                results.extend(self.results_from_peers(method, rank_list, force).await?);
                Ok(results)
            }
        }
    }
}
