use itertools::Itertools;
use tracing::debug;

use cluster_system::{MemberResult, MemberResults, MemberState, Rank};

use crate::error::Error;
use crate::rpc::{HostErrorsMap, RanksMethod, RanksReq};
use crate::service::ControlService;

impl ControlService {
    /// Synthesizes one Stopped result per targeted rank owned by a host the
    /// fanout reported as erroring. An unreachable host means every member
    /// scheduled on it is presumed stopped; leaving them Ready/Joined when
    /// the host cannot even answer a ping would be a stale view.
    pub(crate) fn results_from_bad_hosts(
        &self,
        ranks: &[Rank],
        host_errors: &HostErrorsMap,
    ) -> anyhow::Result<MemberResults> {
        let host_ranks = self.membership()?.host_ranks(ranks);

        let mut results = MemberResults::new();
        for (err_msg, addrs) in host_errors.iter() {
            for addr in addrs {
                let Some(ranks) = host_ranks.get(addr) else {
                    debug!("host {} error matched no requested ranks: {}", addr, err_msg);
                    continue;
                };
                debug!("host {} (ranks {}) error: {}", addr, ranks.iter().join(","), err_msg);
                for rank in ranks {
                    results.push(MemberResult::new(
                        *rank,
                        None,
                        Some(err_msg.clone()),
                        MemberState::Stopped,
                    ));
                }
            }
        }

        Ok(results)
    }

    /// Fanout Coordinator: one `method` RPC against `ranks` on their
    /// resolved hosts. Transport failures propagate unchanged; per-host
    /// failures become synthesized results ahead of the genuine ones.
    pub(crate) async fn rpc_to_ranks(
        &self,
        method: RanksMethod,
        ranks: &[Rank],
        force: bool,
    ) -> anyhow::Result<MemberResults> {
        if ranks.is_empty() {
            return Err(Error::EmptyRankSet.into());
        }

        let req = RanksReq {
            ranks: ranks.to_vec(),
            hosts: self.membership()?.hosts(ranks),
            force,
        };
        let resp = self.invoke(method, req).await?;

        let mut results = self.results_from_bad_hosts(ranks, &resp.host_errors)?;
        results.extend(resp.rank_results);
        Ok(results)
    }
}
