use ahash::HashMap;
use anyhow::Context;

use cluster_system::{MemberResult, MemberResults, MemberState, Rank};

use crate::rpc::RanksMethod;
use crate::service::ControlService;

/// Registry states a member must already be in for a ping result to
/// reclassify it. Healthy members are never downgraded from a best-effort
/// liveness probe.
const PING_SUSPECT_STATES: &[MemberState] = &[
    MemberState::Evicted,
    MemberState::Errored,
    MemberState::Unknown,
    MemberState::Stopped,
    MemberState::Unresponsive,
];

impl ControlService {
    /// Persists every result's `(rank, state)` transition in one atomic
    /// registry batch.
    pub(crate) fn apply_states(&self, results: &MemberResults) -> anyhow::Result<()> {
        self.membership()?
            .update_member_states(results)
            .context("updating member states")
    }

    /// Ping policy: a result may only reclassify a member as Unresponsive,
    /// Stopped or Errored, and only if the member is already suspect in the
    /// registry. Unresponsive members are left for a future rejoin to
    /// correct.
    pub(crate) fn reconcile_ping(&self, rank_list: &[Rank], results: &mut MemberResults) -> anyhow::Result<()> {
        results.set_action(RanksMethod::Ping.as_str());

        let by_rank: HashMap<Rank, &MemberResult> = results.iter().map(|r| (r.rank, r)).collect();
        let suspects = self.membership()?.members(rank_list, PING_SUSPECT_STATES);
        for member in suspects {
            let Some(result) = by_rank.get(&member.rank) else {
                continue;
            };
            if !matches!(
                result.state,
                MemberState::Unresponsive | MemberState::Stopped | MemberState::Errored
            ) {
                continue;
            }
            self.membership()?
                .set_member_state(member.rank, result.state)
                .with_context(|| format!("setting state of rank {}", member.rank))?;
        }

        Ok(())
    }

    /// Shutdown policy: authoritative, every result's state is applied.
    pub(crate) fn reconcile_shutdown(&self, method: RanksMethod, results: &mut MemberResults) -> anyhow::Result<()> {
        self.apply_states(results)?;
        results.set_action(method.as_str());
        Ok(())
    }

    /// Start policy: apply errored results, and Ready acknowledgements only
    /// for members not already Joined. Joined is reached through the join
    /// protocol, not through the start RPC.
    pub(crate) fn reconcile_start(&self, results: &mut MemberResults) -> anyhow::Result<()> {
        let mut filtered = MemberResults::new();
        for result in results.iter() {
            if !result.errored() {
                if result.state != MemberState::Ready {
                    continue;
                }
                let member = self
                    .membership()?
                    .get(result.rank)
                    .context("result rank not in membership")?;
                if member.state == MemberState::Joined {
                    continue;
                }
            }
            filtered.push(result.clone());
        }

        self.apply_states(&filtered)?;
        results.set_action(RanksMethod::Start.as_str());
        Ok(())
    }
}
