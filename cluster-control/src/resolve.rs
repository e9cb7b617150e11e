use anyhow::Context;

use cluster_system::{Member, Rank};

use crate::error::Error;
use crate::service::ControlService;

impl ControlService {
    /// Membership record of the management service leader.
    pub(crate) fn leader_member(&self) -> anyhow::Result<Member> {
        let membership = self.membership()?;
        let instance = self
            .harness
            .leader_instance()
            .map_err(Error::LeaderUnavailable)?;
        let rank = instance.rank().map_err(Error::LeaderUnavailable)?;
        let member = membership.get(rank).context("retrieving MS member")?;
        Ok(member)
    }

    /// Effective rank set for a request. An empty filter means every rank
    /// currently known, read live from the registry since membership can
    /// change between calls. Read-only.
    pub(crate) fn filter_ranks(&self, rank_list: &[Rank], exclude_leader: bool) -> anyhow::Result<Vec<Rank>> {
        let leader = self.leader_member().context("retrieving MS member")?;

        let mut ranks = if rank_list.is_empty() {
            self.membership()?.ranks()
        } else {
            rank_list.to_vec()
        };

        if exclude_leader {
            ranks = leader.rank.remove_from_list(&ranks);
        }

        Ok(ranks)
    }
}
