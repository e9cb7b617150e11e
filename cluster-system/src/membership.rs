use ahash::{HashMap, HashMapExt};
use itertools::Itertools;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::member::{Member, MemberState};
use crate::member_result::MemberResults;
use crate::rank::Rank;

/// Authoritative rank -> member registry shared by concurrently executing
/// control requests. Every operation takes the lock once, so a batch update
/// is applied atomically with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct Membership {
    members: RwLock<HashMap<Rank, Member>>,
}

impl Membership {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
        }
    }

    pub fn add(&self, member: Member) -> Result<()> {
        let mut members = self.members.write();
        if members.contains_key(&member.rank) {
            return Err(Error::DuplicateRank(member.rank));
        }
        members.insert(member.rank, member);
        Ok(())
    }

    pub fn get(&self, rank: Rank) -> Result<Member> {
        self.members
            .read()
            .get(&rank)
            .cloned()
            .ok_or(Error::UnknownRank(rank))
    }

    /// All ranks currently known, ascending.
    pub fn ranks(&self) -> Vec<Rank> {
        self.members.read().keys().copied().sorted().collect()
    }

    /// Deduplicated host addresses of the given ranks, ascending by address.
    /// An empty rank filter means every member.
    pub fn hosts(&self, ranks: &[Rank]) -> Vec<String> {
        self.host_ranks(ranks).into_keys().sorted().collect()
    }

    /// Host address -> ranks scheduled on it, filtered by the given rank list
    /// (empty filter means every member). Ranks per host are ascending.
    pub fn host_ranks(&self, ranks: &[Rank]) -> HashMap<String, Vec<Rank>> {
        let members = self.members.read();
        let mut host_ranks: HashMap<String, Vec<Rank>> = HashMap::new();
        for member in members.values() {
            if !ranks.is_empty() && !member.rank.in_list(ranks) {
                continue;
            }
            host_ranks.entry(member.addr.clone()).or_default().push(member.rank);
        }
        for ranks in host_ranks.values_mut() {
            ranks.sort();
        }
        host_ranks
    }

    /// Members matching the rank filter (empty means all) whose current state
    /// is one of `states`, or every match if `states` is empty. Ascending by
    /// rank.
    pub fn members(&self, ranks: &[Rank], states: &[MemberState]) -> Vec<Member> {
        self.members
            .read()
            .values()
            .filter(|m| ranks.is_empty() || m.rank.in_list(ranks))
            .filter(|m| states.is_empty() || states.contains(&m.state))
            .cloned()
            .sorted_by_key(|m| m.rank)
            .collect()
    }

    pub fn set_member_state(&self, rank: Rank, state: MemberState) -> Result<()> {
        let mut members = self.members.write();
        let member = members.get_mut(&rank).ok_or(Error::UnknownRank(rank))?;
        debug!("updating rank {} state {} -> {}", rank, member.state, state);
        member.state = state;
        Ok(())
    }

    /// Applies every result's state transition under a single write lock. The
    /// whole batch either finds all its ranks or fails without a defined
    /// partial outcome; a result referencing an unknown rank is an invariant
    /// violation on the caller's side.
    pub fn update_member_states(&self, results: &MemberResults) -> Result<()> {
        let mut members = self.members.write();
        for result in results.iter() {
            let member = members
                .get_mut(&result.rank)
                .ok_or(Error::UnknownRank(result.rank))?;
            member.state = result.state;
            if let Some(error) = &result.error {
                member.info = error.clone();
            }
        }
        Ok(())
    }
}
