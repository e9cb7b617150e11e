use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::rank::Rank;

/// One engine instance registered with the system. Owned by the
/// [`Membership`](crate::membership::Membership) registry; callers read it or
/// request state transitions through the registry, never by mutating a copy.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub rank: Rank,
    pub addr: String,
    pub state: MemberState,
    /// Human readable reason for the last state transition, empty if none.
    pub info: String,
}

impl Member {
    pub fn new(rank: Rank, addr: impl Into<String>, state: MemberState) -> Self {
        Self {
            rank,
            addr: addr.into(),
            state,
            info: String::new(),
        }
    }

}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} {}", self.addr, self.rank, self.state)
    }
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MemberState {
    Unknown,
    AwaitJoin,
    Starting,
    Ready,
    Joined,
    Stopping,
    Stopped,
    Evicted,
    Errored,
    Unresponsive,
}

impl Display for MemberState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MemberState::Unknown => "Unknown",
            MemberState::AwaitJoin => "AwaitJoin",
            MemberState::Starting => "Starting",
            MemberState::Ready => "Ready",
            MemberState::Joined => "Joined",
            MemberState::Stopping => "Stopping",
            MemberState::Stopped => "Stopped",
            MemberState::Evicted => "Evicted",
            MemberState::Errored => "Errored",
            MemberState::Unresponsive => "Unresponsive",
        };
        write!(f, "{}", s)
    }
}
