use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::member::MemberState;
use crate::rank::Rank;

/// Outcome of one RPC attempt against one rank. A result carrying an error
/// message counts as errored regardless of its `state` field.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemberResult {
    pub rank: Rank,
    /// Operation label ("ping", "stop", ...), set by the calling operation.
    pub action: String,
    pub msg: Option<String>,
    pub error: Option<String>,
    pub state: MemberState,
}

impl MemberResult {
    pub fn new(rank: Rank, msg: Option<String>, error: Option<String>, state: MemberState) -> Self {
        Self {
            rank,
            action: String::new(),
            msg,
            error,
            state,
        }
    }

    pub fn errored(&self) -> bool {
        self.error.is_some()
    }
}

impl Display for MemberResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(error) => write!(f, "rank {} {} {}: {}", self.rank, self.action, self.state, error),
            None => write!(f, "rank {} {} {}", self.rank, self.action, self.state),
        }
    }
}

/// Ordered sequence of per-rank results. Order is insertion order and carries
/// no meaning beyond traceability.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MemberResults(pub Vec<MemberResult>);

impl MemberResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.iter().any(|r| r.errored())
    }

    pub fn set_action(&mut self, action: &str) {
        for result in self.iter_mut() {
            result.action = action.to_string();
        }
    }
}

impl Deref for MemberResults {
    type Target = Vec<MemberResult>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MemberResults {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<MemberResult> for MemberResults {
    fn from_iter<T: IntoIterator<Item = MemberResult>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MemberResults {
    type Item = MemberResult;
    type IntoIter = std::vec::IntoIter<MemberResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
