use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Unique identifier of one engine instance across the whole system.
/// Assigned once at registration and never reused.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Rank(pub u32);

impl Rank {
    pub fn in_list(&self, ranks: &[Rank]) -> bool {
        ranks.contains(self)
    }

    /// Returns `ranks` with every occurrence of this rank removed,
    /// preserving the order of the remaining entries.
    pub fn remove_from_list(&self, ranks: &[Rank]) -> Vec<Rank> {
        ranks.iter().copied().filter(|r| r != self).collect()
    }

    pub fn from_u32_list(ranks: &[u32]) -> Vec<Rank> {
        ranks.iter().copied().map(Rank).collect()
    }
}

impl From<u32> for Rank {
    fn from(rank: u32) -> Self {
        Rank(rank)
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::rank::Rank;

    #[test]
    fn remove_from_list_preserves_order() {
        let ranks = Rank::from_u32_list(&[3, 0, 5, 0, 1]);
        let removed = Rank(0).remove_from_list(&ranks);
        assert_eq!(removed, Rank::from_u32_list(&[3, 5, 1]));
    }

    #[test]
    fn remove_from_list_absent_rank_is_noop() {
        let ranks = Rank::from_u32_list(&[1, 2, 3]);
        let removed = Rank(7).remove_from_list(&ranks);
        assert_eq!(removed, ranks);
    }

    #[test]
    fn in_list() {
        let ranks = Rank::from_u32_list(&[1, 2, 3]);
        assert!(Rank(2).in_list(&ranks));
        assert!(!Rank(4).in_list(&ranks));
    }
}
