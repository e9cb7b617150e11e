use thiserror::Error;

use crate::rank::Rank;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("rank {0} not found in membership")]
    UnknownRank(Rank),
    #[error("rank {0} already registered in membership")]
    DuplicateRank(Rank),
}
