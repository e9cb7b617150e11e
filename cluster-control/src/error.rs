use cluster_system::MemberResults;
use thiserror::Error;

/// Control-plane failures that callers are expected to match on. Everything
/// else (transport failures, registry rejections) travels as `anyhow::Error`
/// annotated with the operation stage.
#[derive(Error, Debug)]
pub enum Error {
    #[error("host not an access point")]
    NoAccessPoint,
    #[error("query requires active management service leader")]
    NoActiveLeader(#[source] anyhow::Error),
    #[error("management service leader unavailable")]
    LeaderUnavailable(#[source] anyhow::Error),
    #[error("no ranks specified in the request")]
    EmptyRankSet,
    #[error("prep shutdown failed on one or more ranks")]
    PrepShutdownFailed {
        /// Prep phase results, returned so the caller can diagnose which
        /// ranks refused to prepare.
        results: MemberResults,
    },
    #[error("response results not populated")]
    NoResultsProduced,
}
