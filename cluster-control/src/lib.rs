pub mod config;
pub mod error;
pub mod harness;
pub mod rpc;
pub mod service;

mod dispatch;
mod fanout;
mod reconcile;
mod resolve;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::ControlConfig;
pub use error::Error;
pub use harness::{ControlInstance, Harness};
pub use rpc::{HostErrorsMap, RanksInvoker, RanksMethod, RanksReq, RanksResp};
pub use service::{ControlService, QueryReq, QueryResp, StartReq, StartResp, StopReq, StopResp};
