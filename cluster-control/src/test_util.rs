use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;

use cluster_system::{Member, MemberResult, MemberState, Membership, Rank};

use crate::config::ControlConfig;
use crate::harness::{ControlInstance, Harness};
use crate::rpc::{RanksInvoker, RanksMethod, RanksReq, RanksResp};
use crate::service::ControlService;

/// Scripted fanout client. Every targeted rank answers with the method's
/// nominal state unless an override or failure is installed; ranks on a bad
/// host answer nothing, mirroring a wholesale host failure.
#[derive(Default)]
pub(crate) struct MockInvoker {
    membership: Option<Arc<Membership>>,
    calls: Mutex<Vec<(RanksMethod, RanksReq)>>,
    bad_hosts: Mutex<HashMap<String, String>>,
    rank_errors: Mutex<HashMap<Rank, String>>,
    rank_states: Mutex<HashMap<Rank, MemberState>>,
}

impl MockInvoker {
    pub fn new(membership: Arc<Membership>) -> Self {
        Self {
            membership: Some(membership),
            ..Default::default()
        }
    }

    pub fn set_bad_host(&self, addr: impl Into<String>, msg: impl Into<String>) {
        self.bad_hosts.lock().insert(addr.into(), msg.into());
    }

    pub fn set_rank_error(&self, rank: Rank, msg: impl Into<String>) {
        self.rank_errors.lock().insert(rank, msg.into());
    }

    pub fn set_rank_state(&self, rank: Rank, state: MemberState) {
        self.rank_states.lock().insert(rank, state);
    }

    pub fn calls(&self) -> Vec<(RanksMethod, RanksReq)> {
        self.calls.lock().clone()
    }

    fn nominal_state(method: RanksMethod) -> MemberState {
        match method {
            RanksMethod::Ping => MemberState::Joined,
            RanksMethod::PrepShutdown => MemberState::Stopping,
            RanksMethod::Stop => MemberState::Stopped,
            RanksMethod::Start => MemberState::Ready,
        }
    }

    fn respond(&self, method: RanksMethod, req: RanksReq) -> anyhow::Result<RanksResp> {
        self.calls.lock().push((method, req.clone()));

        let mut resp = RanksResp::default();
        let mut dead_ranks = Vec::new();
        if let Some(membership) = &self.membership {
            let host_ranks = membership.host_ranks(&req.ranks);
            for (addr, msg) in self.bad_hosts.lock().iter() {
                if !req.hosts.contains(addr) {
                    continue;
                }
                resp.host_errors.add(msg.clone(), addr.clone());
                if let Some(ranks) = host_ranks.get(addr) {
                    dead_ranks.extend(ranks);
                }
            }
        }

        let rank_errors = self.rank_errors.lock();
        let rank_states = self.rank_states.lock();
        for rank in &req.ranks {
            if rank.in_list(&dead_ranks) {
                continue;
            }
            let state = rank_states
                .get(rank)
                .copied()
                .unwrap_or(Self::nominal_state(method));
            let error = rank_errors.get(rank).cloned();
            resp.rank_results.push(MemberResult::new(*rank, None, error, state));
        }
        Ok(resp)
    }
}

#[async_trait]
impl RanksInvoker for MockInvoker {
    async fn ping_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp> {
        self.respond(RanksMethod::Ping, req)
    }

    async fn prep_shutdown_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp> {
        self.respond(RanksMethod::PrepShutdown, req)
    }

    async fn stop_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp> {
        self.respond(RanksMethod::Stop, req)
    }

    async fn start_ranks(&self, req: RanksReq) -> anyhow::Result<RanksResp> {
        self.respond(RanksMethod::Start, req)
    }
}

pub(crate) struct MockHarness {
    leader: Option<Rank>,
}

impl MockHarness {
    pub fn with_leader(rank: Rank) -> Self {
        Self { leader: Some(rank) }
    }

    pub fn without_leader() -> Self {
        Self { leader: None }
    }
}

struct MockInstance(Rank);

impl ControlInstance for MockInstance {
    fn rank(&self) -> anyhow::Result<Rank> {
        Ok(self.0)
    }
}

impl Harness for MockHarness {
    fn leader_instance(&self) -> anyhow::Result<Arc<dyn ControlInstance>> {
        match self.leader {
            Some(rank) => Ok(Arc::new(MockInstance(rank))),
            None => Err(anyhow!("management service leader instance not found")),
        }
    }
}

pub(crate) struct Fixture {
    pub membership: Arc<Membership>,
    pub invoker: Arc<MockInvoker>,
    pub svc: ControlService,
}

impl Fixture {
    pub fn set_harness(&mut self, harness: MockHarness) {
        self.svc = ControlService::new(
            Some(self.membership.clone()),
            Arc::new(harness),
            self.invoker.clone(),
            ControlConfig::default(),
        );
    }
}

/// Registry with the given `(rank, addr)` members all in `state`, a harness
/// electing `leader`, and a scripted invoker wired into a service.
pub(crate) fn fixture(leader: Rank, members: &[(u32, &str)], state: MemberState) -> Fixture {
    let membership = Arc::new(Membership::new());
    for (rank, addr) in members {
        membership.add(Member::new(Rank(*rank), *addr, state)).unwrap();
    }
    let invoker = Arc::new(MockInvoker::new(membership.clone()));
    let svc = ControlService::new(
        Some(membership.clone()),
        Arc::new(MockHarness::with_leader(leader)),
        invoker.clone(),
        ControlConfig::default(),
    );
    Fixture {
        membership,
        invoker,
        svc,
    }
}
