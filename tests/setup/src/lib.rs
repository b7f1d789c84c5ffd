//! This crate contains utilities for preparing an environment
//! for integration tests, including:
//! * in-memory fakes of the object store, the ledger and the wallet signer
//! * stub HTTP servers standing in for the remote APIs

use std::sync::Arc;

use chrono::NaiveDate;
use fakes::{FakeSigner, FixedClock, InMemoryLedger, InMemoryObjectStore};
use interfaces::moment_service::WalletSession;
use stub_server::StubServer;
use util::config::{EnvProfile, LedgerCfg, MomentsCfg, ObjectStoreCfg, Settings};

pub mod data_gen;
pub mod fakes;
pub mod stub_server;

pub struct TestEnvironment {
    pub object_store: Arc<InMemoryObjectStore>,
    pub ledger: Arc<InMemoryLedger>,
    pub signer: Arc<FakeSigner>,
    pub clock: Arc<FixedClock>,
    pub address: String,
    pub cfg: TestEnvironmentCfg,
}

#[derive(Clone)]
pub struct TestEnvironmentCfg {
    pub today: NaiveDate,
    pub bypass_daily_limit: bool,
    pub skip_unresolvable_assets: bool,
}

impl Default for TestEnvironmentCfg {
    fn default() -> Self {
        TestEnvironmentCfg {
            today: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            bypass_daily_limit: false,
            skip_unresolvable_assets: false,
        }
    }
}

impl TestEnvironmentCfg {
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
    pub fn with_bypass(mut self) -> Self {
        self.bypass_daily_limit = true;
        self
    }
    pub fn with_skip_policy(mut self) -> Self {
        self.skip_unresolvable_assets = true;
        self
    }
    pub fn start(self) -> TestEnvironment {
        TestEnvironment::start_with_cfg(self)
    }
}

impl TestEnvironment {
    pub fn start() -> TestEnvironment {
        TestEnvironment::start_with_cfg(TestEnvironmentCfg::default())
    }

    pub fn builder() -> TestEnvironmentCfg {
        TestEnvironmentCfg::default()
    }

    pub fn start_with_cfg(cfg: TestEnvironmentCfg) -> TestEnvironment {
        TestEnvironment {
            object_store: Arc::new(InMemoryObjectStore::default()),
            ledger: Arc::new(InMemoryLedger::default()),
            signer: Arc::new(FakeSigner::default()),
            clock: Arc::new(FixedClock(cfg.today)),
            address: data_gen::rand_address(),
            cfg,
        }
    }

    /// Session of the environment's account, signing with the fake signer
    pub fn wallet(&self) -> WalletSession {
        WalletSession::new(&self.address, self.signer.clone())
    }

    /// Settings matching the environment, with every remote endpoint
    /// pointing at the given stub server
    pub fn make_test_cfg(&self, stub: &StubServer) -> Settings {
        Settings {
            ledger: LedgerCfg {
                server: stub.host(),
                port: stub.port(),
                token: "a".repeat(64),
                confirmation_rounds: 2,
            },
            object_store: ObjectStoreCfg {
                api_url: stub.url(),
                jwt: "test-jwt".to_string(),
                gateway_url: format!("{}/ipfs", stub.url()),
                request_timeout_ms: 5000,
            },
            moments: MomentsCfg {
                bypass_daily_limit: self.cfg.bypass_daily_limit,
                skip_unresolvable_assets: self.cfg.skip_unresolvable_assets,
                max_concurrent_lookups: 4,
            },
            log_level: "debug".to_string(),
            env: EnvProfile::Test,
        }
    }
}
