#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tic::{ClientConnector, Result};
use tic_atom::proto::Any;
use tic_atom::{AccountInfo, CosmosRpc, GasInfo};
use tic_common::{Coin, TransferError};
use tic_constants::ChainContext;
use tic_ton::{EstimateFeeRequest, FeeBreakdown, TonRpc, TvmStackEntry};
use tonlib_core::cell::CellBuilder;
use tonlib_core::types::TonAddress as TonAddressLib;

pub const NOW: u64 = 1_700_000_000;

/// secret key of the RFC 8032 test vector 1
pub const TON_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

#[derive(Debug, Clone)]
pub struct SimulateCall {
    pub msgs: Vec<Any>,
    pub memo: String,
    pub pubkey: Vec<u8>,
    pub sequence: u64,
}

#[derive(Default)]
struct CosmosState {
    accounts: HashMap<String, AccountInfo>,
    balances: HashMap<String, Vec<Coin>>,
    channels: HashMap<(String, String), String>,
    gas_used: u64,
    unavailable: bool,
    simulations: Vec<SimulateCall>,
}

/// In-memory Cosmos node. Every call yields once so that concurrent
/// requests interleave.
#[derive(Default)]
pub struct FakeCosmosRpc {
    state: Mutex<CosmosState>,
}

impl FakeCosmosRpc {
    pub fn new() -> Self {
        let rpc = FakeCosmosRpc::default();
        rpc.state.lock().gas_used = 100_000;
        rpc
    }

    pub fn set_account(&self, address: &str, account_number: u64, sequence: u64) {
        self.state.lock().accounts.insert(
            address.to_string(),
            AccountInfo {
                account_number,
                sequence,
            },
        );
    }

    pub fn set_balance(&self, address: &str, denom: &str, amount: u128) {
        self.state.lock().balances.insert(
            address.to_string(),
            vec![Coin {
                denom: denom.to_string(),
                amount: amount.to_string(),
            }],
        );
    }

    pub fn set_channel(&self, source_chain_id: &str, dest_chain_id: &str, channel: &str) {
        self.state.lock().channels.insert(
            (source_chain_id.to_string(), dest_chain_id.to_string()),
            channel.to_string(),
        );
    }

    pub fn set_gas_used(&self, gas_used: u64) {
        self.state.lock().gas_used = gas_used;
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    pub fn simulations(&self) -> Vec<SimulateCall> {
        self.state.lock().simulations.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.state.lock().unavailable {
            return Err(TransferError::RpcUnavailable("connection refused".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl CosmosRpc for FakeCosmosRpc {
    async fn get_account_info(&self, address: &str) -> Result<AccountInfo> {
        tokio::task::yield_now().await;
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .accounts
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_balances(&self, address: &str) -> Result<Vec<Coin>> {
        tokio::task::yield_now().await;
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .balances
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn estimate_gas(
        &self,
        msgs: Vec<Any>,
        memo: String,
        pubkey: Vec<u8>,
        sequence: u64,
    ) -> Result<GasInfo> {
        tokio::task::yield_now().await;
        self.check_available()?;
        let mut state = self.state.lock();
        state.simulations.push(SimulateCall {
            msgs,
            memo,
            pubkey,
            sequence,
        });
        Ok(GasInfo {
            gas_used: state.gas_used,
        })
    }

    async fn get_source_channel_id(
        &self,
        source_chain_id: &str,
        dest_chain_id: &str,
    ) -> Result<Option<String>> {
        tokio::task::yield_now().await;
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .channels
            .get(&(source_chain_id.to_string(), dest_chain_id.to_string()))
            .cloned())
    }
}

#[derive(Default)]
struct TonState {
    balance: u128,
    deployed: bool,
    seqno: u32,
    jetton_wallet: Option<TonAddressLib>,
    fees: FeeBreakdown,
    unavailable: bool,
    fee_requests: Vec<EstimateFeeRequest>,
}

#[derive(Default)]
pub struct FakeTonRpc {
    state: Mutex<TonState>,
}

impl FakeTonRpc {
    pub fn new() -> Self {
        FakeTonRpc::default()
    }

    pub fn set_wallet(&self, balance: u128, deployed: bool, seqno: u32) {
        let mut state = self.state.lock();
        state.balance = balance;
        state.deployed = deployed;
        state.seqno = seqno;
    }

    pub fn set_seqno(&self, seqno: u32) {
        self.state.lock().seqno = seqno;
    }

    pub fn set_jetton_wallet(&self, jetton_wallet: TonAddressLib) {
        self.state.lock().jetton_wallet = Some(jetton_wallet);
    }

    pub fn set_fees(&self, fees: FeeBreakdown) {
        self.state.lock().fees = fees;
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    pub fn fee_requests(&self) -> Vec<EstimateFeeRequest> {
        self.state.lock().fee_requests.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.state.lock().unavailable {
            return Err(TransferError::RpcUnavailable("toncenter 502".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl TonRpc for FakeTonRpc {
    async fn get_balance(&self, _address: &str) -> Result<u128> {
        tokio::task::yield_now().await;
        self.check_available()?;
        Ok(self.state.lock().balance)
    }

    async fn is_deployed(&self, _address: &str) -> Result<bool> {
        tokio::task::yield_now().await;
        self.check_available()?;
        Ok(self.state.lock().deployed)
    }

    async fn get_seqno(&self, _address: &str) -> Result<u32> {
        tokio::task::yield_now().await;
        self.check_available()?;
        Ok(self.state.lock().seqno)
    }

    async fn run_get_method(
        &self,
        _address: &str,
        method: &str,
        _stack: Vec<TvmStackEntry>,
    ) -> Result<Vec<TvmStackEntry>> {
        tokio::task::yield_now().await;
        self.check_available()?;
        let jetton_wallet = self.state.lock().jetton_wallet;
        match (method, jetton_wallet) {
            ("get_wallet_address", Some(address)) => {
                let cell = CellBuilder::new().store_address(&address)?.build()?.to_arc();
                Ok(vec![TvmStackEntry::Slice(cell)])
            }
            _ => Err(anyhow::anyhow!("exit code 11")),
        }
    }

    async fn estimate_fee(
        &self,
        _address: &str,
        request: EstimateFeeRequest,
    ) -> Result<FeeBreakdown> {
        tokio::task::yield_now().await;
        self.check_available()?;
        let mut state = self.state.lock();
        state.fee_requests.push(request);
        Ok(state.fees)
    }
}

/// Hands out the same fake for every chain and counts connects.
pub struct FakeConnector<R> {
    pub rpc: Arc<R>,
    pub connects: Arc<AtomicUsize>,
}

impl<R> FakeConnector<R> {
    pub fn new(rpc: Arc<R>) -> Self {
        FakeConnector {
            rpc,
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ClientConnector<dyn CosmosRpc> for FakeConnector<FakeCosmosRpc> {
    fn connect(&self, _chain: &ChainContext) -> Result<Arc<dyn CosmosRpc>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.rpc.clone())
    }
}

impl ClientConnector<dyn TonRpc> for FakeConnector<FakeTonRpc> {
    fn connect(&self, _chain: &ChainContext) -> Result<Arc<dyn TonRpc>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.rpc.clone())
    }
}
