use std::sync::Arc;

use tic_common::{Clock, FeeEstimate, SystemClock, TransferError, TransferIntent, TransferRequest};
use tic_constants::{
    registry_snapshot, transfer_policy, ChainContext, ChainRegistry, ChainType, TransferPolicy,
};
use tic_keystore::HashSigner;
use tic_ton::{
    sign_transfer, wallet_transfer, SeqnoTicket, TonFeeEstimator, TonIntentBuilder, TonRpc,
    TonSignedResult, TonWallet, WalletTransfer,
};

use crate::cache::{ClientCache, ClientConnector};
use crate::session::TransferSession;
use crate::Result;

/// Intent, fee and the seqno ticket they were built against. Not `Clone`:
/// the ticket is redeemed exactly once by `TonTransferService::sign`.
#[derive(Debug)]
pub struct PreparedTransfer {
    pub intent: TransferIntent,
    pub fee: FeeEstimate,
    generation: u64,
    chain: ChainContext,
    wallet: TonWallet,
    transfer: WalletTransfer,
    ticket: SeqnoTicket,
}

impl PreparedTransfer {
    pub fn chain(&self) -> &ChainContext {
        &self.chain
    }

    pub fn wallet(&self) -> &TonWallet {
        &self.wallet
    }

    pub fn seqno(&self) -> u32 {
        self.ticket.seqno()
    }

    pub fn valid_until(&self) -> u32 {
        self.transfer.valid_until
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct TonTransferService {
    registry: ChainRegistry,
    policy: TransferPolicy,
    clock: Arc<dyn Clock>,
    clients: ClientCache<dyn TonRpc>,
    session: TransferSession,
}

impl TonTransferService {
    pub fn new(
        registry: ChainRegistry,
        policy: TransferPolicy,
        clock: Arc<dyn Clock>,
        connector: Box<dyn ClientConnector<dyn TonRpc>>,
    ) -> Self {
        TonTransferService {
            registry,
            policy,
            clock,
            clients: ClientCache::new(connector),
            session: TransferSession::new(),
        }
    }

    pub fn from_global(connector: Box<dyn ClientConnector<dyn TonRpc>>) -> Self {
        Self::new(
            registry_snapshot(),
            transfer_policy(),
            Arc::new(SystemClock),
            connector,
        )
    }

    pub fn session(&self) -> &TransferSession {
        &self.session
    }

    pub fn clients(&self) -> &ClientCache<dyn TonRpc> {
        &self.clients
    }

    pub async fn build_and_estimate(
        &self,
        chain_name: &str,
        request: &TransferRequest,
        public_key: &[u8],
    ) -> Result<Option<PreparedTransfer>> {
        self.build_and_estimate_with_mode(
            chain_name,
            request,
            public_key,
            self.policy.default_send_mode,
        )
        .await
    }

    /// Reads the seqno, builds the intent and dry-runs the wallet message
    /// that will later be signed. `None` means a newer request superseded
    /// this one while it was in flight.
    pub async fn build_and_estimate_with_mode(
        &self,
        chain_name: &str,
        request: &TransferRequest,
        public_key: &[u8],
        send_mode: u8,
    ) -> Result<Option<PreparedTransfer>> {
        let generation = self.session.begin();
        let prepared = self
            .prepare(generation, chain_name, request, public_key, send_mode)
            .await;
        if !self.session.is_current(generation) {
            match &prepared {
                Ok(prepared) => log::info!(
                    "dropping {} estimate of generation {}",
                    prepared.intent.kind(),
                    generation
                ),
                Err(err) => log::info!("dropping failed generation {}: {}", generation, err),
            }
            return Ok(None);
        }
        prepared.map(Some)
    }

    async fn prepare(
        &self,
        generation: u64,
        chain_name: &str,
        request: &TransferRequest,
        public_key: &[u8],
        send_mode: u8,
    ) -> Result<PreparedTransfer> {
        let chain = self.ton_chain(chain_name)?;
        let wallet = TonWallet::from_public_key(public_key, &chain)?;

        let rpc = self.clients.get_or_connect(&chain)?;
        let ticket = SeqnoTicket::fetch(&wallet.address, rpc.as_ref()).await?;
        let intent = TonIntentBuilder::new(&self.policy)
            .build_with_mode(request, &wallet, send_mode, rpc.as_ref())
            .await?;

        let valid_until = WalletTransfer::expiry(
            ticket.seqno(),
            self.clock.now_secs(),
            self.policy.ton_message_ttl_secs,
        );
        let transfer = wallet_transfer(&wallet, &intent, ticket.seqno(), valid_until)?;
        let fee = TonFeeEstimator
            .estimate(&chain, &wallet, &transfer, ticket.deployed(), rpc.as_ref())
            .await?;
        log::info!(
            "prepared {} on {} at seqno {}: {} {}",
            intent.kind(),
            chain.chain_name,
            ticket.seqno(),
            fee.amount,
            fee.denom
        );

        Ok(PreparedTransfer {
            intent,
            fee,
            generation,
            chain,
            wallet,
            transfer,
            ticket,
        })
    }

    /// Redeems the seqno ticket and signs the external message with `signer`.
    pub async fn sign(
        &self,
        prepared: PreparedTransfer,
        signer: &dyn HashSigner,
    ) -> Result<TonSignedResult> {
        self.session.ensure_current(prepared.generation)?;
        let PreparedTransfer {
            chain,
            wallet,
            transfer,
            ticket,
            ..
        } = prepared;

        let rpc = self.clients.get_or_connect(&chain)?;
        let deployed = ticket.deployed();
        ticket.redeem(rpc.as_ref()).await?;
        sign_transfer(&wallet, &transfer, deployed, signer)
    }

    fn ton_chain(&self, chain_name: &str) -> Result<ChainContext> {
        let chain = self.registry.require(chain_name)?;
        tic_ensure!(
            chain.chain_type == ChainType::Ton,
            TransferError::UnknownChain
        );
        Ok(chain)
    }
}
