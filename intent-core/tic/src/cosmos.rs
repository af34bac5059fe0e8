use std::sync::Arc;

use tic_atom::{
    build_sign_doc, ensure_sequence, fetch_account, sign_with, AtomAddress, CosmosFeeEstimator,
    CosmosIntentBuilder, CosmosRpc, CosmosSignedResult, CosmosWalletSigner,
};
use tic_common::{Clock, FeeEstimate, SystemClock, TransferError, TransferIntent, TransferRequest};
use tic_constants::{
    registry_snapshot, transfer_policy, ChainContext, ChainRegistry, ChainType, TransferPolicy,
};
use tic_keystore::Address;

use crate::cache::{ClientCache, ClientConnector};
use crate::session::TransferSession;
use crate::Result;

/// Intent and fee computed together. Signing consumes it, so the fee that
/// was shown is the fee of the transaction that gets signed.
#[derive(Debug)]
pub struct PreparedTransfer {
    pub intent: TransferIntent,
    pub fee: FeeEstimate,
    generation: u64,
    chain: ChainContext,
    source_address: String,
    memo: String,
    public_key: Vec<u8>,
    account_number: u64,
    sequence: u64,
}

impl PreparedTransfer {
    pub fn chain(&self) -> &ChainContext {
        &self.chain
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct CosmosTransferService {
    registry: ChainRegistry,
    policy: TransferPolicy,
    clock: Arc<dyn Clock>,
    clients: ClientCache<dyn CosmosRpc>,
    session: TransferSession,
}

impl CosmosTransferService {
    pub fn new(
        registry: ChainRegistry,
        policy: TransferPolicy,
        clock: Arc<dyn Clock>,
        connector: Box<dyn ClientConnector<dyn CosmosRpc>>,
    ) -> Self {
        CosmosTransferService {
            registry,
            policy,
            clock,
            clients: ClientCache::new(connector),
            session: TransferSession::new(),
        }
    }

    /// Service over the process-wide registry and policy.
    pub fn from_global(connector: Box<dyn ClientConnector<dyn CosmosRpc>>) -> Self {
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

    pub fn clients(&self) -> &ClientCache<dyn CosmosRpc> {
        &self.clients
    }

    /// Builds the intent for `request` on `chain_name` and simulates it.
    ///
    /// Returns `None` when another request started while this one was in
    /// flight.
    pub async fn build_and_estimate(
        &self,
        chain_name: &str,
        request: &TransferRequest,
        public_key: &[u8],
    ) -> Result<Option<PreparedTransfer>> {
        let generation = self.session.begin();
        let prepared = self
            .prepare(generation, chain_name, request, public_key)
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
    ) -> Result<PreparedTransfer> {
        let chain = self.registry.require(chain_name)?;
        tic_ensure!(
            chain.chain_type == ChainType::Cosmos,
            TransferError::UnknownChain
        );
        let source = AtomAddress::from_public_key(public_key, &chain)?;
        tic_ensure!(
            source.as_str() == request.source_address,
            TransferError::InvalidAddress
        );

        let rpc = self.clients.get_or_connect(&chain)?;
        let account = fetch_account(&request.source_address, &chain, rpc.as_ref()).await?;
        let intent = CosmosIntentBuilder::new(&self.registry, &self.policy, self.clock.as_ref())
            .build(request, &chain, rpc.as_ref())
            .await?;
        let fee = CosmosFeeEstimator::new(&self.policy)
            .estimate(
                &chain,
                &intent,
                &request.memo,
                public_key,
                &account.info,
                rpc.as_ref(),
            )
            .await?;
        log::info!(
            "prepared {} on {}: {} {}",
            intent.kind(),
            chain.chain_id,
            fee.amount,
            fee.denom
        );

        Ok(PreparedTransfer {
            intent,
            fee,
            generation,
            chain,
            source_address: request.source_address.clone(),
            memo: request.memo.clone(),
            public_key: public_key.to_vec(),
            account_number: account.info.account_number,
            sequence: account.info.sequence,
        })
    }

    /// Signs `prepared` after checking it is still the latest request and
    /// that the account sequence did not move.
    pub async fn sign(
        &self,
        prepared: PreparedTransfer,
        signer: &dyn CosmosWalletSigner,
    ) -> Result<CosmosSignedResult> {
        self.session.ensure_current(prepared.generation)?;
        let rpc = self.clients.get_or_connect(&prepared.chain)?;
        ensure_sequence(&prepared.source_address, prepared.sequence, rpc.as_ref()).await?;

        let sign_doc = build_sign_doc(
            &prepared.chain,
            &prepared.intent,
            &prepared.memo,
            &prepared.fee,
            &prepared.public_key,
            prepared.account_number,
            prepared.sequence,
        )?;
        sign_with(signer, &prepared.source_address, sign_doc).await
    }
}
