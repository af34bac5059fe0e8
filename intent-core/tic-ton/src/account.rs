use tic_common::TransferError;
use tic_keystore::Result;
use tonlib_core::types::TonAddress as TonAddressLib;

use crate::jetton::{jetton_balance, resolve_jetton_wallet};
use crate::rpc::TonRpc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TonAccount {
    pub address: TonAddressLib,
    pub balance: u128,
    pub deployed: bool,
    pub seqno: u32,
    /// Balance of the configured jetton, `None` when no master was given.
    pub jetton_balance: Option<u128>,
}

pub async fn fetch_account(
    address: &TonAddressLib,
    jetton_master: Option<&TonAddressLib>,
    rpc: &dyn TonRpc,
) -> Result<TonAccount> {
    let raw = address.to_hex();
    let balance = rpc.get_balance(&raw).await?;
    let deployed = rpc.is_deployed(&raw).await?;
    let seqno = if deployed { rpc.get_seqno(&raw).await? } else { 0 };

    let jetton_balance = match jetton_master {
        Some(master) => {
            let jetton_wallet = resolve_jetton_wallet(master, address, rpc).await?;
            if rpc.is_deployed(&jetton_wallet.to_hex()).await? {
                Some(jetton_balance(&jetton_wallet, rpc).await?)
            } else {
                Some(0)
            }
        }
        None => None,
    };

    Ok(TonAccount {
        address: *address,
        balance,
        deployed,
        seqno,
        jetton_balance,
    })
}

/// Seqno read right before building a transfer. It is consumed by signing and
/// cannot be copied, a retry has to fetch a new one.
#[derive(Debug)]
pub struct SeqnoTicket {
    address: TonAddressLib,
    seqno: u32,
    deployed: bool,
}

impl SeqnoTicket {
    pub async fn fetch(address: &TonAddressLib, rpc: &dyn TonRpc) -> Result<SeqnoTicket> {
        let (seqno, deployed) = current_seqno(address, rpc).await?;
        log::debug!("seqno of {} is {}", address.to_hex(), seqno);
        Ok(SeqnoTicket {
            address: *address,
            seqno,
            deployed,
        })
    }

    pub fn seqno(&self) -> u32 {
        self.seqno
    }

    /// An undeployed wallet sends its `StateInit` with the first message.
    pub fn deployed(&self) -> bool {
        self.deployed
    }

    /// Re-reads the seqno and gives it back only when nothing moved on chain.
    pub async fn redeem(self, rpc: &dyn TonRpc) -> Result<u32> {
        let (seqno, _) = current_seqno(&self.address, rpc).await?;
        if seqno != self.seqno {
            log::warn!(
                "seqno of {} moved from {} to {}",
                self.address.to_hex(),
                self.seqno,
                seqno
            );
            return Err(TransferError::StaleSequenceNumber.into());
        }
        Ok(seqno)
    }
}

async fn current_seqno(address: &TonAddressLib, rpc: &dyn TonRpc) -> Result<(u32, bool)> {
    let raw = address.to_hex();
    if rpc.is_deployed(&raw).await? {
        Ok((rpc.get_seqno(&raw).await?, true))
    } else {
        Ok((0, false))
    }
}
