use tic_common::{Coin, TransferError};
use tic_constants::ChainContext;
use tic_keystore::{Address, Result};

use crate::address::AtomAddress;
use crate::rpc::{AccountInfo, CosmosRpc};

/// Snapshot of an account taken before building a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmosAccount {
    pub address: String,
    pub info: AccountInfo,
    pub balances: Vec<Coin>,
}

impl CosmosAccount {
    /// Balance in `denom`, zero when the account holds none.
    pub fn balance_of(&self, denom: &str) -> u128 {
        self.balances
            .iter()
            .filter(|coin| coin.denom == denom)
            .filter_map(|coin| coin.amount.parse::<u128>().ok())
            .sum()
    }
}

pub async fn fetch_account(
    address: &str,
    chain: &ChainContext,
    rpc: &dyn CosmosRpc,
) -> Result<CosmosAccount> {
    tic_ensure!(
        AtomAddress::is_valid(address, chain),
        TransferError::InvalidAddress
    );
    let info = rpc.get_account_info(address).await?;
    let balances = rpc.get_balances(address).await?;
    Ok(CosmosAccount {
        address: address.to_string(),
        info,
        balances,
    })
}

/// Re-reads the account and fails when its sequence is no longer `expected`.
pub async fn ensure_sequence(
    address: &str,
    expected: u64,
    rpc: &dyn CosmosRpc,
) -> Result<AccountInfo> {
    let info = rpc.get_account_info(address).await?;
    if info.sequence != expected {
        log::warn!(
            "sequence of {} moved from {} to {}",
            address,
            expected,
            info.sequence
        );
        return Err(TransferError::StaleSequenceNumber.into());
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MockCosmosRpc;
    use tic_common::transfer_error;
    use tic_constants::{ChainRegistry, TEST_COSMOS_ADDRESS, TEST_PRIVATE_KEY_OSMO_ADDRESS};

    #[tokio::test]
    async fn test_fetch_account() {
        let hub = ChainRegistry::default().lookup("cosmoshub").unwrap();
        let mut rpc = MockCosmosRpc::new();
        rpc.expect_get_account_info()
            .withf(|address| address == TEST_COSMOS_ADDRESS)
            .returning(|_| {
                Ok(AccountInfo {
                    account_number: 42,
                    sequence: 9,
                })
            });
        rpc.expect_get_balances().returning(|_| {
            Ok(vec![
                Coin {
                    denom: "uatom".to_string(),
                    amount: "1500".to_string(),
                },
                Coin {
                    denom: "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
                        .to_string(),
                    amount: "3".to_string(),
                },
            ])
        });

        let account = fetch_account(TEST_COSMOS_ADDRESS, &hub, &rpc).await.unwrap();
        assert_eq!(account.info.account_number, 42);
        assert_eq!(account.info.sequence, 9);
        assert_eq!(account.balance_of("uatom"), 1500);
        assert_eq!(account.balance_of("uosmo"), 0);
    }

    #[tokio::test]
    async fn test_fetch_account_wrong_chain() {
        let hub = ChainRegistry::default().lookup("cosmoshub").unwrap();
        let rpc = MockCosmosRpc::new();
        let err = fetch_account(TEST_PRIVATE_KEY_OSMO_ADDRESS, &hub, &rpc)
            .await
            .unwrap_err();
        assert_eq!(transfer_error(&err), Some(&TransferError::InvalidAddress));
    }

    #[tokio::test]
    async fn test_ensure_sequence() {
        let mut rpc = MockCosmosRpc::new();
        rpc.expect_get_account_info().returning(|_| {
            Ok(AccountInfo {
                account_number: 1,
                sequence: 4,
            })
        });
        assert_eq!(
            ensure_sequence(TEST_COSMOS_ADDRESS, 4, &rpc)
                .await
                .unwrap()
                .sequence,
            4
        );
        let err = ensure_sequence(TEST_COSMOS_ADDRESS, 3, &rpc)
            .await
            .unwrap_err();
        assert_eq!(
            transfer_error(&err),
            Some(&TransferError::StaleSequenceNumber)
        );
    }
}
