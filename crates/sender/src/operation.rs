use tonforge_boc::{Coins, TonAddress};
use tonforge_messages::{
    dns_renew_body, jetton_transfer_body, nft_transfer_body, staking_deposit_body,
    staking_withdraw_body, transfer_payload, BuildError, JettonTransfer, NftTransfer, StakingPool,
    TransferRequest, DNS_LINK_AMOUNT, JETTON_FORWARD_AMOUNT, JETTON_TRANSFER_ATTACHED,
    NFT_TRANSFER_ATTACHED,
};

/// Value attached to a nominator-pool withdraw request; the pool has no
/// gas reserve of its own, so the attached coins cover its processing fee
/// and the payout message back.
pub const TF_WITHDRAW_ATTACHED: Coins = Coins::from_nano(200_000_000);

/// One user-initiated operation, before it is lowered into a wire-level
/// transfer. Everything the message builders need except the query id,
/// which the controller stamps per attempt.
#[derive(Clone, Debug)]
pub enum Operation {
    /// Plain coin transfer with an optional text comment.
    Transfer {
        destination: TonAddress,
        amount: Coins,
        bounce: bool,
        comment: Option<String>,
    },
    /// Fungible-token transfer, addressed to the sender's own token wallet
    /// contract.
    JettonTransfer {
        token_wallet: TonAddress,
        amount: Coins,
        destination: TonAddress,
        comment: Option<String>,
    },
    /// NFT ownership transfer, addressed to the item contract.
    NftTransfer {
        nft_item: TonAddress,
        new_owner: TonAddress,
        comment: Option<String>,
    },
    StakeDeposit {
        pool: StakingPool,
        pool_address: TonAddress,
        amount: Coins,
    },
    StakeWithdraw {
        pool: StakingPool,
        pool_address: TonAddress,
        amount: Coins,
    },
    DnsRenew { domain_address: TonAddress },
}

impl Operation {
    /// Short human label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::JettonTransfer { .. } => "jetton_transfer",
            Self::NftTransfer { .. } => "nft_transfer",
            Self::StakeDeposit { .. } => "stake_deposit",
            Self::StakeWithdraw { .. } => "stake_withdraw",
            Self::DnsRenew { .. } => "dns_renew",
        }
    }

    /// Lowers the operation into the wire-level transfer the wallet
    /// contract will relay. `owner` is the sending wallet's own address;
    /// it receives refunds and transfer notifications.
    pub fn to_transfer(
        &self,
        owner: &TonAddress,
        query_id: u64,
    ) -> Result<TransferRequest, BuildError> {
        match self {
            Self::Transfer { destination, amount, bounce, comment } => Ok(TransferRequest {
                destination: *destination,
                value: *amount,
                bounce: *bounce,
                payload: transfer_payload(comment.as_deref())?,
            }),
            Self::JettonTransfer { token_wallet, amount, destination, comment } => {
                let body = jetton_transfer_body(&JettonTransfer {
                    query_id,
                    amount: *amount,
                    destination,
                    response_destination: owner,
                    forward_amount: JETTON_FORWARD_AMOUNT,
                    comment: comment.as_deref(),
                })?;
                Ok(TransferRequest {
                    destination: *token_wallet,
                    value: JETTON_TRANSFER_ATTACHED,
                    bounce: true,
                    payload: Some(body),
                })
            }
            Self::NftTransfer { nft_item, new_owner, comment } => {
                let body = nft_transfer_body(&NftTransfer {
                    query_id,
                    new_owner,
                    response_destination: owner,
                    forward_amount: JETTON_FORWARD_AMOUNT,
                    comment: comment.as_deref(),
                })?;
                Ok(TransferRequest {
                    destination: *nft_item,
                    value: NFT_TRANSFER_ATTACHED,
                    bounce: true,
                    payload: Some(body),
                })
            }
            Self::StakeDeposit { pool, pool_address, amount } => {
                let body = staking_deposit_body(*pool, query_id)?;
                // The stake rides along with the pool's gas reserve; the
                // contract books the reserve separately.
                let value =
                    Coins::from_nano(amount.nano().saturating_add(pool.spec().gas_reserve.nano()));
                Ok(TransferRequest {
                    destination: *pool_address,
                    value,
                    bounce: true,
                    payload: Some(body),
                })
            }
            Self::StakeWithdraw { pool, pool_address, amount } => {
                let body = staking_withdraw_body(*pool, query_id, *amount, owner)?;
                Ok(TransferRequest {
                    destination: *pool_address,
                    value: withdraw_value(*pool),
                    bounce: true,
                    payload: Some(body),
                })
            }
            Self::DnsRenew { domain_address } => Ok(TransferRequest {
                destination: *domain_address,
                value: DNS_LINK_AMOUNT,
                bounce: true,
                payload: Some(dns_renew_body(query_id)?),
            }),
        }
    }
}

/// Coins carried by a withdraw request: the pool's gas reserve, or the
/// fixed nominator-pool fee when the pool table reserves nothing.
fn withdraw_value(pool: StakingPool) -> Coins {
    let reserve = pool.spec().gas_reserve;
    if reserve == Coins::ZERO {
        TF_WITHDRAW_ATTACHED
    } else {
        reserve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonforge_boc::CellSlice;
    use tonforge_messages::{JETTON_TRANSFER_OP, WHALES_WITHDRAW_OP};

    const OWNER: TonAddress = TonAddress::new(0, [0x01; 32]);
    const DEST: TonAddress = TonAddress::new(0, [0x02; 32]);

    #[test]
    fn plain_transfer_keeps_amount_and_bounce() {
        let op = Operation::Transfer {
            destination: DEST,
            amount: Coins::from_tons(1),
            bounce: false,
            comment: None,
        };
        let transfer = op.to_transfer(&OWNER, 0).unwrap();
        assert_eq!(transfer.destination, DEST);
        assert_eq!(transfer.value, Coins::from_tons(1));
        assert!(!transfer.bounce);
        assert!(transfer.payload.is_none());
    }

    #[test]
    fn jetton_transfer_attaches_gas_and_routes_refunds_to_owner() {
        let token_wallet = TonAddress::new(0, [0x03; 32]);
        let op = Operation::JettonTransfer {
            token_wallet,
            amount: Coins::from_nano(250),
            destination: DEST,
            comment: None,
        };
        let transfer = op.to_transfer(&OWNER, 7).unwrap();
        assert_eq!(transfer.destination, token_wallet);
        assert_eq!(transfer.value, JETTON_TRANSFER_ATTACHED);
        assert!(transfer.bounce);

        let payload = transfer.payload.unwrap();
        let mut s = CellSlice::new(&payload);
        assert_eq!(s.load_uint(32).unwrap(), JETTON_TRANSFER_OP as u64);
        assert_eq!(s.load_uint(64).unwrap(), 7);
        assert_eq!(s.load_coins().unwrap(), Coins::from_nano(250));
        assert_eq!(s.load_address().unwrap(), DEST);
        assert_eq!(s.load_address().unwrap(), OWNER);
    }

    #[test]
    fn deposit_value_includes_the_pool_reserve() {
        let op = Operation::StakeDeposit {
            pool: StakingPool::Whales,
            pool_address: DEST,
            amount: Coins::from_tons(10),
        };
        let transfer = op.to_transfer(&OWNER, 1).unwrap();
        assert_eq!(
            transfer.value,
            Coins::from_nano(10_000_000_000 + 200_000_000)
        );
    }

    #[test]
    fn withdraw_carries_the_reserve_only() {
        let op = Operation::StakeWithdraw {
            pool: StakingPool::Whales,
            pool_address: DEST,
            amount: Coins::from_nano(500_000_000),
        };
        let transfer = op.to_transfer(&OWNER, 9).unwrap();
        assert_eq!(transfer.value, Coins::from_nano(200_000_000));

        let payload = transfer.payload.unwrap();
        let mut s = CellSlice::new(&payload);
        assert_eq!(s.load_uint(32).unwrap(), WHALES_WITHDRAW_OP as u64);
    }

    #[test]
    fn nominator_withdraw_attaches_the_fixed_fee() {
        let op = Operation::StakeWithdraw {
            pool: StakingPool::Tf,
            pool_address: DEST,
            amount: Coins::ZERO,
        };
        let transfer = op.to_transfer(&OWNER, 0).unwrap();
        assert_eq!(transfer.value, TF_WITHDRAW_ATTACHED);
    }

    #[test]
    fn dns_renew_uses_the_link_amount() {
        let op = Operation::DnsRenew { domain_address: DEST };
        let transfer = op.to_transfer(&OWNER, 4).unwrap();
        assert_eq!(transfer.value, DNS_LINK_AMOUNT);
        assert!(transfer.payload.is_some());
    }
}
