use tonforge_boc::{Cell, CellBuilder, Coins, TonAddress};

use crate::BuildError;

pub const LIQUID_TF_DEPOSIT_OP: u32 = 0x47d5_4391;
pub const LIQUID_TF_BURN_OP: u32 = 0x595f_07bc;
/// Application id appended to liquid-TF deposits.
pub const LIQUID_TF_APP_ID: u64 = 0x0000_0000_0005_b7ce;

pub const WHALES_DEPOSIT_OP: u32 = 0x7bcd_1fef;
pub const WHALES_WITHDRAW_OP: u32 = 0xda80_3efd;
/// Gas amount the whales pool expects inside deposit and withdraw payloads.
pub const WHALES_GAS: Coins = Coins::from_nano(100_000);

/// The three supported staking pool implementations. Selecting the wrong
/// kind for a pool produces a message its contract rejects, so every
/// per-kind difference lives in [`PoolSpec`] and nowhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StakingPool {
    LiquidTf,
    Whales,
    Tf,
}

/// Per-kind message constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSpec {
    pub deposit_op: u32,
    pub withdraw_op: u32,
    /// Coins attached on top of the stake (deposit) or as the whole carried
    /// value (withdraw) to cover pool-side gas.
    pub gas_reserve: Coins,
    /// Whether payloads carry the 64-bit query id.
    pub has_query_id: bool,
}

impl StakingPool {
    pub const fn spec(self) -> PoolSpec {
        match self {
            Self::LiquidTf => PoolSpec {
                deposit_op: LIQUID_TF_DEPOSIT_OP,
                withdraw_op: LIQUID_TF_BURN_OP,
                gas_reserve: Coins::from_nano(1_000_000_000),
                has_query_id: true,
            },
            Self::Whales => PoolSpec {
                deposit_op: WHALES_DEPOSIT_OP,
                withdraw_op: WHALES_WITHDRAW_OP,
                gas_reserve: Coins::from_nano(200_000_000),
                has_query_id: true,
            },
            Self::Tf => PoolSpec {
                deposit_op: 0,
                withdraw_op: 0,
                gas_reserve: Coins::ZERO,
                has_query_id: false,
            },
        }
    }
}

/// Builds the deposit body for a pool kind.
pub fn staking_deposit_body(pool: StakingPool, query_id: u64) -> Result<Cell, BuildError> {
    let spec = pool.spec();
    let mut b = CellBuilder::new();
    match pool {
        StakingPool::LiquidTf => {
            b.store_uint(spec.deposit_op as u64, 32)?;
            b.store_uint(query_id, 64)?;
            b.store_uint(LIQUID_TF_APP_ID, 64)?;
        }
        StakingPool::Whales => {
            b.store_uint(spec.deposit_op as u64, 32)?;
            b.store_uint(query_id, 64)?;
            b.store_coins(WHALES_GAS)?;
        }
        StakingPool::Tf => {
            // Text command: a zero opcode and the single-byte marker.
            b.store_uint(0, 32)?;
            b.store_slice(b"d")?;
        }
    }
    Ok(b.build())
}

/// Builds the withdraw body for a pool kind. `response` receives the burn
/// notification and refunds for the liquid-TF flavor.
pub fn staking_withdraw_body(
    pool: StakingPool,
    query_id: u64,
    amount: Coins,
    response: &TonAddress,
) -> Result<Cell, BuildError> {
    let spec = pool.spec();
    let mut b = CellBuilder::new();
    match pool {
        StakingPool::LiquidTf => {
            b.store_uint(spec.withdraw_op as u64, 32)?;
            b.store_uint(query_id, 64)?;
            b.store_coins(amount)?;
            b.store_address(response)?;
            // Custom payload: the two burn flags, wait-till-round-end unset
            // and fill-or-kill set.
            let mut flags = CellBuilder::new();
            flags.store_bit(false)?;
            flags.store_bit(true)?;
            b.store_maybe_ref(Some(flags.build()))?;
        }
        StakingPool::Whales => {
            b.store_uint(spec.withdraw_op as u64, 32)?;
            b.store_uint(query_id, 64)?;
            b.store_coins(WHALES_GAS)?;
            b.store_coins(amount)?;
        }
        StakingPool::Tf => {
            b.store_uint(0, 32)?;
            b.store_slice(b"w")?;
        }
    }
    Ok(b.build())
}
