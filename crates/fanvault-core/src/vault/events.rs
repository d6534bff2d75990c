//! Produced records: one observable, ordered entry per completed operation.

use crate::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    StageUnlocked {
        stage: u8,
        cumulative_stake: u128,
    },
    Minted {
        minter: AccountId,
        qty: u128,
        collateral: u128,
        fee: u128,
        stage: u8,
        peg: u128,
    },
    Redeemed {
        redeemer: AccountId,
        qty: u128,
        collateral_returned: u128,
    },
    ContractionTriggered {
        total_supply: u128,
        cap: u128,
        pending: u128,
        deadline: Timestamp,
    },
    ForcedBurnExecuted {
        tokens_burned: u128,
        collateral_written_off: u128,
        remaining_pending: u128,
    },
    LiquidationExecuted {
        liquidator: AccountId,
        payment: u128,
        collateral_injected: u128,
        tokens_removed: u128,
        bounty: u128,
        creator_penalty: u128,
    },
    CreatorWithdrawal {
        creator: AccountId,
        amount: u128,
    },
}
