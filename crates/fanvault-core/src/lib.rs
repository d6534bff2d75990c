//! fanvault-core: a collateralized-minting vault ledger.
//!
//! Fans deposit a base asset to mint a creator-specific token whose price
//! ("peg") and maximum supply track a reputation score ("aura") supplied by
//! an external oracle. The crate is an IO-free, deterministic state machine:
//! storage, networking, time, and actual asset movement live behind the
//! collaborator traits in [`vault::ports`]; the engine only records ledger
//! state and drives those collaborators.
//!
//! Design goals:
//! - Invalid states unrepresentable where practical (validated configs,
//!   bounded runtime state, typed failure taxonomy)
//! - Deterministic and bounded arithmetic (256-bit intermediates, floor
//!   division, checked everything)
//! - Fail-closed: every public operation either commits fully or leaves the
//!   ledger untouched

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub mod vault;

/// Seconds since the epoch, supplied by the caller on every time-sensitive
/// operation. The engine never reads a clock.
pub type Timestamp = u64;

/// Opaque 32-byte account identifier assigned by the embedding environment.
///
/// Serialized as a hex string so it can key JSON maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub [u8; 32]);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| D::Error::custom("account id must be 32 bytes"))?;
        Ok(AccountId(arr))
    }
}

/// Failure taxonomy for vault operations.
///
/// Every variant is operation-local: the enclosing operation aborts with no
/// partial effect (the single documented exception is
/// [`vault::engine::VaultEngine::unlock_next_stage`], which retains the
/// deposit on a stage-requirement shortfall).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    // Authorization / sequencing
    #[error("caller is not the vault creator")]
    NotCreator,

    #[error("vault is paused")]
    Paused,

    #[error("mutating operation re-entered while another call was in progress")]
    Reentrancy,

    #[error("token binding already set")]
    TokenAlreadySet,

    #[error("token binding not set")]
    TokenNotSet,

    // Funds / collateral
    #[error("amount must be > 0")]
    ZeroAmount,

    #[error("insufficient payment: required {required}, supplied {supplied}")]
    InsufficientPayment { required: u128, supplied: u128 },

    #[error("insufficient holdings: requested {requested}, live {held}")]
    InsufficientHoldings { requested: u128, held: u128 },

    #[error("post-operation health {health} below the minimum ratio")]
    HealthBelowMinimum { health: u128 },

    // Capacity
    #[error("stage {stage} mint cap {cap} exceeded by projected supply {projected}")]
    StageCapExceeded { stage: u8, cap: u128, projected: u128 },

    #[error("aura-derived supply cap {cap} exceeded by projected supply {projected}")]
    SupplyCapExceeded { cap: u128, projected: u128 },

    // Stage gating
    #[error("vault is still bootstrapping (stage 0)")]
    StageLocked,

    #[error("vault already bootstrapped (stage >= 1)")]
    AlreadyBootstrapped,

    #[error("no further stage is configured")]
    NoNextStage,

    #[error("cumulative stake {cumulative} short of stage requirement {required} (deposit retained)")]
    StageRequirementShort { required: u128, cumulative: u128 },

    // Timing
    #[error("no forced contraction pending")]
    NothingPending,

    #[error("grace period not elapsed: deadline {deadline}, now {now}")]
    GraceNotElapsed { deadline: Timestamp, now: Timestamp },

    // Liquidation
    #[error("vault health {health} is not below the liquidation threshold")]
    NotLiquidatable { health: u128 },

    #[error("liquidation would remove no tokens")]
    LiquidationTooSmall,

    // Configuration / bounds
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("runtime bound exceeded: {0}")]
    BoundExceeded(String),

    // Collaborators
    #[error("external call failed: {0}")]
    External(String),

    // Arithmetic (fatal input errors)
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

pub type Result<T> = std::result::Result<T, VaultError>;
