//! The vault ledger kernel.
//!
//! Layering, leaves first: `math` (WAD fixed point) underpins `curve`
//! (peg / supply cap) and `health` (collateralization ratio); `book` holds
//! per-owner FIFO positions; `engine` orchestrates mint/redeem, stage
//! progression, forced contraction, and liquidation against the collaborator
//! seams in `ports`. `invariants` re-derives the ledger identities from the
//! position book and is wired into every test sequence.

pub mod book;
pub mod bounds;
pub mod curve;
pub mod engine;
pub mod events;
pub mod health;
pub mod invariants;
pub mod math;
pub mod ports;
pub mod stages;


pub use book::{Position, PositionBook};
pub use bounds::RuntimeBounds;
pub use engine::{
    ContractionOutcome, ForcedBurnOutcome, LiquidationOutcome, MintOutcome, RedeemOutcome,
    StageOutcome, VaultConfig, VaultEngine, WithdrawOutcome,
};
pub use events::VaultEvent;
pub use health::{Health, LIQ_CR, MIN_CR};
pub use invariants::{InvariantId, InvariantViolation};
pub use math::WAD;
pub use ports::{AuraOracle, FeeSink, PaymentRail, Ports, TokenLedger};
pub use stages::{StageConfig, StageSchedule};
