//! Consumed collaborator interfaces.
//!
//! The core depends on these seams and does not implement them: the aura
//! oracle, the fungible-token ledger the vault is sole minter/burner for,
//! the fee-collection sink, and the native-value payment rail. Any failure
//! a collaborator signals is fatal to the enclosing vault operation, which
//! unwinds to its pre-state.
//!
//! Atomicity contract for implementors: the engine commits its own state
//! before issuing outbound transfers, so a collaborator that re-enters (it
//! cannot do so through the engine's own `&mut` handle, and the engine's
//! transaction flag rejects it regardless) observes a ledger whose
//! invariants already hold. Embeddings that need cross-system atomicity
//! should stage collaborator effects and commit them only after the engine
//! call returns `Ok`.

use crate::{AccountId, Result, Timestamp};

/// Live reputation-score feed for this vault's creator.
pub trait AuraOracle {
    /// Latest aura score. Conceptual range [0, 200]; the engine clamps
    /// rather than validating, so out-of-range values are safe to return.
    fn aura(&self) -> Result<u64>;

    /// Timestamp of the last score update. Carried on the interface for
    /// observers; the core itself never gates on staleness.
    fn last_update(&self) -> Result<Timestamp>;
}

/// The creator-token ledger. The vault is the sole authorized minter and
/// burner of its own token instance.
pub trait TokenLedger {
    fn mint(&mut self, to: AccountId, qty: u128) -> Result<()>;

    fn burn(&mut self, from: AccountId, qty: u128) -> Result<()>;

    /// Pulls `qty` tokens from `from` into `to`'s custody. Must fail (not
    /// silently no-op) when `from` lacks the balance or allowance.
    fn transfer_from(&mut self, from: AccountId, to: AccountId, qty: u128) -> Result<()>;
}

/// Receives mint fees. No return value beyond success/failure.
pub trait FeeSink {
    fn collect(&mut self, amount: u128) -> Result<()>;
}

/// Pushes native-value payments to arbitrary addresses (redemption
/// proceeds, liquidation bounty/penalty, creator withdrawal).
pub trait PaymentRail {
    fn pay(&mut self, to: AccountId, amount: u128) -> Result<()>;
}

/// Collaborator bundle passed into every engine operation.
///
/// Passing ports per call (rather than storing them) keeps the engine
/// `Clone` + serializable and guarantees the oracle is re-read on every
/// evaluation; there is no cached or stale peg.
pub struct Ports<'a> {
    pub oracle: &'a dyn AuraOracle,
    pub token: &'a mut dyn TokenLedger,
    pub fees: &'a mut dyn FeeSink,
    pub payments: &'a mut dyn PaymentRail,
}
