//! The vault engine: mint/redeem orchestration, stage progression, forced
//! contraction, and liquidation over the position book.
//!
//! Every public operation is a single atomic unit: the engine checkpoints
//! itself on entry and restores the checkpoint on any error, so a failed
//! operation leaves no partial effect. Within an operation the order is
//! checks, then effects (ledger commit), then interactions (collaborator
//! calls). By the time an external transfer fires, the ledger already
//! balances, and a transaction-scoped flag rejects re-entrant invocation
//! outright.
//!
//! The one deliberate exception to all-or-nothing is
//! [`VaultEngine::unlock_next_stage`]: a deposit that falls short of the
//! next stage's requirement is retained (never refunded) while the call
//! still reports the shortfall as an error.

use tracing::debug;

use crate::{AccountId, Result, Timestamp, VaultError};
use serde::{Deserialize, Serialize};

use super::book::{Position, PositionBook};
use super::bounds::RuntimeBounds;
use super::curve;
use super::events::VaultEvent;
use super::health::{self, LIQ_CR, MIN_CR};
use super::math::{self, WAD};
use super::ports::Ports;
use super::stages::StageSchedule;

/// Mint fee as a fraction of required collateral (0.005 in WAD).
pub const MINT_FEE: u128 = 5_000_000_000_000_000;

/// Grace window between a contraction trigger and its first execution.
pub const GRACE_PERIOD_SECS: u64 = 24 * 60 * 60;

/// Smallest accepted liquidation payment (0.01 base units in WAD).
pub const MIN_LIQUIDATION_PAYMENT: u128 = 10_000_000_000_000_000;

/// Liquidator bounty as a fraction of the payment (0.01 in WAD).
pub const LIQUIDATION_BOUNTY: u128 = 10_000_000_000_000_000;

/// Creator penalty rate on staked collateral (0.10 in WAD).
pub const CREATOR_PENALTY: u128 = 100_000_000_000_000_000;

/// Creator penalty cap as a fraction of the liquidation payment (0.20 in WAD).
pub const PENALTY_PAYMENT_CAP: u128 = 200_000_000_000_000_000;

/// Immutable per-vault wiring, fixed at creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    /// The creator whose stake gates stage progression.
    pub creator: AccountId,
    /// Where mint fees are forwarded (identity for the record; the actual
    /// transfer goes through the [`super::ports::FeeSink`] port).
    pub fee_sink: AccountId,
    /// The vault's own custody identity at the token ledger.
    pub vault_account: AccountId,
    /// Reference supply for the aura-derived cap formula, WAD tokens.
    pub base_cap: u128,
    pub schedule: StageSchedule,
}

impl VaultConfig {
    fn validate(&self) -> Result<()> {
        if self.base_cap == 0 {
            return Err(VaultError::InvalidConfig("base_cap must be > 0".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: u8,
    pub cumulative_stake: u128,
    pub unlocked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintOutcome {
    pub qty: u128,
    /// Collateral recorded for the new position (payment minus fee; any
    /// excess beyond the requirement is retained, not refunded).
    pub collateral: u128,
    pub fee: u128,
    pub peg: u128,
    pub stage: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedeemOutcome {
    pub qty: u128,
    pub collateral_returned: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractionOutcome {
    pub cap: u128,
    pub pending: u128,
    pub deadline: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForcedBurnOutcome {
    pub tokens_burned: u128,
    pub collateral_written_off: u128,
    pub remaining_pending: u128,
    /// Whether the contraction returned to idle with this batch.
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidationOutcome {
    pub tokens_removed: u128,
    pub collateral_injected: u128,
    pub bounty: u128,
    pub creator_penalty: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub amount: u128,
    pub remaining_creator_collateral: u128,
}

/// One creator's vault: the ledger of collateral, supply, stages, and
/// positions, plus the forced-contraction state machine.
///
/// Deterministic and IO-free; collaborators arrive per call via
/// [`Ports`], so the oracle is re-read on every evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultEngine {
    config: VaultConfig,
    bounds: RuntimeBounds,

    token: Option<AccountId>,
    paused: bool,
    /// Transaction-scoped reentrancy flag; set for the duration of every
    /// mutating public operation.
    entered: bool,

    stage: u8,
    creator_collateral: u128,
    fan_collateral: u128,
    /// Always `creator_collateral + fan_collateral`; maintained
    /// incrementally, never recomputed from positions.
    total_collateral: u128,
    total_supply: u128,

    /// Forced-contraction state: zero when idle.
    pending_forced_burn: u128,
    forced_burn_deadline: Timestamp,
    /// Owner-list index where the next execute batch resumes.
    forced_burn_cursor: usize,

    book: PositionBook,
    events: Vec<VaultEvent>,
}

impl VaultEngine {
    pub fn new(config: VaultConfig) -> Result<VaultEngine> {
        Self::new_with_bounds(config, RuntimeBounds::default())
    }

    pub fn new_with_bounds(config: VaultConfig, bounds: RuntimeBounds) -> Result<VaultEngine> {
        config.validate()?;
        bounds.validate()?;
        Ok(VaultEngine {
            config,
            bounds,
            token: None,
            paused: false,
            entered: false,
            stage: 0,
            creator_collateral: 0,
            fan_collateral: 0,
            total_collateral: 0,
            total_supply: 0,
            pending_forced_burn: 0,
            forced_burn_deadline: 0,
            forced_burn_cursor: 0,
            book: PositionBook::default(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn bounds(&self) -> RuntimeBounds {
        self.bounds
    }

    pub fn token(&self) -> Option<AccountId> {
        self.token
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn creator_collateral(&self) -> u128 {
        self.creator_collateral
    }

    pub fn fan_collateral(&self) -> u128 {
        self.fan_collateral
    }

    pub fn total_collateral(&self) -> u128 {
        self.total_collateral
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn pending_forced_burn(&self) -> u128 {
        self.pending_forced_burn
    }

    pub fn forced_burn_deadline(&self) -> Timestamp {
        self.forced_burn_deadline
    }

    pub fn book(&self) -> &PositionBook {
        &self.book
    }

    /// Ordered, append-only record of completed operations.
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    // ---- administrative observers (authorization lives in the embedding) ----

    /// Binds the token contract identity. Transitions from unset to set
    /// exactly once; a second call fails.
    pub fn bind_token(&mut self, token: AccountId) -> Result<()> {
        if self.token.is_some() {
            return Err(VaultError::TokenAlreadySet);
        }
        self.token = Some(token);
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    // ---- stage progression ----

    /// Creator-only. Only callable while `stage == 0`; credits the deposit
    /// to creator collateral and advances to stage 1 once the cumulative
    /// stake meets stage 1's requirement (never further in one call).
    /// Deposits that fall short are retained.
    pub fn bootstrap(&mut self, caller: AccountId, deposit: u128) -> Result<StageOutcome> {
        self.guarded(|eng| {
            if caller != eng.config.creator {
                return Err(VaultError::NotCreator);
            }
            if eng.stage != 0 {
                return Err(VaultError::AlreadyBootstrapped);
            }
            if deposit == 0 {
                return Err(VaultError::ZeroAmount);
            }
            let new_creator = math::add(eng.creator_collateral, deposit)?;
            let new_total = math::add(eng.total_collateral, deposit)?;

            // Commit.
            eng.creator_collateral = new_creator;
            eng.total_collateral = new_total;

            let unlocked = new_creator >= eng.config.schedule.required_stake(1);
            if unlocked {
                eng.stage = 1;
                eng.events.push(VaultEvent::StageUnlocked {
                    stage: 1,
                    cumulative_stake: new_creator,
                });
            }
            debug!(stake = %new_creator, unlocked, "bootstrap deposit applied");
            Ok(StageOutcome {
                stage: eng.stage,
                cumulative_stake: new_creator,
                unlocked,
            })
        })
    }

    /// Creator-only, `stage >= 1`. Credits the deposit, then requires the
    /// cumulative stake to meet the next stage's requirement; on a
    /// shortfall the deposit STAYS APPLIED (deposits are never refunded)
    /// and `StageRequirementShort` is returned with the stage unchanged.
    /// Stages advance by exactly one per call.
    ///
    /// A vault with no further configured stage rejects the call before
    /// accepting the deposit.
    pub fn unlock_next_stage(&mut self, caller: AccountId, deposit: u128) -> Result<StageOutcome> {
        if self.entered {
            return Err(VaultError::Reentrancy);
        }
        self.entered = true;
        let out = self.unlock_next_stage_inner(caller, deposit);
        self.entered = false;
        out
    }

    fn unlock_next_stage_inner(&mut self, caller: AccountId, deposit: u128) -> Result<StageOutcome> {
        // Rejections with no state change.
        if caller != self.config.creator {
            return Err(VaultError::NotCreator);
        }
        if self.stage == 0 {
            return Err(VaultError::StageLocked);
        }
        if deposit == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let next = self
            .stage
            .checked_add(1)
            .filter(|n| *n <= self.config.schedule.highest_stage())
            .ok_or(VaultError::NoNextStage)?;
        let new_creator = math::add(self.creator_collateral, deposit)?;
        let new_total = math::add(self.total_collateral, deposit)?;

        // Commit the deposit unconditionally.
        self.creator_collateral = new_creator;
        self.total_collateral = new_total;

        let required = self.config.schedule.required_stake(next);
        if new_creator < required {
            return Err(VaultError::StageRequirementShort {
                required,
                cumulative: new_creator,
            });
        }
        self.stage = next;
        self.events.push(VaultEvent::StageUnlocked {
            stage: next,
            cumulative_stake: new_creator,
        });
        debug!(stage = next, stake = %new_creator, "stage unlocked");
        Ok(StageOutcome {
            stage: next,
            cumulative_stake: new_creator,
            unlocked: true,
        })
    }

    // ---- mint / redeem ----

    /// Mints `qty` tokens to `caller` against `payment` of base-asset
    /// collateral.
    ///
    /// Preconditions: not paused, token bound, `stage >= 1`, `qty > 0`,
    /// `payment >= qty * peg * MIN_CR * (1 + MINT_FEE)`, and the projected
    /// supply within both the stage mint cap and the live aura cap (the
    /// tighter binds). Post-state health must still meet `MIN_CR` or the
    /// whole operation unwinds.
    ///
    /// Excess payment beyond the requirement plus fee is retained as extra
    /// position collateral, not refunded.
    pub fn mint(
        &mut self,
        ports: &mut Ports<'_>,
        caller: AccountId,
        qty: u128,
        payment: u128,
        now: Timestamp,
    ) -> Result<MintOutcome> {
        self.guarded(|eng| {
            if eng.paused {
                return Err(VaultError::Paused);
            }
            if eng.token.is_none() {
                return Err(VaultError::TokenNotSet);
            }
            if eng.stage == 0 {
                return Err(VaultError::StageLocked);
            }
            if qty == 0 {
                return Err(VaultError::ZeroAmount);
            }

            let aura = ports.oracle.aura()?;
            let peg = curve::peg(aura);
            let required = math::mul_wad(math::mul_wad(qty, peg)?, MIN_CR)?;
            let fee = math::mul_wad(required, MINT_FEE)?;
            let needed = math::add(required, fee)?;
            if payment < needed {
                return Err(VaultError::InsufficientPayment {
                    required: needed,
                    supplied: payment,
                });
            }

            let projected_supply = math::add(eng.total_supply, qty)?;
            let stage_cap = eng.config.schedule.mint_cap(eng.stage);
            if projected_supply > stage_cap {
                return Err(VaultError::StageCapExceeded {
                    stage: eng.stage,
                    cap: stage_cap,
                    projected: projected_supply,
                });
            }
            let aura_cap = curve::supply_cap(aura, eng.config.base_cap)?;
            if projected_supply > aura_cap {
                return Err(VaultError::SupplyCapExceeded {
                    cap: aura_cap,
                    projected: projected_supply,
                });
            }

            let collateral = math::sub(payment, fee)?;
            let new_fan = math::add(eng.fan_collateral, collateral)?;
            let new_total = math::add(eng.total_collateral, collateral)?;
            let post = health::evaluate(new_total, projected_supply, peg)?;
            if !post.meets(MIN_CR) {
                return Err(VaultError::HealthBelowMinimum { health: post.get() });
            }
            eng.book.can_append(&caller, &eng.bounds)?;

            // Commit.
            eng.book.append(
                Position {
                    owner: caller,
                    qty,
                    collateral,
                    stage: eng.stage,
                    minted_at: now,
                },
                &eng.bounds,
            )?;
            eng.fan_collateral = new_fan;
            eng.total_collateral = new_total;
            eng.total_supply = projected_supply;

            // Interactions (any failure unwinds the commit above).
            if fee > 0 {
                ports.fees.collect(fee)?;
            }
            ports.token.mint(caller, qty)?;

            eng.events.push(VaultEvent::Minted {
                minter: caller,
                qty,
                collateral,
                fee,
                stage: eng.stage,
                peg,
            });
            debug!(minter = %caller, qty = %qty, collateral = %collateral, peg = %peg, "minted");
            Ok(MintOutcome {
                qty,
                collateral,
                fee,
                peg,
                stage: eng.stage,
            })
        })
    }

    /// Redeems `qty` tokens FIFO from `caller`'s positions, paying back the
    /// floored proportional collateral.
    ///
    /// Post-redemption health (at the current peg) must meet `MIN_CR`,
    /// unless the redemption empties the vault, which always succeeds.
    pub fn redeem(
        &mut self,
        ports: &mut Ports<'_>,
        caller: AccountId,
        qty: u128,
        _now: Timestamp,
    ) -> Result<RedeemOutcome> {
        self.guarded(|eng| {
            if eng.paused {
                return Err(VaultError::Paused);
            }
            if eng.token.is_none() {
                return Err(VaultError::TokenNotSet);
            }
            if qty == 0 {
                return Err(VaultError::ZeroAmount);
            }

            let aura = ports.oracle.aura()?;
            let peg = curve::peg(aura);

            // Effects: FIFO consumption (validates holdings first).
            let out = eng.book.consume_fifo(&caller, qty)?;
            let new_supply = math::sub(eng.total_supply, qty)?;
            let new_fan = math::sub(eng.fan_collateral, out.collateral_out)?;
            let new_total = math::sub(eng.total_collateral, out.collateral_out)?;

            let post = health::evaluate(new_total, new_supply, peg)?;
            if new_supply > 0 && !post.meets(MIN_CR) {
                return Err(VaultError::HealthBelowMinimum { health: post.get() });
            }

            eng.fan_collateral = new_fan;
            eng.total_collateral = new_total;
            eng.total_supply = new_supply;

            // Interactions: pull, burn, pay out.
            let custody = eng.config.vault_account;
            ports.token.transfer_from(caller, custody, qty)?;
            ports.token.burn(custody, qty)?;
            ports.payments.pay(caller, out.collateral_out)?;

            eng.events.push(VaultEvent::Redeemed {
                redeemer: caller,
                qty,
                collateral_returned: out.collateral_out,
            });
            debug!(redeemer = %caller, qty = %qty, returned = %out.collateral_out, "redeemed");
            Ok(RedeemOutcome {
                qty,
                collateral_returned: out.collateral_out,
            })
        })
    }

    // ---- forced contraction ----

    /// Opens a contraction when outstanding supply exceeds the live
    /// aura-derived cap. Callable by anyone; returns `Ok(None)` when a
    /// contraction is already open or supply is within the cap.
    pub fn trigger_contraction(
        &mut self,
        ports: &mut Ports<'_>,
        now: Timestamp,
    ) -> Result<Option<ContractionOutcome>> {
        self.guarded(|eng| {
            if eng.pending_forced_burn > 0 {
                return Ok(None);
            }
            let aura = ports.oracle.aura()?;
            let cap = curve::supply_cap(aura, eng.config.base_cap)?;
            if eng.total_supply <= cap {
                return Ok(None);
            }
            let pending = math::sub(eng.total_supply, cap)?;
            let deadline = now
                .checked_add(GRACE_PERIOD_SECS)
                .ok_or(VaultError::Overflow)?;

            // Commit.
            eng.pending_forced_burn = pending;
            eng.forced_burn_deadline = deadline;
            eng.forced_burn_cursor = 0;
            eng.events.push(VaultEvent::ContractionTriggered {
                total_supply: eng.total_supply,
                cap,
                pending,
                deadline,
            });
            debug!(pending = %pending, deadline, "contraction triggered");
            Ok(Some(ContractionOutcome {
                cap,
                pending,
                deadline,
            }))
        })
    }

    /// Executes one batch of a pending contraction after its grace deadline.
    ///
    /// Sweeps at most `batch_owners` owners from the persistent cursor; per
    /// live position burns `floor(qty * pending / total_supply)` against the
    /// current (shrinking) supply, writing down the matching collateral as a
    /// haircut. The contraction closes when the pending amount reaches zero
    /// or a full pass over the owner list completes (floored residual dust
    /// is forgiven).
    ///
    /// Redemptions and liquidations stay legal during the grace window, so
    /// by execution time the outstanding supply may be smaller than the
    /// amount pending from the trigger. The burn fraction is therefore
    /// clamped to the live supply, and a contraction whose supply has been
    /// fully redeemed away simply closes.
    pub fn execute_contraction(
        &mut self,
        ports: &mut Ports<'_>,
        batch_owners: usize,
        now: Timestamp,
    ) -> Result<ForcedBurnOutcome> {
        self.guarded(|eng| {
            if eng.pending_forced_burn == 0 {
                return Err(VaultError::NothingPending);
            }
            if now < eng.forced_burn_deadline {
                return Err(VaultError::GraceNotElapsed {
                    deadline: eng.forced_burn_deadline,
                    now,
                });
            }
            if batch_owners == 0 || batch_owners > eng.bounds.max_batch_owners {
                return Err(VaultError::BoundExceeded(format!(
                    "batch_owners must be in 1..={}",
                    eng.bounds.max_batch_owners
                )));
            }

            // Supply can shrink below the triggered amount during the grace
            // window; never try to burn more than is outstanding.
            let pending = eng.pending_forced_burn.min(eng.total_supply);
            if pending == 0 {
                eng.pending_forced_burn = 0;
                eng.forced_burn_deadline = 0;
                eng.forced_burn_cursor = 0;
                eng.events.push(VaultEvent::ForcedBurnExecuted {
                    tokens_burned: 0,
                    collateral_written_off: 0,
                    remaining_pending: 0,
                });
                debug!("contraction closed: supply fully redeemed during grace");
                return Ok(ForcedBurnOutcome {
                    tokens_burned: 0,
                    collateral_written_off: 0,
                    remaining_pending: 0,
                    completed: true,
                });
            }

            let start = eng.forced_burn_cursor;
            let end = (start + batch_owners).min(eng.book.owner_count());
            let out = eng
                .book
                .burn_pro_rata_range(start..end, pending, eng.total_supply)?;

            let new_supply = math::sub(eng.total_supply, out.tokens_burned)?;
            let new_fan = math::sub(eng.fan_collateral, out.collateral_written_off)?;
            let new_total = math::sub(eng.total_collateral, out.collateral_written_off)?;
            let new_pending = math::sub(pending, out.tokens_burned)?;

            // Commit.
            eng.total_supply = new_supply;
            eng.fan_collateral = new_fan;
            eng.total_collateral = new_total;
            eng.forced_burn_cursor = end;
            let completed = new_pending == 0 || end == eng.book.owner_count();
            if completed {
                eng.pending_forced_burn = 0;
                eng.forced_burn_deadline = 0;
                eng.forced_burn_cursor = 0;
            } else {
                eng.pending_forced_burn = new_pending;
            }

            // Interactions: burn at the token ledger per owner.
            for (owner, burned) in &out.per_owner {
                ports.token.burn(*owner, *burned)?;
            }

            eng.events.push(VaultEvent::ForcedBurnExecuted {
                tokens_burned: out.tokens_burned,
                collateral_written_off: out.collateral_written_off,
                remaining_pending: eng.pending_forced_burn,
            });
            debug!(
                burned = %out.tokens_burned,
                written_off = %out.collateral_written_off,
                completed,
                "forced burn batch executed"
            );
            Ok(ForcedBurnOutcome {
                tokens_burned: out.tokens_burned,
                collateral_written_off: out.collateral_written_off,
                remaining_pending: eng.pending_forced_burn,
                completed,
            })
        })
    }

    // ---- liquidation ----

    /// Externally funded recapitalization, callable by anyone while health
    /// is strictly below `LIQ_CR`.
    ///
    /// Burns supply down to `target = (total_collateral + payment) /
    /// (peg * MIN_CR)` pro-rata across all owners (a global sweep, not
    /// FIFO), pays the caller a bounty plus a creator-stake penalty, and
    /// credits the rest of the payment to the vault's creator-side
    /// collateral.
    pub fn liquidate(
        &mut self,
        ports: &mut Ports<'_>,
        caller: AccountId,
        payment: u128,
        _now: Timestamp,
    ) -> Result<LiquidationOutcome> {
        self.guarded(|eng| {
            if eng.paused {
                return Err(VaultError::Paused);
            }
            if eng.token.is_none() {
                return Err(VaultError::TokenNotSet);
            }
            if payment < MIN_LIQUIDATION_PAYMENT {
                return Err(VaultError::InsufficientPayment {
                    required: MIN_LIQUIDATION_PAYMENT,
                    supplied: payment,
                });
            }

            let aura = ports.oracle.aura()?;
            let peg = curve::peg(aura);
            let current = health::evaluate(eng.total_collateral, eng.total_supply, peg)?;
            if !current.below(LIQ_CR) {
                return Err(VaultError::NotLiquidatable {
                    health: current.get(),
                });
            }

            let target_price = math::mul_wad(peg, MIN_CR)?;
            let funded = math::add(eng.total_collateral, payment)?;
            let target_supply = math::mul_div_floor(funded, WAD, target_price)?;
            if target_supply >= eng.total_supply {
                return Err(VaultError::LiquidationTooSmall);
            }
            let to_remove = math::sub(eng.total_supply, target_supply)?;

            let bounty = math::mul_wad(payment, LIQUIDATION_BOUNTY)?;
            let injected = math::sub(payment, bounty)?;
            let penalty = math::mul_wad(eng.creator_collateral, CREATOR_PENALTY)?
                .min(math::mul_wad(payment, PENALTY_PAYMENT_CAP)?)
                .min(eng.creator_collateral);

            // Effects: global pro-rata burn plus the collateral movements.
            let out = eng.book.burn_pro_rata(to_remove, eng.total_supply)?;
            eng.total_supply = math::sub(eng.total_supply, out.tokens_burned)?;
            eng.fan_collateral = math::sub(eng.fan_collateral, out.collateral_written_off)?;
            eng.total_collateral = math::sub(eng.total_collateral, out.collateral_written_off)?;
            eng.creator_collateral = math::add(eng.creator_collateral, injected)?;
            eng.total_collateral = math::add(eng.total_collateral, injected)?;
            eng.creator_collateral = math::sub(eng.creator_collateral, penalty)?;
            eng.total_collateral = math::sub(eng.total_collateral, penalty)?;

            // Interactions.
            for (owner, burned) in &out.per_owner {
                ports.token.burn(*owner, *burned)?;
            }
            ports.payments.pay(caller, bounty)?;
            if penalty > 0 {
                ports.payments.pay(caller, penalty)?;
            }

            eng.events.push(VaultEvent::LiquidationExecuted {
                liquidator: caller,
                payment,
                collateral_injected: injected,
                tokens_removed: out.tokens_burned,
                bounty,
                creator_penalty: penalty,
            });
            debug!(
                liquidator = %caller,
                removed = %out.tokens_burned,
                injected = %injected,
                "liquidation executed"
            );
            Ok(LiquidationOutcome {
                tokens_removed: out.tokens_burned,
                collateral_injected: injected,
                bounty,
                creator_penalty: penalty,
            })
        })
    }

    // ---- creator withdrawal ----

    /// Creator-only withdrawal of staked collateral, permitted only while
    /// the vault stays at or above `MIN_CR` afterwards.
    pub fn withdraw_creator_collateral(
        &mut self,
        ports: &mut Ports<'_>,
        caller: AccountId,
        amount: u128,
    ) -> Result<WithdrawOutcome> {
        self.guarded(|eng| {
            if caller != eng.config.creator {
                return Err(VaultError::NotCreator);
            }
            if amount == 0 {
                return Err(VaultError::ZeroAmount);
            }
            if amount > eng.creator_collateral {
                return Err(VaultError::InsufficientHoldings {
                    requested: amount,
                    held: eng.creator_collateral,
                });
            }

            let aura = ports.oracle.aura()?;
            let peg = curve::peg(aura);
            let new_creator = math::sub(eng.creator_collateral, amount)?;
            let new_total = math::sub(eng.total_collateral, amount)?;
            let post = health::evaluate(new_total, eng.total_supply, peg)?;
            if !post.meets(MIN_CR) {
                return Err(VaultError::HealthBelowMinimum { health: post.get() });
            }

            // Commit.
            eng.creator_collateral = new_creator;
            eng.total_collateral = new_total;

            ports.payments.pay(caller, amount)?;

            eng.events.push(VaultEvent::CreatorWithdrawal {
                creator: caller,
                amount,
            });
            debug!(amount = %amount, "creator collateral withdrawn");
            Ok(WithdrawOutcome {
                amount,
                remaining_creator_collateral: new_creator,
            })
        })
    }

    // ---- transaction discipline ----

    /// Runs `f` as an atomic unit: rejects re-entrant invocation, restores
    /// the pre-call checkpoint on any error.
    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.entered {
            return Err(VaultError::Reentrancy);
        }
        self.entered = true;
        let checkpoint = self.clone();
        let out = f(self);
        if out.is_err() {
            *self = checkpoint;
        }
        self.entered = false;
        out
    }
}
