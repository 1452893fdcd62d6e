//! Vanity name registry implementation
//!
//! Owns the name records, commitments, fee ledger, parameters and
//! administrator behind one `RwLock`. Every mutating operation runs its
//! checks and effects under a single write guard; value transfers happen only
//! after the guard is dropped and the paid-out balance has been zeroed.

use crate::access::AccessControl;
use crate::clock::Clock;
use crate::commit::CommitRegistry;
use crate::errors::*;
use crate::events::RegistryEvent;
use crate::fees::FeeLedger;
use crate::hashing::name_hash;
use crate::price::{validate_length, PriceModel};
use crate::snapshot::{CommitmentEntry, PendingRefund, RegistrySnapshot};
use crate::transfer::ValueTransfer;
use crate::types::*;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct RegistryState {
    /// Name hash → record
    records: HashMap<NameHash, NameRecord>,
    commits: CommitRegistry,
    fees: FeeLedger,
    access: AccessControl,
    params: RegistryParams,
    /// Refunds whose record changed hands before a failed payout could be undone
    pending_refunds: HashMap<AccountId, Amount>,
    events: Vec<RegistryEvent>,
    last_observed: Timestamp,
}

impl RegistryState {
    /// Read the clock, never going behind an earlier reading
    fn observe(&mut self, clock: &dyn Clock) -> Timestamp {
        self.last_observed = self.last_observed.max(clock.now());
        self.last_observed
    }

    fn price_model(&self) -> PriceModel {
        PriceModel::from(&self.params)
    }

    fn emit(&mut self, event: RegistryEvent) {
        info!(target: "vanity_registry", ?event, "registry event");
        self.events.push(event);
    }
}

/// Vanity name registry
pub struct NameRegistry {
    state: RwLock<RegistryState>,
    clock: Arc<dyn Clock>,
    transfers: Arc<dyn ValueTransfer>,
}

impl std::fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameRegistry")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl NameRegistry {
    /// Create an empty registry administered by `admin`
    pub fn new(
        admin: AccountId,
        params: RegistryParams,
        clock: Arc<dyn Clock>,
        transfers: Arc<dyn ValueTransfer>,
    ) -> Result<Self> {
        validate_params(&params)?;
        Ok(Self {
            state: RwLock::new(RegistryState {
                records: HashMap::new(),
                commits: CommitRegistry::new(),
                fees: FeeLedger::new(),
                access: AccessControl::new(admin),
                params,
                pending_refunds: HashMap::new(),
                events: Vec::new(),
                last_observed: 0,
            }),
            clock,
            transfers,
        })
    }

    /// Resume a registry from persisted state
    pub fn from_snapshot(
        snapshot: RegistrySnapshot,
        clock: Arc<dyn Clock>,
        transfers: Arc<dyn ValueTransfer>,
    ) -> Result<Self> {
        validate_params(&snapshot.params)?;
        let mut records = HashMap::with_capacity(snapshot.records.len());
        for record in snapshot.records {
            if let Some(duplicate) = records.insert(name_hash(&record.name), record) {
                return Err(RegistryError::InvalidParameter(format!(
                    "duplicate record for {} in snapshot",
                    duplicate.display_name()
                )));
            }
        }
        let mut pending_refunds = HashMap::with_capacity(snapshot.pending_refunds.len());
        for refund in snapshot.pending_refunds {
            if pending_refunds.insert(refund.account, refund.amount).is_some() {
                return Err(RegistryError::InvalidParameter(format!(
                    "duplicate pending refund for {} in snapshot",
                    refund.account
                )));
            }
        }
        let commits = CommitRegistry::from_entries(
            snapshot
                .commitments
                .into_iter()
                .map(|entry| (entry.hash, entry.committed_at)),
        );

        Ok(Self {
            state: RwLock::new(RegistryState {
                records,
                commits,
                fees: FeeLedger::with_balance(snapshot.fee_balance),
                access: AccessControl::new(snapshot.admin),
                params: snapshot.params,
                pending_refunds,
                events: Vec::new(),
                last_observed: snapshot.last_observed,
            }),
            clock,
            transfers,
        })
    }

    /// Capture the persisted state surface
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        let mut records: Vec<NameRecord> = state.records.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        let mut commitments: Vec<CommitmentEntry> = state
            .commits
            .entries()
            .map(|(hash, committed_at)| CommitmentEntry {
                hash: *hash,
                committed_at: *committed_at,
            })
            .collect();
        commitments.sort_by(|a, b| a.hash.cmp(&b.hash));
        let mut pending_refunds: Vec<PendingRefund> = state
            .pending_refunds
            .iter()
            .map(|(account, amount)| PendingRefund {
                account: *account,
                amount: *amount,
            })
            .collect();
        pending_refunds.sort_by(|a, b| a.account.cmp(&b.account));

        RegistrySnapshot {
            admin: state.access.admin(),
            params: state.params,
            fee_balance: state.fees.balance(),
            last_observed: state.last_observed,
            records,
            commitments,
            pending_refunds,
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn get_name_hash(&self, name: &[u8]) -> NameHash {
        name_hash(name)
    }

    pub fn get_name_price(&self, name: &[u8]) -> Result<Amount> {
        self.state.read().price_model().price(name)
    }

    pub fn get_register_price(&self, name: &[u8]) -> Result<Amount> {
        self.state.read().price_model().registration_cost(name)
    }

    /// Whether `name` is vacant (never registered, released or expired)
    pub fn is_name_available(&self, name: &[u8]) -> Result<bool> {
        validate_length(name)?;
        let state = self.state.read();
        let now = state.last_observed.max(self.clock.now());
        Ok(state
            .records
            .get(&name_hash(name))
            .map_or(true, |record| record.is_vacant(now)))
    }

    pub fn record(&self, name: &[u8]) -> Option<NameRecord> {
        self.state.read().records.get(&name_hash(name)).cloned()
    }

    /// Submission time of a commitment (0 = none)
    pub fn committed_at(&self, hash: &CommitHash) -> Timestamp {
        self.state.read().commits.committed_at(hash)
    }

    /// Refund owed to `account` after a payout that could not be undone
    pub fn pending_refund(&self, account: &AccountId) -> Amount {
        self.state
            .read()
            .pending_refunds
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    pub fn fee_balance(&self) -> Amount {
        self.state.read().fees.balance()
    }

    pub fn params(&self) -> RegistryParams {
        self.state.read().params
    }

    pub fn admin(&self) -> AccountId {
        self.state.read().access.admin()
    }

    /// Drain events emitted since the last call, oldest first
    pub fn take_events(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.state.write().events)
    }

    // ---------------------------------------------------------------------
    // Registration flow
    // ---------------------------------------------------------------------

    /// Record `hash = commitment_hash(submitter, name)` at the current time
    pub fn commit(&self, hash: CommitHash) {
        let mut state = self.state.write();
        let now = state.observe(self.clock.as_ref());
        state.commits.commit(hash, now);
        debug!(target: "vanity_registry", "Commitment {} recorded at {}", hex::encode(hash), now);
    }

    /// Register `name` for `submitter`, who attaches `payment`.
    ///
    /// Checks, in order: length, vacancy, commitment cooldown, payment. The
    /// name price goes to the fee ledger and the rest of the payment is locked
    /// in the record as a refundable deposit.
    pub fn register(&self, submitter: AccountId, name: &[u8], payment: Amount) -> Result<NameRecord> {
        let mut guard = self.state.write();
        let now = guard.observe(self.clock.as_ref());
        let state = &mut *guard;

        validate_length(name)?;

        let hash = name_hash(name);
        if let Some(existing) = state.records.get(&hash) {
            if !existing.is_vacant(now) {
                debug!(
                    target: "vanity_registry",
                    "Rejected registration of active name {}",
                    existing.display_name()
                );
                return Err(RegistryError::NameUnavailable {
                    name: existing.display_name(),
                    expires_at: existing.expires_at,
                });
            }
        }

        state.commits.check(&submitter, name, now)?;

        let model = state.price_model();
        let required = model.registration_cost(name)?;
        if payment < required {
            return Err(RegistryError::InsufficientPayment {
                required,
                provided: payment,
            });
        }

        let price = model.price(name)?;
        let locked_deposit = payment
            .checked_sub(price)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        let expires_at = now
            .checked_add(state.params.lock_duration)
            .ok_or(RegistryError::ArithmeticOverflow)?;

        // Last fallible step; nothing has been written before it.
        state.fees.accrue(price)?;

        let record = NameRecord {
            name: name.to_vec(),
            expires_at,
            locked_deposit,
            owner: submitter,
        };
        if let Some(stale) = state.records.insert(hash, record.clone()) {
            if stale.locked_deposit > 0 {
                warn!(
                    target: "vanity_registry",
                    "Expired record {} overwritten with {} still locked by {}",
                    stale.display_name(),
                    stale.locked_deposit,
                    stale.owner
                );
            }
        }

        info!(
            target: "vanity_registry",
            "Registered {} to {} until {} (fee {}, deposit {})",
            record.display_name(),
            submitter,
            expires_at,
            price,
            locked_deposit
        );
        state.emit(RegistryEvent::NameRegistered {
            name: name.to_vec(),
            owner: submitter,
            timestamp: now,
        });

        Ok(record)
    }

    /// Extend `name` by one lock duration. Only the owner may renew, and the
    /// payment must equal the name price exactly. Returns the new expiry.
    pub fn renew(&self, caller: AccountId, name: &[u8], payment: Amount) -> Result<Timestamp> {
        let mut guard = self.state.write();
        let now = guard.observe(self.clock.as_ref());
        let state = &mut *guard;

        let price = state.price_model().price(name)?;
        let lock_duration = state.params.lock_duration;

        let record = state
            .records
            .get_mut(&name_hash(name))
            .filter(|record| record.owner == caller)
            .ok_or_else(|| RegistryError::NotOwner {
                name: String::from_utf8_lossy(name).into_owned(),
            })?;

        if payment != price {
            return Err(RegistryError::InvalidAmount {
                required: price,
                provided: payment,
            });
        }

        let expires_at = record
            .expires_at
            .checked_add(lock_duration)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        state.fees.accrue(payment)?;
        record.expires_at = expires_at;

        info!(
            target: "vanity_registry",
            "Renewed {} for {} until {}",
            record.display_name(),
            caller,
            expires_at
        );
        state.emit(RegistryEvent::NameRenewed {
            name: name.to_vec(),
            owner: caller,
            timestamp: now,
        });

        Ok(expires_at)
    }

    /// Release `name` and refund its locked deposit to the owner.
    ///
    /// The record is vacated and its deposit zeroed before the transfer runs,
    /// so a transfer that re-enters the registry finds nothing left to withdraw.
    pub fn withdraw_locked_deposit(&self, caller: AccountId, name: &[u8]) -> Result<Amount> {
        let (amount, prior_expiry) = {
            let mut guard = self.state.write();
            guard.observe(self.clock.as_ref());
            let record = guard
                .records
                .get_mut(&name_hash(name))
                .filter(|record| record.owner == caller)
                .ok_or_else(|| RegistryError::NotOwner {
                    name: String::from_utf8_lossy(name).into_owned(),
                })?;

            if record.locked_deposit == 0 {
                return Err(RegistryError::NoLockedDeposit {
                    name: record.display_name(),
                });
            }

            let prior_expiry = std::mem::take(&mut record.expires_at);
            let amount = std::mem::take(&mut record.locked_deposit);
            (amount, prior_expiry)
        };

        if let Err(err) = self.transfers.transfer(&caller, amount) {
            self.revert_unlock(caller, name, amount, prior_expiry);
            return Err(RegistryError::TransferFailed(err));
        }

        let mut state = self.state.write();
        let now = state.observe(self.clock.as_ref());
        info!(
            target: "vanity_registry",
            "Unlocked {} for {}, refunded {}",
            String::from_utf8_lossy(name),
            caller,
            amount
        );
        state.emit(RegistryEvent::NameUnlocked {
            name: name.to_vec(),
            timestamp: now,
        });

        Ok(amount)
    }

    /// Undo a failed refund. If the name was taken or renewed while the
    /// transfer ran, the deposit can no longer go back into the record and is
    /// kept as a pending refund the owner can claim instead.
    fn revert_unlock(&self, caller: AccountId, name: &[u8], amount: Amount, prior_expiry: Timestamp) {
        let mut guard = self.state.write();
        let now = guard.observe(self.clock.as_ref());
        let state = &mut *guard;

        let untouched = state.records.get_mut(&name_hash(name)).filter(|record| {
            record.owner == caller && record.expires_at == 0 && record.locked_deposit == 0
        });
        if let Some(record) = untouched {
            record.expires_at = prior_expiry;
            record.locked_deposit = amount;
            warn!(
                target: "vanity_registry",
                "Refund of {} for {} failed; deposit restored",
                amount,
                record.display_name()
            );
            return;
        }

        let pending = state.pending_refunds.entry(caller).or_insert(0);
        *pending = pending.saturating_add(amount);
        warn!(
            target: "vanity_registry",
            "Refund of {} for {} failed after the record changed; {} is claimable by {}",
            amount,
            String::from_utf8_lossy(name),
            pending,
            caller
        );
        state.emit(RegistryEvent::RefundDeferred {
            owner: caller,
            amount,
            timestamp: now,
        });
    }

    /// Pay out a refund left pending by [`withdraw_locked_deposit`](Self::withdraw_locked_deposit)
    pub fn claim_refund(&self, caller: AccountId) -> Result<Amount> {
        let amount = {
            let mut state = self.state.write();
            state.observe(self.clock.as_ref());
            match state.pending_refunds.remove(&caller) {
                Some(amount) if amount > 0 => amount,
                _ => return Err(RegistryError::NoPendingRefund),
            }
        };

        if let Err(err) = self.transfers.transfer(&caller, amount) {
            let mut state = self.state.write();
            let pending = state.pending_refunds.entry(caller).or_insert(0);
            *pending = pending.saturating_add(amount);
            warn!(target: "vanity_registry", "Refund claim of {} by {} failed; kept pending", amount, caller);
            return Err(RegistryError::TransferFailed(err));
        }

        let mut state = self.state.write();
        let now = state.observe(self.clock.as_ref());
        state.emit(RegistryEvent::RefundClaimed {
            owner: caller,
            amount,
            timestamp: now,
        });
        Ok(amount)
    }

    // ---------------------------------------------------------------------
    // Administration
    // ---------------------------------------------------------------------

    /// Pay the whole fee balance out to the administrator
    pub fn withdraw_fees(&self, caller: AccountId) -> Result<Amount> {
        let amount = {
            let mut state = self.state.write();
            state.observe(self.clock.as_ref());
            state.access.ensure_admin(&caller)?;
            state.fees.take()?
        };

        if let Err(err) = self.transfers.transfer(&caller, amount) {
            self.state.write().fees.restore(amount);
            warn!(target: "vanity_registry", "Fee withdrawal of {} failed; balance restored", amount);
            return Err(RegistryError::TransferFailed(err));
        }

        let mut state = self.state.write();
        let now = state.observe(self.clock.as_ref());
        state.emit(RegistryEvent::FeesWithdrawn {
            to: caller,
            amount,
            timestamp: now,
        });
        Ok(amount)
    }

    /// Set the refundable deposit required on registration
    pub fn set_lock_fee(&self, caller: AccountId, lock_fee: Amount) -> Result<()> {
        self.update_params(caller, |params| params.lock_fee = lock_fee)
    }

    /// Set the lifetime granted by registration and renewal
    pub fn set_lock_duration(&self, caller: AccountId, lock_duration: Timestamp) -> Result<()> {
        self.update_params(caller, |params| params.lock_duration = lock_duration)
    }

    /// Set the per-byte name price
    pub fn set_unit_byte_price(&self, caller: AccountId, unit_byte_price: Amount) -> Result<()> {
        self.update_params(caller, |params| params.unit_byte_price = unit_byte_price)
    }

    pub fn transfer_admin(&self, caller: AccountId, new_admin: AccountId) -> Result<()> {
        let mut state = self.state.write();
        let now = state.observe(self.clock.as_ref());
        let previous = state.access.transfer(&caller, new_admin)?;
        state.emit(RegistryEvent::AdminTransferred {
            previous,
            admin: new_admin,
            timestamp: now,
        });
        Ok(())
    }

    fn update_params(&self, caller: AccountId, apply: impl FnOnce(&mut RegistryParams)) -> Result<()> {
        let mut state = self.state.write();
        let now = state.observe(self.clock.as_ref());
        state.access.ensure_admin(&caller)?;

        let mut params = state.params;
        apply(&mut params);
        validate_params(&params)?;
        state.params = params;

        state.emit(RegistryEvent::ParamsUpdated {
            params,
            timestamp: now,
        });
        Ok(())
    }
}

fn validate_params(params: &RegistryParams) -> Result<()> {
    if params.lock_duration == 0 {
        return Err(RegistryError::InvalidParameter(
            "lock duration must be non-zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::constants::FRONTRUN_WINDOW_SECS;
    use crate::hashing::commitment_hash;
    use crate::transfer::InMemoryBalances;

    const T0: Timestamp = 1_700_000_000;

    fn params() -> RegistryParams {
        RegistryParams {
            unit_byte_price: 10,
            lock_fee: 500,
            lock_duration: 1_000_000,
        }
    }

    fn setup() -> (NameRegistry, Arc<ManualClock>, Arc<InMemoryBalances>) {
        let clock = Arc::new(ManualClock::new(T0));
        let bank = Arc::new(InMemoryBalances::new());
        let registry =
            NameRegistry::new(AccountId::new([9u8; 32]), params(), clock.clone(), bank.clone())
                .unwrap();
        (registry, clock, bank)
    }

    fn committed(registry: &NameRegistry, clock: &ManualClock, who: AccountId, name: &[u8]) {
        registry.commit(commitment_hash(&who, name));
        clock.advance(FRONTRUN_WINDOW_SECS);
    }

    #[test]
    fn test_precondition_order() {
        let (registry, clock, _) = setup();
        let alice = AccountId::new([1u8; 32]);

        // Length is checked before anything else.
        assert!(matches!(
            registry.register(alice, b"ab", 0),
            Err(RegistryError::InvalidLength { .. })
        ));
        // Commitment before payment.
        assert!(matches!(
            registry.register(alice, b"abc", 0),
            Err(RegistryError::NoCommitment)
        ));

        committed(&registry, &clock, alice, b"abc");
        assert!(matches!(
            registry.register(alice, b"abc", 529),
            Err(RegistryError::InsufficientPayment { required: 530, provided: 529 })
        ));
        assert!(registry.record(b"abc").is_none());
        assert_eq!(registry.fee_balance(), 0);
    }

    #[test]
    fn test_vacancy_checked_before_commitment() {
        let (registry, clock, _) = setup();
        let alice = AccountId::new([1u8; 32]);
        let bob = AccountId::new([2u8; 32]);
        committed(&registry, &clock, alice, b"abc");
        registry.register(alice, b"abc", 530).unwrap();

        // Bob never committed, but the active record is reported first.
        assert!(matches!(
            registry.register(bob, b"abc", 0),
            Err(RegistryError::NameUnavailable { .. })
        ));
    }

    #[test]
    fn test_cooldown_checked_before_payment() {
        let (registry, clock, _) = setup();
        let alice = AccountId::new([1u8; 32]);
        registry.commit(commitment_hash(&alice, b"abc"));
        clock.advance(FRONTRUN_WINDOW_SECS - 1);

        assert!(matches!(
            registry.register(alice, b"abc", 1),
            Err(RegistryError::CooldownNotElapsed { .. })
        ));
        assert!(registry.record(b"abc").is_none());
    }

    #[test]
    fn test_register_splits_payment() {
        let (registry, clock, _) = setup();
        let alice = AccountId::new([1u8; 32]);
        committed(&registry, &clock, alice, b"abcd");

        let record = registry.register(alice, b"abcd", 1_000).unwrap();
        assert_eq!(record.owner, alice);
        assert_eq!(record.locked_deposit, 960);
        assert_eq!(record.expires_at, T0 + FRONTRUN_WINDOW_SECS + 1_000_000);
        assert_eq!(registry.fee_balance(), 40);
        assert!(!registry.is_name_available(b"abcd").unwrap());

        let events = registry.take_events();
        assert_eq!(
            events,
            vec![RegistryEvent::NameRegistered {
                name: b"abcd".to_vec(),
                owner: alice,
                timestamp: T0 + FRONTRUN_WINDOW_SECS,
            }]
        );
        assert!(registry.take_events().is_empty());
    }

    #[test]
    fn test_renew_is_additive_and_exact() {
        let (registry, clock, _) = setup();
        let alice = AccountId::new([1u8; 32]);
        let bob = AccountId::new([2u8; 32]);
        committed(&registry, &clock, alice, b"abc");
        let record = registry.register(alice, b"abc", 530).unwrap();

        assert!(matches!(
            registry.renew(bob, b"abc", 30),
            Err(RegistryError::NotOwner { .. })
        ));
        assert!(matches!(
            registry.renew(alice, b"abc", 31),
            Err(RegistryError::InvalidAmount { required: 30, provided: 31 })
        ));
        assert!(matches!(
            registry.renew(alice, b"abc", 530),
            Err(RegistryError::InvalidAmount { .. })
        ));

        clock.advance(10);
        let renewed = registry.renew(alice, b"abc", 30).unwrap();
        assert_eq!(renewed, record.expires_at + 1_000_000);
        assert_eq!(registry.renew(alice, b"abc", 30).unwrap(), record.expires_at + 2_000_000);
        assert_eq!(registry.fee_balance(), 30 * 3);
    }

    #[test]
    fn test_renew_unknown_name_is_not_owner() {
        let (registry, _, _) = setup();
        assert!(matches!(
            registry.renew(AccountId::default(), b"nobody", 60),
            Err(RegistryError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_withdraw_deposit_releases_name() {
        let (registry, clock, bank) = setup();
        let alice = AccountId::new([1u8; 32]);
        committed(&registry, &clock, alice, b"abc");
        registry.register(alice, b"abc", 600).unwrap();

        assert_eq!(registry.withdraw_locked_deposit(alice, b"abc").unwrap(), 570);
        assert_eq!(bank.balance_of(&alice), 570);

        let record = registry.record(b"abc").unwrap();
        assert_eq!(record.expires_at, 0);
        assert_eq!(record.locked_deposit, 0);
        assert_eq!(record.owner, alice);
        assert!(registry.is_name_available(b"abc").unwrap());

        assert!(matches!(
            registry.withdraw_locked_deposit(alice, b"abc"),
            Err(RegistryError::NoLockedDeposit { .. })
        ));
        assert_eq!(bank.balance_of(&alice), 570);
    }

    #[test]
    fn test_expired_record_can_still_be_unlocked() {
        let (registry, clock, bank) = setup();
        let alice = AccountId::new([1u8; 32]);
        committed(&registry, &clock, alice, b"abc");
        registry.register(alice, b"abc", 530).unwrap();

        clock.advance(1_000_000);
        assert!(registry.is_name_available(b"abc").unwrap());
        assert_eq!(registry.withdraw_locked_deposit(alice, b"abc").unwrap(), 500);
        assert_eq!(bank.balance_of(&alice), 500);
    }

    #[test]
    fn test_admin_operations() {
        let (registry, clock, bank) = setup();
        let admin = AccountId::new([9u8; 32]);
        let alice = AccountId::new([1u8; 32]);

        assert!(matches!(
            registry.withdraw_fees(admin),
            Err(RegistryError::NoFeesToWithdraw)
        ));
        assert!(matches!(
            registry.set_unit_byte_price(alice, 1),
            Err(RegistryError::NotAdministrator)
        ));
        assert!(matches!(
            registry.set_lock_duration(admin, 0),
            Err(RegistryError::InvalidParameter(_))
        ));

        registry.set_unit_byte_price(admin, 20).unwrap();
        registry.set_lock_fee(admin, 0).unwrap();
        registry.set_lock_duration(admin, 50).unwrap();
        assert_eq!(
            registry.params(),
            RegistryParams {
                unit_byte_price: 20,
                lock_fee: 0,
                lock_duration: 50,
            }
        );
        assert_eq!(registry.get_register_price(b"abc").unwrap(), 60);

        committed(&registry, &clock, alice, b"abc");
        registry.register(alice, b"abc", 60).unwrap();

        assert!(matches!(
            registry.withdraw_fees(alice),
            Err(RegistryError::NotAdministrator)
        ));
        assert_eq!(registry.withdraw_fees(admin).unwrap(), 60);
        assert_eq!(bank.balance_of(&admin), 60);
        assert_eq!(registry.fee_balance(), 0);

        registry.transfer_admin(admin, alice).unwrap();
        assert_eq!(registry.admin(), alice);
        assert!(registry.set_lock_fee(admin, 1).is_err());
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let (registry, clock, _) = setup();
        let alice = AccountId::new([1u8; 32]);
        let hash = commitment_hash(&alice, b"abc");
        registry.commit(hash);

        clock.set(T0 - 1_000);
        registry.commit(commitment_hash(&alice, b"xyz"));
        assert_eq!(registry.committed_at(&commitment_hash(&alice, b"xyz")), T0);
    }

    #[test]
    fn test_snapshot_restores_state() {
        let (registry, clock, bank) = setup();
        let alice = AccountId::new([1u8; 32]);
        committed(&registry, &clock, alice, b"abc");
        registry.register(alice, b"abc", 530).unwrap();

        let snapshot = registry.snapshot();
        let restored = RegistrySnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(restored, snapshot);

        let resumed = NameRegistry::from_snapshot(restored, clock.clone(), bank).unwrap();
        assert_eq!(resumed.record(b"abc"), registry.record(b"abc"));
        assert_eq!(resumed.fee_balance(), 30);
        assert_eq!(
            resumed.committed_at(&commitment_hash(&alice, b"abc")),
            T0
        );
        assert!(!resumed.is_name_available(b"abc").unwrap());
    }

    #[test]
    fn test_snapshot_with_duplicate_records_is_rejected() {
        let (registry, clock, bank) = setup();
        let alice = AccountId::new([1u8; 32]);
        committed(&registry, &clock, alice, b"abc");
        registry.register(alice, b"abc", 530).unwrap();

        let mut snapshot = registry.snapshot();
        let mut stale = snapshot.records[0].clone();
        stale.owner = AccountId::new([2u8; 32]);
        snapshot.records.push(stale);

        assert!(matches!(
            NameRegistry::from_snapshot(snapshot, clock, bank),
            Err(RegistryError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_pending_refund_survives_snapshot() {
        let (registry, clock, bank) = setup();
        let alice = AccountId::new([1u8; 32]);
        let mut snapshot = registry.snapshot();
        snapshot.pending_refunds.push(PendingRefund {
            account: alice,
            amount: 75,
        });

        let resumed = NameRegistry::from_snapshot(snapshot, clock, bank.clone()).unwrap();
        assert_eq!(resumed.pending_refund(&alice), 75);
        assert_eq!(resumed.snapshot().pending_refunds.len(), 1);

        assert_eq!(resumed.claim_refund(alice).unwrap(), 75);
        assert_eq!(bank.balance_of(&alice), 75);
        assert!(matches!(
            resumed.claim_refund(alice),
            Err(RegistryError::NoPendingRefund)
        ));
    }
}
