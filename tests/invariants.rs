//! Property tests: the ledger invariants hold across arbitrary operation
//! histories.
//!
//! Random sequences of operations (valid and invalid alike) are applied to
//! a vault. After every successful step the global invariants must hold;
//! after every failed step the entire observable state must be exactly as
//! it was before the attempt.

use proptest::prelude::*;
use std::sync::Arc;
use taskvault::prelude::*;
use taskvault::ManualClock;

const START: Timestamp = 1_000;
/// Principals 1..=ACCOUNTS participate; each starts with SEED units.
const ACCOUNTS: u8 = 4;
const SEED: u64 = 10_000;
/// Ids are drawn a little past what a run can create, so unknown-id
/// paths are exercised too.
const MAX_ID: u64 = 6;

fn acct(byte: u8) -> AccountId {
    AccountId::from_bytes([byte; 32])
}

#[derive(Debug, Clone)]
enum Step {
    Create {
        creator: u8,
        verifier: u8,
        amount: u64,
        ttl: u64,
    },
    Accept { caller: u8, id: u64 },
    Submit { caller: u8, id: u64 },
    Approve { caller: u8, id: u64 },
    Reject { caller: u8, id: u64 },
    Claim { caller: u8, id: u64 },
    Refund { caller: u8, id: u64 },
    AutoRefund { caller: u8, id: u64 },
    Advance { secs: u64 },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let caller = 1u8..=ACCOUNTS;
    let id = 0u64..MAX_ID;
    prop_oneof![
        (1u8..=ACCOUNTS, 1u8..=ACCOUNTS, 1u64..=500, 1u64..=120).prop_map(
            |(creator, verifier, amount, ttl)| Step::Create {
                creator,
                verifier,
                amount,
                ttl,
            }
        ),
        (caller.clone(), id.clone()).prop_map(|(caller, id)| Step::Accept { caller, id }),
        (caller.clone(), id.clone()).prop_map(|(caller, id)| Step::Submit { caller, id }),
        (caller.clone(), id.clone()).prop_map(|(caller, id)| Step::Approve { caller, id }),
        (caller.clone(), id.clone()).prop_map(|(caller, id)| Step::Reject { caller, id }),
        (caller.clone(), id.clone()).prop_map(|(caller, id)| Step::Claim { caller, id }),
        (caller.clone(), id.clone()).prop_map(|(caller, id)| Step::Refund { caller, id }),
        (caller, id).prop_map(|(caller, id)| Step::AutoRefund { caller, id }),
        (1u64..=60).prop_map(|secs| Step::Advance { secs }),
    ]
}

fn apply_step(vault: &TaskVault, step: &Step) -> Result<u64> {
    match *step {
        Step::Create {
            creator,
            verifier,
            amount,
            ttl,
        } => vault.create_bounty(
            &acct(creator),
            acct(verifier),
            amount,
            vault.now() + ttl,
            b"generated task",
        ),
        Step::Accept { caller, id } => vault.accept(&acct(caller), id).map(|_| id),
        Step::Submit { caller, id } => vault.submit(&acct(caller), id).map(|_| id),
        Step::Approve { caller, id } => vault.approve(&acct(caller), id).map(|_| id),
        Step::Reject { caller, id } => vault.reject(&acct(caller), id).map(|_| id),
        Step::Claim { caller, id } => vault.claim(&acct(caller), id).map(|_| id),
        Step::Refund { caller, id } => vault.refund(&acct(caller), id).map(|_| id),
        Step::AutoRefund { caller, id } => vault.auto_refund(&acct(caller), id).map(|_| id),
        Step::Advance { .. } => unreachable!("clock steps are handled by the driver"),
    }
}

type Snapshot = (u64, Vec<BountyRecord>, Vec<u64>, u64);

fn snapshot(vault: &TaskVault) -> Snapshot {
    let count = vault.bounty_count();
    let records = (0..count)
        .map(|id| vault.bounty(id).expect("allocated ids must resolve"))
        .collect();
    let balances = (1..=ACCOUNTS).map(|i| vault.balance_of(&acct(i))).collect();
    (count, records, balances, vault.escrow_balance())
}

/// The four ledger invariants, checked over the whole vault.
fn assert_invariants(vault: &TaskVault) {
    let count = vault.bounty_count();
    let mut live_total: u64 = 0;
    for id in 0..count {
        let record = vault.bounty(id).expect("allocated ids must resolve");
        // Ids are assigned in creation order and never reused.
        assert_eq!(record.id, id);
        // Amount/status and worker/status coupling (invariants 1 and 2).
        record.check_consistency().expect("record-local invariants");
        if !record.is_terminal() {
            live_total += record.amount;
        }
    }
    // Invariant 3: escrow covers every live record. In this closed system
    // the inequality is tight.
    assert_eq!(live_total, vault.escrow_balance());
    // Value is conserved: nothing minted or burned by any operation.
    let circulating: u64 = (1..=ACCOUNTS).map(|i| vault.balance_of(&acct(i))).sum();
    assert_eq!(
        circulating + vault.escrow_balance(),
        u64::from(ACCOUNTS) * SEED
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_across_random_histories(
        steps in proptest::collection::vec(step_strategy(), 1..60)
    ) {
        let clock = Arc::new(ManualClock::starting_at(START));
        let mut builder = TaskVault::builder().clock(clock.clone());
        for i in 1..=ACCOUNTS {
            builder = builder.fund(acct(i), SEED);
        }
        let vault = builder.build();

        for step in &steps {
            if let Step::Advance { secs } = step {
                clock.advance(*secs);
                continue;
            }

            let before = snapshot(&vault);
            match apply_step(&vault, step) {
                Ok(id) => {
                    if let Step::Create { .. } = step {
                        // A successful create consumes exactly one id, in
                        // order.
                        prop_assert_eq!(id, before.0);
                        prop_assert_eq!(vault.bounty_count(), before.0 + 1);
                    } else {
                        prop_assert_eq!(vault.bounty_count(), before.0);
                    }
                    assert_invariants(&vault);
                }
                Err(err) => {
                    // The engine never reports corruption for a caller
                    // mistake, and a refused operation leaves no trace.
                    prop_assert!(!err.is_corruption(), "unexpected corruption: {}", err);
                    let after = snapshot(&vault);
                    prop_assert_eq!(&before, &after, "failed {:?} mutated state", step);
                }
            }
        }
    }

    #[test]
    fn counter_never_moves_on_failed_creates(
        amount in 0u64..2,
        ttl in 0u64..2,
    ) {
        // Degenerate creates: zero amounts, deadlines at or before now,
        // unfunded creators. None may consume an id.
        let clock = Arc::new(ManualClock::starting_at(START));
        let vault = TaskVault::builder().clock(clock).build();

        let result = vault.create_bounty(
            &acct(1),
            acct(2),
            amount,
            START + ttl,
            b"degenerate",
        );
        prop_assert!(result.is_err(), "unfunded creator must never succeed");
        prop_assert_eq!(vault.bounty_count(), 0);
        prop_assert!(vault.bounty(0).unwrap_err().is_not_found());
    }
}
