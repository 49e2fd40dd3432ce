use std::sync::Arc;

use proptest::prelude::*;

use agora_nullables::{NullLedger, NullPowerOracle};
use agora_sessions::{SessionEngine, SessionParams};
use agora_types::{AccountId, BlockHeight, ContentRef, SessionId, Timestamp};

const SNAPSHOT: u64 = 9;
const HEIGHT: u64 = 10;

/// An engine with `voters` seeded at the snapshot height and a funded
/// creator holding the admin role.
fn engine_with(
    voters: &[(AccountId, u128)],
) -> (SessionEngine, Arc<NullPowerOracle>, Arc<NullLedger>) {
    let oracle = Arc::new(NullPowerOracle::new());
    let ledger = Arc::new(NullLedger::new());
    oracle.set_current_power(&AccountId::from("creator"), 1_000);
    ledger.set_balance(&AccountId::from("creator"), 1_000);
    for (voter, power) in voters {
        oracle.seed_account(voter, *power, &[SNAPSHOT]);
    }
    let engine = SessionEngine::new(
        oracle.clone(),
        ledger.clone(),
        SessionParams::default(),
        AccountId::from("creator"),
    );
    (engine, oracle, ledger)
}

fn open_session(engine: &mut SessionEngine, custom_quorum: u128) -> SessionId {
    engine
        .create_session(
            &AccountId::from("creator"),
            "Does the property hold?".to_string(),
            3_600,
            ContentRef::new("ipfs://QmProp"),
            custom_quorum,
            Timestamp::new(1_000),
            BlockHeight::new(HEIGHT),
        )
        .unwrap()
}

proptest! {
    /// The reported outcome is exactly the quorum + direction predicate
    /// applied to the recorded tallies, for any voter weights and choices.
    #[test]
    fn outcome_is_a_pure_function_of_recorded_votes(
        powers in prop::collection::vec(1u128..1_000_000, 1..6),
        approvals in prop::collection::vec(any::<bool>(), 6),
        quorum in 1u128..2_000_000,
    ) {
        let voters: Vec<(AccountId, u128)> = powers
            .iter()
            .enumerate()
            .map(|(i, p)| (AccountId::from(format!("voter{i}")), *p))
            .collect();
        let (mut engine, _oracle, _ledger) = engine_with(&voters);
        let id = open_session(&mut engine, quorum);

        let mut yes = 0u128;
        let mut no = 0u128;
        for ((voter, power), approve) in voters.iter().zip(&approvals) {
            engine
                .vote_in_session(voter, id, *approve, Timestamp::new(2_000))
                .unwrap();
            if *approve {
                yes += power;
            } else {
                no += power;
            }
        }
        let outcome = engine.end_session(id, Timestamp::new(10_000)).unwrap();

        prop_assert_eq!(outcome.quorum_met, yes + no >= quorum);
        prop_assert_eq!(outcome.result, yes + no >= quorum && yes > no);

        let stored = engine.get_session(id).unwrap();
        prop_assert_eq!(stored.tally.yes_power, yes);
        prop_assert_eq!(stored.tally.no_power, no);
    }

    /// The participant counter always equals the number of distinct
    /// voters whose vote landed.
    #[test]
    fn participants_count_distinct_voters_exactly(
        powers in prop::collection::vec(1u128..1_000_000, 1..6),
        repeats in prop::collection::vec(0usize..6, 4),
    ) {
        let voters: Vec<(AccountId, u128)> = powers
            .iter()
            .enumerate()
            .map(|(i, p)| (AccountId::from(format!("voter{i}")), *p))
            .collect();
        let (mut engine, _oracle, _ledger) = engine_with(&voters);
        let id = open_session(&mut engine, 500);

        for (voter, _) in &voters {
            engine
                .vote_in_session(voter, id, true, Timestamp::new(2_000))
                .unwrap();
        }
        // repeated attempts bounce off and never touch the counter
        for index in &repeats {
            if let Some((voter, _)) = voters.get(*index) {
                let _ = engine.vote_in_session(voter, id, false, Timestamp::new(2_500));
            }
        }

        let stored = engine.get_session(id).unwrap();
        prop_assert_eq!(stored.total_participants, voters.len() as u64);
        prop_assert_eq!(engine.votes_in(id).len(), voters.len());
    }

    /// No termination path creates or destroys ledger value: spendable +
    /// custody is constant, and the treasury only ever labels value
    /// still sitting in custody.
    #[test]
    fn ledger_value_is_conserved(
        power in 1u128..1_000_000,
        approve in any::<bool>(),
        quorum in 1u128..2_000_000,
        path in 0u8..3,
    ) {
        let voter = AccountId::from("voter0");
        let (mut engine, _oracle, ledger) = engine_with(&[(voter.clone(), power)]);
        let initial = ledger.balance_of(&AccountId::from("creator"));
        let id = open_session(&mut engine, quorum);
        engine
            .vote_in_session(&voter, id, approve, Timestamp::new(2_000))
            .unwrap();

        match path {
            0 => {
                engine.end_session(id, Timestamp::new(10_000)).unwrap();
            }
            1 => {
                engine
                    .cancel_session(&AccountId::from("creator"), id)
                    .unwrap();
            }
            _ => {
                engine
                    .grant_role(
                        &AccountId::from("creator"),
                        AccountId::from("mod"),
                        agora_access::Role::Moderator,
                    )
                    .unwrap();
                engine
                    .emergency_stop(&AccountId::from("mod"), id)
                    .unwrap();
            }
        }

        let spendable = ledger.balance_of(&AccountId::from("creator"));
        prop_assert_eq!(spendable + ledger.total_held(), initial);
        if engine.get_session(id).unwrap().deposit_refunded {
            prop_assert_eq!(ledger.total_held(), 0);
            prop_assert_eq!(engine.treasury(), 0);
        } else {
            // quorum miss: the forfeited deposit stays in custody, now
            // owned by the treasury rather than the creator
            prop_assert_eq!(ledger.total_held(), engine.treasury());
            prop_assert_eq!(engine.treasury(), engine.params().session_deposit);
        }
    }
}
