use proptest::prelude::*;

use agora_voting::{QuorumRatio, Tally, VoteChoice};

fn choice_strategy() -> impl Strategy<Value = VoteChoice> {
    prop_oneof![
        Just(VoteChoice::Against),
        Just(VoteChoice::For),
        Just(VoteChoice::Abstain),
    ]
}

proptest! {
    /// required_power equals the naive floor formula wherever the naive
    /// formula is computable without overflow.
    #[test]
    fn required_power_matches_naive_formula(
        total in 0u128..(1u128 << 80),
        num in 0u32..=10_000,
        den in 1u32..=10_000,
    ) {
        prop_assume!(num <= den);
        let ratio = QuorumRatio::new(num, den).unwrap();
        let naive = total * num as u128 / den as u128;
        prop_assert_eq!(ratio.required_power(total), naive);
    }

    /// required_power never exceeds the total supply.
    #[test]
    fn required_power_bounded_by_total(
        total in 0u128..u128::MAX,
        num in 0u32..=1_000,
        den in 1u32..=1_000,
    ) {
        prop_assume!(num <= den);
        let ratio = QuorumRatio::new(num, den).unwrap();
        prop_assert!(ratio.required_power(total) <= total);
    }

    /// Tally conservation: total() equals the sum of every recorded weight.
    #[test]
    fn tally_conserves_recorded_power(
        votes in prop::collection::vec((choice_strategy(), 0u128..(1u128 << 64)), 0..64)
    ) {
        let mut tally = Tally::new();
        let mut expected: u128 = 0;
        for (choice, power) in &votes {
            tally.record(*choice, *power).unwrap();
            expected += power;
        }
        prop_assert_eq!(tally.total(), expected);
    }

    /// passes() is exactly "strictly more For than Against".
    #[test]
    fn passes_is_strict_inequality(
        for_power in 0u128..(1u128 << 64),
        against_power in 0u128..(1u128 << 64),
    ) {
        let mut tally = Tally::new();
        tally.record(VoteChoice::For, for_power).unwrap();
        tally.record(VoteChoice::Against, against_power).unwrap();
        prop_assert_eq!(tally.passes(), for_power > against_power);
    }
}
