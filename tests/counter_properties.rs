/*!
 * Counter Gate Property Tests
 */

use proptest::prelude::*;
use std::thread;
use std::time::Duration;
use sync_gate::{Count, CounterGate, WaitOutcome};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn wait_equal_depends_only_on_final_value(deltas in prop::collection::vec(1i64..10, 1..12)) {
        let target: Count = deltas.iter().sum();
        let counter = CounterGate::new(true, 0);

        let outcome = thread::scope(|s| {
            let waiter = s.spawn(|| counter.wait_equal(target, Some(Duration::from_secs(5))));
            for delta in &deltas {
                counter.increase(*delta);
            }
            waiter.join().unwrap()
        });

        prop_assert_eq!(outcome, WaitOutcome::ConditionMet);
        prop_assert_eq!(counter.value(), target);
    }

    #[test]
    fn increase_decrease_is_plain_arithmetic(
        start in -1_000i64..1_000,
        ops in prop::collection::vec((any::<bool>(), 0i64..1_000), 0..32),
    ) {
        let counter = CounterGate::new(true, start);
        let mut expected = start;
        for (up, delta) in ops {
            if up {
                counter.increase(delta);
                expected += delta;
            } else {
                counter.decrease(delta);
                expected -= delta;
            }
        }
        prop_assert_eq!(counter.value(), expected);
    }

    #[test]
    fn disabled_counter_never_reports_condition_met(value in any::<i64>(), target in any::<i64>()) {
        let counter = CounterGate::new(false, value);
        prop_assert_eq!(counter.wait_equal(target, None), WaitOutcome::Disabled);
        prop_assert_eq!(counter.wait_at_least(target, None), WaitOutcome::Disabled);
        prop_assert_eq!(counter.wait_greater(target, None), WaitOutcome::Disabled);
    }
}
