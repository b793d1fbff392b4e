//! Property-based tests for the registration wizard
//!
//! Tests invariants:
//! - Selected events are always a subset of the loaded eligible events
//! - A superseded category response never changes the event list

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::core::registration::EligibleEvents;
use crate::tests::mocks::{eligible, filled_wizard};

#[derive(Debug, Clone)]
enum Op {
    Toggle(u64),
    Reload(Vec<u64>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u64..12).prop_map(Op::Toggle),
        1 => prop::collection::vec(0u64..12, 0..8).prop_map(Op::Reload),
    ]
}

proptest! {
    #[test]
    fn selection_stays_within_eligible(
        initial in prop::collection::vec(0u64..12, 0..8),
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let mut wizard = filled_wizard();
        let mut category = 2;
        let req = wizard.select_category(Some(category)).expect("fetch");
        wizard.apply_eligible_events::<String>(req.generation, Ok(eligible(&initial)));

        for op in ops {
            match op {
                Op::Toggle(id) => {
                    let eligible_before = wizard.eligible().contains(id);
                    let toggled = wizard.toggle_event(id);
                    prop_assert_eq!(toggled.is_some(), eligible_before);
                }
                Op::Reload(ids) => {
                    category += 1;
                    let req = wizard.select_category(Some(category)).expect("fetch");
                    wizard.apply_eligible_events::<String>(req.generation, Ok(eligible(&ids)));
                }
            }

            let loaded: BTreeSet<u64> = wizard.eligible().events().iter().map(|e| e.id).collect();
            prop_assert!(wizard.draft().events.is_subset(&loaded));
        }
    }

    #[test]
    fn stale_response_is_ignored(
        first in prop::collection::vec(0u64..12, 0..8),
        second in prop::collection::vec(0u64..12, 0..8),
    ) {
        let mut wizard = filled_wizard();
        let old = wizard.select_category(Some(2)).expect("fetch");
        let new = wizard.select_category(Some(3)).expect("fetch");

        prop_assert!(wizard.apply_eligible_events::<String>(new.generation, Ok(eligible(&second))));
        prop_assert!(!wizard.apply_eligible_events::<String>(old.generation, Ok(eligible(&first))));
        prop_assert_eq!(wizard.eligible(), &EligibleEvents::Loaded(eligible(&second)));
    }
}
