use crate::utils::{circuit_line, generated_type, identifier, interface};
use ballot_console::{extract, generate};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn circuits() -> impl Strategy<Value = Vec<(String, Vec<(String, &'static str)>, &'static str)>> {
    prop::collection::btree_set(identifier(), 0..8).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let len = names.len();
        (
            Just(names),
            prop::collection::vec(
                prop::collection::vec((identifier(), generated_type()), 0..4),
                len,
            ),
            prop::collection::vec(generated_type(), len),
        )
            .prop_map(|(names, params, returns)| {
                names
                    .into_iter()
                    .zip(params)
                    .zip(returns)
                    .map(|((name, params), ret)| (name, params, ret))
                    .collect()
            })
    })
}

proptest! {
    #[test]
    fn test_menu_has_one_entry_per_operation_plus_exit(circuits in circuits()) {
        let lines: Vec<String> = circuits
            .iter()
            .map(|(name, params, ret)| circuit_line(name, params, ret))
            .collect();
        let descriptor = extract(&interface(&lines)).unwrap();
        let commands = generate(&descriptor);

        prop_assert_eq!(commands.len(), circuits.len() + 1);
        prop_assert!(commands.last().unwrap().is_exit());
        for (command, (name, params, _)) in commands.iter().zip(&circuits) {
            prop_assert_eq!(&command.id, name);
            prop_assert_eq!(command.operation().unwrap().parameters.len(), params.len());
        }
    }

    #[test]
    fn test_extraction_is_idempotent(circuits in circuits()) {
        let lines: Vec<String> = circuits
            .iter()
            .map(|(name, params, ret)| circuit_line(name, params, ret))
            .collect();
        let text = interface(&lines);
        prop_assert_eq!(extract(&text).unwrap(), extract(&text).unwrap());
    }

    #[test]
    fn test_generated_suffix_is_stripped(name in identifier(), param in identifier()) {
        let line = circuit_line(&name, &[(param.clone(), "bigint")], "[]");
        let descriptor = extract(&interface(&[line])).unwrap();
        let op = &descriptor.operations[0];
        prop_assert_eq!(&op.parameters[0].name, &param);
        let names: BTreeSet<_> = descriptor.ledger_fields.keys().cloned().collect();
        prop_assert!(names.contains("round"));
    }
}
