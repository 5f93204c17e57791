use ballot_console::commands::{coerce, coerce_all, CoercionError};
use ballot_console::descriptor::{Parameter, SemanticType};
use ballot_console::session::ArgValue;
use proptest::prelude::*;

fn number() -> Parameter {
    Parameter::new("index", SemanticType::Number)
}

proptest! {
    #[test]
    fn test_decimal_integers_coerce_to_numbers(n in any::<i64>()) {
        prop_assert_eq!(
            coerce(&number(), &n.to_string()),
            Ok(ArgValue::Number(n as i128))
        );
    }

    #[test]
    fn test_non_numeric_input_is_rejected(s in "[a-zA-Z ]{1,12}") {
        let is_not_a_number = matches!(coerce(&number(), &s), Err(CoercionError::NotANumber { .. }));
        prop_assert!(is_not_a_number);
    }

    #[test]
    fn test_text_is_taken_literally(s in "\\PC*") {
        let param = Parameter::new("label", SemanticType::Text);
        prop_assert_eq!(coerce(&param, &s), Ok(ArgValue::Text(s.clone())));
    }

    #[test]
    fn test_hex_bytes_decode(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let param = Parameter::new("key", SemanticType::Bytes);
        let input = format!("0x{}", hex::encode(&bytes));
        prop_assert_eq!(coerce(&param, &input), Ok(ArgValue::Bytes(bytes)));
    }

    #[test]
    fn test_argument_count_is_checked_first(extra in 1usize..4) {
        let params = vec![number()];
        let inputs = vec!["1".to_string(); 1 + extra];
        prop_assert_eq!(
            coerce_all(&params, &inputs),
            Err(CoercionError::ArgumentCount { expected: 1, actual: 1 + extra })
        );
    }
}
