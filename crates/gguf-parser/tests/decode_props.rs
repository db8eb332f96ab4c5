//! Property tests for the byte-array/text heuristic in `decode_field`.

use gguf_parser::{FieldValue, GGUFValue, decode_field};
use proptest::prelude::*;

fn as_raw(bytes: &[u8]) -> GGUFValue {
    GGUFValue::Array(bytes.iter().map(|b| GGUFValue::Uint8(*b)).collect())
}

/// ASCII bytes that are not letters.
fn non_alpha_byte() -> impl Strategy<Value = u8> {
    (0u8..0x80).prop_filter("not a letter", |b| !b.is_ascii_alphabetic())
}

proptest! {
    #[test]
    fn byte_arrays_with_a_letter_decode_to_text(
        mut bytes in prop::collection::vec(any::<u8>(), 1..64),
        letter in prop::char::range('a', 'z'),
        at in any::<prop::sample::Index>(),
    ) {
        let pos = at.index(bytes.len() + 1);
        bytes.insert(pos, letter as u8);

        let decoded = decode_field(&as_raw(&bytes));
        let expected = String::from_utf8_lossy(&bytes).into_owned();
        prop_assert_eq!(decoded, Some(FieldValue::Str(expected)));
    }

    #[test]
    fn byte_arrays_without_letters_stay_numeric(
        bytes in prop::collection::vec(non_alpha_byte(), 2..64),
    ) {
        let decoded = decode_field(&as_raw(&bytes));
        let expected = bytes.iter().map(|b| FieldValue::Int(i64::from(*b))).collect();
        prop_assert_eq!(decoded, Some(FieldValue::List(expected)));
    }

    #[test]
    fn single_element_arrays_unwrap(v in any::<u32>()) {
        let decoded = decode_field(&GGUFValue::Array(vec![GGUFValue::Uint32(v)]));
        prop_assert_eq!(decoded, Some(FieldValue::Int(i64::from(v))));
    }
}
