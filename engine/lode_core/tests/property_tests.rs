#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests: the value cache against a full graph scan.

use lode_core::shorthand::{def, seq};
use lode_core::{
    selection, CacheMode, Encoding, Limit, ParseState, ParseValue, Source, Token, Value,
};
use proptest::prelude::*;

const NAMES: [&str; 3] = ["a", "b", "c"];

#[derive(Clone, Debug)]
enum Op {
    Add { name: usize, byte: u8 },
    Open,
    Close,
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0..NAMES.len(), any::<u8>()).prop_map(|(name, byte)| Op::Add { name, byte }),
        1 => Just(Op::Open),
        1 => Just(Op::Close),
    ];
    prop::collection::vec(op, 0..80)
}

/// Apply `ops` to an empty state, ignoring closes without an open branch.
fn build(ops: &[Op], mode: CacheMode) -> ParseState {
    let definitions: Vec<Token> = NAMES.iter().map(|name| def(name, 1)).collect();
    let group = seq("group", []);
    let mut state = ParseState::new(Source::bytes(Vec::<u8>::new()), 0, mode);
    let mut open = 0usize;
    for op in ops {
        state = match op {
            Op::Add { name, byte } => {
                let value = ParseValue::new(
                    NAMES[*name],
                    definitions[*name].clone(),
                    Value::from_bytes(vec![*byte], Encoding::default()),
                )
                .unwrap();
                state.add(value)
            }
            Op::Open => {
                open += 1;
                state.add_branch(&group)
            }
            Op::Close if open > 0 => {
                open -= 1;
                state.close_branch(&group).unwrap()
            }
            Op::Close => state,
        };
    }
    state
}

fn bytes(values: &lode_list::ImmutableList<ParseValue>) -> Vec<u8> {
    values.iter().map(|value| value.value().as_bytes()[0]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn cache_matches_scan(ops in ops(), limit in prop::option::of(0usize..6)) {
        let limit = limit.map_or(Limit::Unbounded, Limit::AtMost);
        let cached = build(&ops, CacheMode::Enabled);
        let uncached = build(&ops, CacheMode::Disabled);
        prop_assert_eq!(&cached, &uncached);
        for name in NAMES {
            let from_cache = cached.cache().find(name, limit).unwrap();
            let from_scan = selection::get_all_values_by_name(uncached.order(), name, limit);
            prop_assert_eq!(bytes(&from_cache), bytes(&from_scan));
        }
    }

    #[test]
    fn ref_is_the_same_with_or_without_cache(ops in ops()) {
        let cached = build(&ops, CacheMode::Enabled);
        let uncached = build(&ops, CacheMode::Disabled);
        for name in NAMES {
            let expr = lode_core::shorthand::ref_name(name);
            prop_assert_eq!(
                expr.eval(&cached, &Encoding::default()).unwrap(),
                expr.eval(&uncached, &Encoding::default()).unwrap()
            );
        }
    }
}
