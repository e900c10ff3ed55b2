use super::*;
use crate::data::{ParseGraph, ParseItem, Source};
use crate::expression::ComparisonKind;
use crate::shorthand::*;
use crate::ParseConfig;
use pretty_assertions::assert_eq;

fn env(bytes: &[u8]) -> Environment {
    Environment::from_config(Source::bytes(bytes.to_vec()), 0, &ParseConfig::default())
}

fn run(token: &Token, bytes: &[u8]) -> Option<ParseState> {
    token.parse(&env(bytes)).unwrap()
}

fn values(state: &ParseState, name: &str) -> Vec<Vec<u8>> {
    ref_name(name)
        .eval(state, &Encoding::default())
        .unwrap()
        .iter()
        .map(|value| value.as_ref().map(|v| v.as_bytes().to_vec()).unwrap_or_default())
        .collect()
}

fn count_references(graph: &ParseGraph) -> usize {
    let mut count = 0;
    let mut pending = vec![graph.clone()];
    while let Some(graph) = pending.pop() {
        for item in graph.items() {
            match item {
                ParseItem::Graph(child) => pending.push(child.clone()),
                ParseItem::Reference(_) => count += 1,
                ParseItem::Value(_) => {}
            }
        }
    }
    count
}

#[test]
fn test_token_identity() {
    let a = def("a", 1);
    assert_eq!(a, a.clone());
    assert_ne!(a, def("a", 1));
    assert!(rep("r", a.clone()).is_iterable());
    assert!(!seq("s", []).is_iterable());
    assert!(seq("s", []).is_scope_delimiter());
    assert!(!cho("c", []).is_scope_delimiter());
    assert_eq!(a.to_string(), "Def(a)");
    assert_eq!(opt("", a).to_string(), "Opt");
}

#[test]
fn test_stands_for() {
    let node = seq("node", []);
    assert!(node.stands_for(&node));
    assert!(node.stands_for(&token("node")));
    assert!(!node.stands_for(&token("other")));
    assert!(!node.stands_for(&seq("node", [])));
}

mod field {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_def_reads_bytes() {
        let state = run(&def("a", 2), &[1, 2, 3]).unwrap();
        assert_eq!(state.offset(), 2);
        assert_eq!(values(&state, "a"), vec![vec![1, 2]]);
    }

    #[test]
    fn test_def_past_end_fails() {
        assert_eq!(run(&def("a", 4), &[1, 2, 3]), None);
    }

    #[test]
    fn test_def_size_from_expression() {
        let grammar = seq("s", [def("len", 1), def("data", last(ref_name("len")))]);
        let state = run(&grammar, &[2, 7, 8, 9]).unwrap();
        assert_eq!(state.offset(), 3);
        assert_eq!(values(&state, "data"), vec![vec![7, 8]]);
    }

    #[test]
    fn test_def_unusable_size_fails() {
        assert_eq!(run(&def("a", -1), &[1]), None);
        assert_eq!(run(&def("a", ref_name("missing")), &[1]), None);
        assert_eq!(run(&def("a", div(1, 0)), &[1]), None);
    }

    #[test]
    fn test_def_zero_size_is_empty_value() {
        let state = run(&def("a", 0), &[]).unwrap();
        assert_eq!(values(&state, "a"), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_def_predicate() {
        assert!(run(&def_with("a", 1, eq_num(7)), &[7]).is_some());
        assert_eq!(run(&def_with("a", 1, eq_num(7)), &[8]), None);
    }

    #[test]
    fn test_def_encoding_override() {
        let state = run(&def_encoded("a", 1, Encoding::signed()), &[0xff]).unwrap();
        let value = state.order().current().unwrap().value().clone();
        assert_eq!(value.as_numeric(), num_bigint::BigInt::from(-1));

        let little = Token::with_encoding(
            "s",
            TokenKind::Seq(vec![def("a", 2)]),
            Encoding::little_endian(),
        );
        let state = run(&little, &[1, 0]).unwrap();
        let value = state.order().current().unwrap().value().clone();
        assert_eq!(value.as_numeric(), num_bigint::BigInt::from(1));
    }

    #[test]
    fn test_nod_skips_without_value() {
        let state = run(&seq("s", [nod(2), def("a", 1)]), &[1, 2, 3]).unwrap();
        assert_eq!(state.order().value_count(), 1);
        assert_eq!(values(&state, "a"), vec![vec![3]]);
        assert_eq!(run(&nod(4), &[1, 2, 3]), None);
        assert_eq!(run(&nod(0), &[]).map(|s| s.offset()), Some(0));
    }

    #[test]
    fn test_until_excludes_terminator() {
        let line = until("line", def_with("newline", 1, eq(con_bytes(b"\n"))));
        let state = run(&repn("", line, 2), b"ab\ncd\n").unwrap();
        assert_eq!(values(&state, "line"), vec![b"cd".to_vec(), b"ab".to_vec()]);
        assert_eq!(values(&state, "newline").len(), 2);
        assert_eq!(state.offset(), 6);
    }

    #[test]
    fn test_until_includes_terminator() {
        let ends_line = compare(
            ComparisonKind::EqNum,
            modulo(last(ref_name("line")), 256),
            con(10),
        );
        let line = until_with("line", 1, 1, None, post("", seq("", []), ends_line));
        let state = run(&repn("", line, 2), b"ab\ncd\n").unwrap();
        assert_eq!(values(&state, "line"), vec![b"cd\n".to_vec(), b"ab\n".to_vec()]);
    }

    #[test]
    fn test_until_zero_size_adds_no_value() {
        let state = run(&until("u", def("t", 1)), &[5]).unwrap();
        assert!(values(&state, "u").is_empty());
        assert_eq!(values(&state, "t"), vec![vec![5]]);
    }

    #[test]
    fn test_until_bounds() {
        let zero = def_with("t", 1, eq_num(0));
        let bounded = until_with("u", 0, 1, Some(con(2)), zero.clone());
        assert_eq!(run(&bounded, &[1, 1, 1, 0]), None);
        assert_eq!(values(&run(&bounded, &[1, 0]).unwrap(), "u"), vec![vec![1]]);

        assert_eq!(run(&until_with("u", -1, 1, None, zero.clone()), &[0]), None);
        assert_eq!(run(&until_with("u", 0, 0, None, zero.clone()), &[1, 0]), None);
        // runs out of input
        assert_eq!(run(&until("u", zero), &[1, 1]), None);
    }
}

mod structure {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seq_nests_a_graph() {
        let state = run(&seq("s", [def("a", 1), def("b", 1)]), &[1, 2]).unwrap();
        assert_eq!(state.order().len(), 1);
        let Some(ParseItem::Graph(child)) = state.order().head() else {
            panic!("expected a nested graph");
        };
        assert_eq!(child.definition().map(Token::name), Some("s"));
        assert_eq!(child.len(), 2);
        assert_eq!(state.order().to_string(), "pg(pg(pval(b:0x02),pval(a:0x01)))");
    }

    #[test]
    fn test_seq_fails_as_a_whole() {
        assert_eq!(run(&seq("s", [def("a", 1), def("b", 1)]), &[1]), None);
        assert!(run(&seq("s", []), &[]).is_some());
    }

    #[test]
    fn test_cho_takes_first_match_and_backtracks() {
        let grammar = cho(
            "c",
            [
                seq("", [def("a", 1), def_with("b", 1, eq_num(9))]),
                def("c", 1),
            ],
        );
        let state = run(&grammar, &[1, 2]).unwrap();
        assert!(values(&state, "a").is_empty());
        assert_eq!(values(&state, "c"), vec![vec![1]]);
        assert_eq!(state.offset(), 1);
        assert_eq!(run(&cho("c", []), &[1]), None);
    }

    #[test]
    fn test_opt_returns_original_state() {
        let env = env(&[1]);
        let grammar = opt("o", def_with("a", 1, eq_num(5)));
        assert_eq!(grammar.parse(&env).unwrap().as_ref(), Some(env.parse_state()));
        let matched = opt("o", def("a", 1)).parse(&env).unwrap().unwrap();
        assert_eq!(matched.offset(), 1);
    }

    #[test]
    fn test_pre_false_skips_body() {
        let env = env(&[1]);
        let skipped = pre("p", def("a", 1), not(always())).parse(&env).unwrap();
        assert_eq!(skipped.as_ref(), Some(env.parse_state()));
        let parsed = pre("p", def("a", 1), always()).parse(&env).unwrap().unwrap();
        assert_eq!(parsed.offset(), 1);
        assert_eq!(pre("p", def("a", 2), always()).parse(&env).unwrap(), None);
    }

    #[test]
    fn test_post_checks_last_value() {
        assert!(run(&post("p", def("a", 1), eq_num(1)), &[1]).is_some());
        assert_eq!(run(&post("p", def("a", 1), eq_num(1)), &[2]), None);
    }
}

mod repetition {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rep_until_failure() {
        let state = run(&rep("r", def("a", 1)), &[1, 2, 3]).unwrap();
        assert_eq!(values(&state, "a").len(), 3);
        assert_eq!(state.offset(), 3);
        assert!(state.iterations().is_empty());
    }

    #[test]
    fn test_rep_zero_iterations() {
        let state = run(&rep("r", def("a", 1)), &[]).unwrap();
        assert_eq!(state.offset(), 0);
        assert_eq!(state.order().value_count(), 0);
    }

    #[test]
    fn test_rep_stops_without_progress() {
        let grammar = rep("r", opt("", def_with("a", 1, eq_num(1))));
        let state = run(&grammar, &[1, 1, 2]).unwrap();
        assert_eq!(state.offset(), 2);
        assert_eq!(run(&rep("r", nod(0)), &[1]).map(|s| s.offset()), Some(0));
    }

    #[test]
    fn test_repn_empty_values() {
        let grammar = seq("", [def("n", 1), repn("r", def("a", 0), last(ref_name("n")))]);
        let state = run(&grammar, &[3]).unwrap();
        assert_eq!(values(&state, "a").len(), 3);
    }

    #[test]
    fn test_repn_count() {
        let grammar = seq("", [def("n", 1), repn("r", def("a", 1), last(ref_name("n")))]);
        let state = run(&grammar, &[2, 7, 8, 9]).unwrap();
        assert_eq!(state.offset(), 3);
        assert_eq!(run(&grammar, &[4, 7, 8]), None);
        assert!(run(&repn("r", def("a", 1), 0), &[]).is_some());
        assert_eq!(run(&repn("r", def("a", 1), ref_name("missing")), &[1]), None);
        assert_eq!(run(&repn("r", def("a", 1), -1), &[1]), None);
    }

    #[test]
    fn test_while() {
        let grammar = whl(
            "w",
            def("a", 1),
            compare(ComparisonKind::LtNum, count(ref_name("a")), 2),
        );
        assert_eq!(run(&grammar, &[1, 2, 3]).map(|s| s.offset()), Some(2));
        assert_eq!(run(&whl("w", def("a", 1), always()), &[1]), None);
        assert_eq!(run(&whl("w", def("a", 1), not(always())), &[]).map(|s| s.offset()), Some(0));
    }

    #[test]
    fn test_long_repetition() {
        let input = vec![0u8; 100_000];
        let state = run(&rep("r", def("a", 1)), &input).unwrap();
        assert_eq!(state.order().value_count(), 100_000);
    }
}

mod redirect {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tie_parses_value_bytes() {
        let grammar = seq(
            "",
            [
                def("blob", 3),
                tie("t", seq("", [def("x", 1), def("y", 2)]), last(ref_name("blob"))),
            ],
        );
        let state = run(&grammar, &[1, 2, 3, 4]).unwrap();
        assert_eq!(state.offset(), 3);
        assert_eq!(values(&state, "x"), vec![vec![1]]);
        assert_eq!(values(&state, "y"), vec![vec![2, 3]]);
        let y = state.order().current().unwrap();
        assert_eq!(y.value().slice().offset(), 1);
        assert_ne!(y.value().slice().source(), state.source());
    }

    #[test]
    fn test_tie_oldest_first() {
        let grammar = seq(
            "",
            [def("blob", 1), def("blob", 1), tie("t", def("x", 1), ref_name("blob"))],
        );
        let state = run(&grammar, &[1, 2]).unwrap();
        assert_eq!(values(&state, "x"), vec![vec![2], vec![1]]);
    }

    #[test]
    fn test_tie_restores_context() {
        let grammar = seq(
            "",
            [def("blob", 2), tie("t", rep("r", def("x", 1)), last(ref_name("blob")))],
        );
        let before = env(&[1, 2, 3]);
        let state = grammar.parse(&before).unwrap().unwrap();
        assert_eq!(state.source(), before.parse_state().source());
        assert_eq!(state.scope_depth(), 0);
        assert!(state.iterations().is_empty());
        assert_eq!(values(&state, "x").len(), 2);
    }

    #[test]
    fn test_tie_fails_on_nothing() {
        assert_eq!(run(&tie("t", def("x", 1), ref_name("missing")), &[1]), None);
        let grammar = seq("", [def("blob", 1), tie("t", def("x", 2), ref_name("blob"))]);
        assert_eq!(run(&grammar, &[1]), None);
    }

    #[test]
    fn test_sub_returns_to_offset() {
        let grammar = seq(
            "",
            [def("ptr", 1), sub_token("s", def("target", 1), last(ref_name("ptr")))],
        );
        let state = run(&grammar, &[2, 0, 42]).unwrap();
        assert_eq!(state.offset(), 1);
        assert_eq!(values(&state, "target"), vec![vec![42]]);
        assert_eq!(run(&grammar, &[9, 0]), None);
    }

    #[test]
    fn test_sub_visits_addresses_oldest_first() {
        let grammar = seq(
            "",
            [
                def("ptr", 1),
                def("ptr", 1),
                sub_token("s", def("target", 1), ref_name("ptr")),
            ],
        );
        let state = run(&grammar, &[3, 2, 10, 20]).unwrap();
        assert_eq!(values(&state, "target"), vec![vec![10], vec![20]]);
        assert_eq!(state.offset(), 2);
    }

    #[test]
    fn test_sub_unusable_address_fails() {
        assert_eq!(run(&sub_token("s", def("t", 1), div(1, 0)), &[1]), None);
        assert_eq!(run(&sub_token("s", def("t", 1), ref_name("none")), &[1]), None);
    }

    #[test]
    fn test_sub_cycle_becomes_reference() {
        let node = seq(
            "node",
            [def("next", 1), sub_token("", token("node"), last(ref_name("next")))],
        );
        let top = sub_token("", node, con(0));
        let state = run(&top, &[1, 0]).unwrap();
        assert_eq!(count_references(state.order()), 1);
        assert_eq!(values(&state, "next"), vec![vec![0], vec![1]]);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_tie_windows_with_equal_bytes_are_distinct() {
        let grammar = seq(
            "",
            [
                def("d", 1),
                def("d", 1),
                tie("", sub_token("", def("x", 1), con(0)), ref_name("d")),
            ],
        );
        for input in [[5u8, 5], [5, 6]] {
            let state = run(&grammar, &input).unwrap();
            assert_eq!(values(&state, "x").len(), 2);
            assert_eq!(count_references(state.order()), 0);
        }
    }

    #[test]
    fn test_left_recursion_becomes_reference() {
        let list = seq("list", [opt("", token("list")), def("item", 1)]);
        let state = run(&list, &[1, 2, 3]).unwrap();
        assert_eq!(count_references(state.order()), 1);
        assert_eq!(values(&state, "item"), vec![vec![1]]);
        assert_eq!(state.offset(), 1);

        let list_graph = state.order().head().unwrap().as_graph().unwrap();
        let opt_graph = list_graph.items().nth(1).unwrap().as_graph().unwrap();
        let reference = opt_graph.head().unwrap().as_reference().unwrap();
        assert_eq!(reference.location(), 0);
        assert_eq!(reference.definition(), &list);
        assert_eq!(reference.resolve(state.order()).as_ref(), Some(list_graph));
    }

    #[test]
    fn test_token_ref() {
        let grammar = seq("", [seq("pair", [def("a", 1)]), token("pair")]);
        let state = run(&grammar, &[1, 2]).unwrap();
        assert_eq!(values(&state, "a"), vec![vec![2], vec![1]]);
        assert_eq!(run(&token("missing"), &[1]), None);
    }

    #[test]
    fn test_recursive_grammar_is_stack_safe() {
        let list = seq("list", [def("v", 1), opt("", token("list"))]);
        let input = vec![1u8; 2_000];
        let state = run(&list, &input).unwrap();
        assert_eq!(state.offset(), 2_000);
        assert_eq!(state.order().value_count(), 2_000);
    }
}
