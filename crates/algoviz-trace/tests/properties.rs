use algoviz_core::{
    Activity, AlgorithmId, GraphBuilder, Input, InputKind, Item, Job, Outcome, StepKind, Symbol,
};
use algoviz_trace::generate;
use algoviz_trace::registry::expected_input;
use proptest::prelude::*;

const SORTS: [AlgorithmId; 6] = [
    AlgorithmId::BubbleSort,
    AlgorithmId::SelectionSort,
    AlgorithmId::InsertionSort,
    AlgorithmId::MergeSort,
    AlgorithmId::QuickSort,
    AlgorithmId::HeapSort,
];

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn every_sort_ends_with_the_sorted_array(
        values in proptest::collection::vec(-1000i64..1000, 0..40)
    ) {
        let mut expected = values.clone();
        expected.sort();
        let input = Input::Array { values };
        for id in SORTS {
            let trace = generate(id, &input).unwrap();
            let last = trace.last();
            prop_assert_eq!(last.kind, StepKind::Done, "{}", id);
            prop_assert_eq!(last.snapshot.values(), Some(expected.as_slice()), "{}", id);
            prop_assert_eq!(trace.outcome(), &Outcome::Sorted { values: expected.clone() });
        }
    }

    #[test]
    fn generation_is_deterministic(
        values in proptest::collection::vec(0i64..50, 1..30),
        target in 0i64..50,
    ) {
        for id in AlgorithmId::ALL {
            let input = sample(id, &values, target);
            let first = generate(id, &input).unwrap();
            let second = generate(id, &input).unwrap();
            prop_assert_eq!(first.fingerprint(), second.fingerprint(), "{}", id);
            prop_assert_eq!(first, second, "{}", id);
        }
    }

    #[test]
    fn distribution_sorts_agree_with_std(
        values in proptest::collection::vec(0i64..900, 0..60)
    ) {
        let mut expected = values.clone();
        expected.sort();
        let input = Input::Array { values };
        for id in [AlgorithmId::CountingSort, AlgorithmId::RadixSort] {
            let trace = generate(id, &input).unwrap();
            prop_assert_eq!(trace.last().snapshot.values(), Some(expected.as_slice()), "{}", id);
            prop_assert_eq!(trace.outcome(), &Outcome::Sorted { values: expected.clone() });
        }
    }

    #[test]
    fn sorted_searches_agree_with_membership(
        values in proptest::collection::btree_set(-200i64..200, 1..60),
        target in -220i64..220,
    ) {
        let values: Vec<i64> = values.into_iter().collect();
        let expected = values.binary_search(&target).ok();
        let input = Input::Search { values, target };
        for id in [
            AlgorithmId::LinearSearch,
            AlgorithmId::BinarySearch,
            AlgorithmId::JumpSearch,
            AlgorithmId::ExponentialSearch,
        ] {
            let trace = generate(id, &input).unwrap();
            prop_assert_eq!(trace.outcome(), &Outcome::Search { index: expected }, "{}", id);
        }
    }
}

/// A valid input for `id`. Array and search inputs come from `values`.
fn sample(id: AlgorithmId, values: &[i64], target: i64) -> Input {
    let graph = |directed: bool| {
        let builder = if directed {
            GraphBuilder::directed()
        } else {
            GraphBuilder::undirected()
        };
        builder
            .edge("A", "B", 2)
            .edge("B", "C", 1)
            .edge("A", "C", 4)
            .edge("C", "D", 3)
            .build()
    };
    match expected_input(id) {
        InputKind::Array => Input::Array {
            values: values.to_vec(),
        },
        InputKind::Search => {
            let mut sorted = values.to_vec();
            sorted.sort();
            Input::Search {
                values: sorted,
                target,
            }
        }
        InputKind::Graph => Input::Graph {
            graph: graph(matches!(
                id,
                AlgorithmId::TopologicalSort | AlgorithmId::Kosaraju
            )),
            source: 0,
        },
        InputKind::Knapsack => Input::Knapsack {
            items: vec![Item::new(2, 12), Item::new(1, 10), Item::new(3, 20), Item::new(2, 15)],
            capacity: 5,
        },
        InputKind::Activities => Input::Activities {
            activities: vec![
                Activity { start: 1, end: 4 },
                Activity { start: 3, end: 5 },
                Activity { start: 5, end: 7 },
            ],
        },
        InputKind::Jobs => Input::Jobs {
            jobs: vec![
                Job { deadline: 2, profit: 100 },
                Job { deadline: 1, profit: 19 },
                Job { deadline: 2, profit: 27 },
            ],
        },
        InputKind::Text => Input::Text {
            text: "ABABCABABA".into(),
            pattern: "ABA".into(),
        },
        InputKind::Sequences => Input::Sequences {
            first: "ABCBDAB".into(),
            second: "BDCABA".into(),
        },
        InputKind::Dimensions => Input::Dimensions {
            dims: vec![40, 20, 30, 10, 30],
        },
        InputKind::Frequencies => Input::Frequencies {
            symbols: vec![
                Symbol::new('a', 5),
                Symbol::new('b', 9),
                Symbol::new('c', 12),
                Symbol::new('d', 13),
            ],
        },
    }
}
