//! Algorithm selection by identifier.

use algoviz_core::{AlgorithmId, Input, InputKind, Trace, TraceError, ValidationError};

use crate::adapters::{
    branch_and_bound, check_graph, check_non_negative_weights, dynamic, greedy, searching,
    shortest_path, sorting, spanning_tree, string_matching, traversal,
};

/// The input variant an algorithm consumes.
pub fn expected_input(algorithm: AlgorithmId) -> InputKind {
    use AlgorithmId::*;
    match algorithm {
        BubbleSort | SelectionSort | InsertionSort | MergeSort | QuickSort | HeapSort
        | CountingSort | RadixSort => InputKind::Array,
        LinearSearch | BinarySearch | JumpSearch | ExponentialSearch => InputKind::Search,
        BreadthFirstSearch | DepthFirstSearch | TopologicalSort | Kosaraju | Dijkstra
        | BellmanFord | FloydWarshall | Prim | Kruskal | TravellingSalesman => InputKind::Graph,
        ZeroOneKnapsack | FractionalKnapsack => InputKind::Knapsack,
        LongestCommonSubsequence => InputKind::Sequences,
        MatrixChain => InputKind::Dimensions,
        ActivitySelection => InputKind::Activities,
        JobScheduling => InputKind::Jobs,
        HuffmanCoding => InputKind::Frequencies,
        NaiveStringMatch | RabinKarp | KnuthMorrisPratt => InputKind::Text,
    }
}

fn mismatch(algorithm: AlgorithmId, input: &Input) -> ValidationError {
    ValidationError::InputMismatch {
        algorithm,
        expected: expected_input(algorithm),
        got: input.kind(),
    }
}

/// Checks `input` against `algorithm`'s preconditions without recording
/// anything. [`generate`] fails with exactly this error for the same pair.
pub fn validate(algorithm: AlgorithmId, input: &Input) -> Result<(), ValidationError> {
    use AlgorithmId::*;
    match (algorithm, input) {
        (BubbleSort | SelectionSort | InsertionSort | MergeSort | QuickSort | HeapSort, Input::Array { values }) => {
            sorting::check_array(values)
        }
        (CountingSort, Input::Array { values }) => sorting::check_counting(values),
        (RadixSort, Input::Array { values }) => sorting::check_radix(values),
        (LinearSearch, Input::Search { values, .. }) => searching::check_non_empty(values),
        (BinarySearch | JumpSearch | ExponentialSearch, Input::Search { values, .. }) => {
            searching::check_sorted(values)
        }
        (BreadthFirstSearch | DepthFirstSearch | BellmanFord, Input::Graph { graph, source }) => {
            check_graph(graph, Some(*source))
        }
        (TopologicalSort, Input::Graph { graph, .. }) => traversal::check_topological(graph),
        (Kosaraju, Input::Graph { graph, .. }) => traversal::check_kosaraju(graph),
        (Dijkstra, Input::Graph { graph, source }) => {
            check_graph(graph, Some(*source))?;
            check_non_negative_weights(graph)
        }
        (FloydWarshall, Input::Graph { graph, .. }) => shortest_path::check_floyd_warshall(graph),
        (Prim, Input::Graph { graph, source }) => spanning_tree::check_prim(graph, *source),
        (Kruskal, Input::Graph { graph, .. }) => spanning_tree::check_kruskal(graph),
        (ZeroOneKnapsack, Input::Knapsack { items, capacity }) => {
            dynamic::check_knapsack(items, *capacity)
        }
        (FractionalKnapsack, Input::Knapsack { items, capacity }) => {
            greedy::check_fractional(items, *capacity)
        }
        (LongestCommonSubsequence, Input::Sequences { first, second }) => {
            dynamic::check_sequences(first, second)
        }
        (MatrixChain, Input::Dimensions { dims }) => dynamic::check_chain(dims),
        (ActivitySelection, Input::Activities { activities }) => {
            greedy::check_activities(activities)
        }
        (JobScheduling, Input::Jobs { jobs }) => greedy::check_jobs(jobs),
        (HuffmanCoding, Input::Frequencies { symbols }) => greedy::check_symbols(symbols),
        (NaiveStringMatch | RabinKarp | KnuthMorrisPratt, Input::Text { text, pattern }) => {
            string_matching::check_text(text, pattern)
        }
        (TravellingSalesman, Input::Graph { graph, source }) => {
            branch_and_bound::check_tour(graph, *source)
        }
        _ => Err(mismatch(algorithm, input)),
    }
}

/// Runs `algorithm` on `input` and returns its trace.
///
/// Pure and deterministic. Input problems surface as
/// [`TraceError::Validation`] before any step is recorded.
pub fn generate(algorithm: AlgorithmId, input: &Input) -> Result<Trace, TraceError> {
    use AlgorithmId::*;
    let trace = match (algorithm, input) {
        (BubbleSort, Input::Array { values }) => sorting::bubble_sort(values),
        (SelectionSort, Input::Array { values }) => sorting::selection_sort(values),
        (InsertionSort, Input::Array { values }) => sorting::insertion_sort(values),
        (MergeSort, Input::Array { values }) => sorting::merge_sort(values),
        (QuickSort, Input::Array { values }) => sorting::quick_sort(values),
        (HeapSort, Input::Array { values }) => sorting::heap_sort(values),
        (CountingSort, Input::Array { values }) => sorting::counting_sort(values),
        (RadixSort, Input::Array { values }) => sorting::radix_sort(values),

        (LinearSearch, Input::Search { values, target }) => searching::linear_search(values, *target),
        (BinarySearch, Input::Search { values, target }) => searching::binary_search(values, *target),
        (JumpSearch, Input::Search { values, target }) => searching::jump_search(values, *target),
        (ExponentialSearch, Input::Search { values, target }) => {
            searching::exponential_search(values, *target)
        }

        (BreadthFirstSearch, Input::Graph { graph, source }) => {
            traversal::breadth_first_search(graph, *source)
        }
        (DepthFirstSearch, Input::Graph { graph, source }) => {
            traversal::depth_first_search(graph, *source)
        }
        (TopologicalSort, Input::Graph { graph, .. }) => traversal::topological_sort(graph),
        (Kosaraju, Input::Graph { graph, .. }) => traversal::kosaraju(graph),
        (Dijkstra, Input::Graph { graph, source }) => shortest_path::dijkstra(graph, *source),
        (BellmanFord, Input::Graph { graph, source }) => shortest_path::bellman_ford(graph, *source),
        (FloydWarshall, Input::Graph { graph, .. }) => shortest_path::floyd_warshall(graph),
        (Prim, Input::Graph { graph, source }) => spanning_tree::prim(graph, *source),
        (Kruskal, Input::Graph { graph, .. }) => spanning_tree::kruskal(graph),

        (ZeroOneKnapsack, Input::Knapsack { items, capacity }) => {
            dynamic::zero_one_knapsack(items, *capacity)
        }
        (LongestCommonSubsequence, Input::Sequences { first, second }) => {
            dynamic::longest_common_subsequence(first, second)
        }
        (MatrixChain, Input::Dimensions { dims }) => dynamic::matrix_chain(dims),
        (FractionalKnapsack, Input::Knapsack { items, capacity }) => {
            greedy::fractional_knapsack(items, *capacity)
        }
        (ActivitySelection, Input::Activities { activities }) => {
            greedy::activity_selection(activities)
        }
        (JobScheduling, Input::Jobs { jobs }) => greedy::job_scheduling(jobs),
        (HuffmanCoding, Input::Frequencies { symbols }) => greedy::huffman_coding(symbols),

        (NaiveStringMatch, Input::Text { text, pattern }) => {
            string_matching::naive_string_match(text, pattern)
        }
        (RabinKarp, Input::Text { text, pattern }) => string_matching::rabin_karp(text, pattern),
        (KnuthMorrisPratt, Input::Text { text, pattern }) => {
            string_matching::knuth_morris_pratt(text, pattern)
        }

        (TravellingSalesman, Input::Graph { graph, source }) => {
            branch_and_bound::travelling_salesman(graph, *source)
        }

        _ => Err(mismatch(algorithm, input).into()),
    };
    if let Err(err) = &trace {
        tracing::debug!(%algorithm, error = %err, "trace generation failed");
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_core::{Activity, GraphBuilder, Item, Job, Symbol};

    /// One valid input per input kind.
    fn sample(kind: InputKind) -> Input {
        match kind {
            InputKind::Array => Input::Array {
                values: vec![5, 2, 9, 1],
            },
            InputKind::Search => Input::Search {
                values: vec![1, 3, 5, 7],
                target: 5,
            },
            InputKind::Graph => Input::Graph {
                graph: GraphBuilder::undirected()
                    .edge("A", "B", 2)
                    .edge("B", "C", 1)
                    .edge("A", "C", 4)
                    .build(),
                source: 0,
            },
            InputKind::Knapsack => Input::Knapsack {
                items: vec![Item::new(1, 3), Item::new(2, 4)],
                capacity: 2,
            },
            InputKind::Activities => Input::Activities {
                activities: vec![Activity { start: 0, end: 2 }, Activity { start: 1, end: 3 }],
            },
            InputKind::Jobs => Input::Jobs {
                jobs: vec![Job { deadline: 1, profit: 5 }, Job { deadline: 2, profit: 1 }],
            },
            InputKind::Text => Input::Text {
                text: "abcab".into(),
                pattern: "ab".into(),
            },
            InputKind::Sequences => Input::Sequences {
                first: "abc".into(),
                second: "ac".into(),
            },
            InputKind::Dimensions => Input::Dimensions {
                dims: vec![10, 30, 5, 60],
            },
            InputKind::Frequencies => Input::Frequencies {
                symbols: vec![Symbol::new('a', 3), Symbol::new('b', 1), Symbol::new('c', 2)],
            },
        }
    }

    #[test]
    fn every_algorithm_generates_from_its_expected_input() {
        for id in AlgorithmId::ALL {
            // Kahn's and Kosaraju's algorithms need a directed graph.
            let input = if matches!(id, AlgorithmId::TopologicalSort | AlgorithmId::Kosaraju) {
                Input::Graph {
                    graph: GraphBuilder::directed().edge("A", "B", 1).build(),
                    source: 0,
                }
            } else {
                sample(expected_input(id))
            };
            assert!(validate(id, &input).is_ok(), "{id}");
            let trace = generate(id, &input).unwrap_or_else(|e| panic!("{id}: {e}"));
            assert_eq!(trace.algorithm(), id);
            assert!(!trace.is_empty());
        }
    }

    #[test]
    fn mismatched_input_is_a_validation_error() {
        let input = sample(InputKind::Text);
        let err = generate(AlgorithmId::Dijkstra, &input).unwrap_err();
        assert_eq!(
            err,
            TraceError::Validation(ValidationError::InputMismatch {
                algorithm: AlgorithmId::Dijkstra,
                expected: InputKind::Graph,
                got: InputKind::Text,
            })
        );
        assert_eq!(err.as_validation(), validate(AlgorithmId::Dijkstra, &input).err().as_ref());
    }

    #[test]
    fn validate_agrees_with_generate_on_bad_input() {
        let input = Input::Search {
            values: vec![3, 1],
            target: 1,
        };
        let from_validate = validate(AlgorithmId::BinarySearch, &input).unwrap_err();
        let from_generate = generate(AlgorithmId::BinarySearch, &input).unwrap_err();
        assert_eq!(from_generate, TraceError::Validation(from_validate));
    }

    #[test]
    fn validate_agrees_with_generate_on_limits_and_overflow() {
        let cases = [
            (
                AlgorithmId::JobScheduling,
                Input::Jobs {
                    jobs: vec![
                        Job {
                            deadline: 1,
                            profit: i64::MAX,
                        },
                        Job {
                            deadline: 2,
                            profit: 1,
                        },
                    ],
                },
            ),
            (
                AlgorithmId::ZeroOneKnapsack,
                Input::Knapsack {
                    items: vec![Item::new(1, i64::MAX), Item::new(1, 1)],
                    capacity: 2,
                },
            ),
            (
                AlgorithmId::Kruskal,
                Input::Graph {
                    graph: GraphBuilder::undirected()
                        .edge("A", "B", i64::MAX)
                        .edge("B", "C", 1)
                        .build(),
                    source: 0,
                },
            ),
            (
                AlgorithmId::BubbleSort,
                Input::Array {
                    values: vec![0; crate::adapters::ARRAY_LEN_LIMIT + 1],
                },
            ),
            (
                AlgorithmId::NaiveStringMatch,
                Input::Text {
                    text: "naïve".into(),
                    pattern: "ve".into(),
                },
            ),
        ];
        for (id, input) in cases {
            let from_validate = validate(id, &input).unwrap_err();
            let from_generate = generate(id, &input).unwrap_err();
            assert_eq!(from_generate, TraceError::Validation(from_validate), "{id}");
        }
    }
}
