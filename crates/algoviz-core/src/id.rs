//! Algorithm identifiers and their families.
//!
//! An [`AlgorithmId`] selects exactly one adapter. Its [`Family`] fixes the
//! closed set of step tags the adapter may emit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::step::StepKind;

/// Every algorithm the platform can trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmId {
    BubbleSort,
    SelectionSort,
    InsertionSort,
    MergeSort,
    QuickSort,
    HeapSort,
    CountingSort,
    RadixSort,
    LinearSearch,
    BinarySearch,
    JumpSearch,
    ExponentialSearch,
    BreadthFirstSearch,
    DepthFirstSearch,
    TopologicalSort,
    Kosaraju,
    Dijkstra,
    BellmanFord,
    FloydWarshall,
    Prim,
    Kruskal,
    ZeroOneKnapsack,
    LongestCommonSubsequence,
    MatrixChain,
    FractionalKnapsack,
    ActivitySelection,
    JobScheduling,
    HuffmanCoding,
    NaiveStringMatch,
    RabinKarp,
    KnuthMorrisPratt,
    TravellingSalesman,
}

impl AlgorithmId {
    /// All identifiers, in declaration order.
    pub const ALL: [AlgorithmId; 32] = [
        AlgorithmId::BubbleSort,
        AlgorithmId::SelectionSort,
        AlgorithmId::InsertionSort,
        AlgorithmId::MergeSort,
        AlgorithmId::QuickSort,
        AlgorithmId::HeapSort,
        AlgorithmId::CountingSort,
        AlgorithmId::RadixSort,
        AlgorithmId::LinearSearch,
        AlgorithmId::BinarySearch,
        AlgorithmId::JumpSearch,
        AlgorithmId::ExponentialSearch,
        AlgorithmId::BreadthFirstSearch,
        AlgorithmId::DepthFirstSearch,
        AlgorithmId::TopologicalSort,
        AlgorithmId::Kosaraju,
        AlgorithmId::Dijkstra,
        AlgorithmId::BellmanFord,
        AlgorithmId::FloydWarshall,
        AlgorithmId::Prim,
        AlgorithmId::Kruskal,
        AlgorithmId::ZeroOneKnapsack,
        AlgorithmId::LongestCommonSubsequence,
        AlgorithmId::MatrixChain,
        AlgorithmId::FractionalKnapsack,
        AlgorithmId::ActivitySelection,
        AlgorithmId::JobScheduling,
        AlgorithmId::HuffmanCoding,
        AlgorithmId::NaiveStringMatch,
        AlgorithmId::RabinKarp,
        AlgorithmId::KnuthMorrisPratt,
        AlgorithmId::TravellingSalesman,
    ];

    /// The family whose step tags this algorithm emits.
    pub fn family(self) -> Family {
        use AlgorithmId::*;
        match self {
            BubbleSort | SelectionSort | InsertionSort | MergeSort | QuickSort | HeapSort
            | CountingSort | RadixSort => Family::Sorting,
            LinearSearch | BinarySearch | JumpSearch | ExponentialSearch => Family::Searching,
            BreadthFirstSearch | DepthFirstSearch | TopologicalSort | Kosaraju => Family::Traversal,
            Dijkstra | BellmanFord | FloydWarshall => Family::ShortestPath,
            Prim | Kruskal => Family::SpanningTree,
            ZeroOneKnapsack | LongestCommonSubsequence | MatrixChain => {
                Family::DynamicProgramming
            }
            FractionalKnapsack | ActivitySelection | JobScheduling | HuffmanCoding => Family::Greedy,
            NaiveStringMatch | RabinKarp | KnuthMorrisPratt => Family::StringMatching,
            TravellingSalesman => Family::BranchAndBound,
        }
    }

    /// The kebab-case name used in URLs and on the command line.
    pub fn as_str(self) -> &'static str {
        use AlgorithmId::*;
        match self {
            BubbleSort => "bubble-sort",
            SelectionSort => "selection-sort",
            InsertionSort => "insertion-sort",
            MergeSort => "merge-sort",
            QuickSort => "quick-sort",
            HeapSort => "heap-sort",
            CountingSort => "counting-sort",
            RadixSort => "radix-sort",
            LinearSearch => "linear-search",
            BinarySearch => "binary-search",
            JumpSearch => "jump-search",
            ExponentialSearch => "exponential-search",
            BreadthFirstSearch => "breadth-first-search",
            DepthFirstSearch => "depth-first-search",
            TopologicalSort => "topological-sort",
            Kosaraju => "kosaraju",
            Dijkstra => "dijkstra",
            BellmanFord => "bellman-ford",
            FloydWarshall => "floyd-warshall",
            Prim => "prim",
            Kruskal => "kruskal",
            ZeroOneKnapsack => "zero-one-knapsack",
            LongestCommonSubsequence => "longest-common-subsequence",
            MatrixChain => "matrix-chain",
            FractionalKnapsack => "fractional-knapsack",
            ActivitySelection => "activity-selection",
            JobScheduling => "job-scheduling",
            HuffmanCoding => "huffman-coding",
            NaiveStringMatch => "naive-string-match",
            RabinKarp => "rabin-karp",
            KnuthMorrisPratt => "knuth-morris-pratt",
            TravellingSalesman => "travelling-salesman",
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm: '{0}'")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for AlgorithmId {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Algorithm family. Each family declares the closed set of step tags its
/// adapters are allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Sorting,
    Searching,
    Traversal,
    ShortestPath,
    SpanningTree,
    DynamicProgramming,
    Greedy,
    StringMatching,
    BranchAndBound,
}

impl Family {
    /// The step tags this family declares.
    pub fn kinds(self) -> &'static [StepKind] {
        use StepKind::*;
        match self {
            Family::Sorting => &[
                Compare, Swap, Write, Pivot, Divide, Merge, Count, Accumulate, Done,
            ],
            Family::Searching => &[Compare, Jump, Found, NotFound],
            Family::Traversal => &[Visit, Enqueue, Pop, Skip, Component, Done],
            Family::ShortestPath => &[Visit, Relax, Skip, Update, Done],
            Family::SpanningTree => &[Visit, Accept, Reject, Done],
            Family::DynamicProgramming => &[Include, Exclude, Match, Skip, Select, Split, Done],
            Family::Greedy => &[Order, Take, TakeFraction, Accept, Reject, Merge, Done],
            Family::StringMatching => &[Compare, Hash, Verify, Match, SpuriousHit, Shift, Done],
            Family::BranchAndBound => &[Visit, Update, Reject, Prune, Done],
        }
    }

    /// Returns true if `kind` is one of this family's declared tags.
    pub fn declares(self, kind: StepKind) -> bool {
        self.kinds().contains(&kind)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Sorting => "sorting",
            Family::Searching => "searching",
            Family::Traversal => "traversal",
            Family::ShortestPath => "shortest_path",
            Family::SpanningTree => "spanning_tree",
            Family::DynamicProgramming => "dynamic_programming",
            Family::Greedy => "greedy",
            Family::StringMatching => "string_matching",
            Family::BranchAndBound => "branch_and_bound",
        };
        f.pad(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_from_str() {
        for id in AlgorithmId::ALL {
            assert_eq!(id.as_str().parse::<AlgorithmId>().unwrap(), id);
        }
    }

    #[test]
    fn serde_name_matches_display() {
        for id in AlgorithmId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "bogo-sort".parse::<AlgorithmId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown algorithm: 'bogo-sort'");
    }

    #[test]
    fn searching_family_does_not_declare_swap() {
        assert!(!Family::Searching.declares(StepKind::Swap));
        assert!(Family::Sorting.declares(StepKind::Swap));
        assert!(Family::StringMatching.declares(StepKind::SpuriousHit));
        assert!(Family::BranchAndBound.declares(StepKind::Prune));
        assert!(!Family::ShortestPath.declares(StepKind::Prune));
    }

    #[test]
    fn every_algorithm_is_listed_once() {
        let mut names: Vec<_> = AlgorithmId::ALL.iter().map(|id| id.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), AlgorithmId::ALL.len());
    }
}
