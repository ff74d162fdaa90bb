//! Searching adapters.
//!
//! One step per probe. A probe that hits the target is recorded as `found`
//! and ends the trace; a probe that does not is `compare` (or `jump` while
//! jump/exponential search is still locating a block). An exhausted search
//! ends with a single `not_found` step.

use algoviz_core::{AlgorithmId, Outcome, Ref, Snapshot, StepKind, Trace, TraceError, ValidationError};

use super::{check_len, ARRAY_LEN_LIMIT};
use crate::recorder::TraceRecorder;

/// Rejects empty or oversized arrays.
pub fn check_non_empty(values: &[i64]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::Empty { what: "array" });
    }
    check_len("array length", values.len(), ARRAY_LEN_LIMIT)
}

/// Rejects empty or non-ascending arrays.
pub fn check_sorted(values: &[i64]) -> Result<(), ValidationError> {
    check_non_empty(values)?;
    match values.windows(2).position(|w| w[1] < w[0]) {
        Some(i) => Err(ValidationError::Unsorted { index: i + 1 }),
        None => Ok(()),
    }
}

struct Probe<'a> {
    rec: TraceRecorder,
    values: &'a [i64],
    target: i64,
}

impl<'a> Probe<'a> {
    fn new(algorithm: AlgorithmId, values: &'a [i64], target: i64) -> Self {
        Probe {
            rec: TraceRecorder::new(algorithm),
            values,
            target,
        }
    }

    fn snap(&self) -> Snapshot {
        Snapshot::Array {
            values: self.values.to_vec(),
        }
    }

    /// Records a probe at `i`. Returns true on a hit.
    fn probe(&mut self, i: usize, miss_kind: StepKind, note: &str) -> Result<bool, TraceError> {
        let v = self.values[i];
        let hit = v == self.target;
        let (kind, description) = if hit {
            (
                StepKind::Found,
                format!("a[{}] = {} == {}: found", i, v, self.target),
            )
        } else {
            (
                miss_kind,
                format!("a[{}] = {} != {}: {}", i, v, self.target, note),
            )
        };
        let snapshot = self.snap();
        self.rec.record(kind, snapshot, &[Ref::Slot(i)], description)?;
        Ok(hit)
    }

    fn found(self, index: usize) -> Result<Trace, TraceError> {
        self.rec.finish(Outcome::Search { index: Some(index) })
    }

    fn not_found(mut self) -> Result<Trace, TraceError> {
        let snapshot = self.snap();
        let description = format!("{} is not present", self.target);
        self.rec.record(StepKind::NotFound, snapshot, &[], description)?;
        self.rec.finish(Outcome::Search { index: None })
    }
}

pub fn linear_search(values: &[i64], target: i64) -> Result<Trace, TraceError> {
    check_non_empty(values)?;
    let mut p = Probe::new(AlgorithmId::LinearSearch, values, target);
    for i in 0..values.len() {
        if p.probe(i, StepKind::Compare, "continue")? {
            return p.found(i);
        }
    }
    p.not_found()
}

pub fn binary_search(values: &[i64], target: i64) -> Result<Trace, TraceError> {
    check_sorted(values)?;
    let mut p = Probe::new(AlgorithmId::BinarySearch, values, target);
    match binary_probe(&mut p, 0, values.len())? {
        Some(i) => p.found(i),
        None => p.not_found(),
    }
}

/// Binary search over the half-open range `[lo, hi)`.
fn binary_probe(p: &mut Probe<'_>, mut lo: usize, mut hi: usize) -> Result<Option<usize>, TraceError> {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let go_right = p.values[mid] < p.target;
        let note = if go_right { "search right half" } else { "search left half" };
        if p.probe(mid, StepKind::Compare, note)? {
            return Ok(Some(mid));
        }
        if go_right {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    Ok(None)
}

/// Jump search with block size `floor(sqrt(n))`.
///
/// The jump phase probes the last element of each block until it is
/// `>= target`; the linear phase then scans that block.
pub fn jump_search(values: &[i64], target: i64) -> Result<Trace, TraceError> {
    check_sorted(values)?;
    let n = values.len();
    let block = isqrt(n).max(1);
    let mut p = Probe::new(AlgorithmId::JumpSearch, values, target);

    let mut prev = 0;
    let mut end = block.min(n);
    while values[end - 1] < target {
        p.probe(end - 1, StepKind::Jump, "jump to next block")?;
        prev = end;
        if prev >= n {
            return p.not_found();
        }
        end = (end + block).min(n);
    }

    for i in prev..end {
        if p.probe(i, StepKind::Compare, "continue linear scan")? {
            return p.found(i);
        }
    }
    p.not_found()
}

/// Exponential search: doubles a bound until `a[bound] >= target`, then
/// binary-searches `[bound / 2, bound]`.
pub fn exponential_search(values: &[i64], target: i64) -> Result<Trace, TraceError> {
    check_sorted(values)?;
    let n = values.len();
    let mut p = Probe::new(AlgorithmId::ExponentialSearch, values, target);

    if p.probe(0, StepKind::Jump, "double the bound")? {
        return p.found(0);
    }
    let mut bound = 1;
    while bound < n && values[bound] < target {
        p.probe(bound, StepKind::Jump, "double the bound")?;
        bound *= 2;
    }
    let lo = bound / 2;
    let hi = (bound + 1).min(n);
    match binary_probe(&mut p, lo, hi)? {
        Some(i) => p.found(i),
        None => p.not_found(),
    }
}

fn isqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    const ODDS: [i64; 13] = [1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21, 23, 25];

    fn kinds(trace: &Trace) -> Vec<StepKind> {
        trace.steps().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn jump_search_finds_fifteen_at_seven() {
        let trace = jump_search(&ODDS, 15).unwrap();
        assert_eq!(trace.outcome(), &Outcome::Search { index: Some(7) });
        assert_eq!(
            kinds(&trace),
            vec![StepKind::Jump, StepKind::Jump, StepKind::Compare, StepKind::Found]
        );
        let probed: Vec<_> = trace.steps().iter().map(|s| s.refs[0]).collect();
        assert_eq!(
            probed,
            vec![Ref::Slot(2), Ref::Slot(5), Ref::Slot(6), Ref::Slot(7)]
        );
    }

    #[test]
    fn jump_search_past_the_end_is_not_found() {
        let trace = jump_search(&ODDS, 100).unwrap();
        assert_eq!(trace.outcome(), &Outcome::Search { index: None });
        assert_eq!(trace.last().kind, StepKind::NotFound);
        let jumps = trace
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Jump)
            .count();
        assert_eq!(jumps, 5);
    }

    #[test]
    fn jump_search_gap_value_scans_block_then_gives_up() {
        let trace = jump_search(&ODDS, 4).unwrap();
        assert_eq!(trace.outcome(), &Outcome::Search { index: None });
        assert_eq!(
            kinds(&trace),
            vec![
                StepKind::Jump,
                StepKind::Compare,
                StepKind::Compare,
                StepKind::Compare,
                StepKind::NotFound
            ]
        );
    }

    #[test]
    fn sorted_searches_reject_unsorted_input() {
        for search in [binary_search, jump_search, exponential_search] {
            assert_eq!(
                search(&[1, 5, 3], 3).unwrap_err(),
                TraceError::Validation(ValidationError::Unsorted { index: 2 })
            );
        }
    }

    #[test]
    fn empty_arrays_are_rejected() {
        assert_eq!(
            linear_search(&[], 1).unwrap_err(),
            TraceError::Validation(ValidationError::Empty { what: "array" })
        );
    }

    #[test]
    fn linear_search_probes_until_hit() {
        let trace = linear_search(&[4, 8, 15, 16], 15).unwrap();
        assert_eq!(
            kinds(&trace),
            vec![StepKind::Compare, StepKind::Compare, StepKind::Found]
        );
    }

    #[test]
    fn binary_search_probes_midpoints() {
        let trace = binary_search(&ODDS, 21).unwrap();
        let probed: Vec<_> = trace.steps().iter().map(|s| s.refs[0]).collect();
        // [0,13) -> 6; [7,13) -> 10 (hit)
        assert_eq!(probed, vec![Ref::Slot(6), Ref::Slot(10)]);
        assert_eq!(trace.outcome(), &Outcome::Search { index: Some(10) });
    }

    #[test]
    fn exponential_search_finds_every_element() {
        for (i, &v) in ODDS.iter().enumerate() {
            let trace = exponential_search(&ODDS, v).unwrap();
            assert_eq!(trace.outcome(), &Outcome::Search { index: Some(i) }, "value {v}");
        }
        let trace = exponential_search(&ODDS, 2).unwrap();
        assert_eq!(trace.outcome(), &Outcome::Search { index: None });
    }

    #[test]
    fn isqrt_floors() {
        assert_eq!(isqrt(13), 3);
        assert_eq!(isqrt(16), 4);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(0), 0);
    }

    #[test]
    fn oversized_array_is_rejected() {
        let values: Vec<i64> = (0..=ARRAY_LEN_LIMIT as i64).collect();
        assert!(matches!(
            binary_search(&values, 3).unwrap_err(),
            TraceError::Validation(ValidationError::TooLarge { what: "array length", .. })
        ));
    }
}
