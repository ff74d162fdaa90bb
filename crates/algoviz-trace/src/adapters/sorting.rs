//! Sorting adapters.
//!
//! Every comparison is recorded before the swap it may trigger. Divide and
//! conquer sorts bracket each active sub-range with `divide` and `merge`
//! steps whose refs are the range's first and last slots. The last step is
//! always `done` carrying the sorted array.
//!
//! Counting and radix sort record into a [`Snapshot::Buckets`]: `count`
//! steps tally an element into its bucket, `accumulate` steps turn counts
//! into end positions and `write` steps place elements into the output,
//! last element first so equal keys stay in input order.

use algoviz_core::{
    AlgorithmId, Outcome, Ref, Snapshot, StepKind, Trace, TraceError, ValidationError,
};

use super::{check_len, ARRAY_LEN_LIMIT};
use crate::recorder::TraceRecorder;

/// Widest value range counting sort accepts.
pub const BUCKET_LIMIT: usize = 1024;

pub fn check_array(values: &[i64]) -> Result<(), ValidationError> {
    check_len("array length", values.len(), ARRAY_LEN_LIMIT)
}

/// Bounds the bucket array by the span between the smallest and largest value.
pub fn check_counting(values: &[i64]) -> Result<(), ValidationError> {
    check_array(values)?;
    if let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) {
        let span = i128::from(max) - i128::from(min) + 1;
        if span > BUCKET_LIMIT as i128 {
            return Err(ValidationError::TooLarge {
                what: "value range",
                size: usize::try_from(span).unwrap_or(usize::MAX),
                limit: BUCKET_LIMIT,
            });
        }
    }
    Ok(())
}

/// Decimal digits are only defined here for non-negative values.
pub fn check_radix(values: &[i64]) -> Result<(), ValidationError> {
    check_array(values)?;
    match values.iter().position(|&v| v < 0) {
        Some(index) => Err(ValidationError::NegativeElement {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

fn snap(values: &[i64]) -> Snapshot {
    Snapshot::Array {
        values: values.to_vec(),
    }
}

fn compare(rec: &mut TraceRecorder, a: &[i64], i: usize, j: usize) -> Result<(), TraceError> {
    rec.record(
        StepKind::Compare,
        snap(a),
        &[Ref::Slot(i), Ref::Slot(j)],
        format!("compare a[{}] = {} with a[{}] = {}", i, a[i], j, a[j]),
    )
}

fn swap(rec: &mut TraceRecorder, a: &mut [i64], i: usize, j: usize) -> Result<(), TraceError> {
    a.swap(i, j);
    rec.record(
        StepKind::Swap,
        snap(a),
        &[Ref::Slot(i), Ref::Slot(j)],
        format!("swap positions {} and {} -> {} and {}", i, j, a[i], a[j]),
    )
}

fn finish(mut rec: TraceRecorder, a: Vec<i64>) -> Result<Trace, TraceError> {
    rec.record(
        StepKind::Done,
        snap(&a),
        &[],
        format!("sorted {} element(s)", a.len()),
    )?;
    rec.finish(Outcome::Sorted { values: a })
}

pub fn bubble_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_array(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::BubbleSort);
    let mut a = values.to_vec();
    let n = a.len();

    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            compare(&mut rec, &a, j, j + 1)?;
            if a[j] > a[j + 1] {
                swap(&mut rec, &mut a, j, j + 1)?;
                swapped = true;
            }
        }
        // No swaps means the remaining prefix is already ordered.
        if !swapped {
            break;
        }
    }

    finish(rec, a)
}

pub fn selection_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_array(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::SelectionSort);
    let mut a = values.to_vec();
    let n = a.len();

    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            compare(&mut rec, &a, j, min)?;
            if a[j] < a[min] {
                min = j;
            }
        }
        if min != i {
            swap(&mut rec, &mut a, i, min)?;
        }
    }

    finish(rec, a)
}

pub fn insertion_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_array(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::InsertionSort);
    let mut a = values.to_vec();

    for i in 1..a.len() {
        let mut j = i;
        while j > 0 {
            compare(&mut rec, &a, j - 1, j)?;
            if a[j - 1] <= a[j] {
                break;
            }
            swap(&mut rec, &mut a, j - 1, j)?;
            j -= 1;
        }
    }

    finish(rec, a)
}

pub fn merge_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_array(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::MergeSort);
    let mut a = values.to_vec();
    if a.len() > 1 {
        let hi = a.len() - 1;
        merge_sort_range(&mut rec, &mut a, 0, hi)?;
    }
    finish(rec, a)
}

fn merge_sort_range(
    rec: &mut TraceRecorder,
    a: &mut [i64],
    lo: usize,
    hi: usize,
) -> Result<(), TraceError> {
    if lo >= hi {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    rec.record(
        StepKind::Divide,
        snap(a),
        &[Ref::Slot(lo), Ref::Slot(hi)],
        format!("divide [{}, {}] at {}", lo, hi, mid),
    )?;
    merge_sort_range(rec, a, lo, mid)?;
    merge_sort_range(rec, a, mid + 1, hi)?;

    rec.record(
        StepKind::Merge,
        snap(a),
        &[Ref::Slot(lo), Ref::Slot(hi)],
        format!("merge [{}, {}] with [{}, {}]", lo, mid, mid + 1, hi),
    )?;

    let left = a[lo..=mid].to_vec();
    let right = a[mid + 1..=hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    while i < left.len() && j < right.len() {
        rec.record(
            StepKind::Compare,
            snap(a),
            &[Ref::Slot(lo + i), Ref::Slot(mid + 1 + j)],
            format!("compare left {} with right {}", left[i], right[j]),
        )?;
        // `<=` keeps equal keys in input order.
        if left[i] <= right[j] {
            a[k] = left[i];
            i += 1;
        } else {
            a[k] = right[j];
            j += 1;
        }
        write(rec, a, k)?;
        k += 1;
    }
    for &v in left[i..].iter().chain(right[j..].iter()) {
        a[k] = v;
        write(rec, a, k)?;
        k += 1;
    }
    Ok(())
}

fn write(rec: &mut TraceRecorder, a: &[i64], k: usize) -> Result<(), TraceError> {
    rec.record(
        StepKind::Write,
        snap(a),
        &[Ref::Slot(k)],
        format!("write {} to position {}", a[k], k),
    )
}

pub fn quick_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_array(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::QuickSort);
    let mut a = values.to_vec();
    if a.len() > 1 {
        let hi = a.len() - 1;
        quick_sort_range(&mut rec, &mut a, 0, hi)?;
    }
    finish(rec, a)
}

/// Lomuto partition around the last element of `[lo, hi]`.
fn quick_sort_range(
    rec: &mut TraceRecorder,
    a: &mut [i64],
    lo: usize,
    hi: usize,
) -> Result<(), TraceError> {
    if lo >= hi {
        return Ok(());
    }
    rec.record(
        StepKind::Divide,
        snap(a),
        &[Ref::Slot(lo), Ref::Slot(hi)],
        format!("partition [{}, {}]", lo, hi),
    )?;
    let pivot = a[hi];
    rec.record(
        StepKind::Pivot,
        snap(a),
        &[Ref::Slot(hi)],
        format!("pivot a[{}] = {}", hi, pivot),
    )?;

    let mut store = lo;
    for j in lo..hi {
        compare(rec, a, j, hi)?;
        if a[j] < pivot {
            if store != j {
                swap(rec, a, store, j)?;
            }
            store += 1;
        }
    }
    if store != hi {
        swap(rec, a, store, hi)?;
    }

    if store > lo {
        quick_sort_range(rec, a, lo, store - 1)?;
    }
    quick_sort_range(rec, a, store + 1, hi)
}

pub fn heap_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_array(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::HeapSort);
    let mut a = values.to_vec();
    let n = a.len();

    for root in (0..n / 2).rev() {
        sift_down(&mut rec, &mut a, root, n)?;
    }
    for end in (1..n).rev() {
        swap(&mut rec, &mut a, 0, end)?;
        sift_down(&mut rec, &mut a, 0, end)?;
    }

    finish(rec, a)
}

/// Restores the max-heap property below `root` within `a[..len]`.
fn sift_down(
    rec: &mut TraceRecorder,
    a: &mut [i64],
    mut root: usize,
    len: usize,
) -> Result<(), TraceError> {
    loop {
        let left = 2 * root + 1;
        if left >= len {
            return Ok(());
        }
        let mut largest = root;
        compare(rec, a, left, largest)?;
        if a[left] > a[largest] {
            largest = left;
        }
        let right = left + 1;
        if right < len {
            compare(rec, a, right, largest)?;
            if a[right] > a[largest] {
                largest = right;
            }
        }
        if largest == root {
            return Ok(());
        }
        swap(rec, a, root, largest)?;
        root = largest;
    }
}

fn buckets(values: &[i64], counts: &[usize], output: &[Option<i64>]) -> Snapshot {
    Snapshot::Buckets {
        values: values.to_vec(),
        counts: counts.to_vec(),
        output: output.to_vec(),
    }
}

/// One stable distribution pass of `a` into `counts.len()` buckets.
fn distribute(
    rec: &mut TraceRecorder,
    a: &[i64],
    bucket_count: usize,
    bucket: impl Fn(i64) -> usize,
) -> Result<Vec<i64>, TraceError> {
    let mut counts = vec![0usize; bucket_count];
    let mut output = vec![None; a.len()];

    for (i, &v) in a.iter().enumerate() {
        let b = bucket(v);
        counts[b] += 1;
        rec.record(
            StepKind::Count,
            buckets(a, &counts, &output),
            &[Ref::Slot(i), Ref::Bucket(b)],
            format!("count a[{}] = {} in bucket {}", i, v, b),
        )?;
    }
    for b in 1..bucket_count {
        counts[b] += counts[b - 1];
        rec.record(
            StepKind::Accumulate,
            buckets(a, &counts, &output),
            &[Ref::Bucket(b)],
            format!("bucket {} ends at position {}", b, counts[b]),
        )?;
    }
    for (i, &v) in a.iter().enumerate().rev() {
        let b = bucket(v);
        counts[b] -= 1;
        let pos = counts[b];
        output[pos] = Some(v);
        rec.record(
            StepKind::Write,
            buckets(a, &counts, &output),
            &[Ref::Slot(pos), Ref::Bucket(b)],
            format!("place a[{}] = {} at output position {}", i, v, pos),
        )?;
    }

    Ok(output.into_iter().flatten().collect())
}

pub fn counting_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_counting(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::CountingSort);
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return finish(rec, Vec::new());
    };
    // The range check above bounds `max - min` well inside `usize`.
    let span = (max - min) as usize + 1;
    let sorted = distribute(&mut rec, values, span, |v| (v - min) as usize)?;
    finish(rec, sorted)
}

/// Least-significant-digit radix sort in base 10.
pub fn radix_sort(values: &[i64]) -> Result<Trace, TraceError> {
    check_radix(values)?;
    let mut rec = TraceRecorder::new(AlgorithmId::RadixSort);
    let mut a = values.to_vec();
    let max = a.iter().copied().max().unwrap_or(0);

    let mut place: i64 = 1;
    while max / place > 0 {
        a = distribute(&mut rec, &a, 10, |v| ((v / place) % 10) as usize)?;
        place = match place.checked_mul(10) {
            Some(next) => next,
            None => break,
        };
    }

    finish(rec, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    type Sorter = fn(&[i64]) -> Result<Trace, TraceError>;

    const SORTERS: [(&str, Sorter); 8] = [
        ("bubble", bubble_sort),
        ("selection", selection_sort),
        ("insertion", insertion_sort),
        ("merge", merge_sort),
        ("quick", quick_sort),
        ("heap", heap_sort),
        ("counting", counting_sort),
        ("radix", radix_sort),
    ];

    #[test]
    fn every_sorter_ends_with_sorted_done_step() {
        let input = [5, 2, 9, 1, 5, 6, 13, 0];
        let mut expected = input.to_vec();
        expected.sort();
        for (name, sort) in SORTERS {
            let trace = sort(&input).unwrap();
            let last = trace.last();
            assert_eq!(last.kind, StepKind::Done, "{name}");
            assert_eq!(last.snapshot.values(), Some(expected.as_slice()), "{name}");
            assert_eq!(
                trace.outcome(),
                &Outcome::Sorted {
                    values: expected.clone()
                },
                "{name}"
            );
        }
    }

    #[test]
    fn empty_and_single_inputs_produce_only_done() {
        for (name, sort) in SORTERS {
            assert_eq!(sort(&[]).unwrap().len(), 1, "{name}");
        }
        // Distribution sorts still count and place a lone element.
        for (name, sort) in &SORTERS[..6] {
            let trace = sort(&[42]).unwrap();
            assert_eq!(trace.len(), 1, "{name}");
            assert_eq!(trace.last().kind, StepKind::Done, "{name}");
        }
    }

    #[test]
    fn every_swap_is_preceded_by_a_compare() {
        for (name, sort) in SORTERS {
            let trace = sort(&[4, 3, 2, 1]).unwrap();
            let steps = trace.steps();
            for (i, step) in steps.iter().enumerate() {
                if step.kind == StepKind::Swap && trace.algorithm() != AlgorithmId::HeapSort {
                    assert_eq!(steps[i - 1].kind, StepKind::Compare, "{name} step {i}");
                }
            }
        }
    }

    #[test]
    fn bubble_sort_stops_after_a_clean_pass() {
        let trace = bubble_sort(&[1, 2, 3, 4]).unwrap();
        // One pass of three compares, then done.
        assert_eq!(trace.len(), 4);
        assert!(trace.steps()[..3].iter().all(|s| s.kind == StepKind::Compare));
    }

    #[test]
    fn bubble_sort_pair_records_compare_then_swap() {
        let trace = bubble_sort(&[2, 1]).unwrap();
        let kinds: Vec<_> = trace.steps().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::Compare, StepKind::Swap, StepKind::Done]);
        assert_eq!(trace.steps()[1].snapshot.values(), Some(&[1, 2][..]));
    }

    #[test]
    fn merge_sort_brackets_ranges_with_divide_and_merge() {
        let trace = merge_sort(&[3, 1, 2]).unwrap();
        let divides = trace
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Divide)
            .count();
        let merges = trace
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Merge)
            .count();
        assert_eq!(divides, 2);
        assert_eq!(merges, 2);
        assert_eq!(trace.steps()[0].kind, StepKind::Divide);
        assert_eq!(trace.steps()[0].refs.as_slice(), &[Ref::Slot(0), Ref::Slot(2)]);
    }

    #[test]
    fn quick_sort_announces_pivot_after_divide() {
        let trace = quick_sort(&[3, 1, 2]).unwrap();
        assert_eq!(trace.steps()[0].kind, StepKind::Divide);
        assert_eq!(trace.steps()[1].kind, StepKind::Pivot);
        assert_eq!(trace.steps()[1].refs.as_slice(), &[Ref::Slot(2)]);
    }

    #[test]
    fn counting_sort_counts_accumulates_then_places_from_the_back() {
        let trace = counting_sort(&[3, 1, 3]).unwrap();
        let kinds: Vec<_> = trace.steps().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Count,
                StepKind::Count,
                StepKind::Count,
                StepKind::Accumulate,
                StepKind::Accumulate,
                StepKind::Write,
                StepKind::Write,
                StepKind::Write,
                StepKind::Done,
            ]
        );
        // The last 3 lands in the last output slot.
        assert_eq!(trace.steps()[5].refs.as_slice(), &[Ref::Slot(2), Ref::Bucket(2)]);
        let Snapshot::Buckets { counts, output, .. } = &trace.steps()[7].snapshot else {
            panic!("expected bucket snapshot");
        };
        assert_eq!(counts, &vec![0, 1, 1]);
        assert_eq!(output, &vec![Some(1), Some(3), Some(3)]);
    }

    #[test]
    fn counting_sort_handles_negative_values() {
        let trace = counting_sort(&[-2, 4, -7, 0]).unwrap();
        assert_eq!(
            trace.outcome(),
            &Outcome::Sorted {
                values: vec![-7, -2, 0, 4]
            }
        );
    }

    #[test]
    fn counting_sort_rejects_a_wide_value_range() {
        let err = counting_sort(&[0, BUCKET_LIMIT as i64]).unwrap_err();
        assert_eq!(
            err,
            TraceError::Validation(ValidationError::TooLarge {
                what: "value range",
                size: BUCKET_LIMIT + 1,
                limit: BUCKET_LIMIT
            })
        );
        assert!(counting_sort(&[i64::MIN, i64::MAX]).is_err());
    }

    #[test]
    fn radix_sort_makes_one_pass_per_digit_of_the_maximum() {
        let input = [170, 45, 75, 90, 802, 24, 2, 66];
        let trace = radix_sort(&input).unwrap();
        let accumulates = trace
            .steps()
            .iter()
            .filter(|s| s.kind == StepKind::Accumulate)
            .count();
        assert_eq!(accumulates, 3 * 9);
        assert_eq!(
            trace.outcome(),
            &Outcome::Sorted {
                values: vec![2, 24, 45, 66, 75, 90, 170, 802]
            }
        );
    }

    #[test]
    fn radix_sort_of_zeros_is_only_done() {
        let trace = radix_sort(&[0, 0]).unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn radix_sort_rejects_negative_elements() {
        assert_eq!(
            radix_sort(&[3, -1]).unwrap_err(),
            TraceError::Validation(ValidationError::NegativeElement { index: 1, value: -1 })
        );
    }

    #[test]
    fn radix_sort_survives_the_largest_value() {
        let trace = radix_sort(&[i64::MAX, 1]).unwrap();
        assert_eq!(
            trace.outcome(),
            &Outcome::Sorted {
                values: vec![1, i64::MAX]
            }
        );
    }

    #[test]
    fn oversized_arrays_are_rejected_before_recording() {
        let values = vec![1; ARRAY_LEN_LIMIT + 1];
        for (name, sort) in SORTERS {
            assert_eq!(
                sort(&values).unwrap_err(),
                TraceError::Validation(ValidationError::TooLarge {
                    what: "array length",
                    size: ARRAY_LEN_LIMIT + 1,
                    limit: ARRAY_LEN_LIMIT
                }),
                "{name}"
            );
        }
        assert!(bubble_sort(&vec![1; ARRAY_LEN_LIMIT]).is_ok());
    }
}
