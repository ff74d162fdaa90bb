//! Greedy adapters: fractional knapsack, activity selection, job
//! scheduling and Huffman coding.
//!
//! Each run starts with a single `order` step showing the sorted
//! consideration order, then records one decision step per item considered.
//! Huffman coding records one `merge` per pair of lightest roots instead.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use algoviz_core::{
    Activity, AlgorithmId, Item, Job, Outcome, Ref, Snapshot, StepKind, Symbol, Trace,
    TraceError, ValidationError,
};

use super::{check_len, check_total, ITEM_LIMIT};
use crate::recorder::TraceRecorder;

#[derive(Debug, Default)]
struct Selection {
    order: Vec<usize>,
    chosen: Vec<usize>,
    partial: Option<(usize, f64)>,
    slots: Vec<Option<usize>>,
    total: f64,
}

impl Selection {
    fn snapshot(&self) -> Snapshot {
        Snapshot::Selection {
            order: self.order.clone(),
            chosen: self.chosen.clone(),
            partial: self.partial,
            slots: self.slots.clone(),
            total: self.total,
        }
    }
}

pub fn check_fractional(items: &[Item], capacity: i64) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Empty { what: "items" });
    }
    check_len("item count", items.len(), ITEM_LIMIT)?;
    if capacity < 0 {
        return Err(ValidationError::NegativeCapacity { capacity });
    }
    for (item, it) in items.iter().enumerate() {
        if it.weight <= 0 {
            return Err(ValidationError::NonPositiveWeight {
                item,
                weight: it.weight,
            });
        }
        if it.value < 0 {
            return Err(ValidationError::NegativeValue {
                item,
                value: it.value,
            });
        }
    }
    Ok(())
}

/// Descending value/weight ratio, compared by cross-multiplication.
fn by_ratio_desc(a: &Item, b: &Item) -> Ordering {
    let lhs = i128::from(b.value) * i128::from(a.weight);
    let rhs = i128::from(a.value) * i128::from(b.weight);
    lhs.cmp(&rhs)
}

/// Fractional knapsack: whole items by ratio until the next one does not
/// fit, then the fitting fraction of that one.
pub fn fractional_knapsack(items: &[Item], capacity: i64) -> Result<Trace, TraceError> {
    check_fractional(items, capacity)?;
    let mut rec = TraceRecorder::new(AlgorithmId::FractionalKnapsack);
    let mut state = Selection::default();

    state.order = (0..items.len()).collect();
    state
        .order
        .sort_by(|&a, &b| by_ratio_desc(&items[a], &items[b]));
    rec.record(
        StepKind::Order,
        state.snapshot(),
        &[],
        "sort items by value/weight ratio, highest first",
    )?;

    let mut remaining = capacity;
    let mut taken = Vec::new();
    for &i in &state.order.clone() {
        if remaining == 0 {
            break;
        }
        let Item { weight, value } = items[i];
        if weight <= remaining {
            remaining -= weight;
            state.chosen.push(i);
            state.total += value as f64;
            taken.push((i, 1.0));
            rec.record(
                StepKind::Take,
                state.snapshot(),
                &[Ref::Item(i)],
                format!(
                    "take all of item {} (weight {}, value {}); {} capacity left",
                    i, weight, value, remaining
                ),
            )?;
        } else {
            let fraction = remaining as f64 / weight as f64;
            let gained = (value as f64 * remaining as f64) / weight as f64;
            state.partial = Some((i, fraction));
            state.total += gained;
            taken.push((i, fraction));
            rec.record(
                StepKind::TakeFraction,
                state.snapshot(),
                &[Ref::Item(i)],
                format!(
                    "take {}/{} of item {} for value {:.2}",
                    remaining, weight, i, gained
                ),
            )?;
            remaining = 0;
        }
    }

    rec.record(
        StepKind::Done,
        state.snapshot(),
        &[],
        format!("total value {:.2}", state.total),
    )?;
    rec.finish(Outcome::Fractional {
        value: state.total,
        items: taken,
    })
}

pub fn check_activities(activities: &[Activity]) -> Result<(), ValidationError> {
    if activities.is_empty() {
        return Err(ValidationError::Empty { what: "activities" });
    }
    check_len("activity count", activities.len(), ITEM_LIMIT)?;
    for (activity, a) in activities.iter().enumerate() {
        if a.end < a.start {
            return Err(ValidationError::InvalidInterval {
                activity,
                start: a.start,
                end: a.end,
            });
        }
    }
    Ok(())
}

/// Activity selection: by end time ascending, accept each activity that
/// starts no earlier than the last accepted one ends.
pub fn activity_selection(activities: &[Activity]) -> Result<Trace, TraceError> {
    check_activities(activities)?;
    let mut rec = TraceRecorder::new(AlgorithmId::ActivitySelection);
    let mut state = Selection::default();

    state.order = (0..activities.len()).collect();
    state.order.sort_by_key(|&i| activities[i].end);
    rec.record(
        StepKind::Order,
        state.snapshot(),
        &[],
        "sort activities by end time",
    )?;

    let mut last_end: Option<i64> = None;
    for &i in &state.order.clone() {
        let Activity { start, end } = activities[i];
        match last_end {
            Some(busy_until) if start < busy_until => {
                rec.record(
                    StepKind::Reject,
                    state.snapshot(),
                    &[Ref::Item(i)],
                    format!(
                        "activity {} [{}, {}) starts before {}",
                        i, start, end, busy_until
                    ),
                )?;
            }
            _ => {
                last_end = Some(end);
                state.chosen.push(i);
                state.total += 1.0;
                rec.record(
                    StepKind::Accept,
                    state.snapshot(),
                    &[Ref::Item(i)],
                    format!("accept activity {} [{}, {})", i, start, end),
                )?;
            }
        }
    }

    let selected = state.chosen.clone();
    rec.record(
        StepKind::Done,
        state.snapshot(),
        &[],
        format!("{} activities selected", selected.len()),
    )?;
    rec.finish(Outcome::Schedule {
        profit: selected.len() as i64,
        selected,
    })
}

pub fn check_jobs(jobs: &[Job]) -> Result<(), ValidationError> {
    if jobs.is_empty() {
        return Err(ValidationError::Empty { what: "jobs" });
    }
    check_len("job count", jobs.len(), ITEM_LIMIT)?;
    for (job, j) in jobs.iter().enumerate() {
        if j.deadline < 1 {
            return Err(ValidationError::InvalidDeadline {
                job,
                deadline: j.deadline,
            });
        }
        if j.profit < 0 {
            return Err(ValidationError::NegativeProfit {
                job,
                profit: j.profit,
            });
        }
    }
    check_total("job profits", jobs.iter().map(|j| j.profit))
}

/// Job sequencing with deadlines. Jobs are taken by profit descending and
/// placed in the latest free unit-time slot at or before their deadline.
/// Slot `t` covers time `(t, t + 1]`.
pub fn job_scheduling(jobs: &[Job]) -> Result<Trace, TraceError> {
    check_jobs(jobs)?;
    let mut rec = TraceRecorder::new(AlgorithmId::JobScheduling);
    let mut state = Selection::default();

    // No more than one slot per job is ever useful.
    let horizon = jobs
        .iter()
        .map(|j| j.deadline)
        .max()
        .map_or(0, |d| usize::try_from(d).unwrap_or(usize::MAX))
        .min(jobs.len());
    state.slots = vec![None; horizon];
    state.order = (0..jobs.len()).collect();
    state.order.sort_by_key(|&i| std::cmp::Reverse(jobs[i].profit));
    rec.record(
        StepKind::Order,
        state.snapshot(),
        &[],
        "sort jobs by profit, highest first",
    )?;

    let mut profit = 0i64;
    for &i in &state.order.clone() {
        let Job { deadline, profit: p } = jobs[i];
        let latest = usize::try_from(deadline).unwrap_or(usize::MAX).min(horizon);
        match (0..latest).rev().find(|&t| state.slots[t].is_none()) {
            Some(t) => {
                state.slots[t] = Some(i);
                state.chosen.push(i);
                state.total += p as f64;
                profit += p;
                rec.record(
                    StepKind::Accept,
                    state.snapshot(),
                    &[Ref::Item(i), Ref::Slot(t)],
                    format!(
                        "schedule job {} (profit {}) in slot {} before deadline {}",
                        i,
                        p,
                        t + 1,
                        deadline
                    ),
                )?;
            }
            None => {
                rec.record(
                    StepKind::Reject,
                    state.snapshot(),
                    &[Ref::Item(i)],
                    format!("no free slot for job {} by deadline {}", i, deadline),
                )?;
            }
        }
    }

    let selected: Vec<usize> = state.slots.iter().flatten().copied().collect();
    rec.record(
        StepKind::Done,
        state.snapshot(),
        &[],
        format!("scheduled {} jobs for profit {}", selected.len(), profit),
    )?;
    rec.finish(Outcome::Schedule { selected, profit })
}

/// Symbols must be distinct with positive frequencies. The encoded length
/// is at most the total frequency times the symbol count, which must fit
/// in `i64`.
pub fn check_symbols(symbols: &[Symbol]) -> Result<(), ValidationError> {
    if symbols.is_empty() {
        return Err(ValidationError::Empty { what: "symbols" });
    }
    check_len("symbol count", symbols.len(), ITEM_LIMIT)?;
    for (i, s) in symbols.iter().enumerate() {
        if s.frequency <= 0 {
            return Err(ValidationError::NonPositiveFrequency {
                symbol: s.symbol,
                frequency: s.frequency,
            });
        }
        if symbols[..i].iter().any(|earlier| earlier.symbol == s.symbol) {
            return Err(ValidationError::DuplicateSymbol { symbol: s.symbol });
        }
    }
    let overflow = ValidationError::Overflow {
        what: "symbol frequencies",
    };
    let total = symbols
        .iter()
        .try_fold(0i64, |acc, s| acc.checked_add(s.frequency))
        .ok_or_else(|| overflow.clone())?;
    match total.checked_mul(symbols.len() as i64) {
        Some(_) => Ok(()),
        None => Err(overflow),
    }
}

struct Forest<'a> {
    symbols: &'a [Symbol],
    weights: Vec<i64>,
    parents: Vec<Option<usize>>,
    /// `(left, right)` for merged nodes, indexed from `symbols.len()`.
    children: Vec<(usize, usize)>,
    heap: BinaryHeap<Reverse<(i64, usize)>>,
}

impl<'a> Forest<'a> {
    fn new(symbols: &'a [Symbol]) -> Self {
        let weights: Vec<i64> = symbols.iter().map(|s| s.frequency).collect();
        let heap = weights
            .iter()
            .enumerate()
            .map(|(id, &w)| Reverse((w, id)))
            .collect();
        Forest {
            symbols,
            parents: vec![None; weights.len()],
            weights,
            children: Vec::new(),
            heap,
        }
    }

    fn snapshot(&self) -> Snapshot {
        let mut queue: Vec<(i64, usize)> = self.heap.iter().map(|Reverse(entry)| *entry).collect();
        queue.sort_unstable();
        Snapshot::Forest {
            weights: self.weights.clone(),
            queue: queue.into_iter().map(|(_, id)| id).collect(),
            parents: self.parents.clone(),
        }
    }

    fn label(&self, node: usize) -> String {
        match self.symbols.get(node) {
            Some(s) => format!("'{}'", s.symbol),
            None => format!("node {}", node),
        }
    }

    /// Pops the two lightest roots and joins them under a new node.
    fn merge(&mut self) -> Option<(usize, usize, usize)> {
        let Reverse((_, left)) = self.heap.pop()?;
        let Reverse((_, right)) = self.heap.pop()?;
        let node = self.weights.len();
        let weight = self.weights[left] + self.weights[right];
        self.weights.push(weight);
        self.parents.push(None);
        self.parents[left] = Some(node);
        self.parents[right] = Some(node);
        self.children.push((left, right));
        self.heap.push(Reverse((weight, node)));
        Some((left, right, node))
    }

    /// Walks from leaf to root; left edges are `0`.
    fn code(&self, leaf: usize) -> String {
        let mut bits = Vec::new();
        let mut node = leaf;
        while let Some(parent) = self.parents[node] {
            let (left, _) = self.children[parent - self.symbols.len()];
            bits.push(if left == node { '0' } else { '1' });
            node = parent;
        }
        if bits.is_empty() {
            return "0".to_string();
        }
        bits.into_iter().rev().collect()
    }
}

/// Huffman coding. The two lightest roots are merged until one tree
/// remains; equal weights are taken in node creation order.
pub fn huffman_coding(symbols: &[Symbol]) -> Result<Trace, TraceError> {
    check_symbols(symbols)?;
    let mut rec = TraceRecorder::new(AlgorithmId::HuffmanCoding);
    let mut forest = Forest::new(symbols);

    rec.record(
        StepKind::Order,
        forest.snapshot(),
        &[],
        "queue symbols by frequency, lightest first",
    )?;

    while forest.heap.len() > 1 {
        let Some((left, right, node)) = forest.merge() else {
            break;
        };
        rec.record(
            StepKind::Merge,
            forest.snapshot(),
            &[Ref::Item(left), Ref::Item(right), Ref::Item(node)],
            format!(
                "merge {} ({}) and {} ({}) into weight {}",
                forest.label(left),
                forest.weights[left],
                forest.label(right),
                forest.weights[right],
                forest.weights[node]
            ),
        )?;
    }

    let codes: Vec<String> = (0..symbols.len()).map(|leaf| forest.code(leaf)).collect();
    let bits: i64 = symbols
        .iter()
        .zip(&codes)
        .map(|(s, code)| s.frequency * code.len() as i64)
        .sum();
    rec.record(
        StepKind::Done,
        forest.snapshot(),
        &[],
        format!("encoded length {} bits", bits),
    )?;
    rec.finish(Outcome::Codes { codes, bits })
}
