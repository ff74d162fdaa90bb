//! Dynamic-programming adapters: 0/1 knapsack, longest common subsequence
//! and matrix-chain ordering.
//!
//! Tables are filled row by row, column by column, one step per cell, and
//! every step carries the whole table (`None` for cells not yet filled).
//! A traceback pass then records one `select` step per chosen cell.
//! Matrix-chain ordering fills by chain length instead and records one
//! `split` step per candidate split point.

use algoviz_core::{AlgorithmId, Item, Outcome, Ref, Snapshot, StepKind, Trace, TraceError, ValidationError};

use super::check_total;
use crate::recorder::TraceRecorder;

/// Largest table, in cells, an adapter will fill. Each step snapshots the
/// whole table, so traces grow quadratically in this.
pub const TABLE_CELL_LIMIT: usize = 4_096;

/// Largest matrix dimension the chain-ordering adapter accepts. Keeps every
/// chain cost well inside `i64` for tables within [`TABLE_CELL_LIMIT`].
pub const DIMENSION_LIMIT: i64 = 1_000;

fn check_table(rows: usize, cols: usize) -> Result<(), ValidationError> {
    let cells = rows.saturating_mul(cols);
    if cells > TABLE_CELL_LIMIT {
        return Err(ValidationError::TooLarge {
            what: "table cell count",
            size: cells,
            limit: TABLE_CELL_LIMIT,
        });
    }
    Ok(())
}

fn cell(row: usize, col: usize) -> Ref {
    Ref::Cell { row, col }
}

fn matrix(table: &[Vec<Option<i64>>]) -> Snapshot {
    Snapshot::Matrix {
        cells: table.to_vec(),
    }
}

pub fn check_knapsack(items: &[Item], capacity: i64) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Empty { what: "items" });
    }
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
    check_total("item values", items.iter().map(|it| it.value))?;
    let cols = usize::try_from(capacity)
        .ok()
        .and_then(|c| c.checked_add(1))
        .unwrap_or(usize::MAX);
    check_table(items.len() + 1, cols)
}

/// 0/1 knapsack. Cell `(i, w)` is the best value using the first `i` items
/// within capacity `w`; it is recorded as `include` when taking item `i - 1`
/// strictly beats leaving it, `exclude` otherwise.
pub fn zero_one_knapsack(items: &[Item], capacity: i64) -> Result<Trace, TraceError> {
    check_knapsack(items, capacity)?;
    let mut rec = TraceRecorder::new(AlgorithmId::ZeroOneKnapsack);
    let cap = capacity as usize;
    let n = items.len();

    let mut table: Vec<Vec<Option<i64>>> = vec![vec![None; cap + 1]; n + 1];
    table[0] = vec![Some(0); cap + 1];

    for i in 1..=n {
        let Item { weight, value } = items[i - 1];
        let weight = weight as usize;
        for w in 0..=cap {
            let without = table[i - 1][w].unwrap_or(0);
            if weight > w {
                table[i][w] = Some(without);
                rec.record(
                    StepKind::Exclude,
                    matrix(&table),
                    &[cell(i, w), cell(i - 1, w)],
                    format!(
                        "item {} (weight {}) does not fit in {}: keep {}",
                        i - 1,
                        weight,
                        w,
                        without
                    ),
                )?;
                continue;
            }
            let with = table[i - 1][w - weight].unwrap_or(0) + value;
            if with > without {
                table[i][w] = Some(with);
                rec.record(
                    StepKind::Include,
                    matrix(&table),
                    &[cell(i, w), cell(i - 1, w - weight), cell(i - 1, w)],
                    format!("take item {}: {} > {}", i - 1, with, without),
                )?;
            } else {
                table[i][w] = Some(without);
                rec.record(
                    StepKind::Exclude,
                    matrix(&table),
                    &[cell(i, w), cell(i - 1, w - weight), cell(i - 1, w)],
                    format!("skip item {}: {} <= {}", i - 1, with, without),
                )?;
            }
        }
    }

    let best = table[n][cap].unwrap_or(0);
    let mut chosen = Vec::new();
    let mut w = cap;
    for i in (1..=n).rev() {
        if table[i][w] != table[i - 1][w] {
            chosen.push(i - 1);
            rec.record(
                StepKind::Select,
                matrix(&table),
                &[cell(i, w)],
                format!("item {} is part of the optimum", i - 1),
            )?;
            w -= items[i - 1].weight as usize;
        }
    }
    chosen.reverse();

    rec.record(
        StepKind::Done,
        matrix(&table),
        &[cell(n, cap)],
        format!("best value {} with items {:?}", best, chosen),
    )?;
    rec.finish(Outcome::Knapsack {
        value: best,
        items: chosen,
    })
}

pub fn check_sequences(first: &str, second: &str) -> Result<(), ValidationError> {
    if first.is_empty() || second.is_empty() {
        return Err(ValidationError::Empty { what: "sequence" });
    }
    check_table(first.chars().count() + 1, second.chars().count() + 1)
}

/// Longest common subsequence. Equal characters extend the diagonal
/// (`match`); otherwise the cell takes the better of up and left (`skip`).
/// Traceback prefers moving up on ties.
pub fn longest_common_subsequence(first: &str, second: &str) -> Result<Trace, TraceError> {
    check_sequences(first, second)?;
    let a: Vec<char> = first.chars().collect();
    let b: Vec<char> = second.chars().collect();
    let (m, n) = (a.len(), b.len());
    let mut rec = TraceRecorder::new(AlgorithmId::LongestCommonSubsequence);

    let mut table: Vec<Vec<Option<i64>>> = vec![vec![None; n + 1]; m + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = Some(0);
        if i == 0 {
            row.fill(Some(0));
        }
    }
    let at = |table: &[Vec<Option<i64>>], i: usize, j: usize| table[i][j].unwrap_or(0);

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                let len = at(&table, i - 1, j - 1) + 1;
                table[i][j] = Some(len);
                rec.record(
                    StepKind::Match,
                    matrix(&table),
                    &[cell(i, j), cell(i - 1, j - 1)],
                    format!("'{}' matches: length {}", a[i - 1], len),
                )?;
            } else {
                let len = at(&table, i - 1, j).max(at(&table, i, j - 1));
                table[i][j] = Some(len);
                rec.record(
                    StepKind::Skip,
                    matrix(&table),
                    &[cell(i, j), cell(i - 1, j), cell(i, j - 1)],
                    format!("'{}' != '{}': carry {}", a[i - 1], b[j - 1], len),
                )?;
            }
        }
    }

    let mut picked = Vec::new();
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            picked.push(a[i - 1]);
            rec.record(
                StepKind::Select,
                matrix(&table),
                &[cell(i, j)],
                format!("'{}' is in the subsequence", a[i - 1]),
            )?;
            i -= 1;
            j -= 1;
        } else if at(&table, i - 1, j) >= at(&table, i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    let sequence: String = picked.into_iter().rev().collect();
    let length = sequence.chars().count();

    rec.record(
        StepKind::Done,
        matrix(&table),
        &[cell(m, n)],
        format!("longest common subsequence \"{}\" (length {})", sequence, length),
    )?;
    rec.finish(Outcome::Subsequence { length, sequence })
}

/// Needs at least one matrix, every dimension positive and at most
/// [`DIMENSION_LIMIT`].
pub fn check_chain(dims: &[i64]) -> Result<(), ValidationError> {
    if dims.len() < 2 {
        return Err(ValidationError::Empty {
            what: "matrix chain",
        });
    }
    for (index, &value) in dims.iter().enumerate() {
        if value <= 0 {
            return Err(ValidationError::NonPositiveDimension { index, value });
        }
        if value > DIMENSION_LIMIT {
            return Err(ValidationError::TooLarge {
                what: "matrix dimension",
                size: value as usize,
                limit: DIMENSION_LIMIT as usize,
            });
        }
    }
    let n = dims.len() - 1;
    check_table(n, n)
}

fn chain_order(split: &[Vec<usize>], i: usize, j: usize) -> String {
    if i == j {
        return format!("M{}", i + 1);
    }
    let k = split[i][j];
    format!("({}{})", chain_order(split, i, k), chain_order(split, k + 1, j))
}

/// Matrix-chain ordering. Cell `(i, j)` is the fewest scalar
/// multiplications for `M(i+1)..M(j+1)`; only the upper triangle is used.
/// The first of equally cheap split points wins.
pub fn matrix_chain(dims: &[i64]) -> Result<Trace, TraceError> {
    check_chain(dims)?;
    let n = dims.len() - 1;
    let mut rec = TraceRecorder::new(AlgorithmId::MatrixChain);

    let mut table: Vec<Vec<Option<i64>>> = vec![vec![None; n]; n];
    let mut split = vec![vec![0usize; n]; n];
    for (i, row) in table.iter_mut().enumerate() {
        row[i] = Some(0);
    }

    for len in 2..=n {
        for i in 0..=n - len {
            let j = i + len - 1;
            for k in i..j {
                let left = table[i][k].unwrap_or(0);
                let right = table[k + 1][j].unwrap_or(0);
                let cost = left + right + dims[i] * dims[k + 1] * dims[j + 1];
                let improved = table[i][j].map_or(true, |best| cost < best);
                if improved {
                    table[i][j] = Some(cost);
                    split[i][j] = k;
                }
                rec.record(
                    StepKind::Split,
                    matrix(&table),
                    &[cell(i, j), cell(i, k), cell(k + 1, j)],
                    format!(
                        "M{}..M{} split after M{}: {} + {} + {}*{}*{} = {}{}",
                        i + 1,
                        j + 1,
                        k + 1,
                        left,
                        right,
                        dims[i],
                        dims[k + 1],
                        dims[j + 1],
                        cost,
                        if improved { " (best so far)" } else { "" }
                    ),
                )?;
            }
        }
    }

    let mut pending = vec![(0, n - 1)];
    while let Some((i, j)) = pending.pop() {
        if i == j {
            continue;
        }
        let k = split[i][j];
        rec.record(
            StepKind::Select,
            matrix(&table),
            &[cell(i, j)],
            format!("M{}..M{} splits after M{}", i + 1, j + 1, k + 1),
        )?;
        pending.push((k + 1, j));
        pending.push((i, k));
    }

    let cost = table[0][n - 1].unwrap_or(0);
    let order = chain_order(&split, 0, n - 1);
    rec.record(
        StepKind::Done,
        matrix(&table),
        &[cell(0, n - 1)],
        format!("{} needs {} multiplications", order, cost),
    )?;
    rec.finish(Outcome::Parenthesization { cost, order })
}
