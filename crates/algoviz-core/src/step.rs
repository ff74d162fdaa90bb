//! One recorded algorithm event.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::InvalidStepError;
use crate::id::Family;
use crate::snapshot::Snapshot;

/// Event tag. Which tags are legal depends on the algorithm's [`Family`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Compare,
    Swap,
    Write,
    Pivot,
    Divide,
    Merge,
    Count,
    Accumulate,
    Jump,
    Found,
    NotFound,
    Visit,
    Enqueue,
    Pop,
    Skip,
    Component,
    Relax,
    Update,
    Accept,
    Reject,
    Include,
    Exclude,
    Match,
    Select,
    Split,
    Order,
    Take,
    TakeFraction,
    Hash,
    Verify,
    SpuriousHit,
    Shift,
    Prune,
    Done,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the wire name so logs and JSON agree.
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.pad(&name),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// An element touched by a step, addressed within the step's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ref {
    /// Array position, or a job-scheduling time slot.
    Slot(usize),
    Vertex(usize),
    /// Edge by enumeration index in the input graph.
    Edge(usize),
    Cell { row: usize, col: usize },
    /// Item by its original input index.
    Item(usize),
    /// Position in the searched text.
    Text(usize),
    /// Position in the pattern.
    Pattern(usize),
    /// Counting bucket.
    Bucket(usize),
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ref::Slot(i) => write!(f, "slot {}", i),
            Ref::Vertex(v) => write!(f, "vertex {}", v),
            Ref::Edge(e) => write!(f, "edge {}", e),
            Ref::Cell { row, col } => write!(f, "cell ({}, {})", row, col),
            Ref::Item(i) => write!(f, "item {}", i),
            Ref::Text(i) => write!(f, "text[{}]", i),
            Ref::Pattern(j) => write!(f, "pattern[{}]", j),
            Ref::Bucket(b) => write!(f, "bucket {}", b),
        }
    }
}

/// Most steps touch at most four elements.
pub type Refs = SmallVec<[Ref; 4]>;

/// One visualization frame's worth of information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub snapshot: Snapshot,
    #[serde(default)]
    pub refs: Refs,
    pub description: String,
}

impl Step {
    /// Builds a step, checking it against the family's declared tags and
    /// the snapshot's addressable range.
    pub fn new(
        family: Family,
        kind: StepKind,
        snapshot: Snapshot,
        refs: Refs,
        description: impl Into<String>,
    ) -> Result<Self, InvalidStepError> {
        let step = Step {
            kind,
            snapshot,
            refs,
            description: description.into(),
        };
        step.validate(family)?;
        Ok(step)
    }

    /// Checks an already-built step (e.g. one decoded from JSON).
    pub fn validate(&self, family: Family) -> Result<(), InvalidStepError> {
        if !family.declares(self.kind) {
            return Err(InvalidStepError::UndeclaredKind {
                family,
                kind: self.kind,
            });
        }
        if let Some(bad) = self.refs.iter().find(|r| !self.snapshot.admits(r)) {
            return Err(InvalidStepError::RefOutOfRange {
                kind: self.kind,
                reference: *bad,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn array(values: &[i64]) -> Snapshot {
        Snapshot::Array {
            values: values.to_vec(),
        }
    }

    #[test]
    fn accepts_declared_kind_with_in_range_refs() {
        let step = Step::new(
            Family::Sorting,
            StepKind::Compare,
            array(&[3, 1, 2]),
            smallvec![Ref::Slot(0), Ref::Slot(1)],
            "compare 3 and 1",
        )
        .unwrap();
        assert_eq!(step.kind, StepKind::Compare);
    }

    #[test]
    fn rejects_undeclared_kind() {
        let err = Step::new(
            Family::Searching,
            StepKind::Swap,
            array(&[1, 2]),
            smallvec![Ref::Slot(0)],
            "swap",
        )
        .unwrap_err();
        assert_eq!(
            err,
            InvalidStepError::UndeclaredKind {
                family: Family::Searching,
                kind: StepKind::Swap
            }
        );
    }

    #[test]
    fn rejects_out_of_range_slot() {
        let err = Step::new(
            Family::Sorting,
            StepKind::Compare,
            array(&[1, 2]),
            smallvec![Ref::Slot(0), Ref::Slot(2)],
            "compare",
        )
        .unwrap_err();
        assert_eq!(
            err,
            InvalidStepError::RefOutOfRange {
                kind: StepKind::Compare,
                reference: Ref::Slot(2)
            }
        );
    }

    #[test]
    fn rejects_ref_of_wrong_shape() {
        let err = Step::new(
            Family::Sorting,
            StepKind::Compare,
            array(&[1, 2]),
            smallvec![Ref::Vertex(0)],
            "compare",
        )
        .unwrap_err();
        assert!(matches!(err, InvalidStepError::RefOutOfRange { .. }));
    }

    #[test]
    fn step_wire_shape() {
        let step = Step::new(
            Family::Sorting,
            StepKind::Swap,
            array(&[1, 3]),
            smallvec![Ref::Slot(0), Ref::Slot(1)],
            "swap 3 and 1",
        )
        .unwrap();
        insta::assert_json_snapshot!(step, @r###"
        {
          "type": "swap",
          "snapshot": {
            "shape": "array",
            "values": [
              1,
              3
            ]
          },
          "refs": [
            {
              "slot": 0
            },
            {
              "slot": 1
            }
          ],
          "description": "swap 3 and 1"
        }
        "###);
    }

    #[test]
    fn kind_display_uses_wire_name() {
        assert_eq!(StepKind::SpuriousHit.to_string(), "spurious_hit");
        assert_eq!(StepKind::NotFound.to_string(), "not_found");
    }
}
