//! Maps weights reported against a projected split back onto model nodes.

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::common::config::DEFAULT_WEIGHT_EPSILON;
use crate::layout_engine::accessor::{Accessor, SplitAccessor};
use crate::layout_engine::snapshot::{SnapshotId, WindowSystemSnapshot};
use crate::model::{NodeId, WeightUpdate};

#[derive(Debug, Error, PartialEq)]
enum Refusal {
    #[error("{children} children but {weights} weights")]
    LengthMismatch { children: usize, weights: usize },
    #[error("{0:?} is not a split snapshot")]
    NotASplit(SnapshotId),
    #[error("{child:?} does not descend from split {split:?}")]
    NotDescendant { child: NodeId, split: NodeId },
    #[error("{inner:?} could not have been merged into {outer:?}")]
    OrientationMismatch { inner: NodeId, outer: NodeId },
}

/// Corrects `weights`, reported by the renderer for `children` of `split`,
/// into the weight space of each child's real parent in the model.
///
/// The request is refused as a whole, with an empty result, if it does not
/// describe children of `split`. A merge weight at or below `epsilon` is not
/// divided out; a negative `epsilon` counts as zero and a non-finite one is
/// replaced by [`DEFAULT_WEIGHT_EPSILON`].
pub fn correct_weights(
    snapshots: &WindowSystemSnapshot,
    split: &SplitAccessor,
    children: &[&Accessor],
    weights: &[f64],
    epsilon: f64,
) -> Vec<WeightUpdate> {
    match try_correct(snapshots, split, children, weights, epsilon) {
        Ok(updates) => updates,
        Err(refusal) => {
            warn!(split = ?split.originator, %refusal, "Refusing weight correction");
            Vec::new()
        }
    }
}

fn try_correct(
    snapshots: &WindowSystemSnapshot,
    split: &SplitAccessor,
    children: &[&Accessor],
    weights: &[f64],
    epsilon: f64,
) -> Result<Vec<WeightUpdate>, Refusal> {
    if children.len() != weights.len() {
        return Err(Refusal::LengthMismatch { children: children.len(), weights: weights.len() });
    }
    let epsilon = if epsilon.is_finite() { epsilon.max(0.0) } else { DEFAULT_WEIGHT_EPSILON };
    let top = split.snapshot;
    if snapshots.get(top).and_then(|s| s.as_split()).is_none() {
        return Err(Refusal::NotASplit(top));
    }

    let mut updates = Vec::with_capacity(children.len());
    for (child, &weight) in children.iter().zip(weights) {
        let not_descendant = || Refusal::NotDescendant {
            child: child.originator(),
            split: split.originator,
        };
        let (node, target) =
            snapshots.visible_parent(child.snapshot()).ok_or_else(not_descendant)?;
        let weight =
            unmerge(snapshots, target, top, weight, epsilon)?.ok_or_else(not_descendant)?;
        if !weight.is_finite() {
            debug!(child = ?child.originator(), weight, "Dropping non-finite weight");
            continue;
        }
        updates.push(WeightUpdate {
            node: snapshots[node].originator,
            parent: snapshots[target].originator,
            weight: weight.max(0.0),
        });
    }
    Ok(updates)
}

/// Undoes the scaling applied when `target` was flattened into `top`.
/// Returns `None` if `top` is not above `target`.
fn unmerge(
    snapshots: &WindowSystemSnapshot,
    target: SnapshotId,
    top: SnapshotId,
    mut weight: f64,
    epsilon: f64,
) -> Result<Option<f64>, Refusal> {
    let mut level = target;
    while level != top {
        let Some((via, next)) = snapshots.visible_parent(level) else {
            return Ok(None);
        };
        if snapshots[level].orientation() != snapshots[next].orientation() {
            return Err(Refusal::OrientationMismatch {
                inner: snapshots[level].originator,
                outer: snapshots[next].originator,
            });
        }
        match snapshots.weight_in_parent(via) {
            Some(divisor) if divisor.is_finite() && divisor > epsilon => {
                trace!(?level, divisor, "Undoing merge scaling");
                weight /= divisor;
            }
            divisor => debug!(?level, ?divisor, "Degenerate merge weight; leaving weight as is"),
        }
        level = next;
    }
    Ok(Some(weight))
}
