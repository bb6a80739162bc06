use tinyvec::TinyVec;

use crate::error::{KdIndexError, Result};
use crate::heap::BoundedMaxHeap;
use crate::kdtree::index::{KdTree, Node, NodeId};
use crate::metric::Metric;
use crate::r#type::Coord;

/// A single query result: a located point and its distance from the query
/// point under the metric the query ran with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'t, N: Coord> {
    /// Index of the point in the order it appeared in the input buffer.
    pub index: u32,
    /// The point's coordinates, borrowed from the tree.
    pub point: &'t [N],
    /// Distance from the query point under the query's metric.
    pub distance: N,
}

/// A pending subtree visit during nearest-neighbor descent. `plane_dist` is
/// the metric contribution of the split plane separating this subtree from
/// the query point; it is re-checked against the current worst kept
/// distance when the visit is popped.
#[derive(Debug, Clone, Copy, Default)]
struct Visit<N: Coord> {
    node: NodeId,
    plane_dist: N,
}

impl<'a, N: Coord> KdTree<'a, N> {
    /// Find the `n` points nearest to `query` under `metric`.
    ///
    /// Returns `min(n, num_points)` results in ascending distance order.
    /// Points at equal distance have no guaranteed relative order. `n == 0`
    /// and an empty tree both yield an empty result without traversing.
    pub fn nearest_neighbors(
        &self,
        query: &[N],
        n: usize,
        metric: Metric,
    ) -> Result<Vec<Neighbor<'_, N>>> {
        if query.len() != self.dims {
            return Err(KdIndexError::DimensionMismatch {
                expected: self.dims,
                actual: query.len(),
            });
        }

        let root = match self.root {
            Some(root) if n > 0 => root,
            _ => return Ok(Vec::new()),
        };

        let mut heap = BoundedMaxHeap::with_capacity(n)?;
        let mut stack: TinyVec<[Visit<N>; 32]> = TinyVec::new();
        stack.push(Visit {
            node: root,
            plane_dist: N::zero(),
        });

        while let Some(visit) = stack.pop() {
            // The worst kept distance is infinite until n candidates are
            // held; a far subtree whose split plane lies beyond it cannot
            // contain anything better.
            let worst = if heap.len() < n {
                N::infinity()
            } else {
                heap.peek_max().map_or(N::infinity(), |item| item.value)
            };
            if visit.plane_dist > worst {
                continue;
            }

            match *self.node(visit.node) {
                Node::Leaf { start, end } => {
                    for &index in self.leaf_indices(start, end) {
                        let distance = metric.distance(self.point(index), query);
                        if heap.len() < n {
                            heap.insert(index, distance)?;
                        } else {
                            let worst_kept =
                                heap.peek_max().map_or(N::infinity(), |item| item.value);
                            if distance < worst_kept {
                                heap.pop_max();
                                heap.insert(index, distance)?;
                            }
                        }
                    }
                }
                Node::Internal {
                    axis,
                    value,
                    low,
                    high,
                } => {
                    let delta = query[axis as usize] - value;
                    let (near, far) = if delta < N::zero() {
                        (low, high)
                    } else {
                        (high, low)
                    };
                    // Push the far side first so the near side, the one on
                    // the query point's side of the split, is searched
                    // before the far side's bound is re-evaluated.
                    stack.push(Visit {
                        node: far,
                        plane_dist: metric.plane_distance(delta),
                    });
                    stack.push(Visit {
                        node: near,
                        plane_dist: visit.plane_dist,
                    });
                }
            }
        }

        let mut results = Vec::with_capacity(heap.len());
        while let Some(item) = heap.pop_max() {
            results.push(Neighbor {
                index: item.index,
                point: self.point(item.index),
                distance: item.value,
            });
        }
        // Popping yields farthest-first; the public contract is ascending.
        results.reverse();
        Ok(results)
    }

    /// Find every point within the axis-aligned box `query ± radii`.
    ///
    /// Membership is the per-axis test `|point[j] - query[j]| <= radii[j]`,
    /// independent of `metric`; the metric only supplies the `distance`
    /// recorded on each result. Result order is unspecified.
    pub fn range(
        &self,
        query: &[N],
        radii: &[N],
        metric: Metric,
    ) -> Result<Vec<Neighbor<'_, N>>> {
        if query.len() != self.dims {
            return Err(KdIndexError::DimensionMismatch {
                expected: self.dims,
                actual: query.len(),
            });
        }
        if radii.len() != self.dims {
            return Err(KdIndexError::DimensionMismatch {
                expected: self.dims,
                actual: radii.len(),
            });
        }
        for &radius in radii {
            if radius < N::zero() {
                return Err(KdIndexError::NegativeRadius);
            }
        }

        let root = match self.root {
            Some(root) => root,
            None => return Ok(Vec::new()),
        };

        let mut results = Vec::new();
        let mut stack: TinyVec<[NodeId; 32]> = TinyVec::new();
        stack.push(root);

        while let Some(node) = stack.pop() {
            match *self.node(node) {
                Node::Leaf { start, end } => {
                    for &index in self.leaf_indices(start, end) {
                        let point = self.point(index);
                        let inside = point
                            .iter()
                            .zip(query)
                            .zip(radii)
                            .all(|((&p, &q), &r)| (p - q).abs() <= r);
                        if inside {
                            results.push(Neighbor {
                                index,
                                point,
                                distance: metric.distance(point, query),
                            });
                        }
                    }
                }
                Node::Internal {
                    axis,
                    value,
                    low,
                    high,
                } => {
                    let axis = axis as usize;
                    // A straddling box descends both sides.
                    if query[axis] + radii[axis] >= value {
                        stack.push(high);
                    }
                    if query[axis] - radii[axis] <= value {
                        stack.push(low);
                    }
                }
            }
        }

        Ok(results)
    }
}
