use std::borrow::Cow;

use crate::error::{KdIndexError, Result};
use crate::kdtree::index::{KdTree, Node, NodeId};
use crate::r#type::Coord;

/// Default leaf threshold when the caller does not configure one.
const DEFAULT_LEAF_SIZE: usize = 16;

/// A builder to create a [`KdTree`] from a flat coordinate buffer.
///
/// The buffer holds `num_points * dims` scalars with point `i`'s coordinate
/// `j` at offset `i * dims + j`. By default the finished tree borrows the
/// buffer for its lifetime; [`copy_data`][Self::copy_data] makes it copy the
/// coordinates into owned storage instead.
///
/// Construction chooses each split axis by maximum spread and partitions
/// around the median with a quickselect-style scheme: expected `O(n log n)`
/// overall, worst-case quadratic partitioning on adversarial orderings of
/// axis values.
#[derive(Debug, Clone)]
pub struct KdTreeBuilder<'a, N: Coord> {
    points: &'a [N],
    dims: usize,
    leaf_size: usize,
    copy_data: bool,
}

impl<'a, N: Coord> KdTreeBuilder<'a, N> {
    /// Create a builder over `points`, a flat buffer of `dims`-dimensional
    /// coordinates.
    pub fn new(points: &'a [N], dims: usize) -> Self {
        Self {
            points,
            dims,
            leaf_size: DEFAULT_LEAF_SIZE,
            copy_data: false,
        }
    }

    /// Set the leaf threshold: subsets of at most this many points stop
    /// splitting and become leaves.
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size;
        self
    }

    /// Copy the coordinate buffer into the tree instead of borrowing it.
    pub fn copy_data(mut self, copy_data: bool) -> Self {
        self.copy_data = copy_data;
        self
    }

    /// Consume this builder, partitioning the point set into a [`KdTree`]
    /// ready for queries.
    ///
    /// Fails on invalid configuration (`dims == 0`, `leaf_size == 0`, a
    /// buffer whose length is not a multiple of `dims`), on allocation
    /// failure, or when a subset above the leaf threshold has zero spread on
    /// every axis and therefore no valid splitting axis.
    pub fn finish(self) -> Result<KdTree<'a, N>> {
        if self.dims == 0 {
            return Err(KdIndexError::ZeroDimensions);
        }
        if self.leaf_size == 0 {
            return Err(KdIndexError::ZeroLeafSize);
        }
        if self.points.len() % self.dims != 0 {
            return Err(KdIndexError::InvalidBufferLength {
                len: self.points.len(),
                dims: self.dims,
            });
        }
        let num_points = self.points.len() / self.dims;
        assert!(num_points <= u32::MAX as usize);

        let data: Cow<'a, [N]> = if self.copy_data {
            let mut owned = Vec::new();
            owned.try_reserve_exact(self.points.len())?;
            owned.extend_from_slice(self.points);
            Cow::Owned(owned)
        } else {
            Cow::Borrowed(self.points)
        };

        // An empty point set is a valid (rootless) tree; queries on it
        // return nothing.
        if num_points == 0 {
            return Ok(KdTree {
                nodes: Vec::new(),
                point_indices: Vec::new(),
                data,
                num_points: 0,
                dims: self.dims,
                leaf_size: self.leaf_size,
                root: None,
            });
        }

        let mut point_indices = Vec::new();
        point_indices.try_reserve_exact(num_points)?;
        point_indices.extend(0..num_points as u32);

        let mut build = BuildState {
            data: data.as_ref(),
            dims: self.dims,
            leaf_size: self.leaf_size,
            point_indices,
            nodes: Vec::new(),
        };
        let root = build.build_node(0, num_points)?;

        Ok(KdTree {
            nodes: build.nodes,
            point_indices: build.point_indices,
            data,
            num_points,
            dims: self.dims,
            leaf_size: self.leaf_size,
            root: Some(root),
        })
    }
}

/// Working state for the recursive median build. The recursion splits every
/// subset at its midpoint, so its depth is `log2(num_points / leaf_size)`.
struct BuildState<'p, N: Coord> {
    data: &'p [N],
    dims: usize,
    leaf_size: usize,
    point_indices: Vec<u32>,
    nodes: Vec<Node<N>>,
}

impl<N: Coord> BuildState<'_, N> {
    #[inline]
    fn coord(&self, point: u32, axis: usize) -> N {
        self.data[point as usize * self.dims + axis]
    }

    fn push_node(&mut self, node: Node<N>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Build the subtree over `point_indices[start..end]` and return its
    /// arena id.
    fn build_node(&mut self, start: usize, end: usize) -> Result<NodeId> {
        let len = end - start;
        if len <= self.leaf_size {
            return Ok(self.push_node(Node::Leaf {
                start: start as u32,
                end: end as u32,
            }));
        }

        let axis = self.splitting_axis(start, end)?;

        // Partition around the midpoint: the low half always gets
        // floor(len / 2) points, the median itself lands in the high half.
        let mid = start + len / 2;
        self.partition(start, end, axis, mid);
        let value = self.coord(self.point_indices[mid], axis);

        let low = self.build_node(start, mid)?;
        let high = self.build_node(mid, end)?;
        Ok(self.push_node(Node::Internal {
            axis: axis as u32,
            value,
            low,
            high,
        }))
    }

    /// The axis of maximum spread (max - min) over the subset, or an error
    /// when every axis has zero spread and the subset cannot be split.
    fn splitting_axis(&self, start: usize, end: usize) -> Result<usize> {
        let first = self.point_indices[start];
        let mut minimums = vec![N::zero(); self.dims];
        let mut maximums = vec![N::zero(); self.dims];
        for axis in 0..self.dims {
            minimums[axis] = self.coord(first, axis);
            maximums[axis] = self.coord(first, axis);
        }

        for &index in &self.point_indices[start + 1..end] {
            for axis in 0..self.dims {
                let value = self.coord(index, axis);
                if value < minimums[axis] {
                    minimums[axis] = value;
                } else if value > maximums[axis] {
                    maximums[axis] = value;
                }
            }
        }

        let mut max_spread = N::zero();
        let mut split_axis = None;
        for axis in 0..self.dims {
            let spread = maximums[axis] - minimums[axis];
            if spread > max_spread {
                max_spread = spread;
                split_axis = Some(axis);
            }
        }

        split_axis.ok_or(KdIndexError::DegenerateSplit { count: end - start })
    }

    /// Quickselect-style partition of `point_indices[start..end]` on `axis`
    /// around position `target`: afterwards every element left of `target`
    /// compares `<=` the element at `target` on the axis and every element
    /// right of it compares `>=`.
    ///
    /// Each round pivots on the last element, sweeps strictly-smaller values
    /// to the front, places the pivot, and narrows toward `target`.
    fn partition(&mut self, start: usize, end: usize, axis: usize, target: usize) {
        let mut left = start;
        let mut right = end - 1;

        loop {
            let pivot = self.coord(self.point_indices[right], axis);
            let mut store = left;
            for i in left..right {
                if self.coord(self.point_indices[i], axis) < pivot {
                    self.point_indices.swap(i, store);
                    store += 1;
                }
            }
            self.point_indices.swap(store, right);

            if store == target {
                return;
            } else if store < target {
                left = store + 1;
            } else {
                right = store - 1;
            }
        }
    }
}
