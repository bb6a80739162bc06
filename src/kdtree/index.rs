use std::borrow::Cow;

use crate::r#type::Coord;

/// Arena id of a node within [`KdTree::nodes`].
pub(crate) type NodeId = u32;

/// A node of the tree.
///
/// Nodes are stored in a flat arena owned by the tree and refer to their
/// children by arena id, so dropping the tree never recurses regardless of
/// its shape. Leaves address a contiguous range of the permutation array
/// rather than owning their own index list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node<N: Coord> {
    Leaf {
        /// Start of this leaf's range in [`KdTree::point_indices`].
        start: u32,
        /// One past the end of the range.
        end: u32,
    },
    Internal {
        /// The splitting axis, in `0..dims`.
        axis: u32,
        /// The median point's coordinate on `axis`. Every point under `low`
        /// has `coord[axis] <= value`; every point under `high` has
        /// `coord[axis] >= value`.
        value: N,
        low: NodeId,
        high: NodeId,
    },
}

/// An immutable k-d tree over a flat coordinate buffer.
///
/// Built once by [`KdTreeBuilder`][crate::kdtree::KdTreeBuilder] and then
/// queried read-only. The coordinate data is either borrowed from the caller
/// for the tree's lifetime or copied into owned storage at construction;
/// that choice is fixed when the tree is built.
///
/// The tree is never mutated after `finish`, so sharing it across threads
/// for concurrent queries is safe.
#[derive(Debug, Clone, PartialEq)]
pub struct KdTree<'a, N: Coord> {
    pub(crate) nodes: Vec<Node<N>>,
    /// Permutation of `0..num_points`; leaves hold ranges into this.
    pub(crate) point_indices: Vec<u32>,
    pub(crate) data: Cow<'a, [N]>,
    pub(crate) num_points: usize,
    pub(crate) dims: usize,
    pub(crate) leaf_size: usize,
    /// Absent exactly when the tree holds zero points.
    pub(crate) root: Option<NodeId>,
}

impl<'a, N: Coord> KdTree<'a, N> {
    /// The number of points in this tree.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// The dimensionality of the indexed points.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The leaf threshold the tree was built with.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Whether the tree holds zero points.
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// The coordinates of point `index` as a slice of length
    /// [`dims`][Self::dims].
    pub fn point(&self, index: u32) -> &[N] {
        let start = index as usize * self.dims;
        &self.data[start..start + self.dims]
    }

    /// Copy borrowed coordinate data into the tree, detaching it from the
    /// caller's buffer.
    pub fn into_owned(self) -> KdTree<'static, N> {
        KdTree {
            nodes: self.nodes,
            point_indices: self.point_indices,
            data: Cow::Owned(self.data.into_owned()),
            num_points: self.num_points,
            dims: self.dims,
            leaf_size: self.leaf_size,
            root: self.root,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<N> {
        &self.nodes[id as usize]
    }

    /// The point indices stored under a leaf node.
    pub(crate) fn leaf_indices(&self, start: u32, end: u32) -> &[u32] {
        &self.point_indices[start as usize..end as usize]
    }
}
