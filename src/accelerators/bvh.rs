//! Bounding Volume Hierarchy.

use crate::core::common::*;
use crate::core::geometry::*;
use crate::core::primitive::*;
use std::sync::Arc;

/// How the builder partitions primitives at an interior node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitMethod {
    /// Split at the median primitive along the widest centroid axis.
    EqualCount,

    /// Split at the midpoint of the centroid bounds along the widest axis.
    Middle,
}

impl From<&str> for SplitMethod {
    /// Parse a split method name, defaulting to equal-count partitioning.
    ///
    /// * `name` - The method name.
    fn from(name: &str) -> Self {
        match name {
            "equal_count" => SplitMethod::EqualCount,
            "middle" => SplitMethod::Middle,
            other => {
                warn!("BVH split method '{other}' unknown, using 'equal_count'");
                SplitMethod::EqualCount
            }
        }
    }
}

/// Per-primitive build record.
struct PrimitiveInfo {
    index: usize,
    bbox: BBox,
    centroid: Vector3,
}

/// Build-time tree node.
struct BuildNode {
    bbox: BBox,
    children: Option<[Box<BuildNode>; 2]>,
    split_axis: usize,
    first_prim_offset: usize,
    n_primitives: usize,
}

impl BuildNode {
    fn leaf(first: usize, n: usize, bbox: BBox) -> Self {
        Self {
            bbox,
            children: None,
            split_axis: 0,
            first_prim_offset: first,
            n_primitives: n,
        }
    }

    fn interior(axis: usize, left: BuildNode, right: BuildNode) -> Self {
        let bbox = left.bbox.union(&right.bbox);
        Self {
            bbox,
            children: Some([Box::new(left), Box::new(right)]),
            split_axis: axis,
            first_prim_offset: 0,
            n_primitives: 0,
        }
    }
}

/// Node of the flattened depth-first tree. Interior nodes store the offset
/// of their second child; leaves store their primitive range.
#[derive(Copy, Clone)]
struct LinearNode {
    bbox: BBox,
    /// Primitive offset for leaves, second-child offset for interiors.
    offset: u32,
    n_primitives: u16,
    axis: u8,
}

/// Bounding volume hierarchy over a set of primitives. Non-intersectable
/// input primitives are refined before the build.
pub struct Bvh {
    primitives: Vec<ArcPrimitive>,
    nodes: Vec<LinearNode>,
    max_prims_per_leaf: usize,
}

impl Bvh {
    /// Build a new `Bvh`.
    ///
    /// * `primitives`         - The primitives to aggregate.
    /// * `max_prims_per_leaf` - Leaf size threshold.
    /// * `split_method`       - The partitioning heuristic.
    pub fn new(
        primitives: &[ArcPrimitive],
        max_prims_per_leaf: usize,
        split_method: SplitMethod,
    ) -> Self {
        // Refine input down to intersectable primitives.
        let mut refined: Vec<ArcPrimitive> = Vec::with_capacity(primitives.len());
        let mut queue: Vec<ArcPrimitive> = primitives.to_vec();
        while let Some(p) = queue.pop() {
            if p.intersectable() {
                refined.push(p);
            } else {
                queue.extend(p.refine());
            }
        }

        if refined.is_empty() {
            return Self {
                primitives: vec![],
                nodes: vec![],
                max_prims_per_leaf,
            };
        }

        let mut info: Vec<PrimitiveInfo> = refined
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let bbox = p.bbox();
                PrimitiveInfo {
                    index,
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let mut ordered: Vec<ArcPrimitive> = Vec::with_capacity(refined.len());
        let mut total_nodes = 0;
        let n = info.len();
        let root = Self::build(
            &refined,
            &mut info,
            0,
            n,
            max_prims_per_leaf,
            split_method,
            &mut total_nodes,
            &mut ordered,
        );

        info!(
            "BVH created with {} nodes for {} primitives",
            total_nodes,
            ordered.len()
        );

        let mut nodes = vec![
            LinearNode {
                bbox: BBox::default(),
                offset: 0,
                n_primitives: 0,
                axis: 0,
            };
            total_nodes
        ];
        let mut offset = 0;
        Self::flatten(&root, &mut nodes, &mut offset);
        debug_assert_eq!(total_nodes, offset);

        Self {
            primitives: ordered,
            nodes,
            max_prims_per_leaf,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        primitives: &[ArcPrimitive],
        info: &mut [PrimitiveInfo],
        start: usize,
        end: usize,
        max_prims_per_leaf: usize,
        split_method: SplitMethod,
        total_nodes: &mut usize,
        ordered: &mut Vec<ArcPrimitive>,
    ) -> BuildNode {
        *total_nodes += 1;
        let bbox = info[start..end]
            .iter()
            .fold(BBox::default(), |acc, i| acc.union(&i.bbox));
        let n_primitives = end - start;

        let make_leaf = |info: &[PrimitiveInfo], ordered: &mut Vec<ArcPrimitive>| {
            let first = ordered.len();
            for i in &info[start..end] {
                ordered.push(Arc::clone(&primitives[i.index]));
            }
            BuildNode::leaf(first, n_primitives, bbox)
        };

        if n_primitives <= max_prims_per_leaf {
            return make_leaf(info, ordered);
        }

        // Partition along the widest axis of the centroid bounds.
        let centroid_bounds = info[start..end]
            .iter()
            .fold(BBox::default(), |acc, i| acc.union_point(&i.centroid));
        let axis = centroid_bounds.max_extent_axis();

        // Degenerate extent: all centroids coincide, no useful split exists.
        if centroid_bounds.p_max[axis] - centroid_bounds.p_min[axis] == 0.0 {
            return make_leaf(info, ordered);
        }

        let mid = match split_method {
            SplitMethod::Middle => {
                let pivot =
                    0.5 * (centroid_bounds.p_min[axis] + centroid_bounds.p_max[axis]);
                let mid = start
                    + itertools::partition(&mut info[start..end], |i| i.centroid[axis] < pivot);
                if mid == start || mid == end {
                    // Degenerate middle split; fall back to equal counts.
                    let mid = (start + end) / 2;
                    info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                        a.centroid[axis].partial_cmp(&b.centroid[axis]).unwrap()
                    });
                    mid
                } else {
                    mid
                }
            }
            SplitMethod::EqualCount => {
                let mid = (start + end) / 2;
                info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                    a.centroid[axis].partial_cmp(&b.centroid[axis]).unwrap()
                });
                mid
            }
        };

        let left = Self::build(
            primitives,
            info,
            start,
            mid,
            max_prims_per_leaf,
            split_method,
            total_nodes,
            ordered,
        );
        let right = Self::build(
            primitives,
            info,
            mid,
            end,
            max_prims_per_leaf,
            split_method,
            total_nodes,
            ordered,
        );
        BuildNode::interior(axis, left, right)
    }

    fn flatten(node: &BuildNode, nodes: &mut [LinearNode], offset: &mut usize) -> usize {
        let my_offset = *offset;
        *offset += 1;

        match &node.children {
            None => {
                nodes[my_offset] = LinearNode {
                    bbox: node.bbox,
                    offset: node.first_prim_offset as u32,
                    n_primitives: node.n_primitives as u16,
                    axis: 0,
                };
            }
            Some([left, right]) => {
                Self::flatten(left, nodes, offset);
                let second_child = Self::flatten(right, nodes, offset);
                nodes[my_offset] = LinearNode {
                    bbox: node.bbox,
                    offset: second_child as u32,
                    n_primitives: 0,
                    axis: node.split_axis as u8,
                };
            }
        }

        my_offset
    }
}

impl Primitive for Bvh {
    fn intersect(&self, ray: &mut Ray) -> Option<Intersection> {
        if self.nodes.is_empty() {
            return None;
        }

        let dir_is_neg = [ray.d.x < 0.0, ray.d.y < 0.0, ray.d.z < 0.0];
        let mut best: Option<Intersection> = None;

        let mut to_visit = [0_usize; 64];
        let mut to_visit_offset = 0;
        let mut current = 0;

        loop {
            let node = &self.nodes[current];
            // The slab test uses the ray's live [mint, maxt]; hits found so
            // far tighten maxt and prune the rest of the tree.
            if node.bbox.intersect(ray).is_some() {
                if node.n_primitives > 0 {
                    for i in 0..node.n_primitives as usize {
                        let prim = &self.primitives[node.offset as usize + i];
                        if let Some(hit) = prim.intersect(ray) {
                            best = Some(hit);
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current = to_visit[to_visit_offset];
                } else if dir_is_neg[node.axis as usize] {
                    // Visit the far (first) child after the near (second).
                    to_visit[to_visit_offset] = current + 1;
                    to_visit_offset += 1;
                    current = node.offset as usize;
                } else {
                    to_visit[to_visit_offset] = node.offset as usize;
                    to_visit_offset += 1;
                    current += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current = to_visit[to_visit_offset];
            }
        }

        best
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let dir_is_neg = [ray.d.x < 0.0, ray.d.y < 0.0, ray.d.z < 0.0];
        let mut to_visit = [0_usize; 64];
        let mut to_visit_offset = 0;
        let mut current = 0;

        loop {
            let node = &self.nodes[current];
            if node.bbox.intersect(ray).is_some() {
                if node.n_primitives > 0 {
                    for i in 0..node.n_primitives as usize {
                        if self.primitives[node.offset as usize + i].intersect_p(ray) {
                            return true;
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current = to_visit[to_visit_offset];
                } else if dir_is_neg[node.axis as usize] {
                    to_visit[to_visit_offset] = current + 1;
                    to_visit_offset += 1;
                    current = node.offset as usize;
                } else {
                    to_visit[to_visit_offset] = node.offset as usize;
                    to_visit_offset += 1;
                    current += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current = to_visit[to_visit_offset];
            }
        }

        false
    }

    fn bbox(&self) -> BBox {
        if self.nodes.is_empty() {
            BBox::default()
        } else {
            self.nodes[0].bbox
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
