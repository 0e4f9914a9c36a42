//! 2D k-d tree over unit centroids
//!
//! Backs the k-nearest and distance-band adjacency builders with
//! O(log n) point queries instead of O(n) scans per unit.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A 2D k-d tree over indexed coordinates.
///
/// Query results report the index the point had in the input slice, so
/// callers can map hits back to unit positions in a collection.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<Node>,
    coords: Vec<(f64, f64)>,
}

#[derive(Debug)]
struct Node {
    /// Index into `coords` (and the caller's input slice).
    point: usize,
    /// Split axis: 0 = x, 1 = y.
    axis: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// A query hit: input index plus squared distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub distance_sq: f64,
}

impl Hit {
    /// Euclidean distance to the query point.
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

/// Max-heap entry ordered by distance (farthest on top).
struct HeapEntry(Hit);

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.distance_sq == other.0.distance_sq
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.distance_sq.total_cmp(&other.0.distance_sq)
    }
}

impl KdTree {
    /// Build a tree from coordinates. O(n log n).
    pub fn build(coords: &[(f64, f64)]) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(coords.len()),
            coords: coords.to_vec(),
        };
        if !coords.is_empty() {
            let mut order: Vec<usize> = (0..coords.len()).collect();
            tree.build_subtree(&mut order, 0);
        }
        tree
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Single nearest point to `(qx, qy)`, or `None` for an empty tree.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<Hit> {
        self.k_nearest(qx, qy, 1).into_iter().next()
    }

    /// The k nearest points to `(qx, qy)`, sorted by ascending distance.
    ///
    /// Returns fewer than k hits only when the tree holds fewer points.
    pub fn k_nearest(&self, qx: f64, qy: f64, k: usize) -> Vec<Hit> {
        if self.nodes.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k + 1);
        self.knn_descend(0, qx, qy, k, &mut heap);

        let mut hits: Vec<Hit> = heap.into_iter().map(|e| e.0).collect();
        hits.sort_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));
        hits
    }

    /// All points within `radius` of `(qx, qy)`, unordered.
    pub fn within_radius(&self, qx: f64, qy: f64, radius: f64) -> Vec<Hit> {
        let mut hits = Vec::new();
        if self.nodes.is_empty() || radius < 0.0 {
            return hits;
        }
        self.radius_descend(0, qx, qy, radius * radius, &mut hits);
        hits
    }

    fn build_subtree(&mut self, order: &mut [usize], depth: usize) -> usize {
        let axis = (depth % 2) as u8;
        let median = order.len() / 2;

        // Median split via selection, not a full sort
        let coords = &self.coords;
        order.select_nth_unstable_by(median, |&a, &b| {
            let (va, vb) = if axis == 0 {
                (coords[a].0, coords[b].0)
            } else {
                (coords[a].1, coords[b].1)
            };
            va.total_cmp(&vb)
        });

        let node_idx = self.nodes.len();
        self.nodes.push(Node {
            point: order[median],
            axis,
            left: None,
            right: None,
        });

        if median > 0 {
            let mut lower = order[..median].to_vec();
            let child = self.build_subtree(&mut lower, depth + 1);
            self.nodes[node_idx].left = Some(child);
        }
        if median + 1 < order.len() {
            let mut upper = order[median + 1..].to_vec();
            let child = self.build_subtree(&mut upper, depth + 1);
            self.nodes[node_idx].right = Some(child);
        }

        node_idx
    }

    fn knn_descend(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        k: usize,
        heap: &mut BinaryHeap<HeapEntry>,
    ) {
        let node = &self.nodes[node_idx];
        let (px, py) = self.coords[node.point];
        let dx = qx - px;
        let dy = qy - py;
        let dist_sq = dx * dx + dy * dy;

        if heap.len() < k {
            heap.push(HeapEntry(Hit {
                index: node.point,
                distance_sq: dist_sq,
            }));
        } else if dist_sq < heap.peek().map_or(f64::MAX, |e| e.0.distance_sq) {
            heap.pop();
            heap.push(HeapEntry(Hit {
                index: node.point,
                distance_sq: dist_sq,
            }));
        }

        let planar = if node.axis == 0 { dx } else { dy };
        let (near, far) = if planar < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = near {
            self.knn_descend(child, qx, qy, k, heap);
        }

        // Cross the splitting plane only if it can still hold a closer point
        let worst = if heap.len() < k {
            f64::MAX
        } else {
            heap.peek().map_or(f64::MAX, |e| e.0.distance_sq)
        };
        if planar * planar < worst {
            if let Some(child) = far {
                self.knn_descend(child, qx, qy, k, heap);
            }
        }
    }

    fn radius_descend(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        radius_sq: f64,
        hits: &mut Vec<Hit>,
    ) {
        let node = &self.nodes[node_idx];
        let (px, py) = self.coords[node.point];
        let dx = qx - px;
        let dy = qy - py;
        let dist_sq = dx * dx + dy * dy;

        if dist_sq <= radius_sq {
            hits.push(Hit {
                index: node.point,
                distance_sq: dist_sq,
            });
        }

        // planar < 0 puts the query in the left half-space; the far side
        // is reachable only when the splitting plane is within the radius
        let planar = if node.axis == 0 { dx } else { dy };

        if let Some(child) = node.left {
            if planar < 0.0 || planar * planar <= radius_sq {
                self.radius_descend(child, qx, qy, radius_sq, hits);
            }
        }
        if let Some(child) = node.right {
            if planar > 0.0 || planar * planar <= radius_sq {
                self.radius_descend(child, qx, qy, radius_sq, hits);
            }
        }
    }
}
