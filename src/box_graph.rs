//! The 4-regular surface graph of a box.
//!
//! Builds the face list and edge set by laying out the six rectangular
//! sub-surfaces (TOP, FRONT, BOTTOM, BACK, LEFT, RIGHT) and then wiring the
//! nine seam rules that stitch their boundaries together into the box's
//! unfolding cross. See `DESIGN.md` for the grounding of each seam rule.

use hashbrown::{HashMap, HashSet};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dims::Dimensions;
use crate::error::BoxNetError;

/// Directions, clockwise from "up" when viewed from outside the box.
pub const UP: usize = 0;
pub const RIGHT: usize = 1;
pub const DOWN: usize = 2;
pub const LEFT: usize = 3;

/// `Δ(d)` offsets used by both the unfolding walk (component C) and the
/// fold-search walk (component D): up, right, down, left.
pub const DELTA: [(i64, i64); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// A single unit square face: its four clockwise neighbours.
///
/// The tuple is mutable only through [`Face::orient`], which the
/// materialiser and validator use to express a face's orientation relative
/// to whichever neighbour they arrived from. Orientation is always applied
/// to a deep copy of the owning graph's face list, never the shared one a
/// search holds onto between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    adjacents: [usize; 4],
}

impl Face {
    fn new(up: usize, right: usize, down: usize, left: usize) -> Self {
        Self {
            adjacents: [up, right, down, left],
        }
    }

    /// The neighbour in clockwise direction `d` (0=up, 1=right, 2=down, 3=left).
    pub fn neighbour(&self, d: usize) -> usize {
        self.adjacents[d]
    }

    /// Rotate this face's adjacency tuple so that `target` sits at
    /// direction `k`. A no-op if `target` is already there; fails if
    /// `target` isn't one of this face's four neighbours at all, which
    /// would mean the graph this face came from isn't actually 4-regular.
    pub fn orient(&mut self, target: usize, k: usize) -> Result<(), BoxNetError> {
        let Some(pos) = self.adjacents.iter().position(|&n| n == target) else {
            return Err(BoxNetError::GraphInvariant(format!(
                "face has no neighbour {target} to orient towards (adjacents = {:?})",
                self.adjacents
            )));
        };
        let shift = (pos + 4 - k) % 4;
        self.adjacents.rotate_left(shift);
        Ok(())
    }
}

/// The pair (ordered face list, edge set) that component A produces.
#[derive(Debug, Clone)]
pub struct BoxGraph {
    pub faces: Vec<Face>,
    pub edges: HashSet<(usize, usize)>,
}

impl BoxGraph {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Build the box graph for `dims`. If `randomise` is set, a uniform random
/// permutation of face labels is applied before the face list and edge set
/// are materialised — this changes nothing about the isomorphism class, it
/// only perturbs the enumeration order of component B.
pub fn build(dims: Dimensions, randomise: bool) -> Result<BoxGraph, BoxNetError> {
    build_with_rng(dims, randomise, &mut rand::thread_rng())
}

/// As [`build`], but with an explicit RNG (used by tests for determinism).
pub fn build_with_rng<R: Rng + ?Sized>(
    dims: Dimensions,
    randomise: bool,
    rng: &mut R,
) -> Result<BoxGraph, BoxNetError> {
    let l = dims.length as usize;
    let h = dims.height as usize;
    let d = dims.depth as usize;

    let total = 2 * l * d + 2 * l * h + 2 * d * h;

    let mut up: HashMap<usize, usize> = HashMap::with_capacity(total);
    let mut right: HashMap<usize, usize> = HashMap::with_capacity(total);
    let mut down: HashMap<usize, usize> = HashMap::with_capacity(total);
    let mut left: HashMap<usize, usize> = HashMap::with_capacity(total);

    // TOP (L x D). Row stride L; down wraps onto FRONT, up is stitched to
    // BACK below.
    for i in 0..l {
        for j in 0..d {
            let index = j * l + i;
            if j > 0 {
                up.insert(index, index - l);
            }
            if i < l - 1 {
                right.insert(index, index + 1);
            }
            down.insert(index, index + l);
            if i > 0 {
                left.insert(index, index - 1);
            }
        }
    }

    let mut start = l * d;

    // FRONT (L x H). up wraps onto TOP, down wraps onto BOTTOM.
    for i in 0..l {
        for j in 0..h {
            let index = start + j * l + i;
            up.insert(index, index - l);
            if i < l - 1 {
                right.insert(index, index + 1);
            }
            down.insert(index, index + l);
            if i > 0 {
                left.insert(index, index - 1);
            }
        }
    }
    start += l * h;

    // BOTTOM (L x D). up wraps onto FRONT, down wraps onto BACK.
    for i in 0..l {
        for j in 0..d {
            let index = start + j * l + i;
            up.insert(index, index - l);
            if i < l - 1 {
                right.insert(index, index + 1);
            }
            down.insert(index, index + l);
            if i > 0 {
                left.insert(index, index - 1);
            }
        }
    }
    start += l * d;

    // BACK (L x H). up wraps onto BOTTOM; down is stitched to TOP below.
    for i in 0..l {
        for j in 0..h {
            let index = start + j * l + i;
            up.insert(index, index - l);
            if i < l - 1 {
                right.insert(index, index + 1);
            }
            if j < h - 1 {
                down.insert(index, index + l);
            }
            if i > 0 {
                left.insert(index, index - 1);
            }
        }
    }
    start += l * h;

    // LEFT (D x H). Row stride D; outer boundaries are stitched to
    // TOP/FRONT/BOTTOM/BACK below.
    for i in 0..d {
        for j in 0..h {
            let index = start + j * d + i;
            if j > 0 {
                up.insert(index, index - d);
            }
            if i < d - 1 {
                right.insert(index, index + 1);
            }
            if j < h - 1 {
                down.insert(index, index + d);
            }
            if i > 0 {
                left.insert(index, index - 1);
            }
        }
    }
    let left_start = start;
    start += d * h;

    // RIGHT (D x H).
    for i in 0..d {
        for j in 0..h {
            let index = start + j * d + i;
            if j > 0 {
                up.insert(index, index - d);
            }
            if i < d - 1 {
                right.insert(index, index + 1);
            }
            if j < h - 1 {
                down.insert(index, index + d);
            }
            if i > 0 {
                left.insert(index, index - 1);
            }
        }
    }
    let right_start = start;

    // Seam: FRONT <-> LEFT.
    let left_seam = left_start + d - 1;
    for i in 0..h {
        right.insert(left_seam + i * d, (d + i) * l);
        left.insert((d + i) * l, left_seam + i * d);
    }

    // Seam: FRONT <-> RIGHT.
    for i in 0..h {
        right.insert((d + i + 1) * l - 1, right_start + i * d);
        left.insert(right_start + i * d, (d + i + 1) * l - 1);
    }

    // Seam: TOP <-> BACK.
    let back_start = (2 * (d + h) - 1) * l;
    for i in 0..l {
        up.insert(i, back_start + i);
        down.insert(back_start + i, i);
    }

    // Seam: TOP <-> LEFT.
    for i in 0..d {
        up.insert(left_start + i, i * l);
        left.insert(i * l, left_start + i);
    }

    // Seam: TOP <-> RIGHT.
    for i in 0..d {
        let top_index = (d - i) * l - 1;
        up.insert(right_start + i, top_index);
        right.insert(top_index, right_start + i);
    }

    // Seam: BOTTOM <-> LEFT.
    let left_bottom_seam = left_start + (h - 1) * d;
    for i in 0..d {
        let bottom_index = (2 * d + h - 1 - i) * l;
        down.insert(left_bottom_seam + i, bottom_index);
        left.insert(bottom_index, left_bottom_seam + i);
    }

    // Seam: BOTTOM <-> RIGHT.
    let right_bottom_seam = right_start + (h - 1) * d;
    for i in 0..d {
        let bottom_index = (d + h + 1 + i) * l - 1;
        down.insert(right_bottom_seam + i, bottom_index);
        right.insert(bottom_index, right_bottom_seam + i);
    }

    // Seam: BACK <-> LEFT.
    for i in 0..h {
        let left_index = left_start + i * d;
        let back_index = back_start - i * l;
        left.insert(left_index, back_index);
        left.insert(back_index, left_index);
    }

    // Seam: BACK <-> RIGHT.
    let right_seam_start = right_start + d - 1;
    let back_seam_start = left_start - 1;
    for i in 0..h {
        let right_index = right_seam_start + i * d;
        let back_index = back_seam_start - i * l;
        right.insert(right_index, back_index);
        right.insert(back_index, right_index);
    }

    // Every boundary cell should now have all four neighbours; a missing
    // entry means the seam rules above don't cover this box's shape.
    for index in 0..total {
        for (name, map) in [("up", &up), ("right", &right), ("down", &down), ("left", &left)] {
            if !map.contains_key(&index) {
                return Err(BoxNetError::GraphInvariant(format!(
                    "face {index} is missing its {name} neighbour"
                )));
            }
        }
    }

    let mut order: Vec<usize> = (0..total).collect();
    if randomise {
        order.shuffle(rng);
    }

    // `order[i]` is the new label for the face originally at local index i.
    let mut faces = vec![Face::new(0, 0, 0, 0); total];
    let mut edges = HashSet::new();

    for (i, &new_label) in order.iter().enumerate() {
        let face = Face::new(
            order[up[&i]],
            order[right[&i]],
            order[down[&i]],
            order[left[&i]],
        );
        faces[new_label] = face;

        for other in face.adjacents {
            if new_label < other {
                edges.insert((new_label, other));
            }
        }
    }

    Ok(BoxGraph { faces, edges })
}
