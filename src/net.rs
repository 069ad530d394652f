//! The net materialiser and canonicaliser.
//!
//! Unfolds a spanning tree of a box's face graph onto a 2D grid (a "net"),
//! then reduces that grid to a canonical bitmap so that two trees which
//! unfold to congruent shapes compare equal.

use fixedbitset::FixedBitSet;
use hashbrown::HashSet;

use crate::box_graph::{BoxGraph, DELTA};

/// A net bitmap: `cell[i][j]` counts how many faces landed on grid cell
/// `(i, j)` during unfolding. A valid (non-self-intersecting) net has every
/// occupied cell equal to 1; overlapping nets can have higher counts.
pub type Bitmap = Vec<Vec<u32>>;

/// Unfold `tree` (a spanning tree of `graph`, given as the edge set
/// `(a, b)` with `a < b`) starting from face 0, re-orienting each newly
/// visited face's neighbour slots to match the direction it was reached
/// from, then canonicalise the resulting grid.
///
/// `graph`'s face list is cloned internally: orientation mutates the faces
/// in place, and a fresh copy is needed for every tree unfolded from the
/// same graph.
pub fn create_net(tree: &[(usize, usize)], graph: &BoxGraph) -> crate::error::Result<Bitmap> {
    let total_faces = tree.len() + 1;
    let edges: HashSet<(usize, usize)> = tree.iter().copied().collect();
    let mut faces = graph.faces.clone();

    let side = 2 * total_faces;
    let mut net = vec![vec![0u32; side]; side];
    let mut visited = FixedBitSet::with_capacity(total_faces);

    grow(0, total_faces, total_faces, &edges, &mut faces, &mut net, &mut visited)?;

    Ok(canonicalise(&net))
}

fn grow(
    face_index: usize,
    i: usize,
    j: usize,
    edges: &HashSet<(usize, usize)>,
    faces: &mut [crate::box_graph::Face],
    net: &mut Bitmap,
    visited: &mut FixedBitSet,
) -> crate::error::Result<()> {
    net[i][j] += 1;
    visited.insert(face_index);

    for direction in 0..4 {
        let adjacent = faces[face_index].neighbour(direction);
        let edge = if face_index < adjacent {
            (face_index, adjacent)
        } else {
            (adjacent, face_index)
        };
        if !visited.contains(adjacent) && edges.contains(&edge) {
            let (di, dj) = DELTA[direction];
            let opposite = (direction + 2) % 4;
            faces[adjacent].orient(face_index, opposite)?;
            grow(
                adjacent,
                (i as i64 + di) as usize,
                (j as i64 + dj) as usize,
                edges,
                faces,
                net,
                visited,
            )?;
        }
    }

    Ok(())
}

/// Trim the zero border, then pick the lexicographically smallest bitmap
/// among the 8 elements of the dihedral group D4 (4 rotations of the
/// trimmed grid and its mirror).
fn canonicalise(net: &Bitmap) -> Bitmap {
    let trimmed = trim(net);
    let mirrored = mirror(&trimmed);

    let mut best = if trimmed <= mirrored {
        trimmed.clone()
    } else {
        mirrored.clone()
    };

    for mut matrix in [trimmed, mirrored] {
        for _ in 0..3 {
            matrix = rotate_90(&matrix);
            if matrix < best {
                best = matrix.clone();
            }
        }
    }

    best
}

/// Shrink to the smallest bounding box containing every non-zero cell.
/// Returns an empty matrix unchanged.
fn trim(matrix: &Bitmap) -> Bitmap {
    let height = matrix.len();
    let width = matrix.first().map_or(0, Vec::len);
    if height == 0 || width == 0 {
        return matrix.clone();
    }

    let mut min_i = height - 1;
    let mut max_i = 0;
    let mut min_j = width - 1;
    let mut max_j = 0;
    let mut any = false;

    for (i, row) in matrix.iter().enumerate() {
        for (j, &cell) in row.iter().enumerate() {
            if cell != 0 {
                any = true;
                min_i = min_i.min(i);
                max_i = max_i.max(i);
                min_j = min_j.min(j);
                max_j = max_j.max(j);
            }
        }
    }

    if !any {
        return Vec::new();
    }

    matrix[min_i..=max_i]
        .iter()
        .map(|row| row[min_j..=max_j].to_vec())
        .collect()
}

/// Mirror left-to-right.
fn mirror(matrix: &Bitmap) -> Bitmap {
    matrix.iter().map(|row| row.iter().rev().copied().collect()).collect()
}

/// Rotate 90 degrees: `new[k][i] = matrix[i][w - 1 - k]`.
fn rotate_90(matrix: &Bitmap) -> Bitmap {
    if matrix.is_empty() {
        return matrix.clone();
    }
    let height = matrix.len();
    let width = matrix[0].len();

    (0..width)
        .map(|k| (0..height).map(|i| matrix[i][width - 1 - k]).collect())
        .collect()
}

/// Render a bitmap the way `results.txt` and the CLI's stdout echo do: `  `
/// for an empty cell, `[]` for exactly one face, `` `[n` `` for `n >= 2`
/// overlapping faces (n capped at 9, since the format is a single digit).
pub fn render(net: &Bitmap) -> String {
    net.iter()
        .map(|row| {
            row.iter()
                .map(|&cell| match cell {
                    0 => "  ".to_string(),
                    1 => "[]".to_string(),
                    n => format!("[{}", n.min(9)),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_graph;
    use crate::dims::Dimensions;

    fn tree_edges(graph: &BoxGraph) -> Vec<(usize, usize)> {
        // A spanning tree picked by taking edges in insertion order, skipping
        // anything that would create a cycle (a plain union-find).
        let n = graph.face_count();
        let mut parent: Vec<usize> = (0..n).collect();
        fn find(parent: &mut [usize], x: usize) -> usize {
            if parent[x] != x {
                parent[x] = find(parent, parent[x]);
            }
            parent[x]
        }

        let mut edges: Vec<(usize, usize)> = graph.edges.iter().copied().collect();
        edges.sort_unstable();

        let mut tree = Vec::new();
        for (a, b) in edges {
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra] = rb;
                tree.push((a, b));
            }
        }
        tree
    }

    #[test]
    fn cube_spanning_tree_unfolds_to_six_cells() {
        let dims = Dimensions::new(1, 1, 1).unwrap();
        let graph = box_graph::build(dims, false).unwrap();
        let tree = tree_edges(&graph);
        assert_eq!(tree.len(), 5);

        let net = create_net(&tree, &graph).unwrap();
        let total: u32 = net.iter().flat_map(|row| row.iter()).sum();
        assert_eq!(total, 6);
        assert!(net.iter().all(|row| row.iter().all(|&c| c <= 1)));
    }

    #[test]
    fn canonicalisation_is_idempotent() {
        let dims = Dimensions::new(1, 1, 1).unwrap();
        let graph = box_graph::build(dims, false).unwrap();
        let tree = tree_edges(&graph);
        let net = create_net(&tree, &graph).unwrap();
        let again = canonicalise(&net);
        assert_eq!(net, again);
    }

    #[test]
    fn render_uses_the_three_cell_glyphs() {
        let net = vec![vec![0, 1, 2]];
        assert_eq!(render(&net), "  [][2");
    }

    #[test]
    fn rotate_90_on_rectangle_swaps_dimensions() {
        let matrix = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let rotated = rotate_90(&matrix);
        assert_eq!(rotated.len(), 3);
        assert_eq!(rotated[0].len(), 2);
        assert_eq!(rotated, vec![vec![3, 6], vec![2, 5], vec![1, 4]]);
    }

    #[test]
    fn trim_drops_the_zero_border() {
        let matrix = vec![
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![0, 0, 0],
        ];
        assert_eq!(trim(&matrix), vec![vec![1]]);
    }
}
