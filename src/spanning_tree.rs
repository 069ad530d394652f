//! Component B: Winter's recursive contract/delete spanning-tree enumerator.
//!
//! Yields every spanning tree of a connected undirected multigraph exactly
//! once. Box graphs never have parallel edges, so every contraction group
//! below has exactly one label in practice, but edges carry a label
//! distinct from their endpoints so the algorithm also works for graphs
//! that do have parallel edges.

use hashbrown::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::BoxNetError;

/// An edge with a stable label, distinct from its current endpoints (which
/// get rewritten by contraction).
#[derive(Debug, Clone, Copy)]
struct Edge<L> {
    label: L,
    a: usize,
    b: usize,
}

/// Enumerate every spanning tree of `(vertices, edges)`, each yielded as a
/// `Vec` of `|vertices| - 1` edge labels.
///
/// `vertices` must be sorted ascending; each edge is `(label, a, b)` with
/// `a < b`. Labels distinguish parallel edges between the same pair of
/// vertices; for box graphs (no parallel edges) the pair itself is a fine
/// label.
///
/// Fails with [`BoxNetError::GraphInvariant`] if `vertices`/`edges` don't
/// describe a connected graph (a disconnected graph has no spanning tree).
pub fn enumerate<L: Copy + Eq + Hash>(
    vertices: &[usize],
    edges: &[(L, usize, usize)],
) -> crate::error::Result<Vec<Vec<L>>> {
    let edges: Vec<Edge<L>> = edges
        .iter()
        .map(|&(label, a, b)| Edge { label, a, b })
        .collect();

    let mut trees = Vec::new();
    recurse(vertices.to_vec(), edges, Vec::new(), &mut trees)?;
    Ok(trees)
}

/// One leaf of Winter's recursion: a sequence of contraction groups
/// `[G_1, ..., G_{|V|-1}]`. The Cartesian product of these groups gives
/// every spanning tree that leaf accounts for.
fn recurse<L: Copy + Eq + Hash>(
    vertices: Vec<usize>,
    edges: Vec<Edge<L>>,
    groups: Vec<Vec<L>>,
    out: &mut Vec<Vec<L>>,
) -> crate::error::Result<()> {
    if vertices.len() == 1 {
        emit_product(&groups, out);
        return Ok(());
    }

    let i = vertices[0];
    let j = edges
        .iter()
        .filter(|e| e.a == i)
        .map(|e| e.b)
        .min()
        .ok_or_else(|| {
            BoxNetError::GraphInvariant(format!(
                "vertex {i} has no incident edge; graph is not connected"
            ))
        })?;

    // Contract branch: always taken.
    let (contracted_vertices, contracted_edges, group) = contract(i, j, &vertices, &edges);
    let mut next_groups = groups.clone();
    next_groups.push(group);
    recurse(contracted_vertices, contracted_edges, next_groups, out)?;

    // Delete branch: only when removing every {i,j} edge keeps the graph
    // connected, i.e. {i,j} is not a bridge.
    if !is_bridge(i, j, &edges) {
        let deleted_edges: Vec<Edge<L>> = edges
            .into_iter()
            .filter(|e| !(e.a == i && e.b == j))
            .collect();
        recurse(vertices, deleted_edges, groups, out)?;
    }

    Ok(())
}

/// Remove `i`, rewriting every `{i, k}` edge (`k != j`) as `{min(j,k),
/// max(j,k)}`, keeping its label; collect the labels of `{i, j}` edges into
/// the contraction group.
fn contract<L: Copy + Eq + Hash>(
    i: usize,
    j: usize,
    vertices: &[usize],
    edges: &[Edge<L>],
) -> (Vec<usize>, Vec<Edge<L>>, Vec<L>) {
    let new_vertices: Vec<usize> = vertices.iter().copied().filter(|&v| v != i).collect();

    let mut new_edges = Vec::with_capacity(edges.len());
    let mut group = Vec::new();

    for &e in edges {
        if e.a == i && e.b == j {
            group.push(e.label);
        } else if e.a == i {
            let (lo, hi) = (e.b.min(j), e.b.max(j));
            new_edges.push(Edge {
                label: e.label,
                a: lo,
                b: hi,
            });
        } else {
            new_edges.push(e);
        }
    }

    (new_vertices, new_edges, group)
}

/// `{i, j}` is a bridge iff a DFS from `i`, with exactly one `{i,j}` edge
/// instance masked out (not every parallel edge), cannot reach `j`.
fn is_bridge<L: Copy + Eq + Hash>(i: usize, j: usize, edges: &[Edge<L>]) -> bool {
    let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
    for e in edges {
        adjacency.entry(e.a).or_default().push(e.b);
        adjacency.entry(e.b).or_default().push(e.a);
    }

    let mut masked = false;
    let mut visited = HashSet::new();

    fn search(
        x: usize,
        j: usize,
        i: usize,
        adjacency: &HashMap<usize, Vec<usize>>,
        visited: &mut HashSet<usize>,
        masked: &mut bool,
    ) -> bool {
        if x == j {
            return true;
        }
        visited.insert(x);
        if let Some(neighbours) = adjacency.get(&x) {
            for &y in neighbours {
                if x == i && y == j && !*masked {
                    *masked = true;
                    continue;
                }
                if !visited.contains(&y) && search(y, j, i, adjacency, visited, masked) {
                    return true;
                }
            }
        }
        false
    }

    !search(i, j, i, &adjacency, &mut visited, &mut masked)
}

/// Cartesian product of the contraction groups collected along one root-to-
/// leaf path, each combination being one spanning tree.
fn emit_product<L: Copy>(groups: &[Vec<L>], out: &mut Vec<Vec<L>>) {
    let mut combos: Vec<Vec<L>> = vec![Vec::new()];
    for group in groups {
        let mut next = Vec::with_capacity(combos.len() * group.len());
        for combo in &combos {
            for &label in group {
                let mut extended = combo.clone();
                extended.push(label);
                next.push(extended);
            }
        }
        combos = next;
    }
    out.extend(combos);
}
