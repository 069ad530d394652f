//! The fold-search validator and scorer.
//!
//! Tries every `(start_i, start_j, rotation)` combination of placing face 0
//! of a target box's face graph onto a candidate net bitmap, walking
//! adjacency to cover as much of the net as a spanning structure allows, and
//! scoring the attempt: zero for a perfect net, a positive overlap count for
//! a self-intersecting fold, or a negative uncovered count for a net too
//! small to wrap the target box.

use fixedbitset::FixedBitSet;
use hashbrown::HashSet;

use crate::box_graph::{BoxGraph, DELTA};
use crate::net::Bitmap;

/// `true` iff `net` is a valid net of `graph`: there is some placement and
/// rotation of face 0 that walks every occupied cell exactly once, visiting
/// every face of `graph`.
pub fn is_net(net: &Bitmap, graph: &BoxGraph) -> crate::error::Result<bool> {
    Ok(score(net, graph)? == 0)
}

/// Score how far `net` is from perfectly covering `graph`'s box.
///
/// Returns `0` for a perfect net, a positive number of overlaps for the
/// best self-intersecting fold found, or `-(T - visited)` for the best
/// undercoverage found, where `T` is `graph.face_count()` and `visited` is
/// how many distinct faces that attempt reached. Ties prefer overlap
/// results over undercoverage ones, matching a net that folds validly over
/// part of the box being "closer" than one that doesn't fold at all.
pub fn score(net: &Bitmap, graph: &BoxGraph) -> crate::error::Result<i64> {
    let total_target_faces = graph.face_count() as i64;

    if net.is_empty() || net.first().map_or(true, Vec::is_empty) {
        return Ok(-(total_target_faces));
    }

    let height = net.len();
    let width = net[0].len();
    let is_in_net = |i: i64, j: i64| -> bool {
        i >= 0
            && j >= 0
            && (i as usize) < height
            && (j as usize) < width
            && net[i as usize][j as usize] > 0
    };

    let mut best_overlap: Option<i64> = None;
    let mut best_uncovered: Option<i64> = None;

    for rotation in 0..4 {
        for i in 0..height {
            for j in 0..width {
                if net[i][j] == 0 {
                    continue;
                }

                let mut faces = graph.faces.clone();
                let first_neighbour = faces[0].neighbour(0);
                faces[0].orient(first_neighbour, rotation)?;

                let (overlaps, visited) =
                    walk(0, i as i64, j as i64, faces, net, &is_in_net)?;

                if overlaps == 0 {
                    let uncovered = total_target_faces - visited as i64;
                    if uncovered == 0 {
                        return Ok(0);
                    }
                    best_uncovered = Some(best_uncovered.map_or(uncovered, |b| b.min(uncovered)));
                } else {
                    best_overlap = Some(best_overlap.map_or(overlaps, |b| b.min(overlaps)));
                }
            }
        }
    }

    // A zero-overlap partial cover always dominates an overlapping fold,
    // even a better-scoring one: once some attempt walked cleanly, that's
    // the result, regardless of what overlapping attempts also occurred.
    Ok(match best_uncovered {
        Some(uncovered) => -uncovered,
        None => best_overlap.unwrap_or(total_target_faces),
    })
}

/// Walk the net from `(i, j)` following `faces`' adjacency, counting
/// overlaps (re-visits of an already-placed face) and the number of
/// distinct faces visited. Mutates `faces` via `orient` as it goes, same as
/// the materialiser.
fn walk(
    face_index: usize,
    i: i64,
    j: i64,
    mut faces: Vec<crate::box_graph::Face>,
    net: &Bitmap,
    is_in_net: &impl Fn(i64, i64) -> bool,
) -> crate::error::Result<(i64, usize)> {
    let mut visited_faces = FixedBitSet::with_capacity(faces.len());
    let mut visited_points = HashSet::new();
    let overlaps = walk_inner(
        face_index,
        i,
        j,
        &mut faces,
        net,
        is_in_net,
        &mut visited_faces,
        &mut visited_points,
    )?;
    Ok((overlaps, visited_faces.count_ones(..)))
}

#[allow(clippy::too_many_arguments)]
fn walk_inner(
    face_index: usize,
    i: i64,
    j: i64,
    faces: &mut [crate::box_graph::Face],
    net: &Bitmap,
    is_in_net: &impl Fn(i64, i64) -> bool,
    visited_faces: &mut FixedBitSet,
    visited_points: &mut HashSet<(i64, i64)>,
) -> crate::error::Result<i64> {
    let _ = net;
    let mut overlaps = 0i64;

    if visited_faces.put(face_index) {
        overlaps += 1;
    }
    visited_points.insert((i, j));

    for direction in 0..4 {
        let adjacent = faces[face_index].neighbour(direction);
        let (di, dj) = DELTA[direction];
        let (ni, nj) = (i + di, j + dj);

        if is_in_net(ni, nj) && !visited_points.contains(&(ni, nj)) {
            let opposite = (direction + 2) % 4;
            faces[adjacent].orient(face_index, opposite)?;
            overlaps += walk_inner(
                adjacent,
                ni,
                nj,
                faces,
                net,
                is_in_net,
                visited_faces,
                visited_points,
            )?;
        }
    }

    Ok(overlaps)
}
