use log::debug;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BinaryHeap, hash::Hash};

use crate::{
    util::{Distance, Position},
    BoundedMap, HashMap, HashSet,
};

/// A trait for a map that paths can be found in using [find_path].
pub trait PathableMap {
    /// Returns `true` if the tile at the given coordinates is blocked.
    fn is_blocked(&self, x: i32, y: i32) -> bool;
}

/// Which adjacent tiles count as neighbours when moving across a grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Cardinal directions only.
    Four,
    /// Cardinal and diagonal directions.
    Eight,
}

impl Connectivity {
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &ADJACENT_TILES[..4],
            Connectivity::Eight => &ADJACENT_TILES[..],
        }
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Connectivity::Eight
    }
}

const ADJACENT_TILES: [(i32, i32); 8] = [
    (-1, 0), // cardinals
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1), // diagonals
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Entry in the A* frontier.
///
/// Ordered so that a max-heap pops the lowest `f` first, then the lowest `h`, then the entry that
/// was pushed earliest, which makes searches repeatable when many paths cost the same.
struct OpenNode<N> {
    f: i32,
    h: i32,
    order: u64,
    g: i32,
    node: N,
}

impl<N> PartialEq for OpenNode<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for OpenNode<N> {}

impl<N> PartialOrd for OpenNode<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for OpenNode<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Find the cheapest path from `start` to `goal` using the A* algorithm.
///
/// `edge_cost(a, b)` is the cost of stepping from `a` to its neighbour `b`, `heuristic(a, b)`
/// estimates the cost from `a` to `b` and must never overestimate it for the result to be
/// optimal.  `neighbours(a)` lists the nodes reachable from `a` in one step; filtering out blocked
/// or out-of-bounds nodes is up to the caller.
///
/// The returned path starts with the first step after `start` and ends with `goal`.  It is empty
/// if no path exists or if `start == goal`.
pub fn a_star_weighted<N, C, H, F, I>(
    start: N,
    goal: N,
    mut edge_cost: C,
    mut heuristic: H,
    mut neighbours: F,
) -> Vec<N>
where
    N: Copy + Eq + Hash,
    C: FnMut(N, N) -> i32,
    H: FnMut(N, N) -> i32,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    if start == goal {
        return Vec::new();
    }

    let mut open: BinaryHeap<OpenNode<N>> = BinaryHeap::new();
    let mut closed: HashSet<N> = HashSet::default();
    let mut came_from: HashMap<N, N> = HashMap::default();
    let mut g_score: HashMap<N, i32> = HashMap::default();
    let mut order: u64 = 0;

    let h = heuristic(start, goal);
    open.push(OpenNode {
        f: h,
        h,
        order,
        g: 0,
        node: start,
    });
    g_score.insert(start, 0);

    while let Some(OpenNode { g, node: current, .. }) = open.pop() {
        // Skip frontier entries left behind by a cheaper route to the same node.
        if closed.contains(&current) || g_score.get(&current) != Some(&g) {
            continue;
        }

        if current == goal {
            let path = reconstruct_path(&came_from, goal);

            debug!(
                "a* found a {}-step path at cost {} after expanding {} nodes",
                path.len(),
                g,
                closed.len()
            );
            return path;
        }

        closed.insert(current);

        for neighbour in neighbours(current) {
            if closed.contains(&neighbour) {
                continue;
            }

            let tentative_g = g + edge_cost(current, neighbour);

            if g_score
                .get(&neighbour)
                .map_or(true, |&known| tentative_g < known)
            {
                came_from.insert(neighbour, current);
                g_score.insert(neighbour, tentative_g);

                let h = heuristic(neighbour, goal);
                order += 1;
                open.push(OpenNode {
                    f: tentative_g + h,
                    h,
                    order,
                    g: tentative_g,
                    node: neighbour,
                });
            }
        }
    }

    debug!("a* found no path after expanding {} nodes", closed.len());
    Vec::new()
}

/// Find a path from `start` to `goal` using the A* algorithm, where the heuristic also serves as
/// the cost of each step.
///
/// This is only optimal when the heuristic between two neighbours equals the true cost of moving
/// between them, as with uniform grids; use [a_star_weighted] otherwise.
pub fn a_star<N, H, F, I>(start: N, goal: N, heuristic: H, neighbours: F) -> Vec<N>
where
    N: Copy + Eq + Hash,
    H: Fn(N, N) -> i32,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    a_star_weighted(start, goal, &heuristic, &heuristic, neighbours)
}

/// Walk predecessors back from `goal`, returning the path without its starting node.
fn reconstruct_path<N: Copy + Eq + Hash>(came_from: &HashMap<N, N>, goal: N) -> Vec<N> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }

    // The last node pushed is the start.
    path.pop();
    path.reverse();
    path
}

/// In-bounds, unblocked positions adjacent to `pos`, cardinals first.
pub fn neighbours<T>(
    map: &T,
    pos: Position,
    connectivity: Connectivity,
) -> impl Iterator<Item = Position> + '_
where
    T: BoundedMap + PathableMap,
{
    let (min_x, min_y, max_x, max_y) = map.bounds();

    connectivity
        .offsets()
        .iter()
        .map(move |&(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
        .filter(move |p| {
            p.x >= min_x
                && p.x <= max_x
                && p.y >= min_y
                && p.y <= max_y
                && !map.is_blocked(p.x, p.y)
        })
}

/// Find the shortest path from `start` to `dest` on the given map, moving between neighbours
/// according to `connectivity` and measuring steps with `distance`.
///
/// Returns an empty path if `dest` is blocked, off the map, unreachable or equal to `start`.
pub fn find_path<T>(
    map: &T,
    start: Position,
    dest: Position,
    connectivity: Connectivity,
    distance: Distance,
) -> Vec<Position>
where
    T: BoundedMap + PathableMap,
{
    let (min_x, min_y, max_x, max_y) = map.bounds();

    if dest.x < min_x
        || dest.x > max_x
        || dest.y < min_y
        || dest.y > max_y
        || map.is_blocked(dest.x, dest.y)
    {
        debug!("no path from {} to unreachable {}", start, dest);
        return Vec::new();
    }

    a_star(
        start,
        dest,
        |a, b| distance.between(a, b),
        |pos| neighbours(map, pos, connectivity),
    )
}
