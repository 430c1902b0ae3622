use log::{debug, trace};

use crate::{util::Position, BoundedMap, HashSet};

/// A map-like trait that can be sent into [visible_tiles] to calculate a field of view.
pub trait ViewableField {
    /// Returns `true` if the tile at the given coordinates blocks sight.
    fn is_opaque(&self, x: i32, y: i32) -> bool;
}

/// A point in quadrant-local coordinates, where both axes point away from the origin.
type Point = (i32, i32);

/// Directed line between two lattice points, bounding one side of a [View].
#[derive(Clone, Copy, Debug, PartialEq)]
struct Line {
    xi: i32,
    yi: i32,
    xf: i32,
    yf: i32,
}

impl Line {
    fn new(xi: i32, yi: i32, xf: i32, yf: i32) -> Self {
        Self { xi, yi, xf, yf }
    }

    #[inline]
    fn dx(&self) -> i32 {
        self.xf - self.xi
    }

    #[inline]
    fn dy(&self) -> i32 {
        self.yf - self.yi
    }

    /// Positive if the line passes below `p`, negative if above, zero if collinear.
    #[inline]
    fn relative_slope(&self, (x, y): Point) -> i32 {
        self.dy() * (self.xf - x) - self.dx() * (self.yf - y)
    }

    fn is_below(&self, p: Point) -> bool {
        self.relative_slope(p) > 0
    }

    fn is_below_or_collinear(&self, p: Point) -> bool {
        self.relative_slope(p) >= 0
    }

    fn is_above(&self, p: Point) -> bool {
        self.relative_slope(p) < 0
    }

    fn is_above_or_collinear(&self, p: Point) -> bool {
        self.relative_slope(p) <= 0
    }

    fn is_collinear(&self, p: Point) -> bool {
        self.relative_slope(p) == 0
    }

    fn is_line_collinear(&self, other: &Line) -> bool {
        self.is_collinear((other.xi, other.yi)) && self.is_collinear((other.xf, other.yf))
    }
}

/// An unobstructed wedge of the current quadrant, bounded below by `shallow` and above by
/// `steep`.
///
/// The bump lists hold the corners of obstacles that have pushed each line so far, oldest
/// first.  Cloning a view copies them, so split views never share history.
#[derive(Clone, Debug)]
struct View {
    shallow: Line,
    steep: Line,
    shallow_bumps: Vec<Point>,
    steep_bumps: Vec<Point>,
}

impl View {
    fn new(shallow: Line, steep: Line) -> Self {
        Self {
            shallow,
            steep,
            shallow_bumps: Vec::new(),
            steep_bumps: Vec::new(),
        }
    }

    /// Raise the shallow line so that it passes over `p`.
    fn add_shallow_bump(&mut self, p: Point) {
        self.shallow.xf = p.0;
        self.shallow.yf = p.1;
        self.shallow_bumps.push(p);

        for &bump in self.steep_bumps.iter().rev() {
            if self.shallow.is_above(bump) {
                self.shallow.xi = bump.0;
                self.shallow.yi = bump.1;
            }
        }
    }

    /// Lower the steep line so that it passes under `p`.
    fn add_steep_bump(&mut self, p: Point) {
        self.steep.xf = p.0;
        self.steep.yf = p.1;
        self.steep_bumps.push(p);

        for &bump in self.shallow_bumps.iter().rev() {
            if self.steep.is_below(bump) {
                self.steep.xi = bump.0;
                self.steep.yi = bump.1;
            }
        }
    }

    /// A view whose lines have become collinear through either extremity of the origin tile has
    /// no width left.
    fn is_degenerate(&self) -> bool {
        self.shallow.is_line_collinear(&self.steep)
            && (self.shallow.is_collinear((0, 1)) || self.shallow.is_collinear((1, 0)))
    }
}

/// Remove the view at `view_index` if it has degenerated.  Returns `true` if the view survived.
fn check_view(active_views: &mut Vec<View>, view_index: usize) -> bool {
    if active_views[view_index].is_degenerate() {
        trace!("dropping degenerate view {}", view_index);
        active_views.remove(view_index);
        false
    } else {
        true
    }
}

/// Everything a quadrant sweep needs besides its active views.
struct Sweep<'a, U, B> {
    visited: &'a mut HashSet<Position>,
    origin: Position,
    sign: (i32, i32),
    visit: &'a mut U,
    is_blocking: &'a mut B,
}

impl<U, B> Sweep<'_, U, B>
where
    U: FnMut(Position),
    B: FnMut(Position) -> bool,
{
    /// Sweep one quadrant out to the given extents.
    fn quadrant(&mut self, extent_x: i32, extent_y: i32) {
        // A quadrant flattened against the map edge has no wedge, only the axis itself.
        if extent_x == 0 || extent_y == 0 {
            self.axis_ray(extent_x, extent_y);
            return;
        }

        let mut active_views = vec![View::new(
            Line::new(0, 1, extent_x, 0),
            Line::new(1, 0, 0, extent_y),
        )];

        // Visit the tiles diagonally and going outwards:
        //
        // 9
        // 5  8
        // 2  4  7
        // @  1  3  6
        for i in 1..=extent_x + extent_y {
            let start_j = std::cmp::max(0, i - extent_x);
            let max_j = std::cmp::min(i, extent_y);

            for j in start_j..=max_j {
                if active_views.is_empty() {
                    return;
                }

                self.visit_coord((i - j, j), &mut active_views);
            }
        }
    }

    /// Walk outwards along whichever axis has a non-zero extent, up to and including the first
    /// blocking tile.
    fn axis_ray(&mut self, extent_x: i32, extent_y: i32) {
        let (step_x, step_y) = if extent_x > 0 { (1, 0) } else { (0, 1) };

        for k in 1..=std::cmp::max(extent_x, extent_y) {
            let real = self.real_position((k * step_x, k * step_y));

            if self.visited.insert(real) {
                (self.visit)(real);
            }

            if (self.is_blocking)(real) {
                trace!("{} ends axis ray", real);
                break;
            }
        }
    }

    #[inline]
    fn real_position(&self, (x, y): Point) -> Position {
        Position::new(
            self.origin.x + x * self.sign.0,
            self.origin.y + y * self.sign.1,
        )
    }

    fn visit_coord(&mut self, (x, y): Point, active_views: &mut Vec<View>) {
        let top_left = (x, y + 1);
        let bottom_right = (x + 1, y);

        // Views whose steep line passes under the tile lie entirely below it.
        let mut view_index = 0;
        while view_index < active_views.len()
            && active_views[view_index].steep.is_below_or_collinear(bottom_right)
        {
            view_index += 1;
        }

        // Either the tile is above every view, or it is below the one it was matched to.
        if view_index == active_views.len()
            || active_views[view_index]
                .shallow
                .is_above_or_collinear(top_left)
        {
            return;
        }

        let real = self.real_position((x, y));

        if self.visited.insert(real) {
            (self.visit)(real);
        }

        if !(self.is_blocking)(real) {
            return;
        }

        let view = &active_views[view_index];
        let shallow_crosses = view.shallow.is_above(bottom_right);
        let steep_crosses = view.steep.is_below(top_left);

        match (shallow_crosses, steep_crosses) {
            (true, true) => {
                trace!("{} closes view {}", real, view_index);
                active_views.remove(view_index);
            }
            (true, false) => {
                active_views[view_index].add_shallow_bump(top_left);
                check_view(active_views, view_index);
            }
            (false, true) => {
                active_views[view_index].add_steep_bump(bottom_right);
                check_view(active_views, view_index);
            }
            (false, false) => {
                // The tile sits inside the view, so split the view into the part below it and
                // the part above it.
                trace!("{} splits view {}", real, view_index);

                let shallow_index = view_index;
                let mut steep_index = view_index + 1;
                let clone = active_views[view_index].clone();

                active_views.insert(shallow_index, clone);
                active_views[shallow_index].add_steep_bump(bottom_right);
                if !check_view(active_views, shallow_index) {
                    steep_index -= 1;
                }

                active_views[steep_index].add_shallow_bump(top_left);
                check_view(active_views, steep_index);
            }
        }
    }
}

/// Calculate a precise permissive field of view: a tile is visible if any line from any point in
/// the origin tile reaches any point in it without passing through the interior of a blocking
/// tile.
///
/// `origin` must lie within the `map_width` by `map_height` map, and `radius` must be
/// non-negative.  The field of view is a square of `radius` tiles around `origin`, clipped to the
/// map.
///
/// `visit` is called exactly once for each visible position, starting with `origin`, which is
/// always visible.  `is_blocking` is asked about every visible position other than `origin`;
/// positions lying on the axes through `origin` may be asked about twice.
pub fn field_of_view<U, B>(
    origin: Position,
    map_width: i32,
    map_height: i32,
    radius: i32,
    mut visit: U,
    mut is_blocking: B,
) where
    U: FnMut(Position),
    B: FnMut(Position) -> bool,
{
    assert!(radius >= 0);

    let mut visited = HashSet::default();

    visit(origin);
    visited.insert(origin);

    // Distances to the edges of the map, capped by the radius.
    let min_extent_x = std::cmp::min(origin.x, radius);
    let max_extent_x = std::cmp::min(map_width - origin.x - 1, radius);
    let min_extent_y = std::cmp::min(origin.y, radius);
    let max_extent_y = std::cmp::min(map_height - origin.y - 1, radius);

    // sign, extent_x, extent_y
    let quadrants = [
        ((1, 1), max_extent_x, max_extent_y),
        ((1, -1), max_extent_x, min_extent_y),
        ((-1, -1), min_extent_x, min_extent_y),
        ((-1, 1), min_extent_x, max_extent_y),
    ];

    for (sign, extent_x, extent_y) in quadrants {
        Sweep {
            visited: &mut visited,
            origin,
            sign,
            visit: &mut visit,
            is_blocking: &mut is_blocking,
        }
        .quadrant(extent_x, extent_y);
    }

    debug!(
        "field of view from {} with radius {}: {} tiles visible",
        origin,
        radius,
        visited.len()
    );
}

/// Collect the positions visible from `origin` on `map` within `radius`.
///
/// Positions outside of the map bounds are never reported.
pub fn visible_tiles<T>(map: &T, origin: Position, radius: i32) -> HashSet<Position>
where
    T: BoundedMap + ViewableField,
{
    let (min_x, min_y, max_x, max_y) = map.bounds();
    let offset = Position::new(min_x, min_y);
    let mut visible = HashSet::default();

    field_of_view(
        origin - offset,
        max_x - min_x + 1,
        max_y - min_y + 1,
        radius,
        |pos| {
            visible.insert(pos + offset);
        },
        |pos| {
            let real = pos + offset;
            map.is_opaque(real.x, real.y)
        },
    );

    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        width: i32,
        height: i32,
        origin: (i32, i32),
        radius: i32,
        walls: &[(i32, i32)],
    ) -> Vec<Position> {
        let mut visible = Vec::new();

        field_of_view(
            origin.into(),
            width,
            height,
            radius,
            |pos| visible.push(pos),
            |pos| walls.contains(&pos.into()),
        );

        visible
    }

    #[test]
    fn line_relative_slope() {
        let line = Line::new(0, 1, 3, 0);

        assert!(line.is_above((2, 0)));
        assert!(line.is_below((1, 1)));
        assert!(line.is_collinear((3, 0)));
        assert!(line.is_above_or_collinear((0, 1)));
        assert!(line.is_below_or_collinear((0, 1)));
        assert!(line.is_line_collinear(&Line::new(3, 0, 0, 1)));
        assert!(!line.is_line_collinear(&Line::new(1, 0, 0, 3)));
    }

    #[test]
    fn shallow_bump_pivots_on_steep_history() {
        let mut view = View::new(Line::new(0, 1, 5, 0), Line::new(1, 0, 0, 5));

        view.add_steep_bump((3, 2));
        assert_eq!(view.steep, Line::new(1, 0, 3, 2));

        // The raised shallow line would pass over the steep bump, so it pivots on it.
        view.add_shallow_bump((4, 5));
        assert_eq!(view.shallow, Line::new(3, 2, 4, 5));
        assert_eq!(view.shallow_bumps, vec![(4, 5)]);
        assert_eq!(view.steep_bumps, vec![(3, 2)]);
    }

    #[test]
    fn collapsed_view_is_degenerate() {
        let open = View::new(Line::new(0, 1, 4, 0), Line::new(1, 0, 0, 4));
        assert!(!open.is_degenerate());

        let closed = View::new(Line::new(0, 1, 2, -1), Line::new(1, 0, 2, -1));
        assert!(closed.is_degenerate());
    }

    #[test]
    fn radius_zero_sees_only_origin() {
        assert_eq!(run(5, 5, (2, 2), 0, &[]), vec![Position::new(2, 2)]);
    }

    #[test]
    fn corridor_is_visible_along_its_length() {
        let column: Vec<Position> = (0..8).map(|y| Position::new(0, y)).collect();
        let mut visible = run(1, 8, (0, 3), 4, &[]);
        visible.sort_by_key(|pos| pos.y);

        assert_eq!(visible, column);
    }

    #[test]
    fn wall_in_corridor_stops_sight() {
        let visible = run(8, 1, (3, 0), 10, &[(1, 0), (6, 0)]);

        assert_eq!(visible[0], Position::new(3, 0));
        assert_eq!(visible.len(), 6);
        assert!(visible.contains(&Position::new(1, 0)));
        assert!(visible.contains(&Position::new(6, 0)));
        assert!(!visible.contains(&Position::new(0, 0)));
        assert!(!visible.contains(&Position::new(7, 0)));
    }

    #[test]
    fn origin_is_visited_first_even_when_blocking() {
        let visible = run(5, 5, (2, 2), 2, &[(2, 2)]);

        assert_eq!(visible[0], Position::new(2, 2));
        assert_eq!(visible.len(), 25);
    }

    #[test]
    fn adjacent_wall_casts_shadow() {
        let visible = run(5, 5, (0, 0), 3, &[(1, 0)]);

        assert!(visible.contains(&Position::new(1, 0)));
        assert!(visible.contains(&Position::new(0, 1)));
        assert!(visible.contains(&Position::new(1, 1)));
        assert!(!visible.contains(&Position::new(2, 0)));
        assert!(!visible.contains(&Position::new(3, 0)));
        assert_eq!(visible.len(), 14);
    }

    #[test]
    fn blocking_is_only_asked_about_visible_tiles() {
        let mut asked = Vec::new();
        let mut visible = Vec::new();

        field_of_view(
            Position::new(0, 0),
            5,
            5,
            3,
            |pos| visible.push(pos),
            |pos| {
                asked.push(pos);
                pos == Position::new(1, 0)
            },
        );

        assert!(asked.iter().all(|pos| visible.contains(pos)));
        assert!(!asked.contains(&Position::new(2, 0)));
        assert!(!asked.contains(&Position::new(0, 0)));
    }
}
