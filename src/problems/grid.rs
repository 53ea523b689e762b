use derive_more::Display;
use nonmax::NonMaxU32;
use thiserror::Error;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::problem::Query;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 20;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;

// Simple colours
const WHITE: [u8; 3] = [u8::MAX, u8::MAX, u8::MAX];
const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];
const GREEN: [u8; 3] = [u8::MIN, u8::MAX, u8::MIN];
const BLUE: [u8; 3] = [u8::MIN, u8::MIN, u8::MAX];

pub(crate) type CoordIntrinsic = u32;
pub type Coord = NonMaxU32;

/// Moves cost one each.
pub type GridCost = u32;

/// A cell position. `y` grows downwards, one row per line of text.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({x},{y})")]
pub struct GridState {
    pub(crate) x: Coord,
    pub(crate) y: Coord,
}

impl GridState {
    pub fn new(x: CoordIntrinsic, y: CoordIntrinsic) -> Option<GridState> {
        Some(GridState {
            x: Coord::new(x)?,
            y: Coord::new(y)?,
        })
    }
    pub fn new_from_usize(x: usize, y: usize) -> Option<GridState> {
        let x = CoordIntrinsic::try_from(x).ok()?;
        let y = CoordIntrinsic::try_from(y).ok()?;
        Self::new(x, y)
    }

    pub fn x(&self) -> CoordIntrinsic {
        self.x.get()
    }
    pub fn y(&self) -> CoordIntrinsic {
        self.y.get()
    }
}
impl State for GridState {}

/// The 4 moves, in the order neighbours are produced.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum GridAction {
    #[display("↓")]
    Down, // y++
    #[display("↑")]
    Up, // y--
    #[display("→")]
    Right, // x++
    #[display("←")]
    Left, // x--
}
impl Action for GridAction {}

impl GridAction {
    pub const ALL: [GridAction; 4] = [
        GridAction::Down,
        GridAction::Up,
        GridAction::Right,
        GridAction::Left,
    ];

    #[inline(always)]
    fn delta(&self) -> (CoordIntrinsic, CoordIntrinsic) {
        let prev = CoordIntrinsic::MAX;
        let same = 0 as CoordIntrinsic;
        let next = 1 as CoordIntrinsic;

        #[rustfmt::skip]
        let delta = match self {
            GridAction::Down  => (same, next),
            GridAction::Up    => (same, prev),
            GridAction::Right => (next, same),
            GridAction::Left  => (prev, same),
        };
        delta
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GridCell {
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for GridCell {
    type Error = GridCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' | '░' => Ok(GridCell::Empty),
            '#' | '█' => Ok(GridCell::Wall),
            ch => Err(GridCellParseError::InvalidCharacter(ch)),
        }
    }
}

/// A 4-connected grid with wall cells.
///
/// Neighbours are worked out from the walls every time a state is expanded,
/// so editing walls never leaves anything stale behind.
#[derive(Clone, PartialEq, Eq)]
pub struct GridSpace {
    width: CoordIntrinsic,
    height: CoordIntrinsic,
    /// Row-major.
    cells: Vec<GridCell>,
}

impl GridSpace {
    /// An empty grid. `None` if it can't be addressed.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        let (w, h) = (
            CoordIntrinsic::try_from(width).ok()?,
            CoordIntrinsic::try_from(height).ok()?,
        );
        if w == CoordIntrinsic::MAX || h == CoordIntrinsic::MAX {
            return None;
        }
        Some(Self {
            width: w,
            height: h,
            cells: vec![GridCell::Empty; width.checked_mul(height)?],
        })
    }

    /// A grid whose walls are the cells where `blocked(x, y)` holds.
    pub fn from_predicate<F>(width: usize, height: usize, blocked: F) -> Option<Self>
    where
        F: Fn(CoordIntrinsic, CoordIntrinsic) -> bool,
    {
        let mut space = Self::new(width, height)?;
        for y in 0..space.height {
            for x in 0..space.width {
                if blocked(x, y) {
                    let i = space.offset(x, y);
                    space.cells[i] = GridCell::Wall;
                }
            }
        }
        Some(space)
    }

    /// A grid where each cell is a wall with probability `wall_density`.
    pub fn random<R: rand::Rng>(
        rng: &mut R,
        width: usize,
        height: usize,
        wall_density: f64,
    ) -> Option<Self> {
        let mut space = Self::new(width, height)?;
        space.fill_random(rng, wall_density);
        Some(space)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    #[inline(always)]
    fn offset(&self, x: CoordIntrinsic, y: CoordIntrinsic) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    #[inline(always)]
    fn in_bounds(&self, s: &GridState) -> bool {
        s.x() < self.width && s.y() < self.height
    }

    /// The cell at `s`, if it's on the grid.
    pub fn at(&self, s: &GridState) -> Option<GridCell> {
        self.in_bounds(s)
            .then(|| self.cells[self.offset(s.x(), s.y())])
    }

    /// Whether `s` is a wall. Cells out of the grid are blocked too.
    #[inline(always)]
    pub fn is_blocked(&self, s: &GridState) -> bool {
        self.at(s) != Some(GridCell::Empty)
    }

    /// Turns a cell into a wall. Returns whether `s` is on the grid.
    pub fn set_wall(&mut self, s: &GridState) -> bool {
        self.set(s, GridCell::Wall)
    }
    /// Empties a cell. Returns whether `s` is on the grid.
    pub fn clear(&mut self, s: &GridState) -> bool {
        self.set(s, GridCell::Empty)
    }

    fn set(&mut self, s: &GridState, cell: GridCell) -> bool {
        if !self.in_bounds(s) {
            return false;
        }
        let i = self.offset(s.x(), s.y());
        self.cells[i] = cell;
        true
    }

    fn fill_random<R: rand::Rng>(&mut self, rng: &mut R, wall_density: f64) {
        let p = if wall_density.is_nan() {
            0.0
        } else {
            wall_density.clamp(0.0, 1.0)
        };
        for cell in self.cells.iter_mut() {
            *cell = if rng.random_bool(p) {
                GridCell::Wall
            } else {
                GridCell::Empty
            };
        }
    }

    pub fn random_state<R: rand::Rng>(&self, r: &mut R) -> Option<GridState> {
        if self.cells.is_empty() {
            return None;
        }
        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let x = r.random_range(0..self.width);
            let y = r.random_range(0..self.height);
            let s = GridState::new(x, y)?;
            if !self.is_blocked(&s) {
                return Some(s);
            }
        }

        None
    }

    fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

impl Space<GridState, GridAction, GridCost> for GridSpace {
    #[inline(always)]
    fn apply(&self, s: &GridState, a: &GridAction) -> Option<GridState> {
        let (dx, dy) = a.delta();
        let next = GridState::new(s.x().wrapping_add(dx), s.y().wrapping_add(dy))?;
        (!self.is_blocked(&next)).then_some(next)
    }

    /// Gets the neighbours of a given position.
    ///
    /// NOTE: These states can only be used with the current grid
    fn neighbours(&self, s: &GridState) -> Neighbours<GridState, GridAction> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        GridAction::ALL
            .iter()
            .filter_map(|a| self.apply(s, a).map(|next| (next, *a)))
            .collect()
    }

    /// Walls are not part of the space.
    #[inline(always)]
    fn valid(&self, s: &GridState) -> bool {
        !self.is_blocked(s)
    }

    fn size(&self) -> Option<usize> {
        Some(self.cells.len())
    }
}

impl std::fmt::Display for GridSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.dimensions();
        writeln!(f, "Grid({}x{}):", d.0, d.1)?;
        for line in self.rows().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for GridSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}

/// Manhattan distance, exact on a grid without walls.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManhattanHeuristic;

impl Heuristic<GridState, GridCost> for ManhattanHeuristic {
    #[inline(always)]
    fn h(&self, a: &GridState, b: &GridState) -> GridCost {
        let delta_x = a.x().abs_diff(b.x());
        let delta_y = a.y().abs_diff(b.y());
        delta_x.saturating_add(delta_y)
    }
}

/// A grid together with a start and a goal.
#[derive(Clone, Debug)]
pub struct GridProblem {
    space: GridSpace,
    start: GridState,
    goal: GridState,
}

impl Problem<GridSpace, GridState, GridAction, GridCost> for GridProblem {
    fn space(&self) -> &GridSpace {
        &self.space
    }
    fn start(&self) -> &GridState {
        &self.start
    }
    fn goal(&self) -> &GridState {
        &self.goal
    }
}

impl GridProblem {
    pub fn new(space: GridSpace, start: GridState, goal: GridState) -> Self {
        Self { space, start, goal }
    }

    /// A random grid with random endpoints on empty cells.
    pub fn random<R: rand::Rng>(
        rng: &mut R,
        width: usize,
        height: usize,
        wall_density: f64,
    ) -> Option<Self> {
        let space = GridSpace::new(width, height)?;
        let mut problem = Self {
            space,
            start: GridState::new(0, 0)?,
            goal: GridState::new(0, 0)?,
        };
        problem
            .randomize(rng, wall_density)
            .then_some(problem)
    }

    /// Re-rolls the walls and picks new endpoints.
    ///
    /// Returns false when the new walls leave no room for the endpoints, in
    /// which case the problem is left as it was.
    pub fn randomize<R: rand::Rng>(&mut self, rng: &mut R, wall_density: f64) -> bool {
        let mut space = self.space.clone();
        space.fill_random(rng, wall_density);

        let (Some(start), Some(goal)) = (space.random_state(rng), space.random_state(rng)) else {
            return false;
        };
        self.space = space;
        self.start = start;
        self.goal = goal;
        true
    }

    pub fn query(&self) -> Query<'_, GridSpace, GridState> {
        Query::new(&self.space, self.start, self.goal)
    }

    pub fn space_mut(&mut self) -> &mut GridSpace {
        &mut self.space
    }

    /// Draws the whole grid with `*` over the cells a path goes through.
    pub fn render_path(&self, path: &Path<GridState, GridAction, GridCost>) -> String {
        let on_path: rustc_hash::FxHashSet<GridState> = path.states.iter().copied().collect();
        let (width, height) = self.space.dimensions();

        let mut out = String::with_capacity((width + 1) * height);
        for (y, line) in self.space.rows().enumerate() {
            for (x, cell) in line.iter().enumerate() {
                let s = GridState::new_from_usize(x, y);
                let ch = match s {
                    Some(s) if s == self.start => 'S',
                    Some(s) if s == self.goal => 'G',
                    Some(s) if on_path.contains(&s) => '*',
                    _ => match cell {
                        GridCell::Empty => '.',
                        GridCell::Wall => '#',
                    },
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Error)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid cell {e} found at ({x},{y})")]
    InvalidCell {
        e: GridCellParseError,
        x: usize,
        y: usize,
    },
    #[error("Line {y} has {found} cells, expected {expected}")]
    RaggedLine {
        y: usize,
        expected: usize,
        found: usize,
    },
    #[error("Grid of {width}x{height} is too large")]
    TooLarge { width: usize, height: usize },
    #[error("Missing {0}")]
    Missing(crate::problem::Endpoint),
    #[error("More than one {0}")]
    Repeated(crate::problem::Endpoint),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
    #[error("Image error when loading '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

/// Collects the endpoints found while loading a grid.
#[derive(Default)]
struct Endpoints {
    start: Option<GridState>,
    goal: Option<GridState>,
}

impl Endpoints {
    fn mark(
        slot: &mut Option<GridState>,
        endpoint: crate::problem::Endpoint,
        s: GridState,
    ) -> Result<(), GridParseError> {
        if slot.replace(s).is_some() {
            return Err(GridParseError::Repeated(endpoint));
        }
        Ok(())
    }
    fn start(&mut self, s: GridState) -> Result<(), GridParseError> {
        Self::mark(&mut self.start, crate::problem::Endpoint::Start, s)
    }
    fn goal(&mut self, s: GridState) -> Result<(), GridParseError> {
        Self::mark(&mut self.goal, crate::problem::Endpoint::Goal, s)
    }

    fn into_problem(self, space: GridSpace) -> Result<GridProblem, GridParseError> {
        use crate::problem::Endpoint;

        Ok(GridProblem {
            space,
            start: self.start.ok_or(GridParseError::Missing(Endpoint::Start))?,
            goal: self.goal.ok_or(GridParseError::Missing(Endpoint::Goal))?,
        })
    }
}

/// Parses a grid drawn with text.
///
/// `#`/`█` are walls, `.`/` `/`░` are empty, `S` marks the start and `G` the
/// goal, both over empty cells.
impl std::convert::TryFrom<&str> for GridProblem {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();

        let max_x = lines.first().map(|l| l.chars().count()).unwrap_or(0);
        let max_y = lines.len();
        if max_x == 0 {
            return Err(GridParseError::EmptyInput);
        }
        let mut space = GridSpace::new(max_x, max_y).ok_or(GridParseError::TooLarge {
            width: max_x,
            height: max_y,
        })?;
        let mut endpoints = Endpoints::default();

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != max_x {
                return Err(GridParseError::RaggedLine {
                    y,
                    expected: max_x,
                    found,
                });
            }

            for (x, ch) in line.chars().enumerate() {
                // Dimensions were checked when creating the space.
                let Some(s) = GridState::new_from_usize(x, y) else {
                    continue;
                };
                match ch {
                    'S' => endpoints.start(s)?,
                    'G' => endpoints.goal(s)?,
                    ch => {
                        let cell = GridCell::try_from(ch)
                            .map_err(|e| GridParseError::InvalidCell { e, x, y })?;
                        space.set(&s, cell);
                    }
                }
            }
        }

        endpoints.into_problem(space)
    }
}

/// Loads a grid from an image.
///
/// Black pixels are walls, blue marks the start and green the goal. Anything
/// else is empty.
impl std::convert::TryFrom<&std::path::Path> for GridProblem {
    type Error = GridParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        use image::ImageReader;
        use image::Rgb;

        let img = ImageReader::open(p)
            .map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| GridParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .into_rgb8();

        let max_x = img.width() as usize;
        let max_y = img.height() as usize;
        let mut space = GridSpace::new(max_x, max_y).ok_or(GridParseError::TooLarge {
            width: max_x,
            height: max_y,
        })?;
        let mut endpoints = Endpoints::default();

        for (x, y, px) in img.enumerate_pixels() {
            let px: &Rgb<u8> = px;
            let Some(s) = GridState::new(x, y) else {
                continue;
            };
            match px.0 {
                BLACK => {
                    space.set_wall(&s);
                }
                WHITE => {}
                GREEN => endpoints.goal(s)?,
                BLUE => endpoints.start(s)?,
                _ => {}
            }
        }

        endpoints.into_problem(space)
    }
}

impl std::fmt::Display for GridProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.space.dimensions();

        writeln!(
            f,
            "GridProblem({}x{}) (s:{}, g:{}):",
            d.0, d.1, self.start, self.goal
        )?;
        for (y, line) in self.space.rows().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (x, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let s = GridState::new_from_usize(x, y);

                let is_start = s == Some(self.start);
                let is_goal = s == Some(self.goal);

                match (is_start, is_goal) {
                    (true, true) => {
                        write!(f, "!")?;
                    }
                    (true, false) => {
                        write!(f, "S")?;
                    }
                    (false, true) => {
                        write!(f, "G")?;
                    }
                    (false, false) => {
                        write!(f, "{cell}")?;
                    }
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use crate::algorithms::astar::astar;
    use crate::algorithms::dijkstra::dijkstra;
    use crate::problem::Endpoint;
    use crate::problem::SearchError;

    fn state(x: u32, y: u32) -> GridState {
        GridState::new(x, y).unwrap()
    }

    /// 5x5, a wall across the middle row with a gap at x=3.
    const GAP: &str = indoc! {"
        S....
        .....
        ###.#
        .....
        ....G
    "};

    #[test]
    fn routes_through_the_gap() {
        let problem = GridProblem::try_from(GAP).unwrap();
        assert_eq!(problem.start, state(0, 0));
        assert_eq!(problem.goal, state(4, 4));

        let path = astar(problem.space(), problem.start, problem.goal, ManhattanHeuristic)
            .unwrap()
            .unwrap();
        assert_eq!(path.cost, 8);
        assert_eq!(path.len(), 8);
        assert!(path.states.contains(&state(3, 2)));
        assert!(problem.space().valid_path(&path));
        assert!(path.states.iter().all(|s| !problem.space().is_blocked(s)));
    }

    #[test]
    fn full_wall_has_no_path() {
        let mut problem = GridProblem::try_from(GAP).unwrap();
        assert!(problem.space_mut().set_wall(&state(3, 2)));

        let (s, g) = (problem.start, problem.goal);
        assert_eq!(astar(problem.space(), s, g, ManhattanHeuristic), Ok(None));
        assert_eq!(dijkstra(problem.space(), s, g), Ok(None));

        assert!(problem.space_mut().clear(&state(3, 2)));
        assert!(astar(problem.space(), s, g, ManhattanHeuristic).unwrap().is_some());
    }

    #[test]
    fn neighbour_order() {
        let space = GridSpace::new(3, 3).unwrap();
        let actions: Vec<GridAction> = space
            .neighbours(&state(1, 1))
            .into_iter()
            .map(|(_, a)| a)
            .collect();
        assert_eq!(actions, GridAction::ALL.to_vec());

        let corner: Vec<(GridState, GridAction)> =
            space.neighbours(&state(0, 0)).into_iter().collect();
        assert_eq!(
            corner,
            vec![
                (state(0, 1), GridAction::Down),
                (state(1, 0), GridAction::Right)
            ]
        );
    }

    #[test]
    fn neighbours_follow_the_predicate() {
        let mut space = GridSpace::from_predicate(3, 3, |x, _y| x == 1).unwrap();
        assert!(space.neighbours(&state(0, 1)).iter().all(|(s, _)| s.x() == 0));

        space.clear(&state(1, 1));
        assert!(space.neighbours(&state(0, 1)).contains(&(state(1, 1), GridAction::Right)));
        assert!(!space.set_wall(&state(3, 0)));
    }

    #[test]
    fn endpoints_on_walls_are_not_found() {
        let space = GridSpace::from_predicate(2, 2, |x, y| x == 1 && y == 1).unwrap();
        assert!(matches!(
            astar(&space, state(0, 0), state(1, 1), ManhattanHeuristic),
            Err(SearchError::NotFound {
                endpoint: Endpoint::Goal,
                ..
            })
        ));
        assert!(matches!(
            astar(&space, state(5, 0), state(0, 0), ManhattanHeuristic),
            Err(SearchError::NotFound {
                endpoint: Endpoint::Start,
                ..
            })
        ));
    }

    #[test]
    fn manhattan() {
        assert_eq!(ManhattanHeuristic.h(&state(1, 4), &state(3, 0)), 6);
        assert_eq!(ManhattanHeuristic.h(&state(2, 2), &state(2, 2)), 0);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            GridProblem::try_from(""),
            Err(GridParseError::EmptyInput)
        ));
        assert!(matches!(
            GridProblem::try_from("S.\n.G\n."),
            Err(GridParseError::RaggedLine { y: 2, expected: 2, found: 1 })
        ));
        assert!(matches!(
            GridProblem::try_from("S.\n?G"),
            Err(GridParseError::InvalidCell { x: 0, y: 1, .. })
        ));
        assert!(matches!(
            GridProblem::try_from("S.\n.."),
            Err(GridParseError::Missing(Endpoint::Goal))
        ));
        assert!(matches!(
            GridProblem::try_from("SS\n.G"),
            Err(GridParseError::Repeated(Endpoint::Start))
        ));
    }

    #[test]
    fn render() {
        let problem = GridProblem::try_from(indoc! {"
            S.█
            ..░
            #.G
        "})
        .unwrap();
        assert!(problem.space().is_blocked(&state(2, 0)));
        assert!(!problem.space().is_blocked(&state(2, 1)));

        let path = astar(problem.space(), problem.start, problem.goal, ManhattanHeuristic)
            .unwrap()
            .unwrap();
        assert_eq!(problem.render_path(&path).lines().count(), 3);
        assert_eq!(path.cost, 4);
        assert_eq!(
            problem.to_string(),
            "GridProblem(3x3) (s:(0,0), g:(2,2)):\nS░█\n░░░\n█░G\n"
        );
    }

    #[test]
    fn random_problems() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut problem = GridProblem::random(&mut rng, 16, 12, 0.2).unwrap();
        assert_eq!(problem.space().dimensions(), (16, 12));
        assert!(!problem.space().is_blocked(&problem.start));
        assert!(!problem.space().is_blocked(&problem.goal));

        // No room at all, and nothing changes.
        let before = problem.clone();
        assert!(!problem.randomize(&mut rng, 1.0));
        assert!(problem.space() == before.space());
        assert_eq!((problem.start, problem.goal), (before.start, before.goal));
        assert!(!problem.space().is_blocked(&problem.start));
        assert!(GridProblem::random(&mut rng, 4, 4, 1.0).is_none());

        assert!(problem.randomize(&mut rng, 0.1));
        assert!(!problem.space().is_blocked(&problem.start));
        assert!(!problem.space().is_blocked(&problem.goal));
    }

    #[test]
    fn loads_images() {
        use image::Rgb;
        use image::RgbImage;

        let mut img = RgbImage::from_pixel(4, 3, Rgb(WHITE));
        img.put_pixel(0, 0, Rgb(BLUE));
        img.put_pixel(3, 2, Rgb(GREEN));
        for y in 0..2 {
            img.put_pixel(2, y, Rgb(BLACK));
        }

        let p = std::env::temp_dir().join(format!("pathsearch-grid-{}.png", std::process::id()));
        img.save(&p).unwrap();
        let problem = GridProblem::try_from(p.as_path()).unwrap();
        std::fs::remove_file(&p).unwrap();

        assert_eq!(problem.start, state(0, 0));
        assert_eq!(problem.goal, state(3, 2));
        assert!(problem.space().is_blocked(&state(2, 0)));
        assert!(problem.space().is_blocked(&state(2, 1)));
        assert!(!problem.space().is_blocked(&state(2, 2)));

        let path = astar(problem.space(), problem.start, problem.goal, ManhattanHeuristic)
            .unwrap()
            .unwrap();
        assert_eq!(path.cost, 5);

        assert!(matches!(
            GridProblem::try_from(std::path::Path::new("/nonexistent/grid.png")),
            Err(GridParseError::IOError { .. })
        ));
    }
}
