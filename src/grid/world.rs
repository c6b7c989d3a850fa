use std::collections::HashSet;

use rand::Rng;

use crate::error::{InvalidMdp, Result};
use crate::model::{GridCoord, Problem, ProblemBuilder, INITIAL_POLICY_PRIORITY};

/// A rectangular navigation grid with cells `(1..=width, 1..=height)`.
///
/// Every free cell except the goal gets the four moves, declared in
/// east, north, south, west order. A move that would leave the grid or enter
/// a blocked cell keeps the agent in place and therefore becomes a self-loop.
/// With a slip probability `p` a move stays in place with probability `p`.
///
/// Policy iteration seeds its policy east-first, so its initial policy only
/// reaches the goal from every cell when the goal sits in the north-east
/// corner of the free area; elsewhere the seed can cycle and policy
/// evaluation never settles.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: i32,
    height: i32,
    goal: GridCoord,
    initial: Option<GridCoord>,
    blocked: HashSet<GridCoord>,
    move_cost: f64,
    slip: f64,
    epsilon: f64,
}

impl GridWorld {
    pub fn new(width: i32, height: i32, goal: GridCoord) -> Self {
        Self {
            width,
            height,
            goal,
            initial: None,
            blocked: HashSet::new(),
            move_cost: 1.0,
            slip: 0.0,
            epsilon: 1e-6,
        }
    }

    /// A grid whose goal and initial cell are drawn uniformly at random.
    ///
    /// Fails with [`InvalidMdp::InvalidGridSize`] unless both dimensions are
    /// positive.
    pub fn with_random_goal<R: Rng>(width: i32, height: i32, rng: &mut R) -> Result<Self> {
        check_size(width, height)?;
        let goal = random_cell(width, height, rng);
        let mut initial = random_cell(width, height, rng);
        while initial == goal && width * height > 1 {
            initial = random_cell(width, height, rng);
        }
        Ok(Self::new(width, height, goal).with_initial(initial))
    }

    pub fn with_initial(mut self, initial: GridCoord) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn with_blocked<I: IntoIterator<Item = GridCoord>>(mut self, cells: I) -> Self {
        self.blocked.extend(cells);
        self
    }

    pub fn with_move_cost(mut self, move_cost: f64) -> Self {
        self.move_cost = move_cost;
        self
    }

    /// Probability that a move leaves the agent in place; must lie in
    /// `[0, 1)`, which [`GridWorld::build`] checks.
    pub fn with_slip(mut self, slip: f64) -> Self {
        self.slip = slip;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn goal(&self) -> GridCoord {
        self.goal
    }

    pub fn initial(&self) -> Option<GridCoord> {
        self.initial
    }

    /// Label of the state at `coord`.
    pub fn label(coord: GridCoord) -> String {
        format!("x{}y{}", coord.x, coord.y)
    }

    /// Whether `coord` is a free cell of the grid.
    pub fn is_free(&self, coord: GridCoord) -> bool {
        (1..=self.width).contains(&coord.x)
            && (1..=self.height).contains(&coord.y)
            && !self.blocked.contains(&coord)
    }

    fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (1..=self.height)
            .flat_map(move |y| (1..=self.width).map(move |x| GridCoord::new(x, y)))
            .filter(move |&coord| self.is_free(coord))
    }

    /// Declares the grid on a fresh [`ProblemBuilder`].
    pub fn to_builder(&self) -> ProblemBuilder {
        let mut builder = ProblemBuilder::new(self.epsilon);

        for coord in self.cells() {
            builder.grid_state(Self::label(coord), coord);
        }

        for coord in self.cells().filter(|&c| c != self.goal) {
            let here = Self::label(coord);
            for name in INITIAL_POLICY_PRIORITY.iter() {
                let (dx, dy) = match name.delta() {
                    Some(delta) => delta,
                    None => continue,
                };
                let target = coord.offset(dx, dy);
                let successors = if !self.is_free(target) {
                    vec![(here.clone(), 1.0)]
                } else if self.slip > 0.0 {
                    vec![
                        (Self::label(target), 1.0 - self.slip),
                        (here.clone(), self.slip),
                    ]
                } else {
                    vec![(Self::label(target), 1.0)]
                };
                builder.action(&here, name.clone(), self.move_cost, successors);
            }
        }

        builder.goal(&Self::label(self.goal));
        if let Some(initial) = self.initial {
            builder.initial(&Self::label(initial));
        }
        builder
    }

    pub fn build(&self) -> Result<Problem> {
        check_size(self.width, self.height)?;
        if !(0.0..1.0).contains(&self.slip) {
            return Err(InvalidMdp::InvalidSlip(self.slip).into());
        }
        self.to_builder().build()
    }
}

fn check_size(width: i32, height: i32) -> Result<()> {
    if width > 0 && height > 0 {
        Ok(())
    } else {
        Err(InvalidMdp::InvalidGridSize { width, height }.into())
    }
}

fn random_cell<R: Rng>(width: i32, height: i32, rng: &mut R) -> GridCoord {
    GridCoord::new(rng.gen_range(1..=width), rng.gen_range(1..=height))
}

impl Default for GridWorld {
    /// The 4 x 3 running example: goal in the north-east corner, start in
    /// the south-west corner, one blocked cell in the middle.
    fn default() -> Self {
        GridWorld::new(4, 3, GridCoord::new(4, 3))
            .with_initial(GridCoord::new(1, 1))
            .with_blocked([GridCoord::new(2, 2)])
    }
}
