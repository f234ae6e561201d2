use std::fmt::Write;

use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumCount, FromRepr};
use thiserror::Error;

use crate::{
    env::{Environment, KnownDynamics},
    error::ModelError,
    model::{Outcome, TransitionModel},
};

/// The classic 4x4 lake
pub const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

/// The classic 8x8 lake
pub const MAP_8X8: [&str; 8] = [
    "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
    "FFFHFFFG",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Square {
    Frozen,
    Hole,
    Start,
    Goal,
}

impl Square {
    fn parse(c: char) -> Option<Self> {
        match c {
            'F' => Some(Self::Frozen),
            'H' => Some(Self::Hole),
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::Frozen => 'F',
            Self::Hole => 'H',
            Self::Start => 'S',
            Self::Goal => 'G',
        }
    }

    /// Holes and the goal end the episode
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Hole | Self::Goal)
    }
}

#[derive(FromRepr, EnumCount, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FLAction {
    Left = 0,
    Down = 1,
    Right = 2,
    Up = 3,
}

impl From<usize> for FLAction {
    fn from(value: usize) -> Self {
        Self::from_repr(value).expect("FLAction::from is only called with valid values [0, 3]")
    }
}

/// Reasons a custom map is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no squares")]
    Empty,
    #[error("row {row} has {actual} squares, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown square {0:?}, expected one of S, F, H, G")]
    UnknownSquare(char),
    #[error("map needs exactly one start square, found {0}")]
    Start(usize),
}

/// Configuration for a [`FrozenLake`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrozenLakeConfig {
    /// On slippery ice the agent moves in the intended direction, or in one of the two
    /// perpendicular directions, with probability 1/3 each
    ///
    /// **Default**: `false`
    pub slippery: bool,
    /// Seed for the slippery dynamics, drawn from entropy when `None`
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

/// A grid world taken from Python [gymnasium](https://gymnasium.farama.org/)
///
/// The agent walks from the start square to the goal without falling into a hole.
/// Entering the goal pays `1.0`, every other move pays nothing. Moving into the
/// edge of the map leaves the agent where it is.
///
/// Since the full dynamics are known, the lake doubles as a [`KnownDynamics`] model
/// adapter whose states are the row-major square indices.
pub struct FrozenLake {
    map: Vec<Square>,
    ncol: usize,
    start: usize,
    pos: usize,
    slippery: bool,
    last_action: Option<FLAction>,
    rng: StdRng,
}

impl FrozenLake {
    /// The deterministic 4x4 lake
    pub fn new() -> Self {
        Self::deterministic_4x4()
    }

    pub fn deterministic_4x4() -> Self {
        Self::built_in(&MAP_4X4, false)
    }

    pub fn stochastic_4x4() -> Self {
        Self::built_in(&MAP_4X4, true)
    }

    pub fn deterministic_8x8() -> Self {
        Self::built_in(&MAP_8X8, false)
    }

    pub fn stochastic_8x8() -> Self {
        Self::built_in(&MAP_8X8, true)
    }

    fn built_in(rows: &[&str], slippery: bool) -> Self {
        let config = FrozenLakeConfig {
            slippery,
            ..Default::default()
        };
        Self::from_map(rows, config).expect("built-in maps are valid")
    }

    /// Build a lake from rows of `S` (start), `F` (frozen), `H` (hole) and `G` (goal)
    pub fn from_map(rows: &[&str], config: FrozenLakeConfig) -> Result<Self, MapError> {
        let ncol = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if ncol == 0 {
            return Err(MapError::Empty);
        }

        let mut map = Vec::with_capacity(rows.len() * ncol);
        for (i, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != ncol {
                return Err(MapError::Ragged {
                    row: i,
                    expected: ncol,
                    actual,
                });
            }
            for c in row.chars() {
                map.push(Square::parse(c).ok_or(MapError::UnknownSquare(c))?);
            }
        }

        let starts = map.iter().filter(|&&sq| sq == Square::Start).count();
        let start = match map.iter().position(|&sq| sq == Square::Start) {
            Some(start) if starts == 1 => start,
            _ => return Err(MapError::Start(starts)),
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            map,
            ncol,
            start,
            pos: start,
            slippery: config.slippery,
            last_action: None,
            rng,
        })
    }

    /// Number of squares on the map
    pub fn n_states(&self) -> usize {
        self.map.len()
    }

    /// Current square index
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn square(&self, state: usize) -> Square {
        self.map[state]
    }

    pub fn is_slippery(&self) -> bool {
        self.slippery
    }

    /// Square reached by moving in direction `action` from `pos`
    fn moved(&self, pos: usize, action: FLAction) -> usize {
        let nrow = self.map.len() / self.ncol;
        let (row, col) = (pos / self.ncol, pos % self.ncol);
        let (row, col) = match action {
            FLAction::Left => (row, col.saturating_sub(1)),
            FLAction::Down => ((row + 1).min(nrow - 1), col),
            FLAction::Right => (row, (col + 1).min(self.ncol - 1)),
            FLAction::Up => (row.saturating_sub(1), col),
        };
        row * self.ncol + col
    }

    /// Directions the agent may actually move in when it intends `action`
    fn directions(&self, action: FLAction) -> Vec<FLAction> {
        if self.slippery {
            let a = action as usize;
            [(a + 3) % 4, a, (a + 1) % 4]
                .into_iter()
                .map(FLAction::from)
                .collect()
        } else {
            vec![action]
        }
    }

    fn outcome(&self, pos: usize, direction: FLAction, prob: f64) -> Outcome {
        let next = self.moved(pos, direction);
        let square = self.map[next];
        let reward = if square == Square::Goal { 1.0 } else { 0.0 };
        Outcome::new(prob, next, reward, square.is_terminal())
    }
}

impl Default for FrozenLake {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for FrozenLake {
    type State = usize;
    type Action = FLAction;

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f64) {
        let directions = self.directions(action);
        let direction = directions[self.rng.gen_range(0..directions.len())];
        let outcome = self.outcome(self.pos, direction, 1.0);

        self.pos = outcome.next_state;
        self.last_action = Some(action);

        let next_state = (!outcome.terminal).then_some(self.pos);
        (next_state, outcome.reward)
    }

    fn reset(&mut self) -> Self::State {
        self.pos = self.start;
        self.last_action = None;
        self.pos
    }

    fn render(&self) -> Option<String> {
        let mut frame = String::new();
        if let Some(action) = self.last_action {
            let _ = writeln!(frame, "  ({:?})", action);
        }
        for (row, squares) in self.map.chunks(self.ncol).enumerate() {
            for (col, square) in squares.iter().enumerate() {
                if row * self.ncol + col == self.pos {
                    frame.push('@');
                } else {
                    frame.push(square.symbol());
                }
            }
            frame.push('\n');
        }
        Some(frame)
    }
}

impl KnownDynamics for FrozenLake {
    fn transition_model(&self) -> Result<TransitionModel, ModelError> {
        TransitionModel::from_fn(self.n_states(), FLAction::COUNT, |s, a| {
            if self.map[s].is_terminal() {
                return vec![Outcome::certain(s, 0.0, true)];
            }
            let directions = self.directions(FLAction::from(a));
            let prob = 1.0 / directions.len() as f64;
            directions
                .into_iter()
                .map(|direction| self.outcome(s, direction, prob))
                .collect()
        })
    }
}
