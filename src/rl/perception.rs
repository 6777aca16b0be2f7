//! Perception: turns the snake's vision into a compact, hashable state
//!
//! For every direction the visible cells are scanned nearest-first and the
//! first cell that qualifies sets exactly one bit:
//!
//! - danger: a wall or body cell within [`DANGER_SCAN_DEPTH`] cells
//! - green: a green apple within [`GREEN_SCAN_DEPTH`] cells
//! - red: a red apple within [`RED_SCAN_DEPTH`] cells
//!
//! Checks run in that order at each position. Anything past the first
//! qualifying cell is invisible to the agent.

use std::fmt;

use crate::game::{Cell, Direction, Vision};

/// How far a wall or body cell still counts as danger
pub const DANGER_SCAN_DEPTH: usize = 2;
/// How far a green apple is noticed
pub const GREEN_SCAN_DEPTH: usize = usize::MAX;
/// How far a red apple is noticed
pub const RED_SCAN_DEPTH: usize = 2;

/// Number of bits in a [`State`]
pub const STATE_LEN: usize = 12;

/// The 12-bit perception vector: danger[4], green[4], red[4]
///
/// Each group is indexed by [`Direction::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct State([bool; STATE_LEN]);

impl State {
    pub fn new(bits: [bool; STATE_LEN]) -> Self {
        Self(bits)
    }

    pub fn from_parts(danger: [bool; 4], green: [bool; 4], red: [bool; 4]) -> Self {
        let mut bits = [false; STATE_LEN];
        bits[..4].copy_from_slice(&danger);
        bits[4..8].copy_from_slice(&green);
        bits[8..].copy_from_slice(&red);
        Self(bits)
    }

    pub fn bits(&self) -> &[bool; STATE_LEN] {
        &self.0
    }

    pub fn danger(&self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub fn green(&self, direction: Direction) -> bool {
        self.0[4 + direction.index()]
    }

    pub fn red(&self, direction: Direction) -> bool {
        self.0[8 + direction.index()]
    }

    pub fn danger_bits(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.danger(d))
    }

    pub fn green_bits(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.green(d))
    }

    pub fn red_bits(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.red(d))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: Vec<&str> = self
            .0
            .iter()
            .map(|b| if *b { "1" } else { "0" })
            .collect();
        write!(f, "({})", bits.join(", "))
    }
}

/// What a single direction's scan found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sighting {
    Danger,
    Green,
    Red,
    Nothing,
}

fn classify(ray: &[Cell]) -> Sighting {
    if ray.is_empty() {
        return Sighting::Danger;
    }

    for (distance, cell) in ray.iter().enumerate() {
        match cell {
            Cell::Wall | Cell::SnakeBody if distance < DANGER_SCAN_DEPTH => {
                return Sighting::Danger;
            }
            Cell::GreenApple if distance < GREEN_SCAN_DEPTH => return Sighting::Green,
            Cell::RedApple if distance < RED_SCAN_DEPTH => return Sighting::Red,
            Cell::Wall
            | Cell::SnakeBody
            | Cell::GreenApple
            | Cell::RedApple
            | Cell::SnakeHead
            | Cell::Empty => {}
        }
    }

    Sighting::Nothing
}

/// Encode a vision into the agent's state
pub fn encode(vision: &Vision) -> State {
    let mut danger = [false; 4];
    let mut green = [false; 4];
    let mut red = [false; 4];

    for direction in Direction::ALL {
        let i = direction.index();
        match classify(vision.ray(direction)) {
            Sighting::Danger => danger[i] = true,
            Sighting::Green => green[i] = true,
            Sighting::Red => red[i] = true,
            Sighting::Nothing => {}
        }
    }

    State::from_parts(danger, green, red)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Apple, AppleColor, Board, Position, Snake};

    fn clear_ray() -> Vec<Cell> {
        vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Wall]
    }

    #[test]
    fn test_wall_two_cells_up() {
        let vision = Vision::new(
            vec![Cell::Empty, Cell::Wall],
            clear_ray(),
            clear_ray(),
            clear_ray(),
        );
        let state = encode(&vision);

        assert_eq!(state.danger_bits(), [true, false, false, false]);
        assert_eq!(state.green_bits(), [false; 4]);
        assert_eq!(state.red_bits(), [false; 4]);
    }

    #[test]
    fn test_board_scenario_head_near_top() {
        // Head at (5, 1) facing up: the synthesized wall is two cells away
        let snake = Snake::new(
            vec![Position::new(5, 1), Position::new(5, 2), Position::new(5, 3)],
            Direction::Up,
        );
        let board = Board::from_parts(10, snake, Vec::new(), 0);
        let state = encode(&board.vision());

        // Down sees the body immediately
        assert_eq!(state.danger_bits(), [true, true, false, false]);
    }

    #[test]
    fn test_far_wall_is_not_danger() {
        let vision = Vision::new(clear_ray(), clear_ray(), clear_ray(), clear_ray());
        assert_eq!(encode(&vision), State::default());
    }

    #[test]
    fn test_empty_ray_is_danger() {
        let vision = Vision::new(vec![], clear_ray(), clear_ray(), clear_ray());
        assert!(encode(&vision).danger(Direction::Up));
    }

    #[test]
    fn test_green_seen_at_any_distance() {
        let mut ray = vec![Cell::Empty; 8];
        ray.push(Cell::GreenApple);
        ray.push(Cell::Wall);
        let vision = Vision::new(clear_ray(), clear_ray(), clear_ray(), ray);
        let state = encode(&vision);

        assert!(state.green(Direction::Right));
        assert!(!state.danger(Direction::Right));
    }

    #[test]
    fn test_red_only_seen_up_close() {
        let near = vec![Cell::Empty, Cell::RedApple, Cell::Wall];
        let far = vec![Cell::Empty, Cell::Empty, Cell::RedApple, Cell::Wall];
        let vision = Vision::new(near, far, clear_ray(), clear_ray());
        let state = encode(&vision);

        assert!(state.red(Direction::Up));
        assert!(!state.red(Direction::Down));
    }

    #[test]
    fn test_first_match_wins() {
        // Red apple right next to the head hides the green one behind it
        let ray = vec![Cell::RedApple, Cell::GreenApple, Cell::Wall];
        let vision = Vision::new(ray, clear_ray(), clear_ray(), clear_ray());
        let state = encode(&vision);
        assert!(state.red(Direction::Up));
        assert!(!state.green(Direction::Up));

        // Green apple before a close body segment
        let ray = vec![Cell::GreenApple, Cell::SnakeBody];
        let vision = Vision::new(clear_ray(), ray, clear_ray(), clear_ray());
        let state = encode(&vision);
        assert!(state.green(Direction::Down));
        assert!(!state.danger(Direction::Down));

        // Close body before a green apple
        let ray = vec![Cell::Empty, Cell::SnakeBody];
        let vision = Vision::new(clear_ray(), clear_ray(), ray, clear_ray());
        assert!(encode(&vision).danger(Direction::Left));
    }

    #[test]
    fn test_exactly_one_bit_per_direction_at_most() {
        for seed in 0..30 {
            let mut board = Board::with_seed(6, seed).unwrap();
            board.place_apples().unwrap();
            let state = encode(&board.vision());

            for direction in Direction::ALL {
                let set = [
                    state.danger(direction),
                    state.green(direction),
                    state.red(direction),
                ]
                .iter()
                .filter(|b| **b)
                .count();
                assert!(set <= 1);
            }
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let snake = Snake::straight(Position::new(3, 3), Direction::Right, 3);
        let apples = vec![
            Apple::new(AppleColor::Green, Position::new(6, 3)),
            Apple::new(AppleColor::Green, Position::new(3, 0)),
            Apple::new(AppleColor::Red, Position::new(3, 4)),
        ];
        let board = Board::from_parts(8, snake, apples, 0);
        let vision = board.vision();

        let first = encode(&vision);
        for _ in 0..10 {
            assert_eq!(encode(&vision), first);
        }
        assert_eq!(first.green_bits(), [true, false, false, true]);
        assert_eq!(first.red_bits(), [false, true, false, false]);
        assert_eq!(first.danger_bits(), [false, false, true, false]);
    }

    #[test]
    fn test_state_display() {
        let state = State::from_parts([true, false, false, false], [false; 4], [false; 4]);
        assert_eq!(state.to_string(), "(1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0)");
    }
}
