use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    action::Direction,
    error::{GameError, Result},
    state::{Apple, AppleColor, Cell, Grid, Position, Snake, Vision},
};

/// Length of a freshly spawned snake
pub const INITIAL_SNAKE_LENGTH: usize = 3;
/// Green apples on the board at all times
pub const GREEN_APPLE_COUNT: usize = 2;
/// Red apples on the board at all times
pub const RED_APPLE_COUNT: usize = 1;

/// Attempt budget for one rejection-sampling placement
fn placement_attempts(size: usize) -> usize {
    (size * size * 100).max(1000)
}

/// The world: snake, apples and the grid derived from them
pub struct Board {
    size: usize,
    grid: Grid,
    snake: Snake,
    apples: Vec<Apple>,
    rng: StdRng,
}

impl Board {
    /// Create a board with a randomly placed snake and no apples yet
    pub fn new(size: usize, mut rng: StdRng) -> Result<Self> {
        let snake = random_snake(size, &mut rng)?;
        let mut board = Self {
            size,
            grid: Grid::new(size),
            snake,
            apples: Vec::new(),
            rng,
        };
        board.update_grid();
        Ok(board)
    }

    /// Create a board seeded from entropy
    pub fn from_entropy(size: usize) -> Result<Self> {
        Self::new(size, StdRng::from_entropy())
    }

    /// Create a board with a deterministic seed
    pub fn with_seed(size: usize, seed: u64) -> Result<Self> {
        Self::new(size, StdRng::seed_from_u64(seed))
    }

    /// Assemble a board from an explicit layout
    pub fn from_parts(size: usize, snake: Snake, apples: Vec<Apple>, seed: u64) -> Self {
        let mut board = Self {
            size,
            grid: Grid::new(size),
            snake,
            apples,
            rng: StdRng::seed_from_u64(seed),
        };
        board.update_grid();
        board
    }

    /// Re-roll the snake at a random position
    pub fn initialize_snake(&mut self) -> Result<()> {
        self.snake = random_snake(self.size, &mut self.rng)?;
        self.update_grid();
        Ok(())
    }

    /// Replace all apples with two green and one red on empty cells
    pub fn place_apples(&mut self) -> Result<()> {
        self.apples.clear();
        self.update_grid();

        for _ in 0..GREEN_APPLE_COUNT {
            self.place_apple(AppleColor::Green)?;
        }
        for _ in 0..RED_APPLE_COUNT {
            self.place_apple(AppleColor::Red)?;
        }

        Ok(())
    }

    /// Move the snake one cell; fails if the head would leave the board
    pub fn move_snake(&mut self, direction: Direction) -> Result<()> {
        self.snake.advance(direction, self.size)
    }

    /// Eat the apple under the head, if any, and replace it elsewhere
    ///
    /// Only the first apple in insertion order is considered.
    pub fn resolve_collisions(&mut self) -> Result<Option<AppleColor>> {
        let head = self.snake.head();
        let Some(idx) = self.apples.iter().position(|a| a.position == head) else {
            return Ok(None);
        };

        let eaten = self.apples.remove(idx);
        match eaten.color {
            AppleColor::Green => self.snake.grow(),
            AppleColor::Red => self.snake.shrink(),
        }

        self.update_grid();
        self.place_apple(eaten.color)?;

        Ok(Some(eaten.color))
    }

    /// Self-collision or no body left
    pub fn is_terminal(&self) -> bool {
        self.snake.is_empty() || self.snake.collides_with_self()
    }

    /// Rebuild the grid from the snake and apples
    pub fn update_grid(&mut self) {
        self.grid.clear();

        for apple in &self.apples {
            self.grid.set(apple.position, apple.color.cell());
        }
        for &segment in self.snake.body_segments() {
            self.grid.set(segment, Cell::SnakeBody);
        }
        if !self.snake.is_empty() {
            self.grid.set(self.snake.head(), Cell::SnakeHead);
        }
    }

    /// Cells visible from the head in each direction
    ///
    /// Each ray stops after the first wall or body cell; a ray that runs off
    /// the board ends with a synthesized wall.
    pub fn vision(&self) -> Vision {
        let mut vision = Vision::default();
        if self.snake.is_empty() {
            return vision;
        }

        let head = self.snake.head();
        for direction in Direction::ALL {
            let mut ray = Vec::new();
            let mut pos = head.moved_in_direction(direction);
            let mut blocked = false;

            while let Some(cell) = self.grid.get(pos) {
                ray.push(cell);
                if cell.blocks_sight() {
                    blocked = true;
                    break;
                }
                pos = pos.moved_in_direction(direction);
            }
            if !blocked {
                ray.push(Cell::Wall);
            }

            vision.set_ray(direction, ray);
        }

        vision
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apples(&self) -> &[Apple] {
        &self.apples
    }

    /// Place one apple on a currently empty cell
    fn place_apple(&mut self, color: AppleColor) -> Result<()> {
        let attempts = placement_attempts(self.size);
        if self.size > 0 {
            for _ in 0..attempts {
                let pos = random_position(self.size, &mut self.rng);
                if self.grid.get(pos) == Some(Cell::Empty) {
                    self.apples.push(Apple::new(color, pos));
                    self.grid.set(pos, color.cell());
                    return Ok(());
                }
            }
        }

        Err(GameError::PlacementInfeasible {
            what: match color {
                AppleColor::Green => "green apple",
                AppleColor::Red => "red apple",
            },
            attempts,
        })
    }
}

fn random_position(size: usize, rng: &mut StdRng) -> Position {
    Position::new(
        rng.gen_range(0..size) as i32,
        rng.gen_range(0..size) as i32,
    )
}

/// Random head plus a random in-bounds, non-overlapping walk for the body
fn random_snake(size: usize, rng: &mut StdRng) -> Result<Snake> {
    let attempts = placement_attempts(size);

    if size > 0 {
        'attempt: for _ in 0..attempts {
            let mut body = vec![random_position(size, rng)];

            while body.len() < INITIAL_SNAKE_LENGTH {
                let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                let next = body[body.len() - 1].moved_in_direction(direction);
                if !next.in_bounds(size) || body.contains(&next) {
                    continue 'attempt;
                }
                body.push(next);
            }

            let (dx, dy) = (body[0].x - body[1].x, body[0].y - body[1].y);
            let Some(facing) = Direction::from_delta(dx, dy) else {
                continue;
            };
            return Ok(Snake::new(body, facing));
        }
    }

    Err(GameError::PlacementInfeasible {
        what: "snake",
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple_counts(board: &Board) -> (usize, usize) {
        let green = board
            .apples()
            .iter()
            .filter(|a| a.color == AppleColor::Green)
            .count();
        (green, board.apples().len() - green)
    }

    #[test]
    fn test_initialize_snake_invariants() {
        for size in 3..12 {
            for seed in 0..50 {
                let board = Board::with_seed(size, seed).unwrap();
                let body = &board.snake().body;

                assert_eq!(body.len(), INITIAL_SNAKE_LENGTH);
                assert!(body.iter().all(|p| p.in_bounds(size)));
                assert!(body.windows(2).all(|w| w[0].is_adjacent(w[1])));
                assert_ne!(body[0], body[2]);

                let facing = board.snake().direction;
                assert_eq!(body[1].moved_in_direction(facing), body[0]);
            }
        }
    }

    #[test]
    fn test_initialize_snake_rerolls() {
        let mut board = Board::with_seed(10, 3).unwrap();
        board.initialize_snake().unwrap();
        assert_eq!(board.snake().len(), INITIAL_SNAKE_LENGTH);
        assert_eq!(board.grid().count(Cell::SnakeHead), 1);
        assert_eq!(board.grid().count(Cell::SnakeBody), 2);
    }

    #[test]
    fn test_snake_placement_infeasible() {
        assert!(matches!(
            Board::with_seed(1, 0),
            Err(GameError::PlacementInfeasible { what: "snake", .. })
        ));
        assert!(matches!(
            Board::with_seed(0, 0),
            Err(GameError::PlacementInfeasible { .. })
        ));
    }

    #[test]
    fn test_apple_placement_infeasible() {
        // 2x2 fits the snake but leaves a single free cell
        let mut board = Board::with_seed(2, 0).unwrap();
        let err = board.place_apples().unwrap_err();
        assert!(matches!(err, GameError::PlacementInfeasible { .. }));
    }

    #[test]
    fn test_place_apples_on_empty_cells() {
        for seed in 0..50 {
            let mut board = Board::with_seed(5, seed).unwrap();
            board.place_apples().unwrap();

            assert_eq!(apple_counts(&board), (GREEN_APPLE_COUNT, RED_APPLE_COUNT));
            for apple in board.apples() {
                assert!(!board.snake().body.contains(&apple.position));
            }
            let mut positions: Vec<_> = board.apples().iter().map(|a| a.position).collect();
            positions.sort_by_key(|p| (p.x, p.y));
            positions.dedup();
            assert_eq!(positions.len(), 3);

            assert_eq!(board.grid().count(Cell::GreenApple), 2);
            assert_eq!(board.grid().count(Cell::RedApple), 1);
        }
    }

    #[test]
    fn test_move_snake_out_of_bounds() {
        let snake = Snake::new(
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)],
            Direction::Up,
        );
        let mut board = Board::from_parts(10, snake, Vec::new(), 0);

        let err = board.move_snake(Direction::Up).unwrap_err();
        assert!(matches!(err, GameError::OutOfBounds { size: 10, .. }));
    }

    #[test]
    fn test_green_apple_grows_and_respawns() {
        let snake = Snake::straight(Position::new(5, 5), Direction::Right, 3);
        let apples = vec![
            Apple::new(AppleColor::Green, Position::new(6, 5)),
            Apple::new(AppleColor::Green, Position::new(0, 0)),
            Apple::new(AppleColor::Red, Position::new(9, 9)),
        ];
        let mut board = Board::from_parts(10, snake, apples, 1);

        board.move_snake(Direction::Right).unwrap();
        let eaten = board.resolve_collisions().unwrap();

        assert_eq!(eaten, Some(AppleColor::Green));
        assert_eq!(board.snake().len(), 4);
        assert_eq!(apple_counts(&board), (2, 1));
        assert!(board.apples().iter().all(|a| a.position != Position::new(6, 5)));
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_red_apple_shrinks_and_respawns() {
        let snake = Snake::straight(Position::new(5, 5), Direction::Right, 3);
        let apples = vec![
            Apple::new(AppleColor::Green, Position::new(0, 0)),
            Apple::new(AppleColor::Green, Position::new(0, 1)),
            Apple::new(AppleColor::Red, Position::new(6, 5)),
        ];
        let mut board = Board::from_parts(10, snake, apples, 2);

        board.move_snake(Direction::Right).unwrap();
        let eaten = board.resolve_collisions().unwrap();

        assert_eq!(eaten, Some(AppleColor::Red));
        assert_eq!(board.snake().len(), 2);
        assert_eq!(apple_counts(&board), (2, 1));
        // Insertion order: the replacement goes to the back
        assert_eq!(board.apples()[2].color, AppleColor::Red);
    }

    #[test]
    fn test_red_apple_at_length_one() {
        let snake = Snake::straight(Position::new(5, 5), Direction::Right, 1);
        let apples = vec![
            Apple::new(AppleColor::Green, Position::new(0, 0)),
            Apple::new(AppleColor::Green, Position::new(0, 1)),
            Apple::new(AppleColor::Red, Position::new(6, 5)),
        ];
        let mut board = Board::from_parts(10, snake, apples, 3);

        board.move_snake(Direction::Right).unwrap();
        board.resolve_collisions().unwrap();

        assert_eq!(board.snake().len(), 1);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_no_apple_no_change() {
        let snake = Snake::straight(Position::new(5, 5), Direction::Right, 3);
        let apples = vec![
            Apple::new(AppleColor::Green, Position::new(0, 0)),
            Apple::new(AppleColor::Green, Position::new(0, 1)),
            Apple::new(AppleColor::Red, Position::new(0, 2)),
        ];
        let mut board = Board::from_parts(10, snake, apples.clone(), 4);

        board.move_snake(Direction::Right).unwrap();
        assert_eq!(board.resolve_collisions().unwrap(), None);
        assert_eq!(board.apples(), apples.as_slice());
        assert_eq!(board.snake().len(), 3);
    }

    #[test]
    fn test_self_collision_is_terminal() {
        let snake = Snake::new(
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
                Position::new(4, 6),
            ],
            Direction::Left,
        );
        let mut board = Board::from_parts(10, snake, Vec::new(), 0);
        assert!(!board.is_terminal());

        // Turning down runs into the segment at (5, 6)
        board.move_snake(Direction::Down).unwrap();
        assert!(board.is_terminal());
    }

    #[test]
    fn test_vision_synthesizes_boundary_wall() {
        let snake = Snake::straight(Position::new(1, 1), Direction::Up, 1);
        let apples = vec![Apple::new(AppleColor::Green, Position::new(1, 3))];
        let board = Board::from_parts(4, snake, apples, 0);
        let vision = board.vision();

        assert_eq!(vision.ray(Direction::Up), &[Cell::Empty, Cell::Wall]);
        assert_eq!(
            vision.ray(Direction::Down),
            &[Cell::Empty, Cell::GreenApple, Cell::Wall]
        );
        assert_eq!(vision.ray(Direction::Left), &[Cell::Empty, Cell::Wall]);
        assert_eq!(
            vision.ray(Direction::Right),
            &[Cell::Empty, Cell::Empty, Cell::Wall]
        );
    }

    #[test]
    fn test_vision_stops_at_body() {
        let snake = Snake::new(
            vec![
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
            ],
            Direction::Up,
        );
        let board = Board::from_parts(6, snake, Vec::new(), 0);
        let vision = board.vision();

        assert_eq!(vision.ray(Direction::Down), &[Cell::SnakeBody]);
        assert_eq!(vision.ray(Direction::Right), &[Cell::SnakeBody]);
        assert_eq!(vision.ray_codes(Direction::Up), "00W");
    }

    #[test]
    fn test_head_on_edge_sees_only_wall() {
        let snake = Snake::straight(Position::new(0, 0), Direction::Up, 1);
        let board = Board::from_parts(5, snake, Vec::new(), 0);
        let vision = board.vision();

        assert_eq!(vision.ray(Direction::Up), &[Cell::Wall]);
        assert_eq!(vision.ray(Direction::Left), &[Cell::Wall]);
    }
}
