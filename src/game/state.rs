use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::{GameError, Result};

/// A position on the game grid; `y = 0` is the top row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn in_bounds(&self, size: usize) -> bool {
        let size = size as i32;
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }

    /// True if the two positions share an edge
    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current facing direction
    pub direction: Direction,
}

impl Snake {
    /// Create a snake from explicit segments, head first
    pub fn new(body: Vec<Position>, direction: Direction) -> Self {
        Self { body, direction }
    }

    /// Create a straight snake trailing behind `head`
    pub fn straight(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Option<Position> {
        self.body.last().copied()
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Head sits on another segment
    pub fn collides_with_self(&self) -> bool {
        !self.body.is_empty() && self.collides_with_body(self.head())
    }

    /// Step one cell in `direction` at constant length
    ///
    /// The facing direction is updated even when the move fails, so the
    /// snake is recorded as having attempted the move that killed it.
    pub fn advance(&mut self, direction: Direction, size: usize) -> Result<()> {
        self.direction = direction;
        let new_head = self.head().moved_in_direction(direction);
        if !new_head.in_bounds(size) {
            return Err(GameError::OutOfBounds {
                position: new_head,
                size,
            });
        }

        self.body.insert(0, new_head);
        self.body.pop();
        Ok(())
    }

    /// Lengthen by one; the new tail overlaps the old one until the next move
    pub fn grow(&mut self) {
        if let Some(tail) = self.tail() {
            self.body.push(tail);
        }
    }

    /// Shorten by one, never below a single segment
    pub fn shrink(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Apple colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppleColor {
    /// Grows the snake
    Green,
    /// Shrinks the snake
    Red,
}

impl AppleColor {
    pub fn cell(&self) -> Cell {
        match self {
            AppleColor::Green => Cell::GreenApple,
            AppleColor::Red => Cell::RedApple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppleColor::Green => "green",
            AppleColor::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apple {
    pub color: AppleColor,
    pub position: Position,
}

impl Apple {
    pub fn new(color: AppleColor, position: Position) -> Self {
        Self { color, position }
    }
}

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    SnakeBody,
    SnakeHead,
    GreenApple,
    RedApple,
    Wall,
}

impl Cell {
    /// One-character code shown in the raw vision panel
    pub fn code(&self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::SnakeBody => 'S',
            Cell::SnakeHead => 'H',
            Cell::GreenApple => 'G',
            Cell::RedApple => 'R',
            Cell::Wall => 'W',
        }
    }

    /// Cells that end a line of sight
    pub fn blocks_sight(&self) -> bool {
        matches!(self, Cell::Wall | Cell::SnakeBody)
    }
}

/// Square matrix of cell tags, derived from the snake and apples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at `pos`, or `None` outside the board
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        pos.in_bounds(self.size)
            .then(|| pos.y as usize * self.size + pos.x as usize)
    }
}

/// What the snake sees from its head in each of the four directions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vision {
    rays: [Vec<Cell>; 4],
}

impl Vision {
    pub fn new(up: Vec<Cell>, down: Vec<Cell>, left: Vec<Cell>, right: Vec<Cell>) -> Self {
        Self {
            rays: [up, down, left, right],
        }
    }

    /// Visible cells in `direction`, nearest first
    pub fn ray(&self, direction: Direction) -> &[Cell] {
        &self.rays[direction.index()]
    }

    pub(crate) fn set_ray(&mut self, direction: Direction, cells: Vec<Cell>) {
        self.rays[direction.index()] = cells;
    }

    /// Ray rendered as cell codes, e.g. `"00GS"`
    pub fn ray_codes(&self, direction: Direction) -> String {
        self.ray(direction).iter().map(Cell::code).collect()
    }
}
