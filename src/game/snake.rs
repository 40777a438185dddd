use super::direction::{Direction, Position};
use crate::consts;
use std::collections::{HashSet, VecDeque};

/// A snake on (or partly off) the field
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The cells occupied by the snake, head first.  Never empty.
    pub(super) segments: VecDeque<Position>,
}

impl Snake {
    /// Create a snake of `length` cells (at least one) lying horizontally
    /// with its head at `head` and its body extending to the left.  Segments
    /// that would lie past the left edge of the field are kept anyway; they
    /// are never drawn and are dropped from the tail as the snake advances.
    pub(super) fn new(head: Position, length: u32) -> Snake {
        let segments = (0..length.max(1))
            .map(|i| Position::new(head.x.saturating_sub_unsigned(i), head.y))
            .collect();
        Snake { segments }
    }

    pub(crate) fn head(&self) -> Position {
        self.segments.front().copied().unwrap_or_default()
    }

    /// Return all segments after the head
    pub(crate) fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments.iter().skip(1).copied()
    }

    #[cfg(test)]
    pub(crate) fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub(crate) fn len(&self) -> u32 {
        u32::try_from(self.segments.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Return the set of cells occupied by the snake
    pub(super) fn cells(&self) -> HashSet<Position> {
        self.segments.iter().copied().collect()
    }

    /// Return `true` if the head shares a cell with any other segment
    pub(super) fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body().any(|p| p == head)
    }

    /// Add a new head one cell away from the current head in `direction` and
    /// return its position.  The tail is left in place; call
    /// [`Snake::drop_tail()`] unless the snake is growing.
    pub(super) fn push_head(&mut self, direction: Direction) -> Position {
        let head = direction.step(self.head());
        self.segments.push_front(head);
        head
    }

    pub(super) fn drop_tail(&mut self) {
        if self.segments.len() > 1 {
            let _ = self.segments.pop_back();
        }
    }
}

/// Return the glyph to use for drawing the head of a snake moving in
/// `direction`
pub(crate) fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_horizontal() {
        let snake = Snake::new(Position::new(10, 10), 3);
        assert_eq!(
            snake.segments,
            [
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(10, 10));
    }

    #[test]
    fn new_past_left_edge() {
        let snake = Snake::new(Position::new(1, 4), 4);
        assert_eq!(
            snake.segments,
            [
                Position::new(1, 4),
                Position::new(0, 4),
                Position::new(-1, 4),
                Position::new(-2, 4)
            ]
        );
    }

    #[test]
    fn off_field_tail_is_dropped() {
        let mut snake = Snake::new(Position::new(1, 4), 4);
        snake.push_head(Direction::Right);
        snake.drop_tail();
        snake.push_head(Direction::Right);
        snake.drop_tail();
        assert_eq!(
            snake.segments,
            [
                Position::new(3, 4),
                Position::new(2, 4),
                Position::new(1, 4),
                Position::new(0, 4)
            ]
        );
        assert_eq!(
            snake.cells(),
            HashSet::from([
                Position::new(3, 4),
                Position::new(2, 4),
                Position::new(1, 4),
                Position::new(0, 4)
            ])
        );
    }

    #[test]
    fn new_never_empty() {
        let snake = Snake::new(Position::new(5, 5), 0);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn move_and_grow() {
        let mut snake = Snake::new(Position::new(10, 10), 3);
        assert_eq!(snake.push_head(Direction::Up), Position::new(10, 9));
        snake.drop_tail();
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.push_head(Direction::Right), Position::new(11, 9));
        assert_eq!(snake.len(), 4);
        assert_eq!(
            snake.body().collect::<Vec<_>>(),
            [
                Position::new(10, 9),
                Position::new(10, 10),
                Position::new(9, 10)
            ]
        );
        assert!(!snake.bites_itself());
    }

    #[test]
    fn bite() {
        let mut snake = Snake::new(Position::new(10, 10), 5);
        snake.push_head(Direction::Up);
        snake.drop_tail();
        snake.push_head(Direction::Left);
        snake.drop_tail();
        snake.push_head(Direction::Down);
        snake.drop_tail();
        assert_eq!(snake.head(), Position::new(9, 10));
        assert!(snake.bites_itself());
    }

    #[test]
    fn tail_chasing_is_not_a_bite() {
        // A 2x2 loop: the head moves into the cell the tail is leaving.
        let mut snake = Snake::new(Position::new(10, 10), 4);
        snake.push_head(Direction::Up);
        snake.drop_tail();
        snake.push_head(Direction::Left);
        snake.drop_tail();
        snake.push_head(Direction::Down);
        snake.drop_tail();
        assert_eq!(snake.head(), Position::new(9, 10));
        assert!(!snake.bites_itself());
    }
}
