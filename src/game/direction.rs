use std::fmt;

/// A cell on the playing field.  Coordinates are signed so that positions just
/// outside the field can be represented; whether a position is legal is up to
/// the [`Field`][super::field::Field].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct Position {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Position {
    pub(crate) const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the position one cell away from `pos` in this direction
    pub(crate) fn step(self, pos: Position) -> Position {
        let Position { x, y } = pos;
        match self {
            Direction::Up => Position::new(x, y - 1),
            Direction::Down => Position::new(x, y + 1),
            Direction::Left => Position::new(x - 1, y),
            Direction::Right => Position::new(x + 1, y),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Position::new(2, 7), Position::new(2, 6))]
    #[case(Direction::Down, Position::new(2, 7), Position::new(2, 8))]
    #[case(Direction::Left, Position::new(2, 7), Position::new(1, 7))]
    #[case(Direction::Right, Position::new(2, 7), Position::new(3, 7))]
    #[case(Direction::Up, Position::new(2, 0), Position::new(2, -1))]
    #[case(Direction::Left, Position::new(0, 7), Position::new(-1, 7))]
    fn test_direction_step(#[case] d: Direction, #[case] pos: Position, #[case] r: Position) {
        assert_eq!(d.step(pos), r);
    }

    #[rstest]
    #[case(Direction::Up, Direction::Down)]
    #[case(Direction::Down, Direction::Up)]
    #[case(Direction::Left, Direction::Right)]
    #[case(Direction::Right, Direction::Left)]
    fn test_reverse(#[case] d: Direction, #[case] r: Direction) {
        assert_eq!(d.reverse(), r);
        assert_eq!(d.reverse().reverse(), d);
    }
}
