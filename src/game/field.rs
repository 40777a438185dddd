use super::direction::Position;
use crate::consts;
use rand::Rng;
use std::collections::HashSet;

/// The square playing field.  Legal positions are those in `[0, width) ×
/// [0, height)`.  A field only ever grows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Field {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Field {
    pub(crate) fn square(size: u16) -> Field {
        Field {
            width: size,
            height: size,
        }
    }

    pub(crate) fn contains(self, pos: Position) -> bool {
        (0..i32::from(self.width)).contains(&pos.x) && (0..i32::from(self.height)).contains(&pos.y)
    }

    /// The cell at which a fresh snake's head is placed
    pub(crate) fn center(self) -> Position {
        Position::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }

    /// Number of cells in the field
    pub(crate) fn area(self) -> u32 {
        u32::from(self.width) * u32::from(self.height)
    }

    /// Iterate over every cell of the field, row by row
    pub(crate) fn positions(self) -> impl Iterator<Item = Position> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    pub(super) fn grow(&mut self, by: u16) {
        self.width = self.width.saturating_add(by);
        self.height = self.height.saturating_add(by);
    }

    /// Randomly place up to `count` walls in the interior of the field (i.e.,
    /// not on the outermost ring of cells), avoiding `safe_zone`, cells for
    /// which `occupied` returns `true`, and each other.
    ///
    /// Each wall gets [`WALL_PLACEMENT_ATTEMPTS`][consts::WALL_PLACEMENT_ATTEMPTS]
    /// random draws to land on a suitable cell; a wall that fails to do so is
    /// left out, so fewer than `count` walls may be returned.
    pub(super) fn generate_walls<R: Rng, F: Fn(Position) -> bool>(
        self,
        rng: &mut R,
        count: u32,
        safe_zone: SafeZone,
        occupied: F,
    ) -> HashSet<Position> {
        let mut walls = HashSet::new();
        if self.width < 3 || self.height < 3 {
            return walls;
        }
        let xs = 1..(i32::from(self.width) - 1);
        let ys = 1..(i32::from(self.height) - 1);
        for _ in 0..count {
            let found = (0..consts::WALL_PLACEMENT_ATTEMPTS)
                .map(|_| Position::new(rng.random_range(xs.clone()), rng.random_range(ys.clone())))
                .find(|&p| !safe_zone.contains(p) && !occupied(p) && !walls.contains(&p));
            if let Some(p) = found {
                walls.insert(p);
            }
        }
        walls
    }
}

/// A square region around a point in which no walls may be placed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SafeZone {
    pub(crate) center: Position,
    pub(crate) radius: i32,
}

impl SafeZone {
    pub(crate) fn contains(self, pos: Position) -> bool {
        (pos.x - self.center.x).abs() <= self.radius && (pos.y - self.center.y).abs() <= self.radius
    }
}

/// How the field's size depends on the level
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Growth {
    /// Two cells wider & taller every level
    Classic,
    /// One cell wider & taller every level
    Survival,
    /// Two cells wider & taller every second level
    Hardcore,
}

impl Growth {
    /// Width & height of a field for a session starting on `level`
    pub(crate) fn initial_size(self, level: u32) -> u16 {
        let completed = level.saturating_sub(1);
        let extra = match self {
            Growth::Classic => completed.saturating_mul(2),
            Growth::Survival => completed,
            Growth::Hardcore => (completed / 2).saturating_mul(2),
        };
        consts::BASE_FIELD_SIZE.saturating_add(u16::try_from(extra).unwrap_or(u16::MAX))
    }

    /// How much the field grows on reaching `level` mid-session
    pub(crate) fn on_reaching(self, level: u32) -> u16 {
        match self {
            Growth::Classic => 2,
            Growth::Survival => 1,
            Growth::Hardcore if level % 2 == 1 => 2,
            Growth::Hardcore => 0,
        }
    }
}

/// Number of walls to place on `level`
pub(crate) fn wall_count(level: u32, hardcore: bool) -> u32 {
    if hardcore {
        consts::HARDCORE_WALLS
    } else {
        let extra = (consts::MAX_WALLS - consts::MIN_WALLS).saturating_mul(level.saturating_sub(1)) / 10;
        consts::MIN_WALLS.saturating_add(extra).min(consts::MAX_WALLS)
    }
}

/// Number of food items to keep on the field on `level`
pub(crate) fn food_count(level: u32) -> usize {
    let qty = (1 + level / 3).min(consts::MAX_FOOD);
    usize::try_from(qty).unwrap_or(usize::MAX)
}
