use super::direction::Position;
use crate::consts;
use enum_map::Enum;
use rand::Rng;
use std::fmt;

/// The kinds of timed pickups
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum BonusType {
    /// Shortens the tick period
    SpeedUp,
    /// Lengthens the tick period
    SlowDown,
    /// Awards extra points
    ExtraPoints,
}

impl BonusType {
    /// Pick a bonus type uniformly at random
    pub(super) fn random<R: Rng>(rng: &mut R) -> BonusType {
        BonusType::from_usize(rng.random_range(0..BonusType::LENGTH))
    }

    pub(crate) fn symbol(self) -> char {
        match self {
            BonusType::SpeedUp => consts::SPEED_UP_SYMBOL,
            BonusType::SlowDown => consts::SLOW_DOWN_SYMBOL,
            BonusType::ExtraPoints => consts::EXTRA_POINTS_SYMBOL,
        }
    }
}

impl fmt::Display for BonusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BonusType::SpeedUp => "Speed up",
            BonusType::SlowDown => "Slow down",
            BonusType::ExtraPoints => "Extra points",
        };
        f.pad(name)
    }
}

/// A bonus lying on the field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bonus {
    pub(crate) kind: BonusType,
    pub(crate) position: Position,
    /// Number of ticks before the bonus disappears
    pub(crate) ticks_left: u32,
}

/// The single bonus slot of a session: either a bonus is on the field, or the
/// game is counting down until one may appear
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BonusSlot {
    Cooldown(u32),
    Active(Bonus),
}

impl BonusSlot {
    /// An empty slot with a freshly randomized cooldown
    pub(super) fn cooldown<R: Rng>(rng: &mut R) -> BonusSlot {
        BonusSlot::Cooldown(random_bonus_ticks(rng))
    }

    pub(crate) fn active(&self) -> Option<&Bonus> {
        match self {
            BonusSlot::Active(bonus) => Some(bonus),
            BonusSlot::Cooldown(_) => None,
        }
    }

    pub(crate) fn occupies(&self, pos: Position) -> bool {
        self.active().is_some_and(|b| b.position == pos)
    }
}

/// Pick a bonus cooldown or lifetime
pub(super) fn random_bonus_ticks<R: Rng>(rng: &mut R) -> u32 {
    rng.random_range(consts::BONUS_TICKS_MIN..consts::BONUS_TICKS_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn cooldown_in_range() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF);
        for _ in 0..200 {
            let BonusSlot::Cooldown(ticks) = BonusSlot::cooldown(&mut rng) else {
                panic!("fresh slot should be cooling down");
            };
            assert!((50..100).contains(&ticks));
        }
    }

    #[test]
    fn all_types_are_picked() {
        let mut rng = ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF);
        let mut seen = enum_map::EnumMap::<BonusType, bool>::default();
        for _ in 0..100 {
            seen[BonusType::random(&mut rng)] = true;
        }
        assert!(seen.values().all(|&b| b));
    }

    #[test]
    fn occupies() {
        let slot = BonusSlot::Active(Bonus {
            kind: BonusType::SlowDown,
            position: Position::new(3, 4),
            ticks_left: 10,
        });
        assert!(slot.occupies(Position::new(3, 4)));
        assert!(!slot.occupies(Position::new(4, 3)));
        assert!(!BonusSlot::Cooldown(0).occupies(Position::new(3, 4)));
    }
}
