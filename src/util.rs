use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// Extension methods for stepping through the variants of an [`Enum`]
pub(crate) trait EnumExt: Enum {
    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    /// Like [`EnumExt::next()`], but wrapping around to the first variant
    fn cycle_next(self) -> Self {
        self.next().unwrap_or_else(Self::min)
    }

    /// Like [`EnumExt::prev()`], but wrapping around to the last variant
    fn cycle_prev(self) -> Self {
        self.prev().unwrap_or_else(Self::max)
    }
}

impl<T: Enum> EnumExt for T {}

/// Return a `Rect` of the given size centered within `area`, shrunk to fit if
/// `area` is too small
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameMode;
    use rstest::rstest;

    #[test]
    fn enum_iter() {
        assert_eq!(
            GameMode::iter().collect::<Vec<_>>(),
            [GameMode::Classic, GameMode::Survival, GameMode::Hardcore]
        );
    }

    #[rstest]
    #[case(GameMode::Classic, GameMode::Survival, GameMode::Hardcore)]
    #[case(GameMode::Survival, GameMode::Hardcore, GameMode::Classic)]
    #[case(GameMode::Hardcore, GameMode::Classic, GameMode::Survival)]
    fn test_cycle(#[case] mode: GameMode, #[case] next: GameMode, #[case] prev: GameMode) {
        assert_eq!(mode.cycle_next(), next);
        assert_eq!(mode.cycle_prev(), prev);
    }

    #[rstest]
    #[case(Rect::new(0, 0, 80, 24), Size::new(22, 22), Rect::new(29, 1, 22, 22))]
    #[case(Rect::new(10, 5, 10, 10), Size::new(4, 2), Rect::new(13, 9, 4, 2))]
    fn test_center_rect(#[case] area: Rect, #[case] size: Size, #[case] r: Rect) {
        assert_eq!(center_rect(area, size), r);
    }
}
