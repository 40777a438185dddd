use crate::app::Action;
use crate::command::Command;
use crate::consts;
use crate::game::{GameMode, Settings};
use crate::progress::{FileStorage, ProgressStore, Storage};
use crate::util::EnumExt;
use crossterm::event::{read, Event};
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
    Frame,
};

/// The main menu: choose a mode, starting level & walls, and see the saved
/// progress
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MainMenu<S = FileStorage> {
    store: ProgressStore<S>,
    selection: Selection,
    mode: GameMode,
    level: u32,
    walls: bool,
}

impl<S: Storage> MainMenu<S> {
    /// Create a menu with its choices initialized from `defaults`.  The
    /// progress record is reloaded so that the menu reflects what was saved
    /// during the last game.
    pub(crate) fn new(mut store: ProgressStore<S>, defaults: Settings) -> Self {
        store.load();
        let level = defaults.start_level.clamp(1, store.max_unlocked_level());
        MainMenu {
            store,
            selection: Selection::default(),
            mode: defaults.mode,
            level,
            walls: defaults.with_walls,
        }
    }

    pub(crate) fn into_store(self) -> ProgressStore<S> {
        self.store
    }

    /// The settings for a game started from the menu's current choices
    pub(crate) fn settings(&self) -> Settings {
        Settings::new(self.mode, self.level, self.walls)
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Action>> {
        Ok(self.handle_event(read()?))
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        match (
            self.selection,
            Command::from_key_event(event.as_key_press_event()?)?,
        ) {
            (_, Command::Quit | Command::Q) | (Selection::Quit, Command::Enter) => {
                return Some(Action::Quit)
            }
            (_, Command::P) | (Selection::Play, Command::Enter) => {
                return Some(Action::Play(self.settings()))
            }
            (_, Command::Home) => self.selection = Selection::min(),
            (_, Command::End) => self.selection = Selection::max(),
            (_, Command::Up) => {
                if let Some(sel) = self.selection.prev() {
                    self.selection = sel;
                }
            }
            (_, Command::Down) => {
                if let Some(sel) = self.selection.next() {
                    self.selection = sel;
                }
            }
            (_, Command::Next) => self.selection = self.selection.cycle_next(),
            (_, Command::Prev) => self.selection = self.selection.cycle_prev(),
            (Selection::Mode, Command::Right | Command::Space | Command::Enter) => {
                self.mode = self.mode.cycle_next();
            }
            (Selection::Mode, Command::Left) => self.mode = self.mode.cycle_prev(),
            (Selection::Level, Command::Right) => self.raise_level(),
            (Selection::Level, Command::Left) => self.lower_level(),
            (Selection::Walls, Command::Left | Command::Right | Command::Space | Command::Enter) => {
                if self.mode != GameMode::Hardcore {
                    self.walls = !self.walls;
                }
            }
            _ => (),
        }
        None
    }

    fn raise_level(&mut self) {
        if self.mode == GameMode::Classic && self.level < self.store.max_unlocked_level() {
            self.level += 1;
        }
    }

    fn lower_level(&mut self) {
        if self.mode == GameMode::Classic && self.level > 1 {
            self.level -= 1;
        }
    }
}

impl<S: Storage> Widget for &MainMenu<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title_area, instructions_area, records_area, options_area, play_area, quit_area] =
            Layout::vertical([1, 1, 2, OptionsBox::HEIGHT, 1, 1])
                .flex(Flex::Center)
                .spacing(1)
                .areas(area);

        Line::styled("G R I D S N A K E", consts::SNAKE_STYLE)
            .centered()
            .render(title_area, buf);
        Line::from_iter([
            Span::raw("Steer with "),
            Span::styled("← ↓ ↑ →", consts::KEY_STYLE),
            Span::raw(", "),
            Span::styled("hjkl", consts::KEY_STYLE),
            Span::raw(", or "),
            Span::styled("wasd", consts::KEY_STYLE),
        ])
        .centered()
        .render(instructions_area, buf);

        let record = self.store.record();
        let [unlocked_area, scores_area] = Layout::vertical([Constraint::Length(1); 2]).areas(records_area);
        Line::from(format!("Unlocked levels: 1-{}", record.max_unlocked_level))
            .centered()
            .render(unlocked_area, buf);
        Line::from(format!(
            "Best Survival: {}   Best Hardcore: {}",
            record.survival_high_score, record.hardcore_high_score
        ))
        .centered()
        .render(scores_area, buf);

        let [options_area] = Layout::horizontal([OptionsBox::WIDTH])
            .flex(Flex::Center)
            .areas(options_area);
        OptionsBox {
            selection: self.selection,
            mode: self.mode,
            level: self.level,
            walls: self.walls,
        }
        .render(options_area, buf);

        button("Play", "p", self.selection == Selection::Play).render(play_area, buf);
        button("Quit", "q", self.selection == Selection::Quit).render(quit_area, buf);
    }
}

fn button(label: &'static str, key: &'static str, selected: bool) -> Line<'static> {
    let style = if selected {
        consts::MENU_SELECTION_STYLE
    } else {
        Style::new()
    };
    Line::from_iter([
        Span::styled(format!("[{label} ("), style),
        Span::styled(key, consts::KEY_STYLE.patch(style)),
        Span::styled(")]", style),
    ])
    .centered()
}

#[derive(Clone, Copy, Debug, Default, Enum, Eq, PartialEq)]
enum Selection {
    Mode,
    Level,
    Walls,
    #[default]
    Play,
    Quit,
}

/// The bordered box of game choices
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct OptionsBox {
    selection: Selection,
    mode: GameMode,
    level: u32,
    walls: bool,
}

impl OptionsBox {
    const ROWS: [(Selection, &'static str); 3] = [
        (Selection::Mode, "Mode"),
        (Selection::Level, "Level"),
        (Selection::Walls, "Walls"),
    ];
    const HEIGHT: u16 = 3 + 2;
    const POINTER_WIDTH: usize = 2;
    const LABEL_WIDTH: usize = 6;
    const VALUE_WIDTH: u16 = 12;
    const WIDTH: u16 = 2 + 2 + 2 + 6 + 2 + Self::VALUE_WIDTH;

    fn value(self, selection: Selection) -> String {
        match selection {
            Selection::Mode => format!("◀ {:8} ▶", self.mode),
            Selection::Level if self.mode == GameMode::Classic => format!("◀ {:>3} ▶", self.level),
            Selection::Level => String::from("  —"),
            Selection::Walls if self.walls || self.mode == GameMode::Hardcore => String::from("[✓]"),
            _ => String::from("[ ]"),
        }
    }
}

impl Widget for OptionsBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" Options: ")
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        for ((sel, label), row) in Self::ROWS.into_iter().zip(inner.rows()) {
            let selected = sel == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{label:lwidth$}  {value}",
                pointer = if selected { "»" } else { "" },
                pwidth = Self::POINTER_WIDTH,
                lwidth = Self::LABEL_WIDTH,
                value = self.value(sel),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{MemoryStorage, Progress};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Cell;

    fn menu(max_unlocked_level: u32, defaults: Settings) -> MainMenu<MemoryStorage> {
        let record = Progress {
            max_unlocked_level,
            survival_high_score: 230,
            hardcore_high_score: 480,
            ..Progress::default()
        };
        MainMenu::new(
            ProgressStore::open(MemoryStorage::with_record(record)),
            defaults,
        )
    }

    fn press(menu: &mut MainMenu<MemoryStorage>, code: KeyCode) -> Option<Action> {
        menu.handle_event(Event::Key(code.into()))
    }

    fn rows(menu: &MainMenu<MemoryStorage>) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        menu.render(area, &mut buffer);
        buffer
            .content
            .chunks(usize::from(area.width))
            .map(|row| row.iter().map(Cell::symbol).collect::<String>())
            .map(|s| s.trim().to_owned())
            .collect()
    }

    #[test]
    fn defaults() {
        let menu = menu(3, Settings::new(GameMode::Survival, 1, true));
        assert_eq!(menu.selection, Selection::Play);
        assert_eq!(menu.settings(), Settings::new(GameMode::Survival, 1, true));
    }

    #[test]
    fn default_level_clamped() {
        let high = menu(3, Settings::new(GameMode::Classic, 7, false));
        assert_eq!(high.settings().start_level, 3);
        let low = menu(3, Settings::new(GameMode::Classic, 0, false));
        assert_eq!(low.settings().start_level, 1);
    }

    #[test]
    fn play_and_quit() {
        let mut menu = menu(1, Settings::new(GameMode::Classic, 1, false));
        assert_eq!(
            press(&mut menu, KeyCode::Enter),
            Some(Action::Play(Settings::new(GameMode::Classic, 1, false)))
        );
        assert_eq!(
            press(&mut menu, KeyCode::Char('p')),
            Some(Action::Play(Settings::new(GameMode::Classic, 1, false)))
        );
        assert_eq!(press(&mut menu, KeyCode::Down), None);
        assert_eq!(menu.selection, Selection::Quit);
        assert_eq!(press(&mut menu, KeyCode::Enter), Some(Action::Quit));
        assert_eq!(press(&mut menu, KeyCode::Char('q')), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(menu.handle_event(Event::Key(ctrl_c)), Some(Action::Quit));
    }

    #[test]
    fn navigation() {
        let mut menu = menu(1, Settings::new(GameMode::Classic, 1, false));
        assert_eq!(press(&mut menu, KeyCode::Home), None);
        assert_eq!(menu.selection, Selection::Mode);
        assert_eq!(press(&mut menu, KeyCode::Up), None);
        assert_eq!(menu.selection, Selection::Mode);
        assert_eq!(press(&mut menu, KeyCode::BackTab), None);
        assert_eq!(menu.selection, Selection::Quit);
        assert_eq!(press(&mut menu, KeyCode::Tab), None);
        assert_eq!(menu.selection, Selection::Mode);
        assert_eq!(press(&mut menu, KeyCode::Down), None);
        assert_eq!(menu.selection, Selection::Level);
        assert_eq!(press(&mut menu, KeyCode::End), None);
        assert_eq!(menu.selection, Selection::Quit);
    }

    #[test]
    fn cycle_mode() {
        let mut menu = menu(1, Settings::new(GameMode::Classic, 1, false));
        press(&mut menu, KeyCode::Home);
        press(&mut menu, KeyCode::Right);
        assert_eq!(menu.settings().mode, GameMode::Survival);
        press(&mut menu, KeyCode::Right);
        let settings = menu.settings();
        assert_eq!(settings.mode, GameMode::Hardcore);
        assert!(settings.hardcore);
        assert!(settings.walls());
        press(&mut menu, KeyCode::Right);
        assert_eq!(menu.settings().mode, GameMode::Classic);
        press(&mut menu, KeyCode::Left);
        assert_eq!(menu.settings().mode, GameMode::Hardcore);
    }

    #[test]
    fn level_limited_to_unlocked() {
        let mut menu = menu(3, Settings::new(GameMode::Classic, 1, false));
        press(&mut menu, KeyCode::Home);
        press(&mut menu, KeyCode::Down);
        for _ in 0..5 {
            press(&mut menu, KeyCode::Right);
        }
        assert_eq!(menu.settings().start_level, 3);
        press(&mut menu, KeyCode::Left);
        assert_eq!(menu.settings().start_level, 2);
        for _ in 0..5 {
            press(&mut menu, KeyCode::Left);
        }
        assert_eq!(menu.settings().start_level, 1);
    }

    #[test]
    fn level_fixed_outside_classic() {
        let mut menu = menu(3, Settings::new(GameMode::Survival, 1, false));
        press(&mut menu, KeyCode::Home);
        press(&mut menu, KeyCode::Down);
        press(&mut menu, KeyCode::Right);
        assert_eq!(menu.settings().start_level, 1);
    }

    #[test]
    fn toggle_walls() {
        let mut menu = menu(1, Settings::new(GameMode::Classic, 1, false));
        press(&mut menu, KeyCode::Up);
        assert_eq!(menu.selection, Selection::Walls);
        press(&mut menu, KeyCode::Char(' '));
        assert!(menu.settings().with_walls);
        press(&mut menu, KeyCode::Enter);
        assert!(!menu.settings().with_walls);
    }

    #[test]
    fn hardcore_forces_walls() {
        let mut menu = menu(1, Settings::new(GameMode::Hardcore, 1, false));
        press(&mut menu, KeyCode::Up);
        press(&mut menu, KeyCode::Char(' '));
        assert!(menu.settings().walls());
        assert!(rows(&menu).iter().any(|r| r.contains("Walls   [✓]")));
    }

    #[test]
    fn draw() {
        let mut menu = menu(3, Settings::new(GameMode::Classic, 2, false));
        let lines = rows(&menu);
        for line in [
            "G R I D S N A K E",
            "Unlocked levels: 1-3",
            "Best Survival: 230   Best Hardcore: 480",
            "[Play (p)]",
            "[Quit (q)]",
        ] {
            assert!(lines.iter().any(|r| r == line), "{line:?} not drawn");
        }
        assert!(lines.iter().any(|r| r.contains("Mode    ◀ Classic  ▶")));
        assert!(lines.iter().any(|r| r.contains("Level   ◀   2 ▶")));
        assert!(lines.iter().any(|r| r.contains("Walls   [ ]")));
        press(&mut menu, KeyCode::Home);
        assert!(rows(&menu).iter().any(|r| r.contains("» Mode")));
    }

    #[test]
    fn reloads_progress() {
        let mut store = ProgressStore::open(MemoryStorage::default());
        assert!(store.update_max_unlocked_level(4));
        let menu = MainMenu::new(store, Settings::new(GameMode::Classic, 9, false));
        assert_eq!(menu.settings().start_level, 4);
    }
}
