use crate::command::Command;
use crate::game::{BonusType, Direction, Engine, GameEvent, Settings};
use crate::menu::MainMenu;
use crate::progress::{FileStorage, ProgressStore, Storage};
use crate::view::GameView;
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{backend::Backend, Frame, Terminal};
use std::io;
use std::sync::mpsc::Receiver;
use std::time::Instant;

#[derive(Debug)]
pub(crate) struct App {
    screen: Screen,
}

impl App {
    pub(crate) fn new(store: ProgressStore, defaults: Settings) -> App {
        App {
            screen: Screen::Menu(MainMenu::new(store, defaults)),
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.process_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        match self.screen {
            Screen::Menu(ref menu) => {
                terminal.draw(|frame| menu.draw(frame))?;
            }
            Screen::Game(ref game) => {
                terminal.draw(|frame| game.draw(frame))?;
            }
            Screen::Quit => (),
        }
        Ok(())
    }

    fn process_input(&mut self) -> io::Result<()> {
        let action = match self.screen {
            Screen::Menu(ref mut menu) => menu.process_input()?,
            Screen::Game(ref mut game) => game.process_input()?,
            Screen::Quit => None,
        };
        if let Some(action) = action {
            self.perform(action);
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) {
        let screen = std::mem::replace(&mut self.screen, Screen::Quit);
        self.screen = match (screen, action) {
            (_, Action::Quit) => Screen::Quit,
            (Screen::Menu(menu), Action::Play(settings)) => {
                Screen::Game(GameScreen::new(settings, menu.into_store()))
            }
            (Screen::Game(game), Action::Menu) => {
                let settings = game.settings();
                Screen::Menu(MainMenu::new(game.into_store(), settings))
            }
            (screen, _) => screen,
        };
    }

    fn quitting(&self) -> bool {
        matches!(self.screen, Screen::Quit)
    }
}

#[derive(Debug)]
enum Screen {
    Menu(MainMenu),
    Game(GameScreen),
    Quit,
}

/// A change of screen requested by the user
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    Play(Settings),
    Menu,
    Quit,
}

/// A game in progress, together with its tick timer and what it has
/// announced so far
#[derive(Debug)]
pub(crate) struct GameScreen<S = FileStorage, R = rand::rngs::ThreadRng> {
    engine: Engine<S, R>,
    events: Receiver<GameEvent>,
    bonuses: Receiver<BonusType>,
    bonus_message: Option<BonusType>,
    next_tick: Option<Instant>,
}

impl<S: Storage> GameScreen<S> {
    pub(crate) fn new(settings: Settings, store: ProgressStore<S>) -> Self {
        GameScreen::with_engine(Engine::new(settings, store))
    }
}

impl<S: Storage, R: Rng> GameScreen<S, R> {
    pub(crate) fn with_engine(mut engine: Engine<S, R>) -> Self {
        let events = engine.subscribe();
        let bonuses = engine.subscribe_bonuses();
        GameScreen {
            engine,
            events,
            bonuses,
            bonus_message: None,
            next_tick: None,
        }
    }

    pub(crate) fn process_input(&mut self) -> io::Result<Option<Action>> {
        if self.engine.paused() || self.engine.over() {
            return Ok(self.handle_event(read()?));
        }
        let when = *self
            .next_tick
            .get_or_insert_with(|| Instant::now() + self.engine.tick_period());
        let wait = when.saturating_duration_since(Instant::now());
        if wait.is_zero() || !poll(wait)? {
            self.tick();
            Ok(None)
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    fn tick(&mut self) {
        self.next_tick = None;
        self.engine.update();
        self.drain_events();
    }

    fn drain_events(&mut self) {
        if let Some(kind) = self.bonuses.try_iter().last() {
            self.bonus_message = Some(kind);
        }
        if self.engine.bonus().is_none() {
            self.bonus_message = None;
        }
        for event in self.events.try_iter() {
            match event {
                GameEvent::Updated => (),
                GameEvent::LevelChanged { level } => {
                    tracing::debug!(level, "Level changed");
                }
                GameEvent::GameOver { score } => {
                    tracing::debug!(score, "Game over");
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<Action> {
        if event == Event::FocusLost {
            if !self.engine.paused() {
                self.toggle_pause();
            }
            return None;
        }
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Quit | Command::Q => return Some(Action::Quit),
            Command::M => return Some(Action::Menu),
            Command::R => self.restart(),
            Command::P | Command::Space | Command::Esc => self.toggle_pause(),
            Command::Up => self.engine.change_direction(Direction::Up),
            Command::Down => self.engine.change_direction(Direction::Down),
            Command::Left => self.engine.change_direction(Direction::Left),
            Command::Right => self.engine.change_direction(Direction::Right),
            _ => (),
        }
        None
    }

    fn toggle_pause(&mut self) {
        self.engine.toggle_pause();
        self.next_tick = None;
        self.drain_events();
    }

    fn restart(&mut self) {
        let settings = self.engine.settings();
        self.engine.reset(settings);
        self.next_tick = None;
        self.drain_events();
    }
}

impl<S, R> GameScreen<S, R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(
            GameView {
                engine: &self.engine,
                bonus_message: self.bonus_message,
            },
            frame.area(),
        );
    }

    pub(crate) fn settings(&self) -> Settings {
        self.engine.settings()
    }

    pub(crate) fn into_store(self) -> ProgressStore<S> {
        self.engine.into_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameMode;
    use crate::progress::MemoryStorage;
    use crossterm::event::KeyCode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn screen(settings: Settings) -> GameScreen<MemoryStorage, ChaCha12Rng> {
        GameScreen::with_engine(Engine::new_with_rng(
            settings,
            ProgressStore::open(MemoryStorage::default()),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        ))
    }

    fn press(screen: &mut GameScreen<MemoryStorage, ChaCha12Rng>, code: KeyCode) -> Option<Action> {
        screen.handle_event(Event::Key(code.into()))
    }

    #[test]
    fn steer() {
        let mut screen = screen(Settings::new(GameMode::Classic, 1, false));
        assert_eq!(press(&mut screen, KeyCode::Char('k')), None);
        screen.tick();
        assert_eq!(screen.engine.direction(), Direction::Up);
        assert_eq!(press(&mut screen, KeyCode::Left), None);
        screen.tick();
        assert_eq!(screen.engine.direction(), Direction::Left);
        assert_eq!(press(&mut screen, KeyCode::Char('d')), None);
        screen.tick();
        assert_eq!(screen.engine.direction(), Direction::Left);
    }

    #[test]
    fn pause_keys() {
        let mut screen = screen(Settings::new(GameMode::Classic, 1, false));
        for code in [KeyCode::Char('p'), KeyCode::Char(' '), KeyCode::Esc] {
            assert_eq!(press(&mut screen, code), None);
            assert!(screen.engine.paused());
            assert_eq!(press(&mut screen, code), None);
            assert!(!screen.engine.paused());
        }
    }

    #[test]
    fn focus_lost_pauses() {
        let mut screen = screen(Settings::new(GameMode::Classic, 1, false));
        assert_eq!(screen.handle_event(Event::FocusLost), None);
        assert!(screen.engine.paused());
        assert_eq!(screen.handle_event(Event::FocusLost), None);
        assert!(screen.engine.paused());
    }

    #[test]
    fn restart_after_game_over() {
        let mut screen = screen(Settings::new(GameMode::Survival, 1, true));
        while !screen.engine.over() {
            screen.tick();
        }
        assert_eq!(press(&mut screen, KeyCode::Char('r')), None);
        assert!(!screen.engine.over());
        assert_eq!(screen.engine.score(), 0);
        assert_eq!(screen.settings(), Settings::new(GameMode::Survival, 1, true));
        assert!(screen.events.try_recv().is_err());
    }

    #[test]
    fn leave() {
        let mut screen = screen(Settings::new(GameMode::Classic, 1, false));
        assert_eq!(press(&mut screen, KeyCode::Char('m')), Some(Action::Menu));
        assert_eq!(press(&mut screen, KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(press(&mut screen, KeyCode::Char('x')), None);
    }

    #[test]
    fn store_handed_back() {
        let mut screen = screen(Settings::new(GameMode::Hardcore, 1, false));
        while !screen.engine.over() {
            screen.tick();
        }
        let score = screen.engine.score();
        let store = screen.into_store();
        assert_eq!(store.record().hardcore_high_score, score);
    }
}
