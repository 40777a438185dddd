//! The game-state engine: one session's snake, field, food, bonus, score &
//! level, advanced one tick at a time
mod bonus;
mod direction;
mod events;
mod field;
mod snake;
pub(crate) use self::bonus::{Bonus, BonusSlot, BonusType};
pub(crate) use self::direction::{Direction, Position};
pub(crate) use self::events::GameEvent;
pub(crate) use self::field::Field;
pub(crate) use self::snake::{head_symbol, Snake};
use self::events::Subscribers;
use self::field::{food_count, wall_count, Growth, SafeZone};
use crate::consts;
use crate::progress::{Checkpoint, FileStorage, ProgressStore, Storage};
use enum_map::Enum;
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc::Receiver;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum GameMode {
    /// Advance through levels by scoring; progress is saved per level
    #[default]
    Classic,
    /// Play for as long as possible while the snake keeps speeding up
    Survival,
    /// Walls, faster ticks, more points
    Hardcore,
}

impl GameMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Survival => "Survival",
            GameMode::Hardcore => "Hardcore",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parameters with which a session is started
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Settings {
    pub(crate) mode: GameMode,
    /// Requested starting level.  Only honored in Classic mode, and only up to
    /// the highest unlocked level.
    pub(crate) start_level: u32,
    pub(crate) with_walls: bool,
    pub(crate) hardcore: bool,
}

impl Settings {
    /// Settings for a session in `mode`.  Choosing Hardcore mode turns on the
    /// hardcore rules and walls.
    pub(crate) fn new(mode: GameMode, start_level: u32, with_walls: bool) -> Settings {
        let hardcore = mode == GameMode::Hardcore;
        Settings {
            mode,
            start_level,
            with_walls: with_walls || hardcore,
            hardcore,
        }
    }

    /// Whether levels in this session have walls
    pub(crate) fn walls(self) -> bool {
        self.with_walls || self.hardcore
    }

    fn growth(self) -> Growth {
        if self.hardcore {
            Growth::Hardcore
        } else if self.mode == GameMode::Survival {
            Growth::Survival
        } else {
            Growth::Classic
        }
    }

    fn food_points(self) -> u32 {
        if self.hardcore {
            consts::HARDCORE_FOOD_POINTS
        } else {
            consts::FOOD_POINTS
        }
    }

    fn extra_points(self) -> u32 {
        if self.hardcore {
            consts::HARDCORE_EXTRA_POINTS
        } else {
            consts::EXTRA_POINTS
        }
    }

    fn speed_bonus_step(self) -> Duration {
        if self.hardcore {
            consts::HARDCORE_SPEED_BONUS_STEP
        } else {
            consts::SPEED_BONUS_STEP
        }
    }

    fn initial_tick_period(self) -> Duration {
        if self.hardcore {
            consts::HARDCORE_TICK_PERIOD
        } else {
            consts::BASE_TICK_PERIOD
        }
    }

    fn safe_zone_radius(self) -> i32 {
        if self.hardcore {
            consts::HARDCORE_SAFE_ZONE_RADIUS
        } else {
            consts::SAFE_ZONE_RADIUS
        }
    }
}

/// A single game session.
///
/// The engine does not keep time itself.  Its owner is expected to call
/// [`Engine::update()`] once every [`Engine::tick_period()`] and to pass along
/// direction changes & pause requests in between.
#[derive(Debug)]
pub(crate) struct Engine<S = FileStorage, R = rand::rngs::ThreadRng> {
    rng: R,
    store: ProgressStore<S>,
    settings: Settings,
    field: Field,
    snake: Snake,
    /// The direction the snake moved in on the last tick
    direction: Direction,
    /// The direction the snake will move in on the next tick
    next_direction: Direction,
    food: Vec<Position>,
    walls: HashSet<Position>,
    bonus: BonusSlot,
    score: u32,
    level: u32,
    /// Length the snake respawns with at the start of a new level
    baseline_length: u32,
    tick_period: Duration,
    /// Ticks elapsed this session, for Survival's speed ramp
    ticks: u32,
    paused: bool,
    over: bool,
    events: Subscribers<GameEvent>,
    bonus_events: Subscribers<BonusType>,
}

impl<S: Storage> Engine<S, rand::rngs::ThreadRng> {
    pub(crate) fn new(settings: Settings, store: ProgressStore<S>) -> Self {
        Engine::new_with_rng(settings, store, rand::rng())
    }
}

impl<S: Storage, R: Rng> Engine<S, R> {
    pub(crate) fn new_with_rng(settings: Settings, store: ProgressStore<S>, rng: R) -> Self {
        let mut engine = Engine {
            rng,
            store,
            settings,
            field: Field::square(consts::BASE_FIELD_SIZE),
            snake: Snake::new(Position::default(), 1),
            direction: Direction::Right,
            next_direction: Direction::Right,
            food: Vec::new(),
            walls: HashSet::new(),
            bonus: BonusSlot::Cooldown(0),
            score: 0,
            level: 1,
            baseline_length: consts::INITIAL_SNAKE_LENGTH,
            tick_period: settings.initial_tick_period(),
            ticks: 0,
            paused: false,
            over: false,
            events: Subscribers::new(),
            bonus_events: Subscribers::new(),
        };
        engine.start();
        engine
    }

    /// Discard the current session and start a new one with `settings`.
    /// Subscriptions are kept.
    pub(crate) fn reset(&mut self, settings: Settings) {
        self.settings = settings;
        self.start();
    }

    /// (Re)initialize all session state from `self.settings` and the stored
    /// progress
    fn start(&mut self) {
        self.store.load();
        let settings = self.settings;
        let (level, length, score) = if settings.hardcore || settings.mode == GameMode::Survival {
            (1, consts::INITIAL_SNAKE_LENGTH, 0)
        } else {
            let level = settings
                .start_level
                .clamp(1, self.store.max_unlocked_level());
            match self.store.checkpoint(level) {
                Some(cp) => (level, cp.snake_length, cp.score),
                None => (level, consts::INITIAL_SNAKE_LENGTH + level / 2, 0),
            }
        };
        let field = Field::square(settings.growth().initial_size(level));
        let length = if length > field.area() {
            tracing::warn!(
                level,
                stored = length,
                capped = field.area(),
                "Checkpoint snake length exceeds field; capping"
            );
            field.area()
        } else {
            length
        };
        self.level = level;
        self.score = score;
        self.baseline_length = length;
        self.field = field;
        self.tick_period = settings.initial_tick_period();
        self.ticks = 0;
        self.paused = false;
        self.over = false;
        self.bonus = BonusSlot::cooldown(&mut self.rng);
        self.spawn_snake();
        self.food.clear();
        if settings.walls() {
            self.generate_walls();
        } else {
            self.walls.clear();
        }
        self.place_food();
        tracing::info!(
            mode = %settings.mode,
            hardcore = settings.hardcore,
            walls = settings.walls(),
            level,
            score,
            snake_length = length,
            "Starting game"
        );
    }

    /// Receive a [`GameEvent`] for every tick, pause toggle, level change, and
    /// game over from now on
    pub(crate) fn subscribe(&mut self) -> Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Receive the type of every bonus that appears on the field from now on
    pub(crate) fn subscribe_bonuses(&mut self) -> Receiver<BonusType> {
        self.bonus_events.subscribe()
    }

    /// Set the direction for the next tick.  A request to reverse the current
    /// direction is ignored.  If this is called more than once between ticks,
    /// the last call wins.
    pub(crate) fn change_direction(&mut self, direction: Direction) {
        if direction != self.direction.reverse() {
            self.next_direction = direction;
        }
    }

    /// Pause or unpause the game.  Has no effect once the game is over.
    pub(crate) fn toggle_pause(&mut self) {
        if self.over {
            return;
        }
        self.paused = !self.paused;
        tracing::debug!(paused = self.paused, "Toggled pause");
        self.events.emit(GameEvent::Updated);
    }

    /// Advance the game by one tick.  Does nothing while paused or after the
    /// game is over.
    pub(crate) fn update(&mut self) {
        if self.paused || self.over {
            return;
        }
        self.tick_bonus();
        if self.settings.mode == GameMode::Survival {
            self.ramp_speed();
        }
        self.direction = self.next_direction;
        let head = self.snake.push_head(self.direction);
        let mut scored = false;
        if let Some(bonus) = self.bonus.active().copied().filter(|b| b.position == head) {
            tracing::debug!(kind = ?bonus.kind, position = %head, "Bonus picked up");
            self.bonus = BonusSlot::cooldown(&mut self.rng);
            scored |= self.apply_bonus(bonus.kind);
        }
        let ate = if let Some(i) = self.food.iter().position(|&p| p == head) {
            self.food.remove(i);
            self.score = self.score.saturating_add(self.settings.food_points());
            true
        } else {
            false
        };
        if !ate {
            self.snake.drop_tail();
        }
        if (ate || scored) && self.level_complete() {
            self.level_up();
        }
        if ate {
            self.place_food();
        }
        if self.collided() {
            self.game_over();
        } else {
            self.events.emit(GameEvent::Updated);
        }
    }

    fn tick_bonus(&mut self) {
        match self.bonus {
            BonusSlot::Active(ref mut bonus) => {
                bonus.ticks_left = bonus.ticks_left.saturating_sub(1);
                if bonus.ticks_left == 0 {
                    tracing::debug!(kind = ?bonus.kind, "Bonus expired");
                    self.bonus = BonusSlot::cooldown(&mut self.rng);
                }
            }
            BonusSlot::Cooldown(ref mut ticks) => {
                *ticks = ticks.saturating_sub(1);
                if *ticks == 0 && self.rng.random_ratio(consts::BONUS_CHANCE_PERCENT, 100) {
                    self.spawn_bonus();
                }
            }
        }
    }

    fn spawn_bonus(&mut self) {
        let Some(&position) = self.empty_cells().choose(&mut self.rng) else {
            return;
        };
        let kind = BonusType::random(&mut self.rng);
        let ticks_left = bonus::random_bonus_ticks(&mut self.rng);
        self.bonus = BonusSlot::Active(Bonus {
            kind,
            position,
            ticks_left,
        });
        tracing::debug!(?kind, %position, ticks_left, "Bonus appeared");
        self.bonus_events.emit(kind);
    }

    /// Apply the effect of picking up a bonus of type `kind`.  Returns `true`
    /// if points were awarded.
    fn apply_bonus(&mut self, kind: BonusType) -> bool {
        let step = self.settings.speed_bonus_step();
        match kind {
            BonusType::SpeedUp => {
                self.tick_period = self
                    .tick_period
                    .saturating_sub(step)
                    .max(consts::MIN_TICK_PERIOD);
                false
            }
            BonusType::SlowDown => {
                self.tick_period = self.tick_period.saturating_add(step);
                false
            }
            BonusType::ExtraPoints => {
                self.score = self.score.saturating_add(self.settings.extra_points());
                true
            }
        }
    }

    fn ramp_speed(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % consts::SURVIVAL_RAMP_TICKS == 0
            && self.tick_period > consts::SURVIVAL_MIN_TICK_PERIOD
        {
            self.tick_period = self
                .tick_period
                .saturating_sub(consts::SURVIVAL_RAMP_STEP)
                .max(consts::SURVIVAL_MIN_TICK_PERIOD);
        }
    }

    fn level_complete(&self) -> bool {
        self.settings.mode == GameMode::Classic && self.score >= self.points_for_next_level()
    }

    fn level_up(&mut self) {
        let classic = self.settings.mode == GameMode::Classic;
        if classic {
            self.store.record_checkpoint(
                self.level,
                Checkpoint {
                    snake_length: self.snake.len(),
                    score: self.score,
                },
            );
        }
        self.level += 1;
        self.field.grow(self.settings.growth().on_reaching(self.level));
        self.baseline_length = self.snake.len();
        if classic && !self.store.update_max_unlocked_level(self.level) {
            // Persist the checkpoint even when no new level was unlocked
            self.store.save();
        }
        self.spawn_snake();
        if self.bonus.active().is_some_and(|b| self.snake.contains(b.position)) {
            self.bonus = BonusSlot::cooldown(&mut self.rng);
        }
        self.food.clear();
        if self.settings.walls() {
            self.generate_walls();
        }
        self.place_food();
        tracing::info!(
            level = self.level,
            score = self.score,
            field_size = self.field.width,
            snake_length = self.baseline_length,
            "Level up"
        );
        self.events.emit(GameEvent::LevelChanged { level: self.level });
    }

    fn collided(&self) -> bool {
        let head = self.snake.head();
        !self.field.contains(head)
            || (self.settings.walls() && self.walls.contains(&head))
            || self.snake.bites_itself()
    }

    fn game_over(&mut self) {
        self.over = true;
        let new_high = if self.settings.hardcore {
            self.store.record_hardcore_score(self.score)
        } else if self.settings.mode == GameMode::Survival {
            self.store.record_survival_score(self.score)
        } else {
            false
        };
        tracing::info!(
            mode = %self.settings.mode,
            level = self.level,
            score = self.score,
            new_high,
            "Game over"
        );
        self.events.emit(GameEvent::GameOver { score: self.score });
    }

    /// Place a fresh snake of the baseline length at the center of the field,
    /// facing right
    fn spawn_snake(&mut self) {
        self.snake = Snake::new(self.field.center(), self.baseline_length);
        self.direction = Direction::Right;
        self.next_direction = Direction::Right;
    }

    fn generate_walls(&mut self) {
        let count = wall_count(self.level, self.settings.hardcore);
        let safe_zone = SafeZone {
            center: self.snake.head(),
            radius: self.settings.safe_zone_radius(),
        };
        let snake = self.snake.cells();
        self.walls = self
            .field
            .generate_walls(&mut self.rng, count, safe_zone, |p| {
                snake.contains(&p) || self.food.contains(&p) || self.bonus.occupies(p)
            });
        if self.walls.len() < usize::try_from(count).unwrap_or(usize::MAX) {
            tracing::debug!(
                placed = self.walls.len(),
                wanted = count,
                "Could not place all walls"
            );
        }
    }

    /// Top up the food on the field to the amount for the current level, or
    /// as much as will fit
    fn place_food(&mut self) {
        let target = food_count(self.level);
        while self.food.len() < target {
            let Some(&pos) = self.empty_cells().choose(&mut self.rng) else {
                tracing::debug!(placed = self.food.len(), target, "No room for food");
                break;
            };
            self.food.push(pos);
        }
    }

    /// Return all cells of the field not taken up by the snake, walls, food,
    /// or an active bonus
    fn empty_cells(&self) -> Vec<Position> {
        let snake = self.snake.cells();
        self.field
            .positions()
            .filter(|&p| {
                !(snake.contains(&p)
                    || self.walls.contains(&p)
                    || self.food.contains(&p)
                    || self.bonus.occupies(p))
            })
            .collect()
    }
}

impl<S, R> Engine<S, R> {
    /// Stop the session and hand back the progress store
    pub(crate) fn into_store(self) -> ProgressStore<S> {
        self.store
    }

    pub(crate) fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub(crate) fn settings(&self) -> Settings {
        self.settings
    }

    pub(crate) fn field(&self) -> Field {
        self.field
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn food(&self) -> &[Position] {
        &self.food
    }

    pub(crate) fn walls(&self) -> &HashSet<Position> {
        &self.walls
    }

    pub(crate) fn bonus(&self) -> Option<&Bonus> {
        self.bonus.active()
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    /// Score at which the current Classic level is completed
    pub(crate) fn points_for_next_level(&self) -> u32 {
        self.level.saturating_mul(consts::POINTS_PER_LEVEL)
    }

    /// Time that should pass between calls to [`Engine::update()`]
    pub(crate) fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub(crate) fn paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn over(&self) -> bool {
        self.over
    }
}
