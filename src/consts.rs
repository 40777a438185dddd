//! Assorted constants & hard-coded configuration
use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

/// Time between movements of the snake at the start of a normal session
pub(crate) const BASE_TICK_PERIOD: Duration = Duration::from_millis(150);

/// Time between movements of the snake at the start of a hardcore session
pub(crate) const HARDCORE_TICK_PERIOD: Duration = Duration::from_millis(130);

/// The tick period can never be shortened below this by a speed-up bonus
pub(crate) const MIN_TICK_PERIOD: Duration = Duration::from_millis(30);

/// How much a speed bonus changes the tick period in a normal session
pub(crate) const SPEED_BONUS_STEP: Duration = Duration::from_millis(160);

/// How much a speed bonus changes the tick period in a hardcore session
pub(crate) const HARDCORE_SPEED_BONUS_STEP: Duration = Duration::from_millis(200);

/// In Survival mode, the tick period is shortened every this many ticks
pub(crate) const SURVIVAL_RAMP_TICKS: u32 = 20;

/// How much the tick period is shortened by Survival's speed ramp
pub(crate) const SURVIVAL_RAMP_STEP: Duration = Duration::from_millis(2);

/// Survival's speed ramp stops once the tick period reaches this
pub(crate) const SURVIVAL_MIN_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Width & height of the field on level 1
pub(crate) const BASE_FIELD_SIZE: u16 = 20;

/// Snake length at the start of a Survival or Hardcore session
pub(crate) const INITIAL_SNAKE_LENGTH: u32 = 3;

/// Score needed per level in Classic mode; level `L` is completed at
/// `L * POINTS_PER_LEVEL`
pub(crate) const POINTS_PER_LEVEL: u32 = 50;

/// Points for a piece of food in a normal session
pub(crate) const FOOD_POINTS: u32 = 10;

/// Points for a piece of food in a hardcore session
pub(crate) const HARDCORE_FOOD_POINTS: u32 = 20;

/// Points for an [`ExtraPoints`][crate::game::BonusType::ExtraPoints] bonus
/// in a normal session
pub(crate) const EXTRA_POINTS: u32 = 50;

/// Points for an [`ExtraPoints`][crate::game::BonusType::ExtraPoints] bonus
/// in a hardcore session
pub(crate) const HARDCORE_EXTRA_POINTS: u32 = 100;

/// Upper limit on the number of food items on the field at once
pub(crate) const MAX_FOOD: u32 = 5;

/// Bonus cooldowns & lifetimes are drawn from this range of ticks
pub(crate) const BONUS_TICKS_MIN: u32 = 50;

/// Exclusive upper end of the bonus cooldown & lifetime range
pub(crate) const BONUS_TICKS_MAX: u32 = 100;

/// Once the cooldown has elapsed, a bonus appears on any given tick with
/// probability `BONUS_CHANCE_PERCENT / 100`
pub(crate) const BONUS_CHANCE_PERCENT: u32 = 5;

/// Number of walls on level 1 of a normal session with walls
pub(crate) const MIN_WALLS: u32 = 4;

/// Number of walls from level 11 onwards in a normal session with walls
pub(crate) const MAX_WALLS: u32 = 15;

/// Number of walls on every level of a hardcore session
pub(crate) const HARDCORE_WALLS: u32 = 40;

/// No walls are placed within this many cells of the snake's head
pub(crate) const SAFE_ZONE_RADIUS: i32 = 5;

/// Safe zone radius for a hardcore session
pub(crate) const HARDCORE_SAFE_ZONE_RADIUS: i32 = 2;

/// How many random cells are tried for a single wall before giving up on it
pub(crate) const WALL_PLACEMENT_ATTEMPTS: u32 = 100;

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

pub(crate) const FOOD_SYMBOL: char = '●';

pub(crate) const WALL_SYMBOL: char = '█';

pub(crate) const SPEED_UP_SYMBOL: char = '»';

pub(crate) const SLOW_DOWN_SYMBOL: char = '«';

pub(crate) const EXTRA_POINTS_SYMBOL: char = '$';

/// Glyph for the snake's head when it's collided with something
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

pub(crate) const WALL_STYLE: Style = Style::new().fg(Color::Gray);

pub(crate) const BONUS_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .add_modifier(Modifier::BOLD);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the status bar at the top of the game screen
pub(crate) const STATUS_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);
