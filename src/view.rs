use crate::consts;
use crate::game::{head_symbol, BonusType, Engine, Position};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Padding, Widget},
};

/// Widget that draws a game session: status bar, field, and messages
#[derive(Debug)]
pub(crate) struct GameView<'a, S, R> {
    pub(crate) engine: &'a Engine<S, R>,
    /// Type of the bonus currently on the field, if its appearance has been
    /// announced
    pub(crate) bonus_message: Option<BonusType>,
}

impl<S, R> GameView<'_, S, R> {
    fn status_line(&self) -> String {
        let engine = self.engine;
        let settings = engine.settings();
        let mode = if settings.hardcore {
            "HARDCORE"
        } else {
            settings.mode.as_str()
        };
        format!(
            " Score: {}  Level: {} (need {})  {mode}",
            engine.score(),
            engine.level(),
            engine.points_for_next_level(),
        )
    }
}

impl<S, R> Widget for GameView<'_, S, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [status_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::styled(self.status_line(), consts::STATUS_BAR_STYLE).render(status_area, buf);

        let engine = self.engine;
        let field = engine.field();
        let block_area = center_rect(
            block_area,
            Size::new(field.width.saturating_add(2), field.height.saturating_add(2)),
        );
        Block::bordered().render(block_area, buf);

        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for &pos in engine.walls() {
            canvas.draw_cell(pos, consts::WALL_SYMBOL, consts::WALL_STYLE);
        }
        for &pos in engine.food() {
            canvas.draw_cell(pos, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        if let Some(bonus) = engine.bonus() {
            canvas.draw_cell(bonus.position, bonus.kind.symbol(), consts::BONUS_STYLE);
        }
        for pos in engine.snake().body() {
            canvas.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        // The head goes last so that a collision overwrites what was hit
        let head = engine.snake().head();
        if engine.over() {
            canvas.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
        } else {
            canvas.draw_cell(head, head_symbol(engine.direction()), consts::SNAKE_STYLE);
        }

        if engine.over() {
            Span::from(format!(" GAME OVER! Score: {}", engine.score())).render(msg1_area, buf);
            Line::from_iter([
                Span::raw(" Restart ("),
                Span::styled("r", consts::KEY_STYLE),
                Span::raw(")  Menu ("),
                Span::styled("m", consts::KEY_STYLE),
                Span::raw(")  Quit ("),
                Span::styled("q", consts::KEY_STYLE),
                Span::raw(")"),
            ])
            .render(msg2_area, buf);
        } else if let Some(kind) = self.bonus_message {
            Span::styled(format!(" Bonus: {kind}!"), consts::BONUS_STYLE).render(msg1_area, buf);
        }

        if engine.paused() {
            let popup = center_rect(area, Size::new(PauseBox::WIDTH, PauseBox::HEIGHT));
            PauseBox.render(popup, buf);
        }
    }
}

/// The pop-up shown over a paused game
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PauseBox;

impl PauseBox {
    const ITEMS: [(&'static str, &'static str); 4] = [
        ("Resume", "p"),
        ("Restart", "r"),
        ("Menu", "m"),
        ("Quit", "q"),
    ];
    const HEIGHT: u16 = 4 + 2;
    const WIDTH: u16 = 11 + 2 + 2;
}

impl Widget for PauseBox {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        for ((label, key), row) in Self::ITEMS.into_iter().zip(inner.rows()) {
            Line::from_iter([
                Span::raw(format!("{label} (")),
                Span::styled(key, consts::KEY_STYLE),
                Span::raw(")"),
            ])
            .render(row, buf);
        }
    }
}

/// The interior of the field's border, addressed in field coordinates
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw `symbol` at `pos`.  Cells outside the visible area (including
    /// snake segments that haven't entered the field yet) are skipped.
    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        if x >= self.area.width || y >= self.area.height {
            return;
        }
        if let Some(cell) = self.buf.cell_mut((self.area.x + x, self.area.y + y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}
