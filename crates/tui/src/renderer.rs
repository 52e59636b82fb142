use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clock_intro_core::render::{IntroLayout, Presentation, render_intro};
use clock_intro_core::{
    ClockIntroController, DismissInput, IntroConfig, IntroKey, PageScroll, QueuedScheduler,
};
use clock_intro_protocol::{Point, RenderCommand, TextAlign, ThemeToken, Viewport};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line as TextLine, Span},
    widgets::canvas::{Canvas, Circle, Line, Rectangle},
};

/// Viewport units per terminal cell. Cells are about twice as tall as they
/// are wide, so this keeps the face round.
const CELL_W: f64 = 4.0;
const CELL_H: f64 = 8.0;

fn theme_to_color(token: ThemeToken, opacity: f32) -> Color {
    if opacity < 0.35 {
        return match token {
            ThemeToken::Background => Color::Black,
            _ => Color::DarkGray,
        };
    }
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Grid | ThemeToken::TickMuted | ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::Tick | ThemeToken::Hand | ThemeToken::TextPrimary => Color::White,
        ThemeToken::SecondHand => Color::LightRed,
        ThemeToken::Pivot | ThemeToken::TextSecondary | ThemeToken::SkipButton => Color::Gray,
    }
}

fn viewport_for(area: Rect) -> Viewport {
    Viewport::new(f64::from(area.width) * CELL_W, f64::from(area.height) * CELL_H)
}

/// Centre of terminal cell (`column`, `row`) in viewport units.
fn cell_to_point(area: Rect, column: u16, row: u16) -> Point {
    Point::new(
        (f64::from(column.saturating_sub(area.x)) + 0.5) * CELL_W,
        (f64::from(row.saturating_sub(area.y)) + 0.5) * CELL_H,
    )
}

fn draw(frame: &mut Frame, commands: &[RenderCommand], viewport: &Viewport) {
    let area = frame.area();
    let height = viewport.height;
    let canvas = Canvas::default()
        .background_color(Color::Black)
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for cmd in commands {
                if cmd.opacity().is_some_and(|o| o <= 0.0) {
                    continue;
                }
                match cmd {
                    // The background is the canvas itself.
                    RenderCommand::DrawRect { color, .. } if *color == ThemeToken::Background => {}
                    RenderCommand::DrawRect {
                        rect,
                        color,
                        opacity,
                    } => ctx.draw(&Rectangle {
                        x: rect.x,
                        y: height - rect.y - rect.h,
                        width: rect.w,
                        height: rect.h,
                        color: theme_to_color(*color, *opacity),
                    }),
                    // Braille cells are too coarse to show the rounding.
                    RenderCommand::DrawRoundedRect {
                        rect,
                        color,
                        opacity,
                        ..
                    } => ctx.draw(&Rectangle {
                        x: rect.x,
                        y: height - rect.y - rect.h,
                        width: rect.w,
                        height: rect.h,
                        color: theme_to_color(*color, *opacity),
                    }),
                    RenderCommand::DrawLine {
                        from,
                        to,
                        color,
                        opacity,
                        ..
                    } => ctx.draw(&Line::new(
                        from.x,
                        height - from.y,
                        to.x,
                        height - to.y,
                        theme_to_color(*color, *opacity),
                    )),
                    RenderCommand::DrawCircle {
                        center,
                        radius,
                        color,
                        opacity,
                        ..
                    } => ctx.draw(&Circle {
                        x: center.x,
                        y: height - center.y,
                        radius: *radius,
                        color: theme_to_color(*color, *opacity),
                    }),
                    RenderCommand::DrawText {
                        position,
                        text,
                        color,
                        align,
                        opacity,
                        ..
                    } => {
                        let width = text.chars().count() as f64 * CELL_W;
                        let x = match align {
                            TextAlign::Left => position.x,
                            TextAlign::Center => position.x - width / 2.0,
                            TextAlign::Right => position.x - width,
                        };
                        let style = Style::default().fg(theme_to_color(*color, *opacity));
                        ctx.print(
                            x.max(0.0),
                            height - position.y,
                            TextLine::from(Span::styled(text.to_string(), style)),
                        );
                    }
                    RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn key_input(code: KeyCode) -> DismissInput {
    let key = match code {
        KeyCode::Enter => IntroKey::Enter,
        KeyCode::Char(' ') => IntroKey::Space,
        KeyCode::Esc => IntroKey::Escape,
        _ => IntroKey::Other,
    };
    DismissInput::Key(key)
}

/// Whether `at` lands on the skip button of a frame that shows it.
fn on_skip(skip_visible: bool, viewport: &Viewport, at: Option<Point>) -> bool {
    match at {
        Some(at) if skip_visible => IntroLayout::new(viewport).skip_rect().contains(at),
        _ => false,
    }
}

/// Run the intro until it completes or the user quits with `q`/Ctrl-C.
/// Returns whether it completed.
pub fn run_intro(config: IntroConfig) -> Result<bool> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let completed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&completed);
    let exit_delay_ms = config.exit_delay_ms;
    let mut intro = ClockIntroController::new(
        config,
        QueuedScheduler::new(),
        PageScroll::default(),
        move || flag.set(true),
    );
    let start = Instant::now();
    let mut completing_since: Option<f64> = None;
    let mut pointer: Option<Point> = None;
    intro.mount();

    let outcome = loop {
        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        intro.pump(now_ms);
        if completed.get() {
            break true;
        }

        let snapshot = intro.frame();
        if snapshot.is_complete && completing_since.is_none() {
            completing_since = Some(now_ms);
        }
        let layer = match completing_since {
            Some(since) if exit_delay_ms > 0.0 => (1.0 - (now_ms - since) / exit_delay_ms) as f32,
            Some(_) => 0.0,
            None => 1.0,
        };

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let viewport = viewport_for(area);
        let presentation = Presentation {
            layer_opacity: layer,
            skip_hovered: on_skip(snapshot.skip_visible, &viewport, pointer),
            now_ms,
        };
        let commands = render_intro(&snapshot, &viewport, &intro.config().labels, &presentation);
        terminal.draw(|frame| draw(frame, &commands, &viewport))?;

        let wait_ms = if intro.scheduler().has_pending_frame() {
            16.0
        } else if snapshot.is_ready {
            // Keep the continue hint bobbing.
            50.0
        } else {
            intro.next_timer_in().unwrap_or(100.0).clamp(1.0, 100.0)
        };
        if !event::poll(Duration::from_secs_f64(wait_ms / 1000.0))? {
            continue;
        }
        let input = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') => break false,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break false,
                code => Some(key_input(code)),
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved => {
                    pointer = Some(cell_to_point(area, mouse.column, mouse.row));
                    None
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    pointer = Some(cell_to_point(area, mouse.column, mouse.row));
                    Some(if on_skip(snapshot.skip_visible, &viewport, pointer) {
                        DismissInput::Skip
                    } else {
                        DismissInput::Click { on_control: false }
                    })
                }
                MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => Some(DismissInput::Wheel),
                _ => None,
            },
            _ => None,
        };
        if let Some(input) = input {
            // Timers started by the dismissal count from now, not the last pump.
            let at_ms = start.elapsed().as_secs_f64() * 1000.0;
            let result = intro.dismiss_at(input, at_ms);
            log::debug!("{input:?} -> {result:?}");
        }
    };

    intro.unmount();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(outcome)
}
