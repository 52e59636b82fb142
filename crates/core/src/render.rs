//! Rendering-parameter derivation: turns an [`IntroFrame`] into draw
//! commands for any surface.
//!
//! Geometry is authored for a 280-unit clock face and scaled uniformly to
//! fit the viewport together with the labels underneath it.

use clock_intro_protocol::{
    IntroFrame, Phase, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use crate::config::IntroLabels;
use crate::ticks::{TICK_COUNT, TICK_SPACING_DEG};

const CLOCK_SIZE: f64 = 280.0;
const TICK_RADIUS: f64 = 120.0;
const MAJOR_TICK_LENGTH: f64 = 14.0;
const MINOR_TICK_LENGTH: f64 = 6.0;
const MAJOR_TICK_GAP: f64 = 4.0;
const PIVOT_RADIUS: f64 = 3.0;
const GRID_SPACING: f64 = 48.0;

/// Unscaled size of the face plus labels column.
const LAYOUT_WIDTH: f64 = 320.0;
const LAYOUT_HEIGHT: f64 = 440.0;

const TIME_LABEL_OFFSET: f64 = 36.0;
const NAME_OFFSET: f64 = 88.0;
const TITLE_OFFSET: f64 = 116.0;
const EDGE_MARGIN: f64 = 32.0;

const SKIP_OPACITY: f32 = 0.4;

/// Scroll-mouse glyph under the continue hint.
const MOUSE_WIDTH: f64 = 20.0;
const MOUSE_HEIGHT: f64 = 32.0;
const MOUSE_WHEEL_TOP: f64 = 8.0;
const MOUSE_WHEEL_LENGTH: f64 = 4.0;
const MOUSE_WHEEL_WIDTH: f64 = 4.0;
const HINT_GAP: f64 = 12.0;
const HINT_CYCLE_MS: f64 = 1500.0;
const HINT_BOB: f64 = 4.0;
const WHEEL_MIN_OPACITY: f32 = 0.3;

/// Hand geometry in face units.
#[derive(Debug, Clone, Copy)]
struct HandSpec {
    length: f64,
    width: f64,
    tail: f64,
}

const HOUR_HAND: HandSpec = HandSpec {
    length: 55.0,
    width: 3.0,
    tail: 0.0,
};
const MINUTE_HAND: HandSpec = HandSpec {
    length: 80.0,
    width: 2.0,
    tail: 0.0,
};
const SECOND_HAND: HandSpec = HandSpec {
    length: 95.0,
    width: 1.0,
    tail: 24.0,
};

/// Positions of the clock and its overlay inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntroLayout {
    pub viewport: Viewport,
    /// Face units to viewport units.
    pub scale: f64,
    pub center: Point,
}

impl IntroLayout {
    pub fn new(viewport: &Viewport) -> Self {
        let scale = (viewport.width / LAYOUT_WIDTH)
            .min(viewport.height / LAYOUT_HEIGHT)
            .max(0.0);
        let top = viewport.y + (viewport.height - LAYOUT_HEIGHT * scale) / 2.0;
        let center = Point::new(
            viewport.x + viewport.width / 2.0,
            top + (CLOCK_SIZE / 2.0) * scale,
        );
        Self {
            viewport: *viewport,
            scale,
            center,
        }
    }

    /// Point at `radius` face units along a clockwise angle from twelve.
    pub fn polar(&self, degrees: f64, radius: f64) -> Point {
        let rad = degrees.to_radians();
        Point::new(
            self.center.x + rad.sin() * radius * self.scale,
            self.center.y - rad.cos() * radius * self.scale,
        )
    }

    fn face_bottom(&self) -> f64 {
        self.center.y + (CLOCK_SIZE / 2.0) * self.scale
    }

    fn font(&self, size: f64) -> f64 {
        (size * self.scale).max(1.0)
    }

    /// Hit area of the skip affordance, bottom-right of the viewport.
    pub fn skip_rect(&self) -> Rect {
        let w = 72.0 * self.scale.max(0.5);
        let h = 24.0 * self.scale.max(0.5);
        let vp = &self.viewport;
        Rect::new(
            vp.x + vp.width - EDGE_MARGIN * self.scale - w,
            vp.y + vp.height - EDGE_MARGIN * self.scale - h,
            w,
            h,
        )
    }
}

/// Host-side presentation state that the intro itself does not track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    /// Fades the whole intro; hosts animate it from 1 to 0 over the exit
    /// delay once `is_complete` is set.
    pub layer_opacity: f32,
    /// The pointer is over the skip affordance.
    pub skip_hovered: bool,
    /// Host time, drives the looping hint animation.
    pub now_ms: f64,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            layer_opacity: 1.0,
            skip_hovered: false,
            now_ms: 0.0,
        }
    }
}

/// 0 at the start of a hint cycle, 1 halfway, eased at both ends.
fn hint_wave(now_ms: f64) -> f64 {
    let phase = (now_ms / HINT_CYCLE_MS).rem_euclid(1.0);
    (1.0 - (phase * std::f64::consts::TAU).cos()) / 2.0
}

fn is_major_tick(index: u8) -> bool {
    index % 3 == 0
}

fn shown(visible: bool) -> f32 {
    if visible { 1.0 } else { 0.0 }
}

/// Derive the draw commands for one frame.
pub fn render_intro(
    frame: &IntroFrame,
    viewport: &Viewport,
    labels: &IntroLabels,
    presentation: &Presentation,
) -> Vec<RenderCommand> {
    let layout = IntroLayout::new(viewport);
    let layer = presentation.layer_opacity.clamp(0.0, 1.0);
    let mut commands = Vec::with_capacity(96);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(viewport.x, viewport.y, viewport.width, viewport.height),
        color: ThemeToken::Background,
        opacity: layer,
    });
    push_grid(&mut commands, &layout, layer);

    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("face"),
    });
    for index in 0..TICK_COUNT {
        let revealed = frame.revealed_ticks.contains(&index);
        push_tick(&mut commands, &layout, index, shown(revealed) * layer);
    }

    let minute_length = if frame.phase == Phase::HandGrowth {
        frame.minute_hand_length * 0.8
    } else {
        MINUTE_HAND.length
    };
    push_hand(
        &mut commands,
        &layout,
        frame.angles.hour,
        HOUR_HAND,
        ThemeToken::Hand,
        shown(frame.hands_visible.hour) * layer,
    );
    push_hand(
        &mut commands,
        &layout,
        frame.angles.minute,
        HandSpec {
            length: minute_length,
            ..MINUTE_HAND
        },
        ThemeToken::Hand,
        shown(frame.hands_visible.minute) * layer,
    );
    push_hand(
        &mut commands,
        &layout,
        frame.angles.second,
        SECOND_HAND,
        ThemeToken::SecondHand,
        shown(frame.hands_visible.second) * layer,
    );

    commands.push(RenderCommand::DrawCircle {
        center: layout.center,
        radius: PIVOT_RADIUS * layout.scale,
        color: ThemeToken::Pivot,
        width: 1.0,
        opacity: layer,
    });
    commands.push(RenderCommand::EndGroup);

    push_overlay(&mut commands, &layout, frame, labels, presentation, layer);
    commands
}

fn push_grid(commands: &mut Vec<RenderCommand>, layout: &IntroLayout, opacity: f32) {
    let spacing = GRID_SPACING * layout.scale;
    if spacing < 4.0 {
        return;
    }
    let vp = &layout.viewport;
    let mut x = vp.x + spacing;
    while x < vp.x + vp.width {
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, vp.y),
            to: Point::new(x, vp.y + vp.height),
            color: ThemeToken::Grid,
            width: 1.0,
            opacity,
        });
        x += spacing;
    }
    let mut y = vp.y + spacing;
    while y < vp.y + vp.height {
        commands.push(RenderCommand::DrawLine {
            from: Point::new(vp.x, y),
            to: Point::new(vp.x + vp.width, y),
            color: ThemeToken::Grid,
            width: 1.0,
            opacity,
        });
        y += spacing;
    }
}

fn push_tick(commands: &mut Vec<RenderCommand>, layout: &IntroLayout, index: u8, opacity: f32) {
    let angle = f64::from(index) * TICK_SPACING_DEG;
    let scale = layout.scale;

    if !is_major_tick(index) {
        commands.push(RenderCommand::DrawLine {
            from: layout.polar(angle, TICK_RADIUS),
            to: layout.polar(angle, TICK_RADIUS - MINOR_TICK_LENGTH),
            color: ThemeToken::TickMuted,
            width: scale,
            opacity,
        });
        return;
    }

    // Cardinal positions get a long outer stroke plus a short inner one.
    let inner = TICK_RADIUS - MAJOR_TICK_LENGTH;
    commands.push(RenderCommand::DrawLine {
        from: layout.polar(angle, TICK_RADIUS),
        to: layout.polar(angle, inner),
        color: ThemeToken::Tick,
        width: 2.0 * scale,
        opacity,
    });
    commands.push(RenderCommand::DrawLine {
        from: layout.polar(angle, inner - MAJOR_TICK_GAP),
        to: layout.polar(angle, inner - MAJOR_TICK_GAP - MAJOR_TICK_LENGTH * 0.4),
        color: ThemeToken::Tick,
        width: 2.0 * scale,
        opacity,
    });
}

fn push_hand(
    commands: &mut Vec<RenderCommand>,
    layout: &IntroLayout,
    degrees: f64,
    hand: HandSpec,
    color: ThemeToken,
    opacity: f32,
) {
    let from = if hand.tail > 0.0 {
        layout.polar(degrees + 180.0, hand.tail)
    } else {
        layout.center
    };
    commands.push(RenderCommand::DrawLine {
        from,
        to: layout.polar(degrees, hand.length),
        color,
        width: hand.width * layout.scale,
        opacity,
    });
}

fn push_overlay(
    commands: &mut Vec<RenderCommand>,
    layout: &IntroLayout,
    frame: &IntroFrame,
    labels: &IntroLabels,
    presentation: &Presentation,
    layer: f32,
) {
    let cx = layout.center.x;
    let bottom = layout.face_bottom();
    let scale = layout.scale;
    let live = shown(frame.is_live) * layer;

    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("overlay"),
    });

    if let Some(time) = &frame.time_label {
        commands.push(RenderCommand::DrawText {
            position: Point::new(cx, bottom + TIME_LABEL_OFFSET * scale),
            text: SharedStr::from(time.as_str()),
            color: ThemeToken::TextSecondary,
            font_size: layout.font(14.0),
            align: TextAlign::Center,
            opacity: live,
        });
    }

    let name_y = bottom + NAME_OFFSET * scale;
    commands.push(RenderCommand::DrawText {
        position: Point::new(cx - 5.0 * scale, name_y),
        text: labels.first_name.clone(),
        color: ThemeToken::TextPrimary,
        font_size: layout.font(28.0),
        align: TextAlign::Right,
        opacity: live,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(cx + 5.0 * scale, name_y),
        text: labels.last_name.clone(),
        color: ThemeToken::TextSecondary,
        font_size: layout.font(28.0),
        align: TextAlign::Left,
        opacity: live,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(cx, bottom + TITLE_OFFSET * scale),
        text: labels.title.clone(),
        color: ThemeToken::TextMuted,
        font_size: layout.font(13.0),
        align: TextAlign::Center,
        opacity: live,
    });

    push_continue_hint(
        commands,
        layout,
        labels,
        presentation.now_ms,
        shown(frame.is_ready) * layer,
    );

    let skip = layout.skip_rect();
    let (skip_color, skip_opacity) = match (frame.skip_visible, presentation.skip_hovered) {
        (false, _) => (ThemeToken::SkipButton, 0.0),
        (true, false) => (ThemeToken::SkipButton, SKIP_OPACITY * layer),
        (true, true) => (ThemeToken::TextPrimary, layer),
    };
    commands.push(RenderCommand::DrawText {
        position: Point::new(skip.x + skip.w, skip.y + skip.h * 0.7),
        text: labels.skip.clone(),
        color: skip_color,
        font_size: layout.font(11.0),
        align: TextAlign::Right,
        opacity: skip_opacity,
    });

    commands.push(RenderCommand::EndGroup);
}

/// "Click or scroll" text above a bobbing scroll-mouse outline whose wheel
/// pulses in step with the bob.
fn push_continue_hint(
    commands: &mut Vec<RenderCommand>,
    layout: &IntroLayout,
    labels: &IntroLabels,
    now_ms: f64,
    opacity: f32,
) {
    let vp = &layout.viewport;
    let scale = layout.scale;
    let cx = layout.center.x;
    let rest_top = vp.y + vp.height - (EDGE_MARGIN + MOUSE_HEIGHT) * scale;

    commands.push(RenderCommand::DrawText {
        position: Point::new(cx, rest_top - (HINT_GAP + 6.0) * scale),
        text: labels.continue_hint.clone(),
        color: ThemeToken::TextMuted,
        font_size: layout.font(11.0),
        align: TextAlign::Center,
        opacity,
    });

    let wave = hint_wave(now_ms);
    let top = rest_top + HINT_BOB * wave * scale;
    commands.push(RenderCommand::DrawRoundedRect {
        rect: Rect::new(
            cx - MOUSE_WIDTH / 2.0 * scale,
            top,
            MOUSE_WIDTH * scale,
            MOUSE_HEIGHT * scale,
        ),
        corner_radius: MOUSE_WIDTH / 2.0 * scale,
        color: ThemeToken::TextMuted,
        width: scale,
        opacity,
    });
    let pulse = 1.0 - (1.0 - WHEEL_MIN_OPACITY) * wave as f32;
    commands.push(RenderCommand::DrawLine {
        from: Point::new(cx, top + MOUSE_WHEEL_TOP * scale),
        to: Point::new(cx, top + (MOUSE_WHEEL_TOP + MOUSE_WHEEL_LENGTH) * scale),
        color: ThemeToken::TextPrimary,
        width: MOUSE_WHEEL_WIDTH * scale,
        opacity: opacity * pulse,
    });
}
