use clock_intro_protocol::{RenderCommand, TextAlign};
use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};

use crate::theme::{self, ThemeMode};

fn pos(offset: Pos2, x: f64, y: f64) -> Pos2 {
    Pos2::new(offset.x + x as f32, offset.y + y as f32)
}

fn rect(offset: Pos2, r: &clock_intro_protocol::Rect) -> Rect {
    Rect::from_min_size(pos(offset, r.x, r.y), egui::vec2(r.w as f32, r.h as f32))
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area. Commands
/// with zero opacity are skipped.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    for cmd in commands {
        if cmd.opacity().is_some_and(|o| o <= 0.0) {
            continue;
        }
        match cmd {
            RenderCommand::DrawRect {
                rect: r,
                color,
                opacity,
            } => {
                painter.rect_filled(
                    rect(offset, r),
                    CornerRadius::ZERO,
                    theme::resolve(*color, mode, *opacity),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
                opacity,
            } => {
                let stroke = Stroke::new(*width as f32, theme::resolve(*color, mode, *opacity));
                painter.line_segment([pos(offset, from.x, from.y), pos(offset, to.x, to.y)], stroke);
            }

            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                width,
                opacity,
            } => {
                let stroke = Stroke::new(*width as f32, theme::resolve(*color, mode, *opacity));
                painter.circle_stroke(pos(offset, center.x, center.y), *radius as f32, stroke);
            }

            RenderCommand::DrawRoundedRect {
                rect: r,
                corner_radius,
                color,
                width,
                opacity,
            } => {
                let radius = corner_radius.clamp(0.0, f64::from(u8::MAX)) as u8;
                painter.rect_stroke(
                    rect(offset, r),
                    CornerRadius::same(radius),
                    Stroke::new(*width as f32, theme::resolve(*color, mode, *opacity)),
                    StrokeKind::Inside,
                );
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                opacity,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    pos(offset, position.x, position.y),
                    anchor,
                    text.as_ref(),
                    FontId::monospace(size),
                    theme::resolve(*color, mode, *opacity),
                );
            }

            // Groups are semantic; no visual effect in egui
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clock_intro_protocol::{Point, ThemeToken};

    fn painted(commands: &[RenderCommand]) -> usize {
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            render_commands(&painter, commands, Pos2::ZERO, ThemeMode::Dark);
        });
        output.shapes.len()
    }

    fn pivot(opacity: f32) -> RenderCommand {
        RenderCommand::DrawCircle {
            center: Point::new(160.0, 140.0),
            radius: 3.0,
            color: ThemeToken::Pivot,
            width: 1.0,
            opacity,
        }
    }

    #[test]
    fn visible_commands_reach_the_painter() {
        let baseline = painted(&[]);
        assert_eq!(painted(&[pivot(1.0), pivot(0.5)]), baseline + 2);
    }

    #[test]
    fn invisible_commands_and_groups_paint_nothing() {
        let baseline = painted(&[]);
        let commands = [
            RenderCommand::BeginGroup {
                id: "face".into(),
            },
            pivot(0.0),
            RenderCommand::EndGroup,
        ];
        assert_eq!(painted(&commands), baseline);
    }
}
