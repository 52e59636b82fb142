//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use clock_intro_protocol::{Color, RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// Commands with zero opacity are skipped; groups become `<g>` elements.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:ui-monospace,monospace">"#,
    ));

    for cmd in commands {
        if cmd.opacity().is_some_and(|o| o <= 0.0) {
            continue;
        }
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                opacity,
            } => {
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" opacity="{opacity}"/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    resolve_color(*color),
                ));
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
                opacity,
            } => {
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{width}" stroke-linecap="round" opacity="{opacity}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    resolve_color(*color),
                ));
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                color,
                width,
                opacity,
            } => {
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="none" stroke="{}" stroke-width="{width}" opacity="{opacity}"/>"#,
                    center.x,
                    center.y,
                    resolve_color(*color),
                ));
            }
            RenderCommand::DrawRoundedRect {
                rect,
                corner_radius,
                color,
                width,
                opacity,
            } => {
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{corner_radius}" fill="none" stroke="{}" stroke-width="{width}" opacity="{opacity}"/>"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    resolve_color(*color),
                ));
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
                opacity,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}" opacity="{opacity}">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color),
                    escape_xml(text),
                ));
            }
            RenderCommand::BeginGroup { id } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken) -> String {
    css_rgba(token.default_color())
}

fn css_rgba(c: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(c.r),
        channel(c.g),
        channel(c.b),
        c.a
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clock_intro_protocol::{Point, SharedStr};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: SharedStr::from("face"),
            },
            RenderCommand::DrawLine {
                from: Point::new(140.0, 20.0),
                to: Point::new(140.0, 34.0),
                color: ThemeToken::Tick,
                width: 2.0,
                opacity: 1.0,
            },
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&commands, 280.0, 280.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<g id="face">"#));
        assert!(svg.contains("rgba(255,255,255,0.9)"));
    }

    #[test]
    fn skips_invisible_commands() {
        let commands = vec![RenderCommand::DrawCircle {
            center: Point::new(1.0, 1.0),
            radius: 3.0,
            color: ThemeToken::Pivot,
            width: 1.0,
            opacity: 0.0,
        }];
        assert!(!render_svg(&commands, 10.0, 10.0).contains("<circle"));
    }

    #[test]
    fn rounded_outline_is_unfilled() {
        let commands = vec![RenderCommand::DrawRoundedRect {
            rect: clock_intro_protocol::Rect::new(150.0, 376.0, 20.0, 32.0),
            corner_radius: 10.0,
            color: ThemeToken::TextMuted,
            width: 1.0,
            opacity: 1.0,
        }];
        let svg = render_svg(&commands, 320.0, 440.0);
        assert!(svg.contains(r#"rx="10" fill="none""#));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: SharedStr::from("R&D <dev>"),
            color: ThemeToken::TextPrimary,
            font_size: 12.0,
            align: TextAlign::Center,
            opacity: 1.0,
        }];
        let svg = render_svg(&commands, 100.0, 20.0);
        assert!(svg.contains("R&amp;D &lt;dev&gt;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }
}
