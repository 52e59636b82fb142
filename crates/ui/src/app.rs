use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use clock_intro_core::machine::Lifecycle;
use clock_intro_core::render::{render_intro, IntroLayout, Presentation};
use clock_intro_core::{
    ClockIntroController, DismissInput, IntroConfig, IntroKey, LocalClock, PageScroll,
    QueuedScheduler, WallClock,
};
use clock_intro_protocol::{Point, Rect, Viewport};
use eframe::egui;

use crate::renderer;
use crate::theme::ThemeMode;

type Intro = ClockIntroController<QueuedScheduler, PageScroll, LocalClock>;

/// Build an intro over a page currently scrolled to `offset`.
fn new_intro(config: IntroConfig, offset: f32, completed: Rc<Cell<bool>>) -> Intro {
    ClockIntroController::new(
        config,
        QueuedScheduler::new(),
        PageScroll::at(f64::from(offset)),
        move || completed.set(true),
    )
}

fn intro_key(key: egui::Key) -> IntroKey {
    match key {
        egui::Key::Enter => IntroKey::Enter,
        egui::Key::Space => IntroKey::Space,
        egui::Key::Escape => IntroKey::Escape,
        _ => IntroKey::Other,
    }
}

/// Translate this frame's raw input into dismissal inputs. Pointer
/// positions are made relative to `origin`, the intro's top-left corner.
fn collect_inputs(
    input: &egui::InputState,
    origin: egui::Pos2,
    skip: Option<Rect>,
) -> Vec<DismissInput> {
    let mut inputs = Vec::new();
    if input.pointer.primary_clicked() {
        let on_skip = match (skip, input.pointer.interact_pos()) {
            (Some(skip), Some(p)) => skip.contains(Point::new(
                f64::from(p.x - origin.x),
                f64::from(p.y - origin.y),
            )),
            _ => false,
        };
        inputs.push(if on_skip {
            DismissInput::Skip
        } else {
            DismissInput::Click { on_control: false }
        });
    }
    if input.raw_scroll_delta.y != 0.0 {
        inputs.push(DismissInput::Wheel);
    }
    for event in &input.events {
        if let egui::Event::Key {
            key,
            pressed: true,
            repeat: false,
            ..
        } = event
        {
            inputs.push(DismissInput::Key(intro_key(*key)));
        }
    }
    inputs
}

/// Main application state: the intro while it runs, then the landing page.
pub struct PortfolioApp {
    config: IntroConfig,
    intro: Option<Intro>,
    /// Set by the intro's completion callback.
    completed: Rc<Cell<bool>>,
    /// Bumped on replay so the fade animation starts fresh.
    generation: u32,
    theme_mode: ThemeMode,
    /// Scroll position handed from the intro to the landing page.
    restore_offset: Option<f32>,
    /// Last observed landing page scroll position.
    landing_offset: f32,
}

impl PortfolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: IntroConfig) -> Self {
        // Use dark theme by default
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let mut app = Self {
            config,
            intro: None,
            completed: Rc::new(Cell::new(false)),
            generation: 0,
            theme_mode: ThemeMode::Dark,
            restore_offset: None,
            landing_offset: 0.0,
        };
        app.start_intro();
        app
    }

    fn start_intro(&mut self) {
        let completed = Rc::new(Cell::new(false));
        self.intro = Some(new_intro(
            self.config.clone(),
            self.landing_offset,
            Rc::clone(&completed),
        ));
        self.completed = completed;
        self.generation += 1;
    }

    fn finish_intro_if_done(&mut self) {
        if !self.completed.get() {
            return;
        }
        if let Some(mut intro) = self.intro.take() {
            intro.unmount();
            let offset = intro.scroll_host().offset;
            log::info!("intro complete, landing at scroll offset {offset}");
            self.restore_offset = Some(offset as f32);
        }
    }

    fn show_intro(&mut self, ctx: &egui::Context) {
        let now_ms = ctx.input(|i| i.time) * 1000.0;
        let mode = self.theme_mode;
        let layer_id = egui::Id::new(("intro_layer", self.generation));
        let Some(intro) = self.intro.as_mut() else {
            return;
        };

        // Pump before mounting so timer deadlines use egui's clock.
        intro.pump(now_ms);
        if intro.state().lifecycle == Lifecycle::Fresh {
            intro.mount();
        }

        let frame = intro.frame();
        let exit_s = (intro.config().exit_delay_ms / 1000.0) as f32;
        let layer = ctx.animate_bool_with_time(layer_id, !frame.is_complete, exit_s);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let viewport = Viewport::new(f64::from(rect.width()), f64::from(rect.height()));
                let skip = frame
                    .skip_visible
                    .then(|| IntroLayout::new(&viewport).skip_rect());
                let skip_hovered = skip.is_some_and(|skip| {
                    let hit = egui::Rect::from_min_size(
                        rect.min + egui::vec2(skip.x as f32, skip.y as f32),
                        egui::vec2(skip.w as f32, skip.h as f32),
                    );
                    ui.rect_contains_pointer(hit)
                });
                if skip_hovered {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }

                let presentation = Presentation {
                    layer_opacity: layer,
                    skip_hovered,
                    now_ms,
                };
                let commands =
                    render_intro(&frame, &viewport, &intro.config().labels, &presentation);
                renderer::render_commands(ui.painter(), &commands, rect.min, mode);

                for input in ui.input(|i| collect_inputs(i, rect.min, skip)) {
                    let outcome = intro.dismiss_at(input, now_ms);
                    if outcome.dismissed {
                        log::info!("intro dismissed by {input:?}");
                    }
                }
            });

        // The continue hint loops, so keep repainting once it shows.
        if intro.scheduler().has_pending_frame()
            || (frame.is_ready && !frame.is_complete)
            || (frame.is_complete && layer > 0.0)
        {
            ctx.request_repaint();
        } else if let Some(ms) = intro.next_timer_in() {
            ctx.request_repaint_after(Duration::from_secs_f64(ms / 1000.0));
        }
    }

    fn show_landing(&mut self, ctx: &egui::Context) {
        let labels = self.config.labels.clone();

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("{} {}", labels.first_name, labels.last_name));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.theme_mode {
                        ThemeMode::Dark => "Dark",
                        ThemeMode::Light => "Light",
                    };
                    if ui.button(theme_label).clicked() {
                        self.theme_mode = self.theme_mode.toggled();
                        ctx.set_visuals(self.theme_mode.visuals());
                    }
                    if ui.button("Replay intro").clicked() {
                        self.start_intro();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut area = egui::ScrollArea::vertical();
            if let Some(offset) = self.restore_offset.take() {
                area = area.vertical_scroll_offset(offset);
            }
            let output = area.show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 4.0);
                    ui.heading(labels.title.to_string());
                    ui.label(format!("Local time {}", LocalClock.now().label()));
                });
            });
            self.landing_offset = output.state.offset.y;
        });

        // Keep the clock in the landing view ticking.
        ctx.request_repaint_after(Duration::from_secs(1));
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.finish_intro_if_done();
        if self.intro.is_some() {
            self.show_intro(ctx);
        } else {
            self.show_landing(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissing_keys_map_to_intro_keys() {
        assert_eq!(intro_key(egui::Key::Enter), IntroKey::Enter);
        assert_eq!(intro_key(egui::Key::Space), IntroKey::Space);
        assert_eq!(intro_key(egui::Key::Escape), IntroKey::Escape);
        assert_eq!(intro_key(egui::Key::A), IntroKey::Other);
    }

    #[test]
    fn replay_returns_to_the_landing_scroll_position() {
        let completed = Rc::new(Cell::new(false));
        let mut intro = new_intro(IntroConfig::default(), 500.0, Rc::clone(&completed));
        intro.mount();
        assert!(intro.scroll_host().locked);
        assert_eq!(intro.scroll_host().offset, 500.0);

        intro.unmount();
        assert!(!intro.scroll_host().locked);
        assert_eq!(intro.scroll_host().offset, 500.0);
    }
}
