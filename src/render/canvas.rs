//! Canvas2D backend
//!
//! Executes a `Frame` against the host page's canvas. The neon palette
//! lives here; the simulation only knows semantic tones.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCmd, Frame, Overlay, Tone};
use crate::settings::Settings;

fn css(tone: Tone) -> &'static str {
    match tone {
        Tone::Field => "#050507",
        Tone::Chrome => "#14331d",
        Tone::Player => "#00ff41",
        Tone::Enemy => "#ff2d78",
        Tone::Projectile => "#00e5ff",
        Tone::Pickup => "#ffc400",
        Tone::Text => "#e6ffe6",
        Tone::Danger => "#ff3b30",
    }
}

/// Tones that get a glow halo (unless reduced motion is on)
fn glows(tone: Tone) -> bool {
    matches!(
        tone,
        Tone::Player | Tone::Enemy | Tone::Projectile | Tone::Pickup
    )
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    settings: Settings,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, settings: Settings) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            settings,
        })
    }

    pub fn draw(&self, frame: &Frame) {
        let ctx = &self.ctx;
        let sx = self.canvas.width() as f64 / frame.width as f64;
        let sy = self.canvas.height() as f64 / frame.height as f64;

        ctx.save();
        let _ = ctx.scale(sx, sy);

        for cmd in &frame.cmds {
            self.draw_cmd(cmd, frame);
        }
        self.draw_hud(frame);
        self.draw_overlay(frame);

        ctx.restore();
    }

    fn set_tone(&self, tone: Tone) {
        self.ctx.set_fill_style_str(css(tone));
        if glows(tone) && !self.settings.reduced_motion {
            self.ctx.set_shadow_blur(10.0);
            self.ctx.set_shadow_color(css(tone));
        } else {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn draw_cmd(&self, cmd: &DrawCmd, frame: &Frame) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear => {
                self.set_tone(Tone::Field);
                ctx.fill_rect(0.0, 0.0, frame.width as f64, frame.height as f64);
            }
            DrawCmd::Rect { pos, size, tone } => {
                self.set_tone(*tone);
                ctx.fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::Circle {
                center,
                radius,
                tone,
            } => {
                self.set_tone(*tone);
                ctx.begin_path();
                let _ = ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            DrawCmd::Text {
                pos,
                size,
                tone,
                text,
            } => {
                self.set_tone(*tone);
                ctx.set_font(&format!("bold {size}px monospace"));
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
        }
    }

    fn draw_hud(&self, frame: &Frame) {
        let ctx = &self.ctx;
        ctx.set_shadow_blur(0.0);
        ctx.set_font("bold 11px monospace");
        ctx.set_text_baseline("top");

        ctx.set_text_align("left");
        ctx.set_fill_style_str(css(Tone::Player));
        let _ = ctx.fill_text(&frame.title, 6.0, 6.0);

        ctx.set_text_align("right");
        ctx.set_fill_style_str(css(Tone::Text));
        let right = frame.width as f64 - 6.0;
        let _ = ctx.fill_text(&format!("SCORE {}", frame.hud.score), right, 6.0);
        ctx.set_fill_style_str(css(Tone::Pickup));
        let _ = ctx.fill_text(&format!("BEST {}", frame.hud.high_score), right, 20.0);
        if let Some(lives) = frame.hud.lives {
            ctx.set_fill_style_str(css(Tone::Enemy));
            let _ = ctx.fill_text(&format!("LIVES {lives}"), right, 34.0);
        }
    }

    fn draw_overlay(&self, frame: &Frame) {
        let (w, h) = (frame.width as f64, frame.height as f64);
        let ctx = &self.ctx;
        if frame.overlay == Overlay::None {
            return;
        }

        ctx.set_shadow_blur(0.0);
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.72)");
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");

        let center = |ctx: &CanvasRenderingContext2d, text: &str, size: f64, dy: f64, tone| {
            ctx.set_font(&format!("bold {size}px monospace"));
            ctx.set_fill_style_str(css(tone));
            let _ = ctx.fill_text(text, w / 2.0, h / 2.0 + dy);
        };

        match frame.overlay {
            Overlay::None => {}
            Overlay::Start => {
                center(ctx, &frame.title, 22.0, -30.0, Tone::Player);
                center(ctx, "PRESS SPACE TO START", 14.0, 4.0, Tone::Text);
                center(ctx, "ARROWS / WASD TO MOVE", 10.0, 26.0, Tone::Chrome);
            }
            Overlay::Paused => {
                center(ctx, "PAUSED", 24.0, 0.0, Tone::Text);
            }
            Overlay::GameOver { score, record } => {
                center(ctx, "SYSTEM FAILURE", 24.0, -36.0, Tone::Danger);
                center(ctx, &format!("FINAL SCORE: {score}"), 14.0, -6.0, Tone::Text);
                if record {
                    center(ctx, "NEW RECORD", 14.0, 16.0, Tone::Pickup);
                }
                center(ctx, "PRESS SPACE TO REBOOT", 11.0, 40.0, Tone::Chrome);
            }
        }
    }
}
