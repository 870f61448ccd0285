//! Frame model
//!
//! Rule-sets describe a frame; backends draw it. Building a frame never
//! mutates simulation state, and a frame built from a fresh or game-over
//! session is as valid as one mid-run. `Frame` compares by value so tests
//! can assert "paused means nothing moved".

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Semantic color roles; the backend maps them to the neon palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    /// Near-black field background
    Field,
    /// Faint grid lines / chrome
    Chrome,
    /// The player entity (neon green)
    Player,
    /// Hostile entities (neon pink)
    Enemy,
    /// Player projectiles (neon blue)
    Projectile,
    /// Collectibles: food, pipe gaps, revealed cards (amber)
    Pickup,
    /// HUD and overlay text
    Text,
    /// Game-over red
    Danger,
}

/// One draw instruction, in play-field pixel coordinates (+y down)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    Clear,
    Rect { pos: Vec2, size: Vec2, tone: Tone },
    Circle { center: Vec2, radius: f32, tone: Tone },
    Text { pos: Vec2, size: f32, tone: Tone, text: String },
}

/// Full-frame overlay state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Overlay {
    None,
    /// Idle: "press start" screen over an empty or frozen field
    Start,
    Paused,
    GameOver { score: u32, record: bool },
}

/// HUD line shown above the field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    /// None for games without lives (snake, memory)
    pub lives: Option<u8>,
}

/// Everything a backend needs to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub cmds: Vec<DrawCmd>,
    pub overlay: Overlay,
    pub hud: Hud,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            title: String::new(),
            cmds: vec![DrawCmd::Clear],
            overlay: Overlay::None,
            hud: Hud::default(),
        }
    }

    pub fn rect(&mut self, pos: Vec2, size: Vec2, tone: Tone) {
        self.cmds.push(DrawCmd::Rect { pos, size, tone });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, tone: Tone) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            tone,
        });
    }

    pub fn text(&mut self, pos: Vec2, size: f32, tone: Tone, text: impl Into<String>) {
        self.cmds.push(DrawCmd::Text {
            pos,
            size,
            tone,
            text: text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_frame_only_clears() {
        let frame = Frame::new(400.0, 300.0);
        assert_eq!(frame.cmds, vec![DrawCmd::Clear]);
        assert_eq!(frame.overlay, Overlay::None);
    }

    #[test]
    fn frames_compare_by_value() {
        let mut a = Frame::new(100.0, 100.0);
        let mut b = Frame::new(100.0, 100.0);
        a.rect(Vec2::ZERO, Vec2::new(5.0, 5.0), Tone::Player);
        b.rect(Vec2::ZERO, Vec2::new(5.0, 5.0), Tone::Player);
        assert_eq!(a, b);
        b.circle(Vec2::ONE, 2.0, Tone::Enemy);
        assert_ne!(a, b);
    }
}
