//! NEURAL NEXUS - memory matching
//!
//! A 4x4 board of glyph pairs. The cursor is the "player entity"; flipping
//! two cards is the collision check. A mismatch stays visible for a beat
//! before both cards hide again. Clearing the board ends the session.

use glam::{IVec2, Vec2};
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::engine::collision::cell_in_grid;
use crate::engine::events::{ArcadeEvent, Cue, EventQueue, achievements};
use crate::engine::game::{ArcadeGame, GameMetadata};
use crate::engine::input::{Action, TickInput};
use crate::engine::session::Session;
use crate::render::{Frame, Tone};

pub const COLS: i32 = 4;
pub const ROWS: i32 = 4;
pub const CARD_SIZE: f32 = 70.0;
pub const GUTTER: f32 = 10.0;
pub const TICK_MS: u32 = 100;
/// How long a mismatched pair stays visible
pub const REVEAL_MS: u32 = 900;
pub const MATCH_POINTS: u32 = 10;
/// Extra points per consecutive match beyond the first
pub const STREAK_BONUS: u32 = 5;

/// Tech-stack glyphs, two cards each
pub const GLYPHS: [&str; 8] = ["RS", "JS", "TS", "GO", "PY", "C#", "SQL", "GIT"];

const FIELD_EDGE: f32 = COLS as f32 * CARD_SIZE + (COLS + 1) as f32 * GUTTER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub glyph: u8,
    pub face: CardFace,
}

pub struct MemoryGame {
    /// Row-major 4x4
    pub cards: Vec<Card>,
    pub cursor: IVec2,
    pub first_pick: Option<usize>,
    /// Mismatched pair currently shown face-up
    pub pending_hide: Option<(usize, usize)>,
    pub hide_timer_ms: u32,
    pub streak: u32,
    pub mismatches: u32,
}

impl MemoryGame {
    pub fn new() -> Self {
        let cards = (0..(COLS * ROWS) as u8)
            .map(|i| Card {
                glyph: i / 2,
                face: CardFace::Hidden,
            })
            .collect();
        Self {
            cards,
            cursor: IVec2::ZERO,
            first_pick: None,
            pending_hide: None,
            hide_timer_ms: 0,
            streak: 0,
            mismatches: 0,
        }
    }

    fn index(cell: IVec2) -> usize {
        (cell.y * COLS + cell.x) as usize
    }

    fn cleared(&self) -> bool {
        self.cards.iter().all(|c| c.face == CardFace::Matched)
    }

    fn card_origin(cell: IVec2) -> Vec2 {
        Vec2::new(
            GUTTER + cell.x as f32 * (CARD_SIZE + GUTTER),
            GUTTER + cell.y as f32 * (CARD_SIZE + GUTTER),
        )
    }
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for MemoryGame {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            id: "neural-nexus",
            title: "NEURAL NEXUS",
            initial_lives: 0,
            storage_key: "neuralNexusHighScore",
            field_width: FIELD_EDGE,
            field_height: FIELD_EDGE,
        }
    }

    fn tick_interval_ms(&self, _session: &Session) -> u32 {
        TICK_MS
    }

    fn reset(&mut self, rng: &mut Pcg32) {
        *self = Self::new();
        self.cards.shuffle(rng);
    }

    fn tick(
        &mut self,
        session: &mut Session,
        input: &TickInput,
        _rng: &mut Pcg32,
        events: &mut EventQueue,
    ) {
        // A mismatched pair hides itself after the reveal window
        if let Some((a, b)) = self.pending_hide {
            self.hide_timer_ms = self.hide_timer_ms.saturating_sub(TICK_MS);
            if self.hide_timer_ms == 0 {
                self.cards[a].face = CardFace::Hidden;
                self.cards[b].face = CardFace::Hidden;
                self.pending_hide = None;
            }
        }

        if let Some(dir) = input.direction() {
            let next = self.cursor + dir.delta();
            if cell_in_grid(next, IVec2::new(COLS, ROWS)) {
                self.cursor = next;
            }
        }

        let flip = input.fired(Action::Fire) || input.fired(Action::Confirm);
        if !flip || self.pending_hide.is_some() {
            return;
        }

        let idx = Self::index(self.cursor);
        if self.cards[idx].face != CardFace::Hidden {
            return;
        }
        self.cards[idx].face = CardFace::Revealed;

        match self.first_pick.take() {
            None => self.first_pick = Some(idx),
            Some(first) => {
                if self.cards[first].glyph == self.cards[idx].glyph {
                    self.cards[first].face = CardFace::Matched;
                    self.cards[idx].face = CardFace::Matched;
                    self.streak += 1;
                    session.award(MATCH_POINTS + STREAK_BONUS * (self.streak - 1));
                    events.emit(ArcadeEvent::ScoreChanged {
                        score: session.score(),
                    });
                    events.emit(ArcadeEvent::SoundCue(Cue::Match));

                    if self.cleared() {
                        if self.mismatches == 0 {
                            events.emit(ArcadeEvent::AchievementUnlocked(
                                achievements::PERFECT_RECALL,
                            ));
                        }
                        session.finish();
                    }
                } else {
                    self.streak = 0;
                    self.mismatches += 1;
                    self.pending_hide = Some((first, idx));
                    self.hide_timer_ms = REVEAL_MS;
                    events.emit(ArcadeEvent::SoundCue(Cue::Mismatch));
                }
            }
        }
    }

    fn render(&self, _session: &Session, frame: &mut Frame) {
        // Cursor halo behind the card it sits on
        let halo = Self::card_origin(self.cursor) - Vec2::splat(3.0);
        frame.rect(
            halo,
            Vec2::splat(CARD_SIZE + 6.0),
            Tone::Projectile,
        );

        for y in 0..ROWS {
            for x in 0..COLS {
                let cell = IVec2::new(x, y);
                let card = self.cards[Self::index(cell)];
                let pos = Self::card_origin(cell);
                let tone = match card.face {
                    CardFace::Hidden => Tone::Chrome,
                    CardFace::Revealed => Tone::Pickup,
                    CardFace::Matched => Tone::Player,
                };
                frame.rect(pos, Vec2::splat(CARD_SIZE), tone);
                if card.face != CardFace::Hidden {
                    frame.text(
                        pos + Vec2::splat(CARD_SIZE / 2.0),
                        22.0,
                        Tone::Text,
                        GLYPHS[card.glyph as usize],
                    );
                }
            }
        }
    }
}
