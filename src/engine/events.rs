//! Cross-cutting notifications
//!
//! The host page wants to know about scores, sound cues and achievements
//! without the games reaching into a shared global store. Rule-sets emit
//! into an `EventQueue` during their tick; the runner hands the queue to
//! an `EventBus` whose subscribers are injected at mount time (audio
//! trigger, toast service, hub HUD).

use serde::{Deserialize, Serialize};

use super::registry::GameId;

/// Sound cues the host audio service knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Fire,
    Kill,
    Hit,
    Eat,
    Flap,
    Score,
    Match,
    Mismatch,
    GameOver,
}

/// Achievement identifiers; the host toast service is keyed by integer IDs
pub mod achievements {
    /// First shooter kill
    pub const FIRST_BLOOD: u16 = 1;
    /// Snake score reached 50
    pub const SERPENT_50: u16 = 2;
    /// Flappy score reached 10
    pub const GLITCH_10: u16 = 3;
    /// Memory board cleared without a single mismatch
    pub const PERFECT_RECALL: u16 = 4;
    /// Any game: beat the stored high score
    pub const NEW_RECORD: u16 = 5;
}

/// A notification crossing the game/host boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArcadeEvent {
    ScoreChanged { score: u32 },
    LifeLost { remaining: u8 },
    SoundCue(Cue),
    AchievementUnlocked(u16),
    SessionEnded { game: GameId, score: u32, record: bool },
}

/// Events collected during one tick
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<ArcadeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: ArcadeEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ArcadeEvent> + '_ {
        self.events.drain(..)
    }

    #[cfg(test)]
    pub fn events(&self) -> &[ArcadeEvent] {
        &self.events
    }
}

type Subscriber = Box<dyn FnMut(&ArcadeEvent)>;

/// Dispatches queued events to injected subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&ArcadeEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Drain the queue, delivering each event to every subscriber in
    /// registration order
    pub fn publish(&mut self, queue: &mut EventQueue) {
        for event in queue.drain() {
            for subscriber in &mut self.subscribers {
                subscriber(&event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_delivers_in_order_and_drains() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = seen.clone();
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        let mut queue = EventQueue::new();
        queue.emit(ArcadeEvent::ScoreChanged { score: 10 });
        queue.emit(ArcadeEvent::SoundCue(Cue::Kill));
        bus.publish(&mut queue);

        assert!(queue.is_empty());
        assert_eq!(
            *seen.borrow(),
            vec![
                ArcadeEvent::ScoreChanged { score: 10 },
                ArcadeEvent::SoundCue(Cue::Kill),
            ]
        );
    }

    #[test]
    fn multiple_subscribers_each_see_every_event() {
        let a = Rc::new(RefCell::new(0));
        let b = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let (ca, cb) = (a.clone(), b.clone());
        bus.subscribe(move |_| *ca.borrow_mut() += 1);
        bus.subscribe(move |_| *cb.borrow_mut() += 1);

        let mut queue = EventQueue::new();
        queue.emit(ArcadeEvent::SoundCue(Cue::Flap));
        queue.emit(ArcadeEvent::SoundCue(Cue::Score));
        bus.publish(&mut queue);

        assert_eq!(*a.borrow(), 2);
        assert_eq!(*b.borrow(), 2);
    }
}
