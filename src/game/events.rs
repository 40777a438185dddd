use std::sync::mpsc::{channel, Receiver, Sender};

/// Notifications sent by an [`Engine`][super::Engine] to its subscribers
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameEvent {
    /// A tick completed and the game is still going, or the game was paused
    /// or unpaused
    Updated,
    /// A new level began; the field may have grown
    LevelChanged { level: u32 },
    /// The snake crashed.  No further events follow.
    GameOver { score: u32 },
}

/// A list of channels to which every emitted value is sent.  Subscribers that
/// have dropped their receiver are forgotten on the next emit.
#[derive(Clone, Debug)]
pub(crate) struct Subscribers<T> {
    senders: Vec<Sender<T>>,
}

impl<T: Clone> Subscribers<T> {
    pub(crate) fn new() -> Subscribers<T> {
        Subscribers {
            senders: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self) -> Receiver<T> {
        let (sender, receiver) = channel();
        self.senders.push(sender);
        receiver
    }

    pub(crate) fn emit(&mut self, value: T) {
        self.senders.retain(|s| s.send(value.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

impl<T: Clone> Default for Subscribers<T> {
    fn default() -> Subscribers<T> {
        Subscribers::new()
    }
}
