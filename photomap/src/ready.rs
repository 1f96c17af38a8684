use crate::error::PhotomapError;

type Subscriber<T> = Box<dyn FnOnce(&mut T) -> Result<(), PhotomapError>>;

/// Single-shot notification with an ordered list of subscribers.
///
/// Subscribers run synchronously in the order they were added, the first time the signal fires.
/// Firing again does nothing. If a subscriber fails, the ones after it are dropped without
/// running and the error is returned.
pub struct ReadySignal<T> {
    subscribers: Vec<(&'static str, Subscriber<T>)>,
    fired: bool,
}

impl<T> Default for ReadySignal<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            fired: false,
        }
    }
}

impl<T> ReadySignal<T> {
    /// Creates a signal with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber. Returns false, dropping the subscriber, if the signal already fired.
    pub fn subscribe(
        &mut self,
        name: &'static str,
        subscriber: impl FnOnce(&mut T) -> Result<(), PhotomapError> + 'static,
    ) -> bool {
        if self.fired {
            log::warn!("Subscriber `{name}` added after the ready signal fired, ignoring it");
            return false;
        }

        self.subscribers.push((name, Box::new(subscriber)));
        true
    }

    /// Runs all subscribers with the given target. Returns `Ok(false)` if the signal had already
    /// fired.
    pub fn fire(&mut self, target: &mut T) -> Result<bool, PhotomapError> {
        if self.fired {
            return Ok(false);
        }

        self.fired = true;
        for (name, subscriber) in std::mem::take(&mut self.subscribers) {
            log::trace!("Running ready subscriber `{name}`");
            subscriber(target)?;
        }

        Ok(true)
    }

    /// Drops all subscribers without running them. The signal will never fire after this.
    pub fn cancel(&mut self) {
        self.fired = true;
        self.subscribers.clear();
    }

    /// Returns true if the signal fired or was cancelled.
    pub fn is_done(&self) -> bool {
        self.fired
    }

    /// Names of the pending subscribers in the order they will run.
    pub fn pending(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.subscribers.iter().map(|(name, _)| *name)
    }
}
