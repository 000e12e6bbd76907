//! Generation guard for asynchronous loads.
//!
//! A dialog that starts an async load hands out a [`LoadTicket`]. When the
//! dialog closes or starts another load the generation moves on, and any
//! response still carrying the old ticket is recognised as stale and dropped
//! instead of mutating state that no longer belongs to it.

/// Proof that a response belongs to a particular load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct LoadGuard {
    generation: u64,
    in_flight: Option<LoadTicket>,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding any load still in flight.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        self.in_flight = Some(ticket);
        ticket
    }

    /// Accept the response for `ticket` if it is the load in flight.
    ///
    /// Returns `false` for stale tickets; the caller must discard the
    /// response without touching its state.
    pub fn finish(&mut self, ticket: LoadTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            log::debug!(
                "dropping stale load response (generation {}, current {})",
                ticket.0,
                self.generation
            );
            false
        }
    }

    /// Forget the load in flight, e.g. because its dialog was closed.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_ticket_is_accepted_once() {
        let mut guard = LoadGuard::new();
        let ticket = guard.begin();
        assert!(guard.is_loading());
        assert!(guard.finish(ticket));
        assert!(!guard.is_loading());
        assert!(!guard.finish(ticket));
    }

    #[test]
    fn newer_load_supersedes_older() {
        let mut guard = LoadGuard::new();
        let first = guard.begin();
        let second = guard.begin();
        assert!(!guard.finish(first));
        assert!(guard.finish(second));
    }

    #[test]
    fn cancel_drops_response() {
        let mut guard = LoadGuard::new();
        let ticket = guard.begin();
        guard.cancel();
        assert!(!guard.is_loading());
        assert!(!guard.finish(ticket));
        assert!(guard.begin().generation() > ticket.generation());
    }
}
