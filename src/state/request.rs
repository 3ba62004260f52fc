/// Request sequencing for pages that fetch asynchronously
///
/// Network calls cannot be cancelled once dispatched, so every fetch is
/// stamped with a ticket and responses carrying an older ticket than the
/// latest one issued are dropped instead of overwriting fresher state.

/// A sequence number handed out for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Monotonic ticket dispenser owned by a single page
#[derive(Debug, Default, Clone)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding every earlier one
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether a response stamped with `ticket` is still wanted
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// The most recently issued ticket, if any
    #[cfg(test)]
    pub fn latest(&self) -> Option<Ticket> {
        (self.latest > 0).then_some(Ticket(self.latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut seq = RequestSeq::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn test_latest_is_none_before_any_request() {
        let mut seq = RequestSeq::new();
        assert_eq!(seq.latest(), None);
        let ticket = seq.issue();
        assert_eq!(seq.latest(), Some(ticket));
    }
}
