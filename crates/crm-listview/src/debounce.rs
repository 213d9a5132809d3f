//! Debounced Search Term
//!
//! Clock-injected state machine: the caller feeds keystrokes with a
//! timestamp and polls when its timer fires. Only the term current at the
//! deadline is committed; superseded terms are dropped.

/// Default pause before a search term is committed
pub const DEFAULT_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    term: String,
    deadline_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u64,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Register a keystroke; restarts the window. An empty term goes
    /// through the same delay as any other.
    pub fn input(&mut self, term: &str, now_ms: u64) {
        self.pending = Some(Pending {
            term: term.to_string(),
            deadline_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// When the pending term becomes due, if any
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    /// Milliseconds left until the pending term is due
    pub fn remaining(&self, now_ms: u64) -> Option<u64> {
        self.deadline().map(|d| d.saturating_sub(now_ms))
    }

    /// Commit and return the pending term if its deadline has passed
    pub fn poll(&mut self, now_ms: u64) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .map(|p| now_ms >= p.deadline_ms)
            .unwrap_or(false);
        if !due {
            return None;
        }
        self.pending.take().map(|p| p.term)
    }

    /// Drop any pending term; nothing is emitted afterwards until new input
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed keystrokes at the given times, poll every millisecond
    fn run(keys: &[(u64, &str)], until: u64) -> Vec<(u64, String)> {
        let mut debouncer = Debouncer::new(300);
        let mut emitted = Vec::new();
        for now in 0..=until {
            for (at, term) in keys {
                if *at == now {
                    debouncer.input(term, now);
                }
            }
            if let Some(term) = debouncer.poll(now) {
                emitted.push((now, term));
            }
        }
        emitted
    }

    #[test]
    fn test_burst_emits_once_with_final_value() {
        let emitted = run(&[(0, "a"), (50, "ac"), (100, "acm"), (250, "acme")], 2000);
        assert_eq!(emitted, vec![(550, "acme".to_string())]);
    }

    #[test]
    fn test_two_pauses_emit_twice() {
        let emitted = run(&[(0, "ac"), (400, "acme")], 2000);
        assert_eq!(
            emitted,
            vec![(300, "ac".to_string()), (700, "acme".to_string())]
        );
    }

    #[test]
    fn test_clearing_waits_the_full_delay() {
        let emitted = run(&[(0, "acme"), (500, "")], 2000);
        assert_eq!(emitted, vec![(300, "acme".to_string()), (800, String::new())]);
    }

    #[test]
    fn test_cancel_prevents_emission() {
        let mut debouncer = Debouncer::new(300);
        debouncer.input("acme", 0);
        debouncer.cancel();
        assert_eq!(debouncer.poll(10_000), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut debouncer = Debouncer::new(300);
        assert_eq!(debouncer.remaining(0), None);
        debouncer.input("x", 100);
        assert_eq!(debouncer.remaining(250), Some(150));
        assert_eq!(debouncer.remaining(900), Some(0));
        assert_eq!(debouncer.poll(400), Some("x".to_string()));
        assert_eq!(debouncer.remaining(400), None);
    }
}
