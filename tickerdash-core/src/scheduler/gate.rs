//! Per-output request tickets for last-request-wins delivery.

use std::collections::HashMap;

/// Issues monotonically increasing tickets and remembers the newest one per
/// output. A completion is delivered only if its ticket is still the newest
/// for the output it targets.
#[derive(Debug, Default)]
pub struct RequestGate {
    next: u64,
    latest: HashMap<String, u64>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket covering `outputs`, superseding any in-flight ticket.
    pub fn issue<'a, I>(&mut self, outputs: I) -> u64
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.next += 1;
        let ticket = self.next;
        for output in outputs {
            self.latest.insert(output.clone(), ticket);
        }
        ticket
    }

    /// Whether `ticket` is still the newest for `output`.
    pub fn is_current(&self, output: &str, ticket: u64) -> bool {
        self.latest.get(output) == Some(&ticket)
    }

    /// Supersede in-flight tickets without issuing a new request.
    pub fn invalidate<'a, I>(&mut self, outputs: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.next += 1;
        let tombstone = self.next;
        for output in outputs {
            self.latest.insert(output.clone(), tombstone);
        }
    }
}
