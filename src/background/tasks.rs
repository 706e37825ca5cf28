use crate::{core::geo::LatLng, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Generation stamp handed out with every engine callback.
///
/// The controller bumps its generation on every mode transition; a
/// completion whose ticket predates the current generation is stale.
/// `seq` tells apart requests issued within one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub seq: u64,
}

/// Result of an engine callback, delivered back to the UI thread
#[derive(Debug)]
pub enum Completion {
    /// The engine finished its initial load
    Loaded { ticket: Ticket },
    /// A cluster expansion-zoom lookup resolved
    ClusterExpansion {
        ticket: Ticket,
        center: LatLng,
        result: Result<f64>,
    },
}

impl Completion {
    pub fn ticket(&self) -> Ticket {
        match self {
            Completion::Loaded { ticket } | Completion::ClusterExpansion { ticket, .. } => *ticket,
        }
    }
}

/// Cloneable handle callbacks use to report completions
#[derive(Debug, Clone)]
pub struct CompletionSender {
    sender: Sender<Completion>,
}

impl CompletionSender {
    /// Delivers a completion; a dropped queue means nobody is listening any more
    pub fn send(&self, completion: Completion) {
        let _ = self.sender.send(completion);
    }
}

/// Queue of pending completions plus the current generation
pub struct CompletionQueue {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    generation: u64,
    issued: u64,
}

impl CompletionQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            generation: 0,
            issued: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidates every ticket issued so far
    pub fn advance(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Stamps a new request with the current generation
    pub fn ticket(&mut self) -> Ticket {
        self.issued += 1;
        Ticket {
            generation: self.generation,
            seq: self.issued,
        }
    }

    pub fn sender(&self) -> CompletionSender {
        CompletionSender {
            sender: self.sender.clone(),
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Takes everything delivered so far, split into (current, stale)
    pub fn drain(&self) -> (Vec<Completion>, Vec<Completion>) {
        self.receiver
            .try_iter()
            .partition(|completion| self.is_current(completion.ticket()))
    }

    /// Puts drained but unhandled completions back for the next drain
    pub fn requeue(&self, completions: impl IntoIterator<Item = Completion>) {
        for completion in completions {
            let _ = self.sender.send(completion);
        }
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for CompletionQueue {
    fn default() -> Self {
        Self::new()
    }
}
