//! Deferred effects fired after a fixed wall-clock delay.
//!
//! The queue keeps its own clock, advanced by the real elapsed time the host
//! reports, so a delay is measured in milliseconds and not in frames. Due
//! effects are handed back to the owner, which decides whether the world is
//! still in a state to accept them.

/// A state mutation scheduled for later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    AddScore(u32),
    GameOver,
}

#[derive(Clone, Debug)]
struct Pending {
    due_ms: f64,
    seq: u64,
    effect: Deferred,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    clock_ms: f64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since the scheduler was created.
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_scheduled(&self, effect: Deferred) -> bool {
        self.pending.iter().any(|p| p.effect == effect)
    }

    pub fn schedule(&mut self, delay_ms: f64, effect: Deferred) {
        let due_ms = self.clock_ms + delay_ms.max(0.0);
        tracing::trace!(?effect, due_ms, "deferred effect scheduled");
        self.pending.push(Pending {
            due_ms,
            seq: self.next_seq,
            effect,
        });
        self.next_seq += 1;
    }

    /// Move the clock forward and drain every effect now due, earliest first
    /// (ties keep scheduling order).
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<Deferred> {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.clock_ms += elapsed_ms;
        }

        let now = self.clock_ms;
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due_ms <= now);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.effect).collect()
    }

    /// Forget everything still pending.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
