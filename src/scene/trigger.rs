/// Debounced classification trigger.
///
/// Movement events arrive in bursts; classification cost scales with
/// entries x fan size, so bursts are coalesced into one trailing pass
/// after a quiescence window. The trigger is a polled deadline driven by
/// the host's event loop, with a re-entrancy guard so a pass cannot start
/// while another is running.

use std::time::{Duration, Instant};
use crate::error::Result;

/// Default quiescence window between the last movement event and the
/// pass it triggers.
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(200);

/// Single-slot trailing-edge debouncer.
///
/// # Example
///
/// ```no_run
/// use std::time::Instant;
/// use mesh_stream_engine::meshstream::scene::DebouncedTrigger;
///
/// let mut trigger = DebouncedTrigger::default();
/// trigger.notify(Instant::now());
/// // ... later, from the event loop:
/// trigger.fire_if_quiescent(Instant::now(), || {
///     // classify + reconcile
///     Ok(())
/// })?;
/// # Ok::<(), mesh_stream_engine::meshstream::Error>(())
/// ```
pub struct DebouncedTrigger {
    quiescence: Duration,
    deadline: Option<Instant>,
    in_flight: bool,
}

impl DebouncedTrigger {
    pub fn new(quiescence: Duration) -> Self {
        Self {
            quiescence,
            deadline: None,
            in_flight: false,
        }
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    /// Record a movement event.
    ///
    /// Resets the pending deadline; a burst of events collapses into one
    /// pass `quiescence` after the last of them.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiescence);
    }

    /// Whether a pass is pending (notified and not yet fired).
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Run `pass` if the quiescence window has elapsed since the last
    /// notify. Returns true if the pass ran.
    ///
    /// The in-flight guard refuses to start a pass while one is already
    /// running; an in-flight pass is never cancelled. A pass error is
    /// propagated after the guard is released.
    pub fn fire_if_quiescent<F>(&mut self, now: Instant, pass: F) -> Result<bool>
    where
        F: FnOnce() -> Result<()>,
    {
        match self.deadline {
            Some(deadline) if now >= deadline => {}
            _ => return Ok(false),
        }
        if self.in_flight {
            crate::engine_warn!(
                "meshstream::DebouncedTrigger",
                "Pass requested while another is in flight; skipping"
            );
            return Ok(false);
        }

        self.deadline = None;
        self.in_flight = true;
        let result = pass();
        self.in_flight = false;

        result.map(|()| true)
    }
}

impl Default for DebouncedTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_QUIESCENCE)
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
