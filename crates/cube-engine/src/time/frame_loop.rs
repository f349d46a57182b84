use anyhow::Result;

use crate::resource::ResourceScope;

use super::frame_clock::{Clock, TickGate, tick_interval_millis};

/// Window/event collaborator driven by the frame loop.
pub trait EventSource {
    /// Processes pending events without blocking.
    fn poll_events(&mut self);

    /// True once the user asked to close the window.
    fn should_close(&self) -> bool;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What a single loop iteration did.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Step {
    /// Events were polled but the next tick was not yet due.
    Idle,
    /// A tick was due and the render callback ran.
    Ticked,
    /// The close request was observed; the loop is stopped.
    Stopped,
}

/// Counters reported when the loop stops.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct LoopStats {
    pub iterations: u64,
    pub ticks: u64,
}

/// Fixed-minimum-interval driver.
///
/// Each iteration checks the close request, polls events, and runs the render
/// callback when more than the tick interval has passed since the previous
/// tick. Every tick runs inside its own child scope of `root`, closed before
/// the next iteration.
pub struct FrameLoop<C: Clock> {
    clock: C,
    gate: TickGate,
    state: LoopState,
    stats: LoopStats,
}

impl<C: Clock> FrameLoop<C> {
    /// Creates a loop ticking at most `target_hz` times per second.
    pub fn new(clock: C, target_hz: u32) -> Self {
        let gate = TickGate::new(clock.now_millis(), tick_interval_millis(target_hz));
        log::debug!("frame loop: target {target_hz} Hz, tick interval {:?}", gate.interval());
        Self {
            clock,
            gate,
            state: LoopState::Running,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Runs one iteration.
    pub fn step<E, F>(&mut self, events: &mut E, root: &ResourceScope, render: &mut F) -> Result<Step>
    where
        E: EventSource,
        F: FnMut(&mut ResourceScope) -> Result<()>,
    {
        if self.state == LoopState::Stopped {
            return Ok(Step::Stopped);
        }

        if events.should_close() {
            self.state = LoopState::Stopped;
            log::info!(
                "close requested after {} iterations, {} ticks",
                self.stats.iterations,
                self.stats.ticks
            );
            return Ok(Step::Stopped);
        }

        self.stats.iterations += 1;
        events.poll_events();

        if !self.gate.try_tick(self.clock.now_millis()) {
            return Ok(Step::Idle);
        }

        self.stats.ticks += 1;
        root.scoped(format!("tick {}", self.stats.ticks), |scope| render(scope))?;
        Ok(Step::Ticked)
    }

    /// Iterates until the event source requests close.
    ///
    /// An error from `render` stops the loop and is returned; the failing
    /// tick's scope is closed first.
    pub fn run<E, F>(&mut self, events: &mut E, root: &ResourceScope, mut render: F) -> Result<LoopStats>
    where
        E: EventSource,
        F: FnMut(&mut ResourceScope) -> Result<()>,
    {
        loop {
            match self.step(events, root, &mut render) {
                Ok(Step::Stopped) => return Ok(self.stats),
                Ok(_) => {}
                Err(e) => {
                    self.state = LoopState::Stopped;
                    return Err(e);
                }
            }
        }
    }
}
