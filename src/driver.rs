//! Fixed-rate frame loop
//!
//! One frame: poll input, merge spawn-timer firings, tick the simulation,
//! turn sim events into sound cues, draw, present, then wait for the next
//! frame slot.

use std::time::{Duration, Instant};

use crate::assets::AssetCatalog;
use crate::audio::{AudioSink, Cue, Track};
use crate::consts::*;
use crate::input::InputSource;
use crate::renderer::{Renderer, draw_frame};
use crate::sim::{GameEvent, InputEvent, SessionState, tick};

/// Recurring wave timer measured in simulated time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTimer {
    interval_ms: f64,
    elapsed_ms: f64,
}

impl Default for SpawnTimer {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL_MS)
    }
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms`, returning how many times the timer fired
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if self.interval_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            fired += 1;
        }
        fired
    }
}

/// Decides how long to wait between frames
pub trait Pacer {
    fn wait(&mut self);
}

/// Sleeps to hold a fixed frame period. Falls behind gracefully: if a frame
/// overruns by more than a period the schedule restarts from now.
#[derive(Debug, Clone)]
pub struct FixedPacer {
    period: Duration,
    next: Option<Instant>,
}

impl FixedPacer {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            next: None,
        }
    }
}

impl Pacer for FixedPacer {
    fn wait(&mut self) {
        let now = Instant::now();
        let deadline = self.next.unwrap_or(now + self.period);
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next = Some(deadline + self.period);
        } else if now - deadline > self.period {
            self.next = Some(now + self.period);
        } else {
            self.next = Some(deadline + self.period);
        }
    }
}

/// Runs frames back to back
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait(&mut self) {}
}

/// Totals for a run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub waves: u32,
    pub crashes: u32,
    pub skids: u32,
    pub refuels: u32,
    pub sessions: u32,
    /// Highest displayed score reached in any session
    pub best_score: u64,
}

/// Ties the simulation to its collaborators
pub struct FrameDriver<R: Renderer, I: InputSource, A: AudioSink> {
    state: SessionState,
    renderer: R,
    input: I,
    audio: A,
    catalog: AssetCatalog,
    timer: SpawnTimer,
    summary: RunSummary,
}

impl<R: Renderer, I: InputSource, A: AudioSink> FrameDriver<R, I, A> {
    /// Build the driver and start the background music
    pub fn new(
        state: SessionState,
        renderer: R,
        input: I,
        mut audio: A,
        catalog: AssetCatalog,
    ) -> Self {
        audio.play_looping(Track::Background, MUSIC_VOLUME);
        log::info!("Frame driver started (seed {})", state.seed);
        Self {
            state,
            renderer,
            input,
            audio,
            catalog,
            timer: SpawnTimer::default(),
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Run one frame. Returns false once quit has been requested.
    pub fn run_frame(&mut self) -> bool {
        let mut input = self.input.poll(&self.state);
        for _ in 0..self.timer.advance(TICK_MS) {
            input.events.push(InputEvent::SpawnWave);
        }

        tick(&mut self.state, &input);

        for event in self.state.take_events() {
            self.dispatch(event);
        }
        self.summary.frames += 1;
        self.summary.sessions = self.state.sessions;
        self.summary.best_score = self.summary.best_score.max(self.state.display_score());

        draw_frame(&mut self.renderer, &self.state, &self.catalog);
        self.renderer.present();

        self.state.running
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Crash => {
                self.summary.crashes += 1;
                self.audio.play_once(Cue::Explosion);
            }
            GameEvent::Skid => {
                self.summary.skids += 1;
                self.audio.play_once(Cue::Skid);
            }
            GameEvent::Refuel => self.summary.refuels += 1,
            GameEvent::WaveSpawned => self.summary.waves += 1,
            GameEvent::SessionReset | GameEvent::SceneChanged { .. } | GameEvent::Quit => {}
        }
    }

    /// Run until quit, or until `max_frames` frames have run
    pub fn run(&mut self, pacer: &mut impl Pacer, max_frames: Option<u64>) -> RunSummary {
        let start = self.summary.frames;
        loop {
            if max_frames.is_some_and(|max| self.summary.frames - start >= max) {
                log::info!("Frame limit reached");
                break;
            }
            if !self.run_frame() {
                break;
            }
            pacer.wait();
        }
        log::info!(
            "Run finished after {} frames, best score {}",
            self.summary.frames,
            self.summary.best_score
        );
        self.summary
    }
}
