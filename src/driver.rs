//! The animation loop.
//!
//! An [`AnimationDriver`] owns everything a running rain needs: the pool of falling
//! columns, the renderer, the surface and the random source. It alternates two kinds
//! of ticks:
//!
//! * even ticks advance every column and draw the pool in the fade color,
//! * odd ticks redraw the same, unadvanced pool in the bright foreground color.
//!
//! So columns move at half the tick rate, and the newest glyph of each column is
//! bright while the wash fades the older ones. Between ticks the driver presents the
//! surface and waits on a [`Scheduler`] until at least one frame interval has passed
//! since the previous tick started.

use crate::Viewport;
use crate::config::Config;
use crate::error::Result;
use crate::glyphs::GlyphSet;
use crate::rendering::renderer::RainRenderer;
use crate::rendering::surface::Surface;
use crate::simulation::Pool;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::Rng;
use rand::rngs::StdRng;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Things that can happen while a [`Scheduler`] waits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// The viewport changed to `cols` x `rows` cells.
    Resize { cols: u16, rows: u16 },
    /// The loop should stop before the next tick.
    Stop,
}

/// Delay primitive the driver waits on between ticks.
pub trait Scheduler {
    /// Blocks until `deadline` has passed, returning whatever happened in the meantime.
    ///
    /// Implementations may return early only when reporting [`SchedulerEvent::Stop`].
    fn wait_until(&mut self, deadline: Instant) -> io::Result<Vec<SchedulerEvent>>;
}

/// Plain sleeping scheduler without any event source.
#[derive(Debug, Default)]
pub struct SleepScheduler;

impl Scheduler for SleepScheduler {
    fn wait_until(&mut self, deadline: Instant) -> io::Result<Vec<SchedulerEvent>> {
        // sleep() may wake up early on some platforms, so loop until the deadline really passed
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(vec![]);
            }
            std::thread::sleep(remaining);
        }
    }
}

/// Waits by polling terminal events, so resizes and stop keys are seen while idle.
///
/// Raw mode swallows Ctrl-C, so Ctrl-C, `q` and Esc are reported as [`SchedulerEvent::Stop`].
#[derive(Debug, Default)]
pub struct TerminalScheduler;

impl TerminalScheduler {
    fn translate(event: Event) -> Option<SchedulerEvent> {
        match event {
            Event::Resize(cols, rows) => Some(SchedulerEvent::Resize { cols, rows }),
            Event::Key(key) if is_stop_key(&key) => Some(SchedulerEvent::Stop),
            _ => None,
        }
    }
}

fn is_stop_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
        _ => false,
    }
}

impl Scheduler for TerminalScheduler {
    fn wait_until(&mut self, deadline: Instant) -> io::Result<Vec<SchedulerEvent>> {
        let mut events = vec![];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(events);
            }
            if crossterm::event::poll(remaining)? {
                if let Some(event) = Self::translate(crossterm::event::read()?) {
                    events.push(event);
                    if event == SchedulerEvent::Stop {
                        return Ok(events);
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Set up, no tick has run yet.
    Idle,
    Running,
    /// The stop flag was observed; `run` returned.
    Stopped,
}

/// Owns a pool, a surface and a renderer and steps them through the two-pass animation.
pub struct AnimationDriver<S: Surface, R: Rng = StdRng> {
    config: Config,
    glyphs: GlyphSet,
    renderer: RainRenderer,
    surface: S,
    pool: Pool,
    rng: R,
    frame_number: u64,
    state: DriverState,
    stop: Arc<AtomicBool>,
}

impl<S: Surface, R: Rng> AnimationDriver<S, R> {
    /// Validates `config`, prepares `surface` for `viewport` and fills the pool.
    pub fn new(
        config: Config,
        glyphs: GlyphSet,
        mut surface: S,
        viewport: Viewport,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let renderer = RainRenderer::new(&config);
        renderer.prepare(&mut surface, viewport);
        let pool = Pool::new(
            config.max_symbol_count,
            config.symbol_font_size,
            viewport,
            &glyphs,
            &mut rng,
        );

        Ok(Self {
            config,
            glyphs,
            renderer,
            surface,
            pool,
            rng,
            frame_number: 0,
            state: DriverState::Idle,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// A flag that stops [`run`](Self::run) before its next tick once set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Runs one tick: advance and fade pass on even frames, bright pass on odd frames.
    pub fn tick(&mut self) {
        self.state = DriverState::Running;
        if self.frame_number % 2 == 0 {
            let viewport = self.surface.viewport();
            self.pool = self.pool.advance_all(
                self.config.symbol_font_size,
                viewport,
                &self.glyphs,
                &mut self.rng,
            );
            self.renderer.render_frame(
                &mut self.surface,
                self.pool.positions(),
                self.config.symbol_color_fade,
            );
        } else {
            self.renderer.render_frame(
                &mut self.surface,
                self.pool.positions(),
                self.config.symbol_color_foreground,
            );
        }
        self.frame_number += 1;
    }

    /// Follows a viewport change. Columns keep their positions.
    pub fn resize(&mut self, viewport: Viewport) {
        log::info!("viewport resized to {}x{} px", viewport.width, viewport.height);
        self.renderer.on_resize(&mut self.surface, viewport);
    }

    /// Ticks until stopped, at most once per frame interval.
    ///
    /// Every tick is presented before waiting. Waiting is measured from the start of the
    /// tick, and a late tick never shortens the next wait, so ticks are always at least one
    /// frame interval apart.
    pub fn run(&mut self, scheduler: &mut impl Scheduler) -> Result<()> {
        let interval = self.config.frame_interval();
        log::info!(
            "starting rain: {} columns, {} ticks/s, font {}",
            self.config.max_symbol_count,
            self.config.frame_rate_per_second,
            self.renderer.font()
        );

        let mut slowest = Duration::ZERO;
        while !self.stop.load(Ordering::Relaxed) {
            let started = Instant::now();
            self.tick();
            self.surface.present()?;
            slowest = slowest.max(started.elapsed());

            for event in scheduler.wait_until(started + interval)? {
                match event {
                    SchedulerEvent::Resize { cols, rows } => self.resize(Viewport::from_cells(
                        cols as usize,
                        rows as usize,
                        self.config.symbol_font_size,
                    )),
                    SchedulerEvent::Stop => self.stop(),
                }
            }
        }

        self.state = DriverState::Stopped;
        log::info!(
            "stopped after {} ticks (slowest tick {:?})",
            self.frame_number,
            slowest
        );
        Ok(())
    }
}
