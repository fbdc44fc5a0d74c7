use anyhow::Context;
use clap::Parser;
use glyphrain::glyphs::GlyphSet;
use glyphrain::rendering::color::Color;
use glyphrain::rendering::surface::TerminalSurface;
use glyphrain::{
    AnimationDriver, Config, FrameWriter, RainError, TerminalScheduler, Viewport,
    install_panic_handler, seeds, terminal_cleanup, terminal_setup,
};
use std::fs::File;
use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Falling-glyph digital rain. Press q, Esc or Ctrl-C to quit.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of falling columns
    #[arg(short = 'n', long)]
    count: Option<usize>,
    /// Ticks per second (columns advance every other tick)
    #[arg(long)]
    fps: Option<u32>,
    /// Glyph size in virtual pixels
    #[arg(long)]
    font_size: Option<u32>,
    #[arg(long)]
    font_family: Option<String>,
    /// Alpha of the background wash, in (0, 1]. Lower values leave longer trails
    #[arg(long)]
    fade_rate: Option<f64>,
    /// Color of the newest glyph, e.g. `0,255,0` or `#00ff00`
    #[arg(long)]
    foreground: Option<Color>,
    /// Color glyphs are drawn in on the fading pass
    #[arg(long)]
    fade_color: Option<Color>,
    #[arg(long)]
    background: Option<Color>,
    /// Seed for a reproducible rain
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs to this file (the terminal is busy with the rain)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn build_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(count) = self.count {
            config.max_symbol_count = count;
        }
        if let Some(fps) = self.fps {
            config.frame_rate_per_second = fps;
        }
        if let Some(size) = self.font_size {
            config.symbol_font_size = size;
        }
        if let Some(family) = &self.font_family {
            config.symbol_font_family = family.clone();
        }
        if let Some(rate) = self.fade_rate {
            config.symbol_alpha_fade_rate = rate;
        }
        if let Some(color) = self.foreground {
            config.symbol_color_foreground = color;
        }
        if let Some(color) = self.fade_color {
            config.symbol_color_fade = color;
        }
        if let Some(color) = self.background {
            config.canvas_background_color = color;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    // stderr would draw over the alternate screen, so stay quiet unless asked
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Startup precondition: the rain needs an interactive terminal of known size.
fn check_surface(
    is_terminal: bool,
    size: io::Result<(usize, usize)>,
) -> glyphrain::Result<(usize, usize)> {
    if !is_terminal {
        return Err(RainError::SurfaceUnavailable("stdout is not a terminal".to_string()));
    }
    size.map_err(|err| RainError::SurfaceUnavailable(format!("cannot query terminal size: {err}")))
}

fn run(config: Config, seed: Option<u64>, cols: usize, rows: usize) -> anyhow::Result<()> {
    let cell_size = config.symbol_font_size;
    let surface = TerminalSurface::new(cols, rows, cell_size, FrameWriter::new());
    let viewport = Viewport::from_cells(cols, rows, cell_size);
    log::debug!("{cols}x{rows} cells, viewport {viewport:?}");

    let mut driver = AnimationDriver::new(
        config,
        GlyphSet::default(),
        surface,
        viewport,
        seeds::rng_for(seed, "rain"),
    )?;
    driver.run(&mut TerminalScheduler)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = args.build_config()?;

    let is_terminal = io::stdout().is_terminal();
    let (cols, rows) = check_surface(is_terminal, glyphrain::terminal_size())?;

    terminal_setup()?;
    install_panic_handler();

    let result = run(config, args.seed, cols, rows);
    let cleanup = terminal_cleanup();
    finish(result, cleanup)
}

/// Combines the run outcome with terminal cleanup. A run error wins over a cleanup error.
fn finish(result: anyhow::Result<()>, cleanup: io::Result<()>) -> anyhow::Result<()> {
    match (result, cleanup) {
        (Ok(()), cleanup) => cleanup.context("restoring the terminal"),
        (Err(err), cleanup) => {
            log::error!("rain stopped with an error: {err:#}");
            if let Err(cleanup_err) = cleanup {
                log::error!("failed to restore the terminal: {cleanup_err}");
                return Err(err.context(format!("also failed to restore the terminal: {cleanup_err}")));
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "glyphrain",
            "-n",
            "120",
            "--fps",
            "60",
            "--foreground",
            "#ff0000",
            "--seed",
            "7",
        ]);
        let config = args.build_config().unwrap();
        assert_eq!(config.max_symbol_count, 120);
        assert_eq!(config.frame_rate_per_second, 60);
        assert_eq!(config.symbol_color_foreground, Color::rgb(255, 0, 0));
        assert_eq!(config.symbol_font_size, 16);
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn invalid_flags_are_reported() {
        let args = Args::parse_from(["glyphrain", "--fade-rate", "0"]);
        assert!(args.build_config().is_err());
        assert!(Args::try_parse_from(["glyphrain", "--background", "nope"]).is_err());
    }

    #[test]
    fn surface_requires_a_terminal() {
        let not_tty = check_surface(false, Ok((80, 24)));
        assert!(matches!(not_tty, Err(RainError::SurfaceUnavailable(_))));

        let no_size = check_surface(true, Err(io::Error::other("no size")));
        assert!(matches!(no_size, Err(RainError::SurfaceUnavailable(_))));

        assert_eq!(check_surface(true, Ok((80, 24))).unwrap(), (80, 24));
    }

    #[test]
    fn run_error_survives_failed_cleanup() {
        let err = finish(
            Err(anyhow::anyhow!("surface broke")),
            Err(io::Error::other("tty gone")),
        )
        .unwrap_err();
        let chain: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();
        assert!(chain.iter().any(|cause| cause == "surface broke"));
        assert!(chain[0].contains("tty gone"));

        let err = finish(Ok(()), Err(io::Error::other("tty gone"))).unwrap_err();
        assert_eq!(err.to_string(), "restoring the terminal");

        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
