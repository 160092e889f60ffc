use std::io;

use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use wavepeaks_lib::terminal::{render_waveform, FrameLayout, GlyphTable};
use wavepeaks_lib::{SampleStore, ViewRequest, WaveformError};

use crate::logging::{self, LogBuffer};
use crate::viewer::{CachedView, ViewerState};
use crate::{cli, controls, ui};

pub fn run(args: &ArgMatches, log_buffer: LogBuffer) -> Result<i32, WaveformError> {
    if let Some(code) = cli::bench::maybe_run_bench(args)? {
        return Ok(code);
    }

    match args.subcommand() {
        Some(("plot", sub)) => run_plot(sub),
        Some(("view", sub)) => run_view(sub, log_buffer),
        Some(("info", sub)) => run_info(sub),
        _ => run_json(args),
    }
}

fn input(args: &ArgMatches) -> Option<&str> {
    args.get_one::<String>("INPUT").map(String::as_str)
}

fn run_json(args: &ArgMatches) -> Result<i32, WaveformError> {
    let Some(file_path) = input(args) else {
        error!("No input file given");
        return Ok(1);
    };

    let request = ViewRequest {
        start: args.get_one::<f64>("start").copied().unwrap_or(0.0),
        end: args.get_one::<f64>("end").copied().unwrap_or(0.0),
        samples_per_pixel: args.get_one::<usize>("zoom").copied(),
        width: args.get_one::<usize>("width").copied(),
    };

    let store = SampleStore::load(file_path)?;
    let envelope = store.generate_view(&request)?;
    let json = if args.get_flag("compact") {
        envelope.to_json_compact()?
    } else {
        envelope.to_json()?
    };

    match args.get_one::<String>("output") {
        Some(output) => {
            std::fs::write(output, format!("{}\n", json))?;
            info!(
                "Wrote {} pixels ({} samples/pixel) to {}",
                envelope.length, envelope.samples_per_pixel, output
            );
        }
        None => println!("{}", json),
    }

    Ok(0)
}

#[cfg(feature = "plot")]
fn run_plot(args: &ArgMatches) -> Result<i32, WaveformError> {
    use wavepeaks_lib::plot::{hex_to_color, save_plot, ImageFormat, PlotConfig, PlotSpan};

    let (Some(file_path), Some(output)) = (input(args), args.get_one::<String>("OUTPUT")) else {
        error!("plot needs an input and an output path");
        return Ok(1);
    };
    ImageFormat::from_path(std::path::Path::new(output))?;

    let span = match args.get_one::<f64>("zoom-duration") {
        Some(&duration) => PlotSpan::ZoomDuration { duration },
        None => PlotSpan::Absolute {
            end: args.get_one::<f64>("end").copied().unwrap_or(0.0),
        },
    };
    let defaults = PlotConfig::default();
    let config = PlotConfig {
        width: args.get_one::<u32>("width").copied().unwrap_or(defaults.width),
        height: args.get_one::<u32>("height").copied().unwrap_or(defaults.height),
        background_color: args
            .get_one::<String>("background")
            .map(|hex| hex_to_color(hex))
            .unwrap_or(defaults.background_color),
        foreground_color: args
            .get_one::<String>("foreground")
            .map(|hex| hex_to_color(hex))
            .unwrap_or(defaults.foreground_color),
        show_timestamp_axis: !args.get_flag("no-timestamp"),
        hide_x_axis: args.get_flag("hide-x-axis"),
        hide_y_axis: args.get_flag("hide-y-axis"),
        title: args.get_one::<String>("title").cloned().unwrap_or_default(),
        start: args.get_one::<f64>("start").copied().unwrap_or(0.0),
        span,
        ..defaults
    }
    .with_resolution(args.get_one::<f64>("resolution").copied().unwrap_or(1.0));

    let store = SampleStore::load(file_path)?;
    save_plot(&store, output, &config)?;
    info!("Saved plot to {}", output);
    Ok(0)
}

#[cfg(not(feature = "plot"))]
fn run_plot(_args: &ArgMatches) -> Result<i32, WaveformError> {
    error!("Plotting requires the `plot` feature.");
    Ok(1)
}

#[derive(Serialize)]
struct InfoReport<'a> {
    path: &'a str,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
    frames: usize,
    duration_seconds: f64,
}

fn run_info(args: &ArgMatches) -> Result<i32, WaveformError> {
    let Some(file_path) = input(args) else {
        error!("No input file given");
        return Ok(1);
    };

    let store = SampleStore::load(file_path)?;
    let format = store.format();
    let report = InfoReport {
        path: file_path,
        sample_rate: format.sample_rate,
        channels: format.channel_count,
        bits_per_sample: format.bits_per_sample,
        frames: format.frame_count,
        duration_seconds: store.duration(),
    };

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("File:        {}", report.path);
        println!("Sample rate: {} Hz", report.sample_rate);
        println!("Channels:    {}", report.channels);
        println!("Bit depth:   {}", report.bits_per_sample);
        println!("Frames:      {}", report.frames);
        println!("Duration:    {:.3}s", report.duration_seconds);
    }

    Ok(0)
}

fn run_view(args: &ArgMatches, log_buffer: LogBuffer) -> Result<i32, WaveformError> {
    let Some(file_path) = input(args) else {
        error!("No input file given");
        return Ok(1);
    };

    let store = SampleStore::load(file_path)?;
    if store.format().frame_count == 0 {
        error!("{} contains no audio frames", file_path);
        return Ok(1);
    }
    let mut state = ViewerState::new(store.duration(), store.format().sample_rate);

    if args.get_flag("print") {
        let columns = args.get_one::<usize>("columns").copied().unwrap_or(80).max(1);
        let rows = args.get_one::<usize>("rows").copied().unwrap_or(12).max(1);
        let mut cache = CachedView::default();
        let envelope = cache.envelope(&store, &state, columns)?;
        let frame = render_waveform(
            envelope,
            &FrameLayout {
                width: columns,
                height: rows,
                start: state.start,
                end: state.end,
            },
            &state.markers,
            state.selected,
            &GlyphTable::default(),
        );
        print!("{}", frame.to_ansi_string());
        println!(
            "{}",
            controls::status_text(controls::StatusArgs {
                file: file_path,
                state: &state,
            })
            .text
        );
        return Ok(0);
    }

    let raw_mode = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    logging::set_echo_stderr(false);

    let result = view_loop(&mut terminal, &store, &mut state, file_path, &log_buffer);

    // Restore the terminal state before reporting anything.
    let _ = terminal.show_cursor();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show);
    drop(raw_mode);
    logging::set_echo_stderr(true);

    result.map(|_| 0)
}

fn view_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &SampleStore,
    state: &mut ViewerState,
    file_path: &str,
    log_buffer: &LogBuffer,
) -> Result<(), WaveformError> {
    let glyphs = GlyphTable::default();
    let mut cache = CachedView::default();

    loop {
        let (columns, rows) = ui::waveform_size(terminal.size()?);
        let columns = columns.max(1);
        let envelope = cache.envelope(store, state, columns)?;
        let frame = render_waveform(
            envelope,
            &FrameLayout {
                width: columns,
                height: rows,
                start: state.start,
                end: state.end,
            },
            &state.markers,
            state.selected,
            &glyphs,
        );
        let status = controls::status_text(controls::StatusArgs {
            file: file_path,
            state,
        });
        let log_lines = logging::snapshot(log_buffer);
        ui::draw_viewer(terminal, &frame, &status, &log_lines)?;

        if !controls::handle_key_event(state) {
            return Ok(());
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
