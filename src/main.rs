//! lemonwheel - bspwm status bar for lemonbar
//!
//! Starts the stock widget set (desktops, title, network, battery, volume,
//! clock), renders the built-in per-monitor layout or a `--format` string,
//! and pipes the result through lemonbar into `sh` for click actions.

use clap::Parser;
use crossbeam_channel::{never, select, Receiver};
use lemonwheel::actor::layering::{self, LAYER_DELAY};
use lemonwheel::layout::{self, detect_monitors};
use lemonwheel::{
    BarConfig, BarError, BatteryWidget, BspwmWidget, ClockWidget, Compositor, NetworkWidget,
    OutputPipeline, Painter, PipelineConfig, RunningBar, Template, TitleWidget, VolumeWidget,
    WriterSink,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Threaded status bar for bspwm and lemonbar
#[derive(Parser, Debug)]
#[command(name = "lemonwheel")]
#[command(about = "Threaded status bar for bspwm and lemonbar")]
#[command(version)]
struct Args {
    /// JSON colour file (key → colour)
    #[arg(short, long)]
    colours: PathBuf,

    /// WM_NAME of the bar window
    #[arg(long, default_value = lemonwheel::config::DEFAULT_WM_NAME)]
    wm_name: String,

    /// Bar height in pixels
    #[arg(long, default_value_t = lemonwheel::config::DEFAULT_BAR_HEIGHT)]
    height: u32,

    /// Font passed to lemonbar
    #[arg(long, default_value = lemonwheel::config::DEFAULT_BAR_FONT)]
    font: String,

    /// Flat template with $(tag) and $(tag[N]) placeholders
    #[arg(short, long)]
    format: Option<String>,

    /// Network interfaces, highest priority first
    #[arg(long, num_args = 1.., default_values = ["enp0s25", "wlp3s0"])]
    interfaces: Vec<String>,

    /// Battery under /sys/class/power_supply
    #[arg(long, default_value = "BAT0")]
    battery: String,

    /// ALSA mixer control
    #[arg(long, default_value = "Master")]
    mixer: String,

    /// strftime format of the clock
    #[arg(long, default_value = ClockWidget::DEFAULT_FORMAT)]
    clock_format: String,

    /// Print lines to stdout instead of starting lemonbar
    #[arg(long)]
    stdout: bool,
}

fn main() -> ExitCode {
    if let Err(e) = lemonwheel::init_tracing() {
        eprintln!("lemonwheel: {e}");
    }

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bar stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), BarError> {
    let config = BarConfig::builder()
        .colour_file(&args.colours)
        .wm_name(&args.wm_name)
        .bar_height(args.height)
        .bar_font(&args.font)
        .build()?;
    info!(palette = config.palette.len(), wm_name = %config.wm_name, "configuration loaded");

    let template = match &args.format {
        Some(format) => Template::format(format.as_str()),
        None => layout::bar_layout(detect_monitors()),
    };
    let painter = Painter::new(Arc::new(config.palette.clone()));

    let compositor = Compositor::new(template, painter)
        .with_widget(layout::BSPWM, BspwmWidget::new())?
        .with_widget(layout::TITLE, TitleWidget::new())?
        .with_widget(layout::NETWORK, NetworkWidget::new(&args.interfaces))?
        .with_widget(layout::BATTERY, BatteryWidget::new(&args.battery))?
        .with_widget(layout::VOLUME, VolumeWidget::new(&args.mixer))?
        .with_widget(layout::CLOCK, ClockWidget::new(&args.clock_format))?;

    if args.stdout {
        let bar = compositor.run(WriterSink::new(io::stdout()))?;
        bar.redraw();
        return wait(&bar, &never());
    }

    let pipeline = OutputPipeline::spawn(&PipelineConfig::lemonbar(&config))?;
    let bar = compositor.run(pipeline.sink())?;
    bar.redraw();
    layering::spawn(config.wm_name.clone(), LAYER_DELAY)?;
    wait(&bar, pipeline.failures())
}

/// Block until the render actor or a pipeline relay reports a fatal error.
fn wait(bar: &RunningBar, pipeline: &Receiver<BarError>) -> Result<(), BarError> {
    let failure = select! {
        recv(bar.failures()) -> failure => failure,
        recv(pipeline) -> failure => failure,
    };
    failure.map_or(Ok(()), Err)
}
