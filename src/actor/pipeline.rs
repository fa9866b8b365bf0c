//! Output pipeline: compositor → lemonbar → click shell.
//!
//! ```text
//! render actor ──line──▶ [relay-renderer] ──stdin──▶ lemonbar
//!                                                      │ stdout (click commands)
//!                                [relay-shell] ◀───────┘
//!                                      │
//!                                      └──stdin──▶ sh
//! ```
//!
//! Both relays are fatal on failure: the bar is useless without either end.

use crate::config::BarConfig;
use crate::error::BarError;
use crate::process::CommandSpec;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Processes at both ends of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Reads markup lines on stdin, prints click commands on stdout.
    pub renderer: CommandSpec,
    /// Runs each click command line it reads.
    pub shell: CommandSpec,
}

impl PipelineConfig {
    /// Explicit renderer and shell commands.
    pub const fn new(renderer: CommandSpec, shell: CommandSpec) -> Self {
        Self { renderer, shell }
    }

    /// `lemonbar` configured from `config`, with `sh` as the click shell.
    pub fn lemonbar(config: &BarConfig) -> Self {
        let renderer = CommandSpec::new("lemonbar")
            .args(["-a", "32", "-n"])
            .arg(&config.wm_name)
            .arg("-g")
            .arg(format!("x{}", config.bar_height))
            .arg("-f")
            .arg(&config.bar_font)
            .arg("-F")
            .arg(config.palette.colour("DEFAULT_FG"))
            .arg("-B")
            .arg(config.palette.colour("DEFAULT_BG"));
        Self::new(renderer, CommandSpec::new("sh"))
    }
}

/// Copy every line from `lines` to `writer`, flushing after each.
///
/// Returns when every sender is gone.
pub fn forward_lines<W: Write>(lines: &Receiver<String>, mut writer: W) -> io::Result<u64> {
    let mut count = 0;
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        count += 1;
    }
    Ok(count)
}

/// Copy every line of `reader` to `writer`, flushing after each.
///
/// Returns the number of lines copied once `reader` hits end of file.
pub fn relay_lines<R: BufRead, W: Write>(reader: R, mut writer: W) -> io::Result<u64> {
    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        debug!(command = %line, "click");
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        count += 1;
    }
    Ok(count)
}

/// Running renderer and shell plus the relay threads between them.
#[derive(Debug)]
pub struct OutputPipeline {
    sender: Sender<String>,
    failures: Receiver<BarError>,
    renderer: Child,
    shell: Child,
    relays: Vec<JoinHandle<()>>,
}

impl OutputPipeline {
    /// Spawn the shell, then the renderer, then both relays.
    pub fn spawn(config: &PipelineConfig) -> Result<Self, BarError> {
        let mut shell = spawn_child(&config.shell, Stdio::inherit())?;
        let mut renderer = match spawn_child(&config.renderer, Stdio::piped()) {
            Ok(child) => child,
            Err(e) => {
                let _ = shell.kill();
                return Err(e);
            }
        };

        let (Some(shell_in), Some(renderer_in), Some(renderer_out)) = (
            shell.stdin.take(),
            renderer.stdin.take(),
            renderer.stdout.take(),
        ) else {
            let _ = shell.kill();
            let _ = renderer.kill();
            return Err(BarError::Relay {
                relay: "pipeline",
                source: io::Error::other("child pipes were not captured"),
            });
        };

        let (sender, lines) = unbounded::<String>();
        let (failure_tx, failures) = unbounded();

        let mut pipeline = Self {
            sender,
            failures,
            renderer,
            shell,
            relays: Vec::with_capacity(2),
        };

        let to_renderer = failure_tx.clone();
        let relay = spawn_relay("relay-renderer", move || {
            match forward_lines(&lines, renderer_in) {
                Ok(count) => debug!(count, "renderer relay drained"),
                Err(source) => report(&to_renderer, "renderer", source),
            }
        })?;
        pipeline.relays.push(relay);

        let relay = spawn_relay("relay-shell", move || {
            let source = match relay_lines(BufReader::new(renderer_out), shell_in) {
                Ok(count) => io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("renderer closed its output after {count} lines"),
                ),
                Err(e) => e,
            };
            report(&failure_tx, "shell", source);
        })?;
        pipeline.relays.push(relay);

        info!(
            renderer = config.renderer.program(),
            shell = config.shell.program(),
            "pipeline started"
        );
        Ok(pipeline)
    }

    /// A sink for the compositor: each line sent reaches the renderer.
    pub fn sink(&self) -> Sender<String> {
        self.sender.clone()
    }

    /// Fatal relay errors.
    pub const fn failures(&self) -> &Receiver<BarError> {
        &self.failures
    }
}

impl Drop for OutputPipeline {
    fn drop(&mut self) {
        let _ = self.renderer.kill();
        let _ = self.shell.kill();
        let _ = self.renderer.wait();
        let _ = self.shell.wait();
        for relay in self.relays.drain(..) {
            if relay.is_finished() {
                let _ = relay.join();
            }
        }
    }
}

fn spawn_child(spec: &CommandSpec, stdout: Stdio) -> Result<Child, BarError> {
    spec.command()
        .stdin(Stdio::piped())
        .stdout(stdout)
        .spawn()
        .map_err(|source| BarError::Spawn {
            program: spec.program().to_string(),
            source,
        })
}

fn spawn_relay<F>(name: &str, body: F) -> Result<JoinHandle<()>, BarError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|e| BarError::thread(name, e))
}

fn report(failures: &Sender<BarError>, relay: &'static str, source: io::Error) {
    error!(relay, error = %source, "relay failed");
    let _ = failures.send(BarError::Relay { relay, source });
}
