use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use vvupload_core::session::SessionStatus;
use vvupload_core::uploader::HttpUploader;
use vvupload_core::{Error, FileEntry, SessionEvent, UploadFile};

use crate::cli::UploadArgs;
use crate::commands::common::load_uploader_config;
use crate::console::{finish_progress, format_entry_line, render_progress, ConsoleNotifier};
use crate::error::CliError;
use crate::probe::FfprobeDuration;

/// Keyboard command typed while an upload runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Cancel,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" | "resume" => Some(Self::TogglePause),
            "c" | "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Line-based controls read from an interactive stdin.
struct Controls {
    lines: Option<Lines<BufReader<Stdin>>>,
}

impl Controls {
    fn from_stdin() -> Self {
        let lines = std::io::stdin()
            .is_terminal()
            .then(|| BufReader::new(tokio::io::stdin()).lines());
        Self { lines }
    }

    /// Next recognized control. `None` once stdin is closed; after that the
    /// future never resolves.
    async fn next(&mut self) -> Option<Control> {
        loop {
            let Some(lines) = self.lines.as_mut() else {
                return std::future::pending().await;
            };
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(control) = Control::parse(&line) {
                        return Some(control);
                    }
                }
                Ok(None) | Err(_) => {
                    self.lines = None;
                    return None;
                }
            }
        }
    }
}

enum Step {
    Event(Option<SessionEvent>),
    Control(Option<Control>),
}

pub async fn run_upload(args: UploadArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let mut config = load_uploader_config(config_path)?;
    args.apply_to(&mut config);
    config.validate()?;

    let needs_probe = config.is_video() && config.limit_duration_secs.is_some();
    let mut uploader = HttpUploader::http(config, Arc::new(ConsoleNotifier))?;
    if needs_probe {
        uploader = uploader.with_duration_probe(Arc::new(FfprobeDuration::default()));
    }

    let mut controls = Controls::from_stdin();
    if controls.lines.is_some() && !args.json {
        eprintln!("Type p + Enter to pause or resume, c + Enter to cancel.");
    }

    let total = args.paths.len();
    let mut committed = Vec::new();
    for path in &args.paths {
        match upload_one(&mut uploader, &mut controls, path, args.json).await {
            Ok(Some(entry)) => {
                if !args.json {
                    println!("{}", format_entry_line(&entry));
                }
                committed.push(entry);
            }
            Ok(None) => {}
            Err(CliError::Core(Error::LimitReached(max))) => {
                eprintln!("{}: file limit reached ({max} max)", path.display());
                break;
            }
            Err(error) => eprintln!("{}: {error}", path.display()),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&committed)?);
    }

    let failed = total - committed.len();
    if failed > 0 {
        return Err(CliError::UploadsIncomplete { failed, total });
    }
    Ok(())
}

async fn upload_one(
    uploader: &mut HttpUploader,
    controls: &mut Controls,
    path: &Path,
    quiet: bool,
) -> Result<Option<FileEntry>, CliError> {
    let file = UploadFile::from_path(path).await?;
    let file_name = file.name.clone();
    uploader.select_file(file).await?;
    let key = uploader.snapshot().key.unwrap_or_default();
    tracing::debug!("Started {key}");

    loop {
        let paused = uploader.snapshot().status == SessionStatus::Paused;
        let step = tokio::select! {
            event = uploader.next_event(), if !paused => Step::Event(event),
            control = controls.next() => Step::Control(control),
        };

        match step {
            Step::Event(Some(SessionEvent::Progress(progress))) => {
                if !quiet {
                    render_progress(&file_name, &progress);
                }
            }
            Step::Event(Some(SessionEvent::TransferComplete { .. })) => {
                if !quiet {
                    finish_progress();
                    eprintln!("Resolving {key}...");
                }
            }
            Step::Event(Some(SessionEvent::Committed(entry))) => return Ok(Some(entry)),
            Step::Event(Some(SessionEvent::Discarded { key: discarded })) => {
                if discarded == key {
                    eprintln!("{file_name}: stored as {key} but no URL could be resolved");
                    return Ok(None);
                }
            }
            Step::Event(Some(SessionEvent::Failed { .. }) | None) => {
                if !quiet {
                    finish_progress();
                }
                return Ok(None);
            }
            Step::Control(Some(Control::TogglePause)) => {
                let status = uploader.toggle_pause()?;
                if !quiet {
                    finish_progress();
                    eprintln!("{file_name}: {status}");
                }
            }
            Step::Control(Some(Control::Cancel)) => {
                uploader.cancel();
                if !quiet {
                    finish_progress();
                }
                eprintln!("{file_name}: cancelled");
                return Ok(None);
            }
            Step::Control(None) => {
                if paused {
                    uploader.cancel();
                    eprintln!("{file_name}: input closed while paused, cancelled");
                    return Ok(None);
                }
            }
        }
    }
}
