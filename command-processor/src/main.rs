//! Jarvis voice command console

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use command_processor::{
    build, classify, init_logging, AssistantConfig, CaptureEvent, ConsolePlayback, ListenOutcome,
    ScriptedCapture, SpeechCapture, Turn, UnavailableCapture, VoiceSession,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "jarvis", version)]
#[command(about = "Voice command console for the Jarvis assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Language tag, e.g. en-GB
    #[arg(short, long)]
    language: Option<String>,

    /// Do not speak responses
    #[arg(long)]
    no_voice: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console (default)
    Console {
        /// Replay transcripts from a file as speech capture, one utterance per line
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Delay between replayed words (milliseconds)
        #[arg(long, default_value_t = 150)]
        word_delay_ms: u64,
    },

    /// Classify an utterance and print the result as JSON
    Classify {
        /// Utterance text
        utterance: Vec<String>,
    },

    /// Print the response for an utterance
    Respond {
        /// Utterance text
        utterance: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Classify { utterance }) => {
            let classification = classify(&utterance.join(" "));
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        Some(Commands::Respond { utterance }) => {
            let classification = classify(&utterance.join(" "));
            println!("{}", build(classification.intent, &classification.payload));
        }
        Some(Commands::Console {
            transcript,
            word_delay_ms,
        }) => {
            run_console(config, transcript, Duration::from_millis(word_delay_ms)).await?;
        }
        None => {
            run_console(config, None, Duration::from_millis(150)).await?;
        }
    }

    Ok(())
}

/// Defaults, then config file, then environment, then command-line flags
fn load_config(cli: &Cli) -> Result<AssistantConfig> {
    let mut config = match &cli.config {
        Some(path) => AssistantConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AssistantConfig::default(),
    };

    config.apply_env().context("applying environment overrides")?;

    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    if cli.no_voice {
        config.voice_output = false;
    }

    config.validate()?;
    Ok(config)
}

async fn run_console(
    config: AssistantConfig,
    transcript: Option<PathBuf>,
    word_delay: Duration,
) -> Result<()> {
    let capture: Box<dyn SpeechCapture> = match transcript {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading transcript {}", path.display()))?;
            let lines = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect();
            Box::new(ScriptedCapture::new(lines, word_delay))
        }
        None => Box::new(UnavailableCapture),
    };

    let mut session = VoiceSession::new(config, capture, Box::new(ConsolePlayback::new()));
    let mut events: Option<mpsc::UnboundedReceiver<CaptureEvent>> = None;

    print_help();

    if session.capabilities().capture {
        events = listen(&mut session);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };

                match line.trim() {
                    ":quit" | ":q" => break,
                    ":listen" => events = listen(&mut session),
                    ":stop" => {
                        session.stop_listening();
                        events = None;
                    }
                    command if command.starts_with(':') => {
                        if let Err(e) = run_meta_command(&mut session, command) {
                            eprintln!("{}", e);
                        }
                    }
                    text => print_turn(&session.submit(text)),
                }
            }
            Some(event) = next_event(&mut events) => {
                if event == CaptureEvent::Ended {
                    events = None;
                }
                if let Some(turn) = session.handle_capture_event(event) {
                    print_turn(&turn);
                } else if let Some(interim) = session.interim() {
                    println!("  … {}", interim);
                }
            }
        }
    }

    session.stop_listening();
    info!(
        "Session ended after {} utterances",
        session.processor().stats().utterances_processed
    );

    Ok(())
}

fn listen(session: &mut VoiceSession) -> Option<mpsc::UnboundedReceiver<CaptureEvent>> {
    match session.start_listening() {
        ListenOutcome::Listening(rx) => {
            println!("(listening)");
            Some(rx)
        }
        ListenOutcome::Fallback(turn) => {
            print_turn(&turn);
            None
        }
    }
}

async fn next_event(events: &mut Option<mpsc::UnboundedReceiver<CaptureEvent>>) -> Option<CaptureEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn run_meta_command(session: &mut VoiceSession, command: &str) -> Result<()> {
    let mut parts = command.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some(":log"), _) => {
            for entry in session.processor().exchanges().iter() {
                println!("{:>9} [{}] {}", entry.role.to_string(), entry.intent, entry.text);
            }
        }
        (Some(":diag"), _) => {
            for diagnostic in session.processor().diagnostics().iter() {
                println!("{}", diagnostic);
            }
        }
        (Some(":status"), _) => {
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
        (Some(":lang"), Some(tag)) => session.set_language(tag)?,
        (Some(":voice"), Some("on")) => session.set_voice_output(true),
        (Some(":voice"), Some("off")) => session.set_voice_output(false),
        (Some(":help"), _) => print_help(),
        _ => bail!("Unknown command: {} (try :help)", command),
    }

    Ok(())
}

fn print_turn(turn: &Turn) {
    println!("Jarvis: {}", turn.response());
}

fn print_help() {
    println!("Jarvis console v{}", command_processor::VERSION);
    println!();
    println!("Type a command starting with \"Jarvis\", e.g. \"Jarvis, explain black holes\".");
    println!();
    println!("Console commands:");
    println!("  :listen        Start speech capture");
    println!("  :stop          Stop speech capture");
    println!("  :log           Show the exchange log");
    println!("  :diag          Show diagnostics");
    println!("  :status        Show session state as JSON");
    println!("  :lang <tag>    Select language (e.g. en-GB)");
    println!("  :voice on|off  Toggle spoken responses");
    println!("  :quit          Exit");
    println!();
}
