//! helpdesk CLI: AnyState IT support chat in the terminal

use clap::{Parser, Subcommand};
use helpdesk_engine::{
    resolve_display_name, CallbackOutcome, CallbackPrompt, ChatMessage, Config, LogEvent,
    PasswdDirectory, ReplyResolver, Session, SessionError,
};
use helpdesk_tui::App;
use std::error::Error;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// AnyState IT support chat
#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: .helpdesk/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log file for the TUI (default: .helpdesk/helpdesk.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat window (default when no command specified)
    Tui,

    /// Answer a single question with the reply rules
    Ask {
        /// The question
        #[arg(required = true)]
        text: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the active reply rules
    Rules {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Line-based chat over stdin/stdout
    Chat,

    /// Write a default config file
    Init,
}

const LOG_FILE: &str = "helpdesk.log";

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let base = std::env::current_dir()?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Config::default_path(&base));

    match cli.command {
        None | Some(Commands::Tui) => {
            // The TUI owns the terminal, so logs go to a file
            let log_path = cli.log_file.clone().unwrap_or_else(|| {
                base.join(helpdesk_engine::config::HELPDESK_DIR)
                    .join(LOG_FILE)
            });
            init_logging(cli.verbose, Some(&log_path))?;
            cmd_tui(&config_path)
        }
        Some(Commands::Ask { text, json }) => {
            init_logging(cli.verbose, cli.log_file.as_deref())?;
            cmd_ask(&config_path, &text.join(" "), json)
        }
        Some(Commands::Rules { json }) => {
            init_logging(cli.verbose, cli.log_file.as_deref())?;
            cmd_rules(&config_path, json)
        }
        Some(Commands::Chat) => {
            init_logging(cli.verbose, cli.log_file.as_deref())?;
            cmd_chat(&config_path)
        }
        Some(Commands::Init) => {
            init_logging(cli.verbose, cli.log_file.as_deref())?;
            cmd_init(&config_path)
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the level.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

fn cmd_tui(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    let display_name =
        resolve_display_name(config.display_name.as_deref(), &PasswdDirectory::system());
    let app = App::new(&config, display_name)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(helpdesk_tui::run_tui(app))
}

fn cmd_ask(config_path: &Path, text: &str, json: bool) -> Result<(), Box<dyn Error>> {
    if text.trim().is_empty() {
        return Err(SessionError::EmptyMessage.into());
    }
    let resolver = Config::load_or_default(config_path)?.resolver()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ask_json(&resolver, text))?);
    } else {
        println!("{}", resolver.resolve(text));
    }
    Ok(())
}

/// Reply plus the rule that produced it (`null` for the fallback).
fn ask_json(resolver: &ReplyResolver, text: &str) -> serde_json::Value {
    serde_json::json!({
        "input": text,
        "rule": resolver.matched_rule(text).map(|rule| rule.name.as_str()),
        "reply": resolver.resolve(text),
    })
}

fn cmd_rules(config_path: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let resolver = Config::load_or_default(config_path)?.resolver()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolver)?);
        return Ok(());
    }

    println!("Reply Rules\n");
    for (i, rule) in resolver.rules().iter().enumerate() {
        let phrases = match &rule.trigger {
            helpdesk_engine::Trigger::Contains(phrase) => format!("\"{phrase}\""),
            helpdesk_engine::Trigger::ContainsAny(phrases) => phrases
                .iter()
                .map(|p| format!("\"{p}\""))
                .collect::<Vec<_>>()
                .join(" or "),
        };
        println!("{}. {} (contains {phrases})", i + 1, rule.name);
        println!("   {}", rule.response);
    }
    println!("\nFallback:\n   {}", resolver.fallback());
    Ok(())
}

fn cmd_chat(config_path: &Path) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(config_path)?;
    let display_name =
        resolve_display_name(config.display_name.as_deref(), &PasswdDirectory::system());
    let mut session = Session::with_options(config.session_options(display_name)?);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let mut err = io::stderr();
    run_chat(&mut session, &mut input, &mut out, &mut err)?;

    info!(session = %session.id(), messages = session.messages().len(), "Chat ended");
    Ok(())
}

/// Drive a session from lines of input until `/quit` or end of input.
fn run_chat<R, W, E>(
    session: &mut Session,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut log_rx = session.subscribe();

    // Appended before we subscribed
    for message in session.messages() {
        print_message(out, message)?;
    }
    writeln!(out, "Commands: /agent, /callback, /quit")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        match line.trim() {
            "/quit" => break,
            "/agent" => {
                if let Err(e) = session.connect_live_agent() {
                    writeln!(err, "Warning: {e}")?;
                }
            }
            "/callback" => {
                let mut prompt = LinePrompt {
                    input: &mut *input,
                    out: &mut *out,
                    err: &mut *err,
                };
                if session.request_callback(&mut prompt) == CallbackOutcome::Cancelled {
                    writeln!(out, "Callback cancelled.")?;
                }
            }
            _ => {
                if let Err(e) = session.submit(line) {
                    writeln!(err, "Warning: {e}")?;
                }
            }
        }

        while let Ok(LogEvent::Appended { message, .. }) = log_rx.try_recv() {
            print_message(out, &message)?;
        }
    }

    Ok(())
}

fn print_message<W: Write>(out: &mut W, message: &ChatMessage) -> io::Result<()> {
    writeln!(
        out,
        "[{}] {}: {}",
        message.timestamp(),
        message.sender(),
        message.text()
    )
}

/// Phone number prompt reading lines. An empty line or end of input cancels;
/// a blank number warns and asks again.
struct LinePrompt<'a, R, W, E> {
    input: &'a mut R,
    out: &'a mut W,
    err: &'a mut E,
}

impl<R: BufRead, W: Write, E: Write> CallbackPrompt for LinePrompt<'_, R, W, E> {
    fn collect(&mut self) -> CallbackOutcome {
        loop {
            let prompted = write!(
                self.out,
                "Please enter your phone number for a callback (empty line cancels): "
            )
            .and_then(|()| self.out.flush());
            if prompted.is_err() {
                return CallbackOutcome::Cancelled;
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return CallbackOutcome::Cancelled,
                Ok(_) => {}
            }
            let entry = line.trim_end_matches(['\r', '\n']);
            if entry.is_empty() {
                return CallbackOutcome::Cancelled;
            }

            match CallbackOutcome::from_input(entry) {
                Ok(outcome) => return outcome,
                Err(e) => {
                    if writeln!(self.err, "Warning: {e}").is_err() {
                        return CallbackOutcome::Cancelled;
                    }
                }
            }
        }
    }
}

fn cmd_init(config_path: &Path) -> Result<(), Box<dyn Error>> {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    Config::default().save(config_path)?;
    println!("Created {}", config_path.display());
    Ok(())
}
