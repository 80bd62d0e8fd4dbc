//! codechat CLI: Command-line interface for the coding assistant chat

use clap::{Parser, Subcommand, ValueEnum};
use codechat_engine::{
    format_message, CannedResponder, Config, ConfigError, Conversation, Segment, Session,
};
use codechat_tui::ThemeName;
use std::fmt::Display;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Coding assistant chat with a terminal UI
#[derive(Parser)]
#[command(name = "codechat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (default: .codechat/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Color theme for the TUI
    #[arg(long, global = true, value_enum, default_value_t = ThemeArg::Mocha)]
    theme: ThemeArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Ask one question and print the assistant's reply
    Ask {
        /// The question to ask
        question: String,

        /// Output the whole transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a message into prose and code segments
    Format {
        /// File to read (default: stdin)
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Mocha,
    Latte,
    HighContrast,
}

impl From<ThemeArg> for ThemeName {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Mocha => ThemeName::Mocha,
            ThemeArg::Latte => ThemeName::Latte,
            ThemeArg::HighContrast => ThemeName::HighContrast,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let tui_mode = matches!(cli.command, None | Some(Commands::Tui));

    if let Err(e) = init_logging(tui_mode, cli.log_file.as_deref()) {
        fail(format!("Failed to open log file: {e}"));
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            let rt = runtime();
            if let Err(e) = rt.block_on(codechat_tui::run_tui(&config, cli.theme.into())) {
                fail(e);
            }
        }
        Some(Commands::Ask { question, json }) => {
            cmd_ask(&config, &question, json);
        }
        Some(Commands::Format { file, json }) => {
            cmd_format(file.as_deref(), json);
        }
    }
}

/// Print `msg` to stderr and exit with status 1.
fn fail(msg: impl Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(format!("Failed to create tokio runtime: {e}")),
    }
}

/// Install the tracing subscriber.
///
/// Logs go to `log_file` when given. Otherwise headless commands log to
/// stderr and the TUI does not log at all, keeping the alternate screen clean.
fn init_logging(tui_mode: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if !tui_mode => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

/// Load the config named on the command line, or the default one if present.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (Config::default_path(Path::new(".")), false),
    };
    let config = if explicit {
        Config::load(&path)?
    } else {
        Config::load_or_default(&path)?
    };
    info!(
        path = %path.display(),
        explicit,
        latency_min_ms = config.latency_min_ms,
        latency_max_ms = config.latency_max_ms,
        "configuration loaded"
    );
    Ok(config)
}

fn cmd_ask(config: &Config, question: &str, json: bool) {
    let mut session = Session::new(
        Conversation::from_config(config),
        Arc::new(CannedResponder::from_config(config)),
    );

    debug!(session_id = session.conversation().session_id(), "asking");
    let rt = runtime();
    if !rt.block_on(session.send(question)) {
        fail("question is empty");
    }

    let conversation = session.into_conversation();
    info!(
        session_id = conversation.session_id(),
        messages = conversation.transcript().len(),
        "ask completed"
    );
    if json {
        match serde_json::to_string_pretty(conversation.transcript()) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(e),
        }
        return;
    }

    if let Some(reply) = conversation.transcript().last() {
        println!("{}", reply.content);
    }
}

fn cmd_format(file: Option<&Path>, json: bool) {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("Failed to read {}: {e}", path.display()))),
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                fail(format!("Failed to read stdin: {e}"));
            }
            buf
        }
    };

    let segments = format_message(&input);
    debug!(
        bytes = input.len(),
        segments = segments.len(),
        code_blocks = segments.iter().filter(|s| s.is_code()).count(),
        "message formatted"
    );
    if json {
        match serde_json::to_string_pretty(&segments) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(e),
        }
    } else {
        print!("{}", describe_segments(&segments));
    }
}

/// Human-readable listing of segments, one header per segment.
fn describe_segments(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        let header = match segment.language() {
            Some(language) => format!("── code ({language}) {}..{}", segment.span.start, segment.span.end),
            None => format!("── text {}..{}", segment.span.start, segment.span.end),
        };
        out.push_str(&header);
        out.push('\n');
        out.push_str(segment.text);
        if !segment.text.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["codechat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.theme, ThemeArg::Mocha);
    }

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from([
            "codechat",
            "ask",
            "what is jsx?",
            "--json",
            "--theme",
            "high-contrast",
        ])
        .unwrap();
        assert_eq!(cli.theme, ThemeArg::HighContrast);
        match cli.command {
            Some(Commands::Ask { question, json }) => {
                assert_eq!(question, "what is jsx?");
                assert!(json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_describe_segments() {
        let segments = format_message("Try:\n```python\nprint(1)\n```");
        let out = describe_segments(&segments);
        assert_eq!(out, "── text 0..5\nTry:\n── code (python) 5..27\nprint(1)\n");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_load_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"latency_min_ms": 5, "latency_max_ms": 9}"#).unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            load_config(Some(&path)).unwrap();
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("configuration loaded"));
        assert!(logs.contains("explicit=true"));
        assert!(logs.contains("latency_max_ms=9"));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"greeting": "Yo"}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.greeting, "Yo");
        assert_eq!(config, Config { greeting: "Yo".into(), ..Config::default() });
    }
}
