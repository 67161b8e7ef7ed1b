use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use draftwise::ai::{Behavior, analyze_with_window};
use draftwise::config::{self, ConfigResult};
use draftwise::document::markdown::to_markdown;
use draftwise::notification::NotificationState;
use draftwise::{Document, DraftwiseError, EditorSession};

/// AI writing assistance for block-structured documents
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the context the assistant sees at a cursor block
    Analyze {
        /// Document JSON (array of blocks)
        document: PathBuf,
        /// Block the cursor is in
        #[arg(long)]
        cursor: String,
        /// Blocks before the cursor to include (defaults to the config value)
        #[arg(long)]
        window: Option<usize>,
    },
    /// Generate text at a cursor block and write the resulting document
    Generate {
        document: PathBuf,
        #[arg(long)]
        cursor: String,
        #[arg(long)]
        topic: String,
        /// rewrite, add, cursor or content_cursor
        #[arg(long, default_value = "add")]
        behavior: Behavior,
        /// Discard the generated text instead of accepting it
        #[arg(long)]
        revert: bool,
        /// Output file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the document as markdown
    Export { document: PathBuf },
}

fn main() -> Result<()> {
    // Writes to /tmp/draftwise-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    {
        use std::io::Write;

        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/draftwise-debug.log")?;

        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .format(|buf, record| {
                use std::time::SystemTime;
                let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
                writeln!(
                    buf,
                    "[{}] [{}] {}",
                    datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            })
            .init();

        log::debug!("=== DRAFTWISE SESSION STARTED ===");
    }

    color_eyre::install()?;

    let config_result = config::load_config();
    let args = Args::parse();

    match args.command {
        Command::Analyze {
            document,
            cursor,
            window,
        } => {
            show_config_warning(&mut NotificationState::new(), &config_result);
            analyze(&document, &cursor, window, &config_result)?
        }
        Command::Generate {
            document,
            cursor,
            topic,
            behavior,
            revert,
            output,
        } => generate(
            &document,
            &cursor,
            &topic,
            behavior,
            revert,
            output.as_deref(),
            config_result,
        )?,
        Command::Export { document } => {
            show_config_warning(&mut NotificationState::new(), &config_result);
            let document = load_document(&document)?;
            println!("{}", to_markdown(&document));
        }
    }

    #[cfg(debug_assertions)]
    log::debug!("=== DRAFTWISE SESSION ENDED ===");

    Ok(())
}

/// Config problems surface like any other notification
fn show_config_warning(notifications: &mut NotificationState, config_result: &ConfigResult) {
    let Some(warning) = &config_result.warning else {
        return;
    };
    notifications.show_warning(warning);
    if let Some(notification) = notifications.current() {
        eprintln!("{}", notification);
    }
}

fn load_document(path: &Path) -> Result<Document, DraftwiseError> {
    let json = fs::read_to_string(path).map_err(|source| DraftwiseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Document::from_json(&json)?)
}

fn analyze(
    path: &Path,
    cursor: &str,
    window: Option<usize>,
    config_result: &ConfigResult,
) -> Result<(), DraftwiseError> {
    let document = load_document(path)?;
    let window = window.unwrap_or(config_result.config.context.window);
    let context = analyze_with_window(&document, cursor, window)
        .ok_or_else(|| DraftwiseError::CursorNotFound(cursor.to_string()))?;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

fn generate(
    path: &Path,
    cursor: &str,
    topic: &str,
    behavior: Behavior,
    revert: bool,
    output: Option<&Path>,
    config_result: ConfigResult,
) -> Result<(), DraftwiseError> {
    let document = load_document(path)?;
    let mut session =
        EditorSession::connect(document.blocks().to_vec(), config_result.config.clone());
    show_config_warning(session.notifications_mut(), &config_result);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let cancel = CancellationToken::new();

    let result: Result<(), DraftwiseError> = runtime.block_on(async {
        session.generate(cursor, topic, behavior, &cancel).await?;
        if session.is_streaming() {
            session.reveal_now()?;
            if revert {
                session.revert()?;
            } else {
                session.accept()?;
            }
        }
        Ok(())
    });

    if let Some(notification) = session.notifications().current() {
        eprintln!("{}", notification);
    }
    result?;

    let json = session.into_document().to_json_pretty()?;
    match output {
        Some(path) => fs::write(path, json + "\n")?,
        None => println!("{}", json),
    }
    Ok(())
}
