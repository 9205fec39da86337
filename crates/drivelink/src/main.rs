mod session;

use std::fs;
use std::io::{self, IsTerminal, Read};

use clap::{Parser, Subcommand};
use console::style;
use crossterm::cursor::{MoveToColumn, MoveUp, RestorePosition, SavePosition};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Input, theme::ColorfulTheme};
use drivelink_clipboard::copy_to_clipboard;
use drivelink_config::{
    DriveLinkConfig, load_config, open_in_editor, resolve_copy, resolve_media_type,
    resolve_simple_output, set_config_value,
};
use drivelink_core::{ConversionResult, DriveLinkError, DriveLinkResult, MediaType};
use drivelink_url::DriveConverter;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::session::{Command, Session, until_reverted};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Parser)]
#[command(name = "drivelink")]
#[command(version, about = "Turn Google Drive share links into direct download links", long_about = None)]
struct Cli {
    /// Media type hint: png (image) or mp4 (video)
    #[arg(short, long, value_parser = parse_media_type)]
    media: Option<MediaType>,
    /// Read links from a file, one per line
    #[arg(short, long)]
    input: Option<String>,
    /// Copy the last converted link to the clipboard
    #[arg(long)]
    copy: bool,
    /// Print only the download link
    #[arg(long)]
    simple: bool,
    /// Print each result as a JSON line
    #[arg(long, conflicts_with = "simple")]
    json: bool,
    /// Prompt for links interactively
    #[arg(long)]
    interactive: bool,
    #[arg(value_name = "URL")]
    urls: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_media_type(value: &str) -> Result<MediaType, String> {
    value.parse().map_err(|err: DriveLinkError| err.to_string())
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Some(Commands::Config { action }) = cli.command {
        if let Err(err) = handle_config_command(action) {
            exit_with(err);
        }
        return;
    }

    let config = load_config().unwrap_or_else(|err| exit_with(err));
    let media_type = match cli.media {
        Some(media_type) => media_type,
        None => resolve_media_type(&config).unwrap_or_else(|err| exit_with(err)),
    };

    let urls = gather_inputs(&cli).unwrap_or_else(|err| exit_with(err));

    if cli.interactive || (urls.is_empty() && io::stdin().is_terminal()) {
        if let Err(err) = run_interactive(media_type) {
            exit_with(err);
        }
        return;
    }

    if urls.is_empty() {
        exit_with(DriveLinkError::InvalidInput("no input links provided".to_string()));
    }

    let options = OutputOptions {
        simple: cli.simple || resolve_simple_output(&config).unwrap_or_else(|err| exit_with(err)),
        json: cli.json,
        copy: cli.copy || resolve_copy(&config).unwrap_or_else(|err| exit_with(err)),
    };

    let failed = run_batch(&urls, media_type, &options);
    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_with(err: DriveLinkError) -> ! {
    eprintln!("{} {err}", style("Error:").red());
    std::process::exit(1);
}

struct OutputOptions {
    simple: bool,
    json: bool,
    copy: bool,
}

fn gather_inputs(cli: &Cli) -> DriveLinkResult<Vec<String>> {
    let mut urls = cli.urls.clone();

    if let Some(path) = &cli.input {
        let content = fs::read_to_string(path).map_err(|err| {
            DriveLinkError::Io(format!("failed to read input file '{path}': {err}"))
        })?;
        urls.extend(parse_lines(&content));
    }

    if urls.is_empty() && !cli.interactive && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| DriveLinkError::Io(format!("failed to read stdin: {err}")))?;
        urls.extend(parse_lines(&buffer));
    }

    debug!(count = urls.len(), "inputs gathered");
    Ok(urls)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Converts every input and prints the results. Returns the number of
/// inputs that produced no link.
fn run_batch(urls: &[String], media_type: MediaType, options: &OutputOptions) -> usize {
    let converter = DriveConverter;
    let mut converted = 0usize;
    let mut failed = 0usize;
    let mut last_output = None;

    for url in urls {
        let result = converter.convert_detailed(url, media_type);
        print_result(&result, options);
        match result.download_url {
            Some(output) => {
                converted += 1;
                last_output = Some(output);
            }
            None => failed += 1,
        }
    }

    if options.copy {
        match last_output {
            Some(output) => match copy_to_clipboard(&output) {
                Ok(_) => {
                    if !options.simple && !options.json {
                        println!("{} Copied to clipboard", style("✓").green());
                    }
                }
                Err(err) => eprintln!("{} {err}", style("Error:").red()),
            },
            None => eprintln!("{} nothing to copy", style("Warning:").yellow()),
        }
    }

    if !options.simple && !options.json {
        print_summary(converted + failed, converted, failed);
    }
    failed
}

fn print_result(result: &ConversionResult, options: &OutputOptions) {
    if options.json {
        match serde_json::to_string(result) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("{} failed to encode result: {err}", style("Error:").red()),
        }
        return;
    }

    if options.simple {
        // One line per non-blank input, empty for a miss.
        println!("{}", result.output());
        return;
    }

    println!("{} {}", style("From:").cyan(), result.source);
    match &result.download_url {
        Some(url) => {
            if let Some(file_id) = &result.file_id {
                println!("  {} {file_id}", style("File id:").dim());
            }
            println!("{} {url}", style("To:").green());
        }
        None => println!("{} (no download link)", style("To:").red()),
    }

    if let Some(warning) = &result.warning {
        println!("{} {warning}", style("Warning:").yellow());
    }

    println!();
}

fn run_interactive(media_type: MediaType) -> DriveLinkResult<()> {
    let theme = ColorfulTheme::default();
    let mut session = Session::new(media_type);
    let mut status_eraser: Option<JoinHandle<()>> = None;

    println!(
        "{} paste a Google Drive link. {} toggles png/mp4, {} copies, {} or empty line quits.",
        style("drivelink").bold().cyan(),
        style(":t").bold(),
        style(":c").bold(),
        style(":q").bold()
    );

    let outcome = loop {
        // The status line sits right above the prompt only until the next
        // line is entered, so an eraser from an earlier prompt is stale.
        if let Some(eraser) = status_eraser.take() {
            eraser.abort();
        }
        if let Some(status) = session.status() {
            println!("{} {status}", style("✓").green());
            let copied = session.copied_state();
            status_eraser = Some(tokio::spawn(async move {
                until_reverted(copied).await;
                if let Err(err) = erase_line_above() {
                    debug!(error = %err, "failed to clear copied status");
                }
            }));
        }

        let line = match Input::<String>::with_theme(&theme)
            .with_prompt(format!("Link [{}]", session.media_type().label()))
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(err) => break Err(DriveLinkError::Io(format!("prompt failed: {err}"))),
        };

        match Command::parse(&line) {
            Command::Quit => break Ok(()),
            Command::Convert(input) => {
                session.set_input(input);
                print_session_output(&session);
            }
            Command::Toggle => {
                session.toggle_media_type();
                println!(
                    "{} {}",
                    style("Media type:").cyan(),
                    session.media_type().label()
                );
                print_session_output(&session);
            }
            Command::Copy => match session.copy_to(&mut io::stdout()) {
                Ok(true) => {}
                Ok(false) => println!("{} nothing to copy", style("Warning:").yellow()),
                Err(err) => eprintln!("{} {err}", style("Error:").red()),
            },
        }
    };

    if let Some(eraser) = status_eraser.take() {
        eraser.abort();
    }
    outcome
}

/// Clears the line above the cursor without moving the cursor, so text
/// typed at the prompt stays where it is.
fn erase_line_above() -> io::Result<()> {
    execute!(
        io::stderr(),
        SavePosition,
        MoveUp(1),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        RestorePosition
    )
}

fn print_session_output(session: &Session) {
    let result = session.result();
    match &result.download_url {
        Some(url) => {
            println!("{} {url}", style("→").green());
            if let Some(warning) = &result.warning {
                println!("{} {warning}", style("Warning:").yellow());
            }
        }
        None => println!("{}", style("The generated link will appear here...").dim()),
    }
}

fn handle_config_command(action: ConfigAction) -> DriveLinkResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match config.get(&key) {
                Some(v) => println!("{key} = {v}"),
                None => println!("{key} = <null>"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!("{} Set {key} = {value}", style("✓").green());
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            print_config(&config);
            Ok(())
        }
        ConfigAction::Edit => open_in_editor(),
    }
}

fn print_config(config: &DriveLinkConfig) {
    println!("Current configuration:");
    let mut section = "";
    for key in DriveLinkConfig::KEYS {
        let Some((table, name)) = key.split_once('.') else {
            continue;
        };
        if table != section {
            println!("\n[{table}]");
            section = table;
        }
        let value = config.get(key).unwrap_or_else(|| "<null>".to_string());
        println!("{name} = {value}");
    }
}

fn print_summary(total: usize, converted: usize, failed: usize) {
    println!(
        "{} Total: {} | Converted: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        converted,
        failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lines_skips_blank_lines() {
        let lines = parse_lines("  https://a/d/x  \n\n\thttps://b/d/y\n");
        assert_eq!(lines, vec!["https://a/d/x", "https://b/d/y"]);
    }

    #[test]
    fn cli_parses_media_flag() {
        let cli = Cli::parse_from(["drivelink", "-m", "video", "--simple", "https://x/d/abc"]);
        assert_eq!(cli.media, Some(MediaType::Video));
        assert!(cli.simple);
        assert_eq!(cli.urls, vec!["https://x/d/abc"]);
    }

    #[test]
    fn cli_rejects_unknown_media() {
        assert!(Cli::try_parse_from(["drivelink", "--media", "gif"]).is_err());
        assert!(Cli::try_parse_from(["drivelink", "--simple", "--json"]).is_err());
    }

    #[test]
    fn batch_counts_failures() {
        let options = OutputOptions {
            simple: true,
            json: false,
            copy: false,
        };
        let urls = vec![
            "https://drive.google.com/file/d/abc/view".to_string(),
            "https://example.com/no-id-here".to_string(),
        ];
        assert_eq!(run_batch(&urls, MediaType::Image, &options), 1);
    }
}
