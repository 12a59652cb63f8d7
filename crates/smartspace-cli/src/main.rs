//! smartspace: manage spaces and import attachments from the command line.

mod config;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use smartspace_db::{Database, PoolConfig};
use smartspace_ingest::{
    Attachment, DeletionIssue, DeletionReport, ImportReport, IngestConfig, SmartSpace, SourceFile, Space,
    SpaceMode, SpaceType,
};

use crate::config::{parse_bool_env, AppConfig};

#[derive(Parser)]
#[command(name = "smartspace")]
#[command(author, version, about = "Spaces and English-only attachments")]
#[command(propagate_version = true)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, show, or delete spaces
    Space {
        #[command(subcommand)]
        command: SpaceCommand,
    },

    /// Import files into a space
    Import {
        space_id: Uuid,

        /// Files to import
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Declared MIME type applied to every file
        #[arg(long)]
        mime: Option<String>,
    },

    /// Save pasted text into a space (reads stdin when TEXT is omitted)
    Paste { space_id: Uuid, text: Option<String> },

    /// List or delete attachments
    Attachments {
        #[command(subcommand)]
        command: AttachmentCommand,
    },
}

#[derive(Subcommand)]
enum SpaceCommand {
    /// Create a space
    Create {
        name: String,

        /// learning, work, personal, or other
        #[arg(long = "type", default_value = "learning")]
        space_type: SpaceType,

        /// on-device or private-cloud-compute
        #[arg(long, default_value = "private-cloud-compute")]
        mode: SpaceMode,
    },

    /// List spaces, newest first
    List,

    /// Show a space with its blocks and attachments
    Show { id: Uuid },

    /// Delete a space and all of its attachments
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum AttachmentCommand {
    /// List a space's attachments, newest first
    List { space_id: Uuid },

    /// Delete attachments by id
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<Uuid>,
    },
}

/// Initialize tracing on stderr (or a daily-rotated file).
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "smartspace=info")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = parse_bool_env("LOG_ANSI");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "smartspace=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("smartspace.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(log_ansi.unwrap_or(false)),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<SmartSpace> {
    let db = Database::connect_with_config(
        &config.database_url,
        PoolConfig::new().max_connections(config.max_connections),
    )
    .await
    .context("connecting to the database")?;
    db.migrate().await.context("applying schema")?;
    db.pool_status().log();

    let ingest = IngestConfig::new(&config.data_dir).with_cmd_timeout_secs(config.cmd_timeout_secs);
    info!(
        subsystem = "cli",
        data_dir = %config.data_dir.display(),
        "SmartSpace ready"
    );

    let spaces = Arc::new(db.spaces);
    let attachments = Arc::new(db.attachments);
    Ok(SmartSpace::new(&ingest, spaces, attachments))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::from_env();
    let app = connect(&config).await?;
    let json = cli.json;

    match cli.command {
        Commands::Space { command } => match command {
            SpaceCommand::Create {
                name,
                space_type,
                mode,
            } => {
                let space = app.spaces.create(&name, space_type, mode).await?;
                print_space(&space, json)?;
            }
            SpaceCommand::List => {
                let spaces = app.spaces.list().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&spaces)?);
                } else {
                    for space in &spaces {
                        println!(
                            "{}  {}  ({}, {})",
                            space.id,
                            space.name,
                            space.space_type.label(),
                            space.mode.label()
                        );
                    }
                }
            }
            SpaceCommand::Show { id } => {
                let space = app.spaces.get(id).await?;
                let blocks = app.spaces.blocks(id).await?;
                let attachments = app.attachments(id).await?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "space": space,
                            "blocks": blocks,
                            "attachments": attachments,
                        }))?
                    );
                } else {
                    print_space(&space, false)?;
                    for block in &blocks {
                        println!("  [{}] {}", block.kind, block.title);
                    }
                    print_attachments(&app, &attachments).await?;
                }
            }
            SpaceCommand::Delete { id } => {
                let report = app.spaces.delete(id).await?;
                print_deletion(&report, json)?;
            }
        },

        Commands::Import {
            space_id,
            files,
            mime,
        } => {
            let sources = files
                .into_iter()
                .map(|path| {
                    let source = SourceFile::new(path);
                    match &mime {
                        Some(m) => source.with_mime(m.clone()),
                        None => source,
                    }
                })
                .collect();
            let report = app.importer.import_files(space_id, sources).await?;
            print_import(&report, json)?;
            if !report.all_admitted() {
                return Ok(ExitCode::from(2));
            }
        }

        Commands::Paste { space_id, text } => {
            let mut buffer = match text {
                Some(t) => t,
                None => {
                    let mut input = String::new();
                    std::io::stdin()
                        .read_to_string(&mut input)
                        .context("reading stdin")?;
                    input
                }
            };
            match app.importer.save_pasted_buffer(space_id, &mut buffer).await {
                Ok(attachment) => print_attachment(&attachment, json)?,
                Err(e) if e.is_rejection() => {
                    eprintln!("{}", e.user_message());
                    return Ok(ExitCode::from(2));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Attachments { command } => match command {
            AttachmentCommand::List { space_id } => {
                let attachments = app.attachments(space_id).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&attachments)?);
                } else {
                    print_attachments(&app, &attachments).await?;
                }
            }
            AttachmentCommand::Delete { ids } => {
                let report = app.lifecycle.delete_many_by_id(&ids).await;
                print_deletion(&report, json)?;
                if !report.record_errors.is_empty() {
                    return Ok(ExitCode::FAILURE);
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn print_space(space: &Space, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(space)?);
    } else {
        println!("{}  {}", space.id, space.name);
        println!("  type: {}", space.space_type.label());
        println!("  mode: {}", space.mode.label());
        println!("  created: {}", space.created_at.to_rfc3339());
    }
    Ok(())
}

fn print_attachment(attachment: &Attachment, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(attachment)?);
    } else {
        println!(
            "{}  {}  {}",
            attachment.id,
            attachment.original_file_name,
            attachment.language_description()
        );
    }
    Ok(())
}

async fn print_attachments(app: &SmartSpace, attachments: &[Attachment]) -> anyhow::Result<()> {
    for a in attachments {
        let missing = !app.storage().exists(&a.stored_file_name).await?;
        println!(
            "{}  {}  {}  {}{}",
            a.id,
            a.original_file_name,
            a.language_description(),
            a.added_at.format("%Y-%m-%d %H:%M"),
            if missing { "  [file missing]" } else { "" }
        );
    }
    Ok(())
}

fn print_import(report: &ImportReport, json: bool) -> anyhow::Result<()> {
    if json {
        let items: Vec<_> = report
            .items
            .iter()
            .map(|item| match &item.outcome {
                Ok(a) => json!({
                    "source": item.source,
                    "status": "admitted",
                    "attachment": a,
                }),
                Err(e) => json!({
                    "source": item.source,
                    "status": if e.is_rejection() { "rejected" } else { "failed" },
                    "error": e.to_string(),
                    "message": e.user_message(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for item in &report.items {
        match &item.outcome {
            Ok(a) => println!("admitted  {}  {}", item.original_file_name, a.id),
            Err(e) if e.is_rejection() => {
                println!("rejected  {}  {}", item.original_file_name, e)
            }
            Err(e) => println!("failed    {}  {}", item.original_file_name, e),
        }
    }
    if let Some(message) = report.first_error_message() {
        eprintln!("{}", message);
    }
    Ok(())
}

fn issues_json(issues: &[DeletionIssue]) -> Vec<serde_json::Value> {
    issues
        .iter()
        .map(|i| {
            json!({
                "attachment_id": i.attachment_id,
                "stored_file_name": i.stored_file_name,
                "message": i.message,
            })
        })
        .collect()
}

fn print_deletion(report: &DeletionReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "records_removed": report.records_removed,
                "file_errors": issues_json(&report.file_errors),
                "record_errors": issues_json(&report.record_errors),
            }))?
        );
    } else {
        println!("removed {} attachment record(s)", report.records_removed);
        for issue in &report.file_errors {
            eprintln!(
                "warning: could not remove {}: {}",
                issue.stored_file_name, issue.message
            );
        }
        for issue in &report.record_errors {
            eprintln!(
                "error: could not delete attachment {}: {}",
                issue.attachment_id, issue.message
            );
        }
    }
    Ok(())
}
