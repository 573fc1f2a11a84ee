use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mediaretry_client::ClientConfig;
use tracing::info;

mod commands;

#[derive(Parser)]
#[command(name = "mediaretry", about = "Inspect and produce media retry receipts and notifications")]
struct Args {
    /// Path to client configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Own device JID, overrides config
    #[arg(long, global = true)]
    own_jid: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the retry key derived from a media key
    DeriveKey {
        /// Media key (base64)
        #[arg(long)]
        media_key: String,
    },

    /// Build a framed retry receipt for a message (base64 output)
    SealReceipt {
        #[arg(long)]
        media_key: String,
        #[arg(long)]
        message_id: String,
        /// Chat JID the message was received in
        #[arg(long)]
        chat: String,
        /// Message author, required for group chats
        #[arg(long)]
        sender: Option<String>,
        #[arg(long)]
        from_me: bool,
    },

    /// Open a framed retry receipt as the peer would
    OpenReceipt {
        #[arg(long)]
        media_key: String,
        /// Framed receipt node (base64)
        #[arg(long)]
        frame: String,
    },

    /// Build a framed, encrypted retry notification as the peer would
    SealNotification {
        #[arg(long)]
        media_key: String,
        #[arg(long)]
        message_id: String,
        #[arg(long)]
        chat: String,
        #[arg(long)]
        participant: Option<String>,
        #[arg(long)]
        from_me: bool,
        /// Path of the re-uploaded media; omitted means "not found"
        #[arg(long)]
        direct_path: Option<String>,
        /// Unix seconds
        #[arg(long, default_value_t = 0)]
        timestamp: i64,
    },

    /// Parse and decrypt a framed retry notification
    OpenNotification {
        #[arg(long)]
        media_key: String,
        /// Framed notification node (base64)
        #[arg(long)]
        frame: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediaretry=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = if let Some(path) = &args.config {
        ClientConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?
    } else {
        ClientConfig::default()
    };

    // CLI overrides
    if let Some(own_jid) = args.own_jid {
        config.own_jid = Some(own_jid);
    }

    info!(own_jid = ?config.own_jid, "mediaretry starting");

    let output = match args.command {
        Command::DeriveKey { media_key } => commands::derive_key(&media_key)?,
        Command::SealReceipt {
            media_key,
            message_id,
            chat,
            sender,
            from_me,
        } => commands::seal_receipt(&config, &media_key, message_id, &chat, sender.as_deref(), from_me)?,
        Command::OpenReceipt { media_key, frame } => commands::open_receipt(&media_key, &frame)?,
        Command::SealNotification {
            media_key,
            message_id,
            chat,
            participant,
            from_me,
            direct_path,
            timestamp,
        } => commands::seal_notification(
            &media_key,
            &message_id,
            &chat,
            participant.as_deref(),
            from_me,
            direct_path,
            timestamp,
        )?,
        Command::OpenNotification { media_key, frame } => {
            commands::open_notification(&media_key, &frame)?
        }
    };

    println!("{output}");
    Ok(())
}
