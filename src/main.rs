//! rcfeed CLI
//!
//! 把 wiki 最近更改事件格式化为 webhook 消息并发送

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};
use wiki_rc_notify::{
    ChangeEvent, Feed, FeedConfig, NotificationChannel, SendResult, WebhookChannel, WebhookConfig,
};

#[derive(Parser)]
#[command(name = "rcfeed")]
#[command(about = "Wiki RC Notify - 把 wiki 最近更改格式化为 webhook 消息")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/wiki-rc-notify/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 格式化事件并打印 payload
    Format {
        /// 事件 JSON 文件，`-` 表示标准输入
        #[arg(default_value = "-")]
        event: String,
        /// 美化输出
        #[arg(long)]
        pretty: bool,
    },
    /// 格式化事件并发送到 webhook
    Send {
        /// 事件 JSON 文件，`-` 表示标准输入
        #[arg(default_value = "-")]
        event: String,
        /// 覆盖配置中的 webhook 地址
        #[arg(long)]
        url: Option<String>,
        /// 超时时间（秒）
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// Dry-run 模式（只打印不发送）
        #[arg(long)]
        dry_run: bool,
    },
    /// 打印解析后的配置
    Config,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wiki_rc_notify=info,rcfeed=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(FeedConfig::default_path);
    let config = FeedConfig::load_or_default(&config_path)?;
    debug!(path = %config_path.display(), "Loaded config");

    match cli.command {
        Commands::Format { event, pretty } => {
            let feed = Feed::new(config);
            let event = read_event(&event)?;
            match feed.build_payload(&event) {
                Some(payload) => {
                    let value = payload.to_value()?;
                    let text = if pretty {
                        serde_json::to_string_pretty(&value)?
                    } else {
                        serde_json::to_string(&value)?
                    };
                    println!("{}", text);
                }
                None => eprintln!("Event filtered, nothing to send"),
            }
        }
        Commands::Send {
            event,
            url,
            timeout,
            dry_run,
        } => {
            let url = url.unwrap_or_else(|| config.destination.url.clone());
            let feed = Feed::new(config);
            let event = read_event(&event)?;

            let Some(payload) = feed.format(&event) else {
                eprintln!("Event filtered, nothing to send");
                return Ok(());
            };

            if dry_run {
                eprintln!("[DRY-RUN] Would send to: {}", url);
                println!("{}", payload);
                return Ok(());
            }

            let channel = WebhookChannel::new(WebhookConfig {
                url,
                timeout_secs: timeout,
            })?;
            match channel.send(&payload)? {
                SendResult::Sent => info!(channel = channel.name(), "Sent"),
                SendResult::Skipped(reason) => eprintln!("Skipped: {}", reason),
                SendResult::Failed(reason) => anyhow::bail!("Send failed: {}", reason),
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// 读取事件 JSON，`-` 表示标准输入
fn read_event(source: &str) -> Result<ChangeEvent> {
    let content = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read event {}", source))?
    };
    serde_json::from_str(&content).context("Invalid event JSON")
}
