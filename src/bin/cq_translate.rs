//! Translates tagged chat messages read from standard input into plain text.
//!
//! Usage:
//!
//! ```text
//! cq_translate [config-path]
//! ```
//!
//! Each non-blank input line is either a JSON-encoded message object or a
//! raw message string. Raw lines take their 1-based line number as message
//! id. Every resolved message is written as one JSON object per line,
//! `{"message_id":1,"text":"..."}`, in the order resolution finishes. Text
//! that spans lines, such as an expanded forward, stays on one output line.
//!
//! The optional JSON file at `config-path` supplies settings; `CQTEXT_*`
//! environment variables override it. Log verbosity follows `RUST_LOG`
//! and defaults to `info`. Logs go to standard error.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use cqtext::cqcode::adapters::http::{ChatCompletionsDescriber, HttpImageFetcher};
use cqtext::cqcode::adapters::memory::InMemoryIdentityDirectory;
use cqtext::cqcode::config::{AppConfig, ConfigError};
use cqtext::cqcode::domain::{IncomingMessage, MessageId, ResolvedMessage, SenderInfo, UserId};
use cqtext::cqcode::services::{
    ExternalContentService, MessagePipeline, PipelineError, TagResolver,
};
use mockable::DefaultClock;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

const RAW_SENDER_NAME: &str = "stdin";

/// Errors that can occur while translating.
#[derive(Debug, Error)]
enum TranslateError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP adapters: {0}")]
    Adapter(String),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] io::Error),
    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn main() -> Result<(), BoxError> {
    init_tracing();
    let config_path = parse_args(std::env::args().skip(1))?;
    let config = load_config(config_path.as_deref())?;
    let messages = read_messages(io::stdin().lock())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(TranslateError::RuntimeInit)?;
    let resolved = runtime.block_on(translate(config, messages))?;

    write_resolved(io::stdout().lock(), &resolved)?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<Option<Utf8PathBuf>, TranslateError> {
    let config_path = args.next().map(Utf8PathBuf::from);
    if let Some(extra) = args.next() {
        return Err(TranslateError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok(config_path)
}

fn load_config(path: Option<&Utf8Path>) -> Result<AppConfig, TranslateError> {
    let base = path.map(load_config_file).transpose()?.unwrap_or_default();
    Ok(base.with_overrides(|key| std::env::var(key).ok())?)
}

fn load_config_file(path: &Utf8Path) -> Result<AppConfig, TranslateError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| TranslateError::InvalidArgs(format!("'{path}' does not name a file")))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|source| {
        ConfigError::Io {
            path: parent.to_string(),
            source,
        }
    })?;
    Ok(AppConfig::load(&dir, Utf8Path::new(file_name))?)
}

fn read_messages(input: impl BufRead) -> Result<Vec<IncomingMessage>, TranslateError> {
    let mut messages = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let text = line.map_err(TranslateError::Input)?;
        if text.trim().is_empty() {
            continue;
        }
        messages.push(parse_line(index.saturating_add(1), &text));
    }
    Ok(messages)
}

fn parse_line(line_number: usize, text: &str) -> IncomingMessage {
    if text.trim_start().starts_with('{') {
        match serde_json::from_str(text) {
            Ok(message) => return message,
            Err(error) => {
                tracing::warn!(
                    line_number,
                    %error,
                    "line is not a message object; using it as raw text"
                );
            }
        }
    }
    let message_id = MessageId::new(i64::try_from(line_number).unwrap_or(i64::MAX));
    IncomingMessage::new(SenderInfo::new(UserId::UNKNOWN, RAW_SENDER_NAME), text)
        .with_message_id(message_id)
}

async fn translate(
    config: AppConfig,
    messages: Vec<IncomingMessage>,
) -> Result<Vec<ResolvedMessage>, TranslateError> {
    let AppConfig {
        resolver: resolver_config,
        external,
        fetcher: fetcher_config,
        describer: describer_config,
    } = config;

    let fetcher = HttpImageFetcher::new(&fetcher_config)
        .map_err(|error| TranslateError::Adapter(error.to_string()))?;
    let describer = ChatCompletionsDescriber::new(describer_config)
        .map_err(|error| TranslateError::Adapter(error.to_string()))?;
    let content = ExternalContentService::new(Arc::new(fetcher), Arc::new(describer), external);
    let resolver = TagResolver::new(
        Arc::new(content),
        Arc::new(InMemoryIdentityDirectory::new()),
        resolver_config,
    );

    let (mut pipeline, mut receiver) = MessagePipeline::new(resolver, Arc::new(DefaultClock));
    for message in messages {
        pipeline.submit(message);
    }
    let delivered = pipeline.drain().await?;
    tracing::info!(delivered, "messages resolved");

    let mut resolved = Vec::with_capacity(delivered);
    while let Ok(message) = receiver.try_recv() {
        resolved.push(message);
    }
    Ok(resolved)
}

/// One line of output.
#[derive(Debug, Serialize)]
struct OutputRecord {
    message_id: MessageId,
    text: String,
}

fn write_resolved(
    mut output: impl Write,
    resolved: &[ResolvedMessage],
) -> Result<(), TranslateError> {
    for message in resolved {
        let record = OutputRecord {
            message_id: message.message_id,
            text: message.plain_text(),
        };
        serde_json::to_writer(&mut output, &record).map_err(TranslateError::Encode)?;
        writeln!(output).map_err(TranslateError::Output)?;
    }
    output.flush().map_err(TranslateError::Output)
}
