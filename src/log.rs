//! ログ出力
//!
//! 標準エラーに1行ずつ出力します。形式はテキストかJSON。
//! 既定のレベルは Warn（コレクション操作の実体化は Debug で出力される）。

use crate::error::{CollectionError, Result};
use crate::i18n::MsgKey;
use parking_lot::RwLock;
use std::sync::LazyLock;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl LogLevel {
    /// 文字列からパース（大文字小文字は区別しない）
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CollectionError::config(MsgKey::InvalidLogLevel, &[s])),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// ログフォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(CollectionError::config(MsgKey::InvalidLogFormat, &[s])),
        }
    }
}

/// ログ設定
struct LogConfig {
    level: LogLevel,
    format: LogFormat,
}

static LOG_CONFIG: LazyLock<RwLock<LogConfig>> = LazyLock::new(|| {
    RwLock::new(LogConfig {
        level: LogLevel::Warn,
        format: LogFormat::Text,
    })
});

pub fn set_level(level: LogLevel) {
    LOG_CONFIG.write().level = level;
}

pub fn level() -> LogLevel {
    LOG_CONFIG.read().level
}

pub fn set_format(format: LogFormat) {
    LOG_CONFIG.write().format = format;
}

pub fn format() -> LogFormat {
    LOG_CONFIG.read().format
}

/// 指定レベルが出力対象か（コンテキストを組み立てる前に確認する）
pub fn enabled(level: LogLevel) -> bool {
    level >= LOG_CONFIG.read().level
}

#[cfg(feature = "std-time")]
fn timestamp() -> Option<String> {
    Some(
        chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S%.3f%z")
            .to_string(),
    )
}

#[cfg(not(feature = "std-time"))]
fn timestamp() -> Option<String> {
    None
}

/// 1行分を組み立てる
fn format_line(
    format: LogFormat,
    timestamp: Option<&str>,
    level: LogLevel,
    message: &str,
    context: &[(&str, String)],
) -> String {
    match format {
        LogFormat::Text => {
            let mut line = match timestamp {
                Some(ts) => format!("[{}] {} {}", ts, level.as_str(), message),
                None => format!("{} {}", level.as_str(), message),
            };
            if !context.is_empty() {
                line.push_str(" |");
                for (k, v) in context {
                    line.push_str(&format!(" {}={}", k, v));
                }
            }
            line
        }
        LogFormat::Json => json_line(timestamp, level, message, context),
    }
}

#[cfg(feature = "format-json")]
fn json_line(
    timestamp: Option<&str>,
    level: LogLevel,
    message: &str,
    context: &[(&str, String)],
) -> String {
    let mut obj = serde_json::Map::new();
    if let Some(ts) = timestamp {
        obj.insert("timestamp".to_string(), ts.into());
    }
    obj.insert("level".to_string(), level.as_str().into());
    obj.insert("message".to_string(), message.into());
    for (k, v) in context {
        obj.insert(k.to_string(), v.as_str().into());
    }
    serde_json::Value::Object(obj).to_string()
}

// serde_jsonが無い場合の簡易JSON出力
#[cfg(not(feature = "format-json"))]
fn json_line(
    timestamp: Option<&str>,
    level: LogLevel,
    message: &str,
    context: &[(&str, String)],
) -> String {
    let escape = |s: &str| s.replace('\\', "\\\\").replace('"', "\\\"");
    let mut fields = Vec::new();
    if let Some(ts) = timestamp {
        fields.push(format!("\"timestamp\":\"{}\"", escape(ts)));
    }
    fields.push(format!("\"level\":\"{}\"", level.as_str()));
    fields.push(format!("\"message\":\"{}\"", escape(message)));
    for (k, v) in context {
        fields.push(format!("\"{}\":\"{}\"", escape(k), escape(v)));
    }
    format!("{{{}}}", fields.join(","))
}

/// ログ出力の内部実装
fn log_internal(level: LogLevel, message: &str, context: &[(&str, String)]) {
    let format = {
        let config = LOG_CONFIG.read();
        // レベルフィルタ
        if level < config.level {
            return;
        }
        config.format
    };

    let ts = timestamp();
    eprintln!(
        "{}",
        format_line(format, ts.as_deref(), level, message, context)
    );
}

pub fn debug(message: &str, context: &[(&str, String)]) {
    log_internal(LogLevel::Debug, message, context);
}

pub fn info(message: &str, context: &[(&str, String)]) {
    log_internal(LogLevel::Info, message, context);
}

pub fn warn(message: &str, context: &[(&str, String)]) {
    log_internal(LogLevel::Warn, message, context);
}

pub fn error(message: &str, context: &[(&str, String)]) {
    log_internal(LogLevel::Error, message, context);
}
