//! ライブラリ設定（TOML / 環境変数）
//!
//! ```toml
//! lang = "ja"
//!
//! [log]
//! level = "debug"
//! format = "json"
//! ```
//!
//! 優先順位: 環境変数 > 設定ファイル > デフォルト

use crate::constants::env;
use crate::error::{CollectionError, Result};
use crate::i18n::{set_lang, Lang, MsgKey};
use crate::log::{self, LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 設定全体
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// メッセージ言語（"en" / "ja"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default)]
    pub log: LogSection,
}

/// [log] セクション
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LogSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CollectionError::config(MsgKey::ConfigParseError, &[&e.to_string()]))
    }

    /// 設定ファイルを読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CollectionError::config(
                MsgKey::ConfigReadError,
                &[&path.display().to_string(), &e.to_string()],
            )
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CollectionError::config(MsgKey::ConfigParseError, &[&e.to_string()]))
    }

    /// 環境変数のみから作成
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// QI_LANG / QI_LOG_LEVEL / QI_LOG_FORMAT で上書き
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(lang) = lookup(env::LANG) {
            self.lang = Some(lang);
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.log.level = Some(level);
        }
        if let Some(format) = lookup(env::LOG_FORMAT) {
            self.log.format = Some(format);
        }
        self
    }

    /// 値を検証する（適用はしない）
    pub fn validate(&self) -> Result<()> {
        self.parsed().map(|_| ())
    }

    fn parsed(&self) -> Result<(Option<LogLevel>, Option<LogFormat>)> {
        let level = self.log.level.as_deref().map(LogLevel::parse).transpose()?;
        let format = self.log.format.as_deref().map(LogFormat::parse).transpose()?;
        Ok((level, format))
    }

    /// ロガーとメッセージ言語に反映する
    ///
    /// 不正な値があれば何も変更せずにエラーを返す。
    pub fn apply(&self) -> Result<()> {
        let (level, format) = self.parsed()?;

        if let Some(lang) = &self.lang {
            set_lang(Lang::parse(lang));
        }
        if let Some(level) = level {
            log::set_level(level);
        }
        if let Some(format) = format {
            log::set_format(format);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::HashMap;

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(
            r#"
lang = "ja"

[log]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.lang.as_deref(), Some("ja"));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(config.log.format, None);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("lang = ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidConfig);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/qi-collection.toml").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidConfig);
        assert!(err.message().contains("qi-collection.toml"));
    }

    #[test]
    fn test_overrides() {
        let mut vars: HashMap<&str, String> = crate::new_hashmap();
        vars.insert(env::LOG_LEVEL, "error".to_string());

        let config = Config {
            lang: Some("en".to_string()),
            log: LogSection {
                level: Some("info".to_string()),
                format: Some("json".to_string()),
            },
        }
        .with_overrides(|name| vars.get(name).cloned());

        assert_eq!(config.lang.as_deref(), Some("en"));
        assert_eq!(config.log.level.as_deref(), Some("error"));
        assert_eq!(config.log.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.log.level = Some("verbose".to_string());
        assert_eq!(config.validate().unwrap_err().code(), ErrorCode::InvalidConfig);

        config.log.level = None;
        config.log.format = Some("yaml".to_string());
        assert!(config.apply().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config {
            lang: None,
            log: LogSection {
                level: Some("warn".to_string()),
                format: None,
            },
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
