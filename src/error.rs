//! コレクションのエラー処理
//!
//! 構造化されたエラー情報を提供し、以下をサポート：
//! - エラーコードによる分類
//! - 補足説明（note）と解決のヒント（help）
//! - 複数の出力形式（人間向け/JSON）

use crate::i18n::{fmt_msg, MsgKey};
use std::fmt;

/// エラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// 空のコレクションに対する first/last/avg/min/max/median など
    EmptyCollection,
    /// 構造的な前提条件の違反（transposeの不正な要素、サイズ0のchunkなど）
    InvalidArgument,
    /// ユーザー関数の戻り値が契約に違反
    InvalidReturnValue,
    /// to_array_unique でのキー重複
    DuplicateKey,
    /// 設定の読み込み・解釈エラー
    InvalidConfig,
    /// 構造化表現（JSON）との相互変換エラー
    Serialization,
}

impl ErrorCode {
    /// 短いコード表記
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyCollection => "C0101",
            ErrorCode::InvalidArgument => "C0201",
            ErrorCode::InvalidReturnValue => "C0202",
            ErrorCode::DuplicateKey => "C0301",
            ErrorCode::InvalidConfig => "C0901",
            ErrorCode::Serialization => "C0902",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 構造化されたエラー情報
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionError {
    code: ErrorCode,
    /// メインメッセージ（1行）
    message: String,
    notes: Vec<String>,
    help: Vec<String>,
}

/// コレクション操作の結果型
pub type Result<T> = std::result::Result<T, CollectionError>;

impl CollectionError {
    pub fn new<S: Into<String>>(code: ErrorCode, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// noteを追加
    pub fn with_note<S: Into<String>>(mut self, note: S) -> Self {
        self.notes.push(note.into());
        self
    }

    /// helpを追加
    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// エラーコード + メッセージ（ログ用）
    pub fn short(&self) -> String {
        format!("error[{}]: {}", self.code, self.message)
    }

    /// 完全な詳細情報
    pub fn full(&self) -> String {
        let mut output = format!("error[{}]: {}\n", self.code, self.message);

        for note in &self.notes {
            output.push_str(&format!("  = note: {}\n", note));
        }
        for help_text in &self.help {
            output.push_str(&format!("  = help: {}\n", help_text));
        }

        output
    }

    /// JSON形式で出力
    #[cfg(feature = "format-json")]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        json!({
            "code": self.code.as_str(),
            "message": self.message,
            "notes": self.notes,
            "help": self.help,
        })
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

impl std::error::Error for CollectionError {}

// CollectionError -> String（コールバック内で文字列エラーとして扱う場合）
impl From<CollectionError> for String {
    fn from(err: CollectionError) -> String {
        err.full()
    }
}

// ========================================
// エラー構築ヘルパー関数
// ========================================

impl CollectionError {
    /// 空コレクションエラー
    pub fn empty(op: &str) -> Self {
        CollectionError::new(
            ErrorCode::EmptyCollection,
            fmt_msg(MsgKey::EmptyCollection, &[op]),
        )
    }

    /// 述語に一致する要素が無い
    pub fn no_match(op: &str) -> Self {
        CollectionError::new(
            ErrorCode::EmptyCollection,
            fmt_msg(MsgKey::NoMatchingItem, &[op]),
        )
        .with_help("pass a default value to get it back instead of an error")
    }

    /// 引数エラー（メッセージキー指定）
    pub fn invalid_argument(key: MsgKey, args: &[&str]) -> Self {
        CollectionError::new(ErrorCode::InvalidArgument, fmt_msg(key, args))
    }

    /// 正の数が必要
    pub fn must_be_positive(op: &str, what: &str) -> Self {
        Self::invalid_argument(MsgKey::MustBePositive, &[op, what])
    }

    /// ユーザー関数の戻り値の型エラー
    pub fn invalid_return(op: &str, expected: &str, actual: &str) -> Self {
        CollectionError::new(
            ErrorCode::InvalidReturnValue,
            fmt_msg(MsgKey::FuncMustReturnType, &[op, expected, actual]),
        )
    }

    /// キー重複エラー
    pub fn duplicate_key(op: &str, key: &str) -> Self {
        CollectionError::new(
            ErrorCode::DuplicateKey,
            fmt_msg(MsgKey::DuplicateKey, &[op, key]),
        )
    }

    /// 設定エラー
    pub fn config(key: MsgKey, args: &[&str]) -> Self {
        CollectionError::new(ErrorCode::InvalidConfig, fmt_msg(key, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_error() {
        let err = CollectionError::new(ErrorCode::InvalidArgument, "テストエラー");
        assert_eq!(err.message(), "テストエラー");
        assert_eq!(err.short(), "error[C0201]: テストエラー");
        assert_eq!(err.to_string(), err.short());
    }

    #[test]
    fn test_full_with_notes_and_help() {
        let err = CollectionError::new(ErrorCode::DuplicateKey, "duplicate key 1")
            .with_note("first seen at position 0")
            .with_help("use to_array() for last-write-wins");

        let full = err.full();
        assert!(full.contains("error[C0301]"));
        assert!(full.contains("= note: first seen at position 0"));
        assert!(full.contains("= help: use to_array()"));
    }

    #[test]
    fn test_helper_codes() {
        assert_eq!(CollectionError::empty("avg").code(), ErrorCode::EmptyCollection);
        assert_eq!(
            CollectionError::no_match("first").code(),
            ErrorCode::EmptyCollection
        );
        assert_eq!(
            CollectionError::must_be_positive("chunk", "size").code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(
            CollectionError::invalid_return("transform", "collection", "integer").code(),
            ErrorCode::InvalidReturnValue
        );
        assert_eq!(
            CollectionError::duplicate_key("to_array", "1").code(),
            ErrorCode::DuplicateKey
        );
    }

    #[test]
    fn test_string_conversion() {
        let err = CollectionError::empty("median");
        let s: String = err.into();
        assert!(s.contains("error[C0101]"));
    }

    #[cfg(feature = "format-json")]
    #[test]
    fn test_to_json() {
        let err = CollectionError::new(ErrorCode::EmptyCollection, "empty");
        let json = err.to_json();
        assert_eq!(json["code"], "C0101");
        assert_eq!(json["message"], "empty");
    }
}
