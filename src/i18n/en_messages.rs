use super::msg_key::MsgKey;
use super::msg_key::MsgKey::*;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 英語エラーメッセージ
pub static EN_MSGS: LazyLock<HashMap<MsgKey, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // 空コレクション
        (EmptyCollection, "{0}: collection is empty"),
        (NoMatchingItem, "{0}: no item matched the predicate"),
        // 引数エラー
        (MustBePositive, "{0}: {1} must be positive"),
        (
            InvalidFlattenDepth,
            "flatten: depth must be -1 or greater, got {0}",
        ),
        (AllElementsMustBe, "{0}: all elements must be {1}, got {2}"),
        (InvalidKey, "{0}: {1} cannot be used as a key"),
        (NotACollection, "{0}: item at key {1} is not a collection ({2})"),
        (
            LengthMismatch,
            "{0}: item at key {1} has {2} elements, expected {3}",
        ),
        // コールバック
        (FuncMustReturnType, "{0}: function must return {1}, got {2}"),
        // キー重複
        (DuplicateKey, "{0}: duplicate key {1}"),
        (IntKeyOverflow, "{0}: next integer key after {1} overflows"),
        // ログ
        (
            InvalidLogLevel,
            "invalid log level '{0}' (valid: debug, info, warn, error)",
        ),
        (InvalidLogFormat, "invalid log format '{0}' (valid: text, json)"),
        // 設定
        (ConfigReadError, "config: failed to read '{0}': {1}"),
        (ConfigParseError, "config: failed to parse: {0}"),
        // JSON
        (JsonParseError, "{0}: {1}"),
        (CannotConvertToJson, "cannot convert {0} to JSON"),
    ])
});
