use super::msg_key::MsgKey;
use super::msg_key::MsgKey::*;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 日本語エラーメッセージ
pub static JA_MSGS: LazyLock<HashMap<MsgKey, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (EmptyCollection, "{0}: コレクションが空です"),
        (NoMatchingItem, "{0}: 条件に一致する要素がありません"),
        (MustBePositive, "{0}: {1}は正の数である必要があります"),
        (
            InvalidFlattenDepth,
            "flatten: 深さは-1以上である必要があります（指定値: {0}）",
        ),
        (AllElementsMustBe, "{0}: 全ての要素は{1}である必要があります（実際: {2}）"),
        (InvalidKey, "{0}: {1}はキーとして使用できません"),
        (
            NotACollection,
            "{0}: キー{1}の要素がコレクションではありません（{2}）",
        ),
        (
            LengthMismatch,
            "{0}: キー{1}の要素数が{2}です（期待: {3}）",
        ),
        (FuncMustReturnType, "{0}: 関数は{1}を返す必要があります（実際: {2}）"),
        (DuplicateKey, "{0}: キーが重複しています: {1}"),
        (IntKeyOverflow, "{0}: {1}の次の整数キーがオーバーフローします"),
        (
            InvalidLogLevel,
            "無効なログレベル '{0}'（有効: debug, info, warn, error）",
        ),
        (
            InvalidLogFormat,
            "無効なログフォーマット '{0}'（有効: text, json）",
        ),
        (ConfigReadError, "設定ファイル '{0}' の読み込みに失敗: {1}"),
        (ConfigParseError, "設定ファイルのパースに失敗: {0}"),
        // JSONのパースエラーは英語と同じ書式
        (CannotConvertToJson, "{0}はJSONに変換できません"),
    ])
});
