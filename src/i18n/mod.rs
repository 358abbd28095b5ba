/// 国際化メッセージ管理
///
/// 言語設定の優先順位:
/// 1. set_lang() による明示的な設定（Config::apply経由）
/// 2. QI_LANG 環境変数
/// 3. LANG 環境変数（システムのロケール設定）
/// 4. デフォルト: en

// サブモジュール
mod en_messages;
mod ja_messages;
mod messages;
mod msg_key;

// 公開エクスポート
pub use en_messages::EN_MSGS;
pub use ja_messages::JA_MSGS;
pub use messages::{current_lang, fmt_msg, messages, set_lang, Lang, Messages};
pub use msg_key::MsgKey;
