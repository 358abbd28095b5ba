use super::msg_key::MsgKey;
use super::{EN_MSGS, JA_MSGS};
use parking_lot::RwLock;
use std::sync::LazyLock;

/// 言語設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    En,
    Ja,
}

impl Lang {
    /// 環境変数から言語を取得
    /// 優先順位: QI_LANG > LANG > デフォルト(en)
    pub fn from_env() -> Self {
        if let Ok(lang) = std::env::var(crate::constants::env::LANG) {
            return Self::parse(&lang);
        }

        // LANGから言語コードを取得（ja_JP.UTF-8 -> ja）
        if let Ok(lang) = std::env::var("LANG") {
            let lang_code = lang.split('_').next().unwrap_or("");
            return Self::parse(lang_code);
        }

        Lang::En
    }

    /// 言語コードをパース
    pub fn parse(code: &str) -> Self {
        match code {
            "ja" | "ja_JP" => Lang::Ja,
            "en" | "en_US" | "en_GB" => Lang::En,
            _ => Lang::En, // 未対応言語は英語にフォールバック
        }
    }

    /// 言語コードを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
        }
    }
}

/// メッセージマネージャー（HashMap検索、enフォールバック）
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    lang: Lang,
}

impl Messages {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    /// メッセージを取得（jaになければenにフォールバック）
    pub fn get(&self, key: MsgKey) -> &'static str {
        match self.lang {
            Lang::En => EN_MSGS.get(&key).unwrap_or(&"[missing message]"),
            Lang::Ja => JA_MSGS
                .get(&key)
                .or_else(|| EN_MSGS.get(&key))
                .unwrap_or(&"[missing message]"),
        }
    }

    /// メッセージをフォーマット（プレースホルダー {0}, {1}, ... を置換）
    ///
    /// テンプレートを一度だけ走査する。引数に含まれる `{n}` は置換しない
    pub fn fmt(&self, key: MsgKey, args: &[&str]) -> String {
        let template = self.get(key);

        // 予想サイズを確保（テンプレート + 引数の合計長）
        let estimated_size = template.len() + args.iter().map(|s| s.len()).sum::<usize>();
        let mut result = String::with_capacity(estimated_size);

        let mut rest = template;
        while let Some(start) = rest.find('{') {
            result.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();

            let arg = if digits > 0 && after[digits..].starts_with('}') {
                after[..digits]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
            } else {
                None
            };

            match arg {
                Some(arg) => {
                    result.push_str(arg);
                    rest = &after[digits + 1..];
                }
                // プレースホルダーではない
                None => {
                    result.push('{');
                    rest = after;
                }
            }
        }
        result.push_str(rest);

        result
    }
}

// ========================================
// グローバル設定
// ========================================

static LANG: LazyLock<RwLock<Lang>> = LazyLock::new(|| RwLock::new(Lang::from_env()));

/// メッセージ言語を切り替える
pub fn set_lang(lang: Lang) {
    *LANG.write() = lang;
}

/// 現在のメッセージ言語
pub fn current_lang() -> Lang {
    *LANG.read()
}

/// 現在の言語設定でメッセージインスタンスを取得
pub fn messages() -> Messages {
    Messages::new(current_lang())
}

/// メッセージを取得してフォーマット
pub fn fmt_msg(key: MsgKey, args: &[&str]) -> String {
    messages().fmt(key, args)
}
