//! Localized UI strings for rendered pages.
//!
//! Pages are localized server-side from the `Accept-Language` header;
//! unknown languages fall back to English entirely.

use axum::http::{HeaderMap, header};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Zh,
}

impl Lang {
    /// Pick a supported language from the request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_tag)
            .unwrap_or(Lang::En)
    }

    /// `zh-CN,zh;q=0.9` -> `Zh`; anything unsupported -> `En`.
    pub fn from_tag(value: &str) -> Self {
        let primary = value
            .split(',')
            .next()
            .and_then(|tag| tag.split(';').next())
            .unwrap_or("")
            .trim();
        match primary.split('-').next().unwrap_or("") {
            "zh" => Lang::Zh,
            _ => Lang::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }
}

/// Strings rendered into pages and the embedded editor script.
pub struct UiStrings {
    pub error_prefix: &'static str,
    pub enter_password: &'static str,
    pub password_empty: &'static str,
    pub new_password_prompt: &'static str,
    pub password_set: &'static str,
    pub password_removed: &'static str,
    pub copied: &'static str,
    pub protected_notice: &'static str,
    pub unlock: &'static str,
    pub password_label: &'static str,
    pub share_label: &'static str,
    pub share_link: &'static str,
    pub copy: &'static str,
    pub close: &'static str,
    pub shared_read_only: &'static str,
    pub not_found: &'static str,
    pub back_home: &'static str,
}

const EN: UiStrings = UiStrings {
    error_prefix: "Error",
    enter_password: "Please enter password.",
    password_empty: "Password is empty!",
    new_password_prompt: "Enter a new password (keeping it empty will remove the current password)",
    password_set: "Password set successfully.",
    password_removed: "Password removed successfully.",
    copied: "Copied!",
    protected_notice: "This note is password protected.",
    unlock: "Unlock",
    password_label: "Password",
    share_label: "Share",
    share_link: "Share link",
    copy: "Copy",
    close: "Close",
    shared_read_only: "Shared read-only note",
    not_found: "This page does not exist.",
    back_home: "New note",
};

const ZH: UiStrings = UiStrings {
    error_prefix: "出错了",
    enter_password: "请输入密码",
    password_empty: "密码不能为空！",
    new_password_prompt: "输入新密码（留空可清除当前密码）",
    password_set: "密码设置成功！",
    password_removed: "密码清除成功！",
    copied: "已复制",
    protected_notice: "该笔记已被密码保护。",
    unlock: "解锁",
    password_label: "密码",
    share_label: "分享",
    share_link: "分享链接",
    copy: "复制",
    close: "关闭",
    not_found: "页面不存在。",
    shared_read_only: "只读分享笔记",
    back_home: "新建笔记",
};

pub fn ui_strings(lang: Lang) -> &'static UiStrings {
    match lang {
        Lang::En => &EN,
        Lang::Zh => &ZH,
    }
}

/// The subset of strings the embedded client script needs, as a JSON object.
pub fn client_strings_json(lang: Lang) -> String {
    let s = ui_strings(lang);
    json!({
        "error": s.error_prefix,
        "enterPassword": s.enter_password,
        "passwordEmpty": s.password_empty,
        "newPasswordPrompt": s.new_password_prompt,
        "passwordSet": s.password_set,
        "passwordRemoved": s.password_removed,
        "copied": s.copied,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_tags_resolve_to_zh() {
        assert_eq!(Lang::from_tag("zh"), Lang::Zh);
        assert_eq!(Lang::from_tag("zh-CN,zh;q=0.9,en;q=0.8"), Lang::Zh);
        assert_eq!(ui_strings(Lang::Zh).copied, "已复制");
    }

    #[test]
    fn unknown_languages_fall_back_to_english() {
        assert_eq!(Lang::from_tag("fr-FR,fr;q=0.9"), Lang::En);
        assert_eq!(Lang::from_tag(""), Lang::En);
        assert_eq!(ui_strings(Lang::En).copied, "Copied!");
    }

    #[test]
    fn client_strings_serialize_for_the_editor() {
        let json: serde_json::Value =
            serde_json::from_str(&client_strings_json(Lang::En)).unwrap();
        assert_eq!(json["copied"], "Copied!");
        assert_eq!(json["error"], "Error");
    }
}
