//! Inline HTML templates for the note pages.
//!
//! Four pages: the inline editor, the password prompt, the read-only share
//! view, and the catch-all 404. Templates are plain `format!` strings with a
//! shared stylesheet; the editor and password pages embed their client
//! scripts together with a localized `STRINGS` object.

pub mod i18n;

use i18n::{Lang, client_strings_json, ui_strings};
use note_store::{NoteMode, NoteRecord};

use crate::render::html_escape;

const CSS_STYLES: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: #f6f6f4;
    color: #222;
}
.container { max-width: 860px; margin: 0 auto; padding: 16px; }
header { display: flex; align-items: baseline; gap: 8px; }
header h1 { font-size: 1.3rem; margin: 8px 0; word-break: break-all; }
#loading { display: none; font-size: 0.8rem; color: #888; }
.editor { display: flex; gap: 12px; }
#contents {
    flex: 1;
    min-height: 70vh;
    padding: 12px;
    border: 1px solid #ddd;
    border-radius: 4px;
    font: inherit;
    resize: vertical;
}
.preview {
    flex: 1;
    min-height: 70vh;
    padding: 12px;
    border: 1px solid #eee;
    border-radius: 4px;
    background: #fff;
    overflow-wrap: break-word;
}
.hidden { display: none; }
.toolbar { display: flex; align-items: center; gap: 16px; margin-top: 12px; }
.toolbar button, .modal-box button, #unlock-btn {
    padding: 6px 14px;
    border: 1px solid #ccc;
    border-radius: 4px;
    background: #fff;
    cursor: pointer;
}
.note-view { background: #fff; padding: 16px; border-radius: 4px; border: 1px solid #eee; }
.note-plain { white-space: pre-wrap; font: inherit; margin: 0; }
.share-modal {
    position: fixed; inset: 0;
    background: rgba(0, 0, 0, 0.4);
    display: flex; align-items: center; justify-content: center;
}
.modal-box { background: #fff; padding: 20px; border-radius: 6px; min-width: 300px; }
.modal-box input { width: 100%; padding: 6px; margin-bottom: 12px; }
.message-box {
    position: fixed; top: 16px; right: 16px;
    background: #333; color: #fff;
    padding: 8px 14px; border-radius: 4px;
}
.prompt-box { margin-top: 20vh; text-align: center; }
.prompt-box input { padding: 8px; width: 220px; }
footer.page-note { margin-top: 24px; color: #999; font-size: 0.85rem; }
"#;

const EDITOR_JS: &str = r#"
const $textarea = document.querySelector('#contents');
const $loading = document.querySelector('#loading');
const $pwBtn = document.querySelector('.opt-pw');
const $modeBtn = document.querySelector('.opt-mode > input');
const $shareBtn = document.querySelector('.opt-share > input');
const $previewMd = document.querySelector('#preview-md');
const $shareModal = document.querySelector('.share-modal');
const $closeBtn = document.querySelector('.share-modal .close-btn');
const $copyBtn = document.querySelector('.share-modal .copy-btn');
const $shareInput = document.querySelector('.share-modal input');
const $messageBox = document.querySelector('#message-box');

const showMessage = (message) => {
    $messageBox.textContent = message;
    $messageBox.classList.remove('hidden');
    setTimeout(() => $messageBox.classList.add('hidden'), 3000);
};

const errHandle = (err) => showMessage(`${STRINGS.error}: ${err}`);

const postJson = async (url, payload) => {
    const res = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload),
    });
    return res.json();
};

const renderPreview = () => {
    if ($previewMd.classList.contains('hidden')) return;
    $previewMd.innerHTML = DOMPurify.sanitize(marked.parse($textarea.value));
};

const saveBody = async () => {
    $loading.style.display = 'inline-block';
    try {
        const res = await fetch(location.pathname, {
            method: 'POST',
            headers: { 'Content-Type': 'application/x-www-form-urlencoded' },
            body: new URLSearchParams({ t: $textarea.value }),
        });
        const result = await res.json();
        if (result.err !== 0) errHandle(result.msg);
    } catch (err) {
        errHandle(err);
    } finally {
        $loading.style.display = 'none';
    }
};

const changePassword = async () => {
    const passwd = window.prompt(STRINGS.newPasswordPrompt);
    if (passwd == null) return;
    try {
        const data = await postJson(`${location.pathname}/pw`, { passwd: passwd.trim() });
        if (data.err !== 0) return errHandle(data.msg);
        showMessage(passwd.trim() ? STRINGS.passwordSet : STRINGS.passwordRemoved);
    } catch (err) {
        errHandle(err);
    }
};

const changeMode = async () => {
    try {
        const data = await postJson(`${location.pathname}/setting`, {
            mode: $modeBtn.checked ? 'md' : 'plain',
        });
        if (data.err !== 0) return errHandle(data.msg);
        window.location.reload();
    } catch (err) {
        errHandle(err);
    }
};

const changeShare = async () => {
    try {
        const data = await postJson(`${location.pathname}/setting`, {
            share: $shareBtn.checked,
        });
        if (data.err !== 0) return errHandle(data.msg);
        if ($shareBtn.checked) {
            $shareInput.value = `${location.origin}/share/${data.data}`;
            $shareModal.classList.remove('hidden');
        }
    } catch (err) {
        errHandle(err);
    }
};

$textarea.addEventListener('input', renderPreview);
$textarea.addEventListener('blur', saveBody);
$pwBtn.addEventListener('click', changePassword);
$modeBtn.addEventListener('click', changeMode);
$shareBtn.addEventListener('click', changeShare);
$closeBtn.addEventListener('click', () => $shareModal.classList.add('hidden'));
$copyBtn.addEventListener('click', () => {
    navigator.clipboard.writeText($shareInput.value);
    showMessage(STRINGS.copied);
    $shareModal.classList.add('hidden');
});

renderPreview();
"#;

const PASSWORD_JS: &str = r#"
const $passwd = document.querySelector('#passwd');
const $unlockBtn = document.querySelector('#unlock-btn');
const $messageBox = document.querySelector('#message-box');

const showMessage = (message) => {
    $messageBox.textContent = message;
    $messageBox.classList.remove('hidden');
    setTimeout(() => $messageBox.classList.add('hidden'), 3000);
};

const submitPassword = async () => {
    const passwd = $passwd.value;
    if (!passwd.trim()) {
        showMessage(STRINGS.passwordEmpty);
        return;
    }
    try {
        const res = await fetch(`${location.pathname}/auth`, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ passwd }),
        });
        const data = await res.json();
        if (data.err !== 0) {
            showMessage(`${STRINGS.error}: ${data.msg}`);
            return;
        }
        if (data.data && data.data.refresh) window.location.reload();
    } catch (err) {
        showMessage(`${STRINGS.error}: ${err}`);
    }
};

$unlockBtn.addEventListener('click', submitPassword);
$passwd.addEventListener('keydown', (e) => {
    if (e.key === 'Enter') submitPassword();
});
"#;

/// The inline editor for an (authorized or unprotected) note.
pub fn edit_page(lang: Lang, title: &str, record: &NoteRecord) -> String {
    let s = ui_strings(lang);
    let md = record.meta.mode == NoteMode::Md;

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang_code}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
            <span id="loading">...</span>
        </header>
        <div class="editor">
            <textarea id="contents" spellcheck="false">{body}</textarea>
            <div id="preview-md" class="preview{preview_hidden}"></div>
        </div>
        <footer class="toolbar">
            <button class="opt-pw">{password_label}</button>
            <label class="opt-mode"><input type="checkbox"{mode_checked}> Markdown</label>
            <label class="opt-share"><input type="checkbox"{share_checked}> {share_label}</label>
        </footer>
        <div class="share-modal hidden">
            <div class="modal-box">
                <h3>{share_link}</h3>
                <input type="text" readonly>
                <button class="copy-btn">{copy}</button>
                <button class="close-btn">{close}</button>
            </div>
        </div>
        <div id="message-box" class="message-box hidden"></div>
    </div>
    <script src="https://cdn.jsdelivr.net/npm/marked@12/marked.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/dompurify@3/dist/purify.min.js"></script>
    <script>
    const STRINGS = {strings};
    {editor_js}
    </script>
</body>
</html>"#,
        lang_code = lang.code(),
        title = html_escape(title),
        css = CSS_STYLES,
        body = html_escape(&record.body),
        preview_hidden = if md { "" } else { " hidden" },
        mode_checked = if md { " checked" } else { "" },
        share_checked = if record.meta.share { " checked" } else { "" },
        password_label = s.password_label,
        share_label = s.share_label,
        share_link = s.share_link,
        copy = s.copy,
        close = s.close,
        strings = client_strings_json(lang),
        editor_js = EDITOR_JS,
    )
}

/// The password prompt shown for a protected note without authorization.
pub fn password_page(lang: Lang, title: &str) -> String {
    let s = ui_strings(lang);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang_code}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <div class="prompt-box">
            <h1>{title}</h1>
            <p>{notice}</p>
            <input type="password" id="passwd" placeholder="{placeholder}">
            <button id="unlock-btn">{unlock}</button>
        </div>
        <div id="message-box" class="message-box hidden"></div>
    </div>
    <script>
    const STRINGS = {strings};
    {password_js}
    </script>
</body>
</html>"#,
        lang_code = lang.code(),
        title = html_escape(title),
        css = CSS_STYLES,
        notice = s.protected_notice,
        placeholder = s.enter_password,
        unlock = s.unlock,
        strings = client_strings_json(lang),
        password_js = PASSWORD_JS,
    )
}

/// The read-only view of a shared note. `rendered` is trusted HTML produced
/// by the server-side renderer.
pub fn share_page(lang: Lang, title: &str, rendered: &str) -> String {
    let s = ui_strings(lang);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang_code}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <header><h1>{title}</h1></header>
        <div class="note-view">{rendered}</div>
        <footer class="page-note">{read_only}</footer>
    </div>
</body>
</html>"#,
        lang_code = lang.code(),
        title = html_escape(title),
        css = CSS_STYLES,
        rendered = rendered,
        read_only = s.shared_read_only,
    )
}

/// The catch-all 404 page.
pub fn not_found_page(lang: Lang) -> String {
    let s = ui_strings(lang);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang_code}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>404</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <div class="prompt-box">
            <h1>404</h1>
            <p>{not_found}</p>
            <p><a href="/">{back_home}</a></p>
        </div>
    </div>
</body>
</html>"#,
        lang_code = lang.code(),
        css = CSS_STYLES,
        not_found = s.not_found,
        back_home = s.back_home,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use note_store::NoteMeta;

    #[test]
    fn edit_page_escapes_note_body() {
        let record = NoteRecord {
            body: "</textarea><script>alert(1)</script>".to_string(),
            meta: NoteMeta::default(),
        };
        let html = edit_page(Lang::En, "foo", &record);
        assert!(!html.contains("</textarea><script>"));
        assert!(html.contains("&lt;/textarea&gt;"));
    }

    #[test]
    fn edit_page_reflects_mode_and_share_state() {
        let mut record = NoteRecord::default();
        let html = edit_page(Lang::En, "foo", &record);
        assert!(html.contains(r#"<input type="checkbox"> Markdown"#));

        record.meta.mode = NoteMode::Md;
        record.meta.share = true;
        let html = edit_page(Lang::En, "foo", &record);
        assert!(html.contains(r#"<input type="checkbox" checked> Markdown"#));
        assert!(html.contains(r#"<input type="checkbox" checked> Share"#));
    }

    #[test]
    fn password_page_localizes() {
        let html = password_page(Lang::Zh, "foo");
        assert!(html.contains("该笔记已被密码保护。"));
        assert!(!html.contains("This note is password protected."));
    }

    #[test]
    fn not_found_page_links_home() {
        let html = not_found_page(Lang::En);
        assert!(html.contains("404"));
        assert!(html.contains(r#"href="/""#));
    }
}
