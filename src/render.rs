//! Presentation of todos.
//!
//! Descriptions are stored as the HTML fragments the user typed. They are
//! sanitized here, at the rendering boundary, and never inside the store.

use crate::error::Result;
use crate::templates::{self, CONFIRM_TEMPLATE, DETAIL_TEMPLATE, LIST_TEMPLATE};
use crate::todos::{Action, StatusFilter, TodoItem};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tera::Context;

/// Elements dropped together with their content.
const BLOCKED_ELEMENTS: [&str; 5] = ["script", "style", "iframe", "object", "embed"];

static BLOCKED_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    BLOCKED_ELEMENTS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</\s*{tag}\s*>")).unwrap())
        .collect()
});

static STRAY_BLOCKED_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)</?\s*(?:{})\b[^>]*>", BLOCKED_ELEMENTS.join("|"))).unwrap()
});

/// An opening tag. Quoted attribute values may contain `>`.
static START_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<([a-zA-Z][a-zA-Z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

/// One attribute inside an opening tag. Names end at whitespace, `/` or `=`.
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'<>/=`]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+)))?"#).unwrap()
});

static NUMERIC_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));?").unwrap());

static NAMED_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)&(colon|tab|newline);").unwrap());

/// Attributes whose value is loaded or navigated to as a URL.
const URL_ATTRIBUTES: [&str; 8] =
    ["href", "src", "action", "formaction", "xlink:href", "data", "poster", "background"];

static BLOCK_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*(?:br\s*/?|/p|/li|/div|/ul|/ol|/h[1-6])\s*>").unwrap());

static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove active content from an HTML fragment.
///
/// Scripts, styles, frames and plugin elements are dropped, `on*` event
/// attributes are stripped, and script URLs in link or source attributes
/// are replaced with `#`. Other markup is left alone.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let mut out = html.to_string();
    for re in BLOCKED_BLOCKS.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out = STRAY_BLOCKED_TAGS.replace_all(&out, "").into_owned();
    START_TAG.replace_all(&out, |caps: &Captures<'_>| clean_tag(&caps[1], &caps[2])).into_owned()
}

/// Rebuild an opening tag from its safe attributes.
fn clean_tag(name: &str, attributes: &str) -> String {
    let mut tag = format!("<{name}");
    let mut last_end = 0;

    for attr in ATTRIBUTE.captures_iter(attributes) {
        let whole = &attr[0];
        let attr_name = &attr[1];
        last_end = attr.get(0).map_or(last_end, |m| m.end());

        let lower = attr_name.to_ascii_lowercase();
        if lower.starts_with("on") && lower != "open" {
            continue;
        }
        let value = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4));
        if URL_ATTRIBUTES.contains(&lower.as_str())
            && value.is_some_and(|v| is_script_url(v.as_str()))
        {
            tag.push_str(&format!(r##" {attr_name}="#""##));
        } else {
            tag.push(' ');
            tag.push_str(whole);
        }
    }

    let tail = &attributes[last_end..];
    if tail.trim() == "/" {
        tag.push_str(tail.trim_end());
    } else if tail.contains('/') {
        tag.push_str(" /");
    }
    tag.push('>');
    tag
}

/// Whether a URL attribute value would run script once the browser has
/// decoded character references and dropped whitespace.
fn is_script_url(value: &str) -> bool {
    let decoded = NUMERIC_REFERENCE.replace_all(value, |caps: &Captures<'_>| {
        let code = caps.get(1).map_or_else(
            || caps.get(2).and_then(|dec| dec.as_str().parse::<u32>().ok()),
            |hex| u32::from_str_radix(hex.as_str(), 16).ok(),
        );
        code.and_then(char::from_u32).map(String::from).unwrap_or_default()
    });
    let decoded = NAMED_REFERENCE.replace_all(&decoded, |caps: &Captures<'_>| {
        String::from(if caps[1].eq_ignore_ascii_case("colon") { ":" } else { "" })
    });
    let scheme: String = decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    scheme.starts_with("javascript:")
        || scheme.starts_with("vbscript:")
        || (scheme.starts_with("data:") && !scheme.starts_with("data:image/"))
}

/// Reduce an HTML fragment to readable plain text.
#[must_use]
pub fn to_plain_text(html: &str) -> String {
    let safe = sanitize_html(html);
    let spaced = BLOCK_BREAKS.replace_all(&safe, " ");
    let stripped = ANY_TAG.replace_all(&spaced, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Format a creation date the way the card footer shows it: `Oct 14, 2026`.
#[must_use]
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Template view of one todo.
#[derive(Debug, Clone, Serialize)]
struct TodoView {
    id: i64,
    title: String,
    status: &'static str,
    label: &'static str,
    completed: bool,
    description: String,
    created: Option<String>,
}

impl From<&TodoItem> for TodoView {
    fn from(todo: &TodoItem) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            status: todo.status.as_str(),
            label: todo.status.label(),
            completed: todo.completed,
            description: to_plain_text(&todo.description),
            created: todo.created_at.map(format_date),
        }
    }
}

/// Label shown above a filtered listing; `None` for the unfiltered view.
#[must_use]
pub const fn filter_label(filter: StatusFilter) -> Option<&'static str> {
    match filter {
        StatusFilter::All => None,
        StatusFilter::Only(status) => Some(status.label()),
    }
}

/// Render a listing of todos, or `empty_message` when there are none.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn render_list(
    todos: &[&TodoItem],
    filter: StatusFilter,
    empty_message: Option<&str>,
) -> Result<String> {
    let views: Vec<TodoView> = todos.iter().map(|t| TodoView::from(*t)).collect();
    let mut ctx = Context::new();
    ctx.insert("todos", &views);
    ctx.insert("empty_message", &empty_message);
    ctx.insert("filter_label", &filter_label(filter));
    templates::render(LIST_TEMPLATE, &ctx)
}

/// Render every field of one todo.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn render_detail(todo: &TodoItem) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("todo", &TodoView::from(todo));
    templates::render(DETAIL_TEMPLATE, &ctx)
}

/// Render the confirmation prompt for `action` on `todo`.
///
/// # Errors
///
/// Returns an error if the template cannot be rendered.
pub fn render_confirmation(action: Action, todo: &TodoItem) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("message", action.confirmation_message());
    ctx.insert("todo", &TodoView::from(todo));
    templates::render(CONFIRM_TEMPLATE, &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todos::Status;
    use chrono::TimeZone;
    use serial_test::serial;

    fn item(id: i64, title: &str, status: Status) -> TodoItem {
        TodoItem {
            id,
            title: title.to_string(),
            description: String::new(),
            status,
            completed: status == Status::Completed,
            created_at: Some(Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_sanitize_removes_scripts() {
        let html = r#"<p>hi</p><script type="text/javascript">alert(1)</script><b>there</b>"#;
        assert_eq!(sanitize_html(html), "<p>hi</p><b>there</b>");
    }

    #[test]
    fn test_sanitize_removes_unclosed_and_mixed_case_tags() {
        assert_eq!(sanitize_html("a<SCRIPT src=x.js>b"), "ab");
        assert_eq!(sanitize_html("<Style>p{}</STYLE>ok"), "ok");
    }

    #[test]
    fn test_sanitize_strips_event_handlers() {
        let html = r#"<img src="/api/placeholder/200/150" onerror="alert(1)" alt="x">"#;
        assert_eq!(sanitize_html(html), r#"<img src="/api/placeholder/200/150" alt="x">"#);
    }

    #[test]
    fn test_sanitize_neutralises_javascript_links() {
        let html = r#"<a href="javascript:alert(1)">Link</a>"#;
        assert_eq!(sanitize_html(html), r##"<a href="#">Link</a>"##);
    }

    #[test]
    fn test_sanitize_strips_handlers_after_slash() {
        assert_eq!(sanitize_html("<svg/onload=alert(1)>"), "<svg>");
        let html = r#"<img/src="x.png"/onerror='alert(1)'>"#;
        assert_eq!(sanitize_html(html), r#"<img src="x.png">"#);
        assert_eq!(sanitize_html("<details open>x</details>"), "<details open>x</details>");
    }

    #[test]
    fn test_sanitize_decodes_references_in_urls() {
        let html = r#"<a href="&#106;avascript:alert(1)">x</a>"#;
        assert_eq!(sanitize_html(html), r##"<a href="#">x</a>"##);

        let html = r#"<a href="java&#x09;script&colon;alert(1)">x</a>"#;
        assert_eq!(sanitize_html(html), r##"<a href="#">x</a>"##);

        let html = r#"<a href=" JAVASCRIPT:alert(1)">x</a>"#;
        assert_eq!(sanitize_html(html), r##"<a href="#">x</a>"##);
    }

    #[test]
    fn test_sanitize_covers_form_and_svg_url_attributes() {
        let html = concat!(
            r#"<form action="javascript:alert(1)">"#,
            r#"<button formaction='javascript:x'>go</button></form>"#,
        );
        assert_eq!(
            sanitize_html(html),
            r##"<form action="#"><button formaction="#">go</button></form>"##
        );

        let html = r#"<svg><a xlink:href="javascript:alert(1)">x</a></svg>"#;
        assert_eq!(sanitize_html(html), r##"<svg><a xlink:href="#">x</a></svg>"##);

        let html = concat!(
            r#"<a href="data:text/html,<b>x</b>">x</a>"#,
            r#"<img src="data:image/png;base64,AA==">"#,
        );
        assert_eq!(
            sanitize_html(html),
            r##"<a href="#">x</a><img src="data:image/png;base64,AA==">"##
        );
    }

    #[test]
    fn test_sanitize_keeps_quoted_angle_brackets_inside_the_tag() {
        let html = r#"<a title="a > b" onclick="alert(1)" href="/ok">x</a>"#;
        assert_eq!(sanitize_html(html), r#"<a title="a > b" href="/ok">x</a>"#);
    }

    #[test]
    fn test_sanitize_keeps_self_closing_tags() {
        assert_eq!(sanitize_html("a<br/>b"), "a<br/>b");
        assert_eq!(sanitize_html(r#"<img src="x.png" />"#), r#"<img src="x.png" />"#);
    }

    #[test]
    fn test_sanitize_keeps_editor_markup() {
        let html = r##"<ul><li>List item</li></ul><a href="#">Link</a><code>HTML code</code>"##;
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn test_to_plain_text() {
        let html = "<ul><li>List item</li><li>Second</li></ul><code>a &amp;&amp; b</code>";
        assert_eq!(to_plain_text(html), "List item Second a && b");
        assert_eq!(to_plain_text("line<br/>break&nbsp;here"), "line break here");
        assert_eq!(to_plain_text("<script>evil()</script>"), "");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 10, 4, 0, 0, 0).unwrap();
        assert_eq!(format_date(date), "Oct 4, 2026");
    }

    #[test]
    fn test_filter_label() {
        assert_eq!(filter_label(StatusFilter::All), None);
        assert_eq!(filter_label(StatusFilter::Only(Status::InProgress)), Some("In Progress"));
    }

    #[test]
    #[serial]
    fn test_render_list() {
        templates::reset_cache().unwrap();
        let mut milk = item(1, "Buy milk", Status::Todo);
        milk.description = "<b>2 litres</b>".into();
        let done = item(2, "File taxes", Status::Completed);

        let out = render_list(&[&milk, &done], StatusFilter::All, None).unwrap();
        assert!(out.contains("[TODO] Buy milk"));
        assert!(out.contains("2 litres"));
        assert!(!out.contains("<b>"));
        assert!(out.contains("[COMPLETED] File taxes"));
        assert!(out.contains("Oct 14, 2026"));
        assert!(!out.contains("Showing:"));
    }

    #[test]
    #[serial]
    fn test_render_list_empty_and_filtered() {
        templates::reset_cache().unwrap();
        let out = render_list(
            &[],
            StatusFilter::Only(Status::InQa),
            Some("No todos match the selected filter."),
        )
        .unwrap();
        assert!(out.contains("Showing: In QA"));
        assert!(out.contains("No todos match the selected filter."));
    }

    #[test]
    #[serial]
    fn test_render_detail_and_confirmation() {
        templates::reset_cache().unwrap();
        let done = item(7, "Ship release", Status::Completed);

        let detail = render_detail(&done).unwrap();
        assert!(detail.contains("Ship release"));
        assert!(detail.contains("(locked)"));

        let prompt = render_confirmation(Action::Delete, &done).unwrap();
        assert!(prompt.contains("Are you sure you want to delete this todo?"));
        assert!(prompt.contains("#7"));
    }

    #[test]
    #[serial]
    fn test_render_without_creation_date() {
        templates::reset_cache().unwrap();
        let mut legacy = item(9, "Legacy note", Status::Todo);
        legacy.created_at = None;

        let detail = render_detail(&legacy).unwrap();
        assert!(detail.contains("Legacy note"));
        assert!(!detail.contains("created:"));

        let list = render_list(&[&legacy], StatusFilter::All, None).unwrap();
        assert!(list.contains("[TODO] Legacy note"));
        assert!(!list.contains("Created"));
    }
}
