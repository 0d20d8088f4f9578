use std::fmt::Write;

use axum::{extract::State, response::Html};
use service::waitlist::WaitlistEntry;

use crate::state::ServerState;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Waitlist</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 900px; margin: 50px auto; padding: 20px; }
        h1 { color: #333; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { text-align: left; padding: 12px; border-bottom: 1px solid #ddd; }
        th { background-color: #f5f5f5; font-weight: 600; }
        tr:hover { background-color: #f9f9f9; }
        .count { color: #666; margin-top: 10px; }
    </style>
</head>
<body>
    <h1>Waitlist</h1>
"#;

const PAGE_TAIL: &str = r#"        </tbody>
    </table>
</body>
</html>
"#;

/// `GET /admin`: every signup, newest first.
pub async fn view_waitlist(State(state): State<ServerState>) -> Html<String> {
    let entries = state.store.list().await;
    Html(render_admin_page(&entries))
}

pub fn render_admin_page(entries: &[WaitlistEntry]) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + entries.len() * 128);
    html.push_str(PAGE_HEAD);
    // Writing into a String cannot fail.
    let _ = writeln!(html, r#"    <div class="count">Total subscribers: {}</div>"#, entries.len());
    html.push_str(
        "    <table>\n        <thead>\n            <tr>\n                <th>ID</th>\n                <th>Email</th>\n                <th>Joined</th>\n            </tr>\n        </thead>\n        <tbody>\n",
    );

    if entries.is_empty() {
        html.push_str(
            "            <tr>\n                <td colspan=\"3\" style=\"text-align: center; color: #999;\">No entries yet</td>\n            </tr>\n",
        );
    }
    for e in entries {
        let _ = write!(
            html,
            "            <tr>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n            </tr>\n",
            e.id,
            escape_html(&e.email),
            e.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    html.push_str(PAGE_TAIL);
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, email: &str, at: &str) -> WaitlistEntry {
        WaitlistEntry { id, email: email.into(), created_at: at.parse().expect("timestamp") }
    }

    #[test]
    fn empty_page_shows_placeholder() {
        let html = render_admin_page(&[]);
        assert!(html.contains("Total subscribers: 0"));
        assert!(html.contains("No entries yet"));
    }

    #[test]
    fn rows_keep_given_order_and_format_time() {
        let html = render_admin_page(&[
            entry(2, "b@x.io", "2024-05-02T09:30:59Z"),
            entry(1, "a@x.io", "2024-05-01T18:05:00Z"),
        ]);
        assert!(html.contains("Total subscribers: 2"));
        assert!(!html.contains("No entries yet"));
        assert!(html.contains("<td>2024-05-02 09:30</td>"));
        let b = html.find("b@x.io").expect("b rendered");
        let a = html.find("a@x.io").expect("a rendered");
        assert!(b < a);
    }

    #[test]
    fn email_is_escaped() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&#34;x&#34;&gt;&amp;&#39;");
    }
}
