//! HTML rendering for the voting page.
//!
//! # Responsibilities
//! - Render the full page returned by both GET and POST
//! - Escape label and title text before it reaches markup
//! - Parse tallies back out of a rendered page (used by the CLI)
//!
//! # Design Decisions
//! - One template, formatted inline; the page is small enough that a
//!   template engine would be pure overhead
//! - Tally values sit in `id`-tagged spans so machine readers never have
//!   to guess at the surrounding markup

use crate::http::server::Board;

/// Tally pair rendered into the results section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tallies {
    pub value1: i64,
    pub value2: i64,
}

const STYLE: &str = "\
body { font-family: sans-serif; background: #f4f4f4; margin: 0; }
#container { max-width: 32em; margin: 4em auto; padding: 2em; background: #fff; }
#choices button { font-size: 1.2em; padding: 0.5em 1.5em; margin-right: 0.5em; }
#results { margin-top: 2em; font-size: 1.4em; }";

/// Render the voting page for the given board and tallies.
pub fn render(board: &Board, tallies: Tallies) -> String {
    let title = escape(&board.title);
    let button1 = escape(&board.button1);
    let button2 = escape(&board.button2);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
<div id="container">
<h1 id="title">{title}</h1>
<form id="choices" method="post" action="/">
<button id="vote1" type="submit" name="vote" value="{button1}">{button1}</button>
<button id="vote2" type="submit" name="vote" value="{button2}">{button2}</button>
<button id="reset" type="submit" name="vote" value="reset">Reset</button>
</form>
<div id="results">
{button1} - <span id="tally1">{value1}</span> | {button2} - <span id="tally2">{value2}</span>
</div>
</div>
</body>
</html>
"#,
        title = title,
        style = STYLE,
        button1 = button1,
        button2 = button2,
        value1 = tallies.value1,
        value2 = tallies.value2,
    )
}

/// Pull both tally values back out of a rendered page.
pub fn extract_tallies(html: &str) -> Option<(i64, i64)> {
    Some((extract_span(html, "tally1")?, extract_span(html, "tally2")?))
}

fn extract_span(html: &str, id: &str) -> Option<i64> {
    let marker = format!("id=\"{id}\">");
    let start = html.find(&marker)? + marker.len();
    let rest = &html[start..];
    let end = rest.find('<')?;
    rest[..end].trim().parse().ok()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
