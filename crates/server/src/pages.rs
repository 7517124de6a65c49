//! Page bodies and the shared document layout.

use std::fmt::Write as _;

use shared::domain::{PageDescriptor, PageSet, TransitionKind};

pub fn builtin_body(page_id: &str) -> Option<&'static str> {
    let body = match page_id {
        "welcome" => WELCOME,
        "animations" => ANIMATIONS,
        "effects" => EFFECTS,
        "interaction" => INTERACTION,
        "ready" => READY,
        _ => return None,
    };
    Some(body)
}

/// Wraps a page body in the element the client swaps in and out.
pub fn page_section(page: &PageDescriptor, body: &str, active: bool) -> String {
    let class = if active { "page active" } else { "page" };
    format!(
        "<section class=\"{class}\" data-page-id=\"{id}\">{body}</section>",
        id = escape_html(page.id.as_str()),
    )
}

pub struct Layout<'a> {
    pub pages: &'a PageSet,
    pub index: usize,
    pub content: &'a str,
    pub animation_duration_ms: u64,
}

impl Layout<'_> {
    pub fn render(&self) -> String {
        let title = self
            .pages
            .get(self.index)
            .map(|page| page.title.as_str())
            .unwrap_or_default();

        let mut nav = String::new();
        let mut dots = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            let active = if i == self.index { " active" } else { "" };
            let _ = write!(
                nav,
                "<a href=\"{route}\" class=\"nav-link{active}\" data-page=\"{i}\">{title}</a>",
                route = escape_html(&page.route),
                title = escape_html(&page.title),
            );
            let _ = write!(
                dots,
                "<button class=\"indicator-dot{active}\" data-page=\"{i}\" aria-label=\"{title}\"></button>",
                title = escape_html(&page.title),
            );
        }

        let mut options = String::new();
        for kind in TransitionKind::ALL {
            let selected = if kind == TransitionKind::default() {
                " selected"
            } else {
                ""
            };
            let _ = write!(options, "<option value=\"{kind}\"{selected}>{kind}</option>");
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/css/style.css">
<style>:root {{ --transition-duration: {duration}ms; }}</style>
</head>
<body>
<nav class="main-nav">{nav}</nav>
<label class="transition-picker">Transition <select id="transitionType">{options}</select></label>
<main id="pageContainer">{content}</main>
<div class="page-indicators">{dots}</div>
<script>window.currentPageIndex = {index}; window.transitionDurationMs = {duration};</script>
</body>
</html>
"#,
            title = escape_html(title),
            duration = self.animation_duration_ms,
            content = self.content,
            index = self.index,
        )
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const WELCOME: &str = r#"<div class="page-content">
<h1>Smooth Page Transitions</h1>
<p>Move between pages without a full reload. Every page change is fetched in the background and animated into place.</p>
<a href="/animations" class="transition-link" data-page="1">See the animations</a>
</div>"#;

const ANIMATIONS: &str = r#"<div class="page-content">
<h1>Smooth Animations</h1>
<p>The outgoing page animates out while the new one animates in. Direction follows the page order.</p>
<a href="/effects" class="transition-link" data-page="2">Try other effects</a>
</div>"#;

const EFFECTS: &str = r#"<div class="page-content">
<h1>Multiple Effects</h1>
<p>Slide, fade, zoom, rotate, flip and cube. Pick one from the selector and keep navigating.</p>
<a href="/interaction" class="transition-link" data-page="3">Ways to navigate</a>
</div>"#;

const INTERACTION: &str = r#"<div class="page-content">
<h1>Touch &amp; Click</h1>
<p>Use the links, the dots, the arrow keys, Home and End, or swipe left and right.</p>
<a href="/ready" class="transition-link" data-page="4">Almost done</a>
</div>"#;

const READY: &str = r#"<div class="page-content">
<h1>Ready to Use</h1>
<p>Back and forward buttons keep working. Start again from the beginning whenever you like.</p>
<a href="/" class="transition-link" data-page="0">Back to start</a>
</div>"#;
