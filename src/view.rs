//! Server-rendered dashboard page.
//!
//! DESIGN
//! ======
//! One parameterized page replaces separate public and gated front-ends.
//! `ViewOptions` carries what differed between them (title, caption, login
//! gate); `PageModel` carries everything one render needs, so rendering is a
//! pure function from model to HTML and can be asserted on in tests.
//!
//! Every user- or backend-supplied string goes through `escape_html`.

use std::fmt::Write;

use crate::backend::types::{DEFAULT_DEPTH, GenerationResult, HISTORY_LIMIT, MAX_DEPTH, MIN_DEPTH};
use crate::config::DashboardConfig;
use crate::services::dashboard::{BackendStatus, HistoryView, MSG_HISTORY_UNAVAILABLE, MSG_NO_HISTORY, Notice};
use crate::session::Session;

pub const DEFAULT_TITLE: &str = "AutoGen AI";
pub const DEFAULT_CAPTION: &str = "AI-powered generator for PRDs, landing pages, FAQs, and marketing content.";
pub const BRIEF_PLACEHOLDER: &str = "Example: AI tool for helping businesses create content automatically.";

const STYLE: &str = r"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2328; background: #fafafa; }
.layout { display: grid; grid-template-columns: 260px 1fr; min-height: 100vh; }
aside { background: #f0f2f6; padding: 1.5rem 1rem; }
main { padding: 1.5rem 2rem; }
.columns { display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }
.notice { padding: .6rem .8rem; border-radius: 6px; margin: .5rem 0; }
.notice-success { background: #e6f4ea; }
.notice-info { background: #e7f0fb; }
.notice-warning { background: #fff6dd; }
.notice-error { background: #fde7e9; }
.section-body { white-space: pre-wrap; margin: 0 0 1rem 0; }
textarea { width: 100%; min-height: 150px; }
label { display: block; margin-top: .5rem; }
input[type=email], input[type=password] { width: 100%; }
footer { color: #6e7781; font-size: .85rem; margin-top: 2rem; }
";

/// What distinguishes one dashboard deployment from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub title: String,
    pub caption: String,
    /// Hide the generate form until the session is authenticated.
    pub require_login: bool,
}

impl ViewOptions {
    /// Options for a deployment, applying any configured overrides.
    #[must_use]
    pub fn for_config(config: &DashboardConfig) -> Self {
        let defaults = Self::default();
        Self {
            title: config.title.clone().unwrap_or(defaults.title),
            caption: config.caption.clone().unwrap_or(defaults.caption),
            require_login: config.require_login,
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self { title: DEFAULT_TITLE.into(), caption: DEFAULT_CAPTION.into(), require_login: false }
    }
}

/// Everything one render of the page needs.
pub struct PageModel<'a> {
    pub options: &'a ViewOptions,
    pub backend_url: &'a str,
    /// True when the deployment runs with the developer bypass.
    pub dev_bypass: bool,
    pub status: BackendStatus,
    pub session: &'a Session,
    pub notices: &'a [Notice],
    pub history: &'a HistoryView,
    /// Brief text to keep in the form after a submit.
    pub brief: &'a str,
    pub depth: u8,
}

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the full dashboard page.
#[must_use]
pub fn render_dashboard(model: &PageModel<'_>) -> String {
    let title = escape_html(&model.options.title);
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title><style>{STYLE}</style></head><body><div class=\"layout\">"
    );

    html.push_str("<aside>");
    render_account(&mut html, model);
    html.push_str("</aside><main>");

    let _ = write!(html, "<h1>{title}</h1><p class=\"caption\">{}</p>", escape_html(&model.options.caption));
    render_status_banner(&mut html, model);
    for notice in model.notices {
        render_notice(&mut html, notice);
    }

    html.push_str("<div class=\"columns\"><section class=\"workspace\">");
    render_brief_form(&mut html, model);
    if let Some(result) = &model.session.last_generation {
        render_results(&mut html, result);
    }
    html.push_str("</section><section class=\"history\">");
    render_history(&mut html, model.history);
    render_tips(&mut html);
    html.push_str("</section></div>");

    html.push_str(
        "<footer>Dev mode available via BACKEND_URL and ADMIN_BYPASS in .env</footer>\
         </main></div></body></html>",
    );
    html
}

fn render_notice(html: &mut String, notice: &Notice) {
    let _ = write!(
        html,
        "<div class=\"notice notice-{}\">{}</div>",
        notice.level(),
        escape_html(notice.message())
    );
}

fn render_status_banner(html: &mut String, model: &PageModel<'_>) {
    let banner = match model.status {
        BackendStatus::Online => Notice::Info(format!("Backend available: {}", model.backend_url)),
        BackendStatus::Offline => Notice::Warning("Backend offline — using demo mode.".into()),
    };
    render_notice(html, &banner);
}

fn render_account(html: &mut String, model: &PageModel<'_>) {
    html.push_str("<h2>Account</h2>");
    let session = model.session;

    if model.dev_bypass && session.is_dev_bypass() {
        let email = session.user_email.as_deref().unwrap_or_default();
        render_notice(html, &Notice::Success(format!("Developer mode: logged in as {email}")));
        render_notice(html, &Notice::Info("Developer bypass enabled (.env)".into()));
        html.push_str(
            "<form method=\"post\" action=\"/logout\"><button type=\"submit\">Logout (dev)</button></form>",
        );
        return;
    }

    if session.is_authenticated() {
        let email = session.user_email.as_deref().unwrap_or_default();
        render_notice(html, &Notice::Success(format!("Logged in as {email}")));
        html.push_str("<form method=\"post\" action=\"/logout\"><button type=\"submit\">Logout</button></form>");
        return;
    }

    html.push_str(
        "<h3>Login</h3>\
         <form method=\"post\" action=\"/login\">\
         <label>Email <input type=\"email\" name=\"email\" autocomplete=\"username\"></label>\
         <label>Password <input type=\"password\" name=\"password\" autocomplete=\"current-password\"></label>\
         <button type=\"submit\">Login</button></form>\
         <h3>Sign up</h3>\
         <form method=\"post\" action=\"/signup\">\
         <label>New email <input type=\"email\" name=\"email\" autocomplete=\"username\"></label>\
         <label>New password <input type=\"password\" name=\"password\" autocomplete=\"new-password\"></label>\
         <button type=\"submit\">Sign up</button></form>",
    );
}

fn render_brief_form(html: &mut String, model: &PageModel<'_>) {
    html.push_str("<h2>Write product brief</h2>");
    if model.options.require_login && !model.session.is_authenticated() {
        render_notice(html, &Notice::Info("Log in to generate content.".into()));
        return;
    }

    let depth = if (MIN_DEPTH..=MAX_DEPTH).contains(&model.depth) { model.depth } else { DEFAULT_DEPTH };
    let _ = write!(
        html,
        "<form method=\"post\" action=\"/generate\">\
         <label>Product brief<textarea name=\"brief\" placeholder=\"{placeholder}\">{brief}</textarea></label>\
         <label>Detail level <input type=\"range\" name=\"depth\" min=\"{MIN_DEPTH}\" max=\"{MAX_DEPTH}\" \
         step=\"1\" value=\"{depth}\"> <output>{depth}</output></label>\
         <button type=\"submit\">Generate</button></form>",
        placeholder = escape_html(BRIEF_PLACEHOLDER),
        brief = escape_html(model.brief),
    );
}

fn render_results(html: &mut String, result: &GenerationResult) {
    html.push_str("<h3>Results</h3>");
    for (name, text) in result.sections() {
        let _ = write!(
            html,
            "<h4>{}</h4><div class=\"section-body\">{}</div>",
            escape_html(name),
            escape_html(&text)
        );
    }
}

fn render_history(html: &mut String, history: &HistoryView) {
    let _ = write!(html, "<h2>History (last {HISTORY_LIMIT})</h2>");
    match history {
        HistoryView::Entries(entries) => {
            html.push_str("<ul class=\"history-list\">");
            for entry in entries.iter().take(HISTORY_LIMIT) {
                let _ = write!(
                    html,
                    "<li><strong>{}</strong> — {}",
                    escape_html(entry.display_brief()),
                    escape_html(entry.display_created_at())
                );
                if !entry.documents.is_empty() {
                    html.push_str("<details><summary>Documents</summary>");
                    for (name, text) in entry.documents.sections() {
                        let _ = write!(
                            html,
                            "<h5>{}</h5><div class=\"section-body\">{}</div>",
                            escape_html(name),
                            escape_html(&text)
                        );
                    }
                    html.push_str("</details>");
                }
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
        HistoryView::Empty => render_notice(html, &Notice::Info(MSG_NO_HISTORY.into())),
        HistoryView::Unavailable => render_notice(html, &Notice::Info(MSG_HISTORY_UNAVAILABLE.into())),
    }
}

fn render_tips(html: &mut String) {
    html.push_str(
        "<hr><h2>Quick tips</h2><ul class=\"tips\">\
         <li>Use a short 1–2 line brief</li>\
         <li>Depth 3 = more detailed content</li>\
         <li>Offline mode uses demo output</li></ul>",
    );
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
