use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use serde::Deserialize;

use relay_core::roles::{self, RoleStrategy};

use crate::host::{PaneHost, SubmitSequence, submit_text};

/// Pane count + role list the bridge currently targets. Updated by
/// `/config` and `/setup`.
#[derive(Debug, Clone)]
pub struct PaneLayout {
    pub count: usize,
    pub roles: Vec<String>,
}

impl Default for PaneLayout {
    fn default() -> Self {
        let count = roles::DEFAULT_PANES;
        Self {
            count,
            roles: roles::resolve(count, RoleStrategy::default()),
        }
    }
}

pub struct BridgeState {
    pub host: Arc<dyn PaneHost>,
    pub layout: Mutex<PaneLayout>,
    pub submit: SubmitSequence,
    pub submit_delay: Duration,
    pub notify_delay: Duration,
}

impl BridgeState {
    pub fn new(host: Arc<dyn PaneHost>, submit: SubmitSequence, submit_delay: Duration) -> Self {
        Self {
            host,
            layout: Mutex::new(PaneLayout::default()),
            submit,
            submit_delay,
            notify_delay: Duration::from_millis(500),
        }
    }
}

/// Build the control-plane router. All endpoints are GET and answer
/// plain text, keyed entirely by query parameters.
pub fn router(state: Arc<BridgeState>) -> Router {
    Router::new()
        .route("/focus", get(focus))
        .route("/send", get(send))
        .route("/chat", get(chat))
        .route("/notify", get(notify))
        .route("/split", get(split))
        .route("/setup", get(setup))
        .route("/list", get(list))
        .route("/identify", get(identify))
        .route("/config", get(config))
        .fallback(usage)
        .with_state(state)
}

#[derive(Deserialize)]
struct FocusQuery {
    index: Option<usize>,
}

#[derive(Deserialize)]
struct TextQuery {
    terminal: Option<usize>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct NotifyQuery {
    terminal: Option<usize>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct LayoutQuery {
    count: Option<usize>,
    roles: Option<String>,
}

async fn usage() -> &'static str {
    "Terminal relay bridge is running. Use /focus, /send, /chat, /notify, /split, /setup, /list, /identify, or /config"
}

async fn focus(State(state): State<Arc<BridgeState>>, Query(q): Query<FocusQuery>) -> String {
    let index = q.index.unwrap_or(0);
    if state.host.focus_pane(index) {
        format!("OK: Focused pane {index}")
    } else {
        format!("OK: Pane {index} not found")
    }
}

async fn send(State(state): State<Arc<BridgeState>>, Query(q): Query<TextQuery>) -> String {
    let terminal = q.terminal.unwrap_or(0);
    let text = q.text.unwrap_or_default();
    if state.host.send_text(terminal, &text, true) {
        tracing::info!(terminal, "sent {} bytes", text.len());
        format!("OK: Sent to pane {terminal}")
    } else {
        tracing::warn!(terminal, "send dropped: pane not found");
        format!("OK: Pane {terminal} not found, send dropped")
    }
}

async fn chat(State(state): State<Arc<BridgeState>>, Query(q): Query<TextQuery>) -> String {
    let terminal = q.terminal.unwrap_or(0);
    let text = q.text.unwrap_or_default();
    if submit_text(
        state.host.clone(),
        terminal,
        &text,
        state.submit,
        state.submit_delay,
    ) {
        format!("OK: Chat sent to pane {terminal}")
    } else {
        format!("OK: Pane {terminal} not found, chat dropped")
    }
}

async fn notify(State(state): State<Arc<BridgeState>>, Query(q): Query<NotifyQuery>) -> String {
    let terminal = q.terminal.unwrap_or(0);
    let message = q
        .message
        .unwrap_or_else(|| "Notification received".to_string());
    state.host.focus_pane(terminal);

    let host = state.host.clone();
    let delay = state.notify_delay;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = host.send_text(terminal, &format!("echo \"{message}\""), true);
    });

    format!("OK: Notified pane {terminal}")
}

async fn split(State(state): State<Arc<BridgeState>>, Query(q): Query<LayoutQuery>) -> String {
    let stored = state.layout.lock().expect("layout poisoned").count;
    let count = roles::clamp_pane_count(q.count.unwrap_or(stored) as i64);
    let existing = state.host.list_panes().len();
    if existing == 0 {
        state.host.create_pane("pane_0");
    }
    while state.host.list_panes().len() < count {
        state.host.split_pane();
    }
    format!("OK: Split to {count} panes")
}

async fn setup(State(state): State<Arc<BridgeState>>, Query(q): Query<LayoutQuery>) -> String {
    let stored = state.layout.lock().expect("layout poisoned").clone();
    let count = roles::clamp_pane_count(q.count.unwrap_or(stored.count) as i64);
    let roles = parse_roles(q.roles.as_deref(), count, &stored.roles);

    // Panes may already exist; banners go to the indices the host
    // actually hands out, not to 0..count.
    for (offset, role) in roles.iter().enumerate() {
        let index = if offset == 0 {
            state.host.create_pane(role)
        } else {
            state.host.split_pane()
        };
        state.host.send_text(index, &format!("# role: {role}"), false);
    }

    let mut layout = state.layout.lock().expect("layout poisoned");
    *layout = PaneLayout {
        count,
        roles: roles.clone(),
    };
    format!("OK: Set up {count} panes with roles: {}", roles.join(", "))
}

async fn list(State(state): State<Arc<BridgeState>>) -> String {
    let panes = state.host.list_panes();
    let mut lines = vec![format!("Panes: {}", panes.len())];
    for pane in panes {
        lines.push(format!("  [{}] {}", pane.index, pane.name));
    }
    lines.join("\n")
}

async fn identify(State(state): State<Arc<BridgeState>>) -> String {
    let panes = state.host.list_panes();
    for pane in &panes {
        state
            .host
            .send_text(pane.index, &format!("Pane index: {}", pane.index), false);
    }
    format!("OK: Sent identity to {} panes", panes.len())
}

async fn config(State(state): State<Arc<BridgeState>>, Query(q): Query<LayoutQuery>) -> String {
    let stored = state.layout.lock().expect("layout poisoned").clone();
    let count = roles::clamp_pane_count(q.count.unwrap_or(stored.count) as i64);
    let roles = parse_roles(q.roles.as_deref(), count, &stored.roles);
    let mut layout = state.layout.lock().expect("layout poisoned");
    *layout = PaneLayout {
        count,
        roles: roles.clone(),
    };
    format!("OK: Config set to {count} panes with roles: {}", roles.join(", "))
}

/// Comma-separated role list from the query, padded with `pane_<i>`
/// names when shorter than the pane count. Absent → the stored layout's
/// roles.
fn parse_roles(param: Option<&str>, count: usize, stored: &[String]) -> Vec<String> {
    let mut roles: Vec<String> = match param {
        Some(raw) if !raw.trim().is_empty() => raw
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
        _ => stored.to_vec(),
    };
    roles.truncate(count);
    for index in roles.len()..count {
        roles.push(format!("pane_{index}"));
    }
    roles
}
