use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One host-managed pane, addressed by a stable integer index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    pub index: usize,
    pub name: String,
}

/// Capability contract over the host terminal.
///
/// Pane ordering is append-only: `create_pane` and `split_pane` hand
/// out increasing indices and an index never moves once assigned.
pub trait PaneHost: Send + Sync {
    fn create_pane(&self, name: &str) -> usize;
    /// Split the most-recently-active pane.
    fn split_pane(&self) -> usize;
    /// Returns false when no pane has that index.
    fn focus_pane(&self, index: usize) -> bool;
    /// Returns false when no pane has that index; callers treat a
    /// dropped send as non-fatal.
    fn send_text(&self, index: usize, text: &str, append_newline: bool) -> bool;
    fn list_panes(&self) -> Vec<PaneInfo>;
}

#[derive(Debug, Default)]
struct Pane {
    name: String,
    transcript: Vec<String>,
}

#[derive(Debug, Default)]
struct HostState {
    panes: Vec<Pane>,
    focused: Option<usize>,
}

/// Pane host backed by process memory.
///
/// The real terminal lives in the host editor; this implementation
/// records every operation so the bridge can run standalone and tests
/// can observe what would have been typed.
#[derive(Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent to a pane so far, for assertions.
    pub fn transcript(&self, index: usize) -> Option<Vec<String>> {
        let state = self.state.lock().expect("host state poisoned");
        state.panes.get(index).map(|p| p.transcript.clone())
    }

    pub fn focused(&self) -> Option<usize> {
        self.state.lock().expect("host state poisoned").focused
    }
}

impl PaneHost for InMemoryHost {
    fn create_pane(&self, name: &str) -> usize {
        let mut state = self.state.lock().expect("host state poisoned");
        state.panes.push(Pane {
            name: name.to_string(),
            transcript: Vec::new(),
        });
        let index = state.panes.len() - 1;
        state.focused = Some(index);
        index
    }

    fn split_pane(&self) -> usize {
        let mut state = self.state.lock().expect("host state poisoned");
        let index = state.panes.len();
        state.panes.push(Pane {
            name: format!("pane_{index}"),
            transcript: Vec::new(),
        });
        state.focused = Some(index);
        index
    }

    fn focus_pane(&self, index: usize) -> bool {
        let mut state = self.state.lock().expect("host state poisoned");
        if index >= state.panes.len() {
            return false;
        }
        state.focused = Some(index);
        true
    }

    fn send_text(&self, index: usize, text: &str, append_newline: bool) -> bool {
        let mut state = self.state.lock().expect("host state poisoned");
        let Some(pane) = state.panes.get_mut(index) else {
            return false;
        };
        if append_newline {
            pane.transcript.push(format!("{text}\n"));
        } else {
            pane.transcript.push(text.to_string());
        }
        true
    }

    fn list_panes(&self) -> Vec<PaneInfo> {
        let state = self.state.lock().expect("host state poisoned");
        state
            .panes
            .iter()
            .enumerate()
            .map(|(index, pane)| PaneInfo {
                index,
                name: pane.name.clone(),
            })
            .collect()
    }
}

/// How a chat submission is terminated after the text lands in the
/// pane. Hosts disagree on which sequence actually submits, so it is
/// a single configurable choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitSequence {
    #[default]
    CarriageReturn,
    LineFeed,
    ResendEmpty,
}

impl FromStr for SubmitSequence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cr" => Ok(Self::CarriageReturn),
            "lf" => Ok(Self::LineFeed),
            "resend" => Ok(Self::ResendEmpty),
            other => Err(format!(
                "unknown submit sequence: {other} (expected cr, lf, or resend)"
            )),
        }
    }
}

/// Send `text` without a newline, then fire the submit terminator
/// after `delay` from a detached task.
///
/// Fire-and-forget: there is no completion signal, and if the pane is
/// gone when the delay fires the terminator is simply dropped.
pub fn submit_text(
    host: Arc<dyn PaneHost>,
    index: usize,
    text: &str,
    sequence: SubmitSequence,
    delay: Duration,
) -> bool {
    if !host.send_text(index, text, false) {
        return false;
    }
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = match sequence {
            SubmitSequence::CarriageReturn => host.send_text(index, "\r", false),
            SubmitSequence::LineFeed => host.send_text(index, "\n", false),
            SubmitSequence::ResendEmpty => host.send_text(index, "", true),
        };
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pane_indices_are_append_only() {
        let host = InMemoryHost::new();
        assert_eq!(host.create_pane("leader"), 0);
        assert_eq!(host.split_pane(), 1);
        assert_eq!(host.split_pane(), 2);

        let panes = host.list_panes();
        assert_eq!(panes.len(), 3);
        assert_eq!(panes[0].name, "leader");
        assert_eq!(panes[2].index, 2);
        assert_eq!(host.focused(), Some(2));
    }

    #[test]
    fn send_to_missing_pane_is_dropped() {
        let host = InMemoryHost::new();
        host.create_pane("leader");
        assert!(host.send_text(0, "hello", true));
        assert!(!host.send_text(7, "lost", true));
        assert_eq!(host.transcript(0).unwrap(), vec!["hello\n"]);
    }

    #[test]
    fn submit_sequence_parses() {
        assert_eq!("cr".parse(), Ok(SubmitSequence::CarriageReturn));
        assert_eq!("lf".parse(), Ok(SubmitSequence::LineFeed));
        assert_eq!("resend".parse(), Ok(SubmitSequence::ResendEmpty));
        assert!("enter".parse::<SubmitSequence>().is_err());
    }

    #[tokio::test]
    async fn submit_sends_text_then_one_terminator() {
        let host = Arc::new(InMemoryHost::new());
        host.create_pane("leader");

        let sent = submit_text(
            host.clone(),
            0,
            "read instructions/leader.md",
            SubmitSequence::CarriageReturn,
            Duration::from_millis(10),
        );
        assert!(sent);
        assert_eq!(
            host.transcript(0).unwrap(),
            vec!["read instructions/leader.md"]
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            host.transcript(0).unwrap(),
            vec!["read instructions/leader.md".to_string(), "\r".to_string()]
        );
    }

    #[tokio::test]
    async fn submit_to_missing_pane_reports_dropped() {
        let host = Arc::new(InMemoryHost::new());
        assert!(!submit_text(
            host,
            3,
            "nobody home",
            SubmitSequence::LineFeed,
            Duration::from_millis(1),
        ));
    }
}
