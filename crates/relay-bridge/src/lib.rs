pub mod client;
pub mod host;
pub mod server;

pub use client::{BridgeClient, DEFAULT_PORT};
pub use host::{InMemoryHost, PaneHost, PaneInfo, SubmitSequence, submit_text};
pub use server::{BridgeState, PaneLayout, router};
