pub mod error;
pub mod instructions;
pub mod mailbox;
pub mod materialize;
pub mod roles;
pub mod scaffold;
pub mod topology;

pub use error::{RelayError, Result};
pub use mailbox::Mailbox;
pub use materialize::{MaterializeOptions, MaterializeReport, materialize};
pub use roles::{RoleClass, RolePreset, RoleStrategy, classify, resolve};
pub use topology::{CONFIG_FILE, Topology};
