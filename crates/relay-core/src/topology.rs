use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{RelayError, Result};
use crate::roles::{self, RoleStrategy};

/// Snapshot file written at the target root. Unlike the mailbox files
/// it is rewritten unconditionally on every materialize run.
pub const CONFIG_FILE: &str = ".relay-config.json";

/// Resolved count + role list + flags for one initialized project.
///
/// Built once per initialization run and threaded through the steps as
/// an immutable value; re-running init with `force` is the only way to
/// replace it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    pub pane_count: usize,
    pub roles: Vec<String>,
    pub first_pane_is_leader: bool,
    pub auto_split: bool,
    pub created_at: DateTime<Utc>,
}

impl Topology {
    /// Build a topology from an explicit role list.
    pub fn new(roles: Vec<String>, first_pane_is_leader: bool, auto_split: bool) -> Result<Self> {
        if roles.is_empty() {
            return Err(RelayError::InvalidTopology("empty role list".into()));
        }
        let mut seen = HashSet::new();
        for role in &roles {
            if role.trim().is_empty() {
                return Err(RelayError::InvalidTopology("blank role name".into()));
            }
            if !seen.insert(role.as_str()) {
                return Err(RelayError::InvalidTopology(format!(
                    "duplicate role name: {role}"
                )));
            }
        }
        Ok(Self {
            pane_count: roles.len(),
            roles,
            first_pane_is_leader,
            auto_split,
            created_at: Utc::now(),
        })
    }

    /// Resolve a pane count through a role strategy into a topology.
    pub fn resolve(pane_count: usize, strategy: RoleStrategy, auto_split: bool) -> Result<Self> {
        let roles = roles::resolve(pane_count, strategy);
        let first_pane_is_leader = matches!(
            strategy,
            RoleStrategy::LeaderFlag {
                first_pane_is_leader: true
            }
        );
        Self::new(roles, first_pane_is_leader, auto_split)
    }

    pub fn snapshot_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Write the snapshot, replacing any previous one.
    pub fn save(&self, root: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::snapshot_path(root), json)?;
        Ok(())
    }

    /// Load the snapshot written by a previous init run.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::snapshot_path(root);
        if !path.exists() {
            return Err(RelayError::ConfigMissing(path));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Pane index of a role, if it is part of this topology.
    pub fn role_index(&self, role: &str) -> Option<usize> {
        self.roles.iter().position(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RolePreset;

    #[test]
    fn length_matches_count() {
        for count in 2..=6 {
            let topo = Topology::resolve(count, RoleStrategy::default(), false).unwrap();
            assert_eq!(topo.pane_count, count);
            assert_eq!(topo.roles.len(), count);
        }
    }

    #[test]
    fn rejects_duplicate_roles() {
        let err = Topology::new(
            vec!["leader".into(), "member_1".into(), "member_1".into()],
            true,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::InvalidTopology(_)));
    }

    #[test]
    fn rejects_empty_role_list() {
        assert!(Topology::new(vec![], true, false).is_err());
    }

    #[test]
    fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let topo = Topology::resolve(4, RoleStrategy::Preset(RolePreset::OfficerCrew), true)
            .unwrap();
        topo.save(dir.path()).unwrap();

        let loaded = Topology::load(dir.path()).unwrap();
        assert_eq!(loaded, topo);

        let raw = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["paneCount"], 4);
        assert_eq!(value["roles"][0], "officer");
        assert_eq!(value["firstPaneIsLeader"], false);
        assert_eq!(value["autoSplit"], true);
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn load_without_snapshot_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Topology::load(dir.path()).unwrap_err();
        assert!(matches!(err, RelayError::ConfigMissing(_)));
    }

    #[test]
    fn role_index_follows_list_order() {
        let topo = Topology::resolve(3, RoleStrategy::default(), false).unwrap();
        assert_eq!(topo.role_index("leader"), Some(0));
        assert_eq!(topo.role_index("member_2"), Some(2));
        assert_eq!(topo.role_index("nobody"), None);
    }
}
