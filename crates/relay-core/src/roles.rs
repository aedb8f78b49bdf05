use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MIN_PANES: usize = 2;
pub const MAX_PANES: usize = 6;
pub const DEFAULT_PANES: usize = 3;

/// Clamp a requested pane count into the supported range.
///
/// Out-of-range counts are never rejected, only pulled to the nearest
/// boundary.
pub fn clamp_pane_count(count: i64) -> usize {
    count.clamp(MIN_PANES as i64, MAX_PANES as i64) as usize
}

/// Parse a pane count from user input. Non-numeric input defaults to
/// [`DEFAULT_PANES`]; the result is always clamped.
pub fn parse_pane_count(input: &str) -> usize {
    let parsed = input
        .trim()
        .parse::<i64>()
        .unwrap_or(DEFAULT_PANES as i64);
    clamp_pane_count(parsed)
}

/// How a pane count maps onto an ordered role list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleStrategy {
    /// Pane 0 is `leader` when the flag is set; remaining panes are
    /// `member_1..`. Without the flag every pane is a member.
    LeaderFlag { first_pane_is_leader: bool },
    /// Fixed lookup table keyed by pane count.
    Preset(RolePreset),
}

impl Default for RoleStrategy {
    fn default() -> Self {
        Self::LeaderFlag {
            first_pane_is_leader: true,
        }
    }
}

/// Named role-naming presets. The leader/member scheme is canonical;
/// these exist for teams that prefer a different vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePreset {
    /// `officer`, `leader`, then `member_1..`.
    OfficerCrew,
    /// Flat `agent_1..agent_n`.
    FlatAgents,
    /// Generic `pane_0..pane_(n-1)` fallback.
    FlatPanes,
}

impl FromStr for RolePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "officer" => Ok(Self::OfficerCrew),
            "agents" => Ok(Self::FlatAgents),
            "panes" => Ok(Self::FlatPanes),
            other => Err(format!(
                "unknown preset: {other} (expected officer, agents, or panes)"
            )),
        }
    }
}

/// Resolve a pane count and strategy into an ordered role list.
///
/// Pure and total: the count is clamped into `[MIN_PANES, MAX_PANES]`
/// before resolution, the result length always equals the clamped
/// count, and role names are unique. Index 0 is the primary pane.
pub fn resolve(pane_count: usize, strategy: RoleStrategy) -> Vec<String> {
    let count = clamp_pane_count(pane_count as i64);
    match strategy {
        RoleStrategy::LeaderFlag {
            first_pane_is_leader: true,
        } => {
            let mut roles = vec!["leader".to_string()];
            roles.extend((1..count).map(|i| format!("member_{i}")));
            roles
        }
        RoleStrategy::LeaderFlag {
            first_pane_is_leader: false,
        } => (1..=count).map(|i| format!("member_{i}")).collect(),
        RoleStrategy::Preset(RolePreset::OfficerCrew) => {
            let mut roles = vec!["officer".to_string(), "leader".to_string()];
            roles.extend((1..=count - 2).map(|i| format!("member_{i}")));
            roles.truncate(count);
            roles
        }
        RoleStrategy::Preset(RolePreset::FlatAgents) => {
            (1..=count).map(|i| format!("agent_{i}")).collect()
        }
        RoleStrategy::Preset(RolePreset::FlatPanes) => {
            (0..count).map(|i| format!("pane_{i}")).collect()
        }
    }
}

/// Closed classification of a role name. Every name maps to exactly
/// one class; unknown names are contributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    Coordinator,
    TeamLead,
    Contributor,
}

pub fn classify(role: &str) -> RoleClass {
    match role {
        "officer" => RoleClass::Coordinator,
        "leader" => RoleClass::TeamLead,
        _ => RoleClass::Contributor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_clamped() {
        assert_eq!(clamp_pane_count(1), 2);
        assert_eq!(clamp_pane_count(9), 6);
        assert_eq!(clamp_pane_count(-3), 2);
        assert_eq!(clamp_pane_count(4), 4);
        assert_eq!(
            resolve(1, RoleStrategy::default()),
            resolve(2, RoleStrategy::default())
        );
        assert_eq!(
            resolve(9, RoleStrategy::default()),
            resolve(6, RoleStrategy::default())
        );
    }

    #[test]
    fn non_numeric_input_defaults() {
        assert_eq!(parse_pane_count("abc"), 3);
        assert_eq!(parse_pane_count(""), 3);
        assert_eq!(parse_pane_count(" 5 "), 5);
        assert_eq!(parse_pane_count("0"), 2);
        assert_eq!(parse_pane_count("100"), 6);
    }

    #[test]
    fn leader_flag_roles() {
        assert_eq!(
            resolve(
                5,
                RoleStrategy::LeaderFlag {
                    first_pane_is_leader: true
                }
            ),
            vec!["leader", "member_1", "member_2", "member_3", "member_4"]
        );
        assert_eq!(
            resolve(
                5,
                RoleStrategy::LeaderFlag {
                    first_pane_is_leader: false
                }
            ),
            vec!["member_1", "member_2", "member_3", "member_4", "member_5"]
        );
    }

    #[test]
    fn officer_preset_table() {
        assert_eq!(
            resolve(4, RoleStrategy::Preset(RolePreset::OfficerCrew)),
            vec!["officer", "leader", "member_1", "member_2"]
        );
        assert_eq!(
            resolve(2, RoleStrategy::Preset(RolePreset::OfficerCrew)),
            vec!["officer", "leader"]
        );
    }

    #[test]
    fn flat_presets() {
        assert_eq!(
            resolve(3, RoleStrategy::Preset(RolePreset::FlatAgents)),
            vec!["agent_1", "agent_2", "agent_3"]
        );
        assert_eq!(
            resolve(3, RoleStrategy::Preset(RolePreset::FlatPanes)),
            vec!["pane_0", "pane_1", "pane_2"]
        );
    }

    #[test]
    fn resolved_roles_are_unique_and_sized() {
        let strategies = [
            RoleStrategy::LeaderFlag {
                first_pane_is_leader: true,
            },
            RoleStrategy::LeaderFlag {
                first_pane_is_leader: false,
            },
            RoleStrategy::Preset(RolePreset::OfficerCrew),
            RoleStrategy::Preset(RolePreset::FlatAgents),
            RoleStrategy::Preset(RolePreset::FlatPanes),
        ];
        for strategy in strategies {
            for count in MIN_PANES..=MAX_PANES {
                let roles = resolve(count, strategy);
                assert_eq!(roles.len(), count, "{strategy:?} count={count}");
                let mut sorted = roles.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(sorted.len(), count, "{strategy:?} count={count}");
            }
        }
    }

    #[test]
    fn classification_is_total() {
        assert_eq!(classify("officer"), RoleClass::Coordinator);
        assert_eq!(classify("leader"), RoleClass::TeamLead);
        assert_eq!(classify("member_1"), RoleClass::Contributor);
        assert_eq!(classify("agent_2"), RoleClass::Contributor);
        assert_eq!(classify("anything-else"), RoleClass::Contributor);
    }
}
