use crate::roles::{RoleClass, classify};
use crate::topology::Topology;

/// Render the instruction document for one role.
///
/// The document always carries the same required sections: role
/// identity, pane-index fact, responsibilities, and literal example
/// commands for the mailbox convention.
pub fn render(role: &str, pane_index: usize, topology: &Topology) -> String {
    match classify(role) {
        RoleClass::Coordinator => render_coordinator(role, pane_index, topology),
        RoleClass::TeamLead => render_team_lead(role, pane_index, topology),
        RoleClass::Contributor => render_contributor(role, pane_index, topology),
    }
}

/// First team-lead role in pane order, falling back to the primary pane.
fn team_lead(topology: &Topology) -> &str {
    topology
        .roles
        .iter()
        .find(|r| classify(r) == RoleClass::TeamLead)
        .unwrap_or(&topology.roles[0])
}

fn coordinator(topology: &Topology) -> Option<&String> {
    topology
        .roles
        .iter()
        .find(|r| classify(r) == RoleClass::Coordinator)
}

fn contributors(topology: &Topology) -> Vec<&String> {
    topology
        .roles
        .iter()
        .filter(|r| classify(r) == RoleClass::Contributor)
        .collect()
}

fn header(role: &str, pane_index: usize) -> String {
    format!(
        "# Role: {role}\n\n\
         You are the `{role}` agent of this project.\n\
         You are running in pane {pane_index}.\n\n"
    )
}

fn render_coordinator(role: &str, pane_index: usize, topology: &Topology) -> String {
    let lead = team_lead(topology);
    let mut doc = header(role, pane_index);
    doc.push_str(
        "## Responsibilities\n\n\
         You coordinate the whole team. Break the project down into\n\
         work packages and hand them to the team lead; you issue tasks\n\
         but never receive them, so you have no task queue of your own.\n\
         Watch your inbox for escalations.\n\n",
    );
    doc.push_str(&format!(
        "## Commands\n\n\
         Send a task to the team lead:\n\n\
         ```\n\
         relay send {lead} --from {role} \"implement the login flow\"\n\
         ```\n\n\
         Check your inbox:\n\n\
         ```\n\
         relay inbox {role}\n\
         ```\n"
    ));
    doc
}

fn render_team_lead(role: &str, pane_index: usize, topology: &Topology) -> String {
    let members = contributors(topology);
    let first_member = members
        .first()
        .map(|r| r.as_str())
        .unwrap_or("member_1");
    let mut doc = header(role, pane_index);
    doc.push_str(&format!(
        "## Responsibilities\n\n\
         You lead the contributors ({}). Assign them tasks, collect\n\
         their reports, and keep the overall picture.\n\n",
        members
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    doc.push_str(&format!(
        "## Commands\n\n\
         Send a task to a contributor:\n\n\
         ```\n\
         relay send {first_member} --from {role} \"write tests for the mailbox\"\n\
         ```\n\n\
         Check a contributor's reports:\n\n\
         ```\n\
         relay reports {first_member}\n\
         ```\n\n\
         Check your own pending tasks:\n\n\
         ```\n\
         relay pending {role}\n\
         ```\n"
    ));
    if let Some(officer) = coordinator(topology) {
        doc.push_str(&format!(
            "\nReport progress upward:\n\n\
             ```\n\
             relay report {role} --status working \"login flow underway\"\n\
             relay notify {officer} \"milestone reached\"\n\
             ```\n"
        ));
    }
    doc
}

fn render_contributor(role: &str, pane_index: usize, topology: &Topology) -> String {
    let lead = team_lead(topology);
    let mut doc = header(role, pane_index);
    doc.push_str(&format!(
        "## Responsibilities\n\n\
         You work on tasks assigned by `{lead}`. Pick up pending tasks\n\
         from your queue, do the work, and report status back. Report\n\
         to the team lead only.\n\n"
    ));
    doc.push_str(&format!(
        "## Commands\n\n\
         Check your pending tasks:\n\n\
         ```\n\
         relay pending {role}\n\
         ```\n\n\
         Acknowledge a task once picked up:\n\n\
         ```\n\
         relay ack {role} 0\n\
         ```\n\n\
         Report status:\n\n\
         ```\n\
         relay report {role} --status done \"mailbox tests written\"\n\
         relay notify {lead} \"task 0 finished\"\n\
         ```\n"
    ));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{RolePreset, RoleStrategy};

    fn officer_topo() -> Topology {
        Topology::resolve(4, RoleStrategy::Preset(RolePreset::OfficerCrew), false).unwrap()
    }

    #[test]
    fn every_document_has_required_sections() {
        let topo = officer_topo();
        for (index, role) in topo.roles.iter().enumerate() {
            let doc = render(role, index, &topo);
            assert!(doc.contains(&format!("# Role: {role}")), "{role}");
            assert!(doc.contains(&format!("pane {index}")), "{role}");
            assert!(doc.contains("## Responsibilities"), "{role}");
            assert!(doc.contains("## Commands"), "{role}");
        }
    }

    #[test]
    fn coordinator_sends_to_team_lead() {
        let topo = officer_topo();
        let doc = render("officer", 0, &topo);
        assert!(doc.contains("relay send leader --from officer"));
        assert!(!doc.contains("relay pending officer"));
    }

    #[test]
    fn team_lead_addresses_real_contributors() {
        let topo = officer_topo();
        let doc = render("leader", 1, &topo);
        assert!(doc.contains("member_1, member_2"));
        assert!(doc.contains("relay send member_1 --from leader"));
        assert!(doc.contains("relay notify officer"));
    }

    #[test]
    fn contributor_reports_to_lead_only() {
        let topo = Topology::resolve(3, RoleStrategy::default(), false).unwrap();
        let doc = render("member_2", 2, &topo);
        assert!(doc.contains("relay report member_2"));
        assert!(doc.contains("relay notify leader"));
        assert!(!doc.contains("officer"));
    }

    #[test]
    fn flat_scheme_falls_back_to_primary_pane() {
        let topo = Topology::resolve(3, RoleStrategy::Preset(RolePreset::FlatAgents), false)
            .unwrap();
        let doc = render("agent_2", 1, &topo);
        // No leader in a flat scheme; pane 0 is the reporting target.
        assert!(doc.contains("agent_1"));
    }
}
