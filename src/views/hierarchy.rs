use serde::Serialize;

use crate::models::{LeaderField, TraditionalLeader};

#[derive(Debug, Clone, Serialize)]
pub struct HeadmanNode {
    pub headman: TraditionalLeader,
    pub village_heads: Vec<TraditionalLeader>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChiefNode {
    pub chief: TraditionalLeader,
    pub headmen: Vec<HeadmanNode>,
}

/// Chief → headmen → village heads, linked by jurisdiction names.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Hierarchy {
    pub chiefs: Vec<ChiefNode>,
    /// Headmen whose chieftainship has no chief on record.
    pub unassigned_headmen: Vec<HeadmanNode>,
    /// Village heads whose headmanship has no headman on record.
    pub unassigned_village_heads: Vec<TraditionalLeader>,
}

impl Hierarchy {
    pub fn chieftainships(&self) -> Vec<&str> {
        self.chiefs
            .iter()
            .filter_map(|node| node.chief.get(LeaderField::Chieftainship))
            .collect()
    }
}

fn same(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

/// Build the tree, optionally keeping only chieftainships whose name starts
/// with `chieftainship` (`"all"` keeps everything).
pub fn build_hierarchy(
    chiefs: Vec<TraditionalLeader>,
    headmen: Vec<TraditionalLeader>,
    village_heads: Vec<TraditionalLeader>,
    chieftainship: Option<&str>,
) -> Hierarchy {
    let prefix = chieftainship
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty() && c != "all");
    let keep = |leader: &TraditionalLeader| match &prefix {
        Some(prefix) => leader
            .get(LeaderField::Chieftainship)
            .map(|c| c.to_lowercase().starts_with(prefix.as_str()))
            .unwrap_or(false),
        None => true,
    };

    let mut remaining_village_heads: Vec<TraditionalLeader> = village_heads.into_iter().filter(|v| keep(v)).collect();
    let mut headman_nodes: Vec<HeadmanNode> = Vec::new();
    for headman in headmen.into_iter().filter(|h| keep(h)) {
        let (mine, rest): (Vec<_>, Vec<_>) = remaining_village_heads.into_iter().partition(|village_head| {
            same(
                village_head.get(LeaderField::Headmanship),
                headman.get(LeaderField::Headmanship),
            ) && (village_head.get(LeaderField::Chieftainship).is_none()
                || same(
                    village_head.get(LeaderField::Chieftainship),
                    headman.get(LeaderField::Chieftainship),
                ))
        });
        remaining_village_heads = rest;
        headman_nodes.push(HeadmanNode {
            headman,
            village_heads: mine,
        });
    }

    let mut chief_nodes = Vec::new();
    for chief in chiefs.into_iter().filter(|c| keep(c)) {
        let (mine, rest): (Vec<_>, Vec<_>) = headman_nodes.into_iter().partition(|node| {
            same(
                node.headman.get(LeaderField::Chieftainship),
                chief.get(LeaderField::Chieftainship),
            )
        });
        headman_nodes = rest;
        chief_nodes.push(ChiefNode { chief, headmen: mine });
    }

    Hierarchy {
        chiefs: chief_nodes,
        unassigned_headmen: headman_nodes,
        unassigned_village_heads: remaining_village_heads,
    }
}
