//! Severity ranking and digest grouping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AlertLevel, Client};

/// Owner bucket for clients without an owner.
pub const UNASSIGNED_OWNER: &str = "Unassigned";

/// Clients listed per owner in the digest report before truncation.
pub const REPORT_CLIENTS_PER_OWNER: usize = 5;

/// Severity rank of an alert level: None=0 up to 6 weeks=4.
pub fn severity_rank(level: AlertLevel) -> u8 {
    level.severity_rank()
}

/// Stable sort, most severe first, ties broken by days since last outreach
/// (largest first). Equal keys keep their incoming order.
pub fn sort_by_severity(clients: &mut [Client]) {
    clients.sort_by(|a, b| {
        b.severity_rank
            .cmp(&a.severity_rank)
            .then_with(|| b.days_since_last_outreach.cmp(&a.days_since_last_outreach))
    });
}

/// Clients grouped by alert level, then by owner name.
///
/// Leaf lists keep the order clients were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertGroups {
    groups: BTreeMap<AlertLevel, BTreeMap<String, Vec<Client>>>,
}

impl AlertGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, client: Client) {
        let owner = owner_bucket(&client.owner);
        self.groups
            .entry(client.alert_level)
            .or_default()
            .entry(owner)
            .or_default()
            .push(client);
    }

    pub fn get(&self, level: AlertLevel, owner: &str) -> Option<&[Client]> {
        self.groups
            .get(&level)
            .and_then(|owners| owners.get(owner))
            .map(Vec::as_slice)
    }

    /// Levels present, most severe first; owners alphabetical within a level.
    pub fn by_severity(
        &self,
    ) -> impl Iterator<Item = (AlertLevel, &BTreeMap<String, Vec<Client>>)> {
        self.groups.iter().rev().map(|(level, owners)| (*level, owners))
    }

    pub fn total(&self) -> usize {
        self.groups
            .values()
            .flat_map(|owners| owners.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn summary(&self) -> DigestSummary {
        let mut by_alert_level = BTreeMap::new();
        let mut by_owner: BTreeMap<String, usize> = BTreeMap::new();

        for (level, owners) in &self.groups {
            let mut level_count = 0;
            for (owner, clients) in owners {
                level_count += clients.len();
                *by_owner.entry(owner.clone()).or_default() += clients.len();
            }
            by_alert_level.insert(*level, level_count);
        }

        DigestSummary {
            total_overdue: self.total(),
            by_alert_level,
            by_owner,
        }
    }

    /// Human-readable digest report, one line per entry.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "=== DAILY OVERDUE DIGEST ===".to_string(),
            format!("Total overdue clients: {}", self.total()),
            String::new(),
        ];

        for (level, owners) in self.by_severity() {
            lines.push(format!("{}:", level.as_db_str().to_uppercase()));
            for (owner, clients) in owners {
                lines.push(format!("  {}: {} clients", owner, clients.len()));
                for client in clients.iter().take(REPORT_CLIENTS_PER_OWNER) {
                    lines.push(format!(
                        "    - {} ({}d ago)",
                        client.client_name, client.days_since_last_outreach
                    ));
                }
                if clients.len() > REPORT_CLIENTS_PER_OWNER {
                    lines.push(format!(
                        "    ... and {} more",
                        clients.len() - REPORT_CLIENTS_PER_OWNER
                    ));
                }
            }
            lines.push(String::new());
        }

        lines
    }
}

impl FromIterator<Client> for AlertGroups {
    fn from_iter<I: IntoIterator<Item = Client>>(iter: I) -> Self {
        let mut groups = AlertGroups::new();
        for client in iter {
            groups.insert(client);
        }
        groups
    }
}

/// Group clients by alert level then owner (`Unassigned` when blank).
pub fn group_by_alert_and_owner<I>(clients: I) -> AlertGroups
where
    I: IntoIterator<Item = Client>,
{
    clients.into_iter().collect()
}

fn owner_bucket(owner: &str) -> String {
    let trimmed = owner.trim();
    if trimmed.is_empty() {
        UNASSIGNED_OWNER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Digest statistics returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestSummary {
    pub total_overdue: usize,
    pub by_alert_level: BTreeMap<AlertLevel, usize>,
    pub by_owner: BTreeMap<String, usize>,
}
