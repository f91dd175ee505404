//! Rendering triage sets for the terminal and as JSON.

use engine::TriageSet;
use serde::Serialize;
use triage::{ActionCategory, FocusAction, FocusGroup, FocusItem, ProviderId};

#[derive(Debug, Serialize)]
pub struct TriageReport {
    pub refreshed_at: String,
    pub read_only_approved: usize,
    pub summary: Vec<String>,
    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub group: FocusGroup,
    pub label: &'static str,
    pub items: Vec<ItemReport>,
}

#[derive(Debug, Serialize)]
pub struct ItemReport {
    pub entity_id: String,
    pub provider: ProviderId,
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub url: String,
    pub category: Option<ActionCategory>,
    pub description: Option<String>,
    pub suggested_actions: Vec<FocusAction>,
    pub pinned: bool,
    pub snoozed: bool,
}

impl From<&FocusItem> for ItemReport {
    fn from(item: &FocusItem) -> Self {
        let (pinned, snoozed) = item.flags();
        Self {
            entity_id: item.entity_id.to_string(),
            provider: item.provider,
            repository: item.repo_and_owner(),
            number: item.number.as_u64(),
            title: item.title.clone(),
            author: item.author.name.clone(),
            url: item.url.clone(),
            category: item.category,
            description: item
                .category
                .map(|category| category.description(&item.author.name)),
            suggested_actions: item.suggested_actions.clone(),
            pinned,
            snoozed,
        }
    }
}

impl TriageReport {
    pub fn new(set: &TriageSet) -> Self {
        let groups = set
            .grouped()
            .into_iter()
            .map(|(group, items)| GroupReport {
                group,
                label: group.label(),
                items: items.iter().map(ItemReport::from).collect(),
            })
            .collect();

        Self {
            refreshed_at: set.refreshed_at.to_string(),
            read_only_approved: set.read_only_approved,
            summary: set.summary().lines(),
            groups,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for line in &self.summary {
            out.push_str(line);
            out.push('\n');
        }

        for group in &self.groups {
            out.push('\n');
            out.push_str(&format!("{} ({})\n", group.label, group.items.len()));
            for item in &group.items {
                let actions: Vec<_> = item.suggested_actions.iter().map(|a| a.label()).collect();
                out.push_str(&format!(
                    "  {} #{} {}  [{}]\n    {}  {}\n",
                    item.repository,
                    item.number,
                    item.title,
                    actions.join(", "),
                    item.entity_id,
                    item.description.as_deref().unwrap_or_default(),
                ));
            }
        }

        if self.read_only_approved > 0 {
            out.push_str(&format!(
                "\n{} approved pull request(s) hidden: you cannot merge them\n",
                self.read_only_approved
            ));
        }
        out
    }
}
