use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::record::dataset::Dataset;

/// Number of profiles reported in [`AnalyticsSummary::top_profiles`].
pub const TOP_PROFILES: usize = 5;

/// Summary statistics over a dataset. Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_records: usize,
    pub total_engagements: u64,
    pub posts_per_network: BTreeMap<String, usize>,
    pub top_profiles: Vec<ProfileEngagement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEngagement {
    pub profile: String,
    pub engagements: u64,
}

/// Recompute the summary from scratch.
pub fn summarize(dataset: &Dataset) -> AnalyticsSummary {
    let mut total_engagements: u64 = 0;
    let mut posts_per_network: BTreeMap<String, usize> = BTreeMap::new();
    let mut profiles: Vec<ProfileEngagement> = Vec::new();
    let mut profile_slot: HashMap<&str, usize> = HashMap::new();

    for record in dataset.records() {
        total_engagements = total_engagements.saturating_add(record.engagements);
        *posts_per_network.entry(record.network.clone()).or_default() += 1;

        match profile_slot.get(record.profile.as_str()) {
            Some(&slot) => {
                let entry = &mut profiles[slot];
                entry.engagements = entry.engagements.saturating_add(record.engagements);
            }
            None => {
                profile_slot.insert(record.profile.as_str(), profiles.len());
                profiles.push(ProfileEngagement {
                    profile: record.profile.clone(),
                    engagements: record.engagements,
                });
            }
        }
    }

    // Stable sort: equal totals stay in first-seen order.
    profiles.sort_by(|a, b| b.engagements.cmp(&a.engagements));
    profiles.truncate(TOP_PROFILES);

    AnalyticsSummary {
        total_records: dataset.len(),
        total_engagements,
        posts_per_network,
        top_profiles: profiles,
    }
}
