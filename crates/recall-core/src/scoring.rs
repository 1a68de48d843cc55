//! Weakness scoring.
//!
//! Every policy is a linear combination of the same four inputs:
//!
//! ```text
//! score = w1 * (100 - meaning_pct)
//!       + w2 * (100 - reading_pct)
//!       + w3 * meaning_incorrect
//!       + w4 * reading_incorrect
//!       [+ srs_weight * 100]          (critical only)
//! ```
//!
//! Higher means more urgent. Scores are only comparable within one run and
//! one policy.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize, Serializer};

use crate::item::{Category, StudyItem, SubjectId};

/// Linear weights over the four scoring inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub meaning_gap: f64,
    pub reading_gap: f64,
    pub meaning_incorrect: f64,
    pub reading_incorrect: f64,
}

impl Weights {
    pub const STANDARD: Self = Self {
        meaning_gap: 1.0,
        reading_gap: 1.0,
        meaning_incorrect: 2.0,
        reading_incorrect: 2.0,
    };

    pub const RECENT: Self = Self {
        meaning_gap: 2.0,
        reading_gap: 2.0,
        meaning_incorrect: 3.0,
        reading_incorrect: 3.0,
    };
}

/// Interchangeable weighting policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum ScoringPolicy {
    /// Weights `(1, 1, 2, 2)`.
    Standard,
    /// Weights `(2, 2, 3, 3)`. Callers only feed in items with a mistake
    /// inside the recent window; the score itself still uses all-time
    /// accuracy.
    Recent,
    /// Standard weights plus an SRS penalty. Only `weakest_stage` and the
    /// stage after it are eligible.
    Critical { weakest_stage: u8 },
}

impl ScoringPolicy {
    #[must_use]
    pub const fn weights(self) -> Weights {
        match self {
            Self::Standard | Self::Critical { .. } => Weights::STANDARD,
            Self::Recent => Weights::RECENT,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Recent => "recent",
            Self::Critical { .. } => "critical",
        }
    }

    /// Whether `item` takes part in ranking under this policy.
    ///
    /// Only the critical policy excludes anything: items outside the
    /// at-risk band are dropped before scoring.
    #[must_use]
    pub fn is_eligible(self, item: &StudyItem) -> bool {
        match self {
            Self::Critical { weakest_stage } => srs_weight(item.srs_stage, weakest_stage).is_some(),
            Self::Standard | Self::Recent => true,
        }
    }
}

/// SRS multiplier for the critical policy: 3 at the weakest retained stage,
/// 2 at the next, `None` outside the band or when never reviewed.
#[must_use]
pub fn srs_weight(stage: Option<u8>, weakest_stage: u8) -> Option<u32> {
    let stage = stage?;
    if stage == weakest_stage {
        Some(3)
    } else if Some(stage) == weakest_stage.checked_add(1) {
        Some(2)
    } else {
        None
    }
}

/// Score one item. Pure; does not look at `item.score`.
#[must_use]
pub fn score(item: &StudyItem, policy: ScoringPolicy) -> f64 {
    let w = policy.weights();
    let meaning_gap = f64::from(100 - item.accuracy.meaning_pct.min(100));
    let reading_gap = f64::from(100 - item.accuracy.reading_pct.min(100));

    let base = w.meaning_gap * meaning_gap
        + w.reading_gap * reading_gap
        + w.meaning_incorrect * f64::from(item.incorrect.meaning)
        + w.reading_incorrect * f64::from(item.incorrect.reading);

    match policy {
        ScoringPolicy::Critical { weakest_stage } => {
            let bonus = srs_weight(item.srs_stage, weakest_stage).unwrap_or(0);
            base + f64::from(bonus) * 100.0
        }
        ScoringPolicy::Standard | ScoringPolicy::Recent => base,
    }
}

// ---------------------------------------------------------------------------
// ScoredGroups
// ---------------------------------------------------------------------------

/// Items grouped by category, each group in descending score order with
/// ties kept in discovery order.
///
/// Serializes as a plain `category -> [item]` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredGroups {
    groups: BTreeMap<Category, Vec<StudyItem>>,
    /// Position of each id in the input, for cross-category tie breaks.
    discovery: HashMap<SubjectId, usize>,
}

impl Serialize for ScoredGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.groups.serialize(serializer)
    }
}

impl ScoredGroups {
    /// The ranked items for `category`; empty when none were found.
    #[must_use]
    pub fn get(&self, category: Category) -> &[StudyItem] {
        self.groups.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Non-empty groups in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[StudyItem])> {
        self.groups
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(category, items)| (*category, items.as_slice()))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Input position of `id`; unknown ids sort last.
    #[must_use]
    pub fn discovery_index(&self, id: SubjectId) -> usize {
        self.discovery.get(&id).copied().unwrap_or(usize::MAX)
    }

    /// Whether every group satisfies `score[i] >= score[i + 1]`.
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.groups
            .values()
            .all(|items| items.windows(2).all(|pair| pair[0].score >= pair[1].score))
    }
}

/// Score every eligible item, group by category and sort each group.
///
/// The sort is stable, so equal scores stay in the order items were
/// discovered.
pub fn rank<I>(items: I, policy: ScoringPolicy) -> ScoredGroups
where
    I: IntoIterator<Item = StudyItem>,
{
    let mut groups: BTreeMap<Category, Vec<StudyItem>> = BTreeMap::new();
    let mut discovery = HashMap::new();
    for (position, mut item) in items.into_iter().enumerate() {
        if !policy.is_eligible(&item) {
            continue;
        }
        item.score = score(&item, policy);
        discovery.entry(item.id).or_insert(position);
        groups.entry(item.category).or_default().push(item);
    }

    for items in groups.values_mut() {
        items.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    ScoredGroups { groups, discovery }
}
