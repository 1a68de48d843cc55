//! Session selection.
//!
//! Two deterministic policies pick the items for one session:
//!
//! - **Balanced by category**: a per-category quota chosen by the session
//!   mode, concatenated in quota order and capped at a global maximum.
//! - **Global top-K**: every category merged and the K highest scores taken.
//!
//! Both skip ids already picked, so an item that shows up in two buckets is
//! studied once.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::item::{Category, StudyItem, SubjectId};
use crate::scoring::ScoredGroups;

// ---------------------------------------------------------------------------
// SessionMode
// ---------------------------------------------------------------------------

/// Named quota profile for balanced selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Favors kanji.
    Morning,
    /// Favors vocabulary.
    Evening,
}

impl SessionMode {
    /// Per-category quotas, in concatenation order.
    #[must_use]
    pub const fn quotas(self) -> &'static [(Category, usize)] {
        match self {
            Self::Morning => &[
                (Category::Kanji, 5),
                (Category::Radical, 2),
                (Category::Vocabulary, 3),
            ],
            Self::Evening => &[
                (Category::Vocabulary, 5),
                (Category::Kanji, 4),
                (Category::Radical, 1),
            ],
        }
    }

    /// Morning strictly before `cutoff_hour`, evening from it on.
    #[must_use]
    pub const fn from_hour(hour: u32, cutoff_hour: u32) -> Self {
        if hour < cutoff_hour {
            Self::Morning
        } else {
            Self::Evening
        }
    }

    #[must_use]
    pub const fn greeting(self) -> &'static str {
        match self {
            Self::Morning => "Good morning!",
            Self::Evening => "Good evening!",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Evening => "evening",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "evening" => Ok(Self::Evening),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    BalancedByCategory { mode: SessionMode, max_items: usize },
    GlobalTopK { k: usize },
}

// ---------------------------------------------------------------------------
// SessionSelection
// ---------------------------------------------------------------------------

/// One picked item with the bucket it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub category: Category,
    pub item: StudyItem,
}

/// Ordered picks for one session. Never holds the same id twice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionSelection {
    picks: Vec<Pick>,
}

impl SessionSelection {
    /// Append unless the id is already present. Returns whether it was added.
    fn push_unique(&mut self, seen: &mut HashSet<SubjectId>, category: Category, item: &StudyItem) -> bool {
        if !seen.insert(item.id) {
            return false;
        }
        self.picks.push(Pick {
            category,
            item: item.clone(),
        });
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// The "nothing to study" outcome. Not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pick> {
        self.picks.iter()
    }

    pub fn items(&self) -> impl Iterator<Item = &StudyItem> {
        self.picks.iter().map(|pick| &pick.item)
    }

    #[must_use]
    pub fn ids(&self) -> Vec<SubjectId> {
        self.items().map(|item| item.id).collect()
    }
}

/// Pick the session items from ranked groups.
#[must_use]
pub fn select(groups: &ScoredGroups, mode: SelectionMode) -> SessionSelection {
    match mode {
        SelectionMode::BalancedByCategory { mode, max_items } => balanced(groups, mode, max_items),
        SelectionMode::GlobalTopK { k } => global_top_k(groups, k),
    }
}

fn balanced(groups: &ScoredGroups, mode: SessionMode, max_items: usize) -> SessionSelection {
    let mut selection = SessionSelection::default();
    let mut seen = HashSet::new();

    for &(category, quota) in mode.quotas() {
        let mut taken = 0;
        for item in groups.get(category) {
            if taken == quota {
                break;
            }
            if selection.push_unique(&mut seen, category, item) {
                taken += 1;
            }
        }
    }

    selection.picks.truncate(max_items);
    selection
}

fn global_top_k(groups: &ScoredGroups, k: usize) -> SessionSelection {
    let mut merged: Vec<(Category, &StudyItem)> = groups
        .iter()
        .flat_map(|(category, items)| items.iter().map(move |item| (category, item)))
        .collect();

    merged.sort_by(|(_, a), (_, b)| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| groups.discovery_index(a.id).cmp(&groups.discovery_index(b.id)))
    });

    let mut selection = SessionSelection::default();
    let mut seen = HashSet::new();
    for (category, item) in merged {
        if selection.len() == k {
            break;
        }
        selection.push_unique(&mut seen, category, item);
    }
    selection
}
