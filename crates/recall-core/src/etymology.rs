//! Componential breakdowns and commentary lookup.

use std::collections::{HashMap, HashSet};

use crate::item::{StudyItem, SubjectId};

/// Components shown per item.
pub const MAX_COMPONENTS: usize = 3;

/// Separator between components in a breakdown.
pub const JOINER: &str = " + ";

/// Per-item commentary keyed by the item's exact `characters`.
pub type CommentaryMap = HashMap<String, String>;

/// Resolves component ids to already-normalized items.
pub trait ComponentLookup {
    fn component(&self, id: SubjectId) -> Option<&StudyItem>;
}

impl ComponentLookup for HashMap<SubjectId, StudyItem> {
    fn component(&self, id: SubjectId) -> Option<&StudyItem> {
        self.get(&id)
    }
}

/// Render `"{characters}({first meaning})"` for the first three components,
/// joined by `" + "`.
///
/// Unresolved components are left out. An item without components yields
/// an empty string.
pub fn breakdown<L>(item: &StudyItem, lookup: &L) -> String
where
    L: ComponentLookup + ?Sized,
{
    item.component_ids
        .iter()
        .take(MAX_COMPONENTS)
        .filter_map(|id| lookup.component(*id))
        .map(|component| match component.first_meaning() {
            Some(meaning) => format!("{}({meaning})", component.characters),
            None => component.characters.clone(),
        })
        .collect::<Vec<_>>()
        .join(JOINER)
}

/// Commentary for `item`, if the collaborator produced one for its exact
/// characters.
#[must_use]
pub fn annotation<'a>(item: &StudyItem, commentary: &'a CommentaryMap) -> Option<&'a str> {
    commentary
        .get(&item.characters)
        .map(String::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Ids that [`breakdown`] will ask for, deduplicated, in first-use order.
pub fn wanted_components<'a, I>(items: I) -> Vec<SubjectId>
where
    I: IntoIterator<Item = &'a StudyItem>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .flat_map(|item| item.component_ids.iter().take(MAX_COMPONENTS).copied())
        .filter(|id| seen.insert(*id))
        .collect()
}
