//! Session composition: statistics -> candidates -> study items -> ranked
//! groups -> selection, plus the component lookups the renderer needs.
//!
//! Every call is awaited in turn on the current task. Only the `/user`
//! lookup is fatal; any other failed fetch keeps what it already had and
//! marks the result as partial.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use chrono::{DateTime, TimeDelta, Utc};
use recall_core::etymology::wanted_components;
use recall_core::{
    ScoredGroups, ScoringPolicy, SelectionMode, SessionSelection, SessionSettings, StudyItem,
    SubjectId, rank, select,
};
use recall_source::{
    Drained, Resource, ReviewData, ReviewStatisticData, UserData, WaniKaniApi, normalize_batch,
};

/// Ranked candidates plus how complete the underlying data was.
#[derive(Debug)]
pub struct Ranked {
    pub groups: ScoredGroups,
    /// Records the normalizer dropped.
    pub skipped: usize,
    /// Some fetch failed part-way; the groups were built from what arrived.
    pub partial: bool,
}

#[derive(Debug)]
pub struct Composed {
    pub user: UserData,
    pub ranked: Ranked,
    pub selection: SessionSelection,
    pub components: HashMap<SubjectId, StudyItem>,
}

/// Fetch, score and select one session.
///
/// # Errors
///
/// Fails only when the learner's `/user` record cannot be fetched.
pub async fn compose_session<S>(
    source: &S,
    mode: SelectionMode,
    policy: ScoringPolicy,
    settings: &SessionSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<Composed>
where
    S: WaniKaniApi + ?Sized,
{
    let user = source
        .user()
        .await
        .context("failed to fetch the WaniKani user")?;

    let ranked = rank_candidates(source, policy, settings, now).await;
    let selection = select(&ranked.groups, mode);
    let components = component_catalog(source, &selection).await;

    tracing::info!(
        user = %user.username,
        policy = policy.as_str(),
        struggling = ranked.groups.total(),
        selected = selection.len(),
        partial = ranked.partial,
        "session composed"
    );

    Ok(Composed {
        user,
        ranked,
        selection,
        components,
    })
}

/// Gather the policy's candidates and rank them by category.
pub async fn rank_candidates<S>(
    source: &S,
    policy: ScoringPolicy,
    settings: &SessionSettings,
    now: DateTime<Utc>,
) -> Ranked
where
    S: WaniKaniApi + ?Sized,
{
    let mut partial = false;
    let mut stages = HashMap::new();
    let (candidates, stats) = match policy {
        ScoringPolicy::Standard => {
            let drained = source.review_statistics(settings.max_records).await;
            let stats = visible_statistics(drained, "review statistics", &mut partial);
            (struggling(&stats, settings, |_| true), stats)
        }
        ScoringPolicy::Recent => {
            let drained = source.review_statistics(settings.max_records).await;
            let stats = visible_statistics(drained, "review statistics", &mut partial);
            let since = now - TimeDelta::hours(i64::from(settings.recent_window_hours));
            let reviews = source.reviews_since(since, settings.max_records).await;
            partial |= note_partial("reviews", &reviews);
            let missed: HashSet<u64> = reviews
                .records
                .into_iter()
                .filter_map(|r| r.data)
                .filter(ReviewData::had_mistake)
                .filter_map(|r| r.subject_id)
                .collect();
            (struggling(&stats, settings, |id| missed.contains(&id)), stats)
        }
        ScoringPolicy::Critical { weakest_stage } => {
            let band = [weakest_stage, weakest_stage.saturating_add(1)];
            let assignments = source
                .assignments_in_stages(&band, settings.max_records)
                .await;
            partial |= note_partial("assignments", &assignments);
            let mut ordered = Vec::new();
            for assignment in assignments.records.into_iter().filter_map(|r| r.data) {
                if let (Some(id), Some(stage)) = (assignment.subject_id, assignment.srs_stage) {
                    if stages.insert(id, stage).is_none() {
                        ordered.push(id);
                    }
                }
            }
            ordered.truncate(settings.max_struggling);

            // Statistics are looked up per candidate; the paged walk may stop
            // long before it reaches them.
            let ids: Vec<SubjectId> = ordered.iter().copied().map(SubjectId).collect();
            let drained = source.review_statistics_for(&ids).await;
            let stats = visible_statistics(drained, "candidate statistics", &mut partial);
            (ordered, stats)
        }
    };

    let ids: Vec<SubjectId> = candidates.iter().copied().map(SubjectId).collect();
    let subjects = source.subjects(&ids).await;
    partial |= note_partial("subjects", &subjects);

    let stats: HashMap<u64, ReviewStatisticData> = stats.into_iter().collect();
    let report = normalize_batch(subjects.records, &stats, &stages);

    // Discovery order is candidate order, not the order subjects came back in.
    let position: HashMap<u64, usize> = candidates
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index))
        .collect();
    let mut items = report.items;
    items.sort_by_key(|item| position.get(&item.id.0).copied().unwrap_or(usize::MAX));

    Ranked {
        groups: rank(items, policy),
        skipped: report.skipped.len(),
        partial,
    }
}

/// Statistics below the accuracy threshold that pass `keep`, in API order,
/// bounded by `max_struggling`.
fn struggling(
    stats: &[(u64, ReviewStatisticData)],
    settings: &SessionSettings,
    keep: impl Fn(u64) -> bool,
) -> Vec<u64> {
    let mut seen = HashSet::new();
    stats
        .iter()
        .filter(|(id, stat)| stat.is_struggling(settings.min_accuracy) && keep(*id))
        .map(|(id, _)| *id)
        .filter(|id| seen.insert(*id))
        .take(settings.max_struggling)
        .collect()
}

/// Components of the selected items, keyed by id.
async fn component_catalog<S>(
    source: &S,
    selection: &SessionSelection,
) -> HashMap<SubjectId, StudyItem>
where
    S: WaniKaniApi + ?Sized,
{
    let wanted = wanted_components(selection.items());
    let drained = source.subjects(&wanted).await;
    note_partial("components", &drained);
    normalize_batch(drained.records, &HashMap::new(), &HashMap::new())
        .items
        .into_iter()
        .map(|item| (item.id, item))
        .collect()
}

/// Non-hidden statistics keyed by subject id, in API order.
fn visible_statistics(
    drained: Drained<Resource<ReviewStatisticData>>,
    what: &'static str,
    partial: &mut bool,
) -> Vec<(u64, ReviewStatisticData)> {
    *partial |= note_partial(what, &drained);
    drained
        .records
        .into_iter()
        .filter_map(|r| r.data)
        .filter(|s| !s.hidden)
        .filter_map(|s| s.subject_id.map(|id| (id, s)))
        .collect()
}

fn note_partial<T>(what: &'static str, drained: &Drained<T>) -> bool {
    if drained.hit_ceiling {
        tracing::debug!(what, kept = drained.records.len(), "record ceiling reached");
    }
    match &drained.error {
        Some(e) => {
            tracing::warn!(what, %e, kept = drained.records.len(), "continuing with partial data");
            true
        }
        None => false,
    }
}
