use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::Utc;
use recall_config::RecallConfig;
use recall_core::{Category, ScoredGroups, ScoringPolicy, StudyItem};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RankArgs;
use crate::output::{TextView, output};
use crate::pipeline::rank_candidates;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct RankRow {
    id: u64,
    characters: String,
    meaning: Option<String>,
    score: f64,
    meaning_pct: u8,
    reading_pct: u8,
    meaning_incorrect: u32,
    reading_incorrect: u32,
    srs_stage: Option<u8>,
}

impl From<&StudyItem> for RankRow {
    fn from(item: &StudyItem) -> Self {
        Self {
            id: item.id.0,
            characters: item.characters.clone(),
            meaning: item.first_meaning().map(String::from),
            score: item.score,
            meaning_pct: item.accuracy.meaning_pct,
            reading_pct: item.accuracy.reading_pct,
            meaning_incorrect: item.incorrect.meaning,
            reading_incorrect: item.incorrect.reading,
            srs_stage: item.srs_stage,
        }
    }
}

#[derive(Debug, Serialize)]
struct RankReport {
    policy: ScoringPolicy,
    total: usize,
    partial: bool,
    skipped: usize,
    groups: BTreeMap<Category, Vec<RankRow>>,
}

impl RankReport {
    fn new(policy: ScoringPolicy, groups: &ScoredGroups, limit: Option<usize>) -> Self {
        let limit = limit.unwrap_or(usize::MAX);
        Self {
            policy,
            total: groups.total(),
            partial: false,
            skipped: 0,
            groups: groups
                .iter()
                .map(|(category, items)| {
                    (
                        category,
                        items.iter().take(limit).map(RankRow::from).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl TextView for RankReport {
    fn to_text(&self) -> String {
        let mut out = format!(
            "{} struggling items ({} policy)",
            self.total,
            self.policy.as_str()
        );
        if self.partial {
            out.push_str(" [partial data]");
        }
        for (category, rows) in &self.groups {
            let _ = write!(out, "\n\n{}", category.tag());
            for row in rows {
                let _ = write!(
                    out,
                    "\n  {:>7.1}  {}  {}  M{}% R{}%  x{}/{}",
                    row.score,
                    row.characters,
                    row.meaning.as_deref().unwrap_or("-"),
                    row.meaning_pct,
                    row.reading_pct,
                    row.meaning_incorrect,
                    row.reading_incorrect,
                );
            }
        }
        out
    }
}

/// Handle `recall rank`.
pub async fn handle(
    args: &RankArgs,
    config: &RecallConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = super::wanikani_client(config)?;
    let settings = &config.session;
    let policy = args.policy.resolve(settings.critical_weakest_stage);

    let progress = Progress::spinner("Scoring review statistics...");
    let ranked = rank_candidates(&client, policy, settings, Utc::now()).await;
    progress.finish_clear();

    let mut report = RankReport::new(policy, &ranked.groups, args.limit);
    report.partial = ranked.partial;
    report.skipped = ranked.skipped;
    output(&report, flags.format)
}
