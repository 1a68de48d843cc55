//! Thresholds and caps for one run.
//!
//! Every component takes the values it needs from here instead of reading
//! process-wide constants. `recall-config` layers this struct under the
//! `[session]` table.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const fn default_min_accuracy() -> u8 {
    75
}

const fn default_max_items() -> usize {
    8
}

const fn default_top_k() -> usize {
    3
}

const fn default_summary_cap() -> usize {
    1500
}

const fn default_prompt_cap() -> usize {
    1400
}

const fn default_max_records() -> usize {
    500
}

const fn default_max_struggling() -> usize {
    100
}

const fn default_recent_window_hours() -> u32 {
    24
}

const fn default_critical_weakest_stage() -> u8 {
    1
}

const fn default_morning_cutoff_hour() -> u32 {
    12
}

const fn default_mnemonic_limit() -> usize {
    200
}

const fn default_excerpt_limit() -> usize {
    60
}

const fn default_summary_items() -> usize {
    3
}

const fn default_commentary_batch() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// A statistic is struggling when meaning or reading accuracy is below this.
    #[serde(default = "default_min_accuracy")]
    pub min_accuracy: u8,

    /// Global cap for balanced-by-category selection.
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// K for global top-K selection.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Character budget of the condensed summary.
    #[serde(default = "default_summary_cap")]
    pub summary_cap: usize,

    /// Character budget of the study prompt sent as a follow-up message.
    #[serde(default = "default_prompt_cap")]
    pub prompt_cap: usize,

    /// Ceiling on records drained from any paginated listing.
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Ceiling on per-subject detail lookups.
    #[serde(default = "default_max_struggling")]
    pub max_struggling: usize,

    /// Window for the recent-mistakes policy.
    #[serde(default = "default_recent_window_hours")]
    pub recent_window_hours: u32,

    /// Weakest SRS stage of the at-risk band; the band is this stage and the next.
    #[serde(default = "default_critical_weakest_stage")]
    pub critical_weakest_stage: u8,

    /// UTC hour before which `auto` resolves to the morning session.
    #[serde(default = "default_morning_cutoff_hour")]
    pub morning_cutoff_hour: u32,

    /// Mnemonic length in the full report.
    #[serde(default = "default_mnemonic_limit")]
    pub mnemonic_limit: usize,

    /// Mnemonic excerpt length in the condensed summary.
    #[serde(default = "default_excerpt_limit")]
    pub excerpt_limit: usize,

    /// Items shown in the condensed summary.
    #[serde(default = "default_summary_items")]
    pub summary_items: usize,

    /// Items sent to the commentary collaborator in one batch.
    #[serde(default = "default_commentary_batch")]
    pub commentary_batch: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_accuracy: default_min_accuracy(),
            max_items: default_max_items(),
            top_k: default_top_k(),
            summary_cap: default_summary_cap(),
            prompt_cap: default_prompt_cap(),
            max_records: default_max_records(),
            max_struggling: default_max_struggling(),
            recent_window_hours: default_recent_window_hours(),
            critical_weakest_stage: default_critical_weakest_stage(),
            morning_cutoff_hour: default_morning_cutoff_hour(),
            mnemonic_limit: default_mnemonic_limit(),
            excerpt_limit: default_excerpt_limit(),
            summary_items: default_summary_items(),
            commentary_batch: default_commentary_batch(),
        }
    }
}

impl SessionSettings {
    /// Reject values that would make a run silently produce nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSetting`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min_accuracy > 100 {
            return Err(invalid("min_accuracy", "must be within 0..=100"));
        }
        for (field, value) in [
            ("max_items", self.max_items),
            ("top_k", self.top_k),
            ("summary_cap", self.summary_cap),
            ("prompt_cap", self.prompt_cap),
            ("max_records", self.max_records),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        if self.morning_cutoff_hour > 24 {
            return Err(invalid("morning_cutoff_hour", "must be within 0..=24"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> CoreError {
    CoreError::InvalidSetting {
        field,
        reason: reason.to_string(),
    }
}
