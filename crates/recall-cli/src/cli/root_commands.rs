use clap::{Args, Subcommand, ValueEnum};
use recall_core::{ScoringPolicy, SelectionMode, SessionMode, SessionSettings};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Compose today's session, send it, and print the full report.
    Session(SessionArgs),
    /// Show every struggling item, scored and grouped by category.
    Rank(RankArgs),
    /// Show the learner behind the configured token.
    Whoami,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    /// Morning before the configured cutoff hour (UTC), evening after.
    Auto,
    Morning,
    Evening,
}

impl ModeArg {
    /// Resolve `auto` against the current UTC hour.
    pub const fn resolve(self, utc_hour: u32, cutoff_hour: u32) -> SessionMode {
        match self {
            Self::Auto => SessionMode::from_hour(utc_hour, cutoff_hour),
            Self::Morning => SessionMode::Morning,
            Self::Evening => SessionMode::Evening,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum PolicyArg {
    /// Weakest all-time accuracy and mistake counts.
    #[default]
    Standard,
    /// Items missed inside the recent window, weighted harder.
    Recent,
    /// Items sitting in the lowest SRS stages.
    Critical,
}

impl PolicyArg {
    pub const fn resolve(self, weakest_stage: u8) -> ScoringPolicy {
        match self {
            Self::Standard => ScoringPolicy::Standard,
            Self::Recent => ScoringPolicy::Recent,
            Self::Critical => ScoringPolicy::Critical { weakest_stage },
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct SessionArgs {
    /// Session mode; decides the per-category quotas and the greeting.
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,

    /// Scoring policy.
    #[arg(long, value_enum, default_value_t = PolicyArg::Standard)]
    pub policy: PolicyArg,

    /// Take the K highest scores across all categories instead of the
    /// per-category quotas. Without a value, `session.top_k` is used.
    #[arg(long, value_name = "K", num_args = 0..=1)]
    pub top: Option<Option<usize>>,

    /// Log the messages instead of sending them.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip language-model commentary even when configured.
    #[arg(long)]
    pub no_commentary: bool,
}

impl SessionArgs {
    /// Global top-K when `--top` was given, per-category quotas otherwise.
    pub fn selection_mode(&self, mode: SessionMode, settings: &SessionSettings) -> SelectionMode {
        match self.top {
            Some(k) => SelectionMode::GlobalTopK {
                k: k.unwrap_or(settings.top_k),
            },
            None => SelectionMode::BalancedByCategory {
                mode,
                max_items: settings.max_items,
            },
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct RankArgs {
    /// Scoring policy.
    #[arg(long, value_enum, default_value_t = PolicyArg::Standard)]
    pub policy: PolicyArg,

    /// Items to show per category.
    #[arg(long)]
    pub limit: Option<usize>,
}
