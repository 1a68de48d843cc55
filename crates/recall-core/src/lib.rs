//! # recall-core
//!
//! Weakness ranking and session composition for Recall.
//!
//! This crate holds everything that does not talk to the network:
//! - [`StudyItem`] and its category, accuracy and mistake counters
//! - Weakness scoring policies and per-category ranking ([`scoring`])
//! - Balanced and global top-K session selection ([`selection`])
//! - Componential breakdowns and commentary lookup ([`etymology`])
//! - The dual-format renderer: full report plus capped summary ([`render`])
//! - Tunable thresholds and caps ([`SessionSettings`])
//!
//! Data flows strictly one way: normalized items are scored, grouped by
//! category, selected, then rendered. Nothing here persists across runs.

pub mod errors;
pub mod etymology;
pub mod item;
pub mod render;
pub mod scoring;
pub mod selection;
pub mod settings;

pub use errors::CoreError;
pub use etymology::{CommentaryMap, ComponentLookup};
pub use item::{Accuracy, Category, ContextSentence, IncorrectCounts, StudyItem, SubjectId};
pub use render::{RenderContext, Rendered, render};
pub use scoring::{ScoredGroups, ScoringPolicy, rank};
pub use selection::{SelectionMode, SessionMode, SessionSelection, select};
pub use settings::SessionSettings;
