//! Dual-format rendering of a session selection.
//!
//! - The **full report** has one block per item and no length limit. It
//!   doubles as the study prompt a learner pastes into a chat assistant.
//! - The **condensed summary** is meant for a length-capped channel (SMS).
//!   It is assembled completely, then cut to `summary_cap` chars.

pub mod builder;
pub mod text;

use serde::Serialize;

use crate::etymology::{CommentaryMap, ComponentLookup, annotation, breakdown};
use crate::item::{Category, StudyItem};
use crate::selection::{SessionMode, SessionSelection};
use crate::settings::SessionSettings;

use builder::ReportBuilder;
use text::{cap_with_ellipsis, clean_mnemonic};

const REPORT_HEADING: &str = "Help me memorize these WaniKani items I'm struggling with:";
const REPORT_CLOSING: &str =
    "Create memorable mnemonics, stories, and memory techniques for both meanings and readings.";
const REPORT_EMPTY: &str =
    "Nothing to study right now: no item is below the accuracy threshold. Keep up the great work!";
const SUMMARY_EMPTY: &str = "No struggling items right now. Keep up the great work! 🎉";
const SUMMARY_CALL_TO_ACTION: &str = "💡 Full study prompt follows in the next message.";
const PROMPT_PREFIX: &str = "COPY THIS FOR CHATGPT/CLAUDE:";

/// Everything the renderer needs besides the selection itself.
pub struct RenderContext<'a> {
    pub mode: SessionMode,
    /// Learner level, when the identity lookup succeeded.
    pub level: Option<u32>,
    /// Size of the candidate pool before selection.
    pub struggling_total: usize,
    pub components: &'a dyn ComponentLookup,
    pub commentary: &'a CommentaryMap,
    pub settings: &'a SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub full_report: String,
    pub condensed_summary: String,
}

/// Render both formats.
#[must_use]
pub fn render(selection: &SessionSelection, ctx: &RenderContext<'_>) -> Rendered {
    Rendered {
        full_report: full_report(selection, ctx),
        condensed_summary: condensed_summary(selection, ctx),
    }
}

/// The unconstrained multi-line report.
#[must_use]
pub fn full_report(selection: &SessionSelection, ctx: &RenderContext<'_>) -> String {
    let mut out = ReportBuilder::new();

    if selection.is_empty() {
        out.text(REPORT_EMPTY);
        return builder::join(&out.finish());
    }

    out.text(REPORT_HEADING).blank();
    for pick in selection.iter() {
        item_block(&mut out, pick.category, &pick.item, ctx);
        out.blank();
    }
    out.text(REPORT_CLOSING);

    builder::join(&out.finish())
}

fn item_block(out: &mut ReportBuilder, category: Category, item: &StudyItem, ctx: &RenderContext<'_>) {
    out.text(format!("【{}】 {}", category.tag(), item.characters))
        .field("Meanings", item.meanings.join(", "))
        .field("Readings", item.readings.join(", "))
        .field("Built from", breakdown(item, ctx.components))
        .field_opt("Etymology", annotation(item, ctx.commentary))
        .field("Part of speech", item.parts_of_speech.join(", "))
        .field_opt(
            "Mnemonic",
            item.mnemonic()
                .map(|raw| clean_mnemonic(raw, ctx.settings.mnemonic_limit)),
        )
        .field_opt(
            "Example",
            item.context_sentence
                .as_ref()
                .map(|sentence| format!("{} ({})", sentence.ja, sentence.en)),
        )
        .field(
            "Accuracy",
            format!("M{}% R{}%", item.accuracy.meaning_pct, item.accuracy.reading_pct),
        );
}

/// The channel summary, never longer than `summary_cap` chars.
#[must_use]
pub fn condensed_summary(selection: &SessionSelection, ctx: &RenderContext<'_>) -> String {
    let mut out = ReportBuilder::new();

    out.text(format!("📚 WaniKani Study - {}", ctx.mode.greeting()))
        .blank();
    match ctx.level {
        Some(level) => out.text(format!(
            "Level {level} | {} struggling items",
            ctx.struggling_total
        )),
        None => out.text(format!("{} struggling items", ctx.struggling_total)),
    };

    if selection.is_empty() {
        out.blank().text(SUMMARY_EMPTY);
        return cap_with_ellipsis(&builder::join(&out.finish()), ctx.settings.summary_cap);
    }

    out.blank().text("Focus on:");
    for item in selection.items().take(ctx.settings.summary_items) {
        out.blank();
        summary_block(&mut out, item, ctx);
    }
    out.blank().text(SUMMARY_CALL_TO_ACTION);

    cap_with_ellipsis(&builder::join(&out.finish()), ctx.settings.summary_cap)
}

fn summary_block(out: &mut ReportBuilder, item: &StudyItem, ctx: &RenderContext<'_>) {
    let meanings = first_two(&item.meanings);
    if meanings.is_empty() {
        out.text(item.characters.clone());
    } else {
        out.text(format!("{} - {meanings}", item.characters));
    }

    let readings = first_two(&item.readings);
    if !readings.is_empty() {
        out.text(format!("→ {readings}"));
    }

    let parts = breakdown(item, ctx.components);
    if !parts.is_empty() {
        out.text(format!("= {parts}"));
    }

    if let Some(raw) = item.mnemonic() {
        let excerpt = clean_mnemonic(raw, ctx.settings.excerpt_limit);
        if !excerpt.is_empty() {
            out.text(format!("✎ {excerpt}"));
        }
    }

    if item.category.has_readings() {
        out.text(format!(
            "(M:{}% R:{}%)",
            item.accuracy.meaning_pct, item.accuracy.reading_pct
        ));
    } else {
        out.text(format!("(M:{}%)", item.accuracy.meaning_pct));
    }
}

fn first_two(values: &[String]) -> String {
    values
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The follow-up message carrying the full report, capped at `prompt_cap`.
#[must_use]
pub fn study_prompt(full_report: &str, prompt_cap: usize) -> String {
    format!(
        "{PROMPT_PREFIX}\n\n{}",
        cap_with_ellipsis(full_report, prompt_cap)
    )
}
