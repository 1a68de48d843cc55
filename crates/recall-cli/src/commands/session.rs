use std::fmt::Write;

use anyhow::Context;
use chrono::{Timelike, Utc};
use recall_commentary::{AnthropicCommentary, CommentaryRequest, CommentarySource, NoCommentary};
use recall_config::RecallConfig;
use recall_core::render::study_prompt;
use recall_core::{
    CommentaryMap, RenderContext, Rendered, ScoringPolicy, SessionMode, SessionSelection, render,
};
use recall_delivery::{DeliveryReceipt, DryRunSink, MessageSink, TwilioSink};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SessionArgs;
use crate::output::{TextView, output};
use crate::pipeline::compose_session;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct Delivery {
    message: &'static str,
    receipt: Option<DeliveryReceipt>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct SessionReport {
    username: String,
    level: Option<u32>,
    mode: SessionMode,
    policy: ScoringPolicy,
    partial: bool,
    selection: SessionSelection,
    rendered: Rendered,
    study_prompt: String,
    deliveries: Vec<Delivery>,
}

impl TextView for SessionReport {
    fn to_text(&self) -> String {
        let mut out = self.rendered.full_report.clone();
        out.push('\n');
        for delivery in &self.deliveries {
            match (&delivery.receipt, &delivery.error) {
                (Some(receipt), _) => {
                    let _ = write!(
                        out,
                        "\n{} via {}: {} chars{}",
                        delivery.message,
                        receipt.channel,
                        receipt.chars,
                        if receipt.truncated { " (truncated)" } else { "" }
                    );
                }
                (None, Some(error)) => {
                    let _ = write!(out, "\n{} failed: {error}", delivery.message);
                }
                (None, None) => {}
            }
        }
        out
    }
}

/// Handle `recall session`.
pub async fn handle(
    args: &SessionArgs,
    config: &RecallConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let client = super::wanikani_client(config)?;
    let settings = &config.session;
    let now = Utc::now();

    let mode = args.mode.resolve(now.hour(), settings.morning_cutoff_hour);
    let policy = args.policy.resolve(settings.critical_weakest_stage);
    let selection_mode = args.selection_mode(mode, settings);

    let progress = Progress::spinner("Fetching review statistics...");
    let composed = match compose_session(&client, selection_mode, policy, settings, now).await {
        Ok(composed) => composed,
        Err(error) => {
            progress.finish_err("could not reach WaniKani");
            return Err(error);
        }
    };

    progress.set_message("Gathering commentary...");
    let commentary = if args.no_commentary || !config.commentary.is_configured() {
        annotate(&NoCommentary, &composed.selection, settings.commentary_batch).await
    } else {
        match AnthropicCommentary::new(&config.commentary) {
            Ok(source) => annotate(&source, &composed.selection, settings.commentary_batch).await,
            Err(error) => {
                tracing::warn!(%error, "commentary disabled");
                CommentaryMap::new()
            }
        }
    };
    progress.finish_clear();

    let ctx = RenderContext {
        mode,
        level: composed.user.level,
        struggling_total: composed.ranked.groups.total(),
        components: &composed.components,
        commentary: &commentary,
        settings,
    };
    let rendered = render(&composed.selection, &ctx);
    let prompt = study_prompt(&rendered.full_report, settings.prompt_cap);
    let follow_up = (!composed.selection.is_empty()).then_some(prompt.as_str());

    let deliveries = if args.dry_run || !config.twilio.is_configured() {
        if !args.dry_run {
            tracing::warn!("twilio is not configured; messages were not sent");
        }
        let sink = DryRunSink::new(settings.summary_cap);
        deliver(&sink, &rendered.condensed_summary, follow_up).await?
    } else {
        let sink = TwilioSink::new(&config.twilio, settings.summary_cap)
            .context("failed to set up SMS delivery")?;
        deliver(&sink, &rendered.condensed_summary, follow_up).await?
    };

    let report = SessionReport {
        username: composed.user.username,
        level: composed.user.level,
        mode,
        policy,
        partial: composed.ranked.partial,
        selection: composed.selection,
        rendered,
        study_prompt: prompt,
        deliveries,
    };
    output(&report, flags.format)
}

/// Commentary for the first `batch` selected items.
async fn annotate<C: CommentarySource>(
    source: &C,
    selection: &SessionSelection,
    batch: usize,
) -> CommentaryMap {
    let requests: Vec<CommentaryRequest> = selection
        .items()
        .take(batch)
        .map(CommentaryRequest::from)
        .collect();
    source.annotate(&requests).await
}

/// Send the summary, then the study prompt when there is one.
///
/// A failed summary aborts the run; a failed follow-up is only reported.
async fn deliver<S: MessageSink>(
    sink: &S,
    summary: &str,
    follow_up: Option<&str>,
) -> anyhow::Result<Vec<Delivery>> {
    let receipt = sink
        .send(summary)
        .await
        .with_context(|| format!("failed to send the session summary via {}", sink.name()))?;
    let mut deliveries = vec![Delivery {
        message: "summary",
        receipt: Some(receipt),
        error: None,
    }];

    if let Some(prompt) = follow_up {
        let outcome = match sink.send(prompt).await {
            Ok(receipt) => Delivery {
                message: "study prompt",
                receipt: Some(receipt),
                error: None,
            },
            Err(error) => {
                tracing::warn!(%error, "study prompt was not delivered");
                Delivery {
                    message: "study prompt",
                    receipt: None,
                    error: Some(error.to_string()),
                }
            }
        };
        deliveries.push(outcome);
    }
    Ok(deliveries)
}
