//! Insight use-case: a short generated reflection over recent notes.
//!
//! # Responsibility
//! - Select the most recent noted weeks and build the generation prompt.
//! - Call the generator once, degrading every failure to a fixed fallback.
//! - Refuse overlapping requests while one is in flight.
//!
//! # Invariants
//! - "Most recent" is decided by the numeric `(year, week)` key.
//! - At most `MAX_HIGHLIGHTS` entries are sent.
//! - Failures are logged and never surfaced as errors.

use crate::insight::NarrativeGenerator;
use crate::model::cell::CellId;
use crate::model::snapshot::WeekAnnotation;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Maximum number of noted weeks included in the prompt.
pub const MAX_HIGHLIGHTS: usize = 10;

/// Reflection returned whenever the generator fails.
pub const FALLBACK_INSIGHT: &str =
    "生命的故事正在由你亲自书写。即使只是一个小小的记号，也是你曾在这个世界上用力生活的证明。";

/// Result of one insight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightOutcome {
    Generated(String),
    /// The generator failed; carries `FALLBACK_INSIGHT`.
    Fallback(String),
    /// Another request is still running; nothing was sent.
    Busy,
}

impl InsightOutcome {
    /// Text to show, if the request ran.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Generated(text) | Self::Fallback(text) => Some(text.as_str()),
            Self::Busy => None,
        }
    }
}

/// Insight requestor over a generator implementation.
pub struct InsightService<G: NarrativeGenerator> {
    generator: G,
    busy: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<G: NarrativeGenerator> InsightService<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Requests a reflection for the given annotations and age.
    pub fn request_insight(
        &self,
        annotations: &BTreeMap<CellId, WeekAnnotation>,
        age_years: f64,
    ) -> InsightOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            info!("event=insight_request module=insight status=busy");
            return InsightOutcome::Busy;
        }
        let _guard = BusyGuard(&self.busy);

        let started_at = Instant::now();
        let highlights = select_highlights(annotations);
        let prompt = build_prompt(&highlights, age_years);

        match self.generator.generate(&prompt) {
            Ok(text) => {
                info!(
                    "event=insight_request module=insight status=ok highlights={} duration_ms={}",
                    highlights.len(),
                    started_at.elapsed().as_millis()
                );
                InsightOutcome::Generated(text)
            }
            Err(err) => {
                warn!(
                    "event=insight_request module=insight status=fallback highlights={} duration_ms={} error={err}",
                    highlights.len(),
                    started_at.elapsed().as_millis()
                );
                InsightOutcome::Fallback(FALLBACK_INSIGHT.to_string())
            }
        }
    }
}

/// Noted weeks, most recent first, capped at `MAX_HIGHLIGHTS`.
pub fn select_highlights(
    annotations: &BTreeMap<CellId, WeekAnnotation>,
) -> Vec<&WeekAnnotation> {
    annotations
        .values()
        .rev()
        .filter(|annotation| annotation.has_note())
        .take(MAX_HIGHLIGHTS)
        .collect()
}

/// Builds the context payload sent to the generator.
pub fn build_prompt(highlights: &[&WeekAnnotation], age_years: f64) -> String {
    let entries = highlights
        .iter()
        .filter_map(|annotation| {
            annotation.trimmed_note().map(|note| {
                format!(
                    "- [{}] Mood: {}, Note: {}",
                    annotation.cell_id, annotation.mood, note
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Context: A user is recording their life journey in weeks. They are currently {age_years:.1} years old.\n\
         \n\
         Recent Life Highlights/Moods:\n\
         {entries}\n\
         \n\
         Based on the philosophy: \"Life is not for acceleration, but to be seen, felt, and understood.\"\n\
         \n\
         Task: Write a short (max 150 words), poetic, and encouraging \"Life Narrative\" insight in Chinese.\n\
         Acknowledge their effort to record their life. Help them see the beauty in their current stage of the \"Life Clock\".\n\
         Focus on the idea that every small square represents texture and value.\n"
    )
}
