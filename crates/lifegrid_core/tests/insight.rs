use chrono::{TimeZone, Utc};
use lifegrid_core::{
    CellId, GenerationError, InsightOutcome, InsightService, Mood, NarrativeGenerator,
    WeekAnnotation, FALLBACK_INSIGHT,
};
use std::collections::BTreeMap;
use std::sync::{Barrier, Mutex};

struct RecordingGenerator {
    reply: Result<String, GenerationError>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    fn replying(reply: Result<String, GenerationError>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl NarrativeGenerator for RecordingGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

impl NarrativeGenerator for &RecordingGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        RecordingGenerator::generate(self, prompt)
    }
}

fn annotations(entries: &[(&str, Mood, Option<&str>)]) -> BTreeMap<CellId, WeekAnnotation> {
    entries
        .iter()
        .map(|(cell, mood, note)| {
            let cell_id: CellId = cell.parse().unwrap();
            let annotation = WeekAnnotation {
                cell_id,
                note: note.map(str::to_string),
                mood: *mood,
                recorded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            };
            (cell_id, annotation)
        })
        .collect()
}

#[test]
fn generated_text_is_returned() {
    let generator = RecordingGenerator::replying(Ok("每一周都算数。".to_string()));
    let service = InsightService::new(&generator);

    let outcome = service.request_insight(
        &annotations(&[("5-10", Mood::Happy, Some("trip"))]),
        30.2,
    );

    assert_eq!(outcome, InsightOutcome::Generated("每一周都算数。".to_string()));
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("- [5-10] Mood: HAPPY, Note: trip"));
    assert!(prompts[0].contains("30.2 years old"));
}

#[test]
fn failures_degrade_to_fallback_text() {
    for error in [
        GenerationError::MissingCredentials,
        GenerationError::Transport("connection refused".to_string()),
        GenerationError::Status {
            code: 429,
            body: "quota".to_string(),
        },
        GenerationError::EmptyResponse,
    ] {
        let generator = RecordingGenerator::replying(Err(error));
        let service = InsightService::new(&generator);
        let outcome = service.request_insight(&BTreeMap::new(), 40.0);
        assert_eq!(outcome, InsightOutcome::Fallback(FALLBACK_INSIGHT.to_string()));
        assert_eq!(outcome.text(), Some(FALLBACK_INSIGHT));
        assert!(!service.is_busy());
    }
}

#[test]
fn no_noted_weeks_means_no_highlight_lines() {
    let generator = RecordingGenerator::replying(Ok("ok".to_string()));
    let service = InsightService::new(&generator);

    let outcome = service.request_insight(
        &annotations(&[
            ("1-1", Mood::Tough, None),
            ("1-2", Mood::Happy, Some("   ")),
        ]),
        12.0,
    );

    assert_eq!(outcome.text(), Some("ok"));
    let prompt = &generator.prompts()[0];
    assert!(!prompt.contains("- ["));
    assert!(prompt.contains("Recent Life Highlights/Moods:"));
}

#[test]
fn only_ten_most_recent_notes_are_sent_newest_first() {
    let generator = RecordingGenerator::replying(Ok("ok".to_string()));
    let service = InsightService::new(&generator);
    let notes: Vec<(String, String)> = (0..12)
        .map(|year| (format!("{year}-0"), format!("year {year}")))
        .collect();
    let entries: Vec<(&str, Mood, Option<&str>)> = notes
        .iter()
        .map(|(cell, note)| (cell.as_str(), Mood::Neutral, Some(note.as_str())))
        .collect();

    service.request_insight(&annotations(&entries), 12.5);

    let prompt = &generator.prompts()[0];
    let listed: Vec<&str> = prompt
        .lines()
        .filter(|line| line.starts_with("- ["))
        .collect();
    assert_eq!(listed.len(), 10);
    assert!(listed[0].starts_with("- [11-0]"));
    assert!(listed[1].starts_with("- [10-0]"));
    assert!(listed[9].starts_with("- [2-0]"));
}

struct BlockingGenerator {
    entered: Barrier,
    release: Barrier,
}

impl NarrativeGenerator for &BlockingGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.entered.wait();
        self.release.wait();
        Ok("done".to_string())
    }
}

#[test]
fn overlapping_request_is_refused_while_busy() {
    let generator = BlockingGenerator {
        entered: Barrier::new(2),
        release: Barrier::new(2),
    };
    let service = InsightService::new(&generator);
    let empty = BTreeMap::new();

    std::thread::scope(|scope| {
        let first = scope.spawn(|| service.request_insight(&empty, 1.0));

        generator.entered.wait();
        assert!(service.is_busy());
        assert_eq!(service.request_insight(&empty, 1.0), InsightOutcome::Busy);
        generator.release.wait();

        assert_eq!(
            first.join().unwrap(),
            InsightOutcome::Generated("done".to_string())
        );
    });
    assert!(!service.is_busy());
}
