//! Replays recorded observations from a JSON-lines fixture.

use crate::source::types::Observation;
use crate::source::{ObservationSource, SourceError};
use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

/// A finite source that yields pre-recorded observations in order.
#[derive(Debug, Default)]
pub struct ReplaySource {
    queue: VecDeque<Observation>,
}

impl ReplaySource {
    pub fn new(observations: impl IntoIterator<Item = Observation>) -> Self {
        Self {
            queue: observations.into_iter().collect(),
        }
    }

    /// Parse one JSON observation per line. Blank lines and `#` comments are skipped.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, SourceError> {
        let mut queue = VecDeque::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let observation = serde_json::from_str::<Observation>(trimmed)
                .map_err(|e| SourceError::Parse {
                    line: idx + 1,
                    reason: e.to_string(),
                })?
                .normalized();
            observation.validate().map_err(|e| SourceError::Parse {
                line: idx + 1,
                reason: e.to_string(),
            })?;
            queue.push_back(observation);
        }
        Ok(Self { queue })
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Number of observations left to replay.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ObservationSource for ReplaySource {
    fn next_observation(&mut self) -> Result<Observation, SourceError> {
        self.queue.pop_front().ok_or(SourceError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
# calm, then a help gesture
{"emotion":{"label":"happy","confidence":0.85,"is_distress":false},"gesture":"none"}

{"emotion":{"label":"neutral","confidence":0.75,"is_distress":false},"gesture":"help"}
"#;

    #[test]
    fn test_replay_parses_fixture_in_order() {
        let mut source = ReplaySource::from_reader(FIXTURE.as_bytes()).unwrap();
        assert_eq!(source.remaining(), 2);

        assert_eq!(source.next_observation().unwrap().emotion.label, "happy");
        assert_eq!(source.next_observation().unwrap().gesture, "help");
        assert!(matches!(
            source.next_observation(),
            Err(SourceError::Exhausted)
        ));
    }

    #[test]
    fn test_replay_normalizes_gesture_case() {
        let fixture =
            r#"{"emotion":{"label":"Neutral","confidence":0.75,"is_distress":false},"gesture":" HELP"}"#;
        let mut source = ReplaySource::from_reader(fixture.as_bytes()).unwrap();
        let obs = source.next_observation().unwrap();
        assert_eq!(obs.gesture, "help");
        assert_eq!(obs.emotion.label, "neutral");
    }

    #[test]
    fn test_replay_reports_line_of_bad_record() {
        let fixture = concat!(
            r#"{"emotion":{"label":"sad","confidence":0.5,"is_distress":false},"gesture":"none"}"#,
            "\n",
            r#"{"emotion":{"label":"sad","confidence":3.0,"is_distress":false},"gesture":"none"}"#,
        );
        match ReplaySource::from_reader(fixture.as_bytes()) {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
