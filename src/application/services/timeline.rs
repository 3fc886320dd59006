//! Timeline loading service

use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::sales::parse_int_prefix;
use crate::domain::{Timeline, TimelineEvent};
use crate::infrastructure::traits::FileSystem;

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Show", default)]
    show: String,
    #[serde(rename = "ShortText", default)]
    short_text: String,
}

pub struct TimelineService {
    fs: Arc<dyn FileSystem>,
}

impl TimelineService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Timeline> {
        debug!("load timeline: {}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read timeline", path)?;
        parse_timeline_csv(&content, path)
    }
}

/// Parse `Name, Text, Year, Show, ShortText` rows; rows without a year are skipped.
pub fn parse_timeline_csv(content: &str, path: &Path) -> ApplicationResult<Timeline> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut events = Vec::new();
    for raw in reader.deserialize::<RawEvent>() {
        let raw = raw.map_err(|e| ApplicationError::dataset(path, e.to_string()))?;
        let Some(year) = parse_int_prefix(&raw.year).and_then(|y| i32::try_from(y).ok()) else {
            warn!("skipping timeline event {:?} with invalid year {:?}", raw.name, raw.year);
            continue;
        };
        events.push(TimelineEvent {
            name: raw.name,
            text: raw.text,
            short_text: raw.short_text,
            year,
            show: raw.show.eq_ignore_ascii_case("true"),
        });
    }
    debug!("parse_timeline_csv: {} events", events.len());
    Ok(Timeline::new(events))
}
