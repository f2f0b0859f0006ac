use std::borrow::Cow;
use std::path::Path;

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::drop_target::DragSource;
use crate::namespace::{RawEvent, RawValue};
use crate::tree::{ListingEntry, RawListing};

/// Script kind that lists a directory through the session
const FETCH_STEP: &str = "FETCH";
/// Script kind that drops an entry onto a target
const DROP_STEP: &str = "DROP";

const KIND_FIELD: &str = "kind";
const DIRECTORY_FLAG: &str = "isDirectory";

/// One line of an event script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Fetch {
        path: String,
    },
    Drop {
        source: DragSource,
        target: Option<String>,
    },
    /// Any other kind, handed to the explorer as is
    Dispatch(RawEvent),
}

/// Ordered list of steps replayed against a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventScript {
    steps: Vec<ScriptStep>,
}

impl EventScript {
    pub async fn read(path: &Path) -> Result<Self, ScriptError> {
        debug!("Reading event script {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        String::from_utf8_lossy(&bytes).as_ref().try_into()
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    fn parse_step(index: usize, event: &LinkedHashMap<Yaml, Yaml>) -> Result<ScriptStep, ScriptError> {
        let kind = field(event, KIND_FIELD)
            .and_then(|kind| kind.as_str())
            .context(MissingKindSnafu { index })?;

        let step = match kind {
            FETCH_STEP => ScriptStep::Fetch {
                path: required_text(index, event, "path")?,
            },
            DROP_STEP => ScriptStep::Drop {
                source: DragSource {
                    path: required_text(index, event, "source")?,
                    is_directory: field(event, "is_directory")
                        .and_then(as_flag)
                        .unwrap_or(false),
                },
                target: field(event, "target")
                    .and_then(|target| target.as_str())
                    .map(str::to_string),
            },
            _ => {
                let mut raw = RawEvent::new(kind);
                for (key, value) in event {
                    let Some(name) = key.as_str() else {
                        debug!("Skipping non-string field in event {}", index);
                        continue;
                    };
                    if name == KIND_FIELD {
                        continue;
                    }
                    raw = raw.with(name, raw_value(index, name, value)?);
                }
                ScriptStep::Dispatch(raw)
            }
        };
        Ok(step)
    }
}

impl TryFrom<&str> for EventScript {
    type Error = ScriptError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedScriptSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let Some(events) = field(top_level, "events") else {
            return Ok(EventScript::default());
        };
        let events = events.as_sequence().context(EventsNotSequenceSnafu)?;

        let steps = events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let event = event.as_mapping().context(EventNotMapSnafu { index })?;
                Self::parse_step(index, event)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Loaded {} script steps", steps.len());

        Ok(EventScript { steps })
    }
}

fn field<'m, 'y>(map: &'m LinkedHashMap<Yaml<'y>, Yaml<'y>>, name: &str) -> Option<&'m Yaml<'y>> {
    map.get(&Yaml::Value(Scalar::String(Cow::Owned(name.to_string()))))
}

fn as_flag(value: &Yaml) -> Option<bool> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Some(*flag),
        _ => None,
    }
}

fn required_text(
    index: usize,
    event: &LinkedHashMap<Yaml, Yaml>,
    name: &'static str,
) -> Result<String, ScriptError> {
    field(event, name)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .context(MissingFieldSnafu { index, field: name })
}

fn raw_value(index: usize, name: &str, value: &Yaml) -> Result<RawValue, ScriptError> {
    match value {
        Yaml::Value(Scalar::String(text)) => Ok(RawValue::Text(text.to_string())),
        Yaml::Value(Scalar::Boolean(flag)) => Ok(RawValue::Flag(*flag)),
        Yaml::Value(Scalar::Integer(number)) => Ok(RawValue::Text(number.to_string())),
        Yaml::Sequence(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(RawValue::List)
            .context(UnsupportedValueSnafu { index, field: name }),
        Yaml::Mapping(entries) => listing(index, entries).map(RawValue::Listing),
        _ => UnsupportedValueSnafu { index, field: name }.fail(),
    }
}

fn listing(index: usize, entries: &LinkedHashMap<Yaml, Yaml>) -> Result<RawListing, ScriptError> {
    entries
        .iter()
        .map(|(path, entry)| {
            let path = path.as_str().context(InvalidListingSnafu { index })?;
            let is_directory = entry
                .as_mapping()
                .and_then(|entry| field(entry, DIRECTORY_FLAG))
                .and_then(as_flag)
                .context(InvalidListingSnafu { index })?;
            Ok((path.to_string(), ListingEntry { is_directory }))
        })
        .collect()
}

#[derive(Debug, Snafu)]
pub enum ScriptError {
    #[snafu(display("Failed to read the event script: {}", file_path))]
    Read {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the event script"))]
    Parse { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted event script"))]
    MalformedScript,
    #[snafu(display("Top level of the event script should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The events section should be a sequence"))]
    EventsNotSequence,
    #[snafu(display("Event {} should be a map", index))]
    EventNotMap { index: usize },
    #[snafu(display("Event {} has no kind", index))]
    MissingKind { index: usize },
    #[snafu(display("Event {} is missing field '{}'", index, field))]
    MissingField { index: usize, field: &'static str },
    #[snafu(display("Field '{}' of event {} has an unsupported value", field, index))]
    UnsupportedValue { index: usize, field: String },
    #[snafu(display(
        "Listing of event {} should map paths to {{{}: bool}}",
        index,
        DIRECTORY_FLAG
    ))]
    InvalidListing { index: usize },
}
