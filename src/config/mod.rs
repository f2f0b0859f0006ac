//! Event scripts: YAML files describing listings, drops and raw events to
//! replay against a mirrored directory.

mod event_script;

pub use event_script::{EventScript, ScriptError, ScriptStep};
