use hashlink::LinkedHashMap;
use snafu::Snafu;

use crate::namespace::{Namespace, Notification};
use crate::tree::RawListing;

pub const SET_CURRENT_WORKSPACE: &str = "SET_CURRENT_WORKSPACE";
pub const SET_WORKSPACES: &str = "SET_WORKSPACES";
pub const SET_MODE: &str = "SET_MODE";
pub const FETCH_DIRECTORY_REQUEST: &str = "FETCH_DIRECTORY_REQUEST";
pub const FETCH_DIRECTORY_SUCCESS: &str = "FETCH_DIRECTORY_SUCCESS";
pub const FETCH_DIRECTORY_ERROR: &str = "FETCH_DIRECTORY_ERROR";
pub const DISPLAY_NOTIFICATION: &str = "DISPLAY_NOTIFICATION";
pub const HIDE_NOTIFICATION: &str = "HIDE_NOTIFICATION";
pub const FILE_ADDED_SUCCESS: &str = "FILE_ADDED_SUCCESS";
pub const FOLDER_ADDED_SUCCESS: &str = "FOLDER_ADDED_SUCCESS";
pub const FILE_REMOVED_SUCCESS: &str = "FILE_REMOVED_SUCCESS";
pub const FOLDER_REMOVED_SUCCESS: &str = "FOLDER_REMOVED_SUCCESS";
pub const ROOT_FOLDER_CHANGED: &str = "ROOT_FOLDER_CHANGED";

/// A state transition of the explorer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RequestStarted,
    RequestSucceeded { path: String, listing: RawListing },
    RequestFailed(String),
    FileAdded(String),
    FolderAdded(String),
    FileRemoved(String),
    FolderRemoved(String),
    ModeChanged(Namespace),
    CurrentWorkspaceChanged(String),
    WorkspacesChanged(Vec<String>),
    SharedFolderChanged(String),
    NotificationShown(Notification),
    NotificationHidden,
}

impl Action {
    /// Wire name of the action
    pub fn kind(&self) -> &'static str {
        match self {
            Action::RequestStarted => FETCH_DIRECTORY_REQUEST,
            Action::RequestSucceeded { .. } => FETCH_DIRECTORY_SUCCESS,
            Action::RequestFailed(_) => FETCH_DIRECTORY_ERROR,
            Action::FileAdded(_) => FILE_ADDED_SUCCESS,
            Action::FolderAdded(_) => FOLDER_ADDED_SUCCESS,
            Action::FileRemoved(_) => FILE_REMOVED_SUCCESS,
            Action::FolderRemoved(_) => FOLDER_REMOVED_SUCCESS,
            Action::ModeChanged(_) => SET_MODE,
            Action::CurrentWorkspaceChanged(_) => SET_CURRENT_WORKSPACE,
            Action::WorkspacesChanged(_) => SET_WORKSPACES,
            Action::SharedFolderChanged(_) => ROOT_FOLDER_CHANGED,
            Action::NotificationShown(_) => DISPLAY_NOTIFICATION,
            Action::NotificationHidden => HIDE_NOTIFICATION,
        }
    }
}

/// Field value carried by an untyped event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
    Listing(RawListing),
}

/// An event as delivered by an external collaborator, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: String,
    pub fields: LinkedHashMap<String, RawValue>,
}

impl RawEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: LinkedHashMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: RawValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    #[cfg(test)]
    pub fn with_text(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(field, RawValue::Text(value.into()))
    }

    fn text(&self, field: &'static str) -> Result<String, IntegrationError> {
        match self.optional_text(field)? {
            Some(value) => Ok(value),
            None => Err(self.missing(field)),
        }
    }

    fn optional_text(&self, field: &'static str) -> Result<Option<String>, IntegrationError> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(RawValue::Text(value)) => Ok(Some(value.clone())),
            Some(_) => Err(self.invalid(field, "text")),
        }
    }

    fn path(&self, field: &'static str) -> Result<String, IntegrationError> {
        let path = self.text(field)?;
        if path.is_empty() {
            return Err(IntegrationError::EmptyPath {
                kind: self.kind.clone(),
            });
        }
        Ok(path)
    }

    fn list(&self, field: &'static str) -> Result<Vec<String>, IntegrationError> {
        match self.fields.get(field) {
            None => Err(self.missing(field)),
            Some(RawValue::List(values)) => Ok(values.clone()),
            Some(_) => Err(self.invalid(field, "a list")),
        }
    }

    fn listing(&self, field: &'static str) -> Result<RawListing, IntegrationError> {
        match self.fields.get(field) {
            None => Err(self.missing(field)),
            Some(RawValue::Listing(listing)) => Ok(listing.clone()),
            Some(_) => Err(self.invalid(field, "a directory listing")),
        }
    }

    fn missing(&self, field: &'static str) -> IntegrationError {
        IntegrationError::MissingField {
            kind: self.kind.clone(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> IntegrationError {
        IntegrationError::InvalidField {
            kind: self.kind.clone(),
            field,
            expected,
        }
    }
}

impl TryFrom<RawEvent> for Action {
    type Error = IntegrationError;

    fn try_from(event: RawEvent) -> Result<Self, Self::Error> {
        let action = match event.kind.as_str() {
            FETCH_DIRECTORY_REQUEST => Action::RequestStarted,
            FETCH_DIRECTORY_SUCCESS => Action::RequestSucceeded {
                path: event.path("path")?,
                listing: event.listing("listing")?,
            },
            FETCH_DIRECTORY_ERROR => Action::RequestFailed(event.text("error")?),
            FILE_ADDED_SUCCESS => Action::FileAdded(event.path("path")?),
            FOLDER_ADDED_SUCCESS => Action::FolderAdded(event.path("path")?),
            FILE_REMOVED_SUCCESS => Action::FileRemoved(event.path("path")?),
            FOLDER_REMOVED_SUCCESS => Action::FolderRemoved(event.path("path")?),
            SET_MODE => Action::ModeChanged(event.text("mode")?.parse()?),
            SET_CURRENT_WORKSPACE => Action::CurrentWorkspaceChanged(event.text("workspace")?),
            SET_WORKSPACES => Action::WorkspacesChanged(event.list("workspaces")?),
            ROOT_FOLDER_CHANGED => Action::SharedFolderChanged(event.text("path")?),
            DISPLAY_NOTIFICATION => {
                let notification = Notification::new(event.text("title")?, event.text("message")?)
                    .with_labels(
                        event.optional_text("label_ok")?.unwrap_or_default(),
                        event.optional_text("label_cancel")?.unwrap_or_default(),
                    );
                Action::NotificationShown(notification)
            }
            HIDE_NOTIFICATION => Action::NotificationHidden,
            _ => {
                return UnknownActionSnafu {
                    kind: event.kind.clone(),
                }
                .fail();
            }
        };
        Ok(action)
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum IntegrationError {
    #[snafu(display("Unknown action kind '{}'", kind))]
    UnknownAction { kind: String },
    #[snafu(display("Action '{}' is missing field '{}'", kind, field))]
    MissingField { kind: String, field: &'static str },
    #[snafu(display("Field '{}' of action '{}' should be {}", field, kind, expected))]
    InvalidField {
        kind: String,
        field: &'static str,
        expected: &'static str,
    },
    #[snafu(display("Action '{}' carries an empty path", kind))]
    EmptyPath { kind: String },
    #[snafu(display("Unknown mode '{}'", mode))]
    UnknownMode { mode: String },
}
