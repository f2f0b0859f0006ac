use std::str::FromStr;

use derive_more::Display;
use hashlink::LinkedHashSet;

use crate::namespace::IntegrationError;
use crate::tree::NamespaceTree;

/// Root identifier of the shared-folder namespace
pub const LOCALHOST_ROOT: &str = "localhost";

/// Handle of one of the two isolated trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Namespace {
    /// Workspaces stored by the remote provider
    #[default]
    #[display("browser")]
    Browser,
    /// Folder shared from the local machine
    #[display("localhost")]
    Localhost,
}

impl FromStr for Namespace {
    type Err = IntegrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "browser" => Ok(Namespace::Browser),
            "localhost" => Ok(Namespace::Localhost),
            _ => Err(IntegrationError::UnknownMode {
                mode: value.to_string(),
            }),
        }
    }
}

/// Everything tracked for one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceState {
    pub(crate) tree: NamespaceTree,
    pub(crate) expanded_paths: LinkedHashSet<String>,
    pub(crate) is_requesting: bool,
    pub(crate) is_successful: bool,
    pub(crate) last_error: Option<String>,
}

impl NamespaceState {
    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    /// Paths touched by additions and removals, in first-seen order
    pub fn expanded_paths(&self) -> impl Iterator<Item = &str> {
        self.expanded_paths.iter().map(String::as_str)
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded_paths.contains(path)
    }

    pub fn is_requesting(&self) -> bool {
        self.is_requesting
    }

    pub fn is_successful(&self) -> bool {
        self.is_successful
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn mark_expanded(&mut self, path: &str) {
        if !self.expanded_paths.contains(path) {
            self.expanded_paths.insert(path.to_string());
        }
    }
}
