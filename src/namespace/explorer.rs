use tracing::{debug, warn};

use crate::namespace::{
    Action, IntegrationError, LOCALHOST_ROOT, Namespace, NamespaceState, Notification, RawEvent,
};
use crate::paths::TraversalKey;
use crate::tree::{NamespaceTree, Node, TreeUpdateError, insert, merge_level, remove};

/// State of both namespaces plus the workspace bookkeeping around them.
///
/// Every transition goes through [`ExplorerState::reduce`], which leaves
/// `self` untouched and returns the next state. Only the namespace selected
/// by the current mode is ever modified by tree and request actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorerState {
    browser: NamespaceState,
    localhost: NamespaceState,
    mode: Namespace,
    current_workspace: String,
    workspaces: Vec<String>,
    shared_folder: String,
    notification: Notification,
}

impl ExplorerState {
    pub fn mode(&self) -> Namespace {
        self.mode
    }

    pub fn namespace(&self, namespace: Namespace) -> &NamespaceState {
        match namespace {
            Namespace::Browser => &self.browser,
            Namespace::Localhost => &self.localhost,
        }
    }

    pub fn active(&self) -> &NamespaceState {
        self.namespace(self.mode)
    }

    /// Identifier the namespace's tree is rooted at
    pub fn root_id(&self, namespace: Namespace) -> &str {
        match namespace {
            Namespace::Browser => &self.current_workspace,
            Namespace::Localhost => LOCALHOST_ROOT,
        }
    }

    pub fn active_root_id(&self) -> &str {
        self.root_id(self.mode)
    }

    pub fn current_workspace(&self) -> &str {
        &self.current_workspace
    }

    pub fn workspaces(&self) -> &[String] {
        &self.workspaces
    }

    pub fn shared_folder(&self) -> &str {
        &self.shared_folder
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    /// Node at `path` in the active namespace
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        let key = TraversalKey::new(self.active_root_id(), path).ok()?;
        self.active().tree().lookup(&key)
    }

    /// Validates an external event and applies it.
    ///
    /// A rejected event leaves no trace: the error is returned before any
    /// state is produced.
    pub fn dispatch(&self, event: RawEvent) -> Result<Self, IntegrationError> {
        let action = Action::try_from(event)?;
        Ok(self.reduce(action))
    }

    pub fn reduce(&self, action: Action) -> Self {
        let mut next = self.clone();
        let namespace = next.mode;
        let root = next.root_id(namespace).to_string();
        debug!("Applying {} to the {} namespace", action.kind(), namespace);

        match action {
            Action::RequestStarted => {
                let state = next.namespace_mut(namespace);
                state.is_requesting = true;
                state.is_successful = false;
                state.last_error = None;
            }
            Action::RequestSucceeded { path, listing } => {
                let state = next.namespace_mut(namespace);
                match merge_level(&state.tree, &root, &path, &listing) {
                    Ok(tree) => state.tree = tree,
                    Err(e) => warn!("Ignoring listing of '{}': {}", path, e),
                }
                state.is_requesting = false;
                state.is_successful = true;
                state.last_error = None;
            }
            Action::RequestFailed(message) => {
                let state = next.namespace_mut(namespace);
                state.is_requesting = false;
                state.is_successful = false;
                state.last_error = Some(message);
            }
            Action::FileAdded(path) => {
                next.apply_mutation(namespace, &path, |tree| insert(tree, &root, &path, false))
            }
            Action::FolderAdded(path) => {
                next.apply_mutation(namespace, &path, |tree| insert(tree, &root, &path, true))
            }
            Action::FileRemoved(path) | Action::FolderRemoved(path) => {
                next.apply_mutation(namespace, &path, |tree| remove(tree, &root, &path))
            }
            Action::ModeChanged(mode) => next.mode = mode,
            Action::CurrentWorkspaceChanged(name) => {
                if !next.workspaces.contains(&name) {
                    next.workspaces.push(name.clone());
                }
                next.current_workspace = name;
            }
            Action::WorkspacesChanged(workspaces) => {
                next.workspaces.clear();
                for workspace in workspaces {
                    if !next.workspaces.contains(&workspace) {
                        next.workspaces.push(workspace);
                    }
                }
            }
            Action::SharedFolderChanged(folder) => next.shared_folder = folder,
            Action::NotificationShown(notification) => next.notification = notification,
            Action::NotificationHidden => next.notification = Notification::default(),
        }

        next
    }

    fn namespace_mut(&mut self, namespace: Namespace) -> &mut NamespaceState {
        match namespace {
            Namespace::Browser => &mut self.browser,
            Namespace::Localhost => &mut self.localhost,
        }
    }

    fn apply_mutation<F>(&mut self, namespace: Namespace, path: &str, mutate: F)
    where
        F: FnOnce(&NamespaceTree) -> Result<NamespaceTree, TreeUpdateError>,
    {
        let state = self.namespace_mut(namespace);
        match mutate(&state.tree) {
            Ok(tree) => state.tree = tree,
            Err(e @ TreeUpdateError::EntryNotFound { .. }) => debug!("{}", e),
            Err(e) => warn!("Ignoring change of '{}': {}", path, e),
        }
        state.mark_expanded(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{FILE_ADDED_SUCCESS, RawValue, SET_MODE};
    use crate::tree::{ListingEntry, RawListing};

    fn listing(entries: &[(&str, bool)]) -> RawListing {
        entries
            .iter()
            .map(|(path, is_directory)| {
                (
                    path.to_string(),
                    ListingEntry {
                        is_directory: *is_directory,
                    },
                )
            })
            .collect()
    }

    fn success(path: &str, entries: &[(&str, bool)]) -> Action {
        Action::RequestSucceeded {
            path: path.to_string(),
            listing: listing(entries),
        }
    }

    /// Browser namespace on workspace "default" with `contracts/` listed
    fn browser_state() -> ExplorerState {
        ExplorerState::default()
            .reduce(Action::CurrentWorkspaceChanged("default".into()))
            .reduce(success(
                "default",
                &[("contracts", true), ("README.txt", false)],
            ))
            .reduce(success("contracts", &[("contracts/token.sol", false)]))
    }

    #[test]
    fn request_lifecycle_updates_active_namespace() {
        let state = browser_state();

        let requesting = state.reduce(Action::RequestStarted);
        assert!(requesting.active().is_requesting());
        assert!(!requesting.active().is_successful());

        let failed = requesting.reduce(Action::RequestFailed("offline".into()));
        assert!(!failed.active().is_requesting());
        assert!(!failed.active().is_successful());
        assert_eq!(failed.active().last_error(), Some("offline"));

        let recovered = failed
            .reduce(Action::RequestStarted)
            .reduce(success("contracts", &[]));
        assert!(recovered.active().is_successful());
        assert_eq!(recovered.active().last_error(), None);
    }

    #[test]
    fn request_actions_leave_inactive_namespace_alone() {
        let state = browser_state();
        let localhost_before = state.namespace(Namespace::Localhost).clone();

        let next = state
            .reduce(Action::RequestStarted)
            .reduce(Action::RequestFailed("boom".into()))
            .reduce(Action::FileAdded("contracts/x.sol".into()));

        assert_eq!(next.namespace(Namespace::Localhost), &localhost_before);
    }

    #[test]
    fn success_merges_into_active_namespace() {
        let state = browser_state();

        assert!(state.lookup("contracts/token.sol").is_some());
        assert!(state.lookup("default/README.txt").is_some());
        assert!(state.namespace(Namespace::Localhost).tree().is_empty());
    }

    #[test]
    fn localhost_namespace_is_rooted_at_localhost() {
        let state = browser_state()
            .reduce(Action::ModeChanged(Namespace::Localhost))
            .reduce(success("localhost", &[("shared", true)]))
            .reduce(success("localhost/shared", &[("shared/a.txt", false)]));

        assert!(state.lookup("shared/a.txt").is_some());
        let localhost = state.namespace(Namespace::Localhost).tree();
        assert!(localhost.root(LOCALHOST_ROOT).is_some());
        assert!(
            state
                .namespace(Namespace::Browser)
                .tree()
                .root("default")
                .is_some()
        );
    }

    #[test]
    fn mode_change_does_not_touch_namespaces() {
        let state = browser_state();

        let switched = state.reduce(Action::ModeChanged(Namespace::Localhost));

        assert_eq!(switched.mode(), Namespace::Localhost);
        assert_eq!(
            switched.namespace(Namespace::Browser),
            state.namespace(Namespace::Browser)
        );
        assert_eq!(
            switched.namespace(Namespace::Localhost),
            state.namespace(Namespace::Localhost)
        );
    }

    #[test]
    fn additions_and_removals_track_expanded_paths() {
        let state = browser_state()
            .reduce(Action::FileAdded("contracts/new.sol".into()))
            .reduce(Action::FolderAdded("contracts/lib".into()))
            .reduce(Action::FileAdded("contracts/new.sol".into()))
            .reduce(Action::FileRemoved("contracts/token.sol".into()));

        assert!(state.lookup("contracts/new.sol").is_some());
        assert!(state.lookup("contracts/lib").unwrap().is_directory);
        assert!(state.lookup("contracts/token.sol").is_none());
        assert_eq!(
            state.active().expanded_paths().collect::<Vec<_>>(),
            vec!["contracts/new.sol", "contracts/lib", "contracts/token.sol"]
        );
    }

    #[test]
    fn folder_removal_drops_subtree() {
        let state = browser_state().reduce(Action::FolderRemoved("contracts".into()));

        assert!(state.lookup("contracts").is_none());
        assert!(state.lookup("README.txt").is_some());
    }

    #[test]
    fn changes_under_unknown_parent_are_ignored() {
        let state = browser_state();

        let next = state.reduce(Action::FileAdded("missing/dir/file".into()));

        assert_eq!(next.active().tree(), state.active().tree());
        assert!(next.active().is_expanded("missing/dir/file"));
    }

    #[test]
    fn listing_for_unknown_directory_is_ignored() {
        let state = browser_state();

        let next = state.reduce(success("nowhere/deep", &[("nowhere/deep/x", false)]));

        assert_eq!(next.active().tree(), state.active().tree());
        assert!(next.active().is_successful());
    }

    #[test]
    fn workspace_list_has_no_duplicates() {
        let state = ExplorerState::default()
            .reduce(Action::CurrentWorkspaceChanged("one".into()))
            .reduce(Action::CurrentWorkspaceChanged("two".into()))
            .reduce(Action::CurrentWorkspaceChanged("one".into()));

        assert_eq!(state.current_workspace(), "one");
        assert_eq!(state.workspaces(), &["one", "two"]);

        let replaced = state.reduce(Action::WorkspacesChanged(vec![
            "b".into(),
            "a".into(),
            "b".into(),
        ]));
        assert_eq!(replaced.workspaces(), &["b", "a"]);
    }

    #[test]
    fn shared_folder_and_notifications() {
        let state = ExplorerState::default()
            .reduce(Action::SharedFolderChanged("/home/me/project".into()))
            .reduce(Action::NotificationShown(
                Notification::new("Title", "Body").with_labels("OK", "Cancel"),
            ));

        assert_eq!(state.shared_folder(), "/home/me/project");
        assert_eq!(state.notification().title(), "Title");

        let hidden = state.reduce(Action::NotificationHidden);
        assert_eq!(hidden.notification(), &Notification::default());
    }

    #[test]
    fn reduce_leaves_previous_state_intact() {
        let state = browser_state();
        let snapshot = state.clone();

        let _ = state
            .reduce(Action::FolderRemoved("contracts".into()))
            .reduce(Action::ModeChanged(Namespace::Localhost));

        assert_eq!(state, snapshot);
        assert!(state.lookup("contracts/token.sol").is_some());
    }

    #[test]
    fn unknown_event_is_rejected_without_mutation() {
        let state = browser_state();

        let result = state.dispatch(RawEvent::new("FILE_RENAMED_SUCCESS"));

        assert!(matches!(
            result,
            Err(IntegrationError::UnknownAction { .. })
        ));
        assert_eq!(state, browser_state());
    }

    #[test]
    fn dispatch_applies_valid_events() {
        let state = browser_state()
            .dispatch(RawEvent::new(SET_MODE).with_text("mode", "localhost"))
            .unwrap();
        assert_eq!(state.mode(), Namespace::Localhost);

        let error = state
            .dispatch(RawEvent::new(FILE_ADDED_SUCCESS).with("path", RawValue::Flag(true)))
            .unwrap_err();
        assert!(matches!(error, IntegrationError::InvalidField { .. }));
    }
}
