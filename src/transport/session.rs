use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::namespace::{Action, ExplorerState, IntegrationError, RawEvent};
use crate::paths::TraversalKey;
use crate::transport::ListingSource;

/// Serial event loop around an [`ExplorerState`].
///
/// Actions are queued on an unbounded channel and applied one at a time, in
/// the order they were sent. Listing fetches go out to the [`ListingSource`]
/// and come back as queued success or failure actions.
pub struct Session<S> {
    state: ExplorerState,
    source: S,
    sender: UnboundedSender<Action>,
    receiver: UnboundedReceiver<Action>,
}

impl<S: ListingSource> Session<S> {
    pub fn new(state: ExplorerState, source: S) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            state,
            source,
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    /// Handle for collaborators that report changes asynchronously
    pub fn dispatcher(&self) -> UnboundedSender<Action> {
        self.sender.clone()
    }

    /// Validates and applies an external event right away
    pub fn dispatch(&mut self, event: RawEvent) -> Result<(), IntegrationError> {
        self.state = self.state.dispatch(event)?;
        Ok(())
    }

    /// Fetches the listing of `path` and folds the outcome into the state
    pub async fn refresh(&mut self, path: &str) -> usize {
        self.enqueue(Action::RequestStarted);

        let relative_path = match TraversalKey::new(self.state.active_root_id(), path) {
            Ok(key) => key.relative_path(),
            Err(e) => {
                warn!("Cannot refresh '{}': {}", path, e);
                self.enqueue(Action::RequestFailed(e.to_string()));
                return self.drain();
            }
        };

        match self.source.fetch(&relative_path).await {
            Ok(listing) => self.enqueue(Action::RequestSucceeded {
                path: path.to_string(),
                listing,
            }),
            Err(e) => {
                warn!("Listing '{}' failed: {}", path, e);
                self.enqueue(Action::RequestFailed(e.to_string()));
            }
        }
        self.drain()
    }

    /// Applies every queued action and returns how many there were
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.receiver.try_recv() {
            self.state = self.state.reduce(action);
            applied += 1;
        }
        debug!("Applied {} queued actions", applied);
        applied
    }

    fn enqueue(&self, action: Action) {
        if let Err(e) = self.sender.unbounded_send(action) {
            warn!("Dropping queued action: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{FILE_ADDED_SUCCESS, Namespace};
    use crate::transport::LocalDirectorySource;
    use crate::transport::listing_source::FetchError;
    use crate::tree::{ListingEntry, RawListing};
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("contracts")).unwrap();
        fs::write(dir.path().join("contracts/token.sol"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();
        dir
    }

    fn localhost_session(dir: &TempDir) -> Session<LocalDirectorySource> {
        let state = ExplorerState::default().reduce(Action::ModeChanged(Namespace::Localhost));
        Session::new(state, LocalDirectorySource::new(dir.path()))
    }

    #[compio::test]
    async fn refresh_lists_root_and_nested_levels() {
        let dir = fixture();
        let mut session = localhost_session(&dir);

        assert_eq!(session.refresh("localhost").await, 2);
        session.refresh("contracts").await;

        let state = session.state();
        assert!(state.active().is_successful());
        assert!(!state.active().is_requesting());
        assert!(state.lookup("contracts/token.sol").is_some());
        assert!(state.lookup("README.md").is_some());
        assert!(state.namespace(Namespace::Browser).tree().is_empty());
    }

    #[compio::test]
    async fn failed_fetch_records_error() {
        let dir = fixture();
        let mut session = localhost_session(&dir);
        session.refresh("localhost").await;

        session.refresh("missing").await;

        let active = session.state().active();
        assert!(!active.is_successful());
        assert!(active.last_error().is_some_and(|e| e.contains("missing")));
        assert!(session.state().lookup("contracts").is_some());
    }

    #[compio::test]
    async fn queued_actions_apply_in_order() {
        let dir = fixture();
        let mut session = localhost_session(&dir);
        session.refresh("localhost").await;

        let sender = session.dispatcher();
        sender
            .unbounded_send(Action::FileAdded("notes.txt".into()))
            .unwrap();
        sender
            .unbounded_send(Action::FileRemoved("notes.txt".into()))
            .unwrap();

        assert_eq!(session.drain(), 2);
        assert!(session.state().lookup("notes.txt").is_none());
        assert!(session.state().active().is_expanded("notes.txt"));
    }

    #[test]
    fn rejected_event_leaves_state_alone() {
        let dir = fixture();
        let mut session = localhost_session(&dir);
        let before = session.state().clone();

        let result = session.dispatch(RawEvent::new(FILE_ADDED_SUCCESS));

        assert!(result.is_err());
        assert_eq!(session.state(), &before);
    }

    struct FailingSource;

    impl ListingSource for FailingSource {
        async fn fetch(&self, relative_path: &str) -> Result<RawListing, FetchError> {
            Err(FetchError::ReadDir {
                path: relative_path.into(),
                source: std::io::Error::other("offline"),
            })
        }
    }

    struct FixedSource(RawListing);

    impl ListingSource for FixedSource {
        async fn fetch(&self, _relative_path: &str) -> Result<RawListing, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn browser_namespace_refreshes_current_workspace() {
        let mut listing = RawListing::new();
        listing.insert("scripts".to_string(), ListingEntry::directory());
        let state =
            ExplorerState::default().reduce(Action::CurrentWorkspaceChanged("default".into()));
        let mut session = Session::new(state, FixedSource(listing));

        futures::executor::block_on(session.refresh("default"));

        let tree = session.state().namespace(Namespace::Browser).tree();
        assert!(tree.root("default").is_some());
        assert!(session.state().lookup("scripts").is_some());
    }

    #[test]
    fn source_failure_is_not_fatal() {
        let state = ExplorerState::default().reduce(Action::CurrentWorkspaceChanged("w".into()));
        let mut session = Session::new(state, FailingSource);

        assert_eq!(futures::executor::block_on(session.refresh("w")), 2);
        assert!(
            session
                .state()
                .active()
                .last_error()
                .is_some_and(|e| e.contains("offline"))
        );
    }
}
