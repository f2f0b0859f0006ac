use std::fmt::Write;
use std::path::Path;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::config::{EventScript, ScriptError, ScriptStep};
use crate::drop_target::{DropController, DropOutcome, MoveKind, MoveRequest};
use crate::namespace::{
    Action, ExplorerState, IntegrationError, LOCALHOST_ROOT, Namespace, Notification,
};
use crate::paths::{ROOT_PATH, last_segment};
use crate::transport::{
    ListingSource, LocalDirectorySource, LocalMover, LocalTargetResolver, Session,
};
use crate::tree::{Node, render};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        colored::control::set_override(app_config.use_color);

        let output = Self::mirror(&app_config).await?;
        print!("{output}");

        Ok(())
    }

    /// Lists the root, expands the requested paths, replays the script and
    /// returns the rendered tree
    pub async fn mirror(app_config: &RuntimeConfig) -> Result<String, ApplicationError> {
        let root = app_config.root.canonicalize().context(RootSnafu {
            path: app_config.root.display().to_string(),
        })?;
        ensure!(
            root.is_dir(),
            RootNotDirectorySnafu {
                path: root.display().to_string()
            }
        );
        info!("Mirroring {}", root.display());

        let state = ExplorerState::default()
            .reduce(Action::ModeChanged(Namespace::Localhost))
            .reduce(Action::SharedFolderChanged(root.display().to_string()));
        let mut session = Session::new(state, LocalDirectorySource::new(&root));

        session.refresh(LOCALHOST_ROOT).await;
        if let Some(message) = session.state().active().last_error() {
            return RootListingSnafu { message }.fail();
        }

        for path in &app_config.expand {
            Self::expand(&mut session, path).await;
        }

        if let Some(script_path) = &app_config.script {
            Self::replay(&mut session, &root, script_path).await?;
        }

        let state = session.state();
        let mut output = render(
            state.active().tree(),
            state.active_root_id(),
            app_config.use_color,
        );
        let notification = state.notification();
        if *notification != Notification::default() {
            let _ = writeln!(
                output,
                "! {}: {}",
                notification.title(),
                notification.message()
            );
        }
        Ok(output)
    }

    /// Lists `path` and every ancestor on the way down
    async fn expand<S: ListingSource>(session: &mut Session<S>, path: &str) {
        let mut prefix = String::new();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            session.refresh(&prefix).await;
            if let Some(message) = session.state().active().last_error() {
                warn!("Stopped expanding '{}': {}", path, message);
                return;
            }
        }
    }

    async fn replay<S: ListingSource>(
        session: &mut Session<S>,
        root: &Path,
        script_path: &Path,
    ) -> Result<(), ApplicationError> {
        let script = EventScript::read(script_path).await.context(ScriptSnafu)?;
        let controller =
            DropController::new(LocalTargetResolver::new(root), LocalMover::new(root));

        for step in script.steps() {
            match step {
                ScriptStep::Fetch { path } => {
                    session.refresh(path).await;
                }
                ScriptStep::Drop { source, target } => {
                    match controller.on_drop(target, source, session.state()).await {
                        Ok(DropOutcome::Moved(request)) => {
                            Self::apply_move(session, &request).await
                        }
                        Ok(DropOutcome::Superseded) => {}
                        Err(e) => {
                            warn!("Drop of '{}' failed: {}", source.path, e);
                            let notification = Notification::new("Move failed", e.to_string());
                            Self::enqueue(session, [Action::NotificationShown(notification)]);
                        }
                    }
                }
                ScriptStep::Dispatch(event) => {
                    debug!("Replaying {}", event.kind);
                    session.dispatch(event.clone()).context(IntegrationSnafu)?;
                }
            }
        }
        Ok(())
    }

    /// Reports a completed move to the session the way a file watcher would,
    /// then relists the destination when it is shown
    async fn apply_move<S: ListingSource>(session: &mut Session<S>, request: &MoveRequest) {
        let name = last_segment(&request.source);
        let moved = if request.destination == ROOT_PATH {
            name.to_string()
        } else {
            format!("{}/{}", request.destination, name)
        };
        let (removed, added) = match request.kind {
            MoveKind::File => (
                Action::FileRemoved(request.source.clone()),
                Action::FileAdded(moved),
            ),
            MoveKind::Folder => (
                Action::FolderRemoved(request.source.clone()),
                Action::FolderAdded(moved),
            ),
        };
        Self::enqueue(session, [removed, added]);

        // A root listing replaces the whole tree, so only nested levels are relisted
        if request.destination != ROOT_PATH
            && session
                .state()
                .lookup(&request.destination)
                .is_some_and(Node::is_loaded)
        {
            session.refresh(&request.destination).await;
        }
    }

    fn enqueue<S: ListingSource>(
        session: &mut Session<S>,
        actions: impl IntoIterator<Item = Action>,
    ) {
        let dispatcher = session.dispatcher();
        for action in actions {
            if let Err(e) = dispatcher.unbounded_send(action) {
                warn!("Dropping action: {}", e);
            }
        }
        session.drain();
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Cannot open the directory to mirror: {}", path))]
    RootError {
        path: String,
        source: std::io::Error,
    },
    #[snafu(display("{} is not a directory", path))]
    RootNotDirectoryError { path: String },
    #[snafu(display("Listing the mirrored directory failed: {}", message))]
    RootListingError { message: String },
    #[snafu(display("Critical failure encountered while loading the event script"))]
    ScriptError { source: ScriptError },
    #[snafu(display("The event script contains an invalid event"))]
    IntegrationError { source: IntegrationError },
}
