use std::cell::Cell;

use tracing::{debug, info};

use crate::drop_target::{
    DragSource, FlatTreeItem, FlatTreeLookup, MoveHandler, MoveRequest, TargetResolver, plan_move,
};

/// Identifies one drop; only the most recent ticket may complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved(MoveRequest),
    /// A newer drop started while this one was resolving its target
    Superseded,
}

/// Runs drops in two steps: the asynchronous target resolution, then a
/// synchronous plan handed to the move collaborator.
pub struct DropController<R, M> {
    resolver: R,
    mover: M,
    generation: Cell<u64>,
}

impl<R, M: MoveHandler> DropController<R, M> {
    pub fn new(resolver: R, mover: M) -> Self {
        Self {
            resolver,
            mover,
            generation: Cell::new(0),
        }
    }

    pub fn mover(&self) -> &M {
        &self.mover
    }

    /// Starts a drop, invalidating every ticket handed out before
    pub fn begin(&self) -> DropTicket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        DropTicket(next)
    }

    pub async fn on_drop<E, L>(
        &self,
        event: &E,
        source: &DragSource,
        lookup: &L,
    ) -> Result<DropOutcome, M::Error>
    where
        R: TargetResolver<E>,
        L: FlatTreeLookup,
    {
        let ticket = self.begin();
        let target = self.resolver.resolve(event).await;
        self.complete(ticket, target, source, lookup).await
    }

    /// Finishes a drop whose target has been resolved
    pub async fn complete<L: FlatTreeLookup>(
        &self,
        ticket: DropTicket,
        target: Option<FlatTreeItem>,
        source: &DragSource,
        lookup: &L,
    ) -> Result<DropOutcome, M::Error> {
        if ticket.0 != self.generation.get() {
            debug!("Discarding drop of '{}': superseded", source.path);
            return Ok(DropOutcome::Superseded);
        }

        let request = plan_move(source, target, lookup);
        info!(
            "Moving {} '{}' into '{}'",
            request.kind, request.source, request.destination
        );
        request.apply(&self.mover).await?;
        Ok(DropOutcome::Moved(request))
    }
}
