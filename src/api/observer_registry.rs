use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::extensions::{CoordinatorEvent, CoordinatorObserver};
use crate::render::RenderingEngine;

use super::InteractionCoordinator;

impl<E: RenderingEngine> InteractionCoordinator<E> {
    /// Registers an observer with unique identifier.
    pub fn subscribe(&mut self, observer: Box<dyn CoordinatorObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already subscribed"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unsubscribes an observer by id. Returns `true` when removed.
    pub fn unsubscribe(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    pub(super) fn emit(&mut self, event: CoordinatorEvent) {
        trace!(?event, observers = self.observers.len(), "coordinator event");
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}
