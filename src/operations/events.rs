//! Event mutations.

use crate::api::{endpoints, ApiResult};
use crate::operations::Operations;
use crate::state::model::{Event, EventContent};
use crate::state::Action;

impl Operations {
    pub async fn create_event(&self, content: &EventContent) -> ApiResult<Event> {
        let event = self.settle("create_event", endpoints::create_event(self.api(), content).await)?;
        self.store.dispatch(Action::AddEvent(event.clone()));
        Ok(event)
    }

    pub async fn update_event(&self, event_id: &str, content: &EventContent) -> ApiResult<Event> {
        let result = endpoints::update_event(self.api(), event_id, content).await;
        let event = self.settle("update_event", result)?;
        self.store.dispatch(Action::ReplaceEvent(event.clone()));
        Ok(event)
    }

    pub async fn delete_event(&self, event_id: &str) -> ApiResult<()> {
        self.settle("delete_event", endpoints::delete_event(self.api(), event_id).await)?;
        self.store.dispatch(Action::DeleteEvent {
            event_id: event_id.to_string(),
        });
        Ok(())
    }
}
