//! Event registration mutations.

use crate::api::{endpoints, ApiResult};
use crate::operations::Operations;
use crate::state::model::{NewRegistration, Registration, RegistrationUpdate};
use crate::state::Action;

impl Operations {
    /// Register for an event. Set `user_id` to register someone else.
    pub async fn register(
        &self,
        event_id: &str,
        registration: &NewRegistration,
    ) -> ApiResult<Registration> {
        let result = endpoints::create_registration(self.api(), event_id, registration).await;
        let created = self.settle("register", result)?;
        self.store.dispatch(Action::AddEventRegistration(created.clone()));
        Ok(created)
    }

    /// Change answers, attendance or waiting-list position.
    pub async fn update_registration(
        &self,
        event_id: &str,
        registration_id: &str,
        update: &RegistrationUpdate,
    ) -> ApiResult<Registration> {
        let result =
            endpoints::update_registration(self.api(), event_id, registration_id, update).await;
        let updated = self.settle("update_registration", result)?;

        // Remove and re-add so the event counters follow a waiting-list move
        self.store.dispatch_all(vec![
            Action::DeleteEventRegistration {
                event_id: event_id.to_string(),
                registration_id: registration_id.to_string(),
            },
            Action::AddEventRegistration(updated.clone()),
        ]);
        Ok(updated)
    }

    pub async fn deregister(&self, event_id: &str, registration_id: &str) -> ApiResult<()> {
        let result = endpoints::delete_registration(self.api(), event_id, registration_id).await;
        self.settle("deregister", result)?;
        self.store.dispatch(Action::DeleteEventRegistration {
            event_id: event_id.to_string(),
            registration_id: registration_id.to_string(),
        });
        Ok(())
    }
}
