//! Account and session mutations.

use std::sync::Arc;

use crate::api::{endpoints, ApiError, ApiResult};
use crate::operations::Operations;
use crate::state::model::{Credentials, SignupForm, User};
use crate::state::{Action, Resource};

impl Operations {
    /// Create an account. The member directory is refetched on next visit.
    pub async fn signup(&self, form: &SignupForm) -> ApiResult<()> {
        self.settle("signup", endpoints::signup(self.api(), form).await)?;
        self.store.dispatch(Action::Invalidate(Resource::Users));
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> ApiResult<()> {
        self.settle("delete_user", endpoints::delete_user(self.api(), user_id).await)?;
        self.store.dispatch(Action::DeleteUser {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Log in and load the session user.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        let result = match endpoints::login(self.api(), credentials).await {
            Ok(()) => endpoints::whoami(self.api()).await.and_then(|user| {
                user.ok_or_else(|| ApiError::new("Unauthorized", 401, "URL: /whoami"))
            }),
            Err(e) => Err(e),
        };

        let user = self.settle("login", result)?;
        self.store.dispatch_all(vec![
            Action::SetError(None),
            Action::Login(Arc::new(user.clone())),
        ]);
        Ok(user)
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.settle("logout", endpoints::logout(self.api()).await)?;
        self.store.dispatch(Action::Logout);
        Ok(())
    }
}
