//! Committee mutations.

use chrono::Utc;

use crate::api::{endpoints, ApiResult};
use crate::operations::Operations;
use crate::state::model::{Committee, CommitteeContent, CommitteeMember, CommitteeRole, User};
use crate::state::Action;

impl Operations {
    pub async fn create_committee(&self, content: &CommitteeContent) -> ApiResult<Committee> {
        let result = endpoints::create_committee(self.api(), content).await;
        let committee = self.settle("create_committee", result)?;
        self.store.dispatch(Action::AddCommittee(committee.clone()));
        Ok(committee)
    }

    pub async fn update_committee(
        &self,
        committee_id: &str,
        content: &CommitteeContent,
    ) -> ApiResult<Committee> {
        let result = endpoints::update_committee(self.api(), committee_id, content).await;
        let committee = self.settle("update_committee", result)?;
        self.store.dispatch(Action::ReplaceCommittee(committee.clone()));
        Ok(committee)
    }

    pub async fn delete_committee(&self, committee_id: &str) -> ApiResult<()> {
        let result = endpoints::delete_committee(self.api(), committee_id).await;
        self.settle("delete_committee", result)?;
        self.store.dispatch(Action::DeleteCommittee {
            committee_id: committee_id.to_string(),
        });
        Ok(())
    }

    /// Add `user` to a committee as a regular member.
    pub async fn join_committee(&self, committee_id: &str, user: &User) -> ApiResult<()> {
        let result = endpoints::add_committee_member(self.api(), committee_id, &user.id).await;
        self.settle("join_committee", result)?;
        self.store.dispatch(Action::AddCommitteeMember {
            committee_id: committee_id.to_string(),
            member: CommitteeMember {
                user: user.clone(),
                role: CommitteeRole::Member,
            },
            joined: Utc::now(),
        });
        Ok(())
    }

    pub async fn leave_committee(&self, committee_id: &str, user_id: &str) -> ApiResult<()> {
        let result = endpoints::remove_committee_member(self.api(), committee_id, user_id).await;
        self.settle("leave_committee", result)?;
        self.store.dispatch(Action::DeleteCommitteeMember {
            committee_id: committee_id.to_string(),
            user_id: user_id.to_string(),
            left: Utc::now(),
        });
        Ok(())
    }
}
