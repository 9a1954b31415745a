//! Users service.

use std::sync::Arc;

use async_trait::async_trait;
use cadence::checkout::CustomerIdentity;
use mockall::automock;
use serde_json::json;
use tracing::debug;

use crate::{
    domain::users::{
        errors::UsersError,
        records::{UserRecord, UserRole},
    },
    identity::Identity,
    store::{
        Direction, Filter, RecordId, RecordStore, Stored,
        records::{create, fetch_all, patch},
    },
};

#[derive(Clone)]
pub struct RecordUsersService {
    store: Arc<dyn RecordStore>,
}

impl RecordUsersService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for RecordUsersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordUsersService").finish_non_exhaustive()
    }
}

#[async_trait]
impl UsersService for RecordUsersService {
    async fn list_users(&self) -> Result<Vec<Stored<UserRecord>>, UsersError> {
        let filter = Filter::all().order_by("email", Direction::Ascending);

        Ok(fetch_all(self.store.as_ref(), &filter).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Stored<UserRecord>>, UsersError> {
        let users = fetch_all(self.store.as_ref(), &Filter::eq("email", email.trim())).await?;

        Ok(users.into_iter().next())
    }

    async fn create_user(&self, user: UserRecord) -> Result<Stored<UserRecord>, UsersError> {
        Ok(create(self.store.as_ref(), &user).await?)
    }

    async fn update_role(
        &self,
        user: RecordId,
        role: UserRole,
    ) -> Result<Stored<UserRecord>, UsersError> {
        Ok(patch(self.store.as_ref(), user, json!({ "role": role })).await?)
    }

    async fn customer_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<CustomerIdentity>, UsersError> {
        let Some(user) = self.find_by_email(&identity.email).await? else {
            debug!(email = %identity.email, "no user row for signed-in identity");

            return Ok(None);
        };

        Ok(user.customer_identity())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Retrieves all users, by email.
    async fn list_users(&self) -> Result<Vec<Stored<UserRecord>>, UsersError>;

    /// Looks up the application user row for an email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Stored<UserRecord>>, UsersError>;

    /// Creates a user.
    async fn create_user(&self, user: UserRecord) -> Result<Stored<UserRecord>, UsersError>;

    /// Changes a user's back-office role.
    async fn update_role(
        &self,
        user: RecordId,
        role: UserRole,
    ) -> Result<Stored<UserRecord>, UsersError>;

    /// Checkout contact details for a signed-in identity.
    ///
    /// `None` when no user row exists or its profile lacks a name or phone;
    /// the customer then fills in the full checkout form.
    async fn customer_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<CustomerIdentity>, UsersError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::store::InMemoryRecordStore;

    use super::*;

    fn service() -> RecordUsersService {
        RecordUsersService::new(Arc::new(InMemoryRecordStore::new()))
    }

    fn ana(phone: Option<&str>) -> UserRecord {
        UserRecord {
            email: "ana@example.com".to_string(),
            name: Some("Ana Vera".to_string()),
            phone: phone.map(str::to_string),
            role: UserRole::Customer,
        }
    }

    #[tokio::test]
    async fn customer_identity_for_complete_profile() -> TestResult {
        let users = service();

        users.create_user(ana(Some("0991234567"))).await?;

        let identity = users
            .customer_identity(&Identity {
                email: "ana@example.com".to_string(),
            })
            .await?;

        assert_eq!(identity.map(|identity| identity.name), Some("Ana Vera".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn customer_identity_without_user_row_is_none() -> TestResult {
        let identity = service()
            .customer_identity(&Identity {
                email: "nobody@example.com".to_string(),
            })
            .await?;

        assert_eq!(identity, None);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let users = service();

        users.create_user(ana(None)).await?;

        let result = users.create_user(ana(None)).await;

        assert!(
            matches!(result, Err(UsersError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_role_promotes_user() -> TestResult {
        let users = service();
        let created = users.create_user(ana(None)).await?;

        let updated = users.update_role(created.id, UserRole::Staff).await?;

        assert_eq!(updated.role, UserRole::Staff);
        assert_eq!(users.list_users().await?.len(), 1);

        Ok(())
    }
}
