//! Users service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::users::{
    data::NewUser,
    errors::UsersServiceError,
    records::{UserRecord, UserUuid},
    repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        self.repository.create_user(user).await.map_err(Into::into)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        self.repository.get_user(user).await.map_err(Into::into)
    }
}

#[automock]
#[async_trait]
/// User persistence operations.
pub trait UsersService: Send + Sync {
    /// Creates a new user.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a user that has not been deleted.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_user_returns_uuid_and_name() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());
        let uuid = UserUuid::new();
        let before = Timestamp::now();

        let user = svc
            .create_user(NewUser {
                uuid,
                name: "Ravi Farms".to_string(),
            })
            .await?;

        assert_eq!(user.uuid, uuid);
        assert_eq!(user.name, "Ravi Farms");
        assert!(user.created_at >= before);
        assert!(user.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_user_returns_created_user() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());
        let uuid = ctx.create_user("Meena").await;

        let user = svc.get_user(uuid).await?;

        assert_eq!(user.name, "Meena");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());
        let uuid = UserUuid::new();

        svc.create_user(NewUser {
            uuid,
            name: "First".to_string(),
        })
        .await?;

        let result = svc
            .create_user(NewUser {
                uuid,
                name: "Second".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_name_is_invalid() {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());

        let result = svc
            .create_user(NewUser {
                uuid: UserUuid::new(),
                name: "   ".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let ctx = TestContext::new().await;
        let svc = PgUsersService::new(ctx.db.pool().clone());

        let result = svc.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
