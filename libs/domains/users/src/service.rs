use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer handling user business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self.repository.exists_by_email(&input.email, None).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        self.repository.create(input).await
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if let Some(ref email) = input.email {
            if self.repository.exists_by_email(email, Some(id)).await? {
                return Err(UserError::DuplicateEmail(email.clone()));
            }
        }

        self.repository.update(id, input).await
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Check whether a user exists without loading the full record
    pub async fn user_exists(&self, id: Uuid) -> UserResult<bool> {
        Ok(self.repository.get_by_id(id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;

    #[tokio::test]
    async fn test_create_user_success() {
        let mut mock = MockUserRepository::new();
        mock.expect_exists_by_email().returning(|_, _| Ok(false));
        mock.expect_create().returning(|input| Ok(User::new(input)));

        let service = UserService::new(Arc::new(mock));
        let user = service
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.name, "Alice");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut mock = MockUserRepository::new();
        mock.expect_exists_by_email().returning(|_, _| Ok(true));

        let service = UserService::new(Arc::new(mock));
        let result = service
            .create_user(CreateUser {
                name: "Bob".to_string(),
                email: "alice@example.com".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let mock = MockUserRepository::new();

        let service = UserService::new(Arc::new(mock));
        let result = service
            .create_user(CreateUser {
                name: "Bob".to_string(),
                email: "not-an-email".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(mock));
        let result = service.get_user(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_email_conflict() {
        let mut mock = MockUserRepository::new();
        mock.expect_exists_by_email().returning(|_, _| Ok(true));

        let service = UserService::new(Arc::new(mock));
        let result = service
            .update_user(
                Uuid::now_v7(),
                UpdateUser {
                    name: None,
                    email: Some("taken@example.com".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let service = UserService::new(Arc::new(mock));
        let result = service.delete_user(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_success() {
        let mut mock = MockUserRepository::new();
        mock.expect_delete().returning(|_| Ok(true));

        let service = UserService::new(Arc::new(mock));
        assert!(service.delete_user(Uuid::now_v7()).await.is_ok());
    }
}
