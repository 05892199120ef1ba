use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// List all users
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Check whether an email is taken, optionally excluding one user
    async fn exists_by_email(&self, email: &str, exclude: Option<Uuid>) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_taken = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email));
        if email_taken {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User::new(input);
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.id);
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }

        if let Some(ref new_email) = input.email {
            let email_taken = users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(new_email));
            if email_taken {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.apply_update(input);
        let updated = user.clone();

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_email(&self, email: &str, exclude: Option<Uuid>) -> UserResult<bool> {
        let users = self.users.read().await;
        let exists = users.values().any(|u| {
            u.email.eq_ignore_ascii_case(email) && exclude.map(|id| u.id != id).unwrap_or(true)
        });
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str, email: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let user = repo
            .create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(user.name, "Alice");

        let fetched = repo.get_by_id(user.id).await.unwrap();
        assert_eq!(fetched.unwrap().email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();

        let result = repo.create(create_input("Bob", "alice@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_own_email() {
        let repo = InMemoryUserRepository::new();

        let user = repo
            .create(create_input("Alice", "alice@example.com"))
            .await
            .unwrap();

        // Re-submitting the same email for the same user is not a conflict
        let updated = repo
            .update(
                user.id,
                UpdateUser {
                    name: Some("Alice B".to_string()),
                    email: Some("alice@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice B");
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let repo = InMemoryUserRepository::new();
        let deleted = repo.delete(Uuid::now_v7()).await.unwrap();
        assert!(!deleted);
    }
}
