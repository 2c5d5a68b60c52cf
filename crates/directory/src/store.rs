use async_trait::async_trait;

use crate::{DirectoryError, Result, User, UserId};

/// Core trait for user repositories.
///
/// Implementations must be thread-safe (Send + Sync) and every operation
/// must appear atomic with respect to the others on the same instance.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by id.
    ///
    /// Scans in insertion order; the first match wins. Returns
    /// [`DirectoryError::NotFound`] when no user has this id.
    async fn find_by_id(&self, id: UserId) -> Result<User>;

    /// Returns a copy of every stored user, in insertion order.
    async fn find_all(&self) -> Result<Vec<User>>;

    /// Appends a user to the store.
    ///
    /// Fails with [`DirectoryError::DuplicateId`] if the id is taken, or
    /// [`DirectoryError::InvalidUser`] if the record fails validation.
    async fn create(&self, user: User) -> Result<()>;
}

/// Extension trait providing convenience queries for repositories.
#[async_trait]
pub trait UserRepositoryExt: UserRepository {
    /// Checks whether a user with this id is stored.
    async fn exists(&self, id: UserId) -> Result<bool> {
        match self.find_by_id(id).await {
            Ok(_) => Ok(true),
            Err(DirectoryError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns the number of stored users.
    async fn count(&self) -> Result<usize> {
        Ok(self.find_all().await?.len())
    }

    /// Returns every admin, in insertion order.
    async fn find_admins(&self) -> Result<Vec<User>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(User::is_admin)
            .collect())
    }

    /// Returns the first user matching `predicate`, if any.
    async fn find_first<P>(&self, predicate: P) -> Result<Option<User>>
    where
        P: Fn(&User) -> bool + Send + Sync,
    {
        Ok(self.find_all().await?.into_iter().find(|u| predicate(u)))
    }
}

// Blanket implementation for all UserRepository implementations
impl<T: UserRepository + ?Sized> UserRepositoryExt for T {}

/// Error returned when a user record is not fit to be stored.
#[derive(Debug, Clone)]
pub struct UserValidationError {
    pub message: String,
}

impl std::fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User validation error: {}", self.message)
    }
}

impl std::error::Error for UserValidationError {}

/// Validates a user before it is stored.
pub fn validate_user_for_create(user: &User) -> std::result::Result<(), UserValidationError> {
    if user.name().trim().is_empty() {
        return Err(UserValidationError {
            message: "name must not be blank".to_string(),
        });
    }

    if !user.email().contains('@') {
        return Err(UserValidationError {
            message: format!("email '{}' is missing '@'", user.email()),
        });
    }

    Ok(())
}
