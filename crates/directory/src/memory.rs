use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    DirectoryError, Result, User, UserId, search,
    store::{UserRepository, validate_user_for_create},
};

/// In-memory user repository.
///
/// Users live in a single insertion-ordered `Vec` behind an `RwLock`: reads
/// share the lock and copy out, `create` takes it exclusively, so every
/// operation is linearizable. Clones share the same backing store.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with `users`, in order.
    ///
    /// Seeds go through the same validation and uniqueness checks as
    /// [`UserRepository::create`].
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Result<Self> {
        let mut seeded: Vec<User> = Vec::new();
        for user in users {
            check_insertable(&seeded, &user)?;
            seeded.push(user);
        }
        Ok(Self {
            users: Arc::new(RwLock::new(seeded)),
        })
    }

    /// Returns the number of users stored.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Returns true if no users are stored.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn check_insertable(existing: &[User], user: &User) -> Result<()> {
    validate_user_for_create(user).map_err(|e| DirectoryError::InvalidUser {
        id: user.id(),
        reason: e.message,
    })?;

    if search::find_by(existing, |u| u.id() == user.id()).is_some() {
        return Err(DirectoryError::DuplicateId(user.id()));
    }

    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<User> {
        let users = self.users.read().await;
        search::find_by(users.as_slice(), |u| u.id() == id)
            .map(|index| users[index].clone())
            .ok_or(DirectoryError::NotFound(id))
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id()))]
    async fn create(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;

        if let Err(e) = check_insertable(&users, &user) {
            tracing::debug!(error = %e, "rejected user");
            return Err(e);
        }

        users.push(user);
        metrics::counter!("directory_users_created_total").increment(1);

        Ok(())
    }
}
