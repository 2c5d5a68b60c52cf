//! Local-first user resolution with remote fallback.

use common::UserId;
use directory::{DirectoryError, User, UserRepository};
use fetcher::UserSource;
use tokio::time::Instant;

use crate::error::ResolveError;
use crate::guard::guarded_async;

/// Resolves users from a repository, fetching misses from a remote source.
///
/// A fetched user is stored in the repository so later lookups stay local.
pub struct Resolver<R, S>
where
    R: UserRepository,
    S: UserSource,
{
    repository: R,
    source: S,
}

impl<R, S> Resolver<R, S>
where
    R: UserRepository,
    S: UserSource,
{
    pub fn new(repository: R, source: S) -> Self {
        Self { repository, source }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the user with `id`, fetching it if the repository lacks it.
    ///
    /// The fetch runs behind the recovery boundary, so a source that panics
    /// yields [`ResolveError::Recovered`].
    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn resolve(&self, id: UserId, deadline: Option<Instant>) -> Result<User, ResolveError> {
        match self.repository.find_by_id(id).await {
            Ok(user) => return Ok(user),
            Err(DirectoryError::NotFound(_)) => {
                tracing::debug!("not stored locally, fetching");
            }
            Err(e) => return Err(e.into()),
        }

        let user = guarded_async(self.source.fetch_user(id, deadline)).await??;
        if user.id() != id {
            return Err(ResolveError::IdMismatch {
                requested: id,
                received: user.id(),
            });
        }

        match self.repository.create(user.clone()).await {
            Ok(()) => Ok(user),
            // Another caller cached it first; theirs is the stored copy.
            Err(DirectoryError::DuplicateId(_)) => Ok(self.repository.find_by_id(id).await?),
            Err(e) => Err(e.into()),
        }
    }
}
