//! Integration tests for the user directory.
//!
//! These tests exercise the repository contract through the public API,
//! including concurrent writers and readers sharing one store.

use std::sync::Arc;

use directory::{
    DirectoryError, InMemoryUserRepository, Role, User, UserId, UserRepository,
    UserRepositoryExt, search,
};

fn seed() -> InMemoryUserRepository {
    InMemoryUserRepository::with_users([
        User::new(1, "Alice", "alice@example.com", Role::Admin),
        User::new(2, "Bob", "bob@example.com", Role::User),
        User::new(3, "Charlie", "charlie@example.com", Role::Moderator),
    ])
    .unwrap()
}

mod repository_contract {
    use super::*;

    #[tokio::test]
    async fn created_user_is_found_by_id() {
        let repo = InMemoryUserRepository::new();
        for id in 1..=20u64 {
            let user = User::new(id, format!("user{id}"), format!("u{id}@example.com"), "user");
            repo.create(user.clone()).await.unwrap();
            assert_eq!(repo.find_by_id(UserId::new(id)).await.unwrap(), user);
        }
    }

    #[tokio::test]
    async fn find_all_counts_only_successful_creates() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new(1, "Alice", "alice@example.com", Role::Admin))
            .await
            .unwrap();
        let _ = repo
            .create(User::new(1, "Again", "again@example.com", Role::User))
            .await;
        repo.create(User::new(2, "Bob", "bob@example.com", Role::User))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), UserId::new(1));
        assert_eq!(all[1].id(), UserId::new(2));
    }

    #[tokio::test]
    async fn lookups_never_fail_on_empty_store() {
        let repo = InMemoryUserRepository::new();
        for id in [0, 1, u64::MAX] {
            assert_eq!(
                repo.find_by_id(UserId::new(id)).await,
                Err(DirectoryError::NotFound(UserId::new(id)))
            );
        }
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}

mod extension_queries {
    use super::*;

    #[tokio::test]
    async fn exists_and_count() {
        let repo = seed();
        assert!(repo.exists(UserId::new(2)).await.unwrap());
        assert!(!repo.exists(UserId::new(9)).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn find_admins_filters_by_role() {
        let repo = seed();
        let admins = repo.find_admins().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].name(), "Alice");
    }

    #[tokio::test]
    async fn find_first_by_predicate() {
        let repo = seed();
        let moderator = repo
            .find_first(|u| *u.role() == Role::Moderator)
            .await
            .unwrap();
        assert_eq!(moderator.map(|u| u.id()), Some(UserId::new(3)));

        let nobody = repo.find_first(|u| u.email().ends_with(".org")).await.unwrap();
        assert!(nobody.is_none());
    }

    #[tokio::test]
    async fn search_over_store_snapshot() {
        let repo = seed();
        let ids: Vec<UserId> = repo.find_all().await.unwrap().iter().map(User::id).collect();
        assert_eq!(search::find(&ids, &UserId::new(3)), Some(2));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_lose_nothing() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let n = 200u64;

        let handles: Vec<_> = (0..n)
            .map(|id| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create(User::new(
                        id,
                        format!("user{id}"),
                        format!("user{id}@example.com"),
                        Role::User,
                    ))
                    .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut ids: Vec<u64> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|u| u.id().as_u64())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..n).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_creates_admit_exactly_one() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(User::new(
                        7,
                        format!("racer{i}"),
                        "racer@example.com",
                        Role::User,
                    ))
                    .await
                })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => accepted += 1,
                Err(e) => assert_eq!(e, DirectoryError::DuplicateId(UserId::new(7))),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_see_consistent_prefixes() {
        let repo = InMemoryUserRepository::new();
        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for id in 0..100u64 {
                    repo.create(User::new(
                        id,
                        format!("user{id}"),
                        format!("user{id}@example.com"),
                        Role::User,
                    ))
                    .await
                    .unwrap();
                }
            })
        };

        for _ in 0..50 {
            let snapshot = repo.find_all().await.unwrap();
            for (position, user) in snapshot.iter().enumerate() {
                assert_eq!(user.id().as_u64(), position as u64);
            }
            tokio::task::yield_now().await;
        }

        writer.await.unwrap();
        assert_eq!(repo.len().await, 100);
    }
}
