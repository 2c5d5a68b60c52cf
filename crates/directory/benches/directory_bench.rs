use criterion::{Criterion, criterion_group, criterion_main};
use directory::{InMemoryUserRepository, Role, User, UserId, UserRepository, search};

fn make_user(id: u64) -> User {
    User::new(
        id,
        format!("user{id}"),
        format!("user{id}@example.com"),
        Role::User,
    )
}

fn bench_create_single_user(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("directory/create_single_user", |b| {
        b.iter(|| {
            rt.block_on(async {
                let repo = InMemoryUserRepository::new();
                repo.create(make_user(1)).await.unwrap();
            });
        });
    });
}

fn bench_find_by_id_last_of_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryUserRepository::with_users((0..1000).map(make_user)).unwrap();

    c.bench_function("directory/find_by_id_last_of_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                repo.find_by_id(UserId::new(999)).await.unwrap();
            });
        });
    });
}

fn bench_find_all_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = InMemoryUserRepository::with_users((0..1000).map(make_user)).unwrap();

    c.bench_function("directory/find_all_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                let users = repo.find_all().await.unwrap();
                assert_eq!(users.len(), 1000);
            });
        });
    });
}

fn bench_search_ints(c: &mut Criterion) {
    let values: Vec<u32> = (0..10_000).collect();

    c.bench_function("search/find_last_of_10000", |b| {
        b.iter(|| search::find(&values, &9_999));
    });
}

criterion_group!(
    benches,
    bench_create_single_user,
    bench_find_by_id_last_of_1000,
    bench_find_all_1000,
    bench_search_ints,
);
criterion_main!(benches);
