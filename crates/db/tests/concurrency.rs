//! Concurrency tests for the relationship store on a deliberately small pool.
//!
//! Verifies that:
//! - Parallel creates finish without exhausting a two-connection pool
//! - Two parallel adds of the same actor yield one link and one conflict
//! - An actor delete racing a link insert never leaves a link to a tombstone

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use cinegrade_core::error::CoreError;
use cinegrade_core::types::DbId;
use cinegrade_db::lookup::PgActorLookup;
use cinegrade_db::models::actor::{Actor, CreateActor};
use cinegrade_db::models::movie::CreateMovie;
use cinegrade_db::models::user::{CreateUser, User};
use cinegrade_db::repositories::{ActorRepo, MovieActorRepo, UserRepo};
use cinegrade_db::StoreError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

const FANOUT: usize = 4;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Two connections, and a short acquire timeout so starvation fails fast
/// instead of hanging the test.
async fn small_pool(pool_opts: PgPoolOptions, connect_opts: PgConnectOptions) -> PgPool {
    pool_opts
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(connect_opts)
        .await
        .unwrap()
}

async fn admin(pool: &PgPool) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: "admin@example.com".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            name: "Ada".to_string(),
            surname: "Admin".to_string(),
            birthday: None,
            is_admin: true,
        },
    )
    .await
    .unwrap()
}

async fn actor(pool: &PgPool, creator: DbId, name: &str) -> Actor {
    ActorRepo::create(
        pool,
        &CreateActor {
            name: name.to_string(),
            surname: "Doe".to_string(),
            birthday: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            picture: None,
            creator_id: creator,
        },
    )
    .await
    .unwrap()
}

fn new_movie(creator: DbId, title: &str) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        director: "Kathryn Bigelow".to_string(),
        release_date: NaiveDate::from_ymd_opt(1987, 10, 2).unwrap(),
        synopsis: None,
        picture: None,
        creator_id: creator,
    }
}

async fn links_between(pool: &PgPool, movie_id: DbId, actor_id: DbId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM movies_actors WHERE movie_id = $1 AND actor_id = $2")
        .bind(movie_id)
        .bind(actor_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_parallel_creates_do_not_starve_small_pool(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    let pool = small_pool(pool_opts, connect_opts).await;
    let admin = admin(&pool).await;
    let mut cast = Vec::new();
    for name in ["A", "B", "C"] {
        cast.push(actor(&pool, admin.id, name).await.id);
    }

    let mut handles = Vec::new();
    for title in ["Near Dark", "Blue Steel", "Point Break"] {
        let pool = pool.clone();
        let cast = cast.clone();
        let input = new_movie(admin.id, title);
        handles.push(tokio::spawn(async move {
            let lookup = PgActorLookup::new(pool.clone());
            MovieActorRepo::create_movie_with_actors(&pool, &input, &cast, &lookup, FANOUT).await
        }));
    }

    for handle in handles {
        let created = handle.await.unwrap().unwrap();
        assert_eq!(
            created.actors.iter().map(|a| a.id).collect::<Vec<_>>(),
            cast
        );
    }

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies_actors")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(total, 9);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parallel_add_of_same_actor_links_once(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    let pool = small_pool(pool_opts, connect_opts).await;
    let admin = admin(&pool).await;
    let lead = actor(&pool, admin.id, "Lead").await;
    let extra = actor(&pool, admin.id, "Extra").await;
    let lookup = PgActorLookup::new(pool.clone());
    let movie = MovieActorRepo::create_movie_with_actors(
        &pool,
        &new_movie(admin.id, "Strange Days"),
        &[lead.id],
        &lookup,
        FANOUT,
    )
    .await
    .unwrap()
    .movie;

    let (movie_id, extra_id) = (movie.id, extra.id);
    let mut handles = Vec::new();
    for _ in 0..2 {
        let pool = pool.clone();
        let lookup = lookup.clone();
        handles.push(tokio::spawn(async move {
            MovieActorRepo::add_actors(&pool, movie_id, &[extra_id], &lookup, FANOUT).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let rejected = outcomes.into_iter().find(Result::is_err).unwrap();
    assert_matches!(rejected, Err(StoreError::Core(CoreError::Conflict(_))));
    assert_eq!(links_between(&pool, movie.id, extra.id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_actor_delete_racing_link_leaves_no_dangling_link(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    let pool = small_pool(pool_opts, connect_opts).await;
    let admin = admin(&pool).await;
    let lead = actor(&pool, admin.id, "Lead").await;
    let doomed = actor(&pool, admin.id, "Doomed").await;
    let lookup = PgActorLookup::new(pool.clone());
    let movie = MovieActorRepo::create_movie_with_actors(
        &pool,
        &new_movie(admin.id, "K-19"),
        &[lead.id],
        &lookup,
        FANOUT,
    )
    .await
    .unwrap()
    .movie;

    let (movie_id, doomed_id) = (movie.id, doomed.id);
    let add = {
        let pool = pool.clone();
        let lookup = lookup.clone();
        tokio::spawn(async move {
            MovieActorRepo::add_actors(&pool, movie_id, &[doomed_id], &lookup, FANOUT).await
        })
    };
    let delete = {
        let pool = pool.clone();
        tokio::spawn(async move { ActorRepo::delete_with_links(&pool, doomed_id).await })
    };

    // Either order is legal; the add may win and then be unlinked, or lose.
    let _ = add.await.unwrap();
    assert!(delete.await.unwrap().unwrap());

    assert_eq!(links_between(&pool, movie.id, doomed.id).await, 0);
    assert_eq!(links_between(&pool, movie.id, lead.id).await, 1);
    assert!(ActorRepo::find_by_id(&pool, doomed.id).await.unwrap().is_none());
}
