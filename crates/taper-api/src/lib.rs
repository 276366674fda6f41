//! JSON REST API for TaperCommunity.
//!
//! Exposes an axum [`Router`] backed by any [`taper_core::store::CommunityStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; user
//! identity arrives as explicit UUIDs in paths and bodies.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", taper_api::api_router(store.clone()))
//! ```

pub mod analytics;
pub mod entries;
pub mod error;
pub mod forum;
pub mod profiles;
pub mod votes;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use taper_core::{cache::ReadThroughCache, forum::Thread, store::CommunityStore};

pub use error::ApiError;

/// Key under which the full thread listing is cached.
pub(crate) const THREAD_LIST: &str = "threads";

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  /// Thread listing; invalidated whenever a thread or its score changes.
  pub threads: ReadThroughCache<&'static str, Vec<Thread>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), threads: self.threads.clone() }
  }
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store, threads: ReadThroughCache::new() } }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CommunityStore + Send + Sync + 'static,
{
  Router::new()
    // Journal
    .route("/users/{user_id}/entries", get(entries::list::<S>).post(entries::create::<S>))
    .route("/entries/public", get(entries::public::<S>))
    .route(
      "/entries/{id}",
      get(entries::get_one::<S>)
        .put(entries::update::<S>)
        .delete(entries::delete::<S>),
    )
    // Profiles
    .route("/users/{user_id}/profile", get(profiles::get_one::<S>).put(profiles::put::<S>))
    // Analytics
    .route("/users/{user_id}/dashboard", get(analytics::dashboard::<S>))
    .route("/users/{user_id}/milestones", get(analytics::milestones::<S>))
    .route("/users/{user_id}/milestones/{rule}/share", get(analytics::share::<S>))
    .route("/schedule", post(analytics::schedule))
    // Forum
    .route("/threads", get(forum::list_threads::<S>).post(forum::create_thread::<S>))
    .route("/threads/{id}", get(forum::get_thread::<S>))
    .route(
      "/threads/{id}/replies",
      get(forum::list_replies::<S>).post(forum::create_reply::<S>),
    )
    // Votes
    .route("/threads/{id}/vote", post(votes::thread_vote::<S>))
    .route("/threads/{id}/recount", post(votes::thread_recount::<S>))
    .route("/replies/{id}/vote", post(votes::reply_vote::<S>))
    .route("/replies/{id}/helpful", post(votes::helpful::<S>))
    .route("/replies/{id}/recount", post(votes::reply_recount::<S>))
    .with_state(AppState::new(store))
}

// ─── Integration tests ────────────────────────────────────────────────────────
