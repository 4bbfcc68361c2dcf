//! Rate limiting middleware.
//!
//! Per-user request budgets enforced with `governor`.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::user_auth::UserAuth;

type UserRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across all requests, one limiter per user.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<Uuid, Arc<UserRateLimiter>>>,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
        }
    }

    fn get_or_create_limiter(&self, user_id: Uuid) -> Arc<UserRateLimiter> {
        {
            let limiters = self.limiters.read().unwrap();
            if let Some(limiter) = limiters.get(&user_id) {
                return limiter.clone();
            }
        }

        let mut limiters = self.limiters.write().unwrap();

        // Another thread may have created it between the locks
        if let Some(limiter) = limiters.get(&user_id) {
            return limiter.clone();
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(100).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(user_id, limiter.clone());
        limiter
    }

    /// Check whether a request from the given user should be allowed.
    /// Returns `Err(retry_after_secs)` when the budget is exhausted.
    pub fn check(&self, user_id: Uuid) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(user_id);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                Err(wait_time.as_secs().max(1))
            }
        }
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.limiters.read().unwrap().len())
            .finish()
    }
}

/// Middleware that applies per-user rate limiting.
///
/// Must run AFTER authentication so the user ID is available in request
/// extensions; unauthenticated requests pass through to fail auth instead.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let auth = match req.extensions().get::<UserAuth>() {
        Some(auth) => auth.clone(),
        None => return next.run(req).await,
    };

    if let Some(ref rate_limiter) = state.rate_limiter {
        if let Err(retry_after) = rate_limiter.check(auth.user_id) {
            return rate_limited_response(state.config.security.rate_limit_per_minute, retry_after);
        }
    }

    next.run(req).await
}

fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    if let Ok(value) = retry_after.to_string().parse() {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_within_limit_allowed() {
        let state = RateLimiterState::new(5);
        let user = Uuid::new_v4();

        for i in 0..5 {
            assert!(state.check(user).is_ok(), "Request {} should be allowed", i);
        }
        assert!(state.check(user).is_err());
    }

    #[test]
    fn test_limits_are_per_user() {
        let state = RateLimiterState::new(1);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(state.check(alice).is_ok());
        assert!(state.check(bob).is_ok());
        assert!(state.check(alice).is_err());
        assert!(state.check(bob).is_err());
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let state = RateLimiterState::new(1);
        let user = Uuid::new_v4();
        state.check(user).unwrap();

        let retry_after = state.check(user).unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn test_limiter_reused_for_same_user() {
        let state = RateLimiterState::new(100);
        let user = Uuid::new_v4();

        let first = state.get_or_create_limiter(user);
        let second = state.get_or_create_limiter(user);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_rate_limited_response_format() {
        let response = rate_limited_response(100, 60);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    }

    #[test]
    fn test_debug_reports_active_limiters() {
        let state = RateLimiterState::new(10);
        state.check(Uuid::new_v4()).unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("active_limiters"));
    }
}
