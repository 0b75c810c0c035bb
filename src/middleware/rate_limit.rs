use actix_web::{
    Error, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    net::IpAddr,
    rc::Rc,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::handlers::shared::ApiResponse;

pub const LOGIN_MAX_REQUESTS: u32 = 100;
pub const LOGIN_WINDOW_SECONDS: i64 = 15 * 60;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_seconds: i64,
    pub message: String,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            max_requests,
            window_seconds,
            message: "Too many requests, please try again later.".to_string(),
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

/// Fixed window: the count resets once the window since the first hit elapses.
#[derive(Debug, Clone)]
struct Window {
    count: u32,
    started_at: DateTime<Utc>,
}

impl Window {
    fn open(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            started_at: now,
        }
    }

    fn is_expired(&self, window_seconds: i64, now: DateTime<Utc>) -> bool {
        now >= self.started_at + Duration::seconds(window_seconds)
    }
}

/// Per-client request counters shared across workers.
#[derive(Clone, Default)]
pub struct RateLimitStore {
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<IpAddr, Window>> {
        // A poisoned map only holds counters; keep serving with it.
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a hit for `ip` and reports whether it is still within budget.
    pub fn hit(&self, ip: IpAddr, config: &RateLimitConfig, now: DateTime<Utc>) -> bool {
        let mut windows = self.lock();

        match windows.get_mut(&ip) {
            Some(window) if !window.is_expired(config.window_seconds, now) => {
                if window.count >= config.max_requests {
                    false
                } else {
                    window.count += 1;
                    true
                }
            }
            _ => {
                windows.insert(ip, Window::open(now));
                true
            }
        }
    }

    pub fn cleanup_expired(&self, window_seconds: i64) {
        let now = Utc::now();
        self.lock()
            .retain(|_, window| !window.is_expired(window_seconds, now));
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.lock().len()
    }
}

/// Rejects requests over budget with 429 and the standard envelope.
pub struct RateLimitMiddleware {
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl RateLimitMiddleware {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, RateLimitStore::new())
    }

    pub fn with_store(config: RateLimitConfig, store: RateLimitStore) -> Self {
        Self { store, config }
    }

    /// Budget for the user and admin login endpoints.
    pub fn login(store: RateLimitStore) -> Self {
        Self::with_store(
            RateLimitConfig::new(LOGIN_MAX_REQUESTS, LOGIN_WINDOW_SECONDS)
                .with_message("Too many login attempts, please try again after 15 minutes."),
            store,
        )
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = futures_util::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        futures_util::future::ready(Ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let client_ip = req.peer_addr().map(|addr| addr.ip()).or_else(|| {
                req.connection_info()
                    .realip_remote_addr()
                    .and_then(|addr| addr.parse::<IpAddr>().ok())
            });

            if let Some(ip) = client_ip {
                if !store.hit(ip, &config, Utc::now()) {
                    log::warn!("Rate limit exceeded for IP: {} on {}", ip, req.path());
                    let response = HttpResponse::TooManyRequests()
                        .json(ApiResponse::<()>::error(&config.message));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Periodically drops windows that have run out.
pub async fn cleanup_rate_limits(store: RateLimitStore, interval_seconds: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        store.cleanup_expired(LOGIN_WINDOW_SECONDS);
        log::debug!("Cleaned up expired rate limit windows");
    }
}
