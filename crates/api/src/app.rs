use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use domain::services::{PushNotifier, SmsSender};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{
    auth, content, event_payments, events, guests, health, media, member_fees, member_payments,
    notifications, reminders, reviews, startup_candidates, users,
};
use crate::services::{CookieHelper, MediaStore};

/// Headroom for multipart boundaries and text parts on top of the largest
/// accepted file.
const MULTIPART_SLACK_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieHelper,
    pub sms: Arc<dyn SmsSender>,
    pub push: Arc<dyn PushNotifier>,
    pub media: MediaStore,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

#[derive(Debug, Error)]
pub enum AppBuildError {
    #[error("invalid session token settings: {0}")]
    Jwt(#[from] JwtError),
}

/// Builds the router around the given delivery collaborators. Tests pass
/// mocks here to observe sent codes and pushes.
pub fn create_app_with_collaborators(
    config: Config,
    pool: PgPool,
    sms: Arc<dyn SmsSender>,
    push: Arc<dyn PushNotifier>,
) -> Result<Router, AppBuildError> {
    let config = Arc::new(config);
    let (state, _) = build_state(config, pool, sms, push)?;
    Ok(router(state))
}

/// Assembles shared state. The limiter is also returned so the caller can
/// hand it to the sweep job.
pub fn build_state(
    config: Arc<Config>,
    pool: PgPool,
    sms: Arc<dyn SmsSender>,
    push: Arc<dyn PushNotifier>,
) -> Result<(AppState, Option<Arc<RateLimiterState>>), AppBuildError> {
    let jwt = JwtConfig::new(
        &config.jwt.secret,
        config.jwt.token_expiry_secs,
        config.jwt.leeway_secs,
    )?;
    let cookies = CookieHelper::new(config.cookie.clone(), config.jwt.token_expiry_secs);
    let media = MediaStore::new(&config.media);

    // None when rate_limit_per_hour is 0
    let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_hour).map(|limiter| {
        Arc::new(limiter.with_trusted_proxies(config.security.trusted_proxies.clone()))
    });

    let state = AppState {
        pool,
        config,
        jwt: Arc::new(jwt),
        cookies,
        sms,
        push,
        media,
        rate_limiter: rate_limiter.clone(),
    };
    Ok((state, rate_limiter))
}

/// Routes and global middleware over prepared state.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/send-otp", post(auth::send_otp))
        .route("/api/v1/auth/verify-otp", post(auth::verify_otp))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me));

    let user_routes = Router::new()
        .route("/api/v1/users", get(users::list_users))
        .route(
            "/api/v1/users/me/push-tokens",
            post(users::register_push_token),
        )
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/users/:id/participation",
            get(users::get_participation),
        );

    let event_routes = Router::new()
        .route(
            "/api/v1/events",
            post(events::create_event).get(events::list_events),
        )
        .route(
            "/api/v1/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/v1/events/:id/details",
            put(events::update_event_details),
        );

    let payment_routes = Router::new()
        .route(
            "/api/v1/event-payments",
            post(event_payments::create_event_payment),
        )
        .route(
            "/api/v1/event-payments/user/:user_id",
            get(event_payments::list_for_user),
        )
        .route(
            "/api/v1/event-payments/event/:event_id",
            get(event_payments::list_for_event),
        )
        .route(
            "/api/v1/event-payments/:id/revoke",
            post(event_payments::revoke),
        )
        .route(
            "/api/v1/member-payments",
            post(member_payments::create_member_payment),
        )
        .route(
            "/api/v1/member-payments/user/:user_id",
            get(member_payments::list_for_user),
        )
        .route(
            "/api/v1/member-payments/check-membership/:user_id",
            get(member_payments::check_membership),
        )
        .route(
            "/api/v1/member-fees",
            post(member_fees::create_member_fee).get(member_fees::list_member_fees),
        )
        .route(
            "/api/v1/member-fees/:id",
            delete(member_fees::delete_member_fee),
        );

    let collection_routes = Router::new()
        .route("/api/v1/guests", post(guests::create_guest))
        .route(
            "/api/v1/guests/event/:event_id",
            get(guests::list_for_event),
        )
        .route(
            "/api/v1/guests/:id",
            delete(guests::delete_guest),
        )
        .route("/api/v1/reviews", post(reviews::create_review))
        .route(
            "/api/v1/reviews/event/:event_id",
            get(reviews::list_for_event),
        )
        .route(
            "/api/v1/reviews/:id",
            delete(reviews::delete_review),
        )
        .route(
            "/api/v1/reminders",
            post(reminders::create_reminder).get(reminders::list_reminders),
        )
        .route(
            "/api/v1/reminders/:id",
            delete(reminders::delete_reminder),
        )
        .route(
            "/api/v1/startup-candidates",
            post(startup_candidates::create_candidate).get(startup_candidates::list_candidates),
        )
        .route(
            "/api/v1/startup-candidates/:id",
            get(startup_candidates::get_candidate).delete(startup_candidates::delete_candidate),
        )
        .route(
            "/api/v1/tips",
            post(content::create_tip).get(content::list_tips),
        )
        .route(
            "/api/v1/tips/:id",
            delete(content::delete_tip),
        )
        .route(
            "/api/v1/video-lessons",
            post(content::create_video_lesson).get(content::list_video_lessons),
        )
        .route(
            "/api/v1/video-lessons/:id",
            delete(content::delete_video_lesson),
        )
        .route(
            "/api/v1/notifications/broadcast",
            post(notifications::broadcast),
        );

    // Uploads carry their own per-kind size checks in MediaStore
    let upload_limit = config
        .server
        .max_body_size
        .max(config.media.max_video_bytes + MULTIPART_SLACK_BYTES);
    let media_routes = Router::new()
        .route("/api/v1/media/images", post(media::upload_image))
        .route("/api/v1/media/videos", post(media::upload_video))
        .layer(DefaultBodyLimit::max(upload_limit));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .nest_service("/media", ServeDir::new(state.media.root()));

    // Event creation accepts a multipart banner alongside the JSON shape
    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(payment_routes)
        .merge(collection_routes)
        .merge(event_routes.layer(DefaultBodyLimit::max(
            config
                .server
                .max_body_size
                .max(config.media.max_image_bytes + MULTIPART_SLACK_BYTES),
        )))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(media_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        )))
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .with_state(state)
}
