//! HTTP surface for the local app host.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page request is a navigation: the router's guard decides where the
//! user may go, and a moved navigation becomes an HTTP redirect. Pages that
//! are allowed render as a JSON view model (view name, user, pending toasts);
//! presentation is left to whatever consumes it.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::router::{Location, Navigator, View};
use crate::services::toast::Toast;
use crate::state::session::SessionUser;
use crate::store::LOGIN_FAILED;

/// Upper bound on waiting for a completed sign-in to be processed.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

pub fn app(state: App) -> axum::Router {
    axum::Router::new()
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/auth/logout", post(logout))
        .route("/healthz", get(healthz))
        .route("/", get(page))
        .route("/{*path}", get(page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ViewModel {
    pub view: View,
    pub location: Location,
    pub loading: bool,
    pub user: Option<SessionUser>,
    pub toasts: Vec<Toast>,
}

/// `GET /{path}`: navigate, then redirect or render.
async fn page(State(app): State<App>, uri: Uri) -> Response {
    let requested = uri.path_and_query().map_or("/", |pq| pq.as_str());
    match app.router.push(requested).await {
        Ok(reached) if reached.full_path != requested => Redirect::to(&reached.full_path).into_response(),
        Ok(reached) => {
            let state = app.store.state();
            Json(ViewModel {
                view: reached.route().view,
                loading: state.loading,
                user: state.user().cloned(),
                toasts: app.toasts.drain(),
                location: reached,
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, %requested, "navigation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// `GET /auth/login`: start the provider redirect.
async fn login(State(app): State<App>) -> Redirect {
    match app.store.login().await {
        Some(url) => Redirect::to(&url),
        None => Redirect::to("/"),
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// `GET /auth/callback`: finish sign-in, then go wherever the store sent us.
async fn callback(State(app): State<App>, Query(params): Query<CallbackQuery>) -> Redirect {
    let outcome = match (&params.code, &params.state, &params.error) {
        (Some(code), Some(state), None) => {
            // Held until the listener has handled the new identity.
            app.store.set_auth_loading(true);
            app.identity
                .complete_sign_in(code, state)
                .await
                .map_err(|e| e.to_string())
        }
        (_, _, Some(error)) => Err(format!("provider returned {error}")),
        _ => Err("missing code or state".to_owned()),
    };

    if let Err(reason) = outcome {
        tracing::error!(%reason, "sign-in callback failed");
        app.store.error_toast(LOGIN_FAILED);
        app.store.set_auth_loading(false);
        return Redirect::to("/");
    }

    if tokio::time::timeout(SETTLE_TIMEOUT, app.store.settled()).await.is_err() {
        tracing::warn!("sign-in still processing after timeout");
    }
    Redirect::to(&app.router.current().full_path)
}

/// `POST /auth/logout`
async fn logout(State(app): State<App>) -> Redirect {
    app.store.logout().await;
    Redirect::to("/")
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
