use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use super::domain::{Decision, Principal, RequestId, RequestStatus};
use super::form::VendorRequestDraft;
use super::repository::{RepositoryError, RequestRepository, UserDirectory, VendorRepository};
use super::service::{OnboardingError, ResolutionError, VendorOnboardingService};

/// Header carrying the authenticated user id, set by the fronting identity proxy.
pub const USER_HEADER: &str = "x-user-id";

type SharedService<R, V, U> = Arc<VendorOnboardingService<R, V, U>>;

/// Router builder exposing intake, review, and catalog endpoints.
pub fn onboarding_router<R, V, U>(service: SharedService<R, V, U>) -> Router
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/vendor-requests",
            post(submit_handler::<R, V, U>).get(list_handler::<R, V, U>),
        )
        .route(
            "/api/v1/vendor-requests/mine",
            get(list_mine_handler::<R, V, U>),
        )
        .route(
            "/api/v1/vendor-requests/:request_id",
            get(request_handler::<R, V, U>),
        )
        .route(
            "/api/v1/vendor-requests/:request_id/review",
            post(start_review_handler::<R, V, U>),
        )
        .route(
            "/api/v1/vendor-requests/:request_id/decision",
            post(decision_handler::<R, V, U>),
        )
        .route("/api/v1/vendors", get(vendors_handler::<R, V, U>))
        .route("/api/v1/vat-lookup", get(vat_lookup_handler::<R, V, U>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VatQuery {
    vat: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DecisionBody {
    decision: Decision,
    #[serde(default)]
    decision_notes: Option<String>,
}

pub(crate) fn principal_from(headers: &HeaderMap) -> Result<Principal, ResolutionError> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Principal::new)
        .ok_or(ResolutionError::MissingPrincipal)
}

pub(crate) async fn submit_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<VendorRequestDraft>,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| service.submit(&principal, draft));
    match result {
        Ok(request) => (StatusCode::CREATED, axum::Json(request)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let status = match query.status.as_deref().map(str::parse::<RequestStatus>) {
        Some(Ok(status)) => Some(status),
        Some(Err(err)) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
        None => None,
    };

    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| match status {
            Some(status) => service.list_by_status(&principal, status),
            None => service.list_all(&principal),
        });
    match result {
        Ok(requests) => (StatusCode::OK, axum::Json(requests)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_mine_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| service.list_mine(&principal));
    match result {
        Ok(requests) => (StatusCode::OK, axum::Json(requests)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn request_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
    Path(request_id): Path<String>,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let id = RequestId(request_id);
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| service.get(&principal, &id));
    match result {
        Ok(request) => (StatusCode::OK, axum::Json(request)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_review_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
    Path(request_id): Path<String>,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let id = RequestId(request_id);
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| service.start_review(&principal, &id));
    match result {
        Ok(request) => (StatusCode::OK, axum::Json(request)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn decision_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
    Path(request_id): Path<String>,
    axum::Json(body): axum::Json<DecisionBody>,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let id = RequestId(request_id);
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| service.decide(&principal, &id, body.decision, body.decision_notes));
    match result {
        Ok(request) => (StatusCode::OK, axum::Json(request)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn vendors_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| service.list_vendors(&principal));
    match result {
        Ok(vendors) => (StatusCode::OK, axum::Json(vendors)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn vat_lookup_handler<R, V, U>(
    State(service): State<SharedService<R, V, U>>,
    headers: HeaderMap,
    Query(query): Query<VatQuery>,
) -> Response
where
    R: RequestRepository + 'static,
    V: VendorRepository + 'static,
    U: UserDirectory + 'static,
{
    let result = principal_from(&headers)
        .map_err(OnboardingError::from)
        .and_then(|principal| {
            let vendors = service.vendors_with_vat(&principal, &query.vat)?;
            let requests = service.requests_with_vat(&principal, &query.vat)?;
            Ok((vendors, requests))
        });
    match result {
        Ok((vendors, requests)) => {
            let payload = json!({
                "vatNumber": query.vat.trim(),
                "vendors": vendors,
                "requests": requests,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// Map a service failure onto a status code and a `{ "error": .. }` body.
pub(crate) fn error_response(err: OnboardingError) -> Response {
    let status = match &err {
        OnboardingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OnboardingError::Resolution(ResolutionError::RoleMismatch { .. }) => StatusCode::FORBIDDEN,
        OnboardingError::Resolution(_) => StatusCode::UNAUTHORIZED,
        OnboardingError::NotFound { .. } => StatusCode::NOT_FOUND,
        OnboardingError::Conflict { .. } => StatusCode::CONFLICT,
        OnboardingError::Persistence(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        OnboardingError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(error = %err, "onboarding request failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "onboarding request rejected");
    }

    let payload = match &err {
        OnboardingError::Validation(errors) => json!({
            "error": err.user_message(),
            "fields": errors,
        }),
        _ => json!({ "error": err.user_message() }),
    };
    (status, axum::Json(payload)).into_response()
}
