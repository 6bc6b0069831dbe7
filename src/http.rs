use crate::auth::CredentialValidator;
use crate::availability::DayAvailability;
use crate::error::StoreError;
use crate::roster::AdminRoster;
use crate::session::BookingSession;
use crate::slots::SlotLabel;
use crate::store::AppointmentStore;
use crate::types::BookedAppointment;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Response;
use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use futures::{Stream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use validator::Validate;

pub struct AppState<S: AppointmentStore, C: CredentialValidator> {
    pub store: S,
    pub roster: Arc<Mutex<AdminRoster>>,
    pub credentials: Arc<C>,
}

impl<S: AppointmentStore, C: CredentialValidator> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            roster: self.roster.clone(),
            credentials: self.credentials.clone(),
        }
    }
}

lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9+()\-\s]{5,20}$").unwrap();
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct BookingPayload {
    date: NaiveDate,
    slot_label: String,
    #[validate(length(min = 1, message = "name is required"))]
    customer_name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "invalid phone number"))]
    customer_phone: String,
    notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Deserialize)]
struct AvailabilityQuery {
    date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
struct RosterQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    status: &'static str,
    slots: Vec<SlotLabel>,
}

fn error_response(err: StoreError) -> (StatusCode, String) {
    let message = match &err {
        // An authorization-policy rejection is a configuration problem,
        // not something a retry can fix.
        StoreError::PermissionDenied(_) => {
            format!("{err}. Check the appointment store's authorization policy.")
        }
        StoreError::Transport(_) => format!("{err}. Please try again."),
        _ => err.to_string(),
    };
    (err.status_code(), message)
}

pub fn create_app<S: AppointmentStore, C: CredentialValidator>(state: AppState<S, C>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/availability", get(get_availability::<S, C>))
        .route("/book", post(book_appointment::<S, C>))
        .route("/login", post(login::<S, C>));

    let admin = Router::new()
        .route("/admin/appointments", get(get_appointments::<S, C>))
        .route("/admin/appointments/:id", delete(delete_appointment::<S, C>))
        .route("/admin/feed", get(get_feed::<S, C>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth::<S, C>,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn admin_auth<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    // The closure borrows the request, which is `!Sync`; scope it so the
    // middleware future stays `Send` across the `next.run` await.
    let (username, password) = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
        };
        let (Some(username), Some(password)) =
            (header("x-admin-user"), header("x-admin-password"))
        else {
            return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
        };
        (username, password)
    };

    match state.credentials.check_credentials(username, password) {
        Ok(true) => Ok(next.run(request).await),
        Ok(false) => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        Err(err) => Err(error_response(err)),
    }
}

async fn get_availability<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, String)> {
    let booked = state
        .store
        .booked_labels(query.date)
        .await
        .map_err(error_response)?;
    let availability = crate::availability::resolve(query.date, &booked);
    Ok(Json(AvailabilityResponse {
        status: availability.status(),
        slots: availability.slots().to_vec(),
    }))
}

async fn book_appointment<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
    Json(payload): Json<BookingPayload>,
) -> Result<(StatusCode, Json<BookedAppointment>), (StatusCode, String)> {
    if let Err(err) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, err.to_string()));
    }

    let mut session = BookingSession::new(state.store.clone());
    let availability = session
        .choose_date(payload.date)
        .await
        .map_err(error_response)?;

    let slot = SlotLabel::new(payload.slot_label.clone());
    if !session.choose_slot(&slot) {
        let reason = match availability {
            DayAvailability::Closed => format!("No appointments on {}", payload.date),
            DayAvailability::Full => format!("{} is fully booked", payload.date),
            DayAvailability::Open(_) => format!("{slot} is not available on {}", payload.date),
        };
        return Err((StatusCode::CONFLICT, reason));
    }

    let booked = session
        .submit(&payload.customer_name, &payload.customer_phone, payload.notes)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(booked)))
}

async fn login<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
    Json(payload): Json<LoginPayload>,
) -> Result<StatusCode, (StatusCode, String)> {
    match state
        .credentials
        .check_credentials(&payload.username, &payload.password)
    {
        Ok(true) => Ok(StatusCode::OK),
        Ok(false) => Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())),
        Err(err) => Err(error_response(err)),
    }
}

async fn get_appointments<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
    Query(query): Query<RosterQuery>,
) -> Json<Vec<BookedAppointment>> {
    let roster = state.roster.lock().unwrap();
    let appointments = match query.date {
        Some(date) => roster.on_date(date),
        None => roster.all().to_vec(),
    };
    Json(appointments)
}

async fn delete_appointment<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, String), (StatusCode, String)> {
    // A record that is already gone counts as removed; double-clicks and
    // concurrent admins must not surface an error.
    match state.store.delete(id).await {
        Ok(()) | Err(StoreError::NotFound) => {
            Ok((StatusCode::OK, "Appointment removed".to_string()))
        }
        Err(err) => {
            warn!(id, ?err, "failed to delete appointment");
            Err(error_response(err))
        }
    }
}

async fn get_feed<S: AppointmentStore, C: CredentialValidator>(
    State(state): State<AppState<S, C>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state.store.subscribe().into_stream().filter_map(|event| async move {
        match event {
            Ok(event) => Some(Event::default().json_data(&event)),
            // Lagged subscriber; skip the missed events.
            Err(_) => None,
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
