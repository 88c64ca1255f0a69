//! Session-authenticated dashboard actions.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use crates::domain::{
    repositories::invoices::InvoiceRepository,
    value_objects::invoices::{InvoiceModel, MutationAck},
};

use super::InvoiceState;
use crate::{
    auth::{CallerRejection, SessionCaller},
    axum_http::error_responses::AppError,
};

pub const MARKED_AS_PAID_MESSAGE: &str = "Invoice marked as paid";

pub fn routes<R>(state: InvoiceState<R>) -> Router
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(create_invoice::<R>))
        .route(
            "/:invoice_id",
            get(find_invoice::<R>)
                .put(edit_invoice::<R>)
                .delete(delete_invoice::<R>),
        )
        .route("/:invoice_id/paid", post(mark_as_paid::<R>))
        .with_state(state)
}

pub async fn create_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<SessionCaller, CallerRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<InvoiceModel>), AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let SessionCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    let invoice = state
        .usecase
        .create(&identity, &body)
        .await
        .map_err(AppError::plain)?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn find_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<SessionCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
) -> Result<Json<InvoiceModel>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let SessionCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    let invoice = state
        .usecase
        .find(&identity, &invoice_id)
        .await
        .map_err(AppError::plain)?;

    Ok(Json(invoice))
}

pub async fn edit_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<SessionCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
    body: Bytes,
) -> Result<Json<InvoiceModel>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let SessionCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    let invoice = state
        .usecase
        .update(&identity, &invoice_id, &body)
        .await
        .map_err(AppError::plain)?;

    Ok(Json(invoice))
}

pub async fn delete_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<SessionCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
) -> Result<Json<MutationAck>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let SessionCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    state
        .usecase
        .delete(&identity, &invoice_id)
        .await
        .map_err(AppError::plain)?;

    Ok(Json(MutationAck::ok()))
}

pub async fn mark_as_paid<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<SessionCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
) -> Result<Json<MutationAck>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let SessionCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::ack(err))?;

    state
        .usecase
        .mark_as_paid(&identity, &invoice_id)
        .await
        .map_err(AppError::ack)?;

    Ok(Json(MutationAck::with_message(MARKED_AS_PAID_MESSAGE)))
}
