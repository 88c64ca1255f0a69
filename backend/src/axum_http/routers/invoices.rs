//! Bearer-token (mobile) invoice endpoints.

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
    auth::{CallerRejection, MobileCaller},
    axum_http::error_responses::AppError,
};

pub const STATUS_UPDATED_MESSAGE: &str = "Invoice status updated successfully";

pub fn routes<R>(state: InvoiceState<R>) -> Router
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(create_invoice::<R>))
        .route(
            "/:invoice_id",
            get(find_invoice::<R>)
                .put(update_invoice::<R>)
                .patch(update_invoice_status::<R>)
                .delete(delete_invoice::<R>),
        )
        .with_state(state)
}

pub async fn create_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<MobileCaller, CallerRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<InvoiceModel>), AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let MobileCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    let invoice = state
        .usecase
        .create(&identity, &body)
        .await
        .map_err(AppError::plain)?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn find_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<MobileCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
) -> Result<Json<InvoiceModel>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let MobileCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    let invoice = state
        .usecase
        .find(&identity, &invoice_id)
        .await
        .map_err(AppError::plain)?;

    Ok(Json(invoice))
}

pub async fn update_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<MobileCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
    body: Bytes,
) -> Result<Json<InvoiceModel>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let MobileCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    let invoice = state
        .usecase
        .update(&identity, &invoice_id, &body)
        .await
        .map_err(AppError::plain)?;

    Ok(Json(invoice))
}

pub async fn update_invoice_status<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<MobileCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
    body: Bytes,
) -> Result<Json<MutationAck>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let MobileCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::ack(err))?;

    state
        .usecase
        .update_status(&identity, &invoice_id, &body)
        .await
        .map_err(AppError::ack)?;

    Ok(Json(MutationAck::with_message(STATUS_UPDATED_MESSAGE)))
}

pub async fn delete_invoice<R>(
    State(state): State<InvoiceState<R>>,
    caller: Result<MobileCaller, CallerRejection>,
    Path(invoice_id): Path<String>,
) -> Result<Json<MutationAck>, AppError>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let MobileCaller(identity) = caller.map_err(|CallerRejection(err)| AppError::plain(err))?;

    state
        .usecase
        .delete(&identity, &invoice_id)
        .await
        .map_err(AppError::plain)?;

    Ok(Json(MutationAck::ok()))
}
