//! Checkout hand-off and order confirmation handlers.
//!
//! The receipt travels from checkout to the confirmation page through a
//! one-shot session entry. Reading it removes it, so a reload shows the
//! "No order found" fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State, response::Redirect};
use tower_sessions::Session;
use tracing::instrument;

use kestrel_core::OrderReceipt;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session_keys;
use crate::order_confirmation::{
    ACK_OVERLAY_DURATION, DELIVERY_ESTIMATE, OrderConfirmationView, OverlayState,
};
use crate::state::AppState;

/// Where checkout sends the shopper after placing an order.
pub const CONFIRMATION_PATH: &str = "/orders/confirmation";

/// Placed order display data for templates.
#[derive(Debug, Clone)]
pub struct PlacedOrderView {
    pub tracking_number: String,
    pub delivery_estimate: &'static str,
    pub overlay_visible: bool,
    pub dismiss_after_ms: u128,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/confirmation.html")]
pub struct OrderConfirmationTemplate {
    pub catalog_path: String,
    pub order: Option<PlacedOrderView>,
}

impl OrderConfirmationTemplate {
    /// Render data for a mounted view.
    #[must_use]
    pub fn new(view: &OrderConfirmationView, catalog_path: impl Into<String>) -> Self {
        let order = match view {
            OrderConfirmationView::NoOrder => None,
            OrderConfirmationView::Placed(placed) => Some(PlacedOrderView {
                tracking_number: placed.receipt().tracking_number.clone(),
                delivery_estimate: DELIVERY_ESTIMATE,
                overlay_visible: placed.overlay().state() == OverlayState::Visible,
                dismiss_after_ms: ACK_OVERLAY_DURATION.as_millis(),
            }),
        };

        Self {
            catalog_path: catalog_path.into(),
            order,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Take the pending receipt out of the session.
async fn take_order_receipt(session: &Session) -> Result<Option<OrderReceipt>> {
    Ok(session
        .remove::<OrderReceipt>(session_keys::ORDER_CONFIRMATION)
        .await?)
}

// =============================================================================
// Handlers
// =============================================================================

/// Order confirmation page.
#[instrument(skip(state, session))]
pub async fn confirmation(
    State(state): State<AppState>,
    session: Session,
) -> Result<OrderConfirmationTemplate> {
    let receipt = take_order_receipt(&session).await?;
    if receipt.is_none() {
        tracing::debug!("Confirmation page opened without a pending order");
    }

    let view = OrderConfirmationView::mount(receipt);
    Ok(OrderConfirmationTemplate::new(
        &view,
        state.config().catalog_path.as_str(),
    ))
}

/// Checkout hand-off: stash the receipt and send the shopper to the
/// confirmation page.
#[instrument(skip(session, receipt), fields(tracking_number = %receipt.tracking_number))]
pub async fn complete_checkout(
    session: Session,
    Json(receipt): Json<OrderReceipt>,
) -> Result<Redirect> {
    if receipt.tracking_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "tracking number is required".to_string(),
        ));
    }

    session
        .insert(session_keys::ORDER_CONFIRMATION, &receipt)
        .await?;
    add_breadcrumb(
        "checkout",
        "Order handed to confirmation page",
        Some(&[("tracking_number", receipt.tracking_number.as_str())]),
    );

    Ok(Redirect::to(CONFIRMATION_PATH))
}
