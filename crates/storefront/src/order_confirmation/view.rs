//! Order confirmation view model.

use kestrel_core::OrderReceipt;

use super::overlay::{ACK_OVERLAY_DURATION, AckOverlay, OverlayState};

/// Delivery estimate shown for every order.
pub const DELIVERY_ESTIMATE: &str = "3-5 business days";

/// The confirmation page, mounted from the receipt handed over by checkout.
#[derive(Debug)]
pub enum OrderConfirmationView {
    /// Nothing was handed over, e.g. the page was reloaded or opened directly.
    NoOrder,
    Placed(PlacedOrder),
}

/// A confirmed order with its acknowledgment overlay.
#[derive(Debug)]
pub struct PlacedOrder {
    receipt: OrderReceipt,
    overlay: AckOverlay,
}

impl OrderConfirmationView {
    /// Mount the view. A receipt starts the overlay timer.
    ///
    /// Must be called inside a Tokio runtime.
    #[must_use]
    pub fn mount(receipt: Option<OrderReceipt>) -> Self {
        match receipt {
            Some(receipt) => Self::Placed(PlacedOrder {
                receipt,
                overlay: AckOverlay::show(ACK_OVERLAY_DURATION),
            }),
            None => Self::NoOrder,
        }
    }

    /// The tracking number, if an order was handed over.
    #[must_use]
    pub fn tracking_number(&self) -> Option<&str> {
        match self {
            Self::Placed(order) => Some(&order.receipt.tracking_number),
            Self::NoOrder => None,
        }
    }

    /// Overlay visibility, or `None` when there is no order.
    #[must_use]
    pub fn overlay_state(&self) -> Option<OverlayState> {
        match self {
            Self::Placed(order) => Some(order.overlay.state()),
            Self::NoOrder => None,
        }
    }
}

impl PlacedOrder {
    #[must_use]
    pub const fn receipt(&self) -> &OrderReceipt {
        &self.receipt
    }

    #[must_use]
    pub const fn overlay(&self) -> &AckOverlay {
        &self.overlay
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_no_order_shows_no_tracking() {
        let view = OrderConfirmationView::mount(None);
        assert!(matches!(view, OrderConfirmationView::NoOrder));
        assert!(view.tracking_number().is_none());
        assert!(view.overlay_state().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_placed_order_overlay_lifecycle() {
        let view = OrderConfirmationView::mount(Some(OrderReceipt::new("TRK-1042")));
        assert_eq!(view.tracking_number(), Some("TRK-1042"));
        assert_eq!(view.overlay_state(), Some(OverlayState::Visible));

        tokio::time::sleep(ACK_OVERLAY_DURATION + Duration::from_millis(1)).await;
        assert_eq!(view.overlay_state(), Some(OverlayState::Hidden));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(view.overlay_state(), Some(OverlayState::Hidden));
    }
}
