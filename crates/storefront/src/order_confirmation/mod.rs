//! Order confirmation page.
//!
//! - [`overlay`] - The timed "Order Placed!" acknowledgment
//! - [`view`] - The page's view model

pub mod overlay;
pub mod view;

pub use overlay::{ACK_OVERLAY_DURATION, AckOverlay, OverlayState};
pub use view::{DELIVERY_ESTIMATE, OrderConfirmationView, PlacedOrder};
