//! Business-logic services for the clinic site.

pub mod auth;
pub mod checkout;
pub mod email;
pub mod razorpay;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutOutcome};
pub use email::{EmailError, EmailService};
pub use razorpay::{GatewayError, PaymentGateway, PaymentIntent, RazorpayClient};
