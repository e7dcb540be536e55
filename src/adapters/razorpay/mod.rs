//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port over the Razorpay Orders API.
//!
//! # Security
//!
//! - The key secret is held in `secrecy::SecretString` and only exposed
//!   for basic auth and callback signature verification
//!
//! # Configuration
//!
//! - `WECLOUD__PAYMENT__RAZORPAY_KEY_ID`: public key id (`rzp_...`)
//! - `WECLOUD__PAYMENT__RAZORPAY_KEY_SECRET`: key secret

mod mock_gateway;
mod razorpay_gateway;

pub use mock_gateway::MockPaymentGateway;
pub use razorpay_gateway::{RazorpayConfig, RazorpayGateway};
