//! Mock payment gateway for tests and local runs.
//!
//! Issues sequential `order_MOCK<n>` ids, records every request and can be
//! told to fail the next calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentGatewayError};

#[derive(Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    requests: Vec<CreateOrderRequest>,
    next_error: Option<PaymentGatewayError>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `create_order` call with `error`.
    pub fn fail_next(&self, error: PaymentGatewayError) {
        self.lock().next_error = Some(error);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        state.next_id += 1;
        Ok(GatewayOrder {
            id: format!("order_MOCK{}", state.next_id),
            amount: request.amount_minor_units,
            currency: request.currency,
            receipt: Some(request.receipt),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            amount_minor_units: 100_000,
            currency: "INR".to_string(),
            receipt: "ORDER_1".to_string(),
        }
    }

    #[tokio::test]
    async fn issues_sequential_ids() {
        let gateway = MockPaymentGateway::new();
        assert_eq!(gateway.create_order(request()).await.unwrap().id, "order_MOCK1");
        assert_eq!(gateway.create_order(request()).await.unwrap().id, "order_MOCK2");
        assert_eq!(gateway.requests().len(), 2);
    }

    #[tokio::test]
    async fn injected_error_applies_once() {
        let gateway = MockPaymentGateway::new();
        gateway.fail_next(PaymentGatewayError::network("down"));

        assert!(gateway.create_order(request()).await.is_err());
        assert!(gateway.create_order(request()).await.is_ok());
    }
}
