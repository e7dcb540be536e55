//! Hand-written port mocks shared by the storefront handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, OrderId, Timestamp};
use crate::domain::storefront::{
    Account, CanonicalEmail, CustomerDetails, PaymentStatus, PendingPayment, PlanCatalog,
};
use crate::ports::{
    AccountRepository, CreateOrderRequest, DirectoryError, DirectoryProvisioner, GatewayOrder,
    PaymentCompletionWriter, PaymentGateway, PaymentGatewayError, PaymentRepository,
    ProvisionAccountRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Store
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockStore {
    pub payments: Mutex<HashMap<String, PendingPayment>>,
    pub accounts: Mutex<Vec<Account>>,
    pub fail_save: bool,
    pub fail_complete_with: Option<ErrorCode>,
    pub fail_mark_provisioned: bool,
    /// Lookups past this many return a database error.
    pub fail_find_after: Option<usize>,
    /// Lookups past this many find nothing.
    pub lose_payment_after: Option<usize>,
    pub find_calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payment(payment: PendingPayment) -> Self {
        let store = Self::new();
        store
            .payments
            .lock()
            .unwrap()
            .insert(payment.gateway_order_id.clone(), payment);
        store
    }

    pub fn with_account(account: Account) -> Self {
        let store = Self::new();
        store.accounts.lock().unwrap().push(account);
        store
    }

    pub fn payments(&self) -> Vec<PendingPayment> {
        self.payments.lock().unwrap().values().cloned().collect()
    }

    pub fn payment(&self, gateway_order_id: &str) -> Option<PendingPayment> {
        self.payments.lock().unwrap().get(gateway_order_id).cloned()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentRepository for MockStore {
    async fn save(&self, payment: &PendingPayment) -> Result<(), DomainError> {
        if self.fail_save {
            return Err(DomainError::database("Simulated save failure"));
        }
        self.payments
            .lock()
            .unwrap()
            .insert(payment.gateway_order_id.clone(), payment.clone());
        Ok(())
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PendingPayment>, DomainError> {
        let calls = self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find_after.is_some_and(|n| calls >= n) {
            return Err(DomainError::database("Simulated lookup failure"));
        }
        if self.lose_payment_after.is_some_and(|n| calls >= n) {
            return Ok(None);
        }
        Ok(self.payment(gateway_order_id))
    }

    async fn mark_failed(&self, gateway_order_id: &str) -> Result<bool, DomainError> {
        let mut payments = self.payments.lock().unwrap();
        match payments.get_mut(gateway_order_id) {
            Some(payment) if payment.is_pending() => {
                payment.status = PaymentStatus::Failed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AccountRepository for MockStore {
    async fn exists_by_email(&self, email: &CanonicalEmail) -> Result<bool, DomainError> {
        Ok(self.accounts.lock().unwrap().iter().any(|a| &a.email == email))
    }

    async fn find_by_email(&self, email: &CanonicalEmail) -> Result<Option<Account>, DomainError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn mark_provisioned(&self, id: &AccountId, at: Timestamp) -> Result<(), DomainError> {
        if self.fail_mark_provisioned {
            return Err(DomainError::database("Simulated update failure"));
        }
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::AccountNotFound, "no such account"))?;
        account.mark_provisioned(at);
        Ok(())
    }

    async fn list_unprovisioned(&self, limit: u32) -> Result<Vec<Account>, DomainError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| !a.is_provisioned())
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentCompletionWriter for MockStore {
    async fn complete_payment(
        &self,
        payment: &PendingPayment,
        account: &Account,
    ) -> Result<(), DomainError> {
        if let Some(code) = self.fail_complete_with {
            return Err(DomainError::new(code, "Simulated completion failure"));
        }
        self.payments
            .lock()
            .unwrap()
            .insert(payment.gateway_order_id.clone(), payment.clone());
        self.accounts.lock().unwrap().push(account.clone());
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Payment gateway
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockGateway {
    requests: Mutex<Vec<CreateOrderRequest>>,
    counter: AtomicUsize,
    pub fail: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(PaymentGatewayError::network("connection refused"));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayOrder {
            id: format!("order_TEST{}", n),
            amount: request.amount_minor_units,
            currency: request.currency,
            receipt: Some(request.receipt),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Directory
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockDirectory {
    requests: Mutex<Vec<ProvisionAccountRequest>>,
    pub fail: bool,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<ProvisionAccountRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryProvisioner for MockDirectory {
    async fn create_account(&self, request: ProvisionAccountRequest) -> Result<(), DirectoryError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(DirectoryError::provider("Domain user limit reached"));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════

pub const TEST_SECRET: &str = "test_key_secret";

pub fn pending_payment(raw_email: &str, gateway_order_id: &str) -> PendingPayment {
    let plan = PlanCatalog::standard().find("1TB").unwrap();
    PendingPayment::open(
        OrderId::generate(),
        plan,
        CustomerDetails {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: CanonicalEmail::from_raw(raw_email).unwrap(),
        },
        gateway_order_id,
    )
}

pub fn completed_account(raw_email: &str) -> Account {
    let mut payment = pending_payment(raw_email, "order_DONE");
    payment.complete("pay_DONE", "sig").unwrap();
    Account::for_completed_payment(&payment, "$argon2id$stub".to_string(), Timestamp::now())
        .unwrap()
}
