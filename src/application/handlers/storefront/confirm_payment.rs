//! ConfirmPaymentHandler - Command handler for the gateway completion callback.
//!
//! Verifies the callback signature, then completes the payment and creates
//! the account in one transaction. Directory provisioning runs afterwards,
//! outside that transaction, and its failure never undoes the commit.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::storefront::{
    Account, GeneratedPassword, IssuedCredentials, PasswordHasher, PaymentSignatureVerifier,
    PaymentStatus, PendingPayment, StorefrontError,
};
use crate::ports::{
    AccountRepository, DirectoryProvisioner, PaymentCompletionWriter, PaymentRepository,
    ProvisionAccountRequest,
};

/// Customer-facing reason when the directory rejects the account.
const PROVISIONING_FAILURE_REASON: &str =
    "the storage account could not be activated yet and will be set up by support";

/// Command carrying the fields the checkout widget posts back.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// What happened when the account was pushed to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    Provisioned,
    Failed { reason: String },
}

impl ProvisioningOutcome {
    pub fn is_provisioned(&self) -> bool {
        matches!(self, ProvisioningOutcome::Provisioned)
    }
}

/// Result of a verified payment.
///
/// `credentials` holds the only copy of the plaintext password.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentResult {
    pub status: PaymentStatus,
    pub account: Account,
    pub credentials: IssuedCredentials,
    pub provisioning: ProvisioningOutcome,
}

/// Handler for payment confirmation.
pub struct ConfirmPaymentHandler {
    verifier: PaymentSignatureVerifier,
    hasher: PasswordHasher,
    payments: Arc<dyn PaymentRepository>,
    accounts: Arc<dyn AccountRepository>,
    completion: Arc<dyn PaymentCompletionWriter>,
    directory: Arc<dyn DirectoryProvisioner>,
}

impl ConfirmPaymentHandler {
    pub fn new(
        verifier: PaymentSignatureVerifier,
        hasher: PasswordHasher,
        payments: Arc<dyn PaymentRepository>,
        accounts: Arc<dyn AccountRepository>,
        completion: Arc<dyn PaymentCompletionWriter>,
        directory: Arc<dyn DirectoryProvisioner>,
    ) -> Self {
        Self {
            verifier,
            hasher,
            payments,
            accounts,
            completion,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<ConfirmPaymentResult, StorefrontError> {
        // 1. Load the purchase attempt
        let mut payment = self
            .payments
            .find_by_gateway_order_id(&cmd.gateway_order_id)
            .await?
            .ok_or_else(|| StorefrontError::payment_not_found(&cmd.gateway_order_id))?;

        if !payment.is_pending() {
            return Err(StorefrontError::invalid_payment_state(
                &cmd.gateway_order_id,
                payment.status,
            ));
        }

        // 2. Verify the signature; a mismatch is terminal
        if !self
            .verifier
            .verify(&cmd.gateway_order_id, &cmd.gateway_payment_id, &cmd.signature)
        {
            let transitioned = self.payments.mark_failed(&cmd.gateway_order_id).await?;
            warn!(
                order_id = %payment.order_id,
                gateway_order_id = %cmd.gateway_order_id,
                transitioned,
                "Payment signature mismatch"
            );
            return Err(StorefrontError::signature_mismatch(&cmd.gateway_order_id));
        }

        // 3. Issue credentials and build the account
        payment.complete(&cmd.gateway_payment_id, &cmd.signature)?;
        let password = GeneratedPassword::generate();
        let password_hash = self.hash(&password).await?;
        let account = Account::for_completed_payment(&payment, password_hash, Timestamp::now())?;

        // 4. Commit payment completion and account creation together
        if let Err(e) = self.completion.complete_payment(&payment, &account).await {
            return Err(self.completion_error(&payment, e).await);
        }

        info!(
            order_id = %payment.order_id,
            gateway_order_id = %payment.gateway_order_id,
            account_id = %account.id,
            email = %account.email,
            "Payment completed"
        );

        // 5. Provision outside the transaction
        let mut account = account;
        let provisioning = self.provision(&mut account, &payment, &password).await;

        Ok(ConfirmPaymentResult {
            status: payment.status,
            credentials: IssuedCredentials {
                username: account.username.clone(),
                password,
            },
            account,
            provisioning,
        })
    }

    async fn hash(&self, password: &GeneratedPassword) -> Result<String, StorefrontError> {
        let hasher = self.hasher.clone();
        let password = password.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| StorefrontError::infrastructure(format!("hashing task failed: {}", e)))?
            .map_err(StorefrontError::from)
    }

    async fn completion_error(&self, payment: &PendingPayment, err: DomainError) -> StorefrontError {
        match err.code {
            ErrorCode::AccountExists => {
                error!(
                    order_id = %payment.order_id,
                    gateway_order_id = %payment.gateway_order_id,
                    email = %payment.email,
                    "Account already committed by another payment; this payment needs a refund"
                );
                StorefrontError::account_conflict(payment.email.clone())
            }
            ErrorCode::InvalidStateTransition => {
                match self
                    .payments
                    .find_by_gateway_order_id(&payment.gateway_order_id)
                    .await
                {
                    Ok(Some(current)) => StorefrontError::invalid_payment_state(
                        &payment.gateway_order_id,
                        current.status,
                    ),
                    Ok(None) => StorefrontError::infrastructure(format!(
                        "payment {} disappeared during completion",
                        payment.gateway_order_id
                    )),
                    Err(e) => e.into(),
                }
            }
            _ => err.into(),
        }
    }

    async fn provision(
        &self,
        account: &mut Account,
        payment: &PendingPayment,
        password: &GeneratedPassword,
    ) -> ProvisioningOutcome {
        let request = ProvisionAccountRequest {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            password: password.clone(),
            plan_tier: account.plan_id.clone(),
        };

        match self.directory.create_account(request).await {
            Ok(()) => {
                let now = Timestamp::now();
                if let Err(e) = self.accounts.mark_provisioned(&account.id, now).await {
                    warn!(
                        account_id = %account.id,
                        error = %e,
                        "Directory user created but provisioning marker not saved"
                    );
                }
                account.mark_provisioned(now);
                ProvisioningOutcome::Provisioned
            }
            Err(e) => {
                error!(
                    account_id = %account.id,
                    email = %account.email,
                    order_id = %payment.order_id,
                    error = %e,
                    "Account committed without directory user"
                );
                let failure =
                    StorefrontError::provisioning_failed(account.id, PROVISIONING_FAILURE_REASON);
                ProvisioningOutcome::Failed {
                    reason: failure.message(),
                }
            }
        }
    }
}
