use crate::application::signature::SignatureService;
use crate::config::{Config, ConfigHandle};
use crate::domain::gateway::{
    PaymentCommandRequest, PaymentNotification, PaymentSessionRequest, PaymentSessionResponse,
    PaymentStatusResponse,
};
use crate::domain::message::{
    PaymentCommand, PaymentIdentity, PaymentResult, PaymentSession, PaymentStatus,
};
use crate::domain::payment::{
    CALL_COMPLETED, CreatedPayment, Payment, PaymentState, PaymentStatusReport, SESSION_WAITING,
};
use crate::domain::ports::GatewayClientBox;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Why a gateway response was not trusted. Logged only; callers see a plain
/// accepted/rejected outcome.
#[derive(Debug, Error, PartialEq, Eq)]
enum Mismatch {
    #[error("field `{0}` is missing")]
    Missing(&'static str),
    #[error("field `{field}` is {actual:?}, expected {expected:?}")]
    Differs {
        field: &'static str,
        expected: String,
        actual: String,
    },
    #[error("neither eshop_go_id nor buyer_go_id is the configured merchant")]
    Merchant,
}

fn expect_field<T>(
    field: &'static str,
    actual: Option<&T>,
    expected: &T,
) -> std::result::Result<(), Mismatch>
where
    T: PartialEq + fmt::Display + ?Sized,
{
    match actual {
        None => Err(Mismatch::Missing(field)),
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Mismatch::Differs {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
    }
}

/// Compares the echoed fields of a session response with what was sent.
fn check_session_fields(
    merchant_id: u64,
    payment: &Payment,
    response: &PaymentSessionResponse,
    expected_state: &str,
) -> std::result::Result<(), Mismatch> {
    expect_field("result", response.result.as_deref(), CALL_COMPLETED)?;
    expect_field(
        "result_description",
        response.result_description.as_deref(),
        expected_state,
    )?;
    expect_field(
        "variable_symbol",
        response.variable_symbol.as_deref(),
        payment.variable_symbol.as_str(),
    )?;
    expect_field(
        "product_name",
        response.product_name.as_deref(),
        payment.product_name.as_str(),
    )?;
    expect_field(
        "total_price",
        response.total_price.as_ref(),
        &payment.total_price.cents(),
    )?;
    if response.eshop_go_id != Some(merchant_id) && response.buyer_go_id != Some(merchant_id) {
        return Err(Mismatch::Merchant);
    }
    Ok(())
}

fn check_status_fields(
    merchant_id: u64,
    payment: &Payment,
    response: &PaymentStatusResponse,
) -> std::result::Result<(), Mismatch> {
    expect_field("result", response.result.as_deref(), CALL_COMPLETED)?;
    expect_field(
        "variable_symbol",
        response.variable_symbol.as_deref(),
        payment.variable_symbol.as_str(),
    )?;
    expect_field(
        "product_name",
        response.product_name.as_deref(),
        payment.product_name.as_str(),
    )?;
    expect_field(
        "total_price",
        response.total_price.as_ref(),
        &payment.total_price.cents(),
    )?;
    expect_field("eshop_go_id", response.eshop_go_id.as_ref(), &merchant_id)?;
    Ok(())
}

/// Builds the signed `createPaymentSession` request for `payment`.
pub fn build_command_request(
    signer: &SignatureService,
    config: &Config,
    payment: &Payment,
) -> Result<PaymentCommandRequest> {
    let command = PaymentCommand::new(
        config.merchant_id,
        &payment.product_name,
        payment.total_price.cents(),
        &payment.variable_symbol,
        &config.failed_url,
        &config.success_url,
    );
    let encrypted_signature = signer.sign(&command, &config.secret)?;

    Ok(PaymentCommandRequest {
        eshop_go_id: command.merchant_id(),
        product_name: command.product_name().to_string(),
        total_price: command.total_price_in_cents(),
        variable_symbol: command.variable_symbol().to_string(),
        success_url: command.success_url().to_string(),
        failed_url: command.failed_url().to_string(),
        encrypted_signature,
    })
}

/// Creates payment sessions and decides whether gateway answers are authentic.
///
/// Every operation works on one configuration snapshot taken at its start, so
/// a concurrent reload never mixes two merchants' values in one signature.
pub struct PaymentLifecycle {
    config: Arc<ConfigHandle>,
    signer: SignatureService,
    gateway: GatewayClientBox,
}

impl PaymentLifecycle {
    pub fn new(
        config: Arc<ConfigHandle>,
        signer: SignatureService,
        gateway: GatewayClientBox,
    ) -> Self {
        Self {
            config,
            signer,
            gateway,
        }
    }

    /// Signs a payment command, sends it and confirms the gateway's answer.
    ///
    /// Transport failures are returned as errors. A response that fails either
    /// check yields `CreatedPayment::Rejected`; it is never retried.
    pub async fn create(&self, payment: &Payment) -> Result<CreatedPayment> {
        let config = self.config.snapshot();
        let request = build_command_request(&self.signer, &config, payment)?;

        tracing::info!(
            variable_symbol = %payment.variable_symbol,
            state = %PaymentState::Initiated,
            "Creating payment session"
        );

        let response = self.gateway.create_payment_session(request).await?;

        tracing::debug!(
            variable_symbol = %payment.variable_symbol,
            state = %PaymentState::Waiting,
            "Gateway answered, confirming"
        );

        let outcome = if self.confirm(&config, payment, &response, SESSION_WAITING) {
            CreatedPayment::Confirmed {
                payment_session_id: response.payment_session_id,
            }
        } else {
            CreatedPayment::Rejected
        };

        tracing::info!(
            variable_symbol = %payment.variable_symbol,
            state = %outcome.state(),
            "Payment session finished"
        );
        Ok(outcome)
    }

    /// Runs the field-equality and signature checks on a session response.
    ///
    /// Both checks always run and both must pass.
    pub fn confirm(
        &self,
        config: &Config,
        payment: &Payment,
        response: &PaymentSessionResponse,
        expected_state: &str,
    ) -> bool {
        let fields = check_session_fields(config.merchant_id, payment, response, expected_state);
        if let Err(mismatch) = &fields {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Gateway response rejected: {}",
                mismatch
            );
        }

        let expected = PaymentResult::new(
            config.merchant_id,
            &payment.product_name,
            payment.total_price.cents(),
            &payment.variable_symbol,
            CALL_COMPLETED,
            expected_state,
        );
        let signature_ok = match response.encrypted_signature.as_deref() {
            Some(signature) => self.signer.verify(&expected, &config.secret, signature),
            None => false,
        };
        if !signature_ok {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Gateway response rejected: signature does not verify"
            );
        }

        fields.is_ok() && signature_ok
    }

    /// Queries the state of an existing session.
    ///
    /// Returns `None` when the answer is not authentic.
    pub async fn status(
        &self,
        payment_session_id: u64,
        payment: &Payment,
    ) -> Result<Option<PaymentStatusReport>> {
        let config = self.config.snapshot();
        let session = PaymentSession::new(config.merchant_id, payment_session_id);
        let request = PaymentSessionRequest {
            eshop_go_id: config.merchant_id,
            payment_session_id,
            encrypted_signature: self.signer.sign(&session, &config.secret)?,
        };

        let response = self.gateway.payment_status(request).await?;
        Ok(self.authenticate_status(&config, payment, &response))
    }

    fn authenticate_status(
        &self,
        config: &Config,
        payment: &Payment,
        response: &PaymentStatusResponse,
    ) -> Option<PaymentStatusReport> {
        let fields = check_status_fields(config.merchant_id, payment, response);
        if let Err(mismatch) = &fields {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Status response rejected: {}",
                mismatch
            );
        }

        let Some(session_state) = response.session_state.as_deref() else {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Status response rejected: {}",
                Mismatch::Missing("session_state")
            );
            return None;
        };
        // Sessions that were never paid carry no channel.
        let payment_channel = response.payment_channel.as_deref().unwrap_or_default();

        let expected = PaymentStatus::new(
            config.merchant_id,
            &payment.product_name,
            payment.total_price.cents(),
            &payment.variable_symbol,
            CALL_COMPLETED,
            session_state,
            payment_channel,
        );
        let signature_ok = response
            .encrypted_signature
            .as_deref()
            .is_some_and(|signature| self.signer.verify(&expected, &config.secret, signature));
        if !signature_ok {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Status response rejected: signature does not verify"
            );
        }

        if fields.is_ok() && signature_ok {
            Some(PaymentStatusReport {
                session_state: session_state.trim().to_string(),
                payment_channel: payment_channel.trim().to_string(),
            })
        } else {
            None
        }
    }

    /// Checks a gateway notification about `payment`.
    pub fn verify_notification(
        &self,
        notification: &PaymentNotification,
        payment: &Payment,
    ) -> bool {
        let config = self.config.snapshot();

        let fields = expect_field(
            "targetGoId",
            Some(&notification.target_go_id),
            &config.merchant_id,
        )
        .and_then(|_| {
            expect_field(
                "variableSymbol",
                Some(notification.variable_symbol.as_str()),
                payment.variable_symbol.as_str(),
            )
        });
        if let Err(mismatch) = &fields {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Notification rejected: {}",
                mismatch
            );
        }

        let identity = PaymentIdentity::new(
            config.merchant_id,
            notification.payment_session_id,
            &payment.variable_symbol,
        );
        let signature_ok =
            self.signer.verify(&identity, &config.secret, &notification.encrypted_signature);
        if !signature_ok {
            tracing::warn!(
                variable_symbol = %payment.variable_symbol,
                "Notification rejected: signature does not verify"
            );
        }

        fields.is_ok() && signature_ok
    }
}
