//! Payment provider interface
//!
//! The server never talks to a specific gateway directly; it goes through
//! [`PaymentProvider`], so a real gateway can replace [`MockPaymentProvider`]
//! without touching the order lifecycle.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Provider-side failure
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("unknown payment intent: {0}")]
    UnknownIntent(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// A created payment intent, referenced by the order until confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider reference ("pi_..." for the mock)
    pub reference: String,
    pub amount: Decimal,
    /// Opaque secret the client hands back on confirmation
    pub client_secret: String,
}

/// Outcome of confirming an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded,
    Declined(String),
}

/// Gateway seam for taking payments
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create an intent to collect `amount` for the given order
    async fn create_intent(
        &self,
        order_id: &str,
        amount: Decimal,
    ) -> Result<PaymentIntent, ProviderError>;

    /// Confirm a previously created intent
    async fn confirm(&self, reference: &str) -> Result<PaymentOutcome, ProviderError>;

    /// Refund a completed payment
    async fn refund(&self, reference: &str) -> Result<(), ProviderError>;
}

/// In-process provider used in development and tests; always succeeds
#[derive(Debug, Default, Clone)]
pub struct MockPaymentProvider;

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(
        &self,
        order_id: &str,
        amount: Decimal,
    ) -> Result<PaymentIntent, ProviderError> {
        let reference = format!("pi_{}", Uuid::new_v4().simple());
        tracing::debug!(order_id, %amount, reference, "mock payment intent created");
        Ok(PaymentIntent {
            reference,
            amount,
            client_secret: format!("secret_{}", Uuid::new_v4().simple()),
        })
    }

    async fn confirm(&self, reference: &str) -> Result<PaymentOutcome, ProviderError> {
        if !reference.starts_with("pi_") {
            return Err(ProviderError::UnknownIntent(reference.to_string()));
        }
        Ok(PaymentOutcome::Succeeded)
    }

    async fn refund(&self, reference: &str) -> Result<(), ProviderError> {
        if !reference.starts_with("pi_") {
            return Err(ProviderError::UnknownIntent(reference.to_string()));
        }
        Ok(())
    }
}

/// Provider that declines every confirmation; exercises the Failed branch
#[derive(Debug, Default, Clone)]
pub struct DecliningPaymentProvider;

#[async_trait]
impl PaymentProvider for DecliningPaymentProvider {
    async fn create_intent(
        &self,
        _order_id: &str,
        amount: Decimal,
    ) -> Result<PaymentIntent, ProviderError> {
        Ok(PaymentIntent {
            reference: format!("pi_{}", Uuid::new_v4().simple()),
            amount,
            client_secret: format!("secret_{}", Uuid::new_v4().simple()),
        })
    }

    async fn confirm(&self, _reference: &str) -> Result<PaymentOutcome, ProviderError> {
        Ok(PaymentOutcome::Declined("card declined".to_string()))
    }

    async fn refund(&self, reference: &str) -> Result<(), ProviderError> {
        Err(ProviderError::UnknownIntent(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_round_trip() {
        let provider = MockPaymentProvider::new();
        let intent = provider
            .create_intent("order:abc", Decimal::new(2700, 2))
            .await
            .unwrap();
        assert!(intent.reference.starts_with("pi_"));

        let outcome = provider.confirm(&intent.reference).await.unwrap();
        assert_eq!(outcome, PaymentOutcome::Succeeded);

        provider.refund(&intent.reference).await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_provider_rejects_unknown_reference() {
        let provider = MockPaymentProvider::new();
        assert!(provider.confirm("bogus").await.is_err());
        assert!(provider.refund("bogus").await.is_err());
    }

    #[tokio::test]
    async fn test_declining_provider() {
        let provider = DecliningPaymentProvider;
        let intent = provider
            .create_intent("order:abc", Decimal::new(100, 2))
            .await
            .unwrap();
        let outcome = provider.confirm(&intent.reference).await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Declined(_)));
    }
}
