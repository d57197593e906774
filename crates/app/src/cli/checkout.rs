use std::io;

use clap::Args;
use storefront::checkout::CheckoutOutcome;
use storefront_app::AppContext;

use super::{Output, report};

#[derive(Debug, Args)]
pub(crate) struct ReturnArgs {
    /// `collection_status` from the return URL
    #[arg(long)]
    collection_status: Option<String>,

    /// `status` from the return URL
    #[arg(long)]
    status: Option<String>,

    /// `payment_id` from the return URL
    #[arg(long)]
    payment_id: Option<String>,
}

impl ReturnArgs {
    fn outcome(&self) -> CheckoutOutcome {
        let pairs = [
            ("collection_status", self.collection_status.as_deref()),
            ("status", self.status.as_deref()),
            ("payment_id", self.payment_id.as_deref()),
        ];

        CheckoutOutcome::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(key, value)| value.map(|value| (key, value))),
        )
    }
}

pub(crate) async fn checkout(
    context: &AppContext,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let check = context
        .checkout
        .verify_stock()
        .await
        .map_err(|error| format!("failed to verify stock: {}", report(&error)))?;

    if !check.check_status {
        return Err(format!("cannot check out: {}", check.message));
    }

    let url = context
        .checkout
        .create_preference()
        .await
        .map_err(|error| format!("failed to create payment: {}", report(&error)))?;

    out.line(format!("complete the payment at {url}"))
}

pub(crate) async fn complete(
    context: &AppContext,
    args: &ReturnArgs,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let outcome = args.outcome();

    let cleared = context
        .checkout
        .complete(&outcome)
        .await
        .map_err(|error| format!("failed to settle the cart: {}", report(&error)))?;

    let status = outcome
        .status
        .as_ref()
        .map_or_else(|| "unknown".to_string(), ToString::to_string);

    out.line(format!("payment status: {status}"))?;

    if let Some(payment_id) = &outcome.payment_id {
        out.line(format!("payment id: {payment_id}"))?;
    }

    if cleared {
        out.line("cart cleared")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use storefront::checkout::PaymentStatus;

    use super::*;

    #[test]
    fn collection_status_wins() {
        let args = ReturnArgs {
            collection_status: Some("approved".to_string()),
            status: Some("pending".to_string()),
            payment_id: Some("42".to_string()),
        };

        let outcome = args.outcome();

        assert_eq!(outcome.status, Some(PaymentStatus::Approved));
        assert_eq!(outcome.payment_id.as_deref(), Some("42"));
    }
}
