use std::io;

use clap::Args;
use storefront_app::{
    AppContext,
    cart::ReconcileReport,
    gateway::{Credentials, SignUpForm},
};

use super::{Output, report};

#[derive(Debug, Args)]
pub(crate) struct SignInArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
pub(crate) struct SignUpArgs {
    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Account email
    #[arg(long)]
    email: String,

    /// Chosen password, at least eight characters
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    password: String,

    /// The password again
    #[arg(long)]
    password_confirmation: String,
}

pub(crate) async fn sign_in(
    context: &AppContext,
    args: SignInArgs,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let reconciled = context
        .session
        .sign_in_with_credentials(Credentials {
            email: args.email,
            password: args.password,
        })
        .await
        .map_err(|error| format!("failed to sign in: {}", report(&error)))?;

    signed_in(context, &reconciled, out)
}

pub(crate) async fn sign_up(
    context: &AppContext,
    args: SignUpArgs,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let reconciled = context
        .session
        .sign_up(SignUpForm {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            password: args.password,
            password_confirmation: args.password_confirmation,
        })
        .await
        .map_err(|error| format!("failed to sign up: {}", report(&error)))?;

    signed_in(context, &reconciled, out)
}

pub(crate) async fn sign_out(
    context: &AppContext,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    context
        .session
        .sign_out()
        .await
        .map_err(|error| format!("failed to sign out: {}", report(&error)))?;

    out.line("signed out")
}

fn signed_in(
    context: &AppContext,
    reconciled: &ReconcileReport,
    out: &mut Output<impl io::Write>,
) -> Result<(), String> {
    let name = context
        .session
        .current_user()
        .map(|user| user.display_name().to_string())
        .unwrap_or_default();

    out.line(format!("signed in as {name}"))?;

    for line in &reconciled.failed {
        out.line(format!(
            "could not move {} x{} from the guest cart",
            line.item_id, line.quantity
        ))?;
    }

    Ok(())
}
