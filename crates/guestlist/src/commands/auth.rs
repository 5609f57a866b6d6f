//! Auth commands - sign in, sign out, profile, password reset.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use guestlist_client::User;

use super::{Context, credentials, describe, ensure_authenticated, print_json, print_success};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Admin email (prompted if omitted)
    #[arg(short, long, env = "GUESTLIST_ADMIN_EMAIL")]
    pub email: Option<String>,
}

/// Arguments for the forgot-password command.
#[derive(Args, Debug)]
pub struct ForgotPasswordArgs {
    /// Email address of the admin account
    pub email: String,
}

/// Verify credentials and show the resulting profile.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let store = ctx.connect()?;
    let credentials = credentials(args.email)?;
    let session = store.login(&credentials).await.map_err(describe)?;
    ensure_authenticated(&session)?;

    if let Some(user) = &session.user {
        if ctx.json_output {
            print_json(user)?;
        } else {
            print_success(&format!("Signed in as {}", user.name));
        }
    }
    Ok(())
}

/// Show the signed-in administrator.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let store = ctx.signed_in().await?;
    let session = store.snapshot();
    if let Some(user) = &session.user {
        if ctx.json_output {
            print_json(user)?;
        } else {
            print_profile(user);
        }
    }
    Ok(())
}

/// Request a password reset link.
pub async fn forgot_password(args: ForgotPasswordArgs, ctx: &Context) -> Result<()> {
    let store = ctx.connect()?;
    let response = store
        .client()
        .auth()
        .forgot_password(&args.email)
        .await
        .map_err(describe)?;

    if ctx.json_output {
        print_json(&response)?;
    } else {
        print_success(
            response
                .message
                .as_deref()
                .unwrap_or("Password reset link sent to your email."),
        );
    }
    Ok(())
}

pub fn print_profile(user: &User) {
    let dim = Style::new().dim();
    println!("{}", style(&user.name).bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("Email: {}", user.email);
    println!("Role:  {}", user.role);
    println!("ID:    {}", dim.apply_to(&user.id));
}
