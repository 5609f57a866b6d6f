//! Invitation command - the public accompanying-guest registration flow.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use guestlist_client::{AccompanyEntry, Invitation};

use super::{Context, describe, print_json, print_success, prompt};

/// Arguments for the invitation command.
#[derive(Args, Debug)]
pub struct InvitationArgs {
    #[command(subcommand)]
    pub command: InvitationCommand,
}

#[derive(Subcommand, Debug)]
pub enum InvitationCommand {
    /// Show the invitation behind a token
    Show {
        /// Invitation token
        token: String,
    },

    /// Register accompanying guests for an invitation
    Register {
        /// Invitation token
        token: String,

        /// Accompanying guest as "name,email,mobile" (repeat once per guest;
        /// prompted when omitted)
        #[arg(short, long = "accompany", value_parser = parse_accompany)]
        accompanies: Vec<AccompanyEntry>,
    },
}

/// Run the invitation command.
pub async fn run(args: InvitationArgs, ctx: &Context) -> Result<()> {
    match args.command {
        InvitationCommand::Show { token } => cmd_show(&token, ctx).await,
        InvitationCommand::Register { token, accompanies } => {
            cmd_register(&token, accompanies, ctx).await
        }
    }
}

async fn cmd_show(token: &str, ctx: &Context) -> Result<()> {
    let store = ctx.connect()?;
    let invitation = store
        .client()
        .invitations()
        .get(token)
        .await
        .map_err(describe)?;

    if ctx.json_output {
        print_json(&invitation)
    } else {
        print_invitation(&invitation);
        Ok(())
    }
}

async fn cmd_register(token: &str, accompanies: Vec<AccompanyEntry>, ctx: &Context) -> Result<()> {
    let store = ctx.connect()?;
    let invitations = store.client().invitations();
    let invitation = invitations.get(token).await.map_err(describe)?;

    let accompanies = if accompanies.is_empty() {
        print_invitation(&invitation);
        println!();
        prompt_entries(invitation.accompany_quota)?
    } else {
        accompanies
    };

    invitations
        .register(token, &invitation, accompanies)
        .await
        .map_err(describe)?;

    print_success("Accompanying guests registered");
    Ok(())
}

fn prompt_entries(quota: u32) -> Result<Vec<AccompanyEntry>> {
    let mut entries = Vec::new();
    for n in 1..=quota {
        println!("{}", style(format!("Accompany {n}")).bold());
        entries.push(AccompanyEntry {
            name: prompt("  Name:   ")?,
            email: prompt("  Email:  ")?,
            mobile: prompt("  Mobile: ")?,
        });
    }
    Ok(entries)
}

fn print_invitation(invitation: &Invitation) {
    let dim = Style::new().dim();
    println!("{}", style(&invitation.guest_name).bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("Reg. No.:        {}", invitation.reg_num);
    println!("Accompany quota: {}", invitation.accompany_quota);
}

/// Parse `name,email,mobile`.
pub fn parse_accompany(s: &str) -> Result<AccompanyEntry, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [name, email, mobile] => Ok(AccompanyEntry {
            name: name.to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
        }),
        _ => Err(format!("expected \"name,email,mobile\", got \"{s}\"")),
    }
}
