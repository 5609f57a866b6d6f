//! Guests command - guest management.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use guestlist_client::validation::validate_guest;
use guestlist_client::{Error, GuestInput};

use super::{Context, confirm, describe, print_json, print_success};
use crate::drafts::{ADD_GUEST_FORM, DraftStore, GuestDraft};
use crate::export::write_csv;
use crate::table::{SortColumn, print_guest, print_guests, sort_guests};

/// Arguments for the guests command.
#[derive(Args, Debug)]
pub struct GuestsArgs {
    #[command(subcommand)]
    pub command: GuestsCommand,
}

#[derive(Subcommand, Debug)]
pub enum GuestsCommand {
    /// List all guests
    List {
        #[command(flatten)]
        order: SortArgs,
    },

    /// Show a single guest
    Show {
        /// Guest ID
        id: String,
    },

    /// Add a guest (missing fields are taken from a saved draft)
    Add {
        #[command(flatten)]
        fields: GuestFields,

        /// Neither read nor save a form draft
        #[arg(long)]
        no_draft: bool,
    },

    /// Edit a guest; only the given fields change
    Edit {
        /// Guest ID
        id: String,

        #[command(flatten)]
        fields: GuestFields,
    },

    /// Delete a guest
    Delete {
        /// Guest ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export guests to a CSV file
    Export {
        /// Output file
        #[arg(short, long, default_value = "guests.csv")]
        output: PathBuf,

        #[command(flatten)]
        order: SortArgs,
    },
}

/// Table ordering.
#[derive(Args, Debug, Clone, Copy)]
pub struct SortArgs {
    /// Column to sort by
    #[arg(long, value_enum)]
    pub sort: Option<SortColumn>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

/// Guest form fields.
#[derive(Args, Debug, Default)]
pub struct GuestFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Mobile number (digits only)
    #[arg(long)]
    pub mobile: Option<String>,

    /// Number of accompanying guests allowed
    #[arg(long)]
    pub quota: Option<u32>,

    /// Welcome message (HTML)
    #[arg(long, conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the welcome message (HTML) from a file
    #[arg(long)]
    pub description_file: Option<PathBuf>,
}

impl GuestFields {
    fn to_draft(&self) -> Result<GuestDraft> {
        let description = match &self.description_file {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            ),
            None => self.description.clone(),
        };
        Ok(GuestDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            accompany_quota: self.quota,
            description,
        })
    }
}

/// Run the guests command.
pub async fn run(args: GuestsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        GuestsCommand::List { order } => cmd_list(order, ctx).await,
        GuestsCommand::Show { id } => cmd_show(&id, ctx).await,
        GuestsCommand::Add { fields, no_draft } => cmd_add(fields, no_draft, ctx).await,
        GuestsCommand::Edit { id, fields } => cmd_edit(&id, fields, ctx).await,
        GuestsCommand::Delete { id, yes } => cmd_delete(&id, yes, ctx).await,
        GuestsCommand::Export { output, order } => cmd_export(output, order, ctx).await,
    }
}

async fn cmd_list(order: SortArgs, ctx: &Context) -> Result<()> {
    let store = ctx.signed_in().await?;
    let mut guests = store.client().guests().list().await.map_err(describe)?;
    if let Some(column) = order.sort {
        sort_guests(&mut guests, column, order.desc);
    }

    if ctx.json_output {
        print_json(&guests)
    } else {
        print_guests(&guests);
        Ok(())
    }
}

async fn cmd_show(id: &str, ctx: &Context) -> Result<()> {
    let store = ctx.signed_in().await?;
    let guest = store.client().guests().get(id).await.map_err(describe)?;

    if ctx.json_output {
        print_json(&guest)
    } else {
        print_guest(&guest);
        Ok(())
    }
}

async fn cmd_add(fields: GuestFields, no_draft: bool, ctx: &Context) -> Result<()> {
    let dim = Style::new().dim();
    let drafts = (!no_draft).then(|| ctx.drafts());

    let mut form = fields.to_draft()?;
    if let Some(drafts) = &drafts
        && let Some(saved) = drafts.get(ADD_GUEST_FORM)?
    {
        let saved_form = GuestDraft::from_value(&saved.values);
        if !saved_form.is_empty() {
            println!(
                "{}",
                dim.apply_to(format!(
                    "Resuming draft saved {}",
                    saved.saved_at.format("%Y-%m-%d %H:%M UTC")
                ))
            );
            form = form.or(saved_form);
        }
    }

    let input = form.to_input();
    let errors = validate_guest(&input);
    if !errors.is_empty() {
        keep_draft(drafts.as_ref(), &form)?;
        return Err(describe(Error::Validation(errors)));
    }

    match create(&input, ctx).await {
        Ok(guest) => {
            if let Some(drafts) = &drafts {
                drafts.clear(ADD_GUEST_FORM)?;
            }
            if ctx.json_output {
                print_json(&guest)
            } else {
                let reg = guest.reg_num.as_deref().unwrap_or("-");
                print_success(&format!("Guest added: {} ({})", guest.name, reg));
                Ok(())
            }
        }
        Err(e) => {
            keep_draft(drafts.as_ref(), &form)?;
            Err(e)
        }
    }
}

async fn create(input: &GuestInput, ctx: &Context) -> Result<guestlist_client::Guest> {
    let store = ctx.signed_in().await?;
    store.client().guests().create(input).await.map_err(describe)
}

fn keep_draft(drafts: Option<&DraftStore>, form: &GuestDraft) -> Result<()> {
    let Some(drafts) = drafts else {
        return Ok(());
    };
    if form.is_empty() {
        return Ok(());
    }
    drafts.set(ADD_GUEST_FORM, form.to_value()?)?;
    let dim = Style::new().dim();
    eprintln!(
        "{}",
        dim.apply_to("Form saved as a draft; run `guestlist guests add` again to resume.")
    );
    Ok(())
}

async fn cmd_edit(id: &str, fields: GuestFields, ctx: &Context) -> Result<()> {
    let changes = fields.to_draft()?;
    if changes.is_empty() {
        bail!("Nothing to change; pass at least one field flag.");
    }

    let store = ctx.signed_in().await?;
    let guests = store.client().guests();
    let current = guests.get(id).await.map_err(describe)?;
    let input = changes.or(GuestInput::from(&current).into()).to_input();
    let updated = guests.update(id, &input).await.map_err(describe)?;

    if ctx.json_output {
        print_json(&updated)
    } else {
        print_success(&format!("Guest updated: {}", updated.name));
        Ok(())
    }
}

async fn cmd_delete(id: &str, yes: bool, ctx: &Context) -> Result<()> {
    let store = ctx.signed_in().await?;
    let guests = store.client().guests();

    if !yes {
        let guest = guests.get(id).await.map_err(describe)?;
        if !confirm(&format!("Delete {} <{}>?", guest.name, guest.email))? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    guests.delete(id).await.map_err(describe)?;
    print_success("Guest deleted");
    Ok(())
}

async fn cmd_export(output: PathBuf, order: SortArgs, ctx: &Context) -> Result<()> {
    let store = ctx.signed_in().await?;
    let mut guests = store.client().guests().list().await.map_err(describe)?;
    if let Some(column) = order.sort {
        sort_guests(&mut guests, column, order.desc);
    }

    let file = std::fs::File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_csv(file, &guests)?;

    print_success(&format!(
        "Exported {} guest(s) to {}",
        guests.len(),
        output.display()
    ));
    Ok(())
}
