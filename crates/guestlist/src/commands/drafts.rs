//! Drafts command - inspect and discard saved form drafts.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::{Style, style};

use super::{Context, print_json, print_success};

/// Arguments for the drafts command.
#[derive(Args, Debug)]
pub struct DraftsArgs {
    #[command(subcommand)]
    pub command: DraftsCommand,
}

#[derive(Subcommand, Debug)]
pub enum DraftsCommand {
    /// List saved drafts
    List,

    /// Show a saved draft
    Show {
        /// Form key (e.g. add-guest-form)
        key: String,
    },

    /// Discard a saved draft
    Clear {
        /// Form key (e.g. add-guest-form)
        key: String,
    },
}

/// Run the drafts command.
pub async fn run(args: DraftsArgs, ctx: &Context) -> Result<()> {
    let drafts = ctx.drafts();
    let dim = Style::new().dim();

    match args.command {
        DraftsCommand::List => {
            let all = drafts.list()?;
            if ctx.json_output {
                let mut map = serde_json::Map::new();
                for (key, draft) in all {
                    map.insert(key, serde_json::to_value(draft)?);
                }
                return print_json(&map);
            }

            println!("{}", style("Form Drafts").bold());
            println!("{}", dim.apply_to("─".repeat(50)));
            if all.is_empty() {
                println!("{}", dim.apply_to("No drafts saved"));
            }
            for (key, draft) in all {
                println!(
                    "{}  {}",
                    key,
                    dim.apply_to(draft.saved_at.format("%Y-%m-%d %H:%M UTC"))
                );
            }
            if ctx.verbose {
                println!();
                println!("{}", dim.apply_to(drafts.path().display()));
            }
        }
        DraftsCommand::Show { key } => {
            let Some(draft) = drafts.get(&key)? else {
                bail!("No draft saved for '{key}'");
            };
            if ctx.json_output {
                return print_json(&draft);
            }
            println!(
                "{}  {}",
                style(&key).bold(),
                dim.apply_to(draft.saved_at.format("%Y-%m-%d %H:%M UTC"))
            );
            println!("{}", serde_json::to_string_pretty(&draft.values)?);
        }
        DraftsCommand::Clear { key } => {
            if drafts.clear(&key)? {
                print_success(&format!("Draft '{key}' discarded"));
            } else {
                println!("{}", dim.apply_to(format!("No draft saved for '{key}'")));
            }
        }
    }

    Ok(())
}
