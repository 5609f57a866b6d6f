//! Accompanies command - registered accompanying guests.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use serde_json::Value;

use super::{Context, describe, print_json};

/// Arguments for the accompanies command.
#[derive(Args, Debug)]
pub struct AccompaniesArgs {
    #[command(subcommand)]
    pub command: AccompaniesCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccompaniesCommand {
    /// List accompanying-guest registrations
    List,
}

/// Run the accompanies command.
pub async fn run(args: AccompaniesArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AccompaniesCommand::List => cmd_list(ctx).await,
    }
}

async fn cmd_list(ctx: &Context) -> Result<()> {
    let store = ctx.signed_in().await?;
    let groups = store.client().accompanies().list().await.map_err(describe)?;

    if ctx.json_output {
        return print_json(&groups);
    }

    print_groups(&groups);
    Ok(())
}

pub fn print_groups(groups: &[Value]) {
    let dim = Style::new().dim();
    println!("{}", style("Accompanying Guests").bold());
    println!("{}", dim.apply_to("─".repeat(50)));

    if groups.is_empty() {
        println!("{}", dim.apply_to("No registrations yet"));
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        println!("{}. {}", i + 1, summarize(group));
        if let Some(entries) = group.get("accompanies").and_then(Value::as_array) {
            for entry in entries {
                println!("     {}", dim.apply_to(summarize(entry)));
            }
        }
    }
}

/// One-line rendering of a JSON record: scalar fields as `key: value`,
/// arrays as a count. Ids are omitted.
pub fn summarize(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .filter_map(|(key, v)| match v {
                Value::String(s) => Some(format!("{key}: {s}")),
                Value::Number(n) => Some(format!("{key}: {n}")),
                Value::Bool(b) => Some(format!("{key}: {b}")),
                Value::Array(items) => Some(format!("{key}: {} item(s)", items.len())),
                Value::Null | Value::Object(_) => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_object() {
        let group = json!({
            "_id": "a1",
            "guestName": "Asha",
            "regNum": "REG-001",
            "accompanies": [{"name": "Ravi"}],
            "meta": {"x": 1},
            "note": null
        });
        let line = summarize(&group);
        let mut parts: Vec<&str> = line.split(", ").collect();
        parts.sort();
        assert_eq!(
            parts,
            vec!["accompanies: 1 item(s)", "guestName: Asha", "regNum: REG-001"]
        );
    }

    #[test]
    fn test_summarize_scalars() {
        assert_eq!(summarize(&json!("plain")), "plain");
        assert_eq!(summarize(&json!(3)), "3");
    }
}
