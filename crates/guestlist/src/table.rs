//! Guest table rendering: sorting, HTML stripping, fixed-width rows.

use std::cmp::Ordering;
use std::sync::LazyLock;

use clap::ValueEnum;
use console::{Style, style};
use guestlist_client::Guest;
use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Column a guest table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    RegNum,
    Name,
    Email,
    Mobile,
    Quota,
}

impl SortColumn {
    /// Parse the short names used by console commands.
    pub fn parse(s: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(s, true).ok()
    }
}

/// Sort `guests` in place. Text columns compare case-insensitively; guests
/// without a registration number sort first.
pub fn sort_guests(guests: &mut [Guest], column: SortColumn, descending: bool) {
    guests.sort_by(|a, b| {
        let ord = compare(a, b, column);
        if descending { ord.reverse() } else { ord }
    });
}

fn compare(a: &Guest, b: &Guest, column: SortColumn) -> Ordering {
    match column {
        SortColumn::RegNum => a.reg_num.cmp(&b.reg_num),
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        SortColumn::Mobile => a.mobile.cmp(&b.mobile),
        SortColumn::Quota => a.accompany_quota.cmp(&b.accompany_quota),
    }
}

/// Plain text of an HTML fragment.
pub fn strip_html(html: &str) -> String {
    TAG.replace_all(html, "").replace("&nbsp;", " ").trim().to_string()
}

/// Shorten to `max_len` characters on one line.
pub fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_len {
        s
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// Print guests as an aligned table.
pub fn print_guests(guests: &[Guest]) {
    let dim = Style::new().dim();

    println!(
        "{}",
        style(format!(
            "{:<10} {:<24} {:<28} {:<15} {:>5}  {}",
            "Reg. No.", "Full Name", "Email", "Mobile", "Quota", "Welcome Message"
        ))
        .bold()
    );
    println!("{}", dim.apply_to("─".repeat(100)));

    if guests.is_empty() {
        println!("{}", dim.apply_to("No guests found"));
        return;
    }

    for guest in guests {
        let message = guest
            .description
            .as_deref()
            .map(strip_html)
            .unwrap_or_default();
        println!(
            "{:<10} {:<24} {:<28} {:<15} {:>5}  {}",
            guest.reg_num.as_deref().unwrap_or("-"),
            truncate(&guest.name, 24),
            truncate(&guest.email, 28),
            guest.mobile,
            guest.accompany_quota,
            dim.apply_to(truncate(&message, 40))
        );
    }

    println!();
    println!("{}", dim.apply_to(format!("{} guest(s)", guests.len())));
}

/// Print one guest in full.
pub fn print_guest(guest: &Guest) {
    let dim = Style::new().dim();
    println!("{}", style(&guest.name).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!("ID:              {}", guest.id);
    println!("Reg. No.:        {}", guest.reg_num.as_deref().unwrap_or("-"));
    println!("Email:           {}", guest.email);
    println!("Mobile:          {}", guest.mobile);
    println!("Accompany quota: {}", guest.accompany_quota);
    if let Some(description) = guest.description.as_deref().map(strip_html)
        && !description.is_empty()
    {
        println!();
        println!("{description}");
    }
}
