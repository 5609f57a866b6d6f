//! CSV export of the guest table.

use std::io::Write;

use anyhow::Result;
use guestlist_client::Guest;

use crate::table::strip_html;

const HEADERS: [&str; 6] = [
    "Reg. No.",
    "Full Name",
    "Email",
    "Mobile",
    "Accompany Quota",
    "Welcome Message",
];

/// Write `guests` as CSV, welcome messages reduced to plain text.
pub fn write_csv<W: Write>(writer: W, guests: &[Guest]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADERS)?;

    for guest in guests {
        let quota = guest.accompany_quota.to_string();
        let message = guest
            .description
            .as_deref()
            .map(strip_html)
            .unwrap_or_default();
        csv.write_record([
            guest.reg_num.as_deref().unwrap_or(""),
            guest.name.as_str(),
            guest.email.as_str(),
            guest.mobile.as_str(),
            quota.as_str(),
            message.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}
