//! Plain-text reports printed after a run.

use std::io::{self, Write};

use crate::error::QueryError;
use crate::index::ResultIndex;
use crate::source::FeedSnapshot;

/// List every updated source.
pub fn write_updates(out: &mut impl Write, index: &ResultIndex) -> io::Result<()> {
    let updated = match index.updated() {
        Ok(updated) => updated,
        Err(_) => return writeln!(out, "No new feeds"),
    };

    writeln!(out, "There are channels that got updated:")?;
    for snapshot in updated {
        let when = snapshot
            .observed_at()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| snapshot.observed_at_ms.to_string());
        writeln!(
            out,
            "\n{}  [{}]  updated at {}  ({} new)",
            snapshot.display_name,
            snapshot.channel_title,
            when,
            snapshot.items.len()
        )?;
    }
    Ok(())
}

/// Print every new item of the source named `name`.
pub fn write_source(out: &mut impl Write, index: &ResultIndex, name: &str) -> io::Result<()> {
    match index.find(name) {
        Ok(snapshot) => write_items(out, snapshot),
        Err(QueryError::EmptyResultSet) => writeln!(out, "Nothing new in this run."),
        Err(QueryError::NotFound(_)) => writeln!(
            out,
            "Nothing new found for {name:?}. Check the spelling or try again later."
        ),
    }
}

fn write_items(out: &mut impl Write, snapshot: &FeedSnapshot) -> io::Result<()> {
    writeln!(out, "Showing all new posts from {}", snapshot.display_name)?;
    for item in &snapshot.items {
        writeln!(out)?;
        writeln!(out, "Post title       -> {}", item.title)?;
        writeln!(out, "Post link        -> {}", item.link)?;
        writeln!(out, "Post description -> {}", item.description)?;
        writeln!(out, "Publication date -> {}", item.display_date())?;
        if let Some(enclosure) = &item.enclosure {
            writeln!(out, "Enclosure type   -> {}", enclosure.mime_type)?;
            writeln!(out, "Enclosure length -> {}", enclosure.length)?;
            writeln!(out, "Enclosure URL    -> {}", enclosure.url)?;
        }
    }
    Ok(())
}
