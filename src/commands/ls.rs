use crate::areas::store::Store;
use colored::Colorize;
use std::io::Write;

/// Print one line per `(package, tag, instance)` row, Docker-style.
pub fn ls(store: &Store, writer: &mut impl Write) -> anyhow::Result<()> {
    let rows = store.list_packages()?;

    if rows.is_empty() {
        writeln!(writer, "No packages installed")?;
        return Ok(());
    }

    for (name, tag, instance) in rows {
        // pad before coloring so the ANSI codes don't skew the columns
        writeln!(
            writer,
            "{} {} {}",
            format!("{name:<32}").bold(),
            format!("{tag:<16}").green(),
            instance[..8].dimmed()
        )?;
    }

    Ok(())
}
