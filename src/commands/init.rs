use crate::areas::store::Store;
use anyhow::Context;
use std::io::Write;

pub fn init(store: &Store, writer: &mut impl Write) -> anyhow::Result<()> {
    store
        .create_dirs()
        .context("Failed to create the store directory layout")?;

    write!(
        writer,
        "Initialized package store at {}",
        store.path().display()
    )?;

    Ok(())
}
