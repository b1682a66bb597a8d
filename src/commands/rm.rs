use crate::areas::store::Store;
use crate::commands::PackageSpec;
use std::io::Write;

pub fn rm(store: &Store, spec: &PackageSpec, writer: &mut impl Write) -> anyhow::Result<()> {
    let removed = store.remove_package(spec.team(), &spec.user, &spec.package)?;

    writeln!(
        writer,
        "Removed package {} ({} objects reclaimed)",
        spec,
        removed.len()
    )?;

    Ok(())
}
