use crate::areas::store::Store;
use std::io::Write;

/// Full-store sweep: seed with every on-disk object so orphans left by
/// interrupted installs are reclaimed too.
pub fn prune(store: &Store, writer: &mut impl Write) -> anyhow::Result<()> {
    let removed = store.prune(store.objects().all_hashes())?;

    writeln!(writer, "Pruned {} unreferenced objects", removed.len())?;

    Ok(())
}
