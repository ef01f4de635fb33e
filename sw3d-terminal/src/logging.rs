/// Log output for the terminal frontend
///
/// The alternate screen owns stdout and stderr while the app runs, so log
/// records only go to a file, and only when one is requested.
use std::fs::File;
use std::path::Path;

use anyhow::Context as _;

/// Install a global [`log`] logger writing to `path`.
pub fn install(path: &Path, verbose: bool) -> anyhow::Result<()> {
    use log::LevelFilter::{Debug, Error, Off, Trace};

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    simplelog::WriteLogger::init(
        if verbose { Trace } else { Debug },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(Error)
            .build(),
        file,
    )
    .context("failed to initialize logging")?;
    Ok(())
}
