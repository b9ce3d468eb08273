use std::path::Path;
use std::{fs, io};

use crate::data_path;

const LOG_FILE: &str = "output.log";
const PREVIOUS_LOG_FILE: &str = "output.log.old";

/// Opens a fresh log for this run under the data directory, keeping the last
/// run's log as `output.log.old`.
pub fn file() -> Result<fs::File, Error> {
    open_in(&data_path(None))
}

fn open_in(dir: &Path) -> Result<fs::File, Error> {
    fs::create_dir_all(dir)?;

    let current = dir.join(LOG_FILE);
    match fs::rename(&current, dir.join(PREVIOUS_LOG_FILE)) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    Ok(fs::File::create(current)?)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    SetLog(#[from] log::SetLoggerError),
}
