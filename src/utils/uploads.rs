use std::path::PathBuf;

use crate::Config;

/// Absolute uploads root; upload columns hold paths relative to it.
pub fn get_uploads_dir(config: &Config) -> std::io::Result<PathBuf> {
    let uploads = PathBuf::from(config.app().uploads());
    if uploads.is_absolute() {
        return Ok(uploads);
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd.join(uploads))
}
