use std::{
    fs,
    io::Write as _,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::foundation::error::{CardsheetError, CardsheetResult};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> CardsheetResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CardsheetError::io(
                format!("create output directory '{}'", parent.display()),
                e,
            )
        })?;
    }
    Ok(())
}

/// Write `bytes` to `path` so that readers only ever observe the complete file.
///
/// Data goes to a hidden sibling first, is synced, then renamed over `path`. On failure the
/// temporary file is removed and `path` is left untouched.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> CardsheetResult<()> {
    ensure_parent_dir(path)?;
    let tmp = temp_sibling(path);

    let written = fs::File::create(&tmp).and_then(|mut f| {
        f.write_all(bytes)?;
        f.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(CardsheetError::io(
            format!("write temporary file '{}'", tmp.display()),
            e,
        ));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CardsheetError::io(format!("move output into '{}'", path.display()), e)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{n}.part", std::process::id()))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
