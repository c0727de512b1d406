//! History persistence: a sequence of complete lines, each followed by a
//! single NUL byte on disk. Two free functions, load and save; no
//! in-process browsing cursor (that job belongs to the history zipper
//! living inside `editor::Editor`).

use std::io::Read;
use std::path::Path;

const SEPARATOR: u8 = 0x00;

/// Load history lines from `path`, most-recent-last as stored on disk.
///
/// Returns an empty list if the file does not exist (open-failure is the
/// one error this crate silently suppresses). Adjacent separators (an empty
/// line) are skipped on load — asymmetric with `save_history`, which will
/// faithfully persist empty lines written by the caller.
pub fn load_history(path: impl AsRef<Path>) -> std::io::Result<Vec<String>> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    match std::fs::File::open(path) {
        Ok(mut f) => {
            f.read_to_end(&mut bytes)?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::trace!("history file {} absent, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    }

    let lines: Vec<String> = bytes
        .split(|&b| b == SEPARATOR)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    log::trace!(
        "loaded {} history line(s) from {}",
        lines.len(),
        path.display()
    );
    Ok(lines)
}

/// Write `lines` to `path`, each followed by a single NUL byte, serially.
/// Unlike `load_history`, empty lines are written faithfully.
pub fn save_history(path: impl AsRef<Path>, lines: &[String]) -> std::io::Result<()> {
    let path = path.as_ref();
    let mut out = Vec::new();
    for line in lines {
        out.extend_from_slice(line.as_bytes());
        out.push(SEPARATOR);
    }
    std::fs::write(path, &out)?;
    log::trace!(
        "saved {} history line(s) to {}",
        lines.len(),
        path.display()
    );
    Ok(())
}
