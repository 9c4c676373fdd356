//! One HTTP GET attempt streamed straight into an artifact file.

use curl::easy::Easy;
use std::cell::{Cell, RefCell};
use std::path::Path;

use crate::retry::FetchError;
use crate::storage::ArtifactWriter;

use super::FetchOptions;

/// Downloads `url` into `dest` with a single attempt on a reused easy handle.
///
/// Only the body of a final 200 response is written; redirect and error
/// bodies are discarded. The artifact appears at `dest` only on success.
/// Returns the number of body bytes written.
pub(super) fn download_once(
    easy: &mut Easy,
    url: &str,
    dest: &Path,
    opts: &FetchOptions,
) -> Result<u64, FetchError> {
    // reset() keeps the connection cache, so workers still reuse connections.
    easy.reset();
    easy.url(url).map_err(FetchError::Transport)?;
    easy.follow_location(true).map_err(FetchError::Transport)?;
    easy.max_redirections(10).map_err(FetchError::Transport)?;
    easy.connect_timeout(opts.connect_timeout).map_err(FetchError::Transport)?;
    easy.timeout(opts.timeout).map_err(FetchError::Transport)?;
    easy.useragent(&opts.user_agent).map_err(FetchError::Transport)?;

    let status: Cell<Option<u32>> = Cell::new(None);
    let writer: RefCell<Option<ArtifactWriter>> = RefCell::new(None);
    let storage_error: RefCell<Option<std::io::Error>> = RefCell::new(None);

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(Some(code));
                }
                true
            })
            .map_err(FetchError::Transport)?;
        transfer
            .write_function(|data| {
                if status.get() != Some(200) {
                    return Ok(data.len());
                }
                let mut slot = writer.borrow_mut();
                if slot.is_none() {
                    match ArtifactWriter::create(dest) {
                        Ok(w) => *slot = Some(w),
                        Err(e) => {
                            *storage_error.borrow_mut() = Some(e);
                            return Ok(0); // abort transfer
                        }
                    }
                }
                let written = match slot.as_mut() {
                    Some(w) => w.write(data),
                    None => return Ok(0),
                };
                match written {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        *storage_error.borrow_mut() = Some(e);
                        Ok(0)
                    }
                }
            })
            .map_err(FetchError::Transport)?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if e.is_write_error() {
            if let Some(io_err) = storage_error.into_inner() {
                return Err(FetchError::Storage(io_err));
            }
        }
        return Err(FetchError::Transport(e));
    }

    let code = easy.response_code().map_err(FetchError::Transport)?;
    if code != 200 {
        return Err(FetchError::Http(code));
    }

    // A 200 with an empty body never reached the write callback.
    let writer = match writer.into_inner() {
        Some(w) => w,
        None => ArtifactWriter::create(dest)?,
    };
    Ok(writer.finish()?)
}

/// Parses `HTTP/1.1 404 Not Found` / `HTTP/2 200` header lines.
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
