//! Suppression of native solver output
//!
//! CBC writes its progress log straight to file descriptor 1, which would interleave with
//! the cutting report or corrupt JSON written to stdout. A [`GagHandle`] redirects the
//! stream to the null device for as long as it lives.
//!
//! A stream can only be redirected once at a time per process, so handles are shared:
//! every live handle for a stream points at the same underlying [`Gag`], and the stream is
//! restored when the last one is dropped.

use gag::Gag;
use std::sync::{Arc, Mutex, Weak};

/// A shared redirection of stdout or stderr
pub struct GagHandle {
    _gag: Arc<Gag>,
}

impl GagHandle {
    /// Suppress stdout until every stdout handle is dropped.
    pub fn stdout() -> Result<Self, std::io::Error> {
        STDOUT_GAG_MANAGER.get_gag()
    }

    /// Suppress stderr until every stderr handle is dropped.
    pub fn stderr() -> Result<Self, std::io::Error> {
        STDERR_GAG_MANAGER.get_gag()
    }
}

struct GagManager {
    weak_gag: Mutex<Weak<Gag>>,
    create_gag: fn() -> Result<Gag, std::io::Error>,
}

impl GagManager {
    const fn new(create_fn: fn() -> Result<Gag, std::io::Error>) -> Self {
        Self {
            weak_gag: Mutex::new(Weak::new()),
            create_gag: create_fn,
        }
    }

    /// Reuse the live gag if there is one, otherwise create it.
    ///
    /// The lock is held across creation so two threads never race to redirect the same
    /// stream.
    fn get_gag(&self) -> Result<GagHandle, std::io::Error> {
        let mut weak_gag = self
            .weak_gag
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(gag) = weak_gag.upgrade() {
            return Ok(GagHandle { _gag: gag });
        }

        let gag = Arc::new((self.create_gag)()?);
        *weak_gag = Arc::downgrade(&gag);

        Ok(GagHandle { _gag: gag })
    }
}

static STDOUT_GAG_MANAGER: GagManager = GagManager::new(Gag::stdout);
static STDERR_GAG_MANAGER: GagManager = GagManager::new(Gag::stderr);

/// Suppress both stdout and stderr
pub fn suppress_output() -> Result<(GagHandle, GagHandle), std::io::Error> {
    Ok((GagHandle::stdout()?, GagHandle::stderr()?))
}
