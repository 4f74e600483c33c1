use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock serializing writes to a hub's stored record.
///
/// The TUI and any number of CLI invocations may share a hub; each write
/// holds this lock for the duration of the rename.
pub struct HubLock {
    _file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another reshub process may be writing")]
    Timeout { path: PathBuf },
}

impl HubLock {
    /// Acquire the lock on `hub_dir`, waiting up to `timeout`.
    pub fn acquire(hub_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_path = hub_dir.join(".lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LockError::CreateError {
                path: lock_path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        loop {
            match try_flock(&file) {
                Ok(()) => {
                    return Ok(HubLock {
                        _file: file,
                        path: lock_path,
                    });
                }
                Err(_) if start.elapsed() < timeout => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => return Err(LockError::Timeout { path: lock_path }),
            }
        }
    }

    /// Acquire with the default 5 second timeout
    pub fn acquire_default(hub_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(hub_dir, Duration::from_secs(5))
    }
}

impl Drop for HubLock {
    fn drop(&mut self) {
        // flock is released with the file handle
        let _ = fs::remove_file(&self.path);
    }
}

/// Non-blocking exclusive flock on `file`
#[cfg(unix)]
pub(crate) fn try_flock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let fd = file.as_raw_fd();
    let result = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub(crate) fn try_flock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_release_reacquire() {
        let tmp = TempDir::new().unwrap();
        let lock = HubLock::acquire_default(tmp.path());
        assert!(lock.is_ok());
        drop(lock);
        assert!(!tmp.path().join(".lock").exists());
        assert!(HubLock::acquire_default(tmp.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn contention_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = HubLock::acquire_default(tmp.path()).unwrap();
        let second = HubLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }
}
