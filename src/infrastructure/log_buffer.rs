//! Stderr log writer that can be held back while the list display owns the tty.
//!
//! `main` installs [`DeferredStderr`] as the `tracing-subscriber` writer. While a
//! [`HeldLogs`] guard is alive, formatted lines are buffered instead of written,
//! and flushed to stderr when the guard drops.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

static HELD: Mutex<Option<Vec<u8>>> = Mutex::new(None);

fn held() -> MutexGuard<'static, Option<Vec<u8>>> {
    HELD.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `MakeWriter` for stderr that honours [`HeldLogs`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredStderr;

impl<'a> MakeWriter<'a> for DeferredStderr {
    type Writer = DeferredWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DeferredWriter
    }
}

#[derive(Debug)]
pub struct DeferredWriter;

impl Write for DeferredWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match held().as_mut() {
            Some(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if held().is_some() {
            return Ok(());
        }
        io::stderr().flush()
    }
}

/// Buffers log output until dropped.
#[derive(Debug)]
pub struct HeldLogs {
    _private: (),
}

impl HeldLogs {
    pub fn hold() -> Self {
        held().get_or_insert_with(Vec::new);
        Self { _private: () }
    }

    /// Stop buffering and hand back what was collected.
    fn take() -> Vec<u8> {
        held().take().unwrap_or_default()
    }
}

impl Drop for HeldLogs {
    fn drop(&mut self) {
        let buffered = Self::take();
        if !buffered.is_empty() {
            let _ = io::stderr().write_all(&buffered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_held_logs_when_writing_then_buffered_until_taken() {
        let guard = HeldLogs::hold();
        let mut writer = DeferredStderr.make_writer();

        writer.write_all(b"toggled 5\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(held().as_deref(), Some(&b"toggled 5\n"[..]));
        assert_eq!(HeldLogs::take(), b"toggled 5\n".to_vec());
        assert!(held().is_none());
        drop(guard);
        assert!(held().is_none());
    }
}
