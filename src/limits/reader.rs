use crate::limits::LimitExceeded;
use std::io::{self, Read};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// A read-only byte source that fails once a byte ceiling is exceeded
///
/// The reader counts every byte handed out by the underlying source. As soon
/// as the running total would pass `limit`, the read that crossed it fails
/// with an error carrying [`LimitExceeded`] and delivers none of its bytes. The wrapper implements neither
/// seeking nor writing; dropping it drops (and so closes) the inner source.
#[derive(Debug)]
pub struct BoundedReader<R> {
    inner: R,
    limit: u64,
    bytes_read: u64,
}

impl<R> BoundedReader<R> {
    /// Wraps `inner`, allowing at most `limit` bytes to be read from it
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            bytes_read: 0,
        }
    }

    /// Total number of bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// The configured ceiling
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Unwraps the reader, returning the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Accounts for `read` new bytes, refusing them if they pass the ceiling
    fn record(&mut self, read: usize) -> io::Result<()> {
        let total = self.bytes_read + read as u64;
        if total > self.limit {
            return Err(LimitExceeded { limit: self.limit }.into());
        }
        self.bytes_read = total;
        Ok(())
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if let Err(err) = self.record(read) {
            buf[..read].fill(0);
            return Err(err);
        }
        Ok(read)
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for BoundedReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        let read = buf.filled().len() - before;
        if let Err(err) = this.record(read) {
            // an erroring read must not hand out any bytes
            buf.set_filled(before);
            return Poll::Ready(Err(err));
        }
        Poll::Ready(Ok(()))
    }
}
