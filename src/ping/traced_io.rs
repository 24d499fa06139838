use std::io;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Timestamps stamped by a [`TracedIo`] as the request goes out and the
/// response comes back. Each mark is set once, on the first occurrence.
#[derive(Debug, Default)]
pub struct TraceMarks {
    wrote_request: OnceLock<Instant>,
    first_byte: OnceLock<Instant>,
}

impl TraceMarks {
    /// When the first flush after a write completed, i.e. the request head
    /// left the client.
    pub fn wrote_request(&self) -> Option<Instant> {
        self.wrote_request.get().copied()
    }

    /// When the first byte of application data was read back.
    pub fn first_byte(&self) -> Option<Instant> {
        self.first_byte.get().copied()
    }
}

/// Wraps a stream and records [`TraceMarks`] while the HTTP client drives it.
pub struct TracedIo<T> {
    inner: T,
    wrote: bool,
    marks: Arc<TraceMarks>,
}

impl<T> TracedIo<T> {
    pub fn new(inner: T) -> (Self, Arc<TraceMarks>) {
        let marks = Arc::new(TraceMarks::default());
        let io = Self {
            inner,
            wrote: false,
            marks: marks.clone(),
        };
        (io, marks)
    }
}

impl<T: AsyncRead + Unpin> AsyncRead for TracedIo<T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let res = Pin::new(&mut this.inner).poll_read(cx, buf);
        if matches!(res, Poll::Ready(Ok(()))) && buf.filled().len() > before {
            let _ = this.marks.first_byte.set(Instant::now());
        }
        res
    }
}

impl<T: AsyncWrite + Unpin> AsyncWrite for TracedIo<T> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let res = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = res {
            this.wrote |= n > 0;
        }
        res
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let res = Pin::new(&mut this.inner).poll_write_vectored(cx, bufs);
        if let Poll::Ready(Ok(n)) = res {
            this.wrote |= n > 0;
        }
        res
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let res = Pin::new(&mut this.inner).poll_flush(cx);
        if this.wrote && matches!(res, Poll::Ready(Ok(()))) {
            let _ = this.marks.wrote_request.set(Instant::now());
        }
        res
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
