use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf, Take};
use tokio::time::{Instant, Sleep, sleep_until};

use super::error::ProbeError;

/// A reader that refuses to read past an absolute deadline.
///
/// Every read checks the clock first and fails with
/// [`io::ErrorKind::TimedOut`] once the deadline has passed, without
/// touching the inner reader. A read that is still pending when the
/// deadline arrives fails the same way.
pub struct DeadlineReader<R> {
    inner: R,
    deadline: Instant,
    timer: Pin<Box<Sleep>>,
}

impl<R> DeadlineReader<R> {
    pub fn new(inner: R, deadline: Instant) -> Self {
        Self {
            inner,
            deadline,
            timer: Box::pin(sleep_until(deadline)),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "read deadline exceeded")
}

impl<R: AsyncRead + Unpin> AsyncRead for DeadlineReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if Instant::now() >= this.deadline {
            return Poll::Ready(Err(deadline_exceeded()));
        }

        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(res) => Poll::Ready(res),
            Poll::Pending => match this.timer.as_mut().poll(cx) {
                Poll::Ready(()) => Poll::Ready(Err(deadline_exceeded())),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

/// Wrap `inner` so that reads stop at `deadline` and after `limit` bytes.
pub fn bounded<R: AsyncRead + Unpin>(
    inner: R,
    deadline: Instant,
    limit: u64,
) -> Take<DeadlineReader<R>> {
    DeadlineReader::new(inner, deadline).take(limit)
}

const MAX_HEADERS: usize = 64;

/// Read an HTTP response head from `reader` and return its status code.
///
/// At most `limit` bytes are consumed and the whole read must finish within
/// `within`. Anything short of a complete, well formed response head is a
/// [`ProbeError::ProtocolParse`].
pub async fn parse_status<R: AsyncRead + Unpin>(
    reader: R,
    within: Duration,
    limit: u64,
) -> Result<u16, ProbeError> {
    let mut reader = bounded(reader, Instant::now() + within, limit);
    let mut head = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .map_err(|e| ProbeError::ProtocolParse(e.to_string()))?;
        if n == 0 {
            return Err(ProbeError::ProtocolParse(format!(
                "response ended after {} bytes without a complete head",
                head.len()
            )));
        }
        head.extend_from_slice(&chunk[..n]);

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut response = httparse::Response::new(&mut headers);
        match response.parse(&head) {
            Ok(httparse::Status::Complete(_)) => {
                return response
                    .code
                    .ok_or_else(|| ProbeError::ProtocolParse("missing status code".to_string()));
            }
            Ok(httparse::Status::Partial) => continue,
            Err(e) => return Err(ProbeError::ProtocolParse(e.to_string())),
        }
    }
}
