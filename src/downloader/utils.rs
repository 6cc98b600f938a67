// Child process helpers shared by backends

use std::io;
use std::process::{Output, Stdio};

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command as TokioCommand};
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tokio_util::io::ReaderStream;

use super::command::ToolCommand;
use super::errors::DownloadError;

/// Raw media bytes from a running child. Dropping it kills the child.
pub type MediaStream = BoxStream<'static, io::Result<Bytes>>;

const STREAM_CHUNK_SIZE: usize = 64 * 1024;

fn spawn_piped(cmd: &ToolCommand) -> Result<Child, DownloadError> {
    TokioCommand::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DownloadError::spawn(&cmd.program, e))
}

fn drain<R>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf).await?;
        Ok(buf)
    })
}

async fn join_pipe(task: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>, DownloadError> {
    let buf = task
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
    Ok(buf)
}

fn missing_pipe(name: &str) -> DownloadError {
    DownloadError::Io(io::Error::new(
        io::ErrorKind::BrokenPipe,
        format!("{} was not captured", name),
    ))
}

/// Run a command to completion and capture both pipes.
///
/// With `timeout_secs` set the child is killed once the deadline passes.
/// Without it the call waits as long as the tool runs.
pub async fn run_output(
    cmd: &ToolCommand,
    timeout_secs: Option<u64>,
) -> Result<Output, DownloadError> {
    let mut child = spawn_piped(cmd)?;

    let stdout_pipe = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let stderr_pipe = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;
    let stdout_task = drain(stdout_pipe);
    let stderr_task = drain(stderr_pipe);

    let status = match timeout_secs {
        Some(secs) => {
            let waited = timeout(Duration::from_secs(secs), child.wait()).await;
            match waited {
                Ok(status) => status?,
                Err(_) => {
                    let _ = child.kill().await;
                    stdout_task.abort();
                    stderr_task.abort();
                    return Err(DownloadError::Timeout(secs));
                }
            }
        }
        None => child.wait().await?,
    };

    let stdout = join_pipe(stdout_task).await?;
    let stderr = join_pipe(stderr_task).await?;
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Start a command and stream its stdout.
///
/// Waits for the first chunk before returning, so a tool that fails without
/// writing anything is reported as an error rather than an empty stream.
/// After that, a non-zero exit surfaces as an `Err` item at the end of the
/// stream. `permit` is held until the stream ends or is dropped.
pub async fn spawn_stream(
    cmd: &ToolCommand,
    permit: Option<OwnedSemaphorePermit>,
) -> Result<MediaStream, DownloadError> {
    let mut child = spawn_piped(cmd)?;

    let stdout_pipe = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let stderr_pipe = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;
    let stderr_task = drain(stderr_pipe);
    let mut reader = ReaderStream::with_capacity(stdout_pipe, STREAM_CHUNK_SIZE);

    let first = match reader.next().await {
        Some(chunk) => chunk?,
        None => {
            let status = child.wait().await?;
            let stderr = join_pipe(stderr_task).await?;
            if !status.success() {
                return Err(DownloadError::process_failed(status.code(), &stderr));
            }
            tracing::debug!(program = %cmd.program, "tool exited without output");
            return Ok(stream::empty().boxed());
        }
    };

    let program = cmd.program.clone();
    let body = async_stream::try_stream! {
        let _permit = permit;
        let mut sent = first.len() as u64;
        yield first;

        while let Some(chunk) = reader.next().await {
            let chunk = chunk?;
            sent += chunk.len() as u64;
            yield chunk;
        }

        let status = child.wait().await?;
        if !status.success() {
            let stderr = join_pipe(stderr_task).await.unwrap_or_default();
            let err = DownloadError::process_failed(status.code(), &stderr);
            tracing::warn!(%program, bytes = sent, error = %err, "tool failed mid-stream");
            Err::<(), _>(io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        }
        tracing::debug!(%program, bytes = sent, "stream complete");
    };

    Ok(body.boxed())
}
