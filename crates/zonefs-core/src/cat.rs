use tokio::io::AsyncWrite;
use tracing::{debug, error, info, instrument};

use crate::classify::classify;
use crate::error::CatError;
use crate::path::{resolve, SessionContext};
use crate::stream::{stream_entry, CatOptions};
use crate::traits::RemoteStore;

/// What a successful [`display_contents`] call streamed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatSummary {
    pub objects: usize,
    pub bytes: u64,
}

/// Write the content of every path in `paths` to `sink`, in order.
///
/// Stops at the first failure. Output already written for earlier paths is
/// left in place and later paths are not touched.
pub async fn display_contents<S, W>(
    store: &dyn RemoteStore,
    paths: &[S],
    ctx: &SessionContext,
    sink: &mut W,
    options: &CatOptions,
) -> Result<CatSummary, CatError>
where
    S: AsRef<str>,
    W: AsyncWrite + Unpin + ?Sized,
{
    if paths.is_empty() {
        let err = CatError::InvalidArguments;
        error!(error = %err, "nothing to display");
        return Err(err);
    }

    let mut summary = CatSummary::default();
    for raw in paths {
        summary.bytes += cat_one(store, raw.as_ref(), ctx, sink, options).await?;
        summary.objects += 1;
    }

    info!(
        objects = summary.objects,
        bytes = summary.bytes,
        "displayed contents"
    );
    Ok(summary)
}

/// Resolve, classify and stream a single input path.
#[instrument(skip(store, ctx, sink, options))]
pub async fn cat_one<W>(
    store: &dyn RemoteStore,
    raw: &str,
    ctx: &SessionContext,
    sink: &mut W,
    options: &CatOptions,
) -> Result<u64, CatError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let path = resolve(raw, ctx);
    debug!(resolved = %path, "resolved path");

    let entry = classify(store, &path).await?;
    stream_entry(store, &entry, sink, options).await
}
