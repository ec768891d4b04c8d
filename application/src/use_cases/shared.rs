//! Shared helpers for use cases.

use crate::ports::task_service::{ServiceError, TaskServicePort};
use marvin_domain::LabelResolution;
use tracing::debug;

/// Resolve a label name with one `/labels` call; no call when `name` is `None`.
///
/// Returns the resolution and the number of upstream calls made.
pub(crate) async fn resolve_label<S: TaskServicePort + ?Sized>(
    service: &S,
    name: Option<&str>,
) -> Result<(LabelResolution, usize), ServiceError> {
    let Some(name) = name else {
        return Ok((LabelResolution::NotRequested, 0));
    };
    let labels = service.labels().await?;
    let resolution = LabelResolution::resolve(Some(name), &labels);
    debug!(label = name, resolved = ?resolution.label_id(), "Resolved label filter");
    Ok((resolution, 1))
}
