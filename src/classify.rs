use std::path::Path;

use crate::error::ClassifyError;
use crate::model::{Destination, ImageRef};

/// Read the image dimensions and decide its destination.
///
/// The file handle is opened and dropped inside the decoder call, so nothing
/// stays open when the caller goes on to move the file.
pub fn classify(path: &Path) -> Result<(Destination, ImageRef), ClassifyError> {
    let (width, height) = image::image_dimensions(path).map_err(|source| ClassifyError {
        path: path.to_path_buf(),
        source,
    })?;
    let image = ImageRef {
        path: path.to_path_buf(),
        width,
        height,
    };
    tracing::debug!(path = %path.display(), width, height, "classified image");
    Ok((image.destination(), image))
}
