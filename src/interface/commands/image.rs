//! # Image Command
//!
//! Replies with one resource URL from the image-lookup service. The call blocks the
//! loop for its whole duration.

use crate::domain::error::DispatchFault;
use crate::domain::traits::ImageLookup;

pub async fn handle_image(images: &dyn ImageLookup) -> Result<String, DispatchFault> {
    Ok(images.lookup().await?)
}
