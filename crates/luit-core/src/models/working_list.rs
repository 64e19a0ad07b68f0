use serde::Serialize;

use super::image::UploadedImageRef;

/// Ordered, caller-owned list of uploaded images for one form.
///
/// Holds at most `max_images` entries. The list is lent (`&mut`) to a batch
/// upload, which appends in completion order; nothing else mutates it while
/// the batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingList {
    max_images: usize,
    images: Vec<UploadedImageRef>,
}

impl WorkingList {
    pub fn new(max_images: usize) -> Self {
        Self {
            max_images,
            images: Vec::with_capacity(max_images),
        }
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= self.max_images
    }

    /// Free slots left before the cap is reached.
    pub fn remaining(&self) -> usize {
        self.max_images.saturating_sub(self.images.len())
    }

    /// Append an image. Returns `false` (and drops it) when the list is full.
    pub fn push(&mut self, image: UploadedImageRef) -> bool {
        if self.is_full() {
            return false;
        }
        self.images.push(image);
        true
    }

    /// Remove the image at `index`, e.g. when the user deletes it from the form.
    pub fn remove(&mut self, index: usize) -> Option<UploadedImageRef> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<&UploadedImageRef> {
        self.images.first()
    }

    pub fn as_slice(&self) -> &[UploadedImageRef] {
        &self.images
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadedImageRef> {
        self.images.iter()
    }
}

impl<'a> IntoIterator for &'a WorkingList {
    type Item = &'a UploadedImageRef;
    type IntoIter = std::slice::Iter<'a, UploadedImageRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
