//! Still images produced by the capture flows.

use std::sync::Arc;

/// An encoded still frame plus its decoded pixels.
///
/// The data URI is what the browser produced (`image/jpeg`); the RGBA buffer
/// backs the on-screen textures. Both are immutable and shared, so cloning a
/// `CapturedImage` to hand it to the session is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data_uri: Arc<str>,
    size: [usize; 2],
    rgba: Arc<[u8]>,
}

impl CapturedImage {
    /// Returns `None` when the pixel buffer does not match `size`.
    pub fn new(data_uri: impl Into<Arc<str>>, size: [usize; 2], rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != size[0] * size[1] * 4 {
            return None;
        }
        Some(Self {
            data_uri: data_uri.into(),
            size,
            rgba: rgba.into(),
        })
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Whether `other` is a clone of this very frame, not merely equal pixels.
    pub fn same_frame(&self, other: &CapturedImage) -> bool {
        Arc::ptr_eq(&self.data_uri, &other.data_uri)
    }

    /// Approximate encoded size in bytes, for log output.
    pub fn encoded_len(&self) -> usize {
        self.data_uri.len()
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("size", &self.size)
            .field("encoded_len", &self.encoded_len())
            .finish()
    }
}

/// Fit `native` inside `target` keeping the aspect ratio. Frames already
/// smaller than the target keep their size; zero dimensions fall back to the
/// target.
pub fn fit_within(native: [u32; 2], target: [u32; 2]) -> [u32; 2] {
    let [w, h] = native;
    if w == 0 || h == 0 {
        return target;
    }
    let [tw, th] = target;
    if w <= tw && h <= th {
        return native;
    }
    let scale = f64::min(tw as f64 / w as f64, th as f64 / h as f64);
    [
        ((w as f64 * scale).round() as u32).max(1),
        ((h as f64 * scale).round() as u32).max(1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffers() {
        assert!(CapturedImage::new("data:image/jpeg;base64,", [2, 2], vec![0; 16]).is_some());
        assert!(CapturedImage::new("data:image/jpeg;base64,", [2, 2], vec![0; 15]).is_none());
    }

    #[test]
    fn clones_share_pixels() {
        let img = CapturedImage::new("data:x", [1, 1], vec![1, 2, 3, 255]).unwrap();
        let copy = img.clone();
        assert_eq!(copy, img);
        assert_eq!(copy.rgba().as_ptr(), img.rgba().as_ptr());
        assert!(copy.same_frame(&img));

        let other = CapturedImage::new("data:x", [1, 1], vec![1, 2, 3, 255]).unwrap();
        assert_eq!(other, img);
        assert!(!other.same_frame(&img));
    }

    #[test]
    fn fit_within_keeps_aspect_ratio() {
        assert_eq!(fit_within([1920, 1080], [1280, 720]), [1280, 720]);
        assert_eq!(fit_within([1280, 960], [720, 720]), [720, 540]);
        assert_eq!(fit_within([640, 480], [1280, 720]), [640, 480]);
        assert_eq!(fit_within([0, 0], [720, 720]), [720, 720]);
    }
}
