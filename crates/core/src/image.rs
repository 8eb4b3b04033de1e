//! Image capability trait.
//!
//! The store never inspects pixel data: an image is a filename, three
//! dimensions and an opaque byte buffer. Anything that can answer those five
//! questions can be written to the `images` or `mosaic_images` tables, so
//! callers keep their own decoded representations and implement
//! [`ImageData`] on them instead of converting up front.

use serde::{Deserialize, Serialize};

/// Read access to an image record.
///
/// `rows`, `cols` and `comps` are stored as given; nothing checks that
/// `data.len() == rows * cols * comps` since encoded formats (PNG, JPEG)
/// are stored as-is.
pub trait ImageData {
    fn filename(&self) -> &str;
    fn rows(&self) -> i32;
    fn cols(&self) -> i32;
    fn comps(&self) -> i32;
    fn data(&self) -> &[u8];
}

impl<T: ImageData + ?Sized> ImageData for &T {
    fn filename(&self) -> &str {
        (**self).filename()
    }
    fn rows(&self) -> i32 {
        (**self).rows()
    }
    fn cols(&self) -> i32 {
        (**self).cols()
    }
    fn comps(&self) -> i32 {
        (**self).comps()
    }
    fn data(&self) -> &[u8] {
        (**self).data()
    }
}

impl<T: ImageData + ?Sized> ImageData for Box<T> {
    fn filename(&self) -> &str {
        (**self).filename()
    }
    fn rows(&self) -> i32 {
        (**self).rows()
    }
    fn cols(&self) -> i32 {
        (**self).cols()
    }
    fn comps(&self) -> i32 {
        (**self).comps()
    }
    fn data(&self) -> &[u8] {
        (**self).data()
    }
}

/// Owned, plain implementation of [`ImageData`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub filename: String,
    pub rows: i32,
    pub cols: i32,
    pub comps: i32,
    #[serde(with = "crate::base64_data")]
    pub data: Vec<u8>,
}

impl ImagePayload {
    pub fn new(
        filename: impl Into<String>,
        rows: i32,
        cols: i32,
        comps: i32,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            rows,
            cols,
            comps,
            data,
        }
    }

    /// Copy any [`ImageData`] into an owned payload.
    pub fn from_image(image: &impl ImageData) -> Self {
        Self {
            filename: image.filename().to_string(),
            rows: image.rows(),
            cols: image.cols(),
            comps: image.comps(),
            data: image.data().to_vec(),
        }
    }
}

impl ImageData for ImagePayload {
    fn filename(&self) -> &str {
        &self.filename
    }
    fn rows(&self) -> i32 {
        self.rows
    }
    fn cols(&self) -> i32 {
        self.cols
    }
    fn comps(&self) -> i32 {
        self.comps
    }
    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grey {
        pixels: Vec<u8>,
    }

    impl ImageData for Grey {
        fn filename(&self) -> &str {
            "grey.raw"
        }
        fn rows(&self) -> i32 {
            2
        }
        fn cols(&self) -> i32 {
            2
        }
        fn comps(&self) -> i32 {
            1
        }
        fn data(&self) -> &[u8] {
            &self.pixels
        }
    }

    #[test]
    fn from_image_copies_every_field() {
        let grey = Grey {
            pixels: vec![0, 64, 128, 255],
        };
        let payload = ImagePayload::from_image(&grey);
        assert_eq!(payload, ImagePayload::new("grey.raw", 2, 2, 1, vec![0, 64, 128, 255]));
    }

    #[test]
    fn boxed_trait_objects_forward_to_inner_image() {
        let images: Vec<Box<dyn ImageData>> = vec![
            Box::new(Grey { pixels: vec![1] }),
            Box::new(ImagePayload::new("a.png", 10, 20, 3, vec![9, 9])),
        ];
        let names: Vec<&str> = images.iter().map(|i| i.filename()).collect();
        assert_eq!(names, ["grey.raw", "a.png"]);
        assert_eq!(images[1].data(), &[9, 9]);
        assert_eq!(images[1].comps(), 3);
    }

    #[test]
    fn json_round_trip_keeps_pixel_bytes() {
        let payload = ImagePayload::new("a.png", 10, 20, 3, (0..=255).collect());
        let json = serde_json::to_string(&payload).unwrap();
        let back: ImagePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn data_is_encoded_as_base64() {
        let payload = ImagePayload::new("a.png", 1, 1, 3, vec![0, 1, 2, 3, 4]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["data"], "AAECAwQ=");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let json = r#"{"filename":"a.png","rows":1,"cols":1,"comps":1,"data":"not base64!"}"#;
        assert!(serde_json::from_str::<ImagePayload>(json).is_err());
    }

    #[test]
    fn empty_payload_is_valid() {
        let payload = ImagePayload::new("empty.bin", 0, 0, 0, Vec::new());
        assert!(payload.data().is_empty());
    }
}
