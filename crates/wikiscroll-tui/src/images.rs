//! Article and fallback images: download, decode, and halfblock rasters
//!
//! Decoded bitmaps live only while their panel is near the viewport; a
//! pruned image is downloaded again if the user scrolls back to it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use image::imageops::FilterType;
use image::DynamicImage;
use ratatui::style::Color;
use tokio::sync::mpsc;
use wikiscroll_core::AppConfig;

use crate::event::ImageLoadResult;

/// Decoded images are shrunk to this bound before caching
const MAX_DECODED_DIMENSION: u32 = 640;
const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Load state of one image URL
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Ready(Arc<DynamicImage>),
    Failed(String),
}

/// Image resampled to a panel: one (top, bottom) color pair per cell
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: u16,
    pub height: u16,
    cells: Vec<(Color, Color)>,
}

impl Raster {
    /// Cover `width` x `height` cells, cropping the overflow like `object-fit: cover`
    pub fn cover(image: &DynamicImage, width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixel_height = u32::from(height) * 2; // Halfblocks = 2 pixels per row

        let resized = image.resize_to_fill(u32::from(width), pixel_height, FilterType::Triangle);
        let rgba = resized.to_rgba8();

        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for row in 0..u32::from(height) {
            for x in 0..u32::from(width) {
                let top = rgba.get_pixel(x, row * 2);
                let bottom = rgba.get_pixel(x, row * 2 + 1);
                cells.push((
                    Color::Rgb(top[0], top[1], top[2]),
                    Color::Rgb(bottom[0], bottom[1], bottom[2]),
                ));
            }
        }

        Self {
            width,
            height,
            cells,
        }
    }

    /// Colors for the cell at (x, y)
    pub fn cell(&self, x: u16, y: u16) -> Option<(Color, Color)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
            .copied()
    }
}

/// Per-URL image state plus the last raster built for each image
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<String, ImageState>,
    rasters: HashMap<String, Arc<Raster>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, url: &str) -> Option<&ImageState> {
        self.entries.get(url)
    }

    /// True if nothing has been requested for this URL yet
    pub fn needs_load(&self, url: &str) -> bool {
        !self.entries.contains_key(url)
    }

    pub fn is_ready(&self, url: &str) -> bool {
        matches!(self.entries.get(url), Some(ImageState::Ready(_)))
    }

    pub fn is_failed(&self, url: &str) -> bool {
        matches!(self.entries.get(url), Some(ImageState::Failed(_)))
    }

    pub fn start_loading(&mut self, url: &str) {
        self.entries.insert(url.to_string(), ImageState::Loading);
    }

    /// Record a finished load
    pub fn apply(&mut self, result: ImageLoadResult) {
        match result {
            ImageLoadResult::Success { url, image } => {
                self.rasters.remove(&url);
                self.entries.insert(url, ImageState::Ready(Arc::new(image)));
            }
            ImageLoadResult::Failure { url, error } => {
                tracing::debug!("Image {} failed: {}", url, error);
                self.entries.insert(url, ImageState::Failed(error));
            }
        }
    }

    /// Raster of a ready image at the given size, built on first use
    pub fn raster(&mut self, url: &str, width: u16, height: u16) -> Option<Arc<Raster>> {
        let Some(ImageState::Ready(image)) = self.entries.get(url) else {
            return None;
        };

        if let Some(raster) = self.rasters.get(url) {
            if raster.width == width.max(1) && raster.height == height.max(1) {
                return Some(raster.clone());
            }
        }

        let raster = Arc::new(Raster::cover(image, width, height));
        self.rasters.insert(url.to_string(), raster.clone());
        Some(raster)
    }

    /// Drop decoded images not in `keep`; failures are remembered
    pub fn retain_ready(&mut self, keep: &HashSet<String>) {
        self.entries
            .retain(|url, state| !matches!(state, ImageState::Ready(_)) || keep.contains(url));
        self.rasters.retain(|url, _| keep.contains(url));
    }
}

/// HTTP client for image downloads
pub fn build_image_client(config: &AppConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.api.user_agent.clone())
        .timeout(Duration::from_secs(config.api.request_timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Spawn an async task to download and decode an image
pub fn spawn_image_load(client: reqwest::Client, url: String, tx: mpsc::UnboundedSender<ImageLoadResult>) {
    tokio::spawn(async move {
        let result = match download_image(&client, &url).await {
            Ok(image) => ImageLoadResult::Success { url, image },
            Err(error) => ImageLoadResult::Failure { url, error },
        };
        let _ = tx.send(result);
    });
}

/// Download an image and decode it off the async runtime
pub async fn download_image(client: &reqwest::Client, url: &str) -> Result<DynamicImage, String> {
    let response = client
        .get(url)
        .header("Accept", "image/png,image/jpeg,image/gif,image/webp,image/*;q=0.8")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("Read error: {}", e))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(format!("Image too large ({}B)", bytes.len()));
    }

    tokio::task::spawn_blocking(move || {
        decode_image_bytes(&bytes).map(|img| img.thumbnail(MAX_DECODED_DIMENSION, MAX_DECODED_DIMENSION))
    })
    .await
    .map_err(|e| format!("Task failed: {}", e))?
}

/// Decode image bytes, trying magic bytes when auto-detection fails
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, String> {
    if bytes.is_empty() {
        return Err("Empty data".to_string());
    }

    if let Ok(img) = image::load_from_memory(bytes) {
        return Ok(img);
    }

    let format = if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(image::ImageFormat::Png)
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some(image::ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(image::ImageFormat::Gif)
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some(image::ImageFormat::WebP)
    } else {
        None
    };

    match format {
        Some(format) => image::load_from_memory_with_format(bytes, format)
            .map_err(|e| format!("{:?}: {}", format, e)),
        None => Err(format!("Unknown format ({}B)", bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Top half red, bottom half blue
    fn split_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for (_, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = if y < height / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_raster_covers_area() {
        let raster = Raster::cover(&split_image(40, 40), 10, 4);
        assert_eq!((raster.width, raster.height), (10, 4));

        let (top, _) = raster.cell(0, 0).unwrap();
        let (_, bottom) = raster.cell(9, 3).unwrap();
        assert_eq!(top, Color::Rgb(255, 0, 0));
        assert_eq!(bottom, Color::Rgb(0, 0, 255));
        assert!(raster.cell(10, 0).is_none());
    }

    #[test]
    fn test_raster_zero_size_is_clamped() {
        let raster = Raster::cover(&split_image(4, 4), 0, 0);
        assert_eq!((raster.width, raster.height), (1, 1));
    }

    #[test]
    fn test_cache_lifecycle() {
        let mut cache = ImageCache::new();
        let url = "https://upload.wikimedia.org/a.png";

        assert!(cache.needs_load(url));
        cache.start_loading(url);
        assert!(!cache.needs_load(url));
        assert!(cache.raster(url, 10, 5).is_none());

        cache.apply(ImageLoadResult::Success {
            url: url.to_string(),
            image: split_image(8, 8),
        });
        assert!(cache.is_ready(url));

        let first = cache.raster(url, 10, 5).unwrap();
        let again = cache.raster(url, 10, 5).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        let resized = cache.raster(url, 12, 5).unwrap();
        assert_eq!(resized.width, 12);
    }

    #[test]
    fn test_retain_drops_far_images_but_keeps_failures() {
        let mut cache = ImageCache::new();
        cache.apply(ImageLoadResult::Success {
            url: "near".to_string(),
            image: split_image(2, 2),
        });
        cache.apply(ImageLoadResult::Success {
            url: "far".to_string(),
            image: split_image(2, 2),
        });
        cache.apply(ImageLoadResult::Failure {
            url: "broken".to_string(),
            error: "HTTP 404".to_string(),
        });

        let keep: HashSet<String> = ["near".to_string()].into_iter().collect();
        cache.retain_ready(&keep);

        assert!(cache.is_ready("near"));
        assert!(cache.needs_load("far"));
        assert!(cache.is_failed("broken"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image_bytes(&[]).is_err());
        assert!(decode_image_bytes(b"<svg xmlns='http://www.w3.org/2000/svg'/>").is_err());
    }

    #[test]
    fn test_decode_png() {
        let mut bytes = Vec::new();
        split_image(4, 4)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let decoded = decode_image_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }
}
