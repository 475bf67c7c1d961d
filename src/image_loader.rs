//! Asynchronous image fetching for card images.
//!
//! Requests go through a bounded flume queue to a background tokio runtime. Each
//! fetch resolves the image reference, reads the bytes and decodes a downsized
//! RGBA preview on the blocking pool. Results come back on an async channel that
//! the GTK main loop drains. A failed fetch yields `None` and the card keeps its
//! placeholder.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

use crate::config::FeedConfig;

/// Maximum number of queued fetch requests.
const FETCH_QUEUE: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Empty image reference")]
    Empty,
    #[error("Unsupported image scheme: {0}")]
    UnsupportedScheme(String),
    #[error("No asset directory to resolve relative image: {0}")]
    NoAssetDir(String),
}

/// Maps an image reference onto a local file.
///
/// `file://` URLs and absolute paths are used as-is, relative references are
/// joined onto `asset_dir`. Remote schemes are not fetched.
pub fn resolve_image_source(url: &str, asset_dir: Option<&Path>) -> Result<PathBuf, FetchError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FetchError::Empty);
    }

    if let Some(rest) = url.strip_prefix("file://") {
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return Ok(PathBuf::from(rest));
    }

    if let Some((scheme, _)) = url.split_once("://") {
        return Err(FetchError::UnsupportedScheme(scheme.to_ascii_lowercase()));
    }

    let path = Path::new(url);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    match asset_dir {
        Some(dir) => Ok(dir.join(path)),
        None => Err(FetchError::NoAssetDir(url.to_string())),
    }
}

/// Decoded RGBA8 pixels ready to become a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decodes `bytes` and shrinks the result so neither edge exceeds `max_edge`.
///
/// Animated GIFs decode to their first frame.
pub fn decode_preview(bytes: &[u8], max_edge: u32) -> Result<DecodedImage> {
    let format = image::guess_format(bytes).ok();

    let img = if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).context("Failed to decode GIF")?;
        let frame = decoder
            .into_frames()
            .next()
            .ok_or_else(|| anyhow!("GIF has no frames"))?
            .context("Failed to decode GIF frame")?;
        DynamicImage::ImageRgba8(frame.into_buffer())
    } else {
        image::load_from_memory(bytes).context("Failed to decode image")?
    };

    let max_edge = max_edge.max(1);
    let img = if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };

    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        rgba: img.to_rgba8().into_raw(),
        width,
        height,
    })
}

/// Resolves, reads and decodes one image.
pub async fn fetch_image(url: &str, asset_dir: Option<&Path>, max_edge: u32) -> Result<DecodedImage> {
    let path = resolve_image_source(url, asset_dir)?;
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read image: {:?}", path))?;

    tokio::task::spawn_blocking(move || decode_preview(&bytes, max_edge))
        .await
        .context("Decode task panicked")?
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub workers: usize,
    pub preview_size: u32,
    pub asset_dir: Option<PathBuf>,
}

impl From<&FeedConfig> for FetchConfig {
    fn from(config: &FeedConfig) -> Self {
        Self {
            workers: config.image_workers.max(1),
            preview_size: config.preview_size,
            asset_dir: config.asset_dir.clone(),
        }
    }
}

#[derive(Debug)]
pub struct FetchRequest {
    pub url: String,
}

#[derive(Debug)]
pub struct FetchResult {
    pub url: String,
    /// `None` when the image could not be fetched.
    pub image: Option<DecodedImage>,
}

/// Handle to the background fetch pipeline. Dropping it stops the pipeline.
pub struct ImageFetcher {
    request_tx: flume::Sender<FetchRequest>,
    result_rx: async_channel::Receiver<FetchResult>,
}

impl ImageFetcher {
    pub fn spawn(config: FetchConfig) -> Result<Self> {
        let (request_tx, request_rx) = flume::bounded::<FetchRequest>(FETCH_QUEUE);
        let (result_tx, result_rx) = async_channel::unbounded::<FetchResult>();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.workers)
            .thread_name("khoi-image")
            .enable_all()
            .build()
            .context("Failed to build image runtime")?;

        info!(workers = config.workers, "Started image fetcher");

        thread::Builder::new()
            .name("khoi-image-dispatch".to_string())
            .spawn(move || runtime.block_on(dispatch_loop(request_rx, result_tx, config)))
            .context("Failed to spawn image dispatch thread")?;

        Ok(Self {
            request_tx,
            result_rx,
        })
    }

    /// Queues a fetch. Returns false if the queue is full or the pipeline stopped.
    pub fn request(&self, url: &str) -> bool {
        self.request_tx
            .try_send(FetchRequest {
                url: url.to_string(),
            })
            .is_ok()
    }

    pub fn results(&self) -> async_channel::Receiver<FetchResult> {
        self.result_rx.clone()
    }
}

async fn dispatch_loop(
    request_rx: flume::Receiver<FetchRequest>,
    result_tx: async_channel::Sender<FetchResult>,
    config: FetchConfig,
) {
    let limiter = Arc::new(Semaphore::new(config.workers.max(1)));

    while let Ok(req) = request_rx.recv_async().await {
        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };
        let tx = result_tx.clone();
        let asset_dir = config.asset_dir.clone();
        let preview_size = config.preview_size;

        tokio::spawn(async move {
            let image = match fetch_image(&req.url, asset_dir.as_deref(), preview_size).await {
                Ok(image) => {
                    trace!(url = %req.url, width = image.width, height = image.height, "Fetched image");
                    Some(image)
                }
                Err(err) => {
                    debug!(url = %req.url, error = ?err, "Image fetch failed, keeping placeholder");
                    None
                }
            };
            drop(permit);
            let result = FetchResult {
                url: req.url,
                image,
            };
            let _ = tx.send(result).await;
        });
    }

    debug!("Image dispatch loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 80, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_resolve_file_url() {
        assert_eq!(
            resolve_image_source("file:///tmp/a.png", None),
            Ok(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            resolve_image_source("file://localhost/tmp/a.png", None),
            Ok(PathBuf::from("/tmp/a.png"))
        );
    }

    #[test]
    fn test_resolve_relative_against_asset_dir() {
        let dir = Path::new("/opt/khoi/assets");
        assert_eq!(
            resolve_image_source("posts/1.jpg", Some(dir)),
            Ok(dir.join("posts/1.jpg"))
        );
        assert_eq!(
            resolve_image_source("posts/1.jpg", None),
            Err(FetchError::NoAssetDir("posts/1.jpg".to_string()))
        );
    }

    #[test]
    fn test_resolve_rejects_remote_and_empty() {
        assert_eq!(
            resolve_image_source("https://cdn.example.com/a.jpg", None),
            Err(FetchError::UnsupportedScheme("https".to_string()))
        );
        assert_eq!(resolve_image_source("   ", None), Err(FetchError::Empty));
    }

    #[test]
    fn test_decode_preview_downscales() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 64, 16);
        let bytes = std::fs::read(&path).unwrap();

        let decoded = decode_preview(&bytes, 32).unwrap();
        assert_eq!((decoded.width, decoded.height), (32, 8));
        assert_eq!(decoded.rgba.len(), 32 * 8 * 4);

        let full = decode_preview(&bytes, 512).unwrap();
        assert_eq!((full.width, full.height), (64, 16));
    }

    #[test]
    fn test_decode_preview_rejects_garbage() {
        assert!(decode_preview(b"not an image", 64).is_err());
    }

    #[tokio::test]
    async fn test_fetch_image_from_asset_dir() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("card.png"), 10, 20);

        let image = fetch_image("card.png", Some(dir.path()), 512).await.unwrap();
        assert_eq!((image.width, image.height), (10, 20));

        assert!(fetch_image("missing.png", Some(dir.path()), 512).await.is_err());
    }

    #[test]
    fn test_fetcher_reports_success_and_failure() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("ok.png"), 4, 4);

        let fetcher = ImageFetcher::spawn(FetchConfig {
            workers: 1,
            preview_size: 64,
            asset_dir: Some(dir.path().to_path_buf()),
        })
        .unwrap();
        assert!(fetcher.request("ok.png"));
        assert!(fetcher.request("https://example.com/remote.png"));

        let results = fetcher.results();
        let mut outcomes = Vec::new();
        for _ in 0..2 {
            let result = results.recv_blocking().unwrap();
            outcomes.push((result.url, result.image.is_some()));
        }
        outcomes.sort();
        assert_eq!(
            outcomes,
            vec![
                ("https://example.com/remote.png".to_string(), false),
                ("ok.png".to_string(), true),
            ]
        );
    }
}
