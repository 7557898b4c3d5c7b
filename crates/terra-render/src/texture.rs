//! Day/night imagery: background decoding and GPU upload.
//!
//! Decoding runs once on a worker thread. The frame loop polls the result
//! without blocking and keeps drawing the placeholder until both images
//! have arrived.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, TryRecvError};
use tracing::{error, info};

/// Largest edge accepted before downscaling, matching common GPU limits.
pub const MAX_TEXTURE_DIMENSION: u32 = 8192;

/// Errors from loading globe imagery.
#[derive(Debug, thiserror::Error)]
pub enum TextureLoadError {
    /// The file does not exist.
    #[error("texture not found: {0}")]
    NotFound(PathBuf),
    /// The image could not be opened or decoded.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Width or height is zero.
    #[error("texture {0} has zero size")]
    Empty(PathBuf),
    /// The loader thread exited without reporting.
    #[error("texture loader stopped unexpectedly")]
    Disconnected,
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Single opaque texel, used until real imagery is available.
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color.to_vec(),
        }
    }
}

/// Both globe images.
#[derive(Debug, Clone)]
pub struct TextureSet {
    pub day: DecodedImage,
    pub night: DecodedImage,
}

/// Decode `path` into RGBA8, downscaling anything above [`MAX_TEXTURE_DIMENSION`].
pub fn load_image(path: &Path) -> Result<DecodedImage, TextureLoadError> {
    if !path.exists() {
        return Err(TextureLoadError::NotFound(path.to_path_buf()));
    }
    let mut img = image::open(path).map_err(|source| TextureLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if img.width() == 0 || img.height() == 0 {
        return Err(TextureLoadError::Empty(path.to_path_buf()));
    }
    if img.width() > MAX_TEXTURE_DIMENSION || img.height() > MAX_TEXTURE_DIMENSION {
        img = img.resize(
            MAX_TEXTURE_DIMENSION,
            MAX_TEXTURE_DIMENSION,
            image::imageops::FilterType::Triangle,
        );
    }
    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// One-shot background loader for the day and night images.
pub struct TextureLoader {
    receiver: Option<Receiver<Result<TextureSet, TextureLoadError>>>,
    handle: Option<JoinHandle<()>>,
}

impl TextureLoader {
    /// Start decoding both images on a worker thread.
    pub fn spawn(day: PathBuf, night: PathBuf) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let handle = std::thread::spawn(move || {
            let result = load_image(&day).and_then(|day| {
                let night = load_image(&night)?;
                Ok(TextureSet { day, night })
            });
            let _ = tx.send(result);
        });
        Self {
            receiver: Some(rx),
            handle: Some(handle),
        }
    }

    /// A loader that never delivers, for running without imagery.
    pub fn disabled() -> Self {
        Self {
            receiver: None,
            handle: None,
        }
    }

    /// Check for a finished load. Returns `Some` exactly once.
    pub fn poll(&mut self) -> Option<Result<TextureSet, TextureLoadError>> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(TextureLoadError::Disconnected),
        };
        self.receiver = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        match &result {
            Ok(set) => info!(
                day = ?(set.day.width, set.day.height),
                night = ?(set.night.width, set.night.height),
                "globe textures decoded"
            ),
            Err(e) => error!("globe textures unavailable, keeping placeholder: {e}"),
        }
        Some(result)
    }

    /// Whether a result is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Upload `image` as an sRGB texture and return its view.
pub fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &DecodedImage,
    label: &str,
) -> wgpu::TextureView {
    use wgpu::util::DeviceExt;

    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
        image::RgbaImage::from_pixel(width, height, image::Rgba(color))
            .save(path)
            .unwrap();
    }

    fn wait(loader: &mut TextureLoader) -> Result<TextureSet, TextureLoadError> {
        let start = Instant::now();
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(start.elapsed() < Duration::from_secs(5), "loader timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.png");
        write_png(&path, 4, 2, [10, 20, 30, 255]);
        let img = load_image(&path).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.rgba.len(), 4 * 2 * 4);
        assert_eq!(&img.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_image(&dir.path().join("nope.png"));
        assert!(matches!(result, Err(TextureLoadError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            load_image(&path),
            Err(TextureLoadError::Decode { .. })
        ));
    }

    #[test]
    fn test_loader_delivers_once() {
        let dir = tempfile::tempdir().unwrap();
        let day = dir.path().join("day.png");
        let night = dir.path().join("night.png");
        write_png(&day, 8, 4, [255, 255, 255, 255]);
        write_png(&night, 8, 4, [0, 0, 0, 255]);

        let mut loader = TextureLoader::spawn(day, night);
        let set = wait(&mut loader).unwrap();
        assert_eq!(set.day.rgba[0], 255);
        assert_eq!(set.night.rgba[0], 0);
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_loader_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let day = dir.path().join("day.png");
        write_png(&day, 2, 2, [1, 2, 3, 255]);
        let mut loader = TextureLoader::spawn(day, dir.path().join("night.png"));
        assert!(matches!(wait(&mut loader), Err(TextureLoadError::NotFound(_))));
        assert!(!loader.is_pending());
    }

    #[test]
    fn test_disabled_loader_never_delivers() {
        let mut loader = TextureLoader::disabled();
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }
}
