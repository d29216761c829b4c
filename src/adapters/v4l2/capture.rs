use anyhow::{anyhow, Result};
use image::{ImageFormat, RgbImage};
use v4l::format::FourCC;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::Device;

use crate::domain::camera::FrameSize;

const MMAP_BUFFERS: u32 = 4;
const PREVIEW_JPEG_QUALITY: u8 = 80;

pub struct CaptureConfig {
    pub camera_path: String,
    pub fourcc: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// One decoded frame, plus its JPEG encoding when a preview was requested.
pub struct Captured {
    pub rgb: RgbImage,
    pub jpeg: Option<Vec<u8>>,
}

/// Blocking MMAP capture from a V4L2 device.
pub struct V4l2Capture {
    stream: Stream<'static>,
    fourcc: FourCC,
    size: FrameSize,
}

impl V4l2Capture {
    /// The driver may settle on a different size than requested; `size()`
    /// reports what it actually delivers.
    pub fn open(cfg: &CaptureConfig) -> Result<Self> {
        let dev = Device::with_path(&cfg.camera_path)?;

        let mut fmt = dev.format()?;
        fmt.fourcc = parse_fourcc(&cfg.fourcc)?;
        fmt.width = cfg.width;
        fmt.height = cfg.height;
        let actual = dev.set_format(&fmt)?;

        if cfg.fps > 0 {
            let mut params = dev.params()?;
            params.interval.numerator = 1;
            params.interval.denominator = cfg.fps;
            if let Err(e) = dev.set_params(&params) {
                tracing::warn!("Camera rejected {} fps: {e}", cfg.fps);
            }
        }

        // Opened once per process; the stream borrows the device for its lifetime.
        let dev: &'static Device = Box::leak(Box::new(dev));
        let stream = Stream::with_buffers(dev, v4l::buffer::Type::VideoCapture, MMAP_BUFFERS)?;

        tracing::info!(
            "Camera opened: {} {}x{} [{}] @ {} fps",
            cfg.camera_path, actual.width, actual.height, actual.fourcc, cfg.fps
        );

        Ok(Self {
            stream,
            fourcc: actual.fourcc,
            size: FrameSize {
                width: actual.width,
                height: actual.height,
            },
        })
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn next_frame(&mut self, want_jpeg: bool) -> Result<Captured> {
        let (data, _) = self.stream.next()?;
        let fcc = self.fourcc.str().map_err(|_| anyhow!("invalid fourcc"))?;

        match fcc {
            "MJPG" => {
                let rgb = image::load_from_memory_with_format(data, ImageFormat::Jpeg)?.to_rgb8();
                let jpeg = want_jpeg.then(|| data.to_vec());
                Ok(Captured { rgb, jpeg })
            }
            "YUYV" => {
                let rgb = yuyv_to_rgb(data, self.size.width, self.size.height);
                let jpeg = if want_jpeg { Some(encode_jpeg(&rgb)?) } else { None };
                Ok(Captured { rgb, jpeg })
            }
            other => Err(anyhow!("unsupported camera format {other}")),
        }
    }
}

fn parse_fourcc(code: &str) -> Result<FourCC> {
    let b = code.as_bytes();
    if b.len() != 4 {
        return Err(anyhow!("fourcc must be 4 characters, got {code:?}"));
    }
    Ok(FourCC::new(&[b[0], b[1], b[2], b[3]]))
}

fn encode_jpeg(rgb: &RgbImage) -> Result<Vec<u8>> {
    let mut jpeg = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, PREVIEW_JPEG_QUALITY);
    enc.encode(rgb.as_raw(), rgb.width(), rgb.height(), image::ExtendedColorType::Rgb8)?;
    Ok(jpeg)
}

/// BT.601 full-range conversion of one luma sample.
fn yuv_pixel(y: u8, u: f32, v: f32) -> image::Rgb<u8> {
    let y = y as f32;
    image::Rgb([
        (y + 1.402 * v).clamp(0.0, 255.0) as u8,
        (y - 0.344_136 * u - 0.714_136 * v).clamp(0.0, 255.0) as u8,
        (y + 1.772 * u).clamp(0.0, 255.0) as u8,
    ])
}

/// YUYV 4:2:2 packs two pixels in four bytes: [Y0, U, Y1, V].
fn yuyv_to_rgb(yuyv: &[u8], w: u32, h: u32) -> RgbImage {
    let mut out = RgbImage::new(w, h);
    if w == 0 {
        return out;
    }

    for (i, px) in yuyv.chunks_exact(4).enumerate() {
        let u = px[1] as f32 - 128.0;
        let v = px[3] as f32 - 128.0;
        let first = i as u32 * 2;
        let (x, y) = (first % w, first / w);
        if y >= h {
            break;
        }
        out.put_pixel(x, y, yuv_pixel(px[0], u, v));
        if x + 1 < w {
            out.put_pixel(x + 1, y, yuv_pixel(px[2], u, v));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_must_be_four_bytes() {
        assert!(parse_fourcc("MJPG").is_ok());
        assert!(parse_fourcc("MJP").is_err());
    }

    #[test]
    fn neutral_chroma_gives_grey() {
        // two pixels of mid-grey luma with zero chroma
        let rgb = yuyv_to_rgb(&[128, 128, 128, 128], 2, 1);
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([128, 128, 128]));
        assert_eq!(rgb.get_pixel(1, 0), &image::Rgb([128, 128, 128]));
    }

    #[test]
    fn short_buffer_leaves_rest_black() {
        let rgb = yuyv_to_rgb(&[255, 128, 255, 128], 4, 1);
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(3, 0), &image::Rgb([0, 0, 0]));
    }
}
