use image::imageops::FilterType;
use image::DynamicImage;

use crate::config::ResizeRequest;
use crate::error::ConversionError;

/// Output dimensions for `request`, or `None` when the image is left as is.
///
/// A derived side is `round(given * other / source)` and never less than 1.
/// An `Explicit` request with one zero side behaves like `WidthOnly`/`HeightOnly`.
pub fn target_dimensions(src_w: u32, src_h: u32, request: ResizeRequest) -> Option<(u32, u32)> {
    let request = match request {
        ResizeRequest::Explicit(w, 0) => ResizeRequest::WidthOnly(w),
        ResizeRequest::Explicit(0, h) => ResizeRequest::HeightOnly(h),
        other => other,
    };

    match request {
        ResizeRequest::NoResize => None,
        ResizeRequest::Explicit(w, h) => Some((w, h)),
        ResizeRequest::WidthOnly(w) if w > 0 && src_w > 0 => {
            Some((w, scale_side(w, src_h, src_w)))
        }
        ResizeRequest::HeightOnly(h) if h > 0 && src_h > 0 => {
            Some((scale_side(h, src_w, src_h), h))
        }
        _ => None,
    }
}

fn scale_side(given: u32, other: u32, source: u32) -> u32 {
    let derived = (f64::from(given) * f64::from(other) / f64::from(source)).round();
    (derived.min(f64::from(u32::MAX)) as u32).max(1)
}

/// Resample with Lanczos3. Requests that resolve to the current size are a no-op.
pub fn resize_image(
    img: DynamicImage,
    request: ResizeRequest,
    max_pixels: u64,
) -> Result<DynamicImage, ConversionError> {
    let (src_w, src_h) = (img.width(), img.height());

    let Some((w, h)) = target_dimensions(src_w, src_h, request) else {
        return Ok(img);
    };

    if u64::from(w) * u64::from(h) > max_pixels {
        return Err(ConversionError::ImageTooLarge {
            width: w,
            height: h,
        });
    }

    if (w, h) == (src_w, src_h) {
        return Ok(img);
    }

    log::debug!("Resizing {}x{} -> {}x{}", src_w, src_h, w, h);
    Ok(img.resize_exact(w, h, FilterType::Lanczos3))
}
