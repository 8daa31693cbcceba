//! 고속 리사이즈.
//!
//! fast_image_resize 기반 Bilinear 컨볼루션 리사이즈.

use beatlens_core::error::CoreError;
use fast_image_resize::{images::Image as FirImage, ResizeAlg, ResizeOptions, Resizer};
use image::RgbaImage;
use tracing::trace;

/// RGBA 이미지를 정확히 `width`x`height`로 리사이즈
pub fn fast_resize(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, CoreError> {
    let (src_w, src_h) = image.dimensions();

    if src_w == width && src_h == height {
        return Ok(image.clone());
    }
    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Image("소스 이미지 크기 0".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(CoreError::Image("목표 이미지 크기 0".to_string()));
    }

    let src_image = FirImage::from_vec_u8(
        src_w,
        src_h,
        image.as_raw().clone(),
        fast_image_resize::PixelType::U8x4,
    )
    .map_err(|e| CoreError::Image(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, fast_image_resize::PixelType::U8x4);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CoreError::Image(format!("리사이즈 실패: {e}")))?;

    let result = RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Image("결과 이미지 생성 실패".to_string()))?;

    trace!("리사이즈: {}x{} → {}x{}", src_w, src_h, width, height);
    Ok(result)
}
