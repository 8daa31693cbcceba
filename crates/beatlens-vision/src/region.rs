//! 고정 영역 잘라내기.

use beatlens_core::error::CoreError;
use beatlens_core::models::ocr::OcrRegion;
use image::{imageops, RgbaImage};

/// 이미지에서 `region`을 잘라낸다.
///
/// 영역 테이블은 정적 설정이므로 범위를 벗어나면 조용히 잘라 맞추지 않고
/// [`CoreError::RegionOutOfBounds`]를 반환한다.
pub fn extract_region(image: &RgbaImage, region: &OcrRegion) -> Result<RgbaImage, CoreError> {
    let (image_width, image_height) = image.dimensions();
    let empty = region.width == 0 || region.height == 0;
    if empty
        || region.right() > u64::from(image_width)
        || region.bottom() > u64::from(image_height)
    {
        return Err(CoreError::RegionOutOfBounds {
            left: region.left,
            top: region.top,
            width: region.width,
            height: region.height,
            image_width,
            image_height,
        });
    }
    Ok(imageops::crop_imm(image, region.left, region.top, region.width, region.height).to_image())
}
