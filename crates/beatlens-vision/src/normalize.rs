//! 캡처 정규화.
//!
//! 게임 창 캡처를 1920px 너비 기준 좌표계로 맞춘다. OCR 영역 테이블이
//! 이 좌표계를 전제로 하므로 모든 캡처는 이 모듈을 거친다.
//!
//! - 전체 화면: 1920x1080으로 리사이즈만 한다.
//! - 창 모드: 아래쪽 검은 띠 두께를 구해 좌우에도 같은 두께를 잘라낸 뒤
//!   1920px 너비로 리사이즈하고, 아래쪽 1080px만 남긴다. 타이틀바와
//!   비대칭 테두리는 마지막 단계에서 위쪽이 잘려 나가며 제거된다.

use beatlens_core::error::CoreError;
use beatlens_core::geometry::classify_capture;
use beatlens_core::models::frame::{CaptureMode, CapturedFrame};
use image::{imageops, RgbaImage};
use tracing::debug;

use crate::resize::fast_resize;

/// 정규화 목표 너비
pub const TARGET_WIDTH: u32 = 1920;
/// 정규화 목표 높이
pub const TARGET_HEIGHT: u32 = 1080;

/// 원본 캡처를 분류하고 정규화한다
pub fn normalize_capture(raw: RgbaImage) -> Result<CapturedFrame, CoreError> {
    let source_size = raw.dimensions();
    let mode = classify_capture(source_size.0, source_size.1);

    let image = match mode {
        CaptureMode::Fullscreen => fast_resize(&raw, TARGET_WIDTH, TARGET_HEIGHT)?,
        CaptureMode::Windowed => normalize_windowed(&raw)?,
    };

    debug!(
        "캡처 정규화: {:?} {}x{} → {}x{}",
        mode,
        source_size.0,
        source_size.1,
        image.width(),
        image.height()
    );

    Ok(CapturedFrame {
        image,
        mode,
        source_size,
    })
}

/// 아래에서 위로 훑어 처음으로 검지 않은 픽셀이 있는 행 + 1을 반환한다.
///
/// RGB 중 하나라도 0이 아니면 검지 않은 것으로 본다 (알파 무시).
/// 전부 검으면 0.
pub fn find_content_height(image: &RgbaImage) -> u32 {
    let row_len = image.width() as usize * 4;
    if row_len == 0 {
        return 0;
    }
    image
        .as_raw()
        .chunks_exact(row_len)
        .rposition(|row| {
            row.chunks_exact(4)
                .any(|px| px[0] != 0 || px[1] != 0 || px[2] != 0)
        })
        .map(|row| row as u32 + 1)
        .unwrap_or(0)
}

/// 창 모드 캡처 정규화
pub fn normalize_windowed(image: &RgbaImage) -> Result<RgbaImage, CoreError> {
    let (width, height) = image.dimensions();
    let content_height = find_content_height(image);
    if content_height == 0 {
        return Err(CoreError::Capture("캡처 이미지가 전부 검은색".to_string()));
    }

    // 아래쪽 검은 띠와 같은 두께를 좌우에서 잘라낸다
    let bar = height - content_height;
    let side_total = bar.saturating_mul(2);
    if side_total >= width {
        return Err(CoreError::Capture(format!(
            "검은 띠({bar}px)가 너비({width}px)에 비해 너무 큼"
        )));
    }
    let cropped_width = width - side_total;
    let cropped = imageops::crop_imm(image, bar, 0, cropped_width, content_height).to_image();

    // 1920px 너비로 리사이즈 (종횡비 유지)
    let scaled_height = ((f64::from(content_height) * f64::from(TARGET_WIDTH))
        / f64::from(cropped_width))
    .round()
    .max(1.0) as u32;
    let resized = fast_resize(&cropped, TARGET_WIDTH, scaled_height)?;

    // 아래쪽 1080px (더 낮으면 전체)
    let keep = scaled_height.min(TARGET_HEIGHT);
    let top = scaled_height - keep;
    Ok(imageops::crop_imm(&resized, 0, top, TARGET_WIDTH, keep).to_image())
}
