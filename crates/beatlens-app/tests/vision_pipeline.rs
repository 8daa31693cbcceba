//! 비전 파이프라인 통합 테스트.
//!
//! 캡처 정규화 → 영역 OCR → 결과 화면 판정 → 프로필 마스킹 → PNG 인코딩 cross-crate 연동.

use std::sync::Arc;

use async_trait::async_trait;
use beatlens_core::config::{BlurMode, Settings};
use beatlens_core::error::CoreError;
use beatlens_core::models::frame::CaptureMode;
use beatlens_core::models::game::GameCode;
use beatlens_core::models::ocr::RegionName;
use beatlens_core::ports::vision::TextRecognizer;
use beatlens_vision::normalize::{normalize_capture, TARGET_HEIGHT, TARGET_WIDTH};
use beatlens_vision::{encoder, privacy, OcrManager};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// 잘라낸 영역 크기로 영역을 구분해 텍스트를 돌려주는 인식기
struct SizeKeyedRecognizer {
    result: &'static str,
    open3: &'static str,
}

#[async_trait]
impl TextRecognizer for SizeKeyedRecognizer {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, CoreError> {
        Ok(match image.dimensions() {
            (500, 50) => self.result.to_string(),
            (420, 60) => self.open3.to_string(),
            _ => String::new(),
        })
    }
}

fn all_regions() -> Settings {
    Settings {
        auto_capture_ocr_result_region: true,
        auto_capture_ocr_open3_region: true,
        auto_capture_ocr_versus_region: true,
        ..Settings::default()
    }
}

#[test]
fn fullscreen_and_windowed_captures_share_coordinates() {
    let fullscreen = normalize_capture(RgbaImage::from_pixel(
        3840,
        2160,
        Rgba([50, 50, 50, 255]),
    ))
    .unwrap();
    assert_eq!(fullscreen.mode, CaptureMode::Fullscreen);
    assert_eq!(fullscreen.source_size, (3840, 2160));
    assert_eq!(fullscreen.image.dimensions(), (TARGET_WIDTH, TARGET_HEIGHT));

    // 창 모드: 아래쪽 10px 검은 띠
    let windowed_raw = RgbaImage::from_fn(1600, 930, |_, y| {
        if y >= 920 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([50, 50, 50, 255])
        }
    });
    let windowed = normalize_capture(windowed_raw).unwrap();
    assert_eq!(windowed.mode, CaptureMode::Windowed);
    assert_eq!(windowed.image.dimensions(), (TARGET_WIDTH, TARGET_HEIGHT));
}

#[tokio::test]
async fn primary_region_wins_over_fallback() {
    let frame = normalize_capture(RgbaImage::from_pixel(
        1920,
        1080,
        Rgba([50, 50, 50, 255]),
    ))
    .unwrap();
    let manager = OcrManager::new(Arc::new(SizeKeyedRecognizer {
        result: "JUDGEMENT DETAILS",
        open3: "OPEN MATCH RESULT",
    }));
    let settings = all_regions();

    let extracted = manager
        .extract_regions(GameCode::DjmaxRespectV, &frame.image, &settings)
        .await
        .unwrap();
    assert_eq!(extracted.regions.len(), 3);

    let info =
        OcrManager::determine_result_screen(GameCode::DjmaxRespectV, &extracted.texts, &settings);
    assert_eq!(info.where_, Some(RegionName::Result));
    assert_eq!(info.is_result, vec!["JUDGEMENT", "DETAILS"]);
}

#[tokio::test]
async fn fallback_region_used_when_primary_blank() {
    let image = RgbaImage::from_pixel(1920, 1080, Rgba([50, 50, 50, 255]));
    let manager = OcrManager::new(Arc::new(SizeKeyedRecognizer {
        result: "",
        open3: "open  result",
    }));
    let settings = all_regions();

    let extracted = manager
        .extract_regions(GameCode::DjmaxRespectV, &image, &settings)
        .await
        .unwrap();
    let info =
        OcrManager::determine_result_screen(GameCode::DjmaxRespectV, &extracted.texts, &settings);
    assert_eq!(info.where_, Some(RegionName::Open3));
    assert!(info.is_result_screen());
}

#[tokio::test]
async fn masked_screenshot_hides_all_profiles() {
    let mut image = RgbaImage::from_pixel(1920, 1080, Rgba([50, 50, 50, 255]));
    let settings = Settings {
        save_image_without_all_profile_when_capture: true,
        save_image_blur_mode: BlurMode::Black,
        ..all_regions()
    };

    let masked = privacy::mask_profiles(
        &mut image,
        GameCode::DjmaxRespectV,
        RegionName::Open3,
        &settings,
    );
    assert_eq!(masked, 3);
    assert_eq!(image.get_pixel(100, 200).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(100, 420).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(1500, 900).0, [50, 50, 50, 255]);

    let png = encoder::encode_png(&image).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded, image);
}

#[test]
fn others_only_scope_keeps_own_profile() {
    let mut image = RgbaImage::from_pixel(1920, 1080, Rgba([50, 50, 50, 255]));
    let settings = Settings {
        save_image_without_other_profile_when_capture: true,
        save_image_blur_mode: BlurMode::Black,
        ..Settings::default()
    };

    let masked = privacy::mask_profiles(
        &mut image,
        GameCode::DjmaxRespectV,
        RegionName::Versus,
        &settings,
    );
    assert_eq!(masked, 1);
    assert_eq!(image.get_pixel(300, 880).0, [50, 50, 50, 255], "내 프로필 유지");
    assert_eq!(image.get_pixel(1400, 880).0, [0, 0, 0, 255]);
}
