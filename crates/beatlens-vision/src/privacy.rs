//! 저장 이미지 프로필 마스킹.
//!
//! 결과 화면 스크린샷을 디스크에 저장하기 전에 플레이어 프로필 영역을
//! 블러 처리하거나 검게 칠한다. 어느 영역을 가릴지는 설정과 판정된
//! 화면 종류로 정해진다.

use beatlens_core::config::{BlurMode, Settings};
use beatlens_core::models::game::GameCode;
use beatlens_core::models::ocr::{OcrRegion, RegionName};
use image::{imageops, Rgba, RgbaImage};
use tracing::debug;

use crate::ocr_manager::{OcrManager, ProfileScope};

/// 블러 강도 (가우시안 sigma)
const BLUR_SIGMA: f32 = 14.0;

/// 설정에 따른 마스킹 범위. 둘 다 꺼져 있으면 `None`.
pub fn profile_scope(settings: &Settings) -> Option<ProfileScope> {
    if settings.save_image_without_all_profile_when_capture {
        Some(ProfileScope::All)
    } else if settings.save_image_without_other_profile_when_capture {
        Some(ProfileScope::Others)
    } else {
        None
    }
}

/// 판정된 화면 종류의 프로필 영역을 설정대로 가린다. 가린 영역 수를 반환.
pub fn mask_profiles(
    image: &mut RgbaImage,
    game: GameCode,
    screen: RegionName,
    settings: &Settings,
) -> usize {
    let Some(scope) = profile_scope(settings) else {
        return 0;
    };
    let regions = OcrManager::profile_regions(game, screen, scope);
    for region in &regions {
        mask_region(image, region, settings.save_image_blur_mode);
    }
    debug!("프로필 마스킹: {} ({:?}) {}개 영역", screen, scope, regions.len());
    regions.len()
}

/// 영역 하나를 가린다. 이미지 밖으로 나간 부분은 잘라서 처리한다.
pub fn mask_region(image: &mut RgbaImage, region: &OcrRegion, mode: BlurMode) {
    let (w, h) = image.dimensions();
    if region.left >= w || region.top >= h {
        return;
    }
    let width = region.width.min(w - region.left);
    let height = region.height.min(h - region.top);
    if width == 0 || height == 0 {
        return;
    }

    match mode {
        BlurMode::Black => {
            for y in region.top..region.top + height {
                for x in region.left..region.left + width {
                    image.put_pixel(x, y, Rgba([0, 0, 0, 255]));
                }
            }
        }
        BlurMode::Blur => {
            let patch =
                imageops::crop_imm(image, region.left, region.top, width, height).to_image();
            let blurred = imageops::blur(&patch, BLUR_SIGMA);
            imageops::replace(image, &blurred, i64::from(region.left), i64::from(region.top));
        }
    }
}
