//! 결과 화면 판정.
//!
//! 게임마다 분류용 OCR 영역, 프로필(마스킹) 영역, 영역별 키워드 목록을
//! 정적 테이블로 보유한다. 테이블은 [`GameCode`] variant로 선택하므로
//! 잘못된 문자열 키로 "영역 없음"이 되는 경우가 없다.
//!
//! 좌표는 모두 정규화된 캡처(1920x1080) 기준이다.

use std::collections::BTreeMap;
use std::sync::Arc;

use beatlens_core::config::Settings;
use beatlens_core::error::CoreError;
use beatlens_core::models::game::GameCode;
use beatlens_core::models::ocr::{OcrRegion, RegionName, RegionTexts, ResultInfo};
use beatlens_core::ports::vision::TextRecognizer;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, warn};

use crate::region::extract_region;

// ============================================================
// 정적 테이블
// ============================================================

/// 분류용 영역 하나
#[derive(Debug)]
pub struct RegionSpec {
    pub name: RegionName,
    pub area: OcrRegion,
    /// 이 영역에서 찾을 키워드 (대문자)
    pub keywords: &'static [&'static str],
    /// 비교 전에 공백을 모두 제거할지 여부
    pub strip_whitespace: bool,
}

/// 화면 종류별 프로필 영역
#[derive(Debug)]
pub struct ProfileRegions {
    pub screen: RegionName,
    /// 내 프로필
    pub own: &'static [OcrRegion],
    /// 다른 플레이어 프로필
    pub others: &'static [OcrRegion],
}

/// 게임별 테이블 묶음
#[derive(Debug)]
pub struct GameProfile {
    pub game: GameCode,
    /// 우선순위 순서 (기본 결과 화면이 먼저)
    pub regions: &'static [RegionSpec],
    pub profiles: &'static [ProfileRegions],
}

static DJMAX_RESPECT_V: GameProfile = GameProfile {
    game: GameCode::DjmaxRespectV,
    regions: &[
        RegionSpec {
            name: RegionName::Result,
            area: OcrRegion::new(1180, 265, 500, 50),
            keywords: &["JUDGEMENT", "DETAILS", "MAX COMBO"],
            strip_whitespace: false,
        },
        RegionSpec {
            name: RegionName::Open3,
            area: OcrRegion::new(60, 40, 420, 60),
            keywords: &["RESULT", "RANKING"],
            strip_whitespace: true,
        },
        RegionSpec {
            name: RegionName::Versus,
            area: OcrRegion::new(740, 30, 440, 70),
            keywords: &["VERSUS", "WINNER"],
            strip_whitespace: true,
        },
    ],
    profiles: &[
        ProfileRegions {
            screen: RegionName::Result,
            own: &[OcrRegion::new(40, 20, 520, 110)],
            others: &[],
        },
        ProfileRegions {
            screen: RegionName::Open3,
            own: &[OcrRegion::new(60, 160, 560, 90)],
            others: &[
                OcrRegion::new(60, 270, 560, 90),
                OcrRegion::new(60, 380, 560, 90),
            ],
        },
        ProfileRegions {
            screen: RegionName::Versus,
            own: &[OcrRegion::new(100, 820, 600, 120)],
            others: &[OcrRegion::new(1220, 820, 600, 120)],
        },
    ],
};

static WJMAX: GameProfile = GameProfile {
    game: GameCode::Wjmax,
    regions: &[RegionSpec {
        name: RegionName::Result,
        area: OcrRegion::new(1250, 80, 560, 70),
        keywords: &["RESULT", "ACCURACY"],
        strip_whitespace: true,
    }],
    profiles: &[ProfileRegions {
        screen: RegionName::Result,
        own: &[OcrRegion::new(30, 960, 480, 100)],
        others: &[],
    }],
};

/// 게임 테이블 조회
pub fn game_profile(game: GameCode) -> &'static GameProfile {
    match game {
        GameCode::DjmaxRespectV => &DJMAX_RESPECT_V,
        GameCode::Wjmax => &WJMAX,
    }
}

/// 영역 OCR이 설정에서 켜져 있는지
pub fn region_enabled(settings: &Settings, name: RegionName) -> bool {
    match name {
        RegionName::Result => settings.auto_capture_ocr_result_region,
        RegionName::Open3 => settings.auto_capture_ocr_open3_region,
        RegionName::Versus => settings.auto_capture_ocr_versus_region,
    }
}

/// 가릴 프로필 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    /// 내 프로필 + 다른 플레이어
    All,
    /// 다른 플레이어만
    Others,
}

// ============================================================
// OcrManager
// ============================================================

/// 영역 추출 결과. 꺼진 영역은 키 자체가 없다.
#[derive(Debug, Default)]
pub struct ExtractedRegions {
    pub regions: BTreeMap<RegionName, RgbaImage>,
    pub texts: RegionTexts,
}

/// 결과 화면 판정기
pub struct OcrManager {
    recognizer: Arc<dyn TextRecognizer>,
}

impl OcrManager {
    pub fn new(recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { recognizer }
    }

    /// 켜진 영역마다 잘라내고 텍스트를 인식한다.
    ///
    /// 영역 좌표가 이미지를 벗어나면 에러. 개별 영역의 인식 실패는
    /// 경고만 남기고 그 영역을 결과에서 뺀다 (검사하지 않은 것으로 취급).
    pub async fn extract_regions(
        &self,
        game: GameCode,
        image: &RgbaImage,
        settings: &Settings,
    ) -> Result<ExtractedRegions, CoreError> {
        let mut extracted = ExtractedRegions::default();

        for spec in game_profile(game).regions {
            if !region_enabled(settings, spec.name) {
                continue;
            }
            let crop = extract_region(image, &spec.area)?;
            match self
                .recognizer
                .recognize(&DynamicImage::ImageRgba8(crop.clone()))
                .await
            {
                Ok(text) => {
                    debug!("OCR [{}]: {:?}", spec.name, text);
                    extracted.texts.insert(spec.name, text);
                    extracted.regions.insert(spec.name, crop);
                }
                Err(e) => warn!("OCR 실패 [{}]: {e}", spec.name),
            }
        }

        Ok(extracted)
    }

    /// 우선순위 순서로 영역 텍스트를 검사해 처음 일치한 영역을 반환한다.
    ///
    /// 일치하는 영역이 없으면 빈 [`ResultInfo`] (에러 아님).
    pub fn determine_result_screen(
        game: GameCode,
        texts: &RegionTexts,
        settings: &Settings,
    ) -> ResultInfo {
        for spec in game_profile(game).regions {
            if !region_enabled(settings, spec.name) {
                continue;
            }
            let Some(text) = texts.get(&spec.name) else {
                continue;
            };

            let haystack = normalize_text(text, spec.strip_whitespace);
            let matched: Vec<String> = spec
                .keywords
                .iter()
                .filter(|kw| haystack.contains(&normalize_text(kw, spec.strip_whitespace)))
                .map(|kw| kw.to_string())
                .collect();

            if !matched.is_empty() {
                return ResultInfo {
                    is_result: matched,
                    text: text.clone(),
                    where_: Some(spec.name),
                };
            }
        }
        ResultInfo::default()
    }

    /// 화면 종류에 해당하는 프로필 영역 목록
    pub fn profile_regions(
        game: GameCode,
        screen: RegionName,
        scope: ProfileScope,
    ) -> Vec<OcrRegion> {
        game_profile(game)
            .profiles
            .iter()
            .filter(|p| p.screen == screen)
            .flat_map(|p| match scope {
                ProfileScope::All => p.own.iter().chain(p.others.iter()).copied().collect(),
                ProfileScope::Others => p.others.to_vec(),
            })
            .collect()
    }
}

fn normalize_text(text: &str, strip_whitespace: bool) -> String {
    let upper = text.to_uppercase();
    if strip_whitespace {
        upper.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        upper
    }
}
