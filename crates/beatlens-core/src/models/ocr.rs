//! OCR 영역 및 결과 화면 판정 모델.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 정규화된 캡처(1920x1080) 좌표계의 직사각형 영역. 정적 설정값이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl OcrRegion {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// 영역의 오른쪽 끝 (배타적)
    pub fn right(&self) -> u64 {
        u64::from(self.left) + u64::from(self.width)
    }

    /// 영역의 아래쪽 끝 (배타적)
    pub fn bottom(&self) -> u64 {
        u64::from(self.top) + u64::from(self.height)
    }
}

/// 분류용 OCR 영역 이름 (결과 화면 레이아웃)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionName {
    /// 기본 결과 화면
    Result,
    /// 오픈 매치(3인) 결과 화면
    Open3,
    /// 대전 결과 화면
    Versus,
}

impl RegionName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Result => "result",
            Self::Open3 => "open3",
            Self::Versus => "versus",
        }
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 영역별 인식 텍스트. 키가 없으면 "검사하지 않음"이다 (빈 문자열과 구분).
pub type RegionTexts = BTreeMap<RegionName, String>;

/// 결과 화면 판정 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInfo {
    /// 일치한 키워드 목록 (비어 있으면 결과 화면 아님)
    pub is_result: Vec<String>,
    /// 일치한 영역의 원본 인식 텍스트
    pub text: String,
    /// 처음 일치한 영역
    #[serde(rename = "where")]
    pub where_: Option<RegionName>,
}

impl ResultInfo {
    /// 결과 화면으로 판정되었는지 여부
    pub fn is_result_screen(&self) -> bool {
        !self.is_result.is_empty()
    }
}
