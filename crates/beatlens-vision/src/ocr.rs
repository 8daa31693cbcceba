//! Tesseract OCR 어댑터.
//!
//! `leptess` 기반. `ocr` feature flag 활성화 시에만 빌드된다.
//! Tesseract 호출은 블로킹이므로 `spawn_blocking`에서 실행한다.

use std::path::PathBuf;

use async_trait::async_trait;
use beatlens_core::error::CoreError;
use beatlens_core::ports::vision::TextRecognizer;
use image::DynamicImage;
use thiserror::Error;
use tracing::trace;

/// OCR 에러 타입
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract 초기화 실패
    #[error("OCR 초기화 실패: {0}")]
    Init(String),

    /// 이미지 설정 실패
    #[error("OCR 이미지 설정 실패: {0}")]
    ImageSetup(String),

    /// 텍스트 추출 실패
    #[error("OCR 텍스트 추출 실패: {0}")]
    Extraction(String),

    /// 빈 이미지 입력
    #[error("빈 이미지: 너비 또는 높이가 0")]
    EmptyImage,

    /// 비동기 작업 실패
    #[error("OCR 비동기 작업 실패: {0}")]
    Async(String),
}

impl From<OcrError> for CoreError {
    fn from(e: OcrError) -> Self {
        CoreError::OcrError(e.to_string())
    }
}

/// Tesseract 텍스트 인식기
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    tessdata_path: Option<PathBuf>,
    /// 언어 코드 (예: "eng")
    language: String,
}

impl TesseractRecognizer {
    pub fn new(tessdata_path: Option<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            tessdata_path,
            language: language.into(),
        }
    }

    /// 동기 인식
    pub fn recognize_blocking(
        tessdata: Option<&str>,
        language: &str,
        raw: &[u8],
        width: u32,
        height: u32,
    ) -> Result<String, OcrError> {
        if width == 0 || height == 0 {
            return Err(OcrError::EmptyImage);
        }

        let mut lt =
            leptess::LepTess::new(tessdata, language).map_err(|e| OcrError::Init(format!("{e}")))?;

        lt.set_image_from_mem(raw, width as i32, height as i32, 4, (width * 4) as i32)
            .map_err(|_| OcrError::ImageSetup("이미지 메모리 설정 실패".to_string()))?;

        let text = lt
            .get_utf8_text()
            .map_err(|e| OcrError::Extraction(format!("{e}")))?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, CoreError> {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        let raw = rgba.into_raw();
        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());
        let language = self.language.clone();

        let text = tokio::task::spawn_blocking(move || {
            Self::recognize_blocking(tessdata.as_deref(), &language, &raw, w, h)
        })
        .await
        .map_err(|e| OcrError::Async(format!("작업 조인 실패: {e}")))??;

        trace!("OCR {}x{}: {} chars", w, h, text.len());
        Ok(text)
    }
}
