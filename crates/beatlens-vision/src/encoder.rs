//! PNG 인코딩.
//!
//! 검증 서버 업로드와 스크린샷 저장에 무손실 PNG를 사용한다.

use beatlens_core::error::CoreError;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// RGBA 이미지를 PNG 바이트로 인코딩
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| CoreError::Image(format!("PNG 인코딩 실패: {e}")))?;
    Ok(buf)
}
