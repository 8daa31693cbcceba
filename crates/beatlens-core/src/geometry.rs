//! 오버레이 위치 계산과 표준 해상도 판정.
//!
//! 게임 창의 물리 픽셀 좌표와 모니터 배율로부터 오버레이 창이 놓일
//! 논리 픽셀 좌표를 계산한다. 16:9가 아닌 창에서는 가운데 16:9 영역을
//! 기준으로 한다. 모든 함수는 순수 함수다.

use crate::models::frame::CaptureMode;
use crate::models::overlay::OverlayBounds;
use crate::models::window::WindowBounds;

/// 전체 화면(최대화)으로 간주하는 표준 너비
pub const STANDARD_WIDTHS: [u32; 18] = [
    640, 720, 800, 1024, 1128, 1280, 1366, 1600, 1680, 1760, 1920, 2048, 2288, 2560, 3072, 3200,
    3840, 5120,
];

/// 캡처 분류용 표준 해상도 (너비, 높이)
pub const STANDARD_RESOLUTIONS: [(u32, u32); 18] = [
    (640, 480),
    (720, 480),
    (800, 600),
    (1024, 768),
    (1128, 634),
    (1280, 720),
    (1366, 768),
    (1600, 900),
    (1680, 1050),
    (1760, 990),
    (1920, 1080),
    (2048, 1152),
    (2288, 1287),
    (2560, 1440),
    (3072, 1728),
    (3200, 1800),
    (3840, 2160),
    (5120, 2880),
];

/// 캡처 분류 시 종횡비 허용 오차
pub const ASPECT_TOLERANCE: f64 = 0.01;

const WIDE_RATIO: f64 = 16.0 / 9.0;

/// 너비가 표준 목록에 있으면 전체 화면/최대화로 간주한다.
///
/// 실제 전체 화면 여부를 묻는 것이 아니라 휴리스틱이다. 창 모드라도
/// 너비가 우연히 표준값이면 전체 화면으로 처리된다.
pub fn is_standard_width(width: u32) -> bool {
    STANDARD_WIDTHS.contains(&width)
}

/// 캡처 이미지 크기로 창 모드/전체 화면을 분류한다.
///
/// 종횡비가 표준 해상도 중 하나와 [`ASPECT_TOLERANCE`] 이내이면 전체 화면.
/// 너비는 보지 않으므로 목록에 없는 크기의 16:9, 16:10 캡처도 전체 화면이다.
pub fn classify_capture(width: u32, height: u32) -> CaptureMode {
    if height == 0 {
        return CaptureMode::Windowed;
    }
    let ratio = f64::from(width) / f64::from(height);
    let matched = STANDARD_RESOLUTIONS
        .iter()
        .any(|&(sw, sh)| (ratio - f64::from(sw) / f64::from(sh)).abs() <= ASPECT_TOLERANCE);
    if matched {
        CaptureMode::Fullscreen
    } else {
        CaptureMode::Windowed
    }
}

/// 게임 창 위치로부터 오버레이 위치를 계산한다.
///
/// - 전체 화면: 위아래 레터박스를 제외한 16:9 영역
/// - 창 모드 (16:9 아님): 기존 오버레이와 같은 결과를 내도록 보정식을 그대로 유지
/// - 창 모드 (16:9): 배율만 적용
///
/// `scale`은 0보다 커야 한다. 0 이하이면 1.0으로 취급한다.
pub fn compute_overlay_bounds(
    bounds: &WindowBounds,
    is_fullscreen: bool,
    scale: f64,
) -> OverlayBounds {
    let scale = if scale > 0.0 && scale.is_finite() {
        scale
    } else {
        1.0
    };
    let x = f64::from(bounds.x);
    let y = f64::from(bounds.y);
    let w = f64::from(bounds.width);
    let h = f64::from(bounds.height);

    if is_fullscreen {
        let target_height = w / WIDE_RATIO;
        let band = (h - target_height) / 2.0;
        return OverlayBounds {
            x: round(x / scale),
            y: round((y + band) / scale),
            width: round(w / scale),
            height: round(target_height / scale),
        };
    }

    if !is_exact_16_9(bounds.width, bounds.height) {
        let content_height = w * 9.0 / 16.0;
        let removed = (h - content_height) / 2.0;
        return OverlayBounds {
            x: round(x / scale + removed),
            y: round(y / scale + (h - content_height) / scale),
            width: round(w / scale - 2.0 * removed),
            height: round((h - (h - content_height)) / scale - removed),
        };
    }

    OverlayBounds {
        x: round(x / scale),
        y: round(y / scale),
        width: round(w / scale),
        height: round(h / scale),
    }
}

fn is_exact_16_9(width: u32, height: u32) -> bool {
    u64::from(width) * 9 == u64::from(height) * 16
}

/// JS `Math.round`와 같은 반올림 (x.5는 +∞ 방향)
fn round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
