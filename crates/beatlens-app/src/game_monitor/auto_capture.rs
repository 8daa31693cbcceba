//! 자동 캡처 틱: 캡처 → 영역 OCR → 결과 화면 판정 → (지연 재캡처) → 원격 검증 → 알림.

use std::future::Future;
use std::time::Duration;

use beatlens_core::config::Settings;
use beatlens_core::error::CoreError;
use beatlens_core::models::frame::CapturedFrame;
use beatlens_core::models::game::GameCode;
use beatlens_core::models::ocr::{RegionName, ResultInfo};
use beatlens_core::models::overlay::{notification_keys, NotificationKind, OverlayMessage};
use beatlens_core::models::verify::VerifyResponse;
use beatlens_storage::screenshot_file_name;
use beatlens_vision::{encoder, privacy, OcrManager};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::phase::{CapturePhase, CapturePhaseGuard};
use super::result_tracker::{Assessment, ResultTracker};
use super::GameMonitorService;

/// 자동 캡처 틱 한 번의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// 자동 캡처가 꺼져 있음
    Disabled,
    /// 로그인하지 않았거나 게임 창이 포커스를 갖고 있지 않음
    Skipped,
    /// 이전 틱이 아직 처리 중
    Busy,
    /// 게임 창을 캡처하지 못함
    NoFrame,
    /// 결과 화면 아님
    NotResult,
    /// 이미 검증한 결과가 계속 표시 중
    Duplicate,
    /// 같은 결과로 재시도 한도 도달
    Exhausted,
    /// 검증 성공
    Verified,
    /// 서버가 결과를 거부함
    Rejected,
    /// 검증 요청 실패 (재시도 횟수 증가)
    Failed,
    /// 캡처나 OCR 중 에러
    Aborted,
    /// 처리 중 모니터링이 중지되어 결과를 버림
    Stale,
}

impl GameMonitorService {
    /// 자동 캡처 한 번. 에러를 밖으로 내보내지 않는다.
    pub async fn auto_capture_tick(&self) -> CaptureOutcome {
        let settings = self.deps.settings.load_settings();
        if !settings.auto_capture_mode {
            return CaptureOutcome::Disabled;
        }
        if !self.deps.session.load_session().is_authenticated() {
            debug!("로그인 세션 없음, 자동 캡처 건너뜀");
            return CaptureOutcome::Skipped;
        }
        if !self.is_game_window_focused() || self.game_window().is_none() {
            return CaptureOutcome::Skipped;
        }

        let Ok(mut results) = self.results.try_lock() else {
            debug!("이전 자동 캡처가 처리 중");
            return CaptureOutcome::Busy;
        };
        let generation = self.generation();
        let phase = CapturePhaseGuard::enter(&self.capture_phase);

        match self
            .run_capture(&settings, generation, &mut results, &phase)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("자동 캡처 실패: {e}");
                CaptureOutcome::Aborted
            }
        }
    }

    async fn run_capture(
        &self,
        settings: &Settings,
        generation: u64,
        results: &mut ResultTracker,
        phase: &CapturePhaseGuard<'_>,
    ) -> Result<CaptureOutcome, CoreError> {
        let game = settings.game_code;
        let title = self.game_window_title(settings);

        let Some((frame, info)) = self.capture_and_classify(&title, game, settings).await? else {
            return Ok(CaptureOutcome::NoFrame);
        };

        let attempt = match results.assess(&info) {
            Assessment::NotResult { cleared } => {
                if cleared {
                    debug!("결과 화면에서 벗어남, 기억한 결과 초기화");
                }
                return Ok(CaptureOutcome::NotResult);
            }
            Assessment::Duplicate => return Ok(CaptureOutcome::Duplicate),
            Assessment::Exhausted => {
                debug!("재시도 한도 도달, 화면이 바뀔 때까지 대기");
                return Ok(CaptureOutcome::Exhausted);
            }
            Assessment::Attempt(attempt) => attempt,
        };

        if !self.is_current(generation) {
            return Ok(CaptureOutcome::Stale);
        }
        info!(
            "결과 화면 감지: {:?} in {:?} (시도 {})",
            info.is_result, info.where_, attempt
        );
        let key = if attempt == 0 {
            notification_keys::RESULT_DETECTED
        } else {
            notification_keys::RETRYING
        };
        self.notify(
            NotificationKind::Info,
            key,
            Some(json!({ "attempt": attempt + 1, "maxRetries": results.max_retries() })),
        );

        // 화면 전환 중의 프레임을 피하기 위한 재캡처
        let (frame, info) = match settings.auto_capture_delay() {
            Some(delay) => {
                phase.set(CapturePhase::AwaitingDelayedRecapture);
                sleep(delay).await;
                phase.set(CapturePhase::Capturing);
                match self.capture_and_classify(&title, game, settings).await? {
                    Some((frame, info)) if info.is_result_screen() => (frame, info),
                    Some(_) => {
                        debug!("재캡처 결과 결과 화면이 아님, 검증 취소");
                        return Ok(CaptureOutcome::NotResult);
                    }
                    None => return Ok(CaptureOutcome::NoFrame),
                }
            }
            None => (frame, info),
        };

        if !self.is_current(generation) {
            return Ok(CaptureOutcome::Stale);
        }

        phase.set(CapturePhase::Verifying);
        let png = encoder::encode_png(&frame.image)?;
        let verified = with_timeout(
            self.options.verify_timeout,
            self.deps.verifier.verify(&png, game),
        )
        .await;

        let response = match verified {
            Ok(response) => response,
            Err(e) => {
                let failures = if e.is_permanent() {
                    results.record_rejection();
                    results.max_retries()
                } else {
                    results.record_failure()
                };
                warn!(
                    "결과 검증 실패 ({}/{}): {e}",
                    failures,
                    results.max_retries()
                );
                if self.is_current(generation) {
                    self.notify(
                        NotificationKind::Error,
                        notification_keys::VERIFY_FAILED,
                        Some(json!({ "attempt": failures, "maxRetries": results.max_retries() })),
                    );
                }
                return Ok(CaptureOutcome::Failed);
            }
        };

        if !response.is_verified {
            results.record_rejection();
            warn!("서버가 결과를 거부함: {:?}", info.text);
            if self.is_current(generation) {
                self.notify(
                    NotificationKind::Error,
                    notification_keys::VERIFY_REJECTED,
                    None,
                );
            }
            return Ok(CaptureOutcome::Rejected);
        }

        // 서버에는 이미 기록되었으므로 화면 반영 여부와 관계없이 중복 제거에 쓴다
        let screen = info.where_;
        results.record_success(info);
        if !self.is_current(generation) {
            return Ok(CaptureOutcome::Stale);
        }

        info!(
            "결과 검증 완료: {} {}B {} {}",
            response.song_name(),
            response.button,
            response.pattern,
            response.score
        );
        self.publish_result(&response);

        if settings.save_image_when_capture {
            if let Err(e) = self
                .save_screenshot(frame, game, screen, &response, settings)
                .await
            {
                warn!("스크린샷 저장 실패: {e}");
            }
        }

        Ok(CaptureOutcome::Verified)
    }

    /// 게임 창을 캡처해 켜진 영역을 OCR하고 결과 화면 여부를 판정한다
    async fn capture_and_classify(
        &self,
        title: &str,
        game: GameCode,
        settings: &Settings,
    ) -> Result<Option<(CapturedFrame, ResultInfo)>, CoreError> {
        let captured = with_timeout(
            self.options.capture_timeout,
            self.deps.capturer.capture_game_window(title),
        )
        .await?;
        let Some(frame) = captured else {
            debug!("게임 창 캡처 없음: {title}");
            return Ok(None);
        };

        let extracted = with_timeout(
            self.options.capture_timeout,
            self.deps.ocr.extract_regions(game, &frame.image, settings),
        )
        .await?;
        let info = OcrManager::determine_result_screen(game, &extracted.texts, settings);
        Ok(Some((frame, info)))
    }

    fn publish_result(&self, response: &VerifyResponse) {
        if let Err(e) = self.deps.overlay.send_ocr_result(response) {
            warn!("오버레이로 결과 전송 실패: {e}");
        }
        if let Err(e) = self.deps.main_window.send_ocr_result(response) {
            warn!("메인 창으로 결과 전송 실패: {e}");
        }
        self.notify(
            NotificationKind::Success,
            notification_keys::VERIFIED,
            Some(json!({
                "songName": response.song_name(),
                "button": response.button,
                "pattern": response.pattern,
                "score": response.score,
            })),
        );
    }

    async fn save_screenshot(
        &self,
        frame: CapturedFrame,
        game: GameCode,
        screen: Option<RegionName>,
        response: &VerifyResponse,
        settings: &Settings,
    ) -> Result<(), CoreError> {
        let Some(saver) = &self.deps.screenshots else {
            debug!("스크린샷 저장소 없음, 저장 생략");
            return Ok(());
        };

        let mut image = frame.image;
        if let Some(screen) = screen {
            privacy::mask_profiles(&mut image, game, screen, settings);
        }
        let png = encoder::encode_png(&image)?;
        let file_name = screenshot_file_name(game, response, Utc::now());
        let path = saver.save_image(&png, &file_name).await?;

        info!("스크린샷 저장: {}", path.display());
        self.notify(
            NotificationKind::Info,
            notification_keys::IMAGE_SAVED,
            Some(json!({ "path": path.display().to_string() })),
        );
        Ok(())
    }

    fn notify(&self, kind: NotificationKind, key: &str, props: Option<Value>) {
        let message = OverlayMessage::notification(kind, key, props);
        if let Err(e) = self.deps.overlay.send_message(&message) {
            warn!("알림 전송 실패 ({key}): {e}");
        }
    }
}

/// 제한 시간 안에 끝나지 않으면 `ExecutionTimeout`
async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, CoreError>>,
) -> Result<T, CoreError> {
    timeout(limit, fut)
        .await
        .map_err(|_| CoreError::ExecutionTimeout {
            timeout_ms: limit.as_millis() as u64,
        })?
}
