//! UI 셸과의 stdio IPC.
//!
//! stdout: 한 줄에 하나의 JSON 메시지
//! `{"target":"overlay"|"main","channel":"...","payload":...}`
//!
//! stdin: 한 줄에 하나의 메인 창 이벤트 `{"event":"focus"|"blur"|"closed"}`
//!
//! 로그는 stderr로 나가므로 stdout에는 IPC 메시지만 쓴다.

use std::io::Write;
use std::sync::Arc;

use beatlens_core::error::CoreError;
use beatlens_core::models::overlay::{OverlayBounds, OverlayMessage};
use beatlens_core::models::verify::VerifyResponse;
use beatlens_core::ports::window_host::{MainWindowHost, OverlayHost, OverlayOptions};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::main_window::{MainWindowEvent, MainWindowService};

/// IPC 채널 이름
pub mod channels {
    pub const OVERLAY_CREATE: &str = "overlay-create";
    pub const OVERLAY_DESTROY: &str = "overlay-destroy";
    pub const OVERLAY_SET_BOUNDS: &str = "overlay-set-bounds";
    pub const OVERLAY_SHOW: &str = "overlay-show";
    pub const OVERLAY_HIDE: &str = "overlay-hide";
    pub const OVERLAY_MESSAGE: &str = "overlay-message";
    pub const OVERLAY_OCR_RESULT: &str = "overlay-ocr-result";
}

/// 메시지 대상 창
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Overlay,
    Main,
}

#[derive(Serialize)]
struct Envelope<'a> {
    target: Target,
    channel: &'a str,
    payload: Value,
}

/// JSON lines 출력기. 여러 호스트가 같은 출력을 공유한다.
pub struct JsonLineWriter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonLineWriter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn emit<T: Serialize>(
        &self,
        target: Target,
        channel: &str,
        payload: &T,
    ) -> Result<(), CoreError> {
        let envelope = Envelope {
            target,
            channel,
            payload: serde_json::to_value(payload)?,
        };
        let line = serde_json::to_string(&envelope)?;

        let mut out = self.out.lock();
        writeln!(out, "{line}")
            .and_then(|_| out.flush())
            .map_err(|e| CoreError::Ipc(format!("{channel} 전송 실패: {e}")))
    }
}

// ============================================================
// 호스트 구현
// ============================================================

/// stdout으로 오버레이 명령을 보내는 호스트
pub struct StdioOverlayHost {
    writer: Arc<JsonLineWriter>,
}

impl StdioOverlayHost {
    pub fn new(writer: Arc<JsonLineWriter>) -> Self {
        Self { writer }
    }

    fn command(&self, channel: &str, payload: Value) -> Result<(), CoreError> {
        self.writer.emit(Target::Overlay, channel, &payload)
    }
}

impl OverlayHost for StdioOverlayHost {
    fn create(&self, options: OverlayOptions) -> Result<(), CoreError> {
        self.command(
            channels::OVERLAY_CREATE,
            json!({
                "alwaysOnTop": options.always_on_top,
                "clickThrough": options.click_through,
                "frameless": options.frameless,
            }),
        )
    }

    fn destroy(&self) -> Result<(), CoreError> {
        self.command(channels::OVERLAY_DESTROY, Value::Null)
    }

    fn set_bounds(&self, bounds: OverlayBounds) -> Result<(), CoreError> {
        self.writer
            .emit(Target::Overlay, channels::OVERLAY_SET_BOUNDS, &bounds)
    }

    fn show(&self) -> Result<(), CoreError> {
        self.command(channels::OVERLAY_SHOW, Value::Null)
    }

    fn hide(&self) -> Result<(), CoreError> {
        self.command(channels::OVERLAY_HIDE, Value::Null)
    }

    fn send_message(&self, message: &OverlayMessage) -> Result<(), CoreError> {
        self.writer
            .emit(Target::Overlay, channels::OVERLAY_MESSAGE, message)
    }

    fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError> {
        self.writer
            .emit(Target::Overlay, channels::OVERLAY_OCR_RESULT, result)
    }
}

/// stdout으로 메인 창 메시지를 보내는 호스트
pub struct StdioMainWindowHost {
    writer: Arc<JsonLineWriter>,
}

impl StdioMainWindowHost {
    pub fn new(writer: Arc<JsonLineWriter>) -> Self {
        Self { writer }
    }
}

impl MainWindowHost for StdioMainWindowHost {
    fn send_ocr_result(&self, result: &VerifyResponse) -> Result<(), CoreError> {
        self.writer
            .emit(Target::Main, channels::OVERLAY_OCR_RESULT, result)
    }
}

// ============================================================
// stdin 이벤트
// ============================================================

#[derive(Deserialize)]
struct EventLine {
    event: MainWindowEvent,
}

/// stdin 한 줄을 메인 창 이벤트로 해석
pub fn parse_event(line: &str) -> Result<MainWindowEvent, CoreError> {
    let parsed: EventLine = serde_json::from_str(line.trim())?;
    Ok(parsed.event)
}

/// 입력 스트림에서 이벤트를 읽어 메인 창 서비스로 전달한다.
///
/// 입력이 끝나면 (UI 셸 종료) 메인 창이 닫힌 것으로 처리한다.
pub async fn pump_events<R>(
    reader: R,
    main_window: Arc<MainWindowService>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => {}
                    Ok(Some(line)) => match parse_event(&line) {
                        Ok(event) => {
                            debug!("UI 이벤트: {:?}", event);
                            main_window.handle_event(event);
                        }
                        Err(e) => warn!("알 수 없는 UI 이벤트 무시: {line:?} ({e})"),
                    },
                    Ok(None) => {
                        info!("UI 입력 종료");
                        main_window.handle_event(MainWindowEvent::Closed);
                        break;
                    }
                    Err(e) => {
                        warn!("UI 입력 읽기 실패: {e}");
                        main_window.handle_event(MainWindowEvent::Closed);
                        break;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                debug!("UI 이벤트 루프 종료");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatlens_core::models::overlay::NotificationKind;

    /// 테스트용 공유 버퍼
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn lines(&self) -> Vec<Value> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn writer() -> (Arc<JsonLineWriter>, SharedBuf) {
        let buf = SharedBuf::default();
        (Arc::new(JsonLineWriter::new(Box::new(buf.clone()))), buf)
    }

    #[test]
    fn overlay_commands_are_json_lines() {
        let (writer, buf) = writer();
        let host = StdioOverlayHost::new(writer);

        host.create(OverlayOptions::default()).unwrap();
        host.set_bounds(OverlayBounds {
            x: 0,
            y: 60,
            width: 1920,
            height: 1080,
        })
        .unwrap();
        host.show().unwrap();

        let lines = buf.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["target"], "overlay");
        assert_eq!(lines[0]["channel"], "overlay-create");
        assert_eq!(lines[0]["payload"]["clickThrough"], true);
        assert_eq!(lines[1]["payload"]["y"], 60);
        assert_eq!(lines[2]["channel"], "overlay-show");
        assert!(lines[2]["payload"].is_null());
    }

    #[test]
    fn notification_message_payload() {
        let (writer, buf) = writer();
        let host = StdioOverlayHost::new(writer);
        host.send_message(&OverlayMessage::notification(
            NotificationKind::Success,
            "autoCapture.verified",
            None,
        ))
        .unwrap();

        let line = &buf.lines()[0];
        assert_eq!(line["channel"], "overlay-message");
        assert_eq!(line["payload"]["type"], "notification");
        assert_eq!(line["payload"]["notificationType"], "success");
    }

    #[test]
    fn ocr_result_goes_to_main_window() {
        let (writer, buf) = writer();
        let host = StdioMainWindowHost::new(writer);
        let result = VerifyResponse {
            is_verified: true,
            score: 99.5,
            ..VerifyResponse::default()
        };
        host.send_ocr_result(&result).unwrap();

        let line = &buf.lines()[0];
        assert_eq!(line["target"], "main");
        assert_eq!(line["channel"], "overlay-ocr-result");
        assert_eq!(line["payload"]["isVerified"], true);
    }

    #[test]
    fn parse_events() {
        assert_eq!(parse_event(r#"{"event":"focus"}"#).unwrap(), MainWindowEvent::Focus);
        assert_eq!(parse_event(" {\"event\":\"closed\"}\n").unwrap(), MainWindowEvent::Closed);
        assert!(parse_event(r#"{"event":"minimize"}"#).is_err());
        assert!(parse_event("garbage").is_err());
    }

    #[tokio::test]
    async fn pump_forwards_events_and_closes_on_eof() {
        struct NullHost;
        impl MainWindowHost for NullHost {
            fn send_ocr_result(&self, _r: &VerifyResponse) -> Result<(), CoreError> {
                Ok(())
            }
        }

        let main = Arc::new(MainWindowService::new(Arc::new(NullHost)));
        let input: &[u8] = b"{\"event\":\"focus\"}\n\nnot json\n{\"event\":\"blur\"}\n{\"event\":\"focus\"}\n";
        let (_tx, rx) = watch::channel(false);

        pump_events(tokio::io::BufReader::new(input), main.clone(), rx).await;

        assert!(main.is_focused());
        assert!(main.is_closed());
    }
}
