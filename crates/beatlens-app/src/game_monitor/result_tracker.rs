//! 결과 화면 중복 제거와 재시도 횟수 추적.

use beatlens_core::models::ocr::ResultInfo;

/// 새 판정 결과에 대한 평가
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    /// 결과 화면 아님. 기억하던 결과가 있었으면 `cleared`.
    NotResult { cleared: bool },
    /// 이미 검증된 결과가 아직 표시 중
    Duplicate,
    /// 같은 텍스트로 재시도 한도 도달
    Exhausted,
    /// 검증 시도 (0부터 시작하는 시도 번호)
    Attempt(u32),
}

/// 마지막으로 인정된 결과와 현재 결과의 재시도 횟수
#[derive(Debug, Clone)]
pub struct ResultTracker {
    last_accepted: Option<ResultInfo>,
    pending_text: Option<String>,
    retry_count: u32,
    max_retries: u32,
}

impl ResultTracker {
    pub fn new(max_retries: u32) -> Self {
        Self {
            last_accepted: None,
            pending_text: None,
            retry_count: 0,
            max_retries: max_retries.max(1),
        }
    }

    pub fn assess(&mut self, info: &ResultInfo) -> Assessment {
        if !info.is_result_screen() {
            let cleared = self.last_accepted.is_some() || self.pending_text.is_some();
            self.reset();
            return Assessment::NotResult { cleared };
        }

        if self
            .last_accepted
            .as_ref()
            .is_some_and(|last| last.text == info.text)
        {
            return Assessment::Duplicate;
        }

        if self.pending_text.as_deref() != Some(info.text.as_str()) {
            self.pending_text = Some(info.text.clone());
            self.retry_count = 0;
        }

        if self.retry_count >= self.max_retries {
            Assessment::Exhausted
        } else {
            Assessment::Attempt(self.retry_count)
        }
    }

    /// 검증 성공. 이 결과를 "마지막으로 인정된 결과"로 기억한다.
    pub fn record_success(&mut self, info: ResultInfo) {
        self.last_accepted = Some(info);
        self.pending_text = None;
        self.retry_count = 0;
    }

    /// 검증 실패 (네트워크 등). 누적 실패 횟수를 반환.
    pub fn record_failure(&mut self) -> u32 {
        self.retry_count = (self.retry_count + 1).min(self.max_retries);
        self.retry_count
    }

    /// 서버가 결과를 거부함. 같은 이미지로는 결과가 바뀌지 않으므로 바로 한도 처리.
    pub fn record_rejection(&mut self) {
        self.retry_count = self.max_retries;
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
        self.pending_text = None;
        self.retry_count = 0;
    }

    pub fn last_accepted(&self) -> Option<&ResultInfo> {
        self.last_accepted.as_ref()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
