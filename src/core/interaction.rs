//! 엔진이 사용하는 외부 협력자 인터페이스
//!
//! 대화상자 표시, 진행률 표시, 취소 신호는 엔진 밖에서 구현됩니다.
//! 엔진은 이 트레이트들을 동기적으로 호출하고 신호를 주기적으로 확인할 뿐입니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 덮어쓰기 확인 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    Yes,
    No,
    All,
    Cancel,
}

/// 사용자 대화상자
pub trait UserPrompt {
    /// 예/아니오 확인
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// 대상이 이미 있을 때 덮어쓰기 여부
    fn overwrite(&mut self, name: &str) -> OverwriteDecision;

    /// 텍스트 입력 (`None` = 취소)
    fn input_text(
        &mut self,
        title: &str,
        prompt: &str,
        initial: &str,
        max_len: usize,
    ) -> Option<String>;

    /// 확인할 때까지 막는 알림
    fn alert(&mut self, title: &str, message: &str);
}

/// 진행률 표시
pub trait ProgressSink {
    fn show(&mut self, label: &str, name: &str, current: usize, total: usize);

    fn hide(&mut self);
}

/// 취소 요청 신호 (체크포인트마다 폴링됨)
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// 진행률을 표시하지 않는 싱크
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn show(&mut self, _label: &str, _name: &str, _current: usize, _total: usize) {}

    fn hide(&mut self) {}
}

/// 공유 가능한 취소 플래그
///
/// 복제본 어느 쪽에서든 `cancel()`을 호출하면 엔진이 다음 검사 지점에서 멈춥니다.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// 다음 작업을 위해 초기화
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl CancelSignal for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 엔진 호출 하나에 필요한 협력자 묶음
pub struct Collaborators<'c> {
    pub prompt: &'c mut dyn UserPrompt,
    pub progress: &'c mut dyn ProgressSink,
    pub cancel: &'c dyn CancelSignal,
}

impl<'c> Collaborators<'c> {
    pub fn new(
        prompt: &'c mut dyn UserPrompt,
        progress: &'c mut dyn ProgressSink,
        cancel: &'c dyn CancelSignal,
    ) -> Self {
        Self {
            prompt,
            progress,
            cancel,
        }
    }
}
