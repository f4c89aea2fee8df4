//! IGC 듀얼 패널 파일 관리자 코어
//!
//! 디렉토리 스냅샷 모델([`models::DirectorySnapshot`])과 재귀 파일 작업 엔진
//! ([`core::OperationEngine`]), 그리고 두 패널을 묶는 세션([`app::Session`])을
//! 제공합니다. 실제 I/O와 사용자 대화는 [`system::FileSystem`],
//! [`core::UserPrompt`] 등 트레이트 뒤에 있습니다.

pub mod app;
pub mod config;
pub mod core;
pub mod models;
pub mod system;
pub mod utils;
