use crate::config::{Limits, PanelLocation, PanelSettings};
use crate::core::actions::Action;
use crate::core::engine::OperationEngine;
use crate::core::interaction::Collaborators;
use crate::models::operation::JobReport;
use crate::models::snapshot::{DirectorySnapshot, Navigation};
use crate::system::filesystem::FileSystem;
use crate::utils::error::Result;
use crate::utils::path::DriveId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

mod navigation;
mod operations;

#[cfg(test)]
mod tests;

/// 패널 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PanelSide {
    #[default]
    #[serde(alias = "left", alias = "L")]
    Left,
    #[serde(alias = "right", alias = "R")]
    Right,
}

impl PanelSide {
    pub fn other(self) -> Self {
        match self {
            PanelSide::Left => PanelSide::Right,
            PanelSide::Right => PanelSide::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PanelSide::Left => 0,
            PanelSide::Right => 1,
        }
    }
}

/// 세션: 두 패널의 스냅샷, 활성 패널, 작업 엔진을 소유
///
/// 모든 사용자 액션은 [`Session::execute_action`]을 거칩니다.
pub struct Session<F: FileSystem> {
    fs: F,
    panels: [DirectorySnapshot; 2],
    active: PanelSide,
    engine: OperationEngine,
    last_report: Option<JobReport>,
    should_quit: bool,
}

impl<F: FileSystem> Session<F> {
    /// 두 패널을 `drive` 루트로 열기
    pub fn new(fs: F, drive: DriveId) -> Self {
        let mut session = Self {
            fs,
            panels: [DirectorySnapshot::new(drive), DirectorySnapshot::new(drive)],
            active: PanelSide::Left,
            engine: OperationEngine::new(),
            last_report: None,
            should_quit: false,
        };
        for side in [PanelSide::Left, PanelSide::Right] {
            session.open_panel(side, drive, "\\", drive);
        }
        session
    }

    /// 저장된 설정으로 세션 복원
    ///
    /// 저장된 위치를 읽을 수 없으면 `fallback` 드라이브의 루트로 엽니다.
    pub fn from_settings(
        fs: F,
        settings: &PanelSettings,
        limits: &Limits,
        fallback: DriveId,
    ) -> Self {
        let snapshot = || {
            DirectorySnapshot::new(fallback)
                .with_capacity(limits.panel_capacity)
                .with_viewport_height(limits.viewport_height)
        };
        let mut session = Self {
            fs,
            panels: [snapshot(), snapshot()],
            active: settings.active_panel,
            engine: OperationEngine::new()
                .with_buffer_size(limits.copy_buffer_size)
                .with_move_fallback(limits.move_fallback),
            last_report: None,
            should_quit: false,
        };

        for side in [PanelSide::Left, PanelSide::Right] {
            let PanelLocation { drive, path } = settings.location(side, fallback);
            session.open_panel(side, drive, &path, fallback);
        }
        session
    }

    /// 패널 열기 (실패 시 드라이브 루트, 그다음 `fallback` 루트)
    fn open_panel(&mut self, side: PanelSide, drive: DriveId, dir: &str, fallback: DriveId) {
        let panel = &mut self.panels[side.index()];
        let attempts = [(drive, dir), (drive, "\\"), (fallback, "\\")];
        for (drive, dir) in attempts {
            match panel.populate(&self.fs, drive, dir) {
                Ok(()) => return,
                Err(err) => {
                    warn!(?side, drive = %drive, path = %dir, error = %err, "panel open failed")
                }
            }
        }
    }

    /// 현재 패널 상태 (설정 저장용)
    pub fn panel_settings(&self) -> PanelSettings {
        let mut settings = PanelSettings {
            active_panel: self.active,
            ..PanelSettings::default()
        };
        for side in [PanelSide::Left, PanelSide::Right] {
            let panel = self.panel(side);
            settings.set_location(
                side,
                &PanelLocation {
                    drive: panel.drive(),
                    path: panel.path().to_string(),
                },
            );
        }
        settings
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn engine(&self) -> &OperationEngine {
        &self.engine
    }

    pub fn active_side(&self) -> PanelSide {
        self.active
    }

    pub fn panel(&self, side: PanelSide) -> &DirectorySnapshot {
        &self.panels[side.index()]
    }

    pub fn active(&self) -> &DirectorySnapshot {
        self.panel(self.active)
    }

    pub fn active_mut(&mut self) -> &mut DirectorySnapshot {
        &mut self.panels[self.active.index()]
    }

    pub fn inactive(&self) -> &DirectorySnapshot {
        self.panel(self.active.other())
    }

    /// 마지막으로 끝난 배치 작업의 결과
    pub fn last_report(&self) -> Option<&JobReport> {
        self.last_report.as_ref()
    }

    /// 마지막 작업 결과 가져오기 (한 번만 반환)
    pub fn take_report(&mut self) -> Option<JobReport> {
        self.last_report.take()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 액션 실행 (단일 진입점)
    ///
    /// 탐색 실패(디렉토리를 읽을 수 없음 등)는 `Err`로 돌려주며 패널은 이전
    /// 상태로 남습니다. 파일 작업의 오류는 알림으로 표시되고 `Ok`입니다.
    pub fn execute_action(&mut self, action: Action, ui: &mut Collaborators<'_>) -> Result<()> {
        debug!(action = action.id(), "execute action");
        match action {
            Action::MoveUp => self.move_cursor(Navigation::Up),
            Action::MoveDown => self.move_cursor(Navigation::Down),
            Action::GoToTop => self.move_cursor(Navigation::Home),
            Action::GoToBottom => self.move_cursor(Navigation::End),
            Action::PageUp => self.move_cursor(Navigation::PageUp),
            Action::PageDown => self.move_cursor(Navigation::PageDown),
            Action::GoToParent => return self.go_parent(),
            Action::EnterSelected => return self.enter_selected(),
            Action::TogglePanel => self.switch_panel(),
            Action::ChangeDrive => return self.prompt_drive(ui),
            Action::Copy => {
                self.start_copy(ui);
            }
            Action::Move => {
                self.start_move(ui);
            }
            Action::Delete => {
                self.start_delete(ui);
            }
            Action::MakeDirectory => self.start_mkdir(ui),
            Action::Rename => self.start_rename(ui),
            Action::ToggleSelection => self.toggle_selection(),
            Action::DeselectAll => self.deselect_all(),
            Action::Refresh => return self.refresh_all(),
            // 도움말 표시는 프런트엔드 담당
            Action::ShowHelp => {}
            Action::Quit => self.request_quit(ui),
        }
        Ok(())
    }

    fn request_quit(&mut self, ui: &mut Collaborators<'_>) {
        if ui.prompt.confirm("Quit", "Exit IGC?") {
            self.should_quit = true;
        }
    }
}
