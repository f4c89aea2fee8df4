use super::*;
use crate::config::parse_drive;
use crate::utils::path;

impl<F: FileSystem> Session<F> {
    // === 커서 / 패널 ===

    /// 활성 패널 커서 이동
    pub fn move_cursor(&mut self, direction: Navigation) {
        self.active_mut().navigate(direction);
    }

    /// 활성 패널 전환
    pub fn switch_panel(&mut self) {
        self.active = self.active.other();
    }

    /// 뷰포트 높이 변경 (두 패널 모두)
    pub fn set_viewport_height(&mut self, height: usize) {
        for panel in &mut self.panels {
            panel.set_viewport_height(height);
        }
    }

    // === 디렉토리 이동 ===

    /// 커서 항목으로 진입 (`..`는 상위, 파일은 무시)
    pub fn enter_selected(&mut self) -> Result<()> {
        let Some(entry) = self.active().cursor_entry() else {
            return Ok(());
        };
        if entry.is_parent() {
            return self.go_parent();
        }
        if !entry.is_directory {
            return Ok(());
        }

        let name = entry.name.clone();
        let panel = &mut self.panels[self.active.index()];
        panel.change_directory(&self.fs, &name)
    }

    /// 상위 디렉토리로 이동
    ///
    /// 커서는 방금 나온 디렉토리에 놓입니다.
    pub fn go_parent(&mut self) -> Result<()> {
        let panel = &mut self.panels[self.active.index()];
        if panel.is_root() {
            return Ok(());
        }
        let came_from = path::basename(panel.path()).to_string();
        panel.go_parent(&self.fs)?;
        Self::focus_entry(panel, &came_from);
        Ok(())
    }

    /// 활성 패널 드라이브 변경
    pub fn change_drive(&mut self, drive: DriveId) -> Result<()> {
        let panel = &mut self.panels[self.active.index()];
        panel.set_drive(&self.fs, drive)
    }

    /// 드라이브 문자를 입력받아 변경
    pub(super) fn prompt_drive(&mut self, ui: &mut Collaborators<'_>) -> Result<()> {
        let current = self.active().drive().letter().to_string();
        let Some(input) = ui.prompt.input_text("Drive", "Drive letter:", &current, 2) else {
            return Ok(());
        };
        match parse_drive(&input) {
            Some(drive) => self.change_drive(drive),
            None => {
                ui.prompt
                    .alert("Error", &format!("Invalid drive: {}", input.trim()));
                Ok(())
            }
        }
    }

    // === 선택 ===

    /// 커서 항목 선택 토글 후 한 칸 아래로
    pub fn toggle_selection(&mut self) {
        let panel = self.active_mut();
        panel.toggle_selection();
        panel.navigate(Navigation::Down);
    }

    pub fn deselect_all(&mut self) {
        self.active_mut().clear_selection();
    }

    // === 새로고침 ===

    /// 두 패널 다시 읽기
    pub fn refresh_all(&mut self) -> Result<()> {
        let fs = &self.fs;
        let mut result = Ok(());
        for panel in &mut self.panels {
            if let Err(err) = panel.refresh(fs) {
                result = Err(err);
            }
        }
        result
    }

    /// 패널 다시 읽기
    ///
    /// 디렉토리가 사라졌으면 존재하는 가장 가까운 상위 디렉토리로 이동합니다.
    pub(super) fn refresh_panel(&mut self, side: PanelSide) {
        let panel = &mut self.panels[side.index()];
        let Err(err) = panel.refresh(&self.fs) else {
            return;
        };
        debug!(?side, path = %panel.path(), error = %err, "panel refresh failed, walking up");

        let drive = panel.drive();
        let mut dir = panel.path().to_string();
        while !path::is_root(&dir) {
            dir = path::parent(&dir);
            if panel.populate(&self.fs, drive, &dir).is_ok() {
                return;
            }
        }
        warn!(?side, drive = %drive, "panel left stale, drive root unreadable");
    }

    /// 이름이 같은 항목으로 커서 이동
    pub(super) fn focus_entry(panel: &mut DirectorySnapshot, name: &str) {
        let Some(index) = panel
            .entries()
            .iter()
            .position(|entry| entry.name.eq_ignore_ascii_case(name))
        else {
            return;
        };
        panel.navigate(Navigation::Home);
        for _ in 0..index {
            panel.navigate(Navigation::Down);
        }
    }
}
