use super::*;
use crate::models::operation::{OperationJob, OperationKind};
use crate::utils::formatter::format_number_with_commas;
use crate::utils::path::{self, MAX_NAME_LEN};
use tracing::info;

impl<F: FileSystem> Session<F> {
    // === 배치 작업 (Copy / Move / Delete) ===

    /// 활성 패널의 대상을 반대 패널로 복사
    ///
    /// 확인에서 취소하거나 대상이 없으면 `None`.
    pub fn start_copy(&mut self, ui: &mut Collaborators<'_>) -> Option<JobReport> {
        self.run_batch(OperationKind::Copy, ui)
    }

    pub fn start_move(&mut self, ui: &mut Collaborators<'_>) -> Option<JobReport> {
        self.run_batch(OperationKind::Move, ui)
    }

    pub fn start_delete(&mut self, ui: &mut Collaborators<'_>) -> Option<JobReport> {
        self.run_batch(OperationKind::Delete, ui)
    }

    fn run_batch(&mut self, kind: OperationKind, ui: &mut Collaborators<'_>) -> Option<JobReport> {
        let source_side = self.active;
        let dest_side = self.active.other();
        let source = &self.panels[source_side.index()];
        let dest = kind
            .needs_destination()
            .then(|| &self.panels[dest_side.index()]);

        let mut job = OperationJob::new(kind, source, dest);
        if !job.has_targets() {
            debug!(kind = kind.name(), "nothing to do");
            return None;
        }
        if !Self::confirm_batch(&job, ui) {
            debug!(kind = kind.name(), "job declined");
            return None;
        }

        let report = self.engine.run(&mut job, &self.fs, ui);
        drop(job);

        self.refresh_after(source_side, kind.needs_destination().then_some(dest_side));
        self.last_report = Some(report.clone());
        Some(report)
    }

    /// 작업 시작 전 확인
    fn confirm_batch(job: &OperationJob<'_>, ui: &mut Collaborators<'_>) -> bool {
        let kind = job.kind;
        if job.source.selected_count() > 0 {
            let count = format_number_with_commas(job.targets.len() as u64);
            let title = format!("Confirm {}", kind.name());
            let message = format!("{} {} files?", kind.name(), count);
            return ui.prompt.confirm(&title, &message);
        }

        let Some(target) = job.targets.first() else {
            return false;
        };
        let message = match (kind, job.dest) {
            (OperationKind::Delete, _) => {
                let what = if target.is_directory {
                    "directory"
                } else {
                    "file"
                };
                format!("Delete {} {}?", what, target.name)
            }
            (_, Some(dest)) => format!("{} {} to {}?", kind.name(), target.name, dest.dir_path()),
            (_, None) => format!("{} {}?", kind.name(), target.name),
        };
        ui.prompt.confirm(kind.name(), &message)
    }

    // === 이름 기반 작업 (Mkdir / Rename) ===

    /// 이름을 입력받아 활성 패널에 디렉토리 생성
    pub fn start_mkdir(&mut self, ui: &mut Collaborators<'_>) {
        let Some(name) = ui
            .prompt
            .input_text("Make Directory", "Name:", "", MAX_NAME_LEN)
        else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let side = self.active;
        let mut job = OperationJob::new(OperationKind::Mkdir, &self.panels[side.index()], None);
        let result = self.engine.mkdir(&mut job, &self.fs, name);
        drop(job);

        match result {
            Ok(()) => {
                self.refresh_after(side, None);
                Self::focus_entry(&mut self.panels[side.index()], name);
            }
            Err(err) => ui.prompt.alert("Error", &err.to_string()),
        }
    }

    /// 커서 항목 이름 변경
    ///
    /// 입력이 취소되었거나 비었거나 기존 이름과 같으면 아무것도 하지 않습니다.
    pub fn start_rename(&mut self, ui: &mut Collaborators<'_>) {
        let side = self.active;
        let mut job = OperationJob::new(OperationKind::Rename, &self.panels[side.index()], None);
        let Some(current) = job.targets.first().map(|entry| entry.name.clone()) else {
            return;
        };

        let Some(input) = ui
            .prompt
            .input_text("Rename", "New name:", &current, MAX_NAME_LEN)
        else {
            return;
        };
        let new_name = input.trim();
        if new_name.is_empty() || new_name.eq_ignore_ascii_case(&current) {
            return;
        }

        let result = self.engine.rename(&mut job, &self.fs, new_name);
        drop(job);

        match result {
            Ok(()) => {
                self.refresh_after(side, None);
                Self::focus_entry(&mut self.panels[side.index()], new_name);
            }
            Err(err) => ui.prompt.alert("Error", &err.to_string()),
        }
    }

    // === 작업 후 처리 ===

    /// 작업에 관여한 패널 다시 읽기
    ///
    /// 관여하지 않은 패널도 같은 디렉토리나 그 하위를 보고 있으면 다시 읽습니다.
    fn refresh_after(&mut self, source: PanelSide, dest: Option<PanelSide>) {
        self.refresh_panel(source);
        if let Some(dest) = dest {
            self.refresh_panel(dest);
        }

        let other = source.other();
        if dest != Some(other) && self.shows_subtree_of(other, source) {
            self.refresh_panel(other);
        }
        info!(
            left = %self.panel(PanelSide::Left).dir_path(),
            right = %self.panel(PanelSide::Right).dir_path(),
            "panels refreshed"
        );
    }

    /// `side` 패널이 `base` 패널의 디렉토리 또는 그 하위를 보고 있는지
    fn shows_subtree_of(&self, side: PanelSide, base: PanelSide) -> bool {
        let panel = self.panel(side);
        let base = self.panel(base);
        if panel.drive() != base.drive() {
            return false;
        }

        let dir = panel.path().to_ascii_uppercase();
        let base_dir = base.path().to_ascii_uppercase();
        if path::is_root(&base_dir) || dir == base_dir {
            return true;
        }
        dir.strip_prefix(&base_dir)
            .is_some_and(|rest| rest.starts_with(path::SEPARATOR))
    }
}
