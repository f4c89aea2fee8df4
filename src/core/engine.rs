//! 파일 작업 엔진
//!
//! 복사/이동/삭제/이름 변경/디렉토리 생성을 수행합니다. 모든 I/O는
//! [`FileSystem`] 어댑터를 거치고, 충돌 시에는 [`UserPrompt`]를 동기 호출하며,
//! 취소 신호는 체크포인트(최상위 대상마다, 디렉토리 항목마다, 복사 청크마다)에서
//! 폴링합니다.
//!
//! 엔트리별 실패(`Error`)와 건너뛰기(`Skip`)는 배치를 멈추지 않습니다. 취소는
//! 모든 재귀 단계를 빠져나가 작업 전체를 끝냅니다.

use crate::core::interaction::{Collaborators, OverwriteDecision};
use crate::models::file_entry::{FileAttributes, RawEntry};
use crate::models::operation::{
    EntryOutcome, JobReport, JobState, OperationJob, OperationKind, OverwritePolicy,
};
use crate::system::filesystem::FileSystem;
use crate::utils::error::{IgcError, Result};
use crate::utils::path::{self, ALL_FILES_PATTERN, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// 기본 복사 버퍼 크기 (바이트)
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// 이동 시 rename 실패를 복사+삭제로 대체할 조건
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveFallback {
    /// 모든 rename 실패에서 대체
    #[default]
    AnyError,
    /// 다른 장치 오류에서만 대체 (나머지는 엔트리 오류)
    CrossDeviceOnly,
}

impl MoveFallback {
    pub fn allows(self, err: &IgcError) -> bool {
        match self {
            MoveFallback::AnyError => true,
            MoveFallback::CrossDeviceOnly => err.is_cross_device(),
        }
    }
}

/// 작업 전체 취소 표식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cancelled;

/// 엔트리 하나의 처리 결과 또는 취소
type Step = std::result::Result<EntryOutcome, Cancelled>;

/// 파일 작업 엔진
///
/// 복사 버퍼를 소유하며, 메서드가 `&mut self`를 받으므로 한 번에 하나의
/// 작업만 버퍼를 사용합니다.
#[derive(Debug)]
pub struct OperationEngine {
    buffer: Vec<u8>,
    move_fallback: MoveFallback,
}

impl Default for OperationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationEngine {
    pub fn new() -> Self {
        Self {
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            move_fallback: MoveFallback::default(),
        }
    }

    /// 복사 버퍼 크기 지정 (최소 1바이트)
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer = vec![0; size.max(1)];
        self
    }

    pub fn with_move_fallback(mut self, policy: MoveFallback) -> Self {
        self.move_fallback = policy;
        self
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn move_fallback(&self) -> MoveFallback {
        self.move_fallback
    }

    /// 배치 작업 실행 (Copy / Move / Delete)
    ///
    /// Rename과 Mkdir은 이름이 필요하므로 [`rename`](Self::rename),
    /// [`mkdir`](Self::mkdir)을 사용합니다. 이 둘이 들어오면 아무것도 하지 않고
    /// `Pending` 상태의 빈 보고서를 돌려줍니다.
    pub fn run<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        ui: &mut Collaborators<'_>,
    ) -> JobReport {
        match job.kind {
            OperationKind::Copy | OperationKind::Move | OperationKind::Delete => {
                self.execute(job, fs, ui)
            }
            OperationKind::Rename | OperationKind::Mkdir => {
                warn!(kind = job.kind.name(), "batch run requested for a named operation");
                JobReport::new(job.kind)
            }
        }
    }

    /// 대상 엔트리 복사
    pub fn copy<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        ui: &mut Collaborators<'_>,
    ) -> JobReport {
        job.kind = OperationKind::Copy;
        self.execute(job, fs, ui)
    }

    /// 대상 엔트리 이동
    pub fn move_entries<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        ui: &mut Collaborators<'_>,
    ) -> JobReport {
        job.kind = OperationKind::Move;
        self.execute(job, fs, ui)
    }

    /// 대상 엔트리 삭제
    pub fn delete<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        ui: &mut Collaborators<'_>,
    ) -> JobReport {
        job.kind = OperationKind::Delete;
        self.execute(job, fs, ui)
    }

    /// 커서 엔트리 이름 변경
    pub fn rename<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        new_name: &str,
    ) -> Result<()> {
        let target = job.targets.first().cloned().ok_or_else(|| IgcError::NotFound {
            path: job.source.dir_path(),
        })?;
        path::validate_name(new_name)?;
        if new_name.eq_ignore_ascii_case(&target.name) {
            return Err(IgcError::InvalidName {
                name: new_name.to_string(),
                reason: "same as the current name",
            });
        }

        job.state = JobState::Running;
        let old_path = job.source_path(&target.name);
        let new_path = job.source_path(new_name);
        let result = fs.rename(&old_path, &new_path);
        job.state = JobState::Done;

        match &result {
            Ok(()) => info!(from = %old_path, to = %new_path, "renamed"),
            Err(err) => warn!(from = %old_path, to = %new_path, error = %err, "rename failed"),
        }
        result
    }

    /// 소스 디렉토리에 새 디렉토리 생성
    pub fn mkdir<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        name: &str,
    ) -> Result<()> {
        path::validate_name(name)?;

        job.state = JobState::Running;
        let new_path = job.source_path(name);
        let result = fs.mkdir(&new_path);
        job.state = JobState::Done;

        match &result {
            Ok(()) => info!(path = %new_path, "directory created"),
            Err(err) => warn!(path = %new_path, error = %err, "mkdir failed"),
        }
        result
    }

    fn execute<F: FileSystem>(
        &mut self,
        job: &mut OperationJob<'_>,
        fs: &F,
        ui: &mut Collaborators<'_>,
    ) -> JobReport {
        let mut report = JobReport::new(job.kind);
        let targets = job.targets.clone();
        let dest_dir = job.dest.map(|dest| dest.dir_path());
        let same_drive = job.same_drive();

        job.state = JobState::Running;
        job.progress_total = targets.len();
        info!(
            kind = job.kind.name(),
            source = %job.source.dir_path(),
            dest = dest_dir.as_deref().unwrap_or("-"),
            targets = targets.len(),
            "job started"
        );

        let mut ctx = JobContext {
            fs,
            ui,
            buffer: &mut self.buffer,
            label: job.kind.label(),
            current: 0,
            total: targets.len(),
            policy: job.overwrite_policy,
            processed: 0,
            created: None,
        };

        let mut cancelled = false;
        for (index, target) in targets.iter().enumerate() {
            if ctx.checkpoint().is_err() {
                cancelled = true;
                break;
            }
            ctx.current = index + 1;
            job.progress_current = index + 1;
            ctx.show(&target.name);

            let src = job.source_path(&target.name);
            let step = match (job.kind, dest_dir.as_deref()) {
                (OperationKind::Delete, _) => ctx.delete_entry(&src, target.is_directory),
                (OperationKind::Copy, Some(dir)) => {
                    let dst = path::append(dir, &target.name);
                    ctx.copy_entry(&src, &dst, &target.name, target.is_directory)
                }
                (OperationKind::Move, Some(dir)) => {
                    let dst = path::append(dir, &target.name);
                    ctx.move_entry(
                        &src,
                        &dst,
                        &target.name,
                        target.is_directory,
                        same_drive,
                        self.move_fallback,
                    )
                }
                _ => Ok(ctx.fail(&IgcError::NotFound {
                    path: format!("destination for {}", target.name),
                })),
            };

            job.overwrite_policy = ctx.policy;
            match step {
                Ok(outcome) => report.record(&target.name, outcome),
                Err(Cancelled) => {
                    cancelled = true;
                    break;
                }
            }
        }
        ctx.ui.progress.hide();

        job.state = if cancelled {
            JobState::Cancelled
        } else {
            JobState::Done
        };
        report.state = job.state;
        report.entries_processed = ctx.processed;

        info!(
            kind = job.kind.name(),
            state = ?report.state,
            outcome = ?report.outcome(),
            processed = report.entries_processed,
            "job finished"
        );
        report
    }
}

/// 작업 하나가 실행되는 동안의 상태
struct JobContext<'a, 'c, F: FileSystem> {
    fs: &'a F,
    ui: &'a mut Collaborators<'c>,
    buffer: &'a mut [u8],
    label: &'static str,
    current: usize,
    total: usize,
    policy: OverwritePolicy,
    processed: usize,
    /// 이동 대체 경로에서 새로 만든 경로 (롤백용)
    created: Option<Vec<(String, bool)>>,
}

impl<F: FileSystem> JobContext<'_, '_, F> {
    fn checkpoint(&self) -> std::result::Result<(), Cancelled> {
        if self.ui.cancel.is_cancelled() {
            debug!("cancel requested");
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    fn show(&mut self, name: &str) {
        self.ui
            .progress
            .show(self.label, name, self.current, self.total);
    }

    /// 엔트리 오류 알림 후 `Error` 반환
    fn fail(&mut self, err: &IgcError) -> EntryOutcome {
        warn!(error = %err, "entry failed");
        self.ui.prompt.alert("Error", &err.to_string());
        EntryOutcome::Error
    }

    fn track(&mut self, path: &str, is_directory: bool) {
        if let Some(created) = self.created.as_mut() {
            created.push((path.to_string(), is_directory));
        }
    }

    fn list_children(&self, dir: &str) -> Result<Vec<RawEntry>> {
        let pattern = path::append(dir, ALL_FILES_PATTERN);
        Ok(self
            .fs
            .list_directory(&pattern)?
            .into_iter()
            .filter(|raw| !raw.is_dot_entry())
            .collect())
    }

    // === Copy ===

    fn copy_entry(&mut self, src: &str, dst: &str, name: &str, is_directory: bool) -> Step {
        self.processed += 1;

        if let Some(err) = overlap_error(src, dst, is_directory) {
            return Ok(self.fail(&err));
        }

        if self.fs.exists(dst) {
            let dst_attrs = match self.fs.get_attributes(dst) {
                Ok(attrs) => attrs,
                Err(err) => return Ok(self.fail(&err)),
            };
            // 디렉토리는 기존 디렉토리에 병합
            if !(is_directory && dst_attrs.is_directory()) {
                if !is_directory && dst_attrs.is_directory() {
                    return Ok(self.fail(&IgcError::AlreadyExists {
                        path: dst.to_string(),
                    }));
                }
                if self.policy != OverwritePolicy::OverwriteAll {
                    match self.ui.prompt.overwrite(name) {
                        OverwriteDecision::Yes => {}
                        OverwriteDecision::All => self.policy = OverwritePolicy::OverwriteAll,
                        OverwriteDecision::No => {
                            debug!(path = %dst, "overwrite declined");
                            return Ok(EntryOutcome::Skip);
                        }
                        OverwriteDecision::Cancel => return Err(Cancelled),
                    }
                }
                if let Err(err) = remove_tree(self.fs, dst, false) {
                    return Ok(self.fail(&err));
                }
            }
        }

        if is_directory {
            self.copy_tree(src, dst)
        } else {
            self.copy_file(src, dst)
        }
    }

    fn copy_tree(&mut self, src: &str, dst: &str) -> Step {
        match self.fs.mkdir(dst) {
            Ok(()) => self.track(dst, true),
            Err(IgcError::AlreadyExists { .. })
                if self
                    .fs
                    .get_attributes(dst)
                    .is_ok_and(FileAttributes::is_directory) => {}
            Err(err) => return Ok(self.fail(&err)),
        }

        let children = match self.list_children(src) {
            Ok(children) => children,
            Err(err) => return Ok(self.fail(&err)),
        };

        let mut outcome = EntryOutcome::Ok;
        for child in children {
            self.checkpoint()?;
            self.show(&child.name);
            let child_src = path::append(src, &child.name);
            let child_dst = path::append(dst, &child.name);
            let child_outcome =
                self.copy_entry(&child_src, &child_dst, &child.name, child.is_directory())?;
            outcome = outcome.combine(child_outcome);
        }
        Ok(outcome)
    }

    fn copy_file(&mut self, src: &str, dst: &str) -> Step {
        let mut reader = match self.fs.open(src) {
            Ok(reader) => reader,
            Err(err) => return Ok(self.fail(&err)),
        };
        let mut writer = match self.fs.create(dst) {
            Ok(writer) => writer,
            Err(err) => return Ok(self.fail(&err)),
        };
        self.track(dst, false);

        let mut copied: u64 = 0;
        let failure = loop {
            let n = match reader.read(self.buffer) {
                Ok(0) => break None,
                Ok(n) => n,
                Err(err) => break Some(IgcError::from_io(err, src)),
            };
            if let Err(err) = writer.write_all(&self.buffer[..n]) {
                break Some(IgcError::WriteFailure {
                    path: dst.to_string(),
                    reason: err.to_string(),
                });
            }
            copied += n as u64;

            if self.checkpoint().is_err() {
                drop(writer);
                discard_partial(self.fs, dst);
                return Err(Cancelled);
            }
        };
        let failure = failure.or_else(|| {
            writer.flush().err().map(|err| IgcError::WriteFailure {
                path: dst.to_string(),
                reason: err.to_string(),
            })
        });
        drop(writer);

        match failure {
            None => {
                debug!(src = %src, dst = %dst, bytes = copied, "file copied");
                Ok(EntryOutcome::Ok)
            }
            Some(err) => {
                discard_partial(self.fs, dst);
                Ok(self.fail(&err))
            }
        }
    }

    // === Move ===

    fn move_entry(
        &mut self,
        src: &str,
        dst: &str,
        name: &str,
        is_directory: bool,
        same_drive: bool,
        fallback: MoveFallback,
    ) -> Step {
        if let Some(err) = overlap_error(src, dst, is_directory) {
            self.processed += 1;
            return Ok(self.fail(&err));
        }

        // 대상이 이미 있으면 충돌 처리를 위해 곧바로 복사 경로로
        if same_drive && !self.fs.exists(dst) {
            match self.fs.rename(src, dst) {
                Ok(()) => {
                    self.processed += 1;
                    debug!(src = %src, dst = %dst, "moved by rename");
                    return Ok(EntryOutcome::Ok);
                }
                Err(err) if fallback.allows(&err) => {
                    warn!(
                        src = %src,
                        dst = %dst,
                        error = %err,
                        "rename failed, falling back to copy and delete"
                    );
                }
                Err(err) => {
                    self.processed += 1;
                    return Ok(self.fail(&err));
                }
            }
        }

        self.created = Some(Vec::new());
        let copied = self.copy_entry(src, dst, name, is_directory);
        let created = self.created.take().unwrap_or_default();

        match copied {
            Ok(EntryOutcome::Ok) => match remove_tree(self.fs, src, is_directory) {
                Ok(()) => Ok(EntryOutcome::Ok),
                Err(err) => Ok(self.fail(&err)),
            },
            Ok(outcome) => {
                rollback(self.fs, &created);
                Ok(outcome)
            }
            Err(Cancelled) => {
                rollback(self.fs, &created);
                Err(Cancelled)
            }
        }
    }

    // === Delete ===

    fn delete_entry(&mut self, target: &str, is_directory: bool) -> Step {
        self.processed += 1;

        if !is_directory {
            return Ok(match delete_file(self.fs, target) {
                Ok(()) => EntryOutcome::Ok,
                Err(err) => self.fail(&err),
            });
        }

        let children = match self.list_children(target) {
            Ok(children) => children,
            Err(err) => return Ok(self.fail(&err)),
        };

        let mut outcome = EntryOutcome::Ok;
        for child in children {
            self.checkpoint()?;
            self.show(&child.name);
            let child_path = path::append(target, &child.name);
            outcome = outcome.combine(self.delete_entry(&child_path, child.is_directory())?);
        }

        // 모든 하위 항목이 지워졌을 때만 디렉토리 제거
        if !outcome.is_ok() {
            return Ok(outcome);
        }
        Ok(match self.fs.rmdir(target) {
            Ok(()) => EntryOutcome::Ok,
            Err(err) => self.fail(&err),
        })
    }
}

/// 자기 자신 또는 자신의 하위로 복사/이동하려는지 검사
fn overlap_error(src: &str, dst: &str, is_directory: bool) -> Option<IgcError> {
    let src_upper = src.to_ascii_uppercase();
    let dst_upper = dst.to_ascii_uppercase();
    if src_upper == dst_upper {
        return Some(IgcError::InvalidName {
            name: path::basename(dst).to_string(),
            reason: "source and destination are the same",
        });
    }
    let inside = format!("{}{}", src_upper, SEPARATOR);
    if is_directory && dst_upper.starts_with(&inside) {
        return Some(IgcError::InvalidName {
            name: path::basename(dst).to_string(),
            reason: "destination is inside the source directory",
        });
    }
    None
}

/// 읽기 전용 속성을 해제한 뒤 파일 삭제
fn delete_file<F: FileSystem>(fs: &F, target: &str) -> Result<()> {
    let attrs = fs.get_attributes(target)?;
    if attrs.is_read_only() {
        fs.set_attributes(target, attrs.without(FileAttributes::READ_ONLY))?;
    }
    fs.delete(target)
}

/// 경로 전체 삭제 (취소 확인 없음)
///
/// `is_directory`가 거짓이어도 실제 속성을 다시 확인합니다.
fn remove_tree<F: FileSystem>(fs: &F, target: &str, is_directory: bool) -> Result<()> {
    let is_directory = is_directory || fs.get_attributes(target)?.is_directory();
    if !is_directory {
        return delete_file(fs, target);
    }

    let pattern = path::append(target, ALL_FILES_PATTERN);
    for child in fs.list_directory(&pattern)? {
        if child.is_dot_entry() {
            continue;
        }
        remove_tree(fs, &path::append(target, &child.name), child.is_directory())?;
    }
    fs.rmdir(target)
}

/// 부분적으로 쓰인 대상 파일 제거
fn discard_partial<F: FileSystem>(fs: &F, target: &str) {
    if let Err(err) = fs.delete(target) {
        debug!(path = %target, error = %err, "failed to remove partial file");
    }
}

/// 이동 대체 경로에서 만든 항목을 역순으로 제거
fn rollback<F: FileSystem>(fs: &F, created: &[(String, bool)]) {
    for (target, is_directory) in created.iter().rev() {
        if !fs.exists(target) {
            continue;
        }
        let result = if *is_directory {
            fs.rmdir(target)
        } else {
            fs.delete(target)
        };
        if let Err(err) = result {
            warn!(path = %target, error = %err, "rollback could not remove entry");
        }
    }
}
