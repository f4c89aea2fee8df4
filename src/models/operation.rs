//! 파일 작업 모델
//!
//! 작업(job) 하나의 입력과 진행 상태, 그리고 최종 보고서를 정의합니다.
//! 작업은 사용자 액션마다 만들어지고 결과를 보고한 뒤 버려집니다.

use crate::models::file_entry::Entry;
use crate::models::snapshot::DirectorySnapshot;

/// 작업 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Copy,
    Move,
    Delete,
    Rename,
    Mkdir,
}

impl OperationKind {
    /// 작업 유형 이름 반환
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Copy => "Copy",
            OperationKind::Move => "Move",
            OperationKind::Delete => "Delete",
            OperationKind::Rename => "Rename",
            OperationKind::Mkdir => "Make Directory",
        }
    }

    /// 진행 표시용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Copy => "Copying",
            OperationKind::Move => "Moving",
            OperationKind::Delete => "Deleting",
            OperationKind::Rename => "Renaming",
            OperationKind::Mkdir => "Creating",
        }
    }

    /// 대상 패널이 필요한 작업인지
    pub fn needs_destination(&self) -> bool {
        matches!(self, OperationKind::Copy | OperationKind::Move)
    }
}

/// 덮어쓰기 정책 (작업 단위로 누적)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// 충돌마다 묻기
    #[default]
    AskEach,
    /// 모두 덮어쓰기
    OverwriteAll,
}

/// 엔트리 하나의 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryOutcome {
    Ok,
    Skip,
    Error,
}

impl EntryOutcome {
    /// 두 결과 합치기 (Error > Skip > Ok)
    pub fn combine(self, other: EntryOutcome) -> EntryOutcome {
        self.max(other)
    }

    pub fn is_ok(self) -> bool {
        self == EntryOutcome::Ok
    }
}

/// 작업 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// 생성됨
    Pending,
    /// 처리 중
    Running,
    /// 완료 (개별 엔트리 실패 포함 가능)
    Done,
    /// 사용자 취소
    Cancelled,
}

/// 실행할 작업
///
/// 소스/대상 스냅샷은 읽기 전용으로 빌려옵니다. 실제 변경은 어댑터를 통해서만
/// 일어나고, 스냅샷 갱신은 작업이 끝난 뒤 호출자가 합니다.
#[derive(Debug)]
pub struct OperationJob<'a> {
    pub kind: OperationKind,
    pub source: &'a DirectorySnapshot,
    pub dest: Option<&'a DirectorySnapshot>,
    pub targets: Vec<Entry>,
    pub overwrite_policy: OverwritePolicy,
    pub progress_current: usize,
    pub progress_total: usize,
    pub state: JobState,
}

impl<'a> OperationJob<'a> {
    /// 소스 스냅샷에서 대상 집합을 해석해 새 작업 생성
    ///
    /// `Mkdir`은 대상 엔트리가 없습니다.
    pub fn new(
        kind: OperationKind,
        source: &'a DirectorySnapshot,
        dest: Option<&'a DirectorySnapshot>,
    ) -> Self {
        let targets = match kind {
            OperationKind::Mkdir => Vec::new(),
            OperationKind::Rename => source
                .cursor_entry()
                .filter(|entry| entry.is_operable())
                .cloned()
                .into_iter()
                .collect(),
            _ => resolve_targets(source),
        };
        Self::with_targets(kind, source, dest, targets)
    }

    /// 대상 목록을 직접 지정해 작업 생성
    pub fn with_targets(
        kind: OperationKind,
        source: &'a DirectorySnapshot,
        dest: Option<&'a DirectorySnapshot>,
        targets: Vec<Entry>,
    ) -> Self {
        let progress_total = targets.len();
        Self {
            kind,
            source,
            dest,
            targets,
            overwrite_policy: OverwritePolicy::AskEach,
            progress_current: 0,
            progress_total,
            state: JobState::Pending,
        }
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    /// 소스 디렉토리 안 항목의 전체 경로
    pub fn source_path(&self, name: &str) -> String {
        self.source.entry_path(name)
    }

    /// 대상 디렉토리 안 항목의 전체 경로
    pub fn dest_path(&self, name: &str) -> Option<String> {
        self.dest.map(|dest| dest.entry_path(name))
    }

    /// 소스와 대상이 같은 드라이브인지
    pub fn same_drive(&self) -> bool {
        self.dest
            .is_some_and(|dest| dest.drive() == self.source.drive())
    }
}

/// 대상 집합 해석
///
/// 선택이 없으면 커서 위치 엔트리 하나(`..` 제외), 있으면 선택된 엔트리 전부를
/// 스냅샷 순서로 돌려줍니다.
pub fn resolve_targets(snapshot: &DirectorySnapshot) -> Vec<Entry> {
    if snapshot.selected_count() == 0 {
        snapshot
            .cursor_entry()
            .filter(|entry| entry.is_operable())
            .cloned()
            .into_iter()
            .collect()
    } else {
        snapshot
            .selected_entries()
            .filter(|entry| entry.is_operable())
            .cloned()
            .collect()
    }
}

/// 작업 결과 보고서
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub kind: OperationKind,
    pub state: JobState,
    /// 최상위 대상별 결과 (처리된 것만)
    pub outcomes: Vec<(String, EntryOutcome)>,
    /// 모든 깊이에서 처리한 엔트리 수
    pub entries_processed: usize,
}

impl JobReport {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            state: JobState::Pending,
            outcomes: Vec::new(),
            entries_processed: 0,
        }
    }

    pub fn record(&mut self, name: &str, outcome: EntryOutcome) {
        self.outcomes.push((name.to_string(), outcome));
    }

    /// 전체 결과 (대상이 없으면 Ok)
    pub fn outcome(&self) -> EntryOutcome {
        self.outcomes
            .iter()
            .fold(EntryOutcome::Ok, |acc, (_, outcome)| acc.combine(*outcome))
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == JobState::Cancelled
    }

    /// 취소 없이 모든 대상이 성공했는지
    pub fn is_success(&self) -> bool {
        self.state == JobState::Done && self.outcome().is_ok()
    }

    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }
}
