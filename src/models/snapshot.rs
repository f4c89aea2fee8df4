use crate::models::file_entry::Entry;
use crate::system::filesystem::FileSystem;
use crate::utils::error::Result;
use crate::utils::path::{self, DriveId, ALL_FILES_PATTERN};
use std::cmp::Ordering;
use tracing::debug;

/// 기본 뷰포트 높이 (표시 가능한 파일 행 수)
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 19;

/// 커서 이동 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// 한 패널의 디렉토리 스냅샷
///
/// `populate` 호출마다 통째로 교체되며, 실패한 `populate`는 기존 내용을
/// 건드리지 않습니다.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    drive: DriveId,
    path: String,
    entries: Vec<Entry>,
    capacity: Option<usize>,
    truncated: bool,
    cursor_index: usize,
    top_index: usize,
    selected_count: usize,
    viewport_height: usize,
}

/// 엔트리 정렬: 디렉토리 먼저, 같은 그룹 안에서는 대소문자 무시 오름차순
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.to_ascii_uppercase().cmp(&b.name.to_ascii_uppercase()))
}

impl DirectorySnapshot {
    /// 빈 스냅샷 생성 (루트 경로, 아직 읽지 않음)
    pub fn new(drive: DriveId) -> Self {
        Self {
            drive,
            path: path::SEPARATOR.to_string(),
            entries: Vec::new(),
            capacity: None,
            truncated: false,
            cursor_index: 0,
            top_index: 0,
            selected_count: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }

    /// 최대 엔트리 수 (`..` 포함) 지정
    pub fn with_capacity(mut self, capacity: Option<usize>) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_viewport_height(mut self, height: usize) -> Self {
        self.set_viewport_height(height);
        self
    }

    pub fn drive(&self) -> DriveId {
        self.drive
    }

    /// 드라이브를 뺀 현재 경로 (`\SRC`, 루트는 `\`)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn top_index(&self) -> usize {
        self.top_index
    }

    pub fn selected_count(&self) -> usize {
        self.selected_count
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn is_root(&self) -> bool {
        path::is_root(&self.path)
    }

    /// 커서 위치의 엔트리
    pub fn cursor_entry(&self) -> Option<&Entry> {
        self.entries.get(self.cursor_index)
    }

    /// 선택된 엔트리 (스냅샷 순서)
    pub fn selected_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.selected)
    }

    /// 현재 디렉토리의 전체 경로 (`C:\SRC`)
    pub fn dir_path(&self) -> String {
        path::dir_path(self.drive, &self.path)
    }

    /// 현재 디렉토리 안 항목의 전체 경로 (`C:\SRC\A.TXT`)
    pub fn entry_path(&self, name: &str) -> String {
        path::build(self.drive, &self.path, name)
    }

    /// 디렉토리 읽기
    ///
    /// 성공 시 드라이브/경로/엔트리를 교체하고 커서, 스크롤, 선택을 초기화합니다.
    /// 실패 시 기존 스냅샷은 그대로 남습니다.
    pub fn populate<F: FileSystem>(&mut self, fs: &F, drive: DriveId, dir: &str) -> Result<()> {
        let dir = path::normalize_dir(dir);
        let pattern = path::build(drive, &dir, ALL_FILES_PATTERN);
        let raw_entries = fs.list_directory(&pattern)?;

        let mut entries = Vec::new();
        if !path::is_root(&dir) {
            entries.push(Entry::parent());
        }
        let room = self
            .capacity
            .map_or(usize::MAX, |cap| cap.saturating_sub(entries.len()));

        let mut listed = Vec::new();
        let mut truncated = false;
        for raw in raw_entries.into_iter().filter(|raw| !raw.is_dot_entry()) {
            if listed.len() >= room {
                truncated = true;
                break;
            }
            listed.push(Entry::from(raw));
        }
        listed.sort_by(compare_entries);
        entries.extend(listed);

        debug!(
            drive = %drive,
            path = %dir,
            count = entries.len(),
            truncated,
            "directory populated"
        );

        self.drive = drive;
        self.path = dir;
        self.entries = entries;
        self.truncated = truncated;
        self.cursor_index = 0;
        self.top_index = 0;
        self.selected_count = 0;
        Ok(())
    }

    /// 현재 디렉토리를 다시 읽고 가능한 한 커서 위치를 유지
    pub fn refresh<F: FileSystem>(&mut self, fs: &F) -> Result<()> {
        let old_cursor = self.cursor_index;
        let dir = self.path.clone();
        self.populate(fs, self.drive, &dir)?;

        if !self.entries.is_empty() {
            self.cursor_index = old_cursor.min(self.entries.len() - 1);
        }
        self.scroll_to_cursor();
        Ok(())
    }

    /// 하위 디렉토리로 이동
    ///
    /// 성공 여부와 관계없이 커서와 스크롤은 0으로 초기화됩니다.
    pub fn change_directory<F: FileSystem>(&mut self, fs: &F, name: &str) -> Result<()> {
        if path::is_parent_name(name) {
            return self.go_parent(fs);
        }
        let new_path = path::append(&self.path, name);
        let result = self.populate(fs, self.drive, &new_path);
        self.cursor_index = 0;
        self.top_index = 0;
        result
    }

    /// 상위 디렉토리로 이동 (루트에서는 아무것도 하지 않음)
    pub fn go_parent<F: FileSystem>(&mut self, fs: &F) -> Result<()> {
        if self.is_root() {
            return Ok(());
        }
        let parent = path::parent(&self.path);
        self.populate(fs, self.drive, &parent)
    }

    /// 드라이브 변경 (루트로 이동)
    pub fn set_drive<F: FileSystem>(&mut self, fs: &F, drive: DriveId) -> Result<()> {
        self.populate(fs, drive, "\\")
    }

    /// 커서 이동
    pub fn navigate(&mut self, direction: Navigation) {
        let max_index = self.entries.len().saturating_sub(1);
        let page = self.viewport_height;

        self.cursor_index = match direction {
            Navigation::Up => self.cursor_index.saturating_sub(1),
            Navigation::Down => (self.cursor_index + 1).min(max_index),
            Navigation::Home => 0,
            Navigation::End => max_index,
            Navigation::PageUp => self.cursor_index.saturating_sub(page),
            Navigation::PageDown => (self.cursor_index + page).min(max_index),
        };
        self.scroll_to_cursor();
    }

    /// 뷰포트 높이 변경 (최소 1)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.scroll_to_cursor();
    }

    /// 커서가 뷰포트를 벗어날 때만 스크롤
    fn scroll_to_cursor(&mut self) {
        let max_index = self.entries.len().saturating_sub(1);
        self.cursor_index = self.cursor_index.min(max_index);

        if self.cursor_index < self.top_index {
            self.top_index = self.cursor_index;
        } else if self.cursor_index >= self.top_index + self.viewport_height {
            self.top_index = self.cursor_index + 1 - self.viewport_height;
        }
    }

    /// 커서 위치 엔트리의 선택 토글 (`..`는 무시)
    pub fn toggle_selection(&mut self) {
        let Some(entry) = self.entries.get_mut(self.cursor_index) else {
            return;
        };
        if !entry.is_operable() {
            return;
        }

        entry.selected = !entry.selected;
        if entry.selected {
            self.selected_count += 1;
        } else {
            self.selected_count = self.selected_count.saturating_sub(1);
        }
    }

    /// 모든 선택 해제
    pub fn clear_selection(&mut self) {
        for entry in &mut self.entries {
            entry.selected = false;
        }
        self.selected_count = 0;
    }
}
