//! 메모리 기반 파일 시스템 어댑터
//!
//! 레거시 파일 시스템의 동작을 흉내냅니다: 이름은 대소문자를 구분하지 않고,
//! 루트가 아닌 디렉토리 목록에는 실제 `.`/`..` 항목이 포함되며, 읽기 전용
//! 파일은 삭제할 수 없고, 목록은 생성 순서로 반환됩니다.
//! 장애 주입(rename 실패, 쓰기 실패, 목록 실패)을 지원합니다.

use crate::models::file_entry::{FileAttributes, RawEntry};
use crate::system::filesystem::FileSystem;
use crate::utils::error::{IgcError, Result};
use crate::utils::path::{self, DriveId};
use crate::utils::pattern;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// rename 장애 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameFault {
    /// 다른 장치로 간주
    CrossDevice,
    /// 잠김/권한 문제
    Locked,
}

#[derive(Debug, Clone)]
enum NodeKind {
    File(Vec<u8>),
    Directory,
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    kind: NodeKind,
    attributes: FileAttributes,
    modified: SystemTime,
    order: u64,
}

#[derive(Debug, Default)]
struct State {
    drives: BTreeSet<DriveId>,
    nodes: BTreeMap<String, Node>,
    next_order: u64,
    rename_fault: Option<RenameFault>,
    rename_attempts: usize,
    write_limits: HashMap<String, usize>,
    unreadable: BTreeSet<String>,
    unlistable: BTreeSet<String>,
}

impl State {
    fn next_order(&mut self) -> u64 {
        self.next_order += 1;
        self.next_order
    }

    fn check_drive(&self, key: &str) -> Result<()> {
        match path::split_drive(key) {
            Some((drive, _)) if self.drives.contains(&drive) => Ok(()),
            Some((drive, _)) => Err(IgcError::MediaNotReady {
                drive: drive.letter(),
            }),
            None => Err(IgcError::NotFound {
                path: key.to_string(),
            }),
        }
    }

    fn is_root(key: &str) -> bool {
        key.len() == 3 && key.ends_with(":\\")
    }

    fn is_dir(&self, key: &str) -> bool {
        Self::is_root(key)
            || matches!(
                self.nodes.get(key),
                Some(Node {
                    kind: NodeKind::Directory,
                    ..
                })
            )
    }

    fn exists(&self, key: &str) -> bool {
        self.check_drive(key).is_ok() && (Self::is_root(key) || self.nodes.contains_key(key))
    }

    /// 부모 디렉토리가 존재해야 새 항목을 만들 수 있다
    fn check_parent(&self, key: &str, display: &str) -> Result<()> {
        self.check_drive(key)?;
        if self.is_dir(&path::parent(key)) {
            Ok(())
        } else {
            Err(IgcError::NotFound {
                path: path::parent(display),
            })
        }
    }

    fn children(&self, dir_key: &str) -> Vec<(&String, &Node)> {
        let mut children: Vec<(&String, &Node)> = self
            .nodes
            .iter()
            .filter(|(key, _)| path::parent(key) == dir_key)
            .collect();
        children.sort_by_key(|(_, node)| node.order);
        children
    }

    fn insert(&mut self, key: String, display: &str, kind: NodeKind, attributes: FileAttributes) {
        let order = self.next_order();
        let name = path::basename(display).to_string();
        self.nodes.insert(
            key,
            Node {
                name,
                kind,
                attributes,
                modified: SystemTime::UNIX_EPOCH + Duration::from_secs(order),
                order,
            },
        );
    }
}

/// 경로 키 정규화 (대문자, 끝 구분자 제거, 루트는 `C:\`)
fn key_of(full_path: &str) -> String {
    let upper = full_path.to_ascii_uppercase();
    let trimmed = upper.trim_end_matches(path::SEPARATOR);
    if trimmed.len() == 2 && trimmed.ends_with(':') {
        format!("{}{}", trimmed, path::SEPARATOR)
    } else {
        trimmed.to_string()
    }
}

/// 메모리 파일 시스템
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    state: Rc<RefCell<State>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 드라이브 추가 (빈 루트)
    pub fn with_drive(self, letter: char) -> Self {
        if let Some(drive) = DriveId::from_letter(letter) {
            self.state.borrow_mut().drives.insert(drive);
        }
        self
    }

    /// 디렉토리 추가 (중간 경로 자동 생성)
    pub fn add_dir(&self, full_path: &str) -> &Self {
        let mut state = self.state.borrow_mut();
        let mut current = String::new();
        for component in full_path.split(path::SEPARATOR).filter(|c| !c.is_empty()) {
            current = if current.is_empty() {
                format!("{}{}", component, path::SEPARATOR)
            } else {
                path::append(&current, component)
            };
            let key = key_of(&current);
            if !State::is_root(&key) && !state.nodes.contains_key(&key) {
                state.insert(key, &current, NodeKind::Directory, FileAttributes::directory());
            }
        }
        self
    }

    /// 파일 추가 (부모 디렉토리 자동 생성)
    pub fn add_file(&self, full_path: &str, content: &[u8]) -> &Self {
        let parent = path::parent(full_path);
        self.add_dir(&parent);
        let mut state = self.state.borrow_mut();
        state.insert(
            key_of(full_path),
            full_path,
            NodeKind::File(content.to_vec()),
            FileAttributes::file(),
        );
        self
    }

    /// 파일 내용 조회
    pub fn read_file(&self, full_path: &str) -> Option<Vec<u8>> {
        match &self.state.borrow().nodes.get(&key_of(full_path))?.kind {
            NodeKind::File(data) => Some(data.clone()),
            NodeKind::Directory => None,
        }
    }

    pub fn is_directory(&self, full_path: &str) -> bool {
        self.state.borrow().is_dir(&key_of(full_path))
    }

    /// 읽기 전용 속성 설정
    pub fn set_read_only(&self, full_path: &str) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(&key_of(full_path)) {
            node.attributes = node.attributes.with(FileAttributes::READ_ONLY);
        }
    }

    /// 이후 모든 rename을 실패시킨다
    pub fn fail_renames(&self, fault: RenameFault) {
        self.state.borrow_mut().rename_fault = Some(fault);
    }

    pub fn rename_attempts(&self) -> usize {
        self.state.borrow().rename_attempts
    }

    /// 해당 경로로의 쓰기를 `bytes` 바이트 이후 실패시킨다 (디스크 가득 참)
    pub fn fail_writes_after(&self, full_path: &str, bytes: usize) {
        self.state
            .borrow_mut()
            .write_limits
            .insert(key_of(full_path), bytes);
    }

    /// 해당 파일 읽기를 실패시킨다
    pub fn fail_reads(&self, full_path: &str) {
        self.state.borrow_mut().unreadable.insert(key_of(full_path));
    }

    /// 해당 디렉토리 목록 조회를 실패시킨다
    pub fn fail_listing(&self, full_path: &str) {
        self.state.borrow_mut().unlistable.insert(key_of(full_path));
    }

    /// 디렉토리 아래 전체 항목 수 (재귀)
    pub fn count_under(&self, full_path: &str) -> usize {
        let key = key_of(full_path);
        let prefix = format!("{}{}", key.trim_end_matches(path::SEPARATOR), path::SEPARATOR);
        self.state
            .borrow()
            .nodes
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .count()
    }
}

/// 메모리 파일 읽기 핸들
#[derive(Debug)]
pub struct MemoryReader {
    data: Cursor<Vec<u8>>,
    fail: bool,
}

impl Read for MemoryReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::other("sector not found"));
        }
        self.data.read(buf)
    }
}

/// 메모리 파일 쓰기 핸들 (쓴 내용이 즉시 파일에 반영됨)
#[derive(Debug)]
pub struct MemoryWriter {
    state: Rc<RefCell<State>>,
    key: String,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        let limit = state.write_limits.get(&self.key).copied();
        let node = state
            .nodes
            .get_mut(&self.key)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let NodeKind::File(data) = &mut node.kind else {
            return Err(io::Error::from(io::ErrorKind::IsADirectory));
        };

        let room = limit.map_or(buf.len(), |limit| limit.saturating_sub(data.len()));
        if room == 0 && !buf.is_empty() {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
        }
        let n = room.min(buf.len());
        data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    type Reader = MemoryReader;
    type Writer = MemoryWriter;

    fn list_directory(&self, pattern_path: &str) -> Result<Vec<RawEntry>> {
        let dir = path::parent(pattern_path);
        let wildcard = path::basename(pattern_path);
        let dir_key = key_of(&dir);
        let state = self.state.borrow();

        state.check_drive(&dir_key)?;
        if state.unlistable.contains(&dir_key) {
            return Err(IgcError::PermissionOrReadOnly { path: dir });
        }
        if !state.exists(&dir_key) {
            return Err(IgcError::NotFound { path: dir });
        }
        if !state.is_dir(&dir_key) {
            return Err(IgcError::NotADirectory { path: dir });
        }

        let mut entries = Vec::new();
        if !State::is_root(&dir_key) {
            for dot in [".", path::PARENT_NAME] {
                entries.push(RawEntry {
                    name: dot.to_string(),
                    attributes: FileAttributes::directory(),
                    size: 0,
                    modified: SystemTime::UNIX_EPOCH,
                });
            }
        }
        for (_, node) in state.children(&dir_key) {
            if !pattern::matches(wildcard, &node.name) {
                continue;
            }
            let size = match &node.kind {
                NodeKind::File(data) => u32::try_from(data.len()).unwrap_or(u32::MAX),
                NodeKind::Directory => 0,
            };
            entries.push(RawEntry {
                name: node.name.clone(),
                attributes: node.attributes,
                size,
                modified: node.modified,
            });
        }
        Ok(entries)
    }

    fn open(&self, full_path: &str) -> Result<MemoryReader> {
        let key = key_of(full_path);
        let state = self.state.borrow();
        state.check_drive(&key)?;
        match state.nodes.get(&key) {
            Some(Node {
                kind: NodeKind::File(data),
                ..
            }) => Ok(MemoryReader {
                data: Cursor::new(data.clone()),
                fail: state.unreadable.contains(&key),
            }),
            Some(_) => Err(IgcError::PermissionOrReadOnly {
                path: full_path.to_string(),
            }),
            None => Err(IgcError::NotFound {
                path: full_path.to_string(),
            }),
        }
    }

    fn create(&self, full_path: &str) -> Result<MemoryWriter> {
        let key = key_of(full_path);
        {
            let mut state = self.state.borrow_mut();
            state.check_parent(&key, full_path)?;
            let existing = state.nodes.get(&key).map(|node| node.attributes);
            match existing {
                Some(attributes) if attributes.is_directory() || attributes.is_read_only() => {
                    return Err(IgcError::PermissionOrReadOnly {
                        path: full_path.to_string(),
                    });
                }
                Some(_) => {
                    if let Some(node) = state.nodes.get_mut(&key) {
                        node.kind = NodeKind::File(Vec::new());
                    }
                }
                None => state.insert(
                    key.clone(),
                    full_path,
                    NodeKind::File(Vec::new()),
                    FileAttributes::file(),
                ),
            }
        }
        Ok(MemoryWriter {
            state: Rc::clone(&self.state),
            key,
        })
    }

    fn delete(&self, full_path: &str) -> Result<()> {
        let key = key_of(full_path);
        let mut state = self.state.borrow_mut();
        state.check_drive(&key)?;
        let attributes = state
            .nodes
            .get(&key)
            .map(|node| node.attributes)
            .ok_or_else(|| IgcError::NotFound {
                path: full_path.to_string(),
            })?;
        if attributes.is_directory() || attributes.is_read_only() {
            return Err(IgcError::PermissionOrReadOnly {
                path: full_path.to_string(),
            });
        }
        state.nodes.remove(&key);
        Ok(())
    }

    fn rename(&self, old_path: &str, new_path: &str) -> Result<()> {
        let old_key = key_of(old_path);
        let new_key = key_of(new_path);
        let mut state = self.state.borrow_mut();
        state.rename_attempts += 1;

        state.check_drive(&old_key)?;
        if !state.nodes.contains_key(&old_key) {
            return Err(IgcError::NotFound {
                path: old_path.to_string(),
            });
        }
        let same_drive = old_key.get(..2) == new_key.get(..2);
        match state.rename_fault {
            Some(RenameFault::CrossDevice) => {
                return Err(IgcError::CrossDevice {
                    src: old_path.to_string(),
                    dst: new_path.to_string(),
                })
            }
            Some(RenameFault::Locked) => {
                return Err(IgcError::PermissionOrReadOnly {
                    path: old_path.to_string(),
                })
            }
            None if !same_drive => {
                return Err(IgcError::CrossDevice {
                    src: old_path.to_string(),
                    dst: new_path.to_string(),
                })
            }
            None => {}
        }
        if state.nodes.contains_key(&new_key) {
            return Err(IgcError::AlreadyExists {
                path: new_path.to_string(),
            });
        }
        state.check_parent(&new_key, new_path)?;

        // 하위 항목까지 키 이동
        let old_prefix = format!("{}{}", old_key, path::SEPARATOR);
        let moved: Vec<String> = state
            .nodes
            .keys()
            .filter(|key| **key == old_key || key.starts_with(&old_prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(mut node) = state.nodes.remove(&key) {
                let new_child_key = format!("{}{}", new_key, &key[old_key.len()..]);
                if key == old_key {
                    node.name = path::basename(new_path).to_string();
                }
                state.nodes.insert(new_child_key, node);
            }
        }
        Ok(())
    }

    fn mkdir(&self, full_path: &str) -> Result<()> {
        let key = key_of(full_path);
        let mut state = self.state.borrow_mut();
        state.check_parent(&key, full_path)?;
        if state.exists(&key) {
            return Err(IgcError::AlreadyExists {
                path: full_path.to_string(),
            });
        }
        state.insert(key, full_path, NodeKind::Directory, FileAttributes::directory());
        Ok(())
    }

    fn rmdir(&self, full_path: &str) -> Result<()> {
        let key = key_of(full_path);
        let mut state = self.state.borrow_mut();
        state.check_drive(&key)?;
        if !state.nodes.contains_key(&key) {
            return Err(IgcError::NotFound {
                path: full_path.to_string(),
            });
        }
        if !state.is_dir(&key) {
            return Err(IgcError::NotADirectory {
                path: full_path.to_string(),
            });
        }
        if !state.children(&key).is_empty() {
            return Err(IgcError::PermissionOrReadOnly {
                path: full_path.to_string(),
            });
        }
        state.nodes.remove(&key);
        Ok(())
    }

    fn get_attributes(&self, full_path: &str) -> Result<FileAttributes> {
        let key = key_of(full_path);
        let state = self.state.borrow();
        state.check_drive(&key)?;
        if State::is_root(&key) {
            return Ok(FileAttributes::directory());
        }
        state
            .nodes
            .get(&key)
            .map(|node| node.attributes)
            .ok_or_else(|| IgcError::NotFound {
                path: full_path.to_string(),
            })
    }

    fn set_attributes(&self, full_path: &str, attributes: FileAttributes) -> Result<()> {
        let key = key_of(full_path);
        let mut state = self.state.borrow_mut();
        state.check_drive(&key)?;
        let node = state.nodes.get_mut(&key).ok_or_else(|| IgcError::NotFound {
            path: full_path.to_string(),
        })?;
        // 디렉토리 비트는 바꿀 수 없다
        let directory_bit = node.attributes.bits() & FileAttributes::DIRECTORY;
        node.attributes = FileAttributes::from_bits(
            (attributes.bits() & !FileAttributes::DIRECTORY) | directory_bit,
        );
        Ok(())
    }

    fn exists(&self, full_path: &str) -> bool {
        self.state.borrow().exists(&key_of(full_path))
    }
}
