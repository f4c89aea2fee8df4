use crate::utils::path::{self, PARENT_NAME};
use std::time::SystemTime;

/// 파일 속성 비트 (레거시 속성 바이트와 같은 배치)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileAttributes(u8);

impl FileAttributes {
    pub const READ_ONLY: u8 = 0x01;
    pub const HIDDEN: u8 = 0x02;
    pub const SYSTEM: u8 = 0x04;
    pub const VOLUME: u8 = 0x08;
    pub const DIRECTORY: u8 = 0x10;
    pub const ARCHIVE: u8 = 0x20;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn directory() -> Self {
        Self(Self::DIRECTORY)
    }

    pub fn file() -> Self {
        Self(Self::ARCHIVE)
    }

    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    pub fn with(self, bit: u8) -> Self {
        Self(self.0 | bit)
    }

    pub fn without(self, bit: u8) -> Self {
        Self(self.0 & !bit)
    }

    pub fn is_directory(self) -> bool {
        self.contains(Self::DIRECTORY)
    }

    pub fn is_read_only(self) -> bool {
        self.contains(Self::READ_ONLY)
    }
}

/// 어댑터가 돌려주는 가공 전 디렉토리 항목 (`.`/`..` 포함 가능)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub attributes: FileAttributes,
    pub size: u32,
    pub modified: SystemTime,
}

impl RawEntry {
    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    /// 실제 `.` 또는 `..` 항목인지 확인
    pub fn is_dot_entry(&self) -> bool {
        self.name == "." || self.name == PARENT_NAME
    }
}

/// 스냅샷의 파일 엔트리
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 파일/디렉토리 이름 (원래 대소문자 유지)
    pub name: String,
    /// 디렉토리 여부
    pub is_directory: bool,
    /// 바이트 단위 크기
    pub size: u32,
    /// 수정 시간
    pub modified: SystemTime,
    /// 다중 선택 여부
    pub selected: bool,
}

impl Entry {
    pub fn new(name: String, is_directory: bool, size: u32, modified: SystemTime) -> Self {
        Self {
            name,
            is_directory,
            size,
            modified,
            selected: false,
        }
    }

    /// 합성 부모 엔트리 (`..`)
    pub fn parent() -> Self {
        Self::new(PARENT_NAME.to_string(), true, 0, SystemTime::UNIX_EPOCH)
    }

    pub fn is_parent(&self) -> bool {
        path::is_parent_name(&self.name)
    }

    /// 작업 대상이 될 수 있는지 (`..`, `.` 제외)
    pub fn is_operable(&self) -> bool {
        !self.is_parent() && self.name != "."
    }
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        let is_directory = raw.is_directory();
        Self::new(
            raw.name,
            is_directory,
            if is_directory { 0 } else { raw.size },
            raw.modified,
        )
    }
}
