//! 레거시 드라이브 경로 유틸리티
//!
//! 경로는 `C:\DIR\NAME.EXT` 형식입니다. 패널이 보관하는 디렉토리 경로는
//! 드라이브 문자를 뺀 부분(`\DIR`, 루트는 `\`)만 가집니다.

use crate::utils::error::{IgcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 경로 구분자
pub const SEPARATOR: char = '\\';

/// 합성 부모 엔트리 이름
pub const PARENT_NAME: &str = "..";

/// 이름 최대 길이 (8 + '.' + 3)
pub const MAX_NAME_LEN: usize = 12;

/// 모든 엔트리에 매칭되는 목록 패턴
pub const ALL_FILES_PATTERN: &str = "*.*";

const INVALID_NAME_CHARS: &[char] = &[
    '\\', '/', ':', '*', '?', '"', '<', '>', '|', '+', '=', ';', ',', '[', ']', ' ',
];

/// 드라이브 번호 (0 = A, 1 = B, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriveId(u8);

impl DriveId {
    pub const MAX: u8 = 25;

    pub fn new(index: u8) -> Option<Self> {
        (index <= Self::MAX).then_some(Self(index))
    }

    /// 드라이브 문자로부터 생성 (대소문자 무시)
    pub fn from_letter(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(Self(upper as u8 - b'A'))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

/// 기본 드라이브는 `C:`
impl Default for DriveId {
    fn default() -> Self {
        Self(2)
    }
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.letter())
    }
}

/// 루트 디렉토리 여부 (빈 문자열 또는 `\`)
pub fn is_root(dir: &str) -> bool {
    dir.is_empty() || dir == "\\"
}

/// 사용자 입력/설정 경로를 `\DIR\SUB` 형식으로 정규화
pub fn normalize_dir(dir: &str) -> String {
    let mut out = String::from(SEPARATOR);
    for component in dir.split(['\\', '/']).filter(|c| !c.is_empty()) {
        append_in_place(&mut out, component);
    }
    out
}

/// 경로에 구성요소 추가 (필요하면 구분자 삽입)
pub fn append(path: &str, component: &str) -> String {
    let mut out = path.to_string();
    append_in_place(&mut out, component);
    out
}

fn append_in_place(path: &mut String, component: &str) {
    if !path.is_empty() && !path.ends_with(SEPARATOR) {
        path.push(SEPARATOR);
    }
    path.push_str(component);
}

/// 마지막 구성요소를 제거한 부모 경로
///
/// `\SRC\SUB` → `\SRC`, `\SRC` → `\`, 구분자가 없으면 루트(빈 문자열).
pub fn parent(path: &str) -> String {
    match path.rfind(SEPARATOR) {
        Some(0) => String::from(SEPARATOR),
        Some(idx) if path[..idx].ends_with(':') => path[..=idx].to_string(),
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

/// 경로의 마지막 구성요소
pub fn basename(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// 드라이브 + 디렉토리의 전체 경로 (`C:\SRC`, 루트는 `C:\`)
pub fn dir_path(drive: DriveId, dir: &str) -> String {
    let mut out = format!("{}{}", drive, SEPARATOR);
    out.push_str(dir.trim_start_matches(SEPARATOR));
    out
}

/// 드라이브 + 디렉토리 + 이름의 전체 경로 (`C:\SRC\A.TXT`)
pub fn build(drive: DriveId, dir: &str, name: &str) -> String {
    append(&dir_path(drive, dir), name)
}

/// 전체 경로를 드라이브와 나머지로 분리 (`C:\SRC` → (C, `\SRC`))
pub fn split_drive(full: &str) -> Option<(DriveId, &str)> {
    let mut chars = full.chars();
    let letter = chars.next()?;
    if chars.next()? != ':' {
        return None;
    }
    let drive = DriveId::from_letter(letter)?;
    Some((drive, &full[2..]))
}

/// 합성 부모 엔트리 이름인지 확인
pub fn is_parent_name(name: &str) -> bool {
    name == PARENT_NAME
}

/// 파일/디렉토리 이름 검증 (8.3 규칙)
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(IgcError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name == "." || name == PARENT_NAME {
        return invalid("reserved name");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return invalid("longer than 12 characters");
    }
    if name
        .chars()
        .any(|c| c.is_control() || !c.is_ascii() || INVALID_NAME_CHARS.contains(&c))
    {
        return invalid("contains an invalid character");
    }

    let (base, ext) = match name.split_once('.') {
        Some((base, ext)) => (base, Some(ext)),
        None => (name, None),
    };
    if base.is_empty() || base.len() > 8 {
        return invalid("base name must be 1-8 characters");
    }
    if let Some(ext) = ext {
        if ext.contains('.') {
            return invalid("only one '.' is allowed");
        }
        if ext.len() > 3 {
            return invalid("extension must be at most 3 characters");
        }
    }
    Ok(())
}
