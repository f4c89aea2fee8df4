//! 설정 파일 (TOML)
//!
//! 패널 상태(`[Settings]`), 드라이브 마운트 테이블(`[Drives]`),
//! 자원 한도(`[Limits]`)를 저장합니다. 읽기는 관대하게 동작해서 파일이
//! 없거나 깨져 있으면 기본값을 씁니다.

use crate::app::PanelSide;
use crate::core::engine::{MoveFallback, DEFAULT_BUFFER_SIZE};
use crate::models::snapshot::DEFAULT_VIEWPORT_HEIGHT;
use crate::utils::error::{IgcError, Result};
use crate::utils::path::{self, DriveId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 설정 파일 경로를 덮어쓰는 환경 변수
pub const SETTINGS_FILE_ENV: &str = "IGC_SETTINGS_FILE";

const DEFAULT_DRIVE: char = 'C';

/// 패널 하나의 위치 (드라이브 + 경로)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLocation {
    pub drive: DriveId,
    pub path: String,
}

/// 영속 패널 상태 (`[Settings]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PanelSettings {
    pub left_drive: String,
    pub left_path: String,
    pub right_drive: String,
    pub right_path: String,
    pub active_panel: PanelSide,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            left_drive: DEFAULT_DRIVE.to_string(),
            left_path: "\\".to_string(),
            right_drive: DEFAULT_DRIVE.to_string(),
            right_path: "\\".to_string(),
            active_panel: PanelSide::Left,
        }
    }
}

impl PanelSettings {
    /// 패널 위치 해석 (잘못된 드라이브 문자는 `fallback`)
    pub fn location(&self, side: PanelSide, fallback: DriveId) -> PanelLocation {
        let (drive, dir) = match side {
            PanelSide::Left => (&self.left_drive, &self.left_path),
            PanelSide::Right => (&self.right_drive, &self.right_path),
        };
        PanelLocation {
            drive: parse_drive(drive).unwrap_or(fallback),
            path: path::normalize_dir(dir),
        }
    }

    pub fn set_location(&mut self, side: PanelSide, location: &PanelLocation) {
        let drive = location.drive.letter().to_string();
        let dir = location.path.clone();
        match side {
            PanelSide::Left => {
                self.left_drive = drive;
                self.left_path = dir;
            }
            PanelSide::Right => {
                self.right_drive = drive;
                self.right_path = dir;
            }
        }
    }
}

/// 자원 한도 (`[Limits]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Limits {
    /// 스냅샷 하나의 최대 엔트리 수 (`..` 포함)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel_capacity: Option<usize>,
    pub copy_buffer_size: usize,
    pub viewport_height: usize,
    pub move_fallback: MoveFallback,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            panel_capacity: None,
            copy_buffer_size: DEFAULT_BUFFER_SIZE,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            move_fallback: MoveFallback::default(),
        }
    }
}

/// 전체 설정 파일
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub settings: PanelSettings,
    /// 드라이브 문자 → 호스트 디렉토리
    pub drives: BTreeMap<String, PathBuf>,
    pub limits: Limits,
}

impl Settings {
    /// 설정 파일 경로 (환경 변수 우선, 없으면 사용자 설정 디렉토리)
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(custom) = env::var(SETTINGS_FILE_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        dirs::config_dir().map(|dir| dir.join("igc").join("igc.toml"))
    }

    /// 파일에서 읽기 (없거나 깨졌으면 기본값)
    pub fn load_from(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "settings not read, using defaults");
                return Self::default();
            }
        };
        match Self::decode(&data) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "settings ignored");
                Self::default()
            }
        }
    }

    pub fn decode(data: &str) -> Result<Self> {
        toml::from_str(data).map_err(|e| IgcError::Config(e.to_string()))
    }

    pub fn encode(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| IgcError::Config(e.to_string()))
    }

    /// 파일로 저장 (상위 디렉토리 자동 생성)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.encode()?)?;
        Ok(())
    }

    /// 유효한 드라이브 마운트 목록 (`A`–`Z` 이외는 무시)
    pub fn drive_table(&self) -> Vec<(DriveId, PathBuf)> {
        self.drives
            .iter()
            .filter_map(|(letter, root)| match parse_drive(letter) {
                Some(drive) => Some((drive, root.clone())),
                None => {
                    warn!(drive = %letter, "ignoring invalid drive letter");
                    None
                }
            })
            .collect()
    }

    /// 드라이브 테이블이 비어 있으면 기본 드라이브 하나를 마운트
    pub fn ensure_drive(&mut self, root: PathBuf) {
        if self.drive_table().is_empty() {
            self.drives.insert(DEFAULT_DRIVE.to_string(), root);
        }
    }

    /// 첫 번째 유효 드라이브 (없으면 `C`)
    pub fn first_drive(&self) -> DriveId {
        self.drive_table()
            .first()
            .map(|(drive, _)| *drive)
            .unwrap_or_default()
    }
}

/// `C`, `c`, `C:` 형식의 드라이브 문자 해석
pub fn parse_drive(value: &str) -> Option<DriveId> {
    let trimmed = value.trim().trim_end_matches(':');
    let mut chars = trimmed.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    DriveId::from_letter(letter)
}
