use crate::models::file_entry::{FileAttributes, RawEntry};
use crate::utils::error::{IgcError, Result};
use crate::utils::path::{self, DriveId, SEPARATOR};
use crate::utils::pattern;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

/// 파일 시스템 어댑터
///
/// 엔진과 스냅샷이 수행하는 모든 실제 I/O는 이 트레이트를 거칩니다.
/// 경로는 `C:\DIR\NAME.EXT` 형식의 전체 경로입니다. 핸들은 `Read`/`Write`
/// 구현체이며 drop 시 닫힙니다.
pub trait FileSystem {
    type Reader: Read;
    type Writer: Write;

    /// `C:\DIR\*.*` 형식 패턴으로 디렉토리 목록 조회
    fn list_directory(&self, pattern: &str) -> Result<Vec<RawEntry>>;

    /// 읽기용으로 파일 열기
    fn open(&self, path: &str) -> Result<Self::Reader>;

    /// 파일 생성 (이미 있으면 비움)
    fn create(&self, path: &str) -> Result<Self::Writer>;

    fn delete(&self, path: &str) -> Result<()>;

    fn rename(&self, old_path: &str, new_path: &str) -> Result<()>;

    fn mkdir(&self, path: &str) -> Result<()>;

    fn rmdir(&self, path: &str) -> Result<()>;

    fn get_attributes(&self, path: &str) -> Result<FileAttributes>;

    fn set_attributes(&self, path: &str, attributes: FileAttributes) -> Result<()>;

    fn exists(&self, path: &str) -> bool;
}

/// 호스트 파일 시스템 어댑터
///
/// 드라이브 문자마다 호스트 디렉토리 하나를 마운트합니다.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    drives: BTreeMap<DriveId, PathBuf>,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// 드라이브 마운트 (기존 마운트는 교체)
    pub fn mount(&mut self, drive: DriveId, root: PathBuf) {
        self.drives.insert(drive, root);
    }

    pub fn with_drive(mut self, drive: DriveId, root: PathBuf) -> Self {
        self.mount(drive, root);
        self
    }

    /// 마운트된 드라이브 목록
    pub fn drives(&self) -> Vec<DriveId> {
        self.drives.keys().copied().collect()
    }

    /// 레거시 경로를 호스트 경로로 변환
    pub fn resolve(&self, full_path: &str) -> Result<PathBuf> {
        let (drive, rest) = path::split_drive(full_path).ok_or_else(|| IgcError::NotFound {
            path: full_path.to_string(),
        })?;
        let root = self
            .drives
            .get(&drive)
            .ok_or(IgcError::MediaNotReady {
                drive: drive.letter(),
            })?;

        let mut host = root.clone();
        for component in rest.split(SEPARATOR).filter(|c| !c.is_empty()) {
            if component == "." || component == ".." {
                return Err(IgcError::InvalidName {
                    name: component.to_string(),
                    reason: "relative component in path",
                });
            }
            host.push(component);
        }
        Ok(host)
    }

    fn io_error(err: std::io::Error, path: &str) -> IgcError {
        IgcError::from_io(err, path)
    }
}

impl FileSystem for LocalFileSystem {
    type Reader = File;
    type Writer = File;

    fn list_directory(&self, pattern_path: &str) -> Result<Vec<RawEntry>> {
        let dir = path::parent(pattern_path);
        let wildcard = path::basename(pattern_path);
        let host_dir = self.resolve(&dir)?;

        if !host_dir.exists() {
            return Err(IgcError::NotFound { path: dir });
        }
        if !host_dir.is_dir() {
            return Err(IgcError::NotADirectory { path: dir });
        }

        let read_dir = fs::read_dir(&host_dir).map_err(|e| Self::io_error(e, &dir))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            // 읽을 수 없는 항목은 스킵
            let Ok(entry) = entry else { continue };
            let name = entry.file_name().to_string_lossy().to_string();
            if !pattern::matches(wildcard, &name) {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };

            let mut attributes = if metadata.is_dir() {
                FileAttributes::directory()
            } else {
                FileAttributes::file()
            };
            if metadata.permissions().readonly() {
                attributes = attributes.with(FileAttributes::READ_ONLY);
            }
            if name.starts_with('.') {
                attributes = attributes.with(FileAttributes::HIDDEN);
            }

            entries.push(RawEntry {
                name,
                attributes,
                size: u32::try_from(metadata.len()).unwrap_or(u32::MAX),
                modified: metadata
                    .modified()
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
            });
        }

        Ok(entries)
    }

    fn open(&self, path: &str) -> Result<File> {
        let host = self.resolve(path)?;
        if host.is_dir() {
            return Err(IgcError::PermissionOrReadOnly {
                path: path.to_string(),
            });
        }
        File::open(host).map_err(|e| Self::io_error(e, path))
    }

    fn create(&self, path: &str) -> Result<File> {
        let host = self.resolve(path)?;
        File::create(host).map_err(|e| Self::io_error(e, path))
    }

    fn delete(&self, path: &str) -> Result<()> {
        let host = self.resolve(path)?;
        fs::remove_file(host).map_err(|e| Self::io_error(e, path))
    }

    fn rename(&self, old_path: &str, new_path: &str) -> Result<()> {
        let src = self.resolve(old_path)?;
        let dest = self.resolve(new_path)?;

        if !src.exists() {
            return Err(IgcError::NotFound {
                path: old_path.to_string(),
            });
        }
        // 호스트 rename은 대상 파일을 덮어쓰므로 먼저 막는다
        if dest.exists() {
            return Err(IgcError::AlreadyExists {
                path: new_path.to_string(),
            });
        }

        fs::rename(&src, &dest).map_err(|e| {
            if e.kind() == std::io::ErrorKind::CrossesDevices {
                IgcError::CrossDevice {
                    src: old_path.to_string(),
                    dst: new_path.to_string(),
                }
            } else {
                Self::io_error(e, old_path)
            }
        })
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        let host = self.resolve(path)?;
        if host.exists() {
            return Err(IgcError::AlreadyExists {
                path: path.to_string(),
            });
        }
        fs::create_dir(host).map_err(|e| Self::io_error(e, path))
    }

    fn rmdir(&self, path: &str) -> Result<()> {
        let host = self.resolve(path)?;
        fs::remove_dir(host).map_err(|e| Self::io_error(e, path))
    }

    fn get_attributes(&self, path: &str) -> Result<FileAttributes> {
        let host = self.resolve(path)?;
        let metadata = fs::metadata(host).map_err(|e| Self::io_error(e, path))?;
        let mut attributes = if metadata.is_dir() {
            FileAttributes::directory()
        } else {
            FileAttributes::file()
        };
        if metadata.permissions().readonly() {
            attributes = attributes.with(FileAttributes::READ_ONLY);
        }
        Ok(attributes)
    }

    fn set_attributes(&self, path: &str, attributes: FileAttributes) -> Result<()> {
        let host = self.resolve(path)?;
        let metadata = fs::metadata(&host).map_err(|e| Self::io_error(e, path))?;
        let mut permissions = metadata.permissions();
        // 호스트에는 읽기 전용 비트만 반영된다
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(attributes.is_read_only());
        fs::set_permissions(host, permissions).map_err(|e| Self::io_error(e, path))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|host| host.exists()).unwrap_or(false)
    }
}
