// Formatters - 파일 크기, 날짜 포맷팅

use chrono::{DateTime, Local};
use std::time::SystemTime;

/// 천 단위 콤마가 들어간 숫자 문자열
///
/// # Examples
/// ```
/// use igc::utils::formatter::format_number_with_commas;
///
/// assert_eq!(format_number_with_commas(0), "0");
/// assert_eq!(format_number_with_commas(1234567), "1,234,567");
/// ```
pub fn format_number_with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// 패널 크기 컬럼 형식 (바이트 → `1,023`, KB → `12K`, MB → `3M`)
///
/// # Examples
/// ```
/// use igc::utils::formatter::format_file_size;
///
/// assert_eq!(format_file_size(512), "512");
/// assert_eq!(format_file_size(2048), "2K");
/// assert_eq!(format_file_size(3 * 1_048_576), "3M");
/// ```
pub fn format_file_size(bytes: u32) -> String {
    const KB: u32 = 1024;
    const MB: u32 = KB * 1024;

    if bytes < KB {
        format_number_with_commas(u64::from(bytes))
    } else if bytes < MB {
        format!("{}K", format_number_with_commas(u64::from(bytes / KB)))
    } else {
        format!("{}M", format_number_with_commas(u64::from(bytes / MB)))
    }
}

/// 디렉토리는 `<DIR>`, 파일은 크기
pub fn format_size_column(is_directory: bool, bytes: u32) -> String {
    if is_directory {
        "<DIR>".to_string()
    } else {
        format_file_size(bytes)
    }
}

/// 시스템 시간을 "YYYY-MM-DD HH:MM" 형식으로 포맷팅 (16자 고정)
pub fn format_date(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

/// 단수/복수형 선택
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
