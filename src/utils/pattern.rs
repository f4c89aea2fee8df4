//! 디렉토리 목록용 와일드카드 매칭
//!
//! `*` (0개 이상 임의 문자), `?` (임의 1문자) 지원. 대소문자 무시.
//! 패턴에 `.`이 있으면 이름과 확장자를 따로 매칭하므로 `*.*`는
//! 확장자 없는 이름도 매칭합니다.

/// 엔트리 이름이 목록 패턴에 매칭되는지 확인
pub fn matches(pattern: &str, name: &str) -> bool {
    match pattern.rsplit_once('.') {
        Some((base_pattern, ext_pattern)) => {
            let (base, ext) = name.rsplit_once('.').unwrap_or((name, ""));
            wildcard_match(base_pattern, base) && wildcard_match(ext_pattern, ext)
        }
        None => wildcard_match(pattern, name),
    }
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_ascii_uppercase().chars().collect();
    let text: Vec<char> = text.to_ascii_uppercase().chars().collect();
    match_chars(&pattern, &text)
}

fn match_chars(pattern: &[char], text: &[char]) -> bool {
    match (pattern.first(), text.first()) {
        (None, None) => true,
        (Some(&'*'), _) if text.is_empty() => match_chars(&pattern[1..], text),
        (Some(_), None) => pattern.iter().all(|&c| c == '*'),
        (None, Some(_)) => false,
        (Some(&'*'), Some(_)) => {
            match_chars(&pattern[1..], text) || match_chars(pattern, &text[1..])
        }
        (Some(&'?'), Some(_)) => match_chars(&pattern[1..], &text[1..]),
        (Some(&p), Some(&t)) => p == t && match_chars(&pattern[1..], &text[1..]),
    }
}
