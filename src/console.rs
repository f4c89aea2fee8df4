//! 줄 단위 콘솔 프런트엔드
//!
//! 명령어 한 줄을 액션 하나로 바꿔 [`Session`]에 전달하고, 대화상자와 진행률은
//! 표준 입출력으로 처리합니다. 명령어 뒤의 인자(`mkdir NAME`, `drive D`)는
//! 다음 입력 대화상자의 답으로 먼저 쓰입니다.
//!
//! 오류 알림은 응답을 기다리며, 여기서 `c`를 입력하거나 입력이 끝나면 진행 중인
//! 작업을 취소합니다.

use igc::app::{PanelSide, Session};
use igc::core::actions::{generate_help_entries, Action};
use igc::core::interaction::{
    CancelFlag, Collaborators, OverwriteDecision, ProgressSink, UserPrompt,
};
use igc::models::operation::{EntryOutcome, JobReport};
use igc::models::DirectorySnapshot;
use igc::system::FileSystem;
use igc::utils::formatter::{format_date, format_size_column, pluralize};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::debug;

const PROMPT: &str = "igc> ";

/// 표준 입출력 대화상자
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
    /// 명령어 인자에서 온 미리 채워진 입력
    pending: VecDeque<String>,
    eof: bool,
    cancel: CancelFlag,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
            eof: false,
            cancel: CancelFlag::new(),
        }
    }

    /// 알림 응답으로 설정되는 취소 플래그
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// 한 줄 읽기 (EOF면 `None`)
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if self.eof {
            return None;
        }
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                self.eof = true;
                None
            }
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text);
    }

    /// 다음 명령어 읽기 (인자는 대기열로)
    fn next_command(&mut self) -> Option<Command> {
        loop {
            let line = self.read_line(PROMPT)?;
            match parse_command(&line) {
                Ok(Some(command)) => {
                    self.pending = command.args.iter().cloned().collect();
                    return Some(command);
                }
                Ok(None) => continue,
                Err(message) => self.say(&message),
            }
        }
    }
}

impl<R: BufRead, W: Write> UserPrompt for ConsolePrompt<R, W> {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let question = format!("[{}] {} (y/n) ", title, message);
        loop {
            let Some(answer) = self.read_line(&question) else {
                return false;
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" | "" => return false,
                _ => continue,
            }
        }
    }

    fn overwrite(&mut self, name: &str) -> OverwriteDecision {
        let question = format!(
            "[Overwrite] {} already exists. (y)es/(n)o/(a)ll/(c)ancel ",
            name
        );
        loop {
            let Some(answer) = self.read_line(&question) else {
                return OverwriteDecision::Cancel;
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return OverwriteDecision::Yes,
                "n" | "no" => return OverwriteDecision::No,
                "a" | "all" => return OverwriteDecision::All,
                "c" | "cancel" => return OverwriteDecision::Cancel,
                _ => continue,
            }
        }
    }

    fn input_text(
        &mut self,
        title: &str,
        prompt: &str,
        initial: &str,
        max_len: usize,
    ) -> Option<String> {
        let text = match self.pending.pop_front() {
            Some(arg) => arg,
            None => {
                let question = if initial.is_empty() {
                    format!("[{}] {} ", title, prompt)
                } else {
                    format!("[{}] {} ({}) ", title, prompt, initial)
                };
                let answer = self.read_line(&question)?;
                if answer.trim().is_empty() {
                    initial.to_string()
                } else {
                    answer
                }
            }
        };
        if text.is_empty() {
            return None;
        }
        Some(text.chars().take(max_len).collect())
    }

    fn alert(&mut self, title: &str, message: &str) {
        self.say(&format!("[{}] {}", title, message));
        match self.read_line("Press Enter to continue, c to cancel ") {
            Some(answer) if !answer.trim().eq_ignore_ascii_case("c") => {}
            _ => {
                debug!("cancel requested from alert");
                self.cancel.cancel();
            }
        }
    }
}

/// 표준 에러로 진행률 출력
#[derive(Debug, Default)]
pub struct StderrProgress {
    visible: bool,
}

impl ProgressSink for StderrProgress {
    fn show(&mut self, label: &str, name: &str, current: usize, total: usize) {
        eprint!("\r{} {:<12} [{}/{}]", label, name, current, total);
        self.visible = true;
    }

    fn hide(&mut self) {
        if self.visible {
            eprintln!();
            self.visible = false;
        }
    }
}

/// 파싱된 명령어
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub args: Vec<String>,
}

/// 명령어 줄 파싱 (빈 줄은 `None`)
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let words = shlex::split(line).ok_or_else(|| "Unbalanced quotes".to_string())?;
    let Some((word, args)) = words.split_first() else {
        return Ok(None);
    };
    let action = Action::from_command(word)
        .or_else(|| Action::from_id(word))
        .ok_or_else(|| format!("Unknown command: {} (try help)", word))?;
    Ok(Some(Command {
        action,
        args: args.to_vec(),
    }))
}

/// 콘솔 루프 실행 (종료 확인 또는 입력 끝까지)
pub fn run<F, R, W>(session: &mut Session<F>, prompt: &mut ConsolePrompt<R, W>) -> io::Result<()>
where
    F: FileSystem,
    R: BufRead,
    W: Write,
{
    let cancel = prompt.cancel_flag();
    let mut progress = StderrProgress::default();
    render(session, &mut prompt.output)?;

    while !session.should_quit() {
        let Some(command) = prompt.next_command() else {
            debug!("input closed");
            break;
        };
        if command.action == Action::ShowHelp {
            print_help(&mut prompt.output)?;
            continue;
        }

        cancel.reset();
        let result = {
            let mut ui = Collaborators::new(prompt, &mut progress, &cancel);
            session.execute_action(command.action, &mut ui)
        };
        if let Err(err) = result {
            prompt.say(&format!("Error: {}", err));
        }
        if let Some(report) = session.take_report() {
            prompt.say(&summarize(&report));
        }
        if !session.should_quit() {
            render(session, &mut prompt.output)?;
        }
    }
    Ok(())
}

/// 작업 결과 한 줄 요약
pub fn summarize(report: &JobReport) -> String {
    let ok = report.count(EntryOutcome::Ok);
    let skipped = report.count(EntryOutcome::Skip);
    let failed = report.count(EntryOutcome::Error);
    let mut line = format!("{}: {} done", report.kind.name(), pluralize(ok, "entry", "entries"));
    if skipped > 0 {
        line.push_str(&format!(", {} skipped", skipped));
    }
    if failed > 0 {
        line.push_str(&format!(", {} failed", failed));
    }
    if report.is_cancelled() {
        line.push_str(" (cancelled)");
    }
    line
}

fn render<F: FileSystem>(session: &Session<F>, out: &mut impl Write) -> io::Result<()> {
    for side in [PanelSide::Left, PanelSide::Right] {
        let marker = if side == session.active_side() {
            "*"
        } else {
            " "
        };
        render_panel(session.panel(side), marker, out)?;
    }
    Ok(())
}

fn render_panel(
    panel: &DirectorySnapshot,
    marker: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "{} {}", marker, panel.dir_path())?;

    let visible = panel
        .entries()
        .iter()
        .enumerate()
        .skip(panel.top_index())
        .take(panel.viewport_height());
    for (index, entry) in visible {
        let cursor = if index == panel.cursor_index() && marker == "*" {
            '>'
        } else {
            ' '
        };
        let selected = if entry.selected { '+' } else { ' ' };
        let date = if entry.is_parent() {
            String::new()
        } else {
            format_date(entry.modified)
        };
        writeln!(
            out,
            "{}{} {:<12} {:>10}  {}",
            cursor,
            selected,
            entry.name,
            format_size_column(entry.is_directory, entry.size),
            date
        )?;
    }

    let mut status = pluralize(panel.len(), "entry", "entries");
    if panel.selected_count() > 0 {
        status.push_str(&format!(", {} selected", panel.selected_count()));
    }
    if panel.is_truncated() {
        status.push_str(", list truncated");
    }
    writeln!(out, "  ({})", status)?;
    Ok(())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    for (category, items) in generate_help_entries() {
        writeln!(out, "{}", category)?;
        for (keys, label) in items {
            writeln!(out, "  {:<36} {}", keys, label)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use igc::config::{Limits, PanelSettings};
    use igc::core::interaction::CancelSignal;
    use igc::system::MemoryFileSystem;
    use igc::utils::DriveId;
    use std::io::Cursor;

    fn console(input: &str) -> ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_parse_command() {
        let command = parse_command("mkdir \"NEW DIR\"").unwrap().unwrap();
        assert_eq!(command.action, Action::MakeDirectory);
        assert_eq!(command.args, vec!["NEW DIR".to_string()]);

        let command = parse_command("go_parent").unwrap().unwrap();
        assert_eq!(command.action, Action::GoToParent);

        assert_eq!(parse_command("   ").unwrap(), None);
        assert!(parse_command("format c:").is_err());
        assert!(parse_command("mkdir \"open").is_err());
    }

    #[test]
    fn test_prompt_answers() {
        let mut prompt = console("maybe\ny\na\n\n");
        assert!(prompt.confirm("Quit", "Exit IGC?"));
        assert_eq!(prompt.overwrite("A.TXT"), OverwriteDecision::All);
        assert_eq!(
            prompt.input_text("Rename", "New name:", "A.TXT", 12),
            Some("A.TXT".to_string())
        );
        // 입력 끝
        assert!(!prompt.confirm("Quit", "Exit IGC?"));
        assert_eq!(prompt.overwrite("B.TXT"), OverwriteDecision::Cancel);
    }

    #[test]
    fn test_alert_answer_cancels() {
        let mut prompt = console("\nc\n");
        let cancel = prompt.cancel_flag();

        prompt.alert("Error", "A.TXT: not found");
        assert!(!cancel.is_cancelled());
        prompt.alert("Error", "B.TXT: not found");
        assert!(cancel.is_cancelled());

        cancel.reset();
        // 입력 끝
        prompt.alert("Error", "C.TXT: not found");
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn test_pending_arguments_answer_input() {
        let mut prompt = console("");
        prompt.pending.push_back("VERYLONGNAME.TEXT".to_string());
        let name = prompt.input_text("Make Directory", "Name:", "", 12);
        assert_eq!(name, Some("VERYLONGNAME".to_string()));
        assert_eq!(prompt.input_text("Make Directory", "Name:", "", 12), None);
    }

    #[test]
    fn test_run_session_script() {
        let fs = MemoryFileSystem::new().with_drive('C').with_drive('D');
        fs.add_file("C:\\SRC\\A.TXT", b"hello");
        fs.add_dir("D:\\DST");
        let settings = PanelSettings {
            left_drive: "C".to_string(),
            left_path: "\\SRC".to_string(),
            right_drive: "D".to_string(),
            right_path: "\\DST".to_string(),
            ..PanelSettings::default()
        };
        let drive = DriveId::from_letter('C').unwrap();
        let mut session =
            Session::from_settings(fs.clone(), &settings, &Limits::default(), drive);

        let mut prompt = console("down\ncopy\ny\nmkdir NEW\nbogus\nquit\ny\n");
        run(&mut session, &mut prompt).unwrap();

        assert!(session.should_quit());
        assert_eq!(fs.read_file("D:\\DST\\A.TXT").unwrap(), b"hello");
        assert!(fs.is_directory("C:\\SRC\\NEW"));
        let output = String::from_utf8(prompt.output).unwrap();
        assert!(output.contains("Copy: 1 entry done"));
        assert!(output.contains("Unknown command: bogus"));
    }

    #[test]
    fn test_run_cancel_from_error_alert() {
        let fs = MemoryFileSystem::new().with_drive('C').with_drive('D');
        fs.add_file("C:\\SRC\\A.TXT", b"first");
        fs.add_file("C:\\SRC\\B.TXT", b"second");
        fs.add_dir("D:\\DST");
        fs.fail_reads("C:\\SRC\\A.TXT");
        let settings = PanelSettings {
            left_drive: "C".to_string(),
            left_path: "\\SRC".to_string(),
            right_drive: "D".to_string(),
            right_path: "\\DST".to_string(),
            ..PanelSettings::default()
        };
        let drive = DriveId::from_letter('C').unwrap();
        let mut session =
            Session::from_settings(fs.clone(), &settings, &Limits::default(), drive);

        let mut prompt = console("down\nselect\nselect\ncopy\ny\nc\nquit\ny\n");
        run(&mut session, &mut prompt).unwrap();

        assert!(session.should_quit());
        assert!(!fs.exists("D:\\DST\\A.TXT"));
        assert!(!fs.exists("D:\\DST\\B.TXT"));
        let output = String::from_utf8(prompt.output).unwrap();
        assert!(output.contains("1 failed (cancelled)"));
    }
}
