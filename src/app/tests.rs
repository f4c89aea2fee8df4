use super::*;
use crate::config::{Limits, PanelSettings, Settings};
use crate::core::engine::MoveFallback;
use crate::core::interaction::{
    CancelFlag, CancelSignal, NoProgress, OverwriteDecision, UserPrompt,
};
use crate::models::operation::{EntryOutcome, JobState};
use crate::system::memory::{MemoryFileSystem, RenameFault};
use std::cell::Cell;
use std::collections::VecDeque;

// === Test doubles ===

#[derive(Default)]
struct ScriptedUi {
    confirms: VecDeque<bool>,
    overwrites: VecDeque<OverwriteDecision>,
    inputs: VecDeque<Option<String>>,
    confirm_calls: Vec<(String, String)>,
    overwrite_calls: Vec<String>,
    input_calls: Vec<(String, String, usize)>,
    alerts: Vec<String>,
}

impl ScriptedUi {
    fn confirming(answers: &[bool]) -> Self {
        Self {
            confirms: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn typing(inputs: &[Option<&str>]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.map(str::to_string)).collect(),
            ..Self::default()
        }
    }
}

impl UserPrompt for ScriptedUi {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.confirm_calls
            .push((title.to_string(), message.to_string()));
        self.confirms.pop_front().unwrap_or(true)
    }

    fn overwrite(&mut self, name: &str) -> OverwriteDecision {
        self.overwrite_calls.push(name.to_string());
        self.overwrites
            .pop_front()
            .unwrap_or(OverwriteDecision::Yes)
    }

    fn input_text(
        &mut self,
        title: &str,
        _prompt: &str,
        initial: &str,
        max_len: usize,
    ) -> Option<String> {
        self.input_calls
            .push((title.to_string(), initial.to_string(), max_len));
        self.inputs.pop_front().flatten()
    }

    fn alert(&mut self, _title: &str, message: &str) {
        self.alerts.push(message.to_string());
    }
}

struct CancelAfter {
    polls: Cell<usize>,
    limit: usize,
}

impl CancelSignal for CancelAfter {
    fn is_cancelled(&self) -> bool {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        polls > self.limit
    }
}

// === Fixtures ===

fn drive(letter: char) -> DriveId {
    DriveId::from_letter(letter).unwrap()
}

fn scenario_fs() -> MemoryFileSystem {
    let fs = MemoryFileSystem::new().with_drive('C').with_drive('D');
    let content: Vec<u8> = (0..256).map(|i| (i % 251) as u8).collect();
    fs.add_file("C:\\SRC\\A.TXT", &content);
    fs.add_file("C:\\SRC\\B.TXT", b"0123456789");
    fs.add_file("C:\\SRC\\SUBDIR\\ONE.DAT", b"first file");
    fs.add_file("C:\\SRC\\SUBDIR\\TWO.DAT", b"second file");
    fs.add_dir("D:\\DST");
    fs
}

fn panel_settings(left: (&str, &str), right: (&str, &str)) -> PanelSettings {
    PanelSettings {
        left_drive: left.0.to_string(),
        left_path: left.1.to_string(),
        right_drive: right.0.to_string(),
        right_path: right.1.to_string(),
        active_panel: PanelSide::Left,
    }
}

fn open_session(fs: &MemoryFileSystem, right: (&str, &str)) -> Session<MemoryFileSystem> {
    open_session_with(fs, right, &Limits::default())
}

fn open_session_with(
    fs: &MemoryFileSystem,
    right: (&str, &str),
    limits: &Limits,
) -> Session<MemoryFileSystem> {
    let settings = panel_settings(("C", "\\SRC"), right);
    Session::from_settings(fs.clone(), &settings, limits, drive('C'))
}

fn run(
    session: &mut Session<MemoryFileSystem>,
    action: Action,
    prompt: &mut ScriptedUi,
) -> Result<()> {
    let cancel = CancelFlag::new();
    run_with_cancel(session, action, prompt, &cancel)
}

fn run_with_cancel(
    session: &mut Session<MemoryFileSystem>,
    action: Action,
    prompt: &mut ScriptedUi,
    cancel: &dyn CancelSignal,
) -> Result<()> {
    let mut progress = NoProgress;
    let mut ui = Collaborators::new(prompt, &mut progress, cancel);
    session.execute_action(action, &mut ui)
}

/// 활성 패널에서 이름으로 항목 선택
fn select(session: &mut Session<MemoryFileSystem>, names: &[&str]) {
    session.move_cursor(Navigation::Home);
    for index in 0..session.active().len() {
        let name = session.active().entries()[index].name.clone();
        if names.contains(&name.as_str()) {
            session.toggle_selection();
        } else {
            session.move_cursor(Navigation::Down);
        }
    }
}

/// 활성 패널 커서를 이름으로 이동
fn point_at(session: &mut Session<MemoryFileSystem>, name: &str) {
    session.move_cursor(Navigation::Home);
    while session.active().cursor_entry().map(|e| e.name.as_str()) != Some(name) {
        let before = session.active().cursor_index();
        session.move_cursor(Navigation::Down);
        assert_ne!(before, session.active().cursor_index(), "{} not listed", name);
    }
}

fn names(panel: &DirectorySnapshot) -> Vec<&str> {
    panel.entries().iter().map(|e| e.name.as_str()).collect()
}

// === Session setup / settings ===

#[test]
fn test_from_settings_restores_panels() {
    let fs = scenario_fs();
    let mut settings = panel_settings(("C", "\\SRC"), ("D", "\\DST"));
    settings.active_panel = PanelSide::Right;

    let session = Session::from_settings(fs, &settings, &Limits::default(), drive('C'));

    assert_eq!(session.active_side(), PanelSide::Right);
    assert_eq!(session.panel(PanelSide::Left).dir_path(), "C:\\SRC");
    assert_eq!(session.panel(PanelSide::Right).dir_path(), "D:\\DST");
    assert_eq!(session.panel_settings(), settings);
}

#[test]
fn test_new_opens_both_panels_at_root() {
    let session = Session::new(scenario_fs(), drive('D'));

    assert_eq!(session.active_side(), PanelSide::Left);
    assert_eq!(session.active().dir_path(), "D:\\");
    assert_eq!(session.inactive().dir_path(), "D:\\");
    assert_eq!(names(session.active()), vec!["DST"]);
    assert!(session.fs().is_directory("D:\\DST"));
}

#[test]
fn test_from_settings_falls_back_to_root() {
    let fs = scenario_fs();
    let settings = panel_settings(("C", "\\MISSING"), ("Z", "\\GAMES"));

    let session = Session::from_settings(fs, &settings, &Limits::default(), drive('C'));

    assert_eq!(session.panel(PanelSide::Left).dir_path(), "C:\\");
    assert_eq!(session.panel(PanelSide::Right).dir_path(), "C:\\");
    assert_eq!(names(session.panel(PanelSide::Left)), vec!["SRC"]);
}

#[test]
fn test_limits_are_applied() {
    let fs = scenario_fs();
    let limits = Limits {
        panel_capacity: Some(3),
        copy_buffer_size: 16,
        viewport_height: 4,
        move_fallback: MoveFallback::CrossDeviceOnly,
    };
    let session = open_session_with(&fs, ("D", "\\DST"), &limits);

    let left = session.panel(PanelSide::Left);
    assert_eq!(left.len(), 3);
    assert!(left.is_truncated());
    assert_eq!(left.viewport_height(), 4);
    assert_eq!(session.engine().buffer_size(), 16);
    assert_eq!(session.engine().move_fallback(), MoveFallback::CrossDeviceOnly);
}

#[test]
fn test_panel_settings_round_trip_through_toml() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();
    point_at(&mut session, "SUBDIR");
    run(&mut session, Action::EnterSelected, &mut ui).unwrap();
    session.switch_panel();

    let settings = Settings {
        settings: session.panel_settings(),
        ..Settings::default()
    };
    let decoded = Settings::decode(&settings.encode().unwrap()).unwrap();
    let restored =
        Session::from_settings(fs, &decoded.settings, &Limits::default(), drive('C'));

    assert_eq!(restored.active_side(), PanelSide::Right);
    assert_eq!(restored.panel(PanelSide::Left).dir_path(), "C:\\SRC\\SUBDIR");
    assert_eq!(restored.panel(PanelSide::Right).dir_path(), "D:\\DST");
}

// === Navigation ===

#[test]
fn test_enter_and_parent_restores_focus() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();
    assert_eq!(names(session.active()), vec!["..", "SUBDIR", "A.TXT", "B.TXT"]);

    point_at(&mut session, "SUBDIR");
    run(&mut session, Action::EnterSelected, &mut ui).unwrap();
    assert_eq!(session.active().path(), "\\SRC\\SUBDIR");
    assert_eq!(session.active().cursor_index(), 0);

    run(&mut session, Action::GoToParent, &mut ui).unwrap();
    assert_eq!(session.active().path(), "\\SRC");
    assert_eq!(session.active().cursor_entry().unwrap().name, "SUBDIR");

    // ".." 항목에서 Enter는 상위 이동
    session.move_cursor(Navigation::Home);
    run(&mut session, Action::EnterSelected, &mut ui).unwrap();
    assert!(session.active().is_root());
}

#[test]
fn test_enter_on_file_is_ignored() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();
    point_at(&mut session, "A.TXT");

    run(&mut session, Action::EnterSelected, &mut ui).unwrap();
    assert_eq!(session.active().path(), "\\SRC");
    assert_eq!(session.active().cursor_entry().unwrap().name, "A.TXT");
}

#[test]
fn test_unreadable_directory_keeps_panel() {
    let fs = scenario_fs();
    fs.fail_listing("C:\\SRC\\SUBDIR");
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();
    point_at(&mut session, "SUBDIR");

    assert!(run(&mut session, Action::EnterSelected, &mut ui).is_err());
    assert_eq!(session.active().path(), "\\SRC");
    assert_eq!(session.active().len(), 4);
}

#[test]
fn test_cursor_invariants_across_actions() {
    let fs = MemoryFileSystem::new().with_drive('C');
    for i in 0..30 {
        fs.add_file(&format!("C:\\MANY\\F{:02}.TXT", i), b"x");
    }
    let settings = panel_settings(("C", "\\MANY"), ("C", "\\"));
    let limits = Limits {
        viewport_height: 7,
        ..Limits::default()
    };
    let mut session = Session::from_settings(fs, &settings, &limits, drive('C'));
    let mut ui = ScriptedUi::default();

    let actions = [
        Action::PageDown,
        Action::PageDown,
        Action::MoveDown,
        Action::GoToBottom,
        Action::MoveDown,
        Action::PageUp,
        Action::MoveUp,
        Action::GoToTop,
        Action::MoveUp,
        Action::PageDown,
        Action::PageDown,
        Action::PageDown,
        Action::PageDown,
        Action::PageDown,
    ];
    for action in actions {
        run(&mut session, action, &mut ui).unwrap();
        let panel = session.active();
        assert!(panel.cursor_index() < panel.len().max(1));
        assert!(panel.top_index() <= panel.cursor_index());
        assert!(panel.cursor_index() <= panel.top_index() + panel.viewport_height() - 1);
    }
    assert_eq!(session.active().cursor_index(), 30);
}

#[test]
fn test_toggle_moves_down_and_is_invertible() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();

    // ".."는 선택되지 않고 커서만 내려감
    run(&mut session, Action::ToggleSelection, &mut ui).unwrap();
    assert_eq!(session.active().selected_count(), 0);
    assert_eq!(session.active().cursor_index(), 1);

    run(&mut session, Action::ToggleSelection, &mut ui).unwrap();
    assert_eq!(session.active().selected_count(), 1);
    assert!(session.active().entries()[1].selected);
    assert_eq!(session.active().cursor_index(), 2);

    session.move_cursor(Navigation::Up);
    run(&mut session, Action::ToggleSelection, &mut ui).unwrap();
    assert_eq!(session.active().selected_count(), 0);
    assert!(!session.active().entries()[1].selected);

    select(&mut session, &["A.TXT", "B.TXT"]);
    assert_eq!(session.active().selected_count(), 2);
    run(&mut session, Action::DeselectAll, &mut ui).unwrap();
    assert_eq!(session.active().selected_count(), 0);
}

#[test]
fn test_change_drive_via_prompt() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));

    let mut ui = ScriptedUi::typing(&[Some("d:")]);
    run(&mut session, Action::ChangeDrive, &mut ui).unwrap();
    assert_eq!(session.active().dir_path(), "D:\\");
    assert_eq!(ui.input_calls, vec![("Drive".to_string(), "C".to_string(), 2)]);

    let mut ui = ScriptedUi::typing(&[Some("??")]);
    run(&mut session, Action::ChangeDrive, &mut ui).unwrap();
    assert_eq!(ui.alerts.len(), 1);
    assert_eq!(session.active().dir_path(), "D:\\");

    // 마운트되지 않은 드라이브
    let mut ui = ScriptedUi::typing(&[Some("Q")]);
    assert!(run(&mut session, Action::ChangeDrive, &mut ui).is_err());
    assert_eq!(session.active().dir_path(), "D:\\");
}

#[test]
fn test_switch_panel_changes_copy_direction() {
    let fs = scenario_fs();
    fs.add_file("D:\\DST\\BACK.TXT", b"back");
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::TogglePanel, &mut ui).unwrap();
    assert_eq!(session.active_side(), PanelSide::Right);
    point_at(&mut session, "BACK.TXT");
    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert_eq!(fs.read_file("C:\\SRC\\BACK.TXT").unwrap(), b"back");
    assert!(names(session.inactive()).contains(&"BACK.TXT"));
}

#[test]
fn test_quit_requires_confirmation() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));

    let mut ui = ScriptedUi::confirming(&[false]);
    run(&mut session, Action::Quit, &mut ui).unwrap();
    assert!(!session.should_quit());

    let mut ui = ScriptedUi::confirming(&[true]);
    run(&mut session, Action::Quit, &mut ui).unwrap();
    assert!(session.should_quit());
    assert_eq!(ui.confirm_calls[0].0, "Quit");
}

// === Batch operations ===

#[test]
fn test_copy_selection_scenario() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    select(&mut session, &["A.TXT", "SUBDIR"]);
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert_eq!(
        ui.confirm_calls,
        vec![("Confirm Copy".to_string(), "Copy 2 files?".to_string())]
    );
    let report = session.last_report().unwrap();
    assert_eq!(report.state, JobState::Done);
    assert!(report.is_success());

    assert_eq!(fs.read_file("D:\\DST\\A.TXT"), fs.read_file("C:\\SRC\\A.TXT"));
    assert_eq!(fs.read_file("D:\\DST\\A.TXT").unwrap().len(), 256);
    assert_eq!(fs.read_file("D:\\DST\\SUBDIR\\ONE.DAT").unwrap(), b"first file");
    assert_eq!(fs.read_file("D:\\DST\\SUBDIR\\TWO.DAT").unwrap(), b"second file");
    assert!(fs.read_file("D:\\DST\\B.TXT").is_none());
    assert_eq!(fs.count_under("C:\\SRC"), 5);

    // 두 패널 모두 다시 읽힘
    assert_eq!(names(session.inactive()), vec!["..", "SUBDIR", "A.TXT"]);
    assert_eq!(session.active().selected_count(), 0);
    assert!(ui.alerts.is_empty());
}

#[test]
fn test_single_copy_confirm_names_destination() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    point_at(&mut session, "B.TXT");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert_eq!(
        ui.confirm_calls,
        vec![("Copy".to_string(), "Copy B.TXT to D:\\DST?".to_string())]
    );
    assert_eq!(fs.read_file("D:\\DST\\B.TXT").unwrap(), b"0123456789");
}

#[test]
fn test_declined_copy_runs_nothing() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    select(&mut session, &["A.TXT", "B.TXT"]);
    let mut ui = ScriptedUi::confirming(&[false]);

    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert_eq!(fs.count_under("D:\\DST"), 0);
    assert!(session.last_report().is_none());
    assert_eq!(session.active().selected_count(), 2);
}

#[test]
fn test_copy_on_parent_entry_does_nothing() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::default();

    session.move_cursor(Navigation::Home);
    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert!(ui.confirm_calls.is_empty());
    assert!(session.last_report().is_none());
}

#[test]
fn test_overwrite_all_stops_prompting() {
    let fs = scenario_fs();
    fs.add_file("D:\\DST\\A.TXT", b"old a");
    fs.add_file("D:\\DST\\B.TXT", b"old b");
    let mut session = open_session(&fs, ("D", "\\DST"));
    select(&mut session, &["A.TXT", "B.TXT"]);
    let mut ui = ScriptedUi {
        overwrites: VecDeque::from([OverwriteDecision::All]),
        ..ScriptedUi::default()
    };

    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert_eq!(ui.overwrite_calls, vec!["A.TXT".to_string()]);
    assert_eq!(fs.read_file("D:\\DST\\A.TXT"), fs.read_file("C:\\SRC\\A.TXT"));
    assert_eq!(fs.read_file("D:\\DST\\B.TXT").unwrap(), b"0123456789");
}

#[test]
fn test_overwrite_cancel_ends_job() {
    let fs = scenario_fs();
    fs.add_file("D:\\DST\\A.TXT", b"old a");
    let mut session = open_session(&fs, ("D", "\\DST"));
    select(&mut session, &["A.TXT", "B.TXT"]);
    let mut ui = ScriptedUi {
        overwrites: VecDeque::from([OverwriteDecision::Cancel]),
        ..ScriptedUi::default()
    };

    run(&mut session, Action::Copy, &mut ui).unwrap();

    assert!(session.last_report().unwrap().is_cancelled());
    assert_eq!(fs.read_file("D:\\DST\\A.TXT").unwrap(), b"old a");
    assert!(fs.read_file("D:\\DST\\B.TXT").is_none());
}

#[test]
fn test_move_same_drive() {
    let fs = scenario_fs();
    fs.add_dir("C:\\OUT");
    let mut session = open_session(&fs, ("C", "\\OUT"));
    point_at(&mut session, "SUBDIR");
    let original = fs.read_file("C:\\SRC\\SUBDIR\\ONE.DAT");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Move, &mut ui).unwrap();

    assert!(session.last_report().unwrap().is_success());
    assert!(fs.is_directory("C:\\OUT\\SUBDIR"));
    assert_eq!(fs.read_file("C:\\OUT\\SUBDIR\\ONE.DAT"), original);
    assert!(!fs.is_directory("C:\\SRC\\SUBDIR"));
    assert_eq!(names(session.active()), vec!["..", "A.TXT", "B.TXT"]);
    assert_eq!(names(session.inactive()), vec!["..", "SUBDIR"]);
}

#[test]
fn test_move_falls_back_on_any_rename_error() {
    let fs = scenario_fs();
    fs.add_dir("C:\\OUT");
    fs.fail_renames(RenameFault::Locked);
    let mut session = open_session(&fs, ("C", "\\OUT"));
    point_at(&mut session, "A.TXT");
    let original = fs.read_file("C:\\SRC\\A.TXT");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Move, &mut ui).unwrap();

    assert!(fs.rename_attempts() > 0);
    assert!(session.last_report().unwrap().is_success());
    assert_eq!(fs.read_file("C:\\OUT\\A.TXT"), original);
    assert!(fs.read_file("C:\\SRC\\A.TXT").is_none());
}

#[test]
fn test_move_cross_device_only_reports_locked_rename() {
    let fs = scenario_fs();
    fs.add_dir("C:\\OUT");
    fs.fail_renames(RenameFault::Locked);
    let limits = Limits {
        move_fallback: MoveFallback::CrossDeviceOnly,
        ..Limits::default()
    };
    let mut session = open_session_with(&fs, ("C", "\\OUT"), &limits);
    point_at(&mut session, "A.TXT");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Move, &mut ui).unwrap();

    let report = session.last_report().unwrap();
    assert_eq!(report.outcome(), EntryOutcome::Error);
    assert_eq!(ui.alerts.len(), 1);
    assert!(fs.read_file("C:\\SRC\\A.TXT").is_some());
    assert!(fs.read_file("C:\\OUT\\A.TXT").is_none());
}

#[test]
fn test_delete_single_directory_confirm() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    point_at(&mut session, "SUBDIR");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Delete, &mut ui).unwrap();

    assert_eq!(
        ui.confirm_calls,
        vec![("Delete".to_string(), "Delete directory SUBDIR?".to_string())]
    );
    assert!(!fs.is_directory("C:\\SRC\\SUBDIR"));
    assert_eq!(names(session.active()), vec!["..", "A.TXT", "B.TXT"]);
}

#[test]
fn test_delete_cancelled_after_first_file() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    point_at(&mut session, "SUBDIR");
    let mut ui = ScriptedUi::default();
    // 최상위 대상 1회 + 첫 번째 자식 1회까지만 통과
    let cancel = CancelAfter {
        polls: Cell::new(0),
        limit: 2,
    };

    run_with_cancel(&mut session, Action::Delete, &mut ui, &cancel).unwrap();

    assert!(session.last_report().unwrap().is_cancelled());
    assert!(fs.read_file("C:\\SRC\\SUBDIR\\ONE.DAT").is_none());
    assert_eq!(fs.read_file("C:\\SRC\\SUBDIR\\TWO.DAT").unwrap(), b"second file");
    assert!(fs.is_directory("C:\\SRC\\SUBDIR"));
}

#[test]
fn test_delete_moves_other_panel_out_of_deleted_tree() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("C", "\\SRC\\SUBDIR"));
    point_at(&mut session, "SUBDIR");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Delete, &mut ui).unwrap();

    assert_eq!(session.inactive().dir_path(), "C:\\SRC");
    assert!(!names(session.inactive()).contains(&"SUBDIR"));
}

#[test]
fn test_delete_read_only_file() {
    let fs = scenario_fs();
    fs.set_read_only("C:\\SRC\\B.TXT");
    let mut session = open_session(&fs, ("D", "\\DST"));
    point_at(&mut session, "B.TXT");
    let mut ui = ScriptedUi::default();

    run(&mut session, Action::Delete, &mut ui).unwrap();

    assert!(fs.read_file("C:\\SRC\\B.TXT").is_none());
    assert_eq!(
        ui.confirm_calls[0],
        ("Delete".to_string(), "Delete file B.TXT?".to_string())
    );
}

// === Named operations ===

#[test]
fn test_mkdir_via_prompt() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    let mut ui = ScriptedUi::typing(&[Some("NEWDIR")]);

    run(&mut session, Action::MakeDirectory, &mut ui).unwrap();

    assert!(fs.is_directory("C:\\SRC\\NEWDIR"));
    assert_eq!(
        ui.input_calls,
        vec![("Make Directory".to_string(), String::new(), 12)]
    );
    assert_eq!(session.active().cursor_entry().unwrap().name, "NEWDIR");
}

#[test]
fn test_mkdir_rejects_bad_names() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));

    let mut ui = ScriptedUi::typing(&[Some("BAD*NAME")]);
    run(&mut session, Action::MakeDirectory, &mut ui).unwrap();
    assert_eq!(ui.alerts.len(), 1);

    let mut ui = ScriptedUi::typing(&[Some("SUBDIR")]);
    run(&mut session, Action::MakeDirectory, &mut ui).unwrap();
    assert_eq!(ui.alerts.len(), 1);

    let mut ui = ScriptedUi::typing(&[None]);
    run(&mut session, Action::MakeDirectory, &mut ui).unwrap();
    assert!(ui.alerts.is_empty());
    assert_eq!(session.active().len(), 4);
}

#[test]
fn test_rename_via_prompt() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    point_at(&mut session, "A.TXT");
    let content = fs.read_file("C:\\SRC\\A.TXT");
    let mut ui = ScriptedUi::typing(&[Some("C.TXT")]);

    run(&mut session, Action::Rename, &mut ui).unwrap();

    assert_eq!(ui.input_calls, vec![("Rename".to_string(), "A.TXT".to_string(), 12)]);
    assert!(fs.read_file("C:\\SRC\\A.TXT").is_none());
    assert_eq!(fs.read_file("C:\\SRC\\C.TXT"), content);
    assert_eq!(session.active().cursor_entry().unwrap().name, "C.TXT");
}

#[test]
fn test_rename_cancel_or_same_name_is_noop() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    point_at(&mut session, "A.TXT");

    let mut ui = ScriptedUi::typing(&[None]);
    run(&mut session, Action::Rename, &mut ui).unwrap();
    let mut ui_same = ScriptedUi::typing(&[Some("A.TXT")]);
    run(&mut session, Action::Rename, &mut ui_same).unwrap();
    let mut ui_case = ScriptedUi::typing(&[Some("a.txt")]);
    run(&mut session, Action::Rename, &mut ui_case).unwrap();

    assert!(ui.alerts.is_empty());
    assert!(ui_same.alerts.is_empty());
    assert!(ui_case.alerts.is_empty());
    assert!(fs.read_file("C:\\SRC\\A.TXT").is_some());
    assert_eq!(fs.rename_attempts(), 0);
}

#[test]
fn test_rename_on_parent_entry_does_not_prompt() {
    let fs = scenario_fs();
    let mut session = open_session(&fs, ("D", "\\DST"));
    session.move_cursor(Navigation::Home);
    let mut ui = ScriptedUi::typing(&[Some("X")]);

    run(&mut session, Action::Rename, &mut ui).unwrap();

    assert!(ui.input_calls.is_empty());
}
