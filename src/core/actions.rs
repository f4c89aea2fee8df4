//! 액션 시스템: 단일 진실 원천 (Single Source of Truth)
//!
//! 콘솔 명령어, 도움말 내용이 모두 이 모듈의 레지스트리를 참조합니다.

use std::collections::HashMap;
use std::sync::LazyLock;

/// 모든 가능한 액션의 열거
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    GoToTop,
    GoToBottom,
    PageUp,
    PageDown,
    GoToParent,
    EnterSelected,
    TogglePanel,
    ChangeDrive,
    // File Operations
    Copy,
    Move,
    Delete,
    MakeDirectory,
    Rename,
    // Selection
    ToggleSelection,
    DeselectAll,
    // System
    Refresh,
    ShowHelp,
    Quit,
}

/// 액션 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    FileOperation,
    Selection,
    System,
}

impl ActionCategory {
    pub fn title(&self) -> &'static str {
        match self {
            ActionCategory::Navigation => "Navigation",
            ActionCategory::FileOperation => "File Operations",
            ActionCategory::Selection => "Selection",
            ActionCategory::System => "System",
        }
    }
}

/// 액션 정의 (메타데이터)
pub struct ActionDef {
    pub action: Action,
    pub id: &'static str,
    pub label: &'static str,
    pub category: ActionCategory,
    /// 콘솔 명령어 (첫 번째가 대표)
    pub commands: &'static [&'static str],
    /// 레거시 키 표시
    pub shortcut_display: Option<&'static str>,
}

/// 모든 액션 메타데이터
pub static ACTION_DEFS: &[ActionDef] = &[
    // Navigation
    ActionDef {
        action: Action::MoveUp,
        id: "move_up",
        label: "Move up",
        category: ActionCategory::Navigation,
        commands: &["up", "k"],
        shortcut_display: Some("Up"),
    },
    ActionDef {
        action: Action::MoveDown,
        id: "move_down",
        label: "Move down",
        category: ActionCategory::Navigation,
        commands: &["down", "j"],
        shortcut_display: Some("Down"),
    },
    ActionDef {
        action: Action::GoToTop,
        id: "go_top",
        label: "Top",
        category: ActionCategory::Navigation,
        commands: &["home", "top"],
        shortcut_display: Some("Home"),
    },
    ActionDef {
        action: Action::GoToBottom,
        id: "go_bottom",
        label: "Bottom",
        category: ActionCategory::Navigation,
        commands: &["end", "bottom"],
        shortcut_display: Some("End"),
    },
    ActionDef {
        action: Action::PageUp,
        id: "page_up",
        label: "Page up",
        category: ActionCategory::Navigation,
        commands: &["pgup"],
        shortcut_display: Some("PgUp"),
    },
    ActionDef {
        action: Action::PageDown,
        id: "page_down",
        label: "Page down",
        category: ActionCategory::Navigation,
        commands: &["pgdn"],
        shortcut_display: Some("PgDn"),
    },
    ActionDef {
        action: Action::GoToParent,
        id: "go_parent",
        label: "Parent dir",
        category: ActionCategory::Navigation,
        commands: &["parent", ".."],
        shortcut_display: Some("Left / Backspace"),
    },
    ActionDef {
        action: Action::EnterSelected,
        id: "enter",
        label: "Enter dir",
        category: ActionCategory::Navigation,
        commands: &["enter", "cd"],
        shortcut_display: Some("Right / Enter"),
    },
    ActionDef {
        action: Action::TogglePanel,
        id: "toggle_panel",
        label: "Switch panel",
        category: ActionCategory::Navigation,
        commands: &["tab", "switch"],
        shortcut_display: Some("Tab"),
    },
    ActionDef {
        action: Action::ChangeDrive,
        id: "change_drive",
        label: "Drive",
        category: ActionCategory::Navigation,
        commands: &["drive"],
        shortcut_display: Some("F1"),
    },
    // File Operations
    ActionDef {
        action: Action::MakeDirectory,
        id: "mkdir",
        label: "MkDir",
        category: ActionCategory::FileOperation,
        commands: &["mkdir", "md"],
        shortcut_display: Some("F2"),
    },
    ActionDef {
        action: Action::Copy,
        id: "copy",
        label: "Copy",
        category: ActionCategory::FileOperation,
        commands: &["copy", "cp"],
        shortcut_display: Some("F5"),
    },
    ActionDef {
        action: Action::Move,
        id: "move",
        label: "Move",
        category: ActionCategory::FileOperation,
        commands: &["move", "mv"],
        shortcut_display: Some("F5"),
    },
    ActionDef {
        action: Action::Delete,
        id: "delete",
        label: "Delete",
        category: ActionCategory::FileOperation,
        commands: &["delete", "del", "rm"],
        shortcut_display: Some("F6"),
    },
    ActionDef {
        action: Action::Rename,
        id: "rename",
        label: "Rename",
        category: ActionCategory::FileOperation,
        commands: &["rename", "ren"],
        shortcut_display: None,
    },
    // Selection
    ActionDef {
        action: Action::ToggleSelection,
        id: "toggle_selection",
        label: "Select",
        category: ActionCategory::Selection,
        commands: &["select", "space"],
        shortcut_display: Some("Space"),
    },
    ActionDef {
        action: Action::DeselectAll,
        id: "deselect_all",
        label: "Deselect all",
        category: ActionCategory::Selection,
        commands: &["unselect", "none"],
        shortcut_display: None,
    },
    // System
    ActionDef {
        action: Action::Refresh,
        id: "refresh",
        label: "Refresh",
        category: ActionCategory::System,
        commands: &["refresh", "ls"],
        shortcut_display: None,
    },
    ActionDef {
        action: Action::ShowHelp,
        id: "help",
        label: "Help",
        category: ActionCategory::System,
        commands: &["help", "?"],
        shortcut_display: None,
    },
    ActionDef {
        action: Action::Quit,
        id: "quit",
        label: "Quit",
        category: ActionCategory::System,
        commands: &["quit", "q", "exit"],
        shortcut_display: Some("F7 / F10 / Esc"),
    },
];

/// 명령어 → 액션 조회 테이블
static COMMAND_MAP: LazyLock<HashMap<&'static str, Action>> = LazyLock::new(|| {
    ACTION_DEFS
        .iter()
        .flat_map(|def| def.commands.iter().map(move |cmd| (*cmd, def.action)))
        .collect()
});

impl Action {
    pub fn from_id(id: &str) -> Option<Action> {
        ACTION_DEFS.iter().find(|d| d.id == id).map(|d| d.action)
    }

    /// 콘솔 명령어로 액션 찾기 (대소문자 무시)
    pub fn from_command(word: &str) -> Option<Action> {
        COMMAND_MAP
            .get(word.to_ascii_lowercase().as_str())
            .copied()
    }

    pub fn def(&self) -> Option<&'static ActionDef> {
        ACTION_DEFS.iter().find(|d| d.action == *self)
    }

    pub fn id(&self) -> &'static str {
        self.def().map_or("", |d| d.id)
    }
}

/// 도움말 항목 생성: (카테고리, [(명령어, 설명)])
pub fn generate_help_entries() -> Vec<(&'static str, Vec<(String, &'static str)>)> {
    let categories = [
        ActionCategory::Navigation,
        ActionCategory::FileOperation,
        ActionCategory::Selection,
        ActionCategory::System,
    ];

    categories
        .iter()
        .map(|category| {
            let items = ACTION_DEFS
                .iter()
                .filter(|d| d.category == *category)
                .map(|d| {
                    let commands = d.commands.join(" / ");
                    let key = match d.shortcut_display {
                        Some(key) => format!("{} ({})", commands, key),
                        None => commands,
                    };
                    (key, d.label)
                })
                .collect();
            (category.title(), items)
        })
        .collect()
}
