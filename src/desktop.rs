//! The hidden retro desktop: boot phases, file catalog and window manager.

use crate::easter_eggs::{Notice, Tone};

/// Hold time on the hero logo before the desktop boots.
pub const HOLD_TO_OPEN_MS: u32 = 2_000;
pub const BOOT_DURATION_MS: u32 = 2_000;
pub const POWER_OFF_DELAY_MS: u32 = 1_000;

/// Name of the in-page event that asks the desktop to boot.
pub const OPEN_DESKTOP_EVENT: &str = "open-secret-desktop";

pub const BOOT_LINES: &[&str] = &[
    "Initializing AbishaiOS kernel...",
    "Loading Neural Modules... [OK]",
    "Mounting Filesystem... [OK]",
    "Suppressing Imposter Syndrome... [FAILED]",
];

pub const BOOT_READY_LINE: &str = "_System Ready.";

pub const POWER_OFF_NOTICE: Notice = Notice::new(Tone::Info, "Shutting down...");
pub const START_MENU_NOTICE: Notice =
    Notice::new(Tone::Info, "Start Menu is purely decorative in this demo!");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DesktopPhase {
    #[default]
    Hidden,
    Booting,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gauge {
    pub label: &'static str,
    pub reading: &'static str,
    pub percent: u8,
    pub pulsing: bool,
}

pub const SYSTEM_MONITOR: &[Gauge] = &[
    Gauge {
        label: "CPU Usage",
        reading: "5%",
        percent: 5,
        pulsing: false,
    },
    Gauge {
        label: "Caffeine Levels",
        reading: "92%",
        percent: 92,
        pulsing: false,
    },
    Gauge {
        label: "Creativity",
        reading: "OVERFLOW",
        percent: 100,
        pulsing: true,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Text(&'static str),
    Folder(&'static [&'static str]),
    SystemMonitor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DesktopFile {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: FileKind,
}

pub const FILE_SYSTEM: &[DesktopFile] = &[
    DesktopFile {
        id: "manifesto",
        title: "manifesto.txt",
        kind: FileKind::Text(
            "THE AI MANIFESTO\n\n1. Code is poetry, data is truth.\n2. If it doesn't fit in VRAM, it doesn't exist.\n3. Sleep is just model checkpointing.\n4. Always sanitize your inputs (and your coffee cup).\n\nTo the recruiter reading this: I promise to comment my code.",
        ),
    },
    DesktopFile {
        id: "plans",
        title: "world_domination_plans.md",
        kind: FileKind::Text(
            "PHASE 1: Build a cool portfolio.\nPHASE 2: Get hired by a visionary company.\nPHASE 3: Optimize their pipelines until they run at light speed.\nPHASE 4: ...\nPHASE 5: Build AGI.",
        ),
    },
    DesktopFile {
        id: "trash",
        title: "Trash",
        kind: FileKind::Folder(&["jQuery", "PHP_Tutorials", "node_modules (200GB)", "Unfixed_Bugs"]),
    },
    DesktopFile {
        id: "sys_info",
        title: "System_Monitor.exe",
        kind: FileKind::SystemMonitor,
    },
];

pub fn find_file(id: &str) -> Option<&'static DesktopFile> {
    FILE_SYSTEM.iter().find(|file| file.id == id)
}

/// Open windows in opening order plus the focused one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowManager {
    open: Vec<&'static str>,
    focused: Option<&'static str>,
}

impl WindowManager {
    /// Opens (once) and focuses a catalog entry. Unknown ids are ignored.
    pub fn open(&mut self, id: &str) -> bool {
        let Some(file) = find_file(id) else {
            return false;
        };

        if !self.open.contains(&file.id) {
            self.open.push(file.id);
        }
        self.focused = Some(file.id);
        true
    }

    pub fn close(&mut self, id: &str) {
        self.open.retain(|open| *open != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn focus(&mut self, id: &str) {
        if let Some(open) = self.open.iter().find(|open| **open == id) {
            self.focused = Some(*open);
        }
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused == Some(id)
    }

    pub fn focused(&self) -> Option<&'static str> {
        self.focused
    }

    /// Windows in opening order, which is also the taskbar order.
    pub fn windows(&self) -> impl Iterator<Item = &'static DesktopFile> + '_ {
        self.open.iter().filter_map(|id| find_file(id))
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.focused = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_twice_keeps_one_window() {
        let mut windows = WindowManager::default();
        assert!(windows.open("manifesto"));
        assert!(windows.open("trash"));
        assert!(windows.open("manifesto"));

        let titles: Vec<&str> = windows.windows().map(|file| file.title).collect();
        assert_eq!(titles, vec!["manifesto.txt", "Trash"]);
        assert!(windows.is_focused("manifesto"));
    }

    #[test]
    fn closing_focused_window_clears_focus() {
        let mut windows = WindowManager::default();
        windows.open("plans");
        windows.open("sys_info");
        windows.close("sys_info");

        assert_eq!(windows.focused(), None);
        assert_eq!(windows.windows().count(), 1);

        windows.open("trash");
        windows.close("plans");
        assert!(windows.is_focused("trash"));
    }

    #[test]
    fn focus_only_targets_open_windows() {
        let mut windows = WindowManager::default();
        windows.open("plans");
        windows.focus("trash");
        assert!(windows.is_focused("plans"));
    }

    #[test]
    fn unknown_files_are_ignored() {
        let mut windows = WindowManager::default();
        assert!(!windows.open("passwords.txt"));
        assert_eq!(windows.windows().count(), 0);
        assert_eq!(windows.focused(), None);
    }

    #[test]
    fn clearing_closes_every_window() {
        let mut windows = WindowManager::default();
        windows.open("plans");
        windows.open("trash");
        windows.clear();

        assert_eq!(windows.windows().count(), 0);
        assert_eq!(windows.focused(), None);
        assert!(windows.open("plans"));
    }
}
