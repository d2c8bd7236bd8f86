//! View variants that can live on the navigation stack.

use crate::models::replay::ReplayData;
use crate::models::score::ScoreRecord;
use std::fmt;

/// Identity of a pushed view instance.
///
/// Assigned at push time from a monotonically increasing counter, so two
/// instances of the same kind are always distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewToken(pub u64);

impl fmt::Display for ViewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload-free discriminant of [`View`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    MainMenu,
    SongSelect,
    Summary,
    ReplayLoader,
    Gameplay,
}

impl ViewKind {
    pub fn name(self) -> &'static str {
        match self {
            ViewKind::MainMenu => "main menu",
            ViewKind::SongSelect => "song select",
            ViewKind::Summary => "summary",
            ViewKind::ReplayLoader => "replay loader",
            ViewKind::Gameplay => "gameplay",
        }
    }

    /// Views from which a score can be presented without exiting further.
    pub fn hosts_presentation(self) -> bool {
        match self {
            ViewKind::MainMenu | ViewKind::SongSelect => true,
            ViewKind::Summary | ViewKind::ReplayLoader | ViewKind::Gameplay => false,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Carousel state of a song select view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongSelectState {
    /// Set once the carousel has been populated for the current context.
    pub items_presented: bool,
    /// Beatmap ids currently listed.
    pub visible_beatmaps: Vec<i64>,
    /// Context revision the carousel was built against.
    pub revision: u64,
}

impl SongSelectState {
    pub fn is_listed(&self, beatmap_id: i64) -> bool {
        self.visible_beatmaps.contains(&beatmap_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    MainMenu,
    SongSelect(SongSelectState),
    Summary {
        score: ScoreRecord,
    },
    ReplayLoader {
        score: ScoreRecord,
        replay: ReplayData,
    },
    Gameplay {
        score: ScoreRecord,
        replay: ReplayData,
    },
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::MainMenu => ViewKind::MainMenu,
            View::SongSelect(_) => ViewKind::SongSelect,
            View::Summary { .. } => ViewKind::Summary,
            View::ReplayLoader { .. } => ViewKind::ReplayLoader,
            View::Gameplay { .. } => ViewKind::Gameplay,
        }
    }

    /// Score shown by this view, if it displays one.
    pub fn score(&self) -> Option<&ScoreRecord> {
        match self {
            View::Summary { score }
            | View::ReplayLoader { score, .. }
            | View::Gameplay { score, .. } => Some(score),
            View::MainMenu | View::SongSelect(_) => None,
        }
    }
}

/// A view living on the stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewInstance {
    pub token: ViewToken,
    pub view: View,
}

impl ViewInstance {
    pub fn kind(&self) -> ViewKind {
        self.view.kind()
    }
}
