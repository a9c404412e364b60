//! Terminal surfaces
//!
//! Each panel of the player is a plain-text [`Surface`]. A panel redraws only
//! when its own text changed, so a progress tick does not reprint the queue.

use crate::sync::{Surface, ViewModel};
use cadence_playback::{RepeatMode, VolumeIcon};
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

/// Which part of the view a surface draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Full player: artwork, title, progress, controls
    NowPlaying,
    /// Single status line
    MiniPlayer,
    Queue,
    Results,
    Lyrics,
    Notifications,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::NowPlaying,
        Panel::MiniPlayer,
        Panel::Queue,
        Panel::Results,
        Panel::Lyrics,
        Panel::Notifications,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::NowPlaying => "now-playing",
            Self::MiniPlayer => "mini-player",
            Self::Queue => "queue",
            Self::Results => "results",
            Self::Lyrics => "lyrics",
            Self::Notifications => "notifications",
        }
    }

    /// Text for this panel
    pub fn render_text(self, view: &ViewModel) -> String {
        match self {
            Self::NowPlaying => now_playing(view),
            Self::MiniPlayer => mini_player(view),
            Self::Queue => queue(view),
            Self::Results => results(view),
            Self::Lyrics => lyrics(view),
            Self::Notifications => notifications(view),
        }
    }
}

/// One panel drawn to a writer
pub struct TerminalSurface {
    panel: Panel,
    out: Box<dyn Write + Send>,
    last: Option<String>,
}

impl TerminalSurface {
    pub fn new(panel: Panel, out: Box<dyn Write + Send>) -> Self {
        Self {
            panel,
            out,
            last: None,
        }
    }

    /// Every panel, each writing to stdout
    pub fn stdout_set() -> Vec<Box<dyn Surface>> {
        Panel::ALL
            .into_iter()
            .map(|panel| {
                Box::new(TerminalSurface::new(panel, Box::new(std::io::stdout()))) as Box<dyn Surface>
            })
            .collect()
    }

    /// What this surface last drew
    pub fn last_text(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl Surface for TerminalSurface {
    fn name(&self) -> &'static str {
        self.panel.name()
    }

    fn render(&mut self, view: &ViewModel) {
        let text = self.panel.render_text(view);
        if self.last.as_deref() == Some(text.as_str()) {
            return;
        }
        if !text.is_empty() {
            if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
                warn!(surface = self.panel.name(), error = %e, "Surface write failed");
            }
        }
        self.last = Some(text);
    }
}

// ===== Panels =====

fn heart(liked: bool) -> &'static str {
    if liked {
        "♥"
    } else {
        "♡"
    }
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "off",
        RepeatMode::All => "all",
        RepeatMode::One => "one",
    }
}

fn volume_label(view: &ViewModel) -> String {
    let icon = match view.volume_icon {
        VolumeIcon::Silent => "🔇",
        VolumeIcon::Low => "🔉",
        VolumeIcon::High => "🔊",
    };
    format!("{icon} {}%", view.volume)
}

fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

fn now_playing(view: &ViewModel) -> String {
    let mut out = String::from("== Now Playing ==\n");
    match (&view.now_playing, &view.loading) {
        (_, Some(title)) => {
            let _ = writeln!(out, "Loading {title}...");
        }
        (Some(np), None) => {
            let _ = writeln!(out, "{} - {} {}", np.title, np.artist, heart(np.liked));
            let _ = writeln!(out, "art: {}", np.image_url);
        }
        (None, None) => {
            let _ = writeln!(out, "Nothing playing");
        }
    }
    let _ = write!(
        out,
        "[{}] {} / {}  {}  shuffle:{} repeat:{}  {}",
        progress_bar(view.progress, 20),
        view.position,
        view.duration,
        if view.is_playing { "playing" } else { "paused" },
        if view.shuffled { "on" } else { "off" },
        repeat_label(view.repeat),
        volume_label(view),
    );
    out
}

fn mini_player(view: &ViewModel) -> String {
    match &view.now_playing {
        Some(np) => format!(
            "{} {} - {} {}",
            if view.is_playing { "▶" } else { "⏸" },
            np.title,
            np.artist,
            heart(np.liked)
        ),
        None => String::new(),
    }
}

fn queue(view: &ViewModel) -> String {
    let mut out = format!("== Queue ({}) ==", view.queue.len());
    if view.queue.is_empty() {
        out.push_str("\nQueue is empty");
    }
    for (index, row) in view.queue.iter().enumerate() {
        let marker = if row.active { ">" } else { " " };
        let _ = write!(
            out,
            "\n{marker}{:>3}. {} - {} {}",
            index + 1,
            row.title,
            row.artist,
            heart(row.liked)
        );
    }
    out
}

fn results(view: &ViewModel) -> String {
    let mut out = format!("== {} [{}] ==", view.results_title, view.engine);
    if view.searching {
        out.push_str("\nSearching...");
        return out;
    }
    for (index, row) in view.results.iter().enumerate() {
        let _ = write!(
            out,
            "\n{:>3}. {} - {} {}{}",
            index + 1,
            row.title,
            row.artist,
            heart(row.liked),
            if row.queued { " (queued)" } else { "" }
        );
    }
    if !view.recent_searches.is_empty() {
        let _ = write!(out, "\nRecent: {}", view.recent_searches.join(" | "));
    }
    out
}

fn lyrics(view: &ViewModel) -> String {
    match &view.lyrics {
        Some(text) => format!("== Lyrics ==\n{text}"),
        None => String::new(),
    }
}

fn notifications(view: &ViewModel) -> String {
    view.notifications
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
