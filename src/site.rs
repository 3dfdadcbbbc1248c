/// Site: the portfolio pages and the set currently mounted.
///
/// Each mounted page owns its own backdrop and timer. Unmounting a page drops
/// its timer; dropping the site unmounts everything.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::backdrop::AnimatedBackdrop;
use crate::config::BackdropConfig;
use crate::ticker::{BackdropTimer, Frame};

/// A full-viewport page reachable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Projects,
    Info,
    Contact,
}

impl Page {
    /// Sidebar order.
    pub const ALL: [Page; 4] = [Page::Home, Page::Projects, Page::Info, Page::Contact];

    pub fn route(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Projects => "/projects",
            Page::Info => "/info",
            Page::Contact => "/contact",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Projects => "Projects",
            Page::Info => "About Me",
            Page::Contact => "Contact",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Home => f.write_str("home"),
            Page::Projects => f.write_str("projects"),
            Page::Info => f.write_str("info"),
            Page::Contact => f.write_str("contact"),
        }
    }
}

/// Mounted pages, in mount order.
pub struct Site {
    config: BackdropConfig,
    frames: mpsc::Sender<Frame>,
    mounted: Vec<BackdropTimer>,
}

impl Site {
    pub fn new(config: BackdropConfig, frames: mpsc::Sender<Frame>) -> Self {
        Self {
            config,
            frames,
            mounted: Vec::new(),
        }
    }

    /// Mount a page with a fresh backdrop. Returns false if it is already mounted.
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self, page: Page) -> bool {
        if self.is_mounted(page) {
            log::debug!("{page} already mounted");
            return false;
        }
        let timer = BackdropTimer::start(
            page,
            AnimatedBackdrop::new(self.config),
            self.config.tick_period,
            self.frames.clone(),
        );
        self.mounted.push(timer);
        log::info!("Mounted {} ({})", page.title(), page.route());
        true
    }

    /// Unmount a page, cancelling its timer. Returns false if it was not mounted.
    pub fn unmount(&mut self, page: Page) -> bool {
        let Some(idx) = self.mounted.iter().position(|t| t.page() == page) else {
            return false;
        };
        let timer = self.mounted.remove(idx);
        log::info!("Unmounted {} after {} ticks", page.title(), timer.ticks());
        true
    }

    pub fn unmount_all(&mut self) {
        for page in self.mounted_pages() {
            self.unmount(page);
        }
    }

    pub fn is_mounted(&self, page: Page) -> bool {
        self.mounted.iter().any(|t| t.page() == page)
    }

    pub fn mounted_pages(&self) -> Vec<Page> {
        self.mounted.iter().map(BackdropTimer::page).collect()
    }
}
