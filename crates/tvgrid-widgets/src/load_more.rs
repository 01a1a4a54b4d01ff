#![forbid(unsafe_code)]

//! Paging controller for grids that fetch more items on demand.
//!
//! The grid asks for more data when a forward move is blocked on the last
//! line. The host reports progress back through the `notify_*` methods.
//!
//! # Invariants
//!
//! 1. A request while a load is in flight does nothing.
//! 2. Once everything is loaded, the "all loaded" announcement fires once,
//!    and again only after a new load has started.

/// Paging state reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// The last page finished loading; more may exist.
    #[default]
    MoreLoaded,
    /// A page is being fetched.
    MoreLoading,
    /// The data set is complete.
    AllLoaded,
}

/// What the host should do in response to a load-more request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMoreAction {
    /// Fetch the next page.
    StartLoading,
    /// Tell the user there is nothing more to load.
    AnnounceAllLoaded,
    /// No action.
    Nothing,
}

/// Tracks paging state and debounces the all-loaded announcement.
#[derive(Debug, Clone, Default)]
pub struct LoadMoreController {
    enabled: bool,
    state: LoadState,
    all_loaded_announced: bool,
}

impl LoadMoreController {
    /// Create a controller. A disabled controller answers every request with
    /// [`LoadMoreAction::Nothing`].
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Whether paging is enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable paging.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current paging state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Ask for more data.
    pub fn request(&mut self) -> LoadMoreAction {
        if !self.enabled {
            return LoadMoreAction::Nothing;
        }
        match self.state {
            LoadState::MoreLoaded => {
                self.state = LoadState::MoreLoading;
                self.all_loaded_announced = false;
                LoadMoreAction::StartLoading
            }
            LoadState::MoreLoading => LoadMoreAction::Nothing,
            LoadState::AllLoaded if !self.all_loaded_announced => {
                self.all_loaded_announced = true;
                LoadMoreAction::AnnounceAllLoaded
            }
            LoadState::AllLoaded => LoadMoreAction::Nothing,
        }
    }

    /// A page started loading outside of [`request`](Self::request).
    pub fn notify_more_loading(&mut self) {
        self.state = LoadState::MoreLoading;
    }

    /// The in-flight page finished loading.
    pub fn notify_more_loaded(&mut self) {
        self.state = LoadState::MoreLoaded;
    }

    /// No further pages exist.
    pub fn notify_all_loaded(&mut self) {
        self.state = LoadState::AllLoaded;
    }

    /// Forget paging progress (new data set).
    pub fn reset(&mut self) {
        self.state = LoadState::MoreLoaded;
        self.all_loaded_announced = false;
    }
}
