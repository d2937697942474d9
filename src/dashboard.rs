//! The dashboard component: view state plus its loader.
//!
//! Mounting a `Dashboard` starts the load. Dropping it (or calling
//! `unmount`) cancels whatever is still in flight, so a late completion can
//! never touch state that is no longer observed.

use std::sync::Arc;

use crate::data::VaccinationSource;
use crate::domain::{LoadStatus, ViewState};
use crate::error::AppError;
use crate::loader::DataLoader;
use crate::render::{View, render};

pub struct Dashboard {
    state: ViewState,
    loader: DataLoader,
}

impl Dashboard {
    /// Create the component without starting a load. Renders as empty.
    pub fn new(source: Arc<dyn VaccinationSource>) -> Self {
        Self {
            state: ViewState::new(),
            loader: DataLoader::new(source),
        }
    }

    /// Create the component and trigger its one load.
    pub fn mount(source: Arc<dyn VaccinationSource>) -> Self {
        let mut dashboard = Self::new(source);
        dashboard.loader.load(&mut dashboard.state);
        dashboard
    }

    /// Apply a finished load, if any. Returns `true` when a redraw is needed.
    pub fn poll(&mut self) -> bool {
        self.loader.poll(&mut self.state)
    }

    /// Block until the load settles.
    pub fn wait(&mut self) -> LoadStatus {
        self.loader.wait(&mut self.state);
        self.state.status()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.status()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> View {
        render(&self.state)
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.loader.last_error()
    }

    /// Tear the component down. Equivalent to dropping it.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.loader.cancel();
    }
}
