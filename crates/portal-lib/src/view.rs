// ============================
// portal-lib/src/view.rs
// ============================
//! Loading/loaded/failed state owned by a view.
//!
//! In-flight requests are never cancelled. A request only ever holds a
//! weak [`SlotHandle`], so a response that arrives after its view has
//! been dropped lands nowhere.
use std::future::Future;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::{ApiError, Operation};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// User-facing message
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Strong owner of a view's state
#[derive(Debug)]
pub struct ViewSlot<T> {
    state: Arc<Mutex<ViewState<T>>>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState::Idle)),
        }
    }
}

impl<T: Clone> ViewSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SlotHandle<T> {
        SlotHandle {
            state: Arc::downgrade(&self.state),
        }
    }

    pub fn state(&self) -> ViewState<T> {
        self.state.lock().clone()
    }
}

/// Weak reference held by in-flight work
#[derive(Debug)]
pub struct SlotHandle<T> {
    state: Weak<Mutex<ViewState<T>>>,
}

impl<T> Clone for SlotHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> SlotHandle<T> {
    /// Store `state` if the owning view still exists; returns whether it did.
    pub fn settle(&self, state: ViewState<T>) -> bool {
        match self.state.upgrade() {
            Some(slot) => {
                *slot.lock() = state;
                true
            }
            None => false,
        }
    }
}

/// Mark the slot loading, await `work`, then store its outcome with
/// errors rendered for `op`. Returns whether the view was still there.
pub async fn track<T, F>(handle: &SlotHandle<T>, op: Operation<'_>, work: F) -> bool
where
    F: Future<Output = Result<T, ApiError>>,
{
    handle.settle(ViewState::Loading);
    let state = match work.await {
        Ok(value) => ViewState::Loaded(value),
        Err(err) => ViewState::Failed(err.user_message(op)),
    };
    handle.settle(state)
}
