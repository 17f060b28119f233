//! Event bus for decoupled communication between the controller and the
//! presentation layer.
//!
//! The bus is single-threaded (WASM constraint) and uses interior mutability
//! via RefCell. Events are buffered for draining, and also pushed to any
//! subscribed listeners as they are emitted.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use chat_types::event::ChatEvent;

pub type Listener = Rc<dyn Fn(&ChatEvent)>;

/// Shared event bus — clone-cheap via Rc.
#[derive(Clone)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<ChatEvent>>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Publish an event. Called by the controller.
    pub fn emit(&self, event: ChatEvent) {
        // Listeners may subscribe or emit re-entrantly, so neither
        // RefCell is held while they run.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in &listeners {
            listener(&event);
        }
        self.queue.borrow_mut().push_back(event);
    }

    /// Register a callback invoked synchronously on every emit.
    pub fn subscribe(&self, listener: impl Fn(&ChatEvent) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Drain all buffered events.
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
