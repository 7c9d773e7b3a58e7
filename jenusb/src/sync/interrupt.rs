use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Poll, Waker};

struct InterruptState {
    generation: u32,
    waker: Option<Waker>,
}

/// Broadcast interruption of everybody currently waiting.
///
/// A waiter remembers the generation it started in and resolves as soon as
/// [`Interrupt::raise`] moved past it. Waiters that start after the raise are
/// not affected.
pub struct Interrupt {
    state: RefCell<InterruptState>,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(InterruptState {
                generation: 0,
                waker: None,
            }),
        }
    }

    /// Current generation, to be passed to [`Interrupt::wait`].
    pub fn generation(&self) -> u32 {
        self.state.borrow().generation
    }

    /// Interrupt every pending [`Interrupt::wait`].
    pub fn raise(&self) {
        let mut state = self.state.borrow_mut();
        state.generation = state.generation.wrapping_add(1);
        if let Some(waker) = state.waker.take() {
            waker.wake();
        }
    }

    /// Resolve once [`Interrupt::raise`] is called after `generation` was
    /// observed.
    pub async fn wait(&self, generation: u32) {
        poll_fn(|cx| {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                return Poll::Ready(());
            }

            match state.waker.take() {
                Some(waker) if waker.will_wake(cx.waker()) => state.waker = Some(waker),
                Some(waker) => {
                    waker.wake();
                    state.waker = Some(cx.waker().clone());
                }
                None => state.waker = Some(cx.waker().clone()),
            }
            Poll::Pending
        })
        .await
    }
}
