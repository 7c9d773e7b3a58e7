use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

/// Drive two futures side by side and return once both are ready.
///
/// The first future is always polled first. The indication pump is usually
/// one half, the operations using the device the other.
pub fn join<F1: Future, F2: Future>(
    f1: F1,
    f2: F2,
) -> impl Future<Output = (F1::Output, F2::Output)> {
    JoinFuture {
        f1: MaybeDone::Running(f1),
        f2: MaybeDone::Running(f2),
    }
}

enum MaybeDone<F: Future> {
    Running(F),
    Done(Option<F::Output>),
}

impl<F: Future> MaybeDone<F> {
    /// Returns `true` once the output is available.
    ///
    /// # Safety
    /// `self` must be pinned.
    unsafe fn poll(&mut self, cx: &mut Context<'_>) -> bool {
        if let MaybeDone::Running(f) = self {
            match Pin::new_unchecked(f).poll(cx) {
                Poll::Ready(output) => *self = MaybeDone::Done(Some(output)),
                Poll::Pending => return false,
            }
        }
        true
    }

    fn take(&mut self) -> Option<F::Output> {
        match self {
            MaybeDone::Done(output) => output.take(),
            MaybeDone::Running(_) => None,
        }
    }
}

struct JoinFuture<F1: Future, F2: Future> {
    f1: MaybeDone<F1>,
    f2: MaybeDone<F2>,
}

impl<F1, F2> Future for JoinFuture<F1, F2>
where
    F1: Future,
    F2: Future,
{
    type Output = (F1::Output, F2::Output);

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // Safety: the fields are never moved out of the pinned future
        let this = unsafe { self.get_unchecked_mut() };
        let first = unsafe { this.f1.poll(cx) };
        let second = unsafe { this.f2.poll(cx) };
        if !(first && second) {
            return Poll::Pending;
        }

        match (this.f1.take(), this.f2.take()) {
            (Some(f1), Some(f2)) => Poll::Ready((f1, f2)),
            _ => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::future::poll_fn;
    use core::task::Poll;

    use pollster::FutureExt as _;

    use super::join;
    use crate::sync::yield_now::yield_now;

    #[test]
    fn both_ready() {
        async {
            let f1 = poll_fn(|_| Poll::Ready(1));
            let f2 = poll_fn(|_| Poll::Ready(2));

            assert_eq!(join(f1, f2).await, (1, 2));
        }
        .block_on();
    }

    #[test]
    fn waits_for_the_slower_half() {
        async {
            let mut counter = 10;
            let f1 = poll_fn(move |cx| {
                if counter == 0 {
                    Poll::Ready(())
                } else {
                    counter -= 1;
                    cx.waker().wake_by_ref();
                    Poll::Pending
                }
            });
            let f2 = poll_fn(|_| Poll::Ready(()));

            assert_eq!(join(f1, f2).await, ((), ()));
        }
        .block_on();
    }

    #[test]
    fn halves_see_each_other() {
        let flag = Cell::new(false);
        let (seen, ()) = async {
            join(
                async {
                    while !flag.get() {
                        yield_now().await;
                    }
                    true
                },
                async { flag.set(true) },
            )
            .await
        }
        .block_on();
        assert!(seen);
    }
}
