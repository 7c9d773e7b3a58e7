use core::{future::poll_fn, task::Poll};

/// Make the current task yield immediately, such that other parts of the
/// task can make progress.
pub async fn yield_now() {
    let mut has_yielded = false;
    poll_fn(move |cx| {
        if has_yielded {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            has_yielded = true;
            Poll::Pending
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::select::select;
    use pollster::FutureExt;

    #[test]
    fn gives_way_once() {
        async {
            assert!(select(yield_now(), async {}).await.is_second());
            yield_now().await;
        }
        .block_on();
    }
}
