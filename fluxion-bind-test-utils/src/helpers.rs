// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::{FutureExt, Stream, StreamExt};

/// Items the stream can yield right now, without waiting.
///
/// Stops at the first pending poll or at the end of the stream.
pub fn ready_items<S>(stream: &mut S) -> Vec<S::Item>
where
    S: Stream + Unpin,
{
    let mut items = Vec::new();
    while let Some(Some(item)) = stream.next().now_or_never() {
        items.push(item);
    }
    items
}

/// `true` if the stream has ended (as opposed to merely having nothing yet).
pub fn is_terminated<S>(stream: &mut S) -> bool
where
    S: Stream + Unpin,
{
    matches!(stream.next().now_or_never(), Some(None))
}
