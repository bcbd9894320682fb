use alloy::{
    consensus::BlockHeader,
    providers::Provider,
    transports::{TransportError, TransportErrorKind},
};
use futures::{Stream, StreamExt, future, stream::BoxStream};
use tracing::debug;

use crate::{error::BlockStreamError, types::BlockNumber};

pub type BlockStreamItem = Result<BlockNumber, BlockStreamError>;

pub trait BlockStream: Stream<Item = BlockStreamItem> + Send + Unpin {}

impl<T> BlockStream for T where T: Stream<Item = BlockStreamItem> + Send + Unpin {}

pub type BoxBlockStream = BoxStream<'static, BlockStreamItem>;

/// Turns a provider into a stream of new block numbers, used as the tick
/// that marks cached balances stale.
#[derive(Clone)]
pub struct BlockTicker<P>
where
    P: Provider + Clone + 'static,
{
    provider: P,
}

impl<P> BlockTicker<P>
where
    P: Provider + Clone + 'static,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Subscribes over pubsub when the transport supports it, otherwise polls.
    /// Repeated notifications for the same height are collapsed.
    pub async fn into_stream(self) -> Result<BoxBlockStream, BlockStreamError> {
        let heights = match self.provider.subscribe_blocks().await {
            Ok(subscription) => subscription
                .into_stream()
                .map(|header| Ok(header.number()))
                .boxed(),
            Err(TransportError::Transport(TransportErrorKind::PubsubUnavailable)) => {
                debug!("pubsub unavailable, polling for blocks");
                self.provider
                    .watch_full_blocks()
                    .await?
                    .into_stream()
                    .map(|block| block.map(|block| block.header.number()))
                    .boxed()
            }
            Err(other) => return Err(other.into()),
        };
        Ok(ticks(heights))
    }
}

/// One tick per new height; a height repeated back to back is dropped.
fn ticks(heights: BoxStream<'static, Result<u64, TransportError>>) -> BoxBlockStream {
    let mut last = None;
    heights
        .filter_map(move |height| {
            let tick = match height {
                Ok(height) if last == Some(height) => None,
                Ok(height) => {
                    last = Some(height);
                    Some(Ok(BlockNumber::new(height)))
                }
                Err(error) => Some(Err(BlockStreamError::from(error))),
            };
            future::ready(tick)
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    #[tokio::test]
    async fn repeated_heights_tick_once() {
        let heights = stream::iter([1u64, 1, 2, 2, 2, 3, 2].map(Ok)).boxed();

        let seen: Vec<u64> = ticks(heights)
            .map(|tick| tick.map(|block| block.as_u64()).unwrap_or_default())
            .collect()
            .await;

        assert_eq!(seen, vec![1, 2, 3, 2]);
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let heights = stream::iter([Ok(4u64), Err(TransportErrorKind::backend_gone()), Ok(4)])
            .boxed();

        let ticks: Vec<BlockStreamItem> = ticks(heights).collect().await;

        assert_eq!(ticks.len(), 2);
        assert!(matches!(ticks[0], Ok(block) if block.as_u64() == 4));
        assert!(matches!(ticks[1], Err(BlockStreamError::Transport(_))));
    }
}
