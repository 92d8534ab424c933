use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use super::describe_fetch_error;
use crate::domain::{PricePoint, PriceSnapshot, RollingWindow, Symbol};
use crate::poller::{FetchFuture, PollSource, Poller, PollerConfig};
use crate::sources::BackendClient;
use crate::FetchError;

/// Current price summary plus the rolling chart history.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceBoard {
    pub current: Option<PricePoint>,
    pub history: RollingWindow<PricePoint>,
}

impl PriceBoard {
    pub fn record(&mut self, point: PricePoint) {
        self.current = Some(point.clone());
        self.history.push(point);
    }
}

/// Polls `/realtime/{symbol}`.
///
/// Chart points are stamped with the wall-clock time at `utc_offset`.
#[derive(Debug, Clone)]
pub struct PriceTicker {
    client: BackendClient,
    utc_offset: UtcOffset,
}

impl PriceTicker {
    /// Stamps points in the local offset when it can be determined, UTC otherwise.
    ///
    /// On Unix the local offset is only available while the process is
    /// single-threaded; multi-threaded callers should resolve it at startup
    /// and pass it through [`PriceTicker::with_utc_offset`].
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            utc_offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    pub fn with_utc_offset(mut self, utc_offset: UtcOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    fn local_time(&self, now: OffsetDateTime) -> OffsetDateTime {
        now.to_offset(self.utc_offset)
    }

    /// Poller with the default 5 s refresh interval.
    pub fn into_poller(self) -> Poller<Self> {
        Poller::new(self, PollerConfig::price())
    }
}

impl PollSource for PriceTicker {
    type Target = Symbol;
    type Output = PriceSnapshot;
    type Model = PriceBoard;

    fn fetch<'a>(&'a self, target: &'a Symbol) -> FetchFuture<'a, PriceSnapshot> {
        Box::pin(self.client.realtime(target))
    }

    fn apply(&self, model: &mut PriceBoard, output: PriceSnapshot) {
        let received_at = self.local_time(OffsetDateTime::now_utc());
        model.record(PricePoint::from_snapshot(&output, received_at));
    }

    fn describe_error(&self, error: &FetchError) -> String {
        describe_fetch_error("stock data", &self.client.config().realtime_base_url, error)
    }
}
