use serde::{Deserialize, Serialize};

use crate::controller::Sample;

/// Which hop of the harness a counter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Client,
    Proxy,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Send,
    Recv,
}

/// Stable identity of one of the six counters, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesId {
    ClientSent,
    ClientRecv,
    ProxySent,
    ProxyRecv,
    ServerSent,
    ServerRecv,
}

impl SeriesId {
    pub const ALL: [SeriesId; 6] = [
        SeriesId::ClientSent,
        SeriesId::ClientRecv,
        SeriesId::ProxySent,
        SeriesId::ProxyRecv,
        SeriesId::ServerSent,
        SeriesId::ServerRecv,
    ];

    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::ClientSent | Self::ClientRecv => Endpoint::Client,
            Self::ProxySent | Self::ProxyRecv => Endpoint::Proxy,
            Self::ServerSent | Self::ServerRecv => Endpoint::Server,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Self::ClientSent | Self::ProxySent | Self::ServerSent => Direction::Send,
            Self::ClientRecv | Self::ProxyRecv | Self::ServerRecv => Direction::Recv,
        }
    }

    /// Legend label, e.g. `"Proxy (Send)"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ClientSent => "Client (Send)",
            Self::ClientRecv => "Client (Recv)",
            Self::ProxySent => "Proxy (Send)",
            Self::ProxyRecv => "Proxy (Recv)",
            Self::ServerSent => "Server (Send)",
            Self::ServerRecv => "Server (Recv)",
        }
    }

    /// Key used in URLs and JSON, matching the controller's counter names.
    pub fn key(self) -> &'static str {
        match self {
            Self::ClientSent => "client_sent",
            Self::ClientRecv => "client_recv",
            Self::ProxySent => "proxy_sent",
            Self::ProxyRecv => "proxy_recv",
            Self::ServerSent => "server_sent",
            Self::ServerRecv => "server_recv",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Proxy series start hidden; the operator opts in to them.
    pub fn visible_by_default(self) -> bool {
        self.endpoint() != Endpoint::Proxy
    }

    /// Pick this series' counter out of a sample.
    pub fn read(self, sample: &Sample) -> u64 {
        match self {
            Self::ClientSent => sample.client_sent,
            Self::ClientRecv => sample.client_recv,
            Self::ProxySent => sample.proxy_sent,
            Self::ProxyRecv => sample.proxy_recv,
            Self::ServerSent => sample.server_sent,
            Self::ServerRecv => sample.server_recv,
        }
    }
}

/// One plotted point: client wall-clock millis and counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimePoint {
    pub timestamp_ms: i64,
    pub value: u64,
}

/// Append-only history of one counter plus its legend state.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub id: SeriesId,
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub direction: Direction,
    pub visible: bool,
    pub points: Vec<TimePoint>,
}

impl Series {
    pub fn new(id: SeriesId) -> Self {
        Self {
            id,
            name: id.display_name(),
            endpoint: id.endpoint(),
            direction: id.direction(),
            visible: id.visible_by_default(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: TimePoint) {
        debug_assert!(
            self.points
                .last()
                .map_or(true, |last| last.timestamp_ms <= point.timestamp_ms),
            "out-of-order append on {}",
            self.name
        );
        self.points.push(point);
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.points.last().map(|p| p.timestamp_ms)
    }
}
