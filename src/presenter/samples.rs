//! Fixed "recent purchase" records and the source the presenter draws from.

use std::fmt;

use rand::seq::IndexedRandom;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleRecord {
    pub id: u32,
    pub message: &'static str,
    pub location: &'static str,
    pub time_ago: &'static str,
    pub product: &'static str,
}

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {})",
            self.message, self.product, self.location, self.time_ago
        )
    }
}

pub const SAMPLE_RECORDS: [SampleRecord; 6] = [
    SampleRecord {
        id: 1,
        message: "Someone just purchased",
        location: "Portland, OR",
        time_ago: "2 minutes ago",
        product: "Linen Throw Blanket",
    },
    SampleRecord {
        id: 2,
        message: "A shopper bought",
        location: "Austin, TX",
        time_ago: "5 minutes ago",
        product: "Ceramic Pour-Over Set",
    },
    SampleRecord {
        id: 3,
        message: "Someone just ordered",
        location: "Burlington, VT",
        time_ago: "9 minutes ago",
        product: "Beeswax Candle Trio",
    },
    SampleRecord {
        id: 4,
        message: "A new customer picked up",
        location: "Denver, CO",
        time_ago: "14 minutes ago",
        product: "Walnut Serving Board",
    },
    SampleRecord {
        id: 5,
        message: "Someone just purchased",
        location: "Asheville, NC",
        time_ago: "21 minutes ago",
        product: "Wool Market Tote",
    },
    SampleRecord {
        id: 6,
        message: "A shopper bought",
        location: "Madison, WI",
        time_ago: "32 minutes ago",
        product: "Linen Throw Blanket",
    },
];

/// Anything that can hand the presenter one record to show.
pub trait SampleSource: Send + Sync {
    fn pick(&self) -> Option<SampleRecord>;
}

/// Uniform random pick over a fixed slice of records.
#[derive(Debug, Clone, Copy)]
pub struct RandomSamples {
    records: &'static [SampleRecord],
}

impl RandomSamples {
    #[must_use]
    pub fn new(records: &'static [SampleRecord]) -> Self {
        Self { records }
    }
}

impl Default for RandomSamples {
    fn default() -> Self {
        Self::new(&SAMPLE_RECORDS)
    }
}

impl SampleSource for RandomSamples {
    fn pick(&self) -> Option<SampleRecord> {
        self.records.choose(&mut rand::rng()).copied()
    }
}
