use serde::{Deserialize, Serialize};

/// Which render response is allowed to replace the displayed image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseOrdering {
    /// Every completion is applied; whichever finishes last is shown.
    #[default]
    LastCompleted,
    /// Only the completion of the newest issued request is applied.
    LatestIssued,
}

/// Identifies one issued render request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing request ids and decides which
/// completions are still current.
#[derive(Debug)]
pub struct RenderSequencer {
    ordering: ResponseOrdering,
    last_issued: u64,
}

impl RenderSequencer {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            last_issued: 0,
        }
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Ids start at 1 and never repeat, including across resets.
    pub fn issue(&mut self) -> RenderTicket {
        self.last_issued += 1;
        RenderTicket(self.last_issued)
    }

    pub fn last_issued(&self) -> Option<RenderTicket> {
        (self.last_issued > 0).then_some(RenderTicket(self.last_issued))
    }

    pub fn accepts(&self, ticket: RenderTicket) -> bool {
        match self.ordering {
            ResponseOrdering::LastCompleted => true,
            ResponseOrdering::LatestIssued => ticket.0 == self.last_issued,
        }
    }
}
