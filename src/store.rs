/// Request lifecycle of a store. `error` is populated only in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Ticket for one issued request. A response may only be applied while its
/// ticket is still the latest one the store handed out; anything older is a
/// stale response and is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSeq(u64);

/// Fetch state machine holding the last successful payload. Starting a new
/// request keeps the previous data visible; a failure keeps it too and only
/// records the error. Only `clear` wipes data.
#[derive(Debug)]
pub struct Store<T> {
    data: T,
    status: FetchStatus,
    error: Option<String>,
    latest: u64,
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> Store<T> {
    pub fn new() -> Self {
        Self {
            data: T::default(),
            status: FetchStatus::Idle,
            error: None,
            latest: 0,
        }
    }

    /// Issues a new request ticket, invalidating all earlier ones.
    pub fn begin(&mut self) -> RequestSeq {
        self.latest += 1;
        self.status = FetchStatus::Loading;
        self.error = None;
        RequestSeq(self.latest)
    }

    /// Applies a successful response. Returns false (and changes nothing)
    /// when the ticket is stale.
    pub fn resolve(&mut self, seq: RequestSeq, data: T) -> bool {
        if seq.0 != self.latest {
            return false;
        }
        self.status = FetchStatus::Succeeded;
        self.data = data;
        true
    }

    /// Applies a failure. Previous data is intentionally left in place so the
    /// caller can keep showing it under the error.
    pub fn reject(&mut self, seq: RequestSeq, message: impl Into<String>) -> bool {
        if seq.0 != self.latest {
            return false;
        }
        self.status = FetchStatus::Failed;
        self.error = Some(message.into());
        true
    }

    /// Resets to `Idle` and wipes data and error. Also invalidates in-flight
    /// tickets, so a response resolving after a clear cannot resurrect data.
    pub fn clear(&mut self) {
        self.latest += 1;
        self.data = T::default();
        self.status = FetchStatus::Idle;
        self.error = None;
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// User-selected report filters. Created once at startup and mutated only
/// through the orchestrator intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub months: u32,
    pub selected_teams: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            months: 3,
            selected_teams: Vec::new(),
        }
    }
}
