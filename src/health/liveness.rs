//! Liveness responder.
//!
//! Answers "the process is up" without touching any checker.

use serde::Serialize;

/// Reply to a liveness ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pong {
    pub alive: bool,
}

/// Always alive.
pub fn ping() -> Pong {
    Pong { alive: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_is_always_alive() {
        assert!(ping().alive);
    }
}
