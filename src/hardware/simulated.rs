use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::HardwareError;

use super::code::AntennaCode;
use super::handler::{AntennaHandler, CardSink};

/// An antenna handler with no hardware behind it.
///
/// Switches are recorded and no card is ever read. Cards reach the session
/// through the keypad `card` and `id` commands instead.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHandler {
    switches: Arc<Mutex<Vec<AntennaCode>>>,
    sink: Option<CardSink>,
    fail_after: Option<usize>,
}

impl SimulatedHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every switch after the first `count` fail as if the server hung up.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Shared view of every switch made so far. Stays valid after the handler
    /// is moved into a session.
    pub fn switch_log(&self) -> Arc<Mutex<Vec<AntennaCode>>> {
        self.switches.clone()
    }
}

#[async_trait]
impl AntennaHandler for SimulatedHandler {
    async fn connect(&mut self, sink: CardSink) -> Result<(), HardwareError> {
        log::info!("Using simulated antennas");
        self.sink = Some(sink);
        Ok(())
    }

    async fn switch_hand(&mut self, code: AntennaCode) -> Result<(), HardwareError> {
        if self.sink.is_none() {
            return Err(HardwareError::NotConnected);
        }
        let mut switches = self.switches.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(limit) = self.fail_after {
            if switches.len() >= limit {
                return Err(HardwareError::Disconnected);
            }
        }
        log::debug!("Simulated switch to antenna {}", code);
        switches.push(code);
        Ok(())
    }

    async fn quit_server(&mut self) -> Result<(), HardwareError> {
        self.sink = None;
        Ok(())
    }
}
