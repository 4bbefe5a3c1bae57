/// Test doubles simulating the CAN controller, the USB host link, the clock,
/// and the indicators during integration tests.
use gs_can_relay::{
    frame::error_status::encode_bxcan_error_status,
    traits::{Activity, ActivityIndicator, CanChannel, HostLink, MonotonicClock},
    HostFrame, Relay, RelayConfig,
};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum MockError {
    /// Nothing to receive.
    Empty,
    /// Peer not ready to accept the frame.
    Busy,
}

//==================================================================================CAN
#[derive(Default)]
#[allow(dead_code)]
/// Scripted CAN controller.
pub struct MockCan {
    /// Bus frames waiting in the receive FIFO.
    pub pending: VecDeque<HostFrame>,
    /// Upcoming receive calls that report a pending frame yet return nothing.
    pub spurious_pending: usize,
    pub receive_attempts: usize,
    /// Frames accepted for transmission, in order.
    pub transmitted: Vec<HostFrame>,
    pub transmit_attempts: usize,
    /// Upcoming transmit calls to reject.
    pub reject_transmits: usize,
    /// Reject every transmit while set.
    pub bus_busy: bool,
    /// Status values returned by successive reads; the last one sticks.
    pub statuses: VecDeque<u32>,
    pub status: u32,
    /// Upcoming parse calls that fail.
    pub parse_failures: usize,
}

#[allow(dead_code)]
impl MockCan {
    /// Queue a standard data frame in the receive FIFO.
    pub fn push_rx(&mut self, can_id: u32, payload: &[u8]) {
        let mut frame = HostFrame::new();
        frame.can_id = can_id;
        frame.can_dlc = payload.len() as u8;
        frame.data[..payload.len()].copy_from_slice(payload);
        self.pending.push_back(frame);
    }
}

impl CanChannel for MockCan {
    type Error = MockError;

    fn rx_pending(&mut self) -> bool {
        self.spurious_pending > 0 || !self.pending.is_empty()
    }

    fn receive(&mut self, frame: &mut HostFrame) -> Result<(), Self::Error> {
        self.receive_attempts += 1;
        if self.spurious_pending > 0 {
            self.spurious_pending -= 1;
            return Err(MockError::Empty);
        }
        let bus = self.pending.pop_front().ok_or(MockError::Empty)?;
        // A driver only writes the CAN fields.
        frame.can_id = bus.can_id;
        frame.can_dlc = bus.can_dlc;
        frame.data = bus.data;
        Ok(())
    }

    fn transmit(&mut self, frame: &HostFrame) -> Result<(), Self::Error> {
        self.transmit_attempts += 1;
        if self.bus_busy {
            return Err(MockError::Busy);
        }
        if self.reject_transmits > 0 {
            self.reject_transmits -= 1;
            return Err(MockError::Busy);
        }
        self.transmitted.push(*frame);
        Ok(())
    }

    fn error_status(&mut self) -> u32 {
        if let Some(status) = self.statuses.pop_front() {
            self.status = status;
        }
        self.status
    }

    fn parse_error_status(&mut self, status: u32, frame: &mut HostFrame) -> bool {
        if self.parse_failures > 0 {
            self.parse_failures -= 1;
            return false;
        }
        encode_bxcan_error_status(status, frame)
    }
}

//==================================================================================HOST
#[derive(Default)]
#[allow(dead_code)]
/// Scripted USB host link.
pub struct MockHost {
    pub version: u8,
    /// IN endpoint readiness; transmits fail while it is false.
    pub ready: bool,
    /// Upcoming transmit calls to reject even when ready.
    pub reject_transmits: usize,
    pub transmit_attempts: usize,
    /// Frames delivered to the host, in order.
    pub sent: Vec<HostFrame>,
    /// Frames the host sent to the device.
    pub inbox: VecDeque<HostFrame>,
    pub detach: bool,
}

#[allow(dead_code)]
impl MockHost {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            ready: true,
            ..Default::default()
        }
    }

    /// Queue a host transmit request carrying `echo_id`.
    pub fn push_request(&mut self, echo_id: u32, can_id: u32) {
        let mut frame = HostFrame::new();
        frame.echo_id = echo_id;
        frame.can_id = can_id;
        frame.can_dlc = 1;
        frame.data[0] = echo_id as u8;
        self.inbox.push_back(frame);
    }
}

impl HostLink for MockHost {
    type Error = MockError;

    fn tx_ready(&mut self) -> bool {
        self.ready
    }

    fn transmit(&mut self, frame: &HostFrame) -> Result<(), Self::Error> {
        self.transmit_attempts += 1;
        if !self.ready {
            return Err(MockError::Busy);
        }
        if self.reject_transmits > 0 {
            self.reject_transmits -= 1;
            return Err(MockError::Busy);
        }
        self.sent.push(*frame);
        Ok(())
    }

    fn rx_pending(&mut self) -> bool {
        !self.inbox.is_empty()
    }

    fn receive(&mut self, frame: &mut HostFrame) -> Result<(), Self::Error> {
        *frame = self.inbox.pop_front().ok_or(MockError::Empty)?;
        Ok(())
    }

    fn protocol_version(&self) -> u8 {
        self.version
    }

    fn detach_requested(&self) -> bool {
        self.detach
    }
}

//==================================================================================CLOCK
#[derive(Clone, Default)]
#[allow(dead_code)]
/// Clock whose time is set by the test through a shared cell.
pub struct MockClock(pub Rc<Cell<u32>>);

#[allow(dead_code)]
impl MockClock {
    pub fn at(now_us: u32) -> Self {
        Self(Rc::new(Cell::new(now_us)))
    }

    pub fn set(&self, now_us: u32) {
        self.0.set(now_us);
    }
}

impl MonotonicClock for MockClock {
    fn now_us(&mut self) -> u32 {
        self.0.get()
    }
}

//==================================================================================INDICATOR
#[derive(Default)]
#[allow(dead_code)]
/// Indicator recording every call.
pub struct RecordingIndicator {
    pub activity: Vec<Activity>,
    pub heartbeat_toggles: usize,
    pub updates: usize,
}

impl ActivityIndicator for RecordingIndicator {
    fn indicate(&mut self, activity: Activity) {
        self.activity.push(activity);
    }

    fn toggle_heartbeat(&mut self) {
        self.heartbeat_toggles += 1;
    }

    fn update(&mut self, _now_us: u32) {
        self.updates += 1;
    }
}

//==================================================================================RELAY
#[allow(dead_code)]
pub type TestRelay = Relay<MockCan, MockHost, MockClock, RecordingIndicator, 4>;

#[allow(dead_code)]
/// Relay with the reference configuration and a ready host speaking `version`.
pub fn relay_with(version: u8, clock: MockClock) -> TestRelay {
    Relay::new(
        MockCan::default(),
        MockHost::new(version),
        clock,
        RecordingIndicator::default(),
        RelayConfig::new(),
    )
}

#[allow(dead_code)]
/// Run `passes` relay passes, checking buffer conservation after each one.
pub fn poll_n(relay: &mut TestRelay, passes: usize) {
    for _ in 0..passes {
        relay.poll().expect("queues never overflow");
        assert_eq!(relay.accounted_frames(), 4, "frame buffer leaked or duplicated");
    }
}
