//! Hand-off point between the BLE context and the polling loop.
//!
//! The GATT write handler runs in the SoftDevice task; it must never
//! draw. It decodes the frame and drops the result into a single slot.
//! The polling loop later pulls the slot, which clears it in the same
//! critical section, so an event is seen at most once and a newer write
//! simply replaces an unread one.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use super::protocol;
use super::NavigationEvent;
use crate::error::DecodeError;

/// Connection transitions reported by the BLE stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

pub struct NavInbox {
    latest: Signal<CriticalSectionRawMutex, NavigationEvent>,
    link: Signal<CriticalSectionRawMutex, LinkEvent>,
    connected: AtomicBool,
}

impl NavInbox {
    pub const fn new() -> Self {
        Self {
            latest: Signal::new(),
            link: Signal::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// Characteristic write callback: decode and store.
    ///
    /// A rejected frame leaves the previously stored event untouched.
    pub fn on_write(&self, data: &[u8]) -> Result<NavigationEvent, DecodeError> {
        match protocol::decode(data) {
            Ok(event) => {
                debug!(
                    "Nav update: {} {}m {}km/h",
                    event.instruction.label(),
                    event.distance_m,
                    event.speed_limit_kph
                );
                self.latest.signal(event);
                Ok(event)
            }
            Err(e) => {
                warn!("Invalid navigation data ({} bytes)", data.len());
                Err(e)
            }
        }
    }

    /// Store an already-built event, bypassing the wire format.
    ///
    /// The firmware only stores through [`NavInbox::on_write`]. This is for
    /// host tests and simulators, which need to inject events the decoder
    /// never produces, such as [`NavigationEvent::invalid`].
    pub fn publish(&self, event: NavigationEvent) {
        self.latest.signal(event);
    }

    pub fn on_connect(&self) {
        info!("BLE client connected");
        self.connected.store(true, Ordering::Release);
        self.link.signal(LinkEvent::Connected);
    }

    pub fn on_disconnect(&self) {
        info!("BLE client disconnected");
        self.connected.store(false, Ordering::Release);
        self.link.signal(LinkEvent::Disconnected);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// True while an unread event sits in the slot.
    pub fn has_new_data(&self) -> bool {
        self.latest.signaled()
    }

    /// Pull the unread event, clearing the slot.
    pub fn take(&self) -> Option<NavigationEvent> {
        self.latest.try_take()
    }

    /// Pull the latest unread connection transition.
    pub fn take_link_event(&self) -> Option<LinkEvent> {
        self.link.try_take()
    }
}

impl Default for NavInbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::Instruction;

    const LEFT_500: [u8; 7] = [0x01, 0x00, 0x32, 0x01, 0x00, 0x05, 0x00];

    #[test]
    fn starts_empty_and_disconnected() {
        let inbox = NavInbox::new();
        assert!(!inbox.is_connected());
        assert!(!inbox.has_new_data());
        assert_eq!(inbox.take(), None);
        assert_eq!(inbox.take_link_event(), None);
    }

    #[test]
    fn write_is_delivered_exactly_once() {
        let inbox = NavInbox::new();
        inbox.on_write(&LEFT_500).unwrap();
        assert!(inbox.has_new_data());

        let event = inbox.take().unwrap();
        assert_eq!(event.instruction, Instruction::TurnLeft);
        assert_eq!(event.distance_m, 500);

        assert!(!inbox.has_new_data());
        assert_eq!(inbox.take(), None);
    }

    #[test]
    fn newer_write_overwrites_unread_one() {
        let inbox = NavInbox::new();
        inbox.on_write(&LEFT_500).unwrap();
        inbox
            .on_write(&[0x01, 0x00, 0x32, 0x02, 0x00, 0x02, 0x00])
            .unwrap();

        let event = inbox.take().unwrap();
        assert_eq!(event.instruction, Instruction::TurnRight);
        assert_eq!(event.distance_m, 200);
        assert_eq!(inbox.take(), None);
    }

    #[test]
    fn rejected_write_keeps_previous_event() {
        let inbox = NavInbox::new();
        inbox.on_write(&LEFT_500).unwrap();
        assert!(inbox.on_write(&[0x01, 0x02]).is_err());

        assert_eq!(inbox.take().unwrap().distance_m, 500);
    }

    #[test]
    fn rejected_write_does_not_raise_flag() {
        let inbox = NavInbox::new();
        assert!(inbox.on_write(&[]).is_err());
        assert!(!inbox.has_new_data());
    }

    #[test]
    fn published_event_replaces_unread_write() {
        let inbox = NavInbox::new();
        inbox.on_write(&LEFT_500).unwrap();
        inbox.publish(NavigationEvent::invalid());
        assert!(inbox.has_new_data());
        let event = inbox.take().unwrap();
        assert!(!event.valid);
        assert!(!inbox.has_new_data());
    }

    #[test]
    fn connection_transitions() {
        let inbox = NavInbox::new();
        inbox.on_connect();
        assert!(inbox.is_connected());
        assert_eq!(inbox.take_link_event(), Some(LinkEvent::Connected));
        assert_eq!(inbox.take_link_event(), None);

        inbox.on_disconnect();
        assert!(!inbox.is_connected());
        assert_eq!(inbox.take_link_event(), Some(LinkEvent::Disconnected));
    }
}
