use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::model::ControllerEvent;

/// Fan-out of controller notifications to any number of observers.
///
/// Subscribers that dropped their receiver are pruned on the next broadcast.
#[derive(Clone, Default)]
pub struct ControllerEventBus {
    subscribers: Arc<Mutex<Vec<Sender<ControllerEvent>>>>,
}

impl ControllerEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        let (tx, rx) = unbounded::<ControllerEvent>();
        {
            let mut subscribers = self.lock();
            subscribers.push(tx);
        }
        rx
    }

    pub fn broadcast(&self, event: ControllerEvent) {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sender<ControllerEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_reaches_every_subscriber() {
        let bus = ControllerEventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.broadcast(ControllerEvent::LoadingChanged { loading: true });

        assert_eq!(a.try_recv().unwrap(), ControllerEvent::LoadingChanged { loading: true });
        assert_eq!(b.try_recv().unwrap(), ControllerEvent::LoadingChanged { loading: true });
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let bus = ControllerEventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.broadcast(ControllerEvent::PlayingChanged { playing: false });

        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }
}
