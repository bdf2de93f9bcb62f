//! Buffer worker behind an [`UnboundedQueue`](crate::UnboundedQueue).
//!
//! The worker owns the only buffer. Producers rendezvous with it on the
//! submit channel, consumers rendezvous with it on the deliver channel,
//! and both are zero-capacity, so an item is always in exactly one place:
//! the producer's hand, the buffer, or a consumer's hand.
//!
//! Each iteration registers whichever operations are currently possible
//! (accept while open, deliver while the buffer is non-empty) and blocks
//! on all of them at once. After close the worker drops the submit side,
//! drains the buffer, then drops the deliver side so consumers see
//! end-of-stream.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Select, Sender};
use skein_arena::SlotArena;

/// Channels and counters handed to the worker thread.
pub(crate) struct WorkerChannels<T> {
    pub submit: Receiver<T>,
    pub deliver: Sender<T>,
    pub close: Receiver<Infallible>,
    pub len: Arc<AtomicUsize>,
}

/// Outcome of one rendezvous.
enum Step<T> {
    Accepted(T),
    ProducersGone,
    Closed,
    Delivered,
    ConsumersGone,
}

/// Run until closed and drained, or until every consumer is gone.
pub(crate) fn worker_loop<T>(channels: WorkerChannels<T>) {
    let WorkerChannels {
        submit,
        deliver,
        close,
        len,
    } = channels;
    let mut submit = Some(submit);
    let mut buffer: SlotArena<T> = SlotArena::new();

    while submit.is_some() || !buffer.is_empty() {
        let step = {
            let mut sel = Select::new();
            let accept = submit.as_ref().map(|rx| (rx, sel.recv(rx), sel.recv(&close)));
            let offer = (!buffer.is_empty()).then(|| sel.send(&deliver));
            let oper = sel.select();
            let index = oper.index();

            match (accept, offer) {
                (Some((rx, recv_op, _)), _) if index == recv_op => match oper.recv(rx) {
                    Ok(item) => Step::Accepted(item),
                    Err(_) => Step::ProducersGone,
                },
                (Some((_, _, close_op)), _) if index == close_op => {
                    let _ = oper.recv(&close);
                    Step::Closed
                }
                (_, Some(send_op)) if index == send_op => {
                    let Some(item) = buffer.pop_front() else {
                        unreachable!("deliver registered on an empty buffer");
                    };
                    match oper.send(&deliver, item) {
                        Ok(()) => Step::Delivered,
                        Err(_) => Step::ConsumersGone,
                    }
                }
                _ => unreachable!("select returned an unregistered operation"),
            }
        };

        match step {
            Step::Accepted(item) => {
                buffer.push_back(item);
                len.fetch_add(1, Ordering::Release);
            }
            Step::ProducersGone => submit = None,
            Step::Closed => {
                log::debug!("queue closed with {} buffered", buffer.len());
                submit = None;
            }
            Step::Delivered => {
                len.fetch_sub(1, Ordering::Release);
            }
            Step::ConsumersGone => {
                log::debug!("queue consumers gone, discarding {} buffered", buffer.len());
                len.store(0, Ordering::Release);
                break;
            }
        }
    }
    log::debug!("queue worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn spawn<T: Send + 'static>() -> (
        Sender<T>,
        Receiver<T>,
        Sender<Infallible>,
        Arc<AtomicUsize>,
        thread::JoinHandle<()>,
    ) {
        let (submit_tx, submit_rx) = crossbeam_channel::bounded(0);
        let (deliver_tx, deliver_rx) = crossbeam_channel::bounded(0);
        let (close_tx, close_rx) = crossbeam_channel::bounded(0);
        let len = Arc::new(AtomicUsize::new(0));
        let channels = WorkerChannels {
            submit: submit_rx,
            deliver: deliver_tx,
            close: close_rx,
            len: Arc::clone(&len),
        };
        let handle = thread::spawn(move || worker_loop(channels));
        (submit_tx, deliver_rx, close_tx, len, handle)
    }

    #[test]
    fn buffers_then_drains_after_close() {
        let (tx, rx, close, len, handle) = spawn::<u32>();
        for i in 0..100 {
            tx.send(i).unwrap();
        }
        drop(close);
        let got: Vec<u32> = rx.iter().collect();
        assert_eq!(got, (0..100).collect::<Vec<_>>());
        assert!(tx.send(0).is_err());
        handle.join().unwrap();
        assert_eq!(len.load(Ordering::Acquire), 0);
    }

    #[test]
    fn producers_gone_acts_as_close() {
        let (tx, rx, _close, _len, handle) = spawn::<&'static str>();
        tx.send("a").unwrap();
        drop(tx);
        assert_eq!(rx.recv().unwrap(), "a");
        assert!(rx.recv().is_err());
        handle.join().unwrap();
    }

    #[test]
    fn consumers_gone_stops_worker() {
        let (tx, rx, close, _len, handle) = spawn::<u8>();
        tx.send(1).unwrap();
        drop(rx);
        drop(close);
        handle.join().unwrap();
        assert!(tx.send(2).is_err());
    }
}
