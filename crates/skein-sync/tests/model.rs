//! Property tests: the unbounded queue against a `VecDeque` model.

use std::collections::VecDeque;

use proptest::prelude::*;
use skein_sync::{QueueError, TryRecvError, UnboundedQueue};
use skein_test_utils::{assert_ended, PROMPT};

#[derive(Clone, Debug)]
enum Op {
    Send(u32),
    Recv,
    Close,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u32>().prop_map(Op::Send),
        3 => Just(Op::Recv),
        1 => Just(Op::Close),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn queue_matches_fifo_model(ops in prop::collection::vec(arb_op(), 1..60)) {
        let queue = UnboundedQueue::new();
        let mut model: VecDeque<u32> = VecDeque::new();
        let mut closed = false;

        for op in &ops {
            match *op {
                Op::Send(v) => match queue.send(v) {
                    Ok(()) => {
                        prop_assert!(!closed);
                        model.push_back(v);
                    }
                    Err(QueueError::Closed(back)) => {
                        prop_assert!(closed);
                        prop_assert_eq!(back, v);
                    }
                },
                Op::Recv => match model.pop_front() {
                    Some(v) => prop_assert_eq!(queue.recv(), Some(v)),
                    None if closed => prop_assert_eq!(queue.recv(), None),
                    None => prop_assert_eq!(queue.try_recv(), Err(TryRecvError::Empty)),
                },
                Op::Close => {
                    prop_assert_eq!(queue.close(), !closed);
                    closed = true;
                }
            }
        }

        queue.close();
        let rest: Vec<u32> = queue.iter().collect();
        prop_assert_eq!(rest, Vec::from(model));
        assert_ended(queue.receiver().as_channel(), PROMPT);
    }
}
