//! Cross-crate use through the facade.

use skein::prelude::*;
use skein_test_utils::fixtures::{arena_from, list_from};
use skein_test_utils::{recv_n, PROMPT};

#[test]
fn list_escape_during_walk() {
    let (list, elements) = list_from(["a", "b", "c", "d"]);
    let mut visited = Vec::new();
    list.for_each(|e| {
        visited.push(*e.value());
        if *e.value() == "a" {
            elements[1].escape();
        }
    });
    assert_eq!(visited, vec!["a", "c", "d"]);
    assert_eq!(list.to_vec(), vec!["a", "c", "d"]);
}

#[test]
fn stream_replays_arena_contents() {
    let (arena, _) = arena_from(1..=3);
    let stream = EventStream::new();
    let scope = CancelToken::new();
    let rx = stream.subscribe(&scope, arena.to_vec());
    stream.publish(4);
    assert_eq!(recv_n(rx.as_channel(), 4, PROMPT), vec![1, 2, 3, 4]);
    scope.cancel();
}

#[test]
fn configured_arena_through_facade() {
    let config = ArenaConfig::with_initial_capacity(4);
    let mut arena: SlotArena<u8> = SlotArena::with_config(config).unwrap();
    let handle: SlotHandle = arena.push_back(1);
    assert_eq!(arena.capacity(), 4);
    assert_eq!(skein::arena::SlotArena::get(&arena, handle.index()), Some(&1));
}
