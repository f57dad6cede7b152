use std::sync::{Arc, Mutex};

use logexec::streams::{CombinedLog, FanOut, LineRelay};
use logexec::Stream;
use proptest::prelude::*;

// Bytes biased towards newlines so that inputs contain many short lines.
fn output_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![
            3 => Just(b'\n'),
            1 => Just(b'\r'),
            10 => b'a'..=b'z',
        ],
        0..400,
    )
}

// Split `data` at the given (unsorted, possibly repeated) offsets.
fn chunk(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut offsets: Vec<usize> = cuts
        .iter()
        .map(|c| if data.is_empty() { 0 } else { c % (data.len() + 1) })
        .collect();
    offsets.push(0);
    offsets.push(data.len());
    offsets.sort_unstable();
    offsets.dedup();

    offsets
        .windows(2)
        .map(|w| data[w[0]..w[1]].to_vec())
        .collect()
}

fn expected_lines(data: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = data.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

proptest! {
    #[test]
    fn chunking_never_changes_the_emitted_lines(
        data in output_strategy(),
        cuts in proptest::collection::vec(any::<usize>(), 0..20),
    ) {
        let emitted = Arc::new(Mutex::new(Vec::<Vec<u8>>::new()));
        let sink = Arc::clone(&emitted);
        let mut relay = LineRelay::new(
            move |line: &[u8]| sink.lock().unwrap().push(line.to_vec()),
            Arc::new(Mutex::new(())),
        );

        for piece in chunk(&data, &cuts) {
            relay.feed(&piece).unwrap();
        }
        relay.close().unwrap();

        prop_assert_eq!(emitted.lock().unwrap().clone(), expected_lines(&data));
    }

    #[test]
    fn combined_log_reassembles_the_exact_byte_stream(
        data in output_strategy(),
        cuts in proptest::collection::vec(any::<usize>(), 0..20),
    ) {
        let log = CombinedLog::new();
        let mut fanout = FanOut::new().with(log.sink(Stream::Stdout));

        let chunks = chunk(&data, &cuts);
        for piece in &chunks {
            fanout.write_chunk(piece).unwrap();
        }
        fanout.close().unwrap();

        prop_assert_eq!(log.concatenated(), data.clone());
        prop_assert_eq!(log.len(), chunks.iter().filter(|c| !c.is_empty()).count());
    }
}
