//! Deduplicating an at-least-once message stream.
//!
//! The deduper never inspects message structure; the consumer extracts a
//! byte key and feeds it to `try_insert`, treating a `false` return as a
//! probable duplicate to skip. A real pipeline would call `cycle()` from a
//! periodic tick matched to its duplicate-arrival latency.

use stream_deduper_rs::{ClassicBloomConfigBuilder, Deduper};

struct Message {
    id: String,
    body: String,
}

fn key(msg: &Message) -> &[u8] {
    msg.id.as_bytes()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let factory = ClassicBloomConfigBuilder::default()
        .capacity(100_000)
        .false_positive_rate(0.01)
        .build()?
        .into_factory()?;

    // three layers: a key stays detectable for up to three rotations
    let deduper = Deduper::new(3, factory)?;

    // an at-least-once transport redelivers msg-1
    let stream = vec![
        Message { id: "msg-1".into(), body: "first".into() },
        Message { id: "msg-2".into(), body: "second".into() },
        Message { id: "msg-1".into(), body: "first (redelivered)".into() },
        Message { id: "msg-3".into(), body: "third".into() },
    ];

    for msg in &stream {
        if deduper.try_insert(key(msg)) {
            println!("processing: {} ({})", msg.id, msg.body);
        } else {
            println!("skipping duplicate: {}", msg.id);
        }
    }

    // rotate the window three times; msg-1 ages out and is new again
    for _ in 0..deduper.num_layers() {
        deduper.cycle();
    }
    let late = Message { id: "msg-1".into(), body: "first (late)".into() };
    println!(
        "after {} rotations, msg-1 is {}",
        deduper.num_layers(),
        if deduper.try_insert(key(&late)) { "new again" } else { "still known" }
    );

    Ok(())
}
