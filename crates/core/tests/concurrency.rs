use protoscope_api::{
    DescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto, FileDescriptorSet,
};
use protoscope_core::Context;
use std::sync::atomic::{AtomicBool, Ordering};

const BATCHES: usize = 50;
const READERS: usize = 4;

/// Two messages per batch, the second referring to the first.
fn batch(i: usize) -> FileDescriptorSet {
    let package = format!("p{i}");
    FileDescriptorSet::new(vec![
        FileDescriptorProto::new(format!("{package}.proto"), package.as_str())
            .with_message(DescriptorProto::new("A"))
            .with_message(DescriptorProto::new("B").with_field(FieldDescriptorProto::named(
                "a",
                1,
                Some(FieldType::Message),
                "A",
            ))),
    ])
}

#[test]
fn test_readers_never_see_partial_batches() {
    let ctx = Context::new();
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        for _ in 0..READERS {
            let ctx = ctx.clone();
            let done = &done;
            s.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    let mut count = 0;
                    ctx.enumerate(|_, _| count += 1);
                    assert_eq!(count % 2, 0, "observed half a batch");

                    for i in 0..BATCHES {
                        let b = ctx.resolve(&format!("p{i}.B"), "B");
                        let a = ctx.lookup(&format!("p{i}.A"));
                        // A is read after B, so it must be visible too.
                        if b.is_some() {
                            assert!(a.is_some());
                        }
                    }
                }
            });
        }

        let writer = ctx.clone();
        let done = &done;
        s.spawn(move || {
            for i in 0..BATCHES {
                writer.add_definitions(&batch(i)).unwrap();
            }
            done.store(true, Ordering::Release);
        });
    });

    assert_eq!(ctx.len(), BATCHES * 2);
    assert_eq!(ctx.ref_count(), 1);
}

#[test]
fn test_concurrent_writers_cannot_both_define_a_name() {
    let ctx = Context::new();
    let successes: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                s.spawn(move || ctx.add_definitions(&batch(0)).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum()
    });

    assert_eq!(successes, 1);
    assert_eq!(ctx.len(), 2);
}
