use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        canvas: Canvas {
            width: 2,
            height: 2,
        },
        fps: 30,
        bitrate: 5_000_000,
    }
}

#[test]
fn clip_duration_follows_frames() {
    let clip = EncodedClip {
        mime_type: RAW_RGBA_MIME.into(),
        data: Vec::new(),
        frame_count: 150,
        fps: 30,
    };
    assert_eq!(clip.duration(), Duration::from_millis(5000));
}

#[test]
fn in_memory_sink_collects_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = Surface::new(cfg().canvas).unwrap();
    sink.push_frame(0, &frame).unwrap();
    sink.push_frame(1, &frame).unwrap();
    assert!(sink.push_frame(1, &frame).is_err());
    assert_eq!(sink.config(), Some(cfg()));

    let clip = sink.finish().unwrap();
    assert_eq!(clip.frame_count, 2);
    assert_eq!(clip.data.len(), 2 * 16);
    assert!(sink.finish().is_err());
}

#[test]
fn in_memory_sink_rejects_wrong_size_and_unstarted() {
    let mut sink = InMemorySink::new();
    let frame = Surface::new(cfg().canvas).unwrap();
    assert!(sink.push_frame(0, &frame).is_err());
    sink.begin(cfg()).unwrap();
    let big = Surface::new(Canvas {
        width: 3,
        height: 2,
    })
    .unwrap();
    assert!(sink.push_frame(0, &big).is_err());
    sink.abort();
    assert!(sink.frames().is_empty());
}
