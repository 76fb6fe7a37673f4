use {
    base::{Stop, Vec2},
    com::Message,
    futures_util::{
        StreamExt,
        stream::{iter, pending},
    },
    hand::Verdict,
    image::{Frame, FrameCodec, PayloadEncoding},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::Duration,
    },
    stream::{
        FrameSink, SINK_POLL_PERIOD, StreamConfig, StreamError, SubscribeExit, Subscriber,
        decode_frame, parse_status,
    },
    tokio::time::{sleep, timeout},
};

/// Keeps every shown frame; raises `stop` once `stop_after` have arrived.
struct CollectSink {
    frames: Vec<Frame>,
    stop_after: usize,
    stop: Stop,
    exit_after: Option<usize>,
}

impl CollectSink {
    fn stopping(stop: &Stop, stop_after: usize) -> Self {
        Self {
            frames: Vec::new(),
            stop_after,
            stop: stop.clone(),
            exit_after: None,
        }
    }
}

impl FrameSink for CollectSink {
    fn show(&mut self, frame: &Frame) -> Result<(), StreamError> {
        self.frames.push(frame.clone());
        if self.frames.len() == self.stop_after {
            self.stop.raise();
        }
        Ok(())
    }

    fn exit_requested(&self) -> bool {
        self.exit_after
            .is_some_and(|limit| self.frames.len() >= limit)
    }
}

fn message(topic: &str, payload: &[u8]) -> Message {
    Message {
        topic: topic.to_string(),
        payload: payload.to_vec(),
    }
}

fn encoded(color: [u8; 3]) -> Vec<u8> {
    FrameCodec::default()
        .encode(&Frame::filled(Vec2::new(32, 24), color))
        .unwrap()
}

#[test]
fn test_decode_frame_round_trip() {
    let codec = FrameCodec::default();
    let frame = decode_frame(&codec, &encoded([200, 30, 30])).unwrap();
    assert_eq!(frame.size(), Vec2::new(32, 24));
    assert!(decode_frame(&codec, b"not an image").is_err());
}

#[test]
fn test_parse_status() {
    assert_eq!(parse_status(b"OPEN"), Some(Verdict::Open));
    assert_eq!(parse_status(b"CLOSED\n"), Some(Verdict::Closed));
    assert_eq!(parse_status(b"UNKNOWN"), None);
    assert_eq!(parse_status(b"open"), None);
    assert_eq!(parse_status(b""), None);
}

#[tokio::test]
async fn test_corrupt_frame_is_skipped() {
    let stop = Stop::new();
    let mut subscriber = Subscriber::new(&StreamConfig::default())
        .with_sink(CollectSink::stopping(&stop, 2))
        .with_stop(stop);

    let mut truncated = encoded([0, 0, 0]);
    truncated.truncate(truncated.len() / 2);
    let mut messages = iter(vec![
        message("webcam/stream", &encoded([220, 20, 20])),
        message("webcam/stream", &truncated),
        message("webcam/stream", &encoded([20, 20, 220])),
    ])
    .chain(pending());

    let report = subscriber.run(&mut messages).await;
    assert_eq!(report.frames_shown, 2);
    assert_eq!(report.frames_dropped, 1);
    assert_eq!(report.exit, SubscribeExit::Stopped);

    let frames = &subscriber.sink().frames;
    assert!(frames[0].pixel(5, 5).unwrap()[0] > 180);
    assert!(frames[1].pixel(5, 5).unwrap()[2] > 180);
}

#[tokio::test]
async fn test_stream_end_ends_run() {
    let stop = Stop::new();
    let mut subscriber = Subscriber::new(&StreamConfig::default())
        .with_sink(CollectSink::stopping(&stop, usize::MAX));
    let mut messages = iter(vec![message("webcam/stream", &encoded([9, 9, 9]))]);

    let report = subscriber.run(&mut messages).await;
    assert_eq!(report.frames_shown, 1);
    assert_eq!(report.exit, SubscribeExit::StreamEnded);
}

#[tokio::test]
async fn test_status_topic_and_foreign_topics() {
    let stop = Stop::new();
    let mut subscriber = Subscriber::new(&StreamConfig::default())
        .with_status_topic("webcam/hand_status")
        .with_sink(CollectSink::stopping(&stop, usize::MAX));
    let mut messages = iter(vec![
        message("webcam/hand_status", b"OPEN"),
        message("webcam/other", &encoded([1, 2, 3])),
        message("webcam/hand_status", b"maybe"),
        message("webcam/hand_status", b"CLOSED"),
    ]);

    let report = subscriber.run(&mut messages).await;
    assert_eq!(report.statuses, 2);
    assert_eq!(report.frames_shown, 0);
    assert_eq!(report.frames_dropped, 0);
    assert_eq!(subscriber.last_status(), Some(Verdict::Closed));
}

#[tokio::test]
async fn test_status_ignored_without_status_topic() {
    let mut subscriber = Subscriber::new(&StreamConfig::default());
    let mut messages = iter(vec![message("webcam/hand_status", b"OPEN")]);

    let report = subscriber.run(&mut messages).await;
    assert_eq!(report.statuses, 0);
    assert_eq!(subscriber.last_status(), None);
}

#[tokio::test]
async fn test_sink_exit_request_ends_run() {
    let stop = Stop::new();
    let mut sink = CollectSink::stopping(&stop, usize::MAX);
    sink.exit_after = Some(1);
    let mut subscriber = Subscriber::new(&StreamConfig::default()).with_sink(sink);
    let mut messages = iter(vec![
        message("webcam/stream", &encoded([5, 5, 5])),
        message("webcam/stream", &encoded([6, 6, 6])),
    ])
    .chain(pending());

    let report = subscriber.run(&mut messages).await;
    assert_eq!(report.frames_shown, 1);
    assert_eq!(report.exit, SubscribeExit::SinkClosed);
}

#[tokio::test]
async fn test_binary_payloads() {
    let codec = FrameCodec::default().with_encoding(PayloadEncoding::Binary);
    let payload = codec
        .encode(&Frame::filled(Vec2::new(16, 16), [0, 200, 0]))
        .unwrap();
    let config = StreamConfig::default().with_payload_encoding(PayloadEncoding::Binary);
    let mut subscriber = Subscriber::new(&config);
    let mut messages = iter(vec![message("webcam/stream", &payload)]);

    let report = subscriber.run(&mut messages).await;
    assert_eq!(report.frames_shown, 1);
    assert_eq!(report.frames_dropped, 0);
}

/// A viewer that is closed from outside while no frames are arriving.
struct IdleSink {
    closed: Arc<AtomicBool>,
    polls: Arc<AtomicUsize>,
}

impl FrameSink for IdleSink {
    fn show(&mut self, _frame: &Frame) -> Result<(), StreamError> {
        Ok(())
    }

    fn exit_requested(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn poll(&mut self) {
        self.polls.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_sink_exit_noticed_on_idle_stream() {
    let closed = Arc::new(AtomicBool::new(false));
    let polls = Arc::new(AtomicUsize::new(0));
    let mut subscriber = Subscriber::new(&StreamConfig::default()).with_sink(IdleSink {
        closed: closed.clone(),
        polls: polls.clone(),
    });

    tokio::spawn({
        let closed = closed.clone();
        async move {
            sleep(SINK_POLL_PERIOD * 2).await;
            closed.store(true, Ordering::SeqCst);
        }
    });

    let mut messages = pending::<Message>();
    let report = timeout(Duration::from_secs(2), subscriber.run(&mut messages))
        .await
        .expect("idle subscriber should notice the closed sink");
    assert_eq!(report.exit, SubscribeExit::SinkClosed);
    assert_eq!(report.frames_shown, 0);
    assert!(polls.load(Ordering::SeqCst) >= 1);
}
