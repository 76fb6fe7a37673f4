use {
    crate::{FrameSink, NullSink, StreamConfig},
    base::{Stop, log},
    com::Message,
    futures_util::stream::{Stream, StreamExt},
    hand::Verdict,
    image::{Frame, FrameCodec, ImageError},
    std::time::Duration,
    tokio::time::{MissedTickBehavior, interval},
};

/// How often an idle subscriber services its sink and rechecks for exit.
pub const SINK_POLL_PERIOD: Duration = Duration::from_millis(50);

/// Decode one video-topic payload.
pub fn decode_frame(codec: &FrameCodec, payload: &[u8]) -> Result<Frame, ImageError> {
    codec.decode(payload)
}

/// Decode one status-topic payload; anything but OPEN or CLOSED is `None`.
pub fn parse_status(payload: &[u8]) -> Option<Verdict> {
    Verdict::from_payload(payload)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeExit {
    Stopped,
    SinkClosed,
    /// The message stream ended, usually because the broker went away.
    StreamEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscribeReport {
    pub frames_shown: u64,
    pub frames_dropped: u64,
    pub statuses: u64,
    pub exit: SubscribeExit,
}

/// Receives published frames, decodes them and hands them to a sink.
///
/// A payload that fails to decode is logged and skipped; the stream keeps
/// going with the next message.
pub struct Subscriber<S = NullSink> {
    codec: FrameCodec,
    video_topic: String,
    status_topic: Option<String>,
    sink: S,
    stop: Stop,
    last_status: Option<Verdict>,
}

impl Subscriber<NullSink> {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            codec: config.codec(),
            video_topic: config.video_topic().to_string(),
            status_topic: None,
            sink: NullSink,
            stop: Stop::new(),
            last_status: None,
        }
    }
}

impl<S> Subscriber<S> {
    pub fn with_sink<S2>(self, sink: S2) -> Subscriber<S2> {
        Subscriber {
            codec: self.codec,
            video_topic: self.video_topic,
            status_topic: self.status_topic,
            sink,
            stop: self.stop,
            last_status: self.last_status,
        }
    }

    pub fn with_stop(mut self, stop: Stop) -> Self {
        self.stop = stop;
        self
    }

    /// Also log verdicts received on `topic`.
    pub fn with_status_topic(mut self, topic: impl Into<String>) -> Self {
        self.status_topic = Some(topic.into());
        self
    }

    pub fn video_topic(&self) -> &str {
        &self.video_topic
    }

    pub fn status_topic(&self) -> Option<&str> {
        self.status_topic.as_deref()
    }

    /// Most recent verdict seen on the status topic.
    pub fn last_status(&self) -> Option<Verdict> {
        self.last_status
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: FrameSink> Subscriber<S> {
    /// Consume `messages` until the stop signal, the sink quits, or the
    /// stream ends. While no messages arrive the sink is polled every
    /// `SINK_POLL_PERIOD`, so an exit request is noticed on an idle stream.
    pub async fn run<M>(&mut self, messages: &mut M) -> SubscribeReport
    where
        M: Stream<Item = Message> + Unpin,
    {
        let mut report = SubscribeReport {
            frames_shown: 0,
            frames_dropped: 0,
            statuses: 0,
            exit: SubscribeExit::StreamEnded,
        };

        let mut sink_poll = interval(SINK_POLL_PERIOD);
        sink_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        report.exit = loop {
            if self.stop.is_raised() {
                break SubscribeExit::Stopped;
            }
            if self.sink.exit_requested() {
                break SubscribeExit::SinkClosed;
            }

            let message = tokio::select! {
                biased;
                _ = self.stop.raised() => break SubscribeExit::Stopped,
                message = messages.next() => match message {
                    Some(message) => message,
                    None => break SubscribeExit::StreamEnded,
                },
                _ = sink_poll.tick() => {
                    self.sink.poll();
                    continue;
                }
            };

            if message.topic == self.video_topic {
                match decode_frame(&self.codec, &message.payload) {
                    Ok(frame) => {
                        if let Err(e) = self.sink.show(&frame) {
                            log::warn!("subscriber: display failed: {}", e);
                        }
                        report.frames_shown += 1;
                    }
                    Err(e) => {
                        log::warn!(
                            "subscriber: dropping undecodable frame ({} bytes): {}",
                            message.payload.len(),
                            e
                        );
                        report.frames_dropped += 1;
                    }
                }
            } else if self.status_topic.as_deref() == Some(message.topic.as_str()) {
                match parse_status(&message.payload) {
                    Some(verdict) => {
                        if self.last_status != Some(verdict) {
                            log::info!("subscriber: hand status {}", verdict);
                        }
                        self.last_status = Some(verdict);
                        report.statuses += 1;
                    }
                    None => log::warn!("subscriber: unrecognized status payload"),
                }
            } else {
                log::debug!("subscriber: ignoring message on {}", message.topic);
            }
        };

        log::info!(
            "subscriber: {:?} after {} frames ({} dropped)",
            report.exit,
            report.frames_shown,
            report.frames_dropped
        );
        report
    }
}
