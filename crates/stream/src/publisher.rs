use {
    crate::{Cadence, FrameSink, NullSink, StreamConfig, StreamError},
    base::{Stop, log},
    com::Transport,
    hand::{HandTracker, Verdict, overlay},
    image::{Frame, FrameCodec},
    video::Capture,
};

/// Why the publish loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishExit {
    /// The capture source ran out of frames.
    Exhausted,
    /// The capture device failed mid-stream.
    CaptureFailed,
    /// The stop signal was raised.
    Stopped,
    /// The preview sink asked to quit.
    SinkClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub cycles: u64,
    pub frames_published: u64,
    pub statuses_published: u64,
    pub exit: PublishExit,
}

/// What a single cycle sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cycle {
    frame_published: bool,
    status_published: bool,
    verdict: Verdict,
}

/// Capture → annotate → classify → encode → publish, at a bounded rate.
///
/// The publisher owns its capture device, tracker and transport and
/// releases all three, in that order, whenever `run` returns.
pub struct Publisher<C, T, B, S = NullSink> {
    capture: C,
    tracker: T,
    transport: B,
    sink: S,
    config: StreamConfig,
    codec: FrameCodec,
    stop: Stop,
}

impl<C, T, B> Publisher<C, T, B, NullSink> {
    pub fn new(capture: C, tracker: T, transport: B, config: StreamConfig) -> Self {
        let codec = config.codec();
        Self {
            capture,
            tracker,
            transport,
            sink: NullSink,
            config,
            codec,
            stop: Stop::new(),
        }
    }
}

impl<C, T, B, S> Publisher<C, T, B, S> {
    /// Show every annotated frame on `sink`.
    pub fn with_sink<S2>(self, sink: S2) -> Publisher<C, T, B, S2> {
        Publisher {
            capture: self.capture,
            tracker: self.tracker,
            transport: self.transport,
            sink,
            config: self.config,
            codec: self.codec,
            stop: self.stop,
        }
    }

    pub fn with_stop(mut self, stop: Stop) -> Self {
        self.stop = stop;
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}

impl<C: Capture, T: HandTracker, B: Transport, S: FrameSink> Publisher<C, T, B, S> {
    /// Run until the capture ends, the stop signal is raised, the sink asks
    /// to quit, or publishing fails.
    pub async fn run(mut self) -> Result<PublishReport, StreamError> {
        let result = self.run_loop().await;
        self.release().await;
        result
    }

    async fn run_loop(&mut self) -> Result<PublishReport, StreamError> {
        let mut cadence = Cadence::new(self.config.frame_period());
        let mut report = PublishReport {
            cycles: 0,
            frames_published: 0,
            statuses_published: 0,
            exit: PublishExit::Stopped,
        };
        let mut last_verdict = Verdict::Unknown;

        log::info!(
            "publisher: {} fps, {} frames on {}, status on {}",
            self.config.target_frame_rate(),
            self.config.frame_size(),
            self.config.video_topic(),
            self.config.status_topic()
        );
        if !self.config.publish_video() {
            log::info!("publisher: video publishing disabled");
        }
        if !self.config.publish_status() {
            log::info!("publisher: status publishing disabled");
        }

        report.exit = loop {
            if self.stop.is_raised() {
                break PublishExit::Stopped;
            }

            let next = tokio::select! {
                biased;
                _ = self.stop.raised() => break PublishExit::Stopped,
                next = self.capture.next_frame() => next,
            };
            let frame = match next {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("publisher: capture exhausted");
                    break PublishExit::Exhausted;
                }
                Err(e) => {
                    log::error!("publisher: capture failed: {}", e);
                    break PublishExit::CaptureFailed;
                }
            };

            report.cycles += 1;
            let cycle = self.cycle(frame).await?;
            report.frames_published += u64::from(cycle.frame_published);
            report.statuses_published += u64::from(cycle.status_published);
            if cycle.verdict != last_verdict {
                log::info!("publisher: hand status {}", cycle.verdict);
                last_verdict = cycle.verdict;
            }

            if self.sink.exit_requested() {
                log::info!("publisher: preview closed");
                break PublishExit::SinkClosed;
            }

            tokio::select! {
                biased;
                _ = self.stop.raised() => break PublishExit::Stopped,
                _ = cadence.tick() => {}
            }
        };

        log::info!(
            "publisher: {:?} after {} cycles ({} frames, {} statuses)",
            report.exit,
            report.cycles,
            report.frames_published,
            report.statuses_published
        );
        Ok(report)
    }

    async fn cycle(&mut self, frame: Frame) -> Result<Cycle, StreamError> {
        let mut frame = frame.mirrored().resized(self.config.frame_size());

        let hands = match self.tracker.infer(&frame) {
            Ok(hands) => hands,
            Err(e) => {
                log::warn!("publisher: inference failed: {}", e);
                Vec::new()
            }
        };
        let verdict = overlay::annotate(&mut frame, &hands);

        // an encode failure skips the whole cycle, status included
        let mut frame_dropped = false;
        let frame_published = if self.config.publish_video() {
            match self.codec.encode(&frame) {
                Ok(payload) => {
                    self.transport
                        .publish(self.config.video_topic(), &payload)
                        .await?;
                    true
                }
                Err(e) => {
                    log::warn!("publisher: dropping frame: {}", e);
                    frame_dropped = true;
                    false
                }
            }
        } else {
            false
        };

        let status_published = match verdict.payload() {
            Some(status) if self.config.publish_status() && !frame_dropped => {
                self.transport
                    .publish(self.config.status_topic(), status)
                    .await?;
                true
            }
            _ => false,
        };

        if let Err(e) = self.sink.show(&frame) {
            log::warn!("publisher: preview failed: {}", e);
        }

        Ok(Cycle {
            frame_published,
            status_published,
            verdict,
        })
    }

    async fn release(&mut self) {
        self.capture.close();
        self.tracker.close();
        if let Err(e) = self.transport.disconnect().await {
            log::warn!("publisher: disconnect failed: {}", e);
        }
        log::info!("publisher: released capture, tracker and transport");
    }
}
