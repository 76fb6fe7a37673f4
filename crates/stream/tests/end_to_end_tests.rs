use {
    base::{Stop, Vec2},
    com::{Broker, ComError},
    hand::{FINGERS, HandError, HandTracker, LANDMARK_COUNT, Landmark, LandmarkSet, Verdict},
    image::Frame,
    std::time::Duration,
    stream::{
        FrameSink, PublishExit, Publisher, StreamConfig, StreamError, SubscribeExit, Subscriber,
    },
    tokio::time::{sleep, timeout},
    video::{Capture, VideoError},
};

const FRAMES: usize = 5;

struct Frames(usize);

impl Capture for Frames {
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        if self.0 == 0 {
            return Ok(None);
        }
        self.0 -= 1;
        Ok(Some(Frame::filled(Vec2::new(80, 60), [120, 110, 100])))
    }

    fn close(&mut self) {
        self.0 = 0;
    }
}

struct OpenHand;

impl HandTracker for OpenHand {
    fn infer(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, HandError> {
        let mut points = [Landmark::new(0.5, 0.8, 0.0); LANDMARK_COUNT];
        for (tip, pip) in FINGERS {
            points[pip.index()].y = 0.6;
            points[tip.index()].y = 0.4;
        }
        Ok(vec![LandmarkSet::new(points)])
    }
}

struct Counter {
    shown: usize,
    stop: Stop,
}

impl FrameSink for Counter {
    fn show(&mut self, frame: &Frame) -> Result<(), StreamError> {
        assert_eq!(frame.size(), Vec2::new(40, 30));
        self.shown += 1;
        if self.shown == FRAMES {
            self.stop.raise();
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_frames_and_status_cross_the_broker() {
    let broker = Broker::bind("127.0.0.1:0").await.expect("bind failed");
    let config = StreamConfig::default()
        .with_broker_port(broker.local_addr().port())
        .with_keepalive(Duration::ZERO)
        .with_frame_size(Vec2::new(40, 30))
        .with_target_frame_rate(200.0);
    config.validate().unwrap();

    let mut viewer = config.clone().with_client_id("viewer").connect().await.unwrap();
    viewer.subscribe(config.video_topic()).await.unwrap();
    viewer.subscribe(config.status_topic()).await.unwrap();
    timeout(Duration::from_secs(5), async {
        while broker.subscriber_count(config.status_topic()).await != 1 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscription never registered");

    let camera = config.clone().with_client_id("camera").connect().await.unwrap();
    let report = Publisher::new(Frames(FRAMES), OpenHand, camera, config.clone())
        .run()
        .await
        .unwrap();
    assert_eq!(report.frames_published, FRAMES as u64);
    assert_eq!(report.statuses_published, FRAMES as u64);
    assert_eq!(report.exit, PublishExit::Exhausted);

    let stop = Stop::new();
    let mut subscriber = Subscriber::new(&config)
        .with_status_topic(config.status_topic())
        .with_sink(Counter {
            shown: 0,
            stop: stop.clone(),
        })
        .with_stop(stop);
    let report = timeout(Duration::from_secs(10), subscriber.run(&mut viewer))
        .await
        .expect("frames never arrived");
    assert_eq!(report.frames_shown, FRAMES as u64);
    assert_eq!(report.frames_dropped, 0);
    assert_eq!(report.exit, SubscribeExit::Stopped);
    assert_eq!(subscriber.last_status(), Some(Verdict::Open));

    viewer.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_subscriber_sees_stream_end_when_broker_goes_away() {
    let broker = Broker::bind("127.0.0.1:0").await.expect("bind failed");
    let config = StreamConfig::default()
        .with_broker_port(broker.local_addr().port())
        .with_keepalive(Duration::ZERO)
        .with_client_id("viewer");
    let mut viewer = config.connect().await.unwrap();
    viewer.subscribe(config.video_topic()).await.unwrap();
    timeout(Duration::from_secs(5), async {
        while broker.subscriber_count(config.video_topic()).await != 1 {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscription never registered");
    drop(broker);

    let mut subscriber = Subscriber::new(&config);
    let report = timeout(Duration::from_secs(5), subscriber.run(&mut viewer))
        .await
        .expect("stream never ended");
    assert_eq!(report.exit, SubscribeExit::StreamEnded);
}

#[tokio::test]
async fn test_connect_without_broker_fails() {
    // bind then drop to get a port with no listener
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = StreamConfig::default().with_broker_port(port);
    match config.connect().await {
        Err(StreamError::Transport(ComError::Io(_))) => {}
        other => panic!("expected a connection error, got {:?}", other.map(|_| ())),
    }
}
