use {
    base::Vec2,
    std::path::PathBuf,
    video::{Capture, ReplayConfig, VideoError, VideoIn, VideoInConfig},
};

fn replay_dir(name: &str, colors: &[[u8; 3]]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("handcast-replay-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    // written out of order to check sorting
    for (i, color) in colors.iter().enumerate().rev() {
        let img = crates_image::RgbImage::from_pixel(8, 6, crates_image::Rgb(*color));
        img.save(dir.join(format!("{:02}.png", i))).unwrap();
    }
    std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();
    dir
}

const COLORS: [[u8; 3]; 3] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

#[tokio::test]
async fn test_replay_plays_in_name_order_then_ends() {
    let dir = replay_dir("order", &COLORS);
    let mut videoin = VideoIn::open(VideoInConfig::Replay(ReplayConfig::new(&dir)))
        .await
        .unwrap();
    assert_eq!(videoin.size(), Vec2::new(8, 6));

    for color in COLORS {
        let frame = videoin.next_frame().await.unwrap().expect("frame");
        assert_eq!(frame.pixel(0, 0), Some(color));
    }
    assert!(videoin.next_frame().await.unwrap().is_none());
    assert!(videoin.next_frame().await.unwrap().is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_replay_looping() {
    let dir = replay_dir("loop", &COLORS[..2]);
    let config = ReplayConfig::new(&dir).with_looping(true);
    let mut videoin = VideoIn::open(VideoInConfig::Replay(config)).await.unwrap();

    let mut seen = Vec::new();
    for _ in 0..5 {
        let frame = videoin.next_frame().await.unwrap().expect("frame");
        seen.push(frame.pixel(0, 0).unwrap());
    }
    assert_eq!(
        seen,
        vec![COLORS[0], COLORS[1], COLORS[0], COLORS[1], COLORS[0]]
    );
    videoin.close();

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_close_ends_stream() {
    let dir = replay_dir("close", &COLORS);
    let config = ReplayConfig::new(&dir).with_looping(true);
    let mut videoin = VideoIn::open(VideoInConfig::Replay(config)).await.unwrap();

    assert!(videoin.next_frame().await.unwrap().is_some());
    videoin.close();
    assert!(videoin.next_frame().await.unwrap().is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_open_missing_dir_fails() {
    let dir = std::env::temp_dir().join("handcast-replay-does-not-exist");
    let result = VideoIn::open(VideoInConfig::Replay(ReplayConfig::new(dir))).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_open_empty_dir_fails() {
    let dir = replay_dir("empty", &[]);
    let result = VideoIn::open(VideoInConfig::Replay(ReplayConfig::new(&dir))).await;
    assert!(matches!(result, Err(VideoError::Device(_))));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_replay_pacing() {
    let dir = replay_dir("pace", &COLORS);
    let config = ReplayConfig::new(&dir).with_frame_rate(50.0);
    let mut videoin = VideoIn::open(VideoInConfig::Replay(config)).await.unwrap();
    assert_eq!(videoin.frame_rate(), Some(50.0));

    let start = std::time::Instant::now();
    while videoin.next_frame().await.unwrap().is_some() {}
    // three frames at 20 ms spacing need at least two periods
    assert!(start.elapsed() >= std::time::Duration::from_millis(30));

    std::fs::remove_dir_all(&dir).ok();
}
