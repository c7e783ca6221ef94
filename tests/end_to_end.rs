//! Integration tests: frames in through the ingest path, depth out through
//! pointer queries.

use std::sync::Arc;

use depthview::{
    ColorPassthrough, DepthFrame, DepthIngest, DepthQueryService, DisplayGeometry,
    FrameSnapshotStore, FrameSource, Normalizer, PixelFormat, SensorFrame, SyntheticSource,
};

fn pipeline() -> (DepthIngest, DepthQueryService) {
    let store = Arc::new(FrameSnapshotStore::new());
    let ingest = DepthIngest::new(Arc::clone(&store), Normalizer::default());
    let query = DepthQueryService::new(store);
    (ingest, query)
}

#[test]
fn test_query_after_publish() {
    let (ingest, query) = pipeline();
    // distances 1..=8 mm in a 4x2 frame
    let samples: Vec<u16> = vec![
        0x0008, 0x0010, 0x0018, 0x0020, 0x0028, 0x0030, 0x0038, 0x0040,
    ];
    ingest.ingest(DepthFrame::new(1, 4, 2, samples)).unwrap();

    let reading = query
        .query_depth_at(2.0, 1.0, &DisplayGeometry::identity(4, 2))
        .unwrap();
    assert_eq!((reading.x, reading.y), (2, 1));
    assert_eq!(reading.distance_mm, 7);
}

#[test]
fn test_no_depth_before_first_frame() {
    let (_ingest, query) = pipeline();
    assert!(query
        .query_depth_at(0.0, 0.0, &DisplayGeometry::identity(640, 480))
        .is_none());
}

#[test]
fn test_malformed_frame_keeps_serving_previous() {
    let (ingest, query) = pipeline();
    let geom = DisplayGeometry::identity(2, 2);
    ingest
        .ingest(DepthFrame::new(1, 2, 2, vec![100u16 << 3; 4]))
        .unwrap();

    assert!(ingest
        .ingest(DepthFrame::new(2, 2, 2, vec![200u16 << 3; 3]))
        .is_err());

    let reading = query.query_depth_at(1.0, 1.0, &geom).unwrap();
    assert_eq!(reading.distance_mm, 100);
}

#[test]
fn test_synthetic_sensor_session() {
    let (ingest, query) = pipeline();
    let (color, color_rx) = ColorPassthrough::channel(8);
    let mut source = SyntheticSource::new(64, 48, PixelFormat::Bgr32).with_limit(3);

    while let Some(frame) = source.next_frame().unwrap() {
        match frame {
            SensorFrame::Depth(frame) => {
                ingest.ingest(frame).unwrap();
            }
            SensorFrame::Color(frame) => color.forward(frame).unwrap(),
        }
    }

    assert_eq!(color_rx.try_iter().count(), 3);

    let snap = ingest.store().current().unwrap();
    assert_eq!(snap.generation(), 3);
    assert_eq!(snap.normalized().len(), 64 * 48);

    // surface drawn at twice the image size
    let geom = DisplayGeometry::new(64, 48, 128.0, 96.0);
    let reading = query.query_depth_at(21.0, 41.0, &geom).unwrap();
    assert_eq!((reading.x, reading.y), (10, 20));
    assert_eq!(reading.distance_mm, SyntheticSource::distance_at(10, 20, 3));
}
