//! End-to-end pipeline test against in-memory collaborators: a blob write
//! notification fans out through the topic to three worker queues, and each
//! worker produces its artifacts independently.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};

use pixelfan_messaging::{MemoryQueue, MemoryTopic, TopicPublisher};
use pixelfan_processing::CodecRegistry;
use pixelfan_storage::{MemoryBlobStore, MemoryMetadataStore};
use pixelfan_worker::{
    ConverterWorker, MessageHandler, MetadataWorker, QueueRunner, ResizerWorker, UploadNotifier,
};

fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([12, 34, 56, 255]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn notification(bucket: &str, key: &str) -> String {
    format!(
        r#"{{"Records":[{{"eventName":"ObjectCreated:Put","s3":{{"bucket":{{"name":"{bucket}"}},"object":{{"key":"{key}"}}}}}}]}}"#
    )
}

struct Pipeline {
    blobs: MemoryBlobStore,
    records: MemoryMetadataStore,
    notifier: UploadNotifier,
    metadata_queue: MemoryQueue,
    converter_queue: MemoryQueue,
    resizer_queue: MemoryQueue,
    metadata_runner: QueueRunner,
    converter_runner: QueueRunner,
    resizer_runner: QueueRunner,
}

impl Pipeline {
    async fn new() -> Self {
        let blobs = MemoryBlobStore::new();
        let records = MemoryMetadataStore::new();
        let codecs = Arc::new(CodecRegistry::with_defaults());

        let topic = MemoryTopic::new();
        let metadata_queue = topic.subscribe().await;
        let converter_queue = topic.subscribe().await;
        let resizer_queue = topic.subscribe().await;

        let notifier = UploadNotifier::new(Arc::new(topic));
        let idle = Duration::from_millis(1);

        let metadata_runner = QueueRunner::new(
            Arc::new(MetadataWorker::new(
                Arc::new(blobs.clone()),
                Arc::new(records.clone()),
            )),
            Arc::new(metadata_queue.clone()),
            None,
            idle,
        );
        let converter_runner = QueueRunner::new(
            Arc::new(ConverterWorker::new(Arc::new(blobs.clone()), codecs.clone())),
            Arc::new(converter_queue.clone()),
            None,
            idle,
        );
        let resizer_runner = QueueRunner::new(
            Arc::new(ResizerWorker::new(Arc::new(blobs.clone()), codecs)),
            Arc::new(resizer_queue.clone()),
            None,
            idle,
        );

        Pipeline {
            blobs,
            records,
            notifier,
            metadata_queue,
            converter_queue,
            resizer_queue,
            metadata_runner,
            converter_runner,
            resizer_runner,
        }
    }

    async fn drain_all(&self) {
        self.metadata_runner.poll_once().await;
        self.converter_runner.poll_once().await;
        self.resizer_runner.poll_once().await;
    }
}

#[tokio::test]
async fn test_fanout_reaches_every_queue() {
    let pipeline = Pipeline::new().await;
    pipeline
        .notifier
        .handle(&notification("uploads", "photos/aaa.png"))
        .await
        .unwrap();

    assert_eq!(pipeline.metadata_queue.pending_count().await, 1);
    assert_eq!(pipeline.converter_queue.pending_count().await, 1);
    assert_eq!(pipeline.resizer_queue.pending_count().await, 1);
}

#[tokio::test]
async fn test_full_pipeline_produces_all_artifacts() {
    let pipeline = Pipeline::new().await;
    let source = encode_png(2000, 1000);
    pipeline
        .blobs
        .insert_object(
            "uploads",
            "photos/aaa.png",
            Some("image/png"),
            Bytes::from(source.clone()),
        )
        .await;

    pipeline
        .notifier
        .handle(&notification("uploads", "photos/aaa.png"))
        .await
        .unwrap();
    pipeline.drain_all().await;

    // Metadata record keyed by the derived name.
    let record = pipeline.records.record("aaa").await.unwrap();
    assert_eq!(record.bucket, "uploads");
    assert_eq!(record.metadata.width, 2000);
    assert_eq!(record.metadata.height, 1000);
    assert_eq!(record.metadata.format, "png");
    assert_eq!(record.metadata.file_size, source.len() as u64);
    assert_eq!(record.metadata.file_name, "aaa.png");

    // Converted artifact decodable as JPEG at full size.
    let converted = pipeline
        .blobs
        .object("uploads", "converted/aaa.jpg")
        .await
        .unwrap();
    let decoded = image::load_from_memory_with_format(&converted, ImageFormat::Jpeg).unwrap();
    assert_eq!(decoded.dimensions(), (2000, 1000));

    // All three resized artifacts, aspect preserved.
    for (size_name, expected) in [
        ("thumbnail", (100, 50)),
        ("medium", (500, 250)),
        ("large", (1000, 500)),
    ] {
        let artifact = pipeline
            .blobs
            .object("uploads", &format!("resized/aaa/{size_name}.jpg"))
            .await
            .unwrap();
        let decoded = image::load_from_memory_with_format(&artifact, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), expected, "size {size_name}");
    }

    // Every queue fully settled.
    for queue in [
        &pipeline.metadata_queue,
        &pipeline.converter_queue,
        &pipeline.resizer_queue,
    ] {
        assert_eq!(queue.pending_count().await, 0);
        assert_eq!(queue.in_flight_count().await, 0);
    }
}

#[tokio::test]
async fn test_redelivery_is_idempotent() {
    let pipeline = Pipeline::new().await;
    pipeline
        .blobs
        .insert_object(
            "uploads",
            "photos/aaa.png",
            Some("image/png"),
            Bytes::from(encode_png(640, 480)),
        )
        .await;

    // Duplicate notification, as an at-least-once delivery may produce.
    let body = notification("uploads", "photos/aaa.png");
    pipeline.notifier.handle(&body).await.unwrap();
    pipeline.drain_all().await;

    let first_converted = pipeline
        .blobs
        .object("uploads", "converted/aaa.jpg")
        .await
        .unwrap();
    let first_count = pipeline.blobs.object_count().await;

    pipeline.notifier.handle(&body).await.unwrap();
    pipeline.drain_all().await;

    let second_converted = pipeline
        .blobs
        .object("uploads", "converted/aaa.jpg")
        .await
        .unwrap();

    // Same keys, same bytes, nothing accumulated.
    assert_eq!(first_converted, second_converted);
    assert_eq!(pipeline.blobs.object_count().await, first_count);
    assert_eq!(pipeline.records.record_count().await, 1);
}

#[tokio::test]
async fn test_workers_are_independent_on_failure() {
    let pipeline = Pipeline::new().await;
    // Source exists but is not an image: metadata/converter/resizer all fail,
    // yet each fails on its own queue with nothing written anywhere.
    pipeline
        .blobs
        .insert_object("uploads", "bad.bin", None, Bytes::from_static(b"not an image"))
        .await;

    pipeline
        .notifier
        .handle(&notification("uploads", "bad.bin"))
        .await
        .unwrap();
    pipeline.drain_all().await;

    assert_eq!(pipeline.records.record_count().await, 0);
    assert_eq!(
        pipeline.blobs.keys_in("uploads").await,
        vec!["bad.bin".to_string()]
    );

    // Terminal failures with no dead-letter sink stay unacked.
    for queue in [
        &pipeline.metadata_queue,
        &pipeline.converter_queue,
        &pipeline.resizer_queue,
    ] {
        assert_eq!(queue.in_flight_count().await, 1);
    }
}

#[tokio::test]
async fn test_publish_failure_fails_whole_notification() {
    struct BrokenTopic;

    #[async_trait::async_trait]
    impl TopicPublisher for BrokenTopic {
        async fn publish(&self, _payload: &str) -> pixelfan_messaging::QueueResult<()> {
            Err(pixelfan_messaging::QueueError::PublishFailed(
                "topic unavailable".to_string(),
            ))
        }
    }

    let notifier = UploadNotifier::new(Arc::new(BrokenTopic));
    let err = notifier
        .handle(&notification("uploads", "aaa.png"))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
