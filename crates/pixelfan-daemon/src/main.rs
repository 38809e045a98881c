//! Pixelfan daemon
//!
//! Builds the cloud collaborators once at startup, hands them to the workers
//! as explicit dependencies, and runs one queue runner per consumer: the
//! notifier's notification queue plus the three worker queues fed by the
//! fanout topic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pixelfan_core::Config;
use pixelfan_messaging::{QueueConsumer, SnsPublisher, SqsQueue, SqsSender, TopicPublisher};
use pixelfan_processing::CodecRegistry;
use pixelfan_storage::{BlobStore, DynamoMetadataStore, MetadataStore, S3BlobStore};
use pixelfan_worker::{
    ConverterWorker, MetadataWorker, QueueRunner, ResizerWorker, UploadNotifier,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    init_telemetry();

    let config = Config::from_env()?;
    run(config).await
}

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pixelfan=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run(config: Config) -> Result<(), anyhow::Error> {
    let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let sns_client = aws_sdk_sns::Client::new(&aws);
    let sqs_client = aws_sdk_sqs::Client::new(&aws);
    let dynamo_client = aws_sdk_dynamodb::Client::new(&aws);

    let blobs: Arc<dyn BlobStore> = Arc::new(S3BlobStore::new(
        config.aws_region.clone(),
        config.s3_endpoint.clone(),
    ));
    let records: Arc<dyn MetadataStore> = Arc::new(DynamoMetadataStore::new(
        dynamo_client,
        config.metadata_table.clone(),
    ));
    let codecs = Arc::new(CodecRegistry::with_defaults());
    let topic: Arc<dyn TopicPublisher> = Arc::new(SnsPublisher::new(
        sns_client,
        config.upload_topic_arn.clone(),
    ));
    let dead_letter: Option<Arc<dyn TopicPublisher>> =
        config.dead_letter_queue_url.clone().map(|url| {
            Arc::new(SqsSender::new(sqs_client.clone(), url)) as Arc<dyn TopicPublisher>
        });

    let queue = |url: &String| -> Arc<dyn QueueConsumer> {
        Arc::new(SqsQueue::new(
            sqs_client.clone(),
            url.clone(),
            config.receive_batch_size,
            config.receive_wait_secs,
        ))
    };
    let idle = Duration::from_millis(config.poll_idle_ms);

    let runners = vec![
        QueueRunner::new(
            Arc::new(UploadNotifier::new(topic)),
            queue(&config.notification_queue_url),
            dead_letter.clone(),
            idle,
        ),
        QueueRunner::new(
            Arc::new(MetadataWorker::new(blobs.clone(), records)),
            queue(&config.metadata_queue_url),
            dead_letter.clone(),
            idle,
        ),
        QueueRunner::new(
            Arc::new(ConverterWorker::new(blobs.clone(), codecs.clone())),
            queue(&config.converter_queue_url),
            dead_letter.clone(),
            idle,
        ),
        QueueRunner::new(
            Arc::new(ResizerWorker::new(blobs, codecs)),
            queue(&config.resizer_queue_url),
            dead_letter,
            idle,
        ),
    ];

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::with_capacity(runners.len());
    for runner in runners {
        let shutdown = shutdown_rx.clone();
        tasks.push(tokio::spawn(async move { runner.run(shutdown).await }));
    }

    tracing::info!(
        region = %config.aws_region,
        topic_arn = %config.upload_topic_arn,
        table = %config.metadata_table,
        "pixelfan daemon started"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("shutdown signal received");

    shutdown_tx.send(true).ok();
    for task in tasks {
        let _ = task.await;
    }

    tracing::info!("pixelfan daemon stopped");
    Ok(())
}
