//! Notification adapter: batch-result publishing to an SNS topic.

use tokio::runtime::Handle;

pub trait Notifier: Send + Sync {
    fn publish(&self, subject: &str, message: &str) -> Result<(), String>;
}

pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
    topic_arn: String,
    handle: Handle,
}

impl SnsNotifier {
    pub fn new(client: aws_sdk_sns::Client, topic_arn: String, handle: Handle) -> Self {
        Self {
            client,
            topic_arn,
            handle,
        }
    }
}

impl Notifier for SnsNotifier {
    fn publish(&self, subject: &str, message: &str) -> Result<(), String> {
        self.handle.block_on(async {
            self.client
                .publish()
                .topic_arn(&self.topic_arn)
                .subject(subject)
                .message(message)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to publish notification: {error}"))
        })
    }
}
