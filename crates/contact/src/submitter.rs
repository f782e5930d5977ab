use std::time::Duration;

use crate::{
    ContactFormData, PageContext, ResponseBody, SinkConfig, SinkResult, SinkTarget,
    SubmissionOutcome, classify_response, classify_transport, reduce,
};

/// Per-sink results, in sink declaration order, and their reduction.
#[derive(Debug, Clone)]
pub struct Submission {
    pub results: Vec<SinkResult>,
    pub outcome: SubmissionOutcome,
}

/// Fans one submission out to every configured sink.
#[derive(Clone, Default)]
pub struct Submitter {
    client: reqwest::Client,
}

impl Submitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issues all sink requests concurrently and waits for every one of them
    /// to settle. Sink failures are folded into the returned value.
    pub async fn submit(
        &self,
        form: &ContactFormData,
        page: &PageContext,
        config: &SinkConfig,
    ) -> Submission {
        let targets = config.targets();

        tracing::info!(
            sinks = targets.len(),
            email = %form.email,
            "Submitting contact form"
        );

        let requests = targets.iter().map(|target| {
            let payload = config.payload(target.kind, form, page);
            self.send(target, payload, config.request_timeout)
        });

        let results = futures::future::join_all(requests).await;
        let outcome = reduce(&results);

        for result in &results {
            match &result.outcome {
                Ok(()) => tracing::info!(sink = %result.sink, "Sink accepted submission"),
                Err(e) => tracing::warn!(sink = %result.sink, error = %e, "Sink rejected submission"),
            }
        }

        Submission { results, outcome }
    }

    async fn send(
        &self,
        target: &SinkTarget,
        payload: Vec<(String, String)>,
        timeout: Duration,
    ) -> SinkResult {
        tracing::debug!(sink = %target.kind, url = %target.url, "Posting to sink");

        let response = match self
            .client
            .post(&target.url)
            .form(&payload)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return classify_transport(target.kind, transport_message(&e, timeout)),
        };

        let status = response.status().as_u16();

        match response.bytes().await {
            Ok(bytes) => classify_response(target.kind, status, ResponseBody::from_bytes(&bytes)),
            Err(e) => classify_transport(target.kind, transport_message(&e, timeout)),
        }
    }
}

fn transport_message(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        return format!("Request timed out after {}ms", timeout.as_millis());
    }

    error.to_string()
}
