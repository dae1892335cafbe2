//! Transport abstraction and the timeout-bounded communication link

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::{ComLinkError, GetRequest, GetResponse, Result};

/// Half-duplex request/response transport to one field device link
///
/// Implementations answer `ComLinkError::NoSuchName` when the device does not
/// implement a requested object, and any other error for transport failures.
#[async_trait]
pub trait Transport: Send {
    /// Short transport description for logs
    fn name(&self) -> &str;

    /// Perform one request/response exchange
    async fn exchange(&mut self, request: &GetRequest) -> Result<GetResponse>;
}

/// Exclusively owned link: one exchange at a time, each bounded by a timeout
pub struct CommLink {
    name: String,
    transport: Box<dyn Transport>,
    timeout: Duration,
    exchanges: u64,
}

impl CommLink {
    pub fn new(name: impl Into<String>, transport: Box<dyn Transport>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            transport,
            timeout,
            exchanges: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of exchanges attempted on this link
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Send a get-request and wait for its response
    ///
    /// A response carrying a different number of values than requested is
    /// reported as a malformed frame.
    pub async fn exchange(&mut self, request: &GetRequest) -> Result<GetResponse> {
        self.exchanges += 1;
        trace!(
            "{} -> {} object(s) via {}",
            self.name,
            request.len(),
            self.transport.name()
        );

        let response = match tokio::time::timeout(self.timeout, self.transport.exchange(request))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                debug!("{}: no response within {:?}", self.name, self.timeout);
                return Err(ComLinkError::timeout(format!(
                    "{} did not respond within {} ms",
                    self.name,
                    self.timeout.as_millis()
                )));
            },
        };

        if response.len() != request.len() {
            return Err(ComLinkError::malformed(format!(
                "expected {} value(s), got {}",
                request.len(),
                response.len()
            )));
        }
        Ok(response)
    }
}

impl std::fmt::Debug for CommLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommLink")
            .field("name", &self.name)
            .field("transport", &self.transport.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::{ObjectId, WireValue};

    struct Echo {
        delay: Duration,
        extra: bool,
    }

    #[async_trait]
    impl Transport for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn exchange(&mut self, request: &GetRequest) -> Result<GetResponse> {
            tokio::time::sleep(self.delay).await;
            let mut values: Vec<WireValue> = request
                .objects()
                .iter()
                .map(|oid| WireValue::Integer(i64::from(oid.last().unwrap_or(0))))
                .collect();
            if self.extra {
                values.push(WireValue::Integer(0));
            }
            Ok(GetResponse::new(values))
        }
    }

    fn request() -> GetRequest {
        GetRequest::new(vec![ObjectId::from_slice(&[1, 3, 6, 1, 4])])
    }

    #[tokio::test]
    async fn test_exchange_returns_values() {
        let echo = Echo {
            delay: Duration::ZERO,
            extra: false,
        };
        let mut link = CommLink::new("test", Box::new(echo), Duration::from_millis(100));
        let response = link.exchange(&request()).await.unwrap();
        assert_eq!(response.values(), &[WireValue::Integer(4)]);
        assert_eq!(link.exchanges(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exchange_times_out() {
        let echo = Echo {
            delay: Duration::from_secs(5),
            extra: false,
        };
        let mut link = CommLink::new("slow", Box::new(echo), Duration::from_millis(100));
        let err = link.exchange(&request()).await.unwrap_err();
        assert!(matches!(err, ComLinkError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_value_count_mismatch_is_malformed() {
        let echo = Echo {
            delay: Duration::ZERO,
            extra: true,
        };
        let mut link = CommLink::new("noisy", Box::new(echo), Duration::from_millis(100));
        let err = link.exchange(&request()).await.unwrap_err();
        assert!(matches!(err, ComLinkError::MalformedFrame(_)));
    }
}
