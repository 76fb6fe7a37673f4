use crate::{BusClient, ComError};

/// The publishing side of the bus.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ComError>;
    async fn disconnect(&mut self) -> Result<(), ComError>;
}

impl Transport for BusClient {
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), ComError> {
        BusClient::publish(self, topic, payload).await
    }

    async fn disconnect(&mut self) -> Result<(), ComError> {
        BusClient::disconnect(self).await
    }
}
