use {
    crate::{ComError, Packet, framing, topic},
    base::log,
    futures_core::Stream,
    std::{
        pin::Pin,
        sync::Arc,
        task::{Context, Poll},
        time::Duration,
    },
    tokio::{
        io::AsyncWriteExt,
        net::{TcpStream, tcp::OwnedWriteHalf},
        sync::{Mutex, mpsc},
        task::JoinHandle,
    },
};

// buffered messages between the reader task and the consumer
const MESSAGE_CAPACITY: usize = 64;

/// The keepalive advertised to the broker, in whole seconds rounded up.
pub fn keepalive_secs(keepalive: Duration) -> Result<u32, ComError> {
    let secs = keepalive
        .as_secs()
        .saturating_add(u64::from(keepalive.subsec_nanos() > 0));
    u32::try_from(secs)
        .map_err(|_| ComError::Protocol(format!("keepalive of {secs}s is out of range")))
}

/// A payload received on a subscribed topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// A connection to a [`Broker`](crate::Broker).
///
/// Received messages are delivered by a background reader task; the client
/// implements `Stream<Item = Message>`, which ends when the connection does.
pub struct BusClient {
    client_id: String,
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
    messages: mpsc::Receiver<Message>,
    reader_task: JoinHandle<()>,
    ping_task: Option<JoinHandle<()>>,
}

impl BusClient {
    /// Connect to a broker and open a session.
    ///
    /// With a non-zero `keepalive` a PingReq is sent every `keepalive`, so
    /// the broker can tell an idle client from a dead one.
    pub async fn connect(
        address: &str,
        port: u16,
        client_id: &str,
        keepalive: Duration,
    ) -> Result<Self, ComError> {
        let keepalive_secs = keepalive_secs(keepalive)?;
        let stream = TcpStream::connect((address, port)).await?;
        stream.set_nodelay(true)?;
        let (mut read_half, mut write_half) = stream.into_split();

        framing::write_packet(
            &mut write_half,
            &Packet::Connect {
                client_id: client_id.to_string(),
                keepalive_secs,
            },
        )
        .await?;
        log::info!("bus: {} connected to {}:{}", client_id, address, port);

        let writer = Arc::new(Mutex::new(Some(write_half)));
        let (tx, messages) = mpsc::channel(MESSAGE_CAPACITY);

        let reader_task = tokio::spawn({
            let client_id = client_id.to_string();
            async move {
                loop {
                    match framing::read_packet(&mut read_half).await {
                        Ok(Packet::Publish { topic, payload }) => {
                            if tx.send(Message { topic, payload }).await.is_err() {
                                break; // client dropped
                            }
                        }
                        Ok(Packet::PingResp) => log::trace!("bus: {} ping response", client_id),
                        Ok(Packet::Disconnect) => {
                            log::info!("bus: {} disconnected by broker", client_id);
                            break;
                        }
                        Ok(other) => {
                            log::warn!("bus: {} ignoring unexpected {:?}", client_id, other)
                        }
                        Err(ComError::ConnectionClosed) => {
                            log::info!("bus: {} connection closed", client_id);
                            break;
                        }
                        Err(e) => {
                            log::warn!("bus: {} read failed: {}", client_id, e);
                            break;
                        }
                    }
                }
            }
        });

        let ping_task = (!keepalive.is_zero()).then(|| {
            let writer = Arc::clone(&writer);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(keepalive);
                interval.tick().await;
                loop {
                    interval.tick().await;
                    let mut guard = writer.lock().await;
                    let Some(half) = guard.as_mut() else {
                        break;
                    };
                    if let Err(e) = framing::write_packet(half, &Packet::PingReq).await {
                        log::warn!("bus: keepalive ping failed: {}", e);
                        break;
                    }
                }
            })
        });

        Ok(Self {
            client_id: client_id.to_string(),
            writer,
            messages,
            reader_task,
            ping_task,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn send(&self, bytes: &[u8]) -> Result<(), ComError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(ComError::ConnectionClosed)?;
        framing::write_message(writer, bytes).await
    }

    /// Publish `payload` on `topic`. Topic names may not contain wildcards.
    pub async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), ComError> {
        topic::validate_topic(topic).map_err(ComError::Protocol)?;
        self.send(&Packet::publish_bytes(topic, payload)).await
    }

    /// Start receiving messages whose topic matches `filter`.
    pub async fn subscribe(&self, filter: &str) -> Result<(), ComError> {
        topic::validate_filter(filter).map_err(ComError::Protocol)?;
        self.send(
            &Packet::Subscribe {
                filter: filter.to_string(),
            }
            .to_bytes(),
        )
        .await?;
        log::info!("bus: {} subscribed to {}", self.client_id, filter);
        Ok(())
    }

    pub async fn unsubscribe(&self, filter: &str) -> Result<(), ComError> {
        self.send(
            &Packet::Unsubscribe {
                filter: filter.to_string(),
            }
            .to_bytes(),
        )
        .await?;
        log::info!("bus: {} unsubscribed from {}", self.client_id, filter);
        Ok(())
    }

    /// End the session. Later calls fail with `ConnectionClosed`.
    pub async fn disconnect(&mut self) -> Result<(), ComError> {
        if let Some(task) = self.ping_task.take() {
            task.abort();
        }
        let writer = self.writer.lock().await.take();
        let Some(mut writer) = writer else {
            return Err(ComError::ConnectionClosed);
        };
        let result = framing::write_packet(&mut writer, &Packet::Disconnect).await;
        writer.shutdown().await.ok();
        self.reader_task.abort();
        log::info!("bus: {} disconnected", self.client_id);
        result
    }

    pub fn is_connected(&self) -> bool {
        !self.reader_task.is_finished()
    }
}

impl Stream for BusClient {
    type Item = Message;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().messages.poll_recv(cx)
    }
}

impl Drop for BusClient {
    fn drop(&mut self) {
        self.reader_task.abort();
        if let Some(task) = self.ping_task.take() {
            task.abort();
        }
    }
}
