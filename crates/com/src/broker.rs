use {
    crate::{ComError, Packet, framing, topic},
    base::log,
    std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration},
    tokio::{
        io::AsyncWriteExt,
        net::{
            TcpListener, TcpStream, ToSocketAddrs,
            tcp::{OwnedReadHalf, OwnedWriteHalf},
        },
        sync::{
            RwLock,
            mpsc::{self, error::TrySendError},
        },
        task::{JoinHandle, JoinSet},
        time::timeout,
    },
};

/// Packets queued per session before new ones are dropped.
pub const SESSION_QUEUE_CAPACITY: usize = 64;

/// Time a new connection has to send its Connect packet.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

struct Session {
    client_id: String,
    filters: Vec<String>,
    queue: mpsc::Sender<Arc<[u8]>>,
}

type Sessions = Arc<RwLock<HashMap<SocketAddr, Session>>>;

/// Topic router.
///
/// Every connection gets a session with its own bounded outgoing queue.
/// A Publish is encoded once and offered to each session with a matching
/// filter; a full queue drops the packet for that session only.
pub struct Broker {
    sessions: Sessions,
    accept_task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl Broker {
    /// Bind a TCP listener and start accepting sessions.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let sessions: Sessions = Arc::new(RwLock::new(HashMap::new()));

        // connection tasks live in the JoinSet, so aborting the accept loop ends them too
        let accept_task = tokio::spawn({
            let sessions = Arc::clone(&sessions);
            async move {
                let mut connections = JoinSet::new();
                loop {
                    tokio::select! {
                        accepted = listener.accept() => match accepted {
                            Ok((stream, addr)) => {
                                connections.spawn(serve(stream, addr, Arc::clone(&sessions)));
                            }
                            Err(e) => {
                                log::warn!("broker: accept error: {}", e);
                                tokio::time::sleep(Duration::from_millis(100)).await;
                            }
                        },
                        Some(_) = connections.join_next(), if !connections.is_empty() => {}
                    }
                }
            }
        });

        log::info!("broker: listening on {}", local_addr);

        Ok(Self {
            sessions,
            accept_task,
            local_addr,
        })
    }

    /// Return the local address the broker is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of open sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of sessions that would receive a message on `topic`.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|session| session.matches(topic))
            .count()
    }
}

impl Drop for Broker {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

impl Session {
    fn matches(&self, name: &str) -> bool {
        self.filters.iter().any(|f| topic::topic_matches(f, name))
    }
}

async fn serve(stream: TcpStream, addr: SocketAddr, sessions: Sessions) {
    stream.set_nodelay(true).ok();
    let (mut reader, mut writer) = stream.into_split();

    // the first packet must open the session
    let (client_id, keepalive) =
        match timeout(CONNECT_TIMEOUT, framing::read_packet(&mut reader)).await {
            Ok(Ok(Packet::Connect {
                client_id,
                keepalive_secs,
            })) => (client_id, Duration::from_secs(keepalive_secs as u64)),
            Ok(Ok(other)) => {
                log::warn!("broker: {} sent {:?} before Connect", addr, other);
                return;
            }
            Ok(Err(e)) => {
                log::warn!("broker: {} failed before Connect: {}", addr, e);
                return;
            }
            Err(_) => {
                log::warn!("broker: {} did not send Connect in time", addr);
                return;
            }
        };

    let (queue, mut outgoing) = mpsc::channel::<Arc<[u8]>>(SESSION_QUEUE_CAPACITY);
    sessions.write().await.insert(
        addr,
        Session {
            client_id: client_id.clone(),
            filters: Vec::new(),
            queue,
        },
    );
    log::info!(
        "broker: session {} from {} (keepalive {:?})",
        client_id,
        addr,
        keepalive
    );

    let reason = tokio::select! {
        reason = read_loop(&mut reader, addr, keepalive, &sessions) => reason,
        reason = write_loop(&mut writer, &mut outgoing) => reason,
    };

    sessions.write().await.remove(&addr);
    writer.shutdown().await.ok();
    log::info!("broker: session {} closed: {}", client_id, reason);
}

async fn write_loop(
    writer: &mut OwnedWriteHalf,
    outgoing: &mut mpsc::Receiver<Arc<[u8]>>,
) -> String {
    while let Some(bytes) = outgoing.recv().await {
        if let Err(e) = framing::write_message(writer, &bytes).await {
            return format!("write failed: {e}");
        }
    }
    "queue closed".to_string()
}

async fn read_loop(
    reader: &mut OwnedReadHalf,
    addr: SocketAddr,
    keepalive: Duration,
    sessions: &Sessions,
) -> String {
    // a client is allowed one and a half keepalive periods of silence
    let limit = (!keepalive.is_zero()).then(|| keepalive * 3 / 2);
    loop {
        let next = match limit {
            Some(limit) => match timeout(limit, framing::read_packet(reader)).await {
                Ok(next) => next,
                Err(_) => return "keepalive expired".to_string(),
            },
            None => framing::read_packet(reader).await,
        };
        match next {
            Ok(Packet::Publish { topic, payload }) => {
                if let Err(e) = topic::validate_topic(&topic) {
                    log::warn!("broker: {} publish rejected: {}", addr, e);
                    continue;
                }
                route(sessions, &topic, &payload).await;
            }
            Ok(Packet::Subscribe { filter }) => {
                if let Err(e) = topic::validate_filter(&filter) {
                    log::warn!("broker: {} subscribe rejected: {}", addr, e);
                    continue;
                }
                if let Some(session) = sessions.write().await.get_mut(&addr) {
                    if !session.filters.contains(&filter) {
                        log::debug!("broker: {} subscribed to {}", session.client_id, filter);
                        session.filters.push(filter);
                    }
                }
            }
            Ok(Packet::Unsubscribe { filter }) => {
                if let Some(session) = sessions.write().await.get_mut(&addr) {
                    session.filters.retain(|f| *f != filter);
                }
            }
            Ok(Packet::PingReq) => {
                if let Some(session) = sessions.read().await.get(&addr) {
                    let _ = session.queue.try_send(Packet::PingResp.to_bytes().into());
                }
            }
            Ok(Packet::PingResp) => {}
            Ok(Packet::Disconnect) => return "disconnect".to_string(),
            Ok(Packet::Connect { .. }) => return "protocol error: second Connect".to_string(),
            Err(ComError::ConnectionClosed) => return "connection closed".to_string(),
            Err(e) => return e.to_string(),
        }
    }
}

async fn route(sessions: &Sessions, name: &str, payload: &[u8]) {
    let bytes: Arc<[u8]> = Packet::publish_bytes(name, payload).into();
    for session in sessions.read().await.values() {
        if !session.matches(name) {
            continue;
        }
        match session.queue.try_send(Arc::clone(&bytes)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::debug!(
                    "broker: queue full for {}, dropped message on {}",
                    session.client_id,
                    name
                );
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
