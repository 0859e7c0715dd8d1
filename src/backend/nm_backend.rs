//! NetworkManager backend over the D-Bus system bus

use futures::{
    StreamExt,
    future,
    stream::{self, BoxStream},
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, error, info, warn};
use zbus::{
    Connection, fdo::DBusProxy, names::BusName, proxy, proxy::CacheProperties,
    zvariant::OwnedObjectPath,
};

use crate::{
    backend::{BackendEvent, NetworkBackend},
    core::{
        error::{BackendError, BackendResult},
        types::ManagerState,
    },
};

const NM_SERVICE: &str = "org.freedesktop.NetworkManager";
const NM_ALREADY_ENABLED_OR_DISABLED: &str =
    "org.freedesktop.NetworkManager.AlreadyEnabledOrDisabled";
const NM_DEVICE_TYPE_WIFI: u32 = 2;
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
trait NetworkManager {
    fn enable(&self, enable: bool) -> zbus::Result<()>;

    fn get_devices(&self) -> zbus::Result<Vec<OwnedObjectPath>>;

    #[zbus(property)]
    fn state(&self) -> zbus::Result<u32>;

    #[zbus(property)]
    fn networking_enabled(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn wireless_enabled(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn set_wireless_enabled(&self, value: bool) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.freedesktop.NetworkManager.Device",
    default_service = "org.freedesktop.NetworkManager"
)]
trait Device {
    #[zbus(property)]
    fn device_type(&self) -> zbus::Result<u32>;
}

/// NetworkManager backend
///
/// Every read goes to the bus through an uncached proxy. A watcher task
/// forwards property and name-owner changes as [`BackendEvent`]s.
pub struct NetworkManagerBackend {
    connection: Connection,
    manager: NetworkManagerProxy<'static>,
    dbus: DBusProxy<'static>,
    events: broadcast::Sender<BackendEvent>,
    watcher: JoinHandle<()>,
}

impl NetworkManagerBackend {
    /// Connect to the system bus and start watching NetworkManager
    pub async fn new() -> BackendResult<Self> {
        let connection = Connection::system().await?;

        let manager = NetworkManagerProxy::builder(&connection)
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        let dbus = DBusProxy::new(&connection).await?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let watcher = tokio::spawn(Self::watch(connection.clone(), events.clone()));

        Ok(Self {
            connection,
            manager,
            dbus,
            events,
            watcher,
        })
    }

    async fn watch(connection: Connection, events: broadcast::Sender<BackendEvent>) {
        let mut changes = match Self::change_stream(&connection).await {
            Ok(changes) => changes,
            Err(e) => {
                error!("Failed to subscribe to NetworkManager signals: {}", e);
                return;
            }
        };

        info!("Watching NetworkManager state changes");

        while let Some(event) = changes.next().await {
            debug!(?event, "NetworkManager event");
            // No receivers just means nobody is listening yet
            let _ = events.send(event);
        }

        warn!("NetworkManager signal stream ended");
    }

    async fn change_stream(
        connection: &Connection,
    ) -> BackendResult<BoxStream<'static, BackendEvent>> {
        // Property streams need the cache to be kept up to date by signals
        let manager = NetworkManagerProxy::new(connection).await?;
        let dbus = DBusProxy::new(connection).await?;

        let state = manager
            .receive_state_changed()
            .await
            .map(|_| BackendEvent::ManagerStateChanged)
            .boxed();
        let networking = manager
            .receive_networking_enabled_changed()
            .await
            .map(|_| BackendEvent::NetworkingEnabledChanged)
            .boxed();
        let wireless = manager
            .receive_wireless_enabled_changed()
            .await
            .map(|_| BackendEvent::WirelessEnabledChanged)
            .boxed();
        let availability = dbus
            .receive_name_owner_changed()
            .await?
            .filter_map(|signal| {
                let ours = signal
                    .args()
                    .map(|args| args.name().as_str() == NM_SERVICE)
                    .unwrap_or(false);
                future::ready(ours.then_some(BackendEvent::AvailabilityChanged))
            })
            .boxed();

        Ok(stream::select_all([state, networking, wireless, availability]).boxed())
    }

    async fn name_has_owner(&self) -> BackendResult<bool> {
        let name = BusName::try_from(NM_SERVICE).map_err(|e| BackendError::DBus(e.to_string()))?;
        Ok(self.dbus.name_has_owner(name).await?)
    }

    async fn wireless_device_present(&self) -> BackendResult<bool> {
        for path in self.manager.get_devices().await? {
            let device = DeviceProxy::builder(&self.connection)
                .path(path)?
                .cache_properties(CacheProperties::No)
                .build()
                .await?;

            if device.device_type().await? == NM_DEVICE_TYPE_WIFI {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Map a request reply to a dispatch result
    ///
    /// NetworkManager refuses to enable what is already enabled; the request
    /// is still satisfied.
    fn dispatched(result: zbus::Result<()>) -> BackendResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(zbus::Error::MethodError(name, _, _))
                if name.as_str() == NM_ALREADY_ENABLED_OR_DISABLED =>
            {
                debug!("NetworkManager already in requested state");
                Ok(())
            }
            Err(e) => Err(BackendError::Dispatch(e.to_string())),
        }
    }
}

impl Drop for NetworkManagerBackend {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

impl NetworkBackend for NetworkManagerBackend {
    async fn is_available(&self) -> bool {
        match self.name_has_owner().await {
            Ok(available) => available,
            Err(e) => {
                warn!("Failed to query NetworkManager availability: {}", e);
                false
            }
        }
    }

    async fn is_wireless_available(&self) -> bool {
        match self.wireless_device_present().await {
            Ok(present) => present,
            Err(e) => {
                warn!("Failed to enumerate network devices: {}", e);
                false
            }
        }
    }

    async fn is_networking_enabled(&self) -> bool {
        self.manager.networking_enabled().await.unwrap_or_else(|e| {
            debug!("Failed to read NetworkingEnabled: {}", e);
            false
        })
    }

    async fn is_wireless_enabled(&self) -> bool {
        self.manager.wireless_enabled().await.unwrap_or_else(|e| {
            debug!("Failed to read WirelessEnabled: {}", e);
            false
        })
    }

    async fn manager_state(&self) -> ManagerState {
        match self.manager.state().await {
            Ok(state) => ManagerState::from_nm_state(state),
            Err(e) => {
                debug!("Failed to read NetworkManager state: {}", e);
                ManagerState::Unknown
            }
        }
    }

    async fn enable_networking(&self) -> BackendResult<()> {
        info!("Requesting NetworkManager to enable networking");
        Self::dispatched(self.manager.enable(true).await)
    }

    async fn disable_networking(&self) -> BackendResult<()> {
        info!("Requesting NetworkManager to disable networking");
        Self::dispatched(self.manager.enable(false).await)
    }

    async fn enable_wireless(&self) -> BackendResult<()> {
        info!("Requesting NetworkManager to enable wireless");
        Self::dispatched(self.manager.set_wireless_enabled(true).await)
    }

    async fn disable_wireless(&self) -> BackendResult<()> {
        info!("Requesting NetworkManager to disable wireless");
        Self::dispatched(self.manager.set_wireless_enabled(false).await)
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}
