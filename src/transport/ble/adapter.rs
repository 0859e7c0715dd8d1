//! BLE adapter management

use bluer::{
    Adapter, AdapterEvent,
    adv::{Advertisement, AdvertisementHandle},
    gatt::local::ApplicationHandle,
};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    backend::NetworkBackend,
    transport::ble::{gatt::GattServer, uuids::NETWORK_SERVICE_UUID},
};

/// BLE transport adapter
pub struct BleAdapter {
    adapter: Adapter,
    device_name: String,
    app_handle: Option<ApplicationHandle>,
    adv_handle: Option<AdvertisementHandle>,
}

impl BleAdapter {
    /// Create a new BLE adapter
    pub async fn new(device_name: String) -> Result<Self, bluer::Error> {
        let session = bluer::Session::new().await?;
        let adapter = session.default_adapter().await?;

        info!("Using BLE adapter: {}", adapter.name());

        Ok(Self {
            adapter,
            device_name,
            app_handle: None,
            adv_handle: None,
        })
    }

    /// Start the BLE adapter
    pub async fn start<B: NetworkBackend>(
        &mut self,
        gatt_server: Arc<GattServer<B>>,
    ) -> Result<(), bluer::Error> {
        info!("Starting BLE adapter");

        self.adapter.set_powered(true).await?;
        self.adapter.set_alias(self.device_name.clone()).await?;

        // Register GATT application before advertising it
        self.app_handle = Some(gatt_server.register(&self.adapter).await?);

        let adv = Advertisement {
            service_uuids: vec![NETWORK_SERVICE_UUID].into_iter().collect(),
            discoverable: Some(true),
            local_name: Some(self.device_name.clone()),
            ..Default::default()
        };
        self.adv_handle = Some(self.adapter.advertise(adv).await?);

        info!(
            "BLE adapter started and advertising as '{}'",
            self.device_name
        );

        Ok(())
    }

    /// Stop the BLE adapter
    pub fn stop(&mut self) {
        info!("Stopping BLE adapter");

        // Dropping the handles unregisters advertisement and application
        self.adv_handle.take();
        self.app_handle.take();

        info!("BLE adapter stopped");
    }

    /// Run event loop (process BLE events)
    pub async fn run_event_loop(&self) -> Result<(), bluer::Error> {
        let mut events = self.adapter.events().await?;

        info!("BLE event loop started");

        while let Some(event) = events.next().await {
            match event {
                AdapterEvent::DeviceAdded(addr) => {
                    debug!("Device added: {}", addr);
                }
                AdapterEvent::DeviceRemoved(addr) => {
                    debug!("Device removed: {}", addr);
                }
                AdapterEvent::PropertyChanged(prop) => {
                    debug!(?prop, "Adapter property changed");
                }
            }
        }

        warn!("BLE event loop ended");
        Ok(())
    }
}
