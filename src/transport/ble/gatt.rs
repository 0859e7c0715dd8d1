//! GATT server implementation

use bluer::{
    Adapter,
    gatt::local::{
        Application, ApplicationHandle, Characteristic, CharacteristicNotify,
        CharacteristicNotifyMethod, CharacteristicRead, CharacteristicWrite,
        CharacteristicWriteMethod, Service,
    },
};
use std::sync::Arc;
use tracing::info;

use crate::{backend::NetworkBackend, core::service::NetworkService};

use super::{characteristics::CharacteristicHandler, uuids::*};

/// GATT server for network control
pub struct GattServer<B: NetworkBackend> {
    service: Arc<NetworkService<B>>,
}

impl<B: NetworkBackend> GattServer<B> {
    /// Create a new GATT server
    pub fn new(service: Arc<NetworkService<B>>) -> Self {
        Self { service }
    }

    /// Build the GATT application
    pub fn build_application(&self) -> Application {
        let handler = Arc::new(CharacteristicHandler::new(self.service.clone()));

        Application {
            services: vec![self.build_network_service(handler)],
            ..Default::default()
        }
    }

    /// Build network service
    fn build_network_service(&self, handler: Arc<CharacteristicHandler<B>>) -> Service {
        Service {
            uuid: NETWORK_SERVICE_UUID,
            primary: true,
            characteristics: vec![
                // State characteristic
                Characteristic {
                    uuid: STATE_CHAR_UUID,
                    read: Some(CharacteristicRead {
                        read: true,
                        fun: {
                            let handler = handler.clone();
                            Box::new(move |_req| {
                                let handler = handler.clone();
                                Box::pin(async move { handler.handle_state_read().await })
                            })
                        },
                        ..Default::default()
                    }),
                    notify: Some(CharacteristicNotify {
                        notify: true,
                        method: CharacteristicNotifyMethod::Fun({
                            let handler = handler.clone();
                            Box::new(move |notifier| {
                                let handler = handler.clone();
                                Box::pin(async move { handler.notify_state(notifier).await })
                            })
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                // Command characteristic
                Characteristic {
                    uuid: COMMAND_CHAR_UUID,
                    write: Some(CharacteristicWrite {
                        write: true,
                        write_without_response: false,
                        method: CharacteristicWriteMethod::Fun({
                            let handler = handler.clone();
                            Box::new(move |new_value, _req| {
                                let handler = handler.clone();
                                Box::pin(async move {
                                    handler.handle_command_write(new_value).await
                                })
                            })
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                // Response characteristic
                Characteristic {
                    uuid: RESPONSE_CHAR_UUID,
                    read: Some(CharacteristicRead {
                        read: true,
                        fun: {
                            let handler = handler.clone();
                            Box::new(move |_req| {
                                let handler = handler.clone();
                                Box::pin(async move { handler.handle_response_read().await })
                            })
                        },
                        ..Default::default()
                    }),
                    notify: Some(CharacteristicNotify {
                        notify: true,
                        method: CharacteristicNotifyMethod::Fun({
                            let handler = handler.clone();
                            Box::new(move |notifier| {
                                let handler = handler.clone();
                                Box::pin(async move { handler.notify_responses(notifier).await })
                            })
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                // Networking enabled characteristic
                Characteristic {
                    uuid: NETWORKING_ENABLED_CHAR_UUID,
                    read: Some(CharacteristicRead {
                        read: true,
                        fun: {
                            let handler = handler.clone();
                            Box::new(move |_req| {
                                let handler = handler.clone();
                                Box::pin(async move {
                                    handler.handle_networking_enabled_read().await
                                })
                            })
                        },
                        ..Default::default()
                    }),
                    notify: Some(CharacteristicNotify {
                        notify: true,
                        method: CharacteristicNotifyMethod::Fun({
                            let handler = handler.clone();
                            Box::new(move |notifier| {
                                let handler = handler.clone();
                                Box::pin(async move {
                                    handler.notify_networking_enabled(notifier).await
                                })
                            })
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                // Wireless enabled characteristic
                Characteristic {
                    uuid: WIRELESS_ENABLED_CHAR_UUID,
                    read: Some(CharacteristicRead {
                        read: true,
                        fun: {
                            let handler = handler.clone();
                            Box::new(move |_req| {
                                let handler = handler.clone();
                                Box::pin(async move {
                                    handler.handle_wireless_enabled_read().await
                                })
                            })
                        },
                        ..Default::default()
                    }),
                    notify: Some(CharacteristicNotify {
                        notify: true,
                        method: CharacteristicNotifyMethod::Fun(Box::new(move |notifier| {
                            let handler = handler.clone();
                            Box::pin(async move { handler.notify_wireless_enabled(notifier).await })
                        })),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    /// Register GATT application with adapter
    ///
    /// The application stays registered for as long as the handle lives.
    pub async fn register(&self, adapter: &Adapter) -> Result<ApplicationHandle, bluer::Error> {
        info!("Registering GATT application");
        let app = self.build_application();
        let handle = adapter.serve_gatt_application(app).await?;
        info!("GATT application registered");
        Ok(handle)
    }
}
