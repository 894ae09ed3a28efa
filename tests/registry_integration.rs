// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the connector registry and external notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use extcon_lib::{
    CableId, ConnectorBuilder, ConnectorConfig, ConnectorRegistry, Error, EventBus, HandleId,
    Lifecycle, PowerEvent, StaticBinding,
};

// ============================================================================
// Registration and lookup
// ============================================================================

mod lookup {
    use super::*;

    #[test]
    fn newest_connector_wins_cable_lookup() {
        let registry = ConnectorRegistry::new();
        let pmic = ConnectorBuilder::new("pmic", [CableId::USB, CableId::CHG_USB_SDP])
            .build()
            .unwrap();
        let muic = ConnectorBuilder::new("muic", [CableId::JIG, CableId::USB])
            .build()
            .unwrap();
        registry.register(&pmic).unwrap();
        registry.register(&muic).unwrap();

        let (found, index) = registry.find_by_cable(CableId::USB).unwrap();
        assert_eq!(found.name(), "muic");
        assert_eq!(index, 1);

        registry.unregister(&muic).unwrap();
        let (found, index) = registry.find_by_cable(CableId::USB).unwrap();
        assert_eq!(found.name(), "pmic");
        assert_eq!(index, 0);
    }

    #[test]
    fn provider_registered_after_consumer_lookup() {
        let registry = ConnectorRegistry::new();
        let binding = StaticBinding::new([HandleId::new(0x40)]).with_cable(
            "id-pin",
            HandleId::new(0x40),
            1,
        );

        assert_eq!(
            registry.find_by_handle(&binding, 0).unwrap_err(),
            Error::RetryLater(0x40)
        );
        assert_eq!(
            registry.find_by_cable_name(&binding, "id-pin").unwrap_err(),
            Error::RetryLater(0x40)
        );

        let provider = ConnectorBuilder::new("usb-phy", [CableId::USB, CableId::USB_HOST])
            .with_parent(HandleId::new(0x40))
            .build()
            .unwrap();
        registry.register(&provider).unwrap();

        assert!(Arc::ptr_eq(
            &registry.find_by_handle(&binding, 0).unwrap(),
            &provider
        ));
        let (found, index) = registry.find_by_cable_name(&binding, "id-pin").unwrap();
        assert!(Arc::ptr_eq(&found, &provider));
        assert_eq!(index, 1);
    }

    #[test]
    fn config_built_connectors_register() {
        let registry = ConnectorRegistry::new();
        let config: ConnectorConfig = serde_json::from_str(
            r#"{
                "name": "dock-detect",
                "cables": ["DOCK", "HDMI", "USB-HOST"],
                "mutually_exclusive": [["HDMI", "USB-HOST"]],
                "deliver_during_suspend": false,
                "parent": 12
            }"#,
        )
        .unwrap();

        let connector = config.build().unwrap();
        registry.register(&connector).unwrap();

        assert_eq!(registry.find_by_name("dock-detect").unwrap().cables().len(), 3);
        assert_eq!(
            registry.find_by_handle(&vec![HandleId::new(12)], 0).unwrap().name(),
            "dock-detect"
        );
        assert!(matches!(
            connector.set_state(0b110),
            Err(Error::ExclusivityViolation { group: 1, .. })
        ));
    }
}

// ============================================================================
// Observers through the registry
// ============================================================================

mod observers {
    use super::*;

    #[test]
    fn observer_stays_on_first_matching_connector() {
        let registry = ConnectorRegistry::new();
        let first = ConnectorBuilder::new("first", [CableId::CHG_USB_DCP])
            .build()
            .unwrap();
        registry.register(&first).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let sub = registry
            .register_observer(None, CableId::CHG_USB_DCP, move |_, connector| {
                assert_eq!(connector.name(), "first");
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let second = ConnectorBuilder::new("second", [CableId::CHG_USB_DCP])
            .build()
            .unwrap();
        registry.register(&second).unwrap();

        second.set_state(1).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        first.set_state(1).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(sub.cable(), CableId::CHG_USB_DCP);
        sub.unsubscribe().unwrap();
        first.set_state(0).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_during_dispatch_completes_in_flight_callbacks() {
        let registry = Arc::new(ConnectorRegistry::new());
        let connector = ConnectorBuilder::new("volatile", [CableId::USB, CableId::USB_HOST])
            .build()
            .unwrap();
        registry.register(&connector).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        {
            let registry = Arc::clone(&registry);
            let calls = Arc::clone(&calls);
            connector
                .on_cable_changed(CableId::USB, move |_, connector| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let this = registry.find_by_name(connector.name()).unwrap();
                    registry.unregister(&this).unwrap();
                })
                .unwrap();
        }
        for cable in [CableId::USB, CableId::USB_HOST] {
            let calls = Arc::clone(&calls);
            connector
                .on_cable_changed(cable, move |_, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        connector.set_state(0b11).unwrap();

        // The USB observers were collected before the unregistration and
        // all run; USB-HOST observers were released before its turn.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(connector.lifecycle(), Lifecycle::Released);
        assert!(registry.is_empty());
        assert_eq!(connector.observer_count(CableId::USB), 0);
        assert_eq!(
            connector.set_state(0).unwrap_err(),
            Error::Unregistered("volatile".to_string())
        );
    }
}

// ============================================================================
// Power events
// ============================================================================

mod power {
    use super::*;

    #[test]
    fn registry_wide_suspend_buffers_every_connector() {
        let registry = ConnectorRegistry::new();
        let buffered = ConnectorBuilder::new("buffered", [CableId::USB])
            .deliver_during_suspend(false)
            .build()
            .unwrap();
        let live = ConnectorBuilder::new("live", [CableId::USB]).build().unwrap();
        registry.register(&buffered).unwrap();
        registry.register(&live).unwrap();

        registry.notify_power_event(PowerEvent::SuspendPrepare).unwrap();
        buffered.set_state(1).unwrap();
        live.set_state(1).unwrap();
        assert_eq!(buffered.state(), 0);
        assert_eq!(live.state(), 1);

        registry.notify_power_event(PowerEvent::PostSuspend).unwrap();
        assert_eq!(buffered.state(), 1);
    }

    #[test]
    fn failing_replay_does_not_stop_other_connectors() {
        let registry = ConnectorRegistry::new();
        let strict = ConnectorBuilder::new("strict", [CableId::USB, CableId::USB_HOST])
            .with_exclusive_group([CableId::USB, CableId::USB_HOST])
            .deliver_during_suspend(false)
            .build()
            .unwrap();
        let other = ConnectorBuilder::new("other", [CableId::DOCK])
            .deliver_during_suspend(false)
            .build()
            .unwrap();
        registry.register(&strict).unwrap();
        registry.register(&other).unwrap();

        registry.notify_power_event(PowerEvent::SuspendPrepare).unwrap();
        strict.set_state(0b11).unwrap();
        other.set_state(1).unwrap();

        let err = registry
            .notify_power_event(PowerEvent::PostSuspend)
            .unwrap_err();
        assert!(matches!(err, Error::ExclusivityViolation { .. }));
        assert_eq!(strict.state(), 0);
        assert_eq!(other.state(), 1);
        assert!(!strict.is_suspended());
    }
}

// ============================================================================
// External notification
// ============================================================================

mod sink {
    use super::*;

    #[tokio::test]
    async fn event_bus_receives_one_event_per_commit() {
        let registry = ConnectorRegistry::new();
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let connector = ConnectorBuilder::new("hdmi-tx", [CableId::DISP_HDMI, CableId::DISP_DVI])
            .with_sink(Arc::new(bus.clone()))
            .build()
            .unwrap();
        registry.register(&connector).unwrap();

        connector.set_cable_state(CableId::DISP_HDMI, true).unwrap();
        connector.set_cable_state(CableId::DISP_HDMI, true).unwrap();
        connector.set_state(0b10).unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.env()[0], "NAME=hdmi-tx");
        assert_eq!(first.env()[1], "STATE=HDMI=1\nDVI=0");
        assert!(first.snapshot().unwrap().dev_name.is_some());

        let second = rx.recv().await.unwrap();
        assert_eq!(second.snapshot().unwrap().state, 0b10);
        assert!(rx.try_recv().is_err());
    }
}
