//! Connection state machine tests against a scripted wallet.

use wallet_bridge::errors::ErrorKind;
use wallet_bridge::persistence::DisconnectMarker;
use wallet_bridge::provider::{ProviderError, ProviderEvent, ProviderEventKind};
use wallet_bridge::{ConnectionStatus, WalletState};

mod common;
use common::{bridge_with, bridge_without_provider, wait_until, Script, ScriptedWallet, ALICE, BOB};

#[tokio::test]
async fn test_connect_success() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, marker) = bridge_with(&wallet);
    marker.set().unwrap();

    let state = bridge.connection().connect().await.unwrap();

    assert!(state.is_connected);
    assert!(!state.is_connecting);
    assert_eq!(state.address, Some(ALICE));
    assert_eq!(state.balance, "1.5");
    assert_eq!(state.network_id, Some(1));
    assert_eq!(state.network_name.as_deref(), Some("Ethereum Mainnet"));
    assert!(state.is_supported);
    assert_eq!(state.error, None);
    assert_eq!(bridge.connection().status(), ConnectionStatus::Connected);

    assert!(!marker.is_set().unwrap());
    assert_eq!(wallet.listener_count(ProviderEventKind::AccountsChanged), 1);
    assert_eq!(wallet.listener_count(ProviderEventKind::ChainChanged), 1);
}

#[tokio::test]
async fn test_connect_without_provider() {
    let bridge = bridge_without_provider();

    let err = bridge.connection().connect().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProviderUnavailable);

    let expected = WalletState {
        error: Some(err.clone()),
        ..WalletState::default()
    };
    assert_eq!(bridge.wallet(), expected);
    assert_eq!(bridge.connection().status(), ConnectionStatus::Failed(err));
}

#[tokio::test]
async fn test_connect_with_no_accounts() {
    let wallet = ScriptedWallet::new(Script {
        accounts: vec![],
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);

    let err = bridge.connection().connect().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoAccounts);
    assert_eq!(
        err.user_message(),
        "No accounts found. Please check your wallet connection."
    );
    assert!(!bridge.wallet().is_connected);
    assert_eq!(wallet.call_count("eth_chainId"), 0);
}

#[tokio::test]
async fn test_connect_rejected_keeps_raw_message() {
    let wallet = ScriptedWallet::new(Script {
        request_accounts_error: Some(ProviderError::with_code(4001, "User rejected the request.")),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);

    let err = bridge.connection().connect().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UserRejected);
    assert_eq!(err.code, Some(4001));
    assert_eq!(err.message, "User rejected the request.");

    let state = bridge.wallet();
    assert!(!state.is_connecting && !state.is_connected);
    assert_eq!(state.error, Some(err));
    assert_eq!(wallet.listener_count(ProviderEventKind::ChainChanged), 0);

    // No automatic retry.
    assert_eq!(wallet.call_count("eth_requestAccounts"), 1);
}

#[tokio::test]
async fn test_failed_then_connect_again() {
    let wallet = ScriptedWallet::new(Script {
        balance_error: Some(ProviderError::new(None, "could not detect network")),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);

    let err = bridge.connection().connect().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NetworkError);

    wallet.script(|s| s.balance_error = None);
    let state = bridge.connection().connect().await.unwrap();
    assert!(state.is_connected);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_connect_when_connected_returns_snapshot() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, _) = bridge_with(&wallet);

    let first = bridge.connection().connect().await.unwrap();
    let second = bridge.connection().connect().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(wallet.call_count("eth_requestAccounts"), 1);
}

#[tokio::test]
async fn test_connect_while_connecting() {
    let wallet = ScriptedWallet::new(Script::default());
    let gate = wallet.gate_request_accounts();
    let (bridge, _) = bridge_with(&wallet);

    let pending = {
        let bridge = bridge.clone();
        tokio::spawn(async move { bridge.connection().connect().await })
    };
    let mut rx = bridge.store().watch_wallet();
    wait_until(&mut rx, |w| w.is_connecting).await;

    let err = bridge.connection().connect().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unclassified);
    assert_eq!(err.message, "connection already in progress");
    assert!(bridge.wallet().is_connecting);

    gate.notify_one();
    let state = pending.await.unwrap().unwrap();
    assert!(state.is_connected);
}

#[tokio::test]
async fn test_disconnect_during_connect_wins() {
    let wallet = ScriptedWallet::new(Script::default());
    let gate = wallet.gate_request_accounts();
    let (bridge, marker) = bridge_with(&wallet);

    let pending = {
        let bridge = bridge.clone();
        tokio::spawn(async move { bridge.connection().connect().await })
    };
    let mut rx = bridge.store().watch_wallet();
    wait_until(&mut rx, |w| w.is_connecting).await;

    bridge.connection().disconnect();
    gate.notify_one();

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unclassified);
    assert_eq!(bridge.wallet(), WalletState::default());
    assert!(marker.is_set().unwrap());
    assert_eq!(wallet.listener_count(ProviderEventKind::AccountsChanged), 0);
}

#[tokio::test]
async fn test_disconnect_resets_and_persists() {
    let wallet = ScriptedWallet::new(Script {
        chain_id: "0x89".into(),
        ..Script::default()
    });
    let (bridge, marker) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();

    bridge.connection().disconnect();

    assert_eq!(bridge.wallet(), WalletState::default());
    assert_eq!(bridge.connection().status(), ConnectionStatus::Disconnected);
    assert!(marker.is_set().unwrap());
    assert_eq!(wallet.listener_count(ProviderEventKind::AccountsChanged), 0);
    assert_eq!(wallet.listener_count(ProviderEventKind::ChainChanged), 0);
    assert!(bridge.connection().signing_context().is_none());
}

#[tokio::test]
async fn test_auto_connect_respects_disconnect_marker() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, marker) = bridge_with(&wallet);

    bridge.connection().connect().await.unwrap();
    bridge.connection().disconnect();

    assert_eq!(bridge.connection().auto_connect().await, None);
    assert!(!bridge.wallet().is_connected);
    assert_eq!(wallet.call_count("eth_accounts"), 0);

    // An explicit connect clears the marker again.
    bridge.connection().connect().await.unwrap();
    assert!(!marker.is_set().unwrap());
    bridge.connection().disconnect();
    marker.clear().unwrap();

    let state = bridge.connection().auto_connect().await.unwrap();
    assert!(state.is_connected);
}

#[tokio::test]
async fn test_auto_connect_without_authorization() {
    let wallet = ScriptedWallet::new(Script {
        accounts: vec![],
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);

    assert_eq!(bridge.connection().auto_connect().await, None);
    assert_eq!(wallet.call_count("eth_accounts"), 1);
    assert_eq!(wallet.call_count("eth_requestAccounts"), 0);
    assert_eq!(bridge.wallet(), WalletState::default());
}

#[tokio::test]
async fn test_auto_connect_without_provider_is_noop() {
    let bridge = bridge_without_provider();
    assert_eq!(bridge.connection().auto_connect().await, None);
    assert_eq!(bridge.wallet(), WalletState::default());
}

#[tokio::test]
async fn test_accounts_revoked_disconnects() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, marker) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();
    let mut rx = bridge.store().watch_wallet();

    wallet.emit(ProviderEvent::AccountsChanged(vec![]));

    let state = wait_until(&mut rx, |w| !w.is_connected).await;
    assert_eq!(state, WalletState::default());
    // Revocation is not a manual disconnect.
    assert!(!marker.is_set().unwrap());
    assert_eq!(wallet.listener_count(ProviderEventKind::ChainChanged), 0);
}

#[tokio::test]
async fn test_account_switch_updates_in_place() {
    let wallet = ScriptedWallet::new(Script {
        chain_id: "0x89".into(),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();
    let mut rx = bridge.store().watch_wallet();

    wallet.script(|s| s.balance = alloy::primitives::U256::from(2_000_000_000_000_000_000u128));
    wallet.emit(ProviderEvent::AccountsChanged(vec![BOB]));

    let state = wait_until(&mut rx, |w| w.address == Some(BOB)).await;
    assert!(state.is_connected);
    assert_eq!(state.balance, "2.0");
    assert_eq!(state.network_id, Some(137));
    assert_eq!(state.network_name.as_deref(), Some("Polygon Mainnet"));
}

#[tokio::test]
async fn test_chain_change_refreshes_network() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, _) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();
    let mut rx = bridge.store().watch_wallet();

    wallet.emit(ProviderEvent::ChainChanged("0x13881".into()));
    let state = wait_until(&mut rx, |w| w.network_id == Some(80001)).await;
    assert_eq!(state.network_name.as_deref(), Some("Polygon Mumbai"));
    assert!(state.is_supported);
    assert!(state.is_connected);

    wallet.emit(ProviderEvent::ChainChanged("0x539".into()));
    let state = wait_until(&mut rx, |w| w.network_id == Some(1337)).await;
    assert_eq!(state.network_name.as_deref(), Some("Unknown Network"));
    assert!(!state.is_supported);
    assert_eq!(bridge.connection().status(), ConnectionStatus::Connected);
}

#[tokio::test]
async fn test_events_ignored_while_disconnected() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, _) = bridge_with(&wallet);

    bridge.connection().handle_chain_changed("0x89").await;
    bridge.connection().handle_accounts_changed(vec![BOB]).await;
    bridge.connection().handle_chain_changed("garbage").await;

    assert_eq!(bridge.wallet(), WalletState::default());
    assert_eq!(wallet.call_count("eth_getBalance"), 0);
}

#[tokio::test]
async fn test_switch_network() {
    let wallet = ScriptedWallet::new(Script::default());
    let (bridge, _) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();

    bridge.connection().switch_network(137).await.unwrap();

    assert_eq!(wallet.switched(), vec!["0x89".to_string()]);
    assert!(wallet.added().is_empty());
}

#[tokio::test]
async fn test_switch_to_unknown_chain_adds_it() {
    let wallet = ScriptedWallet::new(Script {
        switch_error: Some(ProviderError::with_code(
            4902,
            "Unrecognized chain ID \"0x13881\". Try adding the chain using wallet_addEthereumChain first.",
        )),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();

    bridge.connection().switch_network(80001).await.unwrap();

    let added = wallet.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].chain_id, "0x13881");
    assert_eq!(added[0].chain_name, "Polygon Mumbai");
    assert_eq!(added[0].rpc_urls, vec!["https://rpc-mumbai.maticvigil.com/".to_string()]);
    assert_eq!(
        added[0].block_explorer_urls,
        vec!["https://mumbai.polygonscan.com/".to_string()]
    );
    assert_eq!(added[0].native_currency.symbol, "MATIC");

    let calls = wallet.calls();
    let switch_at = calls.iter().position(|c| *c == "wallet_switchEthereumChain").unwrap();
    let add_at = calls.iter().position(|c| *c == "wallet_addEthereumChain").unwrap();
    assert!(switch_at < add_at);
}

#[tokio::test]
async fn test_switch_to_unregistered_unknown_chain_fails() {
    let wallet = ScriptedWallet::new(Script {
        switch_error: Some(ProviderError::with_code(4902, "Unrecognized chain ID")),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);

    let err = bridge.connection().switch_network(31337).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ChainUnknown);
    assert!(wallet.added().is_empty());
}

#[tokio::test]
async fn test_switch_errors_propagate_unchanged() {
    let wallet = ScriptedWallet::new(Script {
        switch_error: Some(ProviderError::with_code(4001, "User rejected the request.")),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);
    bridge.connection().connect().await.unwrap();
    let before = bridge.wallet();

    let err = bridge.connection().switch_network(137).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UserRejected);
    assert_eq!(err.message, "User rejected the request.");
    assert!(wallet.added().is_empty());
    assert_eq!(wallet.call_count("wallet_switchEthereumChain"), 1);
    assert_eq!(bridge.wallet(), before);
}

#[tokio::test]
async fn test_switch_without_provider() {
    let bridge = bridge_without_provider();
    let err = bridge.connection().switch_network(1).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ProviderUnavailable);
}

#[tokio::test]
async fn test_signing_context_follows_connection() {
    let wallet = ScriptedWallet::new(Script {
        chain_id: "0x5".into(),
        ..Script::default()
    });
    let (bridge, _) = bridge_with(&wallet);
    assert!(bridge.connection().signing_context().is_none());

    bridge.connection().connect().await.unwrap();
    let signer = bridge.connection().signing_context().unwrap();
    assert_eq!(signer.address(), ALICE);
    assert_eq!(signer.network_id(), Some(5));

    bridge.gateway().eject();
    assert!(bridge.connection().signing_context().is_none());
}
