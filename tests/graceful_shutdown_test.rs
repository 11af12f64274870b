//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - Shutdown signals reach every receiver
//! - The server stops accepting work once the signal is sent
//! - A closed channel counts as a shutdown request

use std::sync::Arc;
use std::time::Duration;
use tenant_backup::adapters::database::Repositories;
use tenant_backup::adapters::identity::ApiKeyIdentityProvider;
use tenant_backup::adapters::memory::InMemoryStore;
use tenant_backup::config::{AuthConfig, ExportConfig};
use tenant_backup::core::export::ExportOrchestrator;
use tenant_backup::server::{serve_on, wait_for_shutdown, AppState};
use tokio::net::TcpListener;
use tokio::sync::watch;

fn state() -> AppState {
    let orchestrator = ExportOrchestrator::from_config(
        Repositories::from_store(Arc::new(InMemoryStore::new())),
        &ExportConfig::default(),
    )
    .unwrap();
    let identity = ApiKeyIdentityProvider::from_config(&AuthConfig::default()).unwrap();
    AppState::new(orchestrator, Arc::new(identity))
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_wait_for_shutdown_resolves_on_signal() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let waiter = tokio::spawn(wait_for_shutdown(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter should finish after the signal")
        .unwrap();
}

#[tokio::test]
async fn test_wait_for_shutdown_resolves_when_sender_dropped() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    drop(shutdown_tx);

    tokio::time::timeout(Duration::from_secs(1), wait_for_shutdown(shutdown_rx))
        .await
        .expect("a closed channel should end the wait");
}

#[tokio::test]
async fn test_server_stops_after_signal() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server = tokio::spawn(serve_on(
        listener,
        Duration::from_secs(2),
        state(),
        shutdown_rx,
    ));

    // The listener accepts connections while running
    tokio::net::TcpStream::connect(address).await.unwrap();

    shutdown_tx.send(true).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop within the drain timeout")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_already_signalled_server_returns_immediately() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (_shutdown_tx, shutdown_rx) = watch::channel(true);

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        serve_on(listener, Duration::from_secs(1), state(), shutdown_rx),
    )
    .await
    .expect("server should not wait for a second signal");
    assert!(result.is_ok());
}
